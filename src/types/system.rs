// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Package ecosystems known to deps.dev

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::InsightsError;

/// A package management system (ecosystem) indexed by deps.dev
///
/// Serialized in upper case (`"NPM"`) as in the JSON API, and rendered in
/// lower case (`npm`) inside request paths.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum System {
    /// No system set on the request
    #[default]
    #[serde(rename = "SYSTEM_UNSPECIFIED")]
    Unspecified,
    Go,
    Rubygems,
    Npm,
    Cargo,
    Maven,
    Pypi,
    Nuget,
}

impl System {
    /// All concrete systems, excluding [`System::Unspecified`]
    pub const ALL: [System; 7] = [
        System::Go,
        System::Rubygems,
        System::Npm,
        System::Cargo,
        System::Maven,
        System::Pypi,
        System::Nuget,
    ];

    /// The lower-case name used in REST paths
    pub fn as_path_segment(self) -> &'static str {
        match self {
            System::Unspecified => "system_unspecified",
            System::Go => "go",
            System::Rubygems => "rubygems",
            System::Npm => "npm",
            System::Cargo => "cargo",
            System::Maven => "maven",
            System::Pypi => "pypi",
            System::Nuget => "nuget",
        }
    }

    /// Whether this is a concrete ecosystem that can be queried
    pub fn is_specified(self) -> bool {
        self != System::Unspecified
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_path_segment().to_ascii_uppercase())
    }
}

impl FromStr for System {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        System::ALL
            .into_iter()
            .find(|system| system.as_path_segment().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InsightsError::UnknownSystem {
                value: s.to_string(),
            })
    }
}
