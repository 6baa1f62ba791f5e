// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Resource identifiers and request objects for the Insights API
//!
//! Requests carry their identifier as an `Option`, mirroring how generated
//! protobuf messages expose unset sub-messages.

use serde::{Deserialize, Serialize};

use super::System;

/// Identifies a package by ecosystem and name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageKey {
    #[serde(default)]
    pub system: System,
    #[serde(default)]
    pub name: String,
}

impl PackageKey {
    pub fn new(system: System, name: impl Into<String>) -> Self {
        Self {
            system,
            name: name.into(),
        }
    }
}

/// Identifies a single version of a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionKey {
    #[serde(default)]
    pub system: System,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl VersionKey {
    pub fn new(system: System, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            system,
            name: name.into(),
            version: version.into(),
        }
    }

    /// The package this version belongs to
    pub fn package_key(&self) -> PackageKey {
        PackageKey::new(self.system, self.name.clone())
    }
}

/// Request for a package and its available versions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPackageRequest {
    pub package_key: Option<PackageKey>,
}

impl GetPackageRequest {
    pub fn new(system: System, name: impl Into<String>) -> Self {
        Self {
            package_key: Some(PackageKey::new(system, name)),
        }
    }
}

impl From<PackageKey> for GetPackageRequest {
    fn from(package_key: PackageKey) -> Self {
        Self {
            package_key: Some(package_key),
        }
    }
}

/// Request for the details of a package version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVersionRequest {
    pub version_key: Option<VersionKey>,
}

impl GetVersionRequest {
    pub fn new(system: System, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            version_key: Some(VersionKey::new(system, name, version)),
        }
    }
}

impl From<VersionKey> for GetVersionRequest {
    fn from(version_key: VersionKey) -> Self {
        Self {
            version_key: Some(version_key),
        }
    }
}

/// Request for the declared requirements of a package version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRequirementsRequest {
    pub version_key: Option<VersionKey>,
}

impl GetRequirementsRequest {
    pub fn new(system: System, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            version_key: Some(VersionKey::new(system, name, version)),
        }
    }
}

impl From<VersionKey> for GetRequirementsRequest {
    fn from(version_key: VersionKey) -> Self {
        Self {
            version_key: Some(version_key),
        }
    }
}
