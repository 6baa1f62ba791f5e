// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Declared requirements of a package version
//!
//! The shape of requirements is ecosystem specific. npm and NuGet are typed;
//! Maven's resolved POM and any ecosystem added later are kept as raw JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Requirements declared by a package version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm: Option<NpmRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nuget: Option<NugetRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maven: Option<serde_json::Value>,
    /// Requirements for ecosystems without a typed representation
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Requirements {
    /// Whether no ecosystem reported any requirements
    pub fn is_empty(&self) -> bool {
        self.npm.is_none() && self.nuget.is_none() && self.maven.is_none() && self.other.is_empty()
    }
}

/// npm `package.json` dependency sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpmRequirements {
    #[serde(default)]
    pub dependencies: NpmDependencies,
    /// Packages shipped inside the tarball
    #[serde(default)]
    pub bundled: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpmDependencies {
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub dev_dependencies: Vec<Dependency>,
    #[serde(default)]
    pub optional_dependencies: Vec<Dependency>,
    #[serde(default)]
    pub peer_dependencies: Vec<Dependency>,
    #[serde(default)]
    pub bundle_dependencies: Vec<String>,
}

impl NpmDependencies {
    /// Every declared dependency across all sections
    pub fn all(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies
            .iter()
            .chain(&self.dev_dependencies)
            .chain(&self.optional_dependencies)
            .chain(&self.peer_dependencies)
    }
}

/// A dependency name paired with its version requirement
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub name: String,
    #[serde(default)]
    pub requirement: String,
}

/// NuGet dependency groups, one per target framework
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NugetRequirements {
    #[serde(default)]
    pub dependency_groups: Vec<NugetDependencyGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NugetDependencyGroup {
    #[serde(default)]
    pub target_framework: String,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}
