// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Package and version payloads returned by the Insights API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PackageKey, VersionKey};

/// A package and the versions deps.dev knows about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(default)]
    pub package_key: PackageKey,
    #[serde(default)]
    pub versions: Vec<PackageVersion>,
}

impl Package {
    /// The version the registry marks as default (e.g. npm's `latest` tag)
    pub fn default_version(&self) -> Option<&PackageVersion> {
        self.versions.iter().find(|version| version.is_default)
    }

    /// Looks up a version entry by its version string
    pub fn version(&self, version: &str) -> Option<&PackageVersion> {
        self.versions
            .iter()
            .find(|entry| entry.version_key.version == version)
    }
}

/// Summary of a version as listed on its package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageVersion {
    #[serde(default)]
    pub version_key: VersionKey,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_default: bool,
}

/// Full details of a package version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(default)]
    pub version_key: VersionKey,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_deprecated: bool,
    /// SPDX expressions for the version's licenses
    #[serde(default)]
    pub licenses: Vec<String>,
    #[serde(default)]
    pub advisory_keys: Vec<AdvisoryKey>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub registries: Vec<String>,
    #[serde(default)]
    pub related_projects: Vec<RelatedProject>,
}

impl Version {
    /// Whether any security advisory affects this version
    pub fn has_advisories(&self) -> bool {
        !self.advisory_keys.is_empty()
    }
}

/// Identifier of a security advisory (OSV id)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryKey {
    pub id: String,
}

/// A labelled link attached to a version (homepage, issue tracker, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub url: String,
}

/// Identifier of a source project (e.g. `github.com/facebook/react`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKey {
    pub id: String,
}

/// A project related to a version, and how the relation was established
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedProject {
    #[serde(default)]
    pub project_key: ProjectKey,
    #[serde(default)]
    pub relation_provenance: String,
    #[serde(default)]
    pub relation_type: String,
}
