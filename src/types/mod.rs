// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Data model of the deps.dev Insights API.
//!
//! This module provides serde models for:
//! - Ecosystems ([`System`]) and resource identifiers
//! - Request objects for each cached operation
//! - Package, version and requirements payloads

mod package;
mod request;
mod requirements;
mod system;

pub use package::{AdvisoryKey, Link, Package, PackageVersion, ProjectKey, RelatedProject, Version};
pub use request::{
    GetPackageRequest, GetRequirementsRequest, GetVersionRequest, PackageKey, VersionKey,
};
pub use requirements::{
    Dependency, NpmDependencies, NpmRequirements, NugetDependencyGroup, NugetRequirements,
    Requirements,
};
pub use system::System;
