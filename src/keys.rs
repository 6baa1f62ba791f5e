// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical cache keys derived from Insights requests
//!
//! Derivation is total: a request without an identifier maps to the key of the
//! default identifier, exactly like reading an unset protobuf sub-message.
//! Keys compare field by field, so two requests naming the same resource collapse
//! to one cache entry no matter which request object they came from. Names and
//! versions are taken verbatim; no case folding or other normalization happens.

use std::fmt;

use crate::types::{
    GetPackageRequest, GetRequirementsRequest, GetVersionRequest, PackageKey, System, VersionKey,
};

/// Cache key for package lookups
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageCacheKey {
    pub system: System,
    pub name: String,
}

impl From<&PackageKey> for PackageCacheKey {
    fn from(key: &PackageKey) -> Self {
        Self {
            system: key.system,
            name: key.name.clone(),
        }
    }
}

impl From<&GetPackageRequest> for PackageCacheKey {
    fn from(request: &GetPackageRequest) -> Self {
        request
            .package_key
            .as_ref()
            .map(PackageCacheKey::from)
            .unwrap_or_default()
    }
}

impl fmt::Display for PackageCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.system.as_path_segment(), self.name)
    }
}

/// Cache key for version and requirements lookups
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionCacheKey {
    pub system: System,
    pub name: String,
    pub version: String,
}

impl From<&VersionKey> for VersionCacheKey {
    fn from(key: &VersionKey) -> Self {
        Self {
            system: key.system,
            name: key.name.clone(),
            version: key.version.clone(),
        }
    }
}

impl From<Option<&VersionKey>> for VersionCacheKey {
    fn from(key: Option<&VersionKey>) -> Self {
        key.map(VersionCacheKey::from).unwrap_or_default()
    }
}

impl From<&GetVersionRequest> for VersionCacheKey {
    fn from(request: &GetVersionRequest) -> Self {
        Self::from(request.version_key.as_ref())
    }
}

impl From<&GetRequirementsRequest> for VersionCacheKey {
    fn from(request: &GetRequirementsRequest) -> Self {
        Self::from(request.version_key.as_ref())
    }
}

impl fmt::Display for VersionCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}",
            self.system.as_path_segment(),
            self.name,
            self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn arb_system() -> impl Strategy<Value = System> {
        prop_oneof![
            Just(System::Unspecified),
            Just(System::Go),
            Just(System::Rubygems),
            Just(System::Npm),
            Just(System::Cargo),
            Just(System::Maven),
            Just(System::Pypi),
            Just(System::Nuget),
        ]
    }

    #[test]
    fn test_identical_requests_share_a_key() {
        let first = GetPackageRequest::new(System::Npm, "react");
        let second = GetPackageRequest::from(PackageKey::new(System::Npm, "react".to_string()));

        assert_eq!(PackageCacheKey::from(&first), PackageCacheKey::from(&second));
    }

    #[test]
    fn test_version_and_requirements_requests_share_a_key() {
        let version = GetVersionRequest::new(System::Cargo, "serde", "1.0.200");
        let requirements = GetRequirementsRequest::new(System::Cargo, "serde", "1.0.200");

        assert_eq!(
            VersionCacheKey::from(&version),
            VersionCacheKey::from(&requirements)
        );
    }

    #[test]
    fn test_any_field_difference_changes_the_key() {
        let base = VersionCacheKey::from(&VersionKey::new(System::Npm, "react", "18.2.0"));
        let others = [
            VersionKey::new(System::Pypi, "react", "18.2.0"),
            VersionKey::new(System::Npm, "React", "18.2.0"),
            VersionKey::new(System::Npm, "react", "18.2.1"),
        ];

        for other in &others {
            assert_ne!(base, VersionCacheKey::from(other), "{other:?} must not collide");
        }
    }

    #[test]
    fn test_missing_identifier_derives_default_key() {
        assert_eq!(
            PackageCacheKey::from(&GetPackageRequest::default()),
            PackageCacheKey::default()
        );
        assert_eq!(
            VersionCacheKey::from(&GetVersionRequest::default()),
            VersionCacheKey::from(&GetVersionRequest::from(VersionKey::default()))
        );
    }

    #[test]
    fn test_separator_characters_do_not_collide() {
        // "a/b" + "c" and "a" + "b/c" render alike but are distinct keys
        let first = VersionCacheKey::from(&VersionKey::new(System::Go, "a/b", "c"));
        let second = VersionCacheKey::from(&VersionKey::new(System::Go, "a", "b/c"));

        let keys: HashSet<_> = [first, second].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_display() {
        let key = VersionCacheKey::from(&VersionKey::new(System::Npm, "@types/node", "20.0.0"));
        assert_eq!(key.to_string(), "npm/@types/node@20.0.0");

        let key = PackageCacheKey::from(&PackageKey::new(System::Pypi, "requests"));
        assert_eq!(key.to_string(), "pypi/requests");
    }

    proptest! {
        /// Property: keys are equal exactly when every identifying field is equal
        #[test]
        fn prop_version_key_equality_matches_fields(
            system_a in arb_system(),
            system_b in arb_system(),
            name_a in "[a-z@/._-]{0,8}",
            name_b in "[a-z@/._-]{0,8}",
            version_a in "[0-9.]{0,6}",
            version_b in "[0-9.]{0,6}",
        ) {
            let a = VersionCacheKey::from(&GetVersionRequest::new(system_a, name_a.clone(), version_a.clone()));
            let b = VersionCacheKey::from(&GetRequirementsRequest::new(system_b, name_b.clone(), version_b.clone()));

            let same_fields = system_a == system_b && name_a == name_b && version_a == version_b;
            prop_assert_eq!(a == b, same_fields);
        }

        /// Property: derivation is deterministic for independently built requests
        #[test]
        fn prop_package_key_is_deterministic(
            system in arb_system(),
            name in ".{0,16}",
        ) {
            let a = PackageCacheKey::from(&GetPackageRequest::new(system, name.clone()));
            let b = PackageCacheKey::from(&PackageKey::new(system, name));
            prop_assert_eq!(a, b);
        }
    }
}
