//! Dependency markers linking library builds to the application build.
//!
//! A library build does not generate a saver. It leaves a marker naming the
//! packages that hold its components; the application build reads the
//! markers on its first pass and pulls the `@Retain` properties of those
//! packages into its own saver.

use std::collections::BTreeSet;

use retain_model::{
    AnnotatedSymbol, ClassDecl, ComponentDeclarations, DependencyMarker, MarkerPlan,
    ProcessorOptions,
};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::hierarchy::TypeHierarchy;

pub const MARKER_PREFIX: &str = "retain_";
const HASH_LENGTH: usize = 7;

/// Package name as it appears in a marker constant.
pub fn underscored(package: &str) -> String {
    package.replace('.', "_")
}

/// Last seven hex digits of the SHA-256 of the joined package list.
pub fn marker_hash(packages: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(packages.join("_").as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[digest.len() - HASH_LENGTH..].to_string()
}

/// Marker for the packages of `accepted` not already declared elsewhere.
///
/// `declared` holds dotted packages named by visible markers and `taken` the
/// marker names already in use. Returns `None` when there is nothing new.
pub fn build_marker(
    accepted: &[ComponentDeclarations],
    declared: &BTreeSet<String>,
    taken: &BTreeSet<String>,
    options: &ProcessorOptions,
) -> Option<MarkerPlan> {
    let packages: BTreeSet<String> = accepted
        .iter()
        .map(|group| group.component.package_name().to_string())
        .filter(|package| !declared.contains(package))
        .collect();
    if packages.is_empty() {
        debug!("no new packages for a dependency marker");
        return None;
    }
    let packages: Vec<String> = packages.iter().map(|package| underscored(package)).collect();
    let mut file_property = format!("{MARKER_PREFIX}{}", marker_hash(&packages));
    while taken.contains(&file_property) {
        file_property.push('1');
    }
    info!(%file_property, packages = packages.len(), "planned dependency marker");
    Some(MarkerPlan {
        package: options.dependency_package(),
        marker: DependencyMarker {
            file_property,
            packages,
        },
    })
}

/// `@Retain` sites of classes living in packages named by `markers`.
pub fn marker_symbols(markers: &[DependencyMarker], hierarchy: &TypeHierarchy) -> Vec<AnnotatedSymbol> {
    let packages: BTreeSet<String> = markers
        .iter()
        .flat_map(DependencyMarker::dotted_packages)
        .collect();
    if packages.is_empty() {
        return Vec::new();
    }
    let symbols: Vec<_> = hierarchy
        .classes()
        .filter(|class| packages.contains(class.package_name()))
        .flat_map(ClassDecl::retained_symbols)
        .collect();
    debug!(
        packages = packages.len(),
        symbols = symbols.len(),
        "collected symbols from dependency markers"
    );
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use retain_model::{Component, ComponentKind, PropertyDecl, RetentionPolicy, TypeRef};

    fn accepted(components: &[&str]) -> Vec<ComponentDeclarations> {
        components
            .iter()
            .map(|name| ComponentDeclarations {
                component: Component::new(*name, ComponentKind::SingleInstance),
                declarations: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn hash_is_seven_hex_digits() {
        let hash = marker_hash(&["com_example_lib".to_string()]);
        assert_eq!(hash.len(), 7);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, marker_hash(&["com_example_lib".to_string()]));
    }

    #[test]
    fn marker_skips_declared_packages() {
        let options = ProcessorOptions::default();
        let declared = BTreeSet::from(["com.example.old".to_string()]);
        let plan = build_marker(
            &accepted(&["com.example.lib.Main", "com.example.old.Legacy", "com.example.lib.Other"]),
            &declared,
            &BTreeSet::new(),
            &options,
        )
        .unwrap();
        assert_eq!(plan.package, "dev.retain.dependencies");
        assert_eq!(plan.marker.packages, ["com_example_lib"]);
        assert!(plan.marker.file_property.starts_with(MARKER_PREFIX));
    }

    #[test]
    fn taken_names_get_suffixes() {
        let options = ProcessorOptions::default();
        let first = build_marker(&accepted(&["a.b.C"]), &BTreeSet::new(), &BTreeSet::new(), &options)
            .unwrap();
        let taken = BTreeSet::from([first.marker.file_property.clone()]);
        let second = build_marker(&accepted(&["a.b.C"]), &BTreeSet::new(), &taken, &options).unwrap();
        assert_eq!(second.marker.file_property, format!("{}1", first.marker.file_property));
    }

    #[test]
    fn nothing_new_means_no_marker() {
        let declared = BTreeSet::from(["a.b".to_string()]);
        let plan = build_marker(
            &accepted(&["a.b.C"]),
            &declared,
            &BTreeSet::new(),
            &ProcessorOptions::default(),
        );
        assert!(plan.is_none());
    }

    #[test]
    fn marker_packages_contribute_symbols() {
        let mut hierarchy = TypeHierarchy::with_platform();
        hierarchy.insert(
            ClassDecl::new("com.example.lib.Screen").with_property(
                PropertyDecl::new("page", TypeRef::new("kotlin.Int"))
                    .retained([RetentionPolicy::ProcessDeath]),
            ),
        );
        hierarchy.insert(
            ClassDecl::new("com.other.Screen").with_property(
                PropertyDecl::new("page", TypeRef::new("kotlin.Int"))
                    .retained([RetentionPolicy::ProcessDeath]),
            ),
        );
        let markers = [DependencyMarker {
            file_property: "retain_abc1234".to_string(),
            packages: vec!["com_example_lib".to_string()],
        }];
        let symbols = marker_symbols(&markers, &hierarchy);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].display_name(), "com.example.lib.Screen#page");
    }
}
