//! Supertype resolution over the classes visible to one pass.

use std::collections::{BTreeMap, BTreeSet};

use retain_model::ClassDecl;
use tracing::trace;

use crate::platform::platform_classes;

/// Supertype chains deeper than this are treated as non-matching.
pub const MAX_SUPERTYPE_DEPTH: usize = 64;

/// Answer to "does this class extend that one".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtype {
    Yes,
    No,
    /// No match was found, but the walk hit a class the pass cannot see yet.
    Unresolved,
}

/// Qualified name to declaration, for every class visible in a pass.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    classes: BTreeMap<String, ClassDecl>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hierarchy preloaded with the platform classes.
    pub fn with_platform() -> Self {
        let mut hierarchy = Self::new();
        hierarchy.extend(platform_classes());
        hierarchy
    }

    /// Adds or replaces a class.
    pub fn insert(&mut self, class: ClassDecl) {
        self.classes.insert(class.qualified_name.clone(), class);
    }

    pub fn get(&self, qualified_name: &str) -> Option<&ClassDecl> {
        self.classes.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.classes.contains_key(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.classes.values()
    }

    /// Tri-state subtype query.
    ///
    /// A class is a subtype of itself. A name missing from the hierarchy
    /// never matches, not even the target itself: it makes the answer
    /// unresolved unless another path matches. Cycles are cut by a visited
    /// set and the walk gives up past [`MAX_SUPERTYPE_DEPTH`].
    pub fn resolve_subtype(&self, class: &str, target: &str) -> Subtype {
        let mut visited = BTreeSet::new();
        let answer = self.walk(class, target, 0, &mut visited);
        trace!(class, target, ?answer, "resolved subtype");
        answer
    }

    /// Boolean form of [`resolve_subtype`](Self::resolve_subtype); unresolved is `false`.
    pub fn is_subtype_of(&self, class: &str, target: &str) -> bool {
        self.resolve_subtype(class, target) == Subtype::Yes
    }

    fn walk<'a>(
        &'a self,
        name: &'a str,
        target: &str,
        depth: usize,
        visited: &mut BTreeSet<&'a str>,
    ) -> Subtype {
        let Some(class) = self.classes.get(name) else {
            return Subtype::Unresolved;
        };
        if name == target {
            return Subtype::Yes;
        }
        if depth >= MAX_SUPERTYPE_DEPTH || !visited.insert(name) {
            return Subtype::No;
        }
        let mut unresolved = false;
        for supertype in &class.supertypes {
            match self.walk(supertype, target, depth + 1, visited) {
                Subtype::Yes => return Subtype::Yes,
                Subtype::Unresolved => unresolved = true,
                Subtype::No => {}
            }
        }
        if unresolved {
            Subtype::Unresolved
        } else {
            Subtype::No
        }
    }
}

impl Extend<ClassDecl> for TypeHierarchy {
    fn extend<T: IntoIterator<Item = ClassDecl>>(&mut self, iter: T) {
        for class in iter {
            self.insert(class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retain_model::names;

    #[test]
    fn platform_activity_chain() {
        let hierarchy = TypeHierarchy::with_platform();
        assert!(hierarchy.is_subtype_of(
            names::ANDROIDX_APPCOMPAT_ACTIVITY,
            names::ANDROIDX_COMPONENT_ACTIVITY
        ));
        assert!(hierarchy.is_subtype_of(names::ANDROID_BUNDLE, names::ANDROID_PARCELABLE));
        assert!(!hierarchy.is_subtype_of(names::ANDROIDX_FRAGMENT, names::ANDROID_ACTIVITY));
    }

    #[test]
    fn missing_supertype_is_unresolved() {
        let mut hierarchy = TypeHierarchy::with_platform();
        hierarchy.insert(ClassDecl::new("com.example.Main").with_supertype("dev.retain.StateSavingActivity"));
        assert_eq!(
            hierarchy.resolve_subtype("com.example.Main", "dev.retain.StateSavingFragment"),
            Subtype::Unresolved
        );
        assert_eq!(
            hierarchy.resolve_subtype("com.example.Main", "dev.retain.StateSavingActivity"),
            Subtype::Unresolved
        );

        hierarchy.insert(
            ClassDecl::new("dev.retain.StateSavingActivity")
                .with_supertype(names::ANDROIDX_APPCOMPAT_ACTIVITY),
        );
        assert_eq!(
            hierarchy.resolve_subtype("com.example.Main", "dev.retain.StateSavingActivity"),
            Subtype::Yes
        );
        assert_eq!(
            hierarchy.resolve_subtype("com.example.Main", "dev.retain.StateSavingFragment"),
            Subtype::No
        );
    }

    #[test]
    fn cycles_terminate() {
        let mut hierarchy = TypeHierarchy::new();
        hierarchy.insert(ClassDecl::new("a.A").with_supertype("a.B"));
        hierarchy.insert(ClassDecl::new("a.B").with_supertype("a.A"));
        assert_eq!(hierarchy.resolve_subtype("a.A", "a.C"), Subtype::No);
    }

    #[test]
    fn resolved_path_wins_over_unresolved_sibling() {
        let mut hierarchy = TypeHierarchy::with_platform();
        hierarchy.insert(
            ClassDecl::new("com.example.Main")
                .with_supertype("com.vendor.Listener")
                .with_supertype(names::ANDROIDX_APPCOMPAT_ACTIVITY),
        );
        assert_eq!(
            hierarchy.resolve_subtype("com.example.Main", names::ANDROID_ACTIVITY),
            Subtype::Yes
        );
    }
}
