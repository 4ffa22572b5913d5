//! Bundle key constants.

use std::collections::BTreeSet;

use retain_model::{BundleKey, ComponentHolder, InstanceKeys};

/// Hands out key constants with unique names, in allocation order.
#[derive(Debug, Default)]
pub(crate) struct KeyAllocator {
    names: BTreeSet<String>,
    keys: Vec<BundleKey>,
}

impl KeyAllocator {
    /// Key of one process-death property. The value is package-qualified.
    pub(crate) fn property(&mut self, holder: &ComponentHolder, property: &str) -> BundleKey {
        self.allocate(
            format!("k_{}_{property}", holder.key_base()),
            format!("{}#{property}", holder.component),
        )
    }

    /// Per-instance keys of a repeatable component.
    pub(crate) fn instance(&mut self, holder: &ComponentHolder) -> InstanceKeys {
        let base = holder.key_base();
        let component = &holder.component;
        InstanceKeys {
            tag_prefix: self.allocate(format!("kt_{base}"), format!("{component}@tag:")),
            id_prefix: self.allocate(format!("ki_{base}"), format!("{component}@id:")),
            class: self.allocate(format!("kl_{base}"), format!("{component}@class")),
        }
    }

    fn allocate(&mut self, name: String, value: String) -> BundleKey {
        let mut unique = name.clone();
        let mut counter = 2;
        while !self.names.insert(unique.clone()) {
            unique = format!("{name}_{counter}");
            counter += 1;
        }
        let key = BundleKey {
            name: unique,
            value,
        };
        self.keys.push(key.clone());
        key
    }

    pub(crate) fn into_keys(self) -> Vec<BundleKey> {
        self.keys
    }
}
