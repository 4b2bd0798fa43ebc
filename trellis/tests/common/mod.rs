#![allow(dead_code)]

use std::sync::Once;
use trellis::{Candidate, MethodSet, Registry, RegistryOptions};

// ============================================================================
// Logging
// ============================================================================

static INIT: Once = Once::new();

/// Install a test subscriber once per binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Handler Shapes
// ============================================================================

pub type Nullary = fn() -> &'static str;
pub type Unary = fn(&str) -> String;
pub type Lookup = fn(&Inventory, &str) -> Option<u32>;

pub fn ping() -> &'static str {
    "pong"
}

pub fn shout(input: &str) -> String {
    input.to_uppercase()
}

pub struct Inventory {
    pub items: Vec<(&'static str, u32)>,
}

impl Inventory {
    pub fn count(&self, name: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|(item, _)| *item == name)
            .map(|(_, count)| *count)
    }

    pub fn total(&self, _: &str) -> Option<u32> {
        Some(self.items.iter().map(|(_, count)| count).sum())
    }
}

pub fn inventory_methods() -> MethodSet<Inventory> {
    MethodSet::new(Inventory {
        items: vec![("apple", 3), ("pear", 5)],
    })
    .method("Count", Inventory::count as Lookup)
    .method("Total", Inventory::total as Lookup)
}

// ============================================================================
// Helpers
// ============================================================================

pub fn handles<H: Copy>(found: &[Candidate<'_, H>]) -> Vec<H> {
    found.iter().map(|c| *c.handle()).collect()
}

pub fn registry() -> Registry {
    init_tracing();
    Registry::new(RegistryOptions::new())
}
