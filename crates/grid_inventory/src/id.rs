//! Opaque identifiers for inventories and item instances

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INVENTORY_ID: IdGenerator = IdGenerator::new();
static NEXT_INSTANCE_ID: IdGenerator = IdGenerator::new();

/// Thread-safe ID generator
struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Identifies one inventory.
///
/// Slots hold this as their owner back-reference. It is never used to reach
/// the inventory itself, only to compare ownership.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InventoryId(u64);

impl InventoryId {
    /// Allocate a fresh inventory ID
    pub fn next() -> Self {
        Self(NEXT_INVENTORY_ID.next())
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for InventoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InventoryId({})", self.0)
    }
}

/// Identifies one item instance, and therefore the slot that holds it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocate a fresh instance ID
    pub fn next() -> Self {
        Self(NEXT_INSTANCE_ID.next())
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
