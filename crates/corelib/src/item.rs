//! Item model shared across networks.
//!
//! Items move between members as whole stacks. A stack merges into another
//! only when both carry the same kind, and each kind brings its own per-slot
//! stack limit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Item type identity plus its per-slot stack limit.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ItemKind {
    name: String,
    max_stack: u32,
}

impl ItemKind {
    /// Create a kind. Stack limits below 1 are clamped to 1.
    pub fn new(name: impl Into<String>, max_stack: u32) -> Self {
        Self {
            name: name.into(),
            max_stack: max_stack.max(1),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum count a single slot of this kind can hold.
    #[inline]
    pub fn max_stack(&self) -> u32 {
        self.max_stack
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A quantity of one item kind.
///
/// `count == 0` is the canonical empty stack; distribution returns batches
/// in this state when everything was placed.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ItemStack {
    kind: ItemKind,
    count: u32,
}

impl ItemStack {
    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self { kind, count }
    }

    #[inline]
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True if `other` may merge into this stack (same kind).
    #[inline]
    pub fn can_merge(&self, other: &ItemStack) -> bool {
        self.kind == other.kind
    }

    /// Room left before this stack hits its kind's limit.
    #[inline]
    pub fn space_left(&self) -> u32 {
        self.kind.max_stack().saturating_sub(self.count)
    }

    /// Grow the stack by `amount` (saturating at the integer limit; callers
    /// bound the amount by `space_left`).
    pub fn add(&mut self, amount: u32) {
        self.count = self.count.saturating_add(amount);
    }

    /// Shrink the stack by up to `amount`; returns what was removed.
    pub fn remove(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.count);
        self.count -= taken;
        taken
    }

    /// Same kind, zero count.
    pub fn emptied(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            count: 0,
        }
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.count, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pebbles() -> ItemKind {
        ItemKind::new("pebble", 16)
    }

    #[test]
    fn test_kind_clamps_zero_limit() {
        assert_eq!(ItemKind::new("odd", 0).max_stack(), 1);
    }

    #[test]
    fn test_stack_space_left() {
        let stack = ItemStack::new(pebbles(), 10);
        assert_eq!(stack.space_left(), 6);
        assert!(!stack.is_empty());
    }

    #[test]
    fn test_stack_add_remove() {
        let mut stack = ItemStack::new(pebbles(), 3);
        stack.add(5);
        assert_eq!(stack.count(), 8);
        assert_eq!(stack.remove(20), 8);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_merge_requires_same_kind() {
        let a = ItemStack::new(pebbles(), 1);
        let b = ItemStack::new(ItemKind::new("shard", 16), 1);
        assert!(!a.can_merge(&b));
        assert!(a.can_merge(&a.emptied()));
    }
}
