//! Address-indexed user command table
//!
//! A sparse `Vec` of optional handlers. Slots are never removed; when an
//! address past the end is registered the table grows to
//! `address + growth` slots so clustered registrations do not reallocate
//! one at a time.

use super::{BoxedHandler, CommandHandler};
use crate::codec::Address;
use crate::constants::{COMMAND_TABLE_GROWTH, INITIAL_COMMAND_SLOTS};

pub struct CommandTable {
    slots: Vec<Option<BoxedHandler>>,
    growth: usize,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        Self::with_slots(INITIAL_COMMAND_SLOTS, COMMAND_TABLE_GROWTH)
    }

    /// Create a table with `slots` empty entries and the given growth margin
    pub fn with_slots(slots: usize, growth: usize) -> Self {
        let mut table = Self {
            slots: Vec::new(),
            growth,
        };
        table.slots.resize_with(slots, || None);
        table
    }

    /// Register (or overwrite) the handler at `address`
    ///
    /// The table is dense, so registering past the end allocates up to
    /// `address + growth` slots. Memory and time grow linearly with the
    /// highest registered address; keep command addresses small.
    pub fn register(&mut self, address: Address, handler: impl CommandHandler + 'static) {
        let index = address as usize;
        if index >= self.slots.len() {
            let new_len = index + self.growth.max(1);
            self.slots.resize_with(new_len, || None);
        }
        self.slots[index] = Some(Box::new(handler));
    }

    /// Handler registered at `address`, if any
    pub fn get_mut(&mut self, address: Address) -> Option<&mut BoxedHandler> {
        self.slots
            .get_mut(address as usize)
            .and_then(|slot| slot.as_mut())
    }

    /// True when `address` has a handler
    pub fn contains(&self, address: Address) -> bool {
        matches!(self.slots.get(address as usize), Some(Some(_)))
    }

    /// Number of slots (registered or empty)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recorder(log: &Arc<Mutex<Vec<(Address, Vec<u8>)>>>, tag: u8) -> impl CommandHandler {
        let log = log.clone();
        move |address: Address, payload: &[u8]| {
            let mut entry = vec![tag];
            entry.extend_from_slice(payload);
            log.lock().push((address, entry));
        }
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = CommandTable::new();
        assert_eq!(table.capacity(), INITIAL_COMMAND_SLOTS);
        assert!(table.is_empty());
        assert!(!table.contains(0));
    }

    #[test]
    fn test_register_within_capacity() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut table = CommandTable::new();
        table.register(3, recorder(&log, 0));

        assert_eq!(table.capacity(), INITIAL_COMMAND_SLOTS);
        assert!(table.contains(3));
        table.get_mut(3).unwrap().handle(3, &[1]);
        assert_eq!(log.lock()[0], (3, vec![0, 1]));
    }

    #[test]
    fn test_register_grows_table() {
        let mut table = CommandTable::new();
        table.register(42, |_: Address, _: &[u8]| {});

        assert_eq!(table.capacity(), 42 + COMMAND_TABLE_GROWTH);
        assert!(table.contains(42));
        assert!(!table.contains(43));
    }

    #[test]
    fn test_growth_preserves_existing_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut table = CommandTable::new();
        table.register(1, recorder(&log, 1));
        table.register(7, recorder(&log, 7));
        table.register(100, recorder(&log, 100));

        assert!(table.capacity() >= 101);
        assert_eq!(table.len(), 3);

        table.get_mut(1).unwrap().handle(1, &[]);
        table.get_mut(7).unwrap().handle(7, &[]);
        table.get_mut(100).unwrap().handle(100, &[]);
        assert_eq!(
            *log.lock(),
            vec![(1, vec![1]), (7, vec![7]), (100, vec![100])]
        );
    }

    #[test]
    fn test_register_overwrites() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut table = CommandTable::new();
        table.register(2, recorder(&log, 1));
        table.register(2, recorder(&log, 2));

        assert_eq!(table.len(), 1);
        table.get_mut(2).unwrap().handle(2, &[]);
        assert_eq!(log.lock()[0].1, vec![2]);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let mut table = CommandTable::new();
        assert!(table.get_mut(Address::MAX).is_none());
    }

    #[test]
    fn test_register_at_capacity_boundary() {
        let mut table = CommandTable::new();
        table.register(INITIAL_COMMAND_SLOTS as Address, |_: Address, _: &[u8]| {});
        assert_eq!(
            table.capacity(),
            INITIAL_COMMAND_SLOTS + COMMAND_TABLE_GROWTH
        );
    }

    #[test]
    fn test_capacity_follows_highest_address() {
        let mut table = CommandTable::new();
        table.register(1000, |_: Address, _: &[u8]| {});
        assert_eq!(table.capacity(), 1000 + COMMAND_TABLE_GROWTH);

        // Lower addresses reuse existing slots
        table.register(10, |_: Address, _: &[u8]| {});
        table.register(999, |_: Address, _: &[u8]| {});
        assert_eq!(table.capacity(), 1000 + COMMAND_TABLE_GROWTH);
        assert_eq!(table.len(), 3);
    }
}
