use std::collections::{BTreeMap, BTreeSet};
use crate::core::Handle;
use crate::error::BridgeError;
use crate::Result;

/// Maps handles of one kind to the objects they refer to.
///
/// Handles come from a monotonically increasing counter starting at 0 and are
/// never issued twice, even after the object they referred to is released.
/// Every lookup is checked, so stale or forged handles resolve to "not found".
#[derive(Debug)]
pub struct HandleTable<H: Handle, T> {
    items: BTreeMap<H, T>,
    /// Handles allocated but not yet bound to an object
    pending: BTreeSet<H>,
    next_index: u32,
}

impl<H: Handle, T> HandleTable<H, T> {
    /// Creates a new empty table
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            pending: BTreeSet::new(),
            next_index: 0,
        }
    }

    /// Reserves a fresh handle. The handle resolves only after `bind`.
    pub fn allocate(&mut self) -> Result<H> {
        // Raw handles are i32 on the foreign side
        if self.next_index > i32::MAX as u32 {
            return Err(BridgeError::HandlesExhausted(H::KIND));
        }
        let handle = H::from_index(self.next_index);
        self.next_index += 1;
        self.pending.insert(handle);
        Ok(handle)
    }

    /// Associates an object with a handle previously returned by `allocate`
    pub fn bind(&mut self, handle: H, item: T) -> Result<()> {
        if !self.pending.remove(&handle) {
            return Err(BridgeError::InvalidHandle {
                kind: H::KIND,
                raw: handle.index() as i64,
            });
        }
        self.items.insert(handle, item);
        Ok(())
    }

    /// Allocates a handle and binds the item to it in one go
    pub fn insert(&mut self, item: T) -> Result<H> {
        let handle = self.allocate()?;
        self.bind(handle, item)?;
        Ok(handle)
    }

    /// Gives back a handle that was allocated but never bound.
    /// The index stays consumed.
    pub fn abandon(&mut self, handle: H) -> bool {
        self.pending.remove(&handle)
    }

    /// Gets a reference to an item by its handle
    pub fn get(&self, handle: H) -> Option<&T> {
        self.items.get(&handle)
    }

    /// Gets a mutable reference to an item by its handle
    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.items.get_mut(&handle)
    }

    /// Gets an item by its handle, returning the kind's not-found error on a miss
    pub fn lookup(&self, handle: H) -> Result<&T> {
        self.items.get(&handle).ok_or_else(|| handle.not_found())
    }

    /// Mutable variant of `lookup`
    pub fn lookup_mut(&mut self, handle: H) -> Result<&mut T> {
        self.items.get_mut(&handle).ok_or_else(|| handle.not_found())
    }

    /// Removes the mapping and returns the item it pointed to
    pub fn release(&mut self, handle: H) -> Result<T> {
        self.items.remove(&handle).ok_or_else(|| handle.not_found())
    }

    /// Returns whether the handle currently resolves
    pub fn contains(&self, handle: H) -> bool {
        self.items.contains_key(&handle)
    }

    /// Returns the number of live items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether no item is live
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the index the next allocation will use
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Returns all live handles in ascending order
    pub fn handles(&self) -> Vec<H> {
        self.items.keys().copied().collect()
    }

    /// Returns the live handles whose item matches the predicate
    pub fn handles_where<F>(&self, mut predicate: F) -> Vec<H>
    where
        F: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .filter(|(_, item)| predicate(item))
            .map(|(h, _)| *h)
            .collect()
    }

    /// Iterates over all live items in ascending handle order
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.items.iter().map(|(h, item)| (*h, item))
    }
}

impl<H: Handle, T> Default for HandleTable<H, T> {
    fn default() -> Self {
        Self::new()
    }
}
