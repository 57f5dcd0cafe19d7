//! Tuple arena: bulk-allocated fixed-size slots with intrusive free/live lists.
//!
//! Each tuple's identity is an index into the arena's slot table rather
//! than a pointer, with the free and live ("data") lists kept as parallel
//! link arrays over that table — an `O(1)` `pop_free`/`push_free`/
//! `add_head`/`del` contract without ever touching raw memory. The arena
//! owns all slot storage; the lists are just views over it.

use crate::error::{EngineError, Result};

/// Number of slots allocated per [`TupleArena::grow`] call.
pub const TUPLE_GROUP_SIZE: usize = 100;

/// Reserved header bytes at the front of every tuple's on-disk layout.
///
/// The header is never interpreted by [`TupleArena`] — list membership
/// lives in [`TupleArena::links`], not in the tuple bytes — but the bytes
/// are still reserved so the on-disk tuple layout matches the declared
/// byte width.
pub const TUPLE_HEADER_SIZE: usize = 16;

/// Identity of one tuple slot, stable for the table's lifetime.
pub type SlotId = u32;

const NIL: SlotId = u32::MAX;

#[derive(Copy, Clone, Debug)]
struct Link {
    prev: SlotId,
    next: SlotId,
}

impl Default for Link {
    fn default() -> Self {
        Self { prev: NIL, next: NIL }
    }
}

/// One of the two intrusive lists a slot can belong to.
#[derive(Copy, Clone, Debug, Default)]
struct ListHead {
    head: SlotId,
    tail: SlotId,
    len: usize,
}

impl ListHead {
    fn empty() -> Self {
        Self { head: NIL, tail: NIL, len: 0 }
    }
}

/// A table-local arena of fixed-size tuple slots.
///
/// Every slot is in exactly one of the free list or the data (live) list
/// at all times. Groups of [`TUPLE_GROUP_SIZE`] slots are allocated on
/// demand and never freed until the arena itself is dropped.
pub struct TupleArena {
    tuple_size: usize,
    groups: Vec<Box<[u8]>>,
    links: Vec<Link>,
    free: ListHead,
    data: ListHead,
}

impl TupleArena {
    pub fn new(tuple_size: usize) -> Self {
        Self {
            tuple_size,
            groups: Vec::new(),
            links: Vec::new(),
            free: ListHead::empty(),
            data: ListHead::empty(),
        }
    }

    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn free_len(&self) -> usize {
        self.free.len
    }

    pub fn data_len(&self) -> usize {
        self.data.len
    }

    /// Read-only access to a slot's bytes. Reading a slot on the free list
    /// is a logic error upstream — its contents are undefined.
    pub fn slot(&self, id: SlotId) -> &[u8] {
        let (group, offset) = self.locate(id);
        &self.groups[group][offset..offset + self.tuple_size]
    }

    pub fn slot_mut(&mut self, id: SlotId) -> &mut [u8] {
        let (group, offset) = self.locate(id);
        &mut self.groups[group][offset..offset + self.tuple_size]
    }

    fn locate(&self, id: SlotId) -> (usize, usize) {
        let id = id as usize;
        (id / TUPLE_GROUP_SIZE, (id % TUPLE_GROUP_SIZE) * self.tuple_size)
    }

    /// Allocates a new group of [`TUPLE_GROUP_SIZE`] zero-initialized
    /// slots and pushes every slot onto the free list.
    fn grow(&mut self) -> Result<()> {
        let group_bytes = self
            .tuple_size
            .checked_mul(TUPLE_GROUP_SIZE)
            .ok_or(EngineError::AllocationFailure(TUPLE_GROUP_SIZE))?;

        let group = vec![0u8; group_bytes].into_boxed_slice();
        let base = self.groups.len() * TUPLE_GROUP_SIZE;
        self.groups.push(group);
        self.links.resize(base + TUPLE_GROUP_SIZE, Link::default());

        for i in 0..TUPLE_GROUP_SIZE {
            self.push_free(base as SlotId + i as SlotId);
        }

        Ok(())
    }

    /// Removes a slot from whichever list it is currently linked into.
    fn unlink(&mut self, list: &mut ListHead, id: SlotId) {
        let Link { prev, next } = self.links[id as usize];

        if prev == NIL {
            list.head = next;
        } else {
            self.links[prev as usize].next = next;
        }

        if next == NIL {
            list.tail = prev;
        } else {
            self.links[next as usize].prev = prev;
        }

        self.links[id as usize] = Link::default();
        list.len -= 1;
    }

    fn link_head(&mut self, list: &mut ListHead, id: SlotId) {
        let old_head = list.head;
        self.links[id as usize] = Link { prev: NIL, next: old_head };
        if old_head == NIL {
            list.tail = id;
        } else {
            self.links[old_head as usize].prev = id;
        }
        list.head = id;
        list.len += 1;
    }

    /// O(1): takes a slot off the free list, growing the arena first if
    /// it is empty. The slot's bytes are left as-is (zeroed if the slot
    /// came from a freshly grown group, stale otherwise).
    pub fn pop_free(&mut self) -> Result<SlotId> {
        if self.free.head == NIL {
            self.grow()?;
        }
        let id = self.free.head;
        let mut free = self.free;
        self.unlink(&mut free, id);
        self.free = free;
        Ok(id)
    }

    /// O(1): returns a slot to the free list, head-first.
    pub fn push_free(&mut self, id: SlotId) {
        let mut free = self.free;
        self.link_head(&mut free, id);
        self.free = free;
    }

    /// O(1): removes a slot from the free list without linking it anywhere
    /// else. Used when undoing a delete: the slot must leave the free list
    /// before [`Self::add_head`] puts it back on the data list, so it is
    /// never a member of both at once.
    pub fn remove_from_free(&mut self, id: SlotId) {
        let mut free = self.free;
        self.unlink(&mut free, id);
        self.free = free;
    }

    /// O(1): links a slot at the head of the live (data) list.
    pub fn add_head(&mut self, id: SlotId) {
        let mut data = self.data;
        self.link_head(&mut data, id);
        self.data = data;
    }

    /// O(1): removes a slot from the live (data) list by identity.
    pub fn del(&mut self, id: SlotId) {
        let mut data = self.data;
        self.unlink(&mut data, id);
        self.data = data;
    }

    /// Returns the head of the live list, or `None` if the cursor was the
    /// last tuple (or the list is empty).
    pub fn seq_scan(&self, cursor: Option<SlotId>) -> Option<SlotId> {
        match cursor {
            None => (self.data.head != NIL).then_some(self.data.head),
            Some(id) => {
                let next = self.links[id as usize].next;
                (next != NIL).then_some(next)
            }
        }
    }
}
