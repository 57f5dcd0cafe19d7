//! Per-table tuple storage, built on top of a [`TupleArena`].
//!
//! [`TableStore`] owns the arena and the cached [`TupleLayout`]; [`Table`]
//! wraps a store with the catalog-facing metadata (schema/name/columns/
//! indexes). Tables are shared via [`Rc<RefCell<_>>`] so that an undo entry
//! can keep a dropped table alive until the enclosing transaction commits
//! (see [`crate::undo`]).

use std::cell::RefCell;
use std::rc::Rc;

use crate::arena::{SlotId, TupleArena};
use crate::error::Result;
use crate::tuple::{decode_row, encode_row, TupleLayout};
use crate::types::{ColumnDef, Literal};

/// An index is catalog metadata only — it accelerates nothing and owns no
/// tuple memory.
#[derive(Clone, Debug, PartialEq)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
}

/// A shared handle to a table, suitable for holding across catalog
/// mutations (including ones an undo entry must survive past).
pub type TableHandle = Rc<RefCell<Table>>;

/// A table's row store: arena + cached encode/decode layout.
pub struct TableStore {
    arena: TupleArena,
    layout: TupleLayout,
}

impl TableStore {
    pub fn new(columns: &[ColumnDef]) -> Self {
        let layout = TupleLayout::new(columns);
        Self { arena: TupleArena::new(layout.tuple_size()), layout }
    }

    pub fn tuple_size(&self) -> usize {
        self.layout.tuple_size()
    }

    /// Inserts one row, in schema order. Returns the slot the row landed
    /// in, which the caller uses to build an `Insert` undo entry.
    pub fn insert(&mut self, columns: &[ColumnDef], values: &[Literal]) -> Result<SlotId> {
        let slot_id = self.arena.pop_free()?;
        self.arena.add_head(slot_id);
        encode_row(self.arena.slot_mut(slot_id), &self.layout, columns, values);
        Ok(slot_id)
    }

    /// Removes a slot from the live list and returns it to the free list.
    /// Payload bytes are left untouched.
    pub fn delete(&mut self, slot_id: SlotId) {
        self.arena.del(slot_id);
        self.arena.push_free(slot_id);
    }

    /// Re-links a slot (already off the free list, e.g. popped via
    /// [`Self::take_from_free`]) at the head of the live list. Used to
    /// undo a delete.
    pub fn recover(&mut self, slot_id: SlotId) {
        self.arena.add_head(slot_id);
    }

    /// Removes `slot_id` from the free list without touching the data
    /// list, so the undo log can move it straight to the data list
    /// without ever having it live in both.
    pub fn take_from_free(&mut self, slot_id: SlotId) {
        self.arena.remove_from_free(slot_id);
    }

    /// Removes a slot from the live list and returns it to the free list,
    /// reversing an insert.
    pub fn remove(&mut self, slot_id: SlotId) {
        self.arena.del(slot_id);
        self.arena.push_free(slot_id);
    }

    /// Returns a slot to the free list directly (it is not currently on
    /// the live list). Used by commit to release a deferred-delete slot.
    pub fn free(&mut self, slot_id: SlotId) {
        self.arena.push_free(slot_id);
    }

    /// Copies out the full tuple payload (including the null bitmap, but
    /// excluding the reserved header) as a before-image for undo.
    pub fn snapshot_payload(&self, slot_id: SlotId) -> Vec<u8> {
        let header = crate::arena::TUPLE_HEADER_SIZE;
        self.arena.slot(slot_id)[header..].to_vec()
    }

    /// Restores a previously captured payload, per [`Self::snapshot_payload`].
    pub fn restore_payload(&mut self, slot_id: SlotId, payload: &[u8]) {
        let header = crate::arena::TUPLE_HEADER_SIZE;
        self.arena.slot_mut(slot_id)[header..].copy_from_slice(payload);
    }

    /// Overwrites the given columns (by position) in schema order.
    pub fn update(&mut self, columns: &[ColumnDef], slot_id: SlotId, assignments: &[(usize, Literal)]) {
        let slot = self.arena.slot_mut(slot_id);
        for (col, value) in assignments {
            crate::tuple::encode_column(slot, &self.layout, columns, *col, value);
        }
    }

    /// `seq_scan(None)` returns the head of the live list; otherwise the
    /// successor of `cursor`.
    pub fn seq_scan(&self, cursor: Option<SlotId>) -> Option<SlotId> {
        self.arena.seq_scan(cursor)
    }

    pub fn decode(&self, columns: &[ColumnDef], slot_id: SlotId) -> Vec<Literal> {
        decode_row(self.arena.slot(slot_id), &self.layout, columns)
    }

    pub fn group_count(&self) -> usize {
        self.arena.group_count()
    }

    pub fn free_len(&self) -> usize {
        self.arena.free_len()
    }

    pub fn data_len(&self) -> usize {
        self.arena.data_len()
    }
}

/// A table: schema-qualified name, ordered columns, indexes, and its store.
pub struct Table {
    schema: String,
    name: String,
    columns: Vec<ColumnDef>,
    indexes: Vec<Index>,
    store: TableStore,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        let store = TableStore::new(&columns);
        Self { schema: schema.into(), name: name.into(), columns, indexes: Vec::new(), store }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Finds an index by exact name match.
    pub fn get_index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|idx| idx.name == name)
    }

    pub fn add_index(&mut self, index: Index) {
        self.indexes.push(index);
    }

    pub fn remove_index(&mut self, name: &str) -> Option<Index> {
        let pos = self.indexes.iter().position(|idx| idx.name == name)?;
        Some(self.indexes.remove(pos))
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TableStore {
        &mut self.store
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::DataType;

    fn table() -> Table {
        Table::new(
            "db",
            "t",
            vec![ColumnDef::new("a", DataType::Int, None), ColumnDef::new("b", DataType::Varchar, Some(8))],
        )
    }

    #[test]
    fn insert_then_scan_in_head_first_order() {
        let mut t = table();
        t.store_mut().insert(t.columns.clone().as_slice(), &[Literal::Int(1), Literal::Str(b"hi".to_vec())]).unwrap();
        t.store_mut().insert(t.columns.clone().as_slice(), &[Literal::Int(2), Literal::Str(b"yo".to_vec())]).unwrap();

        let first = t.store().seq_scan(None).unwrap();
        let row = t.store().decode(t.columns(), first);
        assert_eq!(row[0], Literal::Int(2));

        let second = t.store().seq_scan(Some(first)).unwrap();
        let row = t.store().decode(t.columns(), second);
        assert_eq!(row[0], Literal::Int(1));

        assert!(t.store().seq_scan(Some(second)).is_none());
    }

    #[test]
    fn get_index_is_true_equality_not_inverted_strcmp() {
        let mut t = table();
        t.add_index(Index { name: "idx_a".into(), columns: vec!["a".into()] });
        t.add_index(Index { name: "idx_b".into(), columns: vec!["b".into()] });
        assert_eq!(t.get_index("idx_b").unwrap().name, "idx_b");
        assert!(t.get_index("missing").is_none());
    }
}
