//! Undo log: a stack of tagged entries recording how to reverse (on
//! rollback) or finalize (on commit) each write made inside a transaction.
//!
//! An undo entry owns (or shares, via [`TableHandle`]) whatever data it
//! needs to reverse its write; "freeing on commit" becomes dropping that
//! owned data, and the arena-level bookkeeping that still has real commit
//! vs. rollback behavior (a deleted slot's free-list membership) is done
//! explicitly below.

use crate::catalog::Catalog;
use crate::table::{Index, TableHandle};
use crate::types::Literal;

/// One undo entry. Variant names mirror the write that produced them.
pub enum UndoEntry {
    Insert { table: TableHandle, slot: u32 },
    Delete { table: TableHandle, slot: u32, before: Vec<u8> },
    Update { table: TableHandle, slot: u32, before: Vec<u8> },
    CreateTable { schema: String, name: String },
    CreateIndex { schema: String, name: String, index_name: String },
    DropSchema { tables: Vec<TableHandle> },
    DropTable { table: TableHandle },
    DropIndex { schema: String, name: String, index: Index },
}

/// Transaction state: whether one is open, and the stack of writes made
/// inside it so far.
#[derive(Default)]
pub struct Transaction {
    in_transaction: bool,
    stack: Vec<UndoEntry>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub fn begin(&mut self) {
        self.in_transaction = true;
    }

    pub fn push(&mut self, entry: UndoEntry) {
        if self.in_transaction {
            self.stack.push(entry);
        }
    }

    /// Reverses every write made since the transaction began, in reverse
    /// order, and closes the transaction.
    pub fn rollback(&mut self, catalog: &mut Catalog) {
        while let Some(entry) = self.stack.pop() {
            match entry {
                UndoEntry::Insert { table, slot } => {
                    table.borrow_mut().store_mut().remove(slot);
                }
                UndoEntry::Delete { table, slot, before } => {
                    // Take the slot off the free list before it rejoins
                    // the data list, so it is never a member of both.
                    let mut t = table.borrow_mut();
                    t.store_mut().take_from_free(slot);
                    t.store_mut().restore_payload(slot, &before);
                    t.store_mut().recover(slot);
                }
                UndoEntry::Update { table, slot, before } => {
                    table.borrow_mut().store_mut().restore_payload(slot, &before);
                }
                UndoEntry::CreateTable { schema, name } => {
                    let _ = catalog.drop_table(&schema, &name);
                }
                UndoEntry::CreateIndex { schema, name, index_name } => {
                    let _ = catalog.drop_index(&schema, &name, &index_name);
                }
                UndoEntry::DropSchema { tables } => {
                    for table in tables {
                        catalog.reinsert_table(table);
                    }
                }
                UndoEntry::DropTable { table } => {
                    catalog.reinsert_table(table);
                }
                UndoEntry::DropIndex { schema, name, index } => {
                    if let Some(table) = catalog.get_table(&schema, &name) {
                        table.borrow_mut().add_index(index);
                    }
                }
            }
        }
        self.in_transaction = false;
    }

    /// Finalizes every write made since the transaction began and closes
    /// the transaction. Entries whose "commit action" is simply dropping
    /// owned data need no explicit handling here — their `Drop` glue runs
    /// when `self.stack` is cleared.
    pub fn commit(&mut self) {
        for entry in self.stack.drain(..) {
            if let UndoEntry::Delete { table, slot, .. } = entry {
                // `delete` already moved the slot onto the free list; a
                // delete's commit action is final, not a second free.
                let _ = (table, slot);
            }
        }
        self.in_transaction = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{ColumnDef, DataType};

    fn table_with_one_row() -> (Catalog, TableHandle) {
        let mut cat = Catalog::new();
        let (_, handle) = cat.create_table("db", "t", vec![ColumnDef::new("a", DataType::Int, None)]);
        handle.borrow_mut().store_mut().insert(&[ColumnDef::new("a", DataType::Int, None)], &[Literal::Int(1)]).unwrap();
        (cat, handle)
    }

    #[test]
    fn rollback_of_insert_removes_the_row() {
        let (mut cat, handle) = table_with_one_row();
        let slot = handle.borrow().store().seq_scan(None).unwrap();
        let mut trx = Transaction::new();
        trx.begin();
        trx.push(UndoEntry::Insert { table: handle.clone(), slot });
        trx.rollback(&mut cat);
        assert!(handle.borrow().store().seq_scan(None).is_none());
    }

    #[test]
    fn rollback_of_delete_restores_without_dual_list_membership() {
        let (mut cat, handle) = table_with_one_row();
        let slot = handle.borrow().store().seq_scan(None).unwrap();
        let before = handle.borrow().store().snapshot_payload(slot);
        handle.borrow_mut().store_mut().delete(slot);
        assert!(handle.borrow().store().seq_scan(None).is_none());

        let mut trx = Transaction::new();
        trx.begin();
        trx.push(UndoEntry::Delete { table: handle.clone(), slot, before });
        trx.rollback(&mut cat);

        assert_eq!(handle.borrow().store().seq_scan(None), Some(slot));
        assert_eq!(handle.borrow().store().data_len() + handle.borrow().store().free_len(), 100);
    }

    #[test]
    fn rollback_of_create_table_drops_it_from_catalog() {
        let (mut cat, _handle) = table_with_one_row();
        let mut trx = Transaction::new();
        trx.begin();
        trx.push(UndoEntry::CreateTable { schema: "db".into(), name: "t".into() });
        trx.rollback(&mut cat);
        assert!(!cat.table_exists("db", "t"));
    }
}
