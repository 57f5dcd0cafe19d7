//! The catalog: the map of schema-qualified table names to live tables.
//!
//! Tables are held behind [`TableHandle`] (`Rc<RefCell<Table>>`) so that an
//! undo entry can keep a dropped table reachable until the transaction
//! that dropped it commits — at which point the last `Rc` clone is
//! dropped and the table's storage is reclaimed for free, with no manual
//! destructor bookkeeping required.

use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::table::{Index, Table, TableHandle};
use crate::types::ColumnDef;

/// Outcome of a catalog mutation that can legitimately no-op, so callers
/// can apply `IF [NOT] EXISTS` softening without the caller and the
/// catalog duplicating each other's existence checks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    AlreadyExisted,
    DidNotExist,
}

/// Schema-qualified table registry.
#[derive(Default)]
pub struct Catalog {
    tables: HashMap<(String, String), TableHandle>,
}

impl Catalog {
    pub fn new() -> Self {
        Self { tables: HashMap::new() }
    }

    pub fn get_table(&self, schema: &str, name: &str) -> Option<TableHandle> {
        self.tables.get(&(schema.to_string(), name.to_string())).cloned()
    }

    pub fn table_exists(&self, schema: &str, name: &str) -> bool {
        self.tables.contains_key(&(schema.to_string(), name.to_string()))
    }

    pub fn schema_exists(&self, schema: &str) -> bool {
        self.tables.keys().any(|(s, _)| s == schema)
    }

    /// Registers a freshly built table. Returns [`MutationOutcome::AlreadyExisted`]
    /// without replacing the existing table if the name is taken.
    pub fn create_table(&mut self, schema: &str, name: &str, columns: Vec<ColumnDef>) -> (MutationOutcome, TableHandle) {
        let key = (schema.to_string(), name.to_string());
        if let Some(existing) = self.tables.get(&key) {
            return (MutationOutcome::AlreadyExisted, existing.clone());
        }
        let handle = TableHandle::new(std::cell::RefCell::new(Table::new(schema, name, columns)));
        self.tables.insert(key, handle.clone());
        (MutationOutcome::Applied, handle)
    }

    /// Re-inserts a table handle, e.g. undoing a drop. Unlike
    /// [`Self::create_table`], this never leaves the prior occupant (if
    /// any) in place — a drop's undo always wins the slot back.
    pub fn reinsert_table(&mut self, handle: TableHandle) {
        let (schema, name) = {
            let table = handle.borrow();
            (table.schema().to_string(), table.name().to_string())
        };
        self.tables.insert((schema, name), handle);
    }

    /// Removes a table from the catalog and returns its handle so the
    /// caller can fold it into a drop undo entry. The table's storage
    /// stays alive as long as that handle (or any other clone) does.
    pub fn drop_table(&mut self, schema: &str, name: &str) -> Result<TableHandle> {
        self.tables
            .remove(&(schema.to_string(), name.to_string()))
            .ok_or_else(|| EngineError::TableNotFound(format!("{schema}.{name}")))
    }

    /// Removes every table in `schema`, returning the handles in no
    /// particular order for the caller to fold into a single undo entry.
    pub fn drop_schema(&mut self, schema: &str) -> Vec<TableHandle> {
        let keys: Vec<_> = self.tables.keys().filter(|(s, _)| s == schema).cloned().collect();
        keys.into_iter().filter_map(|k| self.tables.remove(&k)).collect()
    }

    pub fn all_tables(&self) -> Vec<TableHandle> {
        self.tables.values().cloned().collect()
    }

    pub fn create_index(&mut self, schema: &str, name: &str, index: Index) -> Result<MutationOutcome> {
        let handle = self.get_table(schema, name).ok_or_else(|| EngineError::TableNotFound(format!("{schema}.{name}")))?;
        let mut table = handle.borrow_mut();
        if table.get_index(&index.name).is_some() {
            return Ok(MutationOutcome::AlreadyExisted);
        }
        table.add_index(index);
        Ok(MutationOutcome::Applied)
    }

    pub fn drop_index(&mut self, schema: &str, name: &str, index_name: &str) -> Result<(MutationOutcome, Option<Index>)> {
        let handle = self.get_table(schema, name).ok_or_else(|| EngineError::TableNotFound(format!("{schema}.{name}")))?;
        let mut table = handle.borrow_mut();
        match table.remove_index(index_name) {
            Some(index) => Ok((MutationOutcome::Applied, Some(index))),
            None => Ok((MutationOutcome::DidNotExist, None)),
        }
    }
}
