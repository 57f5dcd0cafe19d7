//! The engine: a catalog, a transaction/undo log, and the `execute` entry
//! point that turns one parsed statement into a plan, runs it, and
//! reports what happened. One owned value bundles both catalog and
//! transaction state, so a [`crate::session::Session`] never reaches for
//! globals.

use tracing::{debug, info};

use crate::ast::{Statement, TrxCommand};
use crate::catalog::{Catalog, MutationOutcome};
use crate::error::{EngineError, Result};
use crate::operator::Operator;
use crate::plan::{build_plan, PlanNode};
use crate::table::Index;
use crate::types::Literal;
use crate::undo::{Transaction, UndoEntry};

/// What running a statement produced, for the session loop to format.
pub enum ExecOutcome {
    Message(String),
    Rows { columns: Vec<String>, rows: Vec<Vec<Literal>> },
    TableNames(Vec<String>),
    ColumnList(Vec<(String, String)>),
}

/// Owns all mutable engine state: the catalog and the open transaction
/// (if any). A `Session` (see [`crate::session`]) drives one `Engine`.
#[derive(Default)]
pub struct Engine {
    catalog: Catalog,
    transaction: Transaction,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.in_transaction()
    }

    pub fn execute(&mut self, stmt: Statement) -> Result<ExecOutcome> {
        let plan = build_plan(&self.catalog, stmt)?;
        self.run(plan)
    }

    fn run(&mut self, plan: PlanNode) -> Result<ExecOutcome> {
        match plan {
            PlanNode::CreateTable { schema, name, if_not_exists, columns } => {
                self.exec_create_table(schema, name, if_not_exists, columns)
            }
            PlanNode::CreateIndex { table, index_name, if_not_exists, columns } => {
                self.exec_create_index(table, index_name, if_not_exists, columns)
            }
            PlanNode::DropTable { schema, name, if_exists } => self.exec_drop_table(schema, name, if_exists),
            PlanNode::DropSchema { schema, if_exists } => self.exec_drop_schema(schema, if_exists),
            PlanNode::DropIndex { table, schema, name, index_name, if_exists } => {
                self.exec_drop_index(table, schema, name, index_name, if_exists)
            }
            PlanNode::Insert { table, values } => self.exec_insert(table, values),
            PlanNode::Update { table, assignments, source } => self.exec_update(table, assignments, *source),
            PlanNode::Delete { table, source } => self.exec_delete(table, *source),
            PlanNode::Select { out_cols, source } => self.exec_select(out_cols, *source),
            PlanNode::Transaction(cmd) => self.exec_transaction(cmd),
            PlanNode::ShowTables => Ok(ExecOutcome::TableNames(
                self.catalog.all_tables().iter().map(|t| t.borrow().qualified_name()).collect(),
            )),
            PlanNode::ShowColumns { table } => {
                let table = table.borrow();
                let columns = table
                    .columns()
                    .iter()
                    .map(|c| {
                        let ty = match c.length {
                            Some(len) if c.data_type.is_string() => format!("{}({len})", c.data_type),
                            _ => c.data_type.to_string(),
                        };
                        (c.name.clone(), ty)
                    })
                    .collect();
                Ok(ExecOutcome::ColumnList(columns))
            }
            PlanNode::SeqScan { .. } | PlanNode::Filter { .. } => {
                unreachable!("scan/filter only ever appear nested under another plan node")
            }
        }
    }

    fn exec_create_table(
        &mut self,
        schema: String,
        name: String,
        if_not_exists: bool,
        columns: Vec<crate::types::ColumnDef>,
    ) -> Result<ExecOutcome> {
        let (outcome, _) = self.catalog.create_table(&schema, &name, columns);
        match outcome {
            MutationOutcome::Applied => {
                if self.transaction.in_transaction() {
                    self.transaction.push(UndoEntry::CreateTable { schema: schema.clone(), name: name.clone() });
                }
                info!(schema, name, "created table");
                Ok(ExecOutcome::Message(format!("table {schema}.{name} created")))
            }
            MutationOutcome::AlreadyExisted if if_not_exists => {
                Ok(ExecOutcome::Message(format!("table {schema}.{name} already existed")))
            }
            MutationOutcome::AlreadyExisted => Err(EngineError::TableAlreadyExists(format!("{schema}.{name}"))),
            MutationOutcome::DidNotExist => unreachable!("create_table never reports DidNotExist"),
        }
    }

    fn exec_create_index(
        &mut self,
        table: crate::table::TableHandle,
        index_name: String,
        if_not_exists: bool,
        columns: Vec<String>,
    ) -> Result<ExecOutcome> {
        let (schema, name) = {
            let t = table.borrow();
            (t.schema().to_string(), t.name().to_string())
        };
        let outcome = self.catalog.create_index(&schema, &name, Index { name: index_name.clone(), columns })?;
        match outcome {
            MutationOutcome::Applied => {
                if self.transaction.in_transaction() {
                    self.transaction.push(UndoEntry::CreateIndex {
                        schema: schema.clone(),
                        name: name.clone(),
                        index_name: index_name.clone(),
                    });
                }
                Ok(ExecOutcome::Message(format!("index {index_name} created")))
            }
            MutationOutcome::AlreadyExisted if if_not_exists => {
                Ok(ExecOutcome::Message(format!("index {index_name} already existed")))
            }
            MutationOutcome::AlreadyExisted => Err(EngineError::IndexAlreadyExists(index_name)),
            MutationOutcome::DidNotExist => unreachable!(),
        }
    }

    fn exec_drop_table(&mut self, schema: String, name: String, if_exists: bool) -> Result<ExecOutcome> {
        match self.catalog.drop_table(&schema, &name) {
            Ok(table) => {
                if self.transaction.in_transaction() {
                    self.transaction.push(UndoEntry::DropTable { table });
                }
                Ok(ExecOutcome::Message(format!("table {schema}.{name} dropped")))
            }
            Err(_) if if_exists => Ok(ExecOutcome::Message(format!("table {schema}.{name} did not exist"))),
            Err(e) => Err(e),
        }
    }

    fn exec_drop_schema(&mut self, schema: String, if_exists: bool) -> Result<ExecOutcome> {
        if !self.catalog.schema_exists(&schema) {
            return if if_exists {
                Ok(ExecOutcome::Message(format!("schema {schema} did not exist")))
            } else {
                Err(EngineError::SchemaNotFound(schema))
            };
        }
        let tables = self.catalog.drop_schema(&schema);
        if self.transaction.in_transaction() {
            self.transaction.push(UndoEntry::DropSchema { tables });
        }
        Ok(ExecOutcome::Message(format!("schema {schema} dropped")))
    }

    fn exec_drop_index(
        &mut self,
        _table: crate::table::TableHandle,
        schema: String,
        name: String,
        index_name: String,
        if_exists: bool,
    ) -> Result<ExecOutcome> {
        let (outcome, index) = self.catalog.drop_index(&schema, &name, &index_name)?;
        match (outcome, index) {
            (MutationOutcome::Applied, Some(index)) => {
                if self.transaction.in_transaction() {
                    self.transaction.push(UndoEntry::DropIndex { schema, name, index });
                }
                Ok(ExecOutcome::Message(format!("index {index_name} dropped")))
            }
            (MutationOutcome::DidNotExist, _) if if_exists => {
                Ok(ExecOutcome::Message(format!("index {index_name} did not exist")))
            }
            (MutationOutcome::DidNotExist, _) => Err(EngineError::IndexNotFound(index_name)),
            (MutationOutcome::AlreadyExisted, _) | (MutationOutcome::Applied, None) => {
                unreachable!("drop_index only ever reports Applied-with-index or DidNotExist")
            }
        }
    }

    fn exec_insert(&mut self, table: crate::table::TableHandle, values: Vec<Literal>) -> Result<ExecOutcome> {
        let slot = {
            let mut t = table.borrow_mut();
            let columns = t.columns().to_vec();
            t.store_mut().insert(&columns, &values)?
        };
        if self.transaction.in_transaction() {
            self.transaction.push(UndoEntry::Insert { table, slot });
        }
        Ok(ExecOutcome::Message("1 row inserted".to_string()))
    }

    fn exec_update(
        &mut self,
        table: crate::table::TableHandle,
        assignments: Vec<(usize, Literal)>,
        source: PlanNode,
    ) -> Result<ExecOutcome> {
        let mut op = Operator::build(&source);
        let mut updated = 0usize;
        while let Some(row) = op.next()? {
            let before = table.borrow().store().snapshot_payload(row.slot);
            {
                let mut t = table.borrow_mut();
                let columns = t.columns().to_vec();
                t.store_mut().update(&columns, row.slot, &assignments);
            }
            if self.transaction.in_transaction() {
                self.transaction.push(UndoEntry::Update { table: table.clone(), slot: row.slot, before });
            }
            updated += 1;
        }
        debug!(updated, "rows updated");
        Ok(ExecOutcome::Message(format!("{updated} row(s) updated")))
    }

    fn exec_delete(&mut self, table: crate::table::TableHandle, source: PlanNode) -> Result<ExecOutcome> {
        let mut op = Operator::build(&source);
        let mut deleted = 0usize;
        let mut to_delete = Vec::new();
        while let Some(row) = op.next()? {
            to_delete.push(row.slot);
        }
        for slot in to_delete {
            let before = table.borrow().store().snapshot_payload(slot);
            table.borrow_mut().store_mut().delete(slot);
            if self.transaction.in_transaction() {
                self.transaction.push(UndoEntry::Delete { table: table.clone(), slot, before });
            }
            deleted += 1;
        }
        Ok(ExecOutcome::Message(format!("{deleted} row(s) deleted")))
    }

    fn exec_select(&mut self, out_cols: Vec<(String, usize)>, source: PlanNode) -> Result<ExecOutcome> {
        let mut op = Operator::build(&source);
        let mut rows = Vec::new();
        while let Some(row) = op.next()? {
            rows.push(out_cols.iter().map(|(_, idx)| row.values[*idx].clone()).collect());
        }
        Ok(ExecOutcome::Rows { columns: out_cols.into_iter().map(|(name, _)| name).collect(), rows })
    }

    fn exec_transaction(&mut self, cmd: TrxCommand) -> Result<ExecOutcome> {
        match cmd {
            TrxCommand::Begin => {
                if self.transaction.in_transaction() {
                    return Err(EngineError::AlreadyInTransaction);
                }
                self.transaction.begin();
                Ok(ExecOutcome::Message("transaction started".to_string()))
            }
            TrxCommand::Commit => {
                if !self.transaction.in_transaction() {
                    return Err(EngineError::NotInTransaction);
                }
                self.transaction.commit();
                Ok(ExecOutcome::Message("transaction committed".to_string()))
            }
            TrxCommand::Rollback => {
                if !self.transaction.in_transaction() {
                    return Err(EngineError::NotInTransaction);
                }
                self.transaction.rollback(&mut self.catalog);
                Ok(ExecOutcome::Message("transaction rolled back".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse_statement;

    fn exec(engine: &mut Engine, sql: &str) -> Result<ExecOutcome> {
        engine.execute(parse_statement(sql).unwrap())
    }

    #[test]
    fn create_insert_and_select_round_trip() {
        let mut engine = Engine::new();
        exec(&mut engine, "CREATE TABLE db.t (id INT, name VARCHAR(8))").unwrap();
        exec(&mut engine, "INSERT INTO db.t VALUES (1, 'a')").unwrap();
        exec(&mut engine, "INSERT INTO db.t VALUES (2, 'b')").unwrap();

        match exec(&mut engine, "SELECT * FROM db.t").unwrap() {
            ExecOutcome::Rows { rows, .. } => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0][0], Literal::Int(2));
                assert_eq!(rows[1][0], Literal::Int(1));
            }
            _ => panic!("expected rows"),
        }
    }

    #[test]
    fn update_then_rollback_restores_original_value() {
        let mut engine = Engine::new();
        exec(&mut engine, "CREATE TABLE db.t (id INT)").unwrap();
        exec(&mut engine, "INSERT INTO db.t VALUES (1)").unwrap();
        exec(&mut engine, "BEGIN").unwrap();
        exec(&mut engine, "UPDATE db.t SET id = 99 WHERE id = 1").unwrap();
        exec(&mut engine, "ROLLBACK").unwrap();

        match exec(&mut engine, "SELECT * FROM db.t").unwrap() {
            ExecOutcome::Rows { rows, .. } => assert_eq!(rows[0][0], Literal::Int(1)),
            _ => panic!("expected rows"),
        }
    }

    #[test]
    fn create_table_if_not_exists_softens_duplicate() {
        let mut engine = Engine::new();
        exec(&mut engine, "CREATE TABLE db.t (id INT)").unwrap();
        let result = exec(&mut engine, "CREATE TABLE IF NOT EXISTS db.t (id INT)");
        assert!(result.is_ok());
        let result = exec(&mut engine, "CREATE TABLE db.t (id INT)");
        assert!(matches!(result, Err(EngineError::TableAlreadyExists(_))));
    }

    #[test]
    fn drop_schema_rollback_restores_dropped_tables() {
        let mut engine = Engine::new();
        exec(&mut engine, "CREATE TABLE db.t (id INT)").unwrap();
        exec(&mut engine, "BEGIN").unwrap();
        exec(&mut engine, "DROP SCHEMA db").unwrap();
        assert!(!engine.catalog().schema_exists("db"));
        exec(&mut engine, "ROLLBACK").unwrap();
        assert!(engine.catalog().schema_exists("db"));
    }
}
