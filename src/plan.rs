//! Plan tree construction: resolves a parsed [`Statement`] against the
//! catalog into a [`PlanNode`] tree — table/column names become resolved
//! handles and positions once, here, rather than being re-looked-up on
//! every pulled row.
//!
//! Plan nodes are a tagged enum rather than a class hierarchy: dispatch
//! happens on kind at construction, not through virtual calls, and an
//! enum gives us that for free along with exhaustiveness checking in
//! [`crate::operator`].

use crate::ast::{Predicate, SelectColumns, Statement, TrxCommand};
use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::table::TableHandle;
use crate::types::{ColumnDef, Literal};

pub enum PlanNode {
    CreateTable { schema: String, name: String, if_not_exists: bool, columns: Vec<ColumnDef> },
    CreateIndex { table: TableHandle, index_name: String, if_not_exists: bool, columns: Vec<String> },
    DropTable { schema: String, name: String, if_exists: bool },
    DropSchema { schema: String, if_exists: bool },
    DropIndex { table: TableHandle, schema: String, name: String, index_name: String, if_exists: bool },
    Insert { table: TableHandle, values: Vec<Literal> },
    Update { table: TableHandle, assignments: Vec<(usize, Literal)>, source: Box<PlanNode> },
    Delete { table: TableHandle, source: Box<PlanNode> },
    Select { out_cols: Vec<(String, usize)>, source: Box<PlanNode> },
    SeqScan { table: TableHandle },
    Filter { col: usize, value: Literal, source: Box<PlanNode> },
    Transaction(TrxCommand),
    ShowTables,
    ShowColumns { table: TableHandle },
}

fn resolve_table(catalog: &Catalog, schema: &str, name: &str) -> Result<TableHandle> {
    catalog.get_table(schema, name).ok_or_else(|| EngineError::TableNotFound(format!("{schema}.{name}")))
}

fn column_position(table: &TableHandle, column: &str) -> Result<usize> {
    table.borrow().column_position(column).ok_or_else(|| EngineError::ColumnNotFound(column.to_string()))
}

fn scan_plan(table: TableHandle, filter: Option<Predicate>) -> Result<PlanNode> {
    let scan = PlanNode::SeqScan { table: table.clone() };
    match filter {
        None => Ok(scan),
        Some(pred) => {
            let col = column_position(&table, &pred.column)?;
            Ok(PlanNode::Filter { col, value: pred.value, source: Box::new(scan) })
        }
    }
}

/// Builds a plan tree for one statement, resolving every name against
/// `catalog` up front.
pub fn build_plan(catalog: &Catalog, stmt: Statement) -> Result<PlanNode> {
    match stmt {
        Statement::CreateTable { schema, name, if_not_exists, columns } => {
            Ok(PlanNode::CreateTable { schema, name, if_not_exists, columns })
        }
        Statement::CreateIndex { schema, name, index_name, if_not_exists, columns } => {
            let table = resolve_table(catalog, &schema, &name)?;
            for col in &columns {
                column_position(&table, col)?;
            }
            Ok(PlanNode::CreateIndex { table, index_name, if_not_exists, columns })
        }
        Statement::DropTable { schema, name, if_exists } => Ok(PlanNode::DropTable { schema, name, if_exists }),
        Statement::DropSchema { schema, if_exists } => Ok(PlanNode::DropSchema { schema, if_exists }),
        Statement::DropIndex { schema, name, index_name, if_exists } => {
            let table = resolve_table(catalog, &schema, &name)?;
            Ok(PlanNode::DropIndex { table, schema, name, index_name, if_exists })
        }
        Statement::Insert { schema, name, values } => {
            let table = resolve_table(catalog, &schema, &name)?;
            Ok(PlanNode::Insert { table, values })
        }
        Statement::Update { schema, name, assignments, filter } => {
            let table = resolve_table(catalog, &schema, &name)?;
            let mut resolved = Vec::with_capacity(assignments.len());
            for a in assignments {
                resolved.push((column_position(&table, &a.column)?, a.value));
            }
            let source = Box::new(scan_plan(table.clone(), filter)?);
            Ok(PlanNode::Update { table, assignments: resolved, source })
        }
        Statement::Delete { schema, name, filter } => {
            let table = resolve_table(catalog, &schema, &name)?;
            let source = Box::new(scan_plan(table.clone(), filter)?);
            Ok(PlanNode::Delete { table, source })
        }
        Statement::Select { schema, name, columns, filter } => {
            let table = resolve_table(catalog, &schema, &name)?;
            let out_cols = match columns {
                SelectColumns::Star => {
                    table.borrow().columns().iter().enumerate().map(|(i, c)| (c.name.clone(), i)).collect()
                }
                SelectColumns::Named(names) => {
                    let mut out = Vec::with_capacity(names.len());
                    for n in names {
                        let pos = column_position(&table, &n)?;
                        out.push((n, pos));
                    }
                    out
                }
            };
            let source = Box::new(scan_plan(table, filter)?);
            Ok(PlanNode::Select { out_cols, source })
        }
        Statement::Transaction(cmd) => Ok(PlanNode::Transaction(cmd)),
        Statement::ShowTables => Ok(PlanNode::ShowTables),
        Statement::ShowColumns { schema, name } => {
            let table = resolve_table(catalog, &schema, &name)?;
            Ok(PlanNode::ShowColumns { table })
        }
    }
}
