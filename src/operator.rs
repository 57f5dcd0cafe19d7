//! Pull-based row operators: each exposes a single `next` call that
//! returns the next row or signals end-of-input, Volcano-style.
//! `Result<Option<Row>>` covers the three outcomes a pull needs —
//! `Ok(Some(row))`, `Ok(None)` (exhausted), and `Err(_)` — without a
//! separate out-parameter and error flag.
//!
//! Operators dispatch on kind through a tagged enum, built once from the
//! plan tree, rather than through a trait object — there is no scenario
//! here where the set of operator kinds grows without a matching change
//! to the plan tree, so virtual dispatch would only cost an indirection.

use crate::arena::SlotId;
use crate::error::Result;
use crate::plan::PlanNode;
use crate::table::TableHandle;
use crate::types::Literal;

/// One pulled row: its slot (so callers can update/delete it in place)
/// and its decoded column values.
pub struct Row {
    pub slot: SlotId,
    pub values: Vec<Literal>,
}

/// A row-producing operator. Only scan and filter plan nodes produce
/// rows; every other plan node is a statement that consumes a row
/// source (or none at all) rather than being one.
pub enum Operator {
    SeqScan { table: TableHandle, cursor: Option<SlotId>, done: bool },
    Filter { col: usize, value: Literal, source: Box<Operator> },
}

impl Operator {
    /// Builds the pull operator for a row-producing plan node. Panics if
    /// handed a plan node that isn't [`PlanNode::SeqScan`] or
    /// [`PlanNode::Filter`] — the plan builder never nests anything else
    /// under a scan, so this is a programmer error, not a runtime one.
    pub fn build(node: &PlanNode) -> Operator {
        match node {
            PlanNode::SeqScan { table } => Operator::SeqScan { table: table.clone(), cursor: None, done: false },
            PlanNode::Filter { col, value, source } => {
                Operator::Filter { col: *col, value: value.clone(), source: Box::new(Operator::build(source)) }
            }
            _ => unreachable!("only scan/filter plan nodes are pulled"),
        }
    }

    pub fn next(&mut self) -> Result<Option<Row>> {
        match self {
            Operator::SeqScan { table, cursor, done } => {
                if *done {
                    return Ok(None);
                }
                let table = table.borrow();
                let store = table.store();
                let slot = match store.seq_scan(*cursor) {
                    Some(slot) => slot,
                    None => {
                        *done = true;
                        return Ok(None);
                    }
                };
                *cursor = Some(slot);
                let values = store.decode(table.columns(), slot);
                Ok(Some(Row { slot, values }))
            }
            Operator::Filter { col, value, source } => loop {
                match source.next()? {
                    None => return Ok(None),
                    Some(row) => {
                        if equal_filter(&row.values[*col], value) {
                            return Ok(Some(row));
                        }
                    }
                }
            },
        }
    }
}

/// Equality used by the filter operator: same-kind values compared
/// directly, with floats as `f64` and strings as their raw byte buffers
/// (never as reinterpreted integer bits).
fn equal_filter(lhs: &Literal, rhs: &Literal) -> bool {
    if !lhs.same_kind(rhs) {
        return false;
    }
    match (lhs, rhs) {
        (Literal::Int(a), Literal::Int(b)) => a == b,
        (Literal::Float(a), Literal::Float(b)) => a == b,
        (Literal::Str(a), Literal::Str(b)) => a == b,
        (Literal::Null, Literal::Null) => true,
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{ColumnDef, DataType};

    fn table_with_rows(rows: &[(i64, &str)]) -> TableHandle {
        let mut cat = Catalog::new();
        let cols = vec![ColumnDef::new("a", DataType::Int, None), ColumnDef::new("b", DataType::Varchar, Some(8))];
        let (_, handle) = cat.create_table("db", "t", cols.clone());
        for (a, b) in rows {
            handle.borrow_mut().store_mut().insert(&cols, &[Literal::Int(*a), Literal::Str(b.as_bytes().to_vec())]).unwrap();
        }
        handle
    }

    #[test]
    fn seq_scan_yields_head_inserted_order_then_ends() {
        let table = table_with_rows(&[(1, "x"), (2, "y")]);
        let mut op = Operator::SeqScan { table, cursor: None, done: false };
        let first = op.next().unwrap().unwrap();
        assert_eq!(first.values[0], Literal::Int(2));
        let second = op.next().unwrap().unwrap();
        assert_eq!(second.values[0], Literal::Int(1));
        assert!(op.next().unwrap().is_none());
        assert!(op.next().unwrap().is_none());
    }

    #[test]
    fn filter_compares_floats_as_true_values_not_integer_bits() {
        assert!(equal_filter(&Literal::Float(1.5), &Literal::Float(1.5)));
        assert!(!equal_filter(&Literal::Float(1.5), &Literal::Float(2.5)));
        assert!(!equal_filter(&Literal::Int(1), &Literal::Float(1.0)));
    }

    #[test]
    fn filter_skips_non_matching_rows() {
        let table = table_with_rows(&[(1, "x"), (2, "y"), (2, "z")]);
        let source = Operator::SeqScan { table, cursor: None, done: false };
        let mut op = Operator::Filter { col: 0, value: Literal::Int(2), source: Box::new(source) };
        let first = op.next().unwrap().unwrap();
        assert_eq!(first.values[1], Literal::Str(b"z\0\0\0\0\0\0\0".to_vec()));
        let second = op.next().unwrap().unwrap();
        assert_eq!(second.values[0], Literal::Int(2));
        assert!(op.next().unwrap().is_none());
    }
}
