//! Parsed statement tree. The grammar here is the small, fixed subset the
//! engine understands — not a general SQL grammar — so there is one flat
//! [`Statement`] enum rather than a generic expression tree.

use crate::types::{ColumnDef, Literal};

/// An equality predicate: `column = literal`. The engine only ever
/// evaluates equality, so there is no general expression tree to walk.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub value: Literal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Literal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrxCommand {
    Begin,
    Commit,
    Rollback,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    CreateTable { schema: String, name: String, if_not_exists: bool, columns: Vec<ColumnDef> },
    CreateIndex { schema: String, name: String, index_name: String, if_not_exists: bool, columns: Vec<String> },
    DropTable { schema: String, name: String, if_exists: bool },
    DropSchema { schema: String, if_exists: bool },
    DropIndex { schema: String, name: String, index_name: String, if_exists: bool },
    Insert { schema: String, name: String, values: Vec<Literal> },
    Update { schema: String, name: String, assignments: Vec<Assignment>, filter: Option<Predicate> },
    Delete { schema: String, name: String, filter: Option<Predicate> },
    Select { schema: String, name: String, columns: SelectColumns, filter: Option<Predicate> },
    Transaction(TrxCommand),
    ShowTables,
    ShowColumns { schema: String, name: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectColumns {
    Star,
    Named(Vec<String>),
}
