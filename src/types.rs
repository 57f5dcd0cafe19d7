//! Column and value types shared across the storage and execution layers.

use std::collections::HashSet;

//---------------------------------------------------------------------------------------------------- DataType
/// A column's storage type.
///
/// `Char`/`Varchar` carry no length here — the length lives on
/// [`ColumnDef::length`], since it is per-column, not per-type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    Int,
    Long,
    Double,
    Char,
    Varchar,
}

impl DataType {
    /// On-disk (in-arena) size in bytes for a column of this type.
    ///
    /// For `Char`/`Varchar` the caller must supply the column's declared
    /// length; fixed-width types ignore it.
    pub fn size(self, length: Option<u32>) -> usize {
        match self {
            DataType::Int => 4,
            DataType::Long => 8,
            DataType::Double => 8,
            DataType::Char | DataType::Varchar => length.unwrap_or(0) as usize,
        }
    }

    pub fn is_string(self) -> bool {
        matches!(self, DataType::Char | DataType::Varchar)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DataType::Int => "INT",
            DataType::Long => "LONG",
            DataType::Double => "DOUBLE",
            DataType::Char => "CHAR",
            DataType::Varchar => "VARCHAR",
        };
        f.write_str(s)
    }
}

//---------------------------------------------------------------------------------------------------- Constraint
/// A column-level constraint. The engine records these as catalog metadata
/// only; nothing in the storage layer enforces them (no NOT NULL check,
/// no uniqueness check — that enforcement is future work).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constraint {
    PrimaryKey,
    Unique,
    NotNull,
}

//---------------------------------------------------------------------------------------------------- ColumnDef
/// One column's metadata, as recorded in the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    /// Declared length, meaningful only for `Char`/`Varchar`.
    pub length: Option<u32>,
    pub nullable: bool,
    pub constraints: HashSet<Constraint>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType, length: Option<u32>) -> Self {
        Self {
            name: name.into(),
            data_type,
            length,
            nullable: true,
            constraints: HashSet::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.data_type.size(self.length)
    }
}

//---------------------------------------------------------------------------------------------------- Literal
/// A literal value, either carried in a statement's AST or produced by
/// decoding a stored tuple.
///
/// String payloads are raw bytes rather than `String`: decode copies the
/// full column-sized buffer verbatim (see [`crate::tuple`]), which may
/// include trailing bytes past a null terminator that are not guaranteed
/// to be valid UTF-8 once a slot has been recycled.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(Vec<u8>),
    Null,
}

impl Literal {
    /// `true` if `self` and `other` are the same literal *kind* — used by
    /// encode dispatch and by the Filter operator's type-mismatch rule.
    pub fn same_kind(&self, other: &Literal) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Trims a string literal at its first NUL byte, for display. Storage
    /// and equality still operate on the full raw buffer.
    pub fn display_string(bytes: &[u8]) -> String {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v}"),
            Literal::Str(bytes) => write!(f, "{}", Literal::display_string(bytes)),
            Literal::Null => write!(f, "NULL"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn column_sizes() {
        assert_eq!(DataType::Int.size(None), 4);
        assert_eq!(DataType::Long.size(None), 8);
        assert_eq!(DataType::Double.size(None), 8);
        assert_eq!(DataType::Varchar.size(Some(8)), 8);
        assert_eq!(DataType::Char.size(Some(1)), 1);
    }

    #[test]
    fn literal_display_trims_at_nul() {
        let mut bytes = b"hi".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        assert_eq!(Literal::display_string(&bytes), "hi");
    }

    #[test]
    fn same_kind_ignores_value() {
        assert!(Literal::Int(1).same_kind(&Literal::Int(2)));
        assert!(!Literal::Int(1).same_kind(&Literal::Float(1.0)));
    }
}
