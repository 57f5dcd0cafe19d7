//! Binary tuple layout: header reservation + null bitmap + payload, and the
//! encode/decode routines that move [`Literal`] values in and out of it.
//!
//! Layout of one tuple slot, precomputed once at table creation:
//!
//! ```text
//! [ 16-byte reserved header | N-byte null bitmap | payload, schema order ]
//! ```
//!
//! `N` is the column count — one byte per column, nonzero meaning null.
//! Column offsets within the payload are cached on [`TupleLayout`] and are
//! immutable for the table's lifetime.

use crate::arena::TUPLE_HEADER_SIZE;
use crate::types::{ColumnDef, Literal};

/// Precomputed, immutable layout for one table's tuples.
#[derive(Clone, Debug)]
pub struct TupleLayout {
    /// Byte offset of column `i`'s payload region, relative to the start
    /// of the payload (i.e. past header + null bitmap).
    offsets: Vec<usize>,
    sizes: Vec<usize>,
    null_bitmap_len: usize,
    tuple_size: usize,
}

impl TupleLayout {
    pub fn new(columns: &[ColumnDef]) -> Self {
        let null_bitmap_len = columns.len();
        let mut offsets = Vec::with_capacity(columns.len());
        let mut sizes = Vec::with_capacity(columns.len());
        let mut offset = 0usize;

        for col in columns {
            offsets.push(offset);
            let size = col.size();
            sizes.push(size);
            offset += size;
        }

        let tuple_size = TUPLE_HEADER_SIZE + null_bitmap_len + offset;

        Self { offsets, sizes, null_bitmap_len, tuple_size }
    }

    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    pub fn null_bitmap_len(&self) -> usize {
        self.null_bitmap_len
    }

    fn payload_start(&self) -> usize {
        TUPLE_HEADER_SIZE + self.null_bitmap_len
    }

    fn null_byte_offset(&self, col: usize) -> usize {
        TUPLE_HEADER_SIZE + col
    }

    fn column_region(&self, col: usize) -> (usize, usize) {
        let start = self.payload_start() + self.offsets[col];
        (start, self.sizes[col])
    }
}

/// Writes `value` into column `col` of `slot`. The literal's *kind*
/// selects the write path, not the column's declared type — a
/// non-matching expression kind (not modeled here, since our AST only
/// carries literals) leaves the slot unchanged for that column.
pub fn encode_column(slot: &mut [u8], layout: &TupleLayout, columns: &[ColumnDef], col: usize, value: &Literal) {
    let _ = columns; // column types aren't needed for dispatch, only sizes (already in `layout`)
    let null_off = layout.null_byte_offset(col);
    let (start, size) = layout.column_region(col);

    match value {
        Literal::Null => {
            slot[null_off] = 1;
        }
        Literal::Int(v) => {
            slot[null_off] = 0;
            if size == 4 {
                slot[start..start + 4].copy_from_slice(&(*v as i32).to_le_bytes());
            } else {
                slot[start..start + 8].copy_from_slice(&v.to_le_bytes());
            }
        }
        Literal::Float(v) => {
            slot[null_off] = 0;
            if size == 4 {
                slot[start..start + 4].copy_from_slice(&(*v as f32).to_le_bytes());
            } else {
                slot[start..start + 8].copy_from_slice(&v.to_le_bytes());
            }
        }
        Literal::Str(bytes) => {
            slot[null_off] = 0;
            let len = bytes.len().min(size.saturating_sub(1));
            slot[start..start + len].copy_from_slice(&bytes[..len]);
            if len < size {
                slot[start + len] = 0;
            }
        }
    }
}

/// Encodes an entire row, by schema position (not by column name).
pub fn encode_row(slot: &mut [u8], layout: &TupleLayout, columns: &[ColumnDef], values: &[Literal]) {
    for (idx, value) in values.iter().enumerate() {
        encode_column(slot, layout, columns, idx, value);
    }
}

/// Reads column `col` back out of `slot` as a [`Literal`], using the
/// column's declared type to disambiguate `LONG` from `DOUBLE` (both
/// 8 bytes wide). String columns are copied out verbatim for the column's
/// full declared length — this may include bytes past a `NUL` terminator
/// left over from a previously recycled tuple.
pub fn decode_column(slot: &[u8], layout: &TupleLayout, col: usize, def: &ColumnDef) -> Literal {
    let null_off = layout.null_byte_offset(col);
    if slot[null_off] != 0 {
        return Literal::Null;
    }

    let (start, size) = layout.column_region(col);
    let region = &slot[start..start + size];

    use crate::types::DataType::*;
    match def.data_type {
        Int => Literal::Int(i32::from_le_bytes(region.try_into().unwrap()) as i64),
        Long => Literal::Int(i64::from_le_bytes(region.try_into().unwrap())),
        Double => Literal::Float(f64::from_le_bytes(region.try_into().unwrap())),
        Char | Varchar => Literal::Str(region.to_vec()),
    }
}

/// Decodes the full row, in schema order.
pub fn decode_row(slot: &[u8], layout: &TupleLayout, columns: &[ColumnDef]) -> Vec<Literal> {
    columns
        .iter()
        .enumerate()
        .map(|(i, col)| decode_column(slot, layout, i, col))
        .collect()
}
