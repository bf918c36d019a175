//! Region coordinate calculator.
//!
//! Maps a table shape (row/column counts, index/header depths) to the cell
//! rectangles of the header, index and body regions of the written sheet.

use std::fmt;
use std::str::FromStr;

use crate::error::XlsxTableError;
use crate::table::SpecTable;

////////////////////////////////////////////////////////////////////////////////
// #region ColumnLabels

/// Convert a 0-based column index to its spreadsheet label (`0 -> A`, `26 -> AA`).
pub fn derive_column_label(col_idx: usize) -> String {
    let mut l_chars = Vec::new();
    let mut n_rest = col_idx + 1;
    while n_rest > 0 {
        let n_digit = (n_rest - 1) % 26;
        l_chars.push(char::from(b'A' + n_digit as u8));
        n_rest = (n_rest - 1) / 26;
    }
    l_chars.iter().rev().collect()
}

/// Convert a spreadsheet column label back to its 0-based index.
pub fn derive_column_index(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let mut n_value = 0usize;
    for chr in label.chars() {
        if !chr.is_ascii_uppercase() {
            return None;
        }
        n_value = n_value
            .checked_mul(26)?
            .checked_add((chr as u8 - b'A') as usize + 1)?;
    }
    Some(n_value - 1)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Coordinates

/// One spreadsheet cell: 0-based column index, 1-based row number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecCellCoordinate {
    /// 0-based column index.
    pub col_idx: usize,
    /// 1-based row number.
    pub row_num: usize,
}

impl SpecCellCoordinate {
    /// Cell at 0-based column `col_idx`, 1-based row `row_num`.
    pub fn new(col_idx: usize, row_num: usize) -> Self {
        Self { col_idx, row_num }
    }

    /// Column label (`A`, `B`, ..., `AA`).
    pub fn col_label(&self) -> String {
        derive_column_label(self.col_idx)
    }

    /// 0-based row index as used by xlsx writers.
    pub fn row_idx(&self) -> usize {
        self.row_num.saturating_sub(1)
    }
}

impl fmt::Display for SpecCellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col_label(), self.row_num)
    }
}

impl FromStr for SpecCellCoordinate {
    type Err = XlsxTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || XlsxTableError::InvalidOptions(format!("invalid cell reference: {s:?}"));

        let n_split = s
            .find(|chr: char| chr.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (c_col, c_row) = s.split_at(n_split);
        let col_idx = derive_column_index(c_col).ok_or_else(invalid)?;
        let row_num = c_row.parse::<usize>().map_err(|_| invalid())?;
        if row_num == 0 {
            return Err(invalid());
        }
        Ok(Self { col_idx, row_num })
    }
}

/// Closed rectangle between two corner cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecCellRect {
    /// Top-left corner.
    pub top_left: SpecCellCoordinate,
    /// Bottom-right corner.
    pub bottom_right: SpecCellCoordinate,
}

impl SpecCellRect {
    /// Rectangle covering no cell.
    pub const EMPTY: SpecCellRect = SpecCellRect {
        top_left: SpecCellCoordinate { col_idx: 1, row_num: 1 },
        bottom_right: SpecCellCoordinate { col_idx: 0, row_num: 0 },
    };

    /// Rectangle spanning `top_left..=bottom_right`.
    pub fn new(top_left: SpecCellCoordinate, bottom_right: SpecCellCoordinate) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Whether the rectangle covers no cell.
    pub fn is_empty(&self) -> bool {
        self.bottom_right.col_idx < self.top_left.col_idx
            || self.bottom_right.row_num < self.top_left.row_num
            || self.top_left.row_num == 0
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.bottom_right.col_idx - self.top_left.col_idx + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.bottom_right.row_num - self.top_left.row_num + 1
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// Cells in column-major order.
    pub fn cells(&self) -> Vec<SpecCellCoordinate> {
        derive_rectangle_of_cells(self.top_left, self.bottom_right)
    }
}

/// Enumerate every cell of the closed rectangle, column by column.
///
/// `[A1, B2]` yields `[A1, A2, B1, B2]`. A degenerate rectangle yields nothing.
pub fn derive_rectangle_of_cells(
    top_left: SpecCellCoordinate,
    bottom_right: SpecCellCoordinate,
) -> Vec<SpecCellCoordinate> {
    if top_left.row_num == 0 {
        return vec![];
    }
    (top_left.col_idx..=bottom_right.col_idx)
        .flat_map(|col_idx| {
            (top_left.row_num..=bottom_right.row_num)
                .map(move |row_num| SpecCellCoordinate { col_idx, row_num })
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Regions

/// Region names of a formatted sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumRegionKind {
    /// Column labels.
    Header,
    /// Row labels.
    Index,
    /// Data values.
    Body,
}

/// Shape inputs to the region computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecTableShape {
    /// Body row count.
    pub n_rows: usize,
    /// Body column count.
    pub n_cols: usize,
    /// Index levels (>= 1).
    pub depth_index: usize,
    /// Header levels (>= 1).
    pub depth_header: usize,
}

/// Derive the shape of a table.
pub fn derive_table_shape(table: &SpecTable) -> SpecTableShape {
    SpecTableShape {
        n_rows: table.height(),
        n_cols: table.width(),
        depth_index: table.depth_index(),
        depth_header: table.depth_header(),
    }
}

/// Header, index and body rectangles of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecTableRegions {
    pub header: SpecCellRect,
    pub index: SpecCellRect,
    pub body: SpecCellRect,
}

impl SpecTableRegions {
    /// Rectangle of one region.
    pub fn get(&self, kind: EnumRegionKind) -> &SpecCellRect {
        match kind {
            EnumRegionKind::Header => &self.header,
            EnumRegionKind::Index => &self.index,
            EnumRegionKind::Body => &self.body,
        }
    }

    /// Multi-line listing of every region's cells, for debugging.
    pub fn format_debug(&self) -> String {
        let render = |rect: &SpecCellRect| {
            rect.cells()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "Header: [{}]\n\nIndex: [{}]\n\nBody: [{}]",
            render(&self.header),
            render(&self.index),
            render(&self.body)
        )
    }
}

/// Header rectangle: right of the materialized index, rows `1..=depth_header`.
pub fn derive_header_rect(shape: &SpecTableShape, if_keep_index: bool) -> SpecCellRect {
    if shape.n_cols == 0 || shape.depth_header == 0 {
        return SpecCellRect::EMPTY;
    }
    let n_col_start = shape.depth_index * usize::from(if_keep_index);
    SpecCellRect::new(
        SpecCellCoordinate::new(n_col_start, 1),
        SpecCellCoordinate::new(n_col_start + shape.n_cols - 1, shape.depth_header),
    )
}

/// Index rows below the header, columns `A..depth_index`.
///
/// Computed regardless of `if_keep_index`; the body borrows its rows.
fn derive_index_span(shape: &SpecTableShape) -> SpecCellRect {
    if shape.n_rows == 0 || shape.depth_index == 0 {
        return SpecCellRect::EMPTY;
    }
    SpecCellRect::new(
        SpecCellCoordinate::new(0, shape.depth_header + 1),
        SpecCellCoordinate::new(shape.depth_index - 1, shape.depth_header + shape.n_rows),
    )
}

/// Index rectangle; empty when the index is not written as columns.
pub fn derive_index_rect(shape: &SpecTableShape, if_keep_index: bool) -> SpecCellRect {
    if !if_keep_index {
        return SpecCellRect::EMPTY;
    }
    derive_index_span(shape)
}

/// Body rectangle: header columns crossed with index rows.
pub fn derive_body_rect(shape: &SpecTableShape, if_keep_index: bool) -> SpecCellRect {
    let rect_header = derive_header_rect(shape, if_keep_index);
    let rect_index = derive_index_span(shape);
    if rect_header.is_empty() || rect_index.is_empty() {
        return SpecCellRect::EMPTY;
    }
    SpecCellRect::new(
        SpecCellCoordinate::new(rect_header.top_left.col_idx, rect_index.top_left.row_num),
        SpecCellCoordinate::new(
            rect_header.bottom_right.col_idx,
            rect_index.bottom_right.row_num,
        ),
    )
}

/// Compute all three regions for one sheet layout.
pub fn derive_table_regions(shape: &SpecTableShape, if_keep_index: bool) -> SpecTableRegions {
    SpecTableRegions {
        header: derive_header_rect(shape, if_keep_index),
        index: derive_index_rect(shape, if_keep_index),
        body: derive_body_rect(shape, if_keep_index),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
