//! Table input model: body frame plus optional index and header frames.

use polars::prelude::DataFrame;

use crate::conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::error::{Result, XlsxTableError};
use crate::spec::EnumCellValue;
use crate::util::{derive_cell_value_from_any_value, derive_text_from_any_value};

/// Immutable tabular input.
///
/// - `df_data`: body values; height is the row count, width the column count.
/// - `df_index`: optional row labels, one column per index level. When absent
///   the index is the positional range `0..height` with a single level.
/// - `df_header`: optional column labels, one row per header level. When
///   absent the header is a single row of `df_data` column names.
#[derive(Debug, Clone)]
pub struct SpecTable {
    df_data: DataFrame,
    df_index: Option<DataFrame>,
    df_header: Option<DataFrame>,
}

impl SpecTable {
    /// Wrap a body frame with default index and header.
    pub fn new(df_data: DataFrame) -> Self {
        Self {
            df_data,
            df_index: None,
            df_header: None,
        }
    }

    /// Attach row labels. Height must equal the body height.
    pub fn with_index(mut self, df_index: DataFrame) -> Result<Self> {
        if df_index.width() == 0 {
            return Err(XlsxTableError::InvalidTable(
                "df_index must have >= 1 column (one per index level).".to_string(),
            ));
        }
        if df_index.height() != self.df_data.height() {
            return Err(XlsxTableError::InvalidTable(format!(
                "df_index.height ({}) must equal df_data.height ({}).",
                df_index.height(),
                self.df_data.height()
            )));
        }
        self.df_index = Some(df_index);
        Ok(self)
    }

    /// Attach column labels. Width must equal the body width.
    pub fn with_header(mut self, df_header: DataFrame) -> Result<Self> {
        if df_header.height() == 0 {
            return Err(XlsxTableError::InvalidTable(
                "df_header must have >= 1 row (0-row header is not allowed).".to_string(),
            ));
        }
        if df_header.width() != self.df_data.width() {
            return Err(XlsxTableError::InvalidTable(format!(
                "df_header.width ({}) must equal df_data.width ({}).",
                df_header.width(),
                self.df_data.width()
            )));
        }
        self.df_header = Some(df_header);
        Ok(self)
    }

    /// Body frame.
    pub fn data(&self) -> &DataFrame {
        &self.df_data
    }

    /// Number of body rows.
    pub fn height(&self) -> usize {
        self.df_data.height()
    }

    /// Number of body columns.
    pub fn width(&self) -> usize {
        self.df_data.width()
    }

    /// Number of index levels (1 for a simple index).
    pub fn depth_index(&self) -> usize {
        self.df_index.as_ref().map_or(1, DataFrame::width)
    }

    /// Number of header levels (1 for a simple header).
    pub fn depth_header(&self) -> usize {
        self.df_header.as_ref().map_or(1, DataFrame::height)
    }

    /// Header labels as a `depth_header x width` grid.
    pub fn header_grid(&self) -> Result<Vec<Vec<String>>> {
        let Some(df_header) = &self.df_header else {
            return Ok(vec![
                self.df_data
                    .get_column_names_str()
                    .into_iter()
                    .map(ToString::to_string)
                    .collect(),
            ]);
        };
        derive_string_grid_from_dataframe(df_header)
    }

    /// Index level names, one per level. Blank for the positional index.
    pub fn index_names(&self) -> Vec<String> {
        match &self.df_index {
            Some(df_index) => df_index
                .get_column_names_str()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            None => vec![String::new()],
        }
    }

    /// Row labels, one line of `height` values per index level.
    ///
    /// Numeric labels stay numeric; the positional index is `0..height`.
    pub fn index_levels(&self) -> Result<Vec<Vec<EnumCellValue>>> {
        let Some(df_index) = &self.df_index else {
            return Ok(vec![
                (0..self.height())
                    .map(|idx| EnumCellValue::Number(idx as f64))
                    .collect(),
            ]);
        };
        df_index
            .get_columns()
            .iter()
            .map(|col| {
                (0..col.len())
                    .map(|idx| Ok(derive_cell_value_from_any_value(col.get(idx)?)))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    /// Check the table fits one worksheet for the given layout.
    pub fn validate_fits_sheet(&self, if_keep_index: bool) -> Result<()> {
        let n_rows_total = self.depth_header() + self.height();
        let n_cols_total = self.depth_index() * usize::from(if_keep_index) + self.width();
        if n_rows_total > N_NROWS_EXCEL_MAX {
            return Err(XlsxTableError::IndexOverflow(format!(
                "table needs {n_rows_total} rows; Excel limit is {N_NROWS_EXCEL_MAX}."
            )));
        }
        if n_cols_total > N_NCOLS_EXCEL_MAX {
            return Err(XlsxTableError::IndexOverflow(format!(
                "table needs {n_cols_total} columns; Excel limit is {N_NCOLS_EXCEL_MAX}."
            )));
        }
        Ok(())
    }
}

fn derive_string_grid_from_dataframe(df: &DataFrame) -> Result<Vec<Vec<String>>> {
    let n_height = df.height();
    let n_width = df.width();
    let l_cols = df.get_columns();

    let mut l_grid = vec![vec![String::new(); n_width]; n_height];
    for (_idx_row, _val_row) in l_grid.iter_mut().enumerate() {
        for (_idx_col, _val_cell) in _val_row.iter_mut().enumerate() {
            *_val_cell = derive_text_from_any_value(l_cols[_idx_col].get(_idx_row)?);
        }
    }

    Ok(l_grid)
}
