//! `axiomkit_xlsx_table` v1:
//! Write a table to an XLSX sheet and style its header, index and body.
//!
//! Modules:
//! - `conf`     : constants and default presets
//! - `spec`     : specs/models/options
//! - `error`    : error type
//! - `table`    : table input model
//! - `layout`   : region coordinate calculator
//! - `style`    : style presets and application
//! - `resolve`  : file-name normalization and write disposition
//! - `reader`   : existing-workbook access and read-back
//! - `writer`   : sheet serialization and save
//! - `pipeline` : staged `TableFormatter`
//! - `util`     : pure helper functions
pub mod conf;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod reader;
pub mod resolve;
pub mod spec;
pub mod style;
pub mod table;
pub mod util;
pub mod writer;

pub use conf::{
    C_EXT_XLSX_REQUIRED, C_SHEET_NAME_DEFAULT, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, derive_default_table_format_options,
};
pub use error::{Result, XlsxTableError};
pub use layout::{
    EnumRegionKind, SpecCellCoordinate, SpecCellRect, SpecTableRegions, SpecTableShape,
    derive_column_index, derive_column_label, derive_rectangle_of_cells, derive_table_regions,
    derive_table_shape,
};
pub use pipeline::{StageMeasured, StageResolved, StageStyled, StageWritten, TableFormatter};
pub use reader::{
    read_column_widths, read_sheet_formats, read_sheet_values, read_workbook_sheet_names,
};
pub use resolve::{derive_disposition, resolve_destination, resolve_file_name};
pub use spec::{
    EnumCellValue, EnumDisposition, EnumStylePreset, SpecCellFormat, SpecCellMerge,
    SpecDestination, SpecStylePresets, SpecTableFormatOptions, SpecXlsxReport,
};
pub use style::{derive_index_style, derive_style_presets, plan_region_styles};
pub use table::SpecTable;
