//! XLSX constants and default preset factories.

use crate::spec::SpecTableFormatOptions;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Extension every output file name must carry.
pub const C_EXT_XLSX_REQUIRED: &str = ".xlsx";
/// Sheet name used when the caller does not pick one.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// Vertical alignment shared by all presets.
pub const C_VALIGN_PRESET: &str = "vcenter";
/// Number format for date cells carried over from an existing workbook.
pub const C_NUM_FORMAT_DATETIME: &str = "yyyy-mm-dd hh:mm:ss";

/// Horizontal alignment names accepted in options.
pub const TUP_ALIGN_HORIZONTAL: [&str; 8] = [
    "general",
    "left",
    "center",
    "right",
    "fill",
    "justify",
    "center_across",
    "distributed",
];

/// Build default export options.
pub fn derive_default_table_format_options() -> SpecTableFormatOptions {
    SpecTableFormatOptions::default()
}
