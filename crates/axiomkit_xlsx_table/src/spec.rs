//! Shared specification models for styled table export.

use std::path::PathBuf;

use crate::layout::SpecTableRegions;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
///
/// Every attribute is optional; `None` means "leave this aspect untouched"
/// when the format is merged onto a cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecCellFormat {
    /// Font size in points.
    pub font_size: Option<f64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Font color as 6-digit hex (`0066cc`, `#0066cc`).
    pub font_color: Option<String>,
    /// Solid background fill color as 6-digit hex.
    pub bg_color: Option<String>,
    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Number format code.
    pub num_format: Option<String>,
}

/// Normalized cell value during the write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// Excel date/time serial number.
    DateTime(f64),
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }

    /// Whether no attribute is set.
    pub fn is_empty(&self) -> bool {
        *self == SpecCellFormat::default()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StylePresets

/// Named style preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnumStylePreset {
    /// Emphasized preset: bold, colored fill. Used for headers.
    Main,
    /// Muted preset: plain font, light fill. Used for plain index.
    Light,
    /// Body preset: font size and alignment only, no fill.
    Body,
}

impl EnumStylePreset {
    /// Preset name as used in options and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Light => "light",
            Self::Body => "body",
        }
    }
}

/// The three formats built from [`SpecTableFormatOptions`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecStylePresets {
    /// `main` preset.
    pub main: SpecCellFormat,
    /// `light` preset.
    pub light: SpecCellFormat,
    /// `body` preset.
    pub body: SpecCellFormat,
}

impl SpecStylePresets {
    /// Look up one preset by key.
    pub fn get(&self, key: EnumStylePreset) -> &SpecCellFormat {
        match key {
            EnumStylePreset::Main => &self.main,
            EnumStylePreset::Light => &self.light,
            EnumStylePreset::Body => &self.body,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Caller options controlling layout and styling of one export.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecTableFormatOptions {
    /// Write the row index as visible leading column(s).
    pub if_keep_index: bool,
    /// Style the header region with the `main` preset.
    pub if_format_header: bool,
    /// Style the index region with the `main` preset.
    pub if_format_index_main: bool,
    /// Style the index region with the `light` preset.
    pub if_format_index_light: bool,
    /// Fill color of the `main` preset.
    pub color_main: String,
    /// Fill color of the `light` preset.
    pub color_light: String,
    /// Font color of the `main` preset.
    pub font_color_main: String,
    /// Font color of the `light` preset.
    pub font_color_light: String,
    /// Font size of the `main` preset.
    pub font_size_main: f64,
    /// Font size of the `light` preset.
    pub font_size_light: f64,
    /// Font size of the `body` preset.
    pub font_size_body: f64,
    /// Bold font in the `main` preset.
    pub bold_main: bool,
    /// Bold font in the `light` preset.
    pub bold_light: bool,
    /// Horizontal alignment of the `main` preset.
    pub alignment_main: String,
    /// Horizontal alignment of the `light` preset.
    pub alignment_light: String,
    /// Horizontal alignment of the `body` preset.
    pub alignment_body: String,
    /// Width applied to every data column.
    pub width_column: f64,
    /// Append `.xlsx` to file names that lack it.
    pub if_check_file_name: bool,
}

impl Default for SpecTableFormatOptions {
    fn default() -> Self {
        Self {
            if_keep_index: false,
            if_format_header: true,
            if_format_index_main: false,
            if_format_index_light: true,
            color_main: "0066cc".to_string(),
            color_light: "b2beb5".to_string(),
            font_color_main: "ffffff".to_string(),
            font_color_light: "000000".to_string(),
            font_size_main: 12.0,
            font_size_light: 11.0,
            font_size_body: 11.0,
            bold_main: true,
            bold_light: false,
            alignment_main: "center".to_string(),
            alignment_light: "left".to_string(),
            alignment_body: "center".to_string(),
            width_column: 20.0,
            if_check_file_name: true,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region MergeSpecification

/// Merged block of repeated labels, 0-based sheet coordinates, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecCellMerge {
    /// First row index.
    pub row_idx_start: usize,
    /// First column index.
    pub col_idx_start: usize,
    /// Last row index.
    pub row_idx_end: usize,
    /// Last column index.
    pub col_idx_end: usize,
}

impl SpecCellMerge {
    /// Covered cells other than the top-left anchor, as `(row_idx, col_idx)`.
    pub fn covered_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row_idx_start..=self.row_idx_end)
            .flat_map(move |row_idx| {
                (self.col_idx_start..=self.col_idx_end).map(move |col_idx| (row_idx, col_idx))
            })
            .skip(1)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DestinationSpecification

/// How the target sheet interacts with the file already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumDisposition {
    /// No file exists at the target path.
    CreateWorkbook,
    /// File exists without the target sheet; add it after the others.
    AppendSheet,
    /// File exists with the target sheet among others; drop and re-add it.
    ReplaceSheet,
    /// File holds only the target sheet; overwrite the whole file.
    ReplaceWorkbook,
}

/// Resolved destination for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDestination {
    /// Normalized output path.
    pub path_file_out: PathBuf,
    /// Target sheet name.
    pub sheet_name: String,
    /// Write disposition.
    pub disposition: EnumDisposition,
    /// Names of the sheets left untouched in the existing workbook.
    pub sheets_preserved: Vec<String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-run report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecXlsxReport {
    /// Final output path.
    pub path_file_out: PathBuf,
    /// Target sheet name.
    pub sheet_name: String,
    /// Disposition used for the write, once resolved.
    pub disposition: Option<EnumDisposition>,
    /// Names of sheets kept from the existing workbook.
    pub sheets_preserved: Vec<String>,
    /// Regions computed for the target sheet.
    pub regions: Option<SpecTableRegions>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
