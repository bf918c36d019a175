//! `TableFormatter`: the staged export pipeline.
//!
//! Each stage owns the previous stage's output, so the sequence
//! resolve -> write -> measure -> style -> save cannot be reordered:
//!
//! ```text
//! StageResolved -> StageWritten -> StageMeasured -> StageStyled -> SpecXlsxReport
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::conf::{C_SHEET_NAME_DEFAULT, derive_default_table_format_options};
use crate::error::Result;
use crate::layout::{SpecTableRegions, derive_table_regions, derive_table_shape};
use crate::resolve::{resolve_destination, resolve_file_name};
use crate::spec::{SpecDestination, SpecTableFormatOptions, SpecXlsxReport};
use crate::style::{
    DictCellFormats, apply_region_styles, derive_column_widths, derive_style_presets,
    plan_region_styles,
};
use crate::table::SpecTable;
use crate::util::{validate_sheet_name, validate_table_format_options};
use crate::writer::{SpecSheetGrid, derive_sheet_grid, write_workbook};

/// Writes one table to one sheet of an xlsx file and styles it.
#[derive(Debug, Clone)]
pub struct TableFormatter {
    path_file: PathBuf,
    sheet_name: String,
    options: SpecTableFormatOptions,
}

impl TableFormatter {
    /// Bind a formatter to a file path, sheet name and options.
    pub fn new(
        path_file: impl Into<PathBuf>,
        sheet_name: impl Into<String>,
        options: SpecTableFormatOptions,
    ) -> Self {
        Self {
            path_file: path_file.into(),
            sheet_name: sheet_name.into(),
            options,
        }
    }

    /// Formatter writing to `Sheet1` with default options.
    pub fn with_defaults(path_file: impl Into<PathBuf>) -> Self {
        Self::new(
            path_file,
            C_SHEET_NAME_DEFAULT,
            derive_default_table_format_options(),
        )
    }

    /// Options applied on every run.
    pub fn options(&self) -> &SpecTableFormatOptions {
        &self.options
    }

    /// Run the complete export. The file is saved once, at the end.
    pub fn run(&self, table: &SpecTable) -> Result<SpecXlsxReport> {
        validate_sheet_name(&self.sheet_name)?;
        validate_table_format_options(&self.options)?;
        table.validate_fits_sheet(self.options.if_keep_index)?;

        StageResolved::resolve(&self.path_file, &self.sheet_name, &self.options)?
            .write_table(table)?
            .measure(table)
            .style()
            .save()
    }
}

////////////////////////////////////////////////////////////////////////////////
// #region Stages

/// Stage 1: output path normalized and destination inspected.
#[derive(Debug)]
pub struct StageResolved<'a> {
    options: &'a SpecTableFormatOptions,
    destination: SpecDestination,
    report: SpecXlsxReport,
}

impl<'a> StageResolved<'a> {
    /// Normalize the file name and decide the disposition.
    pub fn resolve(
        path_file: &Path,
        sheet_name: &str,
        options: &'a SpecTableFormatOptions,
    ) -> Result<Self> {
        let mut report = SpecXlsxReport {
            sheet_name: sheet_name.to_string(),
            ..Default::default()
        };
        let path_file_out =
            resolve_file_name(path_file, options.if_check_file_name, &mut report);
        let destination = resolve_destination(&path_file_out, sheet_name)?;

        report.path_file_out = path_file_out;
        report.disposition = Some(destination.disposition);
        report.sheets_preserved = destination.sheets_preserved.clone();

        Ok(Self {
            options,
            destination,
            report,
        })
    }

    /// Resolved output path, target sheet and disposition.
    pub fn destination(&self) -> &SpecDestination {
        &self.destination
    }

    /// Serialize the table values onto the in-memory target sheet.
    pub fn write_table(self, table: &SpecTable) -> Result<StageWritten<'a>> {
        let grid = derive_sheet_grid(table, self.options.if_keep_index)?;
        tracing::debug!(n_cells = grid.cells.len(), "serialized table values");
        Ok(StageWritten {
            resolved: self,
            grid,
        })
    }
}

/// Stage 2: table values laid out on the target sheet.
#[derive(Debug)]
pub struct StageWritten<'a> {
    resolved: StageResolved<'a>,
    grid: SpecSheetGrid,
}

impl<'a> StageWritten<'a> {
    /// Values laid out on the target sheet.
    pub fn grid(&self) -> &SpecSheetGrid {
        &self.grid
    }

    /// Compute header/index/body regions from the table shape.
    pub fn measure(self, table: &SpecTable) -> StageMeasured<'a> {
        let shape = derive_table_shape(table);
        let regions = derive_table_regions(&shape, self.resolved.options.if_keep_index);
        tracing::debug!(?shape, "computed regions");
        StageMeasured {
            written: self,
            n_cols: shape.n_cols,
            regions,
        }
    }
}

/// Stage 3: regions known.
#[derive(Debug)]
pub struct StageMeasured<'a> {
    written: StageWritten<'a>,
    n_cols: usize,
    regions: SpecTableRegions,
}

impl<'a> StageMeasured<'a> {
    /// Header, index and body rectangles.
    pub fn regions(&self) -> &SpecTableRegions {
        &self.regions
    }

    /// Apply the presets per region and the uniform column width.
    pub fn style(self) -> StageStyled<'a> {
        let options = self.written.resolved.options;
        let presets = derive_style_presets(options);
        let dict_formats =
            apply_region_styles(&self.regions, &presets, &plan_region_styles(options));
        let dict_widths = derive_column_widths(self.n_cols, options.width_column);
        StageStyled {
            measured: self,
            dict_formats,
            dict_widths,
        }
    }
}

/// Stage 4: every region cell carries its format; ready to save.
#[derive(Debug)]
pub struct StageStyled<'a> {
    measured: StageMeasured<'a>,
    dict_formats: DictCellFormats,
    dict_widths: BTreeMap<usize, f64>,
}

impl StageStyled<'_> {
    /// Accumulated format per styled cell.
    pub fn formats(&self) -> &DictCellFormats {
        &self.dict_formats
    }

    /// Persist the workbook and return the run report.
    pub fn save(self) -> Result<SpecXlsxReport> {
        let StageMeasured {
            written, regions, ..
        } = self.measured;
        let StageWritten { resolved, grid } = written;
        let StageResolved {
            destination,
            mut report,
            ..
        } = resolved;

        write_workbook(&destination, &grid, &self.dict_formats, &self.dict_widths)?;
        tracing::info!(
            path = %destination.path_file_out.display(),
            sheet = %destination.sheet_name,
            disposition = ?destination.disposition,
            "saved styled workbook"
        );

        report.regions = Some(regions);
        Ok(report)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
