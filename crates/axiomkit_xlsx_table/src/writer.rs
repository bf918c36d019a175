//! Sheet serialization and workbook persistence.
//!
//! The target sheet is always built with `rust_xlsxwriter`. A fresh workbook
//! is saved as is; an existing workbook is opened with `umya_spreadsheet`, the
//! built sheet is spliced in, and every other sheet stays as it was.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Write};
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tempfile::NamedTempFile;

use crate::conf::C_NUM_FORMAT_DATETIME;
use crate::error::{Result, XlsxTableError};
use crate::spec::{
    EnumCellValue, EnumDisposition, SpecCellFormat, SpecCellMerge, SpecDestination,
};
use crate::style::{DictCellFormats, derive_rust_xlsx_format};
use crate::table::SpecTable;
use crate::util::{
    cast_col_num, cast_row_num, derive_cell_value_from_any_value, plan_header_merges,
    plan_index_merges,
};

////////////////////////////////////////////////////////////////////////////////
// #region SheetGrid

/// Target sheet values keyed by 0-based `(row_idx, col_idx)`, plus label merges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheetGrid {
    pub cells: BTreeMap<(u32, u16), EnumCellValue>,
    pub merges: Vec<SpecCellMerge>,
}

impl SpecSheetGrid {
    fn put(&mut self, row_idx: usize, col_idx: usize, value: EnumCellValue) -> Result<()> {
        if value != EnumCellValue::None {
            self.cells
                .insert((cast_row_num(row_idx)?, cast_col_num(col_idx)?), value);
        }
        Ok(())
    }

    fn add_merge(&mut self, merge: SpecCellMerge) -> Result<()> {
        for (row_idx, col_idx) in merge.covered_cells() {
            self.cells
                .remove(&(cast_row_num(row_idx)?, cast_col_num(col_idx)?));
        }
        self.merges.push(merge);
        Ok(())
    }

    /// Value at a 0-based position; blank when absent.
    pub fn get(&self, row_idx: u32, col_idx: u16) -> &EnumCellValue {
        self.cells
            .get(&(row_idx, col_idx))
            .unwrap_or(&EnumCellValue::None)
    }
}

/// Lay the table out on a sheet grid.
///
/// Header levels occupy rows `0..depth_header`; the body starts right below.
/// With `if_keep_index` the index levels occupy the leading columns and their
/// names sit in the last header row of the top-left corner block. Repeated
/// labels of multi-level headers and indexes are merged; covered cells stay
/// blank.
pub fn derive_sheet_grid(table: &SpecTable, if_keep_index: bool) -> Result<SpecSheetGrid> {
    let n_rows_header = table.depth_header();
    let n_cols_index = table.depth_index() * usize::from(if_keep_index);
    let mut grid = SpecSheetGrid::default();

    let header_grid = table.header_grid()?;
    for (row_idx, row_values) in header_grid.iter().enumerate() {
        for (col_idx, text) in row_values.iter().enumerate() {
            if !text.is_empty() {
                grid.put(
                    row_idx,
                    n_cols_index + col_idx,
                    EnumCellValue::String(text.clone()),
                )?;
            }
        }
    }
    if n_rows_header > 1 {
        for merge in plan_header_merges(&header_grid) {
            grid.add_merge(SpecCellMerge {
                col_idx_start: n_cols_index + merge.col_idx_start,
                col_idx_end: n_cols_index + merge.col_idx_end,
                ..merge
            })?;
        }
    }

    if if_keep_index {
        for (col_idx, name) in table.index_names().into_iter().enumerate() {
            if !name.is_empty() {
                grid.put(n_rows_header - 1, col_idx, EnumCellValue::String(name))?;
            }
        }
        let index_levels = table.index_levels()?;
        for (col_idx, level_values) in index_levels.iter().enumerate() {
            for (row_idx, value) in level_values.iter().enumerate() {
                grid.put(n_rows_header + row_idx, col_idx, value.clone())?;
            }
        }
        if n_cols_index > 1 {
            for merge in plan_index_merges(&index_levels) {
                grid.add_merge(SpecCellMerge {
                    row_idx_start: n_rows_header + merge.row_idx_start,
                    row_idx_end: n_rows_header + merge.row_idx_end,
                    ..merge
                })?;
            }
        }
    }

    for (col_idx, col) in table.data().get_columns().iter().enumerate() {
        for row_idx in 0..table.height() {
            grid.put(
                n_rows_header + row_idx,
                n_cols_index + col_idx,
                derive_cell_value_from_any_value(col.get(row_idx)?),
            )?;
        }
    }

    Ok(grid)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorkbookOutput

/// Assemble the workbook for `destination` and save it in one step.
///
/// `CreateWorkbook` and `ReplaceWorkbook` write a one-sheet workbook.
/// `AppendSheet` and `ReplaceSheet` splice the target sheet into the existing
/// workbook, last in sheet order. The file is replaced atomically.
pub fn write_workbook(
    destination: &SpecDestination,
    grid: &SpecSheetGrid,
    dict_formats: &DictCellFormats,
    dict_widths: &BTreeMap<usize, f64>,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&destination.sheet_name)?;
    write_target_sheet(worksheet, grid, dict_formats, dict_widths)?;
    let v_buffer_sheet = workbook.save_to_buffer()?;

    let v_buffer = match destination.disposition {
        EnumDisposition::CreateWorkbook | EnumDisposition::ReplaceWorkbook => v_buffer_sheet,
        EnumDisposition::AppendSheet | EnumDisposition::ReplaceSheet => {
            splice_sheet_into_workbook(destination, &v_buffer_sheet)?
        }
    };
    save_buffer_atomically(&destination.path_file_out, &v_buffer)
}

/// Insert the single sheet of `buffer_sheet` into the workbook on disk.
///
/// Returns the serialized result; the file itself is not touched.
fn splice_sheet_into_workbook(
    destination: &SpecDestination,
    buffer_sheet: &[u8],
) -> Result<Vec<u8>> {
    let path_file = destination.path_file_out.as_path();
    let c_sheet_name = destination.sheet_name.as_str();

    let book_sheet = umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(buffer_sheet), true)
        .map_err(|err| XlsxTableError::workbook_edit(path_file, err))?;
    let worksheet = book_sheet
        .get_sheet_by_name(c_sheet_name)
        .cloned()
        .ok_or_else(|| {
            XlsxTableError::workbook_edit(path_file, format!("sheet {c_sheet_name:?} not staged"))
        })?;

    let mut book = umya_spreadsheet::reader::xlsx::read(path_file)
        .map_err(|err| XlsxTableError::workbook_read(path_file, err))?;
    if destination.disposition == EnumDisposition::ReplaceSheet {
        book.remove_sheet_by_name(c_sheet_name)
            .map_err(|err| XlsxTableError::workbook_edit(path_file, err))?;
    }
    book.add_sheet(worksheet)
        .map_err(|err| XlsxTableError::workbook_edit(path_file, err))?;

    let mut v_buffer = Vec::new();
    umya_spreadsheet::writer::xlsx::write_writer(&book, Cursor::new(&mut v_buffer))
        .map_err(|err| XlsxTableError::workbook_edit(path_file, err))?;
    tracing::debug!(
        path = %path_file.display(),
        sheet = c_sheet_name,
        n_sheets_kept = destination.sheets_preserved.len(),
        "spliced sheet into existing workbook"
    );
    Ok(v_buffer)
}

fn write_target_sheet(
    worksheet: &mut Worksheet,
    grid: &SpecSheetGrid,
    dict_formats: &DictCellFormats,
    dict_widths: &BTreeMap<usize, f64>,
) -> Result<()> {
    let fmt_datetime = Format::new().set_num_format(C_NUM_FORMAT_DATETIME);
    let mut cache_formats: Vec<(SpecCellFormat, Format)> = Vec::new();
    let mut dict_cell_formats: BTreeMap<(u32, u16), Format> = BTreeMap::new();
    for (coord, spec_fmt) in dict_formats {
        if spec_fmt.is_empty() {
            continue;
        }
        let format = match cache_formats.iter().find(|(spec, _)| spec == spec_fmt) {
            Some((_, format)) => format.clone(),
            None => {
                let format = derive_rust_xlsx_format(spec_fmt)?;
                cache_formats.push((spec_fmt.clone(), format.clone()));
                format
            }
        };
        dict_cell_formats.insert(
            (cast_row_num(coord.row_idx())?, cast_col_num(coord.col_idx)?),
            format,
        );
    }

    // Merge first: `merge_range` blanks its anchor, the value is written after.
    let mut set_merge_covered = BTreeSet::new();
    for merge in &grid.merges {
        let (row_first, col_first) = (
            cast_row_num(merge.row_idx_start)?,
            cast_col_num(merge.col_idx_start)?,
        );
        let format = dict_cell_formats
            .get(&(row_first, col_first))
            .cloned()
            .unwrap_or_else(Format::new);
        worksheet.merge_range(
            row_first,
            col_first,
            cast_row_num(merge.row_idx_end)?,
            cast_col_num(merge.col_idx_end)?,
            "",
            &format,
        )?;
        for (row_idx, col_idx) in merge.covered_cells() {
            set_merge_covered.insert((cast_row_num(row_idx)?, cast_col_num(col_idx)?));
        }
    }

    for ((row_idx, col_idx), value) in &grid.cells {
        let format = dict_cell_formats.get(&(*row_idx, *col_idx));
        write_cell(worksheet, *row_idx, *col_idx, value, format, &fmt_datetime)?;
    }
    for ((row_idx, col_idx), format) in &dict_cell_formats {
        if !grid.cells.contains_key(&(*row_idx, *col_idx))
            && !set_merge_covered.contains(&(*row_idx, *col_idx))
        {
            worksheet.write_blank(*row_idx, *col_idx, format)?;
        }
    }

    for (col_idx, width) in dict_widths {
        worksheet.set_column_width(cast_col_num(*col_idx)?, *width)?;
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row_idx: u32,
    col_idx: u16,
    value: &EnumCellValue,
    format: Option<&Format>,
    fmt_datetime: &Format,
) -> Result<()> {
    match (value, format) {
        (EnumCellValue::None, Some(format)) => {
            worksheet.write_blank(row_idx, col_idx, format)?;
        }
        (EnumCellValue::None, None) => {}
        (EnumCellValue::String(val), Some(format)) => {
            worksheet.write_string_with_format(row_idx, col_idx, val, format)?;
        }
        (EnumCellValue::String(val), None) => {
            worksheet.write_string(row_idx, col_idx, val)?;
        }
        (EnumCellValue::Number(val), Some(format)) => {
            worksheet.write_number_with_format(row_idx, col_idx, *val, format)?;
        }
        (EnumCellValue::Number(val), None) => {
            worksheet.write_number(row_idx, col_idx, *val)?;
        }
        (EnumCellValue::Boolean(val), Some(format)) => {
            worksheet.write_boolean_with_format(row_idx, col_idx, *val, format)?;
        }
        (EnumCellValue::Boolean(val), None) => {
            worksheet.write_boolean(row_idx, col_idx, *val)?;
        }
        (EnumCellValue::DateTime(val), format) => {
            let format = format.map_or_else(
                || fmt_datetime.clone(),
                |fmt| fmt.clone().set_num_format(C_NUM_FORMAT_DATETIME),
            );
            worksheet.write_number_with_format(row_idx, col_idx, *val, &format)?;
        }
    }
    Ok(())
}

fn save_buffer_atomically(path_file_out: &Path, buffer: &[u8]) -> Result<()> {
    let path_dir = path_file_out
        .parent()
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file_tmp =
        NamedTempFile::new_in(path_dir).map_err(|err| XlsxTableError::io(path_dir, err))?;
    file_tmp
        .write_all(buffer)
        .map_err(|err| XlsxTableError::io(file_tmp.path(), err))?;
    file_tmp
        .persist(path_file_out)
        .map_err(|err| XlsxTableError::io(path_file_out, err.error))?;
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
