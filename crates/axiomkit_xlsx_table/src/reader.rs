//! Read-side access to existing workbooks.
//!
//! Values come through `calamine`; styling and column widths, which
//! `calamine` does not expose, come through `umya_spreadsheet`.

use std::collections::BTreeMap;
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use umya_spreadsheet::{PatternValues, Spreadsheet, Style, Worksheet};

use crate::error::{Result, XlsxTableError};
use crate::layout::SpecCellCoordinate;
use crate::spec::{EnumCellValue, SpecCellFormat};
use crate::style::DictCellFormats;

/// Open an xlsx workbook for reading.
fn open_xlsx(path: &Path) -> Result<Xlsx<std::io::BufReader<std::fs::File>>> {
    open_workbook(path)
        .map_err(|err: calamine::XlsxError| XlsxTableError::workbook_read(path, err))
}

/// Sheet names of an existing workbook, in workbook order.
pub fn read_workbook_sheet_names(path: &Path) -> Result<Vec<String>> {
    Ok(open_xlsx(path)?.sheet_names())
}

/// Read one sheet as a dense grid anchored at `A1`.
///
/// Styling is ignored; numbers come back as `Number`, blanks as `None`.
pub fn read_sheet_values(path: &Path, sheet_name: &str) -> Result<Vec<Vec<EnumCellValue>>> {
    let mut workbook = open_xlsx(path)?;
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|err| XlsxTableError::workbook_read(path, err))?;
    Ok(derive_grid_from_range(&range))
}

fn derive_grid_from_range(range: &Range<Data>) -> Vec<Vec<EnumCellValue>> {
    let Some((n_row_end, n_col_end)) = range.end() else {
        return vec![];
    };
    let mut l_grid =
        vec![vec![EnumCellValue::None; n_col_end as usize + 1]; n_row_end as usize + 1];
    let (n_row_start, n_col_start) = range.start().unwrap_or((0, 0));
    for (n_row_offset, row) in range.rows().enumerate() {
        for (n_col_offset, cell) in row.iter().enumerate() {
            l_grid[n_row_start as usize + n_row_offset][n_col_start as usize + n_col_offset] =
                derive_cell_value_from_data(cell);
        }
    }
    l_grid
}

fn derive_cell_value_from_data(cell: &Data) -> EnumCellValue {
    match cell {
        Data::Empty => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Bool(val) => EnumCellValue::Boolean(*val),
        Data::DateTime(val) => EnumCellValue::DateTime(val.as_f64()),
        Data::DateTimeIso(val) | Data::DurationIso(val) => EnumCellValue::String(val.clone()),
        Data::Error(err) => EnumCellValue::String(err.to_string()),
    }
}

/// Formatting of every stored cell of one sheet, keyed by coordinate.
///
/// Only the attributes the style presets set are read back: font size, bold,
/// font color, solid fill color and horizontal alignment.
pub fn read_sheet_formats(path: &Path, sheet_name: &str) -> Result<DictCellFormats> {
    let book = read_spreadsheet(path)?;
    let worksheet = select_worksheet(&book, path, sheet_name)?;

    let mut dict_formats = DictCellFormats::new();
    let (n_col_max, n_row_max) = worksheet.get_highest_column_and_row();
    for n_row in 1..=n_row_max {
        for n_col in 1..=n_col_max {
            if worksheet.get_cell((n_col, n_row)).is_none() {
                continue;
            }
            dict_formats.insert(
                SpecCellCoordinate::new(n_col as usize - 1, n_row as usize),
                derive_cell_format_from_style(worksheet.get_style((n_col, n_row))),
            );
        }
    }
    Ok(dict_formats)
}

/// Column widths of one sheet in character units, keyed by 0-based column.
///
/// Columns without an explicit width are absent.
pub fn read_column_widths(path: &Path, sheet_name: &str) -> Result<BTreeMap<usize, f64>> {
    let book = read_spreadsheet(path)?;
    let worksheet = select_worksheet(&book, path, sheet_name)?;

    Ok(worksheet
        .get_column_dimensions()
        .iter()
        .map(|column| {
            (
                *column.get_col_num() as usize - 1,
                derive_width_from_stored(*column.get_width()),
            )
        })
        .collect())
}

fn read_spreadsheet(path: &Path) -> Result<Spreadsheet> {
    umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|err| XlsxTableError::workbook_read(path, err))
}

fn select_worksheet<'a>(
    book: &'a Spreadsheet,
    path: &Path,
    sheet_name: &str,
) -> Result<&'a Worksheet> {
    book.get_sheet_by_name(sheet_name).ok_or_else(|| {
        XlsxTableError::workbook_read(path, format!("sheet {sheet_name:?} not found"))
    })
}

fn derive_cell_format_from_style(style: &Style) -> SpecCellFormat {
    let mut fmt_cell = SpecCellFormat::default();
    if let Some(font) = style.get_font() {
        fmt_cell.font_size = Some(*font.get_size());
        fmt_cell.bold = Some(*font.get_bold());
        fmt_cell.font_color = derive_hex_from_argb(font.get_color().get_argb());
    }
    if let Some(pattern_fill) = style.get_fill().and_then(|fill| fill.get_pattern_fill())
        && *pattern_fill.get_pattern_type() == PatternValues::Solid
    {
        fmt_cell.bg_color = pattern_fill
            .get_foreground_color()
            .and_then(|color| derive_hex_from_argb(color.get_argb()));
    }
    if let Some(alignment) = style.get_alignment() {
        fmt_cell.align = Some(format!("{:?}", alignment.get_horizontal()).to_ascii_lowercase());
    }
    fmt_cell
}

/// `FF0066CC` -> `0066cc`; blank or theme-only colors give `None`.
fn derive_hex_from_argb(argb: &str) -> Option<String> {
    let n_len = argb.len();
    if n_len < 6 || !argb.is_ascii() {
        return None;
    }
    Some(argb[n_len - 6..].to_ascii_lowercase())
}

/// Undo the padding xlsx writers add to a character width (`20.7109375 -> 20`).
fn derive_width_from_stored(width_stored: f64) -> f64 {
    let n_pixels = (width_stored * 7.0).round();
    if n_pixels <= 12.0 {
        return width_stored;
    }
    (n_pixels - 5.0) / 7.0
}
