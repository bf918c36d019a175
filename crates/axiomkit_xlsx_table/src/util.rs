//! Stateless helper utilities shared by the export stages.

use polars::prelude::AnyValue;

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_ALIGN_HORIZONTAL,
    TUP_EXCEL_ILLEGAL,
};
use crate::error::{Result, XlsxTableError};
use crate::spec::{EnumCellValue, SpecCellMerge, SpecTableFormatOptions};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Normalize one polars value into a writable cell value.
///
/// Nulls and NaN become blanks; infinities become `inf` / `-inf` text.
pub fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    let n_value = match value {
        AnyValue::Null => return EnumCellValue::None,
        AnyValue::Boolean(val) => return EnumCellValue::Boolean(val),
        AnyValue::String(val) => return EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => return EnumCellValue::String(val.to_string()),
        AnyValue::UInt8(val) => val as f64,
        AnyValue::UInt16(val) => val as f64,
        AnyValue::UInt32(val) => val as f64,
        AnyValue::UInt64(val) => val as f64,
        AnyValue::Int8(val) => val as f64,
        AnyValue::Int16(val) => val as f64,
        AnyValue::Int32(val) => val as f64,
        AnyValue::Int64(val) => val as f64,
        AnyValue::Int128(val) => val as f64,
        AnyValue::Float32(val) => val as f64,
        AnyValue::Float64(val) => val,
        _ => return EnumCellValue::String(value.to_string()),
    };

    if n_value.is_nan() {
        EnumCellValue::None
    } else if n_value.is_infinite() {
        EnumCellValue::String(if n_value > 0.0 { "inf" } else { "-inf" }.to_string())
    } else {
        EnumCellValue::Number(n_value)
    }
}

/// Render a polars value as header/label text; nulls become empty text.
pub fn derive_text_from_any_value(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(val) => val.to_string(),
        AnyValue::StringOwned(val) => val.to_string(),
        _ => value.to_string(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Check an xlsx sheet name: 1..=31 chars, no illegal characters.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(XlsxTableError::InvalidOptions(
            "sheet name must not be empty.".to_string(),
        ));
    }
    if name.chars().count() > N_LEN_EXCEL_SHEET_NAME_MAX {
        return Err(XlsxTableError::InvalidOptions(format!(
            "sheet name {name:?} exceeds {N_LEN_EXCEL_SHEET_NAME_MAX} characters."
        )));
    }
    if let Some(c_illegal) = TUP_EXCEL_ILLEGAL.iter().find(|c| name.contains(**c)) {
        return Err(XlsxTableError::InvalidOptions(format!(
            "sheet name {name:?} contains illegal character {c_illegal:?}."
        )));
    }
    Ok(())
}

/// Parse a 6-digit hex color (optional leading `#`) into `0xRRGGBB`.
pub fn derive_rgb_from_hex(color: &str) -> Result<u32> {
    let c_hex = color.trim().trim_start_matches('#');
    if c_hex.len() != 6 || !c_hex.chars().all(|chr| chr.is_ascii_hexdigit()) {
        return Err(XlsxTableError::InvalidOptions(format!(
            "color {color:?} is not a 6-digit hex value."
        )));
    }
    u32::from_str_radix(c_hex, 16).map_err(|err| {
        XlsxTableError::InvalidOptions(format!("color {color:?} is not valid hex: {err}"))
    })
}

/// Validate caller options before any file is touched.
pub fn validate_table_format_options(options: &SpecTableFormatOptions) -> Result<()> {
    for color in [
        &options.color_main,
        &options.color_light,
        &options.font_color_main,
        &options.font_color_light,
    ] {
        derive_rgb_from_hex(color)?;
    }

    for align in [
        &options.alignment_main,
        &options.alignment_light,
        &options.alignment_body,
    ] {
        let c_align = align.trim().to_ascii_lowercase();
        if !TUP_ALIGN_HORIZONTAL.contains(&c_align.as_str()) {
            return Err(XlsxTableError::InvalidOptions(format!(
                "unknown horizontal alignment {align:?}; expected one of {TUP_ALIGN_HORIZONTAL:?}."
            )));
        }
    }

    for (c_name, n_value) in [
        ("font_size_main", options.font_size_main),
        ("font_size_light", options.font_size_light),
        ("font_size_body", options.font_size_body),
        ("width_column", options.width_column),
    ] {
        if !n_value.is_finite() || n_value <= 0.0 {
            return Err(XlsxTableError::InvalidOptions(format!(
                "{c_name} must be a finite number > 0, got {n_value}."
            )));
        }
    }

    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasting

/// Cast a 0-based row index to the xlsx row type.
pub fn cast_row_num(value: usize) -> Result<u32> {
    if value >= N_NROWS_EXCEL_MAX {
        return Err(XlsxTableError::IndexOverflow(format!(
            "row index {value} exceeds Excel limit {N_NROWS_EXCEL_MAX}."
        )));
    }
    u32::try_from(value)
        .map_err(|_| XlsxTableError::IndexOverflow(format!("row index overflow: {value}")))
}

/// Cast a 0-based column index to the xlsx column type.
pub fn cast_col_num(value: usize) -> Result<u16> {
    if value >= N_NCOLS_EXCEL_MAX {
        return Err(XlsxTableError::IndexOverflow(format!(
            "column index {value} exceeds Excel limit {N_NCOLS_EXCEL_MAX}."
        )));
    }
    u16::try_from(value)
        .map_err(|_| XlsxTableError::IndexOverflow(format!("column index overflow: {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region MergePlanning

/// Runs `(line_idx, idx_start, idx_end)` of equal non-blank labels along each line.
///
/// Lines are ordered outermost first. A run on line `k` stops wherever any of
/// lines `0..k` changes label, so nested levels never merge across a parent
/// boundary. Single-cell runs are not reported.
pub fn derive_nested_label_runs<T: PartialEq>(
    grid: &[Vec<T>],
    is_blank: impl Fn(&T) -> bool,
) -> Vec<(usize, usize, usize)> {
    let mut l_runs = Vec::new();
    let Some(v_line_0) = grid.first() else {
        return l_runs;
    };
    let n_len = v_line_0.len();
    debug_assert!(
        grid.iter().all(|_line| _line.len() == n_len),
        "All lines must have the same length."
    );

    for (_idx_line, _line) in grid.iter().enumerate() {
        let mut n_idx_start = 0;
        while n_idx_start < n_len {
            let c_label = &_line[n_idx_start];
            if is_blank(c_label) {
                n_idx_start += 1;
                continue;
            }

            let mut n_idx_next = n_idx_start + 1;
            while n_idx_next < n_len
                && _line[n_idx_next] == *c_label
                && grid[.._idx_line]
                    .iter()
                    .all(|_outer| _outer[n_idx_next] == _outer[n_idx_next - 1])
            {
                n_idx_next += 1;
            }

            if n_idx_next - n_idx_start > 1 {
                l_runs.push((_idx_line, n_idx_start, n_idx_next - 1));
            }
            n_idx_start = n_idx_next;
        }
    }

    l_runs
}

/// Plan horizontal merges of repeated header labels, one row per header level.
///
/// Coordinates are relative to the header block.
pub fn plan_header_merges(header_grid: &[Vec<String>]) -> Vec<SpecCellMerge> {
    derive_nested_label_runs(header_grid, String::is_empty)
        .into_iter()
        .map(|(row_idx, col_idx_start, col_idx_end)| SpecCellMerge {
            row_idx_start: row_idx,
            col_idx_start,
            row_idx_end: row_idx,
            col_idx_end,
        })
        .collect()
}

/// Plan vertical merges of repeated index labels, one line per index level.
///
/// Coordinates are relative to the index block (`row_idx` = body row).
pub fn plan_index_merges(index_levels: &[Vec<EnumCellValue>]) -> Vec<SpecCellMerge> {
    derive_nested_label_runs(index_levels, |value| *value == EnumCellValue::None)
        .into_iter()
        .map(|(col_idx, row_idx_start, row_idx_end)| SpecCellMerge {
            row_idx_start,
            col_idx_start: col_idx,
            row_idx_end,
            col_idx_end: col_idx,
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
