//! Destination resolver: file-name normalization and write disposition.

use std::path::{Path, PathBuf};

use crate::conf::C_EXT_XLSX_REQUIRED;
use crate::error::Result;
use crate::reader::read_workbook_sheet_names;
use crate::spec::{EnumDisposition, SpecDestination, SpecXlsxReport};

/// Append `.xlsx` when missing and `if_check_file_name` is set.
///
/// A correction is reported as a non-fatal notice, never an error.
pub fn resolve_file_name(
    path_file: &Path,
    if_check_file_name: bool,
    report: &mut SpecXlsxReport,
) -> PathBuf {
    let c_file = path_file.to_string_lossy();
    if !if_check_file_name || c_file.ends_with(C_EXT_XLSX_REQUIRED) {
        return path_file.to_path_buf();
    }

    let path_corrected = PathBuf::from(format!("{c_file}{C_EXT_XLSX_REQUIRED}"));
    let c_notice = format!(
        "The file name provided was modified to {} to avoid errors in the program execution. \
         To deactivate this autocorrection set `if_check_file_name` to false.",
        path_corrected.display()
    );
    tracing::warn!(path = %path_corrected.display(), "{c_notice}");
    report.warn(c_notice);
    path_corrected
}

/// Pick the write disposition from what exists on disk.
///
/// A workbook whose only sheet is the target is overwritten whole: dropping
/// that sheet first would leave a workbook with zero sheets.
pub fn derive_disposition(
    if_file_exists: bool,
    if_sheet_exists: bool,
    n_sheets: usize,
) -> EnumDisposition {
    match (if_file_exists, if_sheet_exists, n_sheets) {
        (false, _, _) => EnumDisposition::CreateWorkbook,
        (true, false, 0) => EnumDisposition::ReplaceWorkbook,
        (true, false, _) => EnumDisposition::AppendSheet,
        (true, true, 0 | 1) => EnumDisposition::ReplaceWorkbook,
        (true, true, _) => EnumDisposition::ReplaceSheet,
    }
}

/// Inspect the target path and list the sheets that survive the run.
pub fn resolve_destination(path_file_out: &Path, sheet_name: &str) -> Result<SpecDestination> {
    let if_file_exists = path_file_out.exists();
    let l_sheet_names = if if_file_exists {
        read_workbook_sheet_names(path_file_out)?
    } else {
        vec![]
    };
    let if_sheet_exists = l_sheet_names.iter().any(|name| name == sheet_name);
    let disposition = derive_disposition(if_file_exists, if_sheet_exists, l_sheet_names.len());

    let sheets_preserved: Vec<String> = match disposition {
        EnumDisposition::AppendSheet | EnumDisposition::ReplaceSheet => l_sheet_names
            .into_iter()
            .filter(|name| name != sheet_name)
            .collect(),
        EnumDisposition::CreateWorkbook | EnumDisposition::ReplaceWorkbook => vec![],
    };

    tracing::debug!(
        path = %path_file_out.display(),
        sheet = sheet_name,
        ?disposition,
        n_sheets_preserved = sheets_preserved.len(),
        "resolved destination"
    );

    Ok(SpecDestination {
        path_file_out: path_file_out.to_path_buf(),
        sheet_name: sheet_name.to_string(),
        disposition,
        sheets_preserved,
    })
}
