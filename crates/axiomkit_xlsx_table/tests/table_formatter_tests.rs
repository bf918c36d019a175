use std::path::Path;

use axiomkit_xlsx_table::{
    EnumCellValue, EnumDisposition, SpecCellCoordinate, SpecTable, SpecTableFormatOptions,
    StageResolved, TableFormatter, XlsxTableError, derive_style_presets, read_column_widths,
    read_sheet_formats, read_sheet_values, read_workbook_sheet_names,
};
use polars::df;
use polars::prelude::{Column, DataFrame};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn table_3x2() -> SpecTable {
    SpecTable::new(df!("a" => [1i64, 2, 3], "b" => ["x", "y", "z"]).unwrap())
}

fn options_keep_index() -> SpecTableFormatOptions {
    SpecTableFormatOptions {
        if_keep_index: true,
        ..SpecTableFormatOptions::default()
    }
}

fn text(val: &str) -> EnumCellValue {
    EnumCellValue::String(val.to_string())
}

fn num(val: f64) -> EnumCellValue {
    EnumCellValue::Number(val)
}

fn cell(label: &str) -> SpecCellCoordinate {
    label.parse().unwrap()
}

fn labels(cells: &[SpecCellCoordinate]) -> Vec<String> {
    cells.iter().map(ToString::to_string).collect()
}

#[test]
fn three_by_two_with_index_regions_and_values() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("report.xlsx");

    let report = TableFormatter::new(&path, "Sheet1", options_keep_index())
        .run(&table_3x2())
        .unwrap();

    assert_eq!(report.disposition, Some(EnumDisposition::CreateWorkbook));
    assert!(report.warnings.is_empty());
    let regions = report.regions.unwrap();
    assert_eq!(labels(&regions.header.cells()), vec!["B1", "C1"]);
    assert_eq!(labels(&regions.index.cells()), vec!["A2", "A3", "A4"]);
    assert_eq!(
        labels(&regions.body.cells()),
        vec!["B2", "B3", "B4", "C2", "C3", "C4"]
    );

    let grid = read_sheet_values(&path, "Sheet1").unwrap();
    assert_eq!(grid[0], vec![EnumCellValue::None, text("a"), text("b")]);
    assert_eq!(grid[1], vec![num(0.0), num(1.0), text("x")]);
    assert_eq!(grid[3], vec![num(2.0), num(3.0), text("z")]);
}

#[test]
fn round_trip_without_index_returns_original_values() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plain.xlsx");
    let df_data = df!(
        "name" => ["ann", "bob"],
        "score" => [1.5f64, 2.25],
        "ok" => [true, false]
    )
    .unwrap();

    TableFormatter::new(&path, "Data", SpecTableFormatOptions::default())
        .run(&SpecTable::new(df_data))
        .unwrap();

    let grid = read_sheet_values(&path, "Data").unwrap();
    assert_eq!(
        grid,
        vec![
            vec![text("name"), text("score"), text("ok")],
            vec![text("ann"), num(1.5), EnumCellValue::Boolean(true)],
            vec![text("bob"), num(2.25), EnumCellValue::Boolean(false)],
        ]
    );
}

#[test]
fn missing_extension_is_appended_with_notice() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("Foo");

    let report = TableFormatter::with_defaults(&path).run(&table_3x2()).unwrap();

    assert_eq!(report.path_file_out, tmp.path().join("Foo.xlsx"));
    assert!(tmp.path().join("Foo.xlsx").exists());
    assert!(!path.exists());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("if_check_file_name"));
}

#[test]
fn new_sheet_is_appended_after_existing_ones() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("book.xlsx");
    let options = SpecTableFormatOptions::default();

    TableFormatter::new(&path, "First", options.clone())
        .run(&table_3x2())
        .unwrap();
    let report = TableFormatter::new(&path, "Second", options)
        .run(&SpecTable::new(df!("c" => [9i64]).unwrap()))
        .unwrap();

    assert_eq!(report.disposition, Some(EnumDisposition::AppendSheet));
    assert_eq!(report.sheets_preserved, vec!["First".to_string()]);
    assert_eq!(read_workbook_sheet_names(&path).unwrap(), vec!["First", "Second"]);

    let grid_first = read_sheet_values(&path, "First").unwrap();
    assert_eq!(grid_first[0], vec![text("a"), text("b")]);
    assert_eq!(grid_first[2], vec![num(2.0), text("y")]);
}

#[test]
fn existing_sheet_among_others_is_replaced() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("book.xlsx");
    let options = SpecTableFormatOptions::default();

    TableFormatter::new(&path, "First", options.clone())
        .run(&table_3x2())
        .unwrap();
    TableFormatter::new(&path, "Second", options.clone())
        .run(&table_3x2())
        .unwrap();
    let report = TableFormatter::new(&path, "First", options)
        .run(&SpecTable::new(df!("new" => ["only"]).unwrap()))
        .unwrap();

    assert_eq!(report.disposition, Some(EnumDisposition::ReplaceSheet));
    assert_eq!(read_workbook_sheet_names(&path).unwrap(), vec!["Second", "First"]);
    assert_eq!(
        read_sheet_values(&path, "First").unwrap(),
        vec![vec![text("new")], vec![text("only")]]
    );
}

#[test]
fn rerun_on_single_sheet_workbook_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("again.xlsx");
    let formatter = TableFormatter::new(&path, "Sheet1", options_keep_index());

    let report_first = formatter.run(&table_3x2()).unwrap();
    let grid_first = read_sheet_values(&path, "Sheet1").unwrap();
    let formats_first = read_sheet_formats(&path, "Sheet1").unwrap();
    let widths_first = read_column_widths(&path, "Sheet1").unwrap();
    let report_second = formatter.run(&table_3x2()).unwrap();
    let grid_second = read_sheet_values(&path, "Sheet1").unwrap();

    assert_eq!(report_first.disposition, Some(EnumDisposition::CreateWorkbook));
    assert_eq!(report_second.disposition, Some(EnumDisposition::ReplaceWorkbook));
    assert_eq!(report_first.regions, report_second.regions);
    assert_eq!(grid_first, grid_second);
    assert_eq!(formats_first, read_sheet_formats(&path, "Sheet1").unwrap());
    assert_eq!(widths_first, read_column_widths(&path, "Sheet1").unwrap());
    assert_eq!(read_workbook_sheet_names(&path).unwrap(), vec!["Sheet1"]);
}

#[test]
fn unstyled_index_receives_body_preset() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("fallback.xlsx");
    let options = SpecTableFormatOptions {
        if_keep_index: true,
        if_format_index_main: false,
        if_format_index_light: false,
        ..SpecTableFormatOptions::default()
    };
    let presets = derive_style_presets(&options);
    let table = table_3x2();

    let styled = StageResolved::resolve(&path, "Sheet1", &options)
        .unwrap()
        .write_table(&table)
        .unwrap()
        .measure(&table)
        .style();

    for label in ["A2", "A3", "A4", "B2", "C4"] {
        assert_eq!(styled.formats()[&cell(label)], presets.body);
    }
    assert_eq!(styled.formats()[&cell("B1")], presets.main);

    styled.save().unwrap();
    assert!(path.exists());
}

#[test]
fn invalid_options_fail_before_touching_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("never.xlsx");
    let options = SpecTableFormatOptions {
        color_main: "blue".to_string(),
        ..SpecTableFormatOptions::default()
    };

    let err = TableFormatter::new(&path, "Sheet1", options)
        .run(&table_3x2())
        .unwrap_err();

    assert!(matches!(err, XlsxTableError::InvalidOptions(_)));
    assert!(!path.exists());
}

#[test]
fn corrupt_existing_file_is_fatal_and_left_untouched() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.xlsx");
    std::fs::write(&path, b"not a zip archive").unwrap();

    let err = TableFormatter::with_defaults(&path)
        .run(&table_3x2())
        .unwrap_err();

    assert!(matches!(err, XlsxTableError::WorkbookRead { .. }));
    assert_eq!(std::fs::read(&path).unwrap(), b"not a zip archive");
}

#[test]
fn missing_directory_is_an_io_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("no_such_dir").join("out.xlsx");

    let err = TableFormatter::with_defaults(&path)
        .run(&table_3x2())
        .unwrap_err();

    assert!(matches!(err, XlsxTableError::Io { .. }));
}

#[test]
fn tables_wider_than_26_columns_are_supported() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("wide.xlsx");
    let l_cols: Vec<Column> = (0..30)
        .map(|idx| Column::new(format!("c{idx}").into(), [idx as i64]))
        .collect();
    let table = SpecTable::new(DataFrame::new(l_cols).unwrap());

    let report = TableFormatter::new(&path, "Wide", options_keep_index())
        .run(&table)
        .unwrap();

    let regions = report.regions.unwrap();
    assert_eq!(regions.header.bottom_right.to_string(), "AE1");
    assert_eq!(regions.body.len(), 30);

    let grid = read_sheet_values(&path, "Wide").unwrap();
    assert_eq!(grid[0][30], text("c29"));
    assert_eq!(grid[1][30], num(29.0));
}

#[test]
fn empty_table_writes_header_only() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("empty.xlsx");
    let df_data = DataFrame::new(vec![Column::new("a".into(), Vec::<i64>::new())]).unwrap();

    let report = TableFormatter::new(&path, "Sheet1", options_keep_index())
        .run(&SpecTable::new(df_data))
        .unwrap();

    let regions = report.regions.unwrap();
    assert!(regions.body.is_empty());
    assert!(regions.index.is_empty());
    assert_eq!(
        read_sheet_values(Path::new(&path), "Sheet1").unwrap(),
        vec![vec![EnumCellValue::None, text("a")]]
    );
}

#[test]
fn saved_sheet_carries_region_styles_and_widths() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("styled.xlsx");

    TableFormatter::new(&path, "Sheet1", options_keep_index())
        .run(&table_3x2())
        .unwrap();

    let dict_formats = read_sheet_formats(&path, "Sheet1").unwrap();
    for label in ["B1", "C1"] {
        let fmt_cell = &dict_formats[&cell(label)];
        assert_eq!(fmt_cell.bold, Some(true));
        assert_eq!(fmt_cell.bg_color.as_deref(), Some("0066cc"));
        assert_eq!(fmt_cell.font_color.as_deref(), Some("ffffff"));
        assert_eq!(fmt_cell.font_size, Some(12.0));
        assert_eq!(fmt_cell.align.as_deref(), Some("center"));
    }
    for label in ["A2", "A3", "A4"] {
        let fmt_cell = &dict_formats[&cell(label)];
        assert_eq!(fmt_cell.bold, Some(false));
        assert_eq!(fmt_cell.bg_color.as_deref(), Some("b2beb5"));
        assert_eq!(fmt_cell.font_color.as_deref(), Some("000000"));
        assert_eq!(fmt_cell.align.as_deref(), Some("left"));
    }
    for label in ["B2", "C4"] {
        let fmt_cell = &dict_formats[&cell(label)];
        assert_eq!(fmt_cell.bold, Some(false));
        assert_eq!(fmt_cell.bg_color, None);
        assert_eq!(fmt_cell.font_size, Some(11.0));
        assert_eq!(fmt_cell.align.as_deref(), Some("center"));
    }
    assert!(!dict_formats.contains_key(&cell("A1")));

    let dict_widths = read_column_widths(&path, "Sheet1").unwrap();
    assert_eq!(dict_widths.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert!(dict_widths.values().all(|width| (width - 20.0).abs() < 1e-9));
}

#[test]
fn appending_keeps_formulas_merges_and_styles_of_other_sheets() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("mixed.xlsx");

    let mut book = umya_spreadsheet::new_file();
    let worksheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
    worksheet.set_name("Other");
    worksheet.get_cell_mut((1, 1)).set_value_number(4);
    worksheet.get_cell_mut((2, 1)).set_formula("A1*10");
    worksheet.get_style_mut((1, 1)).get_font_mut().set_bold(true);
    worksheet.add_merge_cells("C1:D2");
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

    let report = TableFormatter::new(&path, "New", SpecTableFormatOptions::default())
        .run(&table_3x2())
        .unwrap();
    assert_eq!(report.disposition, Some(EnumDisposition::AppendSheet));
    assert_eq!(read_workbook_sheet_names(&path).unwrap(), vec!["Other", "New"]);

    let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
    let worksheet = book.get_sheet_by_name("Other").unwrap();
    assert_eq!(worksheet.get_cell((2, 1)).unwrap().get_formula(), "A1*10");
    assert_eq!(worksheet.get_merge_cells().len(), 1);
    assert_eq!(worksheet.get_merge_cells()[0].get_range(), "C1:D2");
    assert!(*worksheet.get_style((1, 1)).get_font().unwrap().get_bold());

    let grid_new = read_sheet_values(&path, "New").unwrap();
    assert_eq!(grid_new[0], vec![text("a"), text("b")]);
    assert_eq!(grid_new[3], vec![num(3.0), text("z")]);
    let dict_formats = read_sheet_formats(&path, "New").unwrap();
    assert_eq!(dict_formats[&cell("A1")].bg_color.as_deref(), Some("0066cc"));
}

#[test]
fn replacing_a_sheet_keeps_the_other_sheets_intact() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("mixed.xlsx");

    let mut book = umya_spreadsheet::new_file();
    book.get_sheet_by_name_mut("Sheet1")
        .unwrap()
        .get_cell_mut((1, 1))
        .set_value("stale");
    let worksheet = book.new_sheet("Keep").unwrap();
    worksheet.get_cell_mut((1, 1)).set_value_number(2);
    worksheet.get_cell_mut((1, 2)).set_formula("A1+1");
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

    let report = TableFormatter::with_defaults(&path).run(&table_3x2()).unwrap();
    assert_eq!(report.disposition, Some(EnumDisposition::ReplaceSheet));
    assert_eq!(read_workbook_sheet_names(&path).unwrap(), vec!["Keep", "Sheet1"]);

    let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
    let worksheet = book.get_sheet_by_name("Keep").unwrap();
    assert_eq!(worksheet.get_cell((1, 2)).unwrap().get_formula(), "A1+1");
    assert_eq!(read_sheet_values(&path, "Sheet1").unwrap()[0], vec![text("a"), text("b")]);
}

#[test]
fn multi_level_labels_are_merged_in_the_saved_sheet() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("levels.xlsx");
    let table = SpecTable::new(df!("a" => [1i64, 2, 3], "b" => [4i64, 5, 6]).unwrap())
        .with_index(df!("region" => ["n", "n", "s"], "year" => [2020i64, 2021, 2020]).unwrap())
        .unwrap()
        .with_header(df!("a" => ["top", "a"], "b" => ["top", "b"]).unwrap())
        .unwrap();

    TableFormatter::new(&path, "Sheet1", options_keep_index())
        .run(&table)
        .unwrap();

    let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
    let mut l_ranges: Vec<String> = book
        .get_sheet_by_name("Sheet1")
        .unwrap()
        .get_merge_cells()
        .iter()
        .map(|range| range.get_range())
        .collect();
    l_ranges.sort();
    assert_eq!(l_ranges, vec!["A3:A4", "C1:D1"]);

    let grid = read_sheet_values(&path, "Sheet1").unwrap();
    assert_eq!(grid[0][2], text("top"));
    assert_eq!(grid[1], vec![text("region"), text("year"), text("a"), text("b")]);
    assert_eq!(grid[2], vec![text("n"), num(2020.0), num(1.0), num(4.0)]);
    assert_eq!(grid[3][0], EnumCellValue::None);
    assert_eq!(grid[4], vec![text("s"), num(2020.0), num(3.0), num(6.0)]);

    let dict_formats = read_sheet_formats(&path, "Sheet1").unwrap();
    assert_eq!(dict_formats[&cell("D1")].bg_color.as_deref(), Some("0066cc"));
    assert_eq!(dict_formats[&cell("A4")].bg_color.as_deref(), Some("b2beb5"));
}
