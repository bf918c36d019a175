//! Style presets and their application to sheet regions.

use std::collections::BTreeMap;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern};

use crate::conf::C_VALIGN_PRESET;
use crate::error::Result;
use crate::layout::{EnumRegionKind, SpecCellCoordinate, SpecTableRegions};
use crate::spec::{EnumStylePreset, SpecCellFormat, SpecStylePresets, SpecTableFormatOptions};
use crate::util::derive_rgb_from_hex;

/// Accumulated format per cell of the target sheet.
pub type DictCellFormats = BTreeMap<SpecCellCoordinate, SpecCellFormat>;

////////////////////////////////////////////////////////////////////////////////
// #region Presets

/// Build the `main`, `light` and `body` presets from caller options.
pub fn derive_style_presets(options: &SpecTableFormatOptions) -> SpecStylePresets {
    let fmt_base = SpecCellFormat {
        valign: Some(C_VALIGN_PRESET.to_string()),
        ..Default::default()
    };

    SpecStylePresets {
        main: fmt_base.with_(SpecCellFormat {
            font_size: Some(options.font_size_main),
            bold: Some(options.bold_main),
            font_color: Some(options.font_color_main.clone()),
            bg_color: Some(options.color_main.clone()),
            align: Some(options.alignment_main.clone()),
            ..Default::default()
        }),
        light: fmt_base.with_(SpecCellFormat {
            font_size: Some(options.font_size_light),
            bold: Some(options.bold_light),
            font_color: Some(options.font_color_light.clone()),
            bg_color: Some(options.color_light.clone()),
            align: Some(options.alignment_light.clone()),
            ..Default::default()
        }),
        body: fmt_base.with_(SpecCellFormat {
            font_size: Some(options.font_size_body),
            align: Some(options.alignment_body.clone()),
            ..Default::default()
        }),
    }
}

/// Pick the index preset.
///
/// | index_main | index_light | preset |
/// |------------|-------------|--------|
/// | true       | any         | Main   |
/// | false      | true        | Light  |
/// | false      | false       | Body   |
pub fn derive_index_style(
    if_format_index_main: bool,
    if_format_index_light: bool,
) -> EnumStylePreset {
    match (if_format_index_main, if_format_index_light) {
        (true, _) => EnumStylePreset::Main,
        (false, true) => EnumStylePreset::Light,
        (false, false) => EnumStylePreset::Body,
    }
}

/// Ordered `(region, preset)` passes for one run.
///
/// The body pass always runs; the index joins it when no other preset
/// claims the index, so every region cell gets exactly one preset.
pub fn plan_region_styles(
    options: &SpecTableFormatOptions,
) -> Vec<(EnumRegionKind, EnumStylePreset)> {
    let mut l_passes = Vec::with_capacity(4);
    if options.if_format_header {
        l_passes.push((EnumRegionKind::Header, EnumStylePreset::Main));
    }

    let preset_index =
        derive_index_style(options.if_format_index_main, options.if_format_index_light);
    if preset_index != EnumStylePreset::Body {
        l_passes.push((EnumRegionKind::Index, preset_index));
    }

    l_passes.push((EnumRegionKind::Body, EnumStylePreset::Body));
    if preset_index == EnumStylePreset::Body {
        l_passes.push((EnumRegionKind::Index, EnumStylePreset::Body));
    }
    l_passes
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Application

/// Merge `preset` onto every listed cell; absent attributes stay untouched.
pub fn apply_preset_to_cells(
    dict_formats: &mut DictCellFormats,
    cells: &[SpecCellCoordinate],
    preset: &SpecCellFormat,
) {
    for cell in cells {
        let fmt_cell = dict_formats.entry(*cell).or_default();
        *fmt_cell = fmt_cell.merge(preset);
    }
}

/// Run all planned passes over the computed regions.
pub fn apply_region_styles(
    regions: &SpecTableRegions,
    presets: &SpecStylePresets,
    passes: &[(EnumRegionKind, EnumStylePreset)],
) -> DictCellFormats {
    let mut dict_formats = DictCellFormats::new();
    for (kind, key_preset) in passes {
        let rect = regions.get(*kind);
        if rect.is_empty() {
            continue;
        }
        tracing::debug!(
            region = ?kind,
            preset = key_preset.as_str(),
            n_cells = rect.len(),
            "apply style preset"
        );
        apply_preset_to_cells(&mut dict_formats, &rect.cells(), presets.get(*key_preset));
    }
    dict_formats
}

/// Uniform widths for columns `0..=n_cols` (one extra column for the index).
pub fn derive_column_widths(n_cols: usize, width_column: f64) -> BTreeMap<usize, f64> {
    (0..=n_cols).map(|col_idx| (col_idx, width_column)).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region XlsxFormatConversion

/// Materialize a format spec as a `rust_xlsxwriter` format.
pub fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Result<Format> {
    let mut format = Format::new();

    if let Some(val) = spec.font_size {
        format = format.set_font_size(val);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(Color::RGB(derive_rgb_from_hex(val)?));
    }
    if let Some(val) = &spec.bg_color {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(derive_rgb_from_hex(val)?));
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }

    Ok(format)
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "center_across" => Some(FormatAlign::CenterAcross),
        "distributed" => Some(FormatAlign::Distributed),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
