use chrono::NaiveDateTime;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::analysis::AlertLevel;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub(super) fn format_temp(celsius: f64) -> String {
    format!("{celsius:.1}°C")
}

pub(super) fn format_percent(count: usize, total: usize) -> String {
    if total == 0 {
        "0.0%".to_string()
    } else {
        format!("{:.1}%", count as f64 * 100.0 / total as f64)
    }
}

pub(super) fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// One block character per value, scaled between the series min and max.
///
/// Long series are averaged down to at most `width` buckets.
pub(super) fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let buckets: Vec<f64> = if values.len() <= width {
        values.to_vec()
    } else {
        (0..width)
            .map(|i| {
                let lo = i * values.len() / width;
                let hi = ((i + 1) * values.len() / width).max(lo + 1);
                let chunk = &values[lo..hi];
                chunk.iter().sum::<f64>() / chunk.len() as f64
            })
            .collect()
    };

    let min = buckets.iter().copied().fold(f64::INFINITY, f64::min);
    let max = buckets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    buckets
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                SPARK_LEVELS[3]
            } else {
                let idx = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

pub(super) fn alert_color(level: AlertLevel, use_color: bool) -> Option<Color> {
    if !use_color {
        return None;
    }
    Some(match level {
        AlertLevel::Normal => Color::Green,
        AlertLevel::Watch => Color::Cyan,
        AlertLevel::Warning => Color::Yellow,
        AlertLevel::Danger => Color::Red,
    })
}

pub(super) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}

pub(super) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text).set_alignment(CellAlignment::Right);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_and_percent() {
        assert_eq!(format_temp(72.345), "72.3°C");
        assert_eq!(format_percent(1, 3), "33.3%");
        assert_eq!(format_percent(0, 0), "0.0%");
    }

    #[test]
    fn sparkline_scales_to_extremes() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 10), "▁▅█");
        assert_eq!(sparkline(&[5.0, 5.0], 10), "▄▄");
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn sparkline_downsamples() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let line = sparkline(&values, 20);
        assert_eq!(line.chars().count(), 20);
        assert!(line.starts_with('▁'));
        assert!(line.ends_with('█'));
    }

    #[test]
    fn alert_colors_respect_flag() {
        assert_eq!(alert_color(AlertLevel::Danger, true), Some(Color::Red));
        assert_eq!(alert_color(AlertLevel::Danger, false), None);
    }

    #[test]
    fn styled_table_renders_header() {
        let mut table = create_styled_table();
        table.set_header(vec![header_cell("Batch", false)]);
        table.add_row(vec![right_cell("1", None, false)]);
        let rendered = table.to_string();
        assert!(rendered.contains("Batch"));
        assert!(rendered.contains('├'));
    }
}
