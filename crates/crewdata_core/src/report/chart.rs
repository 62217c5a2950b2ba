//! SVG chart artifacts for the two summary aggregates.
//!
//! # Responsibility
//! - Render a grouped bar chart (position x start-year average salary).
//! - Render a department x position average-salary heatmap.
//!
//! # Invariants
//! - Rendering is pure string building; callers decide where bytes go.
//! - Empty tables produce a valid, visibly empty SVG, never an error.

use crate::report::aggregate::{DepartmentPositionTable, PositionYearTable};
use std::collections::BTreeSet;
use std::fmt::Write;

const CHART_WIDTH: f64 = 1200.0;
const CHART_HEIGHT: f64 = 600.0;
const MARGIN: f64 = 60.0;

/// Renders the (position, start-year) aggregate as a grouped bar chart.
pub fn grouped_bar_svg(table: &PositionYearTable) -> String {
    let positions: Vec<&str> = table
        .keys()
        .map(|(position, _)| position.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let years: Vec<i32> = table
        .keys()
        .map(|(_, year)| *year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let max_salary = table
        .values()
        .map(|cell| cell.avg_salary)
        .fold(0.0_f64, f64::max);

    let mut svg = svg_header("Average salary by position and start year");

    if !positions.is_empty() && max_salary > 0.0 {
        let plot_width = CHART_WIDTH - 2.0 * MARGIN;
        let plot_height = CHART_HEIGHT - 2.0 * MARGIN;
        let group_width = plot_width / positions.len() as f64;
        let bar_width = (group_width * 0.8) / years.len() as f64;

        for (group_index, position) in positions.iter().enumerate() {
            let group_x = MARGIN + group_index as f64 * group_width;
            for (year_index, year) in years.iter().enumerate() {
                let Some(cell) = table.get(&((*position).to_string(), *year)) else {
                    continue;
                };
                let bar_height = plot_height * cell.avg_salary / max_salary;
                let x = group_x + year_index as f64 * bar_width;
                let y = MARGIN + plot_height - bar_height;
                let _ = write!(
                    svg,
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{bar_height:.1}" fill="hsl({hue},60%,50%)"><title>{label} {year}: {avg:.0}</title></rect>"#,
                    hue = (year_index * 47) % 360,
                    label = escape_text(position),
                    avg = cell.avg_salary,
                );
            }
            let label_x = group_x + group_width / 2.0;
            let label_y = CHART_HEIGHT - MARGIN / 2.0;
            let _ = write!(
                svg,
                r#"<text x="{label_x:.1}" y="{label_y:.1}" font-size="10" text-anchor="middle">{label}</text>"#,
                label = escape_text(position),
            );
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Renders the (department, position) aggregate as a heatmap.
pub fn heatmap_svg(table: &DepartmentPositionTable) -> String {
    let departments: Vec<&str> = table
        .keys()
        .map(|(department, _)| department.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let positions: Vec<&str> = table
        .keys()
        .map(|(_, position)| position.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let max_salary = table
        .values()
        .map(|cell| cell.avg_salary)
        .fold(0.0_f64, f64::max);

    let mut svg = svg_header("Average salary by department and position");

    if !departments.is_empty() && max_salary > 0.0 {
        let plot_width = CHART_WIDTH - 2.0 * MARGIN;
        let plot_height = CHART_HEIGHT - 2.0 * MARGIN;
        let cell_width = plot_width / positions.len() as f64;
        let cell_height = plot_height / departments.len() as f64;

        for (row, department) in departments.iter().enumerate() {
            for (col, position) in positions.iter().enumerate() {
                let key = ((*department).to_string(), (*position).to_string());
                let Some(cell) = table.get(&key) else {
                    // Unobserved cells stay blank rather than zero-shaded.
                    continue;
                };
                let x = MARGIN + col as f64 * cell_width;
                let y = MARGIN + row as f64 * cell_height;
                let intensity = (cell.avg_salary / max_salary * 100.0).clamp(0.0, 100.0);
                let _ = write!(
                    svg,
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{cell_width:.1}" height="{cell_height:.1}" fill="hsl(220,70%,{lightness:.0}%)"><title>{dept} / {pos}: {avg:.0}</title></rect>"#,
                    lightness = 95.0 - intensity * 0.6,
                    dept = escape_text(department),
                    pos = escape_text(position),
                    avg = cell.avg_salary,
                );
            }
            let label_y = MARGIN + row as f64 * cell_height + cell_height / 2.0;
            let _ = write!(
                svg,
                r#"<text x="{x:.1}" y="{label_y:.1}" font-size="10" text-anchor="end">{label}</text>"#,
                x = MARGIN - 5.0,
                label = escape_text(department),
            );
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Minimal XML text escaping; department names contain `&`.
fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn svg_header(title: &str) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{cx}" y="30" font-size="16" text-anchor="middle">{title}</text>"#,
        ),
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        cx = CHART_WIDTH / 2.0,
        title = title,
    )
}
