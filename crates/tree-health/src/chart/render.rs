//! SVG rendering of stacked and faceted bar charts.
//!
//! Hand-written SVG keeps the dependency tree small and lets the fixed
//! health colours be applied directly.

use super::spec::{ChartSpec, Facet};
use crate::parser::schema::{Health, NormalizedRow};
use crate::utils::error::ChartError;
use log::info;

const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 80.0;
const MARGIN_LEFT: f64 = 56.0;
const LEGEND_WIDTH: f64 = 110.0;
const FACET_CELL_WIDTH: u32 = 220;
const FACET_MIN_ROW_HEIGHT: f64 = 150.0;
const BAR_FILL_RATIO: f64 = 0.7;

/// Plot rectangle in SVG coordinates
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// One bar: an x label and the stacked status proportions
struct Bar<'a> {
    label: &'a str,
    segments: Vec<(Health, f64)>,
}

/// Render a chart spec to an SVG document
///
/// Charts without data render as an empty frame with a note.
///
/// # Errors
/// * `ChartError::InvalidSpec` - zero height or zero facet columns
pub fn render_svg(spec: &ChartSpec) -> Result<String, ChartError> {
    if spec.height == 0 {
        return Err(ChartError::InvalidSpec("height must be non-zero".to_string()));
    }
    if let Some(facet) = &spec.facet {
        if facet.columns == 0 {
            return Err(ChartError::InvalidSpec(
                "facet columns must be at least 1".to_string(),
            ));
        }
    }

    let mut svg = String::new();
    let (width, height) = canvas_size(spec);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width, height, width, height
    ));
    svg.push_str(
        r#"<style>.label { font: 11px sans-serif; } .title { font: bold 16px sans-serif; } .bar:hover { stroke: black; stroke-width: 1; }</style>"#,
    );
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
        width, height
    ));
    svg.push_str(&format!(
        r#"<text class="title" x="{}" y="24" text-anchor="middle">{}</text>"#,
        width as f64 / 2.0,
        escape_xml(&spec.title)
    ));

    let plot = Frame {
        x: MARGIN_LEFT,
        y: MARGIN_TOP,
        width: width as f64 - MARGIN_LEFT - LEGEND_WIDTH,
        height: height as f64 - MARGIN_TOP - MARGIN_BOTTOM,
    };

    if spec.is_empty() {
        render_axes(&mut svg, plot);
        svg.push_str(&format!(
            r#"<text class="label" x="{}" y="{}" text-anchor="middle">No data</text>"#,
            plot.x + plot.width / 2.0,
            plot.y + plot.height / 2.0
        ));
    } else if let Some(facet) = &spec.facet {
        render_facets(&mut svg, spec, plot, facet.columns);
    } else {
        let bars: Vec<Bar> = spec
            .category_order
            .iter()
            .map(|category| Bar {
                label: category,
                segments: stack_segments(spec.rows_for(category)),
            })
            .collect();
        render_axes(&mut svg, plot);
        render_bars(&mut svg, spec, plot, &bars);
    }

    render_legend(&mut svg, spec, width as f64 - LEGEND_WIDTH + 16.0);
    svg.push_str("</svg>");

    info!("Chart rendered ({} bytes)", svg.len());
    Ok(svg)
}

fn canvas_size(spec: &ChartSpec) -> (u32, u32) {
    match &spec.facet {
        Some(facet) => {
            let facets = spec.category_order.len().max(1);
            let columns = facet.columns.min(facets);
            let rows = facets.div_ceil(facet.columns);
            let width = spec
                .width
                .unwrap_or(columns as u32 * FACET_CELL_WIDTH + (MARGIN_LEFT + LEGEND_WIDTH) as u32);
            let min_height =
                (rows as f64 * FACET_MIN_ROW_HEIGHT + MARGIN_TOP + MARGIN_BOTTOM) as u32;
            (width, spec.height.max(min_height))
        }
        None => (spec.width.unwrap_or(800), spec.height),
    }
}

/// Sum proportions per status across the given rows
fn stack_segments<'a>(rows: impl Iterator<Item = &'a NormalizedRow>) -> Vec<(Health, f64)> {
    let mut sums = [0.0f64; 3];
    for row in rows {
        if let Some(i) = Health::ALL.iter().position(|h| *h == row.status) {
            sums[i] += row.proportion;
        }
    }
    Health::ALL.iter().copied().zip(sums).collect()
}

fn render_facets(svg: &mut String, spec: &ChartSpec, plot: Frame, columns: usize) {
    let facets: Vec<Facet> = spec.facets();
    let rows = facets.len().div_ceil(columns).max(1);
    let cell_width = plot.width / columns.min(facets.len()).max(1) as f64;
    let cell_height = (plot.height + MARGIN_BOTTOM / 2.0) / rows as f64;

    for (i, facet) in facets.iter().enumerate() {
        let column = i % columns;
        let row = i / columns;

        let cell = Frame {
            x: plot.x + column as f64 * cell_width + 8.0,
            y: plot.y + row as f64 * cell_height + 16.0,
            width: cell_width - 16.0,
            height: cell_height - 56.0,
        };

        // Facet label shows the bare species name
        svg.push_str(&format!(
            r#"<text class="label" x="{}" y="{}" text-anchor="middle" font-weight="bold">{}</text>"#,
            cell.x + cell.width / 2.0,
            cell.y - 4.0,
            escape_xml(facet.category)
        ));

        let bars: Vec<Bar> = facet
            .x_values()
            .into_iter()
            .map(|steward| Bar {
                label: steward,
                segments: stack_segments(
                    facet
                        .rows
                        .iter()
                        .copied()
                        .filter(|r| r.sub_dimension.as_deref().unwrap_or("") == steward),
                ),
            })
            .collect();

        render_axes(svg, cell);
        render_bars(svg, spec, cell, &bars);
    }
}

fn render_axes(svg: &mut String, frame: Frame) {
    let bottom = frame.y + frame.height;
    svg.push_str(&format!(
        r##"<line x1="{x}" y1="{y}" x2="{x}" y2="{b}" stroke="#444"/><line x1="{x}" y1="{b}" x2="{r}" y2="{b}" stroke="#444"/>"##,
        x = frame.x,
        y = frame.y,
        b = bottom,
        r = frame.x + frame.width
    ));

    for tick in [0.0, 0.5, 1.0] {
        let y = bottom - tick * frame.height;
        svg.push_str(&format!(
            r#"<text class="label" x="{}" y="{}" text-anchor="end">{:.1}</text>"#,
            frame.x - 4.0,
            y + 4.0,
            tick
        ));
    }
}

fn render_bars(svg: &mut String, spec: &ChartSpec, frame: Frame, bars: &[Bar]) {
    if bars.is_empty() {
        return;
    }

    let band = frame.width / bars.len() as f64;
    let bar_width = band * BAR_FILL_RATIO;
    let bottom = frame.y + frame.height;

    for (i, bar) in bars.iter().enumerate() {
        let x = frame.x + i as f64 * band + (band - bar_width) / 2.0;
        let mut top = bottom;

        for (status, proportion) in &bar.segments {
            if *proportion <= 0.0 {
                continue;
            }
            let h = proportion * frame.height;
            top -= h;
            svg.push_str(&format!(
                r#"<rect class="bar" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"><title>{} / {}: {:.3}</title></rect>"#,
                x,
                top,
                bar_width,
                h,
                spec.color_for(*status),
                escape_xml(bar.label),
                status,
                proportion
            ));
        }

        let label_x = x + bar_width / 2.0;
        let label_y = bottom + 12.0;
        svg.push_str(&format!(
            r#"<text class="label" x="{:.2}" y="{:.2}" text-anchor="end" transform="rotate(-35 {:.2} {:.2})">{}</text>"#,
            label_x,
            label_y,
            label_x,
            label_y,
            escape_xml(bar.label)
        ));
    }
}

fn render_legend(svg: &mut String, spec: &ChartSpec, x: f64) {
    svg.push_str(&format!(
        r#"<text class="label" x="{}" y="{}" font-weight="bold">health</text>"#,
        x, MARGIN_TOP
    ));

    for (i, status) in Health::ALL.iter().enumerate() {
        let y = MARGIN_TOP + 12.0 + i as f64 * 20.0;
        svg.push_str(&format!(
            r##"<rect x="{}" y="{}" width="14" height="14" fill="{}" stroke="#888"/>"##,
            x,
            y,
            spec.color_for(*status)
        ));
        svg.push_str(&format!(
            r#"<text class="label" x="{}" y="{}">{}</text>"#,
            x + 20.0,
            y + 11.0,
            status
        ));
    }
}

/// Escape text content for SVG
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::run_pipeline;
    use crate::chart::generator::{build_chart_spec, ChartConfig};
    use crate::parser::schema::{Borough, CountRecord, PipelineMode};

    fn simple_spec() -> ChartSpec {
        let output = run_pipeline(
            &[
                CountRecord::new("Bronx", "Oak", Health::Good, 10),
                CountRecord::new("Bronx", "Oak", Health::Poor, 5),
                CountRecord::new("Bronx", "Pine", Health::Fair, 3),
            ],
            10,
        );
        build_chart_spec(&output, Borough::Bronx, PipelineMode::Simple, &ChartConfig::new())
    }

    #[test]
    fn test_render_simple_uses_fixed_colors() {
        let svg = render_svg(&simple_spec()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"fill="green""#));
        assert!(svg.contains(r#"fill="red""#));
        assert!(svg.contains(r#"fill="yellow""#));
        assert!(svg.contains("Tree Health in Bronx"));
    }

    #[test]
    fn test_render_empty_chart() {
        let output = run_pipeline(&[], 10);
        let spec = build_chart_spec(&output, Borough::Queens, PipelineMode::Simple, &ChartConfig::new());
        let svg = render_svg(&spec).unwrap();
        assert!(svg.contains("No data"));
    }

    #[test]
    fn test_render_faceted_labels() {
        let output = run_pipeline(
            &[
                CountRecord::new("Bronx", "Oak", Health::Good, 4).with_sub_dimension("None"),
                CountRecord::new("Bronx", "Pine", Health::Fair, 2).with_sub_dimension("1or2"),
            ],
            10,
        );
        let spec = build_chart_spec(&output, Borough::Bronx, PipelineMode::Faceted, &ChartConfig::new());
        let svg = render_svg(&spec).unwrap();
        assert!(svg.contains(">Oak</text>"));
        assert!(svg.contains(">1or2</text>"));
    }

    #[test]
    fn test_render_rejects_zero_columns() {
        let mut spec = simple_spec();
        spec.facet = Some(crate::chart::spec::FacetSpec {
            field: "category".to_string(),
            columns: 0,
        });
        assert!(render_svg(&spec).is_err());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("'Schubert' & co"), "&apos;Schubert&apos; &amp; co");
    }
}
