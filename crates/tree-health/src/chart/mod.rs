//! Chart generation: declarative specs, SVG rendering and text summaries.

pub mod generator;
pub mod render;
pub mod spec;

// Re-export main types
pub use generator::{build_chart_spec, chart_title, generate_text_summary, ChartConfig};
pub use render::render_svg;
pub use spec::{ChartSpec, ColorAssignment, Encoding, Facet, FacetSpec};
