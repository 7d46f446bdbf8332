//! Rendering of the cleaned data with the fitted line.
//!
//! - terminal plot (`ascii`)
//! - SVG chart file (`svg`)
//!
//! Both only read a `CleanedDataset` and a `FitResult`.

pub mod ascii;
pub mod svg;

pub use ascii::render_ascii_plot;
pub use svg::write_svg_plot;
