pub mod dot;
pub mod render;
pub mod table;

use crate::{config::Config, disk::MbrDevice, error::Result};

pub use dot::generate_dot;
pub use render::Rendered;
pub use table::format_table;

/// Reads the table, writes the DOT source and renders it. Nothing is written
/// back to the disk.
pub fn generate_report<D: MbrDevice>(device: &D, config: &Config) -> Result<Rendered> {
    let mbr = device.read_mbr()?;
    let dot_path = config.report_dot_path();

    render::write_dot(&generate_dot(&mbr), &dot_path)?;
    render::render_png(&config.graphviz_bin, &dot_path, &config.report_image_path())
}
