//! Export module
//!
//! The JSON frame-sequence document and the writers that persist it.

mod json_writer;
pub mod types;
mod writer;

pub use json_writer::JsonExportWriter;
pub use types::{export_name_from_file_name, DotExport};
pub use writer::ExportWriter;
