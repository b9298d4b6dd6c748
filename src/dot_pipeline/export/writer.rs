use std::io::Write;

use crate::dot_pipeline::common::error::Result;
use crate::dot_pipeline::export::types::DotExport;

pub trait ExportWriter {
    fn write_export(&self, export: &DotExport, output: &mut dyn Write) -> Result<()>;
}
