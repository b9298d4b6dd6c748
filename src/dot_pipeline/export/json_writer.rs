use std::io::Write;

use tracing::debug;

use crate::dot_pipeline::common::error::{PipelineError, Result};
use crate::dot_pipeline::export::types::DotExport;
use crate::dot_pipeline::export::writer::ExportWriter;

/// Writes the export as one compact JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExportWriter {
    pub pretty: bool,
}

impl JsonExportWriter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ExportWriter for JsonExportWriter {
    fn write_export(&self, export: &DotExport, output: &mut dyn Write) -> Result<()> {
        debug!(
            cols = export.cols,
            rows = export.rows,
            frames = export.frame_count,
            "Encoding export"
        );

        // Serialize fully before touching the output.
        let buffer = if self.pretty {
            serde_json::to_vec_pretty(export)
        } else {
            serde_json::to_vec(export)
        }
        .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;
        output.flush()?;

        debug!(bytes = buffer.len(), "Export encoding complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read, Seek};

    use super::*;
    use crate::dot_pipeline::common::DotGrid;

    struct FailingOutput;

    impl Write for FailingOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample() -> DotExport {
        let frames = vec![
            DotGrid::scalar(2, 1, vec![0.0, 1.0]),
            DotGrid::scalar(2, 1, vec![0.5, 0.25]),
        ];
        DotExport::new(2, 1, 12, frames).with_name("  clip  ")
    }

    #[test]
    fn test_writes_compact_document() {
        let mut out = Vec::new();
        JsonExportWriter::default().write_export(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            r#"{"cols":2,"rows":1,"fps":12,"frameCount":2,"frames":[[0.0,1.0],[0.5,0.25]],"name":"clip"}"#
        );
    }

    #[test]
    fn test_pretty_output_parses_back() {
        let mut out = Vec::new();
        JsonExportWriter::pretty().write_export(&sample(), &mut out).unwrap();
        assert!(out.contains(&b'\n'));
        let parsed: DotExport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let result = JsonExportWriter::default().write_export(&sample(), &mut FailingOutput);
        assert!(matches!(result, Err(PipelineError::IoError(_))));
    }

    #[test]
    fn test_writes_to_file() {
        let mut file = tempfile::tempfile().unwrap();
        JsonExportWriter::default().write_export(&sample(), &mut file).unwrap();
        file.rewind().unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        assert!(text.starts_with(r#"{"cols":2"#));
    }
}
