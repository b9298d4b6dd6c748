use serde::{Deserialize, Serialize};

use crate::dot_pipeline::common::{DotCells, DotGrid};

/// A captured frame sequence, in the JSON layout consumers expect:
/// `{cols, rows, fps, frameCount, frames, colorMode?, name?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotExport {
    pub cols: usize,
    pub rows: usize,
    pub fps: u32,
    pub frame_count: usize,
    pub frames: Vec<DotCells>,
    /// Present (and true) only for RGB frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DotExport {
    /// Builds the document from processed frames. `frameCount` is the number
    /// of frames actually captured.
    pub fn new(cols: usize, rows: usize, fps: u32, frames: Vec<DotGrid>) -> Self {
        let color = frames.iter().any(DotGrid::is_color);
        let frames: Vec<DotCells> = frames.into_iter().map(|grid| grid.cells).collect();
        Self {
            cols,
            rows,
            fps,
            frame_count: frames.len(),
            frames,
            color_mode: color.then_some(true),
            name: None,
        }
    }

    /// Sets the name; blank names are left out.
    pub fn with_name(mut self, name: &str) -> Self {
        let name = name.trim();
        self.name = (!name.is_empty()).then(|| name.to_string());
        self
    }

    pub fn is_color(&self) -> bool {
        self.color_mode == Some(true)
    }
}

/// Derives an export name from a source file name: extension stripped, the
/// first three words kept, `_dotted` appended.
pub fn export_name_from_file_name(file_name: &str) -> String {
    let base = match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() && !file_name[dot + 1..].contains('/') => {
            &file_name[..dot]
        }
        _ => file_name,
    }
    .trim();

    let words: Vec<&str> = base.split_whitespace().take(3).collect();
    let stem = if words.is_empty() {
        if base.is_empty() { "export".to_string() } else { base.to_string() }
    } else {
        words.join(" ")
    };
    format!("{stem}_dotted")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_frames_set_color_mode() {
        let export = DotExport::new(1, 1, 15, vec![DotGrid::rgb(1, 1, vec![[1.0, 0.5, 0.0]])]);
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["colorMode"], json!(true));
        assert_eq!(value["frames"], json!([[[1.0, 0.5, 0.0]]]));
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_scalar_frames_omit_color_mode() {
        let export = DotExport::new(1, 1, 15, vec![DotGrid::scalar(1, 1, vec![0.5])]).with_name("   ");
        let value = serde_json::to_value(&export).unwrap();
        assert!(value.get("colorMode").is_none());
        assert!(value.get("name").is_none());
        assert_eq!(value["frameCount"], json!(1));
    }

    #[test]
    fn test_export_name_from_file_name() {
        assert_eq!(export_name_from_file_name("My Holiday Trip 2024.mp4"), "My Holiday Trip_dotted");
        assert_eq!(export_name_from_file_name("clip.final.mov"), "clip.final_dotted");
        assert_eq!(export_name_from_file_name("noext"), "noext_dotted");
        assert_eq!(export_name_from_file_name(".mp4"), "export_dotted");
        assert_eq!(export_name_from_file_name(""), "export_dotted");
    }
}
