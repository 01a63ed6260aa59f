// Author: kelexine (https://github.com/kelexine)
// export/mod.rs — Export dispatcher

pub mod csv;
pub mod json;

use std::path::Path;

use anyhow::Result;

use crate::models::MiningResult;

pub enum ExportFormat {
    Json,
    Jsonl,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json"  => Some(Self::Json),
            "jsonl" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

/// Export the mining summary in the format implied by the extension of `path`.
pub fn export(result: &MiningResult, path: &Path) -> Result<()> {
    match ExportFormat::from_path(path) {
        Some(ExportFormat::Json)  => json::export_summary(result, path),
        Some(ExportFormat::Jsonl) => json::export_summary_jsonl(result, path),
        None => anyhow::bail!(
            "Unsupported export format '{}'. Use .json or .jsonl",
            path.extension().and_then(|e| e.to_str()).unwrap_or("?")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert!(matches!(ExportFormat::from_path(Path::new("a.JSON")), Some(ExportFormat::Json)));
        assert!(matches!(ExportFormat::from_path(Path::new("a.jsonl")), Some(ExportFormat::Jsonl)));
        assert!(ExportFormat::from_path(Path::new("a.csv")).is_none());
        assert!(ExportFormat::from_path(Path::new("noext")).is_none());
    }

    #[test]
    fn test_unsupported_format_errors() {
        let err = export(&MiningResult::default(), Path::new("out.html")).unwrap_err();
        assert!(err.to_string().contains("html"));
    }
}
