// Author: kelexine (https://github.com/kelexine)
// export/csv.rs — Per-file CSV of extracted method implementations

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::MethodReport;

/// `<out>/<diff stem>/<java file>_diff_method_implementations.csv`, with path
/// separators in the Java file name flattened to `_`.
pub fn csv_path(output_dir: &Path, report: &MethodReport) -> PathBuf {
    let bug = report
        .diff_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("diff");
    let file: String = report
        .file
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    output_dir
        .join(bug)
        .join(format!("{}_diff_method_implementations.csv", file))
}

pub fn export_method_csv(report: &MethodReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(BufWriter::new(f));

    wtr.write_record(["Method Name", "Method Implementation"])?;
    for m in &report.implementations {
        wtr.write_record([m.name.as_str(), m.body.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
