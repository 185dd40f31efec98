//! File output helpers.
//!
//! K_i: Files are written to a temp sibling and renamed into place, so a
//! reader never sees a half-written document.

use crate::models::{MathgenError, QuestionRecord, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write `contents` to `path` atomically (write-then-rename).
///
/// On failure the temp file is removed and `path` is left as it was.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let temp_path = temp_sibling(path);

    if let Err(e) = write_then_rename(&temp_path, path, contents) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    debug!(path = %path.display(), bytes = contents.len(), "File written");
    Ok(())
}

fn write_then_rename(temp_path: &Path, path: &Path, contents: &str) -> Result<()> {
    {
        let file = File::create(temp_path)
            .map_err(|e| MathgenError::io(format!("creating {}", temp_path.display()), e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(contents.as_bytes())
            .map_err(|e| MathgenError::io(format!("writing {}", temp_path.display()), e))?;
        writer
            .flush()
            .map_err(|e| MathgenError::io(format!("flushing {}", temp_path.display()), e))?;
    }

    fs::rename(temp_path, path)
        .map_err(|e| MathgenError::io(format!("renaming into {}", path.display()), e))
}

/// Serialize records as JSONL, one per line.
pub fn records_to_jsonl(records: &[QuestionRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        let json = serde_json::to_string(record).map_err(|e| {
            MathgenError::Internal(format!("Failed to serialize record: {e}"))
        })?;
        out.push_str(&json);
        out.push('\n');
    }
    Ok(out)
}

/// Create a directory (and parents) if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .map_err(|e| MathgenError::io(format!("creating directory {}", dir.display()), e))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
