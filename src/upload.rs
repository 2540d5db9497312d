use std::path::{Path, PathBuf};

use log::info;
use sha2::{Digest, Sha256};

use crate::error::{LedgerError, Result};

/// Length of the hex prefix put in front of staged file names.
const PREFIX_LEN: usize = 20;

/// Reject anything that is not an existing `.csv` file.
pub fn ensure_csv(file_path: &Path) -> Result<()> {
    if !file_path.is_file() {
        return Err(LedgerError::validation("File not found"));
    }
    let is_csv = file_path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(LedgerError::validation("File is not of type csv"));
    }
    Ok(())
}

fn staged_name(file_path: &Path, data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.update(chrono::Utc::now().to_rfc3339().as_bytes());
    let digest = hex::encode(hasher.finalize());
    let original = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload.csv".to_string());
    format!("{}-{original}", &digest[..PREFIX_LEN])
}

/// Copy `file_path` into `uploads_dir` under a unique name. The import
/// consumes (deletes) the staged copy, never the caller's file.
pub fn stage(file_path: &Path, uploads_dir: &Path) -> Result<PathBuf> {
    ensure_csv(file_path)?;
    std::fs::create_dir_all(uploads_dir)?;
    let data = std::fs::read(file_path)?;
    let staged = uploads_dir.join(staged_name(file_path, &data));
    std::fs::write(&staged, &data)?;
    info!("staged {} as {}", file_path.display(), staged.display());
    Ok(staged)
}
