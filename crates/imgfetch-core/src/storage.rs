//! Output directory and file persistence.
//!
//! Files are written to a `.part` sibling first and renamed onto the final
//! name, so a failed write never leaves a truncated image under a real name.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ImgFetchError;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `cat.png` → `cat.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Creates `dir` (and parents) if absent. Idempotent.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ImgFetchError> {
    fs::create_dir_all(dir).map_err(|source| ImgFetchError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes `bytes` to `dir/filename`, replacing any existing file of that name.
///
/// `filename` must already be sanitized (no path separators).
/// Returns the final path.
pub fn write_image(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    let final_path = dir.join(filename);
    let tmp = temp_path(&final_path);

    let result = write_then_rename(&tmp, &final_path, bytes);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result?;
    Ok(final_path)
}

fn write_then_rename(tmp: &Path, final_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(tmp)
        .with_context(|| format!("failed to create temp file: {}", tmp.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to sync {}", tmp.display()))?;
    drop(file);

    fs::rename(tmp, final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            tmp.display(),
            final_path.display()
        )
    })
}
