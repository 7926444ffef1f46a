//! Staging of the output folder before a run

use anyhow::{bail, Context, Result};
use glob::Pattern;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::options::OutputOptions;

/// Glob matching every unit these options can produce
pub fn output_pattern(output: &OutputOptions) -> String {
    let name = format!(
        "{}*{}.{}",
        Pattern::escape(&output.prefix),
        Pattern::escape(&output.postfix),
        Pattern::escape(&output.file_ext)
    );
    output.dest_folder.join(name).to_string_lossy().into_owned()
}

/// Delete existing `prefix*postfix.ext` files in the destination folder.
/// Returns the number of files deleted.
pub fn clean_output(output: &OutputOptions) -> Result<usize> {
    let pattern = output_pattern(output);
    let mut deleted = 0;

    for entry in glob::glob(&pattern).with_context(|| format!("Invalid output pattern: {}", pattern))? {
        let path = entry.context("Failed to read output folder entry")?;
        if !path.is_file() {
            continue;
        }
        fs::remove_file(&path).with_context(|| format!("Failed to delete {:?}", path))?;
        debug!("Deleted {}", path.display());
        deleted += 1;
    }

    Ok(deleted)
}

/// Remove the destination folder and everything in it.
///
/// Refuses to remove the working directory itself.
pub fn remove_dest_folder(output: &OutputOptions) -> Result<bool> {
    let dir = &output.dest_folder;
    if is_current_dir(dir) {
        bail!("Refusing to remove the current directory {:?}", dir);
    }
    if !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(dir).with_context(|| format!("Failed to remove folder {:?}", dir))?;
    debug!("Removed folder {}", dir.display());
    Ok(true)
}

fn is_current_dir(dir: &Path) -> bool {
    if dir.as_os_str().is_empty() || dir == Path::new(".") {
        return true;
    }
    match (dir.canonicalize(), std::env::current_dir()) {
        (Ok(dir), Ok(cwd)) => dir == cwd,
        _ => false,
    }
}
