pub mod calendars;
pub mod check;
pub mod events;
pub mod lock;
pub mod open;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// `(slug, path)` of every details document in `data_dir`, sorted, minus the
/// reserved template. `only` narrows it to one slug, which must exist.
pub fn details_files(
    data_dir: &Path,
    reserved_slug: &str,
    only: Option<&str>,
) -> Result<Vec<(String, PathBuf)>> {
    let mut files: Vec<(String, PathBuf)> = std::fs::read_dir(data_dir)
        .with_context(|| format!("Could not read data directory {}", data_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| Some((path.file_stem()?.to_str()?.to_string(), path)))
        .filter(|(slug, _)| slug != reserved_slug)
        .collect();
    files.sort();

    match only {
        Some(slug) => match files.into_iter().find(|(s, _)| s == slug) {
            Some(file) => Ok(vec![file]),
            None => anyhow::bail!("No details found for '{}' in {}", slug, data_dir.display()),
        },
        None => Ok(files),
    }
}
