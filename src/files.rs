//! Which files a run visits, and writing corrected files back.

use anyhow::{Context, Result};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Binary formats and dot-prefixed paths, always skipped.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "*.gif", "*.jpeg", "*.jpg", "*.bmp", "*.png", "*.exe", "*.dll", "*.webp", "*.pyc", "*.zip",
    "*.gz", ".*",
];

/// Files under `roots` in traversal order, minus anything matching the
/// default or `extra` ignore globs. Files named directly are always kept.
pub fn collect_files(roots: &[PathBuf], extra: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("File not found: {}", root.display());
        }

        let mut overrides = OverrideBuilder::new(root);
        for pattern in DEFAULT_IGNORE_PATTERNS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
        {
            overrides
                .add(&format!("!{}", pattern))
                .with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        }
        let overrides = overrides.build().context("Failed to build ignore patterns")?;

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true)
            .overrides(overrides)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if entry.file_type().is_some_and(|t| t.is_file()) {
                trace!("visiting {}", entry.path().display());
                files.push(entry.into_path());
            }
        }
    }

    debug!("{} files to check", files.len());
    Ok(files)
}

/// `path` relative to `base`, or as given when it lies elsewhere.
pub fn relative_name(path: &Path, base: &Path) -> String {
    if let Some(rel) = strip_base(path, base) {
        return rel;
    }
    if let (Ok(path), Ok(base)) = (path.canonicalize(), base.canonicalize()) {
        if let Some(rel) = strip_base(&path, &base) {
            return rel;
        }
    }
    path.display().to_string()
}

fn strip_base(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    (!rel.as_os_str().is_empty()).then(|| rel.display().to_string())
}

/// Replace the contents of `path` without leaving a half-written file
/// behind. The original file's permissions are kept.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    tmp.flush()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace file: {}", path.display()))?;
    Ok(())
}
