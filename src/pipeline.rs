//! End-to-end runs over files: table → Turtle, Turtle → view page.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{KgError, Result};
use crate::graph::{materialize, MaterializeOptions, MaterializeReport, Vocabulary};
use crate::ingest::read_articles;
use crate::rdf::Turtle;
use crate::views::{build_views, render_page};

/// Compute SHA256 hash of bytes as lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Write `contents` to a `.tmp` sibling and rename it over `path`, so a failed
/// run never leaves a truncated file behind. The sibling is removed on failure.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    let result = write_and_rename(&temp_path, path, contents);
    if let Err(e) = &result {
        log::warn!("Failed to write {}: {}", path.display(), e);
        if let Err(cleanup) = std::fs::remove_file(&temp_path) {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove {}: {}", temp_path.display(), cleanup);
            }
        }
    }
    result
}

fn write_and_rename(temp_path: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    let file = File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents)?;
    writer.flush()?;
    drop(writer);

    std::fs::rename(temp_path, path)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read the article table at `input`, materialize it and write Turtle to `output`.
pub fn materialize_file(
    input: &Path,
    output: &Path,
    options: &MaterializeOptions,
) -> Result<MaterializeReport> {
    let records = read_articles(input)?;
    let materialized = materialize(&records, options)?;

    let turtle = Turtle::to_string(&materialized.graph, &materialized.namespace)?;
    write_atomic(output, turtle.as_bytes())?;

    log::info!(
        "Wrote {} ({} bytes, sha256 {})",
        output.display(),
        turtle.len(),
        sha256_hex(turtle.as_bytes())
    );
    Ok(materialized.report)
}

/// Re-read the Turtle graph at `turtle_path` and write the standard views page.
/// Returns the number of views rendered.
pub fn render_views_file(turtle_path: &Path, html_path: &Path, vocab: &Vocabulary) -> Result<usize> {
    let file = File::open(turtle_path).map_err(KgError::Io)?;
    let graph = Turtle::read(file)?;
    log::info!("Loaded {} statements from {}", graph.len(), turtle_path.display());

    let views = build_views(&graph, vocab);
    let page = render_page(&views)?;
    write_atomic(html_path, page.as_bytes())?;

    log::info!("Wrote {} views to {}", views.len(), html_path.display());
    Ok(views.len())
}
