// Deployment artifact packaging.
//
// Lambda's `provided.al2023` runtime expects a zip whose entry point is an
// executable named `bootstrap`. A prebuilt `.zip` is passed through
// unchanged; a bare binary is wrapped here.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Load the deployable artifact as zip bytes.
pub fn artifact_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        bail!("Artifact not found: {}", path.display());
    }
    if path.extension().is_some_and(|ext| ext == "zip") {
        return fs::read(path)
            .with_context(|| format!("Failed to read artifact {}", path.display()));
    }
    zip_bootstrap(path)
}

fn zip_bootstrap(path: &Path) -> Result<Vec<u8>> {
    let binary = fs::read(path)
        .with_context(|| format!("Failed to read binary {}", path.display()))?;

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = ZipWriter::new(&mut buffer);
        // Must be executable or the runtime fails with Runtime.InvalidEntrypoint
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o755);
        writer
            .start_file("bootstrap", options)
            .context("Failed to start zip entry")?;
        writer
            .write_all(&binary)
            .context("Failed to write zip entry")?;
        writer.finish().context("Failed to finish zip archive")?;
    }
    Ok(buffer.into_inner())
}
