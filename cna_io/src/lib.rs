//! Single-file persistence for the expression matrix container.
#![deny(missing_docs)]

use anyhow::{ensure, Context, Result};
use cna_types::ExpressionMatrix;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

// Magic bytes plus a format version, checked on load so a stale or foreign
// file fails with a clear message instead of a decode error.
const CONTAINER_MAGIC: &[u8; 8] = b"CNAMAT\x00\x01";

/// Load an expression container from `path`.
pub fn load(path: &Path) -> Result<ExpressionMatrix> {
    let file = File::open(path).with_context(|| format!("while opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut magic = [0u8; 8];
    reader
        .read_exact(&mut magic)
        .with_context(|| format!("while reading {}", path.display()))?;
    ensure!(
        &magic == CONTAINER_MAGIC,
        "{} is not an expression container file (bad magic)",
        path.display()
    );
    let matrix: ExpressionMatrix = bincode::deserialize_from(reader)
        .with_context(|| format!("while decoding {}", path.display()))?;
    matrix
        .validate()
        .with_context(|| format!("{} holds an inconsistent container", path.display()))?;
    Ok(matrix)
}

/// Save an expression container to `path`, including any annotation-table
/// mutations made since it was loaded.
pub fn save(matrix: &ExpressionMatrix, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("while creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(CONTAINER_MAGIC)?;
    bincode::serialize_into(&mut writer, matrix)
        .with_context(|| format!("while encoding {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
