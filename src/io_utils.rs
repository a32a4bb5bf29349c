//! File plumbing: whole-file reads, UTF-8 output with an optional BOM,
//! derived output naming, and encoding-label resolution.
//!
//! Files are materialized in memory by design; the structural engine
//! needs the whole text to detect layout and reorder rows.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;

use crate::layout::BOM;

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Reading input file {path:?}"))
}

/// Writes `text` as UTF-8, prepending a BOM when asked for one and the
/// text does not already carry it.
pub fn write_text(path: &Path, text: &str, with_bom: bool) -> Result<()> {
    let mut data = Vec::with_capacity(text.len() + BOM.len_utf8());
    if with_bom && !text.starts_with(BOM) {
        let mut buffer = [0u8; 4];
        data.extend_from_slice(BOM.encode_utf8(&mut buffer).as_bytes());
    }
    data.extend_from_slice(text.as_bytes());
    fs::write(path, data).with_context(|| format!("Writing output file {path:?}"))
}

/// Resolves an encoding label via the WHATWG registry, like
/// `shift_jis`, `windows-1252`, or `utf-8`.
pub fn resolve_encoding(
    label: Option<&str>,
    default: &'static Encoding,
) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(default)
    }
}

/// Picks the output path for one input file.
///
/// An explicit `--output` wins (commands restrict it to single-input
/// runs). Otherwise the output keeps the input's file name with `prefix`
/// prepended, in `--output-dir` or next to the input.
pub fn resolve_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
    prefix: &str,
) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.to_path_buf());
    }
    let name = input
        .file_name()
        .ok_or_else(|| anyhow!("Input path {input:?} has no file name"))?;
    let file_name = format!("{prefix}{}", name.to_string_lossy());
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(file_name))
}
