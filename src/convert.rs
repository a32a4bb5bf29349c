//! Batch encoding normalization: unknown-encoding CSV in, UTF-8 out.

use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use log::{info, warn};

use crate::{cli::ConvertArgs, encoding, io_utils, replace, rules::RuleBook};

pub fn execute(args: &ConvertArgs) -> Result<()> {
    let fallback =
        io_utils::resolve_encoding(args.fallback_encoding.as_deref(), encoding::default_fallback())?;
    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output accepts a single input; use --output-dir for batches");
    }
    let book = match &args.rules {
        Some(path) => {
            Some(RuleBook::load(path).with_context(|| format!("Loading rules from {path:?}"))?)
        }
        None => None,
    };

    // Files are processed strictly sequentially; one bad file never
    // discards the batch's earlier results.
    let mut failures = 0usize;
    for input in &args.inputs {
        if let Err(err) = convert_file(input, args, fallback, book.as_ref()) {
            warn!("Failed to convert '{}': {err:#}", input.display());
            failures += 1;
        }
    }
    if failures > 0 {
        bail!("{failures} of {} file(s) failed", args.inputs.len());
    }
    Ok(())
}

fn convert_file(
    input: &Path,
    args: &ConvertArgs,
    fallback: &'static Encoding,
    book: Option<&RuleBook>,
) -> Result<()> {
    let bytes = io_utils::read_bytes(input)?;
    let decoded = encoding::detect_and_decode(&bytes, fallback, args.min_confidence)
        .with_context(|| format!("Decoding {input:?}"))?;
    let was_utf8 = decoded.was_utf8();
    let encoding_name = decoded.encoding.name().to_ascii_lowercase();
    let confidence = decoded.confidence;

    let mut content = decoded.text;
    if let Some(book) = book {
        let (replaced, stats) = replace::apply_rules(&content, book.rules());
        if stats.total_replacements > 0 {
            info!(
                "Applied {} replacement(s) across {} rule(s)",
                stats.total_replacements,
                stats.applied.len()
            );
        }
        content = replaced;
    }

    let output = io_utils::resolve_output_path(
        input,
        args.output.as_deref(),
        args.output_dir.as_deref(),
        "utf8-",
    )?;
    io_utils::write_text(&output, &content, !args.no_bom)?;

    if was_utf8 {
        info!(
            "'{}' was already UTF-8 -> '{}'",
            input.display(),
            output.display()
        );
    } else {
        info!(
            "Converted '{}' ({encoding_name}, confidence {confidence:.1}) -> '{}'",
            input.display(),
            output.display()
        );
    }
    Ok(())
}
