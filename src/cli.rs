use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize CSV exports: encoding, column order, and text content", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert CSV files with unknown encoding to UTF-8
    Convert(ConvertArgs),
    /// Reorder question group columns so each row's questions are in canonical order
    Reorder(ReorderArgs),
    /// Apply the replacement rule list to one or more files
    Replace(ReplaceArgs),
    /// Manage the persistent replacement rule list
    Rules(RulesArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// One or more CSV files to convert
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// Output file (single input only; defaults to `utf8-<name>` next to the input)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Directory for derived output names
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Encoding assumed when detection is inconclusive (defaults to shift_jis)
    #[arg(long = "fallback-encoding")]
    pub fallback_encoding: Option<String>,
    /// Detection confidence below this threshold switches to the fallback encoding
    #[arg(long = "min-confidence", default_value_t = 0.2)]
    pub min_confidence: f32,
    /// Do not write a UTF-8 byte order mark
    #[arg(long = "no-bom")]
    pub no_bom: bool,
    /// Replacement rule file to apply after conversion
    #[arg(long = "rules")]
    pub rules: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReorderArgs {
    /// One or more CSV files to reorder
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// Output file (single input only; defaults to `sorted-<name>` next to the input)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Directory for derived output names
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Encoding assumed when detection is inconclusive (defaults to shift_jis)
    #[arg(long = "fallback-encoding")]
    pub fallback_encoding: Option<String>,
    /// Detection confidence below this threshold switches to the fallback encoding
    #[arg(long = "min-confidence", default_value_t = 0.2)]
    pub min_confidence: f32,
    /// Do not write a UTF-8 byte order mark
    #[arg(long = "no-bom")]
    pub no_bom: bool,
    /// Replacement rule file to apply after reordering
    #[arg(long = "rules")]
    pub rules: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReplaceArgs {
    /// One or more files to process
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// Output file (single input only; defaults to `replaced-<name>` next to the input)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Directory for derived output names
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Replacement rule file (JSON)
    #[arg(short = 'r', long = "rules")]
    pub rules: PathBuf,
    /// Encoding assumed when detection is inconclusive (defaults to shift_jis)
    #[arg(long = "fallback-encoding")]
    pub fallback_encoding: Option<String>,
    /// Detection confidence below this threshold switches to the fallback encoding
    #[arg(long = "min-confidence", default_value_t = 0.2)]
    pub min_confidence: f32,
    /// Do not write a UTF-8 byte order mark
    #[arg(long = "no-bom")]
    pub no_bom: bool,
}

#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Replacement rule file (JSON); created on the first mutation
    #[arg(short = 'r', long = "rules")]
    pub rules: PathBuf,
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// Show the rule list in application order
    List,
    /// Add a rule; it is appended enabled at the end of the list
    Add {
        /// Text to search for (trimmed; must be unique among rules)
        search: String,
        /// Replacement text; omit to delete occurrences
        #[arg(default_value = "")]
        replace: String,
    },
    /// Rewrite an existing rule's search and replacement text
    Update {
        /// Rule id as shown by `rules list`
        id: String,
        search: String,
        #[arg(default_value = "")]
        replace: String,
    },
    /// Delete a rule; remaining rules are renumbered
    Remove {
        /// Rule id as shown by `rules list`
        id: String,
    },
    /// Flip one rule between enabled and disabled
    Toggle {
        /// Rule id as shown by `rules list`
        id: String,
    },
    /// Enable every rule
    EnableAll,
    /// Disable every rule
    DisableAll,
    /// Move a rule from one position to another (0-based)
    Move { from: usize, to: usize },
    /// Delete every rule
    Clear,
}
