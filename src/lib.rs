pub mod cli;
pub mod convert;
pub mod encoding;
pub mod groups;
pub mod io_utils;
pub mod layout;
pub mod reorder;
pub mod replace;
pub mod rules;
pub mod rules_cmd;
pub mod serialize;
pub mod table;
pub mod tokenize;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_normalizer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => convert::execute(&args),
        Commands::Reorder(args) => reorder::execute(&args),
        Commands::Replace(args) => replace::execute(&args),
        Commands::Rules(args) => rules_cmd::execute(&args),
    }
}
