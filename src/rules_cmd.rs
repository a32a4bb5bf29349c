//! The `rules` subcommand family: inspecting and mutating the rule list.
//!
//! Every successful mutation is followed by a save, so the on-disk file
//! never lags the list the next command will load.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::{RulesArgs, RulesCommand},
    rules::RuleBook,
    table,
};

pub fn execute(args: &RulesArgs) -> Result<()> {
    let mut book = RuleBook::load_or_default(&args.rules)
        .with_context(|| format!("Loading rules from {:?}", args.rules))?;

    match &args.command {
        RulesCommand::List => {
            if book.is_empty() {
                info!("No rules in {:?}", args.rules);
            } else {
                table::print_rules(&book);
            }
            return Ok(());
        }
        RulesCommand::Add { search, replace } => {
            let id = book.add(search, replace)?;
            info!("Added rule {id} ('{}' -> '{replace}')", search.trim());
        }
        RulesCommand::Update {
            id,
            search,
            replace,
        } => {
            book.update(id, search, replace)?;
            info!("Updated rule {id}");
        }
        RulesCommand::Remove { id } => {
            let removed = book.remove(id)?;
            info!("Removed rule {id} ('{}')", removed.search_text);
        }
        RulesCommand::Toggle { id } => {
            let enabled = book.toggle(id)?;
            info!(
                "Rule {id} is now {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        RulesCommand::EnableAll => {
            book.set_all_enabled(true);
            info!("Enabled {} rule(s)", book.len());
        }
        RulesCommand::DisableAll => {
            book.set_all_enabled(false);
            info!("Disabled {} rule(s)", book.len());
        }
        RulesCommand::Move { from, to } => {
            book.move_rule(*from, *to)?;
            info!("Moved rule from position {from} to {to}");
        }
        RulesCommand::Clear => {
            let count = book.len();
            book.clear();
            info!("Cleared {count} rule(s)");
        }
    }

    book.save(&args.rules)
        .with_context(|| format!("Saving rules to {:?}", args.rules))
}
