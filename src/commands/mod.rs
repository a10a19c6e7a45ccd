// geobrs is a geometric backup retention tool
// Copyright (C) 2025  Javier Lancha Vázquez <javier.lancha@gmail.com>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;

use crate::{
    config::Config,
    global::defaults::{CONFIG_FILE_NAME, DATE_FORMAT},
    inventory::{Inventory, LocalInventory},
    retention::{self, Backup, Partition},
    ui::{
        self,
        table::{Alignment, Table},
    },
    utils,
};

pub mod cmd_plan;
pub mod cmd_prune;

// CLI arguments
#[derive(Parser, Debug)]
#[clap(
    version = env!("CARGO_PKG_VERSION"), // Version from crate metadata
    about = "geobrs geometric backup retention tool",
)]
pub struct Cli {
    // Subcommand
    #[command(subcommand)]
    pub command: Command,

    // Global arguments
    #[clap(flatten)]
    pub global_args: GlobalArgs,
}

// List of commands
#[derive(Subcommand, Debug)]
pub enum Command {
    Plan(cmd_plan::CmdArgs),
    Prune(cmd_prune::CmdArgs),
}

#[derive(Parser, Debug)]
#[clap(group = ArgGroup::new("verbosity_group").multiple(false))]
pub struct GlobalArgs {
    /// Path to the policy file [default: <backup dir>/geobrs.toml]
    #[clap(short = 'c', long, value_parser, global = true)]
    pub config: Option<PathBuf>,

    /// Disable logging (verbosity = 0)
    #[clap(long, value_parser, group = "verbosity_group", global = true)]
    pub quiet: bool,

    /// Set the verbosity level [0-3]
    #[clap(short = 'v', long, value_parser, group = "verbosity_group", global = true)]
    pub verbosity: Option<u32>,
}

/// Backups of a directory split by the retention policy.
pub struct RetentionPlan {
    pub root: PathBuf,
    pub partition: Partition,
}

/// Resolves the backup directory from the path given on the command line.
/// The path can be the directory itself or its policy file.
pub(crate) fn resolve_root(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    if path.is_file() {
        if path.file_name().is_none_or(|name| name != CONFIG_FILE_NAME) {
            bail!(
                "{} is not a {} file nor a backup directory",
                path.display(),
                CONFIG_FILE_NAME
            );
        }
        let parent = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        return Ok(parent.to_path_buf());
    }

    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }

    Ok(path)
}

/// Loads the policy, scans the backup directory and solves the retention
/// policy at `now`.
pub(crate) fn make_plan(
    global_args: &GlobalArgs,
    path: Option<&Path>,
    now: DateTime<Local>,
) -> Result<RetentionPlan> {
    let root = resolve_root(path)?;
    let config_path = global_args
        .config
        .clone()
        .unwrap_or_else(|| root.join(CONFIG_FILE_NAME));

    let config = Config::load(&config_path)?;
    ui::cli::verbose_1!("Policy: {}", config_path.display());
    ui::cli::verbose_2!("{:#?}", config.policy);

    let inventory =
        LocalInventory::new(root.clone(), config.select.clone()).excluding(&config_path)?;
    let spinner = ui::spinner(format!("Measuring {}", inventory.root().display()));
    let backups = inventory.list();
    spinner.finish_and_clear();
    let backups = backups?;

    ui::cli::verbose_1!(
        "Found {} in {}",
        utils::format_count(backups.len(), "backup", "backups"),
        root.display()
    );

    let partition = retention::solve(&backups, &config.policy, now)?;

    Ok(RetentionPlan { root, partition })
}

/// Prints every backup, newest first, with its verdict, followed by a summary.
pub(crate) fn print_plan(plan: &RetentionPlan) {
    let partition = &plan.partition;

    let mut entries: Vec<(&Backup, bool)> = partition
        .keep
        .iter()
        .map(|b| (b, true))
        .chain(partition.delete.iter().map(|b| (b, false)))
        .collect();
    entries.sort_by(|a, b| b.0.date.cmp(&a.0.date));

    let mut table = Table::new_with_alignments(vec![
        Alignment::Left,
        Alignment::Left,
        Alignment::Right,
        Alignment::Left,
    ]);
    table.set_headers(vec![
        "Action".bold().to_string(),
        "Date".bold().to_string(),
        "Size".bold().to_string(),
        "Path".bold().to_string(),
    ]);

    for (backup, keep) in entries {
        let action = if keep {
            "keep".bold().green().to_string()
        } else {
            "delete".bold().red().to_string()
        };
        let name = backup
            .path
            .strip_prefix(&plan.root)
            .unwrap_or(&backup.path)
            .display()
            .to_string();

        table.add_row(vec![
            action,
            backup.date.format(DATE_FORMAT).to_string(),
            utils::format_size(backup.size),
            name,
        ]);
    }

    ui::cli::log!();
    ui::cli::log!("{}", table.render());

    let mut summary = Table::new_with_alignments(vec![
        Alignment::Left,
        Alignment::Right,
        Alignment::Right,
    ]);
    summary.add_row(vec![
        "Keep".bold().to_string(),
        utils::format_count(partition.keep.len(), "backup", "backups"),
        utils::format_size(partition.keep_size()),
    ]);
    summary.add_row(vec![
        "Delete".bold().to_string(),
        utils::format_count(partition.delete.len(), "backup", "backups"),
        utils::format_size(partition.delete_size()),
    ]);

    ui::cli::log!("{}", summary.render());
}

pub fn run(args: &Cli) -> Result<()> {
    match &args.command {
        Command::Plan(cmd_args) => cmd_plan::run(&args.global_args, cmd_args),
        Command::Prune(cmd_args) => cmd_prune::run(&args.global_args, cmd_args),
    }
}
