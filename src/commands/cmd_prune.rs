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

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Args;
use colored::Colorize;

use crate::{ui, utils};

use super::GlobalArgs;

#[derive(Args, Debug)]
#[clap(
    about = "Delete the backups the policy does not keep",
    long_about = "Apply the retention policy to a backup directory and delete every backup it does not keep."
)]
pub struct CmdArgs {
    /// Backup directory or its geobrs.toml [default: current directory]
    pub path: Option<PathBuf>,

    /// Dry run. Displays what this command would delete without
    /// deleting anything.
    #[clap(long, default_value_t = false)]
    pub dry_run: bool,

    /// Do not ask for confirmation
    #[clap(short = 'y', long, default_value_t = false)]
    pub yes: bool,
}

pub fn run(global_args: &GlobalArgs, args: &CmdArgs) -> Result<()> {
    run_at(global_args, args, Local::now()).map(|_| ())
}

/// Runs the command as if the current time was `now`. Returns the number of
/// deleted backups.
pub fn run_at(global_args: &GlobalArgs, args: &CmdArgs, now: DateTime<Local>) -> Result<usize> {
    let plan = super::make_plan(global_args, args.path.as_deref(), now)?;
    super::print_plan(&plan);

    let to_delete = &plan.partition.delete;
    let summary = format!(
        "{} ({})",
        utils::format_count(to_delete.len(), "backup", "backups"),
        utils::format_size(plan.partition.delete_size())
    );

    if to_delete.is_empty() {
        ui::cli::log!("Nothing to delete");
        return Ok(0);
    }

    if args.dry_run {
        ui::cli::log!("{} This would delete {}", "[DRY RUN]".bold().purple(), summary);
        return Ok(0);
    }

    if !args.yes && !ui::cli::confirm(&format!("Delete {}?", summary))? {
        ui::cli::log!("Aborted");
        return Ok(0);
    }

    let start = Instant::now();
    for backup in to_delete {
        remove_backup(&backup.path)?;
        ui::cli::verbose_1!("{} {}", "Deleted".red(), backup.path.display());
    }

    ui::cli::log!(
        "Deleted {} in {}",
        summary,
        utils::pretty_print_duration(start.elapsed())
    );

    Ok(to_delete.len())
}

fn remove_backup(path: &Path) -> Result<()> {
    let metadata = std::fs::symlink_metadata(path)
        .with_context(|| format!("Could not stat {}", path.display()))?;

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    result.with_context(|| format!("Could not delete {}", path.display()))
}
