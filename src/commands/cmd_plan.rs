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

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::Args;

use crate::{retention::Partition, ui};

use super::GlobalArgs;

#[derive(Args, Debug)]
#[clap(
    about = "Show which backups the policy keeps and deletes",
    long_about = "Apply the retention policy to a backup directory and show the result without deleting anything."
)]
pub struct CmdArgs {
    /// Backup directory or its geobrs.toml [default: current directory]
    pub path: Option<PathBuf>,

    /// Print the plan as JSON
    #[clap(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(global_args: &GlobalArgs, args: &CmdArgs) -> Result<()> {
    run_at(global_args, args, Local::now()).map(|_| ())
}

/// Runs the command as if the current time was `now`.
pub fn run_at(global_args: &GlobalArgs, args: &CmdArgs, now: DateTime<Local>) -> Result<Partition> {
    let plan = super::make_plan(global_args, args.path.as_deref(), now)?;

    if args.json {
        ui::cli::log_always!("{}", serde_json::to_string_pretty(&plan.partition)?);
    } else {
        super::print_plan(&plan);
    }

    Ok(plan.partition)
}
