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

use std::path::Path;

use anyhow::Result;

use geobrs::{
    commands::GlobalArgs,
    global::{self, defaults::CONFIG_FILE_NAME},
};

use crate::test_utils::{DAY, create_backup_dir, create_backup_file, write_config};

mod test_cmd_plan;
mod test_cmd_prune;

const POLICY: &str = r#"
select = "backup-*"

[keep_first]
count = 1

[keep_dynamic]
count = 4

[discard_last]
age = "1y"
"#;

/// Global arguments with logging disabled.
fn quiet_global(config: Option<&Path>) -> GlobalArgs {
    let global = GlobalArgs {
        config: config.map(Path::to_path_buf),
        quiet: true,
        verbosity: None,
    };
    global::set_global_opts_with_args(&global);
    global
}

/// Populates `root` with eight backups, a policy file and an unrelated file.
///
/// With `POLICY`, `backup-a` is kept as the newest, `backup-h` is older than a
/// year and `backup-b`, `backup-e` and `backup-g` fill the dynamic budget.
fn populate(root: &Path) -> Result<()> {
    create_backup_dir(root, "backup-a", 100, DAY / 2)?;
    create_backup_dir(root, "backup-b", 100, DAY)?;
    create_backup_file(root, "backup-c", 100, 2 * DAY)?;
    create_backup_dir(root, "backup-d", 100, 3 * DAY)?;
    create_backup_file(root, "backup-e", 100, 5 * DAY)?;
    create_backup_dir(root, "backup-f", 100, 8 * DAY)?;
    create_backup_dir(root, "backup-g", 100, 30 * DAY)?;
    create_backup_file(root, "backup-h", 100, 400 * DAY)?;
    std::fs::write(root.join("README"), b"not a backup")?;
    write_config(&root.join(CONFIG_FILE_NAME), POLICY)?;
    Ok(())
}

const KEPT: [&str; 4] = ["backup-a", "backup-b", "backup-e", "backup-g"];
const DELETED: [&str; 4] = ["backup-c", "backup-d", "backup-f", "backup-h"];
