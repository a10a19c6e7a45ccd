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

#![cfg(test)]

mod tests {
    use anyhow::Result;
    use geobrs::{commands::cmd_prune, global::defaults::CONFIG_FILE_NAME};
    use tempfile::tempdir;

    use crate::{
        integration_tests::{DELETED, KEPT, populate, quiet_global},
        test_utils::{DAY, create_backup_file, set_age, test_now, write_config},
    };

    #[test]
    fn test_prune_deletes_unkept_backups() -> Result<()> {
        let tmp = tempdir()?;
        populate(tmp.path())?;

        let args = cmd_prune::CmdArgs {
            path: Some(tmp.path().to_path_buf()),
            dry_run: false,
            yes: true,
        };
        let deleted = cmd_prune::run_at(&quiet_global(None), &args, test_now())?;
        assert_eq!(deleted, DELETED.len());

        for name in KEPT {
            assert!(tmp.path().join(name).exists(), "{name} should be kept");
        }
        for name in DELETED {
            assert!(!tmp.path().join(name).exists(), "{name} should be deleted");
        }
        assert!(tmp.path().join("README").exists());
        assert!(tmp.path().join(CONFIG_FILE_NAME).exists());

        // A second run at the same time finds nothing else to delete
        let deleted = cmd_prune::run_at(&quiet_global(None), &args, test_now())?;
        assert_eq!(deleted, 0);

        Ok(())
    }

    #[test]
    fn test_prune_dry_run() -> Result<()> {
        let tmp = tempdir()?;
        populate(tmp.path())?;

        let args = cmd_prune::CmdArgs {
            path: Some(tmp.path().to_path_buf()),
            dry_run: true,
            yes: true,
        };
        let deleted = cmd_prune::run_at(&quiet_global(None), &args, test_now())?;
        assert_eq!(deleted, 0);

        for name in KEPT.iter().chain(DELETED.iter()) {
            assert!(tmp.path().join(name).exists());
        }
        Ok(())
    }

    #[test]
    fn test_prune_deletes_nothing_on_error() -> Result<()> {
        let tmp = tempdir()?;
        populate(tmp.path())?;
        write_config(
            &tmp.path().join(CONFIG_FILE_NAME),
            "select = \"backup-*\"\n[discard_last]\ncount = -1\n",
        )?;

        let args = cmd_prune::CmdArgs {
            path: Some(tmp.path().to_path_buf()),
            dry_run: false,
            yes: true,
        };
        assert!(cmd_prune::run_at(&quiet_global(None), &args, test_now()).is_err());

        for name in KEPT.iter().chain(DELETED.iter()) {
            assert!(tmp.path().join(name).exists());
        }
        Ok(())
    }

    #[test]
    fn test_prune_never_deletes_custom_config() -> Result<()> {
        let tmp = tempdir()?;
        let root = tmp.path();
        create_backup_file(root, "backup-new", 100, DAY)?;
        create_backup_file(root, "backup-old", 100, 400 * DAY)?;

        // The policy file matches the pattern and is older than the discard age
        let config_path = root.join("policy.toml");
        write_config(&config_path, "select = \"*\"\n[discard_last]\nage = \"1y\"\n")?;
        set_age(&config_path, 500 * DAY)?;

        let args = cmd_prune::CmdArgs {
            path: Some(root.to_path_buf()),
            dry_run: false,
            yes: true,
        };
        let deleted = cmd_prune::run_at(&quiet_global(Some(&config_path)), &args, test_now())?;

        assert_eq!(deleted, 1);
        assert!(config_path.exists());
        assert!(root.join("backup-new").exists());
        assert!(!root.join("backup-old").exists());
        Ok(())
    }
}
