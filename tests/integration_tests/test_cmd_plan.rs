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
    use std::path::PathBuf;

    use anyhow::Result;
    use geobrs::{
        commands::cmd_plan,
        global::defaults::CONFIG_FILE_NAME,
        retention::{Backup, RetentionError},
    };
    use tempfile::tempdir;

    use crate::{
        integration_tests::{DELETED, KEPT, populate, quiet_global},
        test_utils::{DAY, test_now, write_config},
    };

    fn sorted_names(backups: &[Backup]) -> Vec<String> {
        let mut names: Vec<String> = backups
            .iter()
            .map(|b| b.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_plan_splits_backups() -> Result<()> {
        let tmp = tempdir()?;
        populate(tmp.path())?;

        let args = cmd_plan::CmdArgs {
            path: Some(tmp.path().to_path_buf()),
            json: false,
        };
        let partition = cmd_plan::run_at(&quiet_global(None), &args, test_now())?;

        assert_eq!(sorted_names(&partition.keep), KEPT);
        assert_eq!(sorted_names(&partition.delete), DELETED);

        // Directory sizes are measured recursively
        assert!(partition.keep.iter().all(|b| b.size == 100));

        // Planning never deletes
        for name in KEPT.iter().chain(DELETED.iter()) {
            assert!(tmp.path().join(name).exists());
        }

        Ok(())
    }

    #[test]
    fn test_plan_accepts_config_file_path() -> Result<()> {
        let tmp = tempdir()?;
        populate(tmp.path())?;

        let args = cmd_plan::CmdArgs {
            path: Some(tmp.path().join(CONFIG_FILE_NAME)),
            json: true,
        };
        let partition = cmd_plan::run_at(&quiet_global(None), &args, test_now())?;

        assert_eq!(sorted_names(&partition.keep), KEPT);
        Ok(())
    }

    #[test]
    fn test_plan_with_explicit_config() -> Result<()> {
        let tmp = tempdir()?;
        populate(tmp.path())?;

        // Keep everything newer than ten days
        let config_path: PathBuf = tmp.path().join("other-policy.toml");
        write_config(
            &config_path,
            "select = \"backup-*\"\n[keep_first]\nage = \"10d\"\n[keep_dynamic]\ncount = 0\n",
        )?;

        let args = cmd_plan::CmdArgs {
            path: Some(tmp.path().to_path_buf()),
            json: false,
        };
        let partition =
            cmd_plan::run_at(&quiet_global(Some(&config_path)), &args, test_now())?;

        let cutoff = test_now() - chrono::TimeDelta::seconds(10 * DAY);
        assert!(partition.keep.iter().all(|b| b.date > cutoff));
        assert_eq!(
            sorted_names(&partition.keep),
            ["backup-a", "backup-b", "backup-c", "backup-d", "backup-e", "backup-f"]
        );
        assert_eq!(sorted_names(&partition.delete), ["backup-g", "backup-h"]);
        Ok(())
    }

    #[test]
    fn test_plan_reports_conflicts() -> Result<()> {
        let tmp = tempdir()?;
        populate(tmp.path())?;
        write_config(
            &tmp.path().join(CONFIG_FILE_NAME),
            "select = \"*\"\n[keep_first]\ncount = 10\n[discard_last]\ncount = 2\n",
        )?;

        let args = cmd_plan::CmdArgs {
            path: Some(tmp.path().to_path_buf()),
            json: false,
        };
        let err = cmd_plan::run_at(&quiet_global(None), &args, test_now()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RetentionError>(),
            Some(RetentionError::ConfigurationConflict(_))
        ));
        Ok(())
    }

    #[test]
    fn test_plan_without_config_fails() -> Result<()> {
        let tmp = tempdir()?;
        let args = cmd_plan::CmdArgs {
            path: Some(tmp.path().to_path_buf()),
            json: false,
        };
        assert!(cmd_plan::run_at(&quiet_global(None), &args, test_now()).is_err());
        Ok(())
    }
}
