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

pub mod defaults;

use std::sync::LazyLock;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::{commands::GlobalArgs, global::defaults::DEFAULT_VERBOSITY};

pub struct GlobalOpts {
    pub verbosity: u32,
}

impl Default for GlobalOpts {
    fn default() -> Self {
        Self {
            verbosity: DEFAULT_VERBOSITY,
        }
    }
}

pub static GLOBAL_OPTS: LazyLock<RwLock<Option<GlobalOpts>>> =
    LazyLock::new(|| RwLock::new(Some(GlobalOpts::default())));

pub fn set_global_opts_with_args(global_args: &GlobalArgs) {
    let verbosity = if global_args.quiet {
        0
    } else if let Some(v) = global_args.verbosity {
        v.min(defaults::MAX_VERBOSITY)
    } else {
        DEFAULT_VERBOSITY
    };

    let mut opts_guard = GLOBAL_OPTS.write();
    *opts_guard = Some(GlobalOpts { verbosity });
}

pub fn global_opts() -> RwLockReadGuard<'static, Option<GlobalOpts>> {
    GLOBAL_OPTS.read()
}

/// Current verbosity level.
pub fn verbosity() -> u32 {
    global_opts()
        .as_ref()
        .map_or(DEFAULT_VERBOSITY, |opts| opts.verbosity)
}
