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

/// Name of the policy file expected in the backup directory.
pub const CONFIG_FILE_NAME: &str = "geobrs.toml";

// Display
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

pub const DEFAULT_VERBOSITY: u32 = 1;
pub const MAX_VERBOSITY: u32 = 3;
