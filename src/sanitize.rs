// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("pattern is valid"));

/// Turns an instrument display name into an identifier that is safe to use in a
/// resource key. Every run of characters outside `[A-Za-z0-9_]` becomes a single
/// underscore and the result is lowercased.
///
/// An empty name produces `_`.
pub fn sanitize(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    UNSAFE_RUN.replace_all(name, "_").to_lowercase()
}
