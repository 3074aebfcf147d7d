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

//! Builds Minecraft resource packs that give note blocks custom instrument sounds.
//!
//! The source is either a Note Block Studio song, whose custom instruments are
//! looked up in the Note Block Studio sound directory, or a directory of sound
//! files. Every instrument is rendered at three pitches and packed under the
//! `minecraft:block/note_block` sound namespace.
//!
//! The library logs through `tracing` and never installs a subscriber; hosts
//! choose where log lines go.

pub mod assemble;
pub mod audio;
pub mod config;
pub mod error;
pub mod generate;
pub mod instruments;
pub mod pack;
pub mod sanitize;
pub mod song;
pub mod synth;
mod util;

#[cfg(test)]
mod testutil;

pub use assemble::{assemble, Progress, Skipped};
pub use config::{ConfigError, Settings};
pub use error::{GenerateError, SkipReason};
pub use generate::{generate_pack, Summary};
pub use instruments::{Instrument, Instruments};
pub use pack::{ResourceKey, ResourcePack};
pub use sanitize::sanitize;
pub use synth::{Synthesize, Synthesizer, Variant};
