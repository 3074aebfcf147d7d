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
use std::fmt;
use std::path::PathBuf;

use crate::audio::AudioError;
use crate::config::ConfigError;
use crate::pack::ExportError;
use crate::song::SongError;

/// Errors that abort a whole generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Source {0} is neither a directory nor a song file")]
    UnsupportedSource(PathBuf),

    #[error("Song error: {0}")]
    Song(#[from] SongError),

    #[error("Failed to process instrument '{name}': {source}")]
    Audio {
        name: String,
        #[source]
        source: AudioError,
    },

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an instrument was left out of the pack. These never abort a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The instrument declares no sound file.
    NoSoundFile,
    /// The sound file does not exist.
    SoundNotFound(PathBuf),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoSoundFile => write!(f, "no sound file"),
            SkipReason::SoundNotFound(path) => write!(
                f,
                "sound file {} not found",
                crate::util::filename_display(path)
            ),
        }
    }
}
