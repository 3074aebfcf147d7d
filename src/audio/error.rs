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
use std::path::PathBuf;

/// Error types for audio decode, resample and encode operations
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("IO error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Audio file error for {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error("No audio track found in {}", .0.display())]
    NoAudioTrack(PathBuf),

    #[error("Sample rate not specified in {}", .0.display())]
    MissingSampleRate(PathBuf),

    #[error("Invalid sample rate: {0}Hz")]
    InvalidSampleRate(u32),

    #[error("Speed {speed} turns a {rate}Hz clip into an invalid rate")]
    InvalidSpeed { rate: u32, speed: f64 },

    #[error("Resampling failed: {0}Hz -> {1}Hz")]
    ResamplingFailed(u32, u32),

    #[error("Unsupported channel count for encoding: {0}")]
    UnsupportedChannels(usize),

    #[error("Vorbis encoding failed: {0}")]
    Encode(#[from] vorbis_rs::VorbisError),
}

impl AudioError {
    /// Whether this error means the source file simply isn't there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AudioError::NotFound(_))
    }
}
