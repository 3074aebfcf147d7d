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

//! Audio primitives: decoding files into memory, resampling and Ogg Vorbis encoding.
//!
//! Clips are held in planar format: one Vec per channel, all the same length.

use std::time::Duration;

pub mod decode;
pub mod encode;
pub mod error;
pub mod resample;

pub use decode::decode_file;
pub use encode::encode_ogg;
pub use error::AudioError;
pub use resample::resample;

/// A fully decoded audio clip in planar format.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl Clip {
    /// Creates a clip from planar channels. Channels are truncated to the shortest one.
    pub fn new(mut channels: Vec<Vec<f32>>, sample_rate: u32) -> Clip {
        let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
        for channel in channels.iter_mut() {
            channel.truncate(frames);
        }
        Clip {
            channels,
            sample_rate,
        }
    }

    /// The planar sample data.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Changes playback speed the way a tape would: the samples are treated as if
    /// they were recorded at `sample_rate * speed` and then resampled back to the
    /// original rate. Pitch and length change together.
    pub fn change_speed(&self, speed: f64) -> Result<Clip, AudioError> {
        // Truncation matches how the reinterpreted rate has always been computed.
        let reinterpreted = (self.sample_rate as f64 * speed) as u32;
        if reinterpreted == 0 || !speed.is_finite() {
            return Err(AudioError::InvalidSpeed {
                rate: self.sample_rate,
                speed,
            });
        }
        let channels = resample(&self.channels, reinterpreted, self.sample_rate)?;
        Ok(Clip::new(channels, self.sample_rate))
    }
}
