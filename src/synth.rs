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

//! Pitch variant synthesis.
//!
//! Every instrument sound is rendered three times: two octaves down, as is, and two
//! octaves up. Pitch is changed by reinterpreting the sample rate and resampling
//! back, so timbre shifts along with pitch.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::audio::{self, AudioError, Clip};

/// One of the three renditions of an instrument sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    Lower,
    Default,
    Higher,
}

impl Variant {
    /// All variants, lowest first.
    pub const ALL: [Variant; 3] = [Variant::Lower, Variant::Default, Variant::Higher];

    /// Playback speed factor applied to the source sound.
    pub fn speed(self) -> f64 {
        match self {
            Variant::Lower => 0.25,
            Variant::Default => 1.0,
            Variant::Higher => 4.0,
        }
    }

    /// Suffix appended to the instrument identifier in the resource key.
    pub fn suffix(self) -> &'static str {
        match self {
            Variant::Lower => "_-1",
            Variant::Default => "",
            Variant::Higher => "_1",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Lower => write!(f, "lower"),
            Variant::Default => write!(f, "default"),
            Variant::Higher => write!(f, "higher"),
        }
    }
}

/// The three encoded Ogg Vorbis payloads for one instrument.
#[derive(Debug, Clone)]
pub struct PitchVariants {
    pub lower: Vec<u8>,
    pub default: Vec<u8>,
    pub higher: Vec<u8>,
}

impl PitchVariants {
    /// Consumes the variants, yielding each payload with its variant, lowest first.
    pub fn into_payloads(self) -> impl Iterator<Item = (Variant, Vec<u8>)> {
        [
            (Variant::Lower, self.lower),
            (Variant::Default, self.default),
            (Variant::Higher, self.higher),
        ]
        .into_iter()
    }
}

/// Something that can turn a sound file into its three pitch variants.
///
/// A missing file must be reported as [`AudioError::NotFound`]; the assembler skips
/// those instruments instead of aborting.
pub trait Synthesize {
    fn synthesize(&self, path: &Path) -> Result<PitchVariants, AudioError>;
}

/// Decodes, speed-shifts and Vorbis-encodes sound files. Nothing is cached: every
/// call decodes the file again.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    quality: f32,
}

impl Synthesizer {
    /// Creates a synthesizer encoding at the given Vorbis quality.
    pub fn new(quality: f32) -> Synthesizer {
        Synthesizer { quality }
    }

    fn render(&self, clip: &Clip, variant: Variant) -> Result<Vec<u8>, AudioError> {
        let encoded = if variant == Variant::Default {
            audio::encode_ogg(clip, self.quality)?
        } else {
            audio::encode_ogg(&clip.change_speed(variant.speed())?, self.quality)?
        };
        debug!(%variant, bytes = encoded.len(), "Rendered variant");
        Ok(encoded)
    }
}

impl Synthesize for Synthesizer {
    fn synthesize(&self, path: &Path) -> Result<PitchVariants, AudioError> {
        let clip = audio::decode_file(path)?;
        Ok(PitchVariants {
            lower: self.render(&clip, Variant::Lower)?,
            default: self.render(&clip, Variant::Default)?,
            higher: self.render(&clip, Variant::Higher)?,
        })
    }
}
