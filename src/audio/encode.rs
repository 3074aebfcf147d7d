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
use std::num::{NonZeroU32, NonZeroU8};

use vorbis_rs::{VorbisBitrateManagementStrategy, VorbisEncoderBuilder};

use super::error::AudioError;
use super::Clip;

/// Frames handed to the encoder per call.
const ENCODE_BLOCK_SIZE: usize = 4096;

/// Encodes a clip as Ogg Vorbis in memory using quality-based VBR.
pub fn encode_ogg(clip: &Clip, quality: f32) -> Result<Vec<u8>, AudioError> {
    let sample_rate = NonZeroU32::new(clip.sample_rate())
        .ok_or(AudioError::InvalidSampleRate(clip.sample_rate()))?;
    let channels = u8::try_from(clip.channel_count())
        .ok()
        .and_then(NonZeroU8::new)
        .ok_or(AudioError::UnsupportedChannels(clip.channel_count()))?;

    let mut ogg = Vec::new();
    {
        let mut encoder = VorbisEncoderBuilder::new(sample_rate, channels, &mut ogg)?
            .bitrate_management_strategy(VorbisBitrateManagementStrategy::QualityVbr {
                target_quality: quality,
            })
            .build()?;

        let frames = clip.frames();
        for start in (0..frames).step_by(ENCODE_BLOCK_SIZE) {
            let end = (start + ENCODE_BLOCK_SIZE).min(frames);
            let block: Vec<&[f32]> = clip.channels().iter().map(|ch| &ch[start..end]).collect();
            encoder.encode_audio_block(&block)?;
        }
        encoder.finish()?;
    }

    Ok(ogg)
}
