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
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

use super::error::AudioError;

/// Input block size for the sinc resampler.
const INPUT_BLOCK_SIZE: usize = 1024;

fn sinc_params() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        oversampling_factor: 128,
        interpolation: SincInterpolationType::Linear,
        window: WindowFunction::BlackmanHarris2,
    }
}

/// Append the first `frames` frames of each scratch channel to the output.
fn push_planar(output: &mut [Vec<f32>], scratch: &[Vec<f32>], frames: usize) {
    for (out, produced) in output.iter_mut().zip(scratch.iter()) {
        out.extend_from_slice(&produced[..frames.min(produced.len())]);
    }
}

/// Resamples planar audio held entirely in memory from `source_rate` to `target_rate`.
///
/// The result has `round(frames * target_rate / source_rate)` frames per channel with
/// the resampler's delay removed, so it lines up with the input.
pub fn resample(
    input: &[Vec<f32>],
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<Vec<f32>>, AudioError> {
    let frames = input.first().map(Vec::len).unwrap_or(0);
    if source_rate == target_rate || frames == 0 {
        return Ok(input.to_vec());
    }

    let num_channels = input.len();
    let ratio = target_rate as f64 / source_rate as f64;
    let expected = (frames as f64 * ratio).round() as usize;

    let mut resampler =
        SincFixedIn::<f32>::new(ratio, 1.0, sinc_params(), INPUT_BLOCK_SIZE, num_channels)
            .map_err(|_e| AudioError::ResamplingFailed(source_rate, target_rate))?;
    let delay = resampler.output_delay();
    let mut scratch = resampler.output_buffer_allocate(true);
    let mut output = vec![Vec::with_capacity(expected + delay); num_channels];

    debug!(
        source_rate,
        target_rate,
        frames,
        channels = num_channels,
        "Resampling clip"
    );

    // Full blocks.
    let mut position = 0;
    while frames - position >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let block: Vec<&[f32]> = input
            .iter()
            .map(|ch| &ch[position..position + needed])
            .collect();
        let (nbr_in, nbr_out) = resampler
            .process_into_buffer(&block, &mut scratch, None)
            .map_err(|_e| AudioError::ResamplingFailed(source_rate, target_rate))?;
        position += nbr_in;
        push_planar(&mut output, &scratch, nbr_out);
    }

    // Whatever is left over.
    if position < frames {
        let block: Vec<&[f32]> = input.iter().map(|ch| &ch[position..]).collect();
        let (_nbr_in, nbr_out) = resampler
            .process_partial_into_buffer(Some(block.as_slice()), &mut scratch, None)
            .map_err(|_e| AudioError::ResamplingFailed(source_rate, target_rate))?;
        push_planar(&mut output, &scratch, nbr_out);
    }

    // Flush the delay line until the tail of the signal has come out.
    while output[0].len() < expected + delay {
        let (_nbr_in, nbr_out) = resampler
            .process_partial_into_buffer(None::<&[Vec<f32>]>, &mut scratch, None)
            .map_err(|_e| AudioError::ResamplingFailed(source_rate, target_rate))?;
        if nbr_out == 0 {
            break;
        }
        push_planar(&mut output, &scratch, nbr_out);
    }

    for channel in output.iter_mut() {
        channel.drain(..delay.min(channel.len()));
        channel.resize(expected, 0.0);
    }

    Ok(output)
}
