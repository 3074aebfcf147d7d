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
use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, warn};

use super::error::AudioError;
use super::Clip;

/// Decodes an entire audio file (WAV, MP3, Ogg Vorbis, FLAC, ...) into memory.
/// The format is detected from the content, with the extension as a hint.
///
/// A missing file is reported as [`AudioError::NotFound`] so callers can skip it.
pub fn decode_file(path: &Path) -> Result<Clip, AudioError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AudioError::NotFound(path.to_path_buf()),
        _ => AudioError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Create a hint to help the format registry guess the format
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let decode_error = |source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();
    let probed = get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(decode_error)?;
    let mut format_reader = probed.format;

    let track = first_audio_track(&*format_reader)
        .ok_or_else(|| AudioError::NoAudioTrack(path.to_path_buf()))?;
    let mut track_id = track.id;
    let params = track.codec_params.clone();

    let sample_rate = params
        .sample_rate
        .ok_or_else(|| AudioError::MissingSampleRate(path.to_path_buf()))?;

    let decoder_opts: DecoderOptions = Default::default();
    let mut decoder = get_codecs()
        .make(&params, &decoder_opts)
        .map_err(decode_error)?;

    // Channel count from the codec if it's known, otherwise from the first decoded buffer.
    let mut channels: Vec<Vec<f32>> = match params.channels {
        Some(layout) => vec![Vec::new(); layout.count()],
        None => Vec::new(),
    };
    if let Some(n_frames) = params.n_frames {
        for channel in channels.iter_mut() {
            channel.reserve(n_frames as usize);
        }
    }

    loop {
        let packet = match read_next_packet(format_reader.as_mut()) {
            Ok(ReadOutcome::Packet(packet)) => packet,
            Ok(ReadOutcome::EndOfStream) => break,
            // A new logical stream follows, as in chained Ogg files. Its samples are
            // appended as if they had the first stream's rate.
            Ok(ReadOutcome::Reset) => {
                let track = first_audio_track(&*format_reader)
                    .ok_or_else(|| AudioError::NoAudioTrack(path.to_path_buf()))?;
                debug!(path = ?path, track = track.id, "Stream changed, rebuilding decoder");
                track_id = track.id;
                decoder = get_codecs()
                    .make(&track.codec_params, &decoder_opts)
                    .map_err(decode_error)?;
                continue;
            }
            Err(e) => return Err(decode_error(e)),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                decoder.decode(&packet).map_err(decode_error)?
            }
            // A corrupt packet is dropped; the rest of the stream is still usable.
            Err(SymphoniaError::DecodeError(e)) => {
                warn!(path = ?path, err = e, "Skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(decode_error(e)),
        };
        append_decoded(decoded, &mut channels);
    }

    let clip = Clip::new(channels, sample_rate);
    debug!(
        path = ?path,
        channels = clip.channel_count(),
        sample_rate,
        duration_ms = clip.duration().as_millis(),
        "Decoded audio file"
    );
    Ok(clip)
}

fn first_audio_track(format_reader: &dyn FormatReader) -> Option<&Track> {
    format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
}

/// What the decode loop does after trying to read a packet.
enum ReadOutcome {
    Packet(Packet),
    EndOfStream,
    /// The stream changed and the decoder must be reset before continuing.
    Reset,
}

fn read_next_packet(format_reader: &mut dyn FormatReader) -> Result<ReadOutcome, SymphoniaError> {
    classify_read(format_reader.next_packet())
}

fn classify_read(result: Result<Packet, SymphoniaError>) -> Result<ReadOutcome, SymphoniaError> {
    match result {
        Ok(packet) => Ok(ReadOutcome::Packet(packet)),
        Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Ok(ReadOutcome::EndOfStream)
        }
        Err(SymphoniaError::ResetRequired) => Ok(ReadOutcome::Reset),
        Err(e) => Err(e),
    }
}

/// Appends a decoded buffer to the planar channel data.
fn append_decoded(decoded: AudioBufferRef, channels: &mut Vec<Vec<f32>>) {
    match decoded {
        AudioBufferRef::F32(buf) => append_planar(&buf, channels, |sample| sample),
        AudioBufferRef::F64(buf) => append_planar(&buf, channels, |sample| sample as f32),
        AudioBufferRef::S8(buf) => append_planar(&buf, channels, scale_s8),
        AudioBufferRef::S16(buf) => append_planar(&buf, channels, scale_s16),
        AudioBufferRef::S24(buf) => {
            append_planar(&buf, channels, |sample| scale_s24(sample.inner()))
        }
        AudioBufferRef::S32(buf) => append_planar(&buf, channels, scale_s32),
        AudioBufferRef::U8(buf) => append_planar(&buf, channels, scale_u8),
        AudioBufferRef::U16(buf) => append_planar(&buf, channels, scale_u16),
        AudioBufferRef::U24(buf) => {
            append_planar(&buf, channels, |sample| scale_u24(sample.inner()))
        }
        AudioBufferRef::U32(buf) => append_planar(&buf, channels, scale_u32),
    }
}

/// Copies each plane of a generic AudioBuffer onto the matching output channel.
fn append_planar<T, F>(buf: &AudioBuffer<T>, channels: &mut Vec<Vec<f32>>, convert: F)
where
    T: symphonia::core::sample::Sample,
    F: Fn(T) -> f32,
{
    let planes = buf.planes();
    let planes = planes.planes();
    if channels.is_empty() {
        channels.resize(planes.len(), Vec::new());
    }
    for (out, plane) in channels.iter_mut().zip(planes.iter()) {
        out.extend(plane[..buf.frames()].iter().map(|&sample| convert(sample)));
    }
}

// Scaling helpers for the integer formats.

#[inline]
pub(crate) fn scale_s8(sample: i8) -> f32 {
    sample as f32 / (1i64 << 7) as f32
}

#[inline]
pub(crate) fn scale_s16(sample: i16) -> f32 {
    sample as f32 / (1i64 << 15) as f32
}

#[inline]
pub(crate) fn scale_s24(sample: i32) -> f32 {
    sample as f32 / (1i64 << 23) as f32
}

#[inline]
pub(crate) fn scale_s32(sample: i32) -> f32 {
    sample as f32 / (1i64 << 31) as f32
}

#[inline]
pub(crate) fn scale_u8(sample: u8) -> f32 {
    (sample as f32 / u8::MAX as f32) * 2.0 - 1.0
}

#[inline]
pub(crate) fn scale_u16(sample: u16) -> f32 {
    (sample as f32 / u16::MAX as f32) * 2.0 - 1.0
}

#[inline]
pub(crate) fn scale_u24(sample: u32) -> f32 {
    let max = (1u32 << 24) - 1;
    (sample as f32 / max as f32) * 2.0 - 1.0
}

#[inline]
pub(crate) fn scale_u32(sample: u32) -> f32 {
    (sample as f32 / u32::MAX as f32) * 2.0 - 1.0
}
