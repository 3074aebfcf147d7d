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
use std::any::TypeId;
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use hound::{Sample, SampleFormat, WavSpec, WavWriter};

/// Audio test utilities for generating test signals and validating results
pub mod audio_test_utils {
    use std::f32::consts::PI;

    /// Generate a sine wave of the given number of frames.
    pub fn generate_sine(frequency: f32, amplitude: f32, sample_rate: u32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * PI * frequency * t).sin()
            })
            .collect()
    }

    /// Calculate RMS (Root Mean Square) of a signal
    pub fn calculate_rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }

        let sum_squares: f32 = samples.iter().map(|&x| x * x).sum();
        (sum_squares / samples.len() as f32).sqrt()
    }

    /// Count sign changes, a cheap frequency estimate for pure tones.
    pub fn zero_crossings(samples: &[f32]) -> usize {
        samples
            .windows(2)
            .filter(|pair| (pair[0] < 0.0) != (pair[1] < 0.0))
            .count()
    }
}

/// Writes planar samples to a 32-bit WAV file. Only f32 and i32 samples are supported.
pub fn write_wav<S: Sample + Copy + 'static>(
    path: PathBuf,
    samples: Vec<Vec<S>>,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let sample_format = if TypeId::of::<S>() == TypeId::of::<f32>() {
        SampleFormat::Float
    } else if TypeId::of::<S>() == TypeId::of::<i32>() {
        SampleFormat::Int
    } else {
        return Err("Unsupported sample format".into());
    };

    let num_channels = samples.len();
    assert!(num_channels <= u16::MAX.into(), "Too many channels!");
    let mut writer = WavWriter::new(
        File::create(path)?,
        WavSpec {
            channels: num_channels as u16,
            sample_rate,
            bits_per_sample: 32,
            sample_format,
        },
    )?;

    let frames = samples.iter().map(Vec::len).min().unwrap_or(0);
    for frame in 0..frames {
        for channel in &samples {
            writer.write_sample(channel[frame])?;
        }
    }
    writer.finalize()?;

    Ok(())
}

/// Builds Note Block Studio song files for tests.
///
/// Notes are given by absolute tick and layer; the writer sorts them and emits
/// the jump encoding the format uses.
pub struct SongWriter {
    version: u8,
    song_length: u16,
    name: String,
    layers: Vec<String>,
    notes: Vec<(u16, u16, u8, u8)>,
    instruments: Vec<(String, String)>,
}

impl SongWriter {
    /// A versioned song file (versions 1 and up).
    pub fn new(version: u8) -> SongWriter {
        SongWriter {
            version,
            song_length: 0,
            name: String::new(),
            layers: Vec::new(),
            notes: Vec::new(),
            instruments: Vec::new(),
        }
    }

    /// A classic song file, which starts with a non-zero song length.
    pub fn classic(song_length: u16) -> SongWriter {
        assert!(song_length > 0, "classic files need a song length");
        SongWriter {
            song_length,
            ..SongWriter::new(0)
        }
    }

    pub fn name(mut self, name: &str) -> SongWriter {
        self.name = name.to_string();
        self
    }

    pub fn layer(mut self, name: &str) -> SongWriter {
        self.layers.push(name.to_string());
        self
    }

    pub fn note(mut self, tick: u16, layer: u16, instrument: u8, key: u8) -> SongWriter {
        self.notes.push((tick, layer, instrument, key));
        self
    }

    pub fn instrument(mut self, name: &str, file: &str) -> SongWriter {
        self.instruments.push((name.to_string(), file.to_string()));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let version = self.version;

        if version == 0 {
            out.extend(self.song_length.to_le_bytes());
        } else {
            out.extend(0u16.to_le_bytes());
            out.push(version);
            out.push(16);
            if version >= 3 {
                out.extend(self.song_length.to_le_bytes());
            }
        }
        out.extend((self.layers.len() as u16).to_le_bytes());
        put_string(&mut out, &self.name);
        put_string(&mut out, "");
        put_string(&mut out, "");
        put_string(&mut out, "");
        out.extend(1000u16.to_le_bytes());
        out.extend([0u8; 3]);
        out.extend([0u8; 20]);
        put_string(&mut out, "");
        if version >= 4 {
            out.extend([0, 0]);
            out.extend(0u16.to_le_bytes());
        }

        let mut notes = self.notes.clone();
        notes.sort_by_key(|&(tick, layer, _, _)| (tick, layer));
        let mut last_tick: i32 = -1;
        let mut index = 0;
        while index < notes.len() {
            let tick = notes[index].0;
            out.extend(((tick as i32 - last_tick) as u16).to_le_bytes());
            last_tick = tick as i32;

            let mut last_layer: i32 = -1;
            while index < notes.len() && notes[index].0 == tick {
                let (_, layer, instrument, key) = notes[index];
                out.extend(((layer as i32 - last_layer) as u16).to_le_bytes());
                last_layer = layer as i32;
                out.push(instrument);
                out.push(key);
                if version >= 4 {
                    // Velocity, panning and fine pitch.
                    out.push(100);
                    out.push(100);
                    out.extend(0i16.to_le_bytes());
                }
                index += 1;
            }
            out.extend(0u16.to_le_bytes());
        }
        out.extend(0u16.to_le_bytes());

        for name in &self.layers {
            put_string(&mut out, name);
            if version >= 4 {
                out.push(0);
            }
            out.push(100);
            if version >= 2 {
                out.push(100);
            }
        }

        out.push(self.instruments.len() as u8);
        for (name, file) in &self.instruments {
            put_string(&mut out, name);
            put_string(&mut out, file);
            out.push(45);
            out.push(0);
        }

        out
    }

    pub fn write(&self, path: &Path) -> Result<(), std::io::Error> {
        std::fs::write(path, self.to_bytes())
    }
}

fn put_string(out: &mut Vec<u8>, value: &str) {
    out.extend((value.len() as i32).to_le_bytes());
    out.extend(value.as_bytes());
}
