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
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::GenerateError;
use crate::song::Song;
use crate::util::file_stem_string;

/// Extensions picked up from a sound directory. Matching is case-sensitive.
pub const SOUND_EXTENSIONS: [&str; 3] = ["wav", "mp3", "ogg"];

/// A named instrument and the sound file it plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub name: String,
    pub source: PathBuf,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.source.display())
    }
}

/// Instruments keyed by name, in the order they were first seen, plus the song
/// instruments that declared no sound file at all.
#[derive(Debug, Clone, Default)]
pub struct Instruments {
    entries: Vec<Instrument>,
    soundless: Vec<String>,
}

impl Instruments {
    /// Adds an instrument. If the name is already present its sound is replaced
    /// and it keeps its original position.
    pub fn insert(&mut self, name: String, source: PathBuf) {
        match self.entries.iter_mut().find(|i| i.name == name) {
            Some(existing) => {
                debug!(name = %name, "Instrument name repeated, replacing its sound");
                existing.source = source;
            }
            None => self.entries.push(Instrument { name, source }),
        }
    }

    /// Records an instrument that has no sound file. It never enters the mapping,
    /// so it can't displace an instrument of the same name.
    pub fn insert_soundless(&mut self, name: String) {
        debug!(name = %name, "Instrument declares no sound file");
        self.soundless.push(name);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.entries.iter()
    }

    /// Names of instruments without a sound file, in declaration order.
    pub fn soundless(&self) -> &[String] {
        &self.soundless
    }

    /// Number of instruments with a sound file.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collects the sound files directly inside a directory. Each file becomes an
    /// instrument named after the file without its extension.
    pub fn from_directory(dir: &Path) -> Result<Instruments, std::io::Error> {
        let mut instruments = Instruments::default();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_sound = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| SOUND_EXTENSIONS.contains(&ext));
            if !is_sound {
                continue;
            }
            if let Some(name) = file_stem_string(&path) {
                instruments.insert(name, path);
            }
        }
        Ok(instruments)
    }

    /// Collects the custom instruments declared by a song. Sound files are looked up
    /// in `sounds_dir`.
    pub fn from_song(song: &Song, sounds_dir: &Path) -> Instruments {
        let mut instruments = Instruments::default();
        for (index, custom) in song.instruments.iter().enumerate() {
            let name = if custom.name.trim().is_empty() {
                format!("Instrument #{}", index + 1)
            } else {
                custom.name.clone()
            };
            if custom.file.is_empty() {
                instruments.insert_soundless(name);
            } else {
                instruments.insert(name, sounds_dir.join(&custom.file));
            }
        }
        instruments
    }
}

impl<'a> IntoIterator for &'a Instruments {
    type Item = &'a Instrument;
    type IntoIter = std::slice::Iter<'a, Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Resolves a source path into instruments. Directories are scanned for sound
/// files; anything else that is a file is read as a song.
pub fn resolve(source: &Path, settings: &Settings) -> Result<Instruments, GenerateError> {
    if source.is_dir() {
        let instruments = Instruments::from_directory(source)?;
        info!(
            path = ?source,
            instruments = instruments.len(),
            "Collected sounds from directory"
        );
        Ok(instruments)
    } else if source.is_file() {
        let song = Song::read(source)?;
        let sounds_dir = settings.sounds_dir()?;
        info!(song = %song, sounds_dir = ?sounds_dir, "Read song");
        Ok(Instruments::from_song(&song, &sounds_dir))
    } else {
        Err(GenerateError::UnsupportedSource(source.to_path_buf()))
    }
}
