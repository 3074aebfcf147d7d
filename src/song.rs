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

use tracing::debug;

mod nbs;

/// Errors raised while reading a song file. All of them abort a run.
#[derive(Debug, thiserror::Error)]
pub enum SongError {
    #[error("Unable to read song {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed song {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error(
        "Unsupported song format version {version} in {} (newest supported is {max})",
        path.display()
    )]
    UnsupportedVersion { path: PathBuf, version: u8, max: u8 },
}

/// A Note Block Studio song. Only the parts needed to build a resource pack are kept.
#[derive(Debug, Clone)]
pub struct Song {
    pub header: Header,
    /// The number of note blocks in the song.
    pub note_count: usize,
    /// Custom instruments, in declaration order.
    pub instruments: Vec<CustomInstrument>,
}

/// The song header fields the reader keeps.
#[derive(Debug, Clone)]
pub struct Header {
    /// Format version, 0 for classic files.
    pub version: u8,
    pub layer_count: u16,
    pub name: String,
}

/// A custom instrument declared by a song.
#[derive(Debug, Clone)]
pub struct CustomInstrument {
    /// Display name. May be empty.
    pub name: String,
    /// Sound file name, relative to the Note Block Studio sounds directory. May be empty.
    pub file: String,
}

impl Song {
    /// Reads a song from the given file.
    pub fn read(path: &Path) -> Result<Song, SongError> {
        let bytes = fs::read(path).map_err(|source| SongError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let song = Song::parse(&bytes).map_err(|e| match e {
            ParseFailure::Version(version) => SongError::UnsupportedVersion {
                path: path.to_path_buf(),
                version,
                max: nbs::MAX_VERSION,
            },
            ParseFailure::Malformed(message) => SongError::Malformed {
                path: path.to_path_buf(),
                message,
            },
        })?;

        debug!(
            path = ?path,
            version = song.header.version,
            notes = song.note_count,
            layers = song.header.layer_count,
            instruments = song.instruments.len(),
            "Read song"
        );
        Ok(song)
    }

    fn parse(bytes: &[u8]) -> Result<Song, ParseFailure> {
        if let Some(version) = nbs::declared_version(bytes) {
            if version > nbs::MAX_VERSION {
                return Err(ParseFailure::Version(version));
            }
        }

        let (_, song) = nbs::parse_song(bytes).map_err(|e| {
            ParseFailure::Malformed(match e {
                nom::Err::Incomplete(_) => "unexpected end of file".to_string(),
                nom::Err::Error(e) | nom::Err::Failure(e) => format!(
                    "{:?} at byte {}",
                    e.code,
                    bytes.len() - e.input.len()
                ),
            })
        })?;
        Ok(song)
    }
}

enum ParseFailure {
    Version(u8),
    Malformed(String),
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.header.name.is_empty() {
            "Untitled"
        } else {
            self.header.name.as_str()
        };
        write!(
            f,
            "{} (version {}, {} notes, {} custom instruments)",
            name,
            self.header.version,
            self.note_count,
            self.instruments.len()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::SongWriter;

    #[test]
    fn test_read_song() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.nbs");
        SongWriter::new(5)
            .name("Demo")
            .instrument("Piano", "piano.ogg")
            .write(&path)
            .unwrap();

        let song = Song::read(&path).unwrap();
        assert_eq!("Demo", song.header.name);
        assert_eq!(1, song.instruments.len());
        assert_eq!(
            "Demo (version 5, 0 notes, 1 custom instruments)",
            song.to_string()
        );
    }

    #[test]
    fn test_read_missing_song() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.nbs");
        assert!(matches!(Song::read(&path), Err(SongError::Io { .. })));
    }

    #[test]
    fn test_read_unsupported_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.nbs");
        std::fs::write(&path, [0u8, 0, 9, 16, 0, 0]).unwrap();

        match Song::read(&path) {
            Err(SongError::UnsupportedVersion { version, max, .. }) => {
                assert_eq!(9, version);
                assert_eq!(5, max);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.nbs");
        std::fs::write(&path, b"not a song").unwrap();
        assert!(matches!(
            Song::read(&path),
            Err(SongError::Malformed { .. })
        ));
    }
}
