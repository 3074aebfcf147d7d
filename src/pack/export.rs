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
use std::fs::{self, Permissions};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ResourcePack;
use crate::util::file_stem_string;

/// File name used when the source has no usable base name.
const FALLBACK_ARCHIVE_NAME: &str = "resourcepack";

/// Errors writing the pack archive. These abort the run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Works out where the archive should go. An existing directory gets a file named
/// after the source with a `.zip` extension; anything else is used as the file path.
pub fn resolve_output_path(source: &Path, destination: &Path) -> PathBuf {
    if destination.is_dir() {
        let stem = file_stem_string(source).unwrap_or_else(|| FALLBACK_ARCHIVE_NAME.to_string());
        destination.join(format!("{}.zip", stem))
    } else {
        destination.to_path_buf()
    }
}

/// Writes the pack as a zip archive into the given writer and returns the writer.
pub fn write_archive<W: Write + Seek>(pack: &ResourcePack, writer: W) -> Result<W, ExportError> {
    let mut zip = ZipWriter::new(writer);
    let text = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    // Vorbis payloads are already compressed.
    let audio = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("pack.mcmeta", text)?;
    zip.write_all(pack.mcmeta()?.as_bytes())
        .map_err(zip::result::ZipError::Io)?;

    for (namespace, document) in pack.sounds_json()? {
        zip.start_file(format!("assets/{}/sounds.json", namespace), text)?;
        zip.write_all(document.as_bytes())
            .map_err(zip::result::ZipError::Io)?;
    }

    for (key, sound) in pack.sounds() {
        let name = key.archive_path();
        debug!(key = %key, entry = name, bytes = sound.content.len(), "Writing sound");
        zip.start_file(name, audio)?;
        zip.write_all(&sound.content)
            .map_err(zip::result::ZipError::Io)?;
    }

    Ok(zip.finish()?)
}

/// Writes the pack to `output`, replacing any file already there. The archive is
/// built in a temporary file next to the destination and renamed into place, so a
/// failure never leaves a partial archive behind.
pub fn export(pack: &ResourcePack, output: &Path) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: output.to_path_buf(),
        source,
    };

    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(parent).map_err(io_error)?;
    // Temporary files are owner-only; the archive takes the mode of the file it
    // replaces, or the usual mode for a new file.
    let permissions = match fs::metadata(output) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions).map_err(io_error)?;
    }
    let temp = write_archive(pack, temp)?;
    temp.persist(output).map_err(|e| io_error(e.error))?;

    info!(path = ?output, sounds = pack.len(), "Wrote resource pack");
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
