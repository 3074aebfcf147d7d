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
use std::path::{Path, PathBuf};

use tracing::info;

use crate::assemble::{assemble, Progress, Skipped};
use crate::config::Settings;
use crate::error::GenerateError;
use crate::instruments;
use crate::pack::{self, ResourcePack};
use crate::synth::Synthesizer;

/// The outcome of a generation run.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Where the archive was written.
    pub output: PathBuf,
    /// Number of distinct resource keys in the pack.
    pub registered: usize,
    pub skipped: Vec<Skipped>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Wrote {} ({} sounds registered)",
            self.output.display(),
            self.registered
        )?;
        if !self.skipped.is_empty() {
            writeln!(f, "Skipped instruments (count: {}):", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(f, "- {}: {}", skipped.name, skipped.reason)?;
            }
        }
        Ok(())
    }
}

/// Builds a resource pack from a song file or a directory of sounds and writes it
/// to `output`, which may be a file path or an existing directory.
pub fn generate_pack(
    source: &Path,
    output: &Path,
    settings: &Settings,
    progress: Option<&mut dyn FnMut(&Progress)>,
) -> Result<Summary, GenerateError> {
    info!(source = ?source, output = ?output, "Generating resource pack");

    let instruments = instruments::resolve(source, settings)?;
    let synthesizer = Synthesizer::new(settings.quality());
    let mut pack = ResourcePack::new(settings.pack_format(), settings.description());
    let skipped = assemble(&instruments, &synthesizer, &mut pack, progress)?;

    let output = pack::resolve_output_path(source, output);
    pack::export(&pack, &output)?;

    info!(
        path = ?output,
        registered = pack.len(),
        skipped = skipped.len(),
        "Resource pack complete"
    );
    Ok(Summary {
        output,
        registered: pack.len(),
        skipped,
    })
}
