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

//! In-memory resource pack holding custom sounds.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::synth::Variant;

mod export;

pub use export::{export, resolve_output_path, write_archive, ExportError};

/// Namespace every note block sound lives in.
pub const NAMESPACE: &str = "minecraft";

/// Path prefix of note block sounds within the namespace.
pub const NOTE_BLOCK_PATH: &str = "block/note_block";

/// Subtitle attached to every generated sound event.
pub const NOTE_SUBTITLE: &str = "subtitles.block.note_block.note";

/// A namespaced sound path, e.g. `minecraft:block/note_block/piano`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    namespace: String,
    path: String,
}

impl ResourceKey {
    pub fn new(namespace: &str, path: &str) -> ResourceKey {
        ResourceKey {
            namespace: namespace.to_string(),
            path: path.to_string(),
        }
    }

    /// The key for one pitch variant of a note block instrument.
    pub fn note_block(id: &str, variant: Variant) -> ResourceKey {
        ResourceKey::new(
            NAMESPACE,
            &format!("{}/{}{}", NOTE_BLOCK_PATH, id, variant.suffix()),
        )
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The sound event name, which is the last path segment.
    pub fn event(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Where the sound payload lives inside the archive.
    pub fn archive_path(&self) -> String {
        format!("assets/{}/sounds/{}.ogg", self.namespace, self.path)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// An encoded sound and the event it is registered under.
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    pub content: Vec<u8>,
    pub event: String,
    pub subtitle: String,
}

/// A resource pack under construction.
#[derive(Debug, Clone)]
pub struct ResourcePack {
    pack_format: u32,
    description: String,
    sounds: BTreeMap<ResourceKey, Sound>,
}

#[derive(Serialize)]
struct PackMeta<'a> {
    pack: PackSection<'a>,
}

#[derive(Serialize)]
struct PackSection<'a> {
    pack_format: u32,
    description: &'a str,
}

#[derive(Serialize)]
struct SoundEvent<'a> {
    sounds: Vec<SoundReference>,
    subtitle: &'a str,
}

#[derive(Serialize)]
struct SoundReference {
    name: String,
}

impl ResourcePack {
    pub fn new(pack_format: u32, description: &str) -> ResourcePack {
        ResourcePack {
            pack_format,
            description: description.to_string(),
            sounds: BTreeMap::new(),
        }
    }

    /// Registers a sound. A sound already registered under the same key is
    /// replaced and returned.
    pub fn insert(&mut self, key: ResourceKey, sound: Sound) -> Option<Sound> {
        let previous = self.sounds.insert(key.clone(), sound);
        if previous.is_some() {
            warn!(key = %key, "Sound registered twice, keeping the latest");
        }
        previous
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&Sound> {
        self.sounds.get(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &ResourceKey> {
        self.sounds.keys()
    }

    pub fn sounds(&self) -> impl Iterator<Item = (&ResourceKey, &Sound)> {
        self.sounds.iter()
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// The pack.mcmeta document.
    pub fn mcmeta(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&PackMeta {
            pack: PackSection {
                pack_format: self.pack_format,
                description: &self.description,
            },
        })
    }

    /// The sounds.json document for each namespace that has sounds.
    pub fn sounds_json(&self) -> Result<BTreeMap<&str, String>, serde_json::Error> {
        let mut events: BTreeMap<&str, BTreeMap<&str, SoundEvent>> = BTreeMap::new();
        for (key, sound) in &self.sounds {
            events.entry(key.namespace()).or_default().insert(
                &sound.event,
                SoundEvent {
                    sounds: vec![SoundReference {
                        name: key.to_string(),
                    }],
                    subtitle: &sound.subtitle,
                },
            );
        }

        events
            .into_iter()
            .map(|(namespace, events)| Ok((namespace, serde_json::to_string_pretty(&events)?)))
            .collect()
    }
}
