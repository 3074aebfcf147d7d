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

use tracing::{info, span, warn, Level};

use crate::error::{GenerateError, SkipReason};
use crate::instruments::{Instrument, Instruments};
use crate::pack::{ResourceKey, ResourcePack, Sound, NOTE_SUBTITLE};
use crate::sanitize::sanitize;
use crate::synth::Synthesize;

/// Reported once per instrument, before it is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the instrument.
    pub index: usize,
    pub total: usize,
    pub name: String,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.index, self.total, self.name)
    }
}

/// An instrument left out of the pack and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub name: String,
    pub reason: SkipReason,
}

/// Processes every instrument in order and registers its sounds in `pack`.
///
/// `progress` is called once per instrument before it is processed. Instruments
/// that declared no sound file, or whose sound file is missing, are skipped and
/// returned; any other failure aborts.
pub fn assemble<S: Synthesize + ?Sized>(
    instruments: &Instruments,
    synthesizer: &S,
    pack: &mut ResourcePack,
    mut progress: Option<&mut dyn FnMut(&Progress)>,
) -> Result<Vec<Skipped>, GenerateError> {
    let total = instruments.len();
    let mut skipped: Vec<Skipped> = instruments
        .soundless()
        .iter()
        .map(|name| {
            warn!(name = %name, reason = %SkipReason::NoSoundFile, "Skipping instrument");
            Skipped {
                name: name.clone(),
                reason: SkipReason::NoSoundFile,
            }
        })
        .collect();

    for (i, instrument) in instruments.iter().enumerate() {
        let update = Progress {
            index: i + 1,
            total,
            name: instrument.name.clone(),
        };
        if let Some(callback) = progress.as_deref_mut() {
            callback(&update);
        }

        let span = span!(Level::INFO, "instrument", name = %instrument.name);
        let _enter = span.enter();
        info!(index = update.index, total, "Processing instrument");

        if let Some(reason) = add_instrument(instrument, synthesizer, pack)? {
            warn!(reason = %reason, "Skipping instrument");
            skipped.push(Skipped {
                name: instrument.name.clone(),
                reason,
            });
        }
    }

    Ok(skipped)
}

fn add_instrument<S: Synthesize + ?Sized>(
    instrument: &Instrument,
    synthesizer: &S,
    pack: &mut ResourcePack,
) -> Result<Option<SkipReason>, GenerateError> {
    let source = &instrument.source;
    let variants = match synthesizer.synthesize(source) {
        Ok(variants) => variants,
        Err(e) if e.is_not_found() => {
            return Ok(Some(SkipReason::SoundNotFound(source.clone())));
        }
        Err(source) => {
            return Err(GenerateError::Audio {
                name: instrument.name.clone(),
                source,
            })
        }
    };

    let id = sanitize(&instrument.name);
    for (variant, content) in variants.into_payloads() {
        let key = ResourceKey::note_block(&id, variant);
        let sound = Sound {
            content,
            event: key.event().to_string(),
            subtitle: NOTE_SUBTITLE.to_string(),
        };
        pack.insert(key, sound);
    }
    Ok(None)
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::audio::AudioError;
    use crate::synth::{PitchVariants, Variant};

    /// Returns the file name as every payload and fails for paths under `/missing`
    /// or `/broken`.
    #[derive(Default)]
    struct MockSynthesizer {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl Synthesize for MockSynthesizer {
        fn synthesize(&self, path: &Path) -> Result<PitchVariants, AudioError> {
            self.calls.borrow_mut().push(path.to_path_buf());
            if path.starts_with("/missing") {
                return Err(AudioError::NotFound(path.to_path_buf()));
            }
            if path.starts_with("/broken") {
                return Err(AudioError::NoAudioTrack(path.to_path_buf()));
            }
            let payload = path.to_string_lossy().into_owned().into_bytes();
            Ok(PitchVariants {
                lower: payload.clone(),
                default: payload.clone(),
                higher: payload,
            })
        }
    }

    /// Entries without a path are recorded as soundless.
    fn instruments(entries: &[(&str, Option<&str>)]) -> Instruments {
        let mut instruments = Instruments::default();
        for (name, source) in entries {
            match source {
                Some(source) => instruments.insert(name.to_string(), PathBuf::from(*source)),
                None => instruments.insert_soundless(name.to_string()),
            }
        }
        instruments
    }

    fn key_strings(pack: &ResourcePack) -> Vec<String> {
        pack.keys().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_registers_three_variants() {
        let synth = MockSynthesizer::default();
        let mut pack = ResourcePack::new(15, "test");
        let skipped = assemble(
            &instruments(&[("Grand Piano", Some("/sounds/piano.wav"))]),
            &synth,
            &mut pack,
            None,
        )
        .unwrap();

        assert!(skipped.is_empty());
        assert_eq!(
            vec![
                "minecraft:block/note_block/grand_piano",
                "minecraft:block/note_block/grand_piano_-1",
                "minecraft:block/note_block/grand_piano_1",
            ],
            key_strings(&pack)
        );
        for variant in Variant::ALL {
            let sound = pack
                .get(&ResourceKey::note_block("grand_piano", variant))
                .unwrap();
            assert!(!sound.content.is_empty());
            assert_eq!(NOTE_SUBTITLE, sound.subtitle);
        }
    }

    #[test]
    fn test_skips_missing_and_soundless() {
        let synth = MockSynthesizer::default();
        let mut pack = ResourcePack::new(15, "test");
        let skipped = assemble(
            &instruments(&[
                ("Silent", None),
                ("Gone", Some("/missing/gone.ogg")),
                ("Bell", Some("/sounds/bell.ogg")),
            ]),
            &synth,
            &mut pack,
            None,
        )
        .unwrap();

        assert_eq!(3, pack.len());
        assert_eq!(
            vec![
                Skipped {
                    name: "Silent".to_string(),
                    reason: SkipReason::NoSoundFile,
                },
                Skipped {
                    name: "Gone".to_string(),
                    reason: SkipReason::SoundNotFound(PathBuf::from("/missing/gone.ogg")),
                },
            ],
            skipped
        );
        // The soundless instrument never reaches the synthesizer.
        assert_eq!(2, synth.calls.borrow().len());
    }

    #[test]
    fn test_soundless_duplicate_keeps_registered_sound() {
        let synth = MockSynthesizer::default();
        let mut pack = ResourcePack::new(15, "test");
        let skipped = assemble(
            &instruments(&[("Piano", Some("/sounds/piano.wav")), ("Piano", None)]),
            &synth,
            &mut pack,
            None,
        )
        .unwrap();

        assert_eq!(
            vec![
                "minecraft:block/note_block/piano",
                "minecraft:block/note_block/piano_-1",
                "minecraft:block/note_block/piano_1",
            ],
            key_strings(&pack)
        );
        assert_eq!(
            vec![Skipped {
                name: "Piano".to_string(),
                reason: SkipReason::NoSoundFile,
            }],
            skipped
        );
    }

    #[test]
    fn test_other_audio_errors_abort() {
        let synth = MockSynthesizer::default();
        let mut pack = ResourcePack::new(15, "test");
        let result = assemble(
            &instruments(&[
                ("Broken", Some("/broken/a.ogg")),
                ("Bell", Some("/sounds/bell.ogg")),
            ]),
            &synth,
            &mut pack,
            None,
        );

        match result {
            Err(GenerateError::Audio { name, .. }) => assert_eq!("Broken", name),
            other => panic!("expected audio error, got {:?}", other),
        }
        assert_eq!(1, synth.calls.borrow().len());
    }

    #[test]
    fn test_progress_reported_before_each_instrument() {
        let synth = MockSynthesizer::default();
        let mut pack = ResourcePack::new(15, "test");
        let mut seen = Vec::new();
        let mut callback = |p: &Progress| seen.push(p.clone());

        assemble(
            &instruments(&[
                ("A", Some("/sounds/a.wav")),
                ("Silent", None),
                ("B", Some("/sounds/b.wav")),
            ]),
            &synth,
            &mut pack,
            Some(&mut callback),
        )
        .unwrap();

        assert_eq!(
            vec![
                Progress {
                    index: 1,
                    total: 2,
                    name: "A".to_string(),
                },
                Progress {
                    index: 2,
                    total: 2,
                    name: "B".to_string(),
                },
            ],
            seen
        );
        assert_eq!("[1/2] A", seen[0].to_string());
    }

    #[test]
    fn test_sanitized_collision_last_write_wins() {
        let synth = MockSynthesizer::default();
        let mut pack = ResourcePack::new(15, "test");
        assemble(
            &instruments(&[
                ("Snare Drum", Some("/sounds/first.wav")),
                ("snare-drum", Some("/sounds/second.wav")),
            ]),
            &synth,
            &mut pack,
            None,
        )
        .unwrap();

        assert_eq!(3, pack.len());
        let sound = pack
            .get(&ResourceKey::note_block("snare_drum", Variant::Default))
            .unwrap();
        assert_eq!(b"/sounds/second.wav".to_vec(), sound.content);
    }

    #[test]
    fn test_empty_instruments() {
        let synth = MockSynthesizer::default();
        let mut pack = ResourcePack::new(15, "test");
        let skipped = assemble(&Instruments::default(), &synth, &mut pack, None).unwrap();
        assert!(skipped.is_empty());
        assert!(pack.is_empty());
    }
}
