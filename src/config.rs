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
use std::path::{Path, PathBuf};

use config::{Config, File};
use directories::BaseDirs;
use serde::Deserialize;
use tracing::debug;

mod error;

pub use error::ConfigError;

/// Default resource pack format written to pack.mcmeta.
pub const DEFAULT_PACK_FORMAT: u32 = 15;

/// Default Vorbis VBR quality. Matches the libvorbis default used by ffmpeg.
pub const DEFAULT_QUALITY: f32 = 0.3;

/// Where Note Block Studio keeps custom instrument sounds, relative to the home directory.
const NBS_SOUNDS_DIR: [&str; 3] = ["Minecraft Note Block Studio", "Data", "Sounds"];

/// Settings for pack generation. Every field is optional in the YAML file.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Settings {
    /// Overrides the directory that song instrument sound files are resolved against.
    sounds_dir: Option<PathBuf>,

    /// The pack_format value written to pack.mcmeta.
    pack_format: u32,

    /// The description written to pack.mcmeta.
    description: String,

    /// Vorbis encoder quality, from -0.2 to 1.0.
    quality: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sounds_dir: None,
            pack_format: DEFAULT_PACK_FORMAT,
            description: "Note block instruments generated by NoteExtend".to_string(),
            quality: DEFAULT_QUALITY,
        }
    }
}

impl Settings {
    /// Loads settings from the given YAML file, or returns the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        let settings = match path {
            Some(path) => {
                debug!(path = ?path, "Loading settings");
                Config::builder()
                    .add_source(File::from(path))
                    .build()?
                    .try_deserialize::<Settings>()?
            }
            None => Settings::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(-0.2..=1.0).contains(&self.quality) {
            return Err(ConfigError::Invalid {
                name: "quality",
                message: format!("{} is outside of -0.2..=1.0", self.quality),
            });
        }
        Ok(())
    }

    /// Sets the sound directory override.
    pub fn with_sounds_dir(mut self, sounds_dir: PathBuf) -> Self {
        self.sounds_dir = Some(sounds_dir);
        self
    }

    /// The directory that song instrument sound files are resolved against.
    pub fn sounds_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.sounds_dir {
            return Ok(dir.clone());
        }
        let base = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(NBS_SOUNDS_DIR
            .iter()
            .fold(base.home_dir().to_path_buf(), |path, part| path.join(part)))
    }

    /// The pack_format value for pack.mcmeta.
    pub fn pack_format(&self) -> u32 {
        self.pack_format
    }

    /// The description for pack.mcmeta.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The Vorbis encoder quality.
    pub fn quality(&self) -> f32 {
        self.quality
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use config::{Config, File, FileFormat};

    use super::*;

    fn from_yaml(yaml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(DEFAULT_PACK_FORMAT, settings.pack_format());
        assert_eq!(DEFAULT_QUALITY, settings.quality());
        assert!(!settings.description().is_empty());
    }

    #[test]
    fn test_settings_deserialize() {
        let settings = from_yaml(
            r#"
            sounds_dir: /opt/nbs/sounds
            pack_format: 34
            description: My instruments
            quality: 0.6
        "#,
        );

        assert_eq!(
            PathBuf::from("/opt/nbs/sounds"),
            settings.sounds_dir().unwrap()
        );
        assert_eq!(34, settings.pack_format());
        assert_eq!("My instruments", settings.description());
        assert_eq!(0.6, settings.quality());
    }

    #[test]
    fn test_settings_partial_uses_defaults() {
        let settings = from_yaml("pack_format: 22");
        assert_eq!(22, settings.pack_format());
        assert_eq!(DEFAULT_QUALITY, settings.quality());
    }

    #[test]
    fn test_settings_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noteextend.yaml");
        std::fs::write(&path, "quality: 0.5\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(0.5, settings.quality());
    }

    #[test]
    fn test_settings_rejects_bad_quality() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noteextend.yaml");
        std::fs::write(&path, "quality: 3.0\n").unwrap();

        assert!(matches!(
            Settings::load(Some(&path)),
            Err(ConfigError::Invalid {
                name: "quality",
                ..
            })
        ));
    }

    #[test]
    fn test_settings_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_default_sounds_dir_layout() {
        // Only meaningful where a home directory exists.
        if let Ok(dir) = Settings::default().sounds_dir() {
            assert!(dir.ends_with("Minecraft Note Block Studio/Data/Sounds"));
        }
    }

    #[test]
    fn test_with_sounds_dir_overrides() {
        let settings = Settings::default().with_sounds_dir(PathBuf::from("/x"));
        assert_eq!(PathBuf::from("/x"), settings.sounds_dir().unwrap());
    }
}
