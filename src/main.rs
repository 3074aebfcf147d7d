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
use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use noteextend::{generate_pack, instruments, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Builds note block resource packs from Note Block Studio songs or sound folders."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a resource pack.
    Generate {
        /// A Note Block Studio song, or a directory of .wav, .mp3 and .ogg files.
        source: PathBuf,
        /// The archive to write, or an existing directory to write it into.
        output: PathBuf,
        /// The path to a YAML settings file.
        #[arg[short, long]]
        config: Option<PathBuf>,
    },
    /// Lists the instruments a source resolves to without generating anything.
    Instruments {
        /// A Note Block Studio song, or a directory of .wav, .mp3 and .ogg files.
        source: PathBuf,
        /// The path to a YAML settings file.
        #[arg[short, long]]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            source,
            output,
            config,
        } => {
            let settings = Settings::load(config.as_deref())?;
            // Progress is reported through the log.
            let summary = generate_pack(&source, &output, &settings, None)?;
            print!("{}", summary);
        }
        Commands::Instruments { source, config } => {
            let settings = Settings::load(config.as_deref())?;
            let instruments = instruments::resolve(&source, &settings)?;
            if instruments.is_empty() && instruments.soundless().is_empty() {
                println!("No instruments found in {}.", source.display());
                return Ok(());
            }

            println!("Instruments (count: {}):", instruments.len());
            for instrument in &instruments {
                println!("- {}", instrument);
            }
            if !instruments.soundless().is_empty() {
                println!(
                    "\nWithout a sound file (count: {}):",
                    instruments.soundless().len()
                );
                for name in instruments.soundless() {
                    println!("- {}", name);
                }
            }
        }
    }

    Ok(())
}
