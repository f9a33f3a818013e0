use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use playalong::effects::{self, PlaybackEffects};
use playalong::error::SyncError;
use playalong::server::{self, AppState};
use playalong::stem::StemData;
use playalong::{align, events, mix, playback, resolve};

#[derive(Parser)]
#[command(name = "playalong", version, about = "Generate play-along material from separated stems and analysis JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align a lyrics JSON with a chords JSON and emit annotated words
    Sync {
        #[arg(long)]
        lyrics: PathBuf,
        #[arg(long)]
        chords: PathBuf,
        /// Write the result here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Mix instrument stems into a single playback track
    Mix {
        /// Stem .wav files, in mix order
        stems: Vec<PathBuf>,
        #[arg(long, default_value = "mixed_playback.wav")]
        output: PathBuf,
        /// Per-stem volume in [0.0, 1.0], repeat per stem; missing entries are 1.0
        #[arg(long)]
        volume: Vec<f32>,
        /// Tempo factor, 0.5 half speed to 2.0 double speed
        #[arg(long, default_value_t = 1.0)]
        tempo: f32,
        /// Reverb room scale, 0.0 to 1.0
        #[arg(long, default_value_t = 0.0)]
        reverb: f32,
        /// Output gain in dB
        #[arg(long, default_value_t = 0.0)]
        gain_db: f32,
        /// Play the mix on the default output device after writing it
        #[arg(long)]
        play: bool,
    },
    /// Map chord and stem files to instruments
    Resolve {
        #[arg(long = "chords")]
        chord_files: Vec<PathBuf>,
        #[arg(long = "stems")]
        stem_files: Vec<PathBuf>,
    },
    /// Run the sync HTTP API
    Serve {
        #[arg(long, default_value_t = 8000)]
        port: u16,
        #[arg(long, default_value = "results/demo")]
        demo_dir: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SyncError> {
    match cli.command {
        Command::Sync {
            lyrics,
            chords,
            output,
        } => {
            let lyrics = events::load_lyrics(&lyrics)?;
            let chords = events::load_chords(&chords)?;
            let synced = align::sync_lyrics_with_chords(&lyrics, &chords);
            info!("Synced {} words", synced.len());

            let wire: Vec<_> = synced.iter().map(|word| word.to_wire()).collect();
            let json = serde_json::to_string_pretty(&wire)
                .map_err(|e| SyncError::Alignment(e.to_string()))?;
            match output {
                Some(path) => fs::write(&path, json)
                    .map_err(|e| SyncError::File(format!("{}: {}", path.display(), e)))?,
                None => println!("{}", json),
            }
        }

        Command::Mix {
            stems,
            output,
            volume,
            tempo,
            reverb,
            gain_db,
            play,
        } => {
            let volumes = if volume.is_empty() {
                None
            } else {
                Some(volume.as_slice())
            };
            let tracks = mix::decode_tracks(&stems, volumes)?;
            let mut mixed = mix::mix_stems(&tracks)?;

            let fx = PlaybackEffects {
                tempo,
                reverb,
                gain_db,
            };
            if !fx.is_identity() {
                // Effects run on a mono fold, like the playback path always did.
                let processed = effects::process(&mixed.to_mono(), mixed.sample_rate, &fx);
                mixed = StemData {
                    samples: processed,
                    sample_rate: mixed.sample_rate,
                    channels: 1,
                };
            }

            mixed.write_wav(&output)?;
            println!("{}", output.display());

            if play {
                playback::play_buffer(&mixed.to_mono(), mixed.sample_rate)?;
            }
        }

        Command::Resolve {
            chord_files,
            stem_files,
        } => {
            let instruments = resolve::resolve_instruments(&chord_files, &stem_files);
            let json = serde_json::to_string_pretty(&instruments)
                .map_err(|e| SyncError::File(e.to_string()))?;
            println!("{}", json);
        }

        Command::Serve { port, demo_dir } => {
            let runtime = tokio::runtime::Runtime::new()
                .map_err(|e| SyncError::Server(e.to_string()))?;
            runtime.block_on(server::serve(AppState { demo_dir }, port))?;
        }
    }

    Ok(())
}
