//! Pitch CLI
//!
//! Builds pitch trajectories from `pitches.txt` / `envconfig.txt` and either
//! prints summaries or plays them back headlessly at a fixed frame rate.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use pitch_core::{PitchSession, PitchSummary, RenderFrame, SessionOptions};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "pitch")]
#[command(about = "Simulate and replay baseball pitch trajectories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct SourceArgs {
    /// Pitch definition file
    #[arg(long, default_value = pitch_core::config::PITCH_FILE_NAME)]
    pitches: PathBuf,

    /// Environment override file (optional)
    #[arg(long, default_value = pitch_core::config::ENV_FILE_NAME)]
    env: PathBuf,

    /// Master seed for random fields
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of pitches to load
    #[arg(long, default_value_t = pitch_core::MAX_PITCHES)]
    max_pitches: usize,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build every pitch and print a summary
    Simulate {
        #[command(flatten)]
        source: SourceArgs,

        /// Write the built pitch set as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Replay the pitches headlessly until every one has finished
    Play {
        #[command(flatten)]
        source: SourceArgs,

        /// Simulated frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Give up after this many wall-clock seconds of playback
        #[arg(long, default_value_t = 60.0)]
        max_seconds: f64,

        /// Print progress every N frames
        #[arg(long, default_value_t = 30)]
        every: u64,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { source, json } => {
            let session = open_session(&source)?;
            println!("⚾ Built {} pitch(es)", session.len());
            println!("   Seed: {}", session.pitch_set().seed);

            for summary in session.pitch_set().summaries() {
                print_summary(&summary);
            }

            if let Some(path) = json {
                write_export(&path, &session)?;
            }
        }

        Commands::Play {
            source,
            fps,
            max_seconds,
            every,
        } => {
            if !(fps.is_finite() && fps > 0.0) {
                anyhow::bail!("--fps must be positive, got {}", fps);
            }
            let mut session = open_session(&source)?;
            play(&mut session, fps, max_seconds, every.max(1));
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn open_session(source: &SourceArgs) -> Result<PitchSession> {
    println!("🔨 Loading pitches...");
    println!("   Pitches: {}", source.pitches.display());
    println!("   Env:     {}", source.env.display());

    let options = SessionOptions {
        max_pitches: source.max_pitches,
        seed: source.seed,
        ..SessionOptions::default()
    };

    PitchSession::load(&source.pitches, Some(&source.env), options)
        .with_context(|| format!("failed to load {}", source.pitches.display()))
}

#[cfg(feature = "cli")]
fn print_summary(s: &PitchSummary) {
    println!("\n   {}", s.annotation());
    println!(
        "     points: {:>7}   flight: {:.3} s",
        s.points, s.duration_s
    );
    match s.plate_crossing {
        Some(p) => println!(
            "     plate:  height {:.3} m, side {:+.3} m",
            p.y, p.z
        ),
        None => println!("     plate:  not reached"),
    }
}

#[cfg(feature = "cli")]
fn play(session: &mut PitchSession, fps: f64, max_seconds: f64, every: u64) {
    let dt = 1.0 / fps;
    let max_frames = (max_seconds * fps).ceil().max(1.0) as u64;

    println!("\n▶ Playing at {:.0} fps (time scale {:.3})", fps, session.playback().time_scale());

    let mut frame_no = 0u64;
    while session.playback().is_animating() && frame_no < max_frames {
        session.tick(dt);
        frame_no += 1;

        if frame_no % every == 0 {
            let frame = RenderFrame::capture(session);
            let progress: Vec<String> = frame
                .pitches
                .iter()
                .map(|p| format!("{}:{}/{}", p.index + 1, p.visible, p.points.len()))
                .collect();
            println!("   t={:>6.2}s  {}", frame_no as f64 * dt, progress.join("  "));
        }
    }

    let frame = RenderFrame::capture(session);
    if frame.animating {
        println!("\n⏱  Stopped after {} frames, still animating", frame_no);
    } else {
        println!("\n✅ All pitches finished after {} frames", frame_no);
    }
    for p in &frame.pitches {
        if let Some(text) = &p.annotation {
            println!("   {}", text);
        }
    }
}

#[cfg(feature = "cli")]
fn write_export(path: &Path, session: &PitchSession) -> Result<()> {
    let json = serde_json::to_string_pretty(session.pitch_set())?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    println!("\n📄 Pitch set saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("pitch CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use pitch_core::PitchSet;

    fn source_in(dir: &Path) -> SourceArgs {
        let pitches = dir.join("pitches.txt");
        std::fs::write(&pitches, "# Heater\nSpeed=150,Axis=(0,0,1),RPM=2300\n").unwrap();
        let env = dir.join("envconfig.txt");
        std::fs::write(&env, "DT=0.001\nPITCH_SPEED_SCALE=1\n").unwrap();
        SourceArgs {
            pitches,
            env,
            seed: Some(7),
            max_pitches: 8,
        }
    }

    #[test]
    fn test_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let session = open_session(&source_in(dir.path())).unwrap();
        let out = dir.path().join("set.json");
        write_export(&out, &session).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        let back: PitchSet = serde_json::from_str(&text).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.seed, 7);
        assert_eq!(back.pitches[0].entry.label.as_deref(), Some("Heater"));
    }

    #[test]
    fn test_play_runs_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open_session(&source_in(dir.path())).unwrap();
        play(&mut session, 60.0, 10.0, 1000);
        assert!(!session.playback().is_animating());
    }

    #[test]
    fn test_missing_pitch_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let source = SourceArgs {
            pitches: dir.path().join("nope.txt"),
            env: dir.path().join("env.txt"),
            seed: None,
            max_pitches: 8,
        };
        let err = open_session(&source).unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["pitch", "play", "--fps", "30", "--seed", "3"]).unwrap();
        match cli.command {
            Commands::Play { source, fps, .. } => {
                assert_eq!(fps, 30.0);
                assert_eq!(source.seed, Some(3));
                assert_eq!(source.pitches, PathBuf::from("pitches.txt"));
            }
            _ => panic!("expected play"),
        }
    }
}
