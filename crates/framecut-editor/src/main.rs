// crates/framecut-editor/src/main.rs

use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use framecut_core::composition::compile_with_canvas;
use framecut_core::helpers::time::format_duration;
use framecut_core::state::Violation;
use framecut_editor::cli::{Args, Command};
use framecut_editor::project_io::load_project;
use framecut_editor::EditorConfig;

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .format_timestamp_millis()
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None       => EditorConfig::default(),
    };

    match args.command {
        Command::Compile { project, fps, pretty } => {
            let state = load_project(&project)?;
            let fps   = fps.unwrap_or(config.fps);
            anyhow::ensure!(fps.is_finite() && fps > 0.0, "fps must be positive, got {fps}");

            let comp = compile_with_canvas(&state.tracks, fps, config.canvas());
            info!(
                "[compile] {} layers, {} frames ({}) at {fps} fps",
                comp.layers.len(),
                comp.duration_in_frames,
                format_duration(comp.duration_in_frames as f64 / fps),
            );
            let json = if pretty {
                serde_json::to_string_pretty(&comp)
            } else {
                serde_json::to_string(&comp)
            }
            .context("serialising composition")?;
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { project } => {
            let state      = load_project(&project)?;
            let violations = state.violations();
            if violations.is_empty() {
                info!(
                    "[check] {} ok, {} tracks, {} long",
                    project.display(),
                    state.tracks.len(),
                    format_duration(state.total_duration()),
                );
                return Ok(ExitCode::SUCCESS);
            }
            for v in &violations {
                println!("{}", describe(v));
            }
            error!("[check] {} violations in {}", violations.len(), project.display());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn describe(v: &Violation) -> String {
    match v {
        Violation::Overlap { track, a, b } =>
            format!("overlap on track {track}: {a} and {b}"),
        Violation::ShortClip { clip, duration } =>
            format!("clip {clip} is {duration}s long"),
        Violation::NegativeStart { clip, start_time } =>
            format!("clip {clip} starts at {start_time}"),
        Violation::NegativeOffset { clip, offset } =>
            format!("clip {clip} has in-point {offset}"),
        Violation::WrongOwner { clip, track } =>
            format!("clip {clip} sits on track {track} but names another track"),
    }
}
