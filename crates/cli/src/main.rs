#![deny(unsafe_code)]
//! CLI binary for tilemaker, the terrain scene synthesizer.
//!
//! Subcommands:
//! - `render <scene>`: render one frame to SVG (optionally save/replay a seed)
//! - `animate <scene>`: write one full loop of an animated scene as SVG frames
//! - `list`: print available scenes
//! - `schema <scene>`: print a scene's parameter schema

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use log::info;
use std::path::{Path, PathBuf};
use std::process;
use tilemaker_core::{SceneError, SceneSeed, SvgDocument};
use tilemaker_terrain::{create_scene, paint, run_for, SceneKind, DEFAULT_SIZE};

/// Simulation tick used to reach a `--time` in a looping scene.
const TICK: f64 = 1.0 / 30.0;

#[derive(Parser)]
#[command(name = "tilemaker", about = "Terrain scene synthesizer CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one frame of a scene to an SVG file.
    Render {
        /// Scene name (e.g. "city"). Optional with --replay.
        scene: Option<String>,

        /// Canvas edge length in pixels.
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: f64,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Scene parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Seconds into the animation (looping scenes only).
        #[arg(long, default_value_t = 0.0)]
        time: f64,

        /// Output file path.
        #[arg(short, long, default_value = "output.svg")]
        output: PathBuf,

        /// Also write the render's seed next to the output.
        #[arg(long)]
        save_seed: bool,

        /// Re-render from a saved seed file, ignoring scene/size/seed/params/time.
        #[arg(long)]
        replay: Option<PathBuf>,
    },
    /// Write one full loop of an animated scene as numbered SVG frames.
    Animate {
        /// Scene name (e.g. "citywave").
        scene: String,

        /// Frames per loop.
        #[arg(long, default_value_t = 48)]
        frames: usize,

        /// Directory for frame_0000.svg, frame_0001.svg, ...
        #[arg(long, default_value = "frames")]
        out_dir: PathBuf,

        /// Canvas edge length in pixels.
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: f64,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Scene parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available scenes.
    List,
    /// Print the parameter schema of a scene.
    Schema {
        /// Scene name.
        scene: String,
    },
}

fn parse_params(text: &str) -> Result<serde_json::Value, CliError> {
    let params: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| CliError::parse("--params", e))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    Ok(params)
}

/// `out.svg` -> `out.seed.json`.
fn seed_path(output: &Path) -> PathBuf {
    output.with_extension("seed.json")
}

fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{index:04}.svg"))
}

/// Reads a seed saved by `render --save-seed`.
fn load_seed(path: &Path) -> Result<SceneSeed, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    SceneSeed::from_json_str(&text).map_err(|e| match e {
        SceneError::MalformedSeed(detail) => CliError::parse(path.display().to_string(), detail),
        other => other.into(),
    })
}

/// Renders the frame described by `seed` into `output`.
fn render_to(seed: &SceneSeed, output: &Path) -> Result<usize, CliError> {
    seed.validate()?;
    let mut scene = create_scene(&seed.scene, seed.size, seed.seed, &seed.params)?;
    if seed.time > 0.0 {
        if scene.loop_period().is_none() {
            return Err(CliError::Input(format!(
                "scene '{}' is still; --time needs an animated scene",
                seed.scene
            )));
        }
        run_for(scene.as_mut(), seed.time, TICK)?;
    }
    let frame = scene.frame();
    let mut doc = SvgDocument::new();
    paint(&frame, Some(&mut doc))?;
    doc.write(output)?;
    info!("wrote {} ({} faces)", output.display(), frame.faces.len());
    Ok(frame.meta.buildings)
}

/// Writes `frames` evenly spaced frames covering exactly one loop.
fn animate_to(seed: &SceneSeed, out_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    seed.validate()?;
    if seed.frames == 0 {
        return Err(CliError::Input("--frames must be at least 1".into()));
    }
    let mut scene = create_scene(&seed.scene, seed.size, seed.seed, &seed.params)?;
    let period = scene.loop_period().ok_or_else(|| {
        CliError::Input(format!("scene '{}' is still and cannot be animated", seed.scene))
    })?;
    std::fs::create_dir_all(out_dir)
        .map_err(|e| CliError::io(out_dir, e))?;

    let dt = period / seed.frames as f64;
    let mut written = Vec::with_capacity(seed.frames);
    for k in 0..seed.frames {
        if k > 0 {
            scene.advance(dt)?;
        }
        let path = frame_path(out_dir, k);
        let mut doc = SvgDocument::new();
        paint(&scene.frame(), Some(&mut doc))?;
        doc.write(&path)?;
        written.push(path);
    }
    info!("wrote {} frames to {}", written.len(), out_dir.display());
    Ok(written)
}

fn print_json(value: &serde_json::Value) {
    println!("{value:#}");
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            if cli.json {
                let scenes: Vec<_> = SceneKind::ALL
                    .iter()
                    .map(|k| {
                        serde_json::json!({
                            "name": k.name(),
                            "description": k.description(),
                            "animated": k.animated(),
                        })
                    })
                    .collect();
                print_json(&serde_json::json!({ "scenes": scenes }));
            } else {
                println!("Scenes:");
                for kind in SceneKind::ALL {
                    println!("  {:<10} {}", kind.name(), kind.description());
                }
            }
        }
        Command::Schema { scene } => {
            let kind = SceneKind::from_name(&scene)?;
            print_json(&kind.schema());
        }
        Command::Render {
            scene,
            size,
            seed,
            params,
            time,
            output,
            save_seed,
            replay,
        } => {
            let job = match replay {
                Some(path) => load_seed(&path)?,
                None => {
                    let scene = scene.ok_or_else(|| {
                        CliError::Input("a scene name is required unless --replay is given".into())
                    })?;
                    SceneSeed {
                        params: parse_params(&params)?,
                        time,
                        ..SceneSeed::new(&scene, size, seed)
                    }
                }
            };

            let buildings = render_to(&job, &output)?;

            let seed_file = if save_seed {
                let path = seed_path(&output);
                let file = std::fs::File::create(&path).map_err(|e| CliError::io(&path, e))?;
                serde_json::to_writer_pretty(file, &job)
                    .map_err(|e| CliError::io(&path, e.into()))?;
                Some(path)
            } else {
                None
            };

            if cli.json {
                print_json(&serde_json::json!({
                    "scene": job.scene,
                    "size": job.size,
                    "seed": job.seed,
                    "time": job.time,
                    "buildings": buildings,
                    "output": output.display().to_string(),
                    "seed_file": seed_file.map(|p| p.display().to_string()),
                }));
            } else {
                eprintln!(
                    "rendered {} ({}px, seed {}, t={}s, {buildings} buildings) -> {}",
                    job.scene,
                    job.size,
                    job.seed,
                    job.time,
                    output.display()
                );
            }
        }
        Command::Animate {
            scene,
            frames,
            out_dir,
            size,
            seed,
            params,
        } => {
            let job = SceneSeed {
                params: parse_params(&params)?,
                frames,
                ..SceneSeed::new(&scene, size, seed)
            };
            let written = animate_to(&job, &out_dir)?;
            if cli.json {
                print_json(&serde_json::json!({
                    "scene": job.scene,
                    "seed": job.seed,
                    "frames": written.len(),
                    "out_dir": out_dir.display().to_string(),
                }));
            } else {
                eprintln!(
                    "animated {} (seed {}, {} frames) -> {}",
                    job.scene,
                    job.seed,
                    written.len(),
                    out_dir.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{j:#}");
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn params_must_be_an_object() {
        assert!(parse_params("{}").is_ok());
        assert_eq!(parse_params("[1]").unwrap_err().exit_code(), 12);
        let err = parse_params("{oops").unwrap_err();
        assert_eq!(err.exit_code(), 13);
        assert!(err.to_string().starts_with("malformed JSON in --params"));
    }

    #[test]
    fn seed_path_replaces_extension() {
        assert_eq!(seed_path(Path::new("out/city.svg")), PathBuf::from("out/city.seed.json"));
    }

    #[test]
    fn render_then_replay_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.svg");
        let second = dir.path().join("b.svg");
        let job = SceneSeed::new("city", 300.0, 9);
        render_to(&job, &first).unwrap();

        let text = serde_json::to_string(&job).unwrap();
        let replayed = SceneSeed::from_json_str(&text).unwrap();
        render_to(&replayed, &second).unwrap();

        let a = std::fs::read_to_string(first).unwrap();
        let b = std::fs::read_to_string(second).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("data-buildings"));
    }

    #[test]
    fn replay_file_errors_map_to_distinct_codes() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.seed.json");
        assert_eq!(load_seed(&missing).unwrap_err().exit_code(), 11);

        let broken = dir.path().join("broken.seed.json");
        std::fs::write(&broken, "{\"scene\": \"city\",").unwrap();
        let err = load_seed(&broken).unwrap_err();
        assert_eq!(err.exit_code(), 13);
        assert!(err.to_string().contains("broken.seed.json"));

        let flat = dir.path().join("flat.seed.json");
        std::fs::write(&flat, r#"{"scene":"city","size":0,"params":{},"seed":1}"#).unwrap();
        assert_eq!(load_seed(&flat).unwrap_err().exit_code(), 10);
    }

    #[test]
    fn saved_seed_replays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("city.seed.json");
        let job = SceneSeed::new("city", 250.0, 3);
        std::fs::write(&path, serde_json::to_string_pretty(&job).unwrap()).unwrap();
        assert_eq!(load_seed(&path).unwrap(), job);
    }

    #[test]
    fn time_on_still_scene_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let job = SceneSeed {
            time: 1.0,
            ..SceneSeed::new("city", 200.0, 1)
        };
        let err = render_to(&job, &dir.path().join("x.svg")).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn unknown_scene_exit_code_is_10() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_to(&SceneSeed::new("harbor", 200.0, 1), &dir.path().join("x.svg")).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn unwritable_output_exit_code_is_11() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("x.svg");
        let err = render_to(&SceneSeed::new("city", 200.0, 1), &path).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn animate_writes_one_loop_of_frames() {
        let dir = tempfile::tempdir().unwrap();
        let job = SceneSeed {
            frames: 3,
            params: serde_json::json!({"max_buildings": 20}),
            ..SceneSeed::new("citywave", 200.0, 4)
        };
        let written = animate_to(&job, dir.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written[2].ends_with("frame_0002.svg"));
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn block_frames_carry_the_pane() {
        let dir = tempfile::tempdir().unwrap();
        let job = SceneSeed {
            frames: 2,
            ..SceneSeed::new("block", 200.0, 8)
        };
        let written = animate_to(&job, dir.path()).unwrap();
        let svg = std::fs::read_to_string(&written[1]).unwrap();
        assert!(svg.contains("clip-path=\"url(#scene-pane)\""));
    }

    #[test]
    fn still_scene_cannot_be_animated() {
        let dir = tempfile::tempdir().unwrap();
        let job = SceneSeed {
            frames: 2,
            ..SceneSeed::new("city", 200.0, 4)
        };
        assert_eq!(animate_to(&job, dir.path()).unwrap_err().exit_code(), 12);
    }
}
