#![deny(unsafe_code)]
//! CLI binary for the flowfield generator.
//!
//! Subcommands:
//! - `render <dest>`: run one seed, write `<dest>/<seed>/{image.png, image.txt, parameters.json, run.json}`
//! - `render <dest> --from <run.json>`: render a saved run again
//! - `list`: print composition modes and default parameters

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use flowfield_core::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use flowfield_core::{FlowError, Mode, Parameters, RunConfig, Srgb};
use flowfield_flow::Drawing;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flowfield", about = "Seeded flow-field particle drawings")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Only log warnings and errors (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one drawing and write its image, line list and parameters.
    Render {
        /// Directory the per-seed output directory is created in.
        dest: PathBuf,

        /// PRNG seed; a random one is chosen when omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Composition mode (plain, windowed).
        #[arg(short, long, default_value = "plain")]
        mode: String,

        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = DEFAULT_WIDTH)]
        width: f64,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
        height: f64,

        /// Number of windows in windowed mode.
        #[arg(long)]
        windows: Option<usize>,

        /// Also draw the rotated vector field.
        #[arg(long)]
        show_field: bool,

        /// Stroke color for the traced lines, e.g. '#f0c040'.
        #[arg(long)]
        color: Option<String>,

        /// Background color, e.g. '#202840'.
        #[arg(long)]
        background: Option<String>,

        /// Parameter overrides as a JSON object, e.g. '{"particle_count": 500}'.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Render the run recorded in a `run.json` instead of building one from flags.
        #[arg(long, conflicts_with_all = [
            "seed", "mode", "width", "height", "windows", "show_field", "color", "background", "params",
        ])]
        from: Option<PathBuf>,
    },
    /// List composition modes and default parameters.
    List,
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_color(hex: Option<&str>) -> Result<Option<Srgb>, CliError> {
    Ok(hex.map(Srgb::from_hex).transpose()?)
}

fn load_run_config(path: &std::path::Path) -> Result<RunConfig, CliError> {
    flowfield_export::read_run_config(path).map_err(|e| match e {
        FlowError::InvalidConfig(msg) => CliError::Input(format!("invalid run config {msg}")),
        other => other.into(),
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let modes = Mode::list_names();
            let defaults = Parameters::default();
            if cli.json {
                let info = serde_json::json!({
                    "modes": modes,
                    "parameters": defaults,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Modes:");
                for name in modes {
                    println!("  {name}");
                }
                println!("Default parameters:");
                println!("{}", serde_json::to_string_pretty(&defaults)?);
            }
        }
        Command::Render {
            dest,
            seed,
            mode,
            width,
            height,
            windows,
            show_field,
            color,
            background,
            params,
            from,
        } => {
            let config = match from {
                Some(path) => load_run_config(&path)?,
                None => {
                    let params: serde_json::Value = serde_json::from_str(&params)
                        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
                    if !params.is_object() {
                        return Err(CliError::Input("--params must be a JSON object".into()));
                    }

                    let mut config = RunConfig::new(seed.unwrap_or_else(rand::random));
                    config.width = width;
                    config.height = height;
                    config.mode = Mode::from_name(&mode)?;
                    config.show_field = show_field;
                    config.stroke = parse_color(color.as_deref())?;
                    config.background = parse_color(background.as_deref())?;
                    config.parameters = Parameters::from_json(&params);
                    if let Some(count) = windows {
                        config.windows.count = count;
                    }
                    config
                }
            };

            let (seed, width, height) = (config.seed, config.width, config.height);
            let mode = config.mode.name();
            info!(seed, mode, width, height, "starting run");
            let artwork = Drawing::new(config)?.render()?;
            let paths = flowfield_export::write_artwork(&artwork, &dest)?;

            if cli.json {
                let info = serde_json::json!({
                    "seed": seed,
                    "mode": mode,
                    "width": width,
                    "height": height,
                    "lines": artwork.lines.len(),
                    "dir": paths.dir.display().to_string(),
                    "image": paths.image.map(|p| p.display().to_string()),
                    "run": paths.run.display().to_string(),
                    "parameters": artwork.parameters(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered seed {seed} ({mode}, {width}x{height}, {} lines) -> {}",
                    artwork.lines.len(),
                    paths.dir.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
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
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_defaults_to_plain_default_canvas_and_random_seed() {
        let cli = Cli::try_parse_from(["flowfield", "render", "out"]).unwrap();
        match cli.command {
            Command::Render {
                dest,
                seed,
                mode,
                width,
                height,
                ..
            } => {
                assert_eq!(dest, PathBuf::from("out"));
                assert_eq!(seed, None);
                assert_eq!(mode, "plain");
                assert_eq!((width, height), (1000.0, 1200.0));
            }
            Command::List => panic!("expected render"),
        }
    }

    #[test]
    fn render_flags_parse() {
        let cli = Cli::try_parse_from([
            "flowfield",
            "--json",
            "render",
            "out",
            "--seed",
            "42",
            "--mode",
            "windowed",
            "--show-field",
            "-W",
            "500",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Render {
                seed,
                mode,
                show_field,
                width,
                ..
            } => {
                assert_eq!(seed, Some(42));
                assert_eq!(mode, "windowed");
                assert!(show_field);
                assert_eq!(width, 500.0);
            }
            Command::List => panic!("expected render"),
        }
    }

    fn render_cli(dest: &std::path::Path, extra: &[&str]) -> Cli {
        let dest = dest.to_string_lossy().into_owned();
        let mut args = vec!["flowfield", "render", dest.as_str(), "--seed", "7"];
        args.extend_from_slice(extra);
        args.extend_from_slice(&["-W", "80", "-H", "60", "--params"]);
        args.push(r#"{"particle_count": 10, "columns": 8, "rows": 6}"#);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn bad_params_json_is_input_error() {
        let dir = std::env::temp_dir();
        let cli = Cli::try_parse_from([
            "flowfield",
            "render",
            dir.to_str().unwrap(),
            "--params",
            "{oops",
        ])
        .unwrap();
        assert_eq!(run(cli).unwrap_err().exit_code(), 12);
    }

    #[test]
    fn unknown_mode_is_input_error() {
        let dir = std::env::temp_dir();
        let cli = render_cli(&dir, &["--mode", "spiral"]);
        assert_eq!(run(cli).unwrap_err().exit_code(), 12);
    }

    #[test]
    fn bad_color_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = render_cli(dir.path(), &["--color", "#12zz45"]);
        assert_eq!(run(cli).unwrap_err().exit_code(), 12);
        let cli = render_cli(dir.path(), &["--background", "blue"]);
        assert_eq!(run(cli).unwrap_err().exit_code(), 12);
    }

    #[test]
    fn from_conflicts_with_run_flags() {
        let result =
            Cli::try_parse_from(["flowfield", "render", "out", "--from", "run.json", "--seed", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn render_from_saved_run_reproduces_it() {
        let dest = tempfile::tempdir().unwrap();
        let cli = render_cli(
            dest.path(),
            &["--show-field", "--color", "#f0c040", "--background", "#202840"],
        );
        run(cli).unwrap();
        let first = dest.path().join("7");
        let saved = flowfield_export::read_run_config(&first.join("run.json")).unwrap();
        assert_eq!((saved.width, saved.height), (80.0, 60.0));
        assert!(saved.show_field);
        assert_eq!(saved.stroke, Some(Srgb::from_hex("#f0c040").unwrap()));
        assert_eq!(saved.parameters.particle_count, 10);
        let lines = std::fs::read_to_string(first.join("image.txt")).unwrap();

        let again = tempfile::tempdir().unwrap();
        let run_file = first.join("run.json");
        let cli = Cli::try_parse_from([
            "flowfield",
            "render",
            again.path().to_str().unwrap(),
            "--from",
            run_file.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();
        let replay = again.path().join("7");
        assert_eq!(std::fs::read_to_string(replay.join("image.txt")).unwrap(), lines);
        assert_eq!(
            flowfield_export::read_run_config(&replay.join("run.json")).unwrap(),
            saved
        );
    }

    #[test]
    fn malformed_run_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let run_file = dir.path().join("run.json");
        std::fs::write(&run_file, "{\"seed\": 7}").unwrap();
        let cli = Cli::try_parse_from([
            "flowfield",
            "render",
            dir.path().to_str().unwrap(),
            "--from",
            run_file.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(run(cli).unwrap_err().exit_code(), 12);
    }

    #[test]
    fn windowed_layout_without_room_is_pipeline_error() {
        let dir = std::env::temp_dir();
        let cli = render_cli(&dir, &["--mode", "windowed"]);
        // Default margins do not fit an 80 pixel wide canvas.
        assert_eq!(run(cli).unwrap_err().exit_code(), 10);
    }
}
