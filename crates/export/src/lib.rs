#![deny(unsafe_code)]
//! Output collaborators for a finished [`Artwork`].
//!
//! A run writes four files into `<dest>/<seed>/`:
//! - `image.png`: the rasterized canvas (needs the `png` feature, default on)
//! - `image.txt`: the line list, see [`lines`]
//! - `parameters.json`: the `Parameters` record, pretty-printed
//! - `run.json`: the full `RunConfig`, enough to render the run again
//!
//! The rasterizer itself lives in [`pixel`] and is always available.

pub mod lines;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use flowfield_core::config::RunConfig;
use flowfield_core::error::FlowError;
use flowfield_core::params::Parameters;
use serde::Serialize;
use flowfield_flow::Artwork;
use std::path::{Path, PathBuf};
use tracing::info;

pub const IMAGE_FILE: &str = "image.png";
pub const LINES_FILE: &str = "image.txt";
pub const PARAMETERS_FILE: &str = "parameters.json";
pub const RUN_FILE: &str = "run.json";

/// Where each artifact of a run was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    /// `None` when built without the `png` feature.
    pub image: Option<PathBuf>,
    pub lines: PathBuf,
    pub parameters: PathBuf,
    pub run: PathBuf,
}

/// The per-seed directory under `dest`.
pub fn output_dir(dest: &Path, seed: u64) -> PathBuf {
    dest.join(seed.to_string())
}

fn write_json<T: Serialize>(value: &T, what: &str, path: &Path) -> Result<(), FlowError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| FlowError::Io(format!("serializing {what}: {e}")))?;
    std::fs::write(path, json).map_err(|e| FlowError::Io(format!("writing {}: {e}", path.display())))
}

/// Writes `parameters` as pretty JSON.
pub fn write_parameters(parameters: &Parameters, path: &Path) -> Result<(), FlowError> {
    write_json(parameters, "parameters", path)
}

/// Writes `config` as pretty JSON.
pub fn write_run_config(config: &RunConfig, path: &Path) -> Result<(), FlowError> {
    write_json(config, "run config", path)
}

/// Reads a config written by [`write_run_config`].
pub fn read_run_config(path: &Path) -> Result<RunConfig, FlowError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| FlowError::Io(format!("reading {}: {e}", path.display())))?;
    serde_json::from_str(&json)
        .map_err(|e| FlowError::InvalidConfig(format!("{}: {e}", path.display())))
}

#[cfg(feature = "png")]
fn write_image(artwork: &Artwork, dir: &Path) -> Result<Option<PathBuf>, FlowError> {
    let path = dir.join(IMAGE_FILE);
    snapshot::write_canvas_png(&artwork.canvas, &path)?;
    Ok(Some(path))
}

#[cfg(not(feature = "png"))]
fn write_image(_artwork: &Artwork, _dir: &Path) -> Result<Option<PathBuf>, FlowError> {
    Ok(None)
}

/// Writes every artifact of `artwork` into `<dest>/<seed>/`, creating the
/// directory if needed. Existing files are overwritten.
pub fn write_artwork(artwork: &Artwork, dest: &Path) -> Result<OutputPaths, FlowError> {
    let dir = output_dir(dest, artwork.seed());
    std::fs::create_dir_all(&dir)
        .map_err(|e| FlowError::Io(format!("creating {}: {e}", dir.display())))?;

    info!(lines = artwork.lines.len(), dir = %dir.display(), "saving lines");
    let lines = dir.join(LINES_FILE);
    lines::write_line_list(&artwork.lines, &lines)?;

    let image = write_image(artwork, &dir)?;

    let parameters = dir.join(PARAMETERS_FILE);
    write_parameters(artwork.parameters(), &parameters)?;

    let run = dir.join(RUN_FILE);
    write_run_config(&artwork.config, &run)?;

    Ok(OutputPaths {
        dir,
        image,
        lines,
        parameters,
        run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowfield_core::config::{Mode, RunConfig};
    use flowfield_flow::Drawing;

    fn artwork(seed: u64, mode: Mode) -> Artwork {
        let mut config = RunConfig::new(seed);
        config.width = 120.0;
        config.height = 90.0;
        config.mode = mode;
        config.windows.margin = 10.0;
        config.windows.gap = 5.0;
        config.parameters.particle_count = 15;
        config.parameters.columns = 6;
        config.parameters.rows = 5;
        Drawing::new(config).unwrap().render().unwrap()
    }

    #[test]
    fn output_dir_is_named_after_seed() {
        assert_eq!(
            output_dir(Path::new("/tmp/out"), 1234),
            PathBuf::from("/tmp/out/1234")
        );
    }

    #[test]
    fn write_artwork_lays_out_seed_directory() {
        let art = artwork(99, Mode::Plain);
        let dest = tempfile::tempdir().unwrap();
        let paths = write_artwork(&art, dest.path()).unwrap();

        assert_eq!(paths.dir, dest.path().join("99"));
        assert_eq!(paths.lines, paths.dir.join("image.txt"));
        assert_eq!(paths.parameters, paths.dir.join("parameters.json"));

        let text = std::fs::read_to_string(&paths.lines).unwrap();
        assert_eq!(text.lines().count(), art.lines.len());
        assert!(text.lines().all(|l| l.split(';').count() == 2));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.parameters).unwrap()).unwrap();
        assert_eq!(json["particle_count"], 15);
        assert_eq!(&Parameters::from_json(&json), art.parameters());
    }

    #[test]
    fn run_config_in_output_reproduces_the_artwork() {
        let mut art = artwork(21, Mode::Windowed);
        art.config.show_field = true;
        art.config.stroke = Some(flowfield_core::Srgb::from_hex("#a0b0c0").unwrap());
        let art = Drawing::new(art.config).unwrap().render().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let paths = write_artwork(&art, dest.path()).unwrap();
        assert_eq!(paths.run, paths.dir.join("run.json"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.run).unwrap()).unwrap();
        assert_eq!(json["seed"], 21);
        assert_eq!(json["mode"], "windowed");
        assert_eq!(json["width"], 120.0);
        assert_eq!(json["stroke"], "#a0b0c0");

        let config = read_run_config(&paths.run).unwrap();
        assert_eq!(config, art.config);
        let again = Drawing::new(config).unwrap().render().unwrap();
        assert_eq!(again.lines, art.lines);
        assert_eq!(again.canvas, art.canvas);
    }

    #[test]
    fn unreadable_run_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("run.json");
        assert!(matches!(read_run_config(&missing), Err(FlowError::Io(_))));
        std::fs::write(&missing, "{\"seed\": 1}").unwrap();
        assert!(matches!(
            read_run_config(&missing),
            Err(FlowError::InvalidConfig(_))
        ));
    }

    #[cfg(feature = "png")]
    #[test]
    fn write_artwork_writes_png_of_canvas_size() {
        let art = artwork(5, Mode::Windowed);
        let dest = tempfile::tempdir().unwrap();
        let paths = write_artwork(&art, dest.path()).unwrap();
        let image = paths.image.unwrap();
        assert_eq!(image, paths.dir.join("image.png"));
        let img = image::open(&image).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (120, 90));
    }

    #[test]
    fn rewriting_same_seed_overwrites() {
        let art = artwork(3, Mode::Plain);
        let dest = tempfile::tempdir().unwrap();
        write_artwork(&art, dest.path()).unwrap();
        let paths = write_artwork(&art, dest.path()).unwrap();
        let text = std::fs::read_to_string(&paths.lines).unwrap();
        assert_eq!(text, lines::format_line_list(&art.lines));
    }

    #[test]
    fn unwritable_destination_is_io_error() {
        let dest = tempfile::tempdir().unwrap();
        let blocker = dest.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let art = artwork(1, Mode::Plain);
        assert!(matches!(
            write_artwork(&art, &blocker),
            Err(FlowError::Io(_))
        ));
    }
}
