//! Runs the whole pipeline for one [`RunConfig`] and composes the result.
//!
//! Stage order is fixed because every random draw happens on one stream:
//! noise takes `columns * rows` draws, then particle placement takes two per
//! particle. Simulation itself draws nothing.

use flowfield_core::canvas::Canvas;
use flowfield_core::color::Srgb;
use flowfield_core::config::{Mode, RunConfig};
use flowfield_core::error::FlowError;
use flowfield_core::geometry::Line;
use flowfield_core::params::Parameters;
use flowfield_core::prng::Xorshift64;
use flowfield_core::DVec2;
use tracing::{info, warn};

use crate::noise;
use crate::particle::{self, Particle};
use crate::vector_field::VectorField;
use crate::window::clip_into_windows;

/// Stroke width for traced lines in both modes.
pub const LINE_WIDTH: f64 = 1.0;
/// Color of the rotated cell diagonals when the field is shown.
pub const FIELD_COLOR: Srgb = Srgb::new(0.85, 0.25, 0.2);
const FIELD_LINE_WIDTH: f64 = 0.5;

/// Raw simulation output before composition.
#[derive(Debug, Clone)]
pub struct FlowTrace {
    /// Every particle's trace, particle by particle, oldest segment first.
    pub lines: Vec<Line>,
    /// Rotated vector-field diagonals, row-major.
    pub field_lines: Vec<Line>,
    /// Particles stopped by the step cap before wrapping.
    pub capped: usize,
}

/// Finished run: drawing commands, the exported line list and the
/// configuration that produced them.
#[derive(Debug, Clone)]
pub struct Artwork {
    pub config: RunConfig,
    pub canvas: Canvas,
    pub lines: Vec<Line>,
}

impl Artwork {
    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn parameters(&self) -> &Parameters {
        &self.config.parameters
    }
}

/// One seeded run over a validated configuration.
#[derive(Debug, Clone)]
pub struct Drawing {
    config: RunConfig,
    rng: Xorshift64,
}

impl Drawing {
    /// Validates `config` and seeds the random stream.
    ///
    /// Nothing is drawn from the stream until [`trace`](Self::trace) runs.
    pub fn new(config: RunConfig) -> Result<Self, FlowError> {
        config.validate()?;
        let rng = Xorshift64::new(config.seed);
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Noise, vector field, forces, particles, warm-up and run-to-edge.
    pub fn trace(&mut self) -> Result<FlowTrace, FlowError> {
        let p = &self.config.parameters;
        let size = DVec2::new(self.config.width, self.config.height);

        info!(columns = p.columns, rows = p.rows, "building noise");
        let noise = noise::generate(p.columns, p.rows, p.noise_persistence, p.octaves, &mut self.rng)?;

        info!("building vector field");
        let mut field = VectorField::build(size, p.columns, p.rows)?;

        info!("applying noise to vector field");
        field.apply_noise(&noise)?;
        let forces = field.build_forces(p.vector_field_magnitude)?;

        info!(count = p.particle_count, "creating particles");
        let mut particles =
            particle::scatter(p.particle_count, self.config.bounds(), p.max_velocity, &mut self.rng);

        info!(passes = p.particle_loops, "warming up particles");
        particle::warm_up(&mut particles, &forces, size, p.particle_loops, p.keep_warm_up_trace);

        info!("moving particles until they hit the edge");
        let capped = particle::run_to_edge(&mut particles, &forces, size, p.max_steps);
        if capped > 0 {
            warn!(capped, max_steps = p.max_steps, "particles stopped before reaching an edge");
        }

        let lines: Vec<Line> = particles.into_iter().flat_map(Particle::into_trace).collect();
        Ok(FlowTrace {
            lines,
            field_lines: field.lines().to_vec(),
            capped,
        })
    }

    /// Traces the flow field and composes it according to the mode.
    pub fn render(mut self) -> Result<Artwork, FlowError> {
        let trace = self.trace()?;
        let config = self.config;
        let mut canvas = Canvas::new(config.width, config.height)?;

        let lines = match config.mode {
            Mode::Plain => trace.lines,
            Mode::Windowed => {
                let rects = config.windows.rects(config.bounds())?;
                info!(windows = rects.len(), "clipping into windows");
                let mut windowed = clip_into_windows(&trace.lines, &rects);
                windowed.extend(config.bounds().borders());
                windowed
            }
        };
        let (background, color) = config.colors();

        canvas.fill_background(background);
        if config.show_field {
            canvas.stroke(trace.field_lines, FIELD_COLOR, FIELD_LINE_WIDTH);
        }
        canvas.stroke(lines.clone(), color, LINE_WIDTH);
        info!(lines = lines.len(), mode = config.mode.name(), "drawing composed");

        Ok(Artwork {
            config,
            canvas,
            lines,
        })
    }
}
