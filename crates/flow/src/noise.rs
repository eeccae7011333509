//! Multi-octave value noise on a toroidal grid.
//!
//! A base grid of white noise is smoothed at several sample periods (1, 2,
//! 4, ... cells). Each smoothed octave bilinearly interpolates the base values
//! at its period's lattice points, wrapping past the right and top edges.
//! Octaves are then blended coarsest-first with amplitudes that decay by the
//! persistence factor, and normalized by the total amplitude.

use flowfield_core::error::FlowError;
use flowfield_core::field::Field;
use flowfield_core::prng::Xorshift64;
use tracing::debug;

/// Number of octaves blended by default.
pub const DEFAULT_OCTAVE_COUNT: usize = 8;

/// Draws a `width × height` grid of independent uniform values in [0, 1].
///
/// Cells are filled row-major: draw `k` lands at `(k % width, k / width)`.
/// This order is part of the output contract for a seed.
pub fn white_noise(width: usize, height: usize, rng: &mut Xorshift64) -> Result<Field, FlowError> {
    let mut field = Field::new(width, height)?;
    field
        .data_mut()
        .iter_mut()
        .for_each(|v| *v = rng.next_f64_inclusive());
    Ok(field)
}

fn lerp(x0: f64, x1: f64, alpha: f64) -> f64 {
    x0 * (1.0 - alpha) + alpha * x1
}

/// Lower lattice index, its wrapped successor, and the blend fraction
/// between them for coordinate `i` at sample period `period`.
fn bracket(i: usize, period: usize, len: usize) -> (usize, usize, f64) {
    let i0 = (i / period) * period;
    let i1 = (i0 + period) % len;
    let blend = (i - i0) as f64 / period as f64;
    (i0, i1, blend)
}

/// Smooths `base` at sample period `2^octave`.
///
/// Periods at least as large as the grid collapse onto lattice point 0 along
/// that axis.
pub fn smooth(base: &Field, octave: usize) -> Field {
    let width = base.width();
    let height = base.height();
    let period = u32::try_from(octave)
        .ok()
        .and_then(|o| 1usize.checked_shl(o))
        .unwrap_or(usize::MAX);

    let columns: Vec<(usize, usize, f64)> = (0..width).map(|x| bracket(x, period, width)).collect();
    let src = base.data();
    let at = |x: usize, y: usize| src[y * width + x];

    let mut smoothed = base.clone();
    for (y, row) in smoothed.data_mut().chunks_exact_mut(width).enumerate() {
        let (y0, y1, vertical) = bracket(y, period, height);
        for (x, cell) in row.iter_mut().enumerate() {
            let (x0, x1, horizontal) = columns[x];
            let near = lerp(at(x0, y0), at(x1, y0), horizontal);
            let far = lerp(at(x0, y1), at(x1, y1), horizontal);
            *cell = lerp(near, far, vertical);
        }
    }
    smoothed
}

/// Blends `octave_count` smoothed octaves of `base` into one grid.
///
/// The coarsest octave gets `persistence`, the next `persistence²`, and so
/// on; the sum is divided by the total amplitude. Any positive persistence
/// makes every cell a weighted average of base values, so it stays in [0, 1].
/// Persistence is not validated: zero gives NaN everywhere, and negative
/// values weight octaves with alternating signs, so cells can leave [0, 1].
pub fn blend(base: &Field, octave_count: usize, persistence: f64) -> Field {
    let mut accumulated = vec![0.0_f64; base.data().len()];
    let mut amplitude = 1.0_f64;
    let mut total_amplitude = 0.0_f64;

    for octave in (0..octave_count).rev() {
        amplitude *= persistence;
        total_amplitude += amplitude;
        let smoothed = smooth(base, octave);
        accumulated
            .iter_mut()
            .zip(smoothed.data())
            .for_each(|(acc, v)| *acc += v * amplitude);
    }

    // Only rounding drift can push a positive-weight average out of range.
    let weighted_average = persistence > 0.0;
    let mut noise = base.clone();
    noise
        .data_mut()
        .iter_mut()
        .zip(&accumulated)
        .for_each(|(out, acc)| {
            let v = acc / total_amplitude;
            *out = if weighted_average { v.clamp(0.0, 1.0) } else { v };
        });
    noise
}

/// Builds a noise grid: white noise from `rng`, smoothed and blended.
///
/// Advances `rng` by exactly `width * height` float draws.
pub fn generate(
    width: usize,
    height: usize,
    persistence: f64,
    octave_count: usize,
    rng: &mut Xorshift64,
) -> Result<Field, FlowError> {
    let base = white_noise(width, height, rng)?;
    let noise = blend(&base, octave_count, persistence);
    let (lo, hi) = noise.min_max();
    debug!(width, height, octave_count, persistence, lo, hi, "noise generated");
    Ok(noise)
}
