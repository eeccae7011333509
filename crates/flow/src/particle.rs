//! Point-mass particles advected by a [`ForceField`].
//!
//! A particle always moves at its speed cap: each step adds the accumulated
//! force to its velocity and rescales the result to `max_velocity`, so forces
//! only steer. Every step records the segment it travelled. Crossing a canvas
//! edge wraps the particle to the opposite edge and marks it as wrapped.

use flowfield_core::geometry::{scaled_to, Line, Rect};
use flowfield_core::prng::Xorshift64;
use flowfield_core::DVec2;

use crate::vector_field::ForceField;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Progress of a particle through the current run-to-edge phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Still moving; has not crossed an edge since the phase began.
    Active,
    /// Crossed an edge at least once.
    WrappedOnce,
}

#[derive(Debug, Clone)]
pub struct Particle {
    position: DVec2,
    previous: DVec2,
    velocity: DVec2,
    acceleration: DVec2,
    max_velocity: f64,
    trace: Vec<Line>,
    phase: Phase,
}

impl Particle {
    /// A particle at rest at `start`.
    pub fn new(start: DVec2, max_velocity: f64) -> Self {
        Self {
            position: start,
            previous: start,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            max_velocity,
            trace: Vec::new(),
            phase: Phase::Active,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn previous_position(&self) -> DVec2 {
        self.previous
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_wrapped(&self) -> bool {
        self.phase == Phase::WrappedOnce
    }

    /// Segments travelled so far, oldest first.
    pub fn trace(&self) -> &[Line] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<Line> {
        self.trace
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Starts a new run-to-edge phase.
    pub fn rearm(&mut self) {
        self.phase = Phase::Active;
    }

    /// Accumulates `force`; it takes effect on the next [`step`](Self::step).
    pub fn apply_force(&mut self, force: DVec2) {
        self.acceleration += force;
    }

    /// Integrates one step and records the travelled segment.
    ///
    /// If velocity plus acceleration is the zero vector there is no direction
    /// to rescale, and the previous velocity is kept.
    pub fn step(&mut self) {
        self.previous = self.position;
        if let Ok(v) = scaled_to(self.velocity + self.acceleration, self.max_velocity) {
            self.velocity = v;
        }
        self.position += self.velocity;
        self.acceleration = DVec2::ZERO;
        self.trace.push(Line::new(self.previous, self.position));
    }

    /// Toroidal wrap against a canvas of `size` anchored at the origin.
    ///
    /// Past the right (top) edge the coordinate resets to 0; past the left
    /// (bottom) edge it resets to the width (height). Any wrap also moves the
    /// previous position so the next segment starts on the new side.
    pub fn wrap(&mut self, size: DVec2) {
        let mut wrapped = false;
        if self.position.x > size.x {
            self.position.x = 0.0;
            wrapped = true;
        }
        if self.position.x < 0.0 {
            self.position.x = size.x;
            wrapped = true;
        }
        if self.position.y > size.y {
            self.position.y = 0.0;
            wrapped = true;
        }
        if self.position.y < 0.0 {
            self.position.y = size.y;
            wrapped = true;
        }
        if wrapped {
            self.previous = self.position;
            self.phase = Phase::WrappedOnce;
        }
    }

    /// Samples the field, steps, and wraps.
    pub fn advance(&mut self, field: &ForceField, size: DVec2) {
        self.apply_force(field.vector_at(self.position));
        self.step();
        self.wrap(size);
    }

    /// Advances until the particle wraps or `max_steps` steps have run.
    ///
    /// Returns the number of steps taken.
    pub fn run_to_edge(&mut self, field: &ForceField, size: DVec2, max_steps: usize) -> usize {
        let mut steps = 0;
        while self.phase == Phase::Active && steps < max_steps {
            self.advance(field, size);
            steps += 1;
        }
        steps
    }
}

/// Places `count` particles uniformly at random inside `bounds`, at rest.
///
/// Each particle draws its x then its y from `rng`.
pub fn scatter(count: usize, bounds: Rect, max_velocity: f64, rng: &mut Xorshift64) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let x = rng.next_range(bounds.min_x(), bounds.max_x());
            let y = rng.next_range(bounds.min_y(), bounds.max_y());
            Particle::new(DVec2::new(x, y), max_velocity)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn for_each_particle<F>(particles: &mut [Particle], f: F)
where
    F: Fn(&mut Particle) + Sync + Send,
{
    particles.par_iter_mut().for_each(f);
}

#[cfg(not(feature = "parallel"))]
fn for_each_particle<F>(particles: &mut [Particle], f: F)
where
    F: Fn(&mut Particle) + Sync + Send,
{
    particles.iter_mut().for_each(f);
}

/// Runs `passes` warm-up steps on every particle.
///
/// Unless `keep_trace` is set, the warm-up segments are dropped afterwards.
/// Every particle is rearmed for the run-to-edge phase.
pub fn warm_up(particles: &mut [Particle], field: &ForceField, size: DVec2, passes: usize, keep_trace: bool) {
    for_each_particle(particles, |p| {
        for _ in 0..passes {
            p.advance(field, size);
        }
        if !keep_trace {
            p.clear_trace();
        }
        p.rearm();
    });
}

/// Runs every particle to its first wrap, capped at `max_steps` steps each.
///
/// Returns how many particles hit the cap without wrapping.
pub fn run_to_edge(particles: &mut [Particle], field: &ForceField, size: DVec2, max_steps: usize) -> usize {
    for_each_particle(particles, |p| {
        p.run_to_edge(field, size, max_steps);
    });
    particles.iter().filter(|p| !p.has_wrapped()).count()
}
