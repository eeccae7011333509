//! The run [`Parameters`] record and typed lookups into JSON overrides.
//!
//! `Parameters` is both an input to the pipeline and an output artifact:
//! it is written next to the image so a run can be reproduced.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// JSON integers are accepted and converted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing,
/// negative, fractional, or of the wrong type.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Default number of particles.
pub const DEFAULT_PARTICLE_COUNT: usize = 3000;
/// Default number of warm-up passes.
pub const DEFAULT_PARTICLE_LOOPS: usize = 2;
/// Default particle speed, in canvas units per step.
pub const DEFAULT_MAX_VELOCITY: f64 = 8.0;
/// Default vector-field grid size along each axis.
pub const DEFAULT_GRID_CELLS: usize = 100;
/// Default magnitude of each cell's force vector.
pub const DEFAULT_VECTOR_FIELD_MAGNITUDE: f64 = 6.0;
/// Default amplitude decay between octaves.
pub const DEFAULT_NOISE_PERSISTENCE: f64 = 0.65;
/// Default number of smoothed octaves.
pub const DEFAULT_OCTAVES: usize = 8;
/// Default per-particle step cap for the run-to-edge phase.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Immutable record of everything that shapes a run besides the seed and canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub particle_count: usize,
    /// Number of warm-up passes before the recorded run.
    pub particle_loops: usize,
    pub max_velocity: f64,
    pub columns: usize,
    pub rows: usize,
    pub vector_field_magnitude: f64,
    pub noise_persistence: f64,
    pub octaves: usize,
    /// Steps after which a particle that never wrapped is stopped.
    pub max_steps: usize,
    /// Keep the segments traced during warm-up in the output.
    pub keep_warm_up_trace: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            particle_loops: DEFAULT_PARTICLE_LOOPS,
            max_velocity: DEFAULT_MAX_VELOCITY,
            columns: DEFAULT_GRID_CELLS,
            rows: DEFAULT_GRID_CELLS,
            vector_field_magnitude: DEFAULT_VECTOR_FIELD_MAGNITUDE,
            noise_persistence: DEFAULT_NOISE_PERSISTENCE,
            octaves: DEFAULT_OCTAVES,
            max_steps: DEFAULT_MAX_STEPS,
            keep_warm_up_trace: false,
        }
    }
}

impl Parameters {
    /// Reads overrides from a JSON object, falling back to defaults per key.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            particle_count: param_usize(params, "particle_count", d.particle_count),
            particle_loops: param_usize(params, "particle_loops", d.particle_loops),
            max_velocity: param_f64(params, "max_velocity", d.max_velocity),
            columns: param_usize(params, "columns", d.columns),
            rows: param_usize(params, "rows", d.rows),
            vector_field_magnitude: param_f64(
                params,
                "vector_field_magnitude",
                d.vector_field_magnitude,
            ),
            noise_persistence: param_f64(params, "noise_persistence", d.noise_persistence),
            octaves: param_usize(params, "octaves", d.octaves),
            max_steps: param_usize(params, "max_steps", d.max_steps),
            keep_warm_up_trace: param_bool(params, "keep_warm_up_trace", d.keep_warm_up_trace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_accepts_integers_and_falls_back() {
        let params = json!({"speed": 10, "name": "fast"});
        assert_eq!(param_f64(&params, "speed", 1.0), 10.0);
        assert_eq!(param_f64(&params, "name", 1.5), 1.5);
        assert_eq!(param_f64(&params, "missing", 2.5), 2.5);
        assert_eq!(param_f64(&json!("not an object"), "speed", 7.0), 7.0);
    }

    #[test]
    fn param_usize_rejects_fractional_and_negative() {
        let params = json!({"a": 42, "b": 2.5, "c": -1, "d": "many"});
        assert_eq!(param_usize(&params, "a", 0), 42);
        assert_eq!(param_usize(&params, "b", 99), 99);
        assert_eq!(param_usize(&params, "c", 5), 5);
        assert_eq!(param_usize(&params, "d", 8), 8);
    }

    #[test]
    fn param_bool_falls_back_on_wrong_type() {
        let params = json!({"on": true, "num": 1});
        assert!(param_bool(&params, "on", false));
        assert!(!param_bool(&params, "num", false));
    }

    #[test]
    fn defaults_match_the_reference_run() {
        let p = Parameters::default();
        assert_eq!(p.particle_count, 3000);
        assert_eq!(p.particle_loops, 2);
        assert_eq!(p.max_velocity, 8.0);
        assert_eq!((p.columns, p.rows), (100, 100));
        assert_eq!(p.vector_field_magnitude, 6.0);
        assert_eq!(p.noise_persistence, 0.65);
        assert_eq!(p.octaves, 8);
    }

    #[test]
    fn from_json_overrides_only_given_keys() {
        let p = Parameters::from_json(&json!({
            "particle_count": 10,
            "noise_persistence": 0.9,
            "keep_warm_up_trace": true,
            "rows": "lots"
        }));
        assert_eq!(p.particle_count, 10);
        assert_eq!(p.noise_persistence, 0.9);
        assert!(p.keep_warm_up_trace);
        assert_eq!(p.rows, DEFAULT_GRID_CELLS);
        assert_eq!(p.max_velocity, DEFAULT_MAX_VELOCITY);
    }

    #[test]
    fn json_round_trip_and_keys() {
        let p = Parameters::default();
        let v = serde_json::to_value(&p).unwrap();
        for key in [
            "particle_count",
            "particle_loops",
            "max_velocity",
            "columns",
            "rows",
            "vector_field_magnitude",
            "noise_persistence",
        ] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        let back: Parameters = serde_json::from_value(v).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn deserialize_fills_missing_fields_with_defaults() {
        let p: Parameters = serde_json::from_str(r#"{"columns": 4}"#).unwrap();
        assert_eq!(p.columns, 4);
        assert_eq!(p.rows, DEFAULT_GRID_CELLS);
    }
}
