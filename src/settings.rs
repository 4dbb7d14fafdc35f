//! Game settings
//!
//! Tuning values for a session. Loaded from JSON; any field left out of the
//! file keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Color, SimError, SimResult};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tempo at session start and after every restart
    pub initial_bpm: f32,
    /// Lookahead facing tolerance (fraction of a half-turn)
    pub lookahead_tolerance: f32,
    /// Commit facing tolerance (fraction of a half-turn)
    pub commit_tolerance: f32,

    // === Population ===
    /// Instances placed per object type on every (re)start
    pub objects_per_type: u32,
    /// Placement square is `[-extent, extent)` on both axes
    pub spawn_half_extent: i32,
    /// Lowest bpm a speed object may carry (inclusive)
    pub speed_bpm_min: u32,
    /// Highest bpm a speed object may carry (exclusive)
    pub speed_bpm_max: u32,

    // === Player ===
    /// Palette indexed by orbit index
    pub palette: Vec<Color>,
    /// Orbit count at session start (2 or 3)
    pub initial_orbit_count: u8,

    // === Host ===
    /// Largest frame dt forwarded to the simulation
    pub max_frame_dt: f32,
    /// Placement seed; a fresh random seed is drawn when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_bpm: DEFAULT_BPM,
            lookahead_tolerance: LOOKAHEAD_TOLERANCE,
            commit_tolerance: COMMIT_TOLERANCE,

            objects_per_type: OBJECTS_PER_TYPE,
            spawn_half_extent: SPAWN_HALF_EXTENT,
            speed_bpm_min: 60,
            speed_bpm_max: 240,

            palette: vec![
                Color::rgb(0xff, 0x00, 0x00),
                Color::rgb(0x00, 0x00, 0xff),
                Color::rgb(0x00, 0xc0, 0x00),
            ],
            initial_orbit_count: 2,

            max_frame_dt: MAX_FRAME_DT,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn try_load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Read settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Fixed placement seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Starting tempo
    pub fn with_bpm(mut self, bpm: f32) -> Self {
        self.initial_bpm = bpm;
        self
    }

    /// Objects placed per type
    pub fn with_objects_per_type(mut self, count: u32) -> Self {
        self.objects_per_type = count;
        self
    }

    /// Lookahead and commit tolerances
    pub fn with_tolerances(mut self, lookahead: f32, commit: f32) -> Self {
        self.lookahead_tolerance = lookahead;
        self.commit_tolerance = commit;
        self
    }

    /// Check value ranges the simulation relies on
    pub fn validate(&self) -> SimResult<()> {
        let tolerance_ok = |t: f32| t > 0.0 && t <= 0.5;
        if !tolerance_ok(self.lookahead_tolerance) || !tolerance_ok(self.commit_tolerance) {
            return Err(SimError::Config(
                "tolerances must be in (0, 0.5]".to_string(),
            ));
        }
        if !(self.initial_bpm.is_finite() && self.initial_bpm > 0.0) {
            return Err(SimError::Config(format!(
                "initial_bpm must be positive, got {}",
                self.initial_bpm
            )));
        }
        if self.speed_bpm_min == 0 || self.speed_bpm_min >= self.speed_bpm_max {
            return Err(SimError::Config(format!(
                "speed bpm range {}..{} is empty",
                self.speed_bpm_min, self.speed_bpm_max
            )));
        }
        if self.palette.is_empty() {
            return Err(SimError::Config("palette must not be empty".to_string()));
        }
        if !matches!(self.initial_orbit_count, 2 | 3) {
            return Err(SimError::Config(format!(
                "initial_orbit_count must be 2 or 3, got {}",
                self.initial_orbit_count
            )));
        }
        if self.spawn_half_extent <= 0 {
            return Err(SimError::Config(
                "spawn_half_extent must be positive".to_string(),
            ));
        }
        if !(self.max_frame_dt > 0.0) {
            return Err(SimError::Config("max_frame_dt must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.initial_bpm, 180.0);
        assert_eq!(settings.objects_per_type, 100);
        assert_eq!(settings.palette.len(), 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r##"{ "initial_bpm": 120, "palette": ["#112233"] }"##)
            .unwrap();
        assert_eq!(settings.initial_bpm, 120.0);
        assert_eq!(settings.palette, vec![Color::rgb(0x11, 0x22, 0x33)]);
        assert_eq!(settings.commit_tolerance, COMMIT_TOLERANCE);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Settings::from_json(r#"{ "lookahead_tolerance": 0.0 }"#).is_err());
        assert!(Settings::from_json(r#"{ "initial_orbit_count": 4 }"#).is_err());
        assert!(Settings::from_json(r#"{ "palette": [] }"#).is_err());
        assert!(Settings::from_json(r#"{ "speed_bpm_min": 200, "speed_bpm_max": 100 }"#).is_err());
        assert!(Settings::from_json(r#"{ "palette": ["red"] }"#).is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load("/nonexistent/orbit-hop.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_builder_chain() {
        let settings = Settings::default()
            .with_seed(7)
            .with_bpm(90.0)
            .with_objects_per_type(3)
            .with_tolerances(0.1, 0.2);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.initial_bpm, 90.0);
        assert_eq!(settings.objects_per_type, 3);
        assert_eq!(settings.lookahead_tolerance, 0.1);
        assert_eq!(settings.commit_tolerance, 0.2);
    }
}
