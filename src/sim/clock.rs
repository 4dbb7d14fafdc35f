//! Pointer clock and facing quantization

use std::f32::consts::PI;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::state::PlayerState;
use crate::{bpm_to_angular_speed, normalize_angle};

/// One of the four grid directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// +x (angle 0)
    East,
    /// +y (angle π/2)
    South,
    /// -x (angle π)
    West,
    /// -y (angle 3π/2)
    North,
}

impl Heading {
    pub fn offset(&self) -> IVec2 {
        match self {
            Heading::East => IVec2::X,
            Heading::South => IVec2::Y,
            Heading::West => IVec2::NEG_X,
            Heading::North => IVec2::NEG_Y,
        }
    }

    /// Quantize an angle in [0, 2π) to a heading.
    ///
    /// `tolerance` is a fraction of a half-turn: each heading owns the
    /// half-open window `[center - tolerance·π, center + tolerance·π)`.
    /// Angles between windows resolve to nothing. At 0.25 the windows tile
    /// the circle.
    pub fn resolve(angle: f32, tolerance: f32) -> Option<Heading> {
        let window = |center: f32| angle >= PI * (center - tolerance) && angle < PI * (center + tolerance);
        if angle >= PI * (2.0 - tolerance) || angle < PI * tolerance {
            Some(Heading::East)
        } else if window(0.5) {
            Some(Heading::South)
        } else if window(1.0) {
            Some(Heading::West)
        } else if window(1.5) {
            Some(Heading::North)
        } else {
            None
        }
    }
}

/// Advances the pointer and resolves facings for lookahead and commits
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Lookahead tolerance (fraction of a half-turn)
    pub lookahead_tolerance: f32,
    /// Commit tolerance (fraction of a half-turn)
    pub commit_tolerance: f32,
    ticks: u64,
    elapsed: f64,
}

impl SimulationClock {
    pub fn new(lookahead_tolerance: f32, commit_tolerance: f32) -> Self {
        Self {
            lookahead_tolerance,
            commit_tolerance,
            ticks: 0,
            elapsed: 0.0,
        }
    }

    /// Ticks that advanced the pointer since the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Active seconds since the last reset
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
        self.elapsed = 0.0;
    }

    /// Rotate the pointer by `dt` seconds at the player's tempo.
    ///
    /// Returns false (and leaves the player untouched) when failed or when
    /// `dt` is not positive.
    pub fn advance(&mut self, player: &mut PlayerState, dt: f32) -> bool {
        if player.is_failed() || !(dt > 0.0) {
            return false;
        }
        let delta = dt * bpm_to_angular_speed(player.tempo) * player.direction.sign();
        player.angle = normalize_angle(player.angle + delta);
        self.ticks += 1;
        self.elapsed += dt as f64;
        true
    }

    /// Heading checked for passive meets this tick
    pub fn lookahead(&self, player: &PlayerState) -> Option<Heading> {
        Heading::resolve(player.angle, self.lookahead_tolerance)
    }

    /// Heading a commit would move in, if the pointer is close enough
    pub fn commit_heading(&self, player: &PlayerState) -> Option<Heading> {
        Heading::resolve(player.angle, self.commit_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_resolve_bucket_centers() {
        assert_eq!(Heading::resolve(0.0, 0.05), Some(Heading::East));
        assert_eq!(Heading::resolve(FRAC_PI_2, 0.05), Some(Heading::South));
        assert_eq!(Heading::resolve(PI, 0.05), Some(Heading::West));
        assert_eq!(Heading::resolve(3.0 * FRAC_PI_2, 0.05), Some(Heading::North));
        // East wraps through zero
        assert_eq!(Heading::resolve(TAU - 0.01, 0.05), Some(Heading::East));
    }

    #[test]
    fn test_resolve_gaps() {
        // Halfway between East and South
        assert_eq!(Heading::resolve(PI / 4.0, 0.05), None);
        // Just outside the lookahead window, inside the commit window
        let angle = PI * 0.1;
        assert_eq!(Heading::resolve(angle, 0.05), None);
        assert_eq!(Heading::resolve(angle, 0.25), Some(Heading::East));
    }

    #[test]
    fn test_commit_windows_tile_circle() {
        for i in 0..1000 {
            let angle = TAU * i as f32 / 1000.0;
            assert!(Heading::resolve(angle, 0.25).is_some(), "angle {}", angle);
        }
    }

    #[test]
    fn test_advance_rotates_at_tempo() {
        let mut clock = SimulationClock::new(0.05, 0.25);
        let mut player = PlayerState::new(&Settings::default());
        player.angle = 0.0;
        player.tempo = 60.0;

        assert!(clock.advance(&mut player, 0.5));
        // 60 bpm = π rad/s
        assert!((player.angle - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(clock.ticks(), 1);

        player.direction = player.direction.flipped();
        clock.advance(&mut player, 1.0);
        assert!((player.angle - (TAU - FRAC_PI_2)).abs() < 1e-4);
    }

    #[test]
    fn test_advance_zero_dt_is_noop() {
        let mut clock = SimulationClock::new(0.05, 0.25);
        let mut player = PlayerState::new(&Settings::default());
        let before = player.clone();
        assert!(!clock.advance(&mut player, 0.0));
        assert!(!clock.advance(&mut player, -1.0));
        assert!(!clock.advance(&mut player, f32::NAN));
        assert_eq!(player, before);
        assert_eq!(clock.ticks(), 0);
    }

    #[test]
    fn test_advance_frozen_when_failed() {
        let mut clock = SimulationClock::new(0.05, 0.25);
        let mut player = PlayerState::new(&Settings::default());
        player.fail();
        let angle = player.angle;
        assert!(!clock.advance(&mut player, 1.0));
        assert_eq!(player.angle, angle);
    }
}
