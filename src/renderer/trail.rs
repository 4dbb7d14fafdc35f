//! Pointer trail history
//!
//! Owned by the renderer. Recorded once per frame and cleared whenever the
//! player commits a move.

use glam::Vec2;

use crate::sim::PlayerState;

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 10;

/// Recent pointer positions in cell units (newest first)
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: Vec<Vec2>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Record the pointer tip, one cell out from the player's cell
    pub fn record(&mut self, player: &PlayerState) {
        let tip = player.target.as_vec2() + Vec2::from_angle(player.angle);
        self.points.insert(0, tip);
        self.points.truncate(TRAIL_LENGTH);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Opacity and radius factor of the `i`th point (newest = 1.0)
    pub fn fade(i: usize) -> f32 {
        1.0 - i as f32 / TRAIL_LENGTH as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_trail_caps_length() {
        let mut player = PlayerState::new(&Settings::default());
        let mut trail = Trail::new();
        for i in 0..25 {
            player.angle = i as f32 * 0.1;
            trail.record(&player);
        }
        assert_eq!(trail.points().len(), TRAIL_LENGTH);
        // Newest first
        let newest = Vec2::from_angle(2.4);
        assert!((trail.points()[0] - newest).length() < 1e-5);

        trail.clear();
        assert!(trail.points().is_empty());
    }

    #[test]
    fn test_fade() {
        assert_eq!(Trail::fade(0), 1.0);
        assert!((Trail::fade(5) - 0.5).abs() < 1e-6);
    }
}
