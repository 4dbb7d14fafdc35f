//! Camera that eases toward the player's cell

use glam::Vec2;

/// Fraction of the remaining distance left after one second
const FOLLOW_RESIDUAL_PER_SEC: f32 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    /// Center of view in cell units
    pub pos: Vec2,
}

impl Camera {
    /// Frame-rate independent ease toward `target`
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        let t = 1.0 - FOLLOW_RESIDUAL_PER_SEC.powf(dt.max(0.0));
        self.pos = self.pos.lerp(target, t);
    }

    /// Cell-space bounds `(min, max)` visible in a `view_cells` sized window
    pub fn view_bounds(&self, view_cells: Vec2) -> (Vec2, Vec2) {
        let half = view_cells / 2.0;
        (self.pos - half, self.pos + half)
    }

    pub fn in_view(&self, cell: Vec2, view_cells: Vec2) -> bool {
        let (min, max) = self.view_bounds(view_cells);
        cell.cmpge(min).all() && cell.cmple(max).all()
    }
}
