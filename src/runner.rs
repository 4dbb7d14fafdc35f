//! Frame scheduler
//!
//! The single control point a host calls once per display frame. It clamps
//! the frame time, forwards input, ticks the simulation, animates objects and
//! hands back a read-only view for drawing. No callback re-schedules itself;
//! the host owns the loop.

use crate::consts::FRAME_DT;
use crate::renderer::{Camera, FrameView, Trail};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, SimResult, TickInput, tick};

/// Totals from a headless run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub moves: u64,
    pub coins: u64,
    pub failures: u64,
    pub restarts: u64,
}

impl RunSummary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Moved { .. } => self.moves += 1,
            GameEvent::CoinCollected { .. } => self.coins += 1,
            GameEvent::Failed { .. } => self.failures += 1,
            GameEvent::Restarted { .. } => self.restarts += 1,
            _ => {}
        }
    }
}

/// Drives a `GameState` one frame at a time
pub struct FrameScheduler {
    state: GameState,
    input: TickInput,
    trail: Trail,
    camera: Camera,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(settings: Settings) -> SimResult<Self> {
        Ok(Self {
            state: GameState::new(settings)?,
            input: TickInput::default(),
            trail: Trail::new(),
            camera: Camera::default(),
            frames: 0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Queue a commit for the next frame (click / tap / key press)
    pub fn request_commit(&mut self) {
        self.input.commit = true;
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.input.autoplay = autoplay;
    }

    /// Run one frame and return the events it produced
    pub fn frame(&mut self, dt: f32) -> SimResult<Vec<GameEvent>> {
        // NaN survives clamp
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.state.settings.max_frame_dt)
        } else {
            0.0
        };

        let input = self.input.clone();
        let result = tick(&mut self.state, &input, dt);
        // One-shot input is consumed even if the tick failed
        self.input.commit = false;
        result?;

        self.state.world.animate(dt);

        let events = self.state.drain_events();
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::Moved { .. } | GameEvent::Restarted { .. }))
        {
            self.trail.clear();
        }
        if !self.state.player.is_failed() {
            self.trail.record(&self.state.player);
        }
        self.camera
            .follow(self.state.player.target.as_vec2(), dt);

        self.frames += 1;
        Ok(events)
    }

    /// Snapshot for drawing the current frame
    pub fn view(&self) -> FrameView {
        FrameView::build(&self.state)
    }

    /// Run `frames` frames at the fixed host rate without a display
    pub fn run_headless(&mut self, frames: u64) -> SimResult<RunSummary> {
        let mut summary = RunSummary::default();
        for _ in 0..frames {
            for event in self.frame(FRAME_DT)? {
                summary.record(&event);
            }
            summary.frames += 1;
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ObjectKind, ObjectParams};
    use glam::IVec2;

    fn scheduler() -> FrameScheduler {
        FrameScheduler::new(Settings::default().with_seed(11).with_objects_per_type(0)).unwrap()
    }

    #[test]
    fn test_commit_is_one_shot() {
        let mut runner = scheduler();
        runner.request_commit();
        let events = runner.frame(FRAME_DT).unwrap();
        // Start angle is π: the first commit moves West
        assert!(events.contains(&GameEvent::Moved {
            from: IVec2::ZERO,
            to: IVec2::new(-1, 0)
        }));

        let events = runner.frame(FRAME_DT).unwrap();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Moved { .. })));
        assert_eq!(runner.frames(), 2);
    }

    #[test]
    fn test_frame_clamps_dt() {
        let mut runner = scheduler();
        let before = runner.state().player.angle;
        runner.frame(10.0).unwrap();
        let advanced = crate::normalize_angle(runner.state().player.angle - before);
        let max = crate::bpm_to_angular_speed(180.0) * 0.1;
        assert!((advanced - max).abs() < 1e-4);
    }

    #[test]
    fn test_bad_frame_dt_is_ignored() {
        let mut runner = scheduler();
        let coin = runner
            .state
            .world
            .spawn(IVec2::new(10, 10), ObjectKind::Coin, ObjectParams::None);
        runner.frame(0.5).unwrap();
        let angle = runner.state().player.angle;

        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.3] {
            runner.frame(dt).unwrap();
        }

        assert_eq!(runner.state().player.angle, angle);
        let timer = runner.state().world.get(coin).unwrap().timer();
        assert!((timer - 0.1).abs() < 1e-6);
        assert!(runner.camera().pos.is_finite());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = Settings::default().with_seed(11);
        settings.max_frame_dt = 0.0;
        assert!(FrameScheduler::new(settings).is_err());
    }

    #[test]
    fn test_trail_resets_on_move() {
        let mut runner = scheduler();
        for _ in 0..5 {
            runner.frame(FRAME_DT).unwrap();
        }
        assert_eq!(runner.trail().points().len(), 5);

        runner.request_commit();
        runner.frame(FRAME_DT).unwrap();
        assert_eq!(runner.trail().points().len(), 1);
    }

    #[test]
    fn test_objects_animate_each_frame() {
        let mut runner = scheduler();
        let coin = runner
            .state
            .world
            .spawn(IVec2::new(10, 10), ObjectKind::Coin, ObjectParams::None);
        for _ in 0..30 {
            runner.frame(FRAME_DT).unwrap();
        }
        let timer = runner.state().world.get(coin).unwrap().timer();
        assert!((timer - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_headless_autoplay_runs() {
        let mut runner = FrameScheduler::new(
            Settings::default().with_seed(2024).with_objects_per_type(20),
        )
        .unwrap();
        runner.set_autoplay(true);
        let summary = runner.run_headless(600).unwrap();
        assert_eq!(summary.frames, 600);
        assert!(summary.moves > 0);
        assert!(summary.failures <= summary.restarts + 1);
    }
}
