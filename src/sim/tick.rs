//! Simulation tick and committed moves
//!
//! Core game loop: `tick` is called once per frame. It applies a pending
//! commit (a click or key press), then rotates the pointer and runs the
//! lookahead meet.

use std::f32::consts::PI;

use glam::IVec2;

use super::clock::Heading;
use super::dispatch::{activate_cell, meet_cell};
use super::error::SimResult;
use super::state::{GameEvent, GameState};
use crate::normalize_angle;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commit a move (click/tap/key press). Restarts when failed.
    pub commit: bool,
    /// Demo mode - commit automatically when aligned with a safe cell
    pub autoplay: bool,
}

/// Result of a commit request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Player moved into `to`
    Moved { from: IVec2, to: IVec2 },
    /// Pointer not aligned with any heading; nothing changed
    Rejected,
    /// Player was failed; the session restarted instead
    Restarted,
}

/// Advance the game by one frame
///
/// Events pile up in the state until the host drains them.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> SimResult<()> {
    let commit = input.commit || (input.autoplay && autoplay_wants_commit(state));
    if commit {
        commit_move(state)?;
    }
    advance(state, dt)?;
    state.trim_events();
    Ok(())
}

/// Rotate the pointer by `dt` and meet whatever lies ahead
///
/// Does nothing while failed or when `dt` is not positive.
pub fn advance(state: &mut GameState, dt: f32) -> SimResult<()> {
    if !state.clock.advance(&mut state.player, dt) {
        return Ok(());
    }

    let Some(heading) = state.clock.lookahead(&state.player) else {
        state.approach = None;
        return Ok(());
    };

    let ahead = state.player.target + heading.offset();
    let fresh = state.approach != Some(ahead);
    state.approach = Some(ahead);

    let (world, player, events) = state.parts_mut();
    meet_cell(world, player, events, ahead, fresh)?;
    Ok(())
}

/// Commit a move in the direction the pointer is facing
pub fn commit_move(state: &mut GameState) -> SimResult<CommitOutcome> {
    if state.player.is_failed() {
        state.restart();
        return Ok(CommitOutcome::Restarted);
    }

    let Some(heading) = state.clock.commit_heading(&state.player) else {
        let angle = state.player.angle;
        log::debug!("Commit rejected at angle {:.3}", angle);
        state.push_event(GameEvent::CommitRejected { angle });
        return Ok(CommitOutcome::Rejected);
    };

    let from = state.player.target;
    let to = from + heading.offset();
    hop(state, to);

    state.push_event(GameEvent::Moved { from, to });
    let (world, player, events) = state.parts_mut();
    activate_cell(world, player, events, to)?;

    Ok(CommitOutcome::Moved { from, to })
}

/// Move the player into `to`: swing the pointer, advance the orbit, mark the cell reached
fn hop(state: &mut GameState, to: IVec2) {
    let player = &mut state.player;
    state.came_from = Some(player.target);
    player.target = to;
    let swing = PI * player.direction.sign() * 2.0 / player.orbit_count as f32;
    player.angle = normalize_angle(player.angle - swing);
    player.advance_orbit();
    state.world.cell(to).mark_reached();
    state.approach = None;
}

/// Autoplay policy: commit when the pointer sits in a lookahead window and
/// the destination is neither a hazard nor the cell just left. Restarts
/// immediately after a failure.
pub fn autoplay_wants_commit(state: &GameState) -> bool {
    if state.player.is_failed() {
        return true;
    }
    let Some(heading) = Heading::resolve(state.player.angle, state.clock.lookahead_tolerance)
    else {
        return false;
    };
    let destination = state.player.target + heading.offset();
    if state.came_from == Some(destination) {
        return false;
    }
    state
        .world
        .grid()
        .get(destination)
        .is_none_or(|grid| grid.is_visible())
}
