//! Renderer boundary
//!
//! The simulation does not draw. This module turns game state into plain
//! data an external renderer consumes once per frame: sprite instances,
//! cell flags, the pointer trail and a following camera.

pub mod camera;
pub mod instance;
pub mod trail;
pub mod view;

pub use camera::Camera;
pub use instance::SpriteInstance;
pub use trail::{TRAIL_LENGTH, Trail};
pub use view::{CellView, FrameView, ObjectView, PlayerView, cell_view};
