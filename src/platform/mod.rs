//! Platform glue that is independent of the browser bindings
//!
//! - `frame`: fixed-timestep clock and loop cancellation handles
//! - `input`: DOM key names and pointer positions to `InputEvent`s
//! - `hud`: text runs to the overlay markup the page shows

pub mod frame;
pub mod hud;
pub mod input;

pub use frame::{FrameClock, LoopHandle, LoopSlot};
pub use input::{map_key, pointer_to_canvas, should_prevent_default};
