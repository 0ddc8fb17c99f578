//! Rendering
//!
//! Games paint into a backend-agnostic `DrawList` (`scenes`), the effect
//! layer paints on top (`overlay`), and the wgpu backend tessellates and
//! presents the result (`shapes`, `pipeline`).

pub mod color;
pub mod draw;
pub mod overlay;
pub mod pipeline;
pub mod scenes;
pub mod shapes;
pub mod vertex;

pub use color::{Rgba, palette};
pub use draw::{DrawCmd, DrawList, Paint, Shape, TextAlign, TextRun};
pub use pipeline::RenderState;
