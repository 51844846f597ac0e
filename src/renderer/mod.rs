//! Rendering module
//!
//! The simulation never draws. `build_frame` tessellates the state into
//! colored triangles and a `RenderSurface` puts them wherever it wants
//! (WebGL/canvas through the wasm binding, a log line in the headless runner).

pub mod frame;
pub mod shapes;
pub mod vertex;

pub use frame::{Frame, Hud, build_frame};
pub use vertex::{Vertex, as_floats};

/// Drawing collaborator
pub trait RenderSurface {
    fn draw(&mut self, frame: &Frame);
}
