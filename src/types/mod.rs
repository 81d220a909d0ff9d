//! Primitive value types shared by every object kind.

mod color;
mod handle;
mod vector;

pub use color::Color;
pub use handle::Handle;
pub use vector::{Vector2, Vector3};
