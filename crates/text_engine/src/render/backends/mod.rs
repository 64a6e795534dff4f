//! Backend implementations for the render module
//!
//! Only a headless recording backend ships with the engine; windowed
//! backends live with the application that owns the graphics context.

mod recording;

pub use recording::{DrawCommand, RecordingBackend, StoredTexture};
