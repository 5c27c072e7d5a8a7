//! Procedural node/link/pulse animation engine.
//!
//! Everything in this crate is platform-free and runs on the host for tests;
//! the `gpu` feature adds the wgpu renderer shared by the web and native
//! front-ends.

pub mod camera;
pub mod constants;
pub mod graph;
pub mod lifecycle;
pub mod nodes;
pub mod packed;
pub mod palette;
pub mod pulses;
pub mod random;
pub mod scene;
pub mod scheduler;
pub mod viewport;

#[cfg(feature = "gpu")]
pub mod gpu;

pub use camera::*;
pub use graph::*;
pub use lifecycle::*;
pub use nodes::*;
pub use packed::*;
pub use palette::*;
pub use pulses::*;
pub use random::*;
pub use scene::*;
pub use scheduler::*;
pub use viewport::Viewport;

// Shaders bundled as string constants
pub static PLEXUS_WGSL: &str = include_str!("../shaders/plexus.wgsl");
