//! Particle field animator.
//!
//! Pure-data crate: the simulation, its colours, the frame scheduler contract
//! and a software canvas. Nothing here depends on Bevy; the host crate uploads
//! [`PixelCanvas`] bytes to a texture each frame.

pub mod animator;
pub mod connections;
pub mod overlay;
pub mod paint;
pub mod palette;
pub mod particle;
pub mod raster;
pub mod scene;
pub mod scheduler;
pub mod state;

pub use animator::Animator;
pub use connections::{connection_opacity, find_connections, Connection, CONNECT_DISTANCE};
pub use overlay::{bake, OverlayLayer};
pub use paint::{ColorStop, DrawCall, Painter, Point, RecordingPainter, Rgba, Surface, SurfaceSize};
pub use particle::{Orb, Particle, ParticleClass};
pub use raster::PixelCanvas;
pub use scene::{render_frame, FrameStats};
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler};
pub use state::{advance, wrap, AnimationState, ClassCounts};
