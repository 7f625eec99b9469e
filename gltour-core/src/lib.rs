//! Window-free core of gltour: the free-fly camera, the stage state machine, vertex data
//! and configuration. Nothing in this crate needs a GL context.

pub mod camera;
pub mod config;
pub mod geometry;
pub mod input;
pub mod stage;
pub mod uniform;

pub use camera::Camera;
pub use config::Config;
pub use input::{Action, InputSource};
pub use stage::{Session, Stage};
pub use uniform::UniformTarget;
