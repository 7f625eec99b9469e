//! This module contains the GPU-facing building blocks: application setup, buffer objects,
//! meshes, shader management and textures.

pub mod app;
pub mod buffer;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use buffer::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
