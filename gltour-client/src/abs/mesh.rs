//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct, which owns the vertex array and both buffers for
//! one piece of static [`Geometry`].

use std::sync::Arc;

use glow::HasContext;
use gltour_core::geometry::{Geometry, Vertex};

use super::buffer::{ElementBuffer, VertexArray, VertexBuffer};

/// Represents a mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    draw_mode: u32,
    // Field order is drop order: the array goes before the buffers it references.
    vao: VertexArray,
    _vbo: VertexBuffer,
    ebo: ElementBuffer,
}

impl Mesh {
    /// Uploads `geometry` and records its attribute layout.
    pub fn new<V: Vertex>(
        gl: &Arc<glow::Context>,
        geometry: &Geometry<'_, V>,
        draw_mode: u32,
    ) -> Result<Self, String> {
        geometry.validate()?;

        let vao = VertexArray::new(gl)?;
        vao.bind();

        let vbo = VertexBuffer::new(gl, geometry.vertex_bytes())?;
        let ebo = ElementBuffer::new(gl, geometry.index_bytes(), geometry.index_count())?;

        for attribute in V::ATTRIBUTES {
            vao.link_attrib(&vbo, attribute, V::stride());
        }

        vao.unbind();
        vbo.unbind();
        ebo.unbind();

        log::debug!(
            "Uploaded mesh with {} vertices and {} indices",
            geometry.vertices.len(),
            geometry.index_count()
        );

        Ok(Self {
            gl: Arc::clone(gl),
            draw_mode,
            vao,
            _vbo: vbo,
            ebo,
        })
    }

    /// Draws the mesh.
    pub fn draw(&self) {
        self.vao.bind();
        unsafe {
            self.gl
                .draw_elements(self.draw_mode, self.ebo.count() as i32, glow::UNSIGNED_INT, 0);
        }
        self.vao.unbind();
    }

    /// Returns the amount of indices used in the mesh.
    pub fn index_count(&self) -> usize {
        self.ebo.count()
    }
}
