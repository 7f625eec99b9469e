//! Vertex array, vertex buffer and element buffer objects.
//!
//! Each wrapper creates its GL object on construction and deletes it on drop.

use std::sync::Arc;

use glow::HasContext;
use gltour_core::geometry::VertexAttribute;

/// Owns one vertex buffer object holding static vertex data.
pub struct VertexBuffer {
    gl: Arc<glow::Context>,
    id: glow::Buffer,
}

impl VertexBuffer {
    /// Uploads `data` into a new buffer and leaves it bound to `ARRAY_BUFFER`.
    pub fn new(gl: &Arc<glow::Context>, data: &[u8]) -> Result<Self, String> {
        unsafe {
            let id = gl.create_buffer()?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(id));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            Ok(Self {
                gl: Arc::clone(gl),
                id,
            })
        }
    }

    pub fn bind(&self) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.id));
        }
    }

    pub fn unbind(&self) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.id);
        }
    }
}

/// Owns one element buffer object holding `u32` indices.
pub struct ElementBuffer {
    gl: Arc<glow::Context>,
    id: glow::Buffer,
    count: usize,
}

impl ElementBuffer {
    /// Uploads `indices` and leaves the buffer bound to `ELEMENT_ARRAY_BUFFER`.
    ///
    /// Bind the owning vertex array first so it records the binding.
    pub fn new(gl: &Arc<glow::Context>, indices: &[u8], count: usize) -> Result<Self, String> {
        unsafe {
            let id = gl.create_buffer()?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(id));
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, indices, glow::STATIC_DRAW);
            Ok(Self {
                gl: Arc::clone(gl),
                id,
                count,
            })
        }
    }

    /// Number of indices in the buffer.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn unbind(&self) {
        unsafe {
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }
    }
}

impl Drop for ElementBuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.id);
        }
    }
}

/// Owns one vertex array object.
pub struct VertexArray {
    gl: Arc<glow::Context>,
    id: glow::VertexArray,
}

impl VertexArray {
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self, String> {
        unsafe {
            let id = gl.create_vertex_array()?;
            Ok(Self {
                gl: Arc::clone(gl),
                id,
            })
        }
    }

    /// Points `attribute` at float data in `vbo` and enables it. The array must be bound.
    pub fn link_attrib(&self, vbo: &VertexBuffer, attribute: &VertexAttribute, stride: i32) {
        vbo.bind();
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components,
                glow::FLOAT,
                false,
                stride,
                attribute.offset,
            );
            self.gl.enable_vertex_attrib_array(attribute.location);
        }
        vbo.unbind();
    }

    pub fn bind(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.id));
        }
    }

    pub fn unbind(&self) {
        unsafe {
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.id);
        }
    }
}
