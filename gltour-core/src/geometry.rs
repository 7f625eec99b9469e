//! Vertex formats and the static geometry drawn by each stage.
//!
//! Geometry is immutable data handed to the buffer constructors in the client. Vertex types are
//! `#[repr(C)]` and [`bytemuck::Pod`] so they can be uploaded as raw bytes.

use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

const SQRT_3: f32 = 1.732_050_8;

/// One vertex attribute: shader `location`, float component count and byte offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub offset: i32,
}

/// A vertex format with a fixed float attribute layout.
pub trait Vertex: Pod {
    const ATTRIBUTES: &'static [VertexAttribute];

    /// Byte distance between consecutive vertices.
    fn stride() -> i32 {
        size_of::<Self>() as i32
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl Vertex for PositionVertex {
    const ATTRIBUTES: &'static [VertexAttribute] = &[VertexAttribute {
        location: 0,
        components: 3,
        offset: offset_of!(PositionVertex, position) as i32,
    }];
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex for ColorVertex {
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            location: 0,
            components: 3,
            offset: offset_of!(ColorVertex, position) as i32,
        },
        VertexAttribute {
            location: 1,
            components: 3,
            offset: offset_of!(ColorVertex, color) as i32,
        },
    ];
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex for TexturedVertex {
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            location: 0,
            components: 3,
            offset: offset_of!(TexturedVertex, position) as i32,
        },
        VertexAttribute {
            location: 1,
            components: 3,
            offset: offset_of!(TexturedVertex, color) as i32,
        },
        VertexAttribute {
            location: 2,
            components: 2,
            offset: offset_of!(TexturedVertex, uv) as i32,
        },
    ];
}

/// Borrowed vertex and index data for one indexed triangle mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry<'a, V> {
    pub vertices: &'a [V],
    pub indices: &'a [u32],
}

impl<'a, V: Vertex> Geometry<'a, V> {
    pub const fn new(vertices: &'a [V], indices: &'a [u32]) -> Self {
        Self { vertices, indices }
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.vertices)
    }

    pub fn index_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.indices)
    }

    /// Checks that the indices form whole triangles over existing vertices.
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "Index count {} is not a multiple of 3",
                self.indices.len()
            ));
        }
        if let Some(index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(format!(
                "Index {} out of range for {} vertices",
                index,
                self.vertices.len()
            ));
        }
        Ok(())
    }
}

const fn pos(x: f32, y: f32, z: f32) -> PositionVertex {
    PositionVertex {
        position: [x, y, z],
    }
}

const fn colored(position: [f32; 3], color: [f32; 3]) -> ColorVertex {
    ColorVertex { position, color }
}

const fn textured(position: [f32; 3], color: [f32; 3], uv: [f32; 2]) -> TexturedVertex {
    TexturedVertex {
        position,
        color,
        uv,
    }
}

// An equilateral triangle split into three corner triangles around an empty center.
const LOW: f32 = -0.5 * SQRT_3 / 3.0;
const TOP: f32 = 0.5 * SQRT_3 * 2.0 / 3.0;
const MID: f32 = 0.5 * SQRT_3 / 6.0;

const TRIANGLE_INDICES: [u32; 9] = [0, 3, 5, 3, 2, 4, 5, 4, 1];

const TRIANGLE_VERTICES: [PositionVertex; 6] = [
    pos(-0.5, LOW, 0.0),
    pos(0.5, LOW, 0.0),
    pos(0.0, TOP, 0.0),
    pos(-0.25, MID, 0.0),
    pos(0.25, MID, 0.0),
    pos(0.0, LOW, 0.0),
];

const COPPER: [f32; 3] = [0.8, 0.3, 0.02];
const GOLD: [f32; 3] = [1.0, 0.6, 0.32];
const AMBER: [f32; 3] = [0.9, 0.45, 0.17];

const COLORED_TRIANGLE_VERTICES: [ColorVertex; 6] = [
    colored([-0.5, LOW, 0.0], COPPER),
    colored([0.5, LOW, 0.0], COPPER),
    colored([0.0, TOP, 0.0], GOLD),
    colored([-0.25, MID, 0.0], AMBER),
    colored([0.25, MID, 0.0], AMBER),
    colored([0.0, LOW, 0.0], COPPER),
];

const QUAD_VERTICES: [TexturedVertex; 4] = [
    textured([-0.5, -0.5, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0]),
    textured([-0.5, 0.5, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0]),
    textured([0.5, 0.5, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
    textured([0.5, -0.5, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0]),
];

const QUAD_INDICES: [u32; 6] = [0, 2, 1, 0, 3, 2];

const SAND: [f32; 3] = [0.83, 0.70, 0.44];
const PALE_SAND: [f32; 3] = [0.92, 0.86, 0.76];

// Base texture coordinates repeat five times along each edge.
const PYRAMID_VERTICES: [TexturedVertex; 5] = [
    textured([-0.5, 0.0, 0.5], SAND, [0.0, 0.0]),
    textured([-0.5, 0.0, -0.5], SAND, [5.0, 0.0]),
    textured([0.5, 0.0, -0.5], SAND, [0.0, 0.0]),
    textured([0.5, 0.0, 0.5], SAND, [5.0, 0.0]),
    textured([0.0, 0.8, 0.0], PALE_SAND, [2.5, 5.0]),
];

const PYRAMID_INDICES: [u32; 18] = [0, 1, 2, 0, 2, 3, 0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0, 4];

/// Flat triangle used by the first stage.
pub const TRIANGLE: Geometry<'static, PositionVertex> =
    Geometry::new(&TRIANGLE_VERTICES, &TRIANGLE_INDICES);

/// The same triangle with per-vertex colors.
pub const COLORED_TRIANGLE: Geometry<'static, ColorVertex> =
    Geometry::new(&COLORED_TRIANGLE_VERTICES, &TRIANGLE_INDICES);

/// A unit quad centered on the origin with texture coordinates covering the image once.
pub const QUAD: Geometry<'static, TexturedVertex> = Geometry::new(&QUAD_VERTICES, &QUAD_INDICES);

/// A square-based pyramid standing on the XZ plane.
pub const PYRAMID: Geometry<'static, TexturedVertex> =
    Geometry::new(&PYRAMID_VERTICES, &PYRAMID_INDICES);
