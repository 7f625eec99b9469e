//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture.

use std::path::Path;
use std::sync::Arc;

use glow::HasContext;
use image::{DynamicImage, GenericImageView};

use super::shader::ShaderProgram;

/// Pixel layout used when uploading an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    fn gl_format(self) -> u32 {
        match self {
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        }
    }

    fn pixels(self, image: &DynamicImage) -> Vec<u8> {
        match self {
            PixelFormat::Rgb => image.to_rgb8().into_raw(),
            PixelFormat::Rgba => image.to_rgba8().into_raw(),
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
}

impl Texture {
    /// Creates a new texture from the given [`image::DynamicImage`] in the given format.
    ///
    /// Images are stored top row first while GL samples bottom row first, so the image is
    /// flipped before upload.
    pub fn new(
        gl: &Arc<glow::Context>,
        image: &DynamicImage,
        format: PixelFormat,
    ) -> Result<Self, String> {
        let image = image.flipv();
        let (width, height) = image.dimensions();
        let data = format.pixels(&image);
        Self::upload(gl, width, height, format, &data)
    }

    /// Loads an image file from disk.
    pub fn from_file(
        gl: &Arc<glow::Context>,
        path: &Path,
        format: PixelFormat,
    ) -> Result<Self, String> {
        let image = image::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        log::info!(
            "Loaded texture {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Self::new(gl, &image, format)
    }

    /// Creates a new texture from the given raw RGBA data.
    pub fn new_from_data(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<Self, String> {
        Self::upload(gl, width, height, PixelFormat::Rgba, data)
    }

    /// A two-tone checkerboard with `cells` squares per side, used when an image is missing.
    pub fn checkerboard(gl: &Arc<glow::Context>, size: u32, cells: u32) -> Result<Self, String> {
        let cell = (size / cells.max(1)).max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let light = ((x / cell) + (y / cell)) % 2 == 0;
                let [r, g, b] = if light { [212, 178, 112] } else { [120, 72, 48] };
                data.extend_from_slice(&[r, g, b, 255]);
            }
        }
        Self::new_from_data(gl, size, size, &data)
    }

    fn upload(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<Self, String> {
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            // RGB rows are not 4-byte aligned for every width.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                format.gl_format(),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data)),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
            })
        }
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }

    /// Points the sampler `uniform` of `program` at texture `unit`.
    pub fn assign_unit(&self, program: &ShaderProgram, uniform: &str, unit: u32) {
        program.use_program();
        program.set_uniform(uniform, unit as i32);
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}
