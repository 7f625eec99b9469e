//! GPU resources and draw calls for the selected stage.

use std::path::Path;
use std::sync::Arc;

use glow::HasContext;
use gltour_core::geometry::{COLORED_TRIANGLE, PYRAMID, QUAD, TRIANGLE};
use gltour_core::uniform::names;
use gltour_core::{Config, Session, Stage};

use crate::abs::*;

const CLEAR_COLOR: [f32; 4] = [0.07, 0.13, 0.17, 1.0];

/// Loads the embedded shader pair for a stage.
macro_rules! stage_program {
    ($gl:expr, $stage:literal) => {
        ShaderProgram::from_sources(
            $gl,
            include_str!(concat!("shaders/", $stage, "/vert.glsl")),
            include_str!(concat!("shaders/", $stage, "/frag.glsl")),
        )
    };
}

/// Everything one stage needs to draw a frame.
pub struct StageRenderer {
    gl: Arc<glow::Context>,
    stage: Stage,
    program: ShaderProgram,
    mesh: Mesh,
    texture: Option<Texture>,
}

impl StageRenderer {
    pub fn new(gl: &Arc<glow::Context>, config: &Config) -> Result<Self, String> {
        let stage = config.stage;
        let program = match &config.shader_dir {
            Some(dir) => {
                let dir = dir.join(stage.name());
                ShaderProgram::from_files(gl, &dir.join("vert.glsl"), &dir.join("frag.glsl"))?
            }
            None => embedded_program(gl, stage)?,
        };

        let mesh = match stage {
            Stage::Triangle => Mesh::new(gl, &TRIANGLE, glow::TRIANGLES)?,
            Stage::Shaders => Mesh::new(gl, &COLORED_TRIANGLE, glow::TRIANGLES)?,
            Stage::Textures => Mesh::new(gl, &QUAD, glow::TRIANGLES)?,
            Stage::Transforms | Stage::Camera => Mesh::new(gl, &PYRAMID, glow::TRIANGLES)?,
        };

        let texture = if stage.uses_texture() {
            let texture = load_texture(gl, config.texture.as_deref())?;
            texture.assign_unit(&program, names::TEX0, 0);
            Some(texture)
        } else {
            None
        };

        unsafe {
            if stage.uses_depth() {
                gl.enable(glow::DEPTH_TEST);
            } else {
                gl.disable(glow::DEPTH_TEST);
            }
        }

        log::info!(
            "Prepared stage '{}' ({} indices)",
            stage,
            mesh.index_count()
        );

        Ok(Self {
            gl: Arc::clone(gl),
            stage,
            program,
            mesh,
            texture,
        })
    }

    /// Clears the framebuffer, publishes the session's uniforms and draws the mesh.
    pub fn draw(&self, session: &Session) {
        let [r, g, b, a] = CLEAR_COLOR;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            let mut mask = glow::COLOR_BUFFER_BIT;
            if self.stage.uses_depth() {
                mask |= glow::DEPTH_BUFFER_BIT;
            }
            self.gl.clear(mask);
        }

        self.program.use_program();
        session.publish(&self.program);
        if let Some(texture) = &self.texture {
            texture.bind(0);
        }
        self.mesh.draw();
    }

    /// Resizes the GL viewport.
    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }
}

fn embedded_program(gl: &Arc<glow::Context>, stage: Stage) -> Result<ShaderProgram, String> {
    match stage {
        Stage::Triangle => stage_program!(gl, "triangle"),
        Stage::Shaders => stage_program!(gl, "shaders"),
        Stage::Textures => stage_program!(gl, "textures"),
        Stage::Transforms => stage_program!(gl, "transforms"),
        Stage::Camera => stage_program!(gl, "camera"),
    }
}

fn load_texture(gl: &Arc<glow::Context>, path: Option<&Path>) -> Result<Texture, String> {
    if let Some(path) = path {
        match Texture::from_file(gl, path, PixelFormat::Rgba) {
            Ok(texture) => return Ok(texture),
            Err(e) => log::warn!("Could not load texture, using a checkerboard: {}", e),
        }
    }
    Texture::checkerboard(gl, 64, 8)
}
