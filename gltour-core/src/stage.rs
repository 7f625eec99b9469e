//! The tutorial stages and the per-frame [`Session`] step.
//!
//! The client calls [`Session::update`] once per frame with the current input and clock, then
//! [`Session::publish`] with the active shader program before drawing.

use std::fmt;
use std::str::FromStr;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::config::{CameraSettings, Config};
use crate::input::InputSource;
use crate::uniform::{UniformTarget, names};

/// Seconds between two rotation ticks of the transforms stage.
pub const ROTATION_TICK: f64 = 1.0 / 60.0;
/// Degrees the pyramid turns per tick.
pub const ROTATION_STEP: f32 = 0.5;
/// Scale applied by the 2D stages' vertex shaders.
pub const VERTEX_SCALE: f32 = 0.5;

const TRANSFORMS_FOV: f32 = 45.0;
const TRANSFORMS_NEAR: f32 = 0.1;
const TRANSFORMS_FAR: f32 = 100.0;

/// One incremental rendering stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// A single-color triangle from an element buffer.
    Triangle,
    /// Per-vertex colors and a scale uniform.
    Shaders,
    /// A textured quad.
    Textures,
    /// A rotating textured pyramid with model, view and projection matrices.
    Transforms,
    /// The pyramid seen through a free-fly camera.
    Camera,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Triangle,
        Stage::Shaders,
        Stage::Textures,
        Stage::Transforms,
        Stage::Camera,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Triangle => "triangle",
            Stage::Shaders => "shaders",
            Stage::Textures => "textures",
            Stage::Transforms => "transforms",
            Stage::Camera => "camera",
        }
    }

    pub fn uses_texture(&self) -> bool {
        matches!(self, Stage::Textures | Stage::Transforms | Stage::Camera)
    }

    pub fn uses_depth(&self) -> bool {
        matches!(self, Stage::Transforms | Stage::Camera)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| {
                let known: Vec<_> = Stage::ALL.iter().map(Stage::name).collect();
                format!("Unknown stage '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// Mutable per-run state of the selected stage.
pub struct Session {
    stage: Stage,
    pub camera: Camera,
    settings: CameraSettings,
    rotation: f32,
    last_tick: f64,
}

impl Session {
    pub fn new(stage: Stage, settings: CameraSettings, width: u32, height: u32) -> Self {
        Self {
            stage,
            camera: Camera::from_settings(&settings, width, height),
            settings,
            rotation: 0.0,
            last_tick: 0.0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.stage,
            config.camera.clone(),
            config.window.width,
            config.window.height,
        )
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Pyramid rotation about +Y, in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Advances the stage by one frame. `now` is the frame time in seconds.
    pub fn update<I: InputSource + ?Sized>(&mut self, input: &mut I, now: f64) {
        match self.stage {
            Stage::Transforms => {
                if now - self.last_tick >= ROTATION_TICK {
                    self.rotation = (self.rotation + ROTATION_STEP) % 360.0;
                    self.last_tick = now;
                }
            }
            Stage::Camera => self.camera.inputs(input),
            Stage::Triangle | Stage::Shaders | Stage::Textures => {}
        }
    }

    /// Model matrix of the transforms stage.
    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation.to_radians())
    }

    /// Fixed view of the transforms stage, slightly above and in front of the pyramid.
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, -0.5, -2.0))
    }

    /// Projection of the transforms stage.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            TRANSFORMS_FOV.to_radians(),
            self.camera.aspect_ratio(),
            TRANSFORMS_NEAR,
            TRANSFORMS_FAR,
        )
    }

    /// Uploads the stage's uniforms to `target`, which must be the program about to draw.
    pub fn publish<T: UniformTarget + ?Sized>(&self, target: &T) {
        if matches!(self.stage, Stage::Shaders | Stage::Textures) {
            target.set_f32(names::SCALE, VERTEX_SCALE);
        }
        if self.stage.uses_texture() {
            target.set_i32(names::TEX0, 0);
        }
        match self.stage {
            Stage::Transforms => {
                target.set_mat4(names::MODEL, self.model());
                target.set_mat4(names::VIEW, self.view());
                target.set_mat4(names::PROJECTION, self.projection());
            }
            Stage::Camera => self.camera.publish_matrix(
                self.settings.fov,
                self.settings.near,
                self.settings.far,
                target,
                names::CAMERA,
            ),
            Stage::Triangle | Stage::Shaders | Stage::Textures => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;
    use crate::input::tests::FakeInput;
    use crate::uniform::tests::{Recorded, RecordingTarget};

    fn session(stage: Stage) -> Session {
        Session::new(stage, CameraSettings::default(), 800, 800)
    }

    #[test]
    fn test_stage_names_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(stage.to_string().parse::<Stage>(), Ok(stage));
        }
        assert!("CAMERA".parse::<Stage>().is_err());
        let err = "lighting".parse::<Stage>().unwrap_err();
        assert!(err.contains("transforms"));
    }

    #[test]
    fn test_rotation_ticks_at_most_once_per_sixtieth() {
        let mut session = session(Stage::Transforms);
        let mut input = FakeInput::default();

        session.update(&mut input, 0.0);
        assert_eq!(session.rotation(), 0.0);
        session.update(&mut input, 0.02);
        assert_eq!(session.rotation(), 0.5);
        session.update(&mut input, 0.025);
        assert_eq!(session.rotation(), 0.5);
        session.update(&mut input, 0.04);
        assert_eq!(session.rotation(), 1.0);
    }

    #[test]
    fn test_only_camera_stage_moves_camera() {
        let mut input = FakeInput::holding(&[Action::MoveForward]);

        let mut still = session(Stage::Transforms);
        still.update(&mut input, 1.0);
        assert_eq!(still.camera.position, Vec3::new(0.0, 0.0, 2.0));

        let mut moving = session(Stage::Camera);
        moving.update(&mut input, 1.0);
        assert!(moving.camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 1.9), 1e-6));
    }

    #[test]
    fn test_publish_per_stage() {
        let expected: [(Stage, &[&str]); 5] = [
            (Stage::Triangle, &[]),
            (Stage::Shaders, &["scale"]),
            (Stage::Textures, &["scale", "tex0"]),
            (Stage::Transforms, &["tex0", "model", "view", "proj"]),
            (Stage::Camera, &["tex0", "camMatrix"]),
        ];
        for (stage, names) in expected {
            let target = RecordingTarget::default();
            session(stage).publish(&target);
            assert_eq!(target.names(), names, "{}", stage);
        }
    }

    #[test]
    fn test_transforms_matrices() {
        let mut session = session(Stage::Transforms);
        let mut input = FakeInput::default();
        for frame in 1..=180 {
            session.update(&mut input, frame as f64 * 0.02);
        }
        assert!((session.rotation() - 90.0).abs() < 1e-4);

        let target = RecordingTarget::default();
        session.publish(&target);
        let Some(Recorded::Mat4(model)) = target.get("model") else {
            panic!("model not published");
        };
        assert!(
            model
                .transform_vector3(Vec3::X)
                .abs_diff_eq(Vec3::NEG_Z, 1e-4)
        );
        assert_eq!(
            target.get("view"),
            Some(Recorded::Mat4(Mat4::from_translation(Vec3::new(
                0.0, -0.5, -2.0
            ))))
        );
    }

    #[test]
    fn test_camera_matrix_follows_settings() {
        let settings = CameraSettings {
            fov: 60.0,
            near: 0.5,
            far: 50.0,
            ..Default::default()
        };
        let session = Session::new(Stage::Camera, settings, 1280, 720);
        let target = RecordingTarget::default();
        session.publish(&target);
        assert_eq!(
            target.get("camMatrix"),
            Some(Recorded::Mat4(session.camera.matrix(60.0, 0.5, 50.0)))
        );
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut session = session(Stage::Transforms);
        session.resize(1600, 800);
        assert_eq!(session.camera.viewport(), (1600, 800));
        let expected = Mat4::perspective_rh_gl(45f32.to_radians(), 2.0, 0.1, 100.0);
        assert!(session.projection().abs_diff_eq(expected, 1e-6));
    }
}
