//! Free-fly camera.
//!
//! The [`Camera`] keeps a position and a unit forward vector, moves and turns them from an
//! [`InputSource`] once per frame, and builds the combined view-projection matrix the
//! camera stage uploads to its shader.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::config::CameraSettings;
use crate::input::{Action, InputSource};
use crate::uniform::UniformTarget;

/// Smallest allowed angle between the orientation and `up`, in degrees.
pub const MIN_UP_ANGLE: f32 = 5.0;
/// Largest allowed angle between the orientation and `up`, in degrees.
pub const MAX_UP_ANGLE: f32 = 175.0;

// Keeps clamped pitches strictly inside the limits despite rounding.
const PITCH_MARGIN: f32 = 0.01;

/// A first-person camera driven by keyboard movement and click-and-drag mouse look.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    orientation: Vec3,
    up: Vec3,
    width: u32,
    height: u32,
    first_click: bool,
    /// Distance moved per update while a movement action is held.
    pub speed: f32,
    /// Factor applied to `speed` while [`Action::Sprint`] is held.
    pub sprint_multiplier: f32,
    /// Degrees turned when the cursor travels the full viewport width or height.
    pub sensitivity: f32,
}

impl Camera {
    /// Creates a camera at `position` looking down -Z with +Y as world up.
    pub fn new(width: u32, height: u32, position: Vec3) -> Self {
        Self {
            position,
            orientation: Vec3::NEG_Z,
            up: Vec3::Y,
            width,
            height,
            first_click: true,
            speed: 0.1,
            sprint_multiplier: 4.0,
            sensitivity: 100.0,
        }
    }

    /// Creates a camera from configured settings.
    pub fn from_settings(settings: &CameraSettings, width: u32, height: u32) -> Self {
        let mut camera = Self::new(width, height, Vec3::from(settings.position));
        camera.speed = settings.speed;
        camera.sprint_multiplier = settings.sprint_multiplier;
        camera.sensitivity = settings.sensitivity;
        camera
    }

    /// The unit forward vector.
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    /// Points the camera along `direction`, normalized.
    ///
    /// Zero vectors and directions within [`MIN_UP_ANGLE`] of `up` or `-up` are rejected and
    /// leave the orientation unchanged.
    pub fn set_orientation(&mut self, direction: Vec3) -> Result<(), String> {
        let direction = direction
            .try_normalize()
            .ok_or_else(|| "Orientation must be a non-zero vector".to_string())?;
        if !within_up_limits(direction, self.up) {
            return Err(format!(
                "Orientation {} is within {} degrees of vertical",
                direction, MIN_UP_ANGLE
            ));
        }
        self.orientation = direction;
        Ok(())
    }

    /// The unit vector pointing to the camera's right, or zero if looking straight along `up`.
    pub fn right(&self) -> Vec3 {
        self.orientation.cross(self.up).normalize_or_zero()
    }

    pub fn first_click(&self) -> bool {
        self.first_click
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Updates the viewport size after the window was resized.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Samples `input` once and updates position, orientation and look-mode state.
    ///
    /// Movement is additive, so opposing actions cancel out. While [`Action::Look`] is held the
    /// cursor is hidden and kept at the viewport center; the first sample after the press only
    /// anchors the cursor and does not rotate.
    pub fn inputs<I: InputSource + ?Sized>(&mut self, input: &mut I) {
        let step = if input.is_down(Action::Sprint) {
            self.speed * self.sprint_multiplier
        } else {
            self.speed
        };

        let right = self.right();
        let mut movement = Vec3::ZERO;
        if input.is_down(Action::MoveForward) {
            movement += self.orientation;
        }
        if input.is_down(Action::MoveBackward) {
            movement -= self.orientation;
        }
        if input.is_down(Action::StrafeRight) {
            movement += right;
        }
        if input.is_down(Action::StrafeLeft) {
            movement -= right;
        }
        if input.is_down(Action::Ascend) {
            movement += self.up;
        }
        if input.is_down(Action::Descend) {
            movement -= self.up;
        }
        self.position += movement * step;

        if !input.is_down(Action::Look) {
            if !self.first_click {
                log::debug!("Leaving look mode");
                input.set_cursor_visible(true);
                self.first_click = true;
            }
            return;
        }

        input.set_cursor_visible(false);
        let center = self.center();

        if self.first_click {
            log::debug!("Entering look mode");
            input.warp_cursor(center);
            self.first_click = false;
            return;
        }

        let delta = input.cursor_position() - center;
        let yaw = self.sensitivity * delta.x / self.width as f32;
        let pitch = self.sensitivity * delta.y / self.height as f32;
        self.turn(yaw, pitch);

        input.warp_cursor(center);
    }

    /// Turns the camera by screen-space angles in degrees.
    ///
    /// Positive `yaw` turns right and positive `pitch` looks down, matching cursor motion. The
    /// pitch is clamped to what is left before [`MIN_UP_ANGLE`] from `up` or `-up`, so a large
    /// step stops short of vertical instead of rotating over it.
    pub fn turn(&mut self, yaw: f32, pitch: f32) {
        let right = self.right();
        if right != Vec3::ZERO {
            let angle = self.orientation.angle_between(self.up).to_degrees();
            let max_up = (angle - MIN_UP_ANGLE - PITCH_MARGIN).max(0.0);
            let max_down = (MAX_UP_ANGLE - angle - PITCH_MARGIN).max(0.0);
            let pitch = pitch.clamp(-max_up, max_down);
            let pitched = Quat::from_axis_angle(right, (-pitch).to_radians()) * self.orientation;
            let pitched = pitched.normalize();
            if within_up_limits(pitched, self.up) {
                self.orientation = pitched;
            }
        }

        let yawed = Quat::from_axis_angle(self.up, (-yaw).to_radians()) * self.orientation;
        self.orientation = yawed.normalize();
    }

    /// The world-to-camera transform.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.orientation, self.up)
    }

    /// The camera-to-clip transform for the current viewport.
    pub fn projection(&self, fov_degrees: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh_gl(fov_degrees.to_radians(), self.aspect_ratio(), near, far)
    }

    /// Returns `projection * view`.
    ///
    /// `0 < near < far` and a non-empty viewport are assumed; other values give a degenerate
    /// matrix.
    pub fn matrix(&self, fov_degrees: f32, near: f32, far: f32) -> Mat4 {
        self.projection(fov_degrees, near, far) * self.view()
    }

    /// Builds the view-projection matrix and uploads it to `uniform` on `target`.
    pub fn publish_matrix<T: UniformTarget + ?Sized>(
        &self,
        fov_degrees: f32,
        near: f32,
        far: f32,
        target: &T,
        uniform: &str,
    ) {
        target.set_mat4(uniform, self.matrix(fov_degrees, near, far));
    }
}

fn within_up_limits(orientation: Vec3, up: Vec3) -> bool {
    let angle = orientation.angle_between(up).to_degrees();
    angle > MIN_UP_ANGLE && angle < MAX_UP_ANGLE
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;
    use crate::input::tests::FakeInput;
    use crate::uniform::tests::{Recorded, RecordingTarget};

    fn look_at(camera: &mut Camera, input: &mut FakeInput, cursor: Vec2) {
        input.cursor = cursor;
        camera.inputs(input);
    }

    #[test]
    fn test_forward_then_back_returns_home() {
        let mut camera = Camera::new(800, 800, Vec3::new(1.0, 2.0, 3.0));
        camera.set_orientation(Vec3::new(0.3, -0.2, -1.0)).unwrap();
        let start = camera.position;

        camera.inputs(&mut FakeInput::holding(&[Action::MoveForward]));
        assert!(!camera.position.abs_diff_eq(start, 1e-3));
        camera.inputs(&mut FakeInput::holding(&[Action::MoveBackward]));
        assert!(camera.position.abs_diff_eq(start, 1e-5));
    }

    #[test]
    fn test_opposing_actions_cancel() {
        let mut camera = Camera::new(800, 800, Vec3::ZERO);
        camera.inputs(&mut FakeInput::holding(&[
            Action::MoveForward,
            Action::MoveBackward,
            Action::StrafeLeft,
            Action::StrafeRight,
            Action::Ascend,
            Action::Descend,
        ]));
        assert_eq!(camera.position, Vec3::ZERO);
    }

    #[test]
    fn test_strafe_and_vertical_axes() {
        let mut camera = Camera::new(800, 800, Vec3::ZERO);
        camera.inputs(&mut FakeInput::holding(&[Action::StrafeRight, Action::Ascend]));
        assert!(camera.position.abs_diff_eq(Vec3::new(0.1, 0.1, 0.0), 1e-6));
    }

    #[test]
    fn test_sprint_multiplies_step() {
        let mut camera = Camera::new(800, 800, Vec3::ZERO);
        camera.inputs(&mut FakeInput::holding(&[Action::MoveForward, Action::Sprint]));
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, -0.4), 1e-6));
    }

    #[test]
    fn test_first_look_sample_only_anchors() {
        let mut camera = Camera::new(800, 600, Vec3::ZERO);
        let mut input = FakeInput::holding(&[Action::Look]);
        input.cursor = Vec2::new(10.0, 590.0);

        camera.inputs(&mut input);

        assert_eq!(camera.orientation(), Vec3::NEG_Z);
        assert!(!camera.first_click());
        assert!(!input.cursor_visible);
        assert_eq!(input.warps, vec![Vec2::new(400.0, 300.0)]);
    }

    #[test]
    fn test_release_then_press_reanchors() {
        let mut camera = Camera::new(800, 800, Vec3::ZERO);
        let mut input = FakeInput::holding(&[Action::Look]);
        camera.inputs(&mut input);
        look_at(&mut camera, &mut input, Vec2::new(440.0, 400.0));
        let turned = camera.orientation();
        assert_ne!(turned, Vec3::NEG_Z);

        input.down.clear();
        camera.inputs(&mut input);
        assert!(camera.first_click());
        assert!(input.cursor_visible);

        // Far displacement while released must not leak into the next session.
        input.down.insert(Action::Look);
        look_at(&mut camera, &mut input, Vec2::new(790.0, 5.0));
        assert_eq!(camera.orientation(), turned);
        assert!(!camera.first_click());
    }

    #[test]
    fn test_orientation_stays_unit_length() {
        let mut camera = Camera::new(1280, 720, Vec3::ZERO);
        let mut input = FakeInput::holding(&[Action::Look]);
        camera.inputs(&mut input);
        let cursors = [
            (700.0, 100.0),
            (10.0, 700.0),
            (1279.0, 0.0),
            (640.0, 360.0),
            (300.0, 500.0),
            (900.0, 20.0),
        ];
        for _ in 0..20 {
            for (x, y) in cursors {
                look_at(&mut camera, &mut input, Vec2::new(x, y));
                assert!((camera.orientation().length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_pitch_never_reaches_poles() {
        let mut camera = Camera::new(800, 800, Vec3::ZERO);
        let mut input = FakeInput::holding(&[Action::Look]);
        camera.inputs(&mut input);

        for dy in [-3.0, -37.0, -400.0, -1.0, 3.0, 37.0, 400.0, 1.0] {
            for _ in 0..200 {
                look_at(&mut camera, &mut input, Vec2::new(400.0, 400.0 + dy));
                let orientation = camera.orientation();
                let angle = orientation.angle_between(Vec3::Y).to_degrees();
                assert!(angle > MIN_UP_ANGLE && angle < MAX_UP_ANGLE, "angle {}", angle);
                assert!(orientation.z < 0.0, "heading reversed: {}", orientation);
            }
        }
    }

    #[test]
    fn test_large_pitch_stops_short_of_vertical() {
        let mut camera = Camera::new(800, 800, Vec3::ZERO);
        let mut input = FakeInput::holding(&[Action::Look]);
        camera.inputs(&mut input);

        // Every sample flicks the cursor to the top edge, a 50 degree pitch.
        for _ in 0..10 {
            look_at(&mut camera, &mut input, Vec2::new(400.0, 0.0));
            let orientation = camera.orientation();
            assert!(orientation.z < 0.0, "flipped over the top: {}", orientation);
            assert!(orientation.x.abs() < 1e-5);
            assert!(orientation.angle_between(Vec3::Y).to_degrees() > MIN_UP_ANGLE);
        }
        let angle = camera.orientation().angle_between(Vec3::Y).to_degrees();
        assert!((angle - MIN_UP_ANGLE).abs() < 0.1, "angle {}", angle);

        // And the same at the bottom edge.
        for _ in 0..10 {
            look_at(&mut camera, &mut input, Vec2::new(400.0, 800.0));
            let orientation = camera.orientation();
            assert!(orientation.z < 0.0, "flipped under the bottom: {}", orientation);
            assert!(orientation.angle_between(Vec3::Y).to_degrees() < MAX_UP_ANGLE);
        }
        let angle = camera.orientation().angle_between(Vec3::Y).to_degrees();
        assert!((angle - MAX_UP_ANGLE).abs() < 0.1, "angle {}", angle);
    }

    #[test]
    fn test_set_orientation_rejects_vertical() {
        let mut camera = Camera::new(800, 800, Vec3::ZERO);
        assert!(camera.set_orientation(Vec3::Y).is_err());
        assert!(camera.set_orientation(Vec3::new(0.0, -1.0, 0.01)).is_err());
        assert!(camera.set_orientation(Vec3::ZERO).is_err());
        assert_eq!(camera.orientation(), Vec3::NEG_Z);

        camera.turn(10.0, -10.0);
        let angle = camera.orientation().angle_between(Vec3::Y).to_degrees();
        assert!(angle > MIN_UP_ANGLE && angle < MAX_UP_ANGLE);

        assert!(camera.set_orientation(Vec3::new(2.0, 0.0, 0.0)).is_ok());
        assert_eq!(camera.orientation(), Vec3::X);
    }

    #[test]
    fn test_cursor_down_looks_down() {
        let mut camera = Camera::new(800, 800, Vec3::ZERO);
        camera.turn(0.0, 30.0);
        assert!(camera.orientation().y < 0.0);
        camera.turn(0.0, -60.0);
        assert!(camera.orientation().y > 0.0);
    }

    #[test]
    fn test_move_then_yaw_scenario() {
        let mut camera = Camera::new(800, 800, Vec3::new(0.0, 0.0, 2.0));
        camera.speed = 0.1;

        camera.inputs(&mut FakeInput::holding(&[Action::MoveForward]));
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 1.9), 1e-6));

        // 80 px of an 800 px viewport at sensitivity 100 is 10 degrees.
        let mut input = FakeInput::holding(&[Action::Look]);
        camera.inputs(&mut input);
        look_at(&mut camera, &mut input, Vec2::new(480.0, 400.0));

        assert!(
            camera
                .orientation()
                .abs_diff_eq(Vec3::new(0.1736, 0.0, -0.9848), 1e-4)
        );
        assert_eq!(input.cursor, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_reference_matrix() {
        let camera = Camera::new(600, 600, Vec3::ZERO);
        let expected = Mat4::from_cols(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -1.002002, -1.0),
            Vec4::new(0.0, 0.0, -0.2002002, 0.0),
        );
        let actual = camera.matrix(90.0, 0.1, 100.0);
        assert!(actual.abs_diff_eq(expected, 1e-5), "{:?}", actual);

        let composed = Mat4::perspective_rh_gl(90f32.to_radians(), 1.0, 0.1, 100.0)
            * Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        assert!(actual.abs_diff_eq(composed, 1e-6));
    }

    #[test]
    fn test_publish_matrix_uses_uniform_name() {
        let mut camera = Camera::new(1280, 720, Vec3::new(0.0, 1.0, 4.0));
        camera.resize(640, 480);
        let target = RecordingTarget::default();

        camera.publish_matrix(45.0, 0.1, 100.0, &target, "camMatrix");

        assert_eq!(target.names(), vec!["camMatrix".to_string()]);
        assert_eq!(
            target.get("camMatrix"),
            Some(Recorded::Mat4(camera.matrix(45.0, 0.1, 100.0)))
        );
        assert!((camera.aspect_ratio() - 640.0 / 480.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_settings() {
        let settings = CameraSettings {
            position: [1.0, 2.0, 3.0],
            speed: 0.5,
            sprint_multiplier: 2.0,
            sensitivity: 50.0,
            ..Default::default()
        };
        let camera = Camera::from_settings(&settings, 320, 240);
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.viewport(), (320, 240));
        assert_eq!(camera.speed, 0.5);
        assert_eq!(camera.sprint_multiplier, 2.0);
        assert_eq!(camera.sensitivity, 50.0);
    }
}
