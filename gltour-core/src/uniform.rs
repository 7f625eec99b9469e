//! Publishing values to shader uniforms.
//!
//! [`UniformTarget`] is implemented by the client's shader program. Keeping it as a trait
//! lets the camera and the stage logic publish matrices without a GL context.

use glam::Mat4;

/// Uniform names shared by the stage shaders.
pub mod names {
    pub const SCALE: &str = "scale";
    pub const TEX0: &str = "tex0";
    pub const MODEL: &str = "model";
    pub const VIEW: &str = "view";
    pub const PROJECTION: &str = "proj";
    pub const CAMERA: &str = "camMatrix";
}

/// Something that accepts named uniform values, usually an active shader program.
pub trait UniformTarget {
    fn set_f32(&self, name: &str, value: f32);

    fn set_i32(&self, name: &str, value: i32);

    /// Uploads a column-major 4x4 matrix.
    fn set_mat4(&self, name: &str, value: Mat4);
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Recorded {
        F32(f32),
        I32(i32),
        Mat4(Mat4),
    }

    /// Records every uniform write in order.
    #[derive(Default)]
    pub struct RecordingTarget {
        pub writes: RefCell<Vec<(String, Recorded)>>,
    }

    impl RecordingTarget {
        pub fn get(&self, name: &str) -> Option<Recorded> {
            self.writes
                .borrow()
                .iter()
                .rev()
                .find(|(n, _)| n == name)
                .map(|(_, value)| value.clone())
        }

        pub fn names(&self) -> Vec<String> {
            self.writes.borrow().iter().map(|(n, _)| n.clone()).collect()
        }
    }

    impl UniformTarget for RecordingTarget {
        fn set_f32(&self, name: &str, value: f32) {
            self.writes
                .borrow_mut()
                .push((name.to_string(), Recorded::F32(value)));
        }

        fn set_i32(&self, name: &str, value: i32) {
            self.writes
                .borrow_mut()
                .push((name.to_string(), Recorded::I32(value)));
        }

        fn set_mat4(&self, name: &str, value: Mat4) {
            self.writes
                .borrow_mut()
                .push((name.to_string(), Recorded::Mat4(value)));
        }
    }
}
