use glam::{Mat4, Vec3};

// wgpu clip space has z in [0, 1]; glam's perspective_rh_gl maps to [-1, 1].
const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.5, 1.0,
]);

/// Perspective camera circling the origin in the horizontal plane.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub distance: f32,
    pub angle: f32,
}

impl Camera {
    pub fn orbiting(distance: f32, aspect: f32) -> Self {
        let mut camera = Self {
            eye: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
            distance,
            angle: 0.0,
        };
        camera.set_angle(0.0);
        camera
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.eye = Vec3::new(
            self.distance * angle.sin(),
            0.0,
            self.distance * angle.cos(),
        );
    }

    pub fn advance(&mut self, delta: f32) {
        self.set_angle((self.angle + delta) % std::f32::consts::TAU);
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let proj =
            Mat4::perspective_rh_gl(self.fovy.to_radians(), self.aspect, self.znear, self.zfar);

        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn starts_on_positive_z() {
        let camera = Camera::orbiting(10.0, 4.0 / 3.0);
        assert!((camera.eye - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-6);
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut camera = Camera::orbiting(10.0, 1.0);
        camera.set_angle(FRAC_PI_2);
        assert!((camera.eye - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);

        for _ in 0..1000 {
            camera.advance(0.01);
        }
        assert!((camera.eye.length() - 10.0).abs() < 1e-4);
        assert_eq!(camera.eye.y, 0.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = Camera::orbiting(10.0, 800.0 / 600.0);
        let clip = camera.build_view_projection_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
