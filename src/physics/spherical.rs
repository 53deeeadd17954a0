use glam::Vec3;

/// A point in physics convention spherical coordinates: `theta` is the polar
/// angle measured from +z, `phi` the azimuth in the xy-plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphericalPoint {
    pub r: f32,
    pub theta: f32,
    pub phi: f32,
}

impl SphericalPoint {
    pub const fn new(r: f32, theta: f32, phi: f32) -> Self {
        Self { r, theta, phi }
    }

    pub fn to_cartesian(self) -> Vec3 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Vec3::new(
            self.r * sin_theta * cos_phi,
            self.r * sin_theta * sin_phi,
            self.r * cos_theta,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn polar_axis_maps_to_z() {
        let north = SphericalPoint::new(3.0, 0.0, 1.234).to_cartesian();
        assert!((north - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-6);

        let south = SphericalPoint::new(3.0, PI, 0.0).to_cartesian();
        assert!((south - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn equator_follows_azimuth() {
        let x = SphericalPoint::new(2.0, FRAC_PI_2, 0.0).to_cartesian();
        assert!((x - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);

        let y = SphericalPoint::new(2.0, FRAC_PI_2, FRAC_PI_2).to_cartesian();
        assert!((y - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn length_matches_radius() {
        let p = SphericalPoint::new(4.5, 0.7, 5.1).to_cartesian();
        assert!((p.length() - 4.5).abs() < 1e-5);
    }
}
