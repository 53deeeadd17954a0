use crate::constants::{BOHR_RADIUS, VIBRATION_AMPLITUDE, VIBRATION_FREQ};
use crate::physics::orbital::Orbital;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, SQRT_2};
use std::str::FromStr;

/// Normalization applied to the p-orbital angular terms.
///
/// The two viewers this model unifies disagree on the m = ±1 terms, so both
/// tables are kept and the choice is made per model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmonicConvention {
    /// `sqrt(3 / 4pi)` on every p term, negative sign on both m = ±1 terms.
    #[default]
    Uniform,
    /// `sqrt(3 / 8pi)` on the m = ±1 terms, positive sign on m = -1.
    Split,
}

impl HarmonicConvention {
    pub fn label(self) -> &'static str {
        match self {
            HarmonicConvention::Uniform => "sqrt(3/4pi)",
            HarmonicConvention::Split => "sqrt(3/8pi)",
        }
    }

    fn lateral_coefficient(self) -> f32 {
        match self {
            HarmonicConvention::Uniform => (3.0 / (4.0 * PI)).sqrt(),
            HarmonicConvention::Split => (3.0 / (8.0 * PI)).sqrt(),
        }
    }
}

impl FromStr for HarmonicConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(HarmonicConvention::Uniform),
            "split" => Ok(HarmonicConvention::Split),
            other => Err(format!("unknown harmonic convention {other:?}")),
        }
    }
}

/// Closed-form radial functions, indexed by the principal quantum number only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadialTerm {
    FirstShell,
    SecondShell,
}

impl RadialTerm {
    pub fn for_principal(n: u8) -> Option<Self> {
        match n {
            1 => Some(RadialTerm::FirstShell),
            2 => Some(RadialTerm::SecondShell),
            _ => None,
        }
    }

    pub fn evaluate(self, r: f32, a0: f32) -> f32 {
        match self {
            RadialTerm::FirstShell => 2.0 * f32::exp(-r / a0) / a0.powf(1.5),
            RadialTerm::SecondShell => {
                (1.0 / (2.0 * SQRT_2)) * (1.0 - r / (2.0 * a0)) * f32::exp(-r / (2.0 * a0))
                    / a0.powf(1.5)
            }
        }
    }

    /// Largest |R| over r >= 0. Both shells peak at the nucleus; the second
    /// shell's outer lobe at r = 4 a0 only reaches e^-2 of it.
    pub fn peak(self, a0: f32) -> f32 {
        self.evaluate(0.0, a0).abs()
    }
}

/// Real-valued spherical harmonics, indexed by (l, m) only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngularTerm {
    S,
    Pz,
    Px,
    Py,
}

impl AngularTerm {
    pub fn for_quantum_numbers(l: u8, m: i8) -> Option<Self> {
        match (l, m) {
            (0, 0) => Some(AngularTerm::S),
            (1, 0) => Some(AngularTerm::Pz),
            (1, 1) => Some(AngularTerm::Px),
            (1, -1) => Some(AngularTerm::Py),
            _ => None,
        }
    }

    pub fn evaluate(self, theta: f32, phi: f32, convention: HarmonicConvention) -> f32 {
        match self {
            AngularTerm::S => 0.5 * (1.0 / PI).sqrt(),
            // cos(theta) taken as sin of the elevation so the xy nodal plane is exactly zero.
            AngularTerm::Pz => (3.0 / (4.0 * PI)).sqrt() * (FRAC_PI_2 - theta).sin(),
            AngularTerm::Px => -convention.lateral_coefficient() * theta.sin() * phi.cos(),
            AngularTerm::Py => {
                let sign = match convention {
                    HarmonicConvention::Uniform => -1.0,
                    HarmonicConvention::Split => 1.0,
                };
                sign * convention.lateral_coefficient() * theta.sin() * phi.sin()
            }
        }
    }

    pub fn peak(self, convention: HarmonicConvention) -> f32 {
        match self {
            AngularTerm::S => 0.5 * (1.0 / PI).sqrt(),
            AngularTerm::Pz => (3.0 / (4.0 * PI)).sqrt(),
            AngularTerm::Px | AngularTerm::Py => convention.lateral_coefficient(),
        }
    }
}

/// Relative (non-normalized) |psi|^2 for the tabulated hydrogen states, with a
/// slow multiplicative "breathing" modulation over time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityModel {
    pub bohr_radius: f32,
    pub vibration_frequency: f32,
    pub vibration_amplitude: f32,
    pub convention: HarmonicConvention,
}

impl Default for DensityModel {
    fn default() -> Self {
        Self {
            bohr_radius: BOHR_RADIUS,
            vibration_frequency: VIBRATION_FREQ,
            vibration_amplitude: VIBRATION_AMPLITUDE,
            convention: HarmonicConvention::Uniform,
        }
    }
}

impl DensityModel {
    pub fn with_convention(convention: HarmonicConvention) -> Self {
        Self {
            convention,
            ..Self::default()
        }
    }

    pub fn radial_factor(&self, n: u8, r: f32) -> f32 {
        RadialTerm::for_principal(n).map_or(0.0, |term| term.evaluate(r, self.bohr_radius))
    }

    pub fn angular_factor(&self, l: u8, m: i8, theta: f32, phi: f32) -> f32 {
        AngularTerm::for_quantum_numbers(l, m)
            .map_or(0.0, |term| term.evaluate(theta, phi, self.convention))
    }

    pub fn vibration(&self, time: f32) -> f32 {
        (1.0 + self.vibration_amplitude * (self.vibration_frequency * time).sin()).max(0.0)
    }

    /// Density at `(r, theta, phi)` and `time`. Unimplemented states give 0.
    pub fn probability_density(
        &self,
        orbital: &Orbital,
        r: f32,
        theta: f32,
        phi: f32,
        time: f32,
    ) -> f32 {
        let radial = self.radial_factor(orbital.n, r);
        let angular = self.angular_factor(orbital.l, orbital.m, theta, phi);
        let psi = radial * angular;
        psi * psi * self.vibration(time)
    }

    /// Whether the orbital has both a radial and an angular term, i.e. its
    /// density is not identically zero.
    pub fn supports(&self, orbital: &Orbital) -> bool {
        RadialTerm::for_principal(orbital.n).is_some()
            && AngularTerm::for_quantum_numbers(orbital.l, orbital.m).is_some()
    }

    /// Upper bound of the density over all positions and times.
    pub fn peak_density(&self, orbital: &Orbital) -> f32 {
        let (Some(radial), Some(angular)) = (
            RadialTerm::for_principal(orbital.n),
            AngularTerm::for_quantum_numbers(orbital.l, orbital.m),
        ) else {
            return 0.0;
        };

        let psi = radial.peak(self.bohr_radius) * angular.peak(self.convention);
        psi * psi * (1.0 + self.vibration_amplitude.abs())
    }
}

/// Density under the default model.
pub fn probability_density(orbital: &Orbital, r: f32, theta: f32, phi: f32, time: f32) -> f32 {
    DensityModel::default().probability_density(orbital, r, theta, phi, time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::orbital::STANDARD_ORBITALS;
    use std::f32::consts::TAU;

    fn orbital(n: u8, l: u8, m: i8) -> Orbital {
        Orbital::new(n, l, m, 1.0, "test", [1.0, 1.0, 1.0])
    }

    fn grid() -> impl Iterator<Item = (f32, f32, f32, f32)> {
        (0..9).flat_map(|ri| {
            (0..7).flat_map(move |ti| {
                (0..8).flat_map(move |pi| {
                    [0.0, 3.7, 15.7, 100.0].into_iter().map(move |t| {
                        (ri as f32, ti as f32 * PI / 6.0, pi as f32 * TAU / 8.0, t)
                    })
                })
            })
        })
    }

    #[test]
    fn density_is_never_negative() {
        let models = [
            DensityModel::default(),
            DensityModel::with_convention(HarmonicConvention::Split),
        ];
        for model in models {
            for orbital in STANDARD_ORBITALS.iter() {
                for (r, theta, phi, t) in grid() {
                    let d = model.probability_density(orbital, r, theta, phi, t);
                    assert!(d >= 0.0, "{} at r={r} gave {d}", orbital.name);
                }
            }
        }
    }

    #[test]
    fn ground_state_is_rotationally_symmetric() {
        let ground = Orbital::ground_state();
        for r in [0.0, 0.5, 1.0, 2.5, 4.0] {
            let reference = probability_density(&ground, r, 0.0, 0.0, 2.0);
            for theta in [0.3, 1.0, FRAC_PI_2, 2.8, PI] {
                for phi in [0.0, 1.1, 3.3, 6.0] {
                    assert_eq!(probability_density(&ground, r, theta, phi, 2.0), reference);
                }
            }
        }
    }

    #[test]
    fn time_modulation_is_multiplicative() {
        let model = DensityModel::default();
        for orbital in STANDARD_ORBITALS.iter() {
            for t in [0.5, 7.0, 15.7, 42.0, 1000.0] {
                let factor = 1.0 + 0.1 * (VIBRATION_FREQ * t).sin();
                let at_zero = model.probability_density(orbital, 1.3, 0.4, 2.2, 0.0);
                let at_t = model.probability_density(orbital, 1.3, 0.4, 2.2, t);
                assert!((at_t - at_zero * factor).abs() <= 1e-6 * at_zero.max(1e-12));
            }
        }
    }

    #[test]
    fn ground_state_at_nucleus() {
        let time = 3.0;
        let vibration = 1.0 + 0.1 * (VIBRATION_FREQ * time).sin();
        let psi = 2.0 / BOHR_RADIUS.powf(1.5) * (0.5 * (1.0 / PI).sqrt());
        let expected = psi * psi * vibration;

        let d = probability_density(&Orbital::ground_state(), 0.0, 1.0, 1.0, time);
        assert!((d - expected).abs() <= 1e-7 * expected);
        assert!((d / vibration - 1.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn pz_vanishes_on_the_equatorial_plane() {
        let pz = orbital(2, 1, 0);
        for r in [0.0, 0.7, 2.0, 6.0] {
            for phi in [0.0, 1.0, 4.0] {
                for t in [0.0, 9.0] {
                    assert_eq!(probability_density(&pz, r, FRAC_PI_2, phi, t), 0.0);
                }
            }
        }
    }

    #[test]
    fn unsupported_states_have_zero_density() {
        let model = DensityModel::default();
        for unsupported in [orbital(3, 0, 0), orbital(3, 2, 1), orbital(2, 1, 2), orbital(4, 0, 0)] {
            assert!(!model.supports(&unsupported));
            assert_eq!(model.peak_density(&unsupported), 0.0);
            for (r, theta, phi, t) in grid() {
                assert_eq!(model.probability_density(&unsupported, r, theta, phi, t), 0.0);
            }
        }
    }

    #[test]
    fn conventions_only_differ_on_lateral_p_terms() {
        let uniform = DensityModel::default();
        let split = DensityModel::with_convention(HarmonicConvention::Split);

        for state in [Orbital::ground_state(), orbital(2, 1, 0)] {
            assert_eq!(
                uniform.probability_density(&state, 1.0, 0.6, 0.9, 0.0),
                split.probability_density(&state, 1.0, 0.6, 0.9, 0.0)
            );
        }

        let px = orbital(2, 1, 1);
        let wide = uniform.probability_density(&px, 1.0, FRAC_PI_2, 0.0, 0.0);
        let narrow = split.probability_density(&px, 1.0, FRAC_PI_2, 0.0, 0.0);
        assert!((narrow * 2.0 - wide).abs() < 1e-5 * wide);

        let py_uniform = AngularTerm::Py.evaluate(FRAC_PI_2, FRAC_PI_2, HarmonicConvention::Uniform);
        let py_split = AngularTerm::Py.evaluate(FRAC_PI_2, FRAC_PI_2, HarmonicConvention::Split);
        assert!(py_uniform < 0.0);
        assert!(py_split > 0.0);
    }

    #[test]
    fn peak_density_bounds_every_sample() {
        for model in [
            DensityModel::default(),
            DensityModel::with_convention(HarmonicConvention::Split),
        ] {
            for orbital in STANDARD_ORBITALS.iter() {
                let peak = model.peak_density(orbital);
                assert!(peak > 0.0);
                for (r, theta, phi, t) in grid() {
                    let d = model.probability_density(orbital, r * 0.5, theta, phi, t);
                    assert!(d <= peak * (1.0 + 1e-5), "{}: {d} > {peak}", orbital.name);
                }
            }
        }
    }

    #[test]
    fn convention_parses_from_name() {
        assert_eq!(
            "Split".parse::<HarmonicConvention>(),
            Ok(HarmonicConvention::Split)
        );
        assert_eq!(
            " uniform ".parse::<HarmonicConvention>(),
            Ok(HarmonicConvention::Uniform)
        );
        assert!("legendre".parse::<HarmonicConvention>().is_err());
    }

    #[test]
    fn radial_terms_follow_closed_forms() {
        let model = DensityModel::default();
        assert!((model.radial_factor(1, 1.0) - 2.0 * (-1.0f32).exp()).abs() < 1e-6);
        // Node of the second shell at r = 2 a0.
        assert!(model.radial_factor(2, 2.0).abs() < 1e-7);
        assert!(model.radial_factor(2, 3.0) < 0.0);
        assert_eq!(model.radial_factor(4, 1.0), 0.0);
    }
}
