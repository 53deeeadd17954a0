use crate::physics::density::DensityModel;
use glam::Vec3;
use serde::Serialize;
use std::fmt;

/// A hydrogen eigenstate plus how it is presented on screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Orbital {
    pub n: u8,
    pub l: u8,
    pub m: i8,
    /// Multiplier applied to sampled coordinates before drawing.
    pub scale: f32,
    pub name: &'static str,
    pub color: [f32; 3],
}

pub const STANDARD_ORBITALS: [Orbital; 4] = [
    Orbital::new(1, 0, 0, 2.0, "1s", [1.0, 0.0, 0.0]),
    Orbital::new(2, 1, 1, 2.0, "2px", [0.0, 1.0, 0.0]),
    Orbital::new(2, 1, -1, 2.0, "2py", [0.0, 0.5, 1.0]),
    Orbital::new(2, 1, 0, 2.0, "2pz", [1.0, 1.0, 0.0]),
];

impl Orbital {
    pub const fn new(
        n: u8,
        l: u8,
        m: i8,
        scale: f32,
        name: &'static str,
        color: [f32; 3],
    ) -> Self {
        Self {
            n,
            l,
            m,
            scale,
            name,
            color,
        }
    }

    pub const fn ground_state() -> Self {
        Self::new(1, 0, 0, 2.0, "1s", [1.0, 0.0, 0.0])
    }

    /// n >= 1, l < n and |m| <= l.
    pub fn has_valid_quantum_numbers(&self) -> bool {
        self.n > 0 && self.l < self.n && self.m.unsigned_abs() <= self.l
    }

    pub fn scaled(&self, point: Vec3) -> Vec3 {
        point * self.scale
    }

    pub fn rgba(&self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.color;
        [r, g, b, alpha]
    }
}

impl fmt::Display for Orbital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (n={}, l={}, m={})", self.name, self.n, self.l, self.m)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CatalogError {
    Empty,
    InvalidQuantumNumbers { name: &'static str, n: u8, l: u8, m: i8 },
    InvalidScale { name: &'static str, scale: f32 },
    InvalidColor { name: &'static str, color: [f32; 3] },
    ZeroDensity { name: &'static str },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "orbital catalog is empty"),
            CatalogError::InvalidQuantumNumbers { name, n, l, m } => write!(
                f,
                "orbital {name} has invalid quantum numbers n={n}, l={l}, m={m}"
            ),
            CatalogError::InvalidScale { name, scale } => {
                write!(f, "orbital {name} has non-positive scale {scale}")
            }
            CatalogError::InvalidColor { name, color } => {
                write!(f, "orbital {name} has color {color:?} outside [0, 1]")
            }
            CatalogError::ZeroDensity { name } => write!(
                f,
                "orbital {name} has no closed-form density and would never be sampled"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Fixed list of orbitals the viewer can switch between.
///
/// Every entry is checked at construction so that sampling a catalog orbital
/// can always make progress.
#[derive(Clone, Debug)]
pub struct OrbitalCatalog {
    orbitals: Vec<Orbital>,
}

impl OrbitalCatalog {
    pub fn new(orbitals: Vec<Orbital>, model: &DensityModel) -> Result<Self, CatalogError> {
        if orbitals.is_empty() {
            return Err(CatalogError::Empty);
        }

        for orbital in &orbitals {
            validate(orbital, model)?;
        }

        Ok(Self { orbitals })
    }

    /// 1s, 2px, 2py and 2pz.
    pub fn standard() -> Self {
        Self {
            orbitals: STANDARD_ORBITALS.to_vec(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Orbital> {
        self.orbitals.get(index)
    }

    /// Entry at `index`, clamped to the last entry. Catalogs are never empty.
    pub fn at(&self, index: usize) -> &Orbital {
        &self.orbitals[index.min(self.orbitals.len() - 1)]
    }

    pub fn len(&self) -> usize {
        self.orbitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbitals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Orbital> {
        self.orbitals.iter()
    }
}

fn validate(orbital: &Orbital, model: &DensityModel) -> Result<(), CatalogError> {
    if !orbital.has_valid_quantum_numbers() {
        return Err(CatalogError::InvalidQuantumNumbers {
            name: orbital.name,
            n: orbital.n,
            l: orbital.l,
            m: orbital.m,
        });
    }

    if !(orbital.scale.is_finite() && orbital.scale > 0.0) {
        return Err(CatalogError::InvalidScale {
            name: orbital.name,
            scale: orbital.scale,
        });
    }

    if !orbital.color.iter().all(|c| (0.0..=1.0).contains(c)) {
        return Err(CatalogError::InvalidColor {
            name: orbital.name,
            color: orbital.color,
        });
    }

    if !model.supports(orbital) || model.peak_density(orbital) <= 0.0 {
        return Err(CatalogError::ZeroDensity { name: orbital.name });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_passes_validation() {
        let model = DensityModel::default();
        let catalog = OrbitalCatalog::new(STANDARD_ORBITALS.to_vec(), &model).unwrap();
        assert_eq!(catalog.len(), 4);

        let names: Vec<_> = OrbitalCatalog::standard().iter().map(|o| o.name).collect();
        assert_eq!(names, ["1s", "2px", "2py", "2pz"]);
    }

    #[test]
    fn indexed_access_clamps_with_at() {
        let catalog = OrbitalCatalog::standard();
        assert_eq!(catalog.get(0), Some(&Orbital::ground_state()));
        assert!(catalog.get(4).is_none());
        assert_eq!(catalog.at(9).name, "2pz");
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = OrbitalCatalog::new(Vec::new(), &DensityModel::default()).unwrap_err();
        assert_eq!(err, CatalogError::Empty);
    }

    #[test]
    fn rejects_inconsistent_quantum_numbers() {
        let model = DensityModel::default();
        let bad_l = Orbital::new(1, 1, 0, 1.0, "1p", [1.0, 1.0, 1.0]);
        let bad_m = Orbital::new(2, 1, 2, 1.0, "2p?", [1.0, 1.0, 1.0]);

        for orbital in [bad_l, bad_m] {
            let err = OrbitalCatalog::new(vec![orbital], &model).unwrap_err();
            assert!(matches!(err, CatalogError::InvalidQuantumNumbers { .. }));
        }
    }

    #[test]
    fn rejects_states_without_closed_form() {
        let model = DensityModel::default();
        let three_d = Orbital::new(3, 2, 0, 1.0, "3dz2", [0.2, 0.2, 0.2]);
        let err = OrbitalCatalog::new(vec![Orbital::ground_state(), three_d], &model).unwrap_err();
        assert_eq!(err, CatalogError::ZeroDensity { name: "3dz2" });
        assert!(err.to_string().contains("3dz2"));
    }

    #[test]
    fn rejects_bad_presentation() {
        let model = DensityModel::default();
        let flat = Orbital::new(1, 0, 0, 0.0, "flat", [1.0, 1.0, 1.0]);
        let neon = Orbital::new(1, 0, 0, 1.0, "neon", [1.5, 0.0, 0.0]);

        assert!(matches!(
            OrbitalCatalog::new(vec![flat], &model),
            Err(CatalogError::InvalidScale { .. })
        ));
        assert!(matches!(
            OrbitalCatalog::new(vec![neon], &model),
            Err(CatalogError::InvalidColor { .. })
        ));
    }

    #[test]
    fn presentation_helpers() {
        let pz = &STANDARD_ORBITALS[3];
        assert_eq!(pz.scaled(Vec3::new(1.0, -2.0, 0.5)), Vec3::new(2.0, -4.0, 1.0));
        assert_eq!(pz.rgba(0.5), [1.0, 1.0, 0.0, 0.5]);
        assert_eq!(pz.to_string(), "2pz (n=2, l=1, m=0)");
    }
}
