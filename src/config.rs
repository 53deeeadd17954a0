use crate::constants::*;
use crate::physics::density::HarmonicConvention;
use crate::simulation::solver::SampleConfig;
use log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const SEED_VAR: &str = "ORBITAL_SEED";
pub const POINTS_VAR: &str = "ORBITAL_POINTS";
pub const BOUND_VAR: &str = "ORBITAL_BOUND";
pub const RADIUS_VAR: &str = "ORBITAL_RADIUS";
pub const INTERVAL_VAR: &str = "ORBITAL_INTERVAL";
pub const CONVENTION_VAR: &str = "ORBITAL_CONVENTION";

/// Startup settings for the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub sample: SampleConfig,
    pub tight_bound: bool,
    pub convention: HarmonicConvention,
    pub regeneration_interval: f32,
    pub rotation_speed: f32,
    pub camera_distance: f32,
    /// Fixed sampler seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            sample: SampleConfig::default(),
            tight_bound: false,
            convention: HarmonicConvention::default(),
            regeneration_interval: REGENERATION_INTERVAL,
            rotation_speed: ROTATION_SPEED,
            camera_distance: CAMERA_DISTANCE,
            seed: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `ORBITAL_*` overrides looked up through `lookup`. Values that
    /// fail to parse are logged and skipped.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = parse_override::<u64>(SEED_VAR, lookup(SEED_VAR)) {
            self.seed = Some(seed);
        }

        if let Some(points) = parse_override::<usize>(POINTS_VAR, lookup(POINTS_VAR)) {
            self.sample = SampleConfig::new(points)
                .with_sampling_radius(self.sample.sampling_radius)
                .with_acceptance_bound(self.sample.acceptance_bound);
        }

        match lookup(RADIUS_VAR) {
            Some(raw) if raw.trim().eq_ignore_ascii_case("single") => {
                self.sample = self.sample.with_sampling_radius(SINGLE_ORBITAL_SAMPLING_RADIUS);
            }
            raw => {
                if let Some(radius) = parse_override::<f32>(RADIUS_VAR, raw) {
                    self.sample = self.sample.with_sampling_radius(radius);
                }
            }
        }

        match lookup(BOUND_VAR) {
            Some(raw) if raw.trim().eq_ignore_ascii_case("tight") => self.tight_bound = true,
            raw => {
                if let Some(bound) = parse_override::<f32>(BOUND_VAR, raw) {
                    self.sample = self.sample.with_acceptance_bound(bound);
                    self.tight_bound = false;
                }
            }
        }

        if let Some(interval) = parse_override::<f32>(INTERVAL_VAR, lookup(INTERVAL_VAR)) {
            self.regeneration_interval = interval;
        }

        let convention = lookup(CONVENTION_VAR);
        if let Some(convention) = parse_override::<HarmonicConvention>(CONVENTION_VAR, convention) {
            self.convention = convention;
        }

        self.sample = self.sample.sanitized();
        self
    }
}

fn parse_override<T: FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}
