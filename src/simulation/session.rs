use crate::physics::density::{DensityModel, HarmonicConvention};
use crate::physics::orbital::{Orbital, OrbitalCatalog};
use crate::simulation::schedule::RegenerationSchedule;
use crate::simulation::solver::{MonteCarloSampler, SampleConfig, SampleReport};
use glam::Vec3;
use log::{debug, info};
use std::time::Instant;

/// Everything the render loop knows about the cloud, minus the GPU.
///
/// The cached points are replaced as a whole on every regeneration and are
/// only ever read between regenerations.
pub struct OrbitalSession {
    catalog: OrbitalCatalog,
    model: DensityModel,
    sampler: MonteCarloSampler,
    config: SampleConfig,
    tight_bound: bool,
    schedule: RegenerationSchedule,
    active: usize,
    points: Vec<Vec3>,
    report: Option<SampleReport>,
    generation: u64,
}

impl OrbitalSession {
    pub fn new(
        catalog: OrbitalCatalog,
        model: DensityModel,
        sampler: MonteCarloSampler,
        config: SampleConfig,
        regeneration_interval: f32,
    ) -> Self {
        Self {
            catalog,
            model,
            sampler,
            config,
            tight_bound: false,
            schedule: RegenerationSchedule::new(regeneration_interval),
            active: 0,
            points: Vec::new(),
            report: None,
            generation: 0,
        }
    }

    pub fn catalog(&self) -> &OrbitalCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &DensityModel {
        &self.model
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_orbital(&self) -> &Orbital {
        self.catalog.at(self.active)
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn report(&self) -> Option<&SampleReport> {
        self.report.as_ref()
    }

    /// Number of regenerations so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> SampleConfig {
        self.config
    }

    pub fn tight_bound(&self) -> bool {
        self.tight_bound
    }

    pub fn regeneration_interval(&self) -> f32 {
        self.schedule.interval()
    }

    /// Config actually handed to the sampler for the active orbital.
    pub fn effective_config(&self) -> SampleConfig {
        if self.tight_bound {
            self.config.with_tight_bound(&self.model, self.active_orbital())
        } else {
            self.config
        }
    }

    /// Switches to catalog entry `index` and schedules a fresh cloud, even
    /// when it is already active. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.catalog.len() {
            return false;
        }

        self.active = index;
        self.schedule.force();
        info!("Switched to orbital: {}", self.active_orbital().name);
        true
    }

    pub fn set_config(&mut self, config: SampleConfig) {
        if config != self.config {
            self.config = config;
            self.schedule.force();
        }
    }

    pub fn set_tight_bound(&mut self, tight_bound: bool) {
        if tight_bound != self.tight_bound {
            self.tight_bound = tight_bound;
            self.schedule.force();
        }
    }

    pub fn set_convention(&mut self, convention: HarmonicConvention) {
        if convention != self.model.convention {
            self.model.convention = convention;
            self.schedule.force();
        }
    }

    pub fn set_regeneration_interval(&mut self, interval: f32) {
        self.schedule.set_interval(interval);
    }

    pub fn request_regeneration(&mut self) {
        self.schedule.force();
    }

    /// Regenerates the cloud if the schedule allows it at `now` (seconds).
    pub fn tick(&mut self, now: f32) -> bool {
        if self.schedule.poll(now) {
            self.regenerate(now);
            true
        } else {
            false
        }
    }

    pub fn regenerate(&mut self, time: f32) {
        let config = self.effective_config();
        let orbital = self.catalog.at(self.active);
        let started = Instant::now();

        let sample = self
            .sampler
            .sample_orbital(&self.model, orbital, time, config);

        debug!(
            "Regenerated {} at t={:.2}s: {} / {} points, {} attempts ({:.3}% accepted) in {:.1?}",
            orbital.name,
            time,
            sample.report.accepted,
            sample.report.target,
            sample.report.attempts,
            sample.report.acceptance_rate() * 100.0,
            started.elapsed()
        );

        self.points = sample.points;
        self.report = Some(sample.report);
        self.generation += 1;
    }
}
