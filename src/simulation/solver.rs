use crate::constants::{ACCEPTANCE_BOUND, ATTEMPTS_PER_POINT, NUM_POINTS, SAMPLING_RADIUS};
use crate::physics::density::DensityModel;
use crate::physics::orbital::Orbital;
use crate::physics::spherical::SphericalPoint;
use glam::Vec3;
use log::warn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

const MIN_SAMPLING_RADIUS: f32 = 1e-3;
const MIN_ACCEPTANCE_BOUND: f32 = f32::MIN_POSITIVE;
/// Upper limit on the point buffer reserved before a run starts.
const MAX_RESERVED_POINTS: usize = 1 << 20;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Number of accepted points a run tries to collect.
    pub samples: usize,
    /// Candidates are drawn with r in [0, sampling_radius].
    pub sampling_radius: f32,
    /// Candidates are accepted with probability density / acceptance_bound.
    pub acceptance_bound: f32,
    /// Hard limit on candidate draws per run.
    pub max_attempts: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self::new(NUM_POINTS)
    }
}

impl SampleConfig {
    pub const fn new(samples: usize) -> Self {
        Self {
            samples,
            sampling_radius: SAMPLING_RADIUS,
            acceptance_bound: ACCEPTANCE_BOUND,
            max_attempts: (samples as u64).saturating_mul(ATTEMPTS_PER_POINT),
        }
    }

    pub const fn with_sampling_radius(mut self, sampling_radius: f32) -> Self {
        self.sampling_radius = sampling_radius;
        self
    }

    pub const fn with_acceptance_bound(mut self, acceptance_bound: f32) -> Self {
        self.acceptance_bound = acceptance_bound;
        self
    }

    pub const fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Uses the orbital's analytic peak density as the acceptance bound.
    pub fn with_tight_bound(self, model: &DensityModel, orbital: &Orbital) -> Self {
        let peak = model.peak_density(orbital);
        if peak > 0.0 {
            self.with_acceptance_bound(peak)
        } else {
            self
        }
    }

    /// Replaces values the uniform distributions cannot be built from.
    pub fn sanitized(self) -> Self {
        let sampling_radius = if self.sampling_radius.is_finite() {
            self.sampling_radius.max(MIN_SAMPLING_RADIUS)
        } else {
            SAMPLING_RADIUS
        };
        let acceptance_bound = if self.acceptance_bound.is_finite() {
            self.acceptance_bound.max(MIN_ACCEPTANCE_BOUND)
        } else {
            ACCEPTANCE_BOUND
        };

        Self {
            samples: self.samples,
            sampling_radius,
            acceptance_bound,
            max_attempts: self.max_attempts,
        }
    }
}

/// Where a rejection run stands after one candidate draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerState {
    /// The last candidate was rejected.
    Sampling,
    /// The last candidate was accepted; carries the number of points so far.
    Accepted(usize),
    /// The target count was reached.
    Done,
    /// The attempt cap was reached first.
    CapHit,
}

impl SamplerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SamplerState::Done | SamplerState::CapHit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SampleStatus {
    Complete,
    /// Fewer than the requested points; the attempt cap ended the run.
    Partial,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SampleReport {
    pub status: SampleStatus,
    pub target: usize,
    pub accepted: usize,
    pub attempts: u64,
    /// Candidates whose density exceeded the acceptance bound.
    pub saturated: u64,
    /// Largest density / bound ratio seen during the run.
    pub peak_ratio: f32,
}

impl SampleReport {
    pub fn is_complete(&self) -> bool {
        self.status == SampleStatus::Complete
    }

    pub fn acceptance_rate(&self) -> f32 {
        if self.attempts == 0 {
            0.0
        } else {
            self.accepted as f32 / self.attempts as f32
        }
    }
}

#[derive(Clone, Debug)]
pub struct CloudSample {
    pub points: Vec<Vec3>,
    pub report: SampleReport,
}

/// Uniform draws for one candidate: r, theta, phi and the acceptance variate.
#[derive(Clone, Debug)]
struct CandidateDistribution {
    radius: Uniform<f32>,
    polar: Uniform<f32>,
    azimuth: Uniform<f32>,
    acceptance: Uniform<f32>,
}

impl CandidateDistribution {
    fn new(sampling_radius: f32) -> Self {
        Self {
            radius: Uniform::new_inclusive(0.0, sampling_radius),
            polar: Uniform::new_inclusive(0.0, PI),
            azimuth: Uniform::new(0.0, TAU),
            acceptance: Uniform::new(0.0, 1.0),
        }
    }

    fn candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> SphericalPoint {
        SphericalPoint::new(
            self.radius.sample(rng),
            self.polar.sample(rng),
            self.azimuth.sample(rng),
        )
    }
}

/// One rejection-sampling run, advanced a candidate at a time.
pub struct RejectionRun<'a> {
    model: &'a DensityModel,
    orbital: &'a Orbital,
    time: f32,
    config: SampleConfig,
    distribution: CandidateDistribution,
    points: Vec<Vec3>,
    attempts: u64,
    saturated: u64,
    peak_ratio: f32,
    state: SamplerState,
}

impl<'a> RejectionRun<'a> {
    pub fn new(
        model: &'a DensityModel,
        orbital: &'a Orbital,
        time: f32,
        config: SampleConfig,
    ) -> Self {
        let config = config.sanitized();
        let state = if config.samples == 0 {
            SamplerState::Done
        } else if config.max_attempts == 0 {
            SamplerState::CapHit
        } else {
            SamplerState::Sampling
        };

        Self {
            model,
            orbital,
            time,
            config,
            distribution: CandidateDistribution::new(config.sampling_radius),
            points: Vec::with_capacity(reserved_points(&config)),
            attempts: 0,
            saturated: 0,
            peak_ratio: 0.0,
            state,
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Draws and tests a single candidate. Terminal states are sticky.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SamplerState {
        if self.state.is_terminal() {
            return self.state;
        }

        self.attempts += 1;
        let candidate = self.distribution.candidate(rng);
        let density = self.model.probability_density(
            self.orbital,
            candidate.r,
            candidate.theta,
            candidate.phi,
            self.time,
        );
        let ratio = density / self.config.acceptance_bound;
        if ratio > 1.0 {
            self.saturated += 1;
        }
        self.peak_ratio = self.peak_ratio.max(ratio);

        self.state = if self.distribution.acceptance.sample(rng) < ratio {
            self.points.push(candidate.to_cartesian());
            SamplerState::Accepted(self.points.len())
        } else {
            SamplerState::Sampling
        };

        if self.points.len() >= self.config.samples {
            self.state = SamplerState::Done;
        } else if self.attempts >= self.config.max_attempts {
            self.state = SamplerState::CapHit;
        }

        self.state
    }

    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> CloudSample {
        while !self.step(rng).is_terminal() {}
        self.finish()
    }

    pub fn finish(self) -> CloudSample {
        let status = match self.state {
            SamplerState::Done => SampleStatus::Complete,
            _ => SampleStatus::Partial,
        };

        let report = SampleReport {
            status,
            target: self.config.samples,
            accepted: self.points.len(),
            attempts: self.attempts,
            saturated: self.saturated,
            peak_ratio: self.peak_ratio,
        };

        CloudSample {
            points: self.points,
            report,
        }
    }
}

/// A run can never accept more points than it has attempts.
fn reserved_points(config: &SampleConfig) -> usize {
    let attempts = usize::try_from(config.max_attempts).unwrap_or(usize::MAX);
    config.samples.min(attempts).min(MAX_RESERVED_POINTS)
}

/// Rejection-samples `config.samples` points from the orbital's density at
/// `time`, drawing every random number from `rng`.
pub fn generate_points<R: Rng + ?Sized>(
    rng: &mut R,
    model: &DensityModel,
    orbital: &Orbital,
    time: f32,
    config: SampleConfig,
) -> CloudSample {
    let sample = RejectionRun::new(model, orbital, time, config).run(rng);
    let report = &sample.report;

    if !report.is_complete() {
        warn!(
            "Rejection sampling accepted {} / {} points for {} after {} attempts; returning partial cloud",
            report.accepted, report.target, orbital.name, report.attempts
        );
    }
    if report.saturated > 0 {
        warn!(
            "{} candidates for {} exceeded the acceptance bound {} (peak ratio {:.2}); dense region is under-sampled",
            report.saturated, orbital.name, config.acceptance_bound, report.peak_ratio
        );
    }

    sample
}

pub struct MonteCarloSampler {
    rng: ChaCha8Rng,
}

impl Default for MonteCarloSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MonteCarloSampler {
    /// Sampler seeded from OS entropy; successive runs are not reproducible.
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn sample_orbital(
        &mut self,
        model: &DensityModel,
        orbital: &Orbital,
        time: f32,
        config: SampleConfig,
    ) -> CloudSample {
        generate_points(&mut self.rng, model, orbital, time, config)
    }
}
