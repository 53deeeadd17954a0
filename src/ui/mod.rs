use crate::physics::density::HarmonicConvention;
use crate::simulation::session::OrbitalSession;
use crate::simulation::solver::SampleConfig;
use std::ops::RangeInclusive;

pub const SAMPLE_RANGE: RangeInclusive<usize> = 100..=100_000;
pub const RADIUS_RANGE: RangeInclusive<f32> = 0.5..=20.0;
pub const BOUND_RANGE: RangeInclusive<f32> = 1e-4..=10.0;
pub const INTERVAL_RANGE: RangeInclusive<f32> = 0.0..=5.0;
pub const ROTATION_RANGE: RangeInclusive<f32> = 0.0..=0.1;

/// Slider limits for one session. They start from the panel defaults and
/// stretch to cover whatever the session was started with.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelRanges {
    pub samples: RangeInclusive<usize>,
    pub radius: RangeInclusive<f32>,
    pub bound: RangeInclusive<f32>,
    pub interval: RangeInclusive<f32>,
    pub rotation: RangeInclusive<f32>,
}

impl PanelRanges {
    pub fn covering(config: SampleConfig, interval: f32, rotation_speed: f32) -> Self {
        Self {
            samples: widened(SAMPLE_RANGE, config.samples),
            radius: widened(RADIUS_RANGE, config.sampling_radius),
            bound: widened(BOUND_RANGE, config.acceptance_bound),
            interval: widened(INTERVAL_RANGE, interval),
            rotation: widened(ROTATION_RANGE, rotation_speed),
        }
    }
}

/// Extends `range` to include `value`. NaN leaves it unchanged.
fn widened<T: PartialOrd + Copy>(range: RangeInclusive<T>, value: T) -> RangeInclusive<T> {
    let (mut start, mut end) = range.into_inner();
    if value < start {
        start = value;
    }
    if value > end {
        end = value;
    }
    start..=end
}

#[derive(Clone, Debug)]
pub struct UiState {
    pub selected_orbital: usize,
    pub sample_count: usize,
    pub sampling_radius: f32,
    pub acceptance_bound: f32,
    pub tight_bound: bool,
    pub convention: HarmonicConvention,
    pub regeneration_interval: f32,
    pub rotation_speed: f32,
    pub rotation_paused: bool,
    ranges: PanelRanges,
    resample_requested: bool,
}

impl UiState {
    pub fn new(session: &OrbitalSession, rotation_speed: f32) -> Self {
        let config = session.config();
        let interval = session.regeneration_interval();
        Self {
            selected_orbital: session.active_index(),
            sample_count: config.samples,
            sampling_radius: config.sampling_radius,
            acceptance_bound: config.acceptance_bound,
            tight_bound: session.tight_bound(),
            convention: session.model().convention,
            regeneration_interval: interval,
            rotation_speed,
            rotation_paused: false,
            ranges: PanelRanges::covering(config, interval, rotation_speed),
            resample_requested: false,
        }
    }

    pub fn ranges(&self) -> &PanelRanges {
        &self.ranges
    }

    /// Sample config reflecting the panel, keeping `current`'s attempt cap
    /// unless the point count changed.
    pub fn sample_config(&self, current: SampleConfig) -> SampleConfig {
        let base = if current.samples == self.sample_count {
            current
        } else {
            SampleConfig::new(self.sample_count)
        };
        base.with_sampling_radius(self.sampling_radius)
            .with_acceptance_bound(self.acceptance_bound)
    }

    pub fn effective_rotation(&self) -> f32 {
        if self.rotation_paused {
            0.0
        } else {
            self.rotation_speed
        }
    }

    pub fn request_resample(&mut self) {
        self.resample_requested = true;
    }

    pub fn take_resample_request(&mut self) -> bool {
        let requested = self.resample_requested;
        self.resample_requested = false;
        requested
    }

    /// Pulls slider values back into this session's ranges.
    pub fn clamp_values(&mut self) {
        let ranges = &self.ranges;
        self.sample_count = self
            .sample_count
            .clamp(*ranges.samples.start(), *ranges.samples.end());
        self.sampling_radius = clamp_f32(self.sampling_radius, &ranges.radius);
        self.acceptance_bound = clamp_f32(self.acceptance_bound, &ranges.bound);
        self.regeneration_interval = clamp_f32(self.regeneration_interval, &ranges.interval);
        self.rotation_speed = clamp_f32(self.rotation_speed, &ranges.rotation);
    }

    /// Pushes the panel's values into `session`. The session only schedules
    /// a regeneration for values that actually changed.
    pub fn apply_to(&mut self, session: &mut OrbitalSession) {
        self.clamp_values();

        if self.selected_orbital != session.active_index() && !session.select(self.selected_orbital)
        {
            self.selected_orbital = session.active_index();
        }

        session.set_config(self.sample_config(session.config()));
        session.set_tight_bound(self.tight_bound);
        session.set_convention(self.convention);
        session.set_regeneration_interval(self.regeneration_interval);

        if self.take_resample_request() {
            session.request_regeneration();
        }
    }
}

fn clamp_f32(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

pub mod desktop {
    use egui::{ClippedPrimitive, TexturesDelta};
    use egui_wgpu::ScreenDescriptor;
    use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
    use winit::{event::WindowEvent, window::Window};

    /// egui on top of the cloud: winit input in, wgpu draw calls out.
    pub struct UiLayer {
        ctx: egui::Context,
        input: egui_winit::State,
        painter: egui_wgpu::Renderer,
    }

    /// One tessellated panel, ready to paint over the frame it was built for.
    pub struct UiFrame {
        primitives: Vec<ClippedPrimitive>,
        textures: TexturesDelta,
        screen: ScreenDescriptor,
    }

    impl UiLayer {
        pub fn new(window: &Window, device: &Device, surface_format: TextureFormat) -> Self {
            let ctx = egui::Context::default();
            let input = egui_winit::State::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                window,
                Some(window.scale_factor() as f32),
                Some(device.limits().max_texture_dimension_2d as usize),
            );

            Self {
                ctx,
                input,
                painter: egui_wgpu::Renderer::new(device, surface_format, None, 1),
            }
        }

        /// Feeds a window event to egui; true when egui consumed it.
        pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
            let response = self.input.on_window_event(window, event);
            if response.repaint {
                window.request_redraw();
            }
            response.consumed
        }

        pub fn wants_keyboard(&self) -> bool {
            self.ctx.wants_keyboard_input()
        }

        /// Runs `build_ui` against this frame's input and tessellates the result.
        pub fn prepare(&mut self, window: &Window, build_ui: impl FnOnce(&egui::Context)) -> UiFrame {
            let raw_input = self.input.take_egui_input(window);
            let output = self.ctx.run(raw_input, build_ui);
            self.input
                .handle_platform_output(window, output.platform_output);

            let size = window.inner_size();
            UiFrame {
                primitives: self.ctx.tessellate(output.shapes, output.pixels_per_point),
                textures: output.textures_delta,
                screen: ScreenDescriptor {
                    size_in_pixels: [size.width.max(1), size.height.max(1)],
                    pixels_per_point: output.pixels_per_point,
                },
            }
        }

        /// Records `frame` into `encoder`, loading whatever is already in `view`.
        pub fn paint(
            &mut self,
            device: &Device,
            queue: &Queue,
            encoder: &mut CommandEncoder,
            view: &TextureView,
            frame: UiFrame,
        ) {
            self.upload(device, queue, encoder, &frame);

            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("UI Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                self.painter
                    .render(&mut pass, &frame.primitives, &frame.screen);
            }

            for id in &frame.textures.free {
                self.painter.free_texture(id);
            }
        }

        fn upload(
            &mut self,
            device: &Device,
            queue: &Queue,
            encoder: &mut CommandEncoder,
            frame: &UiFrame,
        ) {
            for (id, delta) in &frame.textures.set {
                self.painter.update_texture(device, queue, *id, delta);
            }

            let extra = self.painter.update_buffers(
                device,
                queue,
                encoder,
                &frame.primitives,
                &frame.screen,
            );
            if !extra.is_empty() {
                queue.submit(extra);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::density::DensityModel;
    use crate::physics::orbital::OrbitalCatalog;
    use crate::simulation::solver::MonteCarloSampler;

    fn session() -> OrbitalSession {
        OrbitalSession::new(
            OrbitalCatalog::standard(),
            DensityModel::default(),
            MonteCarloSampler::with_seed(0),
            SampleConfig::new(5_000).with_max_attempts(123),
            0.5,
        )
    }

    #[test]
    fn mirrors_session_on_creation() {
        let state = UiState::new(&session(), 0.01);
        assert_eq!(state.selected_orbital, 0);
        assert_eq!(state.sample_count, 5_000);
        assert_eq!(state.regeneration_interval, 0.5);
        assert_eq!(state.convention, HarmonicConvention::Uniform);
    }

    #[test]
    fn unchanged_panel_keeps_current_config() {
        let session = session();
        let state = UiState::new(&session, 0.01);
        assert_eq!(state.sample_config(session.config()), session.config());
    }

    #[test]
    fn new_count_recomputes_attempt_cap() {
        let session = session();
        let mut state = UiState::new(&session, 0.01);
        state.sample_count = 200;
        state.sampling_radius = 5.0;

        let config = state.sample_config(session.config());
        assert_eq!(config.samples, 200);
        assert_eq!(config.max_attempts, SampleConfig::new(200).max_attempts);
        assert_eq!(config.sampling_radius, 5.0);
    }

    #[test]
    fn resample_request_is_taken_once() {
        let mut state = UiState::new(&session(), 0.01);
        assert!(!state.take_resample_request());
        state.request_resample();
        assert!(state.take_resample_request());
        assert!(!state.take_resample_request());
    }

    #[test]
    fn clamp_values_restores_ranges() {
        let mut state = UiState::new(&session(), 0.01);
        state.sample_count = 1;
        state.sampling_radius = f32::NAN;
        state.acceptance_bound = 0.0;
        state.rotation_speed = 4.0;
        state.clamp_values();

        assert_eq!(state.sample_count, 100);
        assert_eq!(state.sampling_radius, 0.5);
        assert_eq!(state.acceptance_bound, 1e-4);
        assert_eq!(state.rotation_speed, 0.1);
    }

    #[test]
    fn startup_values_outside_panel_ranges_survive() {
        let vars = [
            (crate::config::POINTS_VAR, "50"),
            (crate::config::RADIUS_VAR, "30"),
            (crate::config::BOUND_VAR, "50"),
            (crate::config::INTERVAL_VAR, "10"),
        ];
        let config = crate::config::ViewerConfig::default().with_overrides(|key: &str| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        });

        let mut session = OrbitalSession::new(
            OrbitalCatalog::standard(),
            DensityModel::default(),
            MonteCarloSampler::with_seed(1),
            config.sample,
            config.regeneration_interval,
        );
        let mut state = UiState::new(&session, config.rotation_speed);
        state.apply_to(&mut session);

        let applied = session.config();
        assert_eq!(applied.samples, 50);
        assert_eq!(applied.sampling_radius, 30.0);
        assert_eq!(applied.acceptance_bound, 50.0);
        assert_eq!(applied.max_attempts, config.sample.max_attempts);
        assert_eq!(session.regeneration_interval(), 10.0);
    }

    #[test]
    fn ranges_stretch_only_as_far_as_needed() {
        let config = SampleConfig::new(50).with_sampling_radius(2.0);
        let ranges = PanelRanges::covering(config, 10.0, f32::NAN);
        assert_eq!(ranges.samples, 50..=100_000);
        assert_eq!(ranges.radius, RADIUS_RANGE);
        assert_eq!(ranges.interval, 0.0..=10.0);
        assert_eq!(ranges.rotation, ROTATION_RANGE);
    }

    #[test]
    fn apply_forwards_panel_edits() {
        let mut session = session();
        let mut state = UiState::new(&session, 0.01);
        session.tick(0.0);

        state.selected_orbital = 2;
        state.sample_count = 1;
        state.tight_bound = true;
        state.request_resample();
        state.apply_to(&mut session);

        assert_eq!(session.active_index(), 2);
        assert_eq!(session.config().samples, 100);
        assert!(session.tight_bound());
        assert!(session.tick(0.1));

        state.selected_orbital = 9;
        state.apply_to(&mut session);
        assert_eq!(state.selected_orbital, 2);
    }

    #[test]
    fn paused_rotation_is_zero() {
        let mut state = UiState::new(&session(), 0.02);
        assert_eq!(state.effective_rotation(), 0.02);
        state.rotation_paused = true;
        assert_eq!(state.effective_rotation(), 0.0);
    }
}
