use crate::config::ViewerConfig;
use crate::constants::{POINT_ALPHA, SAMPLING_RADIUS, SINGLE_ORBITAL_SAMPLING_RADIUS};
use crate::physics::density::{DensityModel, HarmonicConvention};
use crate::physics::orbital::{OrbitalCatalog, STANDARD_ORBITALS};
use crate::renderer::cloud::CloudVertex;
use crate::renderer::renderer::Renderer;
use crate::simulation::session::OrbitalSession;
use crate::simulation::solver::{MonteCarloSampler, SampleReport, SampleStatus};
use crate::ui::desktop::{UiFrame, UiLayer};
use crate::ui::UiState;
use log::info;
use std::sync::Arc;
use std::time::Instant;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

pub type AppError = Box<dyn std::error::Error + Send + Sync>;
pub type AppResult<T> = Result<T, AppError>;

pub struct App {
    renderer: Renderer,
    session: OrbitalSession,
    ui_state: UiState,
    ui_layer: UiLayer,
    clock: Instant,
    uploaded_generation: u64,
}

impl App {
    pub async fn initialize(window: Arc<Window>, config: ViewerConfig) -> AppResult<Self> {
        let renderer = Renderer::new(window.clone(), config.camera_distance).await?;

        let model = DensityModel::with_convention(config.convention);
        let catalog = OrbitalCatalog::new(STANDARD_ORBITALS.to_vec(), &model)?;
        let sampler = match config.seed {
            Some(seed) => {
                info!("Sampling with fixed seed {seed}");
                MonteCarloSampler::with_seed(seed)
            }
            None => MonteCarloSampler::new(),
        };

        let mut session = OrbitalSession::new(
            catalog,
            model,
            sampler,
            config.sample,
            config.regeneration_interval,
        );
        session.set_tight_bound(config.tight_bound);

        let ui_state = UiState::new(&session, config.rotation_speed);
        let ui_layer = UiLayer::new(&window, renderer.device(), renderer.surface_config().format);

        Ok(Self {
            renderer,
            session,
            ui_state,
            ui_layer,
            clock: Instant::now(),
            uploaded_generation: 0,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.renderer.resize(new_size);
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.renderer.size()
    }

    /// Returns true when egui consumed the event.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.ui_layer.handle_event(window, event)
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat || self.ui_layer.wants_keyboard()
        {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };

        if let Some(index) = orbital_shortcut(code) {
            if self.session.select(index) {
                self.ui_state.selected_orbital = index;
            }
            return;
        }

        match code {
            KeyCode::KeyR => self.ui_state.request_resample(),
            KeyCode::Space => self.ui_state.rotation_paused = !self.ui_state.rotation_paused,
            _ => {}
        }
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let ui_frame: UiFrame = {
            let (ui_layer, ui_state, session) =
                (&mut self.ui_layer, &mut self.ui_state, &self.session);
            ui_layer.prepare(window, |ctx| Self::build_ui(ctx, ui_state, session))
        };

        self.apply_ui_changes();

        let now = self.clock.elapsed().as_secs_f32();
        self.session.tick(now);
        self.upload_cloud();

        let orbital = self.session.active_orbital();
        let (color, scale) = (orbital.rgba(POINT_ALPHA), orbital.scale);
        self.renderer.set_appearance(color, scale);
        self.renderer
            .camera_mut()
            .advance(self.ui_state.effective_rotation());

        let mut pending_frame = Some(ui_frame);
        let (renderer, ui_layer) = (&mut self.renderer, &mut self.ui_layer);
        renderer.render_with_ui(|device, queue, encoder, view| {
            if let Some(frame) = pending_frame.take() {
                ui_layer.paint(device, queue, encoder, view, frame);
            }
        })
    }

    fn upload_cloud(&mut self) {
        if self.session.generation() == self.uploaded_generation {
            return;
        }

        let vertices: Vec<CloudVertex> = self
            .session
            .points()
            .iter()
            .copied()
            .map(CloudVertex::new)
            .collect();
        self.renderer.update_cloud(&vertices);
        self.uploaded_generation = self.session.generation();
    }

    fn apply_ui_changes(&mut self) {
        self.ui_state.apply_to(&mut self.session);
    }

    fn build_ui(ctx: &egui::Context, ui_state: &mut UiState, session: &OrbitalSession) {
        use egui::{Color32, RichText, Slider};

        egui::Window::new("Orbital Controls")
            .default_width(260.0)
            .resizable(false)
            .show(ctx, |ui| {
                let ranges = ui_state.ranges().clone();

                ui.horizontal_wrapped(|ui| {
                    for (index, orbital) in session.catalog().iter().enumerate() {
                        let [r, g, b] = orbital.color;
                        let swatch = Color32::from_rgb(
                            (r * 255.0) as u8,
                            (g * 255.0) as u8,
                            (b * 255.0) as u8,
                        );
                        let label = RichText::new(format!("{} {}", index + 1, orbital.name))
                            .color(swatch);
                        if ui
                            .selectable_label(ui_state.selected_orbital == index, label)
                            .clicked()
                        {
                            ui_state.selected_orbital = index;
                        }
                    }
                });

                ui.separator();

                ui.add(
                    Slider::new(&mut ui_state.sample_count, ranges.samples)
                        .logarithmic(true)
                        .text("Points"),
                );
                ui.add(
                    Slider::new(&mut ui_state.sampling_radius, ranges.radius)
                        .text("Sampling radius (a0)"),
                );
                ui.horizontal(|ui| {
                    ui.label("Radius preset");
                    for (label, radius) in [
                        ("single (5)", SINGLE_ORBITAL_SAMPLING_RADIUS),
                        ("multi (8)", SAMPLING_RADIUS),
                    ] {
                        if ui.button(label).clicked() {
                            ui_state.sampling_radius = radius;
                        }
                    }
                });

                ui.checkbox(&mut ui_state.tight_bound, "Use peak density as bound");
                ui.add_enabled(
                    !ui_state.tight_bound,
                    Slider::new(&mut ui_state.acceptance_bound, ranges.bound)
                        .logarithmic(true)
                        .text("Acceptance bound"),
                );

                ui.horizontal(|ui| {
                    ui.label("p normalization");
                    for convention in [HarmonicConvention::Uniform, HarmonicConvention::Split] {
                        ui.radio_value(&mut ui_state.convention, convention, convention.label());
                    }
                });

                ui.separator();

                ui.add(
                    Slider::new(&mut ui_state.regeneration_interval, ranges.interval)
                        .text("Regenerate every (s)"),
                );
                ui.add(
                    Slider::new(&mut ui_state.rotation_speed, ranges.rotation)
                        .text("Rotation (rad/frame)"),
                );
                ui.horizontal(|ui| {
                    ui.checkbox(&mut ui_state.rotation_paused, "Pause rotation");
                    if ui.button("Resample").clicked() {
                        ui_state.request_resample();
                    }
                });

                ui.separator();

                match session.report() {
                    Some(report) => show_report(ui, report),
                    None => {
                        ui.label("Waiting for first sample...");
                    }
                }
            });
    }
}

fn show_report(ui: &mut egui::Ui, report: &SampleReport) {
    let status = match report.status {
        SampleStatus::Complete => "complete",
        SampleStatus::Partial => "partial (attempt cap)",
    };
    ui.label(format!(
        "{} / {} points, {status}",
        report.accepted, report.target
    ));
    ui.label(format!(
        "{} attempts, {:.3}% accepted",
        report.attempts,
        report.acceptance_rate() * 100.0
    ));

    if !report.is_complete() {
        ui.colored_label(
            egui::Color32::LIGHT_RED,
            "Sampling stopped early; cloud is incomplete",
        );
    }
    if report.saturated > 0 {
        ui.colored_label(
            egui::Color32::YELLOW,
            format!(
                "{} candidates above bound (peak x{:.2})",
                report.saturated, report.peak_ratio
            ),
        );
    }
}

/// Keys 1-4 (top row or keypad) map to catalog entries 0-3.
pub fn orbital_shortcut(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Digit1 | KeyCode::Numpad1 => Some(0),
        KeyCode::Digit2 | KeyCode::Numpad2 => Some(1),
        KeyCode::Digit3 | KeyCode::Numpad3 => Some(2),
        KeyCode::Digit4 | KeyCode::Numpad4 => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keys_select_catalog_entries() {
        assert_eq!(orbital_shortcut(KeyCode::Digit1), Some(0));
        assert_eq!(orbital_shortcut(KeyCode::Numpad4), Some(3));
        assert_eq!(orbital_shortcut(KeyCode::Digit5), None);
        assert_eq!(orbital_shortcut(KeyCode::KeyR), None);
    }

    #[test]
    fn shortcuts_cover_standard_catalog() {
        let catalog = OrbitalCatalog::standard();
        let codes = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
        for code in codes {
            let index = orbital_shortcut(code).unwrap();
            assert!(catalog.get(index).is_some());
        }
    }
}
