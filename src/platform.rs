use crate::app::{App, AppResult};
use crate::config::ViewerConfig;
use log::{error, info};
use pollster::block_on;
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

pub const WINDOW_TITLE: &str = "Hydrogen Orbital Viewer";

/// Opens the viewer window and runs the event loop until it is closed.
pub fn start() -> AppResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("orbital_cloud=info"))
        .init();

    let config = ViewerConfig::from_env();
    info!(
        "Starting viewer: {} points, radius {} a0, {} normalization",
        config.sample.samples,
        config.sample.sampling_radius,
        config.convention.label()
    );

    let event_loop = EventLoop::new().map_err(|e| e.to_string())?;
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(config.window_width, config.window_height))
        .build(&event_loop)
        .map_err(|e| e.to_string())?;
    let window = Arc::new(window);

    let mut app = block_on(App::initialize(window.clone(), config))?;

    event_loop
        .run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    let consumed = app.handle_event(&window, &event);

                    match event {
                        WindowEvent::CloseRequested => target.exit(),
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                                    state: ElementState::Pressed,
                                    ..
                                },
                            ..
                        } => target.exit(),
                        WindowEvent::KeyboardInput { event, .. } if !consumed => {
                            app.handle_key(&event);
                        }
                        WindowEvent::Resized(new_size) => app.resize(new_size),
                        WindowEvent::RedrawRequested => match app.render(&window) {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                app.resize(app.size());
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("Surface out of memory, exiting");
                                target.exit();
                            }
                            Err(e) => error!("Render error: {e:?}"),
                        },
                        _ => {}
                    }
                }
                Event::AboutToWait => window.request_redraw(),
                _ => {}
            }
        })
        .map_err(|e| e.to_string())?;

    Ok(())
}
