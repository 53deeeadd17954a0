pub mod camera;
pub mod cloud;
#[allow(clippy::module_inception)]
pub mod renderer;
