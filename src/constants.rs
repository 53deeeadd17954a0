// Model units
pub const BOHR_RADIUS: f32 = 1.0; // a0
pub const VIBRATION_FREQ: f32 = 0.1; // rad/s
pub const VIBRATION_AMPLITUDE: f32 = 0.1;

// Sampling
pub const NUM_POINTS: usize = 10_000;
pub const SAMPLING_RADIUS: f32 = 8.0 * BOHR_RADIUS;
pub const SINGLE_ORBITAL_SAMPLING_RADIUS: f32 = 5.0 * BOHR_RADIUS;
pub const ACCEPTANCE_BOUND: f32 = 1.0;
pub const ATTEMPTS_PER_POINT: u64 = 5_000;

// Viewer
pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;
pub const REGENERATION_INTERVAL: f32 = 0.5; // seconds
pub const ROTATION_SPEED: f32 = 0.01; // radians per frame
pub const CAMERA_DISTANCE: f32 = 10.0;
pub const POINT_ALPHA: f32 = 0.5;
