/// -------- grid & chunks --------
pub const CHUNK_SIZE: usize = 16;
pub const TILE_PX: u32 = 16;

/// -------- reporting --------
pub const MAX_REPORTS: usize = 64;

/// -------- island mask --------
pub const ISLAND_THRESHOLD: f32 = 0.35;
pub const ISLAND_NOISE_FREQ: f64 = 0.01;
pub const ISLAND_NOISE_MIX: f32 = 0.7;
pub const DEEP_WATER_DEPTH: f32 = 0.25;

/// -------- surface bands --------
pub const MAIN_NOISE_FREQ: f64 = 0.04;
pub const MAIN_NOISE2_FREQ: f64 = 0.1;
pub const MAIN_NOISE3_FREQ: f64 = 0.02;
pub const LAKE_START: f32 = 0.3;
pub const LAKE_THRESHOLD: f32 = 0.2;
pub const SAND_THRESHOLD: f32 = 0.2;
pub const LAKE_MAX_NOISE2: f32 = 0.25;

/// -------- caves --------
pub const CAVE_NOISE_FREQ: f64 = 0.04;
pub const CAVE_NOISE_THRESHOLD: f32 = 0.65;
pub const CAVE_WALL_THICKNESS: f32 = 0.12;

/// -------- decoration (value band + 1‑in‑N roll) --------
pub const FLOWER_BAND: (f32, f32) = (0.4, 0.6);
pub const FLOWER_ONE_IN: u32 = 3;
pub const PEBBLE_BAND: (f32, f32) = (0.6, 0.8);
pub const PEBBLE_ONE_IN: u32 = 6;
pub const ROCK_BAND: (f32, f32) = (0.5, 0.55);
pub const ROCK_ONE_IN: u32 = 10;

/// -------- animation --------
pub const DEEP_WATER_FRAMES: u32 = 4;
pub const DEEP_WATER_FPS: f32 = 4.0;

/// -------- demo camera --------
pub const CAMERA_PAN_SPEED: f32 = 600.0;
pub const CAMERA_ZOOM_SPEED: f32 = 1.5;
pub const DEMO_CHUNKS_X: usize = 16;
pub const DEMO_CHUNKS_Y: usize = 16;
