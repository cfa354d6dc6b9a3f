//! tile_isle – chunked 2‑D tilemap with cached chunk artifacts, layered
//! procedural island generation and a Bevy front end

pub mod atlas;
pub mod constants;
pub mod error;
pub mod hash;
pub mod noise_field;
pub mod plugin;
pub mod render;
pub mod surface;
pub mod tile;
pub mod tilemap;
pub mod world;
pub mod world_gen;

pub use atlas::{Atlas, Rotation};
pub use error::{Severity, TilemapError};
pub use plugin::TilemapPlugin;
pub use render::{CameraView, DrawList, DrawTarget, RenderDiagnostics};
pub use surface::{Rgba, RgbaSurface, Surface};
pub use tile::{terrain_tileset, ItemId, TerrainTiles, TileDef, TileId, TileRegistry, Tool};
pub use tilemap::{Chunk, Tilemap};
pub use world::{Layer, TileWorld};
pub use world_gen::{WorldGen, WorldGenConfig};
