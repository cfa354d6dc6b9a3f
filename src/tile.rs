//! tile templates, the tile arena and the built‑in terrain set
//!
//! Grid cells never own a [`TileDef`]; they hold a [`TileId`] into a shared
//! [`TileRegistry`]. Definitions are immutable once registered.

use crate::atlas::Atlas;
use crate::constants::{DEEP_WATER_FPS, DEEP_WATER_FRAMES, TILE_PX};
use crate::surface::{Rgba, RgbaSurface};

/* ===========================================================
   ids
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u16);

impl TileId {
    pub const EMPTY: TileId = TileId(u16::MAX);

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl Default for TileId {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// item handed out when a tile is destroyed (items live outside the core)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(pub u16);

pub mod items {
    use super::ItemId;

    pub const STONE: ItemId = ItemId(0);
    pub const PEBBLE: ItemId = ItemId(1);
    pub const FLOWER: ItemId = ItemId(2);
    pub const SAND: ItemId = ItemId(3);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    None,
    Pickaxe,
    Axe,
    Shovel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropEntry {
    pub item: ItemId,
    pub min: u32,
    pub max: u32,
}

/* ===========================================================
   definition
   =========================================================== */
#[derive(Clone, Debug, PartialEq)]
pub struct TileDef {
    pub name: &'static str,
    pub is_solid: bool,
    pub has_border: bool,
    pub atlas_index: u32,
    pub random_rotation: bool,

    /// frames are stored left‑to‑right in the atlas starting at `atlas_index`
    pub animated: bool,
    pub frame_count: u32,
    pub frames_per_second: f32,

    pub strength: u32,
    pub minimum_tool_strength: u32,
    pub required_tool: Tool,
    pub can_be_punched: bool,
    pub drops: Vec<DropEntry>,
}

impl TileDef {
    pub fn new(name: &'static str, atlas_index: u32) -> Self {
        Self {
            name,
            is_solid: false,
            has_border: false,
            atlas_index,
            random_rotation: false,
            animated: false,
            frame_count: 1,
            frames_per_second: 0.0,
            strength: 0,
            minimum_tool_strength: 0,
            required_tool: Tool::None,
            can_be_punched: false,
            drops: Vec::new(),
        }
    }

    pub fn solid(mut self) -> Self {
        self.is_solid = true;
        self
    }

    pub fn bordered(mut self) -> Self {
        self.has_border = true;
        self
    }

    pub fn rotated(mut self) -> Self {
        self.random_rotation = true;
        self
    }

    pub fn animated(mut self, frames: u32, fps: f32) -> Self {
        self.animated = true;
        self.frame_count = frames.max(1);
        self.frames_per_second = fps;
        self
    }

    pub fn breakable(mut self, strength: u32, tool: Tool, min_strength: u32) -> Self {
        self.strength = strength;
        self.required_tool = tool;
        self.minimum_tool_strength = min_strength;
        self
    }

    pub fn punchable(mut self) -> Self {
        self.can_be_punched = true;
        self
    }

    pub fn drops(mut self, item: ItemId, min: u32, max: u32) -> Self {
        self.drops.push(DropEntry { item, min, max: max.max(min) });
        self
    }

    /// animation frame shown at `elapsed` seconds
    #[inline]
    pub fn frame_at(&self, elapsed: f32) -> u32 {
        if !self.animated || self.frame_count <= 1 {
            return 0;
        }
        let ticks = (elapsed.max(0.0) * self.frames_per_second).floor() as u64;
        (ticks % self.frame_count as u64) as u32
    }
}

/* ===========================================================
   arena
   =========================================================== */
#[derive(Debug, Default)]
pub struct TileRegistry {
    defs: Vec<TileDef>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: TileDef) -> TileId {
        let id = TileId(self.defs.len() as u16);
        debug_assert!(id != TileId::EMPTY, "tile registry is full");
        self.defs.push(def);
        id
    }

    #[inline]
    pub fn get(&self, id: TileId) -> Option<&TileDef> {
        if id.is_empty() {
            return None;
        }
        self.defs.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &TileDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, d)| (TileId(i as u16), d))
    }
}

/* ===========================================================
   built‑in terrain set
   =========================================================== */
pub const TERRAIN_ATLAS_COLUMNS: u32 = 8;
pub const TERRAIN_ATLAS_ROWS: u32 = 2;

#[derive(Clone, Copy, Debug)]
pub struct TerrainTiles {
    pub grass: TileId,
    pub flowery_grass: TileId,
    pub sand: TileId,
    pub water: TileId,
    pub deep_water: TileId,
    pub stone_floor: TileId,
    pub stone_wall: TileId,
    pub pebbles: TileId,
    pub rock: TileId,
}

impl TerrainTiles {
    pub fn register(reg: &mut TileRegistry) -> Self {
        Self {
            grass: reg.register(TileDef::new("grass", 0).rotated()),
            flowery_grass: reg.register(
                TileDef::new("flowery_grass", 1)
                    .rotated()
                    .drops(items::FLOWER, 0, 1),
            ),
            sand: reg.register(TileDef::new("sand", 2).rotated().drops(items::SAND, 1, 1)),
            water: reg.register(TileDef::new("water", 3)),
            deep_water: reg.register(
                TileDef::new("deep_water", 8).animated(DEEP_WATER_FRAMES, DEEP_WATER_FPS),
            ),
            stone_floor: reg.register(TileDef::new("stone_floor", 4).rotated()),
            stone_wall: reg.register(
                TileDef::new("stone_wall", 5)
                    .solid()
                    .bordered()
                    .breakable(12, Tool::Pickaxe, 1)
                    .drops(items::STONE, 1, 3),
            ),
            pebbles: reg.register(
                TileDef::new("pebbles", 6)
                    .rotated()
                    .punchable()
                    .drops(items::PEBBLE, 1, 3),
            ),
            rock: reg.register(
                TileDef::new("rock", 7)
                    .solid()
                    .breakable(4, Tool::Pickaxe, 0)
                    .drops(items::STONE, 1, 2),
            ),
        }
    }

    #[inline]
    pub fn is_water(&self, id: TileId) -> bool {
        id == self.water || id == self.deep_water
    }
}

/// placeholder terrain atlas: flat colours with a darker top‑left notch so
/// rotations stay visible
pub fn terrain_atlas_image() -> RgbaSurface {
    const COLOURS: [Rgba; 8] = [
        Rgba::rgb(70, 160, 60),   // grass
        Rgba::rgb(90, 170, 70),   // flowery grass
        Rgba::rgb(220, 200, 130), // sand
        Rgba::rgb(50, 110, 200),  // water
        Rgba::rgb(120, 120, 125), // stone floor
        Rgba::rgb(70, 70, 80),    // stone wall
        Rgba::rgb(150, 145, 140), // pebbles
        Rgba::rgb(105, 100, 95),  // rock
    ];
    let mut img = RgbaSurface::new(TERRAIN_ATLAS_COLUMNS * TILE_PX, TERRAIN_ATLAS_ROWS * TILE_PX);
    let notch = TILE_PX / 4;

    for cell in 0..TERRAIN_ATLAS_COLUMNS * TERRAIN_ATLAS_ROWS {
        let (col, row) = (cell % TERRAIN_ATLAS_COLUMNS, cell / TERRAIN_ATLAS_COLUMNS);
        let base = if row == 0 {
            COLOURS[col as usize]
        } else if col < DEEP_WATER_FRAMES {
            // deep water frames get progressively lighter
            Rgba::rgb(20, 50, 140).shade(1.0 + col as f32 * 0.12)
        } else {
            Rgba::TRANSPARENT
        };
        for y in 0..TILE_PX {
            for x in 0..TILE_PX {
                let px = if x < notch && y < notch { base.shade(0.6) } else { base };
                img.set(col * TILE_PX + x, row * TILE_PX + y, px);
            }
        }
    }
    img
}

/// registry + atlas for the built‑in terrain set
pub fn terrain_tileset() -> (TileRegistry, TerrainTiles, Atlas) {
    let mut reg = TileRegistry::new();
    let tiles = TerrainTiles::register(&mut reg);
    let atlas = Atlas::new(terrain_atlas_image(), TILE_PX, TILE_PX);
    (reg, tiles, atlas)
}
