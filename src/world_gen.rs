//! procedural island generation
//!
//! One pass over every cell, `y` outer / `x` inner. Five seeded noise fields
//! decide water, caves and surface bands; a single `StdRng` rolls the
//! decorations. The field seeds and every roll are drawn in a fixed order, so
//! the whole output is a pure function of the seed.

use std::sync::Arc;
use std::time::Instant;

use bevy::log::info;
use bevy::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::atlas::Atlas;
use crate::constants::*;
use crate::noise_field::NoiseField;
use crate::tile::{TerrainTiles, TileRegistry};
use crate::tilemap::Tilemap;
use crate::world::TileWorld;

/* ===========================================================
   tunables
   =========================================================== */
#[derive(Clone, Debug, PartialEq)]
pub struct WorldGenConfig {
    pub island_threshold: f32,
    pub island_noise_freq: f64,
    pub island_noise_mix: f32,
    pub deep_water_depth: f32,

    pub main_noise_freq: f64,
    pub main_noise2_freq: f64,
    pub main_noise3_freq: f64,
    pub lake_start: f32,
    pub lake_threshold: f32,
    pub sand_threshold: f32,
    pub lake_max_noise2: f32,

    pub cave_noise_freq: f64,
    pub cave_noise_threshold: f32,
    pub cave_wall_thickness: f32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            island_threshold: ISLAND_THRESHOLD,
            island_noise_freq: ISLAND_NOISE_FREQ,
            island_noise_mix: ISLAND_NOISE_MIX,
            deep_water_depth: DEEP_WATER_DEPTH,
            main_noise_freq: MAIN_NOISE_FREQ,
            main_noise2_freq: MAIN_NOISE2_FREQ,
            main_noise3_freq: MAIN_NOISE3_FREQ,
            lake_start: LAKE_START,
            lake_threshold: LAKE_THRESHOLD,
            sand_threshold: SAND_THRESHOLD,
            lake_max_noise2: LAKE_MAX_NOISE2,
            cave_noise_freq: CAVE_NOISE_FREQ,
            cave_noise_threshold: CAVE_NOISE_THRESHOLD,
            cave_wall_thickness: CAVE_WALL_THICKNESS,
        }
    }
}

/* ===========================================================
   fields – creation order is part of the output
   =========================================================== */
struct Fields {
    island: NoiseField,
    main: NoiseField,
    main2: NoiseField,
    main3: NoiseField,
    cave: NoiseField,
}

impl Fields {
    fn new(rng: &mut StdRng, cfg: &WorldGenConfig) -> Self {
        let island = NoiseField::smooth(rng.gen(), cfg.island_noise_freq);
        let main = NoiseField::smooth(rng.gen(), cfg.main_noise_freq);
        let main2 = NoiseField::smooth(rng.gen(), cfg.main_noise2_freq);
        let main3 = NoiseField::smooth(rng.gen(), cfg.main_noise3_freq);
        let cave = NoiseField::cellular(rng.gen(), cfg.cave_noise_freq);
        Self {
            island,
            main,
            main2,
            main3,
            cave,
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn in_band(v: f32, (lo, hi): (f32, f32)) -> bool {
    v > lo && v < hi
}

/* ===========================================================
   generator
   =========================================================== */
pub struct WorldGen {
    pub config: WorldGenConfig,
    pub tiles: TerrainTiles,
    atlas: Arc<Atlas>,
    registry: Arc<TileRegistry>,
}

impl WorldGen {
    pub fn new(tiles: TerrainTiles, atlas: Arc<Atlas>, registry: Arc<TileRegistry>) -> Self {
        Self {
            config: WorldGenConfig::default(),
            tiles,
            atlas,
            registry,
        }
    }

    pub fn with_config(mut self, config: WorldGenConfig) -> Self {
        self.config = config;
        self
    }

    /// new world of `chunks_x × chunks_y` chunks; `None` picks a random seed
    pub fn generate_world(&self, chunks_x: usize, chunks_y: usize, seed: Option<u64>) -> TileWorld {
        let mut world = TileWorld::new(
            chunks_x * CHUNK_SIZE,
            chunks_y * CHUNK_SIZE,
            self.atlas.clone(),
            self.registry.clone(),
        );
        self.regenerate_world(&mut world, seed);
        world
    }

    /// overwrite both layers of an existing world in place
    pub fn regenerate_world(&self, world: &mut TileWorld, seed: Option<u64>) {
        let start = Instant::now();

        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = StdRng::seed_from_u64(seed);
        world.seed = seed;

        world.base_layer.clear();
        world.top_layer.clear();
        let fields = Fields::new(&mut rng, &self.config);

        let (w, h) = (world.width, world.height);
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                self.generate_cell(world, &fields, &mut rng, x, y);
            }
        }

        world.spawn_point = self.find_spawn(world);
        world.base_layer.rerender_all();
        world.top_layer.rerender_all();

        info!(
            "generated {w}x{h} world (seed {seed}) in {:.1}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
    }

    fn generate_cell(&self, world: &mut TileWorld, f: &Fields, rng: &mut StdRng, x: i32, y: i32) {
        let cfg = &self.config;
        let t = &self.tiles;
        let base = &mut world.base_layer;
        let top = &mut world.top_layer;

        /* island mask ---------------------------------------------------- */
        let nx = 2.0 * x as f32 / world.width as f32 - 1.0;
        let ny = 2.0 * y as f32 / world.height as f32 - 1.0;
        let falloff = 1.0 - (1.0 - nx * nx) * (1.0 - ny * ny);
        let island = lerp(f.island.sample(x, y), 1.0 - falloff, cfg.island_noise_mix);

        if island <= cfg.island_threshold {
            let water = if island < cfg.island_threshold - cfg.deep_water_depth {
                t.deep_water
            } else {
                t.water
            };
            base.set_tile(x, y, water);
            return;
        }

        let main = f.main.sample(x, y);
        let main3 = f.main3.sample(x, y);

        /* caves ---------------------------------------------------------- */
        let cave = f.cave.sample(x, y).abs();
        if cave < cfg.cave_noise_threshold {
            base.set_tile(x, y, t.stone_floor);

            let on_rim = cave > cfg.cave_noise_threshold - cfg.cave_wall_thickness;
            let shore = base.tile_touches(x, y, t.water) || base.tile_touches(x, y, t.deep_water);
            if on_rim || shore {
                top.set_tile(x, y, t.stone_wall);
            } else {
                add_rocks(top, t, rng, x, y, main3);
            }
            return;
        }

        /* surface bands -------------------------------------------------- */
        let main2 = f.main2.sample(x, y);
        let lake_hi = cfg.lake_start + cfg.lake_threshold;
        let sand_hi = lake_hi + cfg.sand_threshold;

        if main > cfg.lake_start && main < lake_hi && main2 < cfg.lake_max_noise2 {
            base.set_tile(x, y, t.water);
            return;
        }
        if main > lake_hi && main < sand_hi && main2 < cfg.sand_threshold {
            base.set_tile(x, y, t.sand);
            return;
        }

        if in_band(main2, FLOWER_BAND) && rng.gen_range(0..FLOWER_ONE_IN) == 0 {
            base.set_tile(x, y, t.flowery_grass);
        } else {
            base.set_tile(x, y, t.grass);
        }
        add_rocks(top, t, rng, x, y, main3);
    }

    /// nearest dry, unblocked cell to the map centre, searched ring by ring
    fn find_spawn(&self, world: &TileWorld) -> Vec2 {
        let (w, h) = (world.width as i32, world.height as i32);
        let (cx, cy) = (w / 2, h / 2);
        // last ring that still touches the grid
        let reach = cx.max(w - 1 - cx).max(cy).max(h - 1 - cy);

        for r in 0..=reach {
            for dy in -r..=r {
                // full edge rows on top and bottom, two cells per middle row
                let step = if dy.abs() == r { 1 } else { (2 * r).max(1) };
                for dx in (-r..=r).step_by(step as usize) {
                    let (x, y) = (cx + dx, cy + dy);
                    if self.walkable(world, x, y) {
                        return world.tile_center(x, y);
                    }
                }
            }
        }
        world.center_point()
    }

    fn walkable(&self, world: &TileWorld, x: i32, y: i32) -> bool {
        if !world.base_layer.in_bounds(x, y) {
            return false;
        }
        let ground = world.base_layer.tile_at(x, y);
        if ground.is_empty() || self.tiles.is_water(ground) {
            return false;
        }
        !world.top_layer.tile_def_at(x, y).is_some_and(|d| d.is_solid)
    }
}

/// pebbles or a rock on the overlay – rolls only inside the value band
fn add_rocks(top: &mut Tilemap, t: &TerrainTiles, rng: &mut StdRng, x: i32, y: i32, main3: f32) {
    if in_band(main3, PEBBLE_BAND) && rng.gen_range(0..PEBBLE_ONE_IN) == 0 {
        top.set_tile(x, y, t.pebbles);
    } else if in_band(main3, ROCK_BAND) && rng.gen_range(0..ROCK_ONE_IN) == 0 {
        top.set_tile(x, y, t.rock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{terrain_tileset, TileId};

    fn generator() -> WorldGen {
        let (reg, tiles, atlas) = terrain_tileset();
        WorldGen::new(tiles, Arc::new(atlas), Arc::new(reg))
    }

    #[test]
    fn same_seed_same_world() {
        let gen = generator();
        let a = gen.generate_world(4, 4, Some(42));
        let b = gen.generate_world(4, 4, Some(42));
        assert_eq!(a.base_layer.tiles(), b.base_layer.tiles());
        assert_eq!(a.top_layer.tiles(), b.top_layer.tiles());
        assert_eq!(a.spawn_point, b.spawn_point);
        assert_eq!(a.seed, 42);
    }

    #[test]
    fn different_seeds_differ() {
        let gen = generator();
        let a = gen.generate_world(4, 4, Some(1));
        let b = gen.generate_world(4, 4, Some(2));
        assert_ne!(a.base_layer.tiles(), b.base_layer.tiles());
    }

    #[test]
    fn regenerate_matches_fresh_generation() {
        let gen = generator();
        let mut world = gen.generate_world(4, 4, Some(9));
        gen.regenerate_world(&mut world, Some(77));
        let fresh = gen.generate_world(4, 4, Some(77));

        assert_eq!(world.seed, 77);
        assert_eq!(world.base_layer.tiles(), fresh.base_layer.tiles());
        assert_eq!(world.top_layer.tiles(), fresh.top_layer.tiles());
        for (a, b) in world.base_layer.chunks().iter().zip(fresh.base_layer.chunks()) {
            assert_eq!(a.surface(), b.surface());
        }
    }

    #[test]
    fn every_base_cell_is_filled_and_outer_edge_is_water() {
        let gen = generator();
        let world = gen.generate_world(3, 2, Some(5));
        assert!(world.base_layer.tiles().iter().all(|t| !t.is_empty()));

        // the radial falloff is total on the top row and left column
        for x in 0..world.width as i32 {
            assert!(gen.tiles.is_water(world.base_layer.tile_at(x, 0)));
        }
        for y in 0..world.height as i32 {
            assert!(gen.tiles.is_water(world.base_layer.tile_at(0, y)));
        }
    }

    #[test]
    fn overlay_never_sits_on_water() {
        let gen = generator();
        let world = gen.generate_world(6, 6, Some(1234));
        let t = gen.tiles;
        for y in 0..world.height as i32 {
            for x in 0..world.width as i32 {
                let top = world.top_layer.tile_at(x, y);
                if top != TileId::EMPTY {
                    assert!(!t.is_water(world.base_layer.tile_at(x, y)));
                    assert!([t.stone_wall, t.pebbles, t.rock].contains(&top));
                }
            }
        }
    }

    #[test]
    fn finalize_leaves_nothing_dirty() {
        let gen = generator();
        let world = gen.generate_world(2, 2, Some(1));
        assert!(world.base_layer.dirty_chunks().is_empty());
        assert!(world.top_layer.dirty_chunks().is_empty());
        for c in world.base_layer.chunks() {
            assert!(c.revision() >= 2);
        }
    }

    #[test]
    fn unset_seed_is_recorded() {
        let gen = generator();
        let world = gen.generate_world(2, 2, None);
        let again = gen.generate_world(2, 2, Some(world.seed));
        assert_eq!(world.base_layer.tiles(), again.base_layer.tiles());
    }

    #[test]
    fn spawn_lands_on_dry_ground_when_there_is_any() {
        let gen = generator();
        let world = gen.generate_world(8, 8, Some(3));
        let (x, y) = world.base_layer.world_to_tile(world.spawn_point);
        if world.spawn_point != world.center_point() {
            assert!(gen.walkable(&world, x, y));
        }
        // a config that floods everything falls back to the centre
        let flooded = generator().with_config(WorldGenConfig {
            island_threshold: 10.0,
            ..Default::default()
        });
        let sea = flooded.generate_world(2, 2, Some(3));
        assert_eq!(sea.spawn_point, sea.center_point());
        assert!(sea.top_layer.tiles().iter().all(|t| t.is_empty()));
    }

    /// the scan is row‑major, so when a cell is decided only its upper and
    /// left neighbours are placed; right and lower ones are still empty
    fn shore_when_decided(world: &TileWorld, t: &TerrainTiles, x: i32, y: i32) -> bool {
        [(0, -1), (-1, 0)]
            .iter()
            .any(|&(dx, dy)| t.is_water(world.base_layer.tile_at(x + dx, y + dy)))
    }

    #[test]
    fn overlay_follows_the_per_cell_rules() {
        let gen = generator();
        let t = gen.tiles;
        for seed in [1234, 7, 99] {
            let world = gen.generate_world(6, 6, Some(seed));
            for y in 0..world.height as i32 {
                for x in 0..world.width as i32 {
                    let base = world.base_layer.tile_at(x, y);
                    let top = world.top_layer.tile_at(x, y);

                    if top == t.stone_wall {
                        assert_eq!(base, t.stone_floor, "wall off cave floor at ({x}, {y})");
                    }
                    if top == t.pebbles || top == t.rock {
                        assert!([t.grass, t.flowery_grass, t.stone_floor].contains(&base));
                    }
                    if base == t.sand || t.is_water(base) {
                        assert_eq!(top, TileId::EMPTY, "overlay on lake/sand at ({x}, {y})");
                    }
                    if base == t.stone_floor && shore_when_decided(&world, &t, x, y) {
                        assert_eq!(top, t.stone_wall, "unwalled cave shore at ({x}, {y})");
                    }
                }
            }
        }
    }

    #[test]
    fn all_cave_island_walls_exactly_its_shore() {
        // every land cell takes the cave branch and the rim never fires
        let gen = generator().with_config(WorldGenConfig {
            cave_noise_threshold: f32::INFINITY,
            cave_wall_thickness: 0.0,
            ..Default::default()
        });
        let t = gen.tiles;
        let world = gen.generate_world(6, 6, Some(21));

        let mut walls = 0;
        for y in 0..world.height as i32 {
            for x in 0..world.width as i32 {
                let base = world.base_layer.tile_at(x, y);
                let top = world.top_layer.tile_at(x, y);
                if t.is_water(base) {
                    assert_eq!(top, TileId::EMPTY);
                    continue;
                }
                assert_eq!(base, t.stone_floor);
                let wall = top == t.stone_wall;
                assert_eq!(wall, shore_when_decided(&world, &t, x, y), "at ({x}, {y})");
                walls += wall as usize;
            }
        }
        // the outer edge is water, so the first land cell of any column is shore
        assert!(walls > 0);
    }

    #[test]
    fn spawn_search_takes_the_nearest_ring() {
        let gen = generator();
        let t = gen.tiles;
        let mut world = TileWorld::new(32, 32, gen.atlas.clone(), gen.registry.clone());
        for y in 0..32 {
            for x in 0..32 {
                world.base_layer.set_tile(x, y, t.water);
            }
        }
        // a lone corner cell on the outermost ring is still found
        world.base_layer.set_tile(0, 31, t.grass);
        assert_eq!(gen.find_spawn(&world), world.tile_center(0, 31));

        // ring 3 beats ring 5, and a wall on top blocks the closer one
        world.base_layer.set_tile(16 + 5, 16, t.grass);
        world.base_layer.set_tile(16, 16 - 3, t.sand);
        assert_eq!(gen.find_spawn(&world), world.tile_center(16, 13));
        world.top_layer.set_tile(16, 13, t.stone_wall);
        assert_eq!(gen.find_spawn(&world), world.tile_center(21, 16));

        // a large flooded map gives up and returns the centre
        let sea = TileWorld::new(128, 128, gen.atlas.clone(), gen.registry.clone());
        assert_eq!(gen.find_spawn(&sea), sea.center_point());
    }
}
