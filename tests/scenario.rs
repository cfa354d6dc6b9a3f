use std::sync::Arc;

use bevy::math::{Rect, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tile_isle::render::rects_overlap;
use tile_isle::{terrain_tileset, CameraView, DrawList, RenderDiagnostics, Tilemap, WorldGen};

fn generator() -> WorldGen {
    let (registry, tiles, atlas) = terrain_tileset();
    WorldGen::new(tiles, Arc::new(atlas), Arc::new(registry))
}

#[test]
fn small_island_set_tile_only_touches_its_chunk() {
    let gen = generator();
    let water = gen.tiles.water;
    let mut world = gen.generate_world(2, 2, Some(1));
    let base = &mut world.base_layer;

    assert_eq!(base.chunks().len(), 4);
    assert!(base.dirty_chunks().is_empty());
    let before: Vec<u32> = base.chunks().iter().map(|c| c.revision()).collect();

    base.set_tile(5, 5, water);
    assert_eq!(base.dirty_chunks(), vec![0]);
    assert_eq!(base.pre_render(), 1);

    let after: Vec<u32> = base.chunks().iter().map(|c| c.revision()).collect();
    assert_ne!(after[0], before[0]);
    assert_eq!(after[1..], before[1..]);

    // the cached artifact shows the water cell at local (5, 5)
    let atlas = base.atlas().clone();
    let def = base.registry().get(water).unwrap();
    let (col, row) = atlas.cell_coords(def.atlas_index);
    let cell = atlas.cell_size();
    let surface = base.chunks()[0].surface();
    for dy in 0..cell.y {
        for dx in 0..cell.x {
            assert_eq!(
                surface.get(5 * cell.x + dx, 5 * cell.y + dy),
                atlas.image().get(col * cell.x + dx, row * cell.y + dy),
            );
        }
    }
}

#[test]
fn same_seed_same_world() {
    let gen = generator();
    let a = gen.generate_world(4, 3, Some(42));
    let b = gen.generate_world(4, 3, Some(42));

    assert_eq!(a.base_layer.tiles(), b.base_layer.tiles());
    assert_eq!(a.top_layer.tiles(), b.top_layer.tiles());
    assert_eq!(a.spawn_point, b.spawn_point);
    for (ca, cb) in a.base_layer.chunks().iter().zip(b.base_layer.chunks()) {
        assert_eq!(ca.surface(), cb.surface());
    }
}

#[test]
fn culling_matches_brute_force() {
    let (registry, _, atlas) = terrain_tileset();
    let map = Tilemap::new(80, 48, Arc::new(atlas), Arc::new(registry));
    let mut rng = StdRng::seed_from_u64(7);
    let mut diag = RenderDiagnostics::default();
    let mut list = DrawList::default();

    for _ in 0..200 {
        let a = Vec2::new(rng.gen_range(-300.0..1600.0), rng.gen_range(-300.0..1000.0));
        let size = Vec2::new(rng.gen_range(1.0..900.0), rng.gen_range(1.0..700.0));
        let view = CameraView::from_rect(Rect::from_corners(a, a + size));

        list.clear();
        map.render(&view, 0.0, &mut diag, &mut list);
        let drawn: Vec<usize> = list.chunks.iter().map(|c| c.index).collect();

        let expected: Vec<usize> = (0..map.chunk_count())
            .filter(|&i| rects_overlap(view.rect(), map.chunk_world_rect(i)))
            .collect();
        assert_eq!(drawn, expected);
    }
}
