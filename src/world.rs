//! the two‑layer world: base terrain + decoration overlay

use std::sync::Arc;

use bevy::math::{Rect, Vec2};
use bevy::prelude::Resource;

use crate::atlas::Atlas;
use crate::tile::{TileId, TileRegistry};
use crate::tilemap::Tilemap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Base,
    Top,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::Base, Layer::Top];
}

#[derive(Resource)]
pub struct TileWorld {
    pub base_layer: Tilemap,
    pub top_layer: Tilemap,
    /// effective seed of the last generation pass
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    /// world pixels
    pub spawn_point: Vec2,
}

impl TileWorld {
    /// empty world, both layers sharing one atlas and registry
    pub fn new(width: usize, height: usize, atlas: Arc<Atlas>, registry: Arc<TileRegistry>) -> Self {
        Self {
            base_layer: Tilemap::new(width, height, atlas.clone(), registry.clone()),
            top_layer: Tilemap::new(width, height, atlas, registry),
            seed: 0,
            width,
            height,
            spawn_point: Vec2::ZERO,
        }
    }

    pub fn layer(&self, layer: Layer) -> &Tilemap {
        match layer {
            Layer::Base => &self.base_layer,
            Layer::Top => &self.top_layer,
        }
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut Tilemap {
        match layer {
            Layer::Base => &mut self.base_layer,
            Layer::Top => &mut self.top_layer,
        }
    }

    pub fn tile_size(&self) -> Vec2 {
        self.base_layer.atlas().cell_size().as_vec2()
    }

    /// world‑pixel centre of the map
    pub fn center_point(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size() * 0.5
    }

    /// world‑pixel centre of tile `(x, y)`
    pub fn tile_center(&self, x: i32, y: i32) -> Vec2 {
        (Vec2::new(x as f32, y as f32) + 0.5) * self.tile_size()
    }

    pub fn tile_at_world(&self, layer: Layer, pos: Vec2) -> TileId {
        self.layer(layer).tile_at_world(pos)
    }

    /// `rect` (world pixels) overlaps a solid tile on either layer;
    /// outside the map counts as solid
    pub fn check_collision(&self, rect: Rect) -> bool {
        if rect.is_empty() {
            return false;
        }
        let ts = self.tile_size();
        // float → int casts saturate
        let min_x = (rect.min.x / ts.x).floor() as i32;
        let min_y = (rect.min.y / ts.y).floor() as i32;
        // half‑open on the far edge
        let max_x = ((rect.max.x / ts.x).ceil() as i32).saturating_sub(1);
        let max_y = ((rect.max.y / ts.y).ceil() as i32).saturating_sub(1);

        if min_x < 0
            || min_y < 0
            || max_x >= self.width as i32
            || max_y >= self.height as i32
        {
            return true;
        }

        for ty in min_y..=max_y {
            for tx in min_x..=max_x {
                let solid = Layer::ALL.iter().any(|&l| {
                    self.layer(l)
                        .tile_def_at(tx, ty)
                        .is_some_and(|d| d.is_solid)
                });
                if solid {
                    return true;
                }
            }
        }
        false
    }

    /// flush both layers; call once per frame after all writes
    pub fn pre_render(&mut self) -> usize {
        self.base_layer.pre_render() + self.top_layer.pre_render()
    }
}
