//! tile grid + chunk cache
//!
//! Cells hold [`TileId`]s. Every `CHUNK_SIZE × CHUNK_SIZE` block has a cached
//! RGBA artifact holding its non‑animated tiles. Mutations only mark the
//! owning chunk dirty; artifacts are rebuilt in [`Tilemap::pre_render`], once
//! per frame, before the draw pass reads them.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use bevy::log::{debug, warn};
use bevy::math::{Rect, UVec2, Vec2};
use rand::Rng;

use crate::atlas::{Atlas, Rotation};
use crate::constants::{CHUNK_SIZE, MAX_REPORTS};
use crate::error::TilemapError;
use crate::hash::rotation_quarters;
use crate::surface::{Rgba, RgbaSurface};
use crate::tile::{ItemId, TileDef, TileId, TileRegistry};

/* ===========================================================
   chunk artifact
   =========================================================== */
pub struct Chunk {
    surface: RgbaSurface,
    revision: u32,
}

impl Chunk {
    #[inline]
    pub fn surface(&self) -> &RgbaSurface {
        &self.surface
    }

    /// bumped on every recomposition – backends re‑upload on change
    #[inline]
    pub fn revision(&self) -> u32 {
        self.revision
    }
}

/* ===========================================================
   grid
   =========================================================== */
pub struct Tilemap {
    atlas: Arc<Atlas>,
    registry: Arc<TileRegistry>,
    width: usize,
    height: usize,
    tiles: Vec<TileId>,
    chunks: Vec<Chunk>,
    dirty: HashSet<usize>,
    reports: VecDeque<TilemapError>,
}

impl Tilemap {
    pub fn new(width: usize, height: usize, atlas: Arc<Atlas>, registry: Arc<TileRegistry>) -> Self {
        let mut map = Self {
            atlas,
            registry,
            width,
            height,
            tiles: vec![TileId::EMPTY; width * height],
            chunks: Vec::new(),
            dirty: HashSet::new(),
            reports: VecDeque::new(),
        };

        if width % CHUNK_SIZE != 0 || height % CHUNK_SIZE != 0 {
            map.report(TilemapError::Configuration {
                what: "tilemap",
                size: (width as u32, height as u32),
                cell: (CHUNK_SIZE as u32, CHUNK_SIZE as u32),
            });
        }

        for index in 0..map.chunk_count() {
            map.render_chunk(index);
        }
        map
    }

    /* ---------- dimensions ---------- */

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn chunks_x(&self) -> usize {
        self.width / CHUNK_SIZE
    }

    #[inline]
    pub fn chunks_y(&self) -> usize {
        self.height / CHUNK_SIZE
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks_x() * self.chunks_y()
    }

    pub fn atlas(&self) -> &Arc<Atlas> {
        &self.atlas
    }

    pub fn registry(&self) -> &Arc<TileRegistry> {
        &self.registry
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// chunk holding tile `(x, y)`; caller guarantees `(x, y)` is in bounds
    #[inline]
    pub fn chunk_index(&self, x: usize, y: usize) -> usize {
        x / CHUNK_SIZE + (y / CHUNK_SIZE) * self.chunks_x()
    }

    /// top‑left tile of a chunk
    #[inline]
    pub fn chunk_origin(&self, index: usize) -> (usize, usize) {
        let cx = self.chunks_x().max(1);
        ((index % cx) * CHUNK_SIZE, (index / cx) * CHUNK_SIZE)
    }

    /// pixel size of one chunk artifact
    pub fn chunk_pixel_size(&self) -> UVec2 {
        self.atlas.cell_size() * CHUNK_SIZE as u32
    }

    /// chunk bounds in world pixels (y down, origin at tile (0, 0))
    pub fn chunk_world_rect(&self, index: usize) -> Rect {
        let (tx, ty) = self.chunk_origin(index);
        let cell = self.atlas.cell_size().as_vec2();
        let min = Vec2::new(tx as f32, ty as f32) * cell;
        Rect::from_corners(min, min + self.chunk_pixel_size().as_vec2())
    }

    /* ---------- cell access ---------- */

    #[inline]
    pub fn tile_at(&self, x: i32, y: i32) -> TileId {
        if !self.in_bounds(x, y) {
            return TileId::EMPTY;
        }
        self.tiles[y as usize * self.width + x as usize]
    }

    /// raw cells, row‑major
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn tile_def_at(&self, x: i32, y: i32) -> Option<&TileDef> {
        self.registry.get(self.tile_at(x, y))
    }

    /// tile under a world‑pixel position
    pub fn tile_at_world(&self, pos: Vec2) -> TileId {
        let (x, y) = self.world_to_tile(pos);
        self.tile_at(x, y)
    }

    pub fn world_to_tile(&self, pos: Vec2) -> (i32, i32) {
        let cell = self.atlas.cell_size().as_vec2();
        ((pos.x / cell.x).floor() as i32, (pos.y / cell.y).floor() as i32)
    }

    /// any of the four in‑bounds neighbours holds `kind`
    pub fn tile_touches(&self, x: i32, y: i32, kind: TileId) -> bool {
        [(0, -1), (-1, 0), (1, 0), (0, 1)].iter().any(|&(dx, dy)| {
            let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
                return false;
            };
            self.in_bounds(nx, ny) && self.tile_at(nx, ny) == kind
        })
    }

    pub fn try_set_tile(&mut self, x: i32, y: i32, tile: TileId) -> Result<(), TilemapError> {
        if !self.in_bounds(x, y) {
            return Err(TilemapError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let (ux, uy) = (x as usize, y as usize);
        self.tiles[uy * self.width + ux] = tile;
        // a ragged edge (size not divisible by CHUNK_SIZE) has no chunk
        if ux < self.chunks_x() * CHUNK_SIZE && uy < self.chunks_y() * CHUNK_SIZE {
            let index = self.chunk_index(ux, uy);
            self.mark_dirty(index);
        }
        Ok(())
    }

    /// out‑of‑bounds writes are reported and dropped
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileId) {
        if let Err(e) = self.try_set_tile(x, y, tile) {
            self.report(e);
        }
    }

    /// empties the cell and rolls its drop table
    pub fn destroy_tile<R: Rng>(&mut self, x: i32, y: i32, rng: &mut R) -> Vec<(ItemId, u32)> {
        if !self.in_bounds(x, y) {
            self.set_tile(x, y, TileId::EMPTY);
            return Vec::new();
        }
        let drops = match self.tile_def_at(x, y) {
            Some(def) => def
                .drops
                .iter()
                .map(|d| (d.item, rng.gen_range(d.min..=d.max.max(d.min))))
                .filter(|&(_, n)| n > 0)
                .collect(),
            None => Vec::new(),
        };
        self.set_tile(x, y, TileId::EMPTY);
        drops
    }

    /// every cell back to empty; all chunks go dirty, artifacts are kept
    pub fn clear(&mut self) {
        self.tiles.fill(TileId::EMPTY);
        self.mark_all_dirty();
    }

    /* ---------- dirty tracking ---------- */

    /// indices past the last chunk are ignored
    pub fn mark_dirty(&mut self, index: usize) {
        if index < self.chunk_count() {
            self.dirty.insert(index);
        }
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.extend(0..self.chunk_count());
    }

    pub fn is_dirty(&self, index: usize) -> bool {
        self.dirty.contains(&index)
    }

    /// dirty chunk indices, ascending
    pub fn dirty_chunks(&self) -> Vec<usize> {
        let mut v: Vec<usize> = self.dirty.iter().copied().collect();
        v.sort_unstable();
        v
    }

    /// rebuild every dirty chunk, then forget them; returns how many were rebuilt
    pub fn pre_render(&mut self) -> usize {
        if self.dirty.is_empty() {
            return 0;
        }
        let start = Instant::now();
        let dirty = self.dirty_chunks();
        for &index in &dirty {
            self.render_chunk(index);
        }
        self.dirty.clear();
        debug!(
            "rendered {} chunks in {:.2}ms",
            dirty.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        dirty.len()
    }

    /// full recomposition, used after bulk writes
    pub fn rerender_all(&mut self) -> usize {
        self.mark_all_dirty();
        self.pre_render()
    }

    /* ---------- chunk artifacts ---------- */

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// (re)compose one artifact. Artifacts are only ever appended in
    /// ascending order; a request past the end fills the gap first.
    pub fn render_chunk(&mut self, index: usize) {
        if index >= self.chunk_count() {
            self.report(TilemapError::ChunkOrder {
                expected: self.chunks.len(),
                got: index,
            });
            return;
        }
        if index > self.chunks.len() {
            self.report(TilemapError::ChunkOrder {
                expected: self.chunks.len(),
                got: index,
            });
        }
        while self.chunks.len() <= index {
            let size = self.chunk_pixel_size();
            let next = self.chunks.len();
            self.chunks.push(Chunk {
                surface: RgbaSurface::new(size.x, size.y),
                revision: 0,
            });
            if next < index {
                self.compose_in_place(next);
            }
        }
        self.compose_in_place(index);
    }

    /// a fresh composition of `index` from the live grid, for inspection
    pub fn compose_chunk(&self, index: usize) -> RgbaSurface {
        let size = self.chunk_pixel_size();
        let mut out = RgbaSurface::new(size.x, size.y);
        self.compose(index, &mut out);
        out
    }

    fn compose_in_place(&mut self, index: usize) {
        let mut surface = std::mem::replace(&mut self.chunks[index].surface, RgbaSurface::new(0, 0));
        self.compose(index, &mut surface);
        let chunk = &mut self.chunks[index];
        chunk.surface = surface;
        chunk.revision = chunk.revision.wrapping_add(1);
    }

    fn compose(&self, index: usize, out: &mut RgbaSurface) {
        out.fill(Rgba::TRANSPARENT);
        let (ox, oy) = self.chunk_origin(index);
        let cell = self.atlas.cell_size();

        for y in oy..oy + CHUNK_SIZE {
            for x in ox..ox + CHUNK_SIZE {
                let Some(def) = self.tile_def_at(x as i32, y as i32) else {
                    continue;
                };
                if def.animated {
                    continue; // drawn live every frame
                }
                let (col, row) = self.atlas.cell_coords(def.atlas_index);
                let rotation = if def.random_rotation {
                    Rotation::from_quarter_turns(rotation_quarters(x as i32, y as i32))
                } else {
                    Rotation::R0
                };
                self.atlas.render_tile(
                    out,
                    (x - ox) as u32 * cell.x,
                    (y - oy) as u32 * cell.y,
                    col,
                    row,
                    rotation,
                );
            }
        }
    }

    /* ---------- reporting ---------- */

    pub fn report(&mut self, err: TilemapError) {
        warn!("{err}");
        if self.reports.len() == MAX_REPORTS {
            self.reports.pop_front();
        }
        self.reports.push_back(err);
    }

    pub fn drain_reports(&mut self) -> Vec<TilemapError> {
        self.reports.drain(..).collect()
    }
}
