//! per‑frame draw pass: chunk culling + live animated tiles
//!
//! Backend‑agnostic. The pass walks chunk artifacts in storage order and
//! emits draw calls to a [`DrawTarget`]; the Bevy plugin and the tests both
//! consume a recorded [`DrawList`].

use bevy::math::{Affine2, Rect, URect, Vec2};
use bevy::prelude::Resource;

use crate::atlas::Atlas;
use crate::constants::CHUNK_SIZE;
use crate::tilemap::{Chunk, Tilemap};

/* ===========================================================
   diagnostics context
   =========================================================== */
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct RenderDiagnostics {
    pub draw_chunk_outlines: bool,
    /// chunks drawn since the last `begin_frame`, summed over layers
    pub rendered_chunks: usize,
}

impl RenderDiagnostics {
    pub fn begin_frame(&mut self) {
        self.rendered_chunks = 0;
    }
}

/* ===========================================================
   camera rectangle
   =========================================================== */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    rect: Rect,
}

impl CameraView {
    /// `view` maps world pixels to screen pixels; the screen corners are
    /// pulled back through its inverse
    pub fn from_view_transform(view: Affine2, screen: Vec2) -> Self {
        let inv = view.inverse();
        let a = inv.transform_point2(Vec2::ZERO);
        let b = inv.transform_point2(screen);
        Self {
            rect: Rect::from_corners(a, b),
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// strict overlap – touching edges do not count
#[inline]
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/* ===========================================================
   targets
   =========================================================== */
pub trait DrawTarget {
    fn draw_chunk(&mut self, index: usize, origin: Vec2, chunk: &Chunk);

    /// `source` is the atlas pixel rectangle of the frame to show
    fn draw_tile(&mut self, origin: Vec2, atlas: &Atlas, source: URect);

    fn draw_outline(&mut self, _rect: Rect) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkDraw {
    pub index: usize,
    pub origin: Vec2,
    pub revision: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileDraw {
    pub origin: Vec2,
    pub source: URect,
}

/// records one frame of draw calls
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub chunks: Vec<ChunkDraw>,
    pub tiles: Vec<TileDraw>,
    pub outlines: Vec<Rect>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.tiles.clear();
        self.outlines.clear();
    }
}

impl DrawTarget for DrawList {
    fn draw_chunk(&mut self, index: usize, origin: Vec2, chunk: &Chunk) {
        self.chunks.push(ChunkDraw {
            index,
            origin,
            revision: chunk.revision(),
        });
    }

    fn draw_tile(&mut self, origin: Vec2, _atlas: &Atlas, source: URect) {
        self.tiles.push(TileDraw { origin, source });
    }

    fn draw_outline(&mut self, rect: Rect) {
        self.outlines.push(rect);
    }
}

/* ===========================================================
   the pass
   =========================================================== */
impl Tilemap {
    /// draw every chunk intersecting `view`, then its animated tiles on top;
    /// returns the number of chunks drawn (also added to `diag`)
    pub fn render<T: DrawTarget>(
        &self,
        view: &CameraView,
        elapsed: f32,
        diag: &mut RenderDiagnostics,
        target: &mut T,
    ) -> usize {
        let cam = view.rect();
        let chunk_px = self.chunk_pixel_size().as_vec2();
        let row_px = self.chunks_x() as f32 * chunk_px.x;

        let mut cursor = Vec2::ZERO;
        let mut drawn = 0;
        for (index, chunk) in self.chunks().iter().enumerate() {
            let rect = Rect::from_corners(cursor, cursor + chunk_px);
            if rects_overlap(cam, rect) {
                target.draw_chunk(index, cursor, chunk);
                if diag.draw_chunk_outlines {
                    target.draw_outline(rect);
                }
                self.draw_animated(index, elapsed, target);
                drawn += 1;
            }

            cursor.x += chunk_px.x;
            if cursor.x >= row_px {
                cursor.x = 0.0;
                cursor.y += chunk_px.y;
            }
        }

        diag.rendered_chunks += drawn;
        drawn
    }

    fn draw_animated<T: DrawTarget>(&self, index: usize, elapsed: f32, target: &mut T) {
        let atlas = self.atlas();
        let cell = atlas.cell_size();
        let (ox, oy) = self.chunk_origin(index);

        for y in oy..oy + CHUNK_SIZE {
            for x in ox..ox + CHUNK_SIZE {
                let Some(def) = self.tile_def_at(x as i32, y as i32) else {
                    continue;
                };
                if !def.animated {
                    continue;
                }
                let (col, row) = atlas.cell_coords(def.atlas_index);
                let source = atlas.cell_rect(col + def.frame_at(elapsed), row);
                let origin = Vec2::new((x as u32 * cell.x) as f32, (y as u32 * cell.y) as f32);
                target.draw_tile(origin, atlas, source);
            }
        }
    }
}
