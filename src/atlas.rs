//! tileset atlas – one image cut into equally sized cells, indexed row‑major

use bevy::log::warn;
use bevy::math::{URect, UVec2};

use crate::error::TilemapError;
use crate::surface::RgbaSurface;

/// clockwise quarter turns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn from_quarter_turns(turns: u32) -> Self {
        match turns % 4 {
            0 => Self::R0,
            1 => Self::R90,
            2 => Self::R180,
            _ => Self::R270,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }

    /// source pixel for destination pixel `(dx, dy)` of a `size × size` cell
    #[inline]
    fn source(self, dx: u32, dy: u32, size: u32) -> (u32, u32) {
        let last = size - 1;
        match self {
            Self::R0 => (dx, dy),
            Self::R90 => (dy, last - dx),
            Self::R180 => (last - dx, last - dy),
            Self::R270 => (last - dy, dx),
        }
    }
}

pub struct Atlas {
    image: RgbaSurface,
    cell_width: u32,
    cell_height: u32,
}

impl Atlas {
    /// a size mismatch is reported but the atlas is still usable (partial
    /// cells at the right/bottom edge are ignored)
    pub fn new(image: RgbaSurface, cell_width: u32, cell_height: u32) -> Self {
        let atlas = Self {
            image,
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        };
        if let Err(e) = atlas.check_dimensions() {
            warn!("{e}");
        }
        atlas
    }

    pub fn check_dimensions(&self) -> Result<(), TilemapError> {
        let (w, h) = (self.image.width(), self.image.height());
        if w % self.cell_width != 0 || h % self.cell_height != 0 {
            return Err(TilemapError::Configuration {
                what: "tileset image",
                size: (w, h),
                cell: (self.cell_width, self.cell_height),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn image(&self) -> &RgbaSurface {
        &self.image
    }

    #[inline]
    pub fn cell_size(&self) -> UVec2 {
        UVec2::new(self.cell_width, self.cell_height)
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.image.width() / self.cell_width
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.image.height() / self.cell_height
    }

    pub fn cell_count(&self) -> u32 {
        self.columns() * self.rows()
    }

    /// `(col, row)` of a cell index
    #[inline]
    pub fn cell_coords(&self, index: u32) -> (u32, u32) {
        let cols = self.columns().max(1);
        (index % cols, index / cols)
    }

    /// pixel rectangle of a cell inside the atlas image
    pub fn cell_rect(&self, col: u32, row: u32) -> URect {
        let min = UVec2::new(col * self.cell_width, row * self.cell_height);
        URect::from_corners(min, min + self.cell_size())
    }

    /// copy one cell into `target` with its top‑left at `(x, y)`; rotation
    /// turns the cell in place and only applies to square cells
    pub fn render_tile(
        &self,
        target: &mut RgbaSurface,
        x: u32,
        y: u32,
        col: u32,
        row: u32,
        rotation: Rotation,
    ) {
        let (cw, ch) = (self.cell_width, self.cell_height);
        let rotation = if cw == ch { rotation } else { Rotation::R0 };
        let (ox, oy) = (col * cw, row * ch);

        for dy in 0..ch {
            for dx in 0..cw {
                let (sx, sy) = rotation.source(dx, dy, cw);
                let Some(&px) = self.image.get(ox + sx, oy + sy) else {
                    continue;
                };
                target.set(x + dx, y + dy, px);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Rgba;

    fn marked_atlas() -> Atlas {
        // 2 cols × 1 row of 2×2 cells; cell 1 has a red pixel top‑left
        let mut img = RgbaSurface::new(4, 2);
        img.set(2, 0, Rgba::rgb(255, 0, 0));
        Atlas::new(img, 2, 2)
    }

    #[test]
    fn index_is_row_major() {
        let atlas = Atlas::new(RgbaSurface::new(64, 32), 16, 16);
        assert_eq!(atlas.columns(), 4);
        assert_eq!(atlas.rows(), 2);
        assert_eq!(atlas.cell_count(), 8);
        assert_eq!(atlas.cell_coords(5), (1, 1));
        assert_eq!(atlas.cell_rect(1, 1), URect::new(16, 16, 32, 32));
    }

    #[test]
    fn mismatched_image_is_reported_not_fatal() {
        let atlas = Atlas::new(RgbaSurface::new(40, 32), 16, 16);
        assert!(matches!(
            atlas.check_dimensions(),
            Err(TilemapError::Configuration { size: (40, 32), .. })
        ));
        assert_eq!(atlas.cell_count(), 4);
    }

    #[test]
    fn rotation_moves_the_corner_clockwise() {
        let atlas = marked_atlas();
        let red = Rgba::rgb(255, 0, 0);
        let expected = [
            (Rotation::R0, (0, 0)),
            (Rotation::R90, (1, 0)),
            (Rotation::R180, (1, 1)),
            (Rotation::R270, (0, 1)),
        ];
        for (rot, (x, y)) in expected {
            let mut out = RgbaSurface::new(2, 2);
            atlas.render_tile(&mut out, 0, 0, 1, 0, rot);
            assert_eq!(out.get(x, y), Some(&red), "{rot:?}");
        }
    }

    #[test]
    fn quarter_turns_wrap() {
        assert_eq!(Rotation::from_quarter_turns(5), Rotation::R90);
        assert_eq!(Rotation::from_quarter_turns(3).degrees(), 270);
    }
}
