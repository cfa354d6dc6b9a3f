//! row‑major pixel buffers used for the atlas image and chunk artifacts

/// 8‑bit RGBA pixel
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// multiply rgb by `f`, alpha untouched
    pub fn shade(self, f: f32) -> Self {
        let s = |c: u8| (c as f32 * f).round().clamp(0.0, 255.0) as u8;
        Self::new(s(self.r), s(self.g), s(self.b), self.a)
    }
}

/// 2‑D buffer, `y * width + x`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface<T> {
    data: Box<[T]>,
    width: u32,
    height: u32,
}

pub type RgbaSurface = Surface<Rgba>;

impl<T: Clone> Surface<T> {
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        let len = width as usize * height as usize;
        Self {
            data: vec![value; len].into_boxed_slice(),
            width,
            height,
        }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T: Clone + Default> Surface<T> {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T> Surface<T> {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.index_of(x, y).map(|i| &self.data[i])
    }

    /// returns `false` (and writes nothing) when out of bounds
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn pixels(&self) -> &[T] {
        &self.data
    }
}

impl RgbaSurface {
    /// tightly packed RGBA8 bytes, ready for an `Rgba8UnormSrgb` texture
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect()
    }

    /// copy bytes back into an existing buffer of matching length
    pub fn write_bytes(&self, out: &mut [u8]) {
        for (dst, p) in out.chunks_exact_mut(4).zip(self.data.iter()) {
            dst.copy_from_slice(&[p.r, p.g, p.b, p.a]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut s: Surface<u8> = Surface::filled(4, 3, 7);
        assert!(s.get(4, 0).is_none());
        assert!(s.get(0, 3).is_none());
        assert!(!s.set(4, 0, 1));
        assert!(s.set(3, 2, 1));
        assert_eq!(s.get(3, 2), Some(&1));
        assert_eq!(s.pixels()[2 * 4 + 3], 1);
    }

    #[test]
    fn bytes_are_rgba_order() {
        let mut s = RgbaSurface::new(2, 1);
        s.set(1, 0, Rgba::new(1, 2, 3, 4));
        assert_eq!(s.to_bytes(), vec![0, 0, 0, 0, 1, 2, 3, 4]);

        let mut out = vec![9u8; 8];
        s.write_bytes(&mut out);
        assert_eq!(out, s.to_bytes());
    }

    #[test]
    fn shade_keeps_alpha() {
        let p = Rgba::new(100, 200, 255, 17).shade(0.5);
        assert_eq!(p, Rgba::new(50, 100, 128, 17));
    }
}
