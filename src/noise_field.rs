//! seeded scalar fields sampled on the tile lattice

use noise::core::worley::{distance_functions, ReturnType};
use noise::{NoiseFn, Perlin, Worley};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoiseKind {
    /// gradient noise, roughly −1..1
    Smooth,
    /// squared distance to the nearest feature point minus one, roughly −1..0.5
    Cellular,
}

enum Source {
    Smooth(Perlin),
    Cellular(Worley),
}

/// immutable after construction; `sample` is a pure function of `(x, y)`
pub struct NoiseField {
    seed: u32,
    frequency: f64,
    source: Source,
}

impl NoiseField {
    pub fn new(kind: NoiseKind, seed: u32, frequency: f64) -> Self {
        let source = match kind {
            NoiseKind::Smooth => Source::Smooth(Perlin::new(seed)),
            NoiseKind::Cellular => Source::Cellular(
                Worley::new(seed)
                    .set_distance_function(distance_functions::euclidean_squared)
                    .set_return_type(ReturnType::Distance),
            ),
        };
        Self {
            seed,
            frequency,
            source,
        }
    }

    pub fn smooth(seed: u32, frequency: f64) -> Self {
        Self::new(NoiseKind::Smooth, seed, frequency)
    }

    pub fn cellular(seed: u32, frequency: f64) -> Self {
        Self::new(NoiseKind::Cellular, seed, frequency)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn kind(&self) -> NoiseKind {
        match self.source {
            Source::Smooth(_) => NoiseKind::Smooth,
            Source::Cellular(_) => NoiseKind::Cellular,
        }
    }

    pub fn sample(&self, x: i32, y: i32) -> f32 {
        let p = [x as f64 * self.frequency, y as f64 * self.frequency];
        match &self.source {
            Source::Smooth(n) => n.get(p) as f32,
            // worley maps d² to 2d²−1; shift back to d²−1
            Source::Cellular(n) => ((n.get(p) - 1.0) * 0.5) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_field() {
        for kind in [NoiseKind::Smooth, NoiseKind::Cellular] {
            let a = NoiseField::new(kind, 99, 0.07);
            let b = NoiseField::new(kind, 99, 0.07);
            for (x, y) in [(0, 0), (13, -4), (250, 77)] {
                assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = NoiseField::smooth(1, 0.05);
        let b = NoiseField::smooth(2, 0.05);
        let differs = (0..64).any(|i| a.sample(i, i * 3) != b.sample(i, i * 3));
        assert!(differs);
    }

    #[test]
    fn values_stay_in_range() {
        let smooth = NoiseField::smooth(7, 0.04);
        let cells = NoiseField::cellular(7, 0.04);
        for y in 0..32 {
            for x in 0..32 {
                assert!(smooth.sample(x, y).abs() <= 1.5);
                let c = cells.sample(x, y);
                assert!((-1.01..=1.5).contains(&c), "{c}");
            }
        }
        assert_eq!(cells.kind(), NoiseKind::Cellular);
    }
}
