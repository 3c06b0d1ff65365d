use rand::Rng;

use crate::vector::{positive_modulo, random_unit_square, random_unit_vector, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

pub const PLAYER_COLORS: [Rgba; 4] = [
    Rgba::rgb(255, 30, 120),
    Rgba::rgb(120, 255, 30),
    Rgba::rgb(255, 120, 20),
    Rgba::rgb(120, 255, 255),
];

pub const TARGET_COLOR: Rgba = Rgba::rgba(0, 255, 0, 0.5);

/// Radial wall gradient whose centre drifts across the canvas over time,
/// bouncing off the edges.
#[derive(Debug, Clone)]
pub struct DynamicColorMap {
    start: Vec2,
    heading: Vec2,
    /// Pixels per second.
    speed: f64,
    center_color: Rgba,
    edge_color: Rgba,
}

impl DynamicColorMap {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            start: random_unit_square(rng),
            heading: random_unit_vector(rng),
            speed: 100.0,
            center_color: Rgba::rgb(255, 20, 255),
            edge_color: Rgba::rgb(30, 40, 255),
        }
    }

    /// Gradient centre in canvas pixels at `time_ms`.
    pub fn center(&self, width: f64, height: f64, time_ms: f64) -> Vec2 {
        let travelled = self.heading * (time_ms * self.speed / 1000.0);
        Vec2::new(
            positive_modulo(self.start.x * width + travelled.x, width, true),
            positive_modulo(self.start.y * height + travelled.y, height, true),
        )
    }

    /// Colour of the canvas pixel `point` on a `width x height` canvas.
    pub fn color_at(&self, point: Vec2, width: f64, height: f64, time_ms: f64) -> Rgba {
        let radius = width.max(height);
        let t = (self.center(width, height, time_ms).distance(point) / radius).min(1.0);
        let lerp = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
        Rgba::rgb(
            lerp(self.center_color.r, self.edge_color.r),
            lerp(self.center_color.g, self.edge_color.g),
            lerp(self.center_color.b, self.edge_color.b),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn centre_stays_on_canvas() {
        let map = DynamicColorMap::new(&mut Pcg64Mcg::seed_from_u64(11));
        for step in 0..200 {
            let c = map.center(220.0, 160.0, step as f64 * 250.0);
            assert!((0.0..=220.0).contains(&c.x), "{c:?}");
            assert!((0.0..=160.0).contains(&c.y), "{c:?}");
        }
    }

    #[test]
    fn colour_fades_from_centre_to_edge() {
        let map = DynamicColorMap::new(&mut Pcg64Mcg::seed_from_u64(12));
        let centre = map.center(220.0, 160.0, 0.0);
        assert_eq!(map.color_at(centre, 220.0, 160.0, 0.0), Rgba::rgb(255, 20, 255));

        let far = Vec2::new(centre.x + 1000.0, centre.y);
        assert_eq!(map.color_at(far, 220.0, 160.0, 0.0), Rgba::rgb(30, 40, 255));
    }
}
