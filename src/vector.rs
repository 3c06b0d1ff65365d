use std::ops::{Add, AddAssign, Mul, Sub};

use rand::Rng;

/// Point or displacement in grid-fractional (or pixel) space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction. A zero vector is returned as-is.
    pub fn normalize(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude <= 0.0 {
            return self;
        }
        Self::new(self.x / magnitude, self.y / magnitude)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).magnitude()
    }

    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, coef: f64) -> Vec2 {
        Vec2::new(self.x * coef, self.y * coef)
    }
}

/// Integer cell coordinates: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f64, self.y as f64)
    }

    /// Nearest cell to a grid-fractional point.
    pub fn from_rounded(point: Vec2) -> Self {
        Self::new(point.x.round() as i32, point.y.round() as i32)
    }
}

pub fn manhattan_distance(a: CellPos, b: CellPos) -> i32 {
    (b.x - a.x).abs() + (b.y - a.y).abs()
}

pub fn random_unit_vector(rng: &mut impl Rng) -> Vec2 {
    let theta = rng.gen::<f64>() * std::f64::consts::TAU;
    Vec2::new(theta.cos(), theta.sin())
}

/// Uniform point in `[0, 1)²`.
pub fn random_unit_square(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(rng.gen::<f64>(), rng.gen::<f64>())
}

/// Wraps `value` into `[0, modulo)`.
///
/// With `reflected`, every other period runs backwards, so a value moving
/// steadily upward bounces between `0` and `modulo` instead of jumping.
pub fn positive_modulo(value: f64, modulo: f64, reflected: bool) -> f64 {
    let mut modulus = value % modulo;
    let divisor = (value / modulo).floor();
    if modulus < 0.0 {
        modulus += modulo;
    }
    if !reflected || divisor.rem_euclid(2.0) == 0.0 {
        return modulus;
    }
    modulo - modulus
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn arithmetic_operators() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(0.5, -4.0);
        assert_eq!(a + b, Vec2::new(1.5, -2.0));
        assert_eq!(a - b, Vec2::new(0.5, 6.0));
        assert_eq!(a * 3.0, Vec2::new(3.0, 6.0));

        let mut c = a;
        c += b;
        assert_eq!(c, a + b);
    }

    #[test]
    fn normalize_keeps_zero_vector() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalize();
        assert!(approx(n.magnitude(), 1.0));
        assert!(approx(n.x, 0.6));
    }

    #[test]
    fn distances() {
        assert!(approx(Vec2::new(0.0, 0.0).distance(Vec2::new(3.0, 4.0)), 5.0));
        assert_eq!(manhattan_distance(CellPos::new(1, 1), CellPos::new(3, 0)), 3);
        assert_eq!(manhattan_distance(CellPos::new(2, 2), CellPos::new(2, 2)), 0);
    }

    #[test]
    fn positive_modulo_wraps_negative_values() {
        assert!(approx(positive_modulo(-1.0, 10.0, false), 9.0));
        assert!(approx(positive_modulo(23.0, 10.0, false), 3.0));
    }

    #[test]
    fn reflected_modulo_bounces() {
        // Even period: plain remainder.
        assert!(approx(positive_modulo(3.0, 10.0, true), 3.0));
        // Odd period: mirrored.
        assert!(approx(positive_modulo(13.0, 10.0, true), 7.0));
        assert!(approx(positive_modulo(-3.0, 10.0, true), 3.0));
    }

    #[test]
    fn random_vectors_are_in_range() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..100 {
            assert!(approx(random_unit_vector(&mut rng).magnitude(), 1.0));
            let p = random_unit_square(&mut rng);
            assert!((0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y));
        }
    }
}
