//! Quadrant phase algebra
use num_complex::Complex32;
use std::fmt;
use std::ops::Add;
use std::ops::Neg;

const SAMPLES: [Complex32; 4] = [
    Complex32::new(1.0, 0.0),
    Complex32::new(0.0, 1.0),
    Complex32::new(-1.0, 0.0),
    Complex32::new(0.0, -1.0),
];

/// Multiple of 90°, always reduced into `0..4`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QPhase(u8);

impl QPhase {
    /// 0°
    pub const ZERO: QPhase = QPhase(0);
    /// 90°
    pub const QUARTER: QPhase = QPhase(1);
    /// 180°
    pub const HALF: QPhase = QPhase(2);
    /// 270°
    pub const THREE_QUARTERS: QPhase = QPhase(3);

    /// Phase of `quadrants` × 90°, reduced mod 4.
    pub const fn new(quadrants: u8) -> Self {
        QPhase(quadrants & 0x03)
    }

    /// Number of quadrants in `0..4`.
    pub const fn quadrants(self) -> u8 {
        self.0
    }

    /// Rotate by 180°.
    pub const fn rotate_half(self) -> Self {
        QPhase((self.0 + 2) & 0x03)
    }

    /// Unit sample `e^{iπ·q/2}`.
    pub fn to_sample(self) -> Complex32 {
        SAMPLES[self.0 as usize]
    }
}

impl Add for QPhase {
    type Output = QPhase;

    fn add(self, rhs: QPhase) -> QPhase {
        QPhase((self.0 + rhs.0) & 0x03)
    }
}

impl Neg for QPhase {
    type Output = QPhase;

    fn neg(self) -> QPhase {
        QPhase((4 - self.0) & 0x03)
    }
}

impl From<QPhase> for Complex32 {
    fn from(p: QPhase) -> Self {
        p.to_sample()
    }
}

impl fmt::Debug for QPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0 as u16 * 90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_under_add_and_neg() {
        for a in 0..4 {
            for b in 0..4 {
                let s = QPhase::new(a) + QPhase::new(b);
                assert_eq!(s.quadrants(), (a + b) % 4);
            }
            let p = QPhase::new(a);
            assert_eq!(p + -p, QPhase::ZERO);
            assert_eq!(p.rotate_half(), p + QPhase::HALF);
            assert_eq!(p.rotate_half().rotate_half(), p);
        }
        assert_eq!(QPhase::new(7), QPhase::THREE_QUARTERS);
    }

    #[test]
    fn samples_are_unit_rotations() {
        for q in 0..4 {
            let s = QPhase::new(q).to_sample();
            let expected = Complex32::from_polar(1.0, std::f32::consts::FRAC_PI_2 * q as f32);
            assert!((s - expected).norm() < 1e-6);
            assert!((s.norm() - 1.0).abs() < f32::EPSILON);
        }
        assert_eq!(Complex32::from(QPhase::QUARTER), Complex32::new(0.0, 1.0));
    }
}
