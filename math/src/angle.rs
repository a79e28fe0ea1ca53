use std::f64::consts::TAU;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Number of binary angle units in one full turn.
pub const BANG_360: u32 = 1 << 16;
pub const BANG_180: u16 = 0x8000;
pub const BANG_90: u16 = 0x4000;
pub const BANG_45: u16 = 0x2000;

/// A 16 bit binary angle. One full turn is 65536 units, so all arithmetic
/// wraps around the circle for free. East is 0, angles increase
/// counter-clockwise.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinAngle(u16);

impl BinAngle {
    pub const ZERO: BinAngle = BinAngle(0);

    #[inline]
    pub const fn new(bams: u16) -> Self {
        BinAngle(bams)
    }

    #[inline]
    pub const fn bams(&self) -> u16 {
        self.0
    }

    /// Degrees in the range `0.0..360.0`
    #[inline]
    pub fn to_degrees(&self) -> f64 {
        self.0 as f64 * (360.0 / BANG_360 as f64)
    }

    #[inline]
    pub fn to_radians(&self) -> f64 {
        self.0 as f64 * (TAU / BANG_360 as f64)
    }

    pub fn from_degrees(degrees: f64) -> Self {
        let units = (degrees / 360.0 * BANG_360 as f64).round() as i64;
        BinAngle(units.rem_euclid(BANG_360 as i64) as u16)
    }

    #[inline]
    pub const fn wrapping_sub(self, other: BinAngle) -> BinAngle {
        BinAngle(self.0.wrapping_sub(other.0))
    }

    #[inline]
    pub const fn wrapping_add(self, other: BinAngle) -> BinAngle {
        BinAngle(self.0.wrapping_add(other.0))
    }
}

impl fmt::Display for BinAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.to_degrees())
    }
}

impl Add for BinAngle {
    type Output = BinAngle;
    #[inline]
    fn add(self, other: BinAngle) -> BinAngle {
        self.wrapping_add(other)
    }
}

impl AddAssign for BinAngle {
    #[inline]
    fn add_assign(&mut self, other: BinAngle) {
        *self = self.wrapping_add(other);
    }
}

impl Sub for BinAngle {
    type Output = BinAngle;
    #[inline]
    fn sub(self, other: BinAngle) -> BinAngle {
        self.wrapping_sub(other)
    }
}

impl SubAssign for BinAngle {
    #[inline]
    fn sub_assign(&mut self, other: BinAngle) {
        *self = self.wrapping_sub(other);
    }
}

impl Neg for BinAngle {
    type Output = BinAngle;
    #[inline]
    fn neg(self) -> BinAngle {
        BinAngle(self.0.wrapping_neg())
    }
}

/// Binary angle of the vector `(x, y)`. The integer inputs match how map
/// deltas are truncated before the angle is taken. `(0, 0)` gives 0.
pub fn bams_atan2(y: i32, x: i32) -> BinAngle {
    if x == 0 && y == 0 {
        return BinAngle::ZERO;
    }
    let turns = (y as f64).atan2(x as f64) / TAU;
    let units = (turns * BANG_360 as f64).round() as i64;
    BinAngle(units.rem_euclid(BANG_360 as i64) as u16)
}
