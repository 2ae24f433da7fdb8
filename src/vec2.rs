use std::{
    f64::consts::PI,
    fmt,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub},
};

#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, other: f64) -> Vec2 {
        Vec2 {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, other: f64) -> Vec2 {
        Vec2 {
            x: self.x / other,
            y: self.y / other,
        }
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.0}, {:.0})", self.x, self.y)
    }
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0., y: 0. };

    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Unit vector pointing at `deg` degrees (0 = +x, clockwise on screen since +y is down).
    pub fn from_angle(deg: f64) -> Self {
        let rad = deg.to_radians();
        Vec2 {
            x: rad.cos(),
            y: rad.sin(),
        }
    }

    pub fn len(self) -> f64 {
        self.len2().sqrt()
    }

    pub fn len2(self) -> f64 {
        (self.x * self.x) + (self.y * self.y)
    }

    pub fn dist(self, other: Vec2) -> f64 {
        (other - self).len()
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Zero-length input stays zero.
    pub fn norm(self) -> Vec2 {
        let len = self.len();
        if len < 1e-9 {
            Vec2::ZERO
        } else {
            self / len
        }
    }

    /// Rotated by +90 degrees.
    pub fn perp(self) -> Vec2 {
        Vec2 {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn rotate(self, deg: f64) -> Vec2 {
        let (sin, cos) = deg.to_radians().sin_cos();
        Vec2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Heading of this vector in degrees, normalized to [0, 360).
    pub fn angle_deg(self) -> f64 {
        normalize_angle(self.y.atan2(self.x) * 180. / PI)
    }

    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        self + (other - self) * t.clamp(0., 1.)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise truncation toward zero, the way the game stores speeds.
    pub fn trunc(self) -> Vec2 {
        Vec2 {
            x: self.x.trunc(),
            y: self.y.trunc(),
        }
    }

    pub fn round(self) -> Vec2 {
        Vec2 {
            x: self.x.round(),
            y: self.y.round(),
        }
    }
}

pub fn normalize_angle(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.);
    // rem_euclid can return 360.0 for tiny negative inputs
    if a >= 360. {
        0.
    } else {
        a
    }
}

/// Signed shortest turn from `from` to `to`, in (-180, 180].
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let d = normalize_angle(to - from);
    if d > 180. {
        d - 360.
    } else {
        d
    }
}
