//! Planar coordinate type and the geometry kernel.
//!
//! Everything here is a pure function of its inputs.  Coordinates are metres
//! on a flat map with the origin in the lower-left corner, so plain Euclidean
//! geometry applies (no projection, no wrap-around).
//!
//! Lines are handled in implicit form `A·x + B·y + C = 0`.  For a line through
//! `a` and `b` the coefficients are
//!
//! ```text
//! A = a.y − b.y
//! B = b.x − a.x
//! C = (a.x − b.x)·a.y + (b.y − a.y)·a.x
//! ```
//!
//! which is degenerate (`A = B = 0`) exactly when `a == b`.

/// A point on the map, in metres.  Equality is exact.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.  Symmetric; zero iff the points are equal.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint of the segment `self`–`other`.
    ///
    /// Returns `self` unchanged when both points are equal, so no rounding can
    /// creep in for the degenerate case.
    #[inline]
    pub fn midpoint(self, other: Position) -> Position {
        if self == other {
            return self;
        }
        Position::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Unit vector pointing from `self` towards `other`, or `None` if the two
    /// points coincide.
    #[inline]
    pub fn unit_vector_to(self, other: Position) -> Option<(f64, f64)> {
        let d = self.distance(other);
        if d == 0.0 {
            return None;
        }
        Some(((other.x - self.x) / d, (other.y - self.y) / d))
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f64, dy: f64) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// `[x, y]` — the point layout used by the R-tree in `tp-graph`.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.x, self.y)
    }
}

// ── Lines ─────────────────────────────────────────────────────────────────────

/// Coefficients of the implicit line `A·x + B·y + C = 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LineCoefficients {
    /// The infinite line through `p` and `q`.
    pub fn through(p: Position, q: Position) -> Self {
        Self {
            a: p.y - q.y,
            b: q.x - p.x,
            c: (p.x - q.x) * p.y + (q.y - p.y) * p.x,
        }
    }

    /// The line through `at` that is perpendicular to the direction `p → q`.
    pub fn perpendicular(p: Position, q: Position, at: Position) -> Self {
        let a = q.x - p.x;
        let b = q.y - p.y;
        Self { a, b, c: -(a * at.x + b * at.y) }
    }

    /// `true` when the coefficients do not describe a line (`A = B = 0`).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.a == 0.0 && self.b == 0.0
    }

    /// `A² + B²`.
    #[inline]
    fn norm_2(&self) -> f64 {
        self.a * self.a + self.b * self.b
    }

    /// Signed distance from `p` to the line.  The sign tells which side of
    /// the line `p` lies on.  Meaningless for a degenerate line.
    #[inline]
    pub fn signed_distance(&self, p: Position) -> f64 {
        (self.a * p.x + self.b * p.y + self.c) / self.norm_2().sqrt()
    }

    /// Foot of the perpendicular from `p` onto the line.
    pub fn project(&self, p: Position) -> Position {
        let n2 = self.norm_2();
        let b_x0 = self.b * p.x;
        let a_y0 = self.a * p.y;
        Position::new(
            (self.b * (b_x0 - a_y0) - self.a * self.c) / n2,
            (self.a * (a_y0 - b_x0) - self.b * self.c) / n2,
        )
    }
}

// ── Kernel functions ──────────────────────────────────────────────────────────

/// Shortest distance from `p` to the **infinite** line through `a` and `b`,
/// together with the closest point on that line.
///
/// The result is not clipped to the segment `a`–`b`.  When `a == b` the line
/// is undefined and the answer is `(p.distance(a), a)`.
pub fn closest_point_on_line(a: Position, b: Position, p: Position) -> (f64, Position) {
    let line = LineCoefficients::through(a, b);
    if line.is_degenerate() {
        return (p.distance(a), a);
    }
    (line.signed_distance(p).abs(), line.project(p))
}

/// `true` iff `p` lies in the strip bounded by the two lines perpendicular to
/// `a`–`b` through `a` and through `b`, i.e. the foot of `p` on line `ab` falls
/// between `a` and `b` (boundaries included).
///
/// For `a == b` the strip collapses and only `p == a` is inside.
pub fn point_between(a: Position, b: Position, p: Position) -> bool {
    if a == b {
        return p == a;
    }
    let through_a = LineCoefficients::perpendicular(a, b, a).signed_distance(p);
    let through_b = LineCoefficients::perpendicular(a, b, b).signed_distance(p);
    through_a * through_b <= 0.0
}
