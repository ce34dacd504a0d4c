/// A point in PDF user space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in PDF user space (origin bottom-left, y grows upwards).
///
/// `top` is always the larger of the two vertical coordinates, so it is the
/// value a "scroll to" destination should use.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Rect {
    /// Creates a rectangle from two opposite corners, normalizing their order.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            left: x0.min(x1),
            bottom: y0.min(y1),
            right: x0.max(x1),
            top: y0.max(y1),
        }
    }

    /// The smallest rectangle containing every given point.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in rest {
            rect.left = rect.left.min(p.x);
            rect.right = rect.right.max(p.x);
            rect.bottom = rect.bottom.min(p.y);
            rect.top = rect.top.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    /// Grows (or shrinks, for negative values) the rectangle on every side.
    pub fn inflate(&self, by: f32) -> Rect {
        Rect::new(self.left - by, self.bottom - by, self.right + by, self.top + by)
    }

    /// Grows each side shorter than `min` symmetrically around its centre.
    pub fn with_min_size(&self, min: f32) -> Rect {
        let grow = |lo: f32, hi: f32| {
            let pad = (min - (hi - lo)).max(0.0) / 2.0;
            (lo - pad, hi + pad)
        };
        let (left, right) = grow(self.left, self.right);
        let (bottom, top) = grow(self.bottom, self.top);
        Rect { left, bottom, right, top }
    }

    /// `[left bottom right top]`, the layout of a PDF rectangle array.
    pub fn to_array(&self) -> [f32; 4] {
        [self.left, self.bottom, self.right, self.top]
    }

    /// Quadrilateral corners in the order viewers expect for `/QuadPoints`:
    /// upper-left, upper-right, lower-left, lower-right.
    pub fn quad_points(&self) -> [f32; 8] {
        [
            self.left, self.top, self.right, self.top, self.left, self.bottom, self.right,
            self.bottom,
        ]
    }
}

/// A PDF transformation matrix `[a b c d e f]`, applied to row vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Builds a matrix from a six-number operand list, as found in `cm`, `Tm`
    /// and a form's `/Matrix`.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        match values {
            [a, b, c, d, e, f] => Some(Self::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }

    /// `self × other`: the transform that applies `self` first, then `other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, x: f32, y: f32) -> Point {
        Point {
            x: self.a * x + self.c * y + self.e,
            y: self.b * x + self.d * y + self.f,
        }
    }

    /// Bounding box of `rect` after transformation.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.transform_point(rect.left, rect.bottom),
            self.transform_point(rect.right, rect.bottom),
            self.transform_point(rect.left, rect.top),
            self.transform_point(rect.right, rect.top),
        ];
        Rect::from_points(&corners).unwrap_or_default()
    }
}
