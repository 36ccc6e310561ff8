//! Shape recognition for touch and pointer strokes.
//!
//! Every sample of a stroke is recorded and the shape is decided when the
//! stroke ends:
//!
//! - find the point farthest from the origin. If it is within
//!   [`MIN_LINE_LEN`], the stroke is a tap.
//! - all points up to it must head the same way, or the stroke is a circle.
//! - find the point farthest from that one among the rest. If there is none,
//!   the stroke is a line.
//! - the way back must be straight and opposite to the way out, or the
//!   stroke is a circle.
//! - finally, a path that keeps a near-constant distance from its centroid
//!   is a circle, anything else went back and forth.

/// Motion shorter than this (in surface pixels) carries no direction.
pub const MIN_LINE_LEN: i32 = 15;
const MIN_LEN_SQUARED: i32 = MIN_LINE_LEN * MIN_LINE_LEN;

/// Samples kept per stroke. Later samples are dropped.
pub const MAX_POINTS: usize = 100;

// Resampling step of the circularity test.
const DENSIFY_STEP: f64 = 3.0;

const COS_22_5_DEG: f64 = 0.923_879_532_511_286_7;
const COS_67_5_DEG: f64 = 0.382_683_432_365_089_8;
const COS_112_5_DEG: f64 = -0.382_683_432_365_089_8;
const COS_157_5_DEG: f64 = -0.923_879_532_511_286_7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North = 0,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn opposite(self) -> Direction {
        Direction::ALL[(self as usize + 4) % 8]
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self == other.opposite()
    }

    /// Buckets a motion vector into one of eight compass directions, with
    /// north pointing up the surface. Short vectors have no direction.
    #[cfg(test)]
    pub fn from_vector(dx: i32, dy: i32) -> Option<Direction> {
        if dx * dx + dy * dy <= MIN_LEN_SQUARED {
            return None;
        }
        Some(Direction::bucket(dx, dy))
    }

    fn bucket(dx: i32, dy: i32) -> Direction {
        let len = f64::from(dx * dx + dy * dy).sqrt();
        let cos_phi = -f64::from(dy) / len;
        let east = dx > 0;
        if cos_phi > COS_22_5_DEG {
            Direction::North
        } else if cos_phi > COS_67_5_DEG {
            if east {
                Direction::NorthEast
            } else {
                Direction::NorthWest
            }
        } else if cos_phi > COS_112_5_DEG {
            if east {
                Direction::East
            } else {
                Direction::West
            }
        } else if cos_phi > COS_157_5_DEG {
            if east {
                Direction::SouthEast
            } else {
                Direction::SouthWest
            }
        } else {
            Direction::South
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    fn dist_sq(self, other: Point) -> i32 {
        let (dx, dy) = (other.x - self.x, other.y - self.y);
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Tap,
    LongTap,
    Line(Direction),
    BackAndForth(Direction),
    Circle,
}

/// Samples of the stroke in progress.
#[derive(Debug, Default)]
pub struct Gesture {
    points: Vec<Point>,
    overflowed: bool,
    moved: bool,
}

impl Gesture {
    pub fn new() -> Gesture {
        Gesture {
            points: Vec::with_capacity(MAX_POINTS),
            overflowed: false,
            moved: false,
        }
    }

    /// Begins a new stroke at `p`, discarding the previous one.
    pub fn start(&mut self, p: Point) {
        self.points.clear();
        self.points.push(p);
        self.overflowed = false;
        self.moved = false;
    }

    pub fn origin(&self) -> Option<Point> {
        self.points.first().copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Records a sample. Returns false once the buffer is full.
    pub fn push(&mut self, p: Point) -> bool {
        let origin = match self.origin() {
            Some(origin) => origin,
            None => return false,
        };
        if self.points.len() >= MAX_POINTS {
            if !self.overflowed {
                log::warn!("gesture buffer full, dropping samples");
                self.overflowed = true;
            }
            return false;
        }
        if origin.dist_sq(p) > MIN_LEN_SQUARED {
            self.moved = true;
        }
        self.points.push(p);
        true
    }

    /// Whether any sample so far left the tap radius. Cheaper than
    /// [`Gesture::classify`] and agrees with it on `Shape::Tap`.
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.overflowed = false;
        self.moved = false;
    }

    pub fn classify(&self) -> Shape {
        classify(&self.points)
    }
}

/// Index of the sample farthest from `points[from]`, ignoring those within
/// the tap radius.
fn farthest_point(points: &[Point], from: usize) -> Option<usize> {
    let origin = points[from];
    let mut max = MIN_LEN_SQUARED;
    let mut found = None;
    for (i, p) in points.iter().enumerate().skip(from + 1) {
        let dist = origin.dist_sq(*p);
        if dist > max {
            max = dist;
            found = Some(i);
        }
    }
    found
}

/// Checks that every sample in `from+1..end` far enough from `points[from]`
/// points within 90 degrees of `reference`.
fn is_line(points: &[Point], reference: (i32, i32), from: usize, end: usize) -> bool {
    let origin = points[from];
    points[from + 1..end]
        .iter()
        .filter(|p| origin.dist_sq(**p) >= MIN_LEN_SQUARED)
        .all(|p| {
            let (dx, dy) = (p.x - origin.x, p.y - origin.y);
            dx * reference.0 + dy * reference.1 >= 0
        })
}

/// True when the stroke stays at a near-constant distance from its centroid.
/// The path is resampled first so sparse samples on a straight stroke do not
/// look evenly spread.
fn is_circle(points: &[Point]) -> bool {
    let mut samples: Vec<(f64, f64)> = Vec::with_capacity(points.len() * 4);
    samples.push((f64::from(points[0].x), f64::from(points[0].y)));
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (dx, dy) = (f64::from(b.x - a.x), f64::from(b.y - a.y));
        let steps = ((dx * dx + dy * dy).sqrt() / DENSIFY_STEP).ceil().max(1.0) as u32;
        for step in 1..=steps {
            let t = f64::from(step) / f64::from(steps);
            samples.push((f64::from(a.x) + dx * t, f64::from(a.y) + dy * t));
        }
    }

    let n = samples.len() as f64;
    let cx = samples.iter().map(|s| s.0).sum::<f64>() / n;
    let cy = samples.iter().map(|s| s.1).sum::<f64>() / n;
    let (min, max) = samples
        .iter()
        .map(|(x, y)| (x - cx) * (x - cx) + (y - cy) * (y - cy))
        .fold((f64::MAX, 0.0f64), |(min, max), d| (min.min(d), max.max(d)));
    min * 16.0 > max
}

pub fn classify(points: &[Point]) -> Shape {
    if points.len() < 2 {
        return Shape::Tap;
    }
    let pf = match farthest_point(points, 0) {
        Some(pf) => pf,
        None => return Shape::Tap,
    };
    let out = (points[pf].x - points[0].x, points[pf].y - points[0].y);
    if !is_line(points, out, 0, pf) {
        return Shape::Circle;
    }
    let dir = Direction::bucket(out.0, out.1);

    let pfr = match farthest_point(points, pf) {
        Some(pfr) => pfr,
        None => return Shape::Line(dir),
    };
    let back = (points[pfr].x - points[pf].x, points[pfr].y - points[pf].y);
    if !is_line(points, back, pf, points.len() - 1) {
        return Shape::Circle;
    }
    if !dir.is_opposite(Direction::bucket(back.0, back.1)) {
        return Shape::Circle;
    }
    if is_circle(points) {
        return Shape::Circle;
    }
    Shape::BackAndForth(dir)
}
