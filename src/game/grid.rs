use crate::consts;
use rand::Rng;
use ratatui::layout::Size;
use std::ops::{Add, AddAssign, Mul, Sub};

/// A point or displacement in continuous world coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Vec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Vec2 {
    pub(crate) const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub(crate) const fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    pub(crate) fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub(crate) fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Scale to unit length.  The zero vector stays zero.
    pub(crate) fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > f32::EPSILON {
            self * (1.0 / len)
        } else {
            Vec2::ZERO
        }
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
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A discrete grid coordinate.  Signed so that positions pushed out of
/// bounds (ghost snakes, magnetized food) still map to a well-defined cell.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Cell {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Cell {
    pub(crate) const fn new(x: i32, y: i32) -> Cell {
        Cell { x, y }
    }
}

/// The playing field: a `width × height` lattice of cells of side
/// [`consts::CELL`], with helpers for moving between continuous world
/// coordinates and cell coordinates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    width: u16,
    height: u16,
}

impl Grid {
    pub(crate) fn new(size: Size) -> Grid {
        Grid {
            width: size.width,
            height: size.height,
        }
    }

    pub(crate) fn width(self) -> u16 {
        self.width
    }

    pub(crate) fn height(self) -> u16 {
        self.height
    }

    pub(crate) fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// World coordinates of the center of `cell`
    pub(crate) fn cell_center(self, cell: Cell) -> Vec2 {
        Vec2::new(
            cell.x as f32 * consts::CELL + consts::CELL / 2.0,
            cell.y as f32 * consts::CELL + consts::CELL / 2.0,
        )
    }

    /// The cell containing the world point `p`
    pub(crate) fn cell_at(self, p: Vec2) -> Cell {
        Cell::new(
            (p.x / consts::CELL).floor() as i32,
            (p.y / consts::CELL).floor() as i32,
        )
    }

    pub(crate) fn contains(self, cell: Cell) -> bool {
        (0..i32::from(self.width)).contains(&cell.x) && (0..i32::from(self.height)).contains(&cell.y)
    }

    /// The cell at the center of the grid, where the snake starts
    pub(crate) fn center(self) -> Cell {
        Cell::new(i32::from(self.width / 2), i32::from(self.height / 2))
    }

    /// A uniformly random cell at least `margin` cells away from each edge
    pub(crate) fn random_cell<R: Rng>(self, rng: &mut R, margin: u16) -> Cell {
        let x = rng.random_range(i32::from(margin)..i32::from(self.width - margin));
        let y = rng.random_range(i32::from(margin)..i32::from(self.height - margin));
        Cell::new(x, y)
    }
}

/// Whether `point` keeps at least `min_dist` world units of clearance from
/// every position in `others`
pub(crate) fn clear_of<I>(point: Vec2, others: I, min_dist: f32) -> bool
where
    I: IntoIterator<Item = Vec2>,
{
    others.into_iter().all(|p| point.distance(p) >= min_dist)
}
