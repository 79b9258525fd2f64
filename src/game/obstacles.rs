use crate::consts;
use crate::game::grid::{Cell, Grid, Vec2};
use crate::options::Options;
use rand::Rng;
use std::collections::VecDeque;

/// What kind of obstacle a collision query ran into
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ObstacleClass {
    Wall,
    Spike,
    Patrol,
}

/// A hazard on the board.  Static obstacles are immutable once generated,
/// apart from the `active` flag; patrols oscillate between two waypoints.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Obstacle {
    pub(crate) kind: ObstacleKind,
    pub(crate) active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ObstacleKind {
    Wall { cell: Cell },
    Spike { cell: Cell },
    Patrol(Patrol),
}

/// A moving obstacle ping-ponging along the line from `start` to `end`.
/// `progress` stays in `[0, 1]` and `heading` flips sign exactly at the
/// bounds, so the patrol never overshoots its waypoints.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Patrol {
    start: Vec2,
    end: Vec2,
    speed: f32,
    progress: f32,
    heading: f32,
    /// Recent positions, oldest first.  Purely cosmetic; collision queries
    /// only ever see the current position.
    trail: VecDeque<Vec2>,
}

impl Patrol {
    pub(crate) fn new(start: Vec2, end: Vec2, speed: f32) -> Patrol {
        Patrol {
            start,
            end,
            speed,
            progress: 0.0,
            heading: 1.0,
            trail: VecDeque::new(),
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.start + (self.end - self.start) * self.progress
    }

    pub(crate) fn trail(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.trail.iter().copied()
    }

    fn update(&mut self, dt: f32) {
        self.progress += self.heading * self.speed * dt;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.heading = -1.0;
        } else if self.progress <= 0.0 {
            self.progress = 0.0;
            self.heading = 1.0;
        }
        self.trail.push_back(self.position());
        while self.trail.len() > consts::TRAIL_LEN {
            let _ = self.trail.pop_front();
        }
    }
}

impl Obstacle {
    pub(crate) fn class(&self) -> ObstacleClass {
        match self.kind {
            ObstacleKind::Wall { .. } => ObstacleClass::Wall,
            ObstacleKind::Spike { .. } => ObstacleClass::Spike,
            ObstacleKind::Patrol(_) => ObstacleClass::Patrol,
        }
    }

    pub(crate) fn position(&self, grid: Grid) -> Vec2 {
        match &self.kind {
            ObstacleKind::Wall { cell } | ObstacleKind::Spike { cell } => grid.cell_center(*cell),
            ObstacleKind::Patrol(patrol) => patrol.position(),
        }
    }
}

/// Every obstacle on the board: the border ring, random interior hazards,
/// and patrols
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Obstacles {
    items: Vec<Obstacle>,
}

impl Obstacles {
    #[cfg(test)]
    pub(crate) fn empty() -> Obstacles {
        Obstacles { items: Vec::new() }
    }

    /// Lay out a level: a wall ring around the border, 8–15 interior
    /// obstacles when enabled, and 2–4 patrols when enabled.  Nothing is
    /// placed within [`consts::START_CLEARANCE`] cells of the snake start.
    pub(crate) fn generate<R: Rng>(rng: &mut R, grid: Grid, options: Options) -> Obstacles {
        let mut items = Vec::new();
        let w = i32::from(grid.width());
        let h = i32::from(grid.height());

        for x in 0..w {
            items.push(wall(Cell::new(x, 0)));
            items.push(wall(Cell::new(x, h - 1)));
        }
        for y in 1..h - 1 {
            items.push(wall(Cell::new(0, y)));
            items.push(wall(Cell::new(w - 1, y)));
        }

        let start = grid.center();
        let far_enough = |cell: Cell| {
            let dx = (cell.x - start.x).abs();
            let dy = (cell.y - start.y).abs();
            #[allow(clippy::cast_precision_loss)]
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            dist >= consts::START_CLEARANCE
        };

        if options.obstacles {
            let count = rng.random_range(8..=15);
            for _ in 0..count {
                let cell = Cell::new(rng.random_range(2..w - 2), rng.random_range(2..h - 2));
                if !far_enough(cell) {
                    continue;
                }
                let kind = if rng.random_bool(0.5) {
                    ObstacleKind::Wall { cell }
                } else {
                    ObstacleKind::Spike { cell }
                };
                items.push(Obstacle { kind, active: true });
            }
        }

        if options.moving_obstacles {
            let count = rng.random_range(2..=4);
            for _ in 0..count {
                let sx = rng.random_range(3..w - 3);
                let sy = rng.random_range(3..h - 3);
                if !far_enough(Cell::new(sx, sy)) {
                    continue;
                }
                let offsets = [-2, 0, 2];
                let ex = (sx + offsets[rng.random_range(0..3)]).clamp(2, w - 3);
                let ey = (sy + offsets[rng.random_range(0..3)]).clamp(2, h - 3);
                let patrol = Patrol::new(
                    grid.cell_center(Cell::new(sx, sy)),
                    grid.cell_center(Cell::new(ex, ey)),
                    rng.random_range(1.0..3.0),
                );
                items.push(Obstacle {
                    kind: ObstacleKind::Patrol(patrol),
                    active: true,
                });
            }
        }

        Obstacles { items }
    }

    pub(crate) fn update(&mut self, dt: f32) {
        for obstacle in &mut self.items {
            if let ObstacleKind::Patrol(patrol) = &mut obstacle.kind {
                patrol.update(dt);
            }
        }
    }

    /// The kind of obstacle overlapping `point` within `radius`, if any.
    /// Ghost callers always get `None`, whatever the actual overlap.
    pub(crate) fn hit(
        &self,
        grid: Grid,
        point: Vec2,
        radius: f32,
        ghost: bool,
    ) -> Option<ObstacleClass> {
        if ghost {
            return None;
        }
        self.items
            .iter()
            .filter(|o| o.active)
            .find(|o| o.position(grid).distance(point) < radius + consts::CELL * 0.5)
            .map(Obstacle::class)
    }

    /// Whether any active obstacle currently sits on `cell`
    pub(crate) fn occupies(&self, grid: Grid, cell: Cell) -> bool {
        self.items
            .iter()
            .filter(|o| o.active)
            .any(|o| grid.cell_at(o.position(grid)) == cell)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.items.iter().filter(|o| o.active)
    }
}

fn wall(cell: Cell) -> Obstacle {
    Obstacle {
        kind: ObstacleKind::Wall { cell },
        active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::layout::Size;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn grid() -> Grid {
        Grid::new(Size::new(38, 8))
    }

    #[test]
    fn generate_rings_the_border() {
        let grid = grid();
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let obstacles = Obstacles::generate(&mut rng, grid, Options::default());
        for x in 0..38 {
            assert!(obstacles.occupies(grid, Cell::new(x, 0)));
            assert!(obstacles.occupies(grid, Cell::new(x, 7)));
        }
        for y in 0..8 {
            assert!(obstacles.occupies(grid, Cell::new(0, y)));
            assert!(obstacles.occupies(grid, Cell::new(37, y)));
        }
    }

    #[test]
    fn generate_respects_start_clearance() {
        let grid = grid();
        let start = grid.center();
        for seed in 0..20 {
            let mut rng = ChaCha12Rng::seed_from_u64(seed);
            let obstacles = Obstacles::generate(&mut rng, grid, Options::default());
            for obstacle in obstacles.iter() {
                if let ObstacleKind::Wall { cell } | ObstacleKind::Spike { cell } = obstacle.kind {
                    if cell.x == 0 || cell.x == 37 || cell.y == 0 || cell.y == 7 {
                        continue; // border ring
                    }
                    let dx = cell.x - start.x;
                    let dy = cell.y - start.y;
                    assert!(
                        dx * dx + dy * dy >= 9,
                        "obstacle at {cell:?} crowds the start (seed {seed})"
                    );
                }
            }
        }
    }

    #[test]
    fn generate_without_hazards() {
        let grid = grid();
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let options = Options {
            obstacles: false,
            moving_obstacles: false,
            ..Options::default()
        };
        let obstacles = Obstacles::generate(&mut rng, grid, options);
        // Border ring only: 2*38 + 2*6 walls
        assert_eq!(obstacles.iter().count(), 88);
        assert!(obstacles
            .iter()
            .all(|o| o.class() == ObstacleClass::Wall));
    }

    #[test]
    fn patrol_ping_pongs_without_overshoot() {
        let start = Vec2::new(50.0, 50.0);
        let end = Vec2::new(90.0, 50.0);
        let mut patrol = Patrol::new(start, end, 1.0);
        // One full second forward lands exactly on the end waypoint
        for _ in 0..10 {
            patrol.update(0.1);
        }
        assert!((patrol.position().x - 90.0).abs() < 1e-3);
        // The next update moves backwards
        patrol.update(0.1);
        assert!(patrol.position().x < 90.0);
        // Long ticks clamp at the bounds rather than overshooting
        patrol.update(5.0);
        assert_eq!(patrol.position(), start);
        patrol.update(5.0);
        assert_eq!(patrol.position(), end);
    }

    #[test]
    fn patrol_trail_is_bounded() {
        let mut patrol = Patrol::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 0.5);
        for _ in 0..50 {
            patrol.update(0.05);
        }
        assert_eq!(patrol.trail().count(), consts::TRAIL_LEN);
    }

    #[test]
    fn hit_matches_by_distance() {
        let grid = grid();
        let cell = Cell::new(5, 5);
        let obstacles = Obstacles {
            items: vec![Obstacle {
                kind: ObstacleKind::Spike { cell },
                active: true,
            }],
        };
        let center = grid.cell_center(cell);
        assert_eq!(
            obstacles.hit(grid, center, consts::CELL * 0.5, false),
            Some(ObstacleClass::Spike)
        );
        let far = center + Vec2::new(consts::CELL * 2.0, 0.0);
        assert_eq!(obstacles.hit(grid, far, consts::CELL * 0.5, false), None);
    }

    #[test]
    fn ghost_always_gets_null_result() {
        let grid = grid();
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let obstacles = Obstacles::generate(&mut rng, grid, Options::default());
        let on_wall = grid.cell_center(Cell::new(0, 0));
        assert!(obstacles.hit(grid, on_wall, consts::CELL, false).is_some());
        assert_eq!(obstacles.hit(grid, on_wall, consts::CELL, true), None);
    }

    #[test]
    fn inactive_obstacles_do_not_collide() {
        let grid = grid();
        let cell = Cell::new(5, 5);
        let obstacles = Obstacles {
            items: vec![Obstacle {
                kind: ObstacleKind::Wall { cell },
                active: false,
            }],
        };
        let center = grid.cell_center(cell);
        assert_eq!(obstacles.hit(grid, center, consts::CELL, false), None);
        assert!(!obstacles.occupies(grid, cell));
    }
}
