use crate::config::Tuning;
use crate::consts;
use crate::game::grid::{clear_of, Grid, Vec2};
use crate::game::obstacles::Obstacles;
use crate::game::snake::PowerKind;
use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    Rng,
};

/// The flavors of special food, each with its own rarity, point value, and
/// effect
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SpecialKind {
    Golden,
    Speed,
    Slow,
    Reverse,
    Shield,
    Magnet,
}

impl SpecialKind {
    pub(crate) const ALL: [SpecialKind; 6] = [
        SpecialKind::Golden,
        SpecialKind::Speed,
        SpecialKind::Slow,
        SpecialKind::Reverse,
        SpecialKind::Shield,
        SpecialKind::Magnet,
    ];

    /// Spawn weights, parallel to [`Self::ALL`].  These set rarity, nothing
    /// else.
    pub(crate) const WEIGHTS: [f32; 6] = [0.3, 0.15, 0.15, 0.1, 0.2, 0.1];

    /// Draw a kind from the weighted distribution
    pub(crate) fn sample<R: Rng>(rng: &mut R) -> SpecialKind {
        let dist = WeightedIndex::new(Self::WEIGHTS)
            .expect("special food weights should be valid");
        Self::ALL[dist.sample(rng)]
    }

    pub(crate) fn points(self) -> u32 {
        match self {
            SpecialKind::Golden => 50,
            SpecialKind::Speed | SpecialKind::Shield | SpecialKind::Magnet => 30,
            SpecialKind::Slow | SpecialKind::Reverse => 20,
        }
    }

    /// The timed power granted on eating, if any.  Golden food is points
    /// only; slow and reverse resolve to the neutral no-op effect.
    pub(crate) fn grant(self) -> Option<(PowerKind, f32)> {
        match self {
            SpecialKind::Speed => Some((PowerKind::SpeedBoost, 8.0)),
            SpecialKind::Shield => Some((PowerKind::Shield, 10.0)),
            SpecialKind::Magnet => Some((PowerKind::Magnet, 12.0)),
            SpecialKind::Golden | SpecialKind::Slow | SpecialKind::Reverse => None,
        }
    }
}

/// One food on the board
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Food {
    pub(crate) pos: Vec2,
    pub(crate) kind: FoodKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum FoodKind {
    /// Plain food: fixed value, never despawns
    Normal,
    /// Bonus food that disappears if not eaten within its lifetime
    Special { kind: SpecialKind, age: f32 },
}

impl Food {
    pub(crate) fn special(&self) -> Option<SpecialKind> {
        match self.kind {
            FoodKind::Normal => None,
            FoodKind::Special { kind, .. } => Some(kind),
        }
    }

    fn expired(&self, lifetime: f32) -> bool {
        match self.kind {
            FoodKind::Normal => false,
            FoodKind::Special { age, .. } => age >= lifetime,
        }
    }

    /// Whether the renderer should blink this food because it is about to
    /// despawn
    pub(crate) fn blinking(&self, lifetime: f32) -> bool {
        match self.kind {
            FoodKind::Normal => false,
            FoodKind::Special { age, .. } => lifetime - age < consts::BLINK_WINDOW,
        }
    }
}

/// All food on the board, normal and special
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Foods {
    pub(super) items: Vec<Food>,
    spawn_timer: f32,
    tuning: Tuning,
}

impl Foods {
    pub(crate) fn new(tuning: Tuning) -> Foods {
        Foods {
            items: Vec::new(),
            spawn_timer: 0.0,
            tuning,
        }
    }

    /// Age specials, drop the expired, and run the special-food spawn clock
    pub(crate) fn update<R: Rng>(
        &mut self,
        dt: f32,
        rng: &mut R,
        grid: Grid,
        snake: &[Vec2],
        pickups: &[Vec2],
        obstacles: &Obstacles,
    ) {
        for food in &mut self.items {
            if let FoodKind::Special { age, .. } = &mut food.kind {
                *age += dt;
            }
        }
        let lifetime = self.tuning.special_lifetime;
        self.items.retain(|food| !food.expired(lifetime));

        self.spawn_timer += dt;
        if self.spawn_timer >= self.tuning.special_interval
            && self.special_count() < consts::MAX_SPECIAL_FOOD
        {
            self.spawn_special(rng, grid, snake, pickups, obstacles);
            self.spawn_timer = 0.0;
        }
    }

    /// Place one normal food.  Returns `false` if no valid position was
    /// found within the attempt budget; the spawn is simply skipped.
    pub(crate) fn spawn_food<R: Rng>(
        &mut self,
        rng: &mut R,
        grid: Grid,
        snake: &[Vec2],
        pickups: &[Vec2],
        obstacles: &Obstacles,
    ) -> bool {
        let Some(pos) = self.place(
            rng,
            grid,
            consts::FOOD_SPAWN_ATTEMPTS,
            consts::FOOD_CLEARANCE * consts::CELL,
            snake,
            pickups,
            obstacles,
        ) else {
            return false;
        };
        self.items.push(Food {
            pos,
            kind: FoodKind::Normal,
        });
        true
    }

    fn spawn_special<R: Rng>(
        &mut self,
        rng: &mut R,
        grid: Grid,
        snake: &[Vec2],
        pickups: &[Vec2],
        obstacles: &Obstacles,
    ) -> bool {
        let kind = SpecialKind::sample(rng);
        let Some(pos) = self.place(
            rng,
            grid,
            consts::RARE_SPAWN_ATTEMPTS,
            consts::SPECIAL_CLEARANCE * consts::CELL,
            snake,
            pickups,
            obstacles,
        ) else {
            return false;
        };
        self.items.push(Food {
            pos,
            kind: FoodKind::Special { kind, age: 0.0 },
        });
        true
    }

    /// Rejection-sample a free cell center: at least `clearance` away from
    /// the snake, all existing food, and every pickup, and not on an
    /// obstacle
    fn place<R: Rng>(
        &self,
        rng: &mut R,
        grid: Grid,
        attempts: u32,
        clearance: f32,
        snake: &[Vec2],
        pickups: &[Vec2],
        obstacles: &Obstacles,
    ) -> Option<Vec2> {
        for _ in 0..attempts {
            let cell = grid.random_cell(rng, 1);
            if obstacles.occupies(grid, cell) {
                continue;
            }
            let pos = grid.cell_center(cell);
            if clear_of(pos, snake.iter().copied(), clearance)
                && clear_of(pos, pickups.iter().copied(), clearance)
                && clear_of(pos, self.items.iter().map(|f| f.pos), clearance)
            {
                return Some(pos);
            }
        }
        None
    }

    /// Remove and return every food within `radius` of `head`
    pub(crate) fn take_eaten(&mut self, head: Vec2, radius: f32) -> Vec<Food> {
        let (eaten, kept) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|food| food.pos.distance(head) < radius);
        self.items = kept;
        eaten
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Food> {
        self.items.iter()
    }

    pub(crate) fn positions(&self) -> Vec<Vec2> {
        self.items.iter().map(|food| food.pos).collect()
    }

    /// Mutable access to positions, for the magnet effect.  Attracted food
    /// may drift off cell centers; it is eaten by distance, not by cell.
    pub(crate) fn positions_mut(&mut self) -> impl Iterator<Item = &mut Vec2> {
        self.items.iter_mut().map(|food| &mut food.pos)
    }

    pub(crate) fn special_count(&self) -> usize {
        self.items
            .iter()
            .filter(|food| food.special().is_some())
            .count()
    }

    pub(crate) fn lifetime(&self) -> f32 {
        self.tuning.special_lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::layout::Size;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn grid() -> Grid {
        Grid::new(Size::new(38, 8))
    }

    fn no_obstacles() -> Obstacles {
        Obstacles::empty()
    }

    #[test]
    fn spawn_keeps_clearance() {
        let grid = grid();
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let obstacles = no_obstacles();
        let snake = vec![grid.cell_center(grid.center())];
        let mut foods = Foods::new(Tuning::default());
        for _ in 0..20 {
            foods.spawn_food(&mut rng, grid, &snake, &[], &obstacles);
        }
        let clearance = consts::FOOD_CLEARANCE * consts::CELL;
        for (i, food) in foods.iter().enumerate() {
            assert!(food.pos.distance(snake[0]) >= clearance);
            for (j, other) in foods.iter().enumerate() {
                if i != j {
                    assert!(
                        food.pos.distance(other.pos) >= clearance,
                        "food {i} and {j} too close"
                    );
                }
            }
        }
    }

    #[test]
    fn spawn_avoids_obstacles() {
        let grid = grid();
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let obstacles = Obstacles::generate(&mut rng, grid, Options::default());
        let mut foods = Foods::new(Tuning::default());
        for _ in 0..30 {
            foods.spawn_food(&mut rng, grid, &[], &[], &obstacles);
        }
        for food in foods.iter() {
            assert!(!obstacles.occupies(grid, grid.cell_at(food.pos)));
        }
    }

    #[test]
    fn spawn_gives_up_silently_when_crowded() {
        // A snake segment on every cell leaves nowhere to spawn
        let grid = grid();
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let obstacles = no_obstacles();
        let mut snake = Vec::new();
        for x in 0..38 {
            for y in 0..8 {
                snake.push(grid.cell_center(crate::game::grid::Cell::new(x, y)));
            }
        }
        let mut foods = Foods::new(Tuning::default());
        assert!(!foods.spawn_food(&mut rng, grid, &snake, &[], &obstacles));
        assert_eq!(foods.iter().count(), 0);
    }

    #[test]
    fn specials_expire_and_are_removed() {
        // Keep the spawn clock out of the picture
        let tuning = Tuning {
            special_interval: 1000.0,
            ..Tuning::default()
        };
        let mut foods = Foods::new(tuning);
        foods.items.push(Food {
            pos: Vec2::new(50.0, 50.0),
            kind: FoodKind::Special {
                kind: SpecialKind::Golden,
                age: 0.0,
            },
        });
        let grid = grid();
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let obstacles = no_obstacles();
        // Just under the lifetime: still present and blinking
        foods.update(
            tuning.special_lifetime - 0.5,
            &mut rng,
            grid,
            &[],
            &[],
            &obstacles,
        );
        assert_eq!(foods.special_count(), 1);
        assert!(foods.iter().next().unwrap().blinking(tuning.special_lifetime));
        // Past the lifetime: removed immediately
        foods.update(1.0, &mut rng, grid, &[], &[], &obstacles);
        assert_eq!(foods.special_count(), 0);
    }

    #[test]
    fn spawn_clock_caps_specials() {
        let tuning = Tuning::default();
        let grid = grid();
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let obstacles = no_obstacles();
        let mut foods = Foods::new(tuning);
        // Many spawn intervals with a lifetime short enough to matter
        for _ in 0..40 {
            foods.update(tuning.special_interval, &mut rng, grid, &[], &[], &obstacles);
            assert!(foods.special_count() <= consts::MAX_SPECIAL_FOOD);
        }
    }

    #[test]
    fn take_eaten_partitions_by_distance() {
        let mut foods = Foods::new(Tuning::default());
        let near = Vec2::new(100.0, 100.0);
        let far = Vec2::new(300.0, 300.0);
        foods.items.push(Food {
            pos: near,
            kind: FoodKind::Normal,
        });
        foods.items.push(Food {
            pos: far,
            kind: FoodKind::Normal,
        });
        let eaten = foods.take_eaten(Vec2::new(104.0, 100.0), 16.0);
        assert_eq!(eaten.len(), 1);
        assert_eq!(eaten[0].pos, near);
        assert_eq!(foods.positions(), vec![far]);
    }

    #[test]
    fn weighted_kinds_approximate_configured_ratios() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        const DRAWS: usize = 10_000;
        let mut counts = [0usize; SpecialKind::ALL.len()];
        for _ in 0..DRAWS {
            let kind = SpecialKind::sample(&mut rng);
            let i = SpecialKind::ALL.iter().position(|&k| k == kind).unwrap();
            counts[i] += 1;
        }
        #[allow(clippy::cast_precision_loss)]
        for (i, &count) in counts.iter().enumerate() {
            let expected = SpecialKind::WEIGHTS[i] as f64;
            let actual = count as f64 / DRAWS as f64;
            assert!(
                (actual - expected).abs() < 0.03,
                "kind {:?}: expected ratio {expected}, got {actual}",
                SpecialKind::ALL[i]
            );
        }
    }

    #[test]
    fn grants_match_kinds() {
        assert_eq!(
            SpecialKind::Speed.grant(),
            Some((PowerKind::SpeedBoost, 8.0))
        );
        assert_eq!(SpecialKind::Shield.grant(), Some((PowerKind::Shield, 10.0)));
        assert_eq!(SpecialKind::Magnet.grant(), Some((PowerKind::Magnet, 12.0)));
        assert_eq!(SpecialKind::Golden.grant(), None);
        assert_eq!(SpecialKind::Slow.grant(), None);
        assert_eq!(SpecialKind::Reverse.grant(), None);
    }
}
