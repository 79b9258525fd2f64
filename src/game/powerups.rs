use crate::config::Tuning;
use crate::consts;
use crate::game::grid::{clear_of, Grid, Vec2};
use crate::game::obstacles::Obstacles;
use crate::game::snake::PowerKind;
use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    Rng,
};

/// The power-up pickups that can appear on the board
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PickupKind {
    DoublePoints,
    Invincible,
    Teleport,
    Ghost,
    Bomb,
}

impl PickupKind {
    pub(crate) const ALL: [PickupKind; 5] = [
        PickupKind::DoublePoints,
        PickupKind::Invincible,
        PickupKind::Teleport,
        PickupKind::Ghost,
        PickupKind::Bomb,
    ];

    /// Spawn weights, parallel to [`Self::ALL`]
    pub(crate) const WEIGHTS: [f32; 5] = [0.3, 0.25, 0.15, 0.2, 0.1];

    pub(crate) fn sample<R: Rng>(rng: &mut R) -> PickupKind {
        let dist = WeightedIndex::new(Self::WEIGHTS).expect("power-up weights should be valid");
        Self::ALL[dist.sample(rng)]
    }

    /// What collecting this pickup does.  The table is total: every kind has
    /// a well-defined effect, so there is no lookup-miss path.
    pub(crate) fn effect(self) -> Effect {
        match self {
            PickupKind::DoublePoints => Effect {
                duration: 10.0,
                action: EffectAction::Timed(PowerKind::DoublePoints),
            },
            PickupKind::Invincible => Effect {
                duration: 8.0,
                action: EffectAction::Timed(PowerKind::Invincible),
            },
            PickupKind::Teleport => Effect {
                duration: 0.0,
                action: EffectAction::Teleport,
            },
            PickupKind::Ghost => Effect {
                duration: 12.0,
                action: EffectAction::Timed(PowerKind::Ghost),
            },
            PickupKind::Bomb => Effect {
                duration: 0.0,
                action: EffectAction::Bomb {
                    radius: consts::CELL * 3.0,
                },
            },
        }
    }
}

/// The resolved effect of a pickup: either a timed power on the snake or an
/// instantaneous action
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Effect {
    /// Seconds the granted power lasts; zero for instant effects
    pub(crate) duration: f32,
    pub(crate) action: EffectAction,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum EffectAction {
    Timed(PowerKind),
    Teleport,
    Bomb { radius: f32 },
}

/// One pickup on the board, counting down to despawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PowerUp {
    pub(crate) pos: Vec2,
    pub(crate) kind: PickupKind,
    pub(super) age: f32,
}

impl PowerUp {
    fn expired(&self, lifetime: f32) -> bool {
        self.age >= lifetime
    }

    pub(crate) fn blinking(&self, lifetime: f32) -> bool {
        lifetime - self.age < consts::BLINK_WINDOW
    }
}

/// All power-up pickups on the board
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PowerUps {
    pub(super) items: Vec<PowerUp>,
    spawn_timer: f32,
    tuning: Tuning,
}

impl PowerUps {
    pub(crate) fn new(tuning: Tuning) -> PowerUps {
        PowerUps {
            items: Vec::new(),
            spawn_timer: 0.0,
            tuning,
        }
    }

    /// Age pickups, drop the expired, and run the spawn clock
    pub(crate) fn update<R: Rng>(
        &mut self,
        dt: f32,
        rng: &mut R,
        grid: Grid,
        snake: &[Vec2],
        foods: &[Vec2],
        obstacles: &Obstacles,
    ) {
        for pickup in &mut self.items {
            pickup.age += dt;
        }
        let lifetime = self.tuning.powerup_lifetime;
        self.items.retain(|pickup| !pickup.expired(lifetime));

        self.spawn_timer += dt;
        if self.spawn_timer >= self.tuning.powerup_interval
            && self.items.len() < consts::MAX_POWERUPS
        {
            self.spawn(rng, grid, snake, foods, obstacles);
            self.spawn_timer = 0.0;
        }
    }

    /// Place one pickup of a weighted-random kind.  Silently skipped when no
    /// clear position turns up within the attempt budget.
    fn spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        grid: Grid,
        snake: &[Vec2],
        foods: &[Vec2],
        obstacles: &Obstacles,
    ) -> bool {
        let kind = PickupKind::sample(rng);
        let snake_clearance = consts::POWERUP_CLEARANCE * consts::CELL;
        let entity_clearance = consts::SPECIAL_CLEARANCE * consts::CELL;
        for _ in 0..consts::RARE_SPAWN_ATTEMPTS {
            let cell = grid.random_cell(rng, 1);
            if obstacles.occupies(grid, cell) {
                continue;
            }
            let pos = grid.cell_center(cell);
            if clear_of(pos, snake.iter().copied(), snake_clearance)
                && clear_of(pos, foods.iter().copied(), entity_clearance)
                && clear_of(pos, self.items.iter().map(|p| p.pos), entity_clearance)
            {
                self.items.push(PowerUp {
                    pos,
                    kind,
                    age: 0.0,
                });
                return true;
            }
        }
        false
    }

    /// Remove and return every pickup within `radius` of `head`
    pub(crate) fn take_collected(&mut self, head: Vec2, radius: f32) -> Vec<PowerUp> {
        let (collected, kept) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|pickup| pickup.pos.distance(head) < radius);
        self.items = kept;
        collected
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.items.iter()
    }

    pub(crate) fn positions(&self) -> Vec<Vec2> {
        self.items.iter().map(|pickup| pickup.pos).collect()
    }

    pub(crate) fn lifetime(&self) -> f32 {
        self.tuning.powerup_lifetime
    }
}
