use crate::config::Tuning;
use crate::consts;
use crate::game::direction::Direction;
use crate::game::grid::{Grid, Vec2};
use enum_map::{Enum, EnumMap};
use std::collections::VecDeque;

/// Timed behavioral modifiers that can be active on the snake.  Each is
/// independent; re-collecting an active one refreshes its timer instead of
/// stacking.
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum PowerKind {
    SpeedBoost,
    Shield,
    Magnet,
    Invincible,
    Ghost,
    DoublePoints,
}

impl PowerKind {
    /// Short name shown in the in-game power-up indicator bar
    pub(crate) fn label(self) -> &'static str {
        match self {
            PowerKind::SpeedBoost => "speed",
            PowerKind::Shield => "shield",
            PowerKind::Magnet => "magnet",
            PowerKind::Invincible => "invuln",
            PowerKind::Ghost => "ghost",
            PowerKind::DoublePoints => "2x",
        }
    }
}

/// One link of the snake.  Positions are continuous but stay cell-aligned
/// between move steps; the heading is the smoothed direction vector used for
/// drawing, not for grid movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Segment {
    pub(crate) pos: Vec2,
    pub(crate) heading: Vec2,
}

impl Segment {
    fn new(pos: Vec2, heading: Vec2) -> Segment {
        Segment { pos, heading }
    }
}

/// The snake: a head plus a chain of body segments, ordered head-first.
///
/// Grid movement is decoupled from the frame rate: an accumulator advances
/// by `dt * speed` each tick and the snake takes one discrete step whenever
/// it crosses 1.0, so a slow terminal affects animation smoothness but not
/// the cadence of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Snake {
    pub(super) head: Segment,
    pub(super) body: VecDeque<Segment>,
    /// Direction of the most recent grid step; direction changes are
    /// validated against this
    pub(super) committed: Direction,
    /// Latest accepted direction request, applied at the next grid step
    pub(super) requested: Direction,
    pub(super) speed: f32,
    growth_pending: u32,
    move_timer: f32,
    alive: bool,
    /// Remaining duration per active power; inactive powers hold `None`
    timers: EnumMap<PowerKind, Option<f32>>,
    tuning: Tuning,
}

impl Snake {
    pub(crate) fn new(start: Vec2, tuning: Tuning) -> Snake {
        Snake {
            head: Segment::new(start, Direction::East.unit()),
            body: VecDeque::new(),
            committed: Direction::East,
            requested: Direction::East,
            speed: tuning.initial_speed,
            growth_pending: consts::INITIAL_GROWTH,
            move_timer: 0.0,
            alive: true,
            timers: EnumMap::default(),
            tuning,
        }
    }

    /// Advance the snake by one frame: tick power timers, smooth headings,
    /// and take a grid step if the move accumulator comes due.  Returns the
    /// powers that expired this frame, already deactivated.
    pub(crate) fn update(&mut self, dt: f32) -> Vec<PowerKind> {
        if !self.alive {
            return Vec::new();
        }
        let expired = self.tick_powers(dt);

        self.head.heading = smooth(
            self.head.heading,
            self.requested.unit(),
            self.tuning.turn_rate,
        );

        self.move_timer += dt * self.speed;
        if self.move_timer >= 1.0 {
            self.move_timer = 0.0;
            self.step();
        }

        self.update_body_headings();
        expired
    }

    /// Take one discrete grid step in the latest accepted direction
    pub(super) fn step(&mut self) {
        self.committed = self.requested;
        let prev_head = self.head.pos;
        self.head.pos += self.committed.unit() * consts::CELL;

        // Position the tail vacates this step, where a queued segment grows in
        let vacated = self.body.back().map_or(prev_head, |seg| seg.pos);

        // Follow the leader: every segment moves to its predecessor's place
        for i in (1..self.body.len()).rev() {
            self.body[i].pos = self.body[i - 1].pos;
        }
        if let Some(first) = self.body.front_mut() {
            first.pos = prev_head;
        }

        if self.growth_pending > 0 {
            self.body
                .push_back(Segment::new(vacated, self.committed.unit()));
            self.growth_pending -= 1;
        }
    }

    fn update_body_headings(&mut self) {
        let mut leader = self.head.pos;
        for seg in &mut self.body {
            let target = (leader - seg.pos).normalized();
            if target != Vec2::ZERO {
                seg.heading = smooth(seg.heading, target, self.tuning.turn_rate);
            }
            leader = seg.pos;
        }
    }

    /// Request a direction change.  A request for the exact reverse of the
    /// committed direction is ignored, so the snake can never fold back onto
    /// its own neck in a single step.
    pub(crate) fn turn(&mut self, direction: Direction) {
        if direction != self.committed.reverse() {
            self.requested = direction;
        }
    }

    /// Queue `n` segments of growth, consumed one per grid step
    pub(crate) fn grow(&mut self, n: u32) {
        self.growth_pending += n;
    }

    pub(crate) fn length(&self) -> usize {
        1 + self.body.len()
    }

    /// Activate `kind` for `duration` seconds, refreshing the timer if it is
    /// already active
    pub(crate) fn add_power(&mut self, kind: PowerKind, duration: f32) {
        let fresh = self.timers[kind].is_none();
        self.timers[kind] = Some(duration);
        if kind == PowerKind::SpeedBoost && fresh {
            self.speed *= 1.5;
        }
    }

    /// Deactivate `kind` and revert its side effects.  A no-op if it is not
    /// active.
    pub(crate) fn remove_power(&mut self, kind: PowerKind) {
        if self.timers[kind].take().is_none() {
            return;
        }
        if kind == PowerKind::SpeedBoost {
            self.speed = self.baseline_speed();
        }
    }

    fn tick_powers(&mut self, dt: f32) -> Vec<PowerKind> {
        let mut expired = Vec::new();
        for (kind, timer) in &mut self.timers {
            if let Some(t) = timer {
                *t -= dt;
                if *t <= 0.0 {
                    expired.push(kind);
                }
            }
        }
        for &kind in &expired {
            self.remove_power(kind);
        }
        expired
    }

    pub(crate) fn has(&self, kind: PowerKind) -> bool {
        self.timers[kind].is_some()
    }

    /// Active powers with their remaining durations, in declaration order
    pub(crate) fn active_powers(&self) -> impl Iterator<Item = (PowerKind, f32)> + '_ {
        self.timers
            .iter()
            .filter_map(|(kind, timer)| timer.map(|t| (kind, t)))
    }

    /// The speed the snake should fall back to without a boost: the initial
    /// speed plus one increment per ten segments of length
    fn baseline_speed(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let tier = (self.length() / 10) as f32;
        (self.tuning.initial_speed + tier * self.tuning.speed_increment)
            .clamp(self.tuning.initial_speed, self.tuning.max_speed)
    }

    /// Raise the speed by one increment, saturating at the maximum.  Called
    /// by the session on the eating ramp.
    pub(crate) fn bump_speed(&mut self) {
        self.speed = (self.speed + self.tuning.speed_increment).min(self.tuning.max_speed);
    }

    /// Whether the head overlaps any body segment, within a tolerance
    /// slightly under one cell.  Always false while ghosting.
    pub(crate) fn self_collision(&self) -> bool {
        if self.has(PowerKind::Ghost) {
            return false;
        }
        let threshold = consts::CELL - self.tuning.collision_margin;
        self.body
            .iter()
            .any(|seg| seg.pos.distance(self.head.pos) < threshold)
    }

    /// Whether the head has left the grid.  Always false while ghosting.
    pub(crate) fn wall_collision(&self, grid: Grid) -> bool {
        if self.has(PowerKind::Ghost) {
            return false;
        }
        !grid.contains(grid.cell_at(self.head.pos))
    }

    /// While a magnet is active, drag each food position one fixed step
    /// along its unit vector toward the head.  Food outside the magnet
    /// radius is untouched.
    pub(crate) fn attract<'a, I>(&self, foods: I)
    where
        I: Iterator<Item = &'a mut Vec2>,
    {
        if !self.has(PowerKind::Magnet) {
            return;
        }
        let radius = self.tuning.magnet_radius * consts::CELL;
        for pos in foods {
            let delta = self.head.pos - *pos;
            let dist = delta.length();
            if dist > f32::EPSILON && dist < radius {
                *pos += delta * (self.tuning.magnet_step / dist);
            }
        }
    }

    /// Drop the head at `pos`, leaving the body where it is; the chain
    /// snaps back together over the following steps
    pub(crate) fn teleport(&mut self, pos: Vec2) {
        self.head.pos = pos;
    }

    pub(crate) fn die(&mut self) {
        self.alive = false;
    }

    pub(crate) fn alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn head_pos(&self) -> Vec2 {
        self.head.pos
    }

    pub(crate) fn speed(&self) -> f32 {
        self.speed
    }

    pub(crate) fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.body.iter()
    }

    /// Head-first positions of every segment, for clearance checks
    pub(crate) fn positions(&self) -> Vec<Vec2> {
        std::iter::once(self.head.pos)
            .chain(self.body.iter().map(|seg| seg.pos))
            .collect()
    }
}

/// Move `current` a fraction of the way toward `target` and re-normalize.
/// If the blend collapses to zero (opposite vectors), jump to the target.
fn smooth(current: Vec2, target: Vec2, rate: f32) -> Vec2 {
    let blended = (current + (target - current) * rate).normalized();
    if blended == Vec2::ZERO {
        target
    } else {
        blended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    fn snake() -> Snake {
        Snake::new(Vec2::new(110.0, 110.0), tuning())
    }

    /// Step the snake `n` times via the accumulator, one step per update
    fn run_steps(snake: &mut Snake, n: usize) {
        for _ in 0..n {
            snake.update(1.0 / snake.speed() + 1e-4);
        }
    }

    #[test]
    fn length_invariant_holds_across_growth() {
        let mut snake = snake();
        for _ in 0..10 {
            assert_eq!(snake.length(), 1 + snake.body.len());
            snake.update(0.05);
        }
        snake.grow(4);
        run_steps(&mut snake, 8);
        assert_eq!(snake.length(), 1 + snake.body.len());
    }

    #[test]
    fn grow_consumes_one_segment_per_step() {
        let mut snake = snake();
        run_steps(&mut snake, 4);
        let base = snake.length();
        snake.grow(3);
        assert_eq!(snake.length(), base, "growth must not be instantaneous");
        for i in 1..=3 {
            run_steps(&mut snake, 1);
            assert_eq!(snake.length(), base + i);
        }
        run_steps(&mut snake, 1);
        assert_eq!(snake.length(), base + 3);
    }

    #[test]
    fn initial_growth_fills_in_over_first_steps() {
        let mut snake = snake();
        assert_eq!(snake.length(), 1);
        run_steps(&mut snake, usize::try_from(consts::INITIAL_GROWTH).unwrap());
        assert_eq!(snake.length(), 1 + usize::try_from(consts::INITIAL_GROWTH).unwrap());
    }

    #[test]
    fn reversal_request_is_ignored() {
        let mut snake = snake();
        assert_eq!(snake.committed, Direction::East);
        snake.turn(Direction::West);
        assert_eq!(snake.requested, Direction::East);
        snake.turn(Direction::North);
        assert_eq!(snake.requested, Direction::North);
        // Still rejected relative to the committed direction, not the request
        snake.turn(Direction::West);
        assert_eq!(snake.requested, Direction::North);
        run_steps(&mut snake, 1);
        assert_eq!(snake.committed, Direction::North);
        snake.turn(Direction::West);
        assert_eq!(snake.requested, Direction::West);
    }

    #[test]
    fn committed_never_reverses_across_steps() {
        let mut snake = snake();
        let turns = [
            Direction::West,
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ];
        for &turn in &turns {
            let prev = snake.committed;
            snake.turn(turn);
            run_steps(&mut snake, 1);
            assert_ne!(snake.committed, prev.reverse());
        }
    }

    #[test]
    fn move_step_timing_follows_accumulator() {
        let mut snake = snake();
        let start = snake.head_pos();
        // Not enough accumulated movement for a step yet
        snake.update(0.5 / snake.speed());
        assert_eq!(snake.head_pos(), start);
        // Crossing 1.0 triggers exactly one step
        snake.update(0.6 / snake.speed());
        assert_eq!(snake.head_pos(), start + Vec2::new(consts::CELL, 0.0));
    }

    #[test]
    fn body_follows_the_leader() {
        let mut snake = snake();
        run_steps(&mut snake, 3);
        let head = snake.head_pos();
        let body: Vec<Vec2> = snake.segments().map(|seg| seg.pos).collect();
        assert_eq!(body.len(), 3);
        assert_eq!(body[0], head - Vec2::new(consts::CELL, 0.0));
        assert_eq!(body[1], head - Vec2::new(2.0 * consts::CELL, 0.0));
        assert_eq!(body[2], head - Vec2::new(3.0 * consts::CELL, 0.0));
    }

    #[test]
    fn add_power_refreshes_instead_of_stacking() {
        let mut snake = snake();
        let base = snake.speed();
        snake.add_power(PowerKind::SpeedBoost, 8.0);
        assert!((snake.speed() - base * 1.5).abs() < 1e-5);
        snake.add_power(PowerKind::SpeedBoost, 8.0);
        assert!(
            (snake.speed() - base * 1.5).abs() < 1e-5,
            "refresh must not stack the multiplier"
        );
    }

    #[test]
    fn speed_boost_expires_to_baseline() {
        let mut snake = snake();
        let base = snake.speed();
        snake.add_power(PowerKind::SpeedBoost, 8.0);
        let mut elapsed = 0.0;
        while elapsed < 8.5 {
            snake.update(0.1);
            elapsed += 0.1;
        }
        assert!(!snake.has(PowerKind::SpeedBoost));
        assert!((snake.speed() - base).abs() < 1e-5);
    }

    #[test]
    fn remove_power_is_idempotent() {
        let mut snake = snake();
        let before = snake.clone();
        snake.remove_power(PowerKind::Shield);
        assert_eq!(snake, before);
        snake.remove_power(PowerKind::SpeedBoost);
        assert_eq!(snake, before);
    }

    #[test]
    fn powers_are_independent() {
        let mut snake = snake();
        snake.add_power(PowerKind::Shield, 10.0);
        snake.add_power(PowerKind::Ghost, 2.0);
        let expired = snake.update(3.0);
        assert_eq!(expired, vec![PowerKind::Ghost]);
        assert!(snake.has(PowerKind::Shield));
        assert!(!snake.has(PowerKind::Ghost));
    }

    #[test]
    fn self_collision_detects_overlap() {
        let mut snake = snake();
        snake.grow(4);
        run_steps(&mut snake, 6);
        assert!(!snake.self_collision());
        // Fold the head onto the second body segment
        snake.head.pos = snake.body[1].pos;
        assert!(snake.self_collision());
    }

    #[test]
    fn ghost_suppresses_self_and_wall_collision() {
        let grid = Grid::new(ratatui::layout::Size::new(10, 10));
        let mut snake = snake();
        snake.grow(4);
        run_steps(&mut snake, 6);
        snake.head.pos = snake.body[1].pos;
        snake.add_power(PowerKind::Ghost, 12.0);
        assert!(!snake.self_collision());
        snake.head.pos = Vec2::new(-50.0, -50.0);
        assert!(!snake.wall_collision(grid));
        snake.remove_power(PowerKind::Ghost);
        assert!(snake.wall_collision(grid));
    }

    #[rstest]
    #[case(Vec2::new(105.0, 110.0), false)]
    #[case(Vec2::new(-1.0, 110.0), true)]
    #[case(Vec2::new(110.0, 1000.0), true)]
    fn wall_collision_uses_cell_bounds(#[case] pos: Vec2, #[case] hit: bool) {
        let grid = Grid::new(ratatui::layout::Size::new(38, 8));
        let mut snake = snake();
        snake.head.pos = pos;
        assert_eq!(snake.wall_collision(grid), hit);
    }

    #[test]
    fn magnet_pulls_food_within_radius_only() {
        let mut snake = snake();
        snake.add_power(PowerKind::Magnet, 12.0);
        let head = snake.head_pos();
        let mut near = head + Vec2::new(40.0, 0.0);
        let mut far = head + Vec2::new(1000.0, 0.0);
        let near_before = near.distance(head);
        snake.attract([&mut near, &mut far].into_iter());
        assert!(near.distance(head) < near_before);
        assert_eq!(far, head + Vec2::new(1000.0, 0.0));
    }

    #[test]
    fn magnet_requires_active_power() {
        let snake = snake();
        let head = snake.head_pos();
        let mut near = head + Vec2::new(40.0, 0.0);
        snake.attract([&mut near].into_iter());
        assert_eq!(near, head + Vec2::new(40.0, 0.0));
    }

    #[test]
    fn dead_snake_does_not_move() {
        let mut snake = snake();
        snake.die();
        let pos = snake.head_pos();
        snake.update(10.0);
        assert_eq!(snake.head_pos(), pos);
        assert!(!snake.alive());
    }

    #[test]
    fn bump_speed_saturates_at_max() {
        let mut snake = snake();
        for _ in 0..100 {
            snake.bump_speed();
        }
        assert!((snake.speed() - tuning().max_speed).abs() < 1e-5);
    }
}
