pub(crate) mod direction;
pub(crate) mod food;
pub(crate) mod grid;
pub(crate) mod obstacles;
mod paused;
pub(crate) mod powerups;
pub(crate) mod snake;
use self::direction::Direction;
use self::food::Foods;
use self::grid::{Cell, Grid, Vec2};
use self::obstacles::{ObstacleClass, ObstacleKind, Obstacles};
use self::paused::{PauseOpt, Paused};
use self::powerups::{EffectAction, PowerUps};
use self::snake::{PowerKind, Snake};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::events::GameEvent;
use crate::highscores::Best;
use crate::score::ScoreBoard;
use crate::util::{center_rect, get_display_area, Globals};
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::io;
use std::time::Instant;

/// One play session: the snake, every entity registry, the score, and the
/// per-tick orchestration that ties them together.
///
/// Each rendered frame drives exactly one simulation tick.  The tick runs
/// synchronously in a fixed order — snake, entity registries, interaction
/// resolution, score — so no two stages ever see half-updated state.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    rng: R,
    globals: Globals,
    grid: Grid,
    snake: Snake,
    foods: Foods,
    obstacles: Obstacles,
    powerups: PowerUps,
    score: ScoreBoard,
    high: Option<Best>,
    events: Vec<GameEvent>,
    state: GameState,
    cause: Option<Hazard>,
    new_best: bool,
    save_notice: Option<String>,
    next_frame: Option<Instant>,
    last_frame: Option<Instant>,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(globals: Globals) -> Self {
        Game::new_with_rng(globals, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(globals: Globals, mut rng: R) -> Game<R> {
        let grid = Grid::new(globals.options.level_size.as_size());
        let tuning = globals.tuning;
        let snake = Snake::new(grid.cell_center(grid.center()), tuning);
        let obstacles = Obstacles::generate(&mut rng, grid, globals.options);
        let mut foods = Foods::new(tuning);
        let snake_positions = snake.positions();
        for _ in 0..globals.options.fruits.get() {
            foods.spawn_food(&mut rng, grid, &snake_positions, &[], &obstacles);
        }
        let high = globals.high_scores.get(globals.options);
        Game {
            rng,
            globals,
            grid,
            snake,
            foods,
            obstacles,
            powerups: PowerUps::new(tuning),
            score: ScoreBoard::new(),
            high,
            events: Vec::new(),
            state: GameState::Running,
            cause: None,
            new_best: false,
            save_notice: None,
            next_frame: None,
            last_frame: None,
        }
    }

    /// Wait for input until the next frame deadline; when the deadline
    /// passes first, run one simulation tick with the measured `dt`
    pub(crate) fn process_input(&mut self) -> io::Result<Option<Screen>> {
        if self.running() {
            let now = Instant::now();
            let deadline = *self
                .next_frame
                .get_or_insert_with(|| now + consts::FRAME_PERIOD);
            let wait = deadline.saturating_duration_since(now);
            if wait.is_zero() || !poll(wait)? {
                let dt = match self.last_frame {
                    Some(prev) => prev.elapsed().as_secs_f32().min(consts::MAX_FRAME_DT),
                    None => consts::FRAME_PERIOD.as_secs_f32(),
                };
                self.last_frame = Some(Instant::now());
                self.next_frame = None;
                self.advance(dt);
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            self.last_frame = None;
            Ok(self.handle_event(read()?))
        }
    }

    /// One simulation tick
    fn advance(&mut self, dt: f32) {
        if !self.running() || !self.snake.alive() {
            return;
        }

        for kind in self.snake.update(dt) {
            self.power_expired(kind);
        }
        self.snake.attract(self.foods.positions_mut());

        let snake_positions = self.snake.positions();
        let pickup_positions = self.powerups.positions();
        self.foods.update(
            dt,
            &mut self.rng,
            self.grid,
            &snake_positions,
            &pickup_positions,
            &self.obstacles,
        );
        self.obstacles.update(dt);
        let food_positions = self.foods.positions();
        self.powerups.update(
            dt,
            &mut self.rng,
            self.grid,
            &snake_positions,
            &food_positions,
            &self.obstacles,
        );

        self.resolve_interactions();
        self.score.update(dt);
    }

    /// Detect and resolve every snake/entity interaction for this tick, in
    /// a fixed order: food, power-ups, obstacles, self, wall.  The order
    /// matters — a shield has to absorb an obstacle hit before the wall
    /// check gets a chance to end the game.
    fn resolve_interactions(&mut self) {
        let head = self.snake.head_pos();
        let radius = self.globals.tuning.eat_radius * consts::CELL;
        let snake_positions = self.snake.positions();

        for eaten in self.foods.take_eaten(head, radius) {
            self.snake.grow(1);
            let special = eaten.special();
            let scored = self.score.add_food_score(special);
            if let Some(level) = scored.new_level {
                self.events.push(GameEvent::LeveledUp(level));
            }
            match special {
                None => {
                    self.events.push(GameEvent::AteFood);
                    let pickup_positions = self.powerups.positions();
                    self.foods.spawn_food(
                        &mut self.rng,
                        self.grid,
                        &snake_positions,
                        &pickup_positions,
                        &self.obstacles,
                    );
                    if self.snake.length() % 5 == 0 {
                        self.snake.bump_speed();
                    }
                }
                Some(kind) => {
                    self.events.push(GameEvent::AteSpecial(kind));
                    if let Some((power, duration)) = kind.grant() {
                        self.apply_power(power, duration);
                    }
                }
            }
        }

        for pickup in self.powerups.take_collected(head, radius) {
            self.events.push(GameEvent::CollectedPowerUp(pickup.kind));
            let effect = pickup.kind.effect();
            match effect.action {
                EffectAction::Timed(power) => self.apply_power(power, effect.duration),
                EffectAction::Teleport => self.teleport(),
                EffectAction::Bomb { radius } => {
                    // Obstacle destruction is deliberately not wired up; the
                    // blast is presentation-only for now.
                    self.events.push(GameEvent::BombDetonated {
                        center: head,
                        radius,
                    });
                }
            }
        }

        if !self.snake.has(PowerKind::Invincible) {
            let ghost = self.snake.has(PowerKind::Ghost);
            if let Some(class) =
                self.obstacles
                    .hit(self.grid, self.snake.head_pos(), consts::CELL * 0.5, ghost)
            {
                self.fatal(Hazard::Obstacle(class));
            }
            if self.snake.alive() && self.snake.self_collision() {
                self.fatal(Hazard::SelfBite);
            }
        }
        if self.snake.alive() && self.snake.wall_collision(self.grid) {
            self.fatal(Hazard::OutOfBounds);
        }
    }

    /// Resolve an otherwise-fatal collision.  An active shield is consumed
    /// to absorb it; otherwise the session ends here.
    fn fatal(&mut self, hazard: Hazard) {
        self.score.break_combo();
        if self.snake.has(PowerKind::Shield) {
            self.snake.remove_power(PowerKind::Shield);
            self.events.push(GameEvent::Collided { absorbed: true });
            return;
        }
        self.snake.die();
        self.cause = Some(hazard);
        self.state = GameState::Dead;
        self.events.push(GameEvent::Collided { absorbed: false });
        self.events.push(GameEvent::GameOver);
        self.new_best =
            self.globals
                .high_scores
                .record(self.globals.options, self.score.score(), self.score.level());
        if self.new_best {
            self.save_notice = self.globals.high_scores.save().err().map(|e| e.to_string());
        }
    }

    fn apply_power(&mut self, kind: PowerKind, duration: f32) {
        self.snake.add_power(kind, duration);
        if kind == PowerKind::DoublePoints {
            self.score.set_multiplier(2.0);
        }
    }

    fn power_expired(&mut self, kind: PowerKind) {
        if kind == PowerKind::DoublePoints {
            self.score.set_multiplier(1.0);
        }
    }

    /// Drop the head on a random free cell, away from the edges
    fn teleport(&mut self) {
        for _ in 0..consts::TELEPORT_ATTEMPTS {
            let cell = self.grid.random_cell(&mut self.rng, 2);
            if self.obstacles.occupies(self.grid, cell) {
                continue;
            }
            let pos = self.grid.cell_center(cell);
            let clear = self
                .snake
                .segments()
                .all(|seg| seg.pos.distance(pos) >= consts::CELL);
            if clear {
                self.snake.teleport(pos);
                return;
            }
        }
        // No free cell found: the teleport fizzles
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn globals(&self) -> &Globals {
        &self.globals
    }

    pub(crate) fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        match self.state {
            GameState::Running => {
                if event == Event::FocusLost {
                    self.pause();
                } else {
                    match Command::from_key_event(event.as_key_press_event()?)? {
                        Command::Quit => return Some(Screen::Quit),
                        Command::Up => self.snake.turn(Direction::North),
                        Command::Left => self.snake.turn(Direction::West),
                        Command::Down => self.snake.turn(Direction::South),
                        Command::Right => self.snake.turn(Direction::East),
                        Command::Esc => self.pause(),
                        _ => (),
                    }
                }
            }
            GameState::Paused(ref mut paused) => match paused.handle_event(event)? {
                PauseOpt::Resume => self.state = GameState::Running,
                PauseOpt::Restart => return Some(Screen::Game(Game::new(self.globals.clone()))),
                PauseOpt::MainMenu => {
                    return Some(Screen::Menu(crate::menu::MainMenu::new(
                        self.globals.clone(),
                    )))
                }
                PauseOpt::Quit => return Some(Screen::Quit),
            },
            GameState::Dead => match Command::from_key_event(event.as_key_press_event()?)? {
                Command::R => return Some(Screen::Game(Game::new(self.globals.clone()))),
                Command::M => {
                    return Some(Screen::Menu(crate::menu::MainMenu::new(
                        self.globals.clone(),
                    )))
                }
                Command::Quit | Command::Q => return Some(Screen::Quit),
                _ => (),
            },
        }
        None
    }

    fn running(&self) -> bool {
        self.state == GameState::Running
    }

    fn pause(&mut self) {
        self.state = GameState::Paused(Paused::new());
    }

    fn head_symbol(&self) -> char {
        match self.snake.committed {
            Direction::North => consts::SNAKE_HEAD_NORTH_SYMBOL,
            Direction::South => consts::SNAKE_HEAD_SOUTH_SYMBOL,
            Direction::East => consts::SNAKE_HEAD_EAST_SYMBOL,
            Direction::West => consts::SNAKE_HEAD_WEST_SYMBOL,
        }
    }

    /// The power-up indicator line: each active power with its remaining
    /// whole seconds
    fn power_bar(&self) -> Line<'static> {
        let mut line = Line::default();
        line.push_span(" ");
        for (kind, remaining) in self.snake.active_powers() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let secs = remaining.ceil().max(0.0) as u32;
            line.push_span(Span::styled(kind.label(), consts::KEY_STYLE));
            line.push_span(format!(" {secs}s  "));
        }
        line
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);

        let mut header = format!(" Score: {}", self.score.score());
        if let Some(best) = self.high {
            header.push_str(&format!("   High: {}", best.score));
        }
        header.push_str(&format!("   Level: {}", self.score.level()));
        if self.score.combo() > 1 {
            header.push_str(&format!("   Combo: {}", self.score.combo()));
        }
        if self.score.multiplier() > 1.0 {
            header.push_str("   2x points!");
        }
        Line::styled(header, consts::SCORE_BAR_STYLE).render(score_area, buf);

        let mut block_size = self.grid.size();
        block_size.width = block_size.width.saturating_add(2);
        block_size.height = block_size.height.saturating_add(2);
        let block_area = center_rect(block_area, block_size);
        Block::bordered().render(block_area, buf);

        let level_area = block_area.inner(Margin::new(1, 1));
        let mut canvas = Canvas {
            area: level_area,
            grid: self.grid,
            buf: &mut *buf,
        };

        let theme = &self.globals.theme;
        for obstacle in self.obstacles.iter() {
            match &obstacle.kind {
                ObstacleKind::Wall { cell } => {
                    canvas.draw_cell(*cell, consts::WALL_SYMBOL, theme.obstacle());
                }
                ObstacleKind::Spike { cell } => {
                    canvas.draw_cell(*cell, consts::SPIKE_SYMBOL, theme.obstacle());
                }
                ObstacleKind::Patrol(patrol) => {
                    for pos in patrol.trail() {
                        canvas.draw_at(pos, consts::TRAIL_SYMBOL, theme.patrol().patch(consts::BLINK_STYLE));
                    }
                    canvas.draw_at(patrol.position(), consts::PATROL_SYMBOL, theme.patrol());
                }
            }
        }
        for food in self.foods.iter() {
            let (symbol, mut style) = match food.special() {
                None => (consts::FOOD_SYMBOL, theme.food()),
                Some(_) => (consts::SPECIAL_FOOD_SYMBOL, theme.special_food()),
            };
            if food.blinking(self.foods.lifetime()) {
                style = style.patch(consts::BLINK_STYLE);
            }
            canvas.draw_at(food.pos, symbol, style);
        }
        for pickup in self.powerups.iter() {
            let mut style = theme.powerup();
            if pickup.blinking(self.powerups.lifetime()) {
                style = style.patch(consts::BLINK_STYLE);
            }
            canvas.draw_at(pickup.pos, consts::POWERUP_SYMBOL, style);
        }
        for segment in self.snake.segments() {
            canvas.draw_at(segment.pos, consts::SNAKE_BODY_SYMBOL, theme.snake());
        }
        // Head last: on a fatal collision it overwrites whatever it hit
        if self.state == GameState::Dead {
            canvas.draw_at(
                self.snake.head_pos(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            canvas.draw_at(self.snake.head_pos(), self.head_symbol(), theme.snake());
        }

        match self.state {
            GameState::Running => {
                self.power_bar().render(msg1_area, buf);
            }
            GameState::Paused(paused) => {
                let pause_area = center_rect(display, Paused::SIZE);
                paused.render(pause_area, buf);
            }
            GameState::Dead => {
                let mut over = String::from(" — GAME OVER —");
                if let Some(cause) = self.cause {
                    over.push_str(&format!(" {}.", cause.describe()));
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let played = self.score.play_time() as u32;
                over.push_str(&format!(" Survived {played}s."));
                if self.new_best {
                    over.push_str(" New best!");
                }
                if let Some(notice) = &self.save_notice {
                    over.push_str(&format!(" ({notice})"));
                }
                Span::from(over).render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" Restart ("),
                    Span::styled("r", consts::KEY_STYLE),
                    Span::raw(") — Main Menu ("),
                    Span::styled("m", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
        }
    }
}

/// Maps world/cell coordinates into the level's screen rectangle
#[derive(Debug)]
struct Canvas<'a> {
    area: Rect,
    grid: Grid,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, cell: Cell, symbol: char, style: Style) {
        let Ok(cx) = u16::try_from(cell.x) else {
            return;
        };
        let Ok(cy) = u16::try_from(cell.y) else {
            return;
        };
        let Some(x) = self.area.x.checked_add(cx) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(cy) else {
            return;
        };
        if !self.area.contains(Position { x, y }) {
            return;
        }
        if let Some(buf_cell) = self.buf.cell_mut((x, y)) {
            buf_cell.set_char(symbol);
            buf_cell.set_style(Style::reset().patch(style));
        }
    }

    fn draw_at(&mut self, pos: Vec2, symbol: char, style: Style) {
        self.draw_cell(self.grid.cell_at(pos), symbol, style);
    }
}

/// Whether the session is live, suspended, or over
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GameState {
    Running,
    Paused(Paused),
    Dead,
}

/// What ended (or nearly ended) the session
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Hazard {
    Obstacle(ObstacleClass),
    SelfBite,
    OutOfBounds,
}

impl Hazard {
    fn describe(self) -> &'static str {
        match self {
            Hazard::Obstacle(ObstacleClass::Wall) => "You hit a wall",
            Hazard::Obstacle(ObstacleClass::Spike) => "You hit a spike",
            Hazard::Obstacle(ObstacleClass::Patrol) => "A patrol ran you down",
            Hazard::SelfBite => "You bit yourself",
            Hazard::OutOfBounds => "You left the arena",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::food::{Food, FoodKind, SpecialKind};
    use crate::game::powerups::{PickupKind, PowerUp};
    use crate::options::{FruitQty, LevelSize, Options};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn bare_globals() -> Globals {
        Globals {
            options: Options {
                obstacles: false,
                moving_obstacles: false,
                fruits: FruitQty::new(1).unwrap(),
                level_size: LevelSize::Medium,
            },
            ..Globals::default()
        }
    }

    fn game() -> Game<ChaCha12Rng> {
        Game::new_with_rng(bare_globals(), ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    /// Advance far enough for exactly one grid step
    fn one_step(game: &mut Game<ChaCha12Rng>) {
        game.advance(1.0 / game.snake.speed() + 1e-4);
    }

    /// Tiny advance: ticks interactions without triggering a grid step
    fn tick(game: &mut Game<ChaCha12Rng>) {
        game.advance(1e-3);
    }

    fn place_food(game: &mut Game<ChaCha12Rng>, pos: Vec2, kind: FoodKind) {
        game.foods.items.clear();
        game.foods.items.push(Food { pos, kind });
    }

    #[test]
    fn new_game_has_initial_food() {
        let game = game();
        assert_eq!(game.foods.iter().count(), 1);
        assert!(game.snake.alive());
        assert_eq!(game.score.score(), 0);
    }

    #[test]
    fn eating_food_scores_grows_and_respawns() {
        let mut game = game();
        // Drain the initial growth so length changes are observable, with
        // the randomly placed starting food out of the way
        game.foods.items.clear();
        for _ in 0..3 {
            one_step(&mut game);
        }
        let length = game.snake.length();
        let head = game.snake.head_pos();
        place_food(
            &mut game,
            head + Vec2::new(consts::CELL, 0.0),
            FoodKind::Normal,
        );

        one_step(&mut game);
        assert_eq!(game.score.score(), 10);
        assert!(game.take_events().contains(&GameEvent::AteFood));
        assert_eq!(game.foods.iter().count(), 1, "replacement food spawned");
        assert_eq!(
            game.snake.length(),
            length,
            "growth is queued, not instantaneous"
        );

        // Clear the respawned food out of the way before the next step
        game.foods.items.clear();
        one_step(&mut game);
        assert_eq!(game.snake.length(), length + 1);
    }

    #[test]
    fn special_food_grants_power_and_is_not_replaced() {
        let mut game = game();
        let head = game.snake.head_pos();
        place_food(
            &mut game,
            head + Vec2::new(consts::CELL, 0.0),
            FoodKind::Special {
                kind: SpecialKind::Shield,
                age: 0.0,
            },
        );
        one_step(&mut game);
        assert!(game.snake.has(PowerKind::Shield));
        assert_eq!(game.score.score(), 30);
        assert_eq!(
            game.foods.iter().count(),
            0,
            "special food is not auto-replaced"
        );
        assert!(game
            .take_events()
            .contains(&GameEvent::AteSpecial(SpecialKind::Shield)));
    }

    #[test]
    fn shield_absorbs_exactly_one_fatal_collision() {
        let mut game = game();
        game.snake.add_power(PowerKind::Shield, 10.0);
        game.snake.head.pos = Vec2::new(-200.0, -200.0);

        tick(&mut game);
        assert!(game.snake.alive());
        assert!(!game.snake.has(PowerKind::Shield), "shield consumed");
        assert!(game.running());
        let events = game.take_events();
        assert!(events.contains(&GameEvent::Collided { absorbed: true }));
        assert!(!events.contains(&GameEvent::GameOver));

        // Same collision again, now without the shield
        tick(&mut game);
        assert!(!game.snake.alive());
        assert_eq!(game.state, GameState::Dead);
        let events = game.take_events();
        assert!(events.contains(&GameEvent::Collided { absorbed: false }));
        assert!(events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn ghost_passes_walls_and_self() {
        let mut game = game();
        game.snake.add_power(PowerKind::Ghost, 12.0);
        game.snake.head.pos = Vec2::new(-200.0, -200.0);
        tick(&mut game);
        assert!(game.snake.alive());
        assert!(game.running());
    }

    #[test]
    fn invincibility_skips_obstacles_but_not_bounds() {
        let mut globals = bare_globals();
        globals.options.obstacles = true;
        let mut game = Game::new_with_rng(globals, ChaCha12Rng::seed_from_u64(RNG_SEED));
        game.snake.add_power(PowerKind::Invincible, 8.0);
        // Parked on the border wall ring: obstacle hit suppressed, and the
        // head cell is still inside the grid
        game.snake.head.pos = game.grid.cell_center(Cell::new(0, 0));
        tick(&mut game);
        assert!(game.snake.alive());
        // But leaving the grid entirely still kills
        game.snake.head.pos = Vec2::new(-200.0, -200.0);
        tick(&mut game);
        assert!(!game.snake.alive());
    }

    #[test]
    fn obstacle_collision_is_fatal_without_defenses() {
        let mut globals = bare_globals();
        globals.options.obstacles = true;
        let mut game = Game::new_with_rng(globals, ChaCha12Rng::seed_from_u64(RNG_SEED));
        game.snake.head.pos = game.grid.cell_center(Cell::new(0, 3));
        tick(&mut game);
        assert!(!game.snake.alive());
        assert_eq!(game.cause, Some(Hazard::Obstacle(ObstacleClass::Wall)));
    }

    #[test]
    fn teleport_lands_on_a_valid_cell() {
        let mut game = game();
        let head = game.snake.head_pos();
        game.powerups.items.push(PowerUp {
            pos: head,
            kind: PickupKind::Teleport,
            age: 0.0,
        });
        tick(&mut game);
        let landed = game.grid.cell_at(game.snake.head_pos());
        assert!(game.grid.contains(landed));
        assert!(!game.obstacles.occupies(game.grid, landed));
        assert!(game
            .take_events()
            .contains(&GameEvent::CollectedPowerUp(PickupKind::Teleport)));
    }

    #[test]
    fn bomb_is_a_stub_that_leaves_obstacles_alone() {
        let mut globals = bare_globals();
        globals.options.obstacles = true;
        let mut game = Game::new_with_rng(globals, ChaCha12Rng::seed_from_u64(RNG_SEED));
        let before = game.obstacles.iter().count();
        let head = game.snake.head_pos();
        game.powerups.items.push(PowerUp {
            pos: head,
            kind: PickupKind::Bomb,
            age: 0.0,
        });
        tick(&mut game);
        assert_eq!(game.obstacles.iter().count(), before);
        let events = game.take_events();
        assert!(events.contains(&GameEvent::CollectedPowerUp(PickupKind::Bomb)));
        assert!(events
            .iter()
            .any(|ev| matches!(ev, GameEvent::BombDetonated { .. })));
    }

    #[test]
    fn double_points_drives_the_multiplier() {
        let mut game = game();
        game.apply_power(PowerKind::DoublePoints, 10.0);
        assert_eq!(game.score.multiplier(), 2.0);
        let head = game.snake.head_pos();
        place_food(
            &mut game,
            head + Vec2::new(consts::CELL, 0.0),
            FoodKind::Normal,
        );
        one_step(&mut game);
        assert_eq!(game.score.score(), 20);
        game.power_expired(PowerKind::DoublePoints);
        assert_eq!(game.score.multiplier(), 1.0);
    }

    #[test]
    fn paused_game_does_not_advance() {
        let mut game = game();
        game.pause();
        assert!(matches!(game.state, GameState::Paused(_)));
        let head = game.snake.head_pos();
        game.advance(10.0);
        assert_eq!(game.snake.head_pos(), head);
        assert_eq!(game.score.play_time(), 0.0);
    }

    #[test]
    fn dead_game_does_not_advance() {
        let mut game = game();
        game.snake.head.pos = Vec2::new(-200.0, -200.0);
        tick(&mut game);
        assert_eq!(game.state, GameState::Dead);
        let time = game.score.play_time();
        game.advance(10.0);
        assert_eq!(game.score.play_time(), time);
    }

    #[test]
    fn zero_score_death_records_no_high_score() {
        let mut game = game();
        game.snake.head.pos = Vec2::new(-200.0, -200.0);
        tick(&mut game);
        assert!(!game.new_best);
        assert_eq!(game.globals.high_scores.get(game.globals.options), None);
    }

    #[test]
    fn events_drain_once() {
        let mut game = game();
        let head = game.snake.head_pos();
        place_food(
            &mut game,
            head + Vec2::new(consts::CELL, 0.0),
            FoodKind::Normal,
        );
        one_step(&mut game);
        assert!(!game.take_events().is_empty());
        assert!(game.take_events().is_empty());
    }
}
