//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Target time between rendered frames (and thus simulation ticks)
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(33);

/// Upper bound on the per-tick time delta, so that a stall (window dragged,
/// terminal suspended) does not turn into one giant simulation step
pub(crate) const MAX_FRAME_DT: f32 = 0.1;

/// Side length of one grid cell in world units.  All entity logic runs in
/// continuous world coordinates; cells exist for placement and bounds tests.
pub(crate) const CELL: f32 = 20.0;

/// Segments the snake owes itself at the start of a game
pub(crate) const INITIAL_GROWTH: u32 = 3;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Spawn attempt budget for normal food
pub(crate) const FOOD_SPAWN_ATTEMPTS: u32 = 100;

/// Spawn attempt budget for special food and power-ups
pub(crate) const RARE_SPAWN_ATTEMPTS: u32 = 50;

/// Attempt budget when looking for a teleport landing cell
pub(crate) const TELEPORT_ATTEMPTS: u32 = 50;

/// Minimum distance (in cells) between fresh normal food and anything else
pub(crate) const FOOD_CLEARANCE: f32 = 1.5;

/// Minimum distance (in cells) between fresh special food and anything else
pub(crate) const SPECIAL_CLEARANCE: f32 = 2.0;

/// Minimum distance (in cells) between a fresh power-up and the snake
pub(crate) const POWERUP_CLEARANCE: f32 = 3.0;

/// No generated obstacle may sit within this many cells of the snake start
pub(crate) const START_CLEARANCE: f32 = 3.0;

/// Most special foods allowed on the board at once
pub(crate) const MAX_SPECIAL_FOOD: usize = 3;

/// Most power-up pickups allowed on the board at once
pub(crate) const MAX_POWERUPS: usize = 2;

/// Length of the cosmetic trail behind a patrolling obstacle
pub(crate) const TRAIL_LEN: usize = 5;

/// Timed entities start blinking when this much lifetime remains
pub(crate) const BLINK_WINDOW: f32 = 3.0;

/// Glyph for the snake's head when it is moving north/up
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving south/down
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving east/right
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: char = '>';

/// Glyph for the snake's head when it is moving west/left
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: char = '<';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for normal food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for special food
pub(crate) const SPECIAL_FOOD_SYMBOL: char = '◆';

/// Glyph for power-up pickups
pub(crate) const POWERUP_SYMBOL: char = '✦';

/// Glyph for wall obstacles
pub(crate) const WALL_SYMBOL: char = '█';

/// Glyph for spike obstacles
pub(crate) const SPIKE_SYMBOL: char = '✸';

/// Glyph for patrolling obstacles
pub(crate) const PATROL_SYMBOL: char = '▣';

/// Glyph for a patrolling obstacle's trail
pub(crate) const TRAIL_SYMBOL: char = '·';

/// Glyph for the snake's head after a fatal collision
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for normal food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for special food
pub(crate) const SPECIAL_FOOD_STYLE: Style =
    Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Style for power-up pickups
pub(crate) const POWERUP_STYLE: Style =
    Style::new().fg(Color::LightMagenta).add_modifier(Modifier::BOLD);

/// Style for wall and spike obstacles
pub(crate) const OBSTACLE_STYLE: Style = Style::new().fg(Color::Gray);

/// Style for patrolling obstacles and their trails
pub(crate) const PATROL_STYLE: Style = Style::new().fg(Color::LightBlue);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style applied on top of an entity's own style while it blinks before
/// despawning
pub(crate) const BLINK_STYLE: Style = Style::new().add_modifier(Modifier::DIM);
