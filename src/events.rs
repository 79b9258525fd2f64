use crate::game::food::SpecialKind;
use crate::game::grid::Vec2;
use crate::game::powerups::PickupKind;

/// A discrete notification emitted by the simulation for the benefit of the
/// presentation layer (sound effects, particles).  Fire-and-forget: nothing
/// in the simulation depends on how — or whether — these are handled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum GameEvent {
    AteFood,
    AteSpecial(SpecialKind),
    CollectedPowerUp(PickupKind),
    BombDetonated { center: Vec2, radius: f32 },
    Collided { absorbed: bool },
    LeveledUp(u32),
    GameOver,
}

/// Receiver for [`GameEvent`]s, drained once per frame by the app shell
pub(crate) trait EventSink {
    fn notify(&mut self, event: &GameEvent);
}

/// Stand-in for an audio backend; this build ships without one.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct NullAudio;

impl EventSink for NullAudio {
    fn notify(&mut self, _event: &GameEvent) {}
}
