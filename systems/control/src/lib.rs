#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns raw player intent into world commands.

use battletank_core::{Command, PlayerInput, UnitId, WorldPoint};

/// Offset subtracted from the pointer so it names a cell center rather than
/// a cell corner.
const HALF_CELL: WorldPoint = WorldPoint::new(0.5, 0.5);

/// Player control system that queues movement and aiming commands.
#[derive(Debug, Default)]
pub struct Control;

impl Control {
    /// Creates a new control system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Queues the player's movement and aim commands for this tick.
    ///
    /// A movement command is emitted only when the input vector is
    /// non-zero; the aim command is unconditional so the weapon keeps
    /// tracking the pointer.
    pub fn handle(&self, input: &PlayerInput, out: &mut Vec<Command>) {
        if !input.movement.is_zero() {
            out.push(Command::Move {
                unit: UnitId::PLAYER,
                vector: input.movement,
            });
        }

        out.push(Command::Target {
            unit: UnitId::PLAYER,
            point: input.cursor.sub(HALF_CELL),
        });
    }

    /// Queues the player's fire command when the trigger was pulled.
    ///
    /// Kept separate from [`Control::handle`] because the canonical batch
    /// places the player's shot after the turret reactions.
    pub fn fire(&self, input: &PlayerInput, out: &mut Vec<Command>) {
        if input.fire {
            out.push(Command::Shoot {
                unit: UnitId::PLAYER,
            });
        }
    }
}
