#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits the reactive turret commands.

use battletank_core::{Command, UnitId, UnitView};

/// Turret reflex system: every turret tracks the player and fires when the
/// player rolls into range.
#[derive(Debug, Default)]
pub struct Turrets;

impl Turrets {
    /// Creates a new turret reflex system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Queues aim and fire commands for every non-player unit.
    ///
    /// Aim commands are unconditional, wrecks included, since retargeting a
    /// dead unit only turns its gun sprite. Fire commands go to every
    /// turret within bullet range of the player (Euclidean distance over
    /// cell coordinates, inclusive); the world swallows requests from
    /// wrecks and from turrets still cooling down.
    pub fn handle(&self, units: &UnitView, bullet_range: f32, out: &mut Vec<Command>) {
        let Some(player) = units.player() else {
            return;
        };
        let player_point = player.cell.to_point();

        for unit in units.iter().filter(|unit| unit.id != UnitId::PLAYER) {
            out.push(Command::Target {
                unit: unit.id,
                point: player_point,
            });
        }

        for unit in units.iter().filter(|unit| unit.id != UnitId::PLAYER) {
            if unit.cell.to_point().distance_to(player_point) <= bullet_range {
                out.push(Command::Shoot { unit: unit.id });
            }
        }
    }
}
