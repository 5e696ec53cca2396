#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Post-tick evaluation of the battle's terminal states.

use battletank_core::{BattleStatus, UnitId, UnitView};

/// Win/loss evaluator with a sticky terminal status.
#[derive(Debug, Default)]
pub struct Victory {
    status: BattleStatus,
}

impl Victory {
    /// Creates a new evaluator for a fresh session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status of the session.
    #[must_use]
    pub const fn status(&self) -> BattleStatus {
        self.status
    }

    /// Evaluates the roster once at the end of a tick.
    ///
    /// Returns the new status on the transition tick only; afterwards the
    /// evaluator stays silent and the status never changes again. A dead
    /// player loses even when the last turret fell on the same tick.
    pub fn evaluate(&mut self, units: &UnitView) -> Option<BattleStatus> {
        if self.status.is_terminal() {
            return None;
        }

        let player = units.player()?;
        if !player.alive {
            self.status = BattleStatus::Lost;
            return Some(BattleStatus::Lost);
        }

        let turrets_remain = units
            .iter()
            .any(|unit| unit.id != UnitId::PLAYER && unit.alive);
        if !turrets_remain {
            self.status = BattleStatus::Won;
            return Some(BattleStatus::Won);
        }

        None
    }
}
