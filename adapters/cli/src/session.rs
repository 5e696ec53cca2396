//! Per-tick session driver composing the pure systems over the world.

use battletank_core::{BattleStatus, Command, PlayerInput};
use battletank_system_ballistics::Ballistics;
use battletank_system_control::Control;
use battletank_system_turret::Turrets;
use battletank_system_victory::Victory;
use battletank_world::{self as world, query, World};

/// Owns a world plus the systems that feed it and steps them one tick at a
/// time: build the canonical command batch, execute it in order, close the
/// tick, then evaluate the outcome.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    control: Control,
    turrets: Turrets,
    ballistics: Ballistics,
    victory: Victory,
    commands: Vec<Command>,
}

impl Session {
    pub(crate) fn new(world: World) -> Self {
        Self {
            world,
            control: Control::new(),
            turrets: Turrets::new(),
            ballistics: Ballistics::new(),
            victory: Victory::new(),
            commands: Vec::new(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn status(&self) -> BattleStatus {
        self.victory.status()
    }

    /// Runs one full tick, returning the battle status on its transition
    /// tick only. Once the session is terminal no further batches are
    /// built.
    pub(crate) fn tick(&mut self, input: &PlayerInput) -> Option<BattleStatus> {
        if self.victory.status().is_terminal() {
            return None;
        }

        let units = query::unit_view(&self.world);
        let bullets = query::bullet_view(&self.world);
        let range = query::config(&self.world).bullet_range();

        self.commands.clear();
        self.control.handle(input, &mut self.commands);
        self.turrets.handle(&units, range, &mut self.commands);
        self.control.fire(input, &mut self.commands);
        self.ballistics.handle(&bullets, &mut self.commands);

        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command);
        }
        world::advance_tick(&mut self.world);

        self.victory.evaluate(&query::unit_view(&self.world))
    }
}
