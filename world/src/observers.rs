//! Synchronous notification fan-out for simulation side effects.

use std::fmt;

use crate::Unit;

type UnitHandler = Box<dyn FnMut(&Unit)>;

/// Registry of notification handlers keyed by event kind.
///
/// Handlers run synchronously in registration order while a command is
/// committing its effect. Notification is a read-only fan-out: handlers
/// receive the affected unit by reference and must not reach back into the
/// world that invoked them.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    unit_destroyed: Vec<UnitHandler>,
    bullet_fired: Vec<UnitHandler>,
}

impl ObserverRegistry {
    pub(crate) fn observe_unit_destroyed(&mut self, handler: impl FnMut(&Unit) + 'static) {
        self.unit_destroyed.push(Box::new(handler));
    }

    pub(crate) fn observe_bullet_fired(&mut self, handler: impl FnMut(&Unit) + 'static) {
        self.bullet_fired.push(Box::new(handler));
    }

    pub(crate) fn notify_unit_destroyed(&mut self, unit: &Unit) {
        for handler in &mut self.unit_destroyed {
            handler(unit);
        }
    }

    pub(crate) fn notify_bullet_fired(&mut self, unit: &Unit) {
        for handler in &mut self.bullet_fired {
            handler(unit);
        }
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("unit_destroyed", &self.unit_destroyed.len())
            .field("bullet_fired", &self.bullet_fired.len())
            .finish()
    }
}
