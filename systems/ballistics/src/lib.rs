#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that schedules bullet advancement and pruning.

use battletank_core::{BulletView, Command};

/// Ballistics scheduling system: one advance per bullet, one prune per tick.
#[derive(Debug, Default)]
pub struct Ballistics;

impl Ballistics {
    /// Creates a new ballistics scheduling system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Queues one advance command for every bullet captured in the view,
    /// then the tick's single prune command.
    ///
    /// Bullets fired later in the same batch are absent from the view and
    /// therefore hold their position until the next tick.
    pub fn handle(&self, bullets: &BulletView, out: &mut Vec<Command>) {
        for bullet in bullets.iter() {
            out.push(Command::AdvanceBullet { bullet: bullet.id });
        }
        out.push(Command::PruneBullets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battletank_core::{BulletId, BulletSnapshot, WorldPoint};

    #[test]
    fn an_empty_roster_still_gets_its_prune() {
        let system = Ballistics::new();
        let mut out = Vec::new();

        system.handle(&BulletView::default(), &mut out);

        assert_eq!(out, vec![Command::PruneBullets]);
    }

    #[test]
    fn every_bullet_is_advanced_before_the_prune() {
        let system = Ballistics::new();
        let view = BulletView::from_snapshots(vec![
            BulletSnapshot {
                id: BulletId::new(1),
                position: WorldPoint::new(4.5, 2.0),
                alive: true,
            },
            BulletSnapshot {
                id: BulletId::new(0),
                position: WorldPoint::new(1.0, 1.0),
                alive: true,
            },
        ]);
        let mut out = Vec::new();

        system.handle(&view, &mut out);

        assert_eq!(
            out,
            vec![
                Command::AdvanceBullet {
                    bullet: BulletId::new(0),
                },
                Command::AdvanceBullet {
                    bullet: BulletId::new(1),
                },
                Command::PruneBullets,
            ],
        );
    }
}
