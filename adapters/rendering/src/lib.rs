#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Battletank adapters.
//!
//! Backends stay outside this workspace; what lives here is the read-only
//! presentation surface they consume: the tile-grid descriptor with its
//! pointer mapping, the per-frame scene composed from world snapshot
//! views, and the explosion playback that animates destroyed-unit
//! notifications.

use glam::Vec2;
use std::{error::Error, fmt};

use battletank_core::{BulletView, CellCoord, TileIndex, UnitView, WorldPoint};

/// Highest explosion animation frame; playback ends when it is reached.
const MAX_EXPLOSION_FRAME: f32 = 27.0;

/// Animation frames advanced per rendered frame.
const EXPLOSION_FRAME_STEP: f32 = 0.5;

/// Describes the square tile grid a backend should draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    columns: u32,
    rows: u32,
    tile_length: f32,
}

impl TileGridPresentation {
    /// Creates a new tile grid descriptor.
    ///
    /// Returns an error when `tile_length` is not positive, since a
    /// degenerate tile would collapse the pointer mapping.
    pub fn new(columns: u32, rows: u32, tile_length: f32) -> Result<Self, RenderingError> {
        if tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
        })
    }

    /// Number of cell columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile in screen units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Maps a pointer position in screen units into world grid units.
    #[must_use]
    pub fn pointer_to_world(&self, pointer: Vec2) -> WorldPoint {
        WorldPoint::new(pointer.x / self.tile_length, pointer.y / self.tile_length)
    }
}

/// Heading of a weapon sprite tracking a target, in degrees.
#[must_use]
pub fn turret_heading(from: WorldPoint, to: WorldPoint) -> f32 {
    let direction = to.sub(from);
    (-direction.x()).atan2(-direction.y()).to_degrees()
}

/// Drawable state of a single unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSprite {
    /// Grid cell the unit occupies.
    pub cell: CellCoord,
    /// Sprite-sheet selector for the unit's body.
    pub tile: TileIndex,
    /// Body heading in degrees.
    pub body_angle: f32,
    /// Weapon heading in degrees, tracking the unit's aim point.
    pub turret_angle: f32,
    /// Whether the unit is drawn as live armor or a wreck.
    pub alive: bool,
}

/// Drawable state of a single bullet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSprite {
    /// Continuous world-space position in grid units.
    pub position: WorldPoint,
}

/// Scene description composed freshly for every rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that frames the battleground.
    pub tile_grid: TileGridPresentation,
    /// Every unit in roster order, wrecks included.
    pub units: Vec<UnitSprite>,
    /// Bullets still in flight; dead bullets are never drawn.
    pub bullets: Vec<BulletSprite>,
}

impl Scene {
    /// Composes a scene from the world's snapshot views.
    #[must_use]
    pub fn compose(
        tile_grid: TileGridPresentation,
        units: &UnitView,
        bullets: &BulletView,
    ) -> Self {
        let units = units
            .iter()
            .map(|unit| UnitSprite {
                cell: unit.cell,
                tile: unit.tile,
                body_angle: unit.orientation,
                turret_angle: turret_heading(unit.cell.to_point(), unit.aim_target),
                alive: unit.alive,
            })
            .collect();
        let bullets = bullets
            .iter()
            .filter(|bullet| bullet.alive)
            .map(|bullet| BulletSprite {
                position: bullet.position,
            })
            .collect();

        Self {
            tile_grid,
            units,
            bullets,
        }
    }
}

/// One explosion flipbook anchored to a grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    cell: CellCoord,
    frame: f32,
}

impl Explosion {
    /// Cell the explosion is anchored to.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Whole animation frame to draw this render pass.
    #[must_use]
    pub fn frame_index(&self) -> u32 {
        self.frame.floor() as u32
    }
}

/// Runs explosion flipbooks spawned from destroyed-unit notifications.
#[derive(Clone, Debug, Default)]
pub struct ExplosionPlayback {
    explosions: Vec<Explosion>,
}

impl ExplosionPlayback {
    /// Creates an empty playback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new explosion flipbook at the provided cell.
    pub fn spawn(&mut self, cell: CellCoord) {
        self.explosions.push(Explosion { cell, frame: 0.0 });
    }

    /// Advances every flipbook, dropping the ones that finished.
    pub fn advance(&mut self) {
        for explosion in &mut self.explosions {
            explosion.frame += EXPLOSION_FRAME_STEP;
        }
        self.explosions
            .retain(|explosion| explosion.frame < MAX_EXPLOSION_FRAME);
    }

    /// Iterator over the explosions still playing.
    pub fn iter(&self) -> impl Iterator<Item = &Explosion> {
        self.explosions.iter()
    }

    /// Reports whether every flipbook has finished.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty()
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tile side length must be positive to keep the pointer mapping sound.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use battletank_core::{BulletId, BulletSnapshot, TileIndex, UnitId, UnitSnapshot};

    #[test]
    fn tile_grid_rejects_degenerate_tile_lengths() {
        let error = TileGridPresentation::new(16, 10, 0.0)
            .expect_err("zero tile_length must be rejected");
        assert!(matches!(
            error,
            RenderingError::InvalidTileLength { tile_length } if tile_length == 0.0
        ));
    }

    #[test]
    fn pointer_positions_scale_into_grid_units() {
        let grid = TileGridPresentation::new(16, 10, 32.0).expect("valid grid");
        let mapped = grid.pointer_to_world(Vec2::new(96.0, 64.0));

        assert_eq!(mapped, WorldPoint::new(3.0, 2.0));
    }

    #[test]
    fn turret_heading_covers_the_cardinal_aims() {
        let from = WorldPoint::new(5.0, 5.0);

        assert_eq!(turret_heading(from, WorldPoint::new(5.0, 2.0)), 0.0);
        assert_eq!(turret_heading(from, WorldPoint::new(5.0, 8.0)), -180.0);
        assert_eq!(turret_heading(from, WorldPoint::new(2.0, 5.0)), 90.0);
        assert_eq!(turret_heading(from, WorldPoint::new(8.0, 5.0)), -90.0);
    }

    #[test]
    fn scenes_draw_wrecks_but_skip_dead_bullets() {
        let tile_grid = TileGridPresentation::new(16, 10, 32.0).expect("valid grid");
        let units = UnitView::from_snapshots(vec![UnitSnapshot {
            id: UnitId::PLAYER,
            cell: CellCoord::new(5, 4),
            tile: TileIndex::new(1, 0),
            orientation: 180.0,
            aim_target: WorldPoint::new(5.0, 8.0),
            alive: false,
            last_fire_tick: 3,
        }]);
        let bullets = BulletView::from_snapshots(vec![
            BulletSnapshot {
                id: BulletId::new(0),
                position: WorldPoint::new(5.5, 4.5),
                alive: true,
            },
            BulletSnapshot {
                id: BulletId::new(1),
                position: WorldPoint::new(1.0, 1.0),
                alive: false,
            },
        ]);

        let scene = Scene::compose(tile_grid, &units, &bullets);

        assert_eq!(scene.units.len(), 1);
        let sprite = scene.units[0];
        assert!(!sprite.alive);
        assert_eq!(sprite.body_angle, 180.0);
        assert_eq!(sprite.turret_angle, -180.0);
        assert_eq!(
            scene.bullets,
            vec![BulletSprite {
                position: WorldPoint::new(5.5, 4.5),
            }],
        );
    }

    #[test]
    fn explosions_play_through_their_flipbook_and_expire() {
        let mut playback = ExplosionPlayback::new();
        playback.spawn(CellCoord::new(3, 4));

        assert_eq!(
            playback.iter().map(Explosion::frame_index).collect::<Vec<_>>(),
            vec![0]
        );

        for _ in 0..53 {
            playback.advance();
        }
        assert_eq!(
            playback.iter().map(Explosion::frame_index).collect::<Vec<_>>(),
            vec![26]
        );

        playback.advance();
        assert!(playback.is_empty());
    }
}
