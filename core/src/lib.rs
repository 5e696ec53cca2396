#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Battletank engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems assemble
//! [`Command`] values describing desired mutations, the world executes those
//! commands through its `apply` entry point, and systems consume read-only
//! snapshot views ([`UnitView`], [`BulletView`]) to build the next batch
//! deterministically.

use serde::{Deserialize, Serialize};

/// Norm threshold below which a direction vector is treated as degenerate.
const DEGENERATE_NORM: f32 = 1e-4;

/// Unique identifier assigned to a unit.
///
/// Unit identity is the unit's position in the world's insertion-ordered
/// roster and remains stable for the whole session; units are never removed,
/// only marked dead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Identifier of the player-controlled unit, always first in the roster.
    pub const PLAYER: UnitId = UnitId(0);

    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Ephemeral identifier assigned to a bullet.
///
/// Bullet identity is the bullet's index in the active roster and is only
/// valid within the tick that observed it; pruning dead bullets invalidates
/// previously issued identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as signed column and row
/// coordinates.
///
/// Signed components let movement propose candidate cells beyond the grid
/// edge; the world rejects those candidates instead of wrapping them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Candidate cell reached by applying the provided movement vector.
    #[must_use]
    pub const fn offset_by(self, vector: MoveVector) -> Self {
        Self {
            x: self.x.saturating_add(vector.dx),
            y: self.y.saturating_add(vector.dy),
        }
    }

    /// Converts the cell into the world-space point at its upper-left corner.
    #[must_use]
    pub fn to_point(self) -> WorldPoint {
        WorldPoint::new(self.x as f32, self.y as f32)
    }
}

/// Discrete movement request expressed as a signed cell offset.
///
/// Callers are expected to submit axis-aligned unit vectors, but the world
/// does not enforce that shape; it only validates the resulting candidate
/// cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveVector {
    dx: i32,
    dy: i32,
}

impl MoveVector {
    /// Creates a new movement vector from signed cell offsets.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal cell offset of the vector.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical cell offset of the vector.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Reports whether the vector requests no movement at all.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Continuous world-space point measured in grid units.
///
/// The same type doubles as a displacement vector: [`WorldPoint::sub`]
/// produces the displacement between two points, and the scaled-add and
/// normalization helpers operate on that displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Origin point, also used as the degenerate direction.
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in grid units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in grid units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Component-wise difference `self − other`.
    #[must_use]
    pub fn sub(self, other: WorldPoint) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Component-wise sum `self + other`.
    #[must_use]
    pub fn add(self, other: WorldPoint) -> Self {
        self.add_scaled(other, 1.0)
    }

    /// Component-wise sum `self + other * weight`.
    #[must_use]
    pub fn add_scaled(self, other: WorldPoint, weight: f32) -> Self {
        Self {
            x: self.x + other.x * weight,
            y: self.y + other.y * weight,
        }
    }

    /// Euclidean length of the point interpreted as a vector.
    #[must_use]
    pub fn norm(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit-length version of the vector.
    ///
    /// Returns [`WorldPoint::ZERO`] when the norm falls below the degenerate
    /// threshold, so callers never divide by a vanishing length.
    #[must_use]
    pub fn normalized(self) -> Self {
        let norm = self.norm();
        if norm < DEGENERATE_NORM {
            return Self::ZERO;
        }
        Self {
            x: self.x / norm,
            y: self.y / norm,
        }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        self.sub(other).norm()
    }
}

/// Sprite-sheet cell selector carried by terrain and units for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    column: u32,
    row: u32,
}

impl TileIndex {
    /// Creates a new tile selector from sheet coordinates.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column of the tile within its sheet.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row of the tile within its sheet.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Commands that express all permissible world mutations.
///
/// A tick's batch is built in full before any command runs, then executed
/// strictly in build order by the world's dispatcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Requests that a unit step to an adjacent cell.
    Move {
        /// Identifier of the unit attempting to move.
        unit: UnitId,
        /// Signed cell offset for the attempted step.
        vector: MoveVector,
    },
    /// Points a unit's weapon at a world-space location.
    Target {
        /// Identifier of the unit whose weapon is retargeted.
        unit: UnitId,
        /// World-space point the weapon should track.
        point: WorldPoint,
    },
    /// Requests that a unit fire a bullet along its current aim.
    Shoot {
        /// Identifier of the unit attempting to fire.
        unit: UnitId,
    },
    /// Advances a bullet one step along its ballistic path.
    AdvanceBullet {
        /// Identifier of the bullet to advance.
        bullet: BulletId,
    },
    /// Discards bullets that are no longer alive, preserving roster order.
    PruneBullets,
}

/// Overall state of a battle session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleStatus {
    /// Both sides still have live units; the session continues.
    #[default]
    Ongoing,
    /// Every non-player unit is dead while the player survives.
    Won,
    /// The player unit is dead.
    Lost,
}

impl BattleStatus {
    /// Reports whether the session has concluded.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Raw player intent gathered by the adapter for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Requested step, zero when no movement key was pressed.
    pub movement: MoveVector,
    /// Whether the fire trigger was pulled this tick.
    pub fire: bool,
    /// Pointer position mapped into world units by the adapter.
    pub cursor: WorldPoint,
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Identifier of the unit within the roster.
    pub id: UnitId,
    /// Grid cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Sprite selector assigned by the level.
    pub tile: TileIndex,
    /// Body heading in degrees, meaningful for rendering only.
    pub orientation: f32,
    /// World-space point the unit's weapon currently tracks.
    pub aim_target: WorldPoint,
    /// Whether the unit is still alive.
    pub alive: bool,
    /// Tick at which the unit last fired, for cooldown bookkeeping.
    pub last_fire_tick: i64,
}

/// Read-only snapshot describing every unit in the world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the player-controlled unit, when one exists.
    #[must_use]
    pub fn player(&self) -> Option<&UnitSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.id == UnitId::PLAYER)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single bullet's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Identifier of the bullet within the active roster.
    pub id: BulletId,
    /// Continuous world-space position of the bullet.
    pub position: WorldPoint,
    /// Whether the bullet is still in flight.
    pub alive: bool,
}

/// Read-only snapshot describing every active bullet in the world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new bullet view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured bullet snapshots in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BulletSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BattleStatus, BulletId, CellCoord, MoveVector, TileIndex, UnitId, UnitSnapshot, UnitView,
        WorldPoint,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn unit_id_round_trips_through_bincode() {
        assert_round_trip(&UnitId::new(42));
    }

    #[test]
    fn bullet_id_round_trips_through_bincode() {
        assert_round_trip(&BulletId::new(7));
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(-3, 9));
    }

    #[test]
    fn move_vector_round_trips_through_bincode() {
        assert_round_trip(&MoveVector::new(0, -1));
    }

    #[test]
    fn tile_index_round_trips_through_bincode() {
        assert_round_trip(&TileIndex::new(2, 1));
    }

    #[test]
    fn battle_status_round_trips_through_bincode() {
        assert_round_trip(&BattleStatus::Lost);
    }

    #[test]
    fn world_point_round_trips_through_bincode() {
        assert_round_trip(&WorldPoint::new(4.25, -0.5));
    }

    #[test]
    fn sub_and_distance_agree_on_displacement() {
        let a = WorldPoint::new(5.0, 4.0);
        let b = WorldPoint::new(2.0, 0.0);

        let displacement = a.sub(b);
        assert_eq!(displacement, WorldPoint::new(3.0, 4.0));
        assert!((displacement.norm() - 5.0).abs() < f32::EPSILON);
        assert!((a.distance_to(b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn add_scaled_applies_the_weight() {
        let origin = WorldPoint::new(1.0, 1.0);
        let step = WorldPoint::new(1.0, 0.0);

        assert_eq!(origin.add_scaled(step, 0.1), WorldPoint::new(1.1, 1.0));
        assert_eq!(origin.add(step), WorldPoint::new(2.0, 1.0));
    }

    #[test]
    fn normalized_guards_against_degenerate_vectors() {
        assert_eq!(WorldPoint::ZERO.normalized(), WorldPoint::ZERO);
        assert_eq!(WorldPoint::new(5e-5, -5e-5).normalized(), WorldPoint::ZERO);

        let unit = WorldPoint::new(0.0, -3.0).normalized();
        assert_eq!(unit, WorldPoint::new(0.0, -1.0));
    }

    #[test]
    fn offset_by_applies_signed_components() {
        let cell = CellCoord::new(0, 0);
        assert_eq!(
            cell.offset_by(MoveVector::new(-1, 0)),
            CellCoord::new(-1, 0)
        );
        assert_eq!(cell.offset_by(MoveVector::new(0, 1)), CellCoord::new(0, 1));
    }

    #[test]
    fn unit_view_orders_snapshots_and_locates_the_player() {
        fn snapshot(id: u32, x: i32) -> UnitSnapshot {
            UnitSnapshot {
                id: UnitId::new(id),
                cell: CellCoord::new(x, 0),
                tile: TileIndex::new(1, 0),
                orientation: 0.0,
                aim_target: WorldPoint::ZERO,
                alive: true,
                last_fire_tick: -100,
            }
        }

        let view = UnitView::from_snapshots(vec![snapshot(2, 9), snapshot(0, 4), snapshot(1, 7)]);
        let ids: Vec<u32> = view.iter().map(|unit| unit.id.get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        let player = view.player().expect("player snapshot present");
        assert_eq!(player.cell, CellCoord::new(4, 0));
    }

    #[test]
    fn terminal_statuses_are_flagged() {
        assert!(!BattleStatus::Ongoing.is_terminal());
        assert!(BattleStatus::Won.is_terminal());
        assert!(BattleStatus::Lost.is_terminal());
    }
}
