#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Battletank.
//!
//! The world owns the battleground grid, the unit and bullet rosters, the
//! tick counter, and the observer registry. All mutation funnels through
//! [`apply`], which executes one [`Command`] at a time and commits its full
//! effect before the next command runs. Read access flows through the
//! [`query`] module.

mod grid;
mod observers;

pub use grid::Grid;

use battletank_core::{
    BulletId, CellCoord, Command, MoveVector, TileIndex, UnitId, WorldPoint,
};
use observers::ObserverRegistry;

const DEFAULT_BULLET_SPEED: f32 = 0.1;
const DEFAULT_BULLET_RANGE: f32 = 4.0;
const DEFAULT_BULLET_DELAY: i64 = 10;

/// Sprite-sheet cell shared by every bullet.
const BULLET_TILE: TileIndex = TileIndex::new(2, 1);

/// Tick index observed by the first executed command batch.
const FIRST_TICK: i64 = 1;

/// Cooldown seed that keeps a freshly spawned unit free to fire at once.
const NEVER_FIRED: i64 = -100;

/// Offset from a cell's upper-left corner to its center.
const CELL_CENTER_OFFSET: WorldPoint = WorldPoint::new(0.5, 0.5);

/// Ballistics tuning shared by every unit in a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallisticsConfig {
    bullet_speed: f32,
    bullet_range: f32,
    bullet_delay: i64,
}

impl BallisticsConfig {
    /// Creates a new configuration from explicit tuning values.
    #[must_use]
    pub const fn new(bullet_speed: f32, bullet_range: f32, bullet_delay: i64) -> Self {
        Self {
            bullet_speed,
            bullet_range,
            bullet_delay,
        }
    }

    /// Distance a bullet covers per tick, in grid units.
    #[must_use]
    pub const fn bullet_speed(&self) -> f32 {
        self.bullet_speed
    }

    /// Maximum distance a bullet may travel from its firing point.
    #[must_use]
    pub const fn bullet_range(&self) -> f32 {
        self.bullet_range
    }

    /// Minimum tick interval between two shots from the same unit.
    #[must_use]
    pub const fn bullet_delay(&self) -> i64 {
        self.bullet_delay
    }
}

impl Default for BallisticsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BULLET_SPEED, DEFAULT_BULLET_RANGE, DEFAULT_BULLET_DELAY)
    }
}

/// Seed describing one unit of the initial roster.
///
/// Produced by the level loader; the roster order of the seeds becomes the
/// identity order of the units, with the first seed designating the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSpawn {
    position: CellCoord,
    tile: TileIndex,
}

impl UnitSpawn {
    /// Creates a new spawn seed at the provided cell with a sprite selector.
    #[must_use]
    pub const fn new(position: CellCoord, tile: TileIndex) -> Self {
        Self { position, tile }
    }

    /// Cell the unit occupies when the session starts.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Sprite selector assigned by the level.
    #[must_use]
    pub const fn tile(&self) -> TileIndex {
        self.tile
    }
}

/// A tank or stationary turret inhabiting the battleground.
///
/// Units are never removed from the roster; once dead they stay in place as
/// inert wrecks so renderers can keep drawing them.
#[derive(Debug)]
pub struct Unit {
    position: CellCoord,
    tile: TileIndex,
    orientation: f32,
    aim_target: WorldPoint,
    alive: bool,
    last_fire_tick: i64,
}

impl Unit {
    fn from_spawn(spawn: UnitSpawn) -> Self {
        Self {
            position: spawn.position,
            tile: spawn.tile,
            orientation: 0.0,
            aim_target: WorldPoint::ZERO,
            alive: true,
            last_fire_tick: NEVER_FIRED,
        }
    }

    /// Cell the unit currently occupies.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Sprite selector assigned by the level.
    #[must_use]
    pub const fn tile(&self) -> TileIndex {
        self.tile
    }

    /// Body heading in degrees; a rendering hint with no gameplay effect.
    #[must_use]
    pub const fn orientation(&self) -> f32 {
        self.orientation
    }

    /// World-space point the unit's weapon currently tracks.
    #[must_use]
    pub const fn aim_target(&self) -> WorldPoint {
        self.aim_target
    }

    /// Whether the unit is still alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Tick at which the unit last fired.
    #[must_use]
    pub const fn last_fire_tick(&self) -> i64 {
        self.last_fire_tick
    }
}

/// A projectile in flight between its firing point and its aim point.
#[derive(Debug)]
pub struct Bullet {
    position: WorldPoint,
    owner: UnitId,
    start_position: WorldPoint,
    end_position: WorldPoint,
    tile: TileIndex,
    alive: bool,
}

impl Bullet {
    fn fired_by(owner: UnitId, unit: &Unit) -> Self {
        let start = unit.position.to_point();
        Self {
            position: start,
            owner,
            start_position: start,
            end_position: unit.aim_target,
            tile: BULLET_TILE,
            alive: true,
        }
    }

    /// Continuous world-space position of the bullet.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Identity of the unit that fired the bullet.
    ///
    /// An identity lookup only; the bullet neither keeps the unit alive nor
    /// becomes invalid when the unit's liveness changes.
    #[must_use]
    pub const fn owner(&self) -> UnitId {
        self.owner
    }

    /// Firing point of the ballistic path.
    #[must_use]
    pub const fn start_position(&self) -> WorldPoint {
        self.start_position
    }

    /// Aim point of the ballistic path.
    #[must_use]
    pub const fn end_position(&self) -> WorldPoint {
        self.end_position
    }

    /// Sprite selector for rendering the bullet.
    #[must_use]
    pub const fn tile(&self) -> TileIndex {
        self.tile
    }

    /// Whether the bullet is still in flight; dead bullets await pruning.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Represents the authoritative Battletank world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    units: Vec<Unit>,
    bullets: Vec<Bullet>,
    config: BallisticsConfig,
    tick: i64,
    observers: ObserverRegistry,
}

impl World {
    /// Creates a new world from a validated level snapshot with default
    /// ballistics tuning.
    #[must_use]
    pub fn new(grid: Grid, spawns: Vec<UnitSpawn>) -> Self {
        Self::with_config(grid, spawns, BallisticsConfig::default())
    }

    /// Creates a new world with explicit ballistics tuning.
    #[must_use]
    pub fn with_config(grid: Grid, spawns: Vec<UnitSpawn>, config: BallisticsConfig) -> Self {
        Self {
            grid,
            units: spawns.into_iter().map(Unit::from_spawn).collect(),
            bullets: Vec::new(),
            config,
            tick: FIRST_TICK,
            observers: ObserverRegistry::default(),
        }
    }

    /// Registers a handler invoked whenever a unit is destroyed.
    ///
    /// Handlers run synchronously in registration order and must treat the
    /// notification as a read-only fan-out: no command building, no observer
    /// registration, rendering and audio side effects only.
    pub fn observe_unit_destroyed(&mut self, handler: impl FnMut(&Unit) + 'static) {
        self.observers.observe_unit_destroyed(handler);
    }

    /// Registers a handler invoked whenever a unit fires a bullet.
    ///
    /// The same fan-out rules apply as for destroyed-unit handlers.
    pub fn observe_bullet_fired(&mut self, handler: impl FnMut(&Unit) + 'static) {
        self.observers.observe_bullet_fired(handler);
    }

    fn unit_index(&self, id: UnitId) -> Option<usize> {
        let index = id.get() as usize;
        (index < self.units.len()).then_some(index)
    }

    fn bullet_index(&self, id: BulletId) -> Option<usize> {
        let index = id.get() as usize;
        (index < self.bullets.len()).then_some(index)
    }

    fn find_unit_at(&self, point: WorldPoint) -> Option<usize> {
        let cell = CellCoord::new(point.x() as i32, point.y() as i32);
        self.units.iter().position(|unit| unit.position == cell)
    }

    fn find_live_unit_at(&self, point: WorldPoint) -> Option<usize> {
        let index = self.find_unit_at(point)?;
        self.units[index].alive.then_some(index)
    }

    fn aim_unit(&mut self, id: UnitId, point: WorldPoint) {
        // Unconditional: retargeting a dead unit only turns its gun sprite.
        if let Some(index) = self.unit_index(id) {
            self.units[index].aim_target = point;
        }
    }

    fn move_unit(&mut self, id: UnitId, vector: MoveVector) {
        let Some(index) = self.unit_index(id) else {
            return;
        };
        if !self.units[index].alive {
            return;
        }

        // Heading is a rendering hint and updates even when the step below
        // gets rejected.
        let unit = &mut self.units[index];
        if vector.dx() < 0 {
            unit.orientation = 90.0;
        }
        if vector.dx() > 0 {
            unit.orientation = -90.0;
        }
        if vector.dy() < 0 {
            unit.orientation = 0.0;
        }
        if vector.dy() > 0 {
            unit.orientation = 180.0;
        }

        let candidate = unit.position.offset_by(vector);
        if !self.grid.contains_cell(candidate) {
            return;
        }
        if self.grid.wall_at(candidate).is_some() {
            return;
        }
        // Wrecks block movement just like live units.
        if self.units.iter().any(|occupant| occupant.position == candidate) {
            return;
        }

        self.units[index].position = candidate;
    }

    fn shoot(&mut self, id: UnitId) {
        let Some(index) = self.unit_index(id) else {
            return;
        };
        let unit = &self.units[index];
        if !unit.alive {
            return;
        }
        if self.tick - unit.last_fire_tick < self.config.bullet_delay {
            return;
        }

        self.units[index].last_fire_tick = self.tick;
        let bullet = Bullet::fired_by(id, &self.units[index]);
        self.bullets.push(bullet);
        self.observers.notify_bullet_fired(&self.units[index]);
    }

    fn advance_bullet(&mut self, id: BulletId) {
        let Some(index) = self.bullet_index(id) else {
            return;
        };
        if !self.bullets[index].alive {
            return;
        }

        let bullet = &self.bullets[index];
        let direction = bullet.end_position.sub(bullet.start_position).normalized();
        let next = bullet.position.add_scaled(direction, self.config.bullet_speed);
        let start = bullet.start_position;
        let end = bullet.end_position;
        let owner = bullet.owner;

        if !self.grid.is_inside(next) {
            self.bullets[index].alive = false;
            return;
        }

        // Comparing per axis against the direction sign tolerates floating
        // point overshoot of the exact endpoint.
        if reached_along(direction.x(), next.x(), end.x())
            && reached_along(direction.y(), next.y(), end.y())
        {
            self.bullets[index].alive = false;
            return;
        }

        if next.distance_to(start) > self.config.bullet_range {
            self.bullets[index].alive = false;
            return;
        }

        let center = next.add(CELL_CENTER_OFFSET);
        if let Some(victim) = self.find_live_unit_at(center) {
            if victim != owner.get() as usize {
                self.bullets[index].alive = false;
                self.units[victim].alive = false;
                self.observers.notify_unit_destroyed(&self.units[victim]);
                return;
            }
        }

        self.bullets[index].position = next;
    }

    fn prune_bullets(&mut self) {
        self.bullets.retain(|bullet| bullet.alive);
    }
}

/// Reports whether a coordinate has reached or overshot the path endpoint
/// along the travel direction of one axis.
fn reached_along(direction: f32, position: f32, end: f32) -> bool {
    if direction >= 0.0 {
        position >= end
    } else {
        position <= end
    }
}

/// Applies the provided command to the world, mutating state
/// deterministically.
///
/// Each command's effect is fully committed before the caller submits the
/// next one; there is no rollback or reordering.
pub fn apply(world: &mut World, command: Command) {
    match command {
        Command::Move { unit, vector } => world.move_unit(unit, vector),
        Command::Target { unit, point } => world.aim_unit(unit, point),
        Command::Shoot { unit } => world.shoot(unit),
        Command::AdvanceBullet { bullet } => world.advance_bullet(bullet),
        Command::PruneBullets => world.prune_bullets(),
    }
}

/// Closes the current tick after its full command batch has executed,
/// incrementing the tick counter by exactly one.
pub fn advance_tick(world: &mut World) {
    world.tick = world.tick.saturating_add(1);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{BallisticsConfig, Bullet, Grid, Unit, World};
    use battletank_core::{
        BulletId, BulletSnapshot, BulletView, UnitId, UnitSnapshot, UnitView, WorldPoint,
    };

    /// Index of the tick currently being executed.
    #[must_use]
    pub fn tick(world: &World) -> i64 {
        world.tick
    }

    /// Provides read-only access to the battleground grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Ballistics tuning active for the session.
    #[must_use]
    pub fn config(world: &World) -> BallisticsConfig {
        world.config
    }

    /// Read-only roster iteration for renderers; index order is identity
    /// order.
    #[must_use]
    pub fn units(world: &World) -> &[Unit] {
        &world.units
    }

    /// Read-only bullet roster iteration for renderers.
    #[must_use]
    pub fn bullets(world: &World) -> &[Bullet] {
        &world.bullets
    }

    /// Captures an owned snapshot view of the unit roster for systems.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        let snapshots: Vec<UnitSnapshot> = world
            .units
            .iter()
            .enumerate()
            .map(|(index, unit)| UnitSnapshot {
                id: UnitId::new(index as u32),
                cell: unit.position,
                tile: unit.tile,
                orientation: unit.orientation,
                aim_target: unit.aim_target,
                alive: unit.alive,
                last_fire_tick: unit.last_fire_tick,
            })
            .collect();
        UnitView::from_snapshots(snapshots)
    }

    /// Captures an owned snapshot view of the bullet roster for systems.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        let snapshots: Vec<BulletSnapshot> = world
            .bullets
            .iter()
            .enumerate()
            .map(|(index, bullet)| BulletSnapshot {
                id: BulletId::new(index as u32),
                position: bullet.position,
                alive: bullet.alive,
            })
            .collect();
        BulletView::from_snapshots(snapshots)
    }

    /// Reports whether a continuous point lies within the grid bounds.
    #[must_use]
    pub fn is_inside(world: &World, point: WorldPoint) -> bool {
        world.grid.is_inside(point)
    }

    /// First unit in roster order whose cell matches the integer-truncated
    /// point, dead or alive.
    #[must_use]
    pub fn find_unit_at(world: &World, point: WorldPoint) -> Option<UnitId> {
        world
            .find_unit_at(point)
            .map(|index| UnitId::new(index as u32))
    }

    /// As [`find_unit_at`], but `None` when the matched unit is dead.
    #[must_use]
    pub fn find_live_unit_at(world: &World, point: WorldPoint) -> Option<UnitId> {
        world
            .find_live_unit_at(point)
            .map(|index| UnitId::new(index as u32))
    }
}
