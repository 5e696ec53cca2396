#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Battletank skirmishes.

mod session;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use battletank_core::{BattleStatus, CellCoord, MoveVector, PlayerInput, UnitId};
use battletank_level::finder::DirectoryLevelFinder;
use battletank_rendering::{ExplosionPlayback, Scene, TileGridPresentation};
use battletank_world::{query, World};
use clap::Parser;
use glam::Vec2;

use session::Session;

const DEFAULT_LEVEL: &str = include_str!("../levels/battleground.toml");
const TILE_LENGTH: f32 = 32.0;

#[derive(Debug, Parser)]
#[command(name = "battletank", about = "Headless Battletank skirmish runner")]
struct Args {
    /// Battleground description to load instead of the built-in arena.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Number of ticks to simulate before reporting.
    #[arg(long, default_value_t = 200)]
    ticks: u32,

    /// List the levels available under a directory and exit.
    #[arg(long, value_name = "DIR")]
    list: Option<PathBuf>,
}

/// Entry point for the Battletank command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(dir) = args.list {
        for entry in DirectoryLevelFinder::new(&dir)?.all()? {
            println!("{}\t{}", entry.name(), entry.path().display());
        }
        return Ok(());
    }

    let mut world = match &args.level {
        Some(path) => battletank_level::load(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => battletank_level::parse("battleground", DEFAULT_LEVEL)
            .context("loading the built-in battleground")?,
    };

    let explosions = Rc::new(RefCell::new(ExplosionPlayback::new()));
    {
        let explosions = Rc::clone(&explosions);
        world.observe_unit_destroyed(move |unit| {
            let cell = unit.position();
            println!("  boom: unit at ({}, {}) destroyed", cell.x(), cell.y());
            explosions.borrow_mut().spawn(cell);
        });
    }
    world.observe_bullet_fired(|unit| {
        let cell = unit.position();
        println!("  fire: shot away from ({}, {})", cell.x(), cell.y());
    });

    let tile_grid = {
        let grid = query::grid(&world);
        TileGridPresentation::new(grid.width(), grid.height(), TILE_LENGTH)?
    };

    let mut session = Session::new(world);
    for _ in 0..args.ticks {
        let input = autopilot(session.world(), tile_grid);
        if let Some(status) = session.tick(&input) {
            report_transition(status, query::tick(session.world()) - 1);
        }
        explosions.borrow_mut().advance();
    }

    let scene = Scene::compose(
        tile_grid,
        &query::unit_view(session.world()),
        &query::bullet_view(session.world()),
    );
    println!();
    println!("{}", ascii_frame(session.world(), &scene, &explosions.borrow()));
    println!(
        "after {} ticks: {}",
        query::tick(session.world()) - 1,
        describe(session.status())
    );

    Ok(())
}

/// Keeps the player tank holding its ground: aim at the nearest live
/// turret through the pointer mapping and keep the trigger held.
fn autopilot(world: &World, tile_grid: TileGridPresentation) -> PlayerInput {
    let units = query::unit_view(world);
    let Some(player) = units.player().copied() else {
        return PlayerInput::default();
    };
    let player_point = player.cell.to_point();

    let target = units
        .iter()
        .filter(|unit| unit.id != UnitId::PLAYER && unit.alive)
        .min_by(|a, b| {
            let left = a.cell.to_point().distance_to(player_point);
            let right = b.cell.to_point().distance_to(player_point);
            left.total_cmp(&right)
        });

    match target {
        Some(turret) => {
            let pointer = Vec2::new(
                (turret.cell.x() as f32 + 0.5) * tile_grid.tile_length(),
                (turret.cell.y() as f32 + 0.5) * tile_grid.tile_length(),
            );
            PlayerInput {
                movement: MoveVector::default(),
                fire: true,
                cursor: tile_grid.pointer_to_world(pointer),
            }
        }
        None => PlayerInput::default(),
    }
}

fn report_transition(status: BattleStatus, tick: i64) {
    println!("  tick {tick}: {}", describe(status));
}

fn describe(status: BattleStatus) -> &'static str {
    match status {
        BattleStatus::Ongoing => "the field is still contested",
        BattleStatus::Won => "every turret is down, victory",
        BattleStatus::Lost => "the player tank is destroyed, defeat",
    }
}

/// Renders one terminal frame: walls, units (player `P`/`p`, turrets
/// `T`/`t`, lowercase for wrecks), bullets `*`, explosions `!`.
fn ascii_frame(world: &World, scene: &Scene, explosions: &ExplosionPlayback) -> String {
    let grid = query::grid(world);
    let width = grid.width() as usize;
    let height = grid.height() as usize;

    let mut rows: Vec<Vec<char>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let cell = CellCoord::new(x as i32, y as i32);
                    if grid.wall_at(cell).is_some() {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect();

    let mut plot = |x: i32, y: i32, glyph: char| {
        if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
            rows[y as usize][x as usize] = glyph;
        }
    };

    for (index, unit) in scene.units.iter().enumerate() {
        let glyph = match (index == 0, unit.alive) {
            (true, true) => 'P',
            (true, false) => 'p',
            (false, true) => 'T',
            (false, false) => 't',
        };
        plot(unit.cell.x(), unit.cell.y(), glyph);
    }
    for bullet in &scene.bullets {
        plot(bullet.position.x() as i32, bullet.position.y() as i32, '*');
    }
    for explosion in explosions.iter() {
        plot(explosion.cell().x(), explosion.cell().y(), '!');
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<String>>()
        .join("\n")
}
