#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level snapshot production for Battletank.
//!
//! A battleground lives in a TOML file carrying the grid dimensions, a
//! per-layer symbol legend, and four row-string layers: decorative ground,
//! impassable walls, tanks, and towers. Loading validates the description
//! and hands back a fully-populated [`World`]; the simulation itself never
//! re-validates grid or unit data. Any defect in the description is
//! reported as a single [`LoadLevelError`] naming the offending file and a
//! human-readable reason.
//!
//! Units are seeded tanks-first, then towers, each in row-major order, so
//! the first placed tank becomes the player.

pub mod finder;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use battletank_core::{CellCoord, TileIndex};
use battletank_world::{Grid, UnitSpawn, World};
use serde::Deserialize;
use thiserror::Error;

/// Symbol that marks an empty cell in every layer.
const EMPTY_SYMBOL: char = '.';

/// Structured failure produced when a battleground description is rejected.
#[derive(Debug, Error)]
#[error("{path}: {reason}")]
pub struct LoadLevelError {
    path: String,
    reason: LoadLevelReason,
}

impl LoadLevelError {
    /// File or source name the failure refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Specific reason the description was rejected.
    #[must_use]
    pub const fn reason(&self) -> &LoadLevelReason {
        &self.reason
    }
}

/// Reasons a battleground description may be rejected.
#[derive(Debug, Error)]
pub enum LoadLevelReason {
    /// The file could not be read at all.
    #[error("failed to read the file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not well-formed TOML matching the level schema.
    #[error("failed to parse the description: {0}")]
    Parse(#[from] toml::de::Error),
    /// The grid would contain no cells.
    #[error("grid dimensions must be positive (got {width}x{height})")]
    EmptyGrid {
        /// Declared number of columns.
        width: u32,
        /// Declared number of rows.
        height: u32,
    },
    /// A layer holds the wrong number of rows for the declared grid.
    #[error("layer `{layer}` has {found} rows, expected {expected}")]
    RowCount {
        /// Name of the offending layer.
        layer: &'static str,
        /// Number of rows the grid dimensions require.
        expected: u32,
        /// Number of rows the layer actually holds.
        found: usize,
    },
    /// A layer row holds the wrong number of symbols for the declared grid.
    #[error("layer `{layer}` row {row} has {found} columns, expected {expected}")]
    RowWidth {
        /// Name of the offending layer.
        layer: &'static str,
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of columns the grid dimensions require.
        expected: u32,
        /// Number of symbols the row actually holds.
        found: usize,
    },
    /// A legend entry uses more than one character as its symbol.
    #[error("legend symbol {symbol:?} must be a single character")]
    WideSymbol {
        /// The oversized symbol as written in the legend.
        symbol: String,
    },
    /// A legend entry tries to redefine the empty-cell symbol.
    #[error("legend symbol '.' is reserved for empty cells")]
    ReservedSymbol,
    /// A layer cell uses a symbol absent from its legend.
    #[error("layer `{layer}` references unknown symbol {symbol:?} at column {column}, row {row}")]
    UnknownSymbol {
        /// Name of the offending layer.
        layer: &'static str,
        /// The unrecognized symbol.
        symbol: char,
        /// Zero-based column of the offending cell.
        column: usize,
        /// Zero-based row of the offending cell.
        row: usize,
    },
    /// The tanks layer places no unit, leaving the session without a player.
    #[error("the tanks layer must place at least one tank")]
    MissingPlayer,
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    width: u32,
    height: u32,
    tiles: TileLegend,
    layers: Layers,
}

#[derive(Debug, Deserialize)]
struct TileLegend {
    ground: BTreeMap<String, [u32; 2]>,
    walls: BTreeMap<String, [u32; 2]>,
    units: BTreeMap<String, [u32; 2]>,
}

#[derive(Debug, Deserialize)]
struct Layers {
    ground: Vec<String>,
    walls: Vec<String>,
    tanks: Vec<String>,
    towers: Vec<String>,
}

/// Loads a battleground description from disk.
pub fn load(path: &Path) -> Result<World, LoadLevelError> {
    let origin = path.display().to_string();
    let source = fs::read_to_string(path).map_err(|error| LoadLevelError {
        path: origin.clone(),
        reason: LoadLevelReason::from(error),
    })?;
    parse(&origin, &source)
}

/// Parses a battleground description from an in-memory source.
///
/// `name` identifies the source in any reported failure, mirroring the file
/// path used by [`load`].
pub fn parse(name: &str, source: &str) -> Result<World, LoadLevelError> {
    build_world(source).map_err(|reason| LoadLevelError {
        path: name.to_string(),
        reason,
    })
}

fn build_world(source: &str) -> Result<World, LoadLevelReason> {
    let file: LevelFile = toml::from_str(source)?;

    if file.width == 0 || file.height == 0 {
        return Err(LoadLevelReason::EmptyGrid {
            width: file.width,
            height: file.height,
        });
    }

    let ground = decode_terrain(
        "ground",
        &file.layers.ground,
        &file.tiles.ground,
        file.width,
        file.height,
    )?;
    let walls = decode_terrain(
        "walls",
        &file.layers.walls,
        &file.tiles.walls,
        file.width,
        file.height,
    )?;

    let mut spawns = decode_units(
        "tanks",
        &file.layers.tanks,
        &file.tiles.units,
        file.width,
        file.height,
    )?;
    if spawns.is_empty() {
        return Err(LoadLevelReason::MissingPlayer);
    }
    spawns.extend(decode_units(
        "towers",
        &file.layers.towers,
        &file.tiles.units,
        file.width,
        file.height,
    )?);

    let grid = Grid::new(file.width, file.height, ground, walls);
    Ok(World::new(grid, spawns))
}

fn decode_legend(
    entries: &BTreeMap<String, [u32; 2]>,
) -> Result<BTreeMap<char, TileIndex>, LoadLevelReason> {
    let mut legend = BTreeMap::new();
    for (symbol, tile) in entries {
        let mut characters = symbol.chars();
        let (Some(first), None) = (characters.next(), characters.next()) else {
            return Err(LoadLevelReason::WideSymbol {
                symbol: symbol.clone(),
            });
        };
        if first == EMPTY_SYMBOL {
            return Err(LoadLevelReason::ReservedSymbol);
        }
        let _ = legend.insert(first, TileIndex::new(tile[0], tile[1]));
    }
    Ok(legend)
}

fn decode_terrain(
    layer: &'static str,
    rows: &[String],
    entries: &BTreeMap<String, [u32; 2]>,
    width: u32,
    height: u32,
) -> Result<Vec<Option<TileIndex>>, LoadLevelReason> {
    let legend = decode_legend(entries)?;
    let mut cells = Vec::with_capacity(width as usize * height as usize);
    for_each_cell(layer, rows, width, height, |column, row, symbol| {
        if symbol == EMPTY_SYMBOL {
            cells.push(None);
            return Ok(());
        }
        match legend.get(&symbol) {
            Some(tile) => {
                cells.push(Some(*tile));
                Ok(())
            }
            None => Err(LoadLevelReason::UnknownSymbol {
                layer,
                symbol,
                column,
                row,
            }),
        }
    })?;
    Ok(cells)
}

fn decode_units(
    layer: &'static str,
    rows: &[String],
    entries: &BTreeMap<String, [u32; 2]>,
    width: u32,
    height: u32,
) -> Result<Vec<UnitSpawn>, LoadLevelReason> {
    let legend = decode_legend(entries)?;
    let mut spawns = Vec::new();
    for_each_cell(layer, rows, width, height, |column, row, symbol| {
        if symbol == EMPTY_SYMBOL {
            return Ok(());
        }
        match legend.get(&symbol) {
            Some(tile) => {
                spawns.push(UnitSpawn::new(
                    CellCoord::new(column as i32, row as i32),
                    *tile,
                ));
                Ok(())
            }
            None => Err(LoadLevelReason::UnknownSymbol {
                layer,
                symbol,
                column,
                row,
            }),
        }
    })?;
    Ok(spawns)
}

fn for_each_cell<F>(
    layer: &'static str,
    rows: &[String],
    width: u32,
    height: u32,
    mut visit: F,
) -> Result<(), LoadLevelReason>
where
    F: FnMut(usize, usize, char) -> Result<(), LoadLevelReason>,
{
    if rows.len() != height as usize {
        return Err(LoadLevelReason::RowCount {
            layer,
            expected: height,
            found: rows.len(),
        });
    }

    for (row_index, row) in rows.iter().enumerate() {
        let symbols: Vec<char> = row.chars().collect();
        if symbols.len() != width as usize {
            return Err(LoadLevelReason::RowWidth {
                layer,
                row: row_index,
                expected: width,
                found: symbols.len(),
            });
        }
        for (column, symbol) in symbols.into_iter().enumerate() {
            visit(column, row_index, symbol)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse, LoadLevelReason};
    use battletank_core::{CellCoord, TileIndex, UnitId, WorldPoint};
    use battletank_world::query;

    const SAMPLE: &str = r##"
width = 6
height = 4

[tiles.ground]
"," = [2, 0]

[tiles.walls]
"#" = [1, 1]

[tiles.units]
"P" = [1, 0]
"T" = [0, 2]

[layers]
ground = [
    ",,,,,,",
    ",,,,,,",
    ",,,,,,",
    ",,,,,,",
]
walls = [
    "......",
    "...#..",
    "......",
    "......",
]
tanks = [
    "......",
    ".P....",
    "......",
    "......",
]
towers = [
    "......",
    "......",
    "....T.",
    "......",
]
"##;

    #[test]
    fn a_valid_description_seeds_the_world() {
        let world = parse("sample", SAMPLE).expect("sample level parses");

        let grid = query::grid(&world);
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.wall_at(CellCoord::new(3, 1)), Some(TileIndex::new(1, 1)));
        assert_eq!(grid.wall_at(CellCoord::new(0, 0)), None);
        assert_eq!(
            grid.ground_at(CellCoord::new(5, 3)),
            Some(TileIndex::new(2, 0))
        );

        let units = query::units(&world);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].position(), CellCoord::new(1, 1));
        assert_eq!(units[0].tile(), TileIndex::new(1, 0));
        assert_eq!(units[1].position(), CellCoord::new(4, 2));
        assert_eq!(units[1].tile(), TileIndex::new(0, 2));

        assert_eq!(
            query::find_unit_at(&world, WorldPoint::new(1.0, 1.0)),
            Some(UnitId::PLAYER)
        );
    }

    #[test]
    fn row_count_mismatch_is_reported() {
        let source = SAMPLE.replacen("    \",,,,,,\",\n", "", 1);
        let error = parse("sample", &source).expect_err("short ground layer");
        assert!(matches!(
            error.reason(),
            LoadLevelReason::RowCount {
                layer: "ground",
                expected: 4,
                found: 3,
            }
        ));
        assert_eq!(error.path(), "sample");
    }

    #[test]
    fn row_width_mismatch_is_reported() {
        let source = SAMPLE.replacen("\"...#..\"", "\"...#.\"", 1);
        let error = parse("sample", &source).expect_err("narrow wall row");
        assert!(matches!(
            error.reason(),
            LoadLevelReason::RowWidth {
                layer: "walls",
                row: 1,
                expected: 6,
                found: 5,
            }
        ));
    }

    #[test]
    fn unknown_symbols_are_reported_with_their_location() {
        let source = SAMPLE.replacen("\"....T.\"", "\"....X.\"", 1);
        let error = parse("sample", &source).expect_err("unknown tower symbol");
        assert!(matches!(
            error.reason(),
            LoadLevelReason::UnknownSymbol {
                layer: "towers",
                symbol: 'X',
                column: 4,
                row: 2,
            }
        ));
    }

    #[test]
    fn oversized_legend_symbols_are_rejected() {
        let source = SAMPLE.replacen("\"P\" = [1, 0]", "\"PP\" = [1, 0]", 1);
        let error = parse("sample", &source).expect_err("wide symbol");
        assert!(matches!(
            error.reason(),
            LoadLevelReason::WideSymbol { symbol } if symbol.as_str() == "PP"
        ));
    }

    #[test]
    fn the_empty_symbol_cannot_be_redefined() {
        let source = SAMPLE.replacen("\",\" = [2, 0]", "\".\" = [2, 0]", 1);
        let error = parse("sample", &source).expect_err("reserved symbol");
        assert!(matches!(error.reason(), LoadLevelReason::ReservedSymbol));
    }

    #[test]
    fn a_level_without_tanks_is_rejected() {
        let source = SAMPLE.replacen("\".P....\"", "\"......\"", 1);
        let error = parse("sample", &source).expect_err("no player");
        assert!(matches!(error.reason(), LoadLevelReason::MissingPlayer));
    }

    #[test]
    fn degenerate_grid_dimensions_are_rejected() {
        let source = SAMPLE.replacen("height = 4", "height = 0", 1);
        let error = parse("sample", &source).expect_err("empty grid");
        assert!(matches!(
            error.reason(),
            LoadLevelReason::EmptyGrid {
                width: 6,
                height: 0,
            }
        ));
    }

    #[test]
    fn malformed_toml_is_reported_as_a_parse_failure() {
        let error = parse("sample", "width = ").expect_err("broken toml");
        assert!(matches!(error.reason(), LoadLevelReason::Parse(_)));
        assert!(error.to_string().starts_with("sample: "));
    }

    #[test]
    fn a_missing_file_is_reported_as_an_io_failure() {
        let error = super::load(std::path::Path::new("/battletank/levels/absent.toml"))
            .expect_err("missing file");
        assert!(matches!(error.reason(), LoadLevelReason::Io(_)));
        assert!(error.to_string().contains("absent.toml"));
    }
}
