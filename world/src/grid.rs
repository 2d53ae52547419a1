//! Tile spawning and the slide/merge rules applied by every move.

use rand::Rng;
use tile_rush_core::{CellCoord, Direction, Grid, MoveResult, Tile, GRID_SIDE};

const SPAWN_TWO_PROBABILITY: f64 = 0.9;
const SMALL_SPAWN: Tile = Tile::new(2);
const LARGE_SPAWN: Tile = Tile::new(4);

/// Tile placed into the board by [`spawn_tile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    /// Previously empty cell that received the tile.
    pub cell: CellCoord,
    /// Tile that was placed.
    pub tile: Tile,
}

/// Places a 2 (90%) or 4 (10%) into a uniformly chosen empty cell.
///
/// A full board is returned unchanged alongside `None`.
pub fn spawn_tile<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> (Grid, Option<Spawn>) {
    let empty_cells = grid.empty_cells();
    if empty_cells.is_empty() {
        return (*grid, None);
    }

    let cell = empty_cells[rng.gen_range(0..empty_cells.len())];
    let tile = if rng.gen_bool(SPAWN_TWO_PROBABILITY) {
        SMALL_SPAWN
    } else {
        LARGE_SPAWN
    };
    (grid.with_tile(cell, tile), Some(Spawn { cell, tile }))
}

/// Slides every line of the board toward `direction`, merging equal neighbours.
#[must_use]
pub fn apply_move(grid: &Grid, direction: Direction) -> MoveResult {
    let mut new_grid = *grid;
    let mut score_delta = 0_u64;

    for line in 0..GRID_SIDE {
        let cells = line_cells(direction, line);
        let tiles = cells.map(|cell| grid.tile(cell).unwrap_or(Tile::EMPTY));
        let (merged, line_delta) = merge_line(tiles);
        score_delta = score_delta.saturating_add(line_delta);
        for (cell, tile) in cells.into_iter().zip(merged) {
            new_grid = new_grid.with_tile(cell, tile);
        }
    }

    MoveResult {
        new_grid,
        changed: new_grid != *grid,
        score_delta,
    }
}

/// Compacts and merges a single line whose index 0 is the movement target.
///
/// Each pair merges at most once and the pair closest to the target wins, so
/// `[2, 2, 2, 0]` becomes `[4, 2, 0, 0]`. Returns the new line and the sum of
/// the merged values.
#[must_use]
pub fn merge_line(line: [Tile; GRID_SIDE]) -> ([Tile; GRID_SIDE], u64) {
    let compacted: Vec<Tile> = line.into_iter().filter(|tile| !tile.is_empty()).collect();
    let mut merged = [Tile::EMPTY; GRID_SIDE];
    let mut score_delta = 0_u64;
    let mut read = 0;
    let mut write = 0;

    while let Some(&tile) = compacted.get(read) {
        if compacted.get(read + 1) == Some(&tile) {
            let combined = tile.doubled();
            score_delta = score_delta.saturating_add(u64::from(combined.value()));
            merged[write] = combined;
            read += 2;
        } else {
            merged[write] = tile;
            read += 1;
        }
        write += 1;
    }

    (merged, score_delta)
}

/// Cells of one row or column ordered from the movement target outward.
fn line_cells(direction: Direction, line: usize) -> [CellCoord; GRID_SIDE] {
    let fixed = line as u32;
    std::array::from_fn(|position| {
        let position = if direction.toward_end() {
            GRID_SIDE - 1 - position
        } else {
            position
        };
        let offset = position as u32;
        if direction.is_horizontal() {
            CellCoord::new(offset, fixed)
        } else {
            CellCoord::new(fixed, offset)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn line(values: [u32; GRID_SIDE]) -> [Tile; GRID_SIDE] {
        values.map(Tile::new)
    }

    #[test]
    fn leading_pair_wins_in_a_chain_of_three() {
        let (merged, delta) = merge_line(line([2, 2, 2, 0]));
        assert_eq!(merged, line([4, 2, 0, 0]));
        assert_eq!(delta, 4);
    }

    #[test]
    fn gaps_are_compacted_before_merging() {
        let (merged, delta) = merge_line(line([0, 2, 0, 2]));
        assert_eq!(merged, line([4, 0, 0, 0]));
        assert_eq!(delta, 4);
    }

    #[test]
    fn merged_tiles_do_not_merge_again() {
        let (merged, delta) = merge_line(line([2, 2, 4, 4]));
        assert_eq!(merged, line([4, 8, 0, 0]));
        assert_eq!(delta, 12);

        let (merged, delta) = merge_line(line([4, 4, 8, 0]));
        assert_eq!(merged, line([8, 8, 0, 0]));
        assert_eq!(delta, 8);
    }

    #[test]
    fn alternating_values_stay_put() {
        let grid = Grid::from_values([[2, 4, 2, 4], [0; 4], [0; 4], [0; 4]]);
        let result = apply_move(&grid, Direction::Left);
        assert!(!result.changed);
        assert_eq!(result.new_grid, grid);
        assert_eq!(result.score_delta, 0);
    }

    #[test]
    fn right_and_down_gather_at_the_far_edge() {
        let grid = Grid::from_values([[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let result = apply_move(&grid, Direction::Right);
        assert_eq!(
            result.new_grid,
            Grid::from_values([[0, 0, 2, 4], [0; 4], [0; 4], [0; 4]])
        );
        assert_eq!(result.score_delta, 4);

        let grid = Grid::from_values([[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [0; 4]]);
        let result = apply_move(&grid, Direction::Down);
        assert_eq!(
            result.new_grid,
            Grid::from_values([[0; 4], [0; 4], [2, 0, 0, 0], [4, 0, 0, 0]])
        );
        assert_eq!(result.score_delta, 4);
    }

    #[test]
    fn up_merges_columns_toward_row_zero() {
        let grid = Grid::from_values([[0, 4, 0, 0], [2, 4, 0, 0], [0, 8, 0, 0], [2, 8, 0, 16]]);
        let result = apply_move(&grid, Direction::Up);
        assert!(result.changed);
        assert_eq!(
            result.new_grid,
            Grid::from_values([[4, 8, 0, 16], [0, 16, 0, 0], [0; 4], [0; 4]])
        );
        assert_eq!(result.score_delta, 4 + 8 + 16);
    }

    #[test]
    fn locked_board_is_unchanged_in_every_direction() {
        let grid = Grid::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        for direction in Direction::ALL {
            let result = apply_move(&grid, direction);
            assert!(!result.changed, "{direction} should not change a locked board");
            assert_eq!(result.new_grid, grid);
            assert_eq!(result.score_delta, 0);
        }
    }

    #[test]
    fn move_leaves_the_input_board_untouched() {
        let grid = Grid::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let snapshot = grid;
        let _ = apply_move(&grid, Direction::Left);
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn spawn_fills_exactly_one_empty_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let mut grid = Grid::from_values([[2, 0, 4, 0], [0, 8, 0, 0], [0; 4], [16, 0, 0, 2]]);

        while grid.occupied_count() < GRID_SIDE * GRID_SIDE {
            let before = grid;
            let (after, spawn) = spawn_tile(&before, &mut rng);
            let spawn = spawn.expect("board has room");

            assert_eq!(before.tile(spawn.cell), Some(Tile::EMPTY));
            assert!(spawn.tile == SMALL_SPAWN || spawn.tile == LARGE_SPAWN);
            assert_eq!(after.tile(spawn.cell), Some(spawn.tile));
            for (cell, tile) in before.cells().filter(|(cell, _)| *cell != spawn.cell) {
                assert_eq!(after.tile(cell), Some(tile));
            }
            assert_eq!(after.occupied_count(), before.occupied_count() + 1);
            grid = after;
        }
    }

    #[test]
    fn spawn_on_full_board_is_a_no_op() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = Grid::from_values([[2; 4]; 4]);
        let (after, spawn) = spawn_tile(&grid, &mut rng);
        assert_eq!(after, grid);
        assert!(spawn.is_none());
    }

    #[test]
    fn spawns_mostly_produce_twos() {
        let mut rng = ChaCha8Rng::seed_from_u64(0xfeed_beef);
        let samples = 4_000;
        let twos = (0..samples)
            .filter_map(|_| spawn_tile(&Grid::empty(), &mut rng).1)
            .filter(|spawn| spawn.tile == SMALL_SPAWN)
            .count();
        let ratio = twos as f64 / f64::from(samples);
        assert!((0.86..0.94).contains(&ratio), "ratio was {ratio}");
    }
}
