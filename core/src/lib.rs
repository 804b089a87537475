//! Minesweeper board engine: mine layout generation, adjacency counts,
//! flood-fill reveal, flagging and win/loss tracking.
//!
//! Front ends and bots drive a [`PlayEngine`] through [`PlayEngine::reveal`]
//! and [`PlayEngine::place_flag`] and read it back through
//! [`PlayEngine::snapshot`], [`PlayEngine::status`] and
//! [`PlayEngine::statistics`].

use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use adjacency::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use stats::*;
pub use status::*;
pub use tile::*;
pub use types::*;

mod adjacency;
mod engine;
mod error;
mod generator;
mod stats;
mod status;
mod tile;
mod types;

/// Board dimensions and mine count. Deserialized values are unchecked until
/// [`GameConfig::validate`] runs, which every engine constructor does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    /// 9×9 with 10 mines.
    pub const fn easy() -> Self {
        Self::new_unchecked((9, 9), 10)
    }

    /// 16×16 with 40 mines.
    pub const fn medium() -> Self {
        Self::new_unchecked((16, 16), 40)
    }

    /// 16 rows by 30 columns with 99 mines.
    pub const fn hard() -> Self {
        Self::new_unchecked((16, 30), 99)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }
        if self.mines == 0 {
            return Err(GameError::NoMines);
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Where the mines are. Immutable once built. Serialized as the bare mask, and
/// deserialization goes through [`MineLayout::from_mine_mask`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<bool>", into = "Array2<bool>")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Wraps a mask indexed `[row, col]`, rejecting masks that would not make
    /// a playable game.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let size: Coord2 = (
            rows.try_into().map_err(|_| GameError::InvalidCoords)?,
            cols.try_into().map_err(|_| GameError::InvalidCoords)?,
        );
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        // bounded by rows * cols, which fits with both axes in range
        let mine_count = mine_count as CellCount;

        GameConfig::new_unchecked(size, mine_count).validate()?;
        Ok(Self {
            mine_mask,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size().0, self.size().1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most eight neighbors
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }
}

impl TryFrom<Array2<bool>> for MineLayout {
    type Error = GameError;

    fn try_from(mine_mask: Array2<bool>) -> Result<Self> {
        Self::from_mine_mask(mine_mask)
    }
}

impl From<MineLayout> for Array2<bool> {
    fn from(layout: MineLayout) -> Self {
        layout.mine_mask
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

impl fmt::Display for MineLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.mine_mask.rows() {
            for &is_mine in row {
                f.write_str(if is_mine { " *" } else { " ." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// What a single top-level reveal did, so callers can skip redraws.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for config in [GameConfig::easy(), GameConfig::medium(), GameConfig::hard()] {
            assert_eq!(config.validate(), Ok(()));
        }
        assert_eq!(GameConfig::hard().total_cells(), 480);
    }

    #[test]
    fn config_rejects_full_and_empty_boards() {
        assert_eq!(GameConfig::new((1, 1), 1), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new((3, 3), 10), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new((0, 3), 1), Err(GameError::EmptyBoard));
        assert_eq!(GameConfig::new((3, 0), 1), Err(GameError::EmptyBoard));
        assert_eq!(GameConfig::new((3, 3), 0), Err(GameError::NoMines));
        assert!(GameConfig::new((3, 3), 8).is_ok());
    }

    #[test]
    fn config_round_trips_through_json() {
        let json = serde_json::to_string(&GameConfig::medium()).unwrap();
        let parsed: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, GameConfig::medium());
    }

    #[test]
    fn layout_from_coords_counts_mines() {
        let layout = MineLayout::from_mine_coords((3, 4), &[(0, 0), (2, 3), (2, 3)]).unwrap();

        assert_eq!(layout.size(), (3, 4));
        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 10);
        assert!(layout.contains_mine((2, 3)));
        assert_eq!(layout.adjacent_mine_count((1, 1)), 1);
        assert_eq!(layout.iter_mines().collect::<Vec<_>>(), vec![(0, 0), (2, 3)]);
    }

    #[test]
    fn layout_rejects_out_of_bounds_and_unplayable_masks() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(
            MineLayout::from_mine_coords((1, 1), &[(0, 0)]),
            Err(GameError::TooManyMines)
        );
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[]),
            Err(GameError::NoMines)
        );
    }

    #[test]
    fn layout_round_trips_through_json() {
        let layout = MineLayout::from_mine_coords((2, 3), &[(0, 1), (1, 2)]).unwrap();

        let json = serde_json::to_string(&layout).unwrap();
        let parsed: MineLayout = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, layout);
        assert_eq!(parsed.mine_count(), 2);
    }

    #[test]
    fn deserialized_layout_is_validated() {
        let empty = serde_json::to_string(&Array2::<bool>::default((2, 2))).unwrap();
        let full = serde_json::to_string(&Array2::from_elem((2, 2), true)).unwrap();
        let mut too_tall = Array2::<bool>::default((256, 1));
        too_tall[[0, 0]] = true;
        let too_tall = serde_json::to_string(&too_tall).unwrap();

        assert!(serde_json::from_str::<MineLayout>(&empty).is_err());
        assert!(serde_json::from_str::<MineLayout>(&full).is_err());
        assert!(serde_json::from_str::<MineLayout>(&too_tall).is_err());
    }

    #[test]
    fn layout_renders_one_line_per_row() {
        let layout = MineLayout::from_mine_coords((2, 3), &[(1, 2)]).unwrap();
        assert_eq!(layout.to_string(), " . . .\n . . *\n");
    }
}
