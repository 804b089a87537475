use ndarray::Array2;

use crate::*;

/// Cell state the status scan can ask "has this been genuinely revealed?".
pub trait Exposure {
    fn is_exposed(&self) -> bool;
}

impl Exposure for EngineCell {
    fn is_exposed(&self) -> bool {
        self.is_revealed()
    }
}

impl Exposure for Slot {
    fn is_exposed(&self) -> bool {
        matches!(self, Slot::Revealed(_))
    }
}

/// Classifies a board view against the layout. A revealed mine is a loss even
/// when every safe cell is open too; flags never count as revealed.
pub fn classify<C: Exposure>(layout: &MineLayout, cells: &Array2<C>) -> GameStatus {
    let mut boom = false;
    let mut cleared = true;

    for ((row, col), cell) in cells.indexed_iter() {
        let coords = (row as Coord, col as Coord);
        match (layout.contains_mine(coords), cell.is_exposed()) {
            (true, true) => boom = true,
            (false, false) => cleared = false,
            _ => {}
        }
    }

    if boom {
        GameStatus::Lost
    } else if cleared {
        GameStatus::Won
    } else {
        GameStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(size: Coord2, revealed: &[Coord2], flagged: &[Coord2]) -> Array2<EngineCell> {
        let mut cells: Array2<EngineCell> = Array2::default(size.to_nd_index());
        for &coords in revealed {
            cells[coords.to_nd_index()] = EngineCell::Revealed(Adjacency::Clear);
        }
        for &coords in flagged {
            cells[coords.to_nd_index()] = EngineCell::Flagged;
        }
        cells
    }

    fn all_but(size: Coord2, skip: Coord2) -> Vec<Coord2> {
        (0..size.0)
            .flat_map(|row| (0..size.1).map(move |col| (row, col)))
            .filter(|&coords| coords != skip)
            .collect()
    }

    #[test]
    fn untouched_board_is_in_progress() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        assert_eq!(classify(&layout, &view((2, 2), &[], &[])), GameStatus::InProgress);
    }

    #[test]
    fn revealed_mine_loses_even_with_everything_open() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let everything = [(0, 0), (0, 1), (1, 0), (1, 1)];

        assert_eq!(classify(&layout, &view((2, 2), &everything, &[])), GameStatus::Lost);
        assert_eq!(classify(&layout, &view((2, 2), &[(0, 0)], &[])), GameStatus::Lost);
    }

    #[test]
    fn won_exactly_when_every_safe_cell_is_revealed() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(1, 1)]).unwrap();
        let safe = all_but((3, 3), (1, 1));

        assert_eq!(classify(&layout, &view((3, 3), &safe, &[])), GameStatus::Won);
        assert_eq!(
            classify(&layout, &view((3, 3), &safe[1..], &[])),
            GameStatus::InProgress
        );
    }

    #[test]
    fn flags_neither_win_nor_lose() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(1, 1)]).unwrap();
        let safe = all_but((3, 3), (1, 1));

        assert_eq!(
            classify(&layout, &view((3, 3), &safe, &[(1, 1)])),
            GameStatus::Won
        );
        assert_eq!(
            classify(&layout, &view((3, 3), &safe[1..], &[safe[0]])),
            GameStatus::InProgress
        );
    }
}
