use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Per-cell [`Adjacency`] derived once from a [`MineLayout`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyGrid {
    cells: Array2<Adjacency>,
}

impl AdjacencyGrid {
    pub fn derive(layout: &MineLayout) -> Self {
        let size = layout.size();
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            if layout.contains_mine(coords) {
                Adjacency::Mine
            } else {
                Adjacency::from_count(layout.adjacent_mine_count(coords))
            }
        });
        Self { cells }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn get(&self, coords: Coord2) -> Option<Adjacency> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Numeric view, `-1` clear, `0` mine, `1..=8` count.
    pub fn values(&self) -> Array2<i8> {
        self.cells.map(|adjacency| adjacency.value())
    }
}

impl Index<Coord2> for AdjacencyGrid {
    type Output = Adjacency;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl fmt::Display for AdjacencyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for adjacency in row {
                write!(f, " {adjacency}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
