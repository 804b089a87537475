use core::fmt;
use core::num::Saturating;
use ndarray::Array2;
use web_time::Instant;

use crate::*;

/// Recursion depth at which a reveal stops descending and defers the cell to
/// the overflow stack instead.
pub const MAX_REVEAL_DEPTH: u16 = 300;

/// A single game session. Mutating calls take `&mut self`, so one caller at a
/// time owns the turn; bots that think on another thread work on a
/// [`PlayEngine::snapshot`] and hand their move back.
#[derive(Clone, Debug)]
pub struct PlayEngine {
    mine_layout: MineLayout,
    adjacency: AdjacencyGrid,
    /// Allocated on the first reveal or flag. Only a reveal starts the game.
    board: Option<Array2<Slot>>,
    flagged_count: Saturating<CellCount>,
    stats: SessionStats,
}

impl PlayEngine {
    /// New game with a randomly placed layout.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let config = GameConfig::new((rows, cols), mines)?;
        Self::generate(config, RandomLayoutGenerator::from_entropy())
    }

    /// New game whose layout is reproducible from `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::generate(config, RandomLayoutGenerator::new(seed))
    }

    pub fn generate(config: GameConfig, generator: impl LayoutGenerator) -> Result<Self> {
        Ok(Self::from_layout(generator.generate(config)?))
    }

    pub fn from_layout(mine_layout: MineLayout) -> Self {
        Self::from_layout_at(mine_layout, Instant::now())
    }

    pub fn from_layout_at(mine_layout: MineLayout, started_at: Instant) -> Self {
        let adjacency = AdjacencyGrid::derive(&mine_layout);
        log::debug!(
            "New game on {:?} board with {} mines",
            mine_layout.size(),
            mine_layout.mine_count()
        );
        Self {
            mine_layout,
            adjacency,
            board: None,
            flagged_count: Saturating(0),
            stats: SessionStats::started_at(started_at),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.stats.status()
    }

    pub fn is_finished(&self) -> bool {
        self.status().is_finished()
    }

    pub fn statistics(&self) -> GameStatistics {
        self.stats.summary()
    }

    pub fn statistics_at(&self, now: Instant) -> GameStatistics {
        self.stats.summary_at(now)
    }

    pub fn session(&self) -> &SessionStats {
        &self.stats
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flagged_count.0
    }

    pub fn mines_left(&self) -> isize {
        (self.total_mines() as isize) - (self.flags_placed() as isize)
    }

    pub fn layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn adjacency(&self) -> &AdjacencyGrid {
        &self.adjacency
    }

    /// Player-visible state of one cell, `None` when out of bounds.
    pub fn cell_at(&self, coords: Coord2) -> Option<EngineCell> {
        if !self.mine_layout.contains(coords) {
            return None;
        }
        Some(self.board.as_ref().map_or(EngineCell::Hidden, |board| {
            board[coords.to_nd_index()].to_public()
        }))
    }

    /// Owned copy of the player view, indexed `[row, col]`.
    pub fn snapshot(&self) -> Array2<EngineCell> {
        match &self.board {
            Some(board) => board.map(|slot| slot.to_public()),
            None => Array2::default(self.size().to_nd_index()),
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        self.reveal_at(coords, Instant::now())
    }

    /// Reveals `coords` and floods its clear region. Out-of-bounds coordinates
    /// and moves after the game ended do nothing; any other call counts as a
    /// turn, even if the cell was already open.
    pub fn reveal_at(&mut self, coords: Coord2, now: Instant) -> RevealOutcome {
        if !self.mine_layout.contains(coords) || self.is_finished() {
            return RevealOutcome::NoChange;
        }

        self.stats.count_turn();

        let size = self.size();
        let board = self
            .board
            .get_or_insert_with(|| Array2::default(size.to_nd_index()));
        let revealed = Sweep::new(&self.adjacency, board).run(coords);

        match self.evaluate(now) {
            GameStatus::Lost => RevealOutcome::HitMine,
            GameStatus::Won => RevealOutcome::Won,
            GameStatus::InProgress if revealed > 0 => RevealOutcome::Revealed,
            GameStatus::InProgress => RevealOutcome::NoChange,
        }
    }

    /// Flags a hidden cell. Revealed and already flagged cells are left alone.
    pub fn place_flag(&mut self, coords: Coord2) -> MarkOutcome {
        self.mark(coords, Slot::Hidden, Slot::Flagged)
    }

    pub fn remove_flag(&mut self, coords: Coord2) -> MarkOutcome {
        self.mark(coords, Slot::Flagged, Slot::Hidden)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        match self.cell_at(coords) {
            Some(EngineCell::Flagged) => self.remove_flag(coords),
            _ => self.place_flag(coords),
        }
    }

    fn mark(&mut self, coords: Coord2, from: Slot, to: Slot) -> MarkOutcome {
        if !self.mine_layout.contains(coords) || self.is_finished() {
            return MarkOutcome::NoChange;
        }

        let size = self.size();
        let slot = &mut self
            .board
            .get_or_insert_with(|| Array2::default(size.to_nd_index()))[coords.to_nd_index()];
        if *slot != from {
            return MarkOutcome::NoChange;
        }

        *slot = to;
        match to {
            Slot::Flagged => self.flagged_count += 1,
            _ => self.flagged_count -= 1,
        }
        MarkOutcome::Changed
    }

    /// Scans the board and latches a terminal status into the session stats.
    fn evaluate(&mut self, now: Instant) -> GameStatus {
        let Some(board) = &self.board else {
            return GameStatus::InProgress;
        };

        let status = classify(&self.mine_layout, board);
        self.stats.finish(status, now);
        status
    }
}

/// One top-level reveal: depth-bounded recursion plus the LIFO stack of cells
/// deferred at [`MAX_REVEAL_DEPTH`].
struct Sweep<'a> {
    adjacency: &'a AdjacencyGrid,
    board: &'a mut Array2<Slot>,
    pending: Vec<Coord2>,
    revealed: CellCount,
    deferred: usize,
}

impl<'a> Sweep<'a> {
    fn new(adjacency: &'a AdjacencyGrid, board: &'a mut Array2<Slot>) -> Self {
        Self {
            adjacency,
            board,
            pending: Vec::new(),
            revealed: 0,
            deferred: 0,
        }
    }

    /// Returns how many cells were newly revealed.
    fn run(&mut self, start: Coord2) -> CellCount {
        self.visit(start, 0);

        while let Some(coords) = self.pending.pop() {
            self.visit(coords, 1);
        }
        if self.deferred > 0 {
            log::debug!(
                "Drained {} deferred cells revealing {:?}",
                self.deferred,
                start
            );
        }

        self.revealed
    }

    fn visit(&mut self, coords: Coord2, depth: u16) {
        let slot = &mut self.board[coords.to_nd_index()];
        if slot.is_settled() {
            return;
        }

        if depth >= MAX_REVEAL_DEPTH {
            *slot = Slot::OverflowPending;
            self.pending.push(coords);
            self.deferred += 1;
            log::trace!("Deferred {:?} at depth {}", coords, depth);
            return;
        }

        // mark before descending so a clear region never revisits itself
        let adjacency = self.adjacency[coords];
        *slot = Slot::Revealed(adjacency);
        self.revealed += 1;
        log::trace!("Revealed {:?} as {:?}", coords, adjacency);

        if adjacency.is_clear() {
            for neighbor in self.board.iter_neighbors(coords) {
                self.visit(neighbor, depth + 1);
            }
        }
    }
}

impl fmt::Display for PlayEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mine layout:")?;
        write!(f, "{}", self.mine_layout)?;
        writeln!(f, "Adjacency:")?;
        write!(f, "{}", self.adjacency)?;
        writeln!(f, "Player view:")?;
        // flags alone do not start the game
        if self.stats.turns_taken() == 0 {
            return writeln!(f, "Game has not started yet, reveal a cell!");
        }
        for row in self.snapshot().rows() {
            for cell in row {
                write!(f, " {cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
