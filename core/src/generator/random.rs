use super::*;

/// Uniform placement with no first-move protection: draws `(row, col)` pairs
/// and rejects the ones that already hold a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds from OS entropy. The seed is logged so the board can be replayed.
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        log::debug!("Drew layout seed {}", seed);
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        // rejection sampling never terminates on a full board
        config.validate()?;

        let (rows, cols) = config.size;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut mines_placed = 0;

        while mines_placed < config.mines {
            let coords: Coord2 = (rng.random_range(0..rows), rng.random_range(0..cols));
            let cell = &mut mines[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                mines_placed += 1;
            }
        }

        log::debug!(
            "Generated {}x{} layout with {} mines from seed {}",
            rows,
            cols,
            mines_placed,
            self.seed
        );
        MineLayout::from_mine_mask(mines)
    }
}
