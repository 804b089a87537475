use crate::*;
pub use random::*;

mod random;

/// Produces the mine layout for a new game.
pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}
