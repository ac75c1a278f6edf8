//! Session-wide repositories, injected into every table operation.

use crate::animation::AnimationScheduler;
use crate::cards::CardStore;
use crate::core::{CardId, GameRng, TableConfig};
use crate::zones::{ZoneEnv, ZoneRegistry};

/// Everything a play area operation may touch besides the play area itself.
///
/// Fields are public so operations can borrow them disjointly: a zone taken
/// out of `zones` can be handed a `ZoneEnv` built from `cards` and
/// `animator` at the same time.
#[derive(Debug)]
pub struct TableContext {
    pub config: TableConfig,
    pub cards: CardStore,
    pub zones: ZoneRegistry,
    pub animator: AnimationScheduler<CardId>,
    pub rng: GameRng,
}

impl TableContext {
    #[must_use]
    pub fn new(config: TableConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Self {
            config,
            cards: CardStore::new(),
            zones: ZoneRegistry::new(),
            animator: AnimationScheduler::new(),
            rng: rng.for_context("shuffle"),
        }
    }

    /// The zone registry next to a `ZoneEnv` over the other repositories.
    pub fn split(&mut self) -> (&mut ZoneRegistry, ZoneEnv<'_>) {
        (
            &mut self.zones,
            ZoneEnv {
                cards: &mut self.cards,
                animator: &mut self.animator,
            },
        )
    }
}

impl Default for TableContext {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}
