use std::fmt;

use super::{ImmediateThreatStrategy, LookaheadStrategy, RandomStrategy, Strategy};
use crate::board::Color;
use crate::error::RegistryError;

/// Builds a fresh strategy for the given seat color
pub type StrategyFactory = fn(Color) -> Box<dyn Strategy>;

/// A named strategy constructor, the token carried through a tournament
#[derive(Copy, Clone)]
pub struct Entrant {
    id: &'static str,
    factory: StrategyFactory,
}

impl Entrant {
    pub fn new(id: &'static str, factory: StrategyFactory) -> Self {
        Self { id, factory }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Constructs a new strategy instance playing `color`
    pub fn build(&self, color: Color) -> Box<dyn Strategy> {
        (self.factory)(color)
    }
}

impl fmt::Debug for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Entrant").field(&self.id).finish()
    }
}

impl PartialEq for Entrant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entrant {}

/// Maps strategy identifiers to their factories
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entrants: Vec<Entrant>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in strategies
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("random", |_| Box::new(RandomStrategy::new()));
        registry.register("immediate-threat", |color| {
            Box::new(ImmediateThreatStrategy::new(color))
        });
        registry.register("lookahead", |color| Box::new(LookaheadStrategy::new(color)));
        registry.register("lookahead-corrected", |color| {
            Box::new(LookaheadStrategy::new(color).with_corrected_threat_sign(true))
        });
        registry
    }

    /// Adds a strategy, replacing any existing one with the same id
    pub fn register(&mut self, id: &'static str, factory: StrategyFactory) {
        let entrant = Entrant::new(id, factory);
        match self.entrants.iter_mut().find(|e| e.id == id) {
            Some(existing) => *existing = entrant,
            None => self.entrants.push(entrant),
        }
    }

    pub fn resolve(&self, id: &str) -> Result<Entrant, RegistryError> {
        self.entrants
            .iter()
            .find(|e| e.id == id)
            .copied()
            .ok_or_else(|| RegistryError::UnknownStrategy {
                id: id.to_string(),
                known: self.ids().map(str::to_string).collect(),
            })
    }

    /// Resolves every id in order, failing on the first unknown one
    pub fn resolve_all<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Entrant>, RegistryError> {
        ids.iter().map(|id| self.resolve(id.as_ref())).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entrants.iter().map(|e| e.id)
    }
}
