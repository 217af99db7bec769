pub mod graph;
pub mod model;
pub mod tiers;

// Re-export core types for convenience
pub use graph::{ConllRow, DependencyGraph, GraEdge, TreeLayout};
pub use model::{
    Affix, AffixKind, Age, CliticKind, ConfigError, Headers, ParseWarning, Participant, Token,
    Transcript, Utterance, UtteranceFlags,
};
pub use tiers::TierKind;
