/// Dependent-tier classification for `%`-prefixed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TierKind {
    /// `%mor`: morphology.
    Mor,
    /// `%gra`: grammatical dependency relations.
    Gra,
    /// `%pho`: phonology.
    Pho,
    /// `%com`: transcriber comment.
    Com,
    /// `%tim`: time stamp.
    Tim,
    /// `%act`: action.
    Act,
    /// Any other dependent tier, carried verbatim.
    Other,
}

impl TierKind {
    pub fn from_marker(marker: &str) -> TierKind {
        match marker.trim_end_matches(':') {
            "%mor" => TierKind::Mor,
            "%gra" => TierKind::Gra,
            "%pho" => TierKind::Pho,
            "%com" => TierKind::Com,
            "%tim" => TierKind::Tim,
            "%act" => TierKind::Act,
            _ => TierKind::Other,
        }
    }

    pub fn marker(&self) -> Option<&'static str> {
        match self {
            TierKind::Mor => Some("%mor"),
            TierKind::Gra => Some("%gra"),
            TierKind::Pho => Some("%pho"),
            TierKind::Com => Some("%com"),
            TierKind::Tim => Some("%tim"),
            TierKind::Act => Some("%act"),
            TierKind::Other => None,
        }
    }
}
