//! `%gra` tier decoding into dependency graphs.

use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, rest},
    IResult,
};

use lalia_protocol::{DependencyGraph, GraEdge};

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(input)
}

/// Outcome of decoding one `%gra` line against an expected element count.
pub struct GraOutcome {
    pub graph: DependencyGraph,
    pub n_triples: usize,
    /// Triple count disagreed with the element count.
    pub mismatch: bool,
}

/// Decode a whitespace-separated triple sequence. A malformed triple forces
/// the graph faulty; edges parsed so far are kept best-effort.
pub fn decode_gra_tier(gra_line: &str, n_elements: usize) -> GraOutcome {
    let mut edges = Vec::new();
    let mut malformed = false;
    let mut n_triples = 0usize;

    for item in gra_line.split_whitespace() {
        n_triples += 1;
        match parse_triple(item) {
            Some(edge) => edges.push(edge),
            None => malformed = true,
        }
    }

    let mismatch = n_triples != n_elements;
    let graph = if malformed {
        DependencyGraph::faulty_with(n_elements, edges)
    } else {
        DependencyGraph::new(n_elements, edges)
    };
    GraOutcome {
        graph,
        n_triples,
        mismatch,
    }
}

fn parse_triple(item: &str) -> Option<GraEdge> {
    let (_, edge) = all_consuming(triple)(item).ok()?;
    Some(edge)
}

/// `dep|head|rel`, e.g. `2|0|ROOT`.
fn triple(input: &str) -> IResult<&str, GraEdge> {
    let (input, dependent) = index(input)?;
    let (input, _) = char('|')(input)?;
    let (input, head) = index(input)?;
    let (input, _) = char('|')(input)?;
    let (input, relation) = rest(input)?;
    Ok((
        input,
        GraEdge {
            dependent,
            head,
            relation: relation.to_string(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_tier_decodes() {
        let outcome = decode_gra_tier("1|2|SUBJ 2|0|ROOT 3|2|OBJ 4|2|PUNCT", 4);
        assert!(!outcome.mismatch);
        assert!(!outcome.graph.is_faulty());
        assert_eq!(outcome.graph.edges().len(), 4);
        assert_eq!(outcome.graph.head_of(2), Some(0));
        assert_eq!(outcome.graph.rel_of(3), Some("OBJ"));
    }

    #[test]
    fn count_mismatch_reported() {
        let outcome = decode_gra_tier("1|0|ROOT", 3);
        assert!(outcome.mismatch);
        assert!(outcome.graph.is_faulty());
    }

    #[test]
    fn malformed_triple_forces_faulty() {
        let outcome = decode_gra_tier("1|2|SUBJ junk 3|0|ROOT", 3);
        assert!(!outcome.mismatch);
        assert!(outcome.graph.is_faulty());
        assert_eq!(outcome.graph.edges().len(), 2);
    }

    #[test]
    fn relation_may_carry_punctuation() {
        let outcome = decode_gra_tier("1|0|ROOT-CSUBJ", 1);
        assert!(!outcome.graph.is_faulty());
        assert_eq!(outcome.graph.edges()[0].relation, "ROOT-CSUBJ");
    }
}
