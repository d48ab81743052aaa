use std::collections::HashSet;

use crate::ir::Graph;

use super::CoupleGroup;

/// Partitions one generation row into couples and singles.
///
/// Row order decides both the pairing priority and the left-to-right order of
/// the groups. A `spouse` edge, when one touches the person, settles the
/// outcome; otherwise the other parent of the person's first union is tried.
/// A partner that sits on another row or is already taken leaves the person
/// single.
pub fn find_couples(row: &[String], graph: &Graph) -> Vec<CoupleGroup> {
    let in_row: HashSet<&str> = row.iter().map(String::as_str).collect();
    let mut paired: HashSet<&str> = HashSet::new();
    let mut groups = Vec::with_capacity(row.len());

    for id in row {
        let id = id.as_str();
        if !paired.insert(id) {
            continue;
        }

        let partner = match graph.spouse_edge_of(id) {
            Some(idx) => graph.edges[idx].other(id),
            None => graph.junction_of(id).and_then(|junction| {
                graph
                    .junction_parents(junction)
                    .into_iter()
                    .find(|parent| *parent != id)
            }),
        }
        .filter(|partner| in_row.contains(partner) && !paired.contains(partner));

        match partner {
            Some(partner) => {
                paired.insert(partner);
                groups.push(CoupleGroup::Couple(id.to_string(), partner.to_string()));
            }
            None => groups.push(CoupleGroup::Single(id.to_string())),
        }
    }

    groups
}
