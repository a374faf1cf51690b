//! Co-authorship graph assembly
//!
//! Nodes are the legislators seated in a legislature; an edge gains one
//! unit of weight for every proposal a pair co-signed. Yearly graphs take
//! their edges from a single year's proposals, legislature graphs from the
//! whole four-year term.

use crate::errors::BuilderError;
use crate::preprocess::PreparedLegislator;
use crate::records::AuthorshipRecord;
use plenum_common::graph::CoauthorshipGraph;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Authorship rows signed by other chambers are ignored
pub const DEPUTY_KIND: &str = "deputados";

/// Proposal authors grouped by year
#[derive(Debug, Default)]
pub struct AuthorshipIndex {
    by_year: BTreeMap<i32, BTreeMap<u64, Vec<u64>>>,
}

impl AuthorshipIndex {
    pub fn from_records(records: &[AuthorshipRecord]) -> Self {
        let mut by_year: BTreeMap<i32, BTreeMap<u64, Vec<u64>>> = BTreeMap::new();
        let mut skipped = 0usize;
        for record in records {
            if record.kind != DEPUTY_KIND {
                skipped += 1;
                continue;
            }
            by_year
                .entry(record.year)
                .or_default()
                .entry(record.proposal_id)
                .or_default()
                .push(record.author_id);
        }
        debug!(kept = records.len() - skipped, skipped, "Indexed authorship records");
        Self { by_year }
    }

    pub fn proposals_in(&self, year: i32) -> Option<&BTreeMap<u64, Vec<u64>>> {
        self.by_year.get(&year)
    }
}

/// Legislature seated during a given year. Terms start the year after the
/// election, so 2003 opens legislature 52, not 51.
pub fn legislature_of_year(year: i32) -> u32 {
    ((year - 1999) / 4 + 51) as u32
}

/// The four years of a legislature's term
pub fn term_years(legislature: u32) -> std::ops::RangeInclusive<i32> {
    let election = 1998 + 4 * (legislature as i32 - 51);
    election + 1..=election + 4
}

/// Distinct legislatures present among the prepared records
pub fn legislatures_of(members: &[PreparedLegislator]) -> BTreeSet<u32> {
    members.iter().map(|member| member.legislature).collect()
}

/// Graph of one calendar year. Members of the seated legislature are the
/// nodes; edges come from that year's proposals alone.
pub fn yearly_graph(
    year: i32,
    members: &[PreparedLegislator],
    index: &AuthorshipIndex,
) -> Result<CoauthorshipGraph, BuilderError> {
    let legislature = legislature_of_year(year);
    let mut graph = seed_graph(year.to_string(), members, legislature);
    if let Some(proposals) = index.proposals_in(year) {
        add_coauthorship_edges(&mut graph, proposals)?;
    }
    Ok(graph)
}

/// Graph of a whole legislature. Edges accumulate over the years of the
/// term; years with no authorship records are skipped.
pub fn legislature_graph(
    legislature: u32,
    members: &[PreparedLegislator],
    index: &AuthorshipIndex,
) -> Result<CoauthorshipGraph, BuilderError> {
    let mut graph = seed_graph(legislature.to_string(), members, legislature);
    for year in term_years(legislature) {
        if let Some(proposals) = index.proposals_in(year) {
            add_coauthorship_edges(&mut graph, proposals)?;
        }
    }
    Ok(graph)
}

fn seed_graph(
    period: String,
    members: &[PreparedLegislator],
    legislature: u32,
) -> CoauthorshipGraph {
    let mut graph = CoauthorshipGraph::new(period);
    for member in members.iter().filter(|member| member.legislature == legislature) {
        graph.add_node_with_features(member.id, member.features.clone());
    }
    graph
}

fn add_coauthorship_edges(
    graph: &mut CoauthorshipGraph,
    proposals: &BTreeMap<u64, Vec<u64>>,
) -> Result<(), BuilderError> {
    for authors in proposals.values() {
        // duplicate author rows on one proposal count once
        let authors: Vec<u64> = authors
            .iter()
            .copied()
            .collect::<BTreeSet<u64>>()
            .into_iter()
            .collect();
        for i in 0..authors.len() {
            for j in i + 1..authors.len() {
                graph.increment_edge(authors[i], authors[j], 1.0)?;
            }
        }
    }
    Ok(())
}
