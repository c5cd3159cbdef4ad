//! Visibility Graph
//!
//! Directed "shows" relation between domain records: when a record is
//! queried, the records it shows are disclosed together. Stored as an
//! id-keyed adjacency set, never as embedded record references. The
//! relation is a presentation grouping, not a hierarchy: cycles are
//! harmless because only one level (`shown(record)`) is ever read, and
//! A showing B never implies B shows A.

use std::collections::{BTreeSet, HashMap};

use crate::domain::record::RecordId;

/// Adjacency store for the directed shows relation
#[derive(Debug, Clone, Default)]
pub struct VisibilityGraph {
    edges: HashMap<RecordId, BTreeSet<RecordId>>,
}

impl VisibilityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a record's outgoing shows edges
    ///
    /// An empty target set clears the record's entry entirely.
    pub fn replace_shown(
        &mut self,
        record: RecordId,
        targets: impl IntoIterator<Item = RecordId>,
    ) {
        let set: BTreeSet<RecordId> = targets.into_iter().collect();
        if set.is_empty() {
            self.edges.remove(&record);
        } else {
            self.edges.insert(record, set);
        }
    }

    /// Outgoing shows set of a record; empty when none are configured
    pub fn shown(&self, record: RecordId) -> BTreeSet<RecordId> {
        self.edges.get(&record).cloned().unwrap_or_default()
    }

    /// Reverse lookup: records that show the given target
    pub fn showed_by(&self, target: RecordId) -> BTreeSet<RecordId> {
        self.edges
            .iter()
            .filter(|(_, targets)| targets.contains(&target))
            .map(|(source, _)| *source)
            .collect()
    }

    /// Drop a record from the graph entirely
    ///
    /// Removes its outgoing edges and every incoming edge referencing it.
    /// Called by the registrar's removal pass so deleted records never
    /// linger in other records' groups.
    pub fn remove_record(&mut self, record: RecordId) {
        self.edges.remove(&record);
        self.edges.retain(|_, targets| {
            targets.remove(&record);
            !targets.is_empty()
        });
    }

    /// Number of records with at least one outgoing edge
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: i64) -> RecordId {
        RecordId(n)
    }

    #[test]
    fn test_replace_and_read() {
        let mut graph = VisibilityGraph::new();
        graph.replace_shown(id(1), [id(2), id(3)]);

        assert_eq!(graph.shown(id(1)), BTreeSet::from([id(2), id(3)]));
        assert!(graph.shown(id(2)).is_empty());
    }

    #[test]
    fn test_replace_overwrites() {
        let mut graph = VisibilityGraph::new();
        graph.replace_shown(id(1), [id(2), id(3)]);
        graph.replace_shown(id(1), [id(4)]);

        assert_eq!(graph.shown(id(1)), BTreeSet::from([id(4)]));
    }

    #[test]
    fn test_empty_replacement_clears_entry() {
        let mut graph = VisibilityGraph::new();
        graph.replace_shown(id(1), [id(2)]);
        graph.replace_shown(id(1), []);

        assert!(graph.is_empty());
    }

    #[test]
    fn test_relation_is_directional() {
        let mut graph = VisibilityGraph::new();
        graph.replace_shown(id(1), [id(2)]);

        assert!(graph.shown(id(2)).is_empty());
        assert_eq!(graph.showed_by(id(2)), BTreeSet::from([id(1)]));
        assert!(graph.showed_by(id(1)).is_empty());
    }

    #[test]
    fn test_cycles_are_harmless() {
        let mut graph = VisibilityGraph::new();
        graph.replace_shown(id(1), [id(2)]);
        graph.replace_shown(id(2), [id(1)]);

        assert_eq!(graph.shown(id(1)), BTreeSet::from([id(2)]));
        assert_eq!(graph.shown(id(2)), BTreeSet::from([id(1)]));
    }

    #[test]
    fn test_self_edge_allowed() {
        let mut graph = VisibilityGraph::new();
        graph.replace_shown(id(1), [id(1), id(2)]);

        assert!(graph.shown(id(1)).contains(&id(1)));
    }

    #[test]
    fn test_remove_record_drops_both_directions() {
        let mut graph = VisibilityGraph::new();
        graph.replace_shown(id(1), [id(2), id(3)]);
        graph.replace_shown(id(2), [id(3)]);

        graph.remove_record(id(3));

        assert_eq!(graph.shown(id(1)), BTreeSet::from([id(2)]));
        assert!(graph.shown(id(2)).is_empty());
        assert_eq!(graph.len(), 1);
    }
}
