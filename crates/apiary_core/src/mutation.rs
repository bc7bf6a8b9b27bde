//! Species mutation rules and their resolution.

use crate::error::{GeneticsError, Result};
use crate::rng::GeneticRng;
use apiary_data::{canonical_pair, MutationEdge};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// Every registered mutation edge, in registration order, indexed by the
/// canonical parent pair.
#[derive(Debug, Clone, Default)]
pub struct MutationGraph {
    edges: Vec<MutationEdge>,
    by_parents: HashMap<(String, String), Vec<usize>>,
}

impl MutationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `{parent_a, parent_b} -> child`.
    ///
    /// `chance` must lie strictly inside (0, 1). Registering the same parents
    /// and child again replaces the chance but keeps the original position.
    pub fn add_edge(
        &mut self,
        parent_a: &str,
        parent_b: &str,
        child: &str,
        chance: f64,
    ) -> Result<()> {
        if !(chance > 0.0 && chance < 1.0) {
            return Err(GeneticsError::InvalidChance(chance));
        }
        let edge = MutationEdge::new(parent_a, parent_b, child, chance);
        let key = (edge.first_parent().to_string(), edge.second_parent().to_string());
        let slots = self.by_parents.entry(key).or_default();

        if let Some(&idx) = slots.iter().find(|&&idx| self.edges[idx] == edge) {
            tracing::debug!(child, chance, "Mutation overridden");
            self.edges[idx] = edge;
        } else {
            tracing::debug!(parent_a, parent_b, child, chance, "Mutation registered");
            slots.push(self.edges.len());
            self.edges.push(edge);
        }
        Ok(())
    }

    /// Edges matching the unordered pair, in registration order.
    pub fn candidates(&self, parent_a: &str, parent_b: &str) -> impl Iterator<Item = &MutationEdge> {
        let key = canonical_pair(parent_a.to_string(), parent_b.to_string());
        self.by_parents
            .get(&key)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.edges[idx])
    }

    /// Rolls each candidate edge at `clamp(chance * modifier)`; the first
    /// success wins. `None` when nothing matches or every roll fails.
    pub fn resolve_species<R: GeneticRng + ?Sized>(
        &self,
        parent_a: &str,
        parent_b: &str,
        modifier: f64,
        rng: &mut R,
    ) -> Option<&str> {
        self.candidates(parent_a, parent_b)
            .find(|edge| rng.roll((edge.chance() * modifier).clamp(0.0, 1.0)))
            .map(MutationEdge::child)
    }

    #[must_use]
    pub fn edges(&self) -> &[MutationEdge] {
        &self.edges
    }

    pub fn edges_for_child<'a>(&'a self, child: &'a str) -> impl Iterator<Item = &'a MutationEdge> {
        self.edges.iter().filter(move |e| e.child() == child)
    }

    pub fn edges_for_parent<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a MutationEdge> {
        self.edges.iter().filter(move |e| e.has_parent(parent))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Directed parent -> child graph. Each mutation contributes one graph
    /// edge per parent, weighted with the mutation's index.
    #[must_use]
    pub fn species_graph(&self) -> SpeciesGraph {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();
        let mut node = |graph: &mut DiGraph<String, usize>, uid: &str| {
            *nodes
                .entry(uid.to_string())
                .or_insert_with(|| graph.add_node(uid.to_string()))
        };

        for (idx, edge) in self.edges.iter().enumerate() {
            let child = node(&mut graph, edge.child());
            let first = node(&mut graph, edge.first_parent());
            let second = node(&mut graph, edge.second_parent());
            graph.add_edge(first, child, idx);
            graph.add_edge(second, child, idx);
        }
        SpeciesGraph { graph }
    }

    /// Species obtainable by breeding, starting from `roots`.
    #[must_use]
    pub fn reachable_from<'a>(&self, roots: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
        self.species_graph().reachable_from(roots, &self.edges)
    }
}

/// Petgraph view over the mutation rules, for analysis and export.
#[derive(Debug, Clone)]
pub struct SpeciesGraph {
    pub graph: DiGraph<String, usize>,
}

impl SpeciesGraph {
    /// A mutation fires once both of its parents are reachable, so this is a
    /// fixpoint over incoming edges rather than a plain traversal.
    fn reachable_from<'a>(
        &self,
        roots: impl IntoIterator<Item = &'a str>,
        edges: &[MutationEdge],
    ) -> BTreeSet<String> {
        let mut reachable: BTreeSet<String> = roots.into_iter().map(str::to_string).collect();
        loop {
            let mut grown = false;
            for idx in self.graph.node_indices() {
                let uid = &self.graph[idx];
                if reachable.contains(uid) {
                    continue;
                }
                let producible = self
                    .graph
                    .edges_directed(idx, Direction::Incoming)
                    .map(|e| &edges[*e.weight()])
                    .any(|m| reachable.contains(m.first_parent()) && reachable.contains(m.second_parent()));
                if producible {
                    reachable.insert(uid.clone());
                    grown = true;
                }
            }
            if !grown {
                return reachable;
            }
        }
    }

    /// Graphviz DOT export.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph Mutations {\n");
        dot.push_str("  node [shape=box, fontname=\"Arial\"];\n");
        for idx in self.graph.node_indices() {
            dot.push_str(&format!("  \"{}\";\n", self.graph[idx]));
        }
        for edge in self.graph.raw_edges() {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                self.graph[edge.source()],
                self.graph[edge.target()]
            ));
        }
        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn graph() -> MutationGraph {
        let mut graph = MutationGraph::new();
        graph
            .add_edge("species_forest", "species_meadows", "species_common", 0.15)
            .unwrap();
        graph
            .add_edge("species_common", "species_forest", "species_cultivated", 0.12)
            .unwrap();
        graph
    }

    #[test]
    fn test_invalid_chance_rejected() {
        let mut graph = MutationGraph::new();
        for chance in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(graph
                .add_edge("species_a", "species_b", "species_c", chance)
                .is_err());
        }
        assert!(graph.is_empty());
    }

    #[test]
    fn test_candidates_are_symmetric() {
        let graph = graph();
        let ab: Vec<_> = graph
            .candidates("species_forest", "species_meadows")
            .collect();
        let ba: Vec<_> = graph
            .candidates("species_meadows", "species_forest")
            .collect();
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 1);
    }

    #[test]
    fn test_first_match_wins() {
        let mut graph = MutationGraph::new();
        graph.add_edge("species_a", "species_b", "species_c", 0.9).unwrap();
        graph.add_edge("species_b", "species_a", "species_d", 0.9).unwrap();
        let mut rng = ScriptedRng::always_succeed();
        for _ in 0..10 {
            assert_eq!(
                graph.resolve_species("species_a", "species_b", 1.0, &mut rng),
                Some("species_c")
            );
        }
        assert_eq!(
            graph.resolve_species("species_a", "species_b", 1.0, &mut ScriptedRng::always_fail()),
            None
        );
        assert_eq!(
            graph.resolve_species("species_a", "species_x", 1.0, &mut rng),
            None
        );
    }

    #[test]
    fn test_duplicate_edge_overwrites() {
        let mut graph = graph();
        graph
            .add_edge("species_meadows", "species_forest", "species_common", 0.3)
            .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edges()[0].chance(), 0.3);
    }

    #[test]
    fn test_zero_modifier_never_fires() {
        let graph = graph();
        let mut rng = ScriptedRng::always_succeed();
        assert_eq!(
            graph.resolve_species("species_forest", "species_meadows", 0.0, &mut rng),
            None
        );
    }

    #[test]
    fn test_queries_and_reachability() {
        let graph = graph();
        assert_eq!(graph.edges_for_child("species_common").count(), 1);
        assert_eq!(graph.edges_for_parent("species_forest").count(), 2);

        let reachable = graph.reachable_from(["species_forest", "species_meadows"]);
        assert!(reachable.contains("species_cultivated"));

        let partial = graph.reachable_from(["species_forest"]);
        assert!(!partial.contains("species_common"));
        assert!(!partial.contains("species_cultivated"));
    }

    #[test]
    fn test_species_graph_shape() {
        let species = graph().species_graph();
        assert_eq!(species.graph.node_count(), 4);
        assert_eq!(species.graph.edge_count(), 4);
        let common = species
            .graph
            .node_indices()
            .find(|i| species.graph[*i] == "species_common")
            .unwrap();
        let parents: Vec<_> = species
            .graph
            .edges_directed(common, Direction::Incoming)
            .map(|e| species.graph[e.source()].clone())
            .collect();
        assert_eq!(parents.len(), 2);
        assert!(species.to_dot().contains("\"species_forest\" -> \"species_common\""));
    }
}
