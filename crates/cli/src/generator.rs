use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

use super::config::GeneratorConfig;
use super::error::Error;
use super::types::{ActiveGraph, GraphKind};
use common::types::{Cost, Edge, VertexId};
use cost_graph_core::{DirectedGraph, GraphStore, UndirectedGraph};

/// Largest vertex count a single request may ask for.
pub const MAX_VERTICES: usize = 1_000_000;

/// Largest edge count a single request may ask for.
pub const MAX_EDGES: usize = 10_000_000;

/// Builds random graphs with vertices `0..n`, distinct non-loop edges and
/// costs drawn uniformly from the configured range.
pub struct RandomGraphGenerator {
    rng: SmallRng,
    cost_min: Cost,
    cost_max: Cost,
}

impl RandomGraphGenerator {
    /// Seeds from `config.seed` when present, from OS entropy otherwise.
    pub fn new(config: &GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        RandomGraphGenerator {
            rng,
            cost_min: config.cost_min,
            cost_max: config.cost_max,
        }
    }

    pub fn generate(
        &mut self,
        kind: GraphKind,
        vertices: usize,
        edges: usize,
    ) -> Result<ActiveGraph, Error> {
        match kind {
            GraphKind::Directed => self.directed(vertices, edges).map(ActiveGraph::Directed),
            GraphKind::Undirected => self.undirected(vertices, edges).map(ActiveGraph::Undirected),
        }
    }

    pub fn directed(&mut self, vertices: usize, edges: usize) -> Result<DirectedGraph, Error> {
        let capacity = vertices.saturating_mul(vertices.saturating_sub(1));
        let picked = self.pick_edges(vertices, edges, capacity, false)?;
        self.fill(DirectedGraph::new(), vertices, picked)
    }

    pub fn undirected(&mut self, vertices: usize, edges: usize) -> Result<UndirectedGraph, Error> {
        let capacity = vertices.saturating_mul(vertices.saturating_sub(1)) / 2;
        let picked = self.pick_edges(vertices, edges, capacity, true)?;
        self.fill(UndirectedGraph::new(), vertices, picked)
    }

    fn fill<G: GraphStore>(
        &mut self,
        mut graph: G,
        vertices: usize,
        picked: Vec<Edge>,
    ) -> Result<G, Error> {
        for v in 0..vertices as VertexId {
            graph.add_vertex(v)?;
        }
        for (s, t) in picked {
            graph.add_edge(s, t)?;
            let cost = self.rng.random_range(self.cost_min..=self.cost_max);
            graph.modify_cost(s, t, cost)?;
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "Random graph generated"
        );
        Ok(graph)
    }

    /// Distinct non-loop pairs. Undirected pairs are drawn with `s < t`.
    fn pick_edges(
        &mut self,
        vertices: usize,
        edges: usize,
        capacity: usize,
        undirected: bool,
    ) -> Result<Vec<Edge>, Error> {
        if self.cost_min > self.cost_max {
            return Err(Error::GeneratorLimit(format!(
                "empty cost range {}..={}",
                self.cost_min, self.cost_max
            )));
        }
        if vertices > MAX_VERTICES || edges > MAX_EDGES {
            return Err(Error::GeneratorLimit(format!(
                "at most {} vertices and {} edges per graph, {} and {} requested",
                MAX_VERTICES, MAX_EDGES, vertices, edges
            )));
        }
        if edges > capacity {
            return Err(Error::GeneratorLimit(format!(
                "{} edges requested but {} vertices allow at most {}",
                edges, vertices, capacity
            )));
        }

        // Dense requests enumerate every pair; sparse ones sample with rejection.
        if edges.saturating_mul(2) > capacity {
            let n = vertices as VertexId;
            let mut all: Vec<Edge> = (0..n)
                .flat_map(|s| (0..n).map(move |t| (s, t)))
                .filter(|&(s, t)| if undirected { s < t } else { s != t })
                .collect();
            all.shuffle(&mut self.rng);
            all.truncate(edges);
            return Ok(all);
        }

        let n = vertices as VertexId;
        let mut seen: HashSet<Edge> = HashSet::with_capacity(edges);
        let mut picked = Vec::with_capacity(edges);
        while picked.len() < edges {
            let s = self.rng.random_range(0..n);
            let t = self.rng.random_range(0..n);
            if s == t {
                continue;
            }
            let edge = if undirected && s > t { (t, s) } else { (s, t) };
            if seen.insert(edge) {
                picked.push(edge);
            }
        }
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: Option<u64>) -> GeneratorConfig {
        GeneratorConfig {
            cost_min: -5,
            cost_max: 20,
            seed,
        }
    }

    #[test]
    fn test_directed_counts_and_bounds() {
        let mut generator = RandomGraphGenerator::new(&config(Some(1)));
        let graph = generator.directed(10, 30).unwrap();

        assert_eq!(graph.vertex_count(), 10);
        assert_eq!(graph.edge_count(), 30);
        for (s, t) in graph.edges() {
            assert_ne!(s, t, "self-loop generated");
            assert!((0..10).contains(&s) && (0..10).contains(&t));
            let cost = graph.get_cost(s, t).expect("every edge is costed");
            assert!((-5..=20).contains(&cost), "cost out of bounds");
        }
    }

    #[test]
    fn test_complete_graphs_are_reachable() {
        let mut generator = RandomGraphGenerator::new(&config(Some(2)));

        assert_eq!(generator.directed(6, 30).unwrap().edge_count(), 30);
        assert_eq!(generator.undirected(6, 15).unwrap().edge_count(), 15);
    }

    #[test]
    fn test_seeded_generators_agree() {
        let a = RandomGraphGenerator::new(&config(Some(42)))
            .undirected(12, 20)
            .unwrap();
        let b = RandomGraphGenerator::new(&config(Some(42)))
            .undirected(12, 20)
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_too_many_edges() {
        let mut generator = RandomGraphGenerator::new(&config(Some(3)));

        assert!(matches!(
            generator.directed(3, 7),
            Err(Error::GeneratorLimit(_))
        ));
        assert!(matches!(
            generator.undirected(3, 4),
            Err(Error::GeneratorLimit(_))
        ));
        assert!(matches!(
            generator.directed(1, 1),
            Err(Error::GeneratorLimit(_))
        ));
    }

    #[test]
    fn test_oversized_requests_are_refused() {
        let mut generator = RandomGraphGenerator::new(&config(Some(4)));

        assert!(matches!(
            generator.generate(GraphKind::Directed, usize::MAX, 0),
            Err(Error::GeneratorLimit(_))
        ));
        assert!(matches!(
            generator.undirected(MAX_VERTICES + 1, 0),
            Err(Error::GeneratorLimit(_))
        ));
        assert!(matches!(
            generator.directed(MAX_VERTICES, MAX_EDGES + 1),
            Err(Error::GeneratorLimit(_))
        ));
    }

    #[test]
    fn test_empty_cost_range() {
        let mut generator = RandomGraphGenerator::new(&GeneratorConfig {
            cost_min: 3,
            cost_max: 2,
            seed: None,
        });

        assert!(matches!(
            generator.generate(GraphKind::Directed, 4, 2),
            Err(Error::GeneratorLimit(_))
        ));
    }

    #[test]
    fn test_generate_matches_kind() {
        let mut generator = RandomGraphGenerator::new(&config(None));

        let graph = generator.generate(GraphKind::Undirected, 5, 4).unwrap();
        assert_eq!(graph.kind(), GraphKind::Undirected);

        let graph = generator.generate(GraphKind::Directed, 0, 0).unwrap();
        assert_eq!(graph, ActiveGraph::new(GraphKind::Directed));
    }
}
