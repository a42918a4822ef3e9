use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tokio::task;
use tracing::{info, warn};

use super::command::{Command, HELP};
use super::config::Config;
use super::error::Error;
use super::generator::RandomGraphGenerator;
use super::graph_io;
use super::types::{ActiveGraph, GraphKind, SharedGraph};
use common::types::{Cost, Edge, SpanningTree, VertexId};
use cost_graph_core::{
    BellmanFordSolver, ComponentFinder, DepthFirstComponents, DirectedGraph, GraphStore,
    HamiltonianCycleSolver, HeldKarpSolver, PrimBuilder, ShortestWalkSolver, SpanningTreeBuilder,
    UndirectedGraph,
};

/// Interactive handle over one working graph.
///
/// Mutations hold the write lock for the duration of a single store call.
/// Algorithms clone a snapshot under the read lock and run on the blocking
/// pool, so the lock is never held while a solver runs.
pub struct Session {
    graph: SharedGraph,
    generator: RandomGraphGenerator,
    max_tsp_vertices: usize,
}

impl Session {
    pub fn new(graph: ActiveGraph, config: &Config) -> Self {
        Session {
            graph: Arc::new(RwLock::new(graph)),
            generator: RandomGraphGenerator::new(&config.generator),
            max_tsp_vertices: config.solver.max_tsp_vertices,
        }
    }

    async fn snapshot(&self) -> ActiveGraph {
        let graph_guard = self.graph.read().await;
        graph_guard.clone()
    }

    async fn replace(&self, graph: ActiveGraph) {
        let mut graph_guard = self.graph.write().await;
        *graph_guard = graph;
    }

    async fn kind(&self) -> GraphKind {
        self.graph.read().await.kind()
    }

    /// Runs one command and renders its result for the menu.
    pub async fn execute(&mut self, command: Command) -> Result<String, Error> {
        match command {
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok("Bye.".to_string()),
            Command::Stats => {
                let graph_guard = self.graph.read().await;
                let kind = graph_guard.kind();
                Ok(crate::with_store!(&*graph_guard, g => format!(
                    "{} graph: {} vertices, {} edges",
                    kind,
                    g.vertex_count(),
                    g.edge_count()
                )))
            }
            Command::Vertices => {
                let graph_guard = self.graph.read().await;
                let vertices = crate::with_store!(&*graph_guard, g => g.vertices().to_vec());
                Ok(format!("{:?}", vertices))
            }
            Command::Vertex(v) => {
                let graph_guard = self.graph.read().await;
                match &*graph_guard {
                    ActiveGraph::Directed(g) => {
                        let (inbound, outbound) = g.degree(v)?;
                        Ok(format!(
                            "vertex {}: in-degree {}, out-degree {}\n  in:  {}\n  out: {}",
                            v,
                            inbound,
                            outbound,
                            render_edges(&g.inbound_edges(v)?),
                            render_edges(&g.outbound_edges(v)?)
                        ))
                    }
                    ActiveGraph::Undirected(g) => Ok(format!(
                        "vertex {}: degree {}\n  edges: {}",
                        v,
                        g.degree(v)?,
                        render_edges(&g.edges_of(v)?)
                    )),
                }
            }
            Command::AddVertex(v) => {
                let mut graph_guard = self.graph.write().await;
                crate::with_store!(&mut *graph_guard, g => g.add_vertex(v))?;
                Ok(format!("Added vertex {}.", v))
            }
            Command::RemoveVertex(v) => {
                let mut graph_guard = self.graph.write().await;
                crate::with_store!(&mut *graph_guard, g => g.remove_vertex(v))?;
                Ok(format!("Removed vertex {} and its edges.", v))
            }
            Command::AddEdge(s, t, cost) => self.add_edge(s, t, cost).await,
            Command::RemoveEdge(s, t) => {
                let mut graph_guard = self.graph.write().await;
                crate::with_store!(&mut *graph_guard, g => g.remove_edge(s, t))?;
                Ok(format!("Removed edge ({}, {}).", s, t))
            }
            Command::FindEdge(s, t) => {
                let graph_guard = self.graph.read().await;
                Ok(match crate::with_store!(&*graph_guard, g => g.find_edge(s, t)) {
                    Some((a, b)) => format!("Edge ({}, {}) exists.", a, b),
                    None => format!("No edge ({}, {}).", s, t),
                })
            }
            Command::Cost(s, t) => {
                let graph_guard = self.graph.read().await;
                let (edge, cost) =
                    crate::with_store!(&*graph_guard, g => (g.find_edge(s, t), g.get_cost(s, t)));
                Ok(match (edge, cost) {
                    (None, _) => format!("No edge ({}, {}).", s, t),
                    (Some(_), None) => format!("Edge ({}, {}) has no recorded cost.", s, t),
                    (Some(_), Some(c)) => format!("cost({}, {}) = {}", s, t, c),
                })
            }
            Command::SetCost(s, t, c) => {
                let mut graph_guard = self.graph.write().await;
                crate::with_store!(&mut *graph_guard, g => g.modify_cost(s, t, c))?;
                Ok(format!("cost({}, {}) = {}", s, t, c))
            }
            Command::Walk(s, t) => self.walk(s, t).await,
            Command::Tsp(start) => self.tsp(start).await,
            Command::Mst(root) => self.mst(root).await,
            Command::Components => self.components().await,
            Command::Load(path, kind) => self.load(path, kind).await,
            Command::Save(path) => self.save(path).await,
            Command::Generate(vertices, edges, kind) => {
                let kind = match kind {
                    Some(kind) => kind,
                    None => self.kind().await,
                };
                let graph = self.generator.generate(kind, vertices, edges)?;
                self.replace(graph).await;
                Ok(format!(
                    "Generated {} graph with {} vertices and {} edges.",
                    kind, vertices, edges
                ))
            }
            Command::New(kind) => {
                let kind = match kind {
                    Some(kind) => kind,
                    None => self.kind().await,
                };
                self.replace(ActiveGraph::new(kind)).await;
                Ok(format!("Started an empty {} graph.", kind))
            }
        }
    }

    /// Inserts the edge and its cost under one write lock.
    async fn add_edge(
        &self,
        s: VertexId,
        t: VertexId,
        cost: Option<Cost>,
    ) -> Result<String, Error> {
        let mut graph_guard = self.graph.write().await;
        crate::with_store!(&mut *graph_guard, g => {
            g.add_edge(s, t)?;
            if let Some(c) = cost {
                g.modify_cost(s, t, c)?;
            }
        });

        Ok(match cost {
            Some(c) => format!("Added edge ({}, {}) with cost {}.", s, t, c),
            None => format!("Added edge ({}, {}) without a cost.", s, t),
        })
    }

    async fn directed_snapshot(&self) -> Result<DirectedGraph, Error> {
        match self.snapshot().await {
            ActiveGraph::Directed(g) => Ok(g),
            ActiveGraph::Undirected(_) => Err(Error::WrongGraphKind(GraphKind::Directed)),
        }
    }

    /// Directed graphs are folded into their undirected counterpart.
    async fn undirected_snapshot(&self) -> UndirectedGraph {
        match self.snapshot().await {
            ActiveGraph::Directed(g) => UndirectedGraph::from(&g),
            ActiveGraph::Undirected(g) => g,
        }
    }

    async fn walk(&self, s: VertexId, t: VertexId) -> Result<String, Error> {
        let graph = self.directed_snapshot().await?;

        let walk =
            task::spawn_blocking(move || BellmanFordSolver.lowest_cost_walk(&graph, s, t)).await??;

        Ok(format!(
            "Walk: {} (cost {}, {} edges)",
            render_vertices(&walk.vertices),
            walk.cost,
            walk.len()
        ))
    }

    /// Races the solver against Ctrl-C; the signal flips the cancellation
    /// flag and the solver stops at its next subset-size boundary.
    async fn tsp(&self, start: VertexId) -> Result<String, Error> {
        let graph = self.directed_snapshot().await?;

        let cancel = Arc::new(AtomicBool::new(false));
        let solver = HeldKarpSolver::new(self.max_tsp_vertices).with_cancellation(cancel.clone());
        let mut handle = task::spawn_blocking(move || solver.min_cost_cycle(&graph, start));

        let result = tokio::select! {
            joined = &mut handle => joined?,
            Ok(()) = tokio::signal::ctrl_c() => {
                warn!("Interrupt received, cancelling Held-Karp run");
                cancel.store(true, Ordering::Relaxed);
                handle.await?
            }
        };

        let cycle = result?;
        Ok(format!(
            "Tour: {} (cost {})",
            render_vertices(&cycle.tour),
            cycle.cost
        ))
    }

    async fn mst(&self, root: Option<VertexId>) -> Result<String, Error> {
        let graph = self.undirected_snapshot().await;

        let tree = task::spawn_blocking(move || match root {
            Some(root) => PrimBuilder.build_from(&graph, root),
            None => PrimBuilder.build(&graph),
        })
        .await??;

        Ok(render_tree(&tree))
    }

    async fn components(&self) -> Result<String, Error> {
        let graph = self.undirected_snapshot().await;

        let components =
            task::spawn_blocking(move || DepthFirstComponents.components(&graph)).await?;

        let mut out = format!("{} component(s)", components.len());
        for (i, component) in components.iter().enumerate() {
            out.push_str(&format!("\n  #{}: {:?}", i + 1, component));
        }
        Ok(out)
    }

    async fn load(&self, path: PathBuf, kind: Option<GraphKind>) -> Result<String, Error> {
        let kind = match kind {
            Some(kind) => kind,
            None => self.kind().await,
        };

        let source = path.clone();
        let graph = task::spawn_blocking(move || graph_io::read_graph(&source, kind)).await??;
        let summary = crate::with_store!(&graph, g => format!(
            "Loaded {} graph from {}: {} vertices, {} edges.",
            kind,
            path.display(),
            g.vertex_count(),
            g.edge_count()
        ));

        self.replace(graph).await;
        info!(path = %path.display(), %kind, "Graph replaced from file");
        Ok(summary)
    }

    async fn save(&self, path: PathBuf) -> Result<String, Error> {
        let graph = self.snapshot().await;

        let target = path.clone();
        task::spawn_blocking(move || graph_io::write_graph(&graph, &target)).await??;

        Ok(format!("Saved graph to {}.", path.display()))
    }
}

fn render_vertices(vertices: &[VertexId]) -> String {
    vertices
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn render_edges(edges: &[Edge]) -> String {
    if edges.is_empty() {
        return "-".to_string();
    }
    edges
        .iter()
        .map(|(s, t)| format!("({}, {})", s, t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_tree(tree: &SpanningTree) -> String {
    let mut out = format!(
        "Spanning tree from {}: {} vertices, total cost {}",
        tree.root,
        tree.vertex_count(),
        tree.total_cost
    );
    for edge in &tree.edges {
        out.push_str(&format!(
            "\n  {} -> parent {} (cost {})",
            edge.child, edge.parent, edge.cost
        ));
    }
    out
}
