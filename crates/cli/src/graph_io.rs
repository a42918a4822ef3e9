use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::error::Error;
use super::types::{ActiveGraph, GraphKind};
use common::types::{Cost, Edge, VertexId};
use cost_graph_core::{DirectedGraph, GraphStore, UndirectedGraph};

/// Reads a graph file into a fresh store of the requested kind.
pub fn read_graph(path: &Path, kind: GraphKind) -> Result<ActiveGraph, Error> {
    match kind {
        GraphKind::Directed => read_graph_directed(path).map(ActiveGraph::Directed),
        GraphKind::Undirected => read_graph_undirected(path).map(ActiveGraph::Undirected),
    }
}

pub fn read_graph_directed(path: &Path) -> Result<DirectedGraph, Error> {
    parse_into(path)
}

pub fn read_graph_undirected(path: &Path) -> Result<UndirectedGraph, Error> {
    parse_into(path)
}

/// Parses the whole file before handing the store back, so a failing line
/// never leaves a half-built graph behind.
///
/// Line shapes after the `<vertex_count> <edge_count>` header:
/// `<source> <target> <cost>`, `<source> <target>` (no cost) and `<vertex>`
/// (isolated vertex).
fn parse_into<G: GraphStore + Default>(path: &Path) -> Result<G, Error> {
    let file = File::open(path)?;

    let mut rdr = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut graph = G::default();
    let mut header: Option<(usize, usize)> = None;
    let mut edge_lines = 0usize;

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields = fields_of(&record);

        if fields.is_empty() {
            continue;
        }

        if header.is_none() {
            header = Some(parse_header(&fields, line)?);
            continue;
        }

        let values = fields
            .iter()
            .map(|f| parse_field::<i64>(f, line))
            .collect::<Result<Vec<_>, _>>()?;

        let malformed = |e: common::error::Error| Error::MalformedFile {
            line,
            reason: e.to_string(),
        };

        match values.as_slice() {
            [vertex] => {
                graph.add_vertex(*vertex).map_err(malformed)?;
            }
            [source, target] => {
                graph.add_edge(*source, *target).map_err(malformed)?;
                edge_lines += 1;
            }
            [source, target, cost] => {
                graph.add_edge(*source, *target).map_err(malformed)?;
                graph
                    .modify_cost(*source, *target, *cost)
                    .map_err(malformed)?;
                edge_lines += 1;
            }
            _ => {
                return Err(Error::MalformedFile {
                    line,
                    reason: format!("expected 1 to 3 fields, found {}", values.len()),
                });
            }
        }
    }

    let (vertex_count, edge_count) = header.ok_or(Error::MalformedFile {
        line: 1,
        reason: "missing '<vertex_count> <edge_count>' header".to_string(),
    })?;

    if edge_count != edge_lines {
        warn!(
            path = %path.display(),
            header = edge_count,
            found = edge_lines,
            "Edge count in header does not match the file"
        );
    }
    if vertex_count != graph.vertex_count() {
        warn!(
            path = %path.display(),
            header = vertex_count,
            found = graph.vertex_count(),
            "Vertex count in header does not match the file"
        );
    }

    debug!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Graph file loaded"
    );
    Ok(graph)
}

/// Non-empty fields. Repeated spaces produce empty csv fields, and tabs
/// inside a field separate values as well.
fn fields_of(record: &StringRecord) -> Vec<&str> {
    record
        .iter()
        .flat_map(|f| f.split(char::is_whitespace))
        .filter(|f| !f.is_empty())
        .collect()
}

fn parse_field<T: std::str::FromStr>(field: &str, line: u64) -> Result<T, Error> {
    field.parse::<T>().map_err(|_| Error::MalformedFile {
        line,
        reason: format!("'{}' is not a valid integer", field),
    })
}

fn parse_header(fields: &[&str], line: u64) -> Result<(usize, usize), Error> {
    match fields {
        [vertices, edges] => Ok((parse_field(vertices, line)?, parse_field(edges, line)?)),
        _ => Err(Error::MalformedFile {
            line,
            reason: "expected '<vertex_count> <edge_count>' header".to_string(),
        }),
    }
}

/// Writes the graph to `path`, replacing it only once the whole file is written.
pub fn write_graph(graph: &ActiveGraph, path: &Path) -> Result<(), Error> {
    let lines: Vec<(Edge, Option<Cost>)> = match graph {
        ActiveGraph::Directed(g) => {
            let mut lines = Vec::with_capacity(g.edge_count());
            for &v in g.vertices() {
                for (s, t) in g.inbound_edges(v)? {
                    lines.push(((s, t), g.get_cost(s, t)));
                }
            }
            lines
        }
        ActiveGraph::Undirected(g) => g
            .edges()
            .into_iter()
            .map(|(s, t)| ((s, t), g.get_cost(s, t)))
            .collect(),
    };

    let (vertices, isolated) = crate::with_store!(graph, g => {
        let touched: HashSet<VertexId> = lines.iter().flat_map(|&((s, t), _)| [s, t]).collect();
        let isolated: Vec<VertexId> = g
            .vertices()
            .iter()
            .copied()
            .filter(|v| !touched.contains(v))
            .collect();
        (g.vertex_count(), isolated)
    });

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    {
        let mut wtr = WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .from_writer(&mut temp);

        wtr.write_record(&[vertices.to_string(), lines.len().to_string()])?;
        for ((s, t), cost) in &lines {
            match cost {
                Some(c) => wtr.write_record(&[s.to_string(), t.to_string(), c.to_string()])?,
                None => wtr.write_record(&[s.to_string(), t.to_string()])?,
            }
        }
        for v in &isolated {
            wtr.write_record(&[v.to_string()])?;
        }
        wtr.flush()?;
    }

    temp.persist(path).map_err(|e| Error::IoError(e.error))?;

    debug!(
        path = %path.display(),
        vertices,
        edges = lines.len(),
        "Graph file written"
    );
    Ok(())
}
