use std::path::PathBuf;
use std::str::FromStr;

use super::error::Error;
use super::types::GraphKind;
use common::types::{Cost, VertexId};

pub const HELP: &str = "\
Commands:
  help                                  show this menu
  stats                                 kind, vertex and edge counts
  vertices                              list vertices in insertion order
  vertex <v>                            degree and incident edges of <v>
  add-vertex <v> | remove-vertex <v>
  add-edge <s> <t> [cost] | remove-edge <s> <t>
  find-edge <s> <t> | cost <s> <t> | set-cost <s> <t> <c>
  walk <s> <t>                          lowest-cost walk (directed)
  tsp <start>                           exact Hamiltonian cycle (directed, Ctrl-C cancels)
  mst [root]                            Prim's minimum spanning tree
  components                            connected components
  load <path> [directed|undirected]     replace the graph with a file
  save <path>                           write the graph to a file
  generate <vertices> <edges> [directed|undirected]
  new [directed|undirected]             start from an empty graph
  quit                                  also Ctrl-C at the prompt";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Stats,
    Vertices,
    Vertex(VertexId),
    AddVertex(VertexId),
    RemoveVertex(VertexId),
    AddEdge(VertexId, VertexId, Option<Cost>),
    RemoveEdge(VertexId, VertexId),
    FindEdge(VertexId, VertexId),
    Cost(VertexId, VertexId),
    SetCost(VertexId, VertexId, Cost),
    Walk(VertexId, VertexId),
    Tsp(VertexId),
    Mst(Option<VertexId>),
    Components,
    Load(PathBuf, Option<GraphKind>),
    Save(PathBuf),
    Generate(usize, usize, Option<GraphKind>),
    New(Option<GraphKind>),
    Quit,
}

fn number<T: FromStr>(arg: &str) -> Result<T, Error> {
    arg.parse::<T>()
        .map_err(|_| Error::InvalidCommand(format!("'{}' is not a valid number", arg)))
}

fn kind(arg: Option<&&str>) -> Result<Option<GraphKind>, Error> {
    arg.map(|k| k.parse::<GraphKind>()).transpose()
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((name, args)) = words.split_first() else {
            return Err(Error::InvalidCommand("empty input".to_string()));
        };

        let command = match (name.to_lowercase().as_str(), args) {
            ("help" | "?", []) => Command::Help,
            ("stats", []) => Command::Stats,
            ("vertices", []) => Command::Vertices,
            ("vertex", [v]) => Command::Vertex(number(v)?),
            ("add-vertex", [v]) => Command::AddVertex(number(v)?),
            ("remove-vertex", [v]) => Command::RemoveVertex(number(v)?),
            ("add-edge", [s, t]) => Command::AddEdge(number(s)?, number(t)?, None),
            ("add-edge", [s, t, c]) => Command::AddEdge(number(s)?, number(t)?, Some(number(c)?)),
            ("remove-edge", [s, t]) => Command::RemoveEdge(number(s)?, number(t)?),
            ("find-edge", [s, t]) => Command::FindEdge(number(s)?, number(t)?),
            ("cost", [s, t]) => Command::Cost(number(s)?, number(t)?),
            ("set-cost", [s, t, c]) => Command::SetCost(number(s)?, number(t)?, number(c)?),
            ("walk", [s, t]) => Command::Walk(number(s)?, number(t)?),
            ("tsp", [s]) => Command::Tsp(number(s)?),
            ("mst", []) => Command::Mst(None),
            ("mst", [root]) => Command::Mst(Some(number(root)?)),
            ("components", []) => Command::Components,
            ("load", [path, rest @ ..]) if rest.len() <= 1 => {
                Command::Load(PathBuf::from(*path), kind(rest.first())?)
            }
            ("save", [path]) => Command::Save(PathBuf::from(*path)),
            ("generate", [v, e, rest @ ..]) if rest.len() <= 1 => {
                Command::Generate(number(v)?, number(e)?, kind(rest.first())?)
            }
            ("new", rest) if rest.len() <= 1 => Command::New(kind(rest.first())?),
            ("quit" | "exit", []) => Command::Quit,
            (other, _) => {
                return Err(Error::InvalidCommand(format!(
                    "'{}' with {} argument(s); type 'help' for the command list",
                    other,
                    args.len()
                )));
            }
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_edge_commands() {
        assert_eq!(
            "add-edge 1 2".parse::<Command>().unwrap(),
            Command::AddEdge(1, 2, None)
        );
        assert_eq!(
            "add-edge -1 2 -30".parse::<Command>().unwrap(),
            Command::AddEdge(-1, 2, Some(-30))
        );
        assert_eq!(
            "  SET-COST 3   4 5 ".parse::<Command>().unwrap(),
            Command::SetCost(3, 4, 5)
        );
    }

    #[test]
    fn test_parses_optional_arguments() {
        assert_eq!("mst".parse::<Command>().unwrap(), Command::Mst(None));
        assert_eq!("mst 7".parse::<Command>().unwrap(), Command::Mst(Some(7)));
        assert_eq!("new".parse::<Command>().unwrap(), Command::New(None));
        assert_eq!(
            "generate 10 20 u".parse::<Command>().unwrap(),
            Command::Generate(10, 20, Some(GraphKind::Undirected))
        );
        assert_eq!(
            "load graph.txt directed".parse::<Command>().unwrap(),
            Command::Load(PathBuf::from("graph.txt"), Some(GraphKind::Directed))
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            "".parse::<Command>(),
            Err(Error::InvalidCommand(_))
        ));
        assert!(matches!(
            "walk 1".parse::<Command>(),
            Err(Error::InvalidCommand(_))
        ));
        assert!(matches!(
            "walk 1 two".parse::<Command>(),
            Err(Error::InvalidCommand(_))
        ));
        assert!(matches!(
            "generate -3 2".parse::<Command>(),
            Err(Error::InvalidCommand(_))
        ));
        assert!(matches!(
            "new mixed".parse::<Command>(),
            Err(Error::InvalidCommand(_))
        ));
        assert!(matches!(
            "fly 1 2".parse::<Command>(),
            Err(Error::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_help_lists_every_command() {
        for name in [
            "stats", "vertices", "add-vertex", "remove-vertex", "add-edge", "remove-edge",
            "find-edge", "set-cost", "walk", "tsp", "mst", "components", "load", "save",
            "generate", "new", "quit",
        ] {
            assert!(HELP.contains(name), "help is missing {}", name);
        }
    }
}
