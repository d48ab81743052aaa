//! The JSON tree document exchanged with import/export and on-disk storage.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use crate::ir::{Edge, EdgeKind, Graph, Node, NodeKind, Person};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid tree document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node `{id}` has a photo that is not valid base64: {source}")]
    Photo {
        id: String,
        #[source]
        source: base64::DecodeError,
    },
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
    #[error("tree file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeRecord {
    Person(PersonRecord),
    Junction(JunctionRecord),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub death_date: String,
    /// Single date field of older exports; read as a birth date fallback, never written.
    #[serde(default, skip_serializing)]
    pub date: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub fixed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JunctionRecord {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub fixed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl TreeDocument {
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes
            .values()
            .map(|node| match &node.kind {
                NodeKind::Person(person) => NodeRecord::Person(PersonRecord {
                    id: node.id.clone(),
                    name: person.name.clone(),
                    birth_date: Some(person.birth_date.clone()),
                    death_date: person.death_date.clone(),
                    date: None,
                    photo: person
                        .photo
                        .as_ref()
                        .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes)),
                    x: node.x,
                    y: node.y,
                    level: node.level,
                    fixed: node.pinned,
                }),
                NodeKind::Union => NodeRecord::Junction(JunctionRecord {
                    id: node.id.clone(),
                    x: node.x,
                    y: node.y,
                    level: node.level,
                    fixed: node.pinned,
                }),
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| EdgeRecord {
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind: edge.kind,
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn into_graph(self) -> Result<Graph, DocumentError> {
        let mut graph = Graph::new();
        for record in self.nodes {
            let node = match record {
                NodeRecord::Person(record) => {
                    let photo = match record.photo.as_deref() {
                        Some(encoded) if !encoded.is_empty() => Some(
                            base64::engine::general_purpose::STANDARD
                                .decode(encoded.as_bytes())
                                .map_err(|source| DocumentError::Photo {
                                    id: record.id.clone(),
                                    source,
                                })?,
                        ),
                        _ => None,
                    };
                    let person = Person {
                        name: record.name,
                        birth_date: record.birth_date.or(record.date).unwrap_or_default(),
                        death_date: record.death_date,
                        photo,
                    };
                    Node {
                        id: record.id,
                        kind: NodeKind::Person(person),
                        level: record.level,
                        x: record.x,
                        y: record.y,
                        pinned: record.fixed,
                    }
                }
                NodeRecord::Junction(record) => Node {
                    id: record.id,
                    kind: NodeKind::Union,
                    level: record.level,
                    x: record.x,
                    y: record.y,
                    pinned: record.fixed,
                },
            };
            let id = node.id.clone();
            if !graph.insert_node(node) {
                return Err(DocumentError::DuplicateId(id));
            }
        }
        graph.edges = self
            .edges
            .into_iter()
            .map(|edge| Edge {
                source: edge.source,
                target: edge.target,
                kind: edge.kind,
            })
            .collect();
        Ok(graph)
    }
}

pub fn parse_document(input: &str) -> Result<Graph, DocumentError> {
    let document: TreeDocument = serde_json::from_str(input)?;
    document.into_graph()
}

pub fn to_json(graph: &Graph) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(&TreeDocument::from_graph(graph))?)
}

pub fn load_tree(path: &Path) -> Result<Graph, DocumentError> {
    let reader = BufReader::new(File::open(path)?);
    let document: TreeDocument = serde_json::from_reader(reader)?;
    let graph = document.into_graph()?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "tree loaded"
    );
    Ok(graph)
}

pub fn save_tree(path: &Path, graph: &Graph) -> Result<(), DocumentError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &TreeDocument::from_graph(graph))?;
    tracing::debug!(path = %path.display(), nodes = graph.nodes.len(), "tree saved");
    Ok(())
}
