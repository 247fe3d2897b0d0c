//! The constraint graph of a solved program.
//!
//! Every storage in the environment is a vertex. Every constraint edge
//! `Alias(dst) >= Alias(src)` becomes a graph edge from `src` to `dst`, the
//! direction points-to information flows. Useful for asking where the
//! points-to set of a name can spread to, and for rendering with graphviz.

use crate::analysis::edge::Edge;
use crate::analysis::environment::{Environment, PointsToSet};
use crate::analysis::location::Storage;
use crate::graph;
use crate::Error;
use std::collections::BTreeMap;

/// A storage, and its final points-to set.
#[derive(Clone, Debug)]
pub struct StorageVertex {
    index: usize,
    storage: Storage,
    points_to: PointsToSet,
}

impl StorageVertex {
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn points_to(&self) -> &PointsToSet {
        &self.points_to
    }
}

impl graph::Vertex for StorageVertex {
    fn index(&self) -> usize {
        self.index
    }

    fn dot_label(&self) -> String {
        format!("{}\n{}", self.storage, self.points_to)
    }

    fn dot_fill_color(&self) -> String {
        match self.storage {
            Storage::Variable(_) => "#ffddcc".to_string(),
            Storage::Location(_) => "#ccddff".to_string(),
        }
    }
}

/// A constraint edge placed between two `StorageVertex`.
#[derive(Clone, Debug)]
pub struct ConstraintEdge {
    head: usize,
    tail: usize,
    edge: Edge,
}

impl ConstraintEdge {
    pub fn edge(&self) -> &Edge {
        &self.edge
    }
}

impl graph::Edge for ConstraintEdge {
    fn head(&self) -> usize {
        self.head
    }

    fn tail(&self) -> usize {
        self.tail
    }

    fn dot_label(&self) -> String {
        String::new()
    }

    fn dot_style(&self) -> String {
        match self.edge.dst() {
            Storage::Location(_) => "dashed".to_string(),
            Storage::Variable(_) => match self.edge.src() {
                Storage::Location(_) => "dotted".to_string(),
                Storage::Variable(_) => "solid".to_string(),
            },
        }
    }
}

/// The constraint graph.
#[derive(Clone, Debug)]
pub struct ConstraintGraph {
    graph: graph::Graph<StorageVertex, ConstraintEdge>,
    indices: BTreeMap<Storage, usize>,
}

impl ConstraintGraph {
    /// Build a graph over every key in `environment`, and every storage
    /// mentioned by `edges`.
    pub fn new<'e, I>(environment: &Environment, edges: I) -> Result<ConstraintGraph, Error>
    where
        I: IntoIterator<Item = &'e Edge>,
    {
        let mut graph = graph::Graph::new();
        let mut indices: BTreeMap<Storage, usize> = BTreeMap::new();

        let mut vertex = |storage: &Storage,
                          graph: &mut graph::Graph<StorageVertex, ConstraintEdge>|
         -> Result<usize, Error> {
            if let Some(index) = indices.get(storage) {
                return Ok(*index);
            }
            let index = indices.len();
            graph.insert_vertex(StorageVertex {
                index,
                storage: storage.clone(),
                points_to: environment.points_to(storage).clone(),
            })?;
            indices.insert(storage.clone(), index);
            Ok(index)
        };

        for (storage, _) in environment {
            vertex(storage, &mut graph)?;
        }

        for edge in edges {
            let head = vertex(edge.src(), &mut graph)?;
            let tail = vertex(edge.dst(), &mut graph)?;
            if !graph.has_edge(head, tail) {
                graph.insert_edge(ConstraintEdge {
                    head,
                    tail,
                    edge: edge.clone(),
                })?;
            }
        }

        Ok(ConstraintGraph { graph, indices })
    }

    pub fn graph(&self) -> &graph::Graph<StorageVertex, ConstraintEdge> {
        &self.graph
    }

    /// The vertex index of a storage.
    pub fn index(&self, storage: &Storage) -> Option<usize> {
        self.indices.get(storage).copied()
    }

    /// The vertex for a storage.
    pub fn vertex(&self, storage: &Storage) -> Option<&StorageVertex> {
        self.index(storage)
            .and_then(|index| self.graph.vertex(index).ok())
    }

    /// Every storage whose points-to set directly receives the points-to set of
    /// `storage`.
    pub fn flows_to(&self, storage: &Storage) -> Result<Vec<&Storage>, Error> {
        let index = self
            .index(storage)
            .ok_or_else(|| Error::Custom(format!("{} is not in the constraint graph", storage)))?;
        Ok(self
            .graph
            .successors(index)?
            .into_iter()
            .map(|vertex| &vertex.storage)
            .collect())
    }

    /// Every storage the points-to set of `storage` can reach along any path,
    /// including `storage` itself.
    pub fn reachable(&self, storage: &Storage) -> Result<Vec<&Storage>, Error> {
        let index = self
            .index(storage)
            .ok_or_else(|| Error::Custom(format!("{} is not in the constraint graph", storage)))?;
        let mut reachable = self
            .graph
            .reachable_vertices(index)?
            .into_iter()
            .map(|index| self.graph.vertex(index).map(|vertex| &vertex.storage))
            .collect::<Result<Vec<&Storage>, Error>>()?;
        reachable.sort();
        Ok(reachable)
    }

    /// Render this graph in the graphviz dot format.
    pub fn dot_graph(&self) -> String {
        self.graph.dot_graph()
    }
}
