//! Implements a directed graph.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::Error;

pub trait Vertex: Clone {
    // The index of this vertex.
    fn index(&self) -> usize;
    // A string to display in dot graphviz format.
    fn dot_label(&self) -> String;
    // Fill color in dot graphviz format.
    fn dot_fill_color(&self) -> String {
        "#ffddcc".to_string()
    }
    // Font color in dot graphviz format.
    fn dot_font_color(&self) -> String {
        "#000000".to_string()
    }
}

pub trait Edge: Clone {
    /// The index of the head vertex.
    fn head(&self) -> usize;
    /// The index of the tail vertex.
    fn tail(&self) -> usize;
    /// A string to display in dot graphviz format.
    fn dot_label(&self) -> String;
    // Style in dot graphviz format.
    fn dot_style(&self) -> String {
        "solid".to_string()
    }
}

/// A directed graph.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, Default)]
pub struct Graph<V: Vertex, E: Edge> {
    vertices: BTreeMap<usize, V>,
    edges: BTreeMap<(usize, usize), E>,
    successors: BTreeMap<usize, BTreeSet<usize>>,
    predecessors: BTreeMap<usize, BTreeSet<usize>>,
}

impl<V, E> Graph<V, E>
where
    V: Vertex,
    E: Edge,
{
    pub fn new() -> Graph<V, E> {
        Graph {
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            successors: BTreeMap::new(),
            predecessors: BTreeMap::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the vertex with the given index exists in this graph
    pub fn has_vertex(&self, index: usize) -> bool {
        self.vertices.contains_key(&index)
    }

    /// Returns true if the edge with the given head and tail index exists in this graph
    pub fn has_edge(&self, head: usize, tail: usize) -> bool {
        self.edges.contains_key(&(head, tail))
    }

    /// Inserts a vertex into the graph.
    /// # Errors
    /// Error if the vertex already exists by index.
    pub fn insert_vertex(&mut self, v: V) -> Result<(), Error> {
        if self.vertices.contains_key(&v.index()) {
            return Err("duplicate vertex index".into());
        }
        self.successors.insert(v.index(), BTreeSet::new());
        self.predecessors.insert(v.index(), BTreeSet::new());
        self.vertices.insert(v.index(), v);
        Ok(())
    }

    /// Inserts an edge into the graph.
    /// # Errors
    /// Error if the edge already exists by indices.
    pub fn insert_edge(&mut self, edge: E) -> Result<(), Error> {
        if self.edges.contains_key(&(edge.head(), edge.tail())) {
            return Err("duplicate edge".into());
        }
        if !self.vertices.contains_key(&edge.head()) {
            return Err(Error::GraphVertexNotFound(edge.head()));
        }
        if !self.vertices.contains_key(&edge.tail()) {
            return Err(Error::GraphVertexNotFound(edge.tail()));
        }

        self.successors
            .entry(edge.head())
            .or_default()
            .insert(edge.tail());
        self.predecessors
            .entry(edge.tail())
            .or_default()
            .insert(edge.head());
        self.edges.insert((edge.head(), edge.tail()), edge);

        Ok(())
    }

    /// Returns all immediate successors of a vertex from the graph.
    pub fn successors(&self, index: usize) -> Result<Vec<&V>, Error> {
        let successors = self
            .successors
            .get(&index)
            .ok_or(Error::GraphVertexNotFound(index))?;

        Ok(successors
            .iter()
            .filter_map(|index| self.vertices.get(index))
            .collect())
    }

    /// Returns all immediate predecessors of a vertex from the graph.
    pub fn predecessors(&self, index: usize) -> Result<Vec<&V>, Error> {
        let predecessors = self
            .predecessors
            .get(&index)
            .ok_or(Error::GraphVertexNotFound(index))?;

        Ok(predecessors
            .iter()
            .filter_map(|index| self.vertices.get(index))
            .collect())
    }

    /// Computes the set of vertices reachable from the given index.
    pub fn reachable_vertices(&self, index: usize) -> Result<FxHashSet<usize>, Error> {
        if !self.has_vertex(index) {
            return Err(Error::GraphVertexNotFound(index));
        }

        let mut reachable_vertices: FxHashSet<usize> = FxHashSet::default();
        let mut queue: Vec<usize> = vec![index];

        reachable_vertices.insert(index);

        while let Some(vertex) = queue.pop() {
            if let Some(successors) = self.successors.get(&vertex) {
                successors.iter().for_each(|&succ| {
                    if reachable_vertices.insert(succ) {
                        queue.push(succ)
                    }
                });
            }
        }

        Ok(reachable_vertices)
    }

    /// Returns all vertices in the graph.
    pub fn vertices(&self) -> Vec<&V> {
        self.vertices.values().collect()
    }

    /// Fetches a vertex from the graph by index.
    pub fn vertex(&self, index: usize) -> Result<&V, Error> {
        self.vertices
            .get(&index)
            .ok_or(Error::GraphVertexNotFound(index))
    }

    pub fn edge(&self, head: usize, tail: usize) -> Result<&E, Error> {
        self.edges
            .get(&(head, tail))
            .ok_or(Error::GraphEdgeNotFound(head, tail))
    }

    /// Get a reference to every `Edge` in the `Graph`.
    pub fn edges(&self) -> Vec<&E> {
        self.edges.values().collect()
    }

    /// Return all edges out for a vertex
    pub fn edges_out(&self, index: usize) -> Result<Vec<&E>, Error> {
        self.successors
            .get(&index)
            .map(|succs| {
                succs
                    .iter()
                    .filter_map(|succ| self.edges.get(&(index, *succ)))
                    .collect()
            })
            .ok_or(Error::GraphVertexNotFound(index))
    }

    /// Return all edges in for a vertex
    pub fn edges_in(&self, index: usize) -> Result<Vec<&E>, Error> {
        self.predecessors
            .get(&index)
            .map(|preds| {
                preds
                    .iter()
                    .filter_map(|pred| self.edges.get(&(*pred, index)))
                    .collect()
            })
            .ok_or(Error::GraphVertexNotFound(index))
    }

    /// Returns a string in the graphviz format
    pub fn dot_graph(&self) -> String {
        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let label = v.1.dot_label().replace('\n', "\\l");
                let fill_color = v.1.dot_fill_color();
                let font_color = v.1.dot_font_color();
                format!(
                    "{} [shape=\"box\", label=\"{}\", style=\"filled\", fillcolor=\"{}\", fontcolor=\"{}\"];",
                    v.1.index(),
                    label,
                    fill_color,
                    font_color,
                )
            })
            .collect::<Vec<String>>();

        let edges = self
            .edges
            .iter()
            .map(|e| {
                let label = e.1.dot_label().replace('\n', "\\l");
                let style = e.1.dot_style();
                format!(
                    "{} -> {} [label=\"{}\", style=\"{}\"];",
                    e.1.head(),
                    e.1.tail(),
                    label,
                    style
                )
            })
            .collect::<Vec<String>>();

        let options = vec![
            "graph [fontname = \"Courier New\", splines=\"polyline\"]",
            "node [fontname = \"Courier New\"]",
            "edge [fontname = \"Courier New\"]",
        ];

        format!(
            "digraph G {{\n{}\n\n{}\n{}\n}}",
            options.join("\n"),
            vertices.join("\n"),
            edges.join("\n")
        )
    }
}
