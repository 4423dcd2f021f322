/*
 * Copyright (c) 2017-2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! A vector based transportation network.
//!
//! Vertices and arcs are stored in two arenas and are identified by
//! their dense index in these arenas. Arcs refer to their end vertices
//! by index, hence cloning a graph yields a completely independent
//! copy.

use crate::builder::{Buildable, Builder};

use num_traits::{NumAssign, Zero};

use std::fmt;
use std::slice::Iter as SliceIter;

#[cfg(feature = "serialize")]
use serde_derive::{Deserialize, Serialize};

/// Vertex of a transportation network.
///
/// This is basically a newtype of the vertex index.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct VertexId(u32);

impl VertexId {
    /// Return the index of this vertex in its graph.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(id: usize) -> Self {
        debug_assert!(id < u32::max_value() as usize, "Invalid vertex id");
        VertexId(id as u32)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// Arc of a transportation network.
///
/// This is basically a newtype of the arc index.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ArcId(u32);

impl ArcId {
    /// Return the index of this arc in its graph.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(id: usize) -> Self {
        debug_assert!(id < u32::max_value() as usize, "Invalid arc id");
        ArcId(id as u32)
    }
}

impl fmt::Display for ArcId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// The kind of an arc.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ArcKind {
    /// An arc of the input network.
    Real,
    /// An arc added by the solver to obtain an initial spanning tree.
    Artificial,
}

/// Data for a vertex.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Vertex<F> {
    id: VertexId,
    weight: F,
    potential: F,
}

impl<F> Vertex<F>
where
    F: Copy,
{
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// The supply (if negative) or demand (if non-negative) of this vertex.
    pub fn weight(&self) -> F {
        self.weight
    }

    /// The current potential (dual value) of this vertex.
    ///
    /// Only meaningful while a spanning tree is present.
    pub fn potential(&self) -> F {
        self.potential
    }

    pub(crate) fn set_potential(&mut self, potential: F) {
        self.potential = potential;
    }
}

impl<F> Vertex<F>
where
    F: Copy + Zero + PartialOrd,
{
    /// Return `true` if this vertex supplies flow.
    pub fn is_supply(&self) -> bool {
        self.weight < F::zero()
    }
}

/// Data for an arc.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Arc<F> {
    id: ArcId,
    src: VertexId,
    snk: VertexId,
    cost: F,
    flow: F,
    kind: ArcKind,
    in_tree: bool,
}

impl<F> Arc<F>
where
    F: Copy,
{
    pub fn id(&self) -> ArcId {
        self.id
    }

    /// The source vertex.
    pub fn src(&self) -> VertexId {
        self.src
    }

    /// The sink vertex.
    pub fn snk(&self) -> VertexId {
        self.snk
    }

    /// Both end vertices `(src, snk)`.
    pub fn enodes(&self) -> (VertexId, VertexId) {
        (self.src, self.snk)
    }

    /// Return the end vertex that is not `u`.
    pub fn other(&self, u: VertexId) -> VertexId {
        debug_assert!(u == self.src || u == self.snk, "Vertex {} not incident to arc {}", u, self.id);
        if u == self.src {
            self.snk
        } else {
            self.src
        }
    }

    pub fn cost(&self) -> F {
        self.cost
    }

    pub fn flow(&self) -> F {
        self.flow
    }

    pub fn kind(&self) -> ArcKind {
        self.kind
    }

    pub fn is_artificial(&self) -> bool {
        self.kind == ArcKind::Artificial
    }

    /// Return `true` if the arc belongs to the current spanning tree.
    pub fn in_tree(&self) -> bool {
        self.in_tree
    }

    pub(crate) fn set_cost(&mut self, cost: F) {
        self.cost = cost;
    }

    pub(crate) fn set_flow(&mut self, flow: F) {
        self.flow = flow;
    }

    pub(crate) fn set_in_tree(&mut self, in_tree: bool) {
        self.in_tree = in_tree;
    }
}

/// A transportation network.
///
/// The graph owns all vertices and all arcs. The arc list is the
/// universe of arcs; the arcs currently forming the spanning tree are
/// marked by [`Arc::in_tree`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Graph<F> {
    id: usize,
    name: String,
    vertices: Vec<Vertex<F>>,
    arcs: Vec<Arc<F>>,
}

impl<F> Graph<F> {
    pub fn new() -> Graph<F> {
        Graph {
            id: 0,
            name: String::new(),
            vertices: vec![],
            arcs: vec![],
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn vertex(&self, u: VertexId) -> &Vertex<F> {
        &self.vertices[u.index()]
    }

    pub fn arc(&self, a: ArcId) -> &Arc<F> {
        &self.arcs[a.index()]
    }

    /// Return the vertex with the given index.
    pub fn id2vertex(&self, id: usize) -> VertexId {
        debug_assert!(id < self.vertices.len(), "Invalid vertex id");
        VertexId::from_index(id)
    }

    /// Return the arc with the given index.
    pub fn id2arc(&self, id: usize) -> ArcId {
        debug_assert!(
            id < self.arcs.len(),
            "Invalid arc id: {}, must be in 0..{}",
            id,
            self.arcs.len()
        );
        ArcId::from_index(id)
    }

    pub fn vertices(&self) -> SliceIter<Vertex<F>> {
        self.vertices.iter()
    }

    pub fn arcs(&self) -> SliceIter<Arc<F>> {
        self.arcs.iter()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId::from_index)
    }

    pub fn arc_ids(&self) -> impl Iterator<Item = ArcId> {
        (0..self.arcs.len()).map(ArcId::from_index)
    }

    /// Iterate over the arcs of the current spanning tree.
    pub fn tree_arcs(&self) -> impl Iterator<Item = &Arc<F>> + '_ {
        self.arcs.iter().filter(|a| a.in_tree)
    }

    /// Return the number of arcs in the current spanning tree.
    pub fn num_tree_arcs(&self) -> usize {
        self.tree_arcs().count()
    }

    /// Iterate over the artificial arcs.
    pub fn artificial_arcs(&self) -> impl Iterator<Item = &Arc<F>> + '_ {
        self.arcs.iter().filter(|a| a.kind == ArcKind::Artificial)
    }

    /// Return the first real arc `u -> v`, if any.
    pub fn find_arc(&self, u: VertexId, v: VertexId) -> Option<ArcId> {
        self.arcs
            .iter()
            .find(|a| a.kind == ArcKind::Real && a.src == u && a.snk == v)
            .map(|a| a.id)
    }

    pub(crate) fn vertex_mut(&mut self, u: VertexId) -> &mut Vertex<F> {
        &mut self.vertices[u.index()]
    }

    pub(crate) fn arc_mut(&mut self, a: ArcId) -> &mut Arc<F> {
        &mut self.arcs[a.index()]
    }

    pub(crate) fn arcs_mut(&mut self) -> std::slice::IterMut<Arc<F>> {
        self.arcs.iter_mut()
    }

    /// Remove all artificial arcs.
    ///
    /// Artificial arcs are always appended after the real arcs, so the
    /// ids of the real arcs do not change.
    pub(crate) fn remove_artificial_arcs(&mut self) {
        self.arcs.retain(|a| a.kind == ArcKind::Real);
    }

    /// Add an artificial arc `u -> v` to the tree.
    pub(crate) fn add_artificial_arc(&mut self, u: VertexId, v: VertexId, cost: F, flow: F) -> ArcId {
        let id = ArcId::from_index(self.arcs.len());
        self.arcs.push(Arc {
            id,
            src: u,
            snk: v,
            cost,
            flow,
            kind: ArcKind::Artificial,
            in_tree: true,
        });
        id
    }
}

impl<F> Graph<F>
where
    F: Copy + NumAssign + PartialOrd,
{
    /// Return the sum of all vertex weights.
    pub fn total_weight(&self) -> F {
        let mut total = F::zero();
        for u in &self.vertices {
            total += u.weight;
        }
        total
    }

    /// Return `true` if supply and demand cancel out.
    pub fn is_balanced(&self) -> bool {
        self.total_weight().is_zero()
    }

    /// Return `true` if the total weight is at most `zero` away from 0.
    pub fn is_balanced_within(&self, zero: F) -> bool {
        let total = self.total_weight();
        total <= zero && F::zero() - zero <= total
    }

    /// Return the total cost of the current flow.
    ///
    /// Arcs outside the spanning tree never carry flow, so this is the
    /// cost of the tree.
    pub fn value(&self) -> F {
        let mut v = F::zero();
        for a in self.tree_arcs() {
            v += a.cost * a.flow;
        }
        v
    }

    /// Return inflow minus outflow at `u`.
    ///
    /// For a feasible flow this equals the weight of `u`.
    pub fn excess(&self, u: VertexId) -> F {
        let mut x = F::zero();
        for a in &self.arcs {
            if a.snk == u {
                x += a.flow;
            }
            if a.src == u {
                x -= a.flow;
            }
        }
        x
    }
}

impl<F> Default for Graph<F> {
    fn default() -> Self {
        Graph::new()
    }
}

impl<F> fmt::Display for Graph<F>
where
    F: Copy + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "graph {} ({})", self.id, self.name)?;
        for u in &self.vertices {
            writeln!(f, "  vertex {}: weight {}", u.id, u.weight)?;
        }
        for a in &self.arcs {
            writeln!(
                f,
                "  {}arc {}: {} -> {} cost {} flow {}{}",
                if a.kind == ArcKind::Artificial { "artificial " } else { "" },
                a.id,
                a.src,
                a.snk,
                a.cost,
                a.flow,
                if a.in_tree { " (tree)" } else { "" }
            )?;
        }
        Ok(())
    }
}

/// A builder for a [`Graph`].
pub struct GraphBuilder<F> {
    name: String,
    vertices: Vec<Vertex<F>>,
    arcs: Vec<Arc<F>>,
}

impl<F> GraphBuilder<F> {
    /// Set the name of the graph to be built.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }
}

impl<F> Builder for GraphBuilder<F>
where
    F: Copy + Zero,
{
    type Graph = Graph<F>;
    type Vertex = VertexId;
    type Arc = ArcId;
    type Value = F;

    fn with_capacities(nvertices: usize, narcs: usize) -> Self {
        GraphBuilder {
            name: String::new(),
            vertices: Vec::with_capacity(nvertices),
            arcs: Vec::with_capacity(narcs),
        }
    }

    fn reserve(&mut self, nvertices: usize, narcs: usize) {
        self.vertices.reserve(nvertices);
        self.arcs.reserve(narcs);
    }

    fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    fn add_vertex(&mut self, weight: F) -> VertexId {
        assert!(
            self.vertices.len() + 1 < u32::max_value() as usize,
            "Vertex capacity exceeded"
        );
        let id = VertexId::from_index(self.vertices.len());
        self.vertices.push(Vertex {
            id,
            weight,
            potential: F::zero(),
        });
        id
    }

    /// Add a new arc `u -> v`.
    ///
    /// # Panics
    ///
    /// If `u` or `v` has not been added to this builder or if `u == v`.
    fn add_arc(&mut self, u: VertexId, v: VertexId, cost: F) -> ArcId {
        assert!(
            u.index() < self.vertices.len() && v.index() < self.vertices.len(),
            "Unknown end vertex of arc ({},{})",
            u,
            v
        );
        assert!(u != v, "Loops are not allowed");
        // Leave room for one artificial arc per vertex.
        assert!(
            self.arcs.len() + self.vertices.len() + 1 < u32::max_value() as usize,
            "Arc capacity exceeded"
        );
        let id = ArcId::from_index(self.arcs.len());
        self.arcs.push(Arc {
            id,
            src: u,
            snk: v,
            cost,
            flow: F::zero(),
            kind: ArcKind::Real,
            in_tree: false,
        });
        id
    }

    fn into_graph(self) -> Graph<F> {
        Graph {
            id: 0,
            name: self.name,
            vertices: self.vertices,
            arcs: self.arcs,
        }
    }
}

impl<F> Buildable for Graph<F>
where
    F: Copy + Zero,
{
    type Builder = GraphBuilder<F>;
}

#[cfg(test)]
mod tests {
    use super::{ArcKind, Graph};
    use crate::{Buildable, Builder};

    fn small() -> Graph<isize> {
        Graph::new_with(|b| {
            b.set_name("small");
            let vs = b.add_vertices(&[-10, -5, 8, 7]);
            b.add_arc(vs[0], vs[2], 2);
            b.add_arc(vs[0], vs[3], 4);
            b.add_arc(vs[1], vs[2], 5);
            b.add_arc(vs[1], vs[3], 3);
        })
    }

    #[test]
    fn test_graph() {
        let g = small();
        assert_eq!(g.name(), "small");
        assert_eq!(g.num_vertices(), 4);
        assert_eq!(g.num_arcs(), 4);
        assert!(g.is_balanced());
        assert_eq!(g.num_tree_arcs(), 0);
        assert_eq!(g.value(), 0);

        for (i, u) in g.vertex_ids().enumerate() {
            assert_eq!(u.index(), i);
            assert_eq!(g.vertex(u).id(), u);
        }
        assert!(g.vertex(g.id2vertex(1)).is_supply());
        assert!(!g.vertex(g.id2vertex(2)).is_supply());

        for a in g.arcs() {
            assert_eq!(a.kind(), ArcKind::Real);
            assert!(!a.in_tree());
            assert_eq!(a.other(a.src()), a.snk());
            assert_eq!(a.other(a.snk()), a.src());
        }
    }

    #[test]
    fn test_find_arc() {
        let g = small();
        let u = g.id2vertex(1);
        let v = g.id2vertex(3);
        assert_eq!(g.find_arc(u, v), Some(g.id2arc(3)));
        assert_eq!(g.find_arc(v, u), None);
    }

    #[test]
    fn test_unbalanced() {
        let g = Graph::<isize>::new_with(|b| {
            b.add_vertices(&[-10, 7]);
        });
        assert!(!g.is_balanced());
        assert_eq!(g.total_weight(), -3);
    }

    #[test]
    fn test_balanced_within() {
        let g = Graph::<f64>::new_with(|b| {
            b.add_vertices(&[-0.1, -0.2, 0.3]);
        });
        assert!(!g.is_balanced());
        assert!(g.total_weight() != 0.0);
        assert!(g.is_balanced_within(1e-9));

        let g = Graph::<isize>::new_with(|b| {
            b.add_vertices(&[-10, 7]);
        });
        assert!(!g.is_balanced_within(0));
        assert!(g.is_balanced_within(3));
    }

    #[test]
    fn test_clone_is_independent() {
        let g = small();
        let mut h = g.clone();
        let u = h.id2vertex(0);
        let v = h.id2vertex(2);
        let a = h.add_artificial_arc(u, v, 1, 10);
        h.arc_mut(h.id2arc(0)).set_cost(0);
        h.vertex_mut(v).set_potential(42);

        assert_eq!(g.num_arcs(), 4);
        assert_eq!(h.num_arcs(), 5);
        assert_eq!(g.arc(g.id2arc(0)).cost(), 2);
        assert_eq!(g.vertex(v).potential(), 0);
        assert!(h.arc(a).is_artificial());
        assert!(h.arc(a).in_tree());
        assert_eq!(h.excess(v), 10);
        assert_eq!(h.excess(u), -10);
    }

    #[test]
    #[should_panic(expected = "Loops are not allowed")]
    fn test_no_loops() {
        Graph::<isize>::new_with(|b| {
            let u = b.add_vertex(0);
            b.add_arc(u, u, 1);
        });
    }

    #[cfg(feature = "serialize")]
    mod serialize {
        use super::small;
        use crate::Graph;
        use serde_json;

        #[test]
        fn test_serde() {
            let g = small();

            let serialized = serde_json::to_string(&g).unwrap();
            let h: Graph<isize> = serde_json::from_str(&serialized).unwrap();

            assert_eq!(g.name(), h.name());
            assert_eq!(g.num_vertices(), h.num_vertices());
            assert_eq!(g.num_arcs(), h.num_arcs());
            for (a, b) in g.arcs().zip(h.arcs()) {
                assert_eq!(a.enodes(), b.enodes());
                assert_eq!(a.cost(), b.cost());
            }
        }
    }
}
