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

//! Traits for constructing transportation networks.

/// A trait to construct transportation networks.
///
/// A network handed to the solver is a static object: its vertices and
/// real arcs never change. In order to build a network, one should use
/// a builder and, once the construction is complete, convert it into a
/// graph.
///
/// The ids handed out by the builder are the ids of the final graph.
pub trait Builder
where
    Self: Sized,
{
    /// The graph type produced by this builder.
    type Graph;

    /// The type of a vertex handle.
    type Vertex: Copy + Eq;

    /// The type of an arc handle.
    type Arc: Copy + Eq;

    /// The type of weights and costs.
    type Value: Copy;

    /// Create a new, empty builder.
    fn new() -> Self {
        Self::with_capacities(0, 0)
    }

    /// Create a new, empty builder.
    ///
    /// The builder might be passed a guess of the number of vertices
    /// and arcs. This might be used to reserve the appropriate internal
    /// memory, but is no strict requirement for the number of vertices
    /// and arcs to be added to the graph.
    fn with_capacities(nvertices: usize, narcs: usize) -> Self;

    /// Reserve memory for a certain number of vertices and arcs.
    fn reserve(&mut self, nvertices: usize, narcs: usize);

    /// Return the current number of vertices.
    fn num_vertices(&self) -> usize;

    /// Return the current number of arcs.
    fn num_arcs(&self) -> usize;

    /// Add a new vertex with the given weight.
    ///
    /// Negative weights denote supply, non-negative weights demand.
    fn add_vertex(&mut self, weight: Self::Value) -> Self::Vertex;

    /// Add one new vertex for each weight.
    fn add_vertices(&mut self, weights: &[Self::Value]) -> Vec<Self::Vertex> {
        weights.iter().map(|&w| self.add_vertex(w)).collect()
    }

    /// Add a new arc `u -> v` with unit cost `cost`.
    fn add_arc(&mut self, u: Self::Vertex, v: Self::Vertex, cost: Self::Value) -> Self::Arc;

    /// Turn the builder into a graph.
    fn into_graph(self) -> Self::Graph;
}

/// A graph with a default builder.
pub trait Buildable
where
    Self: Sized,
{
    type Builder: Builder<Graph = Self>;

    /// Create a new builder for this graph type.
    fn new_builder() -> Self::Builder {
        Self::Builder::new()
    }

    /// Create a new graph by passing the builder to the callback `f`.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_transport::{Buildable, Builder, Graph};
    ///
    /// let g = Graph::<i64>::new_with(|b| {
    ///     let u = b.add_vertex(-3);
    ///     let v = b.add_vertex(3);
    ///     b.add_arc(u, v, 7);
    /// });
    ///
    /// assert_eq!(g.num_vertices(), 2);
    /// assert_eq!(g.num_arcs(), 1);
    /// ```
    fn new_with<F>(f: F) -> Self
    where
        F: FnOnce(&mut Self::Builder),
    {
        let mut b = Self::new_builder();
        f(&mut b);
        b.into_graph()
    }
}
