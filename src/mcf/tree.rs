/*
 * Copyright (c) 2021, 2022 Frank Fischer <frank-fischer@shadow-soft.de>
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

//! The spanning tree of a transportation network.
//!
//! Tree membership is stored in the arcs themselves (see
//! [`Arc::in_tree`](crate::Arc::in_tree)). The [`SpanningTree`] keeps
//! the incident tree arcs of each vertex, derived from these flags,
//! and both are only changed together by [`SpanningTree::insert`] and
//! [`SpanningTree::remove`].

use crate::graph::{ArcId, Graph, VertexId};

use num_traits::NumAssign;

/// An arc on a cycle together with its orientation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CycleArc {
    pub arc: ArcId,
    /// `true` if the arc points in the direction of traversal.
    pub forward: bool,
}

/// The incident tree arcs of every vertex.
#[derive(Clone, Debug, Default)]
pub struct SpanningTree {
    incident: Vec<Vec<ArcId>>,
    narcs: usize,
}

impl SpanningTree {
    /// Collect the tree arcs of `g`.
    pub fn new<F>(g: &Graph<F>) -> Self
    where
        F: Copy,
    {
        let mut incident = vec![vec![]; g.num_vertices()];
        let mut narcs = 0;
        for a in g.tree_arcs() {
            incident[a.src().index()].push(a.id());
            incident[a.snk().index()].push(a.id());
            narcs += 1;
        }
        SpanningTree { incident, narcs }
    }

    /// Return the number of tree arcs.
    pub fn num_arcs(&self) -> usize {
        self.narcs
    }

    /// Return the tree arcs incident with `u`.
    pub fn incident(&self, u: VertexId) -> &[ArcId] {
        &self.incident[u.index()]
    }

    /// Add arc `a` to the tree.
    pub(crate) fn insert<F>(&mut self, g: &mut Graph<F>, a: ArcId)
    where
        F: Copy,
    {
        let arc = g.arc_mut(a);
        debug_assert!(!arc.in_tree(), "Arc {} is already a tree arc", a);
        arc.set_in_tree(true);
        let (u, v) = arc.enodes();
        self.incident[u.index()].push(a);
        self.incident[v.index()].push(a);
        self.narcs += 1;
    }

    /// Remove arc `a` from the tree.
    ///
    /// The arc stays in the graph.
    pub(crate) fn remove<F>(&mut self, g: &mut Graph<F>, a: ArcId)
    where
        F: Copy,
    {
        let arc = g.arc_mut(a);
        debug_assert!(arc.in_tree(), "Arc {} is not a tree arc", a);
        arc.set_in_tree(false);
        let (u, v) = arc.enodes();
        self.incident[u.index()].retain(|&b| b != a);
        self.incident[v.index()].retain(|&b| b != a);
        self.narcs -= 1;
    }

    /// Recompute the potentials of all vertices.
    ///
    /// The potential of `root` is zero. Walking a tree arc forward adds
    /// its cost, walking it backward subtracts it.
    ///
    /// Returns `false` if the tree arcs do not reach all vertices.
    pub fn compute_potentials<F>(&self, g: &mut Graph<F>, root: VertexId) -> bool
    where
        F: Copy + NumAssign,
    {
        let n = g.num_vertices();
        if n == 0 {
            return true;
        }
        for uid in 0..n {
            g.vertex_mut(VertexId::from_index(uid)).set_potential(F::zero());
        }

        let mut seen = vec![false; n];
        let mut stack = vec![root];
        let mut cnt = 1;
        seen[root.index()] = true;

        while let Some(u) = stack.pop() {
            let pu = g.vertex(u).potential();
            for &a in &self.incident[u.index()] {
                let arc = g.arc(a);
                let v = arc.other(u);
                if seen[v.index()] {
                    continue;
                }
                let pv = if arc.src() == u { pu + arc.cost() } else { pu - arc.cost() };
                g.vertex_mut(v).set_potential(pv);
                seen[v.index()] = true;
                cnt += 1;
                stack.push(v);
            }
        }

        cnt == n
    }

    /// Return `true` if the tree arcs form a spanning tree of `g`.
    pub fn is_spanning<F>(&self, g: &Graph<F>) -> bool
    where
        F: Copy,
    {
        let n = g.num_vertices();
        if n == 0 {
            return self.narcs == 0;
        }
        if self.narcs + 1 != n {
            return false;
        }

        let mut seen = vec![false; n];
        let mut stack = vec![0];
        let mut cnt = 1;
        seen[0] = true;
        while let Some(uid) = stack.pop() {
            for &a in &self.incident[uid] {
                let v = g.arc(a).other(g.id2vertex(uid)).index();
                if !seen[v] {
                    seen[v] = true;
                    cnt += 1;
                    stack.push(v);
                }
            }
        }
        cnt == n
    }

    /// Return the unique cycle closed by the tree arc `entering`.
    ///
    /// `entering` must have been inserted already, so the tree arcs
    /// contain exactly one cycle. All vertices that are not on the
    /// cycle are pruned leaf by leaf. The remaining cycle is returned
    /// starting with `entering` (walked from its source to its sink)
    /// followed by the remaining arcs leading back to the source of
    /// `entering`. Each arc is marked as forward if it points in the
    /// direction of the walk.
    ///
    /// Returns `None` if `entering` does not lie on a cycle.
    pub fn find_cycle<F>(&self, g: &Graph<F>, entering: ArcId) -> Option<Vec<CycleArc>>
    where
        F: Copy,
    {
        let n = g.num_vertices();
        let mut degree = self.incident.iter().map(Vec::len).collect::<Vec<_>>();
        let mut alive = vec![true; n];
        let mut leaves = (0..n).filter(|&uid| degree[uid] <= 1).collect::<Vec<_>>();

        while let Some(uid) = leaves.pop() {
            if !alive[uid] {
                continue;
            }
            alive[uid] = false;
            for &a in &self.incident[uid] {
                let vid = g.arc(a).other(g.id2vertex(uid)).index();
                if alive[vid] {
                    degree[vid] -= 1;
                    if degree[vid] == 1 {
                        leaves.push(vid);
                    }
                }
            }
        }

        let (start, mut u) = g.arc(entering).enodes();
        if !alive[start.index()] || !alive[u.index()] {
            return None;
        }

        let mut cycle = vec![CycleArc {
            arc: entering,
            forward: true,
        }];
        let mut last = entering;
        while u != start {
            // Every vertex on the cycle has exactly two cycle arcs.
            let next = self.incident[u.index()]
                .iter()
                .copied()
                .find(|&a| a != last && alive[g.arc(a).other(u).index()])?;
            let arc = g.arc(next);
            cycle.push(CycleArc {
                arc: next,
                forward: arc.src() == u,
            });
            u = arc.other(u);
            last = next;
            if cycle.len() > n {
                return None;
            }
        }

        Some(cycle)
    }
}
