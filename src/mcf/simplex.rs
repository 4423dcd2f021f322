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

//! A two-phase primal network simplex for transportation problems.
//!
//! The solver never modifies the input graph. It works on a copy
//! whose arcs carry the current flows and tree flags:
//!
//! 1. All real arcs get cost 0. Every vertex is connected to a hub
//!    vertex by a real arc (if one with the right direction exists) or
//!    by a new artificial arc of cost 1. This star is a feasible
//!    spanning tree.
//! 2. Pivoting minimizes the flow on artificial arcs.
//! 3. If artificial arcs still carry flow, the problem is infeasible.
//! 4. The true costs are restored and pivoting continues until the
//!    tree is optimal.
//!
//! # Example
//!
//! ```
//! use rs_transport::{Buildable, Builder, Graph};
//! use rs_transport::mcf::{SolutionState, TransportSimplex};
//!
//! let g = Graph::<isize>::new_with(|b| {
//!     let s = b.add_vertices(&[-10, -5]);
//!     let d = b.add_vertices(&[8, 7]);
//!     b.add_arc(s[0], d[0], 2);
//!     b.add_arc(s[0], d[1], 4);
//!     b.add_arc(s[1], d[0], 5);
//!     b.add_arc(s[1], d[1], 3);
//! });
//!
//! let mut spx = TransportSimplex::new(&g);
//! assert_eq!(spx.solve(), Ok(SolutionState::Optimal));
//! assert_eq!(spx.value(), 39);
//! assert_eq!(spx.flow(g.id2arc(2)), 0);
//! ```

use super::tree::SpanningTree;
use super::{Error, Phase, Result, SolutionState};
use crate::graph::{ArcId, ArcKind, Graph, VertexId};

use log::{debug, info, trace, warn};
use num_traits::{Bounded, FromPrimitive, NumAssign, Signed, ToPrimitive};

use std::fmt::Debug;

/// Rule for selecting the entering arc.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pricing {
    /// The first arc with negative reduced cost, continuing where the
    /// last search stopped.
    RoundRobin,
    /// The arc with the most negative reduced cost (Dantzig's rule).
    Complete,
    /// The most negative arc of the first block of arcs containing a
    /// candidate.
    Block,
}

/// A single pivot step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pivot<F> {
    /// The arc that entered the tree.
    pub entering: ArcId,
    /// The arc that left the tree.
    pub leaving: ArcId,
    /// The reduced cost of the entering arc.
    pub reduced_cost: F,
    /// The amount of flow pushed around the cycle.
    pub delta: F,
}

/// A primal network simplex algorithm for transportation problems.
pub struct TransportSimplex<'a, F> {
    graph: &'a Graph<F>,
    solution: Graph<F>,
    tree: SpanningTree,
    root: VertexId,
    phase: Phase,

    pub pricing: Pricing,
    current_arc: usize,
    block_size: usize,

    niter: usize,
    solution_state: SolutionState,

    /// The (flow) value to be considered zero. Defaults to `F::zero()`.
    ///
    /// Weights, flows and reduced costs within this distance of zero
    /// count as zero. Floating point values need a small positive
    /// tolerance.
    pub zero: F,
    /// The cost of artificial arcs during the second phase.
    ///
    /// Should be larger than the value of any augmenting cycle. If
    /// `None` (the default) the artificial cost is set to
    /// `(max(|cost|) + 1) * n`, which should be large enough. For very
    /// large costs this value is capped at `F::max_value() / (n + 1)`.
    pub artificial_cost: Option<F>,
    /// The maximal number of pivots per phase.
    ///
    /// The solver fails if the tree is still not optimal after exactly
    /// this many pivots. If `None` (the default) the limit is
    /// `max(1000, 10 * n * m)`.
    pub max_iterations: Option<usize>,
}

impl<'a, F> TransportSimplex<'a, F>
where
    F: NumAssign + Signed + PartialOrd + Copy + Bounded + FromPrimitive + Debug,
{
    pub fn new(g: &'a Graph<F>) -> Self {
        TransportSimplex {
            graph: g,
            solution: g.clone(),
            tree: SpanningTree::default(),
            root: VertexId::from_index(0),
            phase: Phase::Setup,

            pricing: Pricing::Complete,
            current_arc: 0,
            block_size: 10,

            niter: 0,
            solution_state: SolutionState::Unknown,

            zero: F::zero(),
            artificial_cost: None,
            max_iterations: None,
        }
    }

    /// The input graph.
    pub fn as_graph(&self) -> &'a Graph<F> {
        self.graph
    }

    /// The working copy with the current flows and tree.
    pub fn solution(&self) -> &Graph<F> {
        &self.solution
    }

    /// Consume the solver and return the working copy.
    pub fn into_solution(self) -> Graph<F> {
        self.solution
    }

    /// The current spanning tree.
    pub fn tree(&self) -> &SpanningTree {
        &self.tree
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Return the value of the current flow.
    ///
    /// During the first phase this is the flow on artificial arcs.
    pub fn value(&self) -> F {
        self.solution.value()
    }

    /// The current flow on an arc.
    pub fn flow(&self, a: ArcId) -> F {
        self.solution.arc(a).flow()
    }

    /// The total number of pivots of the latest computation.
    pub fn num_iterations(&self) -> usize {
        self.niter
    }

    /// Return the solution state of the latest computation.
    pub fn solution_state(&self) -> SolutionState {
        self.solution_state
    }

    /// Solve the transportation problem.
    ///
    /// Returns [`SolutionState::Degenerate`] if artificial arcs without
    /// flow could not be removed from the initial tree. The solution
    /// is optimized nevertheless, the caller decides whether to use it.
    ///
    /// Fails with [`Error::Infeasible`] if artificial arcs carry flow
    /// after either phase. After the second phase this only happens if
    /// [`artificial_cost`](Self::artificial_cost) is too small.
    pub fn solve(&mut self) -> Result<SolutionState> {
        self.niter = 0;
        self.solution_state = SolutionState::Unknown;

        self.initialize()?;

        let npivots = self.optimize()?;
        debug!("Phase 1 finished after {} pivots", npivots);

        let state = self.check_initial_solution()?;
        self.restore_costs()?;

        let npivots = self.optimize()?;
        debug!("Phase 2 finished after {} pivots", npivots);

        let carrying = self.num_carrying_artificial_arcs();
        if carrying > 0 {
            info!(
                "{} artificial arcs carry flow after the second phase, artificial cost too small",
                carrying
            );
            return Err(Error::Infeasible { artificial: carrying });
        }

        self.solution_state = state;
        info!(
            "Transportation problem {:?} solved: {:?} with value {:?} after {} pivots",
            self.graph.name(),
            state,
            self.value(),
            self.niter
        );

        Ok(state)
    }

    /// Build the initial spanning tree.
    ///
    /// The working copy is replaced by a fresh copy of the input graph.
    /// Real arcs get cost 0, artificial arcs cost 1.
    pub fn initialize(&mut self) -> Result<()> {
        if !self.graph.is_balanced_within(self.zero) {
            info!("Sum of vertex weights is {:?}, not zero", self.graph.total_weight());
            return Err(Error::Unbalanced);
        }

        let mut solution = self.graph.clone();
        solution.remove_artificial_arcs();
        for a in solution.arcs_mut() {
            a.set_cost(F::zero());
            a.set_flow(F::zero());
            a.set_in_tree(false);
        }

        let n = solution.num_vertices();
        let mut nartificial = 0;
        if n > 0 {
            let w = VertexId::from_index(n / 2);
            for uid in 0..n {
                let v = VertexId::from_index(uid);
                if v == w {
                    continue;
                }
                let weight = solution.vertex(v).weight();
                let (src, snk, flow) = if weight < F::zero() {
                    (v, w, -weight)
                } else {
                    (w, v, weight)
                };
                if let Some(a) = solution.find_arc(src, snk) {
                    let arc = solution.arc_mut(a);
                    arc.set_flow(flow);
                    arc.set_in_tree(true);
                } else {
                    solution.add_artificial_arc(src, snk, F::one(), flow);
                    nartificial += 1;
                }
            }
            debug!(
                "Initial tree at hub {}: {} real and {} artificial arcs",
                w,
                n - 1 - nartificial,
                nartificial
            );
        }

        self.root = solution
            .vertices()
            .find(|u| u.is_supply())
            .map(|u| u.id())
            .unwrap_or_else(|| VertexId::from_index(0));
        self.tree = SpanningTree::new(&solution);
        self.solution = solution;
        self.phase = Phase::Initial;
        self.initialize_pricing();

        self.update_potentials()
    }

    /// Check the result of the first phase.
    ///
    /// Returns an error if artificial arcs carry flow.
    pub fn check_initial_solution(&self) -> Result<SolutionState> {
        if self.phase == Phase::Setup {
            return Err(Error::NoSpanningTree);
        }

        let mut carrying = 0;
        let mut remaining = 0;
        for a in self.solution.artificial_arcs() {
            if a.cost() * a.flow() > self.zero {
                carrying += 1;
            } else if a.in_tree() {
                remaining += 1;
            }
        }

        if carrying > 0 {
            info!("{} artificial arcs carry flow, the problem is infeasible", carrying);
            return Err(Error::Infeasible { artificial: carrying });
        }

        if remaining > 0 {
            warn!(
                "{} artificial arcs without flow remain in the tree, the problem may not have a solution",
                remaining
            );
            Ok(SolutionState::Degenerate)
        } else {
            Ok(SolutionState::Optimal)
        }
    }

    /// Restore the true arc costs for the second phase.
    ///
    /// Only arcs of the input graph are restored. Artificial arcs still
    /// in the tree get the artificial cost, the others may not enter the
    /// tree again.
    pub fn restore_costs(&mut self) -> Result<()> {
        if self.phase == Phase::Setup {
            return Err(Error::NoSpanningTree);
        }

        let artificial_cost = self.artificial_cost.unwrap_or_else(|| self.default_artificial_cost());
        let graph = self.graph;
        for a in self.solution.arcs_mut() {
            match a.kind() {
                ArcKind::Real => a.set_cost(graph.arc(a.id()).cost()),
                ArcKind::Artificial if a.in_tree() => a.set_cost(artificial_cost),
                ArcKind::Artificial => (),
            }
        }

        debug!("Restored costs, artificial cost is {:?}", artificial_cost);
        self.phase = Phase::Optimal;
        self.update_potentials()
    }

    /// Pivot until the current tree is optimal.
    ///
    /// Returns the number of pivots.
    pub fn optimize(&mut self) -> Result<usize> {
        if self.phase == Phase::Setup {
            return Err(Error::NoSpanningTree);
        }

        let limit = self.max_iterations.unwrap_or_else(|| {
            let n = self.solution.num_vertices();
            let m = self.solution.num_arcs();
            n.saturating_mul(m).saturating_mul(10).max(1000)
        });

        let mut npivots = 0;
        loop {
            if npivots >= limit {
                if self.find_entering_arc().is_none() {
                    return Ok(npivots);
                }
                info!("Iteration limit of {} pivots reached", limit);
                return Err(Error::IterationLimit { limit });
            }
            if self.pivot()?.is_none() {
                return Ok(npivots);
            }
            npivots += 1;
        }
    }

    /// Perform a single pivot.
    ///
    /// Returns `None` if the current tree is optimal.
    pub fn pivot(&mut self) -> Result<Option<Pivot<F>>> {
        if self.phase == Phase::Setup {
            return Err(Error::NoSpanningTree);
        }

        let (entering, reduced_cost) = match self.find_entering_arc() {
            Some(e) => e,
            None => return Ok(None),
        };

        self.tree.insert(&mut self.solution, entering);
        let cycle = match self.tree.find_cycle(&self.solution, entering) {
            Some(cycle) => cycle,
            None => {
                self.tree.remove(&mut self.solution, entering);
                return Err(Error::NoSpanningTree);
            }
        };

        // The leaving arc is the backward arc limiting the flow change.
        // Ties are broken by the larger cost, then by cycle order.
        let mut leaving: Option<(ArcId, F, F)> = None;
        for c in cycle.iter().filter(|c| !c.forward) {
            let arc = self.solution.arc(c.arc);
            let better = match leaving {
                None => true,
                Some((_, flow, cost)) => {
                    arc.flow() < flow - self.zero || ((arc.flow() - flow).abs() <= self.zero && arc.cost() > cost)
                }
            };
            if better {
                leaving = Some((c.arc, arc.flow(), arc.cost()));
            }
        }

        let (leaving, delta) = match leaving {
            Some((a, flow, _)) => (a, flow),
            None => {
                self.tree.remove(&mut self.solution, entering);
                info!("Arc {} closes a cycle without backward arcs", entering);
                return Err(Error::Unbounded);
            }
        };

        for c in &cycle {
            let arc = self.solution.arc_mut(c.arc);
            let flow = arc.flow();
            arc.set_flow(if c.forward { flow + delta } else { flow - delta });
        }
        self.tree.remove(&mut self.solution, leaving);
        self.niter += 1;

        trace!(
            "Pivot {}: arc {} enters (reduced cost {:?}), arc {} leaves, cycle length {}, delta {:?}",
            self.niter,
            entering,
            reduced_cost,
            leaving,
            cycle.len(),
            delta
        );

        self.update_potentials()?;

        Ok(Some(Pivot {
            entering,
            leaving,
            reduced_cost,
            delta,
        }))
    }

    fn update_potentials(&mut self) -> Result<()> {
        if self.tree.compute_potentials(&mut self.solution, self.root) {
            Ok(())
        } else {
            Err(Error::NoSpanningTree)
        }
    }

    fn num_carrying_artificial_arcs(&self) -> usize {
        self.solution
            .artificial_arcs()
            .filter(|a| a.flow() > self.zero)
            .count()
    }

    fn default_artificial_cost(&self) -> F {
        let mut value = F::zero();
        for a in self.graph.arcs() {
            if a.cost().abs() > value {
                value = a.cost().abs();
            }
        }
        let n = F::from_usize(self.graph.num_vertices().max(1)).unwrap_or_else(F::one);
        // n * (value + 1) must not overflow
        let cap = F::max_value() / (n + F::one());
        if value >= cap / n {
            cap
        } else {
            n * (F::one() + value)
        }
    }

    fn initialize_pricing(&mut self) {
        self.current_arc = 0;
        self.block_size = ((self.solution.num_arcs() as f64).sqrt() * 0.5)
            .round()
            .to_usize()
            .unwrap_or(0)
            .max(10);
    }

    fn find_entering_arc(&mut self) -> Option<(ArcId, F)> {
        match self.pricing {
            Pricing::RoundRobin => self.round_robin_pricing(),
            Pricing::Complete => self.complete_pricing(),
            Pricing::Block => self.block_pricing(),
        }
    }

    fn round_robin_pricing(&mut self) -> Option<(ArcId, F)> {
        let m = self.solution.num_arcs();
        for i in 0..m {
            let aid = (self.current_arc + i) % m;
            let a = ArcId::from_index(aid);
            if let Some(c) = self.reduced_cost(a) {
                if c < -self.zero {
                    self.current_arc = (aid + 1) % m;
                    return Some((a, c));
                }
            }
        }
        None
    }

    fn complete_pricing(&mut self) -> Option<(ArcId, F)> {
        let mut min_cost = -self.zero;
        let mut min_arc = None;
        for aid in 0..self.solution.num_arcs() {
            let a = ArcId::from_index(aid);
            if let Some(c) = self.reduced_cost(a) {
                if c < min_cost {
                    min_cost = c;
                    min_arc = Some(a);
                }
            }
        }

        min_arc.map(|a| (a, min_cost))
    }

    fn block_pricing(&mut self) -> Option<(ArcId, F)> {
        let m = self.solution.num_arcs();
        let mut min_cost = -self.zero;
        let mut min_arc = None;
        let mut aid = self.current_arc % m.max(1);
        for cnt in 1..=m {
            let a = ArcId::from_index(aid);
            if let Some(c) = self.reduced_cost(a) {
                if c < min_cost {
                    min_cost = c;
                    min_arc = Some(a);
                }
            }
            aid = (aid + 1) % m;

            // reached the end of a block with a candidate
            if cnt % self.block_size == 0 && min_arc.is_some() {
                break;
            }
        }

        self.current_arc = aid;
        min_arc.map(|a| (a, min_cost))
    }

    /// Return the reduced cost of a candidate arc.
    ///
    /// Returns `None` for tree arcs and for artificial arcs that have
    /// left the tree in the second phase.
    fn reduced_cost(&self, a: ArcId) -> Option<F> {
        let arc = self.solution.arc(a);
        if arc.in_tree() || (arc.is_artificial() && self.phase != Phase::Initial) {
            return None;
        }
        Some(arc.cost() + self.solution.vertex(arc.src()).potential() - self.solution.vertex(arc.snk()).potential())
    }
}

/// Solve a transportation problem with a network simplex algorithm.
///
/// The function returns the solution state and the solution graph.
/// The flows of the solution are the arc flows, the arcs with
/// [`in_tree`](crate::Arc::in_tree) form an optimal spanning tree.
pub fn transport_simplex<F>(g: &Graph<F>) -> Result<(SolutionState, Graph<F>)>
where
    F: NumAssign + Signed + PartialOrd + Copy + Bounded + FromPrimitive + Debug,
{
    let mut spx = TransportSimplex::new(g);
    let state = spx.solve()?;
    Ok((state, spx.into_solution()))
}
