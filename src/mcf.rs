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

//! Minimum Cost Flow algorithms for transportation problems.

pub mod simplex;
pub use simplex::{transport_simplex, Pivot, Pricing, TransportSimplex};

pub mod tree;
pub use tree::{CycleArc, SpanningTree};

use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SolutionState {
    /// Unknown state, the problem has not been solved, yet
    Unknown,
    /// The problem has been solved to optimality
    Optimal,
    /// Artificial arcs without flow remained in the initial tree.
    ///
    /// The problem may or may not have a solution. The returned tree
    /// is optimal with respect to the remaining arcs.
    Degenerate,
}

/// The phase the solver is in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// No initial tree has been built.
    Setup,
    /// Minimizing the flow on artificial arcs.
    Initial,
    /// Minimizing the true costs.
    Optimal,
}

/// Error detected by the solver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("the vertex weights do not sum to zero")]
    Unbalanced,
    #[error("the problem is infeasible ({artificial} artificial arcs carry flow)")]
    Infeasible { artificial: usize },
    #[error("the problem is unbounded")]
    Unbounded,
    #[error("iteration limit of {limit} pivots exceeded")]
    IterationLimit { limit: usize },
    #[error("the tree arcs do not form a spanning tree")]
    NoSpanningTree,
}

pub type Result<T> = std::result::Result<T, Error>;
