// Copyright (c) 2015-2022 Frank Fischer <frank-fischer@shadow-soft.de>
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

#![forbid(unsafe_code)]

//! A network simplex solver for the balanced transportation problem.
//!
//! A transportation instance is a [`Graph`] whose vertices carry a
//! weight (negative for supply, non-negative for demand) and whose
//! arcs carry a unit cost. The weights must sum to zero. The solver in
//! [`mcf`] computes a spanning tree with feasible flows of minimal
//! cost.
//!
//! # Example
//!
//! ```
//! use rs_transport::{Buildable, Builder, Graph};
//! use rs_transport::mcf::{transport_simplex, SolutionState};
//!
//! let g = Graph::<isize>::new_with(|b| {
//!     let s = b.add_vertex(-5);
//!     let d = b.add_vertex(5);
//!     b.add_arc(s, d, 3);
//! });
//!
//! let (state, solution) = transport_simplex(&g).unwrap();
//! assert_eq!(state, SolutionState::Optimal);
//! assert_eq!(solution.value(), 15);
//! ```

// # Data structures

pub mod builder;
pub use crate::builder::{Buildable, Builder};

pub mod graph;
pub use self::graph::{Arc, ArcId, ArcKind, Graph, GraphBuilder, Vertex, VertexId};

/// Instance generators.
pub mod classes;

// # Algorithms

pub mod mcf;

// # Input and output

#[cfg(feature = "textfile")]
pub mod textfile;
