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

//! Some common transportation networks.

use crate::builder::{Buildable, Builder};

use num_traits::Zero;

use std::ops::Neg;

/// Returns a complete bipartite network.
///
/// The first `supplies.len()` vertices are suppliers offering the
/// given (non-negative) amounts, i.e. their weights are the negated
/// supplies. The remaining vertices are customers with the given
/// demands. There is an arc from each supplier `i` to each customer
/// `j` with cost `cost(i, j)`.
pub fn complete_bipartite<G, F, C>(supplies: &[F], demands: &[F], cost: C) -> G
where
    G: Buildable,
    G::Builder: Builder<Value = F>,
    F: Copy + Neg<Output = F>,
    C: Fn(usize, usize) -> F,
{
    let n = supplies.len();
    let m = demands.len();
    let mut b = G::Builder::with_capacities(n + m, n * m);
    let srcs: Vec<_> = supplies.iter().map(|&s| b.add_vertex(-s)).collect();
    let snks = b.add_vertices(demands);
    for (i, &u) in srcs.iter().enumerate() {
        for (j, &v) in snks.iter().enumerate() {
            b.add_arc(u, v, cost(i, j));
        }
    }
    b.into_graph()
}

/// Returns a path with `costs.len()` arcs.
///
/// The first vertex supplies `amount`, the last vertex demands it, all
/// other vertices have weight zero.
pub fn chain<G, F>(amount: F, costs: &[F]) -> G
where
    G: Buildable,
    G::Builder: Builder<Value = F>,
    F: Copy + Zero + Neg<Output = F>,
{
    let n = costs.len() + 1;
    let mut b = G::Builder::with_capacities(n, costs.len());
    let vertices: Vec<_> = (0..n)
        .map(|i| {
            if n == 1 {
                b.add_vertex(F::zero())
            } else if i == 0 {
                b.add_vertex(-amount)
            } else if i + 1 == n {
                b.add_vertex(amount)
            } else {
                b.add_vertex(F::zero())
            }
        })
        .collect();
    for (i, &c) in costs.iter().enumerate() {
        b.add_arc(vertices[i], vertices[i + 1], c);
    }
    b.into_graph()
}

/// Returns a small car distribution network.
///
/// Two factories producing 550 and 350 cars deliver to three cities
/// ordering 400, 300 and 200 cars. The optimal transportation cost is
/// 3700.
pub fn autoroute<G, F>() -> G
where
    G: Buildable,
    G::Builder: Builder<Value = F>,
    F: Copy + Neg<Output = F> + From<i16>,
{
    let costs: [[i16; 3]; 2] = [[5, 6, 3], [3, 5, 4]];
    complete_bipartite(
        &[F::from(550), F::from(350)],
        &[F::from(400), F::from(300), F::from(200)],
        |i, j| F::from(costs[i][j]),
    )
}

#[cfg(test)]
mod tests {
    use super::{autoroute, chain, complete_bipartite};
    use crate::mcf::{transport_simplex, SolutionState};
    use crate::Graph;

    #[test]
    fn test_complete_bipartite() {
        let n = 5;
        let m = 3;
        let g: Graph<isize> = complete_bipartite(&[4; 5], &[7, 7, 6], |i, j| (i * m + j) as isize);
        assert_eq!(g.num_vertices(), n + m);
        assert_eq!(g.num_arcs(), n * m);
        assert!(g.is_balanced());

        let mut degrees = vec![0; n + m];
        for a in g.arcs() {
            let (u, v) = (a.src().index(), a.snk().index());
            assert!(u < n);
            assert!(v >= n);
            assert_eq!(a.cost(), (u * m + v - n) as isize);
            degrees[u] += 1;
            degrees[v] += 1;
        }
        assert!(degrees[..n].iter().all(|&d| d == m));
        assert!(degrees[n..].iter().all(|&d| d == n));
        assert!(g.vertices().take(n).all(|u| u.weight() == -4));
    }

    #[test]
    fn test_chain() {
        let g: Graph<i64> = chain(3, &[1, 2, 3, 4]);
        assert_eq!(g.num_vertices(), 5);
        assert_eq!(g.num_arcs(), 4);
        let weights = g.vertices().map(|u| u.weight()).collect::<Vec<_>>();
        assert_eq!(weights, vec![-3, 0, 0, 0, 3]);
        for a in g.arcs() {
            assert_eq!(a.src().index() + 1, a.snk().index());
        }

        let (state, sol) = transport_simplex(&g).unwrap();
        assert_eq!(state, SolutionState::Optimal);
        assert_eq!(sol.value(), 30);

        let g: Graph<i64> = chain(3, &[]);
        assert_eq!(g.num_vertices(), 1);
        assert!(g.is_balanced());
    }

    #[test]
    fn test_autoroute() {
        let g: Graph<isize> = autoroute();
        assert_eq!(g.num_vertices(), 5);
        assert_eq!(g.num_arcs(), 6);
        assert!(g.is_balanced());
        let (state, sol) = transport_simplex(&g).unwrap();
        assert_eq!(state, SolutionState::Optimal);
        assert_eq!(sol.value(), 3700);
    }
}
