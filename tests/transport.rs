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

use std::collections::HashMap;
use std::error::Error;
use std::fs::read_dir;
use std::path::Path;

use rs_transport::mcf::{Pricing, SolutionState, TransportSimplex};
use rs_transport::{textfile, Graph};

#[test]
fn test_transport_simplex() -> Result<(), Box<dyn Error>> {
    let mut values = HashMap::new();

    for entry in read_dir(Path::new("tests/transport"))? {
        let entry = entry?;
        if entry.path().extension().map(|ext| ext == "sol").unwrap_or(false) {
            let (value, _) = textfile::read_solution_from_file::<_, isize>(entry.path())?;
            if let Some(file_stem) = entry.path().file_stem().map(|s| s.to_string_lossy().to_string()) {
                values.insert(file_stem, value);
            }
        }
    }

    let mut ninstances = 0;
    for entry in read_dir(Path::new("tests/transport"))? {
        let entry = entry?;
        if entry.path().extension().map(|ext| ext == "txt").unwrap_or(false) {
            let g: Graph<isize> = textfile::read_from_file(entry.path())?;
            assert_eq!(Some(g.name()), entry.path().file_name().and_then(|s| s.to_str()));

            let value = match values.get(g.name()) {
                Some(value) => *value,
                None => panic!("Can't find solution file for {:?}", entry.path()),
            };

            for &pricing in &[Pricing::Complete, Pricing::RoundRobin, Pricing::Block] {
                let mut spx = TransportSimplex::new(&g);
                spx.pricing = pricing;
                let state = spx.solve()?;
                assert_eq!(state, SolutionState::Optimal);
                assert_eq!(value, spx.value(), "Wrong value for {} with {:?}", g.name(), pricing);

                let sol = spx.solution();
                for u in sol.vertex_ids() {
                    assert_eq!(sol.excess(u), sol.vertex(u).weight());
                }
                assert_eq!(sol.num_tree_arcs() + 1, sol.num_vertices());
            }
            ninstances += 1;
        }
    }
    assert!(ninstances > 0);

    Ok(())
}

#[test]
fn test_solution_flows() -> Result<(), Box<dyn Error>> {
    let g: Graph<isize> = textfile::read_from_file("tests/transport/depots.txt")?;
    let (value, flows) = textfile::read_solution_from_file::<_, isize>("tests/transport/depots.txt.sol")?;

    let mut spx = TransportSimplex::new(&g);
    spx.solve()?;
    assert_eq!(spx.value(), value);

    let mut buf = Vec::new();
    textfile::write_solution(&mut buf, spx.solution())?;
    let (value2, flows2) = textfile::read_solution::<_, isize>(&buf[..])?;
    assert_eq!(value, value2);
    assert_eq!(flows, flows2);

    Ok(())
}
