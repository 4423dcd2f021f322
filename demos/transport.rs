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

use num_traits::{Bounded, FromPrimitive, NumAssign, Signed, ToPrimitive};
use rs_transport::mcf::{Pricing, SolutionState, TransportSimplex};
use rs_transport::{textfile, Graph};
use std::error::Error;
use std::fmt::{Debug, Display};
use std::io::Write;
use std::path::PathBuf;
use std::result::Result;
use std::str::FromStr;

use log::LevelFilter;
use rustop::opts;
use time::OffsetDateTime;

/// The tolerance used by the solver for each value type.
trait ZeroValue {
    fn zero() -> Self;
}

impl ZeroValue for isize {
    fn zero() -> isize {
        0
    }
}

impl ZeroValue for f64 {
    fn zero() -> f64 {
        1e-9
    }
}

fn run<F>(filename: &str, pricing: Pricing) -> Result<(), Box<dyn Error>>
where
    F: NumAssign
        + Signed
        + PartialOrd
        + Copy
        + Bounded
        + FromPrimitive
        + ToPrimitive
        + FromStr
        + Display
        + Debug
        + ZeroValue,
    F::Err: Display,
{
    let tstart = OffsetDateTime::now_utc();
    let g: Graph<F> = textfile::read_from_file(filename)?;
    let tend = OffsetDateTime::now_utc();

    let nsupply = g.vertices().filter(|u| u.is_supply()).count();
    println!("Instance            : {}", filename);
    println!("Read Time (seconds) : {}", (tend - tstart).as_seconds_f64());
    println!("Value type          : {}", std::any::type_name::<F>());
    println!("Number of suppliers : {}", nsupply);
    println!("Number of customers : {}", g.num_vertices() - nsupply);
    println!("Number of arcs      : {}", g.num_arcs());

    let mut spx = TransportSimplex::new(&g);
    spx.pricing = pricing;
    spx.zero = ZeroValue::zero();

    let tstart = OffsetDateTime::now_utc();
    let state = spx.solve()?;
    let tend = OffsetDateTime::now_utc();
    let soltime = (tend - tstart).as_seconds_f64();

    println!();
    println!("Solution state      : {:?}", state);
    println!("Value               : {:.2}", spx.value().to_f64().unwrap_or(f64::NAN));
    println!("Time (seconds)      : {:.2}", soltime);
    println!("Iterations (total)  : {}", spx.num_iterations());
    if state == SolutionState::Degenerate {
        println!("Warning             : artificial arcs remained in the initial tree");
    }
    println!();
    println!("Write solution to   : {}.sol", filename);

    let solfile = PathBuf::from(format!("{}.sol", filename));
    let f = &mut std::fs::File::create(&solfile)?;
    writeln!(f, "// Solved with a transportation network simplex")?;
    writeln!(f, "// instance            : {}", g.name())?;
    writeln!(f, "// solution time       : {:.2} seconds", soltime)?;
    writeln!(f, "// number of iterations: {}", spx.num_iterations())?;
    textfile::write_solution(f, spx.solution())?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let (args, _) = opts! {
        synopsis "Solve a transportation problem with a network simplex algorithm.";
        param file:String, desc:"Instance file name";
        opt dantzig:bool, desc:"Dantzig's rule pricing (most negative, default)";
        opt first_eligible:bool, desc:"First eligible arc pricing (round robin)";
        opt block:bool, desc:"Block pricing";
        opt floating_point:bool, desc:"Use floating point values";
        opt verbose:bool, desc:"Log the progress of the solver";
    }
    .parse_or_exit();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let pricing = if args.dantzig {
        Pricing::Complete
    } else if args.first_eligible {
        Pricing::RoundRobin
    } else if args.block {
        Pricing::Block
    } else {
        Pricing::Complete
    };

    if args.floating_point {
        run::<f64>(&args.file, pricing)
    } else {
        run::<isize>(&args.file, pricing)
    }
}
