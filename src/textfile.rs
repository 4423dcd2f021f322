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

//! Reading and writing transportation problems in a simple text format.
//!
//! A file must look as follows.
//!
//! 1. empty lines are allowed and ignored
//! 2. `//` starts a comment, the rest of the line is ignored
//! 3. the first non-comment line contains the number of vertices `<n>`
//! 4. the second non-comment line contains exactly `<n>` vertex weights,
//!    negative weights denote supply, non-negative weights demand
//! 5. each further line `<a> <b> <cost>` describes an arc from vertex
//!    `<a>` to vertex `<b>`, where the vertices are numbered `0..n`.
//!
//! Numbers may carry an explicit `+` sign. Loops are not allowed,
//! parallel arcs are.
//!
//! # Example
//!
//! ```
//! use rs_transport::textfile;
//! use rs_transport::Graph;
//!
//! let file = "// two suppliers, one customer
//! 3
//! -4 -2 6
//! 0 2 1
//! 1 2 3 // expensive
//! ";
//! let g: Graph<i32> = textfile::read(file.as_bytes()).unwrap();
//! assert_eq!(g.num_vertices(), 3);
//! assert_eq!(g.num_arcs(), 2);
//! ```

use crate::builder::{Buildable, Builder};
use crate::graph::Graph;

use log::debug;
use num_traits::{NumAssign, Zero};
use thiserror::Error;

use std::fmt::Display;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

/// Error when reading a file.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Format error on line {line}: {msg}")]
    Format { line: usize, msg: String },
    #[error("Data error on line {line}: {msg}")]
    Data { line: usize, msg: String },
}

pub type Result<T> = std::result::Result<T, Error>;

struct TextReader<R: Read> {
    io: BufReader<R>,

    line: String,
    line_number: usize,
}

impl<R: Read> TextReader<R> {
    fn new(reader: R) -> Self {
        TextReader {
            io: BufReader::new(reader),
            line: String::new(),
            line_number: 0,
        }
    }

    // Return the tokens of the next line with content.
    fn read_line(&mut self) -> Result<Option<Tokens>> {
        loop {
            self.line.clear();
            if self.io.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let end = self.line.find("//").unwrap_or_else(|| self.line.len());
            if !self.line[..end].trim().is_empty() {
                return Ok(Some(Tokens {
                    it: self.line[..end].split_whitespace(),
                    line: self.line_number,
                }));
            }
        }
    }

    fn expect_line(&mut self, what: &str) -> Result<Tokens> {
        let line_number = self.line_number;
        self.read_line()?.ok_or_else(|| Error::Format {
            line: line_number,
            msg: format!("unexpected end of file, expected {}", what),
        })
    }
}

/// Iterates over the tokens in a line.
struct Tokens<'a> {
    it: SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Tokens<'a> {
    /// Returns the next token converted to a number.
    fn number<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let tok = self.it.next().ok_or_else(|| Error::Format {
            line: self.line,
            msg: "expected number".to_string(),
        })?;
        self.parse(tok)
    }

    /// Returns the remaining tokens converted to numbers.
    fn numbers<T>(&mut self) -> Result<Vec<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let mut nums = vec![];
        while let Some(tok) = self.it.next() {
            nums.push(self.parse(tok)?);
        }
        Ok(nums)
    }

    fn parse<T>(&self, tok: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        tok.parse().map_err(|e| Error::Format {
            line: self.line,
            msg: format!("invalid number '{}': {}", tok, e),
        })
    }

    /// Return an error if there are further tokens.
    fn end(&mut self) -> Result<()> {
        if let Some(s) = self.it.next() {
            Err(Error::Format {
                line: self.line,
                msg: format!("unexpected token '{}' at end of line", s),
            })
        } else {
            Ok(())
        }
    }
}

/// Read a transportation problem.
pub fn read<R, F>(r: R) -> Result<Graph<F>>
where
    R: Read,
    F: FromStr + Copy + Zero,
    F::Err: Display,
{
    let mut reader = TextReader::new(r);

    let mut toks = reader.expect_line("number of vertices")?;
    let n: usize = toks.number()?;
    toks.end()?;

    let mut toks = reader.expect_line("vertex weights")?;
    let weights: Vec<F> = toks.numbers()?;
    if weights.len() != n {
        return Err(Error::Data {
            line: toks.line,
            msg: format!("expected {} vertex weights, got {}", n, weights.len()),
        });
    }

    let mut b = Graph::<F>::new_builder();
    let vertices = b.add_vertices(&weights);

    while let Some(mut toks) = reader.read_line()? {
        let u: usize = toks.number()?;
        let v: usize = toks.number()?;
        let cost: F = toks.number()?;
        toks.end()?;

        for &x in &[u, v] {
            if x >= n {
                return Err(Error::Data {
                    line: toks.line,
                    msg: format!("invalid vertex {} (must be in 0..{})", x, n),
                });
            }
        }
        if u == v {
            return Err(Error::Data {
                line: toks.line,
                msg: format!("invalid loop ({},{})", u, v),
            });
        }

        b.add_arc(vertices[u], vertices[v], cost);
    }

    let g = b.into_graph();
    debug!("Read {} vertices and {} arcs", g.num_vertices(), g.num_arcs());
    Ok(g)
}

/// Read a transportation problem from a named file.
///
/// The graph is named after the file.
pub fn read_from_file<P, F>(filename: P) -> Result<Graph<F>>
where
    P: AsRef<Path>,
    F: FromStr + Copy + Zero,
    F::Err: Display,
{
    let path = filename.as_ref();
    let mut g = read(std::fs::File::open(path)?)?;
    if let Some(name) = path.file_name() {
        g.set_name(name.to_string_lossy());
    }
    Ok(g)
}

/// Write a transportation problem.
///
/// Only the arcs of the input network are written.
pub fn write<W, F>(mut w: W, g: &Graph<F>) -> io::Result<()>
where
    W: Write,
    F: Copy + Display,
{
    if !g.name().is_empty() {
        writeln!(w, "// {}", g.name())?;
    }
    writeln!(w, "{}", g.num_vertices())?;
    let weights = g.vertices().map(|u| u.weight().to_string()).collect::<Vec<_>>();
    writeln!(w, "{}", weights.join(" "))?;
    for a in g.arcs().filter(|a| !a.is_artificial()) {
        writeln!(w, "{} {} {}", a.src(), a.snk(), a.cost())?;
    }
    Ok(())
}

/// Write a transportation problem to a named file.
pub fn write_to_file<P, F>(filename: P, g: &Graph<F>) -> io::Result<()>
where
    P: AsRef<Path>,
    F: Copy + Display,
{
    write(&mut std::fs::File::create(filename)?, g)
}

/// Write the flows of a solved transportation problem.
///
/// The first line `s <value>` contains the total cost, followed by one
/// line `f <a> <b> <flow>` for each arc with non-zero flow.
pub fn write_solution<W, F>(mut w: W, solution: &Graph<F>) -> io::Result<()>
where
    W: Write,
    F: Copy + NumAssign + PartialOrd + Display,
{
    writeln!(w, "s {}", solution.value())?;
    for a in solution.arcs().filter(|a| !a.is_artificial()) {
        if !a.flow().is_zero() {
            writeln!(w, "f {} {} {}", a.src(), a.snk(), a.flow())?;
        }
    }
    Ok(())
}

/// Write the flows of a solved transportation problem to a named file.
pub fn write_solution_to_file<P, F>(filename: P, solution: &Graph<F>) -> io::Result<()>
where
    P: AsRef<Path>,
    F: Copy + NumAssign + PartialOrd + Display,
{
    write_solution(&mut std::fs::File::create(filename)?, solution)
}

/// Read a solution of a transportation problem.
///
/// Returns the value and the list of flows `(a, b, flow)`.
pub fn read_solution<R, F>(r: R) -> Result<(F, Vec<(usize, usize, F)>)>
where
    R: Read,
    F: FromStr,
    F::Err: Display,
{
    let mut reader = TextReader::new(r);
    let mut flows = vec![];
    let mut sol = None;

    while let Some(mut toks) = reader.read_line()? {
        let line = toks.line;
        match toks.it.next() {
            Some("f") => flows.push((toks.number()?, toks.number()?, toks.number()?)),
            Some("s") => {
                if sol.is_some() {
                    return Err(Error::Format {
                        line,
                        msg: "The solution value must be specified exactly once".to_string(),
                    });
                }
                sol = Some(toks.number()?);
            }
            Some(d) => {
                return Err(Error::Format {
                    line,
                    msg: format!("unexpected line, expected one of 's', 'f', got '{}'", d),
                })
            }
            None => unreachable!("empty lines are skipped"),
        }
        toks.end()?;
    }

    Ok((
        sol.ok_or_else(|| Error::Format {
            line: 0,
            msg: "Missing solution value".to_string(),
        })?,
        flows,
    ))
}

/// Read a solution of a transportation problem from a named file.
pub fn read_solution_from_file<P, F>(filename: P) -> Result<(F, Vec<(usize, usize, F)>)>
where
    P: AsRef<Path>,
    F: FromStr,
    F::Err: Display,
{
    read_solution(std::fs::File::open(filename)?)
}

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::mcf::transport_simplex;
    use crate::textfile;
    use crate::{Buildable, Builder, Graph};
    use std::io::Cursor;

    #[test]
    fn parse_file_test() {
        let file = "// this is a test file

+4 // number of vertices
-10 -5 +8 7

// there might be empty lines

0 2 2
0 3 4
1 2 +5
1 3 3

// end of the file
";
        let g: Graph<isize> = textfile::read(Cursor::new(file)).unwrap();

        assert_eq!(g.num_vertices(), 4);
        assert_eq!(g.num_arcs(), 4);

        let weights = g.vertices().map(|u| u.weight()).collect::<Vec<_>>();
        assert_eq!(weights, vec![-10, -5, 8, 7]);

        let arcs = g
            .arcs()
            .map(|a| (a.src().index(), a.snk().index(), a.cost()))
            .collect::<Vec<_>>();
        assert_eq!(arcs, vec![(0, 2, 2), (0, 3, 4), (1, 2, 5), (1, 3, 3)]);
    }

    fn read_err(file: &str) -> Error {
        textfile::read::<_, isize>(Cursor::new(file)).unwrap_err()
    }

    #[test]
    fn parse_errors_test() {
        match read_err("3\n-1 1\n") {
            Error::Data { line, .. } => assert_eq!(line, 2),
            err => panic!("Unexpected error: {}", err),
        }
        match read_err("// only a comment\n") {
            Error::Format { .. } => (),
            err => panic!("Unexpected error: {}", err),
        }
        match read_err("2\n-1 1\n0 2 5\n") {
            Error::Data { line, .. } => assert_eq!(line, 3),
            err => panic!("Unexpected error: {}", err),
        }
        match read_err("2\n-1 1\n\n1 1 5\n") {
            Error::Data { line, .. } => assert_eq!(line, 4),
            err => panic!("Unexpected error: {}", err),
        }
        match read_err("2\n-1 1\n0 1 x\n") {
            Error::Format { line, .. } => assert_eq!(line, 3),
            err => panic!("Unexpected error: {}", err),
        }
        match read_err("2\n-1 1\n0 1 5 7\n") {
            Error::Format { line, .. } => assert_eq!(line, 3),
            err => panic!("Unexpected error: {}", err),
        }
        match read_err("2 3\n-1 1\n") {
            Error::Format { line, .. } => assert_eq!(line, 1),
            err => panic!("Unexpected error: {}", err),
        }
    }

    #[test]
    fn write_test_file() {
        let mut g = Graph::<i32>::new_with(|b| {
            let vs = b.add_vertices(&[-4, 0, 4]);
            b.add_arc(vs[0], vs[1], 1);
            b.add_arc(vs[1], vs[2], -2);
            b.add_arc(vs[0], vs[2], 3);
        });
        g.set_name("path");

        let mut buf = Cursor::new(Vec::new());
        textfile::write(&mut buf, &g).unwrap();
        let txt = String::from_utf8(buf.into_inner()).unwrap();
        assert_eq!(
            txt,
            "// path
3
-4 0 4
0 1 1
1 2 -2
0 2 3
"
        );

        let h: Graph<i32> = textfile::read(Cursor::new(txt)).unwrap();
        assert_eq!(h.num_arcs(), 3);
        assert_eq!(h.arc(h.id2arc(1)).cost(), -2);
    }

    #[test]
    fn write_solution_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = Graph::<isize>::new_with(|b| {
            let s = b.add_vertices(&[-10, -5]);
            let d = b.add_vertices(&[8, 7]);
            b.add_arc(s[0], d[0], 2);
            b.add_arc(s[0], d[1], 4);
            b.add_arc(s[1], d[0], 5);
            b.add_arc(s[1], d[1], 3);
        });
        let (_, sol) = transport_simplex(&g)?;

        let mut buf = Cursor::new(Vec::new());
        textfile::write_solution(&mut buf, &sol)?;

        let soltxt = String::from_utf8(buf.into_inner())?;
        assert_eq!(
            soltxt,
            "s 39
f 0 2 8
f 0 3 2
f 1 3 5
"
        );

        let (value, flows) = textfile::read_solution(Cursor::new(soltxt))?;
        assert_eq!(value, 39);
        assert_eq!(flows, vec![(0, 2, 8), (0, 3, 2), (1, 3, 5)]);

        Ok(())
    }
}
