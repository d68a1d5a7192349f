//! Conversion drivers: parallel adjacency decomposition and the direct
//! double-description path.

use std::collections::BTreeSet;
use std::io::Write;

use crate::DescryError as Error;
use crate::classes;
use crate::fme;
use crate::group::VertexGroup;
use crate::list::WorkList;
use crate::maps::Map;
use crate::num::Int;
use crate::ops;
use crate::pretty;
use crate::rotation::{self, RecursionOptions};
use crate::types::{Matrix, Names, Row, Tag};

/// A configured conversion run.
///
/// `rows` is the known description: the vertices and rays when enumerating
/// facets, the inequalities (with the homogenizing row appended) when
/// enumerating vertices. The tag says what the *output* rows are and drives
/// map semantics and printing.
pub struct Enumeration<'a, N: Int> {
    rows: &'a Matrix<N>,
    tag: Tag,
    names: Names,
    maps: &'a [Map<N>],
    group: Option<&'a VertexGroup>,
    seeds: Matrix<N>,
    threads: usize,
    recursion: RecursionOptions,
}

impl<'a, N: Int> Enumeration<'a, N> {
    pub fn new(rows: &'a Matrix<N>, tag: Tag) -> Self {
        Self {
            rows,
            tag,
            names: Names::default(),
            maps: &[],
            group: None,
            seeds: Vec::new(),
            threads: 1,
            recursion: RecursionOptions::default(),
        }
    }

    pub fn with_names(mut self, names: Names) -> Self {
        self.names = names;
        self
    }

    pub fn with_maps(mut self, maps: &'a [Map<N>]) -> Self {
        self.maps = maps;
        self
    }

    pub fn with_group(mut self, group: &'a VertexGroup) -> Self {
        self.group = Some(group);
        self
    }

    /// Known output rows injected as additional trusted seeds.
    pub fn with_seeds(mut self, seeds: Matrix<N>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_recursion(mut self, recursion: RecursionOptions) -> Self {
        self.recursion = recursion;
        self
    }

    /// Adjacency decomposition: heuristic seeds feed the shared work list;
    /// workers pull a representative, rotate across its ridges and push the
    /// neighbours back until no new class appears. New representatives are
    /// written to `sink` as they are found.
    pub fn run_adjacency(self, sink: Box<dyn Write + Send>) -> Result<Matrix<N>, Error> {
        self.validate()?;
        let mut seeds: BTreeSet<Row<N>> = fme::fourier_motzkin_heuristic(self.rows)?
            .into_iter()
            .collect();
        for seed in &self.seeds {
            seeds.insert(ops::normalized(seed.clone()));
        }
        let seeds: Matrix<N> = match self.group {
            Some(group) => {
                classes::classes_vertex_support(seeds, self.rows, self.maps, group, self.tag)
            }
            None => classes::classes(&seeds, self.maps, self.tag),
        };

        let names = self.resolved_names();
        let list = WorkList::new(names, self.tag, self.rows, self.group, sink);
        let recursion = self.recursion;
        let outcome = std::thread::scope(|scope| {
            // Deliver the seeds while this thread still counts as active.
            list.put_rows(seeds);
            let mut handles = Vec::with_capacity(self.threads - 1);
            for index in 1..self.threads {
                let list = &list;
                let rows = self.rows;
                let maps = self.maps;
                let group = self.group;
                let tag = self.tag;
                handles.push(scope.spawn(move || {
                    worker_loop(index, list, rows, maps, group, tag, &recursion)
                }));
            }
            let mut outcome = worker_loop(
                0,
                &list,
                self.rows,
                self.maps,
                self.group,
                self.tag,
                &recursion,
            );
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        if outcome.is_ok() {
                            outcome = Err(err);
                        }
                    }
                    Err(_) => {
                        if outcome.is_ok() {
                            outcome = Err(Error::WorkerPanicked);
                        }
                    }
                }
            }
            outcome
        });
        outcome?;
        Ok(list.into_rows())
    }

    /// Direct double description: one full elimination, rows written to
    /// `sink` once the conversion finishes.
    pub fn run_double_description(
        self,
        mut sink: Box<dyn Write + Send>,
    ) -> Result<Matrix<N>, Error> {
        self.validate()?;
        let names = self.resolved_names();
        let output = fme::fourier_motzkin(self.rows)?;
        for row in &output {
            let line = match self.tag {
                Tag::Facet => pretty::format_inequality(row, &names),
                Tag::Vertex => pretty::format_row(row),
            };
            let _ = writeln!(sink, "{line}");
        }
        let _ = sink.flush();
        Ok(output)
    }

    fn validate(&self) -> Result<(), Error> {
        let Some(width) = self.rows.first().map(Vec::len) else {
            return Err(Error::InvalidArgument {
                context: "enumeration needs at least one input row",
            });
        };
        if width < 2 {
            return Err(Error::InvalidArgument {
                context: "enumeration needs rows of width at least two",
            });
        }
        if self.rows.iter().any(|row| row.len() != width) {
            return Err(Error::DimensionMismatch);
        }
        if self.seeds.iter().any(|row| row.len() != width) {
            return Err(Error::DimensionMismatch);
        }
        if self.maps.iter().any(|map| map.width() != width) {
            return Err(Error::InvalidArgument {
                context: "map width must match the row width",
            });
        }
        if !self.names.is_empty() && self.names.len() + 1 != width {
            return Err(Error::InvalidArgument {
                context: "one name per coordinate is required",
            });
        }
        if let Some(group) = self.group
            && group.vertex_count() != self.rows.len()
        {
            return Err(Error::InvalidArgument {
                context: "the vertex group must act on the input rows",
            });
        }
        Ok(())
    }

    fn resolved_names(&self) -> Names {
        if self.names.is_empty() {
            let width = self.rows.first().map(Vec::len).unwrap_or(1);
            Names::default_for(width - 1)
        } else {
            self.names.clone()
        }
    }
}

fn worker_loop<N: Int>(
    index: usize,
    list: &WorkList<'_, N>,
    rows: &Matrix<N>,
    maps: &[Map<N>],
    group: Option<&VertexGroup>,
    tag: Tag,
    recursion: &RecursionOptions,
) -> Result<(), Error> {
    loop {
        let row = list.get();
        if row.is_empty() {
            return Ok(());
        }
        tracing::debug!(worker = index, "expanding a representative");
        match rotation::adjacent_facets(rows, &row, maps, group, tag, recursion) {
            Ok(adjacent) => list.put_rows(adjacent),
            Err(err) => {
                // Release the work unit so the peers can drain and exit.
                list.put_rows(Vec::new());
                return Err(err);
            }
        }
    }
}
