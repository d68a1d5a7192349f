//! The shared, deduplicating work list driving parallel workers.
//!
//! A textbook monitor: one mutex guards the row set, the FIFO of pending
//! rows, the canonical supports seen so far and the active worker count; one
//! condition variable parks consumers. `workers` starts at one so the
//! seeding thread counts as active until its rows are delivered; no
//! consumer can observe an empty list before then.
//!
//! When a vertex group is present, equivalence of facets is decided by the
//! canonical form of their vertex support. That canonical form is computed
//! before the lock is taken (it only reads immutable state), so the critical
//! section is a set insertion.

use std::collections::{BTreeSet, VecDeque};
use std::io::Write;
use std::sync::{Condvar, Mutex};

use crate::group::VertexGroup;
use crate::num::Int;
use crate::ops;
use crate::pretty;
use crate::types::{Matrix, Names, Row, Support, Tag};

pub struct WorkList<'a, N: Int> {
    names: Names,
    tag: Tag,
    vertices: &'a Matrix<N>,
    group: Option<&'a VertexGroup>,
    state: Mutex<State<N>>,
    available: Condvar,
}

struct State<N: Int> {
    rows: BTreeSet<Row<N>>,
    pending: VecDeque<Row<N>>,
    seen_supports: BTreeSet<Support>,
    workers: usize,
    sink: Box<dyn Write + Send>,
}

impl<'a, N: Int> WorkList<'a, N> {
    pub fn new(
        names: Names,
        tag: Tag,
        vertices: &'a Matrix<N>,
        group: Option<&'a VertexGroup>,
        sink: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            names,
            tag,
            vertices,
            group,
            state: Mutex::new(State {
                rows: BTreeSet::new(),
                pending: VecDeque::new(),
                seen_supports: BTreeSet::new(),
                workers: 1,
                sink,
            }),
            available: Condvar::new(),
        }
    }

    /// Merges one row into the list. New rows are printed to the sink and
    /// made available to a waiting consumer; rows whose canonical support was
    /// already seen are dropped as duplicate orbit members.
    pub fn put_row(&self, row: Row<N>) {
        let canonical = self.group.map(|group| {
            let support = ops::vertex_support(&row, self.vertices);
            group.canonical(&support)
        });

        let mut state = self.state.lock().expect("work list mutex poisoned");
        if let Some(canonical) = canonical
            && !state.seen_supports.insert(canonical)
        {
            tracing::trace!("dropping duplicate orbit representative");
            return;
        }
        if !state.rows.insert(row.clone()) {
            return;
        }
        let line = match self.tag {
            Tag::Facet => pretty::format_inequality(&row, &self.names),
            Tag::Vertex => pretty::format_row(&row),
        };
        let _ = writeln!(state.sink, "{line}");
        let _ = state.sink.flush();
        state.pending.push_back(row);
        self.available.notify_one();
    }

    /// Merges a batch of rows, then marks the caller's current work unit as
    /// finished.
    pub fn put_rows(&self, rows: Matrix<N>) {
        for row in rows {
            self.put_row(row);
        }
        let mut state = self.state.lock().expect("work list mutex poisoned");
        debug_assert!(state.workers > 0, "finished a work unit nobody started");
        state.workers -= 1;
    }

    /// Returns a row never handed out before, blocking until one is
    /// available. Once the computation has terminated every caller receives
    /// the empty sentinel row, which stays at the head of the queue so all
    /// waiters see it.
    pub fn get(&self) -> Row<N> {
        if self.is_done() {
            let mut state = self.state.lock().expect("work list mutex poisoned");
            if state.pending.is_empty() {
                state.pending.push_back(Row::new());
            }
            self.available.notify_all();
        }
        let mut state = self.state.lock().expect("work list mutex poisoned");
        while state.pending.is_empty() {
            state = self
                .available
                .wait(state)
                .expect("work list mutex poisoned");
        }
        state.workers += 1;
        let row = state
            .pending
            .front()
            .expect("pending queue non-empty after wait")
            .clone();
        if !row.is_empty() {
            state.pending.pop_front();
        }
        row
    }

    /// All rows merged so far, in lexicographic order.
    pub fn into_rows(self) -> Matrix<N> {
        let state = self
            .state
            .into_inner()
            .expect("work list mutex poisoned");
        state.rows.into_iter().collect()
    }

    fn is_done(&self) -> bool {
        let state = self.state.lock().expect("work list mutex poisoned");
        state.workers == 0 && state.pending.is_empty()
    }
}
