//! Exact conversion between the two descriptions of a polyhedron.
//!
//! Given the vertices (and rays) of a polytope this crate enumerates its
//! facet inequalities, and vice versa, over exact integer arithmetic:
//! - numeric scalar trait (`num`)
//! - row and matrix primitives (`types`, `ops`)
//! - Fourier-Motzkin elimination (`fme`)
//! - coordinate maps and symmetry reduction (`maps`, `group`, `classes`)
//! - ridge rotation and adjacency decomposition (`rotation`, `driver`)
//! - the shared deduplicating work list driving parallel workers (`list`)

pub mod classes;
pub mod driver;
pub mod error;
pub mod fme;
pub mod group;
pub mod list;
pub mod maps;
pub mod num;
pub mod ops;
pub mod pretty;
pub mod rotation;
pub mod types;

pub use error::DescryError;

pub use crate::driver::Enumeration;
pub use crate::group::VertexGroup;
pub use crate::maps::Map;
pub use crate::num::Int;
pub use crate::rotation::RecursionOptions;
pub use crate::types::{Matrix, Names, Row, Support, Tag};
