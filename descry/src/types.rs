//! Shared row/matrix vocabulary.
//!
//! A `Row` is either a homogenized point `(h, p_1 .. p_d)` with `h = 1` for a
//! vertex and `h = 0` for a ray, or an inequality `a.x <= b` stored as
//! `(b, -a_1 .. -a_d)` so that the scalar product with a point row is the
//! inequality's slack at that point. Which reading applies is carried by a
//! [`Tag`], never by the element type.

pub type Row<N> = Vec<N>;
pub type Matrix<N> = Vec<Row<N>>;

/// Sorted indices of the input rows a facet contains.
pub type Support = Vec<usize>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tag {
    /// Enumerated entities are points; maps act directly.
    Vertex,
    /// Enumerated entities are inequalities; maps act by substitution.
    Facet,
}

/// Coordinate labels used by the pretty printer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Names {
    labels: Vec<String>,
}

impl Names {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// `x1 .. xd` fallback labels.
    pub fn default_for(dimension: usize) -> Self {
        Self {
            labels: (1..=dimension).map(|i| format!("x{i}")).collect(),
        }
    }

    pub fn label(&self, index: usize) -> &str {
        self.labels
            .get(index)
            .expect("coordinate label index within bounds")
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
