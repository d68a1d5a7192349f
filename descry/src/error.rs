use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DescryError {
    #[error("invalid argument: {context}")]
    InvalidArgument { context: &'static str },
    #[error("input rows must all have the same length")]
    DimensionMismatch,
    #[error("rotation produced the zero row")]
    DegenerateRotation,
    #[error("no input row lies on the candidate facet")]
    EmptyVertexSupport,
    #[error("a worker thread panicked")]
    WorkerPanicked,
}
