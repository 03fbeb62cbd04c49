use thiserror::Error;

/// Top-level error type for the plangraph model.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Polygon(#[from] PolygonError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors raised by the vertex and line registries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("a line cannot start and end at the same vertex")]
    SelfLoop,

    #[error("vertices {start} and {end} are already connected by line {line}")]
    DuplicateLine { start: u32, end: u32, line: u32 },

    #[error("{kind} id {id} is already in use")]
    IdInUse { kind: &'static str, id: u32 },

    #[error("no free {0} id left")]
    IdsExhausted(&'static str),
}

/// Errors raised while ordering lines into a simple closed cycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolygonError {
    #[error("a polygon needs at least 3 vertices and 3 lines, got {vertices} and {lines}")]
    TooFewElements { vertices: usize, lines: usize },

    #[error("vertex count {vertices} does not match line count {lines}")]
    CountMismatch { vertices: usize, lines: usize },

    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("{0} listed more than once")]
    Duplicate(&'static str),

    #[error("line {line} starts and ends at the same vertex")]
    SelfLoop { line: u32 },

    #[error("vertex {vertex} has degree {degree} within the line set, expected 2")]
    InvalidDegree { vertex: u32, degree: usize },

    #[error("walk reached line {line} twice")]
    RevisitedLine { line: u32 },

    #[error("walk did not close within {steps} steps")]
    NotClosed { steps: usize },

    #[error("cycle visits {visited} of {expected} lines")]
    Disconnected { visited: usize, expected: usize },

    #[error("polygon id {0} is already in use")]
    IdInUse(u32),

    #[error("no free polygon id left")]
    IdsExhausted,
}

/// Errors raised while reading or writing a graph document.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} id {id} appears more than once")]
    DuplicateId { kind: &'static str, id: u32 },

    #[error("line {line} starts and ends at vertex {vertex}")]
    SelfLoop { line: u32, vertex: u32 },

    #[error("{kind} {id} references missing {target} {target_id}")]
    DanglingReference {
        kind: &'static str,
        id: u32,
        target: &'static str,
        target_id: u32,
    },

    #[error("polygon {polygon} has {vertices} vertex ids and {lines} line ids, expected equal counts of at least 3")]
    PolygonArity {
        polygon: u32,
        vertices: usize,
        lines: usize,
    },

    #[error("failed to create line {line}: {source}")]
    LineCreation {
        line: u32,
        #[source]
        source: TopologyError,
    },
}

/// Convenience type alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
