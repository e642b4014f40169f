use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the querycad pipeline.
#[derive(Debug, Error)]
pub enum QueryCadError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("unsupported curve type: {0}")]
    UnsupportedCurve(String),
}

/// Errors related to topological lookups and traversal.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors raised while reading a STEP (ISO 10303-21) file.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("lexer error at line {line}, column {col}: {message}")]
    Lexer {
        line: usize,
        col: usize,
        message: String,
    },

    #[error("parser error{}: {message}", entity_id.map(|id| format!(" at entity #{id}")).unwrap_or_default())]
    Parser {
        entity_id: Option<u64>,
        message: String,
    },

    #[error("missing entity reference: #{0}")]
    MissingEntity(u64),

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("invalid geometry in entity #{entity_id}: {source}")]
    Geometry {
        entity_id: u64,
        #[source]
        source: GeometryError,
    },
}

impl StepError {
    /// Creates a lexer error.
    pub fn lexer(line: usize, col: usize, message: impl Into<String>) -> Self {
        Self::Lexer {
            line,
            col,
            message: message.into(),
        }
    }

    /// Creates a parser error.
    pub fn parser(entity_id: Option<u64>, message: impl Into<String>) -> Self {
        Self::Parser {
            entity_id,
            message: message.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Reasons a STEP file is rejected as a planar single-face model.
///
/// Variants are listed in the order the checks run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read STEP file: {0}")]
    Import(#[from] StepError),

    #[error("no valid shape in the STEP file")]
    NullShape,

    #[error("the STEP file contains 3D solids - not a 2D file")]
    NotPlanar,

    #[error("the STEP file contains no surfaces")]
    NoSurface,

    #[error("the STEP file contains multiple surfaces - not a valid 2D file")]
    MultipleSurfaces,

    #[error("the STEP file contains no wireframes")]
    NoWireframe,

    #[error("wireframe {wire} contains no edges")]
    EmptyWire { wire: usize },

    #[error("topology kernel failure: {0}")]
    Kernel(#[from] TopologyError),
}

/// Errors raised while discretizing the wires of a model.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("invalid 2D CAD model")]
    InvalidModel,

    #[error("no 1D mesh has been computed yet")]
    NotDiscretized,

    #[error("step length must be finite and positive, got {0}")]
    InvalidStep(f64),

    #[error("failed to discretize edge {edge} of wire {wire}: {reason}")]
    Discretization {
        wire: usize,
        edge: usize,
        reason: String,
    },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Errors raised while writing the mesh to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to open file: {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`QueryCadError`].
pub type Result<T> = std::result::Result<T, QueryCadError>;
