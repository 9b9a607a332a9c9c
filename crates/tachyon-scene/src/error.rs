//! Error types for scene-file parsing.

use thiserror::Error;

/// Errors that can occur while parsing a scene file.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The top-level scene file could not be opened or read.
    #[error("cannot open scene file {path}: {source}")]
    FileNotFound {
        /// Path as given by the caller.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An included file (or a polygon file named by `TPOLYFILE`) could not be opened.
    #[error("cannot open included file {path} (referenced from {from}): {source}")]
    IncludeFileNotFound {
        /// Path named in the directive.
        path: String,
        /// File containing the directive.
        from: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A keyword or field did not match the grammar.
    #[error("syntax error in {file} at line {line} (offset {offset}): expected {expected}, found `{found}`")]
    Syntax {
        /// File being parsed.
        file: String,
        /// Approximate line number (1-indexed).
        line: usize,
        /// Byte offset of the cursor when the error was detected.
        offset: usize,
        /// What the grammar required.
        expected: String,
        /// The token actually read.
        found: String,
    },

    /// Input ended in the middle of an object.
    #[error("unexpected end of input in {file}: expected {expected}")]
    UnexpectedEndOfInput {
        /// File being parsed.
        file: String,
        /// What the grammar required.
        expected: String,
    },

    /// A buffer or table could not grow.
    #[error("allocation exhausted for {what} ({requested} slots requested)")]
    AllocationExhausted {
        /// The structure that failed to grow.
        what: String,
        /// Number of slots that were requested.
        requested: usize,
    },

    /// A triangle strip or mesh referenced a vertex outside the array.
    #[error("invalid vertex index {index} in {block} facet {facet} of {file} at line {line}: array has {vertex_count} vertices")]
    InvalidVertexIndex {
        /// File being parsed.
        file: String,
        /// Approximate line number (1-indexed).
        line: usize,
        /// `TRISTRIP` or `TRIMESH`.
        block: &'static str,
        /// Facet number within the block.
        facet: usize,
        /// The offending index.
        index: i64,
        /// Number of vertices in the array.
        vertex_count: usize,
    },

    /// A light's trailing block was neither `COLOR` nor `ATTENUATION`.
    #[error("bad light block in {file} at line {line}: expected COLOR or ATTENUATION, found `{found}`")]
    BadAttenuationOrColorBlock {
        /// File being parsed.
        file: String,
        /// Approximate line number (1-indexed).
        line: usize,
        /// The token actually read.
        found: String,
    },

    /// `INCLUDE` directives nested deeper than the configured limit.
    #[error("include depth limit of {limit} exceeded while including {path}")]
    IncludeDepthExceeded {
        /// Path named in the directive that crossed the limit.
        path: String,
        /// Configured maximum depth.
        limit: usize,
    },

    /// Parser options could not be loaded.
    #[error("invalid parser configuration {path}: {message}")]
    Config {
        /// Configuration source.
        path: String,
        /// Error message.
        message: String,
    },
}

/// The kind of a [`ParseError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ParseError::FileNotFound`].
    FileNotFound,
    /// See [`ParseError::IncludeFileNotFound`].
    IncludeFileNotFound,
    /// See [`ParseError::Syntax`].
    SyntaxError,
    /// See [`ParseError::UnexpectedEndOfInput`].
    UnexpectedEndOfInput,
    /// See [`ParseError::AllocationExhausted`].
    AllocationExhausted,
    /// See [`ParseError::InvalidVertexIndex`].
    InvalidVertexIndex,
    /// See [`ParseError::BadAttenuationOrColorBlock`].
    BadAttenuationOrColorBlock,
    /// See [`ParseError::IncludeDepthExceeded`].
    IncludeDepthExceeded,
    /// See [`ParseError::Config`].
    Config,
}

impl ParseError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::IncludeFileNotFound { .. } => ErrorKind::IncludeFileNotFound,
            Self::Syntax { .. } => ErrorKind::SyntaxError,
            Self::UnexpectedEndOfInput { .. } => ErrorKind::UnexpectedEndOfInput,
            Self::AllocationExhausted { .. } => ErrorKind::AllocationExhausted,
            Self::InvalidVertexIndex { .. } => ErrorKind::InvalidVertexIndex,
            Self::BadAttenuationOrColorBlock { .. } => ErrorKind::BadAttenuationOrColorBlock,
            Self::IncludeDepthExceeded { .. } => ErrorKind::IncludeDepthExceeded,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Create an unexpected end-of-input error.
    pub fn end_of_input(file: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::UnexpectedEndOfInput {
            file: file.into(),
            expected: expected.into(),
        }
    }

    /// Create an allocation error.
    pub fn allocation(what: impl Into<String>, requested: usize) -> Self {
        Self::AllocationExhausted {
            what: what.into(),
            requested,
        }
    }

    /// Create a configuration error.
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
