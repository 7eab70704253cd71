use thiserror::Error;

/// Result alias for `equitier`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by clustering, aggregation and hierarchy construction.
///
/// Every variant is fatal to the current run: no partial hierarchy is
/// returned and nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The vector mapping was empty.
    #[error("empty input provided: no entities to cluster")]
    EmptyInput,

    /// Fewer than two entities were available where clustering is required.
    #[error("insufficient data: clustering needs at least 2 entities, found {available}")]
    InsufficientData {
        /// Number of entities available.
        available: usize,
    },

    /// Vectors of inconsistent length.
    #[error("dimension mismatch at entity {entity}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Entity whose vector has the wrong length.
        entity: String,
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A requested cluster size was zero or negative.
    #[error("invalid cluster size {size} requested for level {level}: sizes must be positive")]
    InvalidClusterSize {
        /// 1-based level the size was requested for.
        level: usize,
        /// The offending size.
        size: i64,
    },

    /// The primary key column is absent from a source record.
    #[error("primary key column '{column}' not found in record {record}")]
    UnknownPrimaryKey {
        /// Requested column name.
        column: String,
        /// 0-based record index.
        record: usize,
    },

    /// Embedding mode outside the recognized set.
    #[error("unsupported embedding mode '{mode}': expected 'tfidf' or 'bert'")]
    UnsupportedMode {
        /// The mode that was given.
        mode: String,
    },

    /// The same key was supplied twice.
    #[error("duplicate primary key {key}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// A vector with no components.
    #[error("entity {entity} has an empty feature vector")]
    EmptyVector {
        /// Entity with the empty vector.
        entity: String,
    },

    /// NaN or infinite component.
    #[error("entity {entity} has a non-finite value at component {index}")]
    NonFiniteValue {
        /// Entity with the bad component.
        entity: String,
        /// Component index.
        index: usize,
    },

    /// Source document does not have the expected shape.
    #[error("malformed embedding source at record {record}: {message}")]
    MalformedSource {
        /// 0-based record index (or entry index for mappings).
        record: usize,
        /// What was wrong.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A failure raised while building one level of the hierarchy.
    #[error("level {level}: {source}")]
    AtLevel {
        /// 1-based level.
        level: usize,
        /// Underlying error.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the 1-based level that was being built.
    pub(crate) fn at_level(self, level: usize) -> Self {
        Error::AtLevel {
            level,
            source: Box::new(self),
        }
    }

    /// The innermost error, with any level context stripped.
    pub fn root(&self) -> &Error {
        match self {
            Error::AtLevel { source, .. } => source.root(),
            other => other,
        }
    }

    /// The level the error was raised at, if known.
    pub fn level(&self) -> Option<usize> {
        match self {
            Error::AtLevel { level, .. } => Some(*level),
            _ => None,
        }
    }
}
