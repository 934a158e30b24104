use std::path::PathBuf;

/// Error type for cache building, loading and querying.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Maven version string that does not follow the version grammar.
    #[error("invalid Maven version: {0}")]
    InvalidVersion(String),

    /// Java version that is neither `N` nor `1.N`.
    #[error("invalid Java version: {0}")]
    InvalidJavaVersion(String),

    /// Invalid keyword string.
    #[error("invalid keyword: {0}")]
    InvalidKeyword(String),

    /// Maven coordinate that is not `groupId:artifactId:version`.
    #[error("invalid Maven coordinate: {0}")]
    InvalidCoordinate(String),

    /// Malformed data line in the cache file.
    #[error("invalid cache line {line}: {content}")]
    InvalidCacheLine {
        /// 1-based line number in the cache file.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// Value that cannot be stored in a cache line.
    #[error("{field} {value:?} cannot be stored in the cache")]
    InvalidCacheField {
        /// Name of the cache line field.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    /// Ebuild that could not be turned into cache items.
    #[error("{}: {source}", path.display())]
    Ebuild {
        /// The ebuild file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: Box<Error>,
    },

    /// Cache file written by an unsupported format version.
    #[error("unsupported cache version {0:?}, refresh the cache")]
    UnsupportedCacheVersion(String),

    /// Failed to read or write a file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to list a directory of the repository tree.
    #[error("failed to walk repository tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for java-ebuilder operations.
pub type Result<T> = std::result::Result<T, Error>;
