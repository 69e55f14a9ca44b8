use std::io;
use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

/// Failures crossing the index boundary. Unification failure, trie misses,
/// and empty result streams are empty outcomes, not errors.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("{}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {}", path.display(), source)]
    Codec {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: not an index file", path.display())]
    Magic { path: PathBuf },

    #[error("{}: unsupported index version {}", path.display(), version)]
    Version { path: PathBuf, version: u32 },

    #[error("unknown package: {0}")]
    UnknownPackage(SmolStr),
}
