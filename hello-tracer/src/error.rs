use std::{io, path::PathBuf};

/// What kind of object a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    EntryPoint,
    Map,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::EntryPoint => f.write_str("program"),
            SymbolKind::Map => f.write_str("map"),
        }
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open object `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load object `{}`", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("{kind} `{name}` not found in object")]
    Resolve { kind: SymbolKind, name: String },

    #[error("failed to attach program `{name}`")]
    Attach {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to create event buffer over map `{map}`")]
    BufferCreate {
        map: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to wait on event buffer: {0}")]
    Poll(io::Error),
}

impl Error {
    pub(crate) fn load(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Error::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn attach(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Attach {
            name: name.into(),
            source: source.into(),
        }
    }

    pub(crate) fn buffer_create(map: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::BufferCreate {
            map: map.into(),
            source: source.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
