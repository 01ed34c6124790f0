use std::fmt;
use std::path::PathBuf;

/// The four raw counter sources the samplers read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Cpu,
    Memory,
    Disk,
    Load,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Cpu => "cpu",
            SourceKind::Memory => "memory",
            SourceKind::Disk => "disk",
            SourceKind::Load => "load",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A counter source could not be read or did not contain what the sampler needs.
///
/// Both variants are unrecoverable for the sampling loop; the caller decides
/// how to terminate.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{kind} source unavailable at {}: {source}", path.display())]
    Unavailable {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {kind} source: {detail}")]
    Malformed { kind: SourceKind, detail: String },
}

impl SourceError {
    pub fn malformed(kind: SourceKind, detail: impl Into<String>) -> Self {
        SourceError::Malformed {
            kind,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceError::Unavailable { kind, .. } | SourceError::Malformed { kind, .. } => *kind,
        }
    }
}
