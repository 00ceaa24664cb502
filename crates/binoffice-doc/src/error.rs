use thiserror::Error;

use crate::Cp;

/// Failure to open a document at all.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("failed to read compound file: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing required stream {0}")]
    MissingStream(&'static str),
    #[error("not a Word binary document (wIdent={0:#06x})")]
    NotWordDocument(u16),
    #[error("encrypted or obfuscated Word documents are not supported")]
    Encrypted,
    #[error("unsupported Word file format (nFib={0:#06x}); Word 97 or later is required")]
    UnsupportedVersion(u16),
    #[error("corrupt FIB: {0}")]
    Fib(#[source] DocError),
}

/// Failure of one derived structure or query.
///
/// Derived structures are cached together with their error, so this type is `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    #[error("character position {cp} is outside the document (length {len})")]
    OutOfRange { cp: Cp, len: Cp },
    #[error("corrupt {structure}: {detail}")]
    Corrupted {
        structure: &'static str,
        detail: String,
    },
}

impl DocError {
    pub(crate) fn corrupted(structure: &'static str, detail: impl Into<String>) -> Self {
        DocError::Corrupted {
            structure,
            detail: detail.into(),
        }
    }

    pub fn is_corruption(&self) -> bool {
        matches!(self, DocError::Corrupted { .. })
    }
}
