//! Read-only model of Word 97-2003 binary (`.doc`) documents.
//!
//! A `.doc` file is a compound file holding a `WordDocument` stream (header, text and
//! formatting pages) and a table stream (piece table, style sheet and other indexes). This
//! crate resolves:
//! - text by character position (CP), across pieces stored in different encodings
//! - paragraph boundaries
//! - direct paragraph/character formatting, including piece-level overrides
//! - style inheritance and the combined default/style/direct property cascade
//!
//! Properties are returned as [`Prl`] lists (see [`binoffice_sprm`]) rather than a decoded
//! property struct; interpreting individual sprms is left to callers.
//!
//! ```no_run
//! # fn main() -> Result<(), binoffice_doc::OpenError> {
//! let doc = binoffice_doc::Document::open("report.doc")?;
//! if let Some((start, end)) = doc.paragraph_bounds(0) {
//!     println!("first paragraph: {:?}", doc.text_range(start..end + 1));
//! }
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod word;

pub use binoffice_sprm::{Prl, Sprm, SprmScope};
pub use document::{Document, OpenOptions, Subdocument, SubdocumentKind};
pub use error::{DocError, OpenError};
pub use word::bookmarks::Bookmark;
pub use word::cascade::PropertyCascade;
pub use word::dop::Dop;
pub use word::fib::{CcpCounts, FcLcb, Fib, FibBase, FibEntry, FibFlags};
pub use word::paragraphs::{Paragraph, Paragraphs};
pub use word::piece_table::{MaterializedText, Piece, PieceOverride, PieceSpan, PieceTable};
pub use word::stylesheet::{Style, StyleKind, StyleSheet, StyleSheetInfo, ISTD_NIL};

/// Character position: a zero-based index into the document text.
pub type Cp = u32;
