use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use binoffice_sprm::{ids, Prl, SprmScope};

use crate::error::{DocError, OpenError};
use crate::word::bookmarks::{parse_bookmarks, Bookmark};
use crate::word::cascade::PropertyCascade;
use crate::word::clx::Clx;
use crate::word::dop::Dop;
use crate::word::fib::{Fib, FibEntry, FIB_IDENT, NFIB_WORD97};
use crate::word::fkp::{ChpxFkp, PapxFkp, PropertyTable};
use crate::word::formatting::{direct_character, direct_paragraph};
use crate::word::paragraphs::{BoundaryResolver, Paragraphs};
use crate::word::piece_table::{MaterializedText, PieceTable};
use crate::word::stylesheet::StyleSheet;
use crate::word::{read_stream, read_u16, slice_at, WORD_DOCUMENT_STREAM};
use crate::Cp;

/// Controls how a [`Document`] derives its structures.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Parse every derived structure while opening instead of on first use.
    ///
    /// Failures are still recorded per structure and never fail the open.
    pub eager: bool,
    /// Maximum number of base-style hops when resolving a style chain.
    ///
    /// Defaults to the number of styles in the style sheet.
    pub max_style_depth: Option<usize>,
    /// Maximum number of pieces a paragraph boundary scan may visit.
    ///
    /// Defaults to the number of pieces plus one.
    pub max_paragraph_scan: Option<usize>,
}

/// One story of the document, located by the FIB's character counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubdocumentKind {
    Main,
    Footnotes,
    Headers,
    Comments,
    Endnotes,
    Textboxes,
    HeaderTextboxes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subdocument {
    pub kind: SubdocumentKind,
    pub range: Range<Cp>,
}

/// A Word 97-2003 binary document.
///
/// The `WordDocument` and table streams are buffered at open time. Every derived structure is
/// computed at most once and cached together with its outcome, so a corrupt structure only
/// disables the queries that depend on it.
///
/// Character-position queries come in two flavours: the plain methods return `None` for
/// out-of-range positions and corrupt structures alike, and the `try_` methods report which.
#[derive(Debug)]
pub struct Document {
    fib: Fib,
    word: Vec<u8>,
    table: Vec<u8>,
    options: OpenOptions,
    pieces: OnceLock<Result<PieceTable, DocError>>,
    text: OnceLock<Result<MaterializedText, DocError>>,
    papx: OnceLock<Result<PropertyTable<PapxFkp>, DocError>>,
    chpx: OnceLock<Result<PropertyTable<ChpxFkp>, DocError>>,
    styles: OnceLock<Result<StyleSheet, DocError>>,
    dop: OnceLock<Result<Dop, DocError>>,
    bookmarks: OnceLock<Result<Vec<Bookmark>, DocError>>,
    subdocuments: OnceLock<Result<Vec<Subdocument>, DocError>>,
}

fn cached<'a, T>(
    cell: &'a OnceLock<Result<T, DocError>>,
    what: &'static str,
    init: impl FnOnce() -> Result<T, DocError>,
) -> Result<&'a T, DocError> {
    cell.get_or_init(|| {
        let result = init();
        if let Err(err) = &result {
            log::warn!("failed to derive {what}: {err}");
        }
        result
    })
    .as_ref()
    .map_err(Clone::clone)
}

impl Document {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OpenError> {
        Self::open_with_options(path, OpenOptions::default())
    }

    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: OpenOptions,
    ) -> Result<Self, OpenError> {
        let file = File::open(path)?;
        Self::from_reader(file, options)
    }

    /// Open a compound file held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OpenError> {
        Self::from_bytes_with_options(bytes, OpenOptions::default())
    }

    pub fn from_bytes_with_options(bytes: &[u8], options: OpenOptions) -> Result<Self, OpenError> {
        Self::from_reader(Cursor::new(bytes), options)
    }

    /// Build a document from already extracted `WordDocument` and table streams.
    ///
    /// The caller is responsible for passing the table stream the FIB selects.
    pub fn from_streams(word_document: Vec<u8>, table: Vec<u8>) -> Result<Self, OpenError> {
        Self::from_streams_with_options(word_document, table, OpenOptions::default())
    }

    pub fn from_streams_with_options(
        word_document: Vec<u8>,
        table: Vec<u8>,
        options: OpenOptions,
    ) -> Result<Self, OpenError> {
        let fib = check_fib(&word_document)?;
        Ok(Self::assemble(fib, word_document, table, options))
    }

    fn from_reader<R: Read + Seek>(reader: R, options: OpenOptions) -> Result<Self, OpenError> {
        let mut comp = cfb::CompoundFile::open(reader)?;
        let word = read_stream(&mut comp, WORD_DOCUMENT_STREAM)?
            .ok_or(OpenError::MissingStream(WORD_DOCUMENT_STREAM))?;
        let fib = check_fib(&word)?;
        let table_name = fib.table_stream_name();
        let table =
            read_stream(&mut comp, table_name)?.ok_or(OpenError::MissingStream(table_name))?;
        Ok(Self::assemble(fib, word, table, options))
    }

    fn assemble(fib: Fib, word: Vec<u8>, table: Vec<u8>, options: OpenOptions) -> Self {
        let doc = Self {
            fib,
            word,
            table,
            options,
            pieces: OnceLock::new(),
            text: OnceLock::new(),
            papx: OnceLock::new(),
            chpx: OnceLock::new(),
            styles: OnceLock::new(),
            dop: OnceLock::new(),
            bookmarks: OnceLock::new(),
            subdocuments: OnceLock::new(),
        };
        if doc.options.eager {
            doc.warm_up();
        }
        doc
    }

    fn warm_up(&self) {
        // Failures are cached and logged by `cached`.
        let _ = self.try_piece_table();
        let _ = self.try_text();
        let _ = self.paragraph_table();
        let _ = self.character_table();
        let _ = self.try_stylesheet();
        let _ = self.try_dop();
        let _ = self.try_bookmarks();
        let _ = self.try_subdocuments();
    }

    pub fn fib(&self) -> &Fib {
        &self.fib
    }

    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    pub fn word_document_stream(&self) -> &[u8] {
        &self.word
    }

    pub fn table_stream(&self) -> &[u8] {
        &self.table
    }

    fn try_table_bytes(&self, entry: FibEntry) -> Result<Option<&[u8]>, DocError> {
        let Some(loc) = self.fib.fc_lcb(entry) else {
            log::debug!("{} is absent", entry.name());
            return Ok(None);
        };
        slice_at(&self.table, loc.fc as usize, loc.lcb as usize)
            .map(Some)
            .ok_or_else(|| {
                DocError::corrupted(
                    entry.name(),
                    format!(
                        "{} bytes at offset {} exceed the table stream ({} bytes)",
                        loc.lcb,
                        loc.fc,
                        self.table.len()
                    ),
                )
            })
    }

    fn required_table_bytes(&self, entry: FibEntry) -> Result<&[u8], DocError> {
        self.try_table_bytes(entry)?
            .ok_or_else(|| DocError::corrupted(entry.name(), "required structure is absent"))
    }

    /// Raw bytes of any FIB-addressed structure in the table stream.
    ///
    /// `None` when the structure is absent or its location is out of bounds.
    pub fn table_structure(&self, entry: FibEntry) -> Option<&[u8]> {
        match self.try_table_bytes(entry) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("{err}");
                None
            }
        }
    }

    pub fn try_piece_table(&self) -> Result<&PieceTable, DocError> {
        cached(&self.pieces, "piece table", || {
            let clx = Clx::parse(self.required_table_bytes(FibEntry::Clx)?)?;
            PieceTable::parse(clx, self.word.len())
        })
    }

    pub fn piece_table(&self) -> Option<&PieceTable> {
        self.try_piece_table().ok()
    }

    /// Document length in characters, or `None` when the piece table is unusable.
    pub fn len(&self) -> Option<Cp> {
        self.piece_table().map(PieceTable::doc_len)
    }

    pub fn is_empty(&self) -> bool {
        self.len().unwrap_or(0) == 0
    }

    fn paragraph_table(&self) -> Result<&PropertyTable<PapxFkp>, DocError> {
        cached(&self.papx, "paragraph property table", || {
            PropertyTable::parse(
                self.required_table_bytes(FibEntry::PlcfBtePapx)?,
                "PlcBtePapx",
            )
        })
    }

    fn character_table(&self) -> Result<&PropertyTable<ChpxFkp>, DocError> {
        cached(&self.chpx, "character property table", || {
            PropertyTable::parse(
                self.required_table_bytes(FibEntry::PlcfBteChpx)?,
                "PlcBteChpx",
            )
        })
    }

    fn boundary_resolver(&self) -> Result<BoundaryResolver<'_>, DocError> {
        let pieces = self.try_piece_table()?;
        Ok(BoundaryResolver {
            word: &self.word,
            pieces,
            papx: self.paragraph_table()?,
            max_steps: self
                .options
                .max_paragraph_scan
                .unwrap_or(pieces.pieces().len() + 1),
        })
    }

    // --- Text ---

    /// Text from `cp` to the end of the piece containing it.
    pub fn try_text_at(&self, cp: Cp) -> Result<String, DocError> {
        self.try_piece_table()?.text_at(&self.word, cp)
    }

    pub fn text_at(&self, cp: Cp) -> Option<String> {
        self.try_text_at(cp).ok()
    }

    /// The whole document text with its piece side index.
    pub fn try_text(&self) -> Result<&MaterializedText, DocError> {
        cached(&self.text, "document text", || {
            self.try_piece_table()?.materialize(&self.word)
        })
    }

    pub fn text(&self) -> Option<&str> {
        self.try_text().ok().map(|text| text.text.as_str())
    }

    pub fn try_text_range(&self, range: Range<Cp>) -> Result<String, DocError> {
        self.try_piece_table()?.text_range(&self.word, range)
    }

    pub fn text_range(&self, range: Range<Cp>) -> Option<String> {
        self.try_text_range(range).ok()
    }

    /// CP stored at `WordDocument` byte offset `fc`.
    pub fn cp_for_fc(&self, fc: usize) -> Option<Cp> {
        self.try_text().ok()?.cp_for_fc(fc)
    }

    pub fn try_subdocuments(&self) -> Result<&[Subdocument], DocError> {
        cached(&self.subdocuments, "subdocuments", || {
            let doc_len = self.try_piece_table()?.doc_len();
            let ccp = self.fib.ccp;
            let counts = [
                (SubdocumentKind::Main, ccp.text),
                (SubdocumentKind::Footnotes, ccp.footnotes),
                (SubdocumentKind::Headers, ccp.headers),
                (SubdocumentKind::Comments, ccp.comments),
                (SubdocumentKind::Endnotes, ccp.endnotes),
                (SubdocumentKind::Textboxes, ccp.textboxes),
                (SubdocumentKind::HeaderTextboxes, ccp.header_textboxes),
            ];
            let mut out = Vec::new();
            let mut start: Cp = 0;
            for (kind, count) in counts {
                let end = start
                    .checked_add(count)
                    .filter(|&end| end <= doc_len)
                    .ok_or_else(|| {
                        DocError::corrupted(
                            "FIB",
                            format!("character counts exceed the document length {doc_len}"),
                        )
                    })?;
                if count > 0 {
                    out.push(Subdocument {
                        kind,
                        range: start..end,
                    });
                }
                start = end;
            }
            Ok(out)
        })
        .map(Vec::as_slice)
    }

    pub fn subdocuments(&self) -> Option<&[Subdocument]> {
        self.try_subdocuments().ok()
    }

    // --- Paragraphs ---

    /// `(start, end)` of the paragraph containing `cp`; `end` is the CP of its paragraph mark.
    pub fn try_paragraph_bounds(&self, cp: Cp) -> Result<(Cp, Cp), DocError> {
        self.boundary_resolver()?.bounds(cp)
    }

    pub fn paragraph_bounds(&self, cp: Cp) -> Option<(Cp, Cp)> {
        self.try_paragraph_bounds(cp).ok()
    }

    /// Paragraphs in CP order. Stops early at the first paragraph that cannot be resolved.
    pub fn paragraphs(&self) -> Paragraphs<'_> {
        let resolver = match self.boundary_resolver() {
            Ok(resolver) => Some(resolver),
            Err(err) => {
                log::warn!("cannot iterate paragraphs: {err}");
                None
            }
        };
        Paragraphs::new(resolver)
    }

    // --- Formatting ---

    /// Direct paragraph properties of the paragraph containing `cp`, piece override included.
    pub fn try_paragraph_formatting(&self, cp: Cp) -> Result<Vec<Prl>, DocError> {
        Ok(direct_paragraph(&self.boundary_resolver()?, cp)?.prls)
    }

    pub fn paragraph_formatting(&self, cp: Cp) -> Option<Vec<Prl>> {
        self.try_paragraph_formatting(cp).ok()
    }

    /// Direct character properties at `cp`, piece override included.
    pub fn try_character_formatting(&self, cp: Cp) -> Result<Vec<Prl>, DocError> {
        direct_character(&self.word, self.try_piece_table()?, self.character_table()?, cp)
    }

    pub fn character_formatting(&self, cp: Cp) -> Option<Vec<Prl>> {
        self.try_character_formatting(cp).ok()
    }

    // --- Styles ---

    pub fn try_stylesheet(&self) -> Result<&StyleSheet, DocError> {
        cached(&self.styles, "style sheet", || {
            StyleSheet::parse(self.required_table_bytes(FibEntry::Stshf)?)
        })
    }

    pub fn stylesheet(&self) -> Option<&StyleSheet> {
        self.try_stylesheet().ok()
    }

    fn max_style_depth(&self, styles: &StyleSheet) -> usize {
        self.options.max_style_depth.unwrap_or(styles.len())
    }

    /// Properties of style `istd` including everything it inherits, base first.
    pub fn try_style_properties(&self, istd: u16) -> Result<Vec<Prl>, DocError> {
        let styles = self.try_stylesheet()?;
        styles.resolve(istd, self.max_style_depth(styles))
    }

    pub fn style_properties(&self, istd: u16) -> Option<Vec<Prl>> {
        self.try_style_properties(istd).ok()
    }

    /// The style sheet, or `None` when the document has none. A style sheet that is present but
    /// unreadable is still an error.
    fn stylesheet_if_present(&self) -> Result<Option<&StyleSheet>, DocError> {
        if self.fib.fc_lcb(FibEntry::Stshf).is_none() {
            log::debug!("no style sheet; style layers are empty");
            return Ok(None);
        }
        self.try_stylesheet().map(Some)
    }

    /// Paragraph properties at `cp` from the paragraph's style chain and direct formatting.
    ///
    /// Without a style sheet only the direct layer is filled.
    pub fn try_paragraph_cascade(&self, cp: Cp) -> Result<PropertyCascade, DocError> {
        let direct = direct_paragraph(&self.boundary_resolver()?, cp)?;
        let style = match self.stylesheet_if_present()? {
            Some(styles) => styles
                .resolve(direct.istd, self.max_style_depth(styles))?
                .into_iter()
                .filter(|prl| matches!(prl.scope(), SprmScope::Paragraph | SprmScope::Table))
                .collect(),
            None => Vec::new(),
        };
        Ok(PropertyCascade {
            defaults: Vec::new(),
            style,
            direct: direct.prls,
        })
    }

    pub fn paragraph_cascade(&self, cp: Cp) -> Option<PropertyCascade> {
        self.try_paragraph_cascade(cp).ok()
    }

    /// Character properties at `cp`: document defaults, the paragraph style's character
    /// properties, any character style applied directly, then direct formatting.
    ///
    /// Without a style sheet the defaults and style layers are empty.
    pub fn try_character_cascade(&self, cp: Cp) -> Result<PropertyCascade, DocError> {
        let paragraph = direct_paragraph(&self.boundary_resolver()?, cp)?;
        let direct = self.try_character_formatting(cp)?;
        let Some(styles) = self.stylesheet_if_present()? else {
            return Ok(PropertyCascade {
                defaults: Vec::new(),
                style: Vec::new(),
                direct,
            });
        };
        let depth = self.max_style_depth(styles);

        let is_character = |prl: &Prl| prl.scope() == SprmScope::Character;
        let mut style: Vec<Prl> = styles
            .resolve(paragraph.istd, depth)?
            .into_iter()
            .filter(is_character)
            .collect();
        let character_style = direct
            .iter()
            .rev()
            .find(|prl| prl.sprm == ids::C_ISTD)
            .and_then(Prl::operand_u16);
        if let Some(istd) = character_style {
            style.extend(styles.resolve(istd, depth)?.into_iter().filter(is_character));
        }

        Ok(PropertyCascade {
            defaults: styles.default_character_prls(),
            style,
            direct,
        })
    }

    pub fn character_cascade(&self, cp: Cp) -> Option<PropertyCascade> {
        self.try_character_cascade(cp).ok()
    }

    // --- Other structures ---

    pub fn try_dop(&self) -> Result<&Dop, DocError> {
        cached(&self.dop, "document properties", || {
            Dop::parse(self.required_table_bytes(FibEntry::Dop)?)
        })
    }

    pub fn dop(&self) -> Option<&Dop> {
        self.try_dop().ok()
    }

    /// Bookmarks in start order; empty when the document has none.
    pub fn try_bookmarks(&self) -> Result<&[Bookmark], DocError> {
        cached(&self.bookmarks, "bookmarks", || {
            let names = self.try_table_bytes(FibEntry::SttbfBkmk)?;
            let starts = self.try_table_bytes(FibEntry::PlcfBkf)?;
            let ends = self.try_table_bytes(FibEntry::PlcfBkl)?;
            match (names, starts, ends) {
                (Some(names), Some(starts), Some(ends)) => parse_bookmarks(names, starts, ends),
                (None, None, None) => Ok(Vec::new()),
                _ => Err(DocError::corrupted(
                    "bookmarks",
                    "bookmark names, starts and ends are not all present",
                )),
            }
        })
        .map(Vec::as_slice)
    }

    pub fn bookmarks(&self) -> Option<&[Bookmark]> {
        self.try_bookmarks().ok()
    }
}

/// Validate the FIB and reject documents this reader cannot interpret.
fn check_fib(word: &[u8]) -> Result<Fib, OpenError> {
    let ident = read_u16(word, 0).unwrap_or(0);
    if ident != FIB_IDENT {
        return Err(OpenError::NotWordDocument(ident));
    }
    let n_fib = read_u16(word, 2).unwrap_or(0);
    if n_fib < NFIB_WORD97 {
        return Err(OpenError::UnsupportedVersion(n_fib));
    }
    let fib = Fib::parse(word).map_err(OpenError::Fib)?;
    if fib.flags().is_encrypted() || fib.flags().is_obfuscated() {
        return Err(OpenError::Encrypted);
    }
    Ok(fib)
}
