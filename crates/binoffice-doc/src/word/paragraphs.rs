//! Paragraph boundaries.
//!
//! A paragraph is the CP range ending in a paragraph mark (or cell/row/section mark). PAPX runs
//! live in stream-offset space and each run ends just after one such mark, so boundaries are
//! found by translating CPs to stream offsets, looking up the covering run, and translating the
//! run's ends back. When a run starts before the current piece's bytes, the scan steps to the
//! neighbouring piece in CP order.

use crate::word::fkp::{PapxFkp, ParagraphRun, PropertyTable, RunHit};
use crate::word::piece_table::PieceTable;
use crate::{Cp, DocError, Document};

const STRUCTURE: &str = "paragraph boundaries";

/// End of a paragraph together with the run that formats it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParagraphEnd {
    /// CP of the paragraph mark (inclusive).
    pub(crate) end: Cp,
    /// Piece holding the paragraph mark.
    pub(crate) piece: usize,
    pub(crate) run: ParagraphRun,
}

/// Borrowed context for boundary scans.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoundaryResolver<'a> {
    pub(crate) word: &'a [u8],
    pub(crate) pieces: &'a PieceTable,
    pub(crate) papx: &'a PropertyTable<PapxFkp>,
    /// Maximum number of pieces a single scan may visit.
    pub(crate) max_steps: usize,
}

impl BoundaryResolver<'_> {
    fn lookup(&self, fc: usize) -> Result<RunHit<ParagraphRun>, DocError> {
        self.papx.lookup(self.word, fc)?.ok_or_else(|| {
            DocError::corrupted(STRUCTURE, format!("no paragraph run covers offset {fc}"))
        })
    }

    fn exhausted(&self) -> DocError {
        DocError::corrupted(
            STRUCTURE,
            format!("scan did not finish within {} pieces", self.max_steps),
        )
    }

    /// First CP of the paragraph containing `cp`.
    pub(crate) fn start_of(&self, cp: Cp) -> Result<Cp, DocError> {
        let mut cp = cp;
        let mut stepped = false;
        for _ in 0..self.max_steps {
            let (index, fc) = self.pieces.resolve(cp)?;
            let piece = &self.pieces.pieces()[index];
            let hit = self.lookup(fc)?;

            // After stepping back, `cp` is the last character of the previous piece. If its run
            // ends right there it is a paragraph mark and the paragraph starts after it.
            if stepped && hit.fc_lim <= fc + piece.char_size() {
                return Ok(cp + 1);
            }
            if hit.fc_first > piece.byte_start {
                return Ok(piece.cp_at(hit.fc_first));
            }
            if index == 0 {
                return Ok(piece.cp_start);
            }
            cp = piece.cp_start - 1;
            stepped = true;
        }
        Err(self.exhausted())
    }

    /// Paragraph mark that ends the paragraph containing `cp`.
    pub(crate) fn end_of(&self, cp: Cp) -> Result<ParagraphEnd, DocError> {
        let mut cp = cp;
        for _ in 0..self.max_steps {
            let (index, fc) = self.pieces.resolve(cp)?;
            let piece = &self.pieces.pieces()[index];
            let hit = self.lookup(fc)?;

            if hit.fc_lim <= piece.byte_end() {
                // The mark is the character holding the run's last byte.
                return Ok(ParagraphEnd {
                    end: piece.cp_at(hit.fc_lim - 1),
                    piece: index,
                    run: hit.run,
                });
            }
            if index + 1 >= self.pieces.pieces().len() {
                return Err(DocError::corrupted(
                    STRUCTURE,
                    format!("last paragraph run extends past the final piece (offset {})", hit.fc_lim),
                ));
            }
            cp = piece.cp_end;
        }
        Err(self.exhausted())
    }

    /// `(start, end)` of the paragraph containing `cp`; `end` is the CP of its mark.
    pub(crate) fn bounds(&self, cp: Cp) -> Result<(Cp, Cp), DocError> {
        let start = self.start_of(cp)?;
        let end = self.end_of(cp)?.end;
        Ok((start, end))
    }
}

/// One paragraph of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub start: Cp,
    /// CP of the paragraph mark.
    pub end: Cp,
    /// Style index from the paragraph's PAPX.
    pub istd: u16,
}

impl Paragraph {
    /// Text of the paragraph, mark included.
    pub fn text(&self, doc: &Document) -> Option<String> {
        doc.text_range(self.start..self.end + 1)
    }
}

/// Iterator over paragraphs in CP order, returned by [`Document::paragraphs`].
#[derive(Debug)]
pub struct Paragraphs<'a> {
    resolver: Option<BoundaryResolver<'a>>,
    next: Cp,
}

impl<'a> Paragraphs<'a> {
    pub(crate) fn new(resolver: Option<BoundaryResolver<'a>>) -> Self {
        Self { resolver, next: 0 }
    }
}

impl Iterator for Paragraphs<'_> {
    type Item = Paragraph;

    fn next(&mut self) -> Option<Paragraph> {
        let resolver = self.resolver?;
        if self.next >= resolver.pieces.doc_len() {
            return None;
        }
        let cp = self.next;
        let found = resolver
            .start_of(cp)
            .and_then(|start| Ok((start, resolver.end_of(cp)?)));
        match found {
            Ok((start, end)) => {
                self.next = end.end + 1;
                Some(Paragraph {
                    start,
                    end: end.end,
                    istd: end.run.istd,
                })
            }
            Err(err) => {
                log::warn!("stopping paragraph iteration at cp {cp}: {err}");
                self.resolver = None;
                None
            }
        }
    }
}
