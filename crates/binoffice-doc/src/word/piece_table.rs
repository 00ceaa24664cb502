//! Piece table: maps the document's CP space onto byte ranges of the `WordDocument` stream.
//!
//! Each piece is stored either "compressed" (one Windows-1252 byte per character, located at
//! `fc / 2`) or as UTF-16LE (two bytes per character, located at `fc`). Pieces may appear in any
//! physical order after incremental saves.

use std::ops::Range;

use binoffice_sprm::{sprm_for_isprm, Prl, Sprm};

use crate::word::clx::{Clx, Pcd};
use crate::word::text::{decode_compressed, decode_utf16le};
use crate::{Cp, DocError};

const STRUCTURE: &str = "piece table";

const PRM_INDEXED: u16 = 0x0001;

/// A piece-level property override (`Prm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceOverride {
    /// `Prm0`: one sprm (named by a 7-bit index) with a one-byte operand.
    Inline { isprm: u8, operand: u8 },
    /// `Prm1`: an index into the CLX's shared grpprl groups.
    Indexed { group: u16 },
}

impl PieceOverride {
    pub fn from_prm(prm: u16) -> Self {
        if prm & PRM_INDEXED != 0 {
            PieceOverride::Indexed { group: prm >> 1 }
        } else {
            PieceOverride::Inline {
                isprm: ((prm >> 1) & 0x7F) as u8,
                operand: (prm >> 8) as u8,
            }
        }
    }

    /// The Prl an inline override stands for, or `None` when it is inactive.
    pub fn inline_prl(self) -> Option<Prl> {
        match self {
            PieceOverride::Inline { isprm, operand } => {
                sprm_for_isprm(isprm).map(|sprm: Sprm| Prl::new(sprm, vec![operand]))
            }
            PieceOverride::Indexed { .. } => None,
        }
    }

    /// Whether the override can contribute properties.
    ///
    /// Indexed overrides are always considered active; their group may still be empty.
    pub fn is_active(self) -> bool {
        match self {
            PieceOverride::Inline { isprm, .. } => sprm_for_isprm(isprm).is_some(),
            PieceOverride::Indexed { .. } => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub cp_start: Cp,
    pub cp_end: Cp,
    /// Byte offset of the first character in `WordDocument`.
    pub byte_start: usize,
    pub compressed: bool,
    /// Set when the piece does not end with a paragraph mark.
    pub no_para_last: bool,
    pub prm: PieceOverride,
}

impl Piece {
    pub fn char_size(&self) -> usize {
        if self.compressed {
            1
        } else {
            2
        }
    }

    pub fn cp_len(&self) -> Cp {
        self.cp_end - self.cp_start
    }

    pub fn byte_len(&self) -> usize {
        self.cp_len() as usize * self.char_size()
    }

    pub fn byte_end(&self) -> usize {
        self.byte_start + self.byte_len()
    }

    /// Byte offset of `cp`, which must be within `[cp_start, cp_end]`.
    pub(crate) fn byte_at(&self, cp: Cp) -> usize {
        self.byte_start + (cp - self.cp_start) as usize * self.char_size()
    }

    /// CP of the character starting at byte `fc`, rounding down inside a UTF-16 unit.
    pub(crate) fn cp_at(&self, fc: usize) -> Cp {
        self.cp_start + ((fc - self.byte_start) / self.char_size()) as Cp
    }

    fn decode(&self, bytes: &[u8]) -> String {
        if self.compressed {
            decode_compressed(bytes)
        } else {
            decode_utf16le(bytes)
        }
    }
}

/// Per-piece record of the materialized text, used to map stream offsets back to pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSpan {
    pub cp_start: Cp,
    pub byte_start: usize,
    pub byte_len: usize,
    pub compressed: bool,
    pub prm: PieceOverride,
}

impl PieceSpan {
    fn contains_byte(&self, fc: usize) -> bool {
        fc >= self.byte_start && fc - self.byte_start < self.byte_len
    }
}

/// The whole document text plus its piece side index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedText {
    pub text: String,
    pub spans: Vec<PieceSpan>,
}

impl MaterializedText {
    pub fn span_for_fc(&self, fc: usize) -> Option<&PieceSpan> {
        self.spans.iter().find(|span| span.contains_byte(fc))
    }

    /// Map a `WordDocument` byte offset back to the CP stored there.
    pub fn cp_for_fc(&self, fc: usize) -> Option<Cp> {
        let span = self.span_for_fc(fc)?;
        let size = if span.compressed { 1 } else { 2 };
        Some(span.cp_start + ((fc - span.byte_start) / size) as Cp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTable {
    boundaries: Vec<Cp>,
    pieces: Vec<Piece>,
    groups: Vec<Vec<Prl>>,
}

impl PieceTable {
    /// Build the piece table from a parsed CLX, validating every piece against the
    /// `WordDocument` stream length.
    pub(crate) fn parse(clx: Clx, word_len: usize) -> Result<Self, DocError> {
        let boundaries = clx.pieces.positions().to_vec();
        if let Some(&first) = boundaries.first() {
            if first != 0 {
                return Err(DocError::corrupted(
                    STRUCTURE,
                    format!("first character position is {first}, expected 0"),
                ));
            }
        }

        let mut pieces = Vec::with_capacity(clx.pieces.len());
        for (i, (cp_start, cp_end, pcd)) in clx.pieces.iter().enumerate() {
            if cp_end <= cp_start {
                return Err(DocError::corrupted(
                    STRUCTURE,
                    format!("piece {i} boundaries are not ascending ({cp_start}..{cp_end})"),
                ));
            }
            let piece = piece_from_pcd(cp_start, cp_end, pcd);
            let end = (piece.cp_len() as usize)
                .checked_mul(piece.char_size())
                .and_then(|len| piece.byte_start.checked_add(len));
            match end {
                Some(end) if end <= word_len => {}
                _ => {
                    return Err(DocError::corrupted(
                        STRUCTURE,
                        format!(
                            "piece {i} (byte offset {}, {} characters) extends past the \
                             WordDocument stream ({word_len} bytes)",
                            piece.byte_start,
                            piece.cp_len()
                        ),
                    ));
                }
            }
            pieces.push(piece);
        }

        Ok(Self {
            boundaries,
            pieces,
            groups: clx.groups,
        })
    }

    /// Document length in CPs: the last boundary.
    pub fn doc_len(&self) -> Cp {
        self.boundaries.last().copied().unwrap_or(0)
    }

    pub fn boundaries(&self) -> &[Cp] {
        &self.boundaries
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, index: usize) -> Option<&Piece> {
        self.pieces.get(index)
    }

    /// Shared override groups from the CLX (`Prm1` targets).
    pub fn groups(&self) -> &[Vec<Prl>] {
        &self.groups
    }

    /// Index of the piece containing `cp`, if any.
    pub fn piece_index(&self, cp: Cp) -> Option<usize> {
        if cp >= self.doc_len() {
            return None;
        }
        self.boundaries
            .partition_point(|&b| b <= cp)
            .checked_sub(1)
    }

    /// Resolve `cp` to `(piece index, byte offset in WordDocument)`.
    pub fn resolve(&self, cp: Cp) -> Result<(usize, usize), DocError> {
        let index = self.piece_index(cp).ok_or(DocError::OutOfRange {
            cp,
            len: self.doc_len(),
        })?;
        let piece = &self.pieces[index];
        Ok((index, piece.byte_at(cp)))
    }

    /// Text from `cp` to the end of its piece.
    pub fn text_at(&self, word: &[u8], cp: Cp) -> Result<String, DocError> {
        let (index, _) = self.resolve(cp)?;
        let piece = &self.pieces[index];
        self.decode_within(word, piece, cp, piece.cp_end)
    }

    /// Text of the CP range `range`, crossing piece boundaries as needed.
    pub fn text_range(&self, word: &[u8], range: Range<Cp>) -> Result<String, DocError> {
        let len = self.doc_len();
        if range.end > len {
            return Err(DocError::OutOfRange { cp: range.end, len });
        }
        if range.start > range.end {
            return Err(DocError::OutOfRange {
                cp: range.start,
                len,
            });
        }

        let mut out = String::new();
        let mut cp = range.start;
        while cp < range.end {
            let (index, _) = self.resolve(cp)?;
            let piece = &self.pieces[index];
            let stop = piece.cp_end.min(range.end);
            out.push_str(&self.decode_within(word, piece, cp, stop)?);
            cp = stop;
        }
        Ok(out)
    }

    /// Decode every piece in CP order and record the side index.
    pub fn materialize(&self, word: &[u8]) -> Result<MaterializedText, DocError> {
        let mut text = String::new();
        let mut spans = Vec::with_capacity(self.pieces.len());
        for piece in &self.pieces {
            text.push_str(&self.decode_within(word, piece, piece.cp_start, piece.cp_end)?);
            spans.push(PieceSpan {
                cp_start: piece.cp_start,
                byte_start: piece.byte_start,
                byte_len: piece.byte_len(),
                compressed: piece.compressed,
                prm: piece.prm,
            });
        }
        Ok(MaterializedText { text, spans })
    }

    fn decode_within(
        &self,
        word: &[u8],
        piece: &Piece,
        from: Cp,
        to: Cp,
    ) -> Result<String, DocError> {
        let start = piece.byte_at(from);
        let end = piece.byte_at(to);
        let bytes = word.get(start..end).ok_or_else(|| {
            DocError::corrupted(
                STRUCTURE,
                format!("text bytes {start}..{end} exceed stream length {}", word.len()),
            )
        })?;
        Ok(piece.decode(bytes))
    }
}

fn piece_from_pcd(cp_start: Cp, cp_end: Cp, pcd: &Pcd) -> Piece {
    let byte_start = if pcd.compressed {
        (pcd.fc / 2) as usize
    } else {
        pcd.fc as usize
    };
    Piece {
        cp_start,
        cp_end,
        byte_start,
        compressed: pcd.compressed,
        no_para_last: pcd.no_para_last,
        prm: PieceOverride::from_prm(pcd.prm),
    }
}
