//! Paginated property tables: a bin table (`PlcBte`) in the table stream pointing at 512-byte
//! formatted disk pages (FKPs) in `WordDocument`.
//!
//! Lookup is two-level: the bin table selects a page by stream offset, then the page's own
//! `rgfc` array selects a run. Paragraph pages (PAPX FKP) and character pages (CHPX FKP) share
//! the page shape and differ only in the size of their per-run entries and the payload layout,
//! which [`FkpKind`] captures.

use std::fmt;
use std::marker::PhantomData;

use binoffice_sprm::{parse_grpprl, parse_grpprl_padded, Prl};

use crate::word::plc::Plc;
use crate::word::{read_u16, read_u32, read_u8, slice_at};
use crate::DocError;

pub const FKP_PAGE_SIZE: usize = 512;
const CRUN_OFFSET: usize = FKP_PAGE_SIZE - 1;
const PN_MASK: u32 = 0x003F_FFFF;

/// Page layout parameters for one kind of FKP.
pub trait FkpKind {
    const STRUCTURE: &'static str;
    /// Size of one entry in the array that follows `rgfc`.
    const BX_SIZE: usize;
    type Run: Clone + fmt::Debug;

    /// Decode the run whose entry starts at `page[entry]`.
    fn decode_run(page: &[u8], entry: usize) -> Result<Self::Run, DocError>;
}

/// Paragraph property pages: `BxPap` entries (1-byte offset + 12-byte `PHE`).
#[derive(Debug)]
pub enum PapxFkp {}

/// Character property pages: 1-byte offset entries.
#[derive(Debug)]
pub enum ChpxFkp {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphRun {
    /// Style index of the paragraph.
    pub istd: u16,
    pub prls: Vec<Prl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRun {
    pub prls: Vec<Prl>,
}

impl FkpKind for PapxFkp {
    const STRUCTURE: &'static str = "PAPX FKP";
    const BX_SIZE: usize = 13;
    type Run = ParagraphRun;

    fn decode_run(page: &[u8], entry: usize) -> Result<ParagraphRun, DocError> {
        let b_offset = read_u8(page, entry)
            .ok_or_else(|| DocError::corrupted(Self::STRUCTURE, "truncated BxPap"))?;
        if b_offset == 0 {
            return Ok(ParagraphRun {
                istd: 0,
                prls: Vec::new(),
            });
        }
        let at = b_offset as usize * 2;
        let cb = read_u8(page, at)
            .ok_or_else(|| DocError::corrupted(Self::STRUCTURE, "PapxInFkp offset past page"))?;
        // cb != 0: 2*cb - 1 bytes follow. cb == 0: a second byte gives 2*cb' bytes.
        let (start, len) = if cb != 0 {
            (at + 1, cb as usize * 2 - 1)
        } else {
            let cb2 = read_u8(page, at + 1).ok_or_else(|| {
                DocError::corrupted(Self::STRUCTURE, "truncated PapxInFkp length")
            })?;
            (at + 2, cb2 as usize * 2)
        };
        let content = run_bytes(page, start, len, Self::STRUCTURE)?;
        let istd = read_u16(content, 0).ok_or_else(|| {
            DocError::corrupted(Self::STRUCTURE, format!("GrpPrlAndIstd of {len} bytes"))
        })?;
        let prls = parse_grpprl_padded(&content[2..])
            .map_err(|err| DocError::corrupted(Self::STRUCTURE, err.to_string()))?;
        Ok(ParagraphRun { istd, prls })
    }
}

impl FkpKind for ChpxFkp {
    const STRUCTURE: &'static str = "CHPX FKP";
    const BX_SIZE: usize = 1;
    type Run = CharacterRun;

    fn decode_run(page: &[u8], entry: usize) -> Result<CharacterRun, DocError> {
        let b_offset = read_u8(page, entry)
            .ok_or_else(|| DocError::corrupted(Self::STRUCTURE, "truncated rgb"))?;
        if b_offset == 0 {
            return Ok(CharacterRun { prls: Vec::new() });
        }
        let at = b_offset as usize * 2;
        let cb = read_u8(page, at)
            .ok_or_else(|| DocError::corrupted(Self::STRUCTURE, "Chpx offset past page"))?;
        let grpprl = run_bytes(page, at + 1, cb as usize, Self::STRUCTURE)?;
        let prls = parse_grpprl(grpprl)
            .map_err(|err| DocError::corrupted(Self::STRUCTURE, err.to_string()))?;
        Ok(CharacterRun { prls })
    }
}

/// Payload bytes of a run; they must not overlap the trailing `crun` byte.
fn run_bytes<'a>(
    page: &'a [u8],
    start: usize,
    len: usize,
    structure: &'static str,
) -> Result<&'a [u8], DocError> {
    match start.checked_add(len) {
        Some(end) if end <= CRUN_OFFSET => Ok(&page[start..end]),
        _ => Err(DocError::corrupted(
            structure,
            format!("run payload {start}+{len} overruns the page"),
        )),
    }
}

/// One run located by [`PropertyTable::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHit<R> {
    pub page_number: u32,
    /// Index of the run within its page.
    pub index: usize,
    /// Offset of the page in `WordDocument`.
    pub page_offset: usize,
    /// Stream offset of the run's first byte.
    pub fc_first: usize,
    /// Stream offset one past the run's last byte.
    pub fc_lim: usize,
    pub run: R,
}

/// A bin table plus the page kind it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTable<K> {
    bins: Plc<u32>,
    kind: PhantomData<K>,
}

impl<K: FkpKind> PropertyTable<K> {
    /// Parse a `PlcBtePapx` / `PlcBteChpx` from the table stream.
    pub(crate) fn parse(bytes: &[u8], structure: &'static str) -> Result<Self, DocError> {
        let bins = Plc::parse(bytes, 4, structure, |b| {
            read_u32(b, 0)
                .map(|pn| pn & PN_MASK)
                .ok_or_else(|| DocError::corrupted(structure, "truncated PnFkp"))
        })?;
        Ok(Self {
            bins,
            kind: PhantomData,
        })
    }

    pub fn page_count(&self) -> usize {
        self.bins.len()
    }

    /// Find the run covering stream offset `fc`.
    ///
    /// `Ok(None)` means `fc` is outside the table's coverage (before the first or at/after the
    /// last boundary at either level). Pages that cannot be read are `Corrupted`.
    pub fn lookup(&self, word: &[u8], fc: usize) -> Result<Option<RunHit<K::Run>>, DocError> {
        let Ok(fc32) = u32::try_from(fc) else {
            return Ok(None);
        };
        let Some(bin) = self.bins.find(fc32) else {
            return Ok(None);
        };
        let page_number = self.bins.data()[bin];
        let page_offset = (page_number as usize)
            .checked_mul(FKP_PAGE_SIZE)
            .ok_or_else(|| DocError::corrupted(K::STRUCTURE, "page number overflow"))?;
        let page = slice_at(word, page_offset, FKP_PAGE_SIZE).ok_or_else(|| {
            DocError::corrupted(
                K::STRUCTURE,
                format!(
                    "page {page_number} at offset {page_offset} is past the end of WordDocument ({} bytes)",
                    word.len()
                ),
            )
        })?;

        let crun = page[CRUN_OFFSET] as usize;
        let entries_at = (crun + 1) * 4;
        if entries_at + crun * K::BX_SIZE > CRUN_OFFSET {
            return Err(DocError::corrupted(
                K::STRUCTURE,
                format!("page {page_number} declares {crun} runs, more than fit"),
            ));
        }

        let mut rgfc = Vec::with_capacity(crun + 1);
        for i in 0..=crun {
            let fc_i = read_u32(page, i * 4).ok_or_else(|| {
                DocError::corrupted(K::STRUCTURE, "truncated rgfc")
            })? as usize;
            if let Some(&prev) = rgfc.last() {
                if fc_i < prev {
                    return Err(DocError::corrupted(
                        K::STRUCTURE,
                        format!("page {page_number} rgfc is not ascending at {i}"),
                    ));
                }
            }
            rgfc.push(fc_i);
        }

        let (Some(&first), Some(&last)) = (rgfc.first(), rgfc.last()) else {
            return Ok(None);
        };
        if fc < first || fc >= last {
            return Ok(None);
        }
        let index = rgfc.partition_point(|&b| b <= fc) - 1;
        let run = K::decode_run(page, entries_at + index * K::BX_SIZE)?;

        Ok(Some(RunHit {
            page_number,
            index,
            page_offset,
            fc_first: rgfc[index],
            fc_lim: rgfc[index + 1],
            run,
        }))
    }
}
