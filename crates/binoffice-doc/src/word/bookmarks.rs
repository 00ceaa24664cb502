//! Bookmarks: names from `SttbfBkmk`, start CPs from `PlcfBkf`, end CPs from `PlcfBkl`.

use crate::word::plc::Plc;
use crate::word::read_u16;
use crate::word::text::read_xst;
use crate::{Cp, DocError};

const STTB_EXTENDED: u16 = 0xFFFF;
const FBKF_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub name: String,
    pub start: Cp,
    /// First CP after the bookmarked range.
    pub end: Cp,
}

pub(crate) fn parse_bookmarks(
    sttbf: &[u8],
    bkf: &[u8],
    bkl: &[u8],
) -> Result<Vec<Bookmark>, DocError> {
    let names = parse_extended_sttb(sttbf, "SttbfBkmk")?;
    let starts: Plc<u16> = Plc::parse(bkf, FBKF_SIZE, "PlcfBkf", |b| {
        read_u16(b, 0).ok_or_else(|| DocError::corrupted("PlcfBkf", "truncated FBKF"))
    })?;
    let ends: Plc<()> = Plc::parse(bkl, 0, "PlcfBkl", |_| Ok(()))?;

    if names.len() != starts.len() {
        return Err(DocError::corrupted(
            "SttbfBkmk",
            format!("{} names for {} bookmarks", names.len(), starts.len()),
        ));
    }

    names
        .into_iter()
        .zip(starts.iter())
        .map(|(name, (start, _, &ibkl))| {
            let end = ends
                .get(ibkl as usize)
                .map(|(end, _, _)| end)
                .ok_or_else(|| {
                    DocError::corrupted(
                        "PlcfBkf",
                        format!("bookmark {name:?} links to missing end {ibkl}"),
                    )
                })?;
            Ok(Bookmark { name, start, end })
        })
        .collect()
}

/// Extended STTB of UTF-16 strings with no extra data per entry.
fn parse_extended_sttb(bytes: &[u8], structure: &'static str) -> Result<Vec<String>, DocError> {
    let truncated = || DocError::corrupted(structure, "truncated header");
    if read_u16(bytes, 0).ok_or_else(truncated)? != STTB_EXTENDED {
        return Err(DocError::corrupted(structure, "expected an extended STTB"));
    }
    let count = read_u16(bytes, 2).ok_or_else(truncated)? as usize;
    let cb_extra = read_u16(bytes, 4).ok_or_else(truncated)? as usize;

    let mut offset = 6;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let (name, used) = read_xst(bytes, offset, structure)?;
        offset += used + cb_extra;
        out.push(name);
    }
    if offset > bytes.len() {
        return Err(DocError::corrupted(structure, "extra data extends past end"));
    }
    Ok(out)
}
