//! Word 97-2003 binary structures.
//!
//! Everything here reads from two fully buffered streams: `WordDocument` (FIB, text, property
//! pages) and the table stream (`0Table` or `1Table`, selected by the FIB). Parsers are
//! bounds-checked: any offset or length outside a stream is reported as
//! [`crate::DocError::Corrupted`] rather than panicking.

use std::io::{Read, Seek};

pub(crate) mod bookmarks;
pub(crate) mod cascade;
pub(crate) mod clx;
pub(crate) mod dop;
pub(crate) mod fib;
pub(crate) mod fkp;
pub(crate) mod formatting;
pub(crate) mod paragraphs;
pub(crate) mod piece_table;
pub(crate) mod plc;
pub(crate) mod stylesheet;
pub(crate) mod text;

pub(crate) const WORD_DOCUMENT_STREAM: &str = "WordDocument";
pub(crate) const TABLE_STREAM_0: &str = "0Table";
pub(crate) const TABLE_STREAM_1: &str = "1Table";

/// Read a named stream from the root storage of a compound file.
///
/// Returns `Ok(None)` when the stream does not exist.
pub(crate) fn read_stream<R: Read + Seek>(
    comp: &mut cfb::CompoundFile<R>,
    name: &str,
) -> std::io::Result<Option<Vec<u8>>> {
    let rooted = format!("/{name}");
    for candidate in [rooted.as_str(), name] {
        if !comp.is_stream(candidate) {
            continue;
        }
        let mut stream = comp.open_stream(candidate)?;
        let mut out = Vec::new();
        stream.read_to_end(&mut out)?;
        return Ok(Some(out));
    }
    Ok(None)
}

pub(crate) fn read_u8(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).copied()
}

pub(crate) fn read_u16(buf: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    let bytes = buf.get(offset..end)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_i16(buf: &[u8], offset: usize) -> Option<i16> {
    read_u16(buf, offset).map(|v| v as i16)
}

pub(crate) fn read_u32(buf: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let bytes = buf.get(offset..end)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Slice `len` bytes at `offset`, or `None` if the range overflows or leaves `buf`.
pub(crate) fn slice_at(buf: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    let end = offset.checked_add(len)?;
    buf.get(offset..end)
}
