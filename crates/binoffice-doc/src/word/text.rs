use encoding_rs::{UTF_16LE, WINDOWS_1252};

use crate::word::{read_u16, slice_at};
use crate::DocError;

/// Decode text from a compressed piece: one byte per character, Windows-1252.
pub(crate) fn decode_compressed(bytes: &[u8]) -> String {
    let (cow, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    cow.into_owned()
}

/// Decode text from an uncompressed piece: UTF-16LE, two bytes per character.
///
/// Unpaired surrogates are replaced, matching how the rest of the stack treats UTF-16 payloads.
pub(crate) fn decode_utf16le(bytes: &[u8]) -> String {
    let (cow, _) = UTF_16LE.decode_without_bom_handling(bytes);
    cow.into_owned()
}

/// Read an `Xst`: a u16 character count followed by that many UTF-16LE code units.
///
/// Returns the string and the number of bytes consumed.
pub(crate) fn read_xst(
    buf: &[u8],
    offset: usize,
    structure: &'static str,
) -> Result<(String, usize), DocError> {
    let cch = read_u16(buf, offset)
        .ok_or_else(|| DocError::corrupted(structure, "truncated string length"))?
        as usize;
    let chars = slice_at(buf, offset + 2, cch * 2).ok_or_else(|| {
        DocError::corrupted(
            structure,
            format!("string of {cch} characters at offset {offset} extends past end"),
        )
    })?;
    Ok((decode_utf16le(chars), 2 + cch * 2))
}
