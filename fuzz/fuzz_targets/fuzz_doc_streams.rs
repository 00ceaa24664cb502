#![no_main]

use binoffice_doc::{Document, OpenOptions};
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_BYTES: usize = 1 << 18;
const MAX_PROBES: u32 = 128;

// Skips the compound-file layer: the first two bytes pick where the input is split into the
// `WordDocument` and table streams.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data.len() > MAX_INPUT_BYTES {
        return;
    }
    let split = usize::from(u16::from_le_bytes([data[0], data[1]]));
    let rest = &data[2..];
    let split = split.min(rest.len());
    let (word, table) = rest.split_at(split);

    let options = OpenOptions {
        eager: data[0] & 1 == 1,
        max_style_depth: Some(usize::from(data[1] % 16)),
        max_paragraph_scan: None,
    };
    let Ok(doc) = Document::from_streams_with_options(word.to_vec(), table.to_vec(), options)
    else {
        return;
    };

    let len = doc.len().unwrap_or(0);
    for cp in 0..len.min(MAX_PROBES).saturating_add(1) {
        let _ = doc.text_at(cp);
        let _ = doc.paragraph_bounds(cp);
        let _ = doc.paragraph_formatting(cp);
        let _ = doc.character_formatting(cp);
        let _ = doc.character_cascade(cp);
    }
    for istd in 0..16 {
        let _ = doc.style_properties(istd);
    }
});
