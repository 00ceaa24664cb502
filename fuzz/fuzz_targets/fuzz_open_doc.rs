#![no_main]

use binoffice_doc::Document;
use libfuzzer_sys::fuzz_target;

/// Compound files larger than this add little coverage and slow the harness down.
const MAX_INPUT_BYTES: usize = 1 << 20;
/// Number of character positions probed per input.
const MAX_PROBES: u32 = 256;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_BYTES {
        return;
    }
    let Ok(doc) = Document::from_bytes(data) else {
        return;
    };

    let _ = doc.text();
    let _ = doc.stylesheet();
    let _ = doc.dop();
    let _ = doc.bookmarks();
    let _ = doc.subdocuments();
    let _ = doc.paragraphs().take(MAX_PROBES as usize).count();

    let len = doc.len().unwrap_or(0);
    for cp in 0..len.min(MAX_PROBES).saturating_add(1) {
        let _ = doc.text_at(cp);
        let _ = doc.paragraph_bounds(cp);
        let _ = doc.character_cascade(cp);
        let _ = doc.paragraph_cascade(cp);
    }
});
