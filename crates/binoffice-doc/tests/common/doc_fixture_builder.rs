#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use binoffice_doc::Prl;

// This fixture builder writes just enough of the Word 97 binary format to exercise the reader.
// Offsets and indices are named so the layout stays readable.
const FIB_IDENT: u16 = 0xA5EC;
pub const NFIB_WORD97: u16 = 0x00C1;
pub const FIB_FLAG_COMPLEX: u16 = 0x0004;
pub const FIB_FLAG_ENCRYPTED: u16 = 0x0100;
const FIB_FLAG_WHICH_TBL_STM: u16 = 0x0200;
pub const FIB_FLAG_OBFUSCATED: u16 = 0x8000;

const CSW: usize = 14;
const CSLW: usize = 22;
const CB_RG_FC_LCB: usize = 93;
const FIB_LEN: usize = 32 + 2 + CSW * 2 + 2 + CSLW * 4 + 2 + CB_RG_FC_LCB * 8 + 2;
const FIB_RG_LW_OFFSET: usize = 32 + 2 + CSW * 2 + 2;
const FIB_RG_FC_LCB_OFFSET: usize = FIB_RG_LW_OFFSET + CSLW * 4 + 2;

/// First byte of document text in `WordDocument`.
pub const TEXT_START: usize = 0x400;
const PAGE_SIZE: usize = 512;
const FC_COMPRESSED: u32 = 0x4000_0000;
const PCD_NO_PARA_LAST: u16 = 0x0001;

const PAPX_RUNS_PER_PAGE: usize = 8;
const CHPX_RUNS_PER_PAGE: usize = 16;

pub const ISTD_NIL: u16 = 0x0FFF;
const STK_PARAGRAPH: u16 = 1;
const STK_CHARACTER: u16 = 2;
const STK_TABLE: u16 = 3;
const STK_NUMBERING: u16 = 4;

// fibRgFcLcb97 indices.
pub const FC_STSHF: usize = 1;
pub const FC_PLCF_BTE_CHPX: usize = 12;
pub const FC_PLCF_BTE_PAPX: usize = 13;
pub const FC_STTBF_BKMK: usize = 21;
pub const FC_PLCF_BKF: usize = 22;
pub const FC_PLCF_BKL: usize = 23;
pub const FC_DOP: usize = 31;
pub const FC_CLX: usize = 33;

// fibRgLw97 indices.
const LW_CB_MAC: usize = 0;
pub const LW_CCP_TEXT: usize = 3;
pub const LW_CCP_FTN: usize = 4;
pub const LW_CCP_HDD: usize = 5;
pub const LW_CCP_ATN: usize = 7;
pub const LW_CCP_EDN: usize = 8;

/// Encode a list of Prls as a grpprl.
pub fn grpprl(prls: &[Prl]) -> Vec<u8> {
    let mut out = Vec::new();
    for prl in prls {
        prl.encode_into(&mut out);
    }
    out
}

/// Inline piece override (`Prm0`).
pub fn prm0(isprm: u8, operand: u8) -> u16 {
    ((isprm as u16 & 0x7F) << 1) | ((operand as u16) << 8)
}

/// Indexed piece override (`Prm1`).
pub fn prm1(group: u16) -> u16 {
    (group << 1) | 1
}

fn is_mark(c: char) -> bool {
    matches!(c, '\r' | '\u{7}' | '\u{c}')
}

#[derive(Debug, Clone)]
struct TextPiece {
    chars: Vec<char>,
    compressed: bool,
    prm: u16,
}

impl TextPiece {
    fn char_size(&self) -> usize {
        if self.compressed {
            1
        } else {
            2
        }
    }

    fn encode(&self) -> Vec<u8> {
        if self.compressed {
            self.chars
                .iter()
                .map(|&c| u8::try_from(c as u32).expect("compressed text must be single-byte"))
                .collect()
        } else {
            self.chars
                .iter()
                .flat_map(|&c| {
                    let unit = u16::try_from(c as u32).expect("fixture text must be in the BMP");
                    unit.to_le_bytes()
                })
                .collect()
        }
    }
}

#[derive(Debug, Clone)]
pub struct StyleDef {
    name: String,
    stk: u16,
    base: u16,
    paragraph: Vec<u8>,
    character: Vec<u8>,
    table: Vec<u8>,
}

impl StyleDef {
    fn new(name: &str, stk: u16) -> Self {
        Self {
            name: name.to_string(),
            stk,
            base: ISTD_NIL,
            paragraph: Vec::new(),
            character: Vec::new(),
            table: Vec::new(),
        }
    }

    pub fn paragraph(name: &str) -> Self {
        Self::new(name, STK_PARAGRAPH)
    }

    pub fn character(name: &str) -> Self {
        Self::new(name, STK_CHARACTER)
    }

    pub fn table(name: &str) -> Self {
        Self::new(name, STK_TABLE)
    }

    pub fn numbering(name: &str) -> Self {
        Self::new(name, STK_NUMBERING)
    }

    pub fn based_on(mut self, istd: u16) -> Self {
        self.base = istd;
        self
    }

    pub fn with_paragraph(mut self, prls: &[Prl]) -> Self {
        self.paragraph = grpprl(prls);
        self
    }

    pub fn with_character(mut self, prls: &[Prl]) -> Self {
        self.character = grpprl(prls);
        self
    }

    pub fn with_table(mut self, prls: &[Prl]) -> Self {
        self.table = grpprl(prls);
        self
    }

    fn encode(&self, istd: u16) -> Vec<u8> {
        let mut out = Vec::new();
        // StdfBase: sti (user-defined), stk/istdBase, cupx/istdNext, bchUpe, grfstd.
        out.extend_from_slice(&0x0FFEu16.to_le_bytes());
        out.extend_from_slice(&(self.stk | (self.base << 4)).to_le_bytes());
        let papx = || {
            let mut upx = istd.to_le_bytes().to_vec();
            upx.extend_from_slice(&self.paragraph);
            upx
        };
        let upxs: Vec<Vec<u8>> = match self.stk {
            STK_PARAGRAPH => vec![papx(), self.character.clone()],
            STK_CHARACTER => vec![self.character.clone()],
            STK_TABLE => vec![self.table.clone(), papx(), self.character.clone()],
            STK_NUMBERING => vec![papx()],
            _ => Vec::new(),
        };
        out.extend_from_slice(&((upxs.len() as u16) | (istd << 4)).to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);

        let name: Vec<u16> = self.name.encode_utf16().collect();
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        for unit in name {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out.extend_from_slice(&0u16.to_le_bytes());

        for upx in upxs {
            out.extend_from_slice(&(upx.len() as u16).to_le_bytes());
            out.extend_from_slice(&upx);
            if upx.len() % 2 == 1 {
                out.push(0);
            }
        }
        out
    }
}

/// Builder for a minimal Word 97 document.
///
/// Pieces are listed in CP order; `physical_order` controls where their bytes land in the
/// `WordDocument` stream. The piece laid out last must end with a paragraph mark.
#[derive(Debug, Clone)]
pub struct DocBuilder {
    pieces: Vec<TextPiece>,
    physical_order: Option<Vec<usize>>,
    paragraphs: BTreeMap<usize, (u16, Vec<u8>)>,
    char_runs: BTreeMap<u32, Vec<u8>>,
    styles: Vec<Option<StyleDef>>,
    default_fonts: [u16; 3],
    groups: Vec<Vec<u8>>,
    bookmarks: Vec<(String, u32, u32)>,
    dop: Vec<u8>,
    ident: u16,
    n_fib: u16,
    flags: u16,
    use_table_0: bool,
    write_table_stream: bool,
    rg_lw: BTreeMap<usize, u32>,
    fc_lcb_overrides: BTreeMap<usize, (u32, u32)>,
}

impl Default for DocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocBuilder {
    pub fn new() -> Self {
        let mut dop = vec![0u8; 12];
        dop[10..12].copy_from_slice(&720u16.to_le_bytes());
        Self {
            pieces: Vec::new(),
            physical_order: None,
            paragraphs: BTreeMap::new(),
            char_runs: BTreeMap::new(),
            styles: Vec::new(),
            default_fonts: [0, 0, 0],
            groups: Vec::new(),
            bookmarks: Vec::new(),
            dop,
            ident: FIB_IDENT,
            n_fib: NFIB_WORD97,
            flags: 0,
            use_table_0: false,
            write_table_stream: true,
            rg_lw: BTreeMap::new(),
            fc_lcb_overrides: BTreeMap::new(),
        }
    }

    /// A document holding `text` in a single compressed piece.
    pub fn single(text: &str) -> Self {
        Self::new().piece(text, true)
    }

    pub fn piece(self, text: &str, compressed: bool) -> Self {
        self.piece_with_prm(text, compressed, 0)
    }

    pub fn piece_with_prm(mut self, text: &str, compressed: bool, prm: u16) -> Self {
        self.pieces.push(TextPiece {
            chars: text.chars().collect(),
            compressed,
            prm,
        });
        self
    }

    /// Lay pieces out in the stream in this order (indices into the CP-ordered piece list).
    pub fn physical_order(mut self, order: &[usize]) -> Self {
        self.physical_order = Some(order.to_vec());
        self
    }

    /// Style index and direct properties of the `index`-th paragraph (CP order).
    pub fn paragraph(mut self, index: usize, istd: u16, prls: &[Prl]) -> Self {
        self.paragraphs.insert(index, (istd, grpprl(prls)));
        self
    }

    /// Direct character properties from `cp` up to the next character run.
    pub fn char_run(mut self, cp: u32, prls: &[Prl]) -> Self {
        self.char_runs.insert(cp, grpprl(prls));
        self
    }

    /// Append a style; its istd is its position in the style sheet.
    pub fn style(mut self, style: StyleDef) -> Self {
        self.styles.push(Some(style));
        self
    }

    pub fn empty_style_slot(mut self) -> Self {
        self.styles.push(None);
        self
    }

    pub fn default_fonts(mut self, fonts: [u16; 3]) -> Self {
        self.default_fonts = fonts;
        self
    }

    /// Add a shared override group (`Prc`) to the CLX.
    pub fn override_group(mut self, prls: &[Prl]) -> Self {
        self.groups.push(grpprl(prls));
        self
    }

    pub fn bookmark(mut self, name: &str, start: u32, end: u32) -> Self {
        self.bookmarks.push((name.to_string(), start, end));
        self
    }

    pub fn dop(mut self, bytes: &[u8]) -> Self {
        self.dop = bytes.to_vec();
        self
    }

    pub fn ident(mut self, ident: u16) -> Self {
        self.ident = ident;
        self
    }

    pub fn n_fib(mut self, n_fib: u16) -> Self {
        self.n_fib = n_fib;
        self
    }

    pub fn fib_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn use_table_0(mut self) -> Self {
        self.use_table_0 = true;
        self
    }

    pub fn without_table_stream(mut self) -> Self {
        self.write_table_stream = false;
        self
    }

    /// Set a `fibRgLw97` value (for example a `ccp*` count).
    pub fn rg_lw(mut self, index: usize, value: u32) -> Self {
        self.rg_lw.insert(index, value);
        self
    }

    /// Replace an `(fc, lcb)` pair after layout.
    pub fn fc_lcb(mut self, index: usize, fc: u32, lcb: u32) -> Self {
        self.fc_lcb_overrides.insert(index, (fc, lcb));
        self
    }

    pub fn table_stream_name(&self) -> &'static str {
        if self.use_table_0 {
            "0Table"
        } else {
            "1Table"
        }
    }

    pub fn text(&self) -> String {
        self.pieces.iter().flat_map(|p| p.chars.iter()).collect()
    }

    /// Build the `WordDocument` and table streams.
    pub fn build_streams(&self) -> (Vec<u8>, Vec<u8>) {
        let order: Vec<usize> = self
            .physical_order
            .clone()
            .unwrap_or_else(|| (0..self.pieces.len()).collect());
        assert_eq!(order.len(), self.pieces.len(), "physical order must list every piece");

        let mut cp_starts = Vec::with_capacity(self.pieces.len());
        let mut cp = 0u32;
        for piece in &self.pieces {
            cp_starts.push(cp);
            cp += piece.chars.len() as u32;
        }
        let doc_len = cp;

        // Text.
        let mut word = vec![0u8; TEXT_START];
        let mut byte_starts = vec![0usize; self.pieces.len()];
        for &i in &order {
            let piece = &self.pieces[i];
            if !piece.compressed && word.len() % 2 == 1 {
                word.push(0);
            }
            byte_starts[i] = word.len();
            word.extend(piece.encode());
        }
        let text_end = word.len();

        let piece_at_byte = |fc: usize| {
            (0..self.pieces.len()).find(|&i| {
                let len = self.pieces[i].chars.len() * self.pieces[i].char_size();
                fc >= byte_starts[i] && fc < byte_starts[i] + len
            })
        };

        // Paragraph runs end right after each paragraph mark.
        let mut mark_ends = BTreeMap::new();
        let mut paragraph = 0usize;
        for (i, piece) in self.pieces.iter().enumerate() {
            for (k, &c) in piece.chars.iter().enumerate() {
                if is_mark(c) {
                    mark_ends.insert(byte_starts[i] + (k + 1) * piece.char_size(), paragraph);
                    paragraph += 1;
                }
            }
        }
        let mut papx_bounds: Vec<usize> = vec![TEXT_START, text_end];
        papx_bounds.extend(mark_ends.keys().copied());
        papx_bounds.sort_unstable();
        papx_bounds.dedup();
        let papx_runs: Vec<(usize, usize, Vec<u8>)> = papx_bounds
            .windows(2)
            .map(|w| {
                let index = *mark_ends
                    .get(&w[1])
                    .expect("the piece laid out last must end with a paragraph mark");
                let (istd, props) = self.paragraphs.get(&index).cloned().unwrap_or_default();
                let mut content = istd.to_le_bytes().to_vec();
                content.extend_from_slice(&props);
                let mut payload = if content.len() % 2 == 1 {
                    vec![((content.len() + 1) / 2) as u8]
                } else {
                    vec![0, (content.len() / 2) as u8]
                };
                payload.extend_from_slice(&content);
                (w[0], w[1], payload)
            })
            .collect();

        // Character runs break at piece edges and at every explicit run start.
        let mut chpx_bounds: Vec<usize> = vec![TEXT_START, text_end];
        for (i, piece) in self.pieces.iter().enumerate() {
            chpx_bounds.push(byte_starts[i]);
            chpx_bounds.push(byte_starts[i] + piece.chars.len() * piece.char_size());
        }
        for &run_cp in self.char_runs.keys() {
            if let Some(i) = (0..self.pieces.len())
                .find(|&i| run_cp >= cp_starts[i] && run_cp < cp_starts[i] + self.pieces[i].chars.len() as u32)
            {
                let offset = (run_cp - cp_starts[i]) as usize * self.pieces[i].char_size();
                chpx_bounds.push(byte_starts[i] + offset);
            }
        }
        chpx_bounds.sort_unstable();
        chpx_bounds.dedup();
        let chpx_runs: Vec<(usize, usize, Vec<u8>)> = chpx_bounds
            .windows(2)
            .map(|w| {
                let props = piece_at_byte(w[0])
                    .map(|i| {
                        let cp = cp_starts[i]
                            + ((w[0] - byte_starts[i]) / self.pieces[i].char_size()) as u32;
                        self.char_runs
                            .range(..=cp)
                            .next_back()
                            .map(|(_, props)| props.clone())
                            .unwrap_or_default()
                    })
                    .unwrap_or_default();
                let payload = if props.is_empty() {
                    Vec::new()
                } else {
                    let mut payload = vec![props.len() as u8];
                    payload.extend_from_slice(&props);
                    payload
                };
                (w[0], w[1], payload)
            })
            .collect();

        let papx_bte = write_fkp_pages(&mut word, &papx_runs, 13, PAPX_RUNS_PER_PAGE);
        let chpx_bte = write_fkp_pages(&mut word, &chpx_runs, 1, CHPX_RUNS_PER_PAGE);

        // Table stream.
        let mut table = Vec::new();
        let mut slots = [(0u32, 0u32); CB_RG_FC_LCB];
        place(&mut table, &mut slots, FC_STSHF, &self.build_stsh());
        place(&mut table, &mut slots, FC_PLCF_BTE_PAPX, &papx_bte);
        place(&mut table, &mut slots, FC_PLCF_BTE_CHPX, &chpx_bte);
        place(
            &mut table,
            &mut slots,
            FC_CLX,
            &self.build_clx(&cp_starts, doc_len, &byte_starts),
        );
        place(&mut table, &mut slots, FC_DOP, &self.dop);
        if !self.bookmarks.is_empty() {
            let (sttbf, bkf, bkl) = self.build_bookmarks(doc_len);
            place(&mut table, &mut slots, FC_STTBF_BKMK, &sttbf);
            place(&mut table, &mut slots, FC_PLCF_BKF, &bkf);
            place(&mut table, &mut slots, FC_PLCF_BKL, &bkl);
        }
        for (&index, &pair) in &self.fc_lcb_overrides {
            slots[index] = pair;
        }

        self.write_fib(&mut word, doc_len, &slots);
        (word, table)
    }

    /// Build a compound file holding the streams.
    pub fn build(&self) -> Vec<u8> {
        let (word, table) = self.build_streams();

        let cursor = Cursor::new(Vec::new());
        let mut ole = cfb::CompoundFile::create(cursor).expect("create cfb");
        {
            let mut stream = ole
                .create_stream("WordDocument")
                .expect("WordDocument stream");
            stream.write_all(&word).expect("write WordDocument stream");
        }
        if self.write_table_stream {
            let mut stream = ole
                .create_stream(self.table_stream_name())
                .expect("table stream");
            stream.write_all(&table).expect("write table stream");
        }
        ole.into_inner().into_inner()
    }

    fn write_fib(&self, word: &mut [u8], doc_len: u32, slots: &[(u32, u32)]) {
        let mut fib = vec![0u8; FIB_LEN];
        fib[0..2].copy_from_slice(&self.ident.to_le_bytes());
        fib[2..4].copy_from_slice(&self.n_fib.to_le_bytes());
        let mut flags = self.flags;
        if !self.use_table_0 {
            flags |= FIB_FLAG_WHICH_TBL_STM;
        }
        fib[10..12].copy_from_slice(&flags.to_le_bytes());
        fib[32..34].copy_from_slice(&(CSW as u16).to_le_bytes());

        let cslw_at = FIB_RG_LW_OFFSET - 2;
        fib[cslw_at..cslw_at + 2].copy_from_slice(&(CSLW as u16).to_le_bytes());
        let mut lw = [0u32; CSLW];
        lw[LW_CB_MAC] = word.len() as u32;
        lw[LW_CCP_TEXT] = doc_len;
        for (&index, &value) in &self.rg_lw {
            lw[index] = value;
        }
        for (i, value) in lw.iter().enumerate() {
            let at = FIB_RG_LW_OFFSET + i * 4;
            fib[at..at + 4].copy_from_slice(&value.to_le_bytes());
        }

        let cb_at = FIB_RG_FC_LCB_OFFSET - 2;
        fib[cb_at..cb_at + 2].copy_from_slice(&(CB_RG_FC_LCB as u16).to_le_bytes());
        for (i, (fc, lcb)) in slots.iter().enumerate() {
            let at = FIB_RG_FC_LCB_OFFSET + i * 8;
            fib[at..at + 4].copy_from_slice(&fc.to_le_bytes());
            fib[at + 4..at + 8].copy_from_slice(&lcb.to_le_bytes());
        }
        // cswNew = 0 is already in place.
        word[..FIB_LEN].copy_from_slice(&fib);
    }

    fn build_clx(&self, cp_starts: &[u32], doc_len: u32, byte_starts: &[usize]) -> Vec<u8> {
        let mut out = Vec::new();
        for group in &self.groups {
            out.push(0x01);
            out.extend_from_slice(&(group.len() as i16).to_le_bytes());
            out.extend_from_slice(group);
        }

        let mut plc = Vec::new();
        for &cp in cp_starts {
            plc.extend_from_slice(&cp.to_le_bytes());
        }
        plc.extend_from_slice(&doc_len.to_le_bytes());
        for (i, piece) in self.pieces.iter().enumerate() {
            let ends_with_mark = piece.chars.last().copied().is_some_and(is_mark);
            let flags = if ends_with_mark { 0 } else { PCD_NO_PARA_LAST };
            let fc = if piece.compressed {
                (byte_starts[i] as u32 * 2) | FC_COMPRESSED
            } else {
                byte_starts[i] as u32
            };
            plc.extend_from_slice(&flags.to_le_bytes());
            plc.extend_from_slice(&fc.to_le_bytes());
            plc.extend_from_slice(&piece.prm.to_le_bytes());
        }

        out.push(0x02);
        out.extend_from_slice(&(plc.len() as u32).to_le_bytes());
        out.extend_from_slice(&plc);
        out
    }

    fn build_stsh(&self) -> Vec<u8> {
        let styles = if self.styles.is_empty() {
            vec![Some(StyleDef::paragraph("Normal"))]
        } else {
            self.styles.clone()
        };

        let mut stshi = Vec::new();
        stshi.extend_from_slice(&(styles.len() as u16).to_le_bytes());
        // cbSTDBaseInFile: StdfBase only.
        stshi.extend_from_slice(&10u16.to_le_bytes());
        // fStdStylenamesWritten
        stshi.extend_from_slice(&1u16.to_le_bytes());
        stshi.extend_from_slice(&[0u8; 6]);
        for ftc in self.default_fonts {
            stshi.extend_from_slice(&ftc.to_le_bytes());
        }

        let mut out = (stshi.len() as u16).to_le_bytes().to_vec();
        out.extend_from_slice(&stshi);
        for (istd, style) in styles.iter().enumerate() {
            match style {
                Some(style) => {
                    let std = style.encode(istd as u16);
                    out.extend_from_slice(&(std.len() as u16).to_le_bytes());
                    out.extend_from_slice(&std);
                }
                None => out.extend_from_slice(&0u16.to_le_bytes()),
            }
        }
        out
    }

    fn build_bookmarks(&self, doc_len: u32) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let mut marks = self.bookmarks.clone();
        marks.sort_by_key(|(_, start, _)| *start);

        let mut sttbf = vec![0xFF, 0xFF];
        sttbf.extend_from_slice(&(marks.len() as u16).to_le_bytes());
        sttbf.extend_from_slice(&0u16.to_le_bytes());
        for (name, _, _) in &marks {
            let units: Vec<u16> = name.encode_utf16().collect();
            sttbf.extend_from_slice(&(units.len() as u16).to_le_bytes());
            for unit in units {
                sttbf.extend_from_slice(&unit.to_le_bytes());
            }
        }

        let mut end_order: Vec<usize> = (0..marks.len()).collect();
        end_order.sort_by_key(|&i| (marks[i].2, i));
        let mut ibkl = vec![0u16; marks.len()];
        for (position, &i) in end_order.iter().enumerate() {
            ibkl[i] = position as u16;
        }

        let mut bkf = Vec::new();
        for (_, start, _) in &marks {
            bkf.extend_from_slice(&start.to_le_bytes());
        }
        bkf.extend_from_slice(&doc_len.to_le_bytes());
        for link in &ibkl {
            bkf.extend_from_slice(&link.to_le_bytes());
            bkf.extend_from_slice(&0u16.to_le_bytes());
        }

        let mut bkl = Vec::new();
        for &i in &end_order {
            bkl.extend_from_slice(&marks[i].2.to_le_bytes());
        }
        bkl.extend_from_slice(&doc_len.to_le_bytes());

        (sttbf, bkf, bkl)
    }
}

fn place(table: &mut Vec<u8>, slots: &mut [(u32, u32)], index: usize, bytes: &[u8]) {
    slots[index] = (table.len() as u32, bytes.len() as u32);
    table.extend_from_slice(bytes);
}

/// Append FKP pages for `runs` (contiguous `(fc_first, fc_lim, payload)`) and return the bin
/// table (`PlcBte`) describing them.
fn write_fkp_pages(
    word: &mut Vec<u8>,
    runs: &[(usize, usize, Vec<u8>)],
    bx_size: usize,
    per_page: usize,
) -> Vec<u8> {
    while word.len() % PAGE_SIZE != 0 {
        word.push(0);
    }

    let mut first_fcs = Vec::new();
    let mut page_numbers = Vec::new();
    for chunk in runs.chunks(per_page) {
        let mut page = vec![0u8; PAGE_SIZE];
        let crun = chunk.len();
        for (k, (fc_first, _, _)) in chunk.iter().enumerate() {
            page[k * 4..k * 4 + 4].copy_from_slice(&(*fc_first as u32).to_le_bytes());
        }
        let fc_end = chunk[crun - 1].1 as u32;
        page[crun * 4..crun * 4 + 4].copy_from_slice(&fc_end.to_le_bytes());

        let entries_at = (crun + 1) * 4;
        let mut free = PAGE_SIZE - 1;
        for (k, (_, _, payload)) in chunk.iter().enumerate() {
            if payload.is_empty() {
                continue;
            }
            free = (free - payload.len()) & !1;
            assert!(
                free >= entries_at + crun * bx_size,
                "fixture FKP page overflow"
            );
            page[free..free + payload.len()].copy_from_slice(payload);
            page[entries_at + k * bx_size] = (free / 2) as u8;
        }
        page[PAGE_SIZE - 1] = crun as u8;

        first_fcs.push(chunk[0].0 as u32);
        page_numbers.push((word.len() / PAGE_SIZE) as u32);
        word.extend_from_slice(&page);
    }

    let mut bte = Vec::new();
    for fc in &first_fcs {
        bte.extend_from_slice(&fc.to_le_bytes());
    }
    let last = runs.last().map(|run| run.1 as u32).unwrap_or(TEXT_START as u32);
    bte.extend_from_slice(&last.to_le_bytes());
    for pn in &page_numbers {
        bte.extend_from_slice(&pn.to_le_bytes());
    }
    bte
}
