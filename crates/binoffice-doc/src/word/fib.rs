//! File Information Block: the directory at the start of the `WordDocument` stream.
//!
//! Layout ([MS-DOC] 2.5.1):
//! - `FibBase` (32 bytes)
//! - `csw` (u16) + `fibRgW` (`csw` u16 values)
//! - `cslw` (u16) + `fibRgLw` (`cslw` u32 values; the `ccp*` text counts live here)
//! - `cbRgFcLcb` (u16) + `fibRgFcLcbBlob` (`cbRgFcLcb` pairs of u32 `fc`/`lcb`)
//! - `cswNew` (u16) + `fibRgCswNew` (`cswNew` u16 values; the first is `nFibNew`)
//!
//! Every variable-length section is read using its declared count, so newer files with longer
//! sections and older files with shorter ones both parse.

use crate::word::{read_u16, read_u32, read_u8, TABLE_STREAM_0, TABLE_STREAM_1};
use crate::DocError;

pub(crate) const FIB_IDENT: u16 = 0xA5EC;
/// `nFib` written by Word 97. Older formats use an incompatible FIB.
pub(crate) const NFIB_WORD97: u16 = 0x00C1;

const FIB_BASE_LEN: usize = 32;
const STRUCTURE: &str = "FIB";

const FLAG_DOT: u16 = 0x0001;
const FLAG_GLSY: u16 = 0x0002;
const FLAG_COMPLEX: u16 = 0x0004;
const FLAG_HAS_PIC: u16 = 0x0008;
const FLAG_QUICK_SAVES_MASK: u16 = 0x00F0;
const FLAG_ENCRYPTED: u16 = 0x0100;
const FLAG_WHICH_TBL_STM: u16 = 0x0200;
const FLAG_READ_ONLY_RECOMMENDED: u16 = 0x0400;
const FLAG_WRITE_RESERVATION: u16 = 0x0800;
const FLAG_EXT_CHAR: u16 = 0x1000;
const FLAG_LOAD_OVERRIDE: u16 = 0x2000;
const FLAG_FAR_EAST: u16 = 0x4000;
const FLAG_OBFUSCATED: u16 = 0x8000;

// fibRgLw97 indices of the subdocument character counts.
const LW_CCP_TEXT: usize = 3;
const LW_CCP_FTN: usize = 4;
const LW_CCP_HDD: usize = 5;
const LW_CCP_ATN: usize = 7;
const LW_CCP_EDN: usize = 8;
const LW_CCP_TXBX: usize = 9;
const LW_CCP_HDR_TXBX: usize = 10;

macro_rules! fib_entries {
    ($($variant:ident => $name:literal,)*) => {
        /// The `(fc, lcb)` pairs of `FibRgFcLcb97`, in file order.
        ///
        /// Each pair locates an optional structure in the table stream. A zero `lcb` means the
        /// structure is absent.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum FibEntry {
            $($variant,)*
        }

        impl FibEntry {
            pub const ALL: &'static [FibEntry] = &[$(FibEntry::$variant,)*];

            /// The [MS-DOC] field name without its `fc`/`lcb` prefix.
            pub const fn name(self) -> &'static str {
                match self {
                    $(FibEntry::$variant => $name,)*
                }
            }

            /// Position of the pair within `fibRgFcLcbBlob`.
            pub const fn index(self) -> usize {
                self as usize
            }
        }
    };
}

fib_entries! {
    StshfOrig => "StshfOrig",
    Stshf => "Stshf",
    PlcffndRef => "PlcffndRef",
    PlcffndTxt => "PlcffndTxt",
    PlcfandRef => "PlcfandRef",
    PlcfandTxt => "PlcfandTxt",
    PlcfSed => "PlcfSed",
    PlcPad => "PlcPad",
    PlcfPhe => "PlcfPhe",
    SttbfGlsy => "SttbfGlsy",
    PlcfGlsy => "PlcfGlsy",
    PlcfHdd => "PlcfHdd",
    PlcfBteChpx => "PlcfBteChpx",
    PlcfBtePapx => "PlcfBtePapx",
    PlcfSea => "PlcfSea",
    SttbfFfn => "SttbfFfn",
    PlcfFldMom => "PlcfFldMom",
    PlcfFldHdr => "PlcfFldHdr",
    PlcfFldFtn => "PlcfFldFtn",
    PlcfFldAtn => "PlcfFldAtn",
    PlcfFldMcr => "PlcfFldMcr",
    SttbfBkmk => "SttbfBkmk",
    PlcfBkf => "PlcfBkf",
    PlcfBkl => "PlcfBkl",
    Cmds => "Cmds",
    Unused1 => "Unused1",
    SttbfMcr => "SttbfMcr",
    PrDrvr => "PrDrvr",
    PrEnvPort => "PrEnvPort",
    PrEnvLand => "PrEnvLand",
    Wss => "Wss",
    Dop => "Dop",
    SttbfAssoc => "SttbfAssoc",
    Clx => "Clx",
    PlcfPgdFtn => "PlcfPgdFtn",
    AutosaveSource => "AutosaveSource",
    GrpXstAtnOwners => "GrpXstAtnOwners",
    SttbfAtnBkmk => "SttbfAtnBkmk",
    Unused2 => "Unused2",
    Unused3 => "Unused3",
    PlcSpaMom => "PlcSpaMom",
    PlcSpaHdr => "PlcSpaHdr",
    PlcfAtnBkf => "PlcfAtnBkf",
    PlcfAtnBkl => "PlcfAtnBkl",
    Pms => "Pms",
    FormFldSttbs => "FormFldSttbs",
    PlcfendRef => "PlcfendRef",
    PlcfendTxt => "PlcfendTxt",
    PlcfFldEdn => "PlcfFldEdn",
    Unused4 => "Unused4",
    DggInfo => "DggInfo",
    SttbfRMark => "SttbfRMark",
    SttbfCaption => "SttbfCaption",
    SttbfAutoCaption => "SttbfAutoCaption",
    PlcfWkb => "PlcfWkb",
    PlcfSpl => "PlcfSpl",
    PlcftxbxTxt => "PlcftxbxTxt",
    PlcfFldTxbx => "PlcfFldTxbx",
    PlcfHdrtxbxTxt => "PlcfHdrtxbxTxt",
    PlcffldHdrTxbx => "PlcffldHdrTxbx",
    StwUser => "StwUser",
    SttbTtmbd => "SttbTtmbd",
    CookieData => "CookieData",
    PgdMotherOldOld => "PgdMotherOldOld",
    BkdMotherOldOld => "BkdMotherOldOld",
    PgdFtnOldOld => "PgdFtnOldOld",
    BkdFtnOldOld => "BkdFtnOldOld",
    PgdEdnOldOld => "PgdEdnOldOld",
    BkdEdnOldOld => "BkdEdnOldOld",
    SttbfIntlFld => "SttbfIntlFld",
    RouteSlip => "RouteSlip",
    SttbSavedBy => "SttbSavedBy",
    SttbFnm => "SttbFnm",
    PlfLst => "PlfLst",
    PlfLfo => "PlfLfo",
    PlcfTxbxBkd => "PlcfTxbxBkd",
    PlcfTxbxHdrBkd => "PlcfTxbxHdrBkd",
    DocUndoWord9 => "DocUndoWord9",
    RgbUse => "RgbUse",
    Usp => "Usp",
    Uskf => "Uskf",
    PlcupcRgbUse => "PlcupcRgbUse",
    PlcupcUsp => "PlcupcUsp",
    SttbGlsyStyle => "SttbGlsyStyle",
    Plgosl => "Plgosl",
    Plcocx => "Plcocx",
    PlcfBteLvc => "PlcfBteLvc",
    ModifiedTime => "ModifiedTime",
    PlcfLvcPre10 => "PlcfLvcPre10",
    PlcfAsumy => "PlcfAsumy",
    PlcfGram => "PlcfGram",
    SttbListNames => "SttbListNames",
    SttbfUssr => "SttbfUssr",
}

/// Location of one optional structure in the table stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FcLcb {
    pub fc: u32,
    pub lcb: u32,
}

/// `FibBase.flags` (offset 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FibFlags(pub u16);

impl FibFlags {
    pub fn is_template(self) -> bool {
        self.0 & FLAG_DOT != 0
    }

    pub fn is_glossary(self) -> bool {
        self.0 & FLAG_GLSY != 0
    }

    /// Last save was an incremental ("fast") save.
    pub fn is_complex(self) -> bool {
        self.0 & FLAG_COMPLEX != 0
    }

    pub fn has_pictures(self) -> bool {
        self.0 & FLAG_HAS_PIC != 0
    }

    pub fn quick_saves(self) -> u8 {
        ((self.0 & FLAG_QUICK_SAVES_MASK) >> 4) as u8
    }

    pub fn is_encrypted(self) -> bool {
        self.0 & FLAG_ENCRYPTED != 0
    }

    /// `true` selects `1Table`, `false` selects `0Table`.
    pub fn uses_table_1(self) -> bool {
        self.0 & FLAG_WHICH_TBL_STM != 0
    }

    pub fn read_only_recommended(self) -> bool {
        self.0 & FLAG_READ_ONLY_RECOMMENDED != 0
    }

    pub fn write_reservation(self) -> bool {
        self.0 & FLAG_WRITE_RESERVATION != 0
    }

    pub fn ext_char(self) -> bool {
        self.0 & FLAG_EXT_CHAR != 0
    }

    pub fn load_override(self) -> bool {
        self.0 & FLAG_LOAD_OVERRIDE != 0
    }

    pub fn far_east(self) -> bool {
        self.0 & FLAG_FAR_EAST != 0
    }

    pub fn is_obfuscated(self) -> bool {
        self.0 & FLAG_OBFUSCATED != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FibBase {
    pub ident: u16,
    pub n_fib: u16,
    pub lid: u16,
    pub pn_next: u16,
    pub flags: FibFlags,
    pub n_fib_back: u16,
    pub key: u32,
    pub envr: u8,
}

/// Character counts of each subdocument, in CP order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CcpCounts {
    pub text: u32,
    pub footnotes: u32,
    pub headers: u32,
    pub comments: u32,
    pub endnotes: u32,
    pub textboxes: u32,
    pub header_textboxes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fib {
    pub base: FibBase,
    /// `nFibNew` when present, otherwise `FibBase.nFib`.
    pub n_fib: u16,
    pub rg_w: Vec<u16>,
    pub rg_lw: Vec<u32>,
    pub ccp: CcpCounts,
    fc_lcb: Vec<FcLcb>,
}

impl Fib {
    pub(crate) fn parse(stream: &[u8]) -> Result<Self, DocError> {
        let truncated = |what: &str| DocError::corrupted(STRUCTURE, format!("truncated {what}"));

        if stream.len() < FIB_BASE_LEN {
            return Err(truncated("FibBase"));
        }
        let base = FibBase {
            ident: read_u16(stream, 0).ok_or_else(|| truncated("wIdent"))?,
            n_fib: read_u16(stream, 2).ok_or_else(|| truncated("nFib"))?,
            lid: read_u16(stream, 6).ok_or_else(|| truncated("lid"))?,
            pn_next: read_u16(stream, 8).ok_or_else(|| truncated("pnNext"))?,
            flags: FibFlags(read_u16(stream, 10).ok_or_else(|| truncated("flags"))?),
            n_fib_back: read_u16(stream, 12).ok_or_else(|| truncated("nFibBack"))?,
            key: read_u32(stream, 14).ok_or_else(|| truncated("lKey"))?,
            envr: read_u8(stream, 18).ok_or_else(|| truncated("envr"))?,
        };

        let mut offset = FIB_BASE_LEN;

        let csw = read_u16(stream, offset).ok_or_else(|| truncated("csw"))? as usize;
        offset += 2;
        let rg_w = (0..csw)
            .map(|i| read_u16(stream, offset + i * 2))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| truncated("fibRgW"))?;
        offset += csw * 2;

        let cslw = read_u16(stream, offset).ok_or_else(|| truncated("cslw"))? as usize;
        offset += 2;
        let rg_lw = (0..cslw)
            .map(|i| read_u32(stream, offset + i * 4))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| truncated("fibRgLw"))?;
        offset += cslw * 4;

        let cb_rg_fc_lcb =
            read_u16(stream, offset).ok_or_else(|| truncated("cbRgFcLcb"))? as usize;
        offset += 2;
        let fc_lcb = (0..cb_rg_fc_lcb)
            .map(|i| {
                let at = offset + i * 8;
                Some(FcLcb {
                    fc: read_u32(stream, at)?,
                    lcb: read_u32(stream, at + 4)?,
                })
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| truncated("fibRgFcLcbBlob"))?;
        offset += cb_rg_fc_lcb * 8;

        // fibRgCswNew is absent in some Word 97 files; treat a missing count as zero.
        let csw_new = read_u16(stream, offset).unwrap_or(0) as usize;
        let n_fib = if csw_new > 0 {
            read_u16(stream, offset + 2).ok_or_else(|| truncated("nFibNew"))?
        } else {
            base.n_fib
        };

        let lw = |index: usize| rg_lw.get(index).copied().unwrap_or(0);
        let ccp = CcpCounts {
            text: lw(LW_CCP_TEXT),
            footnotes: lw(LW_CCP_FTN),
            headers: lw(LW_CCP_HDD),
            comments: lw(LW_CCP_ATN),
            endnotes: lw(LW_CCP_EDN),
            textboxes: lw(LW_CCP_TXBX),
            header_textboxes: lw(LW_CCP_HDR_TXBX),
        };

        Ok(Self {
            base,
            n_fib,
            rg_w,
            rg_lw,
            ccp,
            fc_lcb,
        })
    }

    pub fn flags(&self) -> FibFlags {
        self.base.flags
    }

    pub fn table_stream_name(&self) -> &'static str {
        if self.base.flags.uses_table_1() {
            TABLE_STREAM_1
        } else {
            TABLE_STREAM_0
        }
    }

    /// Location of `entry`, or `None` when the FIB predates it or the structure is absent.
    pub fn fc_lcb(&self, entry: FibEntry) -> Option<FcLcb> {
        self.fc_lcb
            .get(entry.index())
            .copied()
            .filter(|pair| pair.lcb != 0)
    }

    /// Number of `(fc, lcb)` pairs the FIB declares.
    pub fn fc_lcb_count(&self) -> usize {
        self.fc_lcb.len()
    }
}
