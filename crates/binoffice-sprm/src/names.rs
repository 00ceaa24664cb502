//! Known sprm codes and their [MS-DOC] names.
//!
//! The table is used for diagnostics and for the named constants in [`ids`]. It is not
//! exhaustive: unknown sprms are still decoded (their operand size is carried by the sprm
//! itself), they just have no name.

macro_rules! sprm_table {
    ($($ident:ident = $value:literal => $name:literal,)*) => {
        /// Named sprm constants.
        pub mod ids {
            use crate::Sprm;

            $(pub const $ident: Sprm = Sprm($value);)*
        }

        pub(crate) fn sprm_name(raw: u16) -> Option<&'static str> {
            match raw {
                $($value => Some($name),)*
                _ => None,
            }
        }

        #[cfg(test)]
        pub(crate) const ALL_KNOWN: &[u16] = &[$($value,)*];
    };
}

sprm_table! {
    // Paragraph (sgc = 1).
    P_ISTD = 0x4600 => "sprmPIstd",
    P_ISTD_PERMUTE = 0xC601 => "sprmPIstdPermute",
    P_INC_LVL = 0x2602 => "sprmPIncLvl",
    P_JC80 = 0x2403 => "sprmPJc80",
    P_F_KEEP = 0x2405 => "sprmPFKeep",
    P_F_KEEP_FOLLOW = 0x2406 => "sprmPFKeepFollow",
    P_F_PAGE_BREAK_BEFORE = 0x2407 => "sprmPFPageBreakBefore",
    P_ILVL = 0x260A => "sprmPIlvl",
    P_ILFO = 0x460B => "sprmPIlfo",
    P_F_NO_LINE_NUMB = 0x240C => "sprmPFNoLineNumb",
    P_CHG_TABS_PAPX = 0xC60D => "sprmPChgTabsPapx",
    P_DXA_RIGHT80 = 0x840E => "sprmPDxaRight80",
    P_DXA_LEFT80 = 0x840F => "sprmPDxaLeft80",
    P_NEST80 = 0x4610 => "sprmPNest80",
    P_DXA_LEFT1_80 = 0x8411 => "sprmPDxaLeft180",
    P_DYA_LINE = 0x6412 => "sprmPDyaLine",
    P_DYA_BEFORE = 0xA413 => "sprmPDyaBefore",
    P_DYA_AFTER = 0xA414 => "sprmPDyaAfter",
    P_CHG_TABS = 0xC615 => "sprmPChgTabs",
    P_F_IN_TABLE = 0x2416 => "sprmPFInTable",
    P_F_TTP = 0x2417 => "sprmPFTtp",
    P_DXA_ABS = 0x8418 => "sprmPDxaAbs",
    P_DYA_ABS = 0x8419 => "sprmPDyaAbs",
    P_DXA_WIDTH = 0x841A => "sprmPDxaWidth",
    P_PC = 0x261B => "sprmPPc",
    P_WR = 0x2423 => "sprmPWr",
    P_F_NO_AUTO_HYPH = 0x242A => "sprmPFNoAutoHyph",
    P_F_LOCKED = 0x2430 => "sprmPFLocked",
    P_F_WIDOW_CONTROL = 0x2431 => "sprmPFWidowControl",
    P_F_KINSOKU = 0x2433 => "sprmPFKinsoku",
    P_F_WORD_WRAP = 0x2434 => "sprmPFWordWrap",
    P_F_OVERFLOW_PUNCT = 0x2435 => "sprmPFOverflowPunct",
    P_F_TOP_LINE_PUNCT = 0x2436 => "sprmPFTopLinePunct",
    P_F_AUTO_SPACE_DE = 0x2437 => "sprmPFAutoSpaceDE",
    P_F_AUTO_SPACE_DN = 0x2438 => "sprmPFAutoSpaceDN",
    P_W_ALIGN_FONT = 0x4439 => "sprmPWAlignFont",
    P_OUT_LVL = 0x2640 => "sprmPOutLvl",
    P_F_BI_DI = 0x2441 => "sprmPFBiDi",
    P_ITAP = 0x6649 => "sprmPItap",
    P_F_INNER_TABLE_CELL = 0x244B => "sprmPFInnerTableCell",
    P_F_INNER_TTP = 0x244C => "sprmPFInnerTtp",
    P_SHD = 0xC64D => "sprmPShd",
    P_DXA_RIGHT = 0x845D => "sprmPDxaRight",
    P_DXA_LEFT = 0x845E => "sprmPDxaLeft",
    P_DXA_LEFT1 = 0x8460 => "sprmPDxaLeft1",
    P_JC = 0x2461 => "sprmPJc",
    P_F_CONTEXTUAL_SPACING = 0x246D => "sprmPFContextualSpacing",

    // Character (sgc = 2).
    C_F_R_MARK_DEL = 0x0800 => "sprmCFRMarkDel",
    C_F_R_MARK_INS = 0x0801 => "sprmCFRMarkIns",
    C_F_FLD_VANISH = 0x0802 => "sprmCFFldVanish",
    C_PIC_LOCATION = 0x6A03 => "sprmCPicLocation",
    C_IBST_R_MARK = 0x4804 => "sprmCIbstRMark",
    C_DTTM_R_MARK = 0x6805 => "sprmCDttmRMark",
    C_F_DATA = 0x0806 => "sprmCFData",
    C_IDSL_R_MARK = 0x4807 => "sprmCIdslRMark",
    C_SYMBOL = 0x6A09 => "sprmCSymbol",
    C_F_OLE2 = 0x080A => "sprmCFOle2",
    C_HIGHLIGHT = 0x2A0C => "sprmCHighlight",
    C_F_WEB_HIDDEN = 0x0811 => "sprmCFWebHidden",
    C_RSID_PROP = 0x6815 => "sprmCRsidProp",
    C_RSID_TEXT = 0x6816 => "sprmCRsidText",
    C_RSID_R_M_DEL = 0x6817 => "sprmCRsidRMDel",
    C_F_SPEC_VANISH = 0x0818 => "sprmCFSpecVanish",
    C_ISTD = 0x4A30 => "sprmCIstd",
    C_ISTD_PERMUTE = 0xCA31 => "sprmCIstdPermute",
    C_PLAIN = 0x2A33 => "sprmCPlain",
    C_KCD = 0x2A34 => "sprmCKcd",
    C_F_BOLD = 0x0835 => "sprmCFBold",
    C_F_ITALIC = 0x0836 => "sprmCFItalic",
    C_F_STRIKE = 0x0837 => "sprmCFStrike",
    C_F_OUTLINE = 0x0838 => "sprmCFOutline",
    C_F_SHADOW = 0x0839 => "sprmCFShadow",
    C_F_SMALL_CAPS = 0x083A => "sprmCFSmallCaps",
    C_F_CAPS = 0x083B => "sprmCFCaps",
    C_F_VANISH = 0x083C => "sprmCFVanish",
    C_KUL = 0x2A3E => "sprmCKul",
    C_DXA_SPACE = 0x8840 => "sprmCDxaSpace",
    C_ICO = 0x2A42 => "sprmCIco",
    C_HPS = 0x4A43 => "sprmCHps",
    C_HPS_POS = 0x4845 => "sprmCHpsPos",
    C_MAJORITY = 0xCA47 => "sprmCMajority",
    C_ISS = 0x2A48 => "sprmCIss",
    C_HPS_KERN = 0x484B => "sprmCHpsKern",
    C_HRESI = 0x484E => "sprmCHresi",
    C_RG_FTC0 = 0x4A4F => "sprmCRgFtc0",
    C_RG_FTC1 = 0x4A50 => "sprmCRgFtc1",
    C_RG_FTC2 = 0x4A51 => "sprmCRgFtc2",
    C_CHAR_SCALE = 0x4852 => "sprmCCharScale",
    C_F_D_STRIKE = 0x2A53 => "sprmCFDStrike",
    C_F_IMPRINT = 0x0854 => "sprmCFImprint",
    C_F_SPEC = 0x0855 => "sprmCFSpec",
    C_F_OBJ = 0x0856 => "sprmCFObj",
    C_PROP_R_MARK90 = 0xCA57 => "sprmCPropRMark90",
    C_F_EMBOSS = 0x0858 => "sprmCFEmboss",
    C_SFX_TEXT = 0x2859 => "sprmCSfxText",
    C_F_BI_DI = 0x085A => "sprmCFBiDi",
    C_F_BOLD_BI = 0x085C => "sprmCFBoldBi",
    C_F_ITALIC_BI = 0x085D => "sprmCFItalicBi",
    C_FTC_BI = 0x4A5E => "sprmCFtcBi",
    C_LID_BI = 0x485F => "sprmCLidBi",
    C_ICO_BI = 0x4A60 => "sprmCIcoBi",
    C_HPS_BI = 0x4A61 => "sprmCHpsBi",
    C_F_USE_PGSU_SETTINGS = 0x0868 => "sprmCFUsePgsuSettings",
    C_RG_LID0_80 = 0x486D => "sprmCRgLid0_80",
    C_RG_LID1_80 = 0x486E => "sprmCRgLid1_80",
    C_IDCT_HINT = 0x286F => "sprmCIdctHint",
    C_CV = 0x6870 => "sprmCCv",
    C_RG_LID0 = 0x4873 => "sprmCRgLid0",
    C_RG_LID1 = 0x4874 => "sprmCRgLid1",
    C_F_NO_PROOF = 0x0875 => "sprmCFNoProof",
    C_F_COMPLEX_SCRIPTS = 0x0882 => "sprmCFComplexScripts",

    // Picture (sgc = 3).
    PIC_BRC_TOP80 = 0x6C02 => "sprmPicBrcTop80",
    PIC_BRC_LEFT80 = 0x6C03 => "sprmPicBrcLeft80",
    PIC_BRC_BOTTOM80 = 0x6C04 => "sprmPicBrcBottom80",
    PIC_BRC_RIGHT80 = 0x6C05 => "sprmPicBrcRight80",

    // Section (sgc = 4).
    S_BKC = 0x3009 => "sprmSBkc",
    S_F_TITLE_PAGE = 0x300A => "sprmSFTitlePage",
    S_CCOLUMNS = 0x500B => "sprmSCcolumns",
    S_DXA_COLUMNS = 0x900C => "sprmSDxaColumns",
    S_NFC_PGN = 0x300E => "sprmSNfcPgn",
    S_F_PGN_RESTART = 0x3011 => "sprmSFPgnRestart",
    S_LNC = 0x3013 => "sprmSLnc",
    S_PGN_START97 = 0x501C => "sprmSPgnStart97",
    S_XA_PAGE = 0xB01F => "sprmSXaPage",
    S_YA_PAGE = 0xB020 => "sprmSYaPage",
    S_DXA_LEFT = 0xB021 => "sprmSDxaLeft",
    S_DXA_RIGHT = 0xB022 => "sprmSDxaRight",
    S_DYA_TOP = 0x9023 => "sprmSDyaTop",
    S_DYA_BOTTOM = 0x9024 => "sprmSDyaBottom",

    // Table (sgc = 5).
    T_JC90 = 0x5400 => "sprmTJc90",
    T_DXA_LEFT = 0x9601 => "sprmTDxaLeft",
    T_DXA_GAP_HALF = 0x9602 => "sprmTDxaGapHalf",
    T_F_CANT_SPLIT90 = 0x3403 => "sprmTFCantSplit90",
    T_TABLE_HEADER = 0x3404 => "sprmTTableHeader",
    T_TABLE_BORDERS80 = 0xD605 => "sprmTTableBorders80",
    T_DYA_ROW_HEIGHT = 0x9407 => "sprmTDyaRowHeight",
    T_DEF_TABLE = 0xD608 => "sprmTDefTable",
    T_DEF_TABLE_SHD80 = 0xD609 => "sprmTDefTableShd80",
    T_TLP = 0x740A => "sprmTTlp",
    T_F_BI_DI = 0x560B => "sprmTFBiDi",
    T_PC = 0x360D => "sprmTPc",
    T_DXA_ABS = 0x940E => "sprmTDxaAbs",
    T_DYA_ABS = 0x940F => "sprmTDyaAbs",
    T_DXA_FROM_TEXT = 0x9410 => "sprmTDxaFromText",
    T_DYA_FROM_TEXT = 0x9411 => "sprmTDyaFromText",
    T_DEF_TABLE_SHD = 0xD612 => "sprmTDefTableShd",
    T_TABLE_BORDERS = 0xD613 => "sprmTTableBorders",
    T_TABLE_WIDTH = 0xF614 => "sprmTTableWidth",
    T_F_AUTOFIT = 0x3615 => "sprmTFAutofit",
    T_WIDTH_BEFORE = 0xF617 => "sprmTWidthBefore",
    T_WIDTH_AFTER = 0xF618 => "sprmTWidthAfter",
    T_INSERT = 0x7621 => "sprmTInsert",
    T_DELETE = 0x5622 => "sprmTDelete",
    T_DXA_COL = 0x7623 => "sprmTDxaCol",
    T_MERGE = 0x5624 => "sprmTMerge",
    T_SPLIT = 0x5625 => "sprmTSplit",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sprm, SprmScope};

    #[test]
    fn names_are_unique_and_prefixed() {
        let mut seen = std::collections::BTreeSet::new();
        for &raw in ALL_KNOWN {
            assert!(seen.insert(raw), "duplicate sprm {raw:#06X}");
            let name = sprm_name(raw).expect("listed sprm has a name");
            assert!(name.starts_with("sprm"), "{name}");
        }
    }

    #[test]
    fn name_prefix_matches_scope() {
        for &raw in ALL_KNOWN {
            let sprm = Sprm(raw);
            let name = sprm_name(raw).unwrap_or_default();
            let expected = match sprm.scope() {
                SprmScope::Paragraph => "sprmP",
                SprmScope::Character => "sprmC",
                SprmScope::Picture => "sprmPic",
                SprmScope::Section => "sprmS",
                SprmScope::Table => "sprmT",
                SprmScope::Unknown(sgc) => panic!("{name} has undefined sgc {sgc}"),
            };
            assert!(name.starts_with(expected), "{name} ({raw:#06X}) vs {expected}");
        }
    }
}
