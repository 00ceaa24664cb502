use crate::names::ids;
use crate::sprm::Sprm;

/// Sprms reachable from an inline piece override (`Prm0`), keyed by its 7-bit `isprm`.
///
/// Only single-byte-operand sprms can be expressed inline. Indices that are not listed have no
/// effect when they appear in a `Prm0`.
const PRM0_SPRMS: &[(u8, Sprm)] = &[
    (0x04, ids::P_INC_LVL),
    (0x05, ids::P_JC80),
    (0x07, ids::P_F_KEEP),
    (0x08, ids::P_F_KEEP_FOLLOW),
    (0x09, ids::P_F_PAGE_BREAK_BEFORE),
    (0x0C, ids::P_ILVL),
    (0x0E, ids::P_F_NO_LINE_NUMB),
    (0x18, ids::P_F_IN_TABLE),
    (0x19, ids::P_F_TTP),
    (0x1D, ids::P_PC),
    (0x25, ids::P_WR),
    (0x2C, ids::P_F_NO_AUTO_HYPH),
    (0x32, ids::P_F_LOCKED),
    (0x33, ids::P_F_WIDOW_CONTROL),
    (0x35, ids::P_F_KINSOKU),
    (0x36, ids::P_F_WORD_WRAP),
    (0x37, ids::P_F_OVERFLOW_PUNCT),
    (0x38, ids::P_F_TOP_LINE_PUNCT),
    (0x39, ids::P_F_AUTO_SPACE_DE),
    (0x3A, ids::P_F_AUTO_SPACE_DN),
    (0x41, ids::C_F_R_MARK_DEL),
    (0x42, ids::C_F_R_MARK_INS),
    (0x43, ids::C_F_FLD_VANISH),
    (0x47, ids::C_F_DATA),
    (0x4B, ids::C_F_OLE2),
    (0x4D, ids::C_HIGHLIGHT),
    (0x4E, ids::C_F_EMBOSS),
    (0x4F, ids::C_SFX_TEXT),
    (0x50, ids::C_F_WEB_HIDDEN),
    (0x51, ids::C_F_SPEC_VANISH),
    (0x53, ids::C_PLAIN),
    (0x55, ids::C_F_BOLD),
    (0x56, ids::C_F_ITALIC),
    (0x57, ids::C_F_STRIKE),
    (0x58, ids::C_F_OUTLINE),
    (0x59, ids::C_F_SHADOW),
    (0x5A, ids::C_F_SMALL_CAPS),
    (0x5B, ids::C_F_CAPS),
    (0x5C, ids::C_F_VANISH),
    (0x5E, ids::C_KUL),
    (0x62, ids::C_ICO),
    (0x68, ids::C_ISS),
    (0x73, ids::C_F_D_STRIKE),
    (0x74, ids::C_F_IMPRINT),
    (0x75, ids::C_F_SPEC),
    (0x76, ids::C_F_OBJ),
    (0x78, ids::P_OUT_LVL),
];

/// Map a `Prm0.isprm` to the sprm it stands for.
pub fn sprm_for_isprm(isprm: u8) -> Option<Sprm> {
    PRM0_SPRMS
        .iter()
        .find(|(index, _)| *index == isprm)
        .map(|(_, sprm)| *sprm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OperandSize;

    #[test]
    fn every_inline_sprm_has_a_one_byte_operand() {
        for (isprm, sprm) in PRM0_SPRMS {
            assert!(*isprm < 0x80, "isprm is a 7-bit field");
            assert!(
                matches!(
                    sprm.operand_size(),
                    OperandSize::Toggle | OperandSize::Fixed(1)
                ),
                "{sprm} cannot be expressed inline"
            );
        }
    }

    #[test]
    fn indices_are_sorted_and_unique() {
        assert!(PRM0_SPRMS.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn lookup() {
        assert_eq!(sprm_for_isprm(0x55), Some(ids::C_F_BOLD));
        assert_eq!(sprm_for_isprm(0x05), Some(ids::P_JC80));
        assert_eq!(sprm_for_isprm(0x0C), Some(ids::P_ILVL));
        assert_eq!(sprm_for_isprm(0x1D), Some(ids::P_PC));
        assert_eq!(sprm_for_isprm(0x42), Some(ids::C_F_R_MARK_INS));
        assert_eq!(sprm_for_isprm(0x4D), Some(ids::C_HIGHLIGHT));
        assert_eq!(sprm_for_isprm(0x53), Some(ids::C_PLAIN));
        assert_eq!(sprm_for_isprm(0x78), Some(ids::P_OUT_LVL));
        assert_eq!(sprm_for_isprm(0x54), None);
        assert_eq!(sprm_for_isprm(0x00), None);
        assert_eq!(sprm_for_isprm(0x7F), None);
    }
}
