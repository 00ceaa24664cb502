use thiserror::Error;

use crate::names::ids;
use crate::sprm::{OperandSize, Sprm, SprmScope};

const SPRM_LEN: usize = 2;
// sprmPChgTabs uses this `cb` value to signal that the real size must be computed from the
// delete/add tab counts that follow.
const CHG_TABS_COMPUTED_SIZE: u8 = 0xFF;

/// One formatting delta: a [`Sprm`] plus its operand bytes.
///
/// For variable-length sprms the operand keeps its on-disk length prefix, so
/// `sprm.to_le_bytes() ++ operand` reproduces the original bytes exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prl {
    pub sprm: Sprm,
    pub operand: Vec<u8>,
}

impl Prl {
    pub fn new(sprm: Sprm, operand: impl Into<Vec<u8>>) -> Self {
        Self {
            sprm,
            operand: operand.into(),
        }
    }

    pub fn scope(&self) -> SprmScope {
        self.sprm.scope()
    }

    pub fn operand_u8(&self) -> Option<u8> {
        self.operand.first().copied()
    }

    pub fn operand_u16(&self) -> Option<u16> {
        let bytes = self.operand.get(0..2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn operand_i16(&self) -> Option<i16> {
        self.operand_u16().map(|v| v as i16)
    }

    pub fn operand_u32(&self) -> Option<u32> {
        let bytes = self.operand.get(0..4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Interpret a toggle sprm's operand. Returns `None` for non-toggle sprms.
    pub fn toggle(&self) -> Option<ToggleOperand> {
        if self.sprm.operand_size() != OperandSize::Toggle {
            return None;
        }
        self.operand_u8().and_then(ToggleOperand::from_byte)
    }

    /// Append the on-disk encoding of this Prl to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.sprm.raw().to_le_bytes());
        out.extend_from_slice(&self.operand);
    }
}

/// Operand of a boolean character sprm (`spra = 0`).
///
/// Styles store absolute values; direct formatting may instead say "same as" or "opposite of"
/// the value inherited from the style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOperand {
    Off,
    On,
    SameAsInherited,
    InvertInherited,
}

impl ToggleOperand {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(ToggleOperand::Off),
            0x01 => Some(ToggleOperand::On),
            0x80 => Some(ToggleOperand::SameAsInherited),
            0x81 => Some(ToggleOperand::InvertInherited),
            _ => None,
        }
    }

    pub const fn apply(self, inherited: bool) -> bool {
        match self {
            ToggleOperand::Off => false,
            ToggleOperand::On => true,
            ToggleOperand::SameAsInherited => inherited,
            ToggleOperand::InvertInherited => !inherited,
        }
    }

    pub const fn is_relative(self) -> bool {
        matches!(
            self,
            ToggleOperand::SameAsInherited | ToggleOperand::InvertInherited
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrpprlError {
    #[error("truncated sprm at offset {offset}")]
    TruncatedSprm { offset: usize },
    #[error(
        "operand of sprm {sprm:#06X} at offset {offset} needs {needed} bytes but only {available} remain"
    )]
    TruncatedOperand {
        offset: usize,
        sprm: u16,
        needed: usize,
        available: usize,
    },
    #[error("sprm {sprm:#06X} at offset {offset} declares an invalid operand length")]
    InvalidOperandLength { offset: usize, sprm: u16 },
}

/// Decode a grpprl that must consume exactly `bytes.len()` bytes.
pub fn parse_grpprl(bytes: &[u8]) -> Result<Vec<Prl>, GrpprlError> {
    parse_grpprl_inner(bytes, false)
}

/// Decode a grpprl that may be followed by a single padding byte.
///
/// Paragraph property pages store `istd + grpprl` in a buffer whose size is always odd, so an
/// even-sized grpprl is followed by one byte of padding.
pub fn parse_grpprl_padded(bytes: &[u8]) -> Result<Vec<Prl>, GrpprlError> {
    parse_grpprl_inner(bytes, true)
}

fn parse_grpprl_inner(bytes: &[u8], allow_pad: bool) -> Result<Vec<Prl>, GrpprlError> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    while offset < bytes.len() {
        let remaining = bytes.len() - offset;
        if remaining < SPRM_LEN {
            if allow_pad && remaining == 1 {
                break;
            }
            return Err(GrpprlError::TruncatedSprm { offset });
        }

        let sprm = Sprm(u16::from_le_bytes([bytes[offset], bytes[offset + 1]]));
        let operand_start = offset + SPRM_LEN;
        let rest = &bytes[operand_start..];
        let len = operand_len(sprm, rest, offset)?;
        let operand = rest.get(..len).ok_or(GrpprlError::TruncatedOperand {
            offset,
            sprm: sprm.raw(),
            needed: len,
            available: rest.len(),
        })?;

        out.push(Prl::new(sprm, operand));
        offset = operand_start + len;
    }
    Ok(out)
}

/// Size in bytes of the operand that starts at `rest[0]`, including any length prefix.
fn operand_len(sprm: Sprm, rest: &[u8], offset: usize) -> Result<usize, GrpprlError> {
    let truncated = |needed: usize| GrpprlError::TruncatedOperand {
        offset,
        sprm: sprm.raw(),
        needed,
        available: rest.len(),
    };

    match sprm.operand_size() {
        OperandSize::Toggle => Ok(1),
        OperandSize::Fixed(n) => Ok(n),
        OperandSize::Variable if sprm == ids::T_DEF_TABLE => {
            let bytes = rest.get(0..2).ok_or_else(|| truncated(2))?;
            let cb = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
            if cb == 0 {
                return Err(GrpprlError::InvalidOperandLength {
                    offset,
                    sprm: sprm.raw(),
                });
            }
            // `cb` counts the remainder plus one.
            Ok(2 + cb - 1)
        }
        OperandSize::Variable if sprm == ids::P_CHG_TABS => {
            let cb = *rest.first().ok_or_else(|| truncated(1))?;
            if cb != CHG_TABS_COMPUTED_SIZE {
                return Ok(1 + cb as usize);
            }
            // PChgTabsDelClose: cTabs, rgdxaDel[cTabs], rgdxaClose[cTabs].
            let del = *rest.get(1).ok_or_else(|| truncated(2))? as usize;
            let add_at = 2 + del * 4;
            // PChgTabsAdd: cTabs, rgdxaAdd[cTabs], rgtbdAdd[cTabs].
            let add = *rest.get(add_at).ok_or_else(|| truncated(add_at + 1))? as usize;
            Ok(add_at + 1 + add * 3)
        }
        OperandSize::Variable => {
            let cb = *rest.first().ok_or_else(|| truncated(1))?;
            Ok(1 + cb as usize)
        }
    }
}
