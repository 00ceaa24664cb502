//! CLX: the piece table container stored in the table stream.
//!
//! ```text
//! Clx    = Prc* Pcdt
//! Prc    = clxt (0x01) | cbGrpprl: i16 | grpprl[cbGrpprl]
//! Pcdt   = clxt (0x02) | lcb: u32 | PlcPcd[lcb]
//! PlcPcd = aCp[n + 1]: u32 | aPcd[n]: 8 bytes
//! Pcd    = flags: u16 | FcCompressed: u32 | Prm: u16
//! ```

use binoffice_sprm::{parse_grpprl, Prl};

use crate::word::plc::Plc;
use crate::word::{read_i16, read_u16, read_u32, read_u8, slice_at};
use crate::DocError;

const STRUCTURE: &str = "CLX";

const CLXT_PRC: u8 = 0x01;
const CLXT_PCDT: u8 = 0x02;
const MAX_CB_GRPPRL: i16 = 0x3FA2;

const PCD_SIZE: usize = 8;
const PCD_NO_PARA_LAST: u16 = 0x0001;
const FC_MASK: u32 = 0x3FFF_FFFF;
const FC_COMPRESSED: u32 = 0x4000_0000;

/// One piece descriptor as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pcd {
    pub(crate) no_para_last: bool,
    /// Raw `fc`. For compressed pieces the byte offset is `fc / 2`.
    pub(crate) fc: u32,
    pub(crate) compressed: bool,
    pub(crate) prm: u16,
}

impl Pcd {
    fn decode(bytes: &[u8]) -> Result<Self, DocError> {
        let truncated = || DocError::corrupted(STRUCTURE, "truncated PCD");
        let flags = read_u16(bytes, 0).ok_or_else(truncated)?;
        let fc_compressed = read_u32(bytes, 2).ok_or_else(truncated)?;
        let prm = read_u16(bytes, 6).ok_or_else(truncated)?;
        Ok(Self {
            no_para_last: flags & PCD_NO_PARA_LAST != 0,
            fc: fc_compressed & FC_MASK,
            compressed: fc_compressed & FC_COMPRESSED != 0,
            prm,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Clx {
    /// Decoded `Prc` grpprls, indexed by `Prm1.igrpprl`.
    pub(crate) groups: Vec<Vec<Prl>>,
    pub(crate) pieces: Plc<Pcd>,
}

impl Clx {
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, DocError> {
        let mut groups = Vec::new();
        let mut offset = 0usize;

        loop {
            let clxt = read_u8(bytes, offset).ok_or_else(|| {
                DocError::corrupted(STRUCTURE, format!("no Pcdt before end ({} bytes)", bytes.len()))
            })?;
            match clxt {
                CLXT_PRC => {
                    let cb = read_i16(bytes, offset + 1)
                        .ok_or_else(|| DocError::corrupted(STRUCTURE, "truncated Prc header"))?;
                    if !(0..=MAX_CB_GRPPRL).contains(&cb) {
                        return Err(DocError::corrupted(
                            STRUCTURE,
                            format!("Prc at offset {offset} has invalid cbGrpprl {cb}"),
                        ));
                    }
                    let cb = cb as usize;
                    let raw = slice_at(bytes, offset + 3, cb).ok_or_else(|| {
                        DocError::corrupted(
                            STRUCTURE,
                            format!("Prc at offset {offset} extends past end"),
                        )
                    })?;
                    let prls = parse_grpprl(raw).map_err(|err| {
                        DocError::corrupted(STRUCTURE, format!("Prc {}: {err}", groups.len()))
                    })?;
                    groups.push(prls);
                    offset += 3 + cb;
                }
                CLXT_PCDT => {
                    let lcb = read_u32(bytes, offset + 1)
                        .ok_or_else(|| DocError::corrupted(STRUCTURE, "truncated Pcdt header"))?
                        as usize;
                    let plc_start = offset + 5;
                    let plc = slice_at(bytes, plc_start, lcb).ok_or_else(|| {
                        DocError::corrupted(
                            STRUCTURE,
                            format!("PlcPcd of {lcb} bytes extends past end"),
                        )
                    })?;
                    let trailing = bytes.len() - (plc_start + lcb);
                    if trailing != 0 {
                        return Err(DocError::corrupted(
                            STRUCTURE,
                            format!("{trailing} trailing bytes after Pcdt"),
                        ));
                    }
                    let pieces = Plc::parse(plc, PCD_SIZE, "PlcPcd", Pcd::decode)?;
                    return Ok(Self { groups, pieces });
                }
                other => {
                    return Err(DocError::corrupted(
                        STRUCTURE,
                        format!("unexpected clxt {other:#04x} at offset {offset}"),
                    ));
                }
            }
        }
    }
}
