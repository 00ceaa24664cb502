//! Document properties (`DOP`).
//!
//! Only the leading `DopBase` fields are interpreted; the rest is kept as raw bytes.

use crate::word::{read_u16, read_u8};
use crate::DocError;

const FLAG_FACING_PAGES: u8 = 0x01;
// Documented as unused by later revisions of the format; Word 97 writes widow control here.
const FLAG_WIDOW_CONTROL: u8 = 0x02;
const FLAG_PMH_MAIN_DOC: u8 = 0x04;
const DXA_TAB_OFFSET: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dop {
    raw: Vec<u8>,
}

impl Dop {
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, DocError> {
        if bytes.is_empty() {
            return Err(DocError::corrupted("DOP", "empty document properties"));
        }
        Ok(Self {
            raw: bytes.to_vec(),
        })
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    fn flags(&self) -> u8 {
        read_u8(&self.raw, 0).unwrap_or(0)
    }

    pub fn facing_pages(&self) -> bool {
        self.flags() & FLAG_FACING_PAGES != 0
    }

    pub fn widow_control(&self) -> bool {
        self.flags() & FLAG_WIDOW_CONTROL != 0
    }

    /// The document is the main document of a mail merge.
    pub fn pmh_main_doc(&self) -> bool {
        self.flags() & FLAG_PMH_MAIN_DOC != 0
    }

    /// Default tab stop width in twips.
    pub fn default_tab_width(&self) -> Option<u16> {
        read_u16(&self.raw, DXA_TAB_OFFSET)
    }
}
