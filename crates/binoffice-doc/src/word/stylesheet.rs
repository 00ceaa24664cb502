//! Style sheet (`STSH`) and style inheritance.
//!
//! ```text
//! STSH  = cbStshi: u16 | STSHI[cbStshi] | LPStd*
//! LPStd = cbStd: u16 | STD[cbStd]            (cbStd == 0: empty slot)
//! STD   = StdfBase (10 bytes) [StdfPost2000] | xstzName | LPUpx*
//! LPUpx = cbUpx: u16 | UPX[cbUpx] | pad to even
//! ```

use std::collections::HashSet;

use binoffice_sprm::{ids, parse_grpprl, Prl};

use crate::word::text::read_xst;
use crate::word::{read_u16, slice_at};
use crate::DocError;

const STRUCTURE: &str = "STSH";

/// `istdBase` value meaning "no base style".
pub const ISTD_NIL: u16 = 0x0FFF;

const STSHI_MIN_LEN: usize = 18;
const STSHI_FTC_BI_END: usize = 20;
const STDF_BASE_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
    Unknown(u8),
}

impl StyleKind {
    fn from_stk(stk: u8) -> Self {
        match stk {
            1 => StyleKind::Paragraph,
            2 => StyleKind::Character,
            3 => StyleKind::Table,
            4 => StyleKind::Numbering,
            other => StyleKind::Unknown(other),
        }
    }
}

/// Fixed header of the style sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheetInfo {
    pub cstd: u16,
    pub cb_std_base: u16,
    pub names_written: bool,
    pub sti_max_when_saved: u16,
    pub istd_max_fixed_when_saved: u16,
    pub built_in_names_version: u16,
    /// Default fonts for ASCII, East Asian and other text (`rgftcStandardChpStsh`).
    pub default_fonts: [u16; 3],
    pub ftc_bi: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub istd: u16,
    /// Built-in style identifier.
    pub sti: u16,
    pub kind: StyleKind,
    pub base: Option<u16>,
    pub next: u16,
    pub name: String,
    pub paragraph: Option<Vec<Prl>>,
    pub character: Option<Vec<Prl>>,
    pub table: Option<Vec<Prl>>,
}

impl Style {
    /// This style's own property lists in application order.
    pub fn own_prls(&self) -> Vec<Prl> {
        let bundles = match self.kind {
            StyleKind::Paragraph => vec![&self.character, &self.paragraph],
            StyleKind::Character => vec![&self.character],
            StyleKind::Table => vec![&self.character, &self.paragraph, &self.table],
            StyleKind::Numbering => vec![&self.paragraph],
            StyleKind::Unknown(_) => Vec::new(),
        };
        bundles.into_iter().flatten().flatten().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    pub info: StyleSheetInfo,
    styles: Vec<Option<Style>>,
}

impl StyleSheet {
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, DocError> {
        let cb_stshi = read_u16(bytes, 0)
            .ok_or_else(|| DocError::corrupted(STRUCTURE, "truncated cbStshi"))?
            as usize;
        let stshi = slice_at(bytes, 2, cb_stshi)
            .ok_or_else(|| DocError::corrupted(STRUCTURE, "STSHI extends past end"))?;
        if cb_stshi < STSHI_MIN_LEN {
            return Err(DocError::corrupted(
                STRUCTURE,
                format!("STSHI is {cb_stshi} bytes, need at least {STSHI_MIN_LEN}"),
            ));
        }
        let w = |offset: usize| read_u16(stshi, offset).unwrap_or(0);
        let info = StyleSheetInfo {
            cstd: w(0),
            cb_std_base: w(2),
            names_written: w(4) & 0x0001 != 0,
            sti_max_when_saved: w(6),
            istd_max_fixed_when_saved: w(8),
            built_in_names_version: w(10),
            default_fonts: [w(12), w(14), w(16)],
            ftc_bi: (cb_stshi >= STSHI_FTC_BI_END).then(|| w(18)),
        };
        if (info.cb_std_base as usize) < STDF_BASE_LEN {
            return Err(DocError::corrupted(
                STRUCTURE,
                format!("cbSTDBaseInFile {} is smaller than StdfBase", info.cb_std_base),
            ));
        }

        let mut styles = Vec::with_capacity(info.cstd as usize);
        let mut offset = 2 + cb_stshi;
        for istd in 0..info.cstd {
            let cb_std = read_u16(bytes, offset).ok_or_else(|| {
                DocError::corrupted(STRUCTURE, format!("missing LPStd for style {istd}"))
            })? as usize;
            offset += 2;
            if cb_std == 0 {
                styles.push(None);
                continue;
            }
            let std = slice_at(bytes, offset, cb_std).ok_or_else(|| {
                DocError::corrupted(STRUCTURE, format!("STD {istd} extends past end"))
            })?;
            styles.push(Some(parse_std(std, istd, info.cb_std_base as usize)?));
            offset += cb_std;
        }

        Ok(Self { info, styles })
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style at `istd`, or `None` for an out-of-range index or empty slot.
    pub fn style(&self, istd: u16) -> Option<&Style> {
        self.styles.get(istd as usize)?.as_ref()
    }

    pub fn styles(&self) -> impl Iterator<Item = &Style> + '_ {
        self.styles.iter().flatten()
    }

    pub fn style_by_name(&self, name: &str) -> Option<&Style> {
        self.styles().find(|style| style.name == name)
    }

    /// Property lists of `istd` and its base chain, base first.
    ///
    /// `max_depth` bounds the number of base-style hops. A missing base, a cycle, or a chain
    /// longer than `max_depth` is corruption.
    pub fn resolve(&self, istd: u16, max_depth: usize) -> Result<Vec<Prl>, DocError> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = istd;
        loop {
            let style = self.style(current).ok_or_else(|| {
                DocError::corrupted(STRUCTURE, format!("style {current} does not exist"))
            })?;
            if !visited.insert(current) {
                return Err(DocError::corrupted(
                    STRUCTURE,
                    format!("style {istd} has a cyclic base chain through {current}"),
                ));
            }
            chain.push(style);
            match style.base {
                None => break,
                Some(base) => {
                    if chain.len() > max_depth {
                        return Err(DocError::corrupted(
                            STRUCTURE,
                            format!("style {istd} inherits through more than {max_depth} bases"),
                        ));
                    }
                    current = base;
                }
            }
        }
        Ok(chain.iter().rev().flat_map(|style| style.own_prls()).collect())
    }

    /// The document-wide character defaults expressed as font sprms.
    pub fn default_character_prls(&self) -> Vec<Prl> {
        [ids::C_RG_FTC0, ids::C_RG_FTC1, ids::C_RG_FTC2]
            .into_iter()
            .zip(self.info.default_fonts)
            .map(|(sprm, ftc)| Prl::new(sprm, ftc.to_le_bytes()))
            .collect()
    }
}

fn parse_std(std: &[u8], istd: u16, cb_base: usize) -> Result<Style, DocError> {
    let truncated = || DocError::corrupted(STRUCTURE, format!("STD {istd} is truncated"));
    let w0 = read_u16(std, 0).ok_or_else(truncated)?;
    let w1 = read_u16(std, 2).ok_or_else(truncated)?;
    let w2 = read_u16(std, 4).ok_or_else(truncated)?;

    let kind = StyleKind::from_stk((w1 & 0x000F) as u8);
    let base = match w1 >> 4 {
        ISTD_NIL => None,
        other => Some(other),
    };
    let cupx = (w2 & 0x000F) as usize;

    let (name, name_len) = read_xst(std, cb_base, STRUCTURE)?;
    // xstzName carries a trailing NUL code unit.
    let mut offset = cb_base + name_len + 2;
    if offset > std.len() {
        return Err(truncated());
    }

    let mut upxs = Vec::with_capacity(cupx);
    for i in 0..cupx {
        let cb_upx = read_u16(std, offset).ok_or_else(|| {
            DocError::corrupted(STRUCTURE, format!("STD {istd} UPX {i} is truncated"))
        })? as usize;
        let upx = slice_at(std, offset + 2, cb_upx).ok_or_else(|| {
            DocError::corrupted(STRUCTURE, format!("STD {istd} UPX {i} extends past end"))
        })?;
        upxs.push(upx);
        offset += 2 + cb_upx + (cb_upx & 1);
    }

    let grpprl = |upx: &[u8]| {
        parse_grpprl(upx).map_err(|err| {
            DocError::corrupted(STRUCTURE, format!("style {istd} ({name}): {err}"))
        })
    };
    // UpxPapx starts with the istd it belongs to.
    let papx = |upx: &[u8]| grpprl(upx.get(2..).unwrap_or_default());

    let mut style = Style {
        istd,
        sti: w0 & 0x0FFF,
        kind,
        base,
        next: w2 >> 4,
        name: String::new(),
        paragraph: None,
        character: None,
        table: None,
    };
    let mut upxs = upxs.into_iter();
    match kind {
        StyleKind::Paragraph => {
            style.paragraph = upxs.next().map(papx).transpose()?;
            style.character = upxs.next().map(grpprl).transpose()?;
        }
        StyleKind::Character => {
            style.character = upxs.next().map(grpprl).transpose()?;
        }
        StyleKind::Table => {
            style.table = upxs.next().map(grpprl).transpose()?;
            style.paragraph = upxs.next().map(papx).transpose()?;
            style.character = upxs.next().map(grpprl).transpose()?;
        }
        StyleKind::Numbering => {
            style.paragraph = upxs.next().map(papx).transpose()?;
        }
        StyleKind::Unknown(stk) => {
            log::debug!("style {istd} has unknown kind {stk}; ignoring its properties");
        }
    }
    style.name = name;
    Ok(style)
}
