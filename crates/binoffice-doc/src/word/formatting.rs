//! Direct formatting: the property runs stored in FKPs plus piece-level overrides.

use binoffice_sprm::{Prl, SprmScope};

use crate::word::fkp::{ChpxFkp, PropertyTable};
use crate::word::paragraphs::BoundaryResolver;
use crate::word::piece_table::{Piece, PieceOverride, PieceTable};
use crate::{Cp, DocError};

/// Direct paragraph properties of one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectParagraph {
    pub(crate) istd: u16,
    pub(crate) prls: Vec<Prl>,
}

/// Append the part of `piece`'s override that applies to `scope`.
pub(crate) fn apply_piece_override(
    piece: &Piece,
    groups: &[Vec<Prl>],
    scope: SprmScope,
    prls: &mut Vec<Prl>,
) -> Result<(), DocError> {
    match piece.prm {
        PieceOverride::Inline { isprm, operand } => match piece.prm.inline_prl() {
            Some(prl) if prl.scope() == scope => prls.push(prl),
            Some(_) => {}
            None if isprm != 0 || operand != 0 => {
                log::debug!("ignoring inline piece override with unknown isprm {isprm:#04x}");
            }
            None => {}
        },
        PieceOverride::Indexed { group } => {
            let entries = groups.get(group as usize).ok_or_else(|| {
                DocError::corrupted(
                    "piece override",
                    format!(
                        "group index {group} is out of range ({} groups)",
                        groups.len()
                    ),
                )
            })?;
            prls.extend(entries.iter().filter(|prl| prl.scope() == scope).cloned());
        }
    }
    Ok(())
}

pub(crate) fn direct_paragraph(
    resolver: &BoundaryResolver<'_>,
    cp: Cp,
) -> Result<DirectParagraph, DocError> {
    let end = resolver.end_of(cp)?;
    let mut prls = end.run.prls;
    let piece = &resolver.pieces.pieces()[end.piece];
    apply_piece_override(
        piece,
        resolver.pieces.groups(),
        SprmScope::Paragraph,
        &mut prls,
    )?;
    Ok(DirectParagraph {
        istd: end.run.istd,
        prls,
    })
}

pub(crate) fn direct_character(
    word: &[u8],
    pieces: &PieceTable,
    chpx: &PropertyTable<ChpxFkp>,
    cp: Cp,
) -> Result<Vec<Prl>, DocError> {
    let (index, fc) = pieces.resolve(cp)?;
    let hit = chpx.lookup(word, fc)?.ok_or_else(|| {
        DocError::corrupted(
            "character properties",
            format!("no character run covers offset {fc} (cp {cp})"),
        )
    })?;
    let mut prls = hit.run.prls;
    apply_piece_override(
        &pieces.pieces()[index],
        pieces.groups(),
        SprmScope::Character,
        &mut prls,
    )?;
    Ok(prls)
}
