//! Composition of default, style and direct properties.
//!
//! Merge policy: the last entry for a given sprm wins, and the merged list keeps winners in the
//! order they were applied. Toggle operands that are relative to the inherited value
//! (`0x80`/`0x81`) are resolved in every layer against what earlier entries accumulated, with
//! "off" as the starting value. Table-context precedence and list numbering are not applied.

use std::collections::HashMap;

use binoffice_sprm::{Prl, Sprm, ToggleOperand};

/// Properties that apply at one position, grouped by source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyCascade {
    pub defaults: Vec<Prl>,
    pub style: Vec<Prl>,
    pub direct: Vec<Prl>,
}

impl PropertyCascade {
    /// Every entry in application order: defaults, style chain, direct.
    pub fn layered(&self) -> Vec<Prl> {
        self.defaults
            .iter()
            .chain(&self.style)
            .chain(&self.direct)
            .cloned()
            .collect()
    }

    /// The effective properties under last-wins merging.
    pub fn merged(&self) -> Vec<Prl> {
        merge_last_wins(self.layered())
    }
}

pub(crate) fn merge_last_wins(prls: Vec<Prl>) -> Vec<Prl> {
    let mut winners: HashMap<Sprm, usize> = HashMap::new();
    let mut resolved = Vec::with_capacity(prls.len());

    for (position, mut prl) in prls.into_iter().enumerate() {
        if let Some(toggle) = prl.toggle().filter(|t| t.is_relative()) {
            let inherited = winners
                .get(&prl.sprm)
                .and_then(|&at: &usize| resolved.get(at))
                .and_then(|earlier: &Prl| earlier.toggle())
                .map(|earlier| earlier == ToggleOperand::On)
                .unwrap_or(false);
            prl.operand = vec![u8::from(toggle.apply(inherited))];
        }
        winners.insert(prl.sprm, position);
        resolved.push(prl);
    }

    resolved
        .into_iter()
        .enumerate()
        .filter(|(position, prl)| winners.get(&prl.sprm) == Some(position))
        .map(|(_, prl)| prl)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use binoffice_sprm::ids;
    use pretty_assertions::assert_eq;

    #[test]
    fn later_layers_override_earlier_ones() {
        let cascade = PropertyCascade {
            defaults: vec![Prl::new(ids::C_RG_FTC0, vec![4, 0])],
            style: vec![
                Prl::new(ids::C_HPS, vec![24, 0]),
                Prl::new(ids::C_F_ITALIC, vec![1]),
            ],
            direct: vec![Prl::new(ids::C_HPS, vec![32, 0])],
        };
        assert_eq!(cascade.layered().len(), 4);
        assert_eq!(
            cascade.merged(),
            vec![
                Prl::new(ids::C_RG_FTC0, vec![4, 0]),
                Prl::new(ids::C_F_ITALIC, vec![1]),
                Prl::new(ids::C_HPS, vec![32, 0]),
            ]
        );
    }

    #[test]
    fn relative_toggles_resolve_against_inherited_value() {
        let cascade = PropertyCascade {
            defaults: vec![],
            style: vec![Prl::new(ids::C_F_BOLD, vec![1])],
            direct: vec![
                Prl::new(ids::C_F_BOLD, vec![0x81]),
                Prl::new(ids::C_F_ITALIC, vec![0x81]),
                Prl::new(ids::C_F_STRIKE, vec![0x80]),
            ],
        };
        assert_eq!(
            cascade.merged(),
            vec![
                Prl::new(ids::C_F_BOLD, vec![0]),
                Prl::new(ids::C_F_ITALIC, vec![1]),
                Prl::new(ids::C_F_STRIKE, vec![0]),
            ]
        );
    }

    #[test]
    fn relative_toggles_in_styles_chain_through_to_direct() {
        // A derived style inverts its base's bold; direct formatting inverts it back.
        let cascade = PropertyCascade {
            defaults: vec![],
            style: vec![
                Prl::new(ids::C_F_BOLD, vec![1]),
                Prl::new(ids::C_F_BOLD, vec![0x81]),
                Prl::new(ids::C_F_CAPS, vec![0x80]),
            ],
            direct: vec![Prl::new(ids::C_F_BOLD, vec![0x81])],
        };
        assert_eq!(
            cascade.merged(),
            vec![
                Prl::new(ids::C_F_CAPS, vec![0]),
                Prl::new(ids::C_F_BOLD, vec![1]),
            ]
        );

        let style_only = PropertyCascade {
            direct: vec![],
            ..cascade
        };
        assert_eq!(
            style_only.merged(),
            vec![
                Prl::new(ids::C_F_BOLD, vec![0]),
                Prl::new(ids::C_F_CAPS, vec![0]),
            ]
        );
    }
}
