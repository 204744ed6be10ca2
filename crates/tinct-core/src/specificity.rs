//! Rule Specificity
//!
//! Fixed-tier ordering key deciding which of several matching rules wins.
//! Serialized as a five element array indexed by tier.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Specificity vector `[Order, ClassName, Important, Inline, PseudoElements]`.
///
/// Tiers are compared in the order `important`, `inline`, `pseudo_elements`,
/// `class_name`, `order`, each ascending. `order` is assigned once at compile
/// time from source position and never recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 5]", into = "[u32; 5]")]
pub struct Specificity {
    pub order: u32,
    pub class_name: u32,
    pub important: u32,
    pub inline: u32,
    pub pseudo_elements: u32,
}

impl Specificity {
    pub const ORDER: usize = 0;
    pub const CLASS_NAME: usize = 1;
    pub const IMPORTANT: usize = 2;
    pub const INLINE: usize = 3;
    pub const PSEUDO_ELEMENTS: usize = 4;

    /// Zero specificity, used by synthesized container placeholder rules
    pub const ZERO: Specificity = Specificity {
        order: 0,
        class_name: 0,
        important: 0,
        inline: 0,
        pseudo_elements: 0,
    };

    /// Specificity of a rule at the given source position
    pub fn with_order(order: u32) -> Self {
        Self { order, ..Self::ZERO }
    }

    /// Specificity of an element's inline style
    pub fn inline() -> Self {
        Self { inline: 1, ..Self::ZERO }
    }

    pub fn is_important(&self) -> bool {
        self.important > 0
    }

    /// Add another specificity to this one.
    ///
    /// Every tier except `order` is additive.
    pub fn add(&mut self, other: Specificity) {
        self.class_name += other.class_name;
        self.important += other.important;
        self.inline += other.inline;
        self.pseudo_elements += other.pseudo_elements;
    }

    /// Tier value by vector index
    pub fn get(&self, index: usize) -> u32 {
        <[u32; 5]>::from(*self).get(index).copied().unwrap_or(0)
    }
}

impl From<[u32; 5]> for Specificity {
    fn from(tiers: [u32; 5]) -> Self {
        Self {
            order: tiers[Self::ORDER],
            class_name: tiers[Self::CLASS_NAME],
            important: tiers[Self::IMPORTANT],
            inline: tiers[Self::INLINE],
            pseudo_elements: tiers[Self::PSEUDO_ELEMENTS],
        }
    }
}

impl From<Specificity> for [u32; 5] {
    fn from(s: Specificity) -> Self {
        [s.order, s.class_name, s.important, s.inline, s.pseudo_elements]
    }
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.important
            .cmp(&other.important)
            .then(self.inline.cmp(&other.inline))
            .then(self.pseudo_elements.cmp(&other.pseudo_elements))
            .then(self.class_name.cmp(&other.class_name))
            .then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
