//! Scroll-triggered reveal of `.reveal` elements.

use std::collections::BTreeSet;

use super::MotionPreference;
use crate::config::EffectsConfig;
use crate::input::{
    NodeId,
    Page,
};

pub const REVEAL_CLASS: &str = "reveal";
pub const REVEALED_CLASS: &str = "in";

/// Containers whose reveal elements appear one after another.
pub const STAGGER_GROUPS: [&str; 6] =
    ["hero-wrap", "about-content", "masonry", "case-hero", "case-grid", "case-sections"];

/// Reveal elements still waiting to intersect the viewport.
#[derive(Debug, Clone, Default)]
pub struct Reveal {
    /// Elements not yet revealed.
    observed: BTreeSet<NodeId>,
    /// Minimum visible ratio that counts as intersecting.
    threshold: f64,
}

impl Reveal {
    pub fn init(page: &mut Page, motion: MotionPreference, config: &EffectsConfig) -> Self {
        let elements = page.with_class(REVEAL_CLASS);
        if elements.is_empty() {
            return Self::default();
        }

        if motion.is_reduced() {
            for element in elements {
                page.add_class(element, REVEALED_CLASS);
            }
            return Self::default();
        }

        // Only the first container of each kind is staggered.
        for group in STAGGER_GROUPS {
            let Some(container) = page.first_with_class(group) else {
                continue;
            };
            let stagger = config.reveal_stagger_ms;
            let elements = page.with_class_in(container, REVEAL_CLASS);
            for (i, element) in elements.into_iter().enumerate() {
                let delay = (i as u64).saturating_mul(stagger);
                page.set_style(element, "transition-delay", &format!("{delay}ms"));
            }
        }

        Self { observed: elements.into_iter().collect(), threshold: config.reveal_threshold }
    }

    /// Handles an intersection report; returns whether `element` was revealed.
    pub fn intersect(&mut self, page: &mut Page, element: NodeId, ratio: f64) -> bool {
        if ratio <= 0.0 || ratio < self.threshold || !self.observed.remove(&element) {
            return false;
        }
        page.add_class(element, REVEALED_CLASS);
        true
    }

    #[must_use]
    pub fn is_observing(&self, element: NodeId) -> bool {
        self.observed.contains(&element)
    }

    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }
}
