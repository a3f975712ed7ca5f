//! Gallery category filter with show/hide transitions.

use std::time::Duration;

use tokio::time::Instant;

use super::MotionPreference;
use crate::input::{
    NodeId,
    Page,
};

pub const SHOW_ALL: &str = "all";
const SHOW_CLASS: &str = "filter-show";
const SHOW_ACTIVE_CLASS: &str = "filter-show-active";
const HIDING_CLASS: &str = "filter-hiding";
/// Extra time a show transition gets before settling.
const SHOW_GRACE: Duration = Duration::from_millis(50);

/// Direction of a card transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Show,
    Hide,
}

/// A transition that settles at `due`.
#[derive(Debug, Clone, Copy)]
struct Pending {
    /// Card being animated.
    card: NodeId,
    /// Whether the card is appearing or leaving.
    transition: Transition,
    /// When the transition settles.
    due: Instant,
}

/// `.gallery-filter` buttons and the `.gallery .card`s they filter.
#[derive(Debug, Clone)]
pub struct GalleryFilter {
    /// Filter buttons in document order.
    buttons: Vec<NodeId>,
    /// Cards in document order.
    cards: Vec<NodeId>,
    /// Reduced motion skips transitions.
    motion: MotionPreference,
    /// Length of one filter transition.
    duration: Duration,
    /// Transitions not yet settled.
    pending: Vec<Pending>,
}

impl GalleryFilter {
    /// Shows every card without animation. Returns `None` when the page has no buttons or
    /// no cards.
    pub fn init(page: &mut Page, motion: MotionPreference, duration: Duration) -> Option<Self> {
        let buttons = page.with_class("gallery-filter");
        let mut cards: Vec<NodeId> = page
            .with_class("gallery")
            .into_iter()
            .flat_map(|gallery| page.with_class_in(gallery, "card"))
            .collect();
        cards.sort_unstable();
        cards.dedup();
        if buttons.is_empty() || cards.is_empty() {
            return None;
        }

        let filter = Self { buttons, cards, motion, duration, pending: Vec::new() };
        for &card in &filter.cards {
            set_visible_immediate(page, card, true);
        }
        Some(filter)
    }

    /// The filter button at or around `node`.
    #[must_use]
    pub fn button_at(&self, page: &Page, node: NodeId) -> Option<NodeId> {
        self.buttons.iter().copied().find(|&button| page.contains(button, node))
    }

    /// Activates `button`; returns `false` when it was already active.
    pub fn select(&mut self, page: &mut Page, button: NodeId, now: Instant) -> bool {
        if page.has_class(button, "active") {
            return false;
        }
        for &other in &self.buttons {
            page.remove_class(other, "active");
        }
        page.add_class(button, "active");

        let value = page.data(button, "filter").unwrap_or(SHOW_ALL).to_string();
        tracing::debug!("Filtering gallery by '{}'", value);
        self.apply(page, &value, now);
        true
    }

    /// Selects the button whose `data-filter` is `value`.
    pub fn select_value(&mut self, page: &mut Page, value: &str, now: Instant) -> bool {
        let Some(button) =
            self.buttons.iter().copied().find(|&button| page.data(button, "filter") == Some(value))
        else {
            tracing::debug!("No gallery filter button for '{}'", value);
            return false;
        };
        self.select(page, button, now)
    }

    fn apply(&mut self, page: &mut Page, value: &str, now: Instant) {
        for card in self.cards.clone() {
            let matches = value == SHOW_ALL
                || page
                    .data(card, "category")
                    .is_some_and(|raw| raw.split_whitespace().any(|category| category == value));
            if matches {
                self.show(page, card, now);
            } else {
                self.hide(page, card, now);
            }
        }
    }

    fn show(&mut self, page: &mut Page, card: NodeId, now: Instant) {
        if self.motion.is_reduced() {
            set_visible_immediate(page, card, true);
            return;
        }
        if page.data(card, "visible") == Some("true") {
            return;
        }

        page.set_style(card, "display", "");
        page.set_attr(card, "aria-hidden", "false");
        page.set_data(card, "visible", "true");
        page.remove_class(card, HIDING_CLASS);
        page.add_class(card, SHOW_CLASS);
        page.add_class(card, SHOW_ACTIVE_CLASS);
        self.pending.push(Pending {
            card,
            transition: Transition::Show,
            due: now + self.duration + SHOW_GRACE,
        });
    }

    fn hide(&mut self, page: &mut Page, card: NodeId, now: Instant) {
        if self.motion.is_reduced() {
            set_visible_immediate(page, card, false);
            return;
        }
        let shown = page.data(card, "visible") == Some("true");
        if !shown && page.style(card, "display") == Some("none") {
            return;
        }

        page.set_data(card, "visible", "false");
        page.remove_class(card, SHOW_CLASS);
        page.remove_class(card, SHOW_ACTIVE_CLASS);
        page.add_class(card, HIDING_CLASS);
        page.set_attr(card, "aria-hidden", "true");
        self.pending.push(Pending { card, transition: Transition::Hide, due: now + self.duration });
    }

    /// Settles every transition due at `now`.
    pub fn settle(&mut self, page: &mut Page, now: Instant) {
        let (due, waiting): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|pending| pending.due <= now);
        self.pending = waiting;
        for pending in due {
            settle_one(page, pending);
        }
    }

    /// Settles every pending transition immediately.
    pub fn flush(&mut self, page: &mut Page) {
        let mut pending = std::mem::take(&mut self.pending);
        pending.sort_by_key(|pending| pending.due);
        for pending in pending {
            settle_one(page, pending);
        }
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|pending| pending.due).min()
    }

    #[must_use]
    pub fn cards(&self) -> &[NodeId] {
        &self.cards
    }

    /// Cards currently meant to be visible.
    #[must_use]
    pub fn visible_cards(&self, page: &Page) -> Vec<NodeId> {
        self.cards
            .iter()
            .copied()
            .filter(|&card| page.data(card, "visible") == Some("true"))
            .collect()
    }
}

fn settle_one(page: &mut Page, pending: Pending) {
    match pending.transition {
        Transition::Show => {
            page.remove_class(pending.card, SHOW_CLASS);
            page.remove_class(pending.card, SHOW_ACTIVE_CLASS);
        }
        Transition::Hide => {
            if page.data(pending.card, "visible") == Some("false") {
                page.set_style(pending.card, "display", "none");
            }
            page.remove_class(pending.card, HIDING_CLASS);
        }
    }
}

fn set_visible_immediate(page: &mut Page, card: NodeId, visible: bool) {
    page.set_data(card, "visible", if visible { "true" } else { "false" });
    page.set_style(card, "display", if visible { "" } else { "none" });
    page.set_attr(card, "aria-hidden", if visible { "false" } else { "true" });
    for class in [HIDING_CLASS, SHOW_CLASS, SHOW_ACTIVE_CLASS] {
        page.remove_class(card, class);
    }
}
