//! Intent handler registry.

use std::collections::HashMap;

use tokio::time::Instant;

use super::intent::{
    Intent,
    IntentKind,
};
use super::site::{
    Outcome,
    Site,
};

/// Handles one intent against the site.
pub type Handler = fn(&mut Site, &Intent, Instant) -> Outcome;

/// Maps each intent kind to its handler.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    /// Registered handlers by kind.
    handlers: HashMap<IntentKind, Handler>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher with a handler for every intent kind.
    #[must_use]
    pub fn new() -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register(IntentKind::SelectLocale, select_locale);
        dispatcher.register(IntentKind::Click, click);
        dispatcher.register(IntentKind::ToggleMenu, |site, _, _| site.toggle_menu());
        dispatcher.register(IntentKind::OpenMenu, |site, _, _| site.open_menu());
        dispatcher.register(IntentKind::CloseMenu, |site, _, _| site.close_menu());
        dispatcher.register(IntentKind::KeyDown, key_down);
        dispatcher.register(IntentKind::NextSlide, navigate_slide);
        dispatcher.register(IntentKind::PrevSlide, navigate_slide);
        dispatcher.register(IntentKind::GoToSlide, navigate_slide);
        dispatcher.register(IntentKind::PointerEnter, hover_carousel);
        dispatcher.register(IntentKind::PointerLeave, hover_carousel);
        dispatcher.register(IntentKind::SelectFilter, select_filter);
        dispatcher.register(IntentKind::OpenLightbox, open_lightbox);
        dispatcher.register(IntentKind::CloseLightbox, |site, _, _| site.close_lightbox());
        dispatcher.register(IntentKind::Scroll, scroll);
        dispatcher.register(IntentKind::PointerMove, pointer_move);
        dispatcher.register(IntentKind::Resize, resize);
        dispatcher.register(IntentKind::Intersect, intersect);
        dispatcher
    }

    /// Dispatcher with no handlers; every intent is ignored.
    #[must_use]
    pub fn empty() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Registers `handler` for `kind`, returning the handler it replaces.
    pub fn register(&mut self, kind: IntentKind, handler: Handler) -> Option<Handler> {
        self.handlers.insert(kind, handler)
    }

    #[must_use]
    pub fn handles(&self, kind: IntentKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn dispatch(&self, site: &mut Site, intent: &Intent, now: Instant) -> Outcome {
        let Some(handler) = self.handlers.get(&intent.kind()) else {
            tracing::debug!("No handler registered for {:?}", intent.kind());
            return Outcome::Ignored;
        };
        let outcome = handler(site, intent, now);
        tracing::trace!(?intent, ?outcome, "Dispatched intent");
        outcome
    }
}

fn select_locale(site: &mut Site, intent: &Intent, _: Instant) -> Outcome {
    let Intent::SelectLocale { locale } = intent else {
        return Outcome::Ignored;
    };
    site.select_locale(locale)
}

fn click(site: &mut Site, intent: &Intent, now: Instant) -> Outcome {
    let Intent::Click { target } = intent else {
        return Outcome::Ignored;
    };
    site.click(*target, now)
}

fn key_down(site: &mut Site, intent: &Intent, _: Instant) -> Outcome {
    let Intent::KeyDown { key } = intent else {
        return Outcome::Ignored;
    };
    site.key_down(key)
}

fn navigate_slide(site: &mut Site, intent: &Intent, _: Instant) -> Outcome {
    match *intent {
        Intent::NextSlide { carousel } => site.next_slide(carousel),
        Intent::PrevSlide { carousel } => site.prev_slide(carousel),
        Intent::GoToSlide { carousel, index } => site.go_to_slide(carousel, index),
        _ => Outcome::Ignored,
    }
}

fn hover_carousel(site: &mut Site, intent: &Intent, now: Instant) -> Outcome {
    match *intent {
        Intent::PointerEnter { carousel } => site.pointer_enter(carousel),
        Intent::PointerLeave { carousel } => site.pointer_leave(carousel, now),
        _ => Outcome::Ignored,
    }
}

fn select_filter(site: &mut Site, intent: &Intent, now: Instant) -> Outcome {
    let Intent::SelectFilter { filter } = intent else {
        return Outcome::Ignored;
    };
    site.select_filter(filter, now)
}

fn open_lightbox(site: &mut Site, intent: &Intent, _: Instant) -> Outcome {
    let Intent::OpenLightbox { item } = intent else {
        return Outcome::Ignored;
    };
    site.open_lightbox(*item)
}

fn scroll(site: &mut Site, intent: &Intent, _: Instant) -> Outcome {
    let Intent::Scroll { y } = intent else {
        return Outcome::Ignored;
    };
    site.scroll(*y)
}

fn pointer_move(site: &mut Site, intent: &Intent, _: Instant) -> Outcome {
    let Intent::PointerMove { x, y } = intent else {
        return Outcome::Ignored;
    };
    site.pointer_move(*x, *y)
}

fn resize(site: &mut Site, intent: &Intent, _: Instant) -> Outcome {
    let Intent::Resize { width, height, scroll_height } = intent else {
        return Outcome::Ignored;
    };
    site.resize(*width, *height, *scroll_height)
}

fn intersect(site: &mut Site, intent: &Intent, _: Instant) -> Outcome {
    let Intent::Intersect { target, ratio } = intent else {
        return Outcome::Ignored;
    };
    site.intersect(*target, *ratio)
}
