//! The running page: document, localization, storage and effects in one context.

use tokio::time::Instant;

use crate::config::SiteSettings;
use crate::effects::{
    Effects,
    Viewport,
};
use crate::i18n::{
    ApplyReport,
    I18nContext,
};
use crate::input::{
    NodeId,
    Page,
    Storage,
};
use crate::types::Locale;

/// What the environment tells the page at startup.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub viewport: Viewport,
    /// Preferred language reported by the environment, such as `es-ES`.
    pub locale_hint: Option<String>,
}

/// Whether an event changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Ignored,
}

impl Outcome {
    #[must_use]
    pub const fn from_handled(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Ignored }
    }

    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Page state threaded through every handler.
pub struct Site {
    /// The document being driven.
    page: Page,
    /// Localization state.
    i18n: I18nContext,
    /// Local storage holding the locale preference.
    storage: Box<dyn Storage>,
    /// Current window size and scroll position.
    viewport: Viewport,
    /// Initialized page effects.
    effects: Effects,
    /// Report of the last translation pass.
    last_report: ApplyReport,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("active", &self.i18n.active())
            .field("viewport", &self.viewport)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

impl Site {
    /// Localizes `page` for the initial locale and initializes every effect.
    pub fn start(
        mut page: Page,
        mut i18n: I18nContext,
        mut storage: Box<dyn Storage>,
        settings: &SiteSettings,
        environment: &Environment,
        now: Instant,
    ) -> Self {
        let hint = environment.locale_hint.as_deref();
        let last_report = i18n.init(&mut page, storage.as_mut(), hint);
        let effects = Effects::init(&mut page, &settings.effects, &environment.viewport, now);
        Self { page, i18n, storage, viewport: environment.viewport, effects, last_report }
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn into_page(self) -> Page {
        self.page
    }

    #[must_use]
    pub const fn active_locale(&self) -> Locale {
        self.i18n.active()
    }

    #[must_use]
    pub const fn i18n(&self) -> &I18nContext {
        &self.i18n
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub const fn effects(&self) -> &Effects {
        &self.effects
    }

    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Report of the most recent translation pass.
    #[must_use]
    pub const fn last_report(&self) -> &ApplyReport {
        &self.last_report
    }

    pub fn select_locale(&mut self, code: &str) -> Outcome {
        self.last_report = self.i18n.set_locale(&mut self.page, self.storage.as_mut(), code);
        Outcome::Handled
    }

    /// Routes a click on `target` to the control containing it.
    pub fn click(&mut self, target: NodeId, now: Instant) -> Outcome {
        let control_class = &self.i18n.translator().bindings().control_class;
        if let Some(control) = self.page.closest_with_class(target, control_class) {
            return match self.i18n.select_control(&mut self.page, self.storage.as_mut(), control) {
                Some(report) => {
                    self.last_report = report;
                    Outcome::Handled
                }
                None => Outcome::Ignored,
            };
        }

        let routed = self
            .click_drawer(target)
            .or_else(|| self.click_carousel(target))
            .or_else(|| self.click_gallery(target, now))
            .or_else(|| self.click_lightbox(target))
            .or_else(|| self.click_scroll_top(target));
        routed.unwrap_or_else(|| {
            tracing::trace!("Click on {:?} reached no control", target);
            Outcome::Ignored
        })
    }

    /// Menu button toggles; backdrop and drawer links close.
    fn click_drawer(&mut self, target: NodeId) -> Option<Outcome> {
        let drawer = self.effects.drawer?;
        if self.page.contains(drawer.button(), target) {
            drawer.toggle(&mut self.page);
            return Some(Outcome::Handled);
        }
        if self.page.contains(drawer.backdrop(), target)
            || drawer.is_drawer_link(&self.page, target)
        {
            drawer.close(&mut self.page);
            return Some(Outcome::Handled);
        }
        None
    }

    /// Arrows step the carousel; dots jump to their slide.
    fn click_carousel(&mut self, target: NodeId) -> Option<Outcome> {
        let index = self.effects.carousel_at(&self.page, target)?;
        let carousel = self.effects.carousels.get_mut(index)?;
        if carousel.is_prev_arrow(&self.page, target) {
            carousel.prev(&mut self.page);
        } else if carousel.is_next_arrow(&self.page, target) {
            carousel.next(&mut self.page);
        } else {
            let dot = carousel.dot_index(&self.page, target)?;
            carousel.set_active(&mut self.page, dot);
        }
        Some(Outcome::Handled)
    }

    /// Filter buttons select their category.
    fn click_gallery(&mut self, target: NodeId, now: Instant) -> Option<Outcome> {
        let gallery = self.effects.gallery.as_mut()?;
        let button = gallery.button_at(&self.page, target)?;
        Some(Outcome::from_handled(gallery.select(&mut self.page, button, now)))
    }

    /// Items open their lightbox; the close button and backdrop hide it.
    fn click_lightbox(&mut self, target: NodeId) -> Option<Outcome> {
        for lightbox in &self.effects.lightboxes {
            if let Some(item) = lightbox.item_at(&self.page, target) {
                lightbox.open(&mut self.page, item);
                return Some(Outcome::Handled);
            }
            if lightbox.is_close_button(&self.page, target) || lightbox.is_backdrop(target) {
                lightbox.hide(&mut self.page);
                return Some(Outcome::Handled);
            }
        }
        None
    }

    /// Scroll-to-top buttons jump to the top of the page.
    fn click_scroll_top(&mut self, target: NodeId) -> Option<Outcome> {
        let buttons = [
            self.effects.progress.map(|progress| progress.button()),
            self.effects.back_to_top.map(|button| button.button()),
        ];
        buttons
            .into_iter()
            .flatten()
            .any(|button| self.page.contains(button, target))
            .then(|| self.scroll(0.0))
    }

    pub fn open_menu(&mut self) -> Outcome {
        self.effects.drawer.map_or(Outcome::Ignored, |drawer| {
            drawer.open(&mut self.page);
            Outcome::Handled
        })
    }

    pub fn close_menu(&mut self) -> Outcome {
        self.effects.drawer.map_or(Outcome::Ignored, |drawer| {
            drawer.close(&mut self.page);
            Outcome::Handled
        })
    }

    pub fn toggle_menu(&mut self) -> Outcome {
        self.effects.drawer.map_or(Outcome::Ignored, |drawer| {
            drawer.toggle(&mut self.page);
            Outcome::Handled
        })
    }

    /// Escape closes the drawer and every lightbox.
    pub fn key_down(&mut self, key: &str) -> Outcome {
        if key != "Escape" {
            return Outcome::Ignored;
        }
        let menu = self.close_menu();
        for lightbox in &self.effects.lightboxes {
            lightbox.hide(&mut self.page);
        }
        Outcome::from_handled(menu.is_handled() || !self.effects.lightboxes.is_empty())
    }

    pub fn next_slide(&mut self, carousel: usize) -> Outcome {
        self.effects.carousels.get_mut(carousel).map_or(Outcome::Ignored, |carousel| {
            carousel.next(&mut self.page);
            Outcome::Handled
        })
    }

    pub fn prev_slide(&mut self, carousel: usize) -> Outcome {
        self.effects.carousels.get_mut(carousel).map_or(Outcome::Ignored, |carousel| {
            carousel.prev(&mut self.page);
            Outcome::Handled
        })
    }

    pub fn go_to_slide(&mut self, carousel: usize, index: usize) -> Outcome {
        match self.effects.carousels.get_mut(carousel) {
            Some(carousel) if index < carousel.len() => {
                carousel.set_active(&mut self.page, index);
                Outcome::Handled
            }
            _ => Outcome::Ignored,
        }
    }

    pub fn pointer_enter(&mut self, carousel: usize) -> Outcome {
        self.effects.carousels.get_mut(carousel).map_or(Outcome::Ignored, |carousel| {
            carousel.pause();
            Outcome::Handled
        })
    }

    pub fn pointer_leave(&mut self, carousel: usize, now: Instant) -> Outcome {
        self.effects.carousels.get_mut(carousel).map_or(Outcome::Ignored, |carousel| {
            carousel.resume(now);
            Outcome::Handled
        })
    }

    pub fn select_filter(&mut self, filter: &str, now: Instant) -> Outcome {
        self.effects.gallery.as_mut().map_or(Outcome::Ignored, |gallery| {
            Outcome::from_handled(gallery.select_value(&mut self.page, filter, now))
        })
    }

    pub fn open_lightbox(&mut self, item: NodeId) -> Outcome {
        for lightbox in &self.effects.lightboxes {
            if let Some(item) = lightbox.item_at(&self.page, item) {
                lightbox.open(&mut self.page, item);
                return Outcome::Handled;
            }
        }
        Outcome::Ignored
    }

    pub fn close_lightbox(&mut self) -> Outcome {
        let open: Vec<_> = self
            .effects
            .lightboxes
            .iter()
            .filter(|lightbox| lightbox.is_open(&self.page))
            .collect();
        for lightbox in &open {
            lightbox.hide(&mut self.page);
        }
        Outcome::from_handled(!open.is_empty())
    }

    pub fn scroll(&mut self, y: f64) -> Outcome {
        self.viewport.scroll_y = y.max(0.0);
        self.effects.on_scroll(&mut self.page, &self.viewport);
        Outcome::Handled
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Outcome {
        if !self.effects.parallax.follows_pointer() {
            return Outcome::Ignored;
        }
        self.effects.parallax.on_pointer(&mut self.page, &self.viewport, x, y);
        Outcome::Handled
    }

    pub fn resize(&mut self, width: f64, height: f64, scroll_height: Option<f64>) -> Outcome {
        self.viewport.width = width;
        self.viewport.height = height;
        if let Some(scroll_height) = scroll_height {
            self.viewport.scroll_height = scroll_height;
        }
        if let Some(progress) = &self.effects.progress {
            progress.update(&mut self.page, &self.viewport);
        }
        Outcome::Handled
    }

    pub fn intersect(&mut self, target: NodeId, ratio: f64) -> Outcome {
        Outcome::from_handled(self.effects.reveal.intersect(&mut self.page, target, ratio))
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.effects.next_deadline()
    }

    pub fn run_due(&mut self, now: Instant) {
        self.effects.run_due(&mut self.page, now);
    }

    /// Settles every pending transition.
    pub fn flush(&mut self) {
        self.effects.flush(&mut self.page);
    }
}
