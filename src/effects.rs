//! Page effects: reveal, parallax, drawer, carousel, lightbox, gallery filter,
//! scroll progress and skill meters.
//!
//! Effects are independent of each other and of the translator. Each one discovers its
//! elements once at startup and then reacts to explicit calls from the runtime.

pub mod carousel;
pub mod drawer;
pub mod gallery;
pub mod lightbox;
pub mod parallax;
pub mod reveal;
pub mod scroll;
pub mod skills;

use std::time::Duration;

use tokio::time::Instant;

pub use carousel::Carousel;
pub use drawer::Drawer;
pub use gallery::GalleryFilter;
pub use lightbox::Lightbox;
pub use parallax::Parallax;
pub use reveal::Reveal;
pub use scroll::{
    BackToTop,
    ScrollProgress,
};

use crate::config::EffectsConfig;
use crate::input::{
    NodeId,
    Page,
};

/// User motion preference (`prefers-reduced-motion`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotionPreference {
    #[default]
    Full,
    Reduced,
}

impl MotionPreference {
    #[must_use]
    pub const fn from_reduced(reduced: bool) -> Self {
        if reduced { Self::Reduced } else { Self::Full }
    }

    #[must_use]
    pub const fn is_reduced(self) -> bool {
        matches!(self, Self::Reduced)
    }
}

/// Window geometry and scroll position, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Full document height.
    pub scroll_height: f64,
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280.0, height: 800.0, scroll_height: 4000.0, scroll_y: 0.0 }
    }
}

impl Viewport {
    /// Scrollable range, never below one pixel.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.height).max(1.0)
    }

    /// Whether the document scrolls meaningfully (taller than 1.2 viewports).
    #[must_use]
    pub fn has_scroll(&self) -> bool {
        self.scroll_height > self.height * 1.2
    }
}

/// Formats a number the way CSS values are written (no trailing `.0`, no `-0`).
#[must_use]
pub fn css_number(value: f64) -> String {
    if value == 0.0 || !value.is_finite() { "0".to_string() } else { format!("{value}") }
}

/// All effects discovered on a page.
#[derive(Debug)]
pub struct Effects {
    pub motion: MotionPreference,
    pub reveal: Reveal,
    pub parallax: Parallax,
    pub drawer: Option<Drawer>,
    pub carousels: Vec<Carousel>,
    pub lightboxes: Vec<Lightbox>,
    pub gallery: Option<GalleryFilter>,
    pub progress: Option<ScrollProgress>,
    pub back_to_top: Option<BackToTop>,
}

impl Effects {
    /// Discovers and initializes every effect present on `page`.
    pub fn init(
        page: &mut Page,
        config: &EffectsConfig,
        viewport: &Viewport,
        now: Instant,
    ) -> Self {
        let motion = MotionPreference::from_reduced(config.reduced_motion);
        let meters = skills::init_skill_meters(page);
        let autoplay = Duration::from_millis(config.carousel_interval_ms);
        let transition = Duration::from_millis(config.filter_duration_ms);

        let effects = Self {
            motion,
            reveal: Reveal::init(page, motion, config),
            parallax: Parallax::init(page, motion, viewport),
            drawer: Drawer::find(page),
            carousels: Carousel::discover(page, autoplay, now),
            lightboxes: Lightbox::discover(page),
            gallery: GalleryFilter::init(page, motion, transition),
            progress: ScrollProgress::init(page, viewport),
            back_to_top: BackToTop::find(page),
        };

        tracing::debug!(
            reveal = effects.reveal.observed_count(),
            carousels = effects.carousels.len(),
            lightboxes = effects.lightboxes.len(),
            gallery = effects.gallery.is_some(),
            drawer = effects.drawer.is_some(),
            meters,
            "Initialized page effects"
        );
        effects
    }

    /// Runs every scroll-driven effect for the viewport's current position.
    pub fn on_scroll(&self, page: &mut Page, viewport: &Viewport) {
        self.parallax.on_scroll(page, viewport.scroll_y);
        if let Some(progress) = &self.progress {
            progress.update(page, viewport);
        }
        if let Some(back_to_top) = &self.back_to_top {
            back_to_top.update(page, viewport.scroll_y);
        }
    }

    /// Earliest pending timer across effects.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.carousels
            .iter()
            .filter_map(Carousel::next_advance)
            .chain(self.gallery.as_ref().and_then(GalleryFilter::next_deadline))
            .min()
    }

    /// Fires every timer due at `now`.
    pub fn run_due(&mut self, page: &mut Page, now: Instant) {
        for carousel in &mut self.carousels {
            carousel.advance_due(page, now);
        }
        if let Some(gallery) = &mut self.gallery {
            gallery.settle(page, now);
        }
    }

    /// Settles pending transitions without waiting for them.
    pub fn flush(&mut self, page: &mut Page) {
        if let Some(gallery) = &mut self.gallery {
            gallery.flush(page);
        }
    }

    #[must_use]
    pub fn carousel_at(&self, page: &Page, node: NodeId) -> Option<usize> {
        self.carousels.iter().position(|carousel| carousel.contains(page, node))
    }
}
