//! Scroll progress ring (`#scrollTop`) and the plain back-to-top button (`#backToTop`).

use std::f64::consts::PI;

use super::{
    Viewport,
    css_number,
};
use crate::input::{
    NodeId,
    Page,
};

pub const RING_RADIUS: f64 = 18.0;
/// Scroll offset past which the progress button shows.
pub const SHOW_OFFSET: f64 = 80.0;
/// Pages scrolling less than this always show the progress button.
pub const SHORT_PAGE_RANGE: f64 = 400.0;
pub const READY_PROGRESS: f64 = 0.98;
/// Scroll offset past which the back-to-top button shows.
pub const BACK_TO_TOP_OFFSET: f64 = 400.0;

#[must_use]
pub fn ring_circumference() -> f64 {
    2.0 * PI * RING_RADIUS
}

/// Scroll progress in `[0, 1]`.
#[must_use]
pub fn progress(viewport: &Viewport) -> f64 {
    (viewport.scroll_y / viewport.max_scroll()).clamp(0.0, 1.0)
}

/// Progress ring button.
#[derive(Debug, Clone, Copy)]
pub struct ScrollProgress {
    /// `#scrollTop` button.
    button: NodeId,
    /// Ring `circle.bar` whose dash offset shows progress.
    bar: Option<NodeId>,
}

impl ScrollProgress {
    /// Finds `#scrollTop`, draws an empty ring and runs the first update.
    pub fn init(page: &mut Page, viewport: &Viewport) -> Option<Self> {
        let button = page.by_id("scrollTop")?;
        let progress = Self { button, bar: page.first_with_class_in(button, "bar") };

        let circumference = css_number(ring_circumference());
        if let Some(bar) = progress.bar {
            page.set_style(bar, "stroke-dasharray", &circumference);
            page.set_style(bar, "stroke-dashoffset", &circumference);
        }
        progress.update(page, viewport);
        Some(progress)
    }

    #[must_use]
    pub const fn button(&self) -> NodeId {
        self.button
    }

    /// Returns the progress drawn.
    pub fn update(&self, page: &mut Page, viewport: &Viewport) -> f64 {
        let progress = progress(viewport);
        let show = viewport.scroll_y > SHOW_OFFSET || viewport.max_scroll() < SHORT_PAGE_RANGE;
        page.set_class(self.button, "show", show);

        if let Some(bar) = self.bar {
            let offset = ring_circumference() * (1.0 - progress);
            page.set_style(bar, "stroke-dashoffset", &css_number(offset));
        }
        page.set_class(self.button, "ready", progress >= READY_PROGRESS);
        progress
    }
}

/// Fallback back-to-top button.
#[derive(Debug, Clone, Copy)]
pub struct BackToTop {
    /// `#backToTop` button.
    button: NodeId,
}

impl BackToTop {
    #[must_use]
    pub fn find(page: &Page) -> Option<Self> {
        page.by_id("backToTop").map(|button| Self { button })
    }

    #[must_use]
    pub const fn button(&self) -> NodeId {
        self.button
    }

    pub fn update(&self, page: &mut Page, scroll_y: f64) {
        page.set_class(self.button, "visible", scroll_y > BACK_TO_TOP_OFFSET);
    }
}
