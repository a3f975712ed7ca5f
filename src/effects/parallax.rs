//! Parallax shapes (`[data-speed]`) and the project banner.

use super::{
    MotionPreference,
    Viewport,
    css_number,
};
use crate::input::{
    NodeId,
    Page,
};

pub const DEFAULT_SPEED: f64 = 0.2;
/// Largest scroll offset applied to a shape, in pixels.
pub const SCROLL_LIMIT: f64 = 400.0;
/// Largest pointer offset applied to a shape, in pixels.
pub const POINTER_LIMIT: f64 = 50.0;
pub const POINTER_GAIN: f64 = 30.0;
pub const BANNER_RATE: f64 = 0.25;

/// Parallax state; inert under reduced motion.
#[derive(Debug, Clone, Default)]
pub struct Parallax {
    /// Shapes with their speed factor.
    shapes: Vec<(NodeId, f64)>,
    /// Case study banner image.
    banner: Option<NodeId>,
    /// Pointer-driven movement, used only on pages that barely scroll.
    follows_pointer: bool,
}

/// Speed of a shape: `data-speed` when it parses, else the default.
fn speed_of(page: &Page, node: NodeId) -> f64 {
    page.data(node, "speed")
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|speed| speed.is_finite())
        .unwrap_or(DEFAULT_SPEED)
}

impl Parallax {
    pub fn init(page: &mut Page, motion: MotionPreference, viewport: &Viewport) -> Self {
        if motion.is_reduced() {
            return Self::default();
        }

        let shapes: Vec<(NodeId, f64)> = page
            .with_attr("data-speed")
            .into_iter()
            .map(|node| (node, speed_of(page, node)))
            .collect();
        for &(node, _) in &shapes {
            page.set_style(node, "will-change", "transform");
        }

        let parallax = Self {
            follows_pointer: !shapes.is_empty() && !viewport.has_scroll(),
            shapes,
            banner: page.first_with_class("banner-bg"),
        };
        parallax.on_scroll(page, viewport.scroll_y);
        parallax
    }

    #[must_use]
    pub const fn follows_pointer(&self) -> bool {
        self.follows_pointer
    }

    pub fn on_scroll(&self, page: &mut Page, scroll_y: f64) {
        for &(node, speed) in &self.shapes {
            let offset = (scroll_y * speed).clamp(-SCROLL_LIMIT, SCROLL_LIMIT);
            let transform = format!("translate3d(0, {}px, 0)", css_number(offset));
            page.set_style(node, "transform", &transform);
        }
        if let Some(banner) = self.banner {
            let offset = scroll_y * BANNER_RATE;
            page.set_style(banner, "transform", &format!("translateY({}px)", css_number(offset)));
        }
    }

    /// Moves shapes with the pointer at client position (`x`, `y`).
    pub fn on_pointer(&self, page: &mut Page, viewport: &Viewport, x: f64, y: f64) {
        if !self.follows_pointer {
            return;
        }
        let cx = viewport.width / 2.0;
        let cy = viewport.height / 2.0;
        if cx <= 0.0 || cy <= 0.0 {
            return;
        }
        let dx = (x - cx) / cx;
        let dy = (y - cy) / cy;

        for &(node, speed) in &self.shapes {
            let tx = (dx * POINTER_GAIN * speed).clamp(-POINTER_LIMIT, POINTER_LIMIT);
            let ty = (dy * POINTER_GAIN * speed).clamp(-POINTER_LIMIT, POINTER_LIMIT);
            page.set_style(
                node,
                "transform",
                &format!("translate3d({}px, {}px, 0)", css_number(tx), css_number(ty)),
            );
        }
    }
}
