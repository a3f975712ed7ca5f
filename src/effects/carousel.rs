//! Image carousel with dots, captions and autoplay.

use std::time::Duration;

use tokio::time::Instant;

use crate::input::{
    Document,
    NodeId,
    Page,
};

pub const CAROUSEL_ATTRIBUTE: &str = "data-carousel";
pub const CAROUSEL_NAME: &str = "life-inst";
pub const ACTIVE_CLASS: &str = "is-active";

/// Caption shown under a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caption {
    pub label: &'static str,
    pub text: &'static str,
}

/// Captions by slide index; slides past the end reuse the first.
pub const CAPTIONS: [Caption; 4] = [
    Caption {
        label: "Brindes",
        text: "Aplicação da identidade em itens de relacionamento e presença de marca no cotidiano.",
    },
    Caption {
        label: "Ambiente",
        text: "Aplicação da marca em suportes físicos, reforçando consistência em espaços e atendimento.",
    },
    Caption {
        label: "Promocional",
        text: "Materiais sazonais e promocionais mantendo linguagem orgânica e reconhecimento imediato.",
    },
    Caption {
        label: "Institucional",
        text: "Peças institucionais e apoio comercial com clareza e unidade visual.",
    },
];

#[must_use]
pub fn caption_for(index: usize) -> Caption {
    CAPTIONS.get(index).or(CAPTIONS.first()).copied().unwrap_or(Caption { label: "", text: "" })
}

/// The `.inst-arrow` in `viewport` that also carries `direction`.
fn find_arrow(page: &Page, viewport: NodeId, direction: &str) -> Option<NodeId> {
    page.with_class_in(viewport, "inst-arrow")
        .into_iter()
        .find(|&node| page.has_class(node, direction))
}

/// One carousel instance.
#[derive(Debug, Clone)]
pub struct Carousel {
    /// `.inst-carousel` container (hover target).
    root: NodeId,
    slides: Vec<NodeId>,
    dots: Vec<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    /// Caption label element.
    label: Option<NodeId>,
    /// Caption text element.
    text: Option<NodeId>,
    /// Active slide.
    index: usize,
    /// Autoplay period.
    interval: Duration,
    /// Next autoplay advance; `None` while paused.
    next_advance: Option<Instant>,
}

impl Carousel {
    /// Finds every `[data-carousel="life-inst"]` viewport, activates its initial slide and
    /// starts autoplay.
    pub fn discover(page: &mut Page, interval: Duration, now: Instant) -> Vec<Self> {
        let viewports: Vec<NodeId> = page
            .with_attr(CAROUSEL_ATTRIBUTE)
            .into_iter()
            .filter(|&node| page.attr(node, CAROUSEL_ATTRIBUTE) == Some(CAROUSEL_NAME))
            .collect();

        let mut carousels = Vec::new();
        for viewport in viewports {
            let Some(root) = page.closest_with_class(viewport, "inst-carousel") else {
                tracing::debug!("Carousel viewport {:?} has no .inst-carousel container", viewport);
                continue;
            };
            let slides = page.with_class_in(viewport, "inst-slide");
            let index =
                slides.iter().position(|&slide| page.has_class(slide, ACTIVE_CLASS)).unwrap_or(0);
            let mut carousel = Self {
                root,
                dots: page
                    .first_with_class_in(root, "inst-dots")
                    .map(|wrap| page.with_class_in(wrap, "dot"))
                    .unwrap_or_default(),
                prev: find_arrow(page, viewport, "prev"),
                next: find_arrow(page, viewport, "next"),
                label: page.first_with_class_in(root, "inst-caption-label"),
                text: page.first_with_class_in(root, "inst-caption-text"),
                slides,
                index,
                interval,
                next_advance: Some(now + interval),
            };
            carousel.set_active(page, index);
            carousels.push(carousel);
        }
        carousels
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Activates slide `index`; out-of-range indices are ignored.
    pub fn set_active(&mut self, page: &mut Page, index: usize) {
        if index >= self.slides.len() {
            return;
        }
        for (i, &slide) in self.slides.iter().enumerate() {
            page.set_class(slide, ACTIVE_CLASS, i == index);
        }
        for (i, &dot) in self.dots.iter().enumerate() {
            page.set_class(dot, ACTIVE_CLASS, i == index);
        }

        let caption = caption_for(index);
        if let Some(label) = self.label {
            page.set_text(label, caption.label);
        }
        if let Some(text) = self.text {
            page.set_text(text, caption.text);
        }
        self.index = index;
    }

    pub fn next(&mut self, page: &mut Page) {
        if let Some(index) = (self.index + 1).checked_rem(self.slides.len()) {
            self.set_active(page, index);
        }
    }

    pub fn prev(&mut self, page: &mut Page) {
        let len = self.slides.len();
        if let Some(index) = (self.index + len.saturating_sub(1)).checked_rem(len) {
            self.set_active(page, index);
        }
    }

    /// Stops autoplay (pointer entered the carousel).
    pub const fn pause(&mut self) {
        self.next_advance = None;
    }

    /// Restarts autoplay with a full interval (pointer left the carousel).
    pub fn resume(&mut self, now: Instant) {
        self.next_advance = Some(now + self.interval);
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.next_advance.is_none()
    }

    #[must_use]
    pub const fn next_advance(&self) -> Option<Instant> {
        self.next_advance
    }

    /// Advances when autoplay is due; returns whether the slide changed.
    pub fn advance_due(&mut self, page: &mut Page, now: Instant) -> bool {
        let Some(due) = self.next_advance else {
            return false;
        };
        if due > now {
            return false;
        }
        self.next(page);
        self.next_advance = Some(due + self.interval);
        true
    }

    /// Whether `node` lies inside this carousel.
    #[must_use]
    pub fn contains(&self, page: &Page, node: NodeId) -> bool {
        page.contains(self.root, node)
    }

    /// Index of the dot at or around `node`.
    #[must_use]
    pub fn dot_index(&self, page: &Page, node: NodeId) -> Option<usize> {
        self.dots.iter().position(|&dot| page.contains(dot, node))
    }

    #[must_use]
    pub fn is_prev_arrow(&self, page: &Page, node: NodeId) -> bool {
        self.prev.is_some_and(|arrow| page.contains(arrow, node))
    }

    #[must_use]
    pub fn is_next_arrow(&self, page: &Page, node: NodeId) -> bool {
        self.next.is_some_and(|arrow| page.contains(arrow, node))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::input::ElementSnapshot;

    const INTERVAL: Duration = Duration::from_millis(4500);

    /// div.inst-carousel > [div[data-carousel] > [3 slides, prev, next], div.inst-dots > 3 dots, label, text]
    fn page(active: Option<usize>) -> Page {
        let mut viewport = ElementSnapshot::new("div").attr("data-carousel", "life-inst");
        for i in 0..3 {
            let mut slide = ElementSnapshot::new("figure").class("inst-slide");
            if active == Some(i) {
                slide = slide.class("is-active");
            }
            viewport = viewport.child(slide);
        }
        viewport = viewport
            .child(ElementSnapshot::new("button").class("inst-arrow").class("prev"))
            .child(ElementSnapshot::new("button").class("inst-arrow").class("next"));

        let mut dots = ElementSnapshot::new("div").class("inst-dots");
        for _ in 0..3 {
            dots = dots.child(ElementSnapshot::new("button").class("dot"));
        }

        Page::from_snapshot(
            &ElementSnapshot::new("html").child(
                ElementSnapshot::new("div")
                    .class("inst-carousel")
                    .child(viewport)
                    .child(dots)
                    .child(ElementSnapshot::new("span").class("inst-caption-label"))
                    .child(ElementSnapshot::new("p").class("inst-caption-text")),
            ),
        )
    }

    fn active_slides(page: &Page) -> Vec<NodeId> {
        page.with_class("inst-slide")
            .into_iter()
            .filter(|&slide| page.has_class(slide, "is-active"))
            .collect()
    }

    #[googletest::test]
    fn test_discover_starts_on_marked_slide() {
        let mut page = page(Some(1));

        let carousels = Carousel::discover(&mut page, INTERVAL, Instant::now());

        assert_that!(carousels, len(eq(1)));
        expect_that!(carousels[0].index(), eq(1));
        expect_that!(active_slides(&page), elements_are![eq(&NodeId::new(4))]);
        expect_that!(page.text(page.with_class("inst-caption-label")[0]), eq("Ambiente"));
        expect_that!(page.has_class(page.with_class("dot")[1], "is-active"), eq(true));
    }

    #[rstest]
    #[case::forward_wraps(2, true, 0)]
    #[case::forward(0, true, 1)]
    #[case::backward_wraps(0, false, 2)]
    #[case::backward(2, false, 1)]
    fn test_navigation_wraps(#[case] start: usize, #[case] forward: bool, #[case] expected: usize) {
        let mut page = page(Some(start));
        let mut carousel = Carousel::discover(&mut page, INTERVAL, Instant::now()).remove(0);

        if forward {
            carousel.next(&mut page);
        } else {
            carousel.prev(&mut page);
        }

        assert_eq!(carousel.index(), expected);
        assert_eq!(active_slides(&page).len(), 1);
    }

    #[googletest::test]
    fn test_caption_falls_back_to_first() {
        expect_that!(caption_for(7).label, eq("Brindes"));
        expect_that!(caption_for(3).label, eq("Institucional"));
    }

    #[googletest::test]
    fn test_autoplay_pauses_while_hovered() {
        let mut page = page(None);
        let start = Instant::now();
        let mut carousel = Carousel::discover(&mut page, INTERVAL, start).remove(0);

        let early = start + Duration::from_millis(4000);
        expect_that!(carousel.advance_due(&mut page, early), eq(false));
        expect_that!(carousel.advance_due(&mut page, start + INTERVAL), eq(true));
        expect_that!(carousel.index(), eq(1));

        carousel.pause();
        expect_that!(carousel.advance_due(&mut page, start + INTERVAL * 3), eq(false));
        expect_that!(carousel.index(), eq(1));

        carousel.resume(start + INTERVAL * 3);
        expect_that!(carousel.next_advance(), some(eq(start + INTERVAL * 4)));
    }

    #[googletest::test]
    fn test_hit_testing() {
        let mut page = page(None);
        let carousel = Carousel::discover(&mut page, INTERVAL, Instant::now()).remove(0);
        let dots = page.with_class("dot");

        expect_that!(carousel.dot_index(&page, dots[2]), some(eq(2)));
        expect_that!(carousel.is_prev_arrow(&page, NodeId::new(6)), eq(true));
        expect_that!(carousel.is_next_arrow(&page, NodeId::new(7)), eq(true));
        expect_that!(carousel.contains(&page, page.root()), eq(false));
    }

    #[googletest::test]
    fn test_carousel_without_slides_is_inert() {
        let mut page = Page::from_snapshot(
            &ElementSnapshot::new("div")
                .class("inst-carousel")
                .child(ElementSnapshot::new("div").attr("data-carousel", "life-inst")),
        );
        let mut carousel = Carousel::discover(&mut page, INTERVAL, Instant::now()).remove(0);
        let before = page.to_snapshot();

        carousel.next(&mut page);
        carousel.prev(&mut page);

        expect_that!(carousel.is_empty(), eq(true));
        assert_eq!(page.to_snapshot(), before);
    }
}
