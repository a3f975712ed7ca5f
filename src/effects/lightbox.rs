//! Image preview lightbox (`.ig-preview` blocks).

use crate::input::{
    NodeId,
    Page,
};

pub const OPEN_CLASS: &str = "is-open";

/// One preview block: thumbnails plus the modal they open.
#[derive(Debug, Clone)]
pub struct Lightbox {
    /// `.ig-preview` container.
    block: NodeId,
    /// `.ig-item` thumbnails.
    items: Vec<NodeId>,
    /// `.ig-modal` overlay.
    modal: Option<NodeId>,
    /// `.ig-full` image inside the modal.
    full: Option<NodeId>,
    /// `.ig-close` button.
    close: Option<NodeId>,
}

impl Lightbox {
    #[must_use]
    pub fn discover(page: &Page) -> Vec<Self> {
        page.with_class("ig-preview")
            .into_iter()
            .map(|block| Self {
                block,
                items: page.with_class_in(block, "ig-item"),
                modal: page.first_with_class_in(block, "ig-modal"),
                full: page.first_with_class_in(block, "ig-full"),
                close: page.first_with_class_in(block, "ig-close"),
            })
            .collect()
    }

    /// Shows the full-size image of `item`.
    pub fn open(&self, page: &mut Page, item: NodeId) {
        let (Some(modal), Some(full)) = (self.modal, self.full) else {
            tracing::debug!("Lightbox {:?} has no modal or image", self.block);
            return;
        };
        let src = page.attr(item, "data-full").unwrap_or_default().to_string();
        let alt = page
            .descendants(item)
            .into_iter()
            .find(|&node| page.tag(node) == "img")
            .and_then(|img| page.attr(img, "alt"))
            .unwrap_or_default()
            .to_string();

        page.set_attr(full, "src", &src);
        page.set_attr(full, "alt", &alt);
        page.add_class(modal, OPEN_CLASS);
        page.set_attr(modal, "aria-hidden", "false");
    }

    pub fn hide(&self, page: &mut Page) {
        let (Some(modal), Some(full)) = (self.modal, self.full) else {
            return;
        };
        page.remove_class(modal, OPEN_CLASS);
        page.set_attr(modal, "aria-hidden", "true");
        page.set_attr(full, "src", "");
    }

    #[must_use]
    pub fn is_open(&self, page: &Page) -> bool {
        self.modal.is_some_and(|modal| page.has_class(modal, OPEN_CLASS))
    }

    /// The thumbnail at or around `node`.
    #[must_use]
    pub fn item_at(&self, page: &Page, node: NodeId) -> Option<NodeId> {
        self.items.iter().copied().find(|&item| page.contains(item, node))
    }

    #[must_use]
    pub fn is_close_button(&self, page: &Page, node: NodeId) -> bool {
        self.close.is_some_and(|close| page.contains(close, node))
    }

    /// Whether `node` is the modal backdrop itself (not its content).
    #[must_use]
    pub fn is_backdrop(&self, node: NodeId) -> bool {
        self.modal == Some(node)
    }
}
