//! Hamburger navigation drawer.

use crate::input::{
    NodeId,
    Page,
};

/// The drawer and the elements controlling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawer {
    /// `.hamburger` button.
    button: NodeId,
    /// `#menu-drawer` navigation.
    drawer: NodeId,
    /// `.menu-backdrop` overlay.
    backdrop: NodeId,
}

impl Drawer {
    /// Finds `.hamburger`, `#menu-drawer` and `.menu-backdrop`; all three are required.
    #[must_use]
    pub fn find(page: &Page) -> Option<Self> {
        Some(Self {
            button: page.first_with_class("hamburger")?,
            drawer: page.by_id("menu-drawer")?,
            backdrop: page.first_with_class("menu-backdrop")?,
        })
    }

    #[must_use]
    pub fn is_open(&self, page: &Page) -> bool {
        page.attr(self.button, "aria-expanded") == Some("true")
    }

    pub fn open(&self, page: &mut Page) {
        page.set_attr(self.button, "aria-expanded", "true");
        page.add_class(self.drawer, "open");
        page.set_attr(self.drawer, "aria-hidden", "false");
        page.set_hidden(self.backdrop, false);
        let body = page.body();
        page.set_style(body, "overflow", "hidden");
    }

    pub fn close(&self, page: &mut Page) {
        page.set_attr(self.button, "aria-expanded", "false");
        page.remove_class(self.drawer, "open");
        page.set_attr(self.drawer, "aria-hidden", "true");
        page.set_hidden(self.backdrop, true);
        let body = page.body();
        page.set_style(body, "overflow", "");
    }

    pub fn toggle(&self, page: &mut Page) {
        if self.is_open(page) {
            self.close(page);
        } else {
            self.open(page);
        }
    }

    #[must_use]
    pub const fn button(&self) -> NodeId {
        self.button
    }

    #[must_use]
    pub const fn backdrop(&self) -> NodeId {
        self.backdrop
    }

    /// Whether `node` is, or sits inside, a link of the drawer.
    #[must_use]
    pub fn is_drawer_link(&self, page: &Page, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == self.drawer {
                return false;
            }
            if page.tag(candidate) == "a" {
                return page.contains(self.drawer, candidate);
            }
            current = page.parent(candidate);
        }
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::input::ElementSnapshot;

    /// body > [button.hamburger, nav#menu-drawer > [a > span, p], div.menu-backdrop, a]
    fn page() -> Page {
        Page::from_snapshot(
            &ElementSnapshot::new("html").child(
                ElementSnapshot::new("body")
                    .child(
                        ElementSnapshot::new("button")
                            .class("hamburger")
                            .attr("aria-expanded", "false"),
                    )
                    .child(
                        ElementSnapshot::new("nav")
                            .id("menu-drawer")
                            .child(
                                ElementSnapshot::new("a")
                                    .attr("href", "#sobre")
                                    .child(ElementSnapshot::new("span").text("Sobre")),
                            )
                            .child(ElementSnapshot::new("p")),
                    )
                    .child(ElementSnapshot::new("div").class("menu-backdrop").hidden())
                    .child(ElementSnapshot::new("a").attr("href", "#")),
            ),
        )
    }

    #[googletest::test]
    fn test_toggle_opens_and_closes() {
        let mut page = page();
        let drawer = Drawer::find(&page).unwrap();
        let body = page.body();

        drawer.toggle(&mut page);
        expect_that!(drawer.is_open(&page), eq(true));
        expect_that!(page.has_class(NodeId::new(3), "open"), eq(true));
        expect_that!(page.attr(NodeId::new(3), "aria-hidden"), some(eq("false")));
        expect_that!(page.is_hidden(drawer.backdrop()), eq(false));
        expect_that!(page.style(body, "overflow"), some(eq("hidden")));

        drawer.toggle(&mut page);
        expect_that!(drawer.is_open(&page), eq(false));
        expect_that!(page.has_class(NodeId::new(3), "open"), eq(false));
        expect_that!(page.is_hidden(drawer.backdrop()), eq(true));
        expect_that!(page.style(body, "overflow"), none());
    }

    #[googletest::test]
    fn test_close_is_idempotent() {
        let mut page = page();
        let drawer = Drawer::find(&page).unwrap();

        drawer.close(&mut page);
        let once = page.to_snapshot();
        drawer.close(&mut page);

        assert_eq!(page.to_snapshot(), once);
    }

    #[googletest::test]
    fn test_drawer_links() {
        let page = page();
        let drawer = Drawer::find(&page).unwrap();

        expect_that!(drawer.is_drawer_link(&page, NodeId::new(4)), eq(true));
        expect_that!(drawer.is_drawer_link(&page, NodeId::new(5)), eq(true));
        expect_that!(drawer.is_drawer_link(&page, NodeId::new(6)), eq(false));
        expect_that!(drawer.is_drawer_link(&page, NodeId::new(8)), eq(false));
    }

    #[googletest::test]
    fn test_missing_part_disables_drawer() {
        let page = Page::from_snapshot(
            &ElementSnapshot::new("html")
                .child(ElementSnapshot::new("button").class("hamburger"))
                .child(ElementSnapshot::new("nav").id("menu-drawer")),
        );

        expect_that!(Drawer::find(&page), none());
    }
}
