//! Locale selection controls (`.lang-btn` buttons).

use crate::config::BindingConfig;
use crate::input::Document;
use crate::types::Locale;

/// Collects the locale controls, filling in a missing locale attribute from the label.
///
/// A button reading ` EN ` with no `data-lang` gets `data-lang="en"`.
pub fn prepare_controls<D: Document>(doc: &mut D, bindings: &BindingConfig) -> Vec<D::Node> {
    let controls = doc.elements_with_class(&bindings.control_class);
    for &control in &controls {
        if doc.attribute(control, &bindings.control_locale_attribute).is_none() {
            let code = doc.text_content(control).trim().to_lowercase();
            doc.set_attribute(control, &bindings.control_locale_attribute, &code);
        }
    }
    controls
}

/// Locale code a control selects, as written on the element.
#[must_use]
pub fn control_code<'a, D: Document>(
    doc: &'a D,
    bindings: &BindingConfig,
    control: D::Node,
) -> Option<&'a str> {
    doc.attribute(control, &bindings.control_locale_attribute)
}

/// Marks exactly the controls selecting `locale` as active.
pub fn mark_active<D: Document>(doc: &mut D, bindings: &BindingConfig, locale: Locale) {
    for control in doc.elements_with_class(&bindings.control_class) {
        let selected = control_code(doc, bindings, control).and_then(Locale::from_code);
        doc.toggle_class(control, &bindings.active_class, selected == Some(locale));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::input::{
        ElementSnapshot,
        NodeId,
        Page,
    };

    fn page() -> Page {
        Page::from_snapshot(
            &ElementSnapshot::new("html").child(
                ElementSnapshot::new("nav")
                    .child(ElementSnapshot::new("button").class("lang-btn").text(" PT "))
                    .child(
                        ElementSnapshot::new("button")
                            .class("lang-btn")
                            .class("active")
                            .attr("data-lang", "en")
                            .text("English"),
                    )
                    .child(ElementSnapshot::new("button").class("lang-btn").text("es")),
            ),
        )
    }

    #[googletest::test]
    fn test_prepare_fills_missing_locale_from_label() {
        let mut page = page();
        let bindings = BindingConfig::default();

        let controls = prepare_controls(&mut page, &bindings);

        expect_that!(controls, len(eq(3)));
        expect_that!(page.attr(NodeId::new(2), "data-lang"), some(eq("pt")));
        expect_that!(page.attr(NodeId::new(3), "data-lang"), some(eq("en")));
        expect_that!(page.attr(NodeId::new(4), "data-lang"), some(eq("es")));
    }

    #[googletest::test]
    fn test_mark_active_flags_only_the_selected_control() {
        let mut page = page();
        let bindings = BindingConfig::default();
        prepare_controls(&mut page, &bindings);

        mark_active(&mut page, &bindings, Locale::Es);

        expect_that!(page.has_class(NodeId::new(2), "active"), eq(false));
        expect_that!(page.has_class(NodeId::new(3), "active"), eq(false));
        expect_that!(page.has_class(NodeId::new(4), "active"), eq(true));
    }

    #[googletest::test]
    fn test_page_without_controls_is_untouched() {
        let mut page = Page::new();
        let before = page.to_snapshot();
        let bindings = BindingConfig::default();

        let controls = prepare_controls(&mut page, &bindings);
        mark_active(&mut page, &bindings, Locale::En);

        expect_that!(controls, is_empty());
        assert_eq!(page.to_snapshot(), before);
    }
}
