//! Binding annotations read from document elements.

/// One `attribute:key` pair of an attribute binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrBinding<'a> {
    /// Attribute to rewrite (e.g. `aria-label`).
    pub attribute: &'a str,
    /// Dictionary key supplying the value.
    pub key: &'a str,
}

/// Parses an attribute binding such as `aria-label:nav.open;title:nav.open`.
///
/// Each `;`-separated pair is split on `:`; the first piece names the attribute and the
/// second the key. Pairs missing either side are skipped without affecting the others.
#[must_use]
pub fn parse_attr_bindings(declaration: &str) -> Vec<AttrBinding<'_>> {
    declaration
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.split(':').map(str::trim);
            let attribute = parts.next().filter(|s| !s.is_empty())?;
            let key = parts.next().filter(|s| !s.is_empty())?;
            Some(AttrBinding { attribute, key })
        })
        .collect()
}

/// Which kind of content a binding targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Replaces the element's text content.
    Text,
    /// Replaces the element's content with inline markup.
    Html,
    /// Rewrites one or more attributes.
    Attr,
}
