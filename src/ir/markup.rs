//! Inline markup carried by rich-text translation values.
//!
//! Only a small emphasis subset is recognised (`em`, `strong`, `b`, `i`, `br`).
//! Any other tag-like text is kept as literal text, so parsing never fails.

use std::fmt::Write as _;

/// Emphasis tags allowed inside rich-text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineTag {
    Em,
    Strong,
    B,
    I,
}

impl InlineTag {
    /// Tag name as written in HTML.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Em => "em",
            Self::Strong => "strong",
            Self::B => "b",
            Self::I => "i",
        }
    }

    /// Looks up a lowercase tag name.
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "em" => Some(Self::Em),
            "strong" => Some(Self::Strong),
            "b" => Some(Self::B),
            "i" => Some(Self::I),
            _ => None,
        }
    }
}

/// A node of parsed inline markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Emphasis(InlineTag, Vec<Inline>),
    LineBreak,
}

/// Structured inline markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    /// Top-level nodes in document order.
    nodes: Vec<Inline>,
}

/// A recognised tag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Open(InlineTag),
    Close(InlineTag),
    Break,
}

impl RichText {
    /// Parses a rich-text value.
    ///
    /// Unclosed emphasis is closed at the end of the input; stray closing tags and
    /// unsupported tags become literal text.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut builder = Builder::default();
        let mut rest = source;

        while let Some(pos) = rest.find('<') {
            let (before, tail) = rest.split_at(pos);
            builder.text.push_str(&decode_entities(before));

            if let Some((token, consumed)) = parse_tag(tail) {
                let (raw, after) = tail.split_at(consumed);
                builder.push_token(token, raw);
                rest = after;
            } else {
                builder.text.push('<');
                rest = tail.split_at(1).1;
            }
        }
        builder.text.push_str(&decode_entities(rest));

        Self { nodes: builder.finish() }
    }

    /// Plain-text rendering, as a browser's `textContent` would report it.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        write_plain(&self.nodes, &mut out);
        out
    }

    /// HTML rendering with literal text escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_html(&self.nodes, &mut out);
        out
    }

    #[must_use]
    pub fn nodes(&self) -> &[Inline] {
        &self.nodes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Returns the tag names in `source` that are outside the supported subset.
#[must_use]
pub fn unsupported_tags(source: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = source;

    while let Some(pos) = rest.find('<') {
        let tail = rest.split_at(pos).1;
        if let Some((_, consumed)) = parse_tag(tail) {
            rest = tail.split_at(consumed).1;
            continue;
        }
        if let Some(name) = tag_name(tail)
            && !found.contains(&name)
        {
            found.push(name);
        }
        rest = tail.split_at(1).1;
    }

    found
}

/// Accumulates parsed nodes while tracking open emphasis.
#[derive(Debug, Default)]
struct Builder {
    /// Pending literal text.
    text: String,
    /// Children of the innermost open element.
    current: Vec<Inline>,
    /// Open elements with the children collected before each was opened.
    stack: Vec<(InlineTag, Vec<Inline>)>,
}

impl Builder {
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.current.push(Inline::Text(std::mem::take(&mut self.text)));
        }
    }

    fn push_token(&mut self, token: Token, raw: &str) {
        match token {
            Token::Open(tag) => {
                self.flush_text();
                let parent = std::mem::take(&mut self.current);
                self.stack.push((tag, parent));
            }
            Token::Close(tag) => {
                if self.stack.last().is_some_and(|(open, _)| *open == tag) {
                    self.close_innermost();
                } else {
                    self.text.push_str(raw);
                }
            }
            Token::Break => {
                self.flush_text();
                self.current.push(Inline::LineBreak);
            }
        }
    }

    fn close_innermost(&mut self) {
        self.flush_text();
        if let Some((tag, parent)) = self.stack.pop() {
            let children = std::mem::replace(&mut self.current, parent);
            self.current.push(Inline::Emphasis(tag, children));
        }
    }

    fn finish(mut self) -> Vec<Inline> {
        self.flush_text();
        while !self.stack.is_empty() {
            self.close_innermost();
        }
        self.current
    }
}

/// Recognises a supported tag at the start of `tail`, returning the token and its byte length.
fn parse_tag(tail: &str) -> Option<(Token, usize)> {
    let end = tail.find('>')?;
    let inner = tail.get(1..end)?.trim();

    let token = if let Some(name) = inner.strip_prefix('/') {
        Token::Close(InlineTag::from_name(&name.trim().to_ascii_lowercase())?)
    } else {
        let name = inner.strip_suffix('/').unwrap_or(inner).trim().to_ascii_lowercase();
        if name == "br" {
            Token::Break
        } else if inner.ends_with('/') {
            return None;
        } else {
            Token::Open(InlineTag::from_name(&name)?)
        }
    };

    Some((token, end + 1))
}

/// Name of a tag-like token (`<div class="x">` → `div`), if `tail` starts with one.
fn tag_name(tail: &str) -> Option<String> {
    let end = tail.find('>')?;
    let inner = tail.get(1..end)?.trim_start_matches('/');
    let name: String = inner.chars().take_while(char::is_ascii_alphanumeric).collect();
    let starts_with_letter = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_with_letter.then(|| name.to_ascii_lowercase())
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn write_plain(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(text),
            Inline::Emphasis(_, children) => write_plain(children, out),
            Inline::LineBreak => out.push('\n'),
        }
    }
}

fn write_html(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) => escape_text(text, out),
            Inline::Emphasis(tag, children) => {
                let _ = write!(out, "<{}>", tag.name());
                write_html(children, out);
                let _ = write!(out, "</{}>", tag.name());
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[googletest::test]
    fn test_parse_plain_text() {
        let rich = RichText::parse("Skills");

        assert_eq!(rich.nodes(), &[text("Skills")]);
        expect_that!(rich.plain_text(), eq("Skills"));
    }

    #[googletest::test]
    fn test_parse_emphasis() {
        let rich = RichText::parse("different <em>paths</em> to tell stories");

        assert_eq!(
            rich.nodes(),
            &[
                text("different "),
                Inline::Emphasis(InlineTag::Em, vec![text("paths")]),
                text(" to tell stories"),
            ]
        );
        expect_that!(rich.plain_text(), eq("different paths to tell stories"));
    }

    #[googletest::test]
    fn test_parse_nested_and_break() {
        let rich = RichText::parse("<strong>a <em>b</em></strong><br/>c");

        assert_eq!(
            rich.nodes(),
            &[
                Inline::Emphasis(
                    InlineTag::Strong,
                    vec![text("a "), Inline::Emphasis(InlineTag::Em, vec![text("b")])]
                ),
                Inline::LineBreak,
                text("c"),
            ]
        );
        expect_that!(rich.to_html(), eq("<strong>a <em>b</em></strong><br>c"));
    }

    #[googletest::test]
    fn test_unclosed_emphasis_is_closed_at_end() {
        let rich = RichText::parse("<em>open");

        assert_eq!(rich.nodes(), &[Inline::Emphasis(InlineTag::Em, vec![text("open")])]);
    }

    #[rstest]
    #[case::unsupported_tag("a <div>b</div>", "a <div>b</div>")]
    #[case::stray_close("a </em> b", "a </em> b")]
    #[case::lone_angle("1 < 2", "1 < 2")]
    #[case::attributes_rejected("<em class=\"x\">y</em>", "<em class=\"x\">y</em>")]
    fn test_literal_fallback(#[case] source: &str, #[case] expected_plain: &str) {
        let rich = RichText::parse(source);

        assert_that!(rich.plain_text(), eq(expected_plain));
    }

    #[googletest::test]
    fn test_to_html_escapes_literal_text() {
        let rich = RichText::parse("design & <script>x</script>");

        expect_that!(rich.to_html(), eq("design &amp; &lt;script&gt;x&lt;/script&gt;"));
    }

    #[googletest::test]
    fn test_entities_are_decoded() {
        let rich = RichText::parse("Tom &amp; Jerry &lt;3");

        expect_that!(rich.plain_text(), eq("Tom & Jerry <3"));
    }

    #[googletest::test]
    fn test_unsupported_tags() {
        expect_that!(unsupported_tags("<em>ok</em> <br>"), is_empty());
        expect_that!(
            unsupported_tags("<div>x</div><span>y</span><div>"),
            elements_are![eq("div"), eq("span")]
        );
        expect_that!(unsupported_tags("1 < 2 > 0"), is_empty());
    }
}
