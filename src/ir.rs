//! Intermediate representations derived from bindings and dictionary values.

/// Binding annotations
pub mod binding;
/// Inline markup of rich-text values
pub mod markup;

pub use binding::{
    AttrBinding,
    BindingKind,
    parse_attr_bindings,
};
pub use markup::{
    Inline,
    InlineTag,
    RichText,
};
