//! User and environment events.

use serde::{
    Deserialize,
    Serialize,
};

use crate::input::NodeId;

/// An event delivered to the page.
///
/// Serialized as an internally tagged JSON object, e.g.
/// `{"type": "selectLocale", "locale": "en"}` or `{"type": "click", "target": 12}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    /// Switch to a locale by code.
    SelectLocale { locale: String },
    /// Activation of an element, routed to whichever control contains it.
    Click { target: NodeId },
    ToggleMenu,
    OpenMenu,
    CloseMenu,
    KeyDown { key: String },
    NextSlide {
        #[serde(default)]
        carousel: usize,
    },
    PrevSlide {
        #[serde(default)]
        carousel: usize,
    },
    GoToSlide {
        #[serde(default)]
        carousel: usize,
        index: usize,
    },
    PointerEnter {
        #[serde(default)]
        carousel: usize,
    },
    PointerLeave {
        #[serde(default)]
        carousel: usize,
    },
    /// Select a gallery filter by its `data-filter` value.
    SelectFilter { filter: String },
    OpenLightbox { item: NodeId },
    CloseLightbox,
    Scroll { y: f64 },
    PointerMove { x: f64, y: f64 },
    Resize {
        width: f64,
        height: f64,
        #[serde(default)]
        scroll_height: Option<f64>,
    },
    /// An element's visible ratio changed.
    Intersect { target: NodeId, ratio: f64 },
}

/// Discriminant of [`Intent`], used as the handler registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntentKind {
    SelectLocale,
    Click,
    ToggleMenu,
    OpenMenu,
    CloseMenu,
    KeyDown,
    NextSlide,
    PrevSlide,
    GoToSlide,
    PointerEnter,
    PointerLeave,
    SelectFilter,
    OpenLightbox,
    CloseLightbox,
    Scroll,
    PointerMove,
    Resize,
    Intersect,
}

impl IntentKind {
    pub const ALL: [Self; 18] = [
        Self::SelectLocale,
        Self::Click,
        Self::ToggleMenu,
        Self::OpenMenu,
        Self::CloseMenu,
        Self::KeyDown,
        Self::NextSlide,
        Self::PrevSlide,
        Self::GoToSlide,
        Self::PointerEnter,
        Self::PointerLeave,
        Self::SelectFilter,
        Self::OpenLightbox,
        Self::CloseLightbox,
        Self::Scroll,
        Self::PointerMove,
        Self::Resize,
        Self::Intersect,
    ];
}

impl Intent {
    #[must_use]
    pub const fn kind(&self) -> IntentKind {
        match self {
            Self::SelectLocale { .. } => IntentKind::SelectLocale,
            Self::Click { .. } => IntentKind::Click,
            Self::ToggleMenu => IntentKind::ToggleMenu,
            Self::OpenMenu => IntentKind::OpenMenu,
            Self::CloseMenu => IntentKind::CloseMenu,
            Self::KeyDown { .. } => IntentKind::KeyDown,
            Self::NextSlide { .. } => IntentKind::NextSlide,
            Self::PrevSlide { .. } => IntentKind::PrevSlide,
            Self::GoToSlide { .. } => IntentKind::GoToSlide,
            Self::PointerEnter { .. } => IntentKind::PointerEnter,
            Self::PointerLeave { .. } => IntentKind::PointerLeave,
            Self::SelectFilter { .. } => IntentKind::SelectFilter,
            Self::OpenLightbox { .. } => IntentKind::OpenLightbox,
            Self::CloseLightbox => IntentKind::CloseLightbox,
            Self::Scroll { .. } => IntentKind::Scroll,
            Self::PointerMove { .. } => IntentKind::PointerMove,
            Self::Resize { .. } => IntentKind::Resize,
            Self::Intersect { .. } => IntentKind::Intersect,
        }
    }
}
