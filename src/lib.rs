//! folio-i18n
//!
//! 静的ポートフォリオページ向けのクライアントサイド i18n とページエフェクトの実装

pub mod config;
pub mod effects;
pub mod i18n;
pub mod input;
pub mod ir;
pub mod runtime;
pub mod types;

mod test_utils;

pub use i18n::I18nContext;
pub use runtime::{
    Dispatcher,
    Site,
};
