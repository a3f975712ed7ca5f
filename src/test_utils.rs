//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::panic)]

use std::sync::Arc;

use tokio::time::Instant;

use crate::config::SiteSettings;
use crate::i18n::I18nContext;
use crate::input::{
    Dictionary,
    ElementSnapshot,
    MemoryStorage,
    Page,
};
use crate::runtime::{
    Environment,
    Site,
};
use crate::types::Locale;

fn lang_button(label: &str) -> ElementSnapshot {
    ElementSnapshot::new("button").class("lang-btn").text(label)
}

fn filter_button(value: &str) -> ElementSnapshot {
    ElementSnapshot::new("button").class("gallery-filter").attr("data-filter", value)
}

fn card(category: &str, key: &str) -> ElementSnapshot {
    ElementSnapshot::new("article")
        .class("card")
        .attr("data-category", category)
        .child(ElementSnapshot::new("h3").attr("data-i18n", key))
}

/// ポートフォリオのトップページを模したテスト用ページを作成する
///
/// 言語ボタン、ドロワー、リビール要素、カルーセル（3 枚）、ギャラリーフィルター、
/// ライトボックス、スクロール進捗ボタンを含みます。
pub(crate) fn sample_page() -> Page {
    let mut slides = ElementSnapshot::new("div").attr("data-carousel", "life-inst");
    let mut dots = ElementSnapshot::new("div").class("inst-dots");
    for i in 1..=3 {
        slides = slides.child(
            ElementSnapshot::new("figure")
                .class("inst-slide")
                .child(ElementSnapshot::new("img").attr("src", format!("./assets/life-{i}.jpg"))),
        );
        dots = dots.child(ElementSnapshot::new("button").class("dot"));
    }
    slides = slides
        .child(ElementSnapshot::new("button").class("inst-arrow").class("prev"))
        .child(ElementSnapshot::new("button").class("inst-arrow").class("next"));

    let body = ElementSnapshot::new("body")
        .child(
            ElementSnapshot::new("header")
                .child(lang_button("PT"))
                .child(lang_button("EN"))
                .child(lang_button("ES"))
                .child(
                    ElementSnapshot::new("button")
                        .class("hamburger")
                        .attr("aria-expanded", "false")
                        .attr("data-i18n-attr", "aria-label:nav.open;title:nav.open"),
                ),
        )
        .child(
            ElementSnapshot::new("nav")
                .id("menu-drawer")
                .attr("aria-hidden", "true")
                .child(
                    ElementSnapshot::new("a")
                        .attr("href", "#galeria")
                        .attr("data-i18n", "nav.gallery"),
                ),
        )
        .child(ElementSnapshot::new("div").class("menu-backdrop").hidden())
        .child(
            ElementSnapshot::new("section")
                .class("hero-wrap")
                .child(ElementSnapshot::new("h1").class("reveal").attr("data-i18n", "hero.title"))
                .child(ElementSnapshot::new("p").class("reveal").attr("data-i18n", "hero.subtitle"))
                .child(ElementSnapshot::new("span").class("shape").attr("data-speed", "0.3")),
        )
        .child(
            ElementSnapshot::new("section")
                .class("about-content")
                .child(ElementSnapshot::new("h2").class("reveal").attr("data-i18n", "about.title"))
                .child(
                    ElementSnapshot::new("p").class("reveal").attr("data-i18n-html", "about.p2"),
                ),
        )
        .child(
            ElementSnapshot::new("div")
                .class("inst-carousel")
                .child(slides)
                .child(dots)
                .child(ElementSnapshot::new("span").class("inst-caption-label"))
                .child(ElementSnapshot::new("p").class("inst-caption-text")),
        )
        .child(
            ElementSnapshot::new("div")
                .child(filter_button("all").class("active"))
                .child(filter_button("branding"))
                .child(filter_button("print")),
        )
        .child(
            ElementSnapshot::new("div")
                .class("gallery")
                .child(card("branding", "gallery.card.worik"))
                .child(card("print", "gallery.card.dmmb"))
                .child(card("print branding", "gallery.card.pastas")),
        )
        .child(
            ElementSnapshot::new("div")
                .class("ig-preview")
                .child(
                    ElementSnapshot::new("button")
                        .class("ig-item")
                        .attr("data-full", "./assets/ig-1.jpg")
                        .child(ElementSnapshot::new("img").attr("alt", "Post")),
                )
                .child(
                    ElementSnapshot::new("div")
                        .class("ig-modal")
                        .attr("aria-hidden", "true")
                        .child(ElementSnapshot::new("img").class("ig-full"))
                        .child(ElementSnapshot::new("button").class("ig-close")),
                ),
        )
        .child(
            ElementSnapshot::new("a")
                .id("cv-link")
                .attr("href", "./assets/curriculo-Ingrid-Lima.pdf")
                .attr("data-i18n", "contact.ctaCv"),
        )
        .child(
            ElementSnapshot::new("button")
                .id("scrollTop")
                .child(ElementSnapshot::new("circle").class("bar")),
        );

    Page::from_snapshot(&ElementSnapshot::new("html").attr("lang", "pt").child(body))
}

/// 組み込み辞書とメモリストレージでサンプルページを起動する
pub(crate) fn start_sample_site(hint: Option<&str>) -> Site {
    let settings = SiteSettings::default();
    let dictionary = Dictionary::builtin(Locale::Pt, &settings.key_separator)
        .unwrap_or_else(|e| panic!("built-in dictionary must load: {e}"));
    let i18n = I18nContext::from_settings(Arc::new(dictionary), &settings);
    let environment =
        Environment { locale_hint: hint.map(str::to_string), ..Environment::default() };

    Site::start(
        sample_page(),
        i18n,
        Box::new(MemoryStorage::new()),
        &settings,
        &environment,
        Instant::now(),
    )
}
