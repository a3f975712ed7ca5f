//! ページ全体のローカライズとイベント処理に関する結合テスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::sync::Arc;

use folio_i18n::config::SiteSettings;
use folio_i18n::input::{
    Dictionary,
    ElementSnapshot,
    FileStorage,
    MemoryStorage,
    Page,
    Storage,
};
use folio_i18n::runtime::{
    Environment,
    Intent,
    Outcome,
    read_intents,
    run,
};
use folio_i18n::types::Locale;
use folio_i18n::{
    Dispatcher,
    I18nContext,
    Site,
};
use googletest::prelude::*;
use rstest::rstest;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::Instant;

fn lang_button(label: &str) -> ElementSnapshot {
    ElementSnapshot::new("button").class("lang-btn").text(label)
}

fn portfolio_page() -> Page {
    let body = ElementSnapshot::new("body")
        .child(
            ElementSnapshot::new("header")
                .child(lang_button("PT"))
                .child(lang_button("EN"))
                .child(lang_button("ES"))
                .child(
                    ElementSnapshot::new("button")
                        .class("hamburger")
                        .attr("data-i18n-attr", "aria-label:nav.open;bad"),
                ),
        )
        .child(ElementSnapshot::new("nav").id("menu-drawer"))
        .child(
            ElementSnapshot::new("div")
                .class("menu-backdrop")
                .hidden()
                .child(ElementSnapshot::new("span").class("backdrop-veil")),
        )
        .child(ElementSnapshot::new("h1").id("title").attr("data-i18n", "hero.title"))
        .child(ElementSnapshot::new("p").id("about").attr("data-i18n-html", "about.p2"))
        .child(
            ElementSnapshot::new("p").id("unknown").attr("data-i18n", "no.such.key").text("keep"),
        )
        .child(
            ElementSnapshot::new("a")
                .id("cv-link")
                .attr("href", "./assets/curriculo-Ingrid-Lima.pdf")
                .attr("data-i18n", "contact.ctaCv"),
        );
    Page::from_snapshot(&ElementSnapshot::new("html").attr("lang", "pt").child(body))
}

fn i18n(settings: &SiteSettings) -> I18nContext {
    let dictionary = Dictionary::builtin(settings.default_locale, &settings.key_separator).unwrap();
    I18nContext::from_settings(Arc::new(dictionary), settings)
}

fn start(storage: Box<dyn Storage>, hint: Option<&str>) -> Site {
    let settings = SiteSettings::default();
    let environment =
        Environment { locale_hint: hint.map(str::to_string), ..Environment::default() };
    Site::start(portfolio_page(), i18n(&settings), storage, &settings, &environment, Instant::now())
}

fn text_of(site: &Site, id: &str) -> String {
    let page = site.page();
    page.text(page.by_id(id).unwrap())
}

fn lang_of(site: &Site) -> Option<String> {
    let page = site.page();
    page.attr(page.root(), "lang").map(str::to_string)
}

#[rstest]
#[case::spanish_browser(Some("es-ES"), Locale::Es, "PORTAFOLIO")]
#[case::english_browser(Some("en-US"), Locale::En, "PORTFOLIO")]
#[case::unsupported_browser(Some("fr-FR"), Locale::Pt, "PORTFÓLIO")]
#[case::no_hint(None, Locale::Pt, "PORTFÓLIO")]
#[tokio::test]
async fn test_first_visit_follows_environment_hint(
    #[case] hint: Option<&str>,
    #[case] expected: Locale,
    #[case] title: &str,
) {
    let site = start(Box::new(MemoryStorage::new()), hint);

    assert_that!(site.active_locale(), eq(expected));
    assert_that!(text_of(&site, "title"), eq(title));
    assert_that!(lang_of(&site), some(eq(expected.as_str())));
    let key = SiteSettings::default().storage_key;
    assert_that!(site.storage().get_item(&key).unwrap(), some(eq(expected.as_str())));
}

#[tokio::test]
async fn test_stored_choice_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");

    let mut first = start(Box::new(FileStorage::new(&path)), Some("es-ES"));
    assert_that!(first.active_locale(), eq(Locale::Es));
    assert_that!(first.select_locale("en"), eq(Outcome::Handled));

    let second = start(Box::new(FileStorage::new(&path)), Some("es-ES"));

    assert_that!(second.active_locale(), eq(Locale::En));
    assert_that!(text_of(&second, "title"), eq("PORTFOLIO"));
    let page = second.page();
    let link = page.by_id("cv-link").unwrap();
    assert_that!(page.attr(link, "href"), some(eq("./assets/resume-Ingrid-Lima.pdf")));
}

#[tokio::test]
async fn test_blocked_storage_still_localizes() {
    let mut site = start(Box::new(MemoryStorage::blocked()), Some("en-GB"));

    assert_that!(site.active_locale(), eq(Locale::En));
    assert_that!(text_of(&site, "title"), eq("PORTFOLIO"));

    site.select_locale("es");
    assert_that!(text_of(&site, "title"), eq("PORTAFOLIO"));
}

#[tokio::test]
async fn test_unknown_code_renders_default_locale() {
    let mut reference = start(Box::new(MemoryStorage::new()), None);
    reference.select_locale("pt");
    let mut site = start(Box::new(MemoryStorage::new()), Some("en"));

    site.select_locale("xx");

    assert_that!(site.active_locale(), eq(Locale::Pt));
    assert_eq!(site.page().to_snapshot(), reference.page().to_snapshot());
}

#[tokio::test]
async fn test_bindings_apply_markup_attributes_and_skip_missing_keys() {
    let site = start(Box::new(MemoryStorage::new()), Some("en"));
    let page = site.page();

    let about = page.by_id("about").unwrap();
    let html = page.to_snapshot().children[0].children[4].html.clone();
    assert_that!(
        html,
        some(eq(
            "I work with visual and narrative creation, always seeking to translate \
             <em>sensations into form.</em>"
        ))
    );
    assert_that!(page.text(about), contains_substring("sensations into form."));

    let hamburger = page.first_with_class("hamburger").unwrap();
    assert_that!(page.attr(hamburger, "aria-label"), some(eq("Open menu")));
    assert_that!(page.attr(hamburger, "bad"), none());
    assert_that!(site.last_report().skipped_pairs, eq(1));

    assert_that!(text_of(&site, "unknown"), eq("keep"));
}

#[tokio::test]
async fn test_reapplying_locale_is_idempotent() {
    let mut site = start(Box::new(MemoryStorage::new()), Some("es"));
    let once = site.page().to_snapshot();

    site.select_locale("es");

    assert_eq!(site.page().to_snapshot(), once);
}

#[tokio::test]
async fn test_clicking_locale_control_switches_and_marks_it() {
    let mut site = start(Box::new(MemoryStorage::new()), None);
    let english = site.page().with_class("lang-btn")[1];

    let outcome =
        Dispatcher::new().dispatch(&mut site, &Intent::Click { target: english }, Instant::now());

    assert_that!(outcome, eq(Outcome::Handled));
    assert_that!(site.active_locale(), eq(Locale::En));
    let page = site.page();
    let active: Vec<_> =
        page.with_class("lang-btn").into_iter().filter(|&b| page.has_class(b, "active")).collect();
    assert_that!(active, elements_are![eq(&english)]);
    assert_that!(page.attr(english, "data-lang"), some(eq("en")));
}

#[tokio::test(start_paused = true)]
async fn test_intents_from_reader_drive_the_page() {
    let mut site = start(Box::new(MemoryStorage::new()), None);
    let input = b"{\"type\":\"selectLocale\",\"locale\":\"en\"}\n{\"type\":\"openMenu\"}\n";
    let (sender, receiver) = mpsc::channel(8);

    let forwarded = read_intents(&input[..], sender).await.unwrap();
    let summary = run(&mut site, &Dispatcher::new(), receiver).await;

    assert_that!(forwarded, eq(2));
    assert_that!(summary.handled, eq(2));
    assert_that!(text_of(&site, "title"), eq("PORTFOLIO"));
    let page = site.page();
    let drawer = page.by_id("menu-drawer").unwrap();
    assert_that!(page.has_class(drawer, "open"), eq(true));
}

#[tokio::test]
async fn test_click_inside_backdrop_closes_menu() {
    let mut site = start(Box::new(MemoryStorage::new()), None);
    let dispatcher = Dispatcher::new();
    let opened = dispatcher.dispatch(&mut site, &Intent::OpenMenu, Instant::now());
    assert_that!(opened, eq(Outcome::Handled));
    let veil = site.page().first_with_class("backdrop-veil").unwrap();

    let outcome = dispatcher.dispatch(&mut site, &Intent::Click { target: veil }, Instant::now());

    assert_that!(outcome, eq(Outcome::Handled));
    let page = site.page();
    let drawer = page.by_id("menu-drawer").unwrap();
    assert_that!(page.has_class(drawer, "open"), eq(false));
}
