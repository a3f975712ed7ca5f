//! Entry point: localizes a page snapshot, replays intents from stdin and prints the result.
//!
//! Usage: `folio-i18n <page.json> [site-root]`

use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;
use std::sync::Arc;

use folio_i18n::config::{
    ConfigError,
    ConfigManager,
    SiteSettings,
};
use folio_i18n::i18n::CoverageReport;
use folio_i18n::input::{
    Dictionary,
    DictionaryError,
    DocumentError,
    FileStorage,
    Page,
};
use folio_i18n::runtime::{
    Environment,
    read_intents,
    run,
};
use folio_i18n::{
    Dispatcher,
    I18nContext,
    Site,
};
use thiserror::Error;
use tokio::io::{
    AsyncWriteExt,
    BufReader,
};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

/// Capacity of the intent channel between the stdin reader and the event loop.
const INTENT_BUFFER: usize = 64;

/// Failures that stop the page from starting.
#[derive(Error, Debug)]
enum LaunchError {
    /// Missing page argument.
    #[error("usage: folio-i18n <page.json> [site-root]")]
    Usage,

    /// Invalid or unreadable site configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Locale files could not be loaded.
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// Page snapshot could not be read or written.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Reading intents or writing the page failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();

    match launch().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Starts the page and runs it until stdin closes.
async fn launch() -> Result<(), LaunchError> {
    let mut args = std::env::args().skip(1);
    let page_path = args.next().map(PathBuf::from).ok_or(LaunchError::Usage)?;
    let site_root = match args.next() {
        Some(root) => PathBuf::from(root),
        None => std::env::current_dir()?,
    };

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(site_root.clone()))?;
    let settings = config_manager.get_settings().clone();

    let dictionary = load_dictionary(&site_root, &settings)?;
    CoverageReport::check(&dictionary).log();

    let page = Page::load(&page_path)?;
    let storage = FileStorage::new(config_manager.resolve(&settings.storage_path));
    let environment = Environment {
        locale_hint: std::env::var("LANG").ok(),
        ..Environment::default()
    };

    let i18n = I18nContext::from_settings(Arc::new(dictionary), &settings);
    let mut site =
        Site::start(page, i18n, Box::new(storage), &settings, &environment, Instant::now());
    tracing::info!("Page localized for '{}'", site.active_locale());

    let (sender, receiver) = mpsc::channel(INTENT_BUFFER);
    let reader = tokio::spawn(read_intents(BufReader::new(tokio::io::stdin()), sender));
    let summary = run(&mut site, &Dispatcher::new(), receiver).await;
    match reader.await {
        Ok(Ok(forwarded)) => tracing::debug!("Read {} intents", forwarded),
        Ok(Err(e)) => return Err(e.into()),
        Err(e) => tracing::warn!("Intent reader stopped: {}", e),
    }
    tracing::info!(
        "Handled {} intents, ignored {}, {} timer wake-ups",
        summary.handled,
        summary.ignored,
        summary.timers
    );

    let mut output = site.page().to_json_pretty()?;
    output.push('\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(output.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

/// Loads locale files when configured, otherwise the built-in dictionary.
fn load_dictionary(site_root: &Path, settings: &SiteSettings) -> Result<Dictionary, LaunchError> {
    let dictionary = match &settings.locale_files {
        Some(files) => Dictionary::load_from_dir(
            site_root,
            &files.file_pattern,
            &settings.key_separator,
            settings.default_locale,
        )?,
        None => Dictionary::builtin(settings.default_locale, &settings.key_separator)?,
    };
    Ok(dictionary)
}
