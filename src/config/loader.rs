//! 設定ファイルの読み込み関数

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    SiteSettings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".folio-i18n.json";

/// コメント付き設定ファイル名（`CONFIG_FILE_NAME` が無い場合に使う）
pub const JSONC_CONFIG_FILE_NAME: &str = ".folio-i18n.jsonc";

/// サイトルート直下の設定ファイルを探す
///
/// `.folio-i18n.json` を優先し、無ければ `.folio-i18n.jsonc` を返す
pub(super) fn find_config_file(site_root: &Path) -> Option<PathBuf> {
    [CONFIG_FILE_NAME, JSONC_CONFIG_FILE_NAME]
        .into_iter()
        .map(|name| site_root.join(name))
        .find(|path| path.is_file())
}

/// サイトルートから設定を読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_site_root(site_root: &Path) -> Result<Option<SiteSettings>, ConfigError> {
    let Some(config_path) = find_config_file(site_root) else {
        tracing::debug!("No configuration file under: {:?}", site_root);
        return Ok(None);
    };

    tracing::debug!("Loading configuration from: {:?}", config_path);
    let content = std::fs::read_to_string(&config_path)?;
    parse_settings(&content).map(Some)
}

/// 設定ファイルの内容をパースする
///
/// コメントと末尾カンマを許可する。空のファイルはデフォルト設定として扱う。
fn parse_settings(source: &str) -> Result<SiteSettings, ConfigError> {
    let value = jsonc_parser::parse_to_serde_value(source, &jsonc_parser::ParseOptions::default())
        .map_err(|e| ConfigError::SyntaxError(e.to_string()))?;

    match value {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(SiteSettings::default()),
    }
}
