//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    SiteSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: SiteSettings,

    /// サイトのルートパス
    site_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: SiteSettings::default(), site_root: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `site_root` - サイトのルートパス
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, site_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for site: {:?}", site_root);

        // サイトの設定を読み込み
        let settings = if let Some(root) = &site_root {
            loader::load_from_site_root(root)?.map_or_else(SiteSettings::default, |site| {
                tracing::debug!("Loaded site settings: {:?}", site);
                site
            })
        } else {
            SiteSettings::default()
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を保存
        self.current_settings = settings;
        self.site_root = site_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &SiteSettings {
        &self.current_settings
    }

    /// サイトルートからの相対パスを解決する（ルート未設定ならそのまま）
    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.site_root.as_ref().map_or_else(|| PathBuf::from(relative), |root| root.join(relative))
    }
}
