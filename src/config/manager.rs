//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    OverlaySettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: OverlaySettings,

    /// 設定ファイルを読み込んだディレクトリ
    root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: OverlaySettings::default(), root: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `root` - 設定ファイルを探すディレクトリ
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー（現在の設定は変更されない）
    pub fn load_settings(&mut self, root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings from: {:?}", root);

        let settings = if let Some(dir) = &root {
            loader::load_from_dir(dir)?.map_or_else(OverlaySettings::default, |loaded| {
                tracing::debug!("Loaded settings: {:?}", loaded);
                loaded
            })
        } else {
            OverlaySettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.root = root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する
    pub fn update_settings(&mut self, new_settings: OverlaySettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &OverlaySettings {
        &self.current_settings
    }

    /// 設定ファイルを読み込んだディレクトリを取得
    #[must_use]
    pub const fn root(&self) -> Option<&PathBuf> {
        self.root.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::locale::Locale;

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().default_locale.as_str(), "en");
        assert!(manager.root().is_none());
    }

    /// load_settings: root が None の場合
    #[rstest]
    fn test_load_settings_without_root() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale.as_str(), "en");
        assert!(manager.root().is_none());
    }

    /// load_settings: 設定ファイルがある場合
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"defaultLocale": "de", "fallbacks": {"enabled": false}}"#;
        fs::write(temp_dir.path().join(loader::CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale.as_str(), "de");
        assert!(!manager.get_settings().fallbacks.enabled);
        assert!(manager.root().is_some());
    }

    /// load_settings: 無効な設定ファイルでは現在の設定を維持する
    #[rstest]
    fn test_load_settings_invalid_keeps_current() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(loader::CONFIG_FILE_NAME), r#"{"defaultLocale": ""}"#)
            .unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().default_locale.as_str(), "en");
        assert!(manager.root().is_none());
    }

    /// update_settings: 有効な設定で更新成功
    #[rstest]
    fn test_update_settings_valid() {
        let mut manager = ConfigManager::new();
        let new_settings =
            OverlaySettings { default_locale: Locale::new("fr"), ..Default::default() };

        let result = manager.update_settings(new_settings);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale.as_str(), "fr");
    }

    /// update_settings: 無効な設定でエラー
    #[rstest]
    fn test_update_settings_invalid() {
        let mut manager = ConfigManager::new();
        let mut new_settings = OverlaySettings::default();
        new_settings.fallbacks.map.insert(Locale::new("de"), vec![Locale::new("de")]);

        let result = manager.update_settings(new_settings);

        assert!(result.is_err());
    }
}
