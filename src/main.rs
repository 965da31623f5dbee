//! プロジェクトに設定されたフォールバックチェーンを表示する
//!
//! 使い方: `locale-overlay [DIR] [LOCALE...]`
//!
//! 設定は `DIR/.locale-overlay.json`（省略時はカレントディレクトリ）から読み込む。
//! ロケールを指定しなければデフォルトロケールのチェーンを表示する。

use std::path::PathBuf;
use std::process::ExitCode;

use locale_overlay::config::ConfigManager;
use locale_overlay::{
    FallbackChain,
    FallbackResolver,
    Locale,
};
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stdout)]
fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut args = std::env::args().skip(1);
    let root = args.next().map(PathBuf::from).or_else(|| std::env::current_dir().ok());
    let mut manager = ConfigManager::new();
    if let Err(error) = manager.load_settings(root) {
        tracing::error!(%error, "Failed to load settings");
        return ExitCode::FAILURE;
    }

    let settings = manager.get_settings();
    let chain = FallbackChain::from_settings(settings);
    let mut locales: Vec<Locale> = args.map(Locale::new).collect();
    if locales.is_empty() {
        locales.push(settings.default_locale.clone());
    }

    for locale in locales {
        let candidates: Vec<String> =
            chain.resolve(&locale).iter().map(ToString::to_string).collect();
        println!("{locale}: {}", candidates.join(" -> "));
    }
    ExitCode::SUCCESS
}
