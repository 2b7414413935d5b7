pub mod bundle;
pub mod catalog;
pub mod comparison;
pub mod config;
pub mod editor;
pub mod fragment;
pub mod io;
pub mod loader;
pub mod locale;
pub mod plugins;
pub mod utils;

#[cfg(feature = "cli")]
pub mod telemetry;

// 重新导出主要结构
pub use bundle::{BundleIdentifier, ChangeKind, ChangeLog, KeyChange, MasterTranslationFile};
pub use catalog::Catalog;
pub use comparison::{BundleComparison, ComparisonSummary};
pub use config::EditorConfig;
pub use editor::{BundleEvent, ChangeListener, EditSession, TranslationRow, TranslationView};
pub use fragment::TextFragment;
pub use loader::{BundleLoader, NoPlugins, PluginContribution, PluginEnumerator, StaticPlugin, StaticPlugins};
pub use locale::{BundleLocale, FilenamePattern};
pub use plugins::DirectoryPlugins;
pub use utils::MtfError;

// 常量定义
pub use bundle::{KEY_LANGUAGE_CODE, KEY_LANGUAGE_COUNTRY, KEY_LANGUAGE_FONT, KEY_LANGUAGE_NAME};
