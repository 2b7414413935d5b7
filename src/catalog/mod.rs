/// 语言文件目录
///
/// 枚举语言目录中的语言文件，从文件名推导语言区域，解析标识符。
/// 不做缓存：每次查询都重新从磁盘加载。
///
/// # 使用示例
///
/// ```rust,ignore
/// use mtf_editor::{Catalog, EditorConfig};
///
/// let catalog = Catalog::from_config(&EditorConfig::default())?;
/// for bundle in catalog.list()? {
///     println!("{} {}", bundle.identifier(), bundle.language_name().unwrap_or(""));
/// }
/// ```
pub mod manage;

use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;

use crate::bundle::{BundleIdentifier, MasterTranslationFile};
use crate::config::EditorConfig;
use crate::io::{DefaultBundleSource, EmbeddedDefaultSource, FileDefaultSource, ResourceDirectoryProvider};
use crate::loader::{BundleLoader, NoPlugins, PluginEnumerator};
use crate::locale::{BundleLocale, FilenamePattern};
use crate::plugins::DirectoryPlugins;
use crate::utils::MtfError;

/// 语言文件目录
#[derive(Clone)]
pub struct Catalog {
    directory: Arc<dyn ResourceDirectoryProvider>,
    pattern: FilenamePattern,
    loader: BundleLoader,
    default_source: Arc<dyn DefaultBundleSource>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("language_dir", &self.language_dir())
            .field("pattern", &self.pattern)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    pub fn new(
        directory: Arc<dyn ResourceDirectoryProvider>,
        pattern: FilenamePattern,
        loader: BundleLoader,
        default_source: Arc<dyn DefaultBundleSource>,
    ) -> Self {
        Self {
            directory,
            pattern,
            loader,
            default_source,
        }
    }

    /// 根据配置构建目录、加载器和默认语言文件来源
    pub fn from_config(config: &EditorConfig) -> Result<Self, MtfError> {
        let encoding = config.encoding()?;

        let plugins: Arc<dyn PluginEnumerator> = match &config.plugins_dir {
            Some(dir) => Arc::new(DirectoryPlugins::new(dir.clone(), encoding)),
            None => Arc::new(NoPlugins),
        };

        let default_source: Arc<dyn DefaultBundleSource> = match &config.default_bundle {
            Some(path) => Arc::new(FileDefaultSource::new(path.clone())),
            None => Arc::new(EmbeddedDefaultSource::default()),
        };

        let loader = BundleLoader::new(encoding, plugins).with_namespace(&config.namespace);

        Ok(Self::new(
            Arc::new(config.language_dir.clone()),
            config.filename_pattern(),
            loader,
            default_source,
        ))
    }

    pub fn language_dir(&self) -> PathBuf {
        self.directory.language_directory()
    }

    pub fn pattern(&self) -> &FilenamePattern {
        &self.pattern
    }

    pub fn loader(&self) -> &BundleLoader {
        &self.loader
    }

    pub fn namespace(&self) -> &str {
        self.loader.namespace()
    }

    /// 语言目录中所有符合文件名模式的语言文件名（按字典序）
    ///
    /// 目录不存在时返回空列表。
    pub fn list_filenames(&self) -> Result<Vec<String>, MtfError> {
        let dir = self.language_dir();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "语言目录不存在");
            return Ok(Vec::new());
        }

        let mut filenames: Vec<String> = std::fs::read_dir(&dir)
            .map_err(MtfError::io(&dir))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| self.pattern.matches(name))
            .collect();
        filenames.sort();

        Ok(filenames)
    }

    /// 加载语言目录中的所有语言文件，按语言名称排序
    ///
    /// 各文件互不相关，并行加载；加载失败的文件记录警告后跳过。
    pub fn list(&self) -> Result<Vec<MasterTranslationFile>, MtfError> {
        let dir = self.language_dir();
        let filenames = self.list_filenames()?;

        let mut bundles: Vec<MasterTranslationFile> = filenames
            .par_iter()
            .filter_map(|filename| {
                let result = self
                    .pattern
                    .parse_locale(filename)
                    .and_then(|locale| self.loader.load_file(&dir.join(filename), &locale));
                match result {
                    Ok(bundle) => Some(bundle),
                    Err(e) => {
                        tracing::warn!(filename = %filename, error = %e, "跳过无法加载的语言文件");
                        None
                    }
                }
            })
            .collect();

        bundles.sort_by(|a, b| a.cmp_by_language_name(b));

        tracing::debug!(count = bundles.len(), "已列出语言文件");
        Ok(bundles)
    }

    /// 解析标识符对应的语言区域
    pub fn locale_of(&self, identifier: &str) -> Result<BundleLocale, MtfError> {
        let id = BundleIdentifier::parse(identifier, self.namespace())?;
        self.pattern.parse_locale(id.filename())
    }

    /// 文件名对应的标识符
    pub fn identifier_for(&self, filename: &str) -> BundleIdentifier {
        BundleIdentifier::new(self.namespace(), filename)
    }

    /// 根据标识符加载语言文件
    ///
    /// 每次调用都从磁盘重新加载，两次调用得到内容相同的两个独立实例。
    pub fn resolve(&self, identifier: &str) -> Result<MasterTranslationFile, MtfError> {
        let id = BundleIdentifier::parse(identifier, self.namespace())?;
        self.resolve_filename(id.filename())
    }

    /// 根据文件名加载语言文件
    pub fn resolve_filename(&self, filename: &str) -> Result<MasterTranslationFile, MtfError> {
        let locale = self.pattern.parse_locale(filename)?;
        let path = self.language_dir().join(filename);
        self.loader.load_file(&path, &locale)
    }

    /// 加载默认语言文件（随程序发布，不在语言目录中）
    pub fn default_bundle(&self) -> Result<MasterTranslationFile, MtfError> {
        let bytes = self.default_source.read_bytes()?;
        self.loader.load_stream(
            &self.pattern.default_filename(),
            bytes.as_slice(),
            &BundleLocale::default_locale(),
        )
    }
}

#[cfg(test)]
mod tests;
