/// 基于目录的插件枚举器
///
/// 插件目录下的每个子目录是一个插件，按目录名排序：
///
/// ```text
/// plugins/
/// ├── forms/
/// │   ├── text.properties        # 默认语言
/// │   ├── text_fr.properties
/// │   └── text_fr_CA.properties
/// └── reports/
///     └── text.properties
/// ```
///
/// 查找语言区域的翻译时，最具体的已存在文件胜出；都不存在时返回空映射。
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::Encoding;

use crate::fragment::TextFragment;
use crate::loader::{PluginContribution, PluginEnumerator};
use crate::locale::BundleLocale;
use crate::utils::MtfError;

/// 插件翻译文件的基础名
pub const PLUGIN_TEXT_BASENAME: &str = "text";

/// 插件翻译文件的扩展名
pub const PLUGIN_TEXT_EXTENSION: &str = "properties";

/// 扫描插件目录的枚举器
#[derive(Debug, Clone)]
pub struct DirectoryPlugins {
    root: PathBuf,
    encoding: &'static Encoding,
}

impl DirectoryPlugins {
    pub fn new(root: impl Into<PathBuf>, encoding: &'static Encoding) -> Self {
        Self {
            root: root.into(),
            encoding,
        }
    }
}

impl PluginEnumerator for DirectoryPlugins {
    fn contributions(&self) -> Result<Vec<Arc<dyn PluginContribution>>, MtfError> {
        if !self.root.is_dir() {
            tracing::warn!(root = %self.root.display(), "插件目录不存在，忽略");
            return Ok(Vec::new());
        }

        let mut directories: Vec<PathBuf> = std::fs::read_dir(&self.root)
            .map_err(MtfError::io(&self.root))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        directories.sort();

        Ok(directories
            .into_iter()
            .map(|dir| Arc::new(DirectoryPlugin::new(dir, self.encoding)) as Arc<dyn PluginContribution>)
            .collect())
    }
}

/// 单个插件目录
#[derive(Debug, Clone)]
pub struct DirectoryPlugin {
    name: String,
    dir: PathBuf,
    encoding: &'static Encoding,
}

impl DirectoryPlugin {
    pub fn new(dir: PathBuf, encoding: &'static Encoding) -> Self {
        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, dir, encoding }
    }

    fn text_path(&self, suffix: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}", PLUGIN_TEXT_BASENAME, suffix, PLUGIN_TEXT_EXTENSION))
    }

    /// 读取一个翻译文件为键值映射（重复的键保留第一个）
    fn read_map(&self, path: &Path) -> Result<BTreeMap<String, String>, MtfError> {
        let bytes = std::fs::read(path).map_err(|e| MtfError::PluginFailure {
            plugin: self.name.clone(),
            reason: format!("{}: {}", path.display(), e),
        })?;

        let fragment = TextFragment::from_bytes(&self.name, &bytes, self.encoding);
        let mut map = BTreeMap::new();
        for (key, value) in fragment.entries() {
            map.entry(key.to_string()).or_insert_with(|| value.to_string());
        }
        Ok(map)
    }
}

impl PluginContribution for DirectoryPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_text_resource(&self) -> Result<BTreeMap<String, String>, MtfError> {
        let path = self.text_path("");
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        self.read_map(&path)
    }

    fn text_resource(&self, locale: &BundleLocale) -> Result<BTreeMap<String, String>, MtfError> {
        match locale
            .candidate_suffixes()
            .iter()
            .map(|suffix| self.text_path(suffix))
            .find(|path| path.exists())
        {
            Some(path) => self.read_map(&path),
            None => {
                tracing::debug!(plugin = %self.name, locale = %locale, "插件没有该语言的翻译");
                Ok(BTreeMap::new())
            }
        }
    }
}
