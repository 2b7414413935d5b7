/// 语言文件加载器
///
/// 构建有序的片段列表：先是核心片段（语言文件本身），
/// 然后按顺序为每个插件构建一个片段，只保留之前所有片段中都不存在的键。
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use encoding_rs::{Encoding, UTF_8};

use crate::bundle::{MasterTranslationFile, DEFAULT_NAMESPACE};
use crate::fragment::TextFragment;
use crate::locale::BundleLocale;
use crate::utils::MtfError;

/// 核心片段的描述
pub const CORE_DESCRIPTION: &str = "Core";

/// 插件片段的描述前缀
pub const PLUGIN_DESCRIPTION_PREFIX: &str = "Plugin: ";

/// 插件提供的翻译文本
pub trait PluginContribution: Send + Sync {
    /// 插件名称，用于片段描述和错误信息
    fn name(&self) -> &str;

    /// 默认语言的键值映射
    fn default_text_resource(&self) -> Result<BTreeMap<String, String>, MtfError>;

    /// 指定语言区域的键值映射；没有对应翻译时返回空映射
    fn text_resource(&self, locale: &BundleLocale) -> Result<BTreeMap<String, String>, MtfError>;
}

/// 插件枚举器
///
/// 由宿主程序提供，按固定顺序返回所有贡献翻译文本的插件。
pub trait PluginEnumerator: Send + Sync {
    fn contributions(&self) -> Result<Vec<Arc<dyn PluginContribution>>, MtfError>;
}

/// 没有任何插件
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlugins;

impl PluginEnumerator for NoPlugins {
    fn contributions(&self) -> Result<Vec<Arc<dyn PluginContribution>>, MtfError> {
        Ok(Vec::new())
    }
}

/// 内存中的插件（测试和嵌入场景使用）
#[derive(Debug, Clone, Default)]
pub struct StaticPlugin {
    name: String,
    default_map: BTreeMap<String, String>,
    localized: HashMap<BundleLocale, BTreeMap<String, String>>,
}

impl StaticPlugin {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// 设置默认语言的映射
    pub fn with_default(mut self, map: BTreeMap<String, String>) -> Self {
        self.default_map = map;
        self
    }

    /// 添加某个语言区域的映射
    pub fn with_locale(mut self, locale: BundleLocale, map: BTreeMap<String, String>) -> Self {
        self.localized.insert(locale, map);
        self
    }
}

impl PluginContribution for StaticPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_text_resource(&self) -> Result<BTreeMap<String, String>, MtfError> {
        Ok(self.default_map.clone())
    }

    fn text_resource(&self, locale: &BundleLocale) -> Result<BTreeMap<String, String>, MtfError> {
        Ok(self.localized.get(locale).cloned().unwrap_or_default())
    }
}

/// 固定插件列表
#[derive(Clone, Default)]
pub struct StaticPlugins {
    plugins: Vec<Arc<dyn PluginContribution>>,
}

impl StaticPlugins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugin(mut self, plugin: impl PluginContribution + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }
}

impl PluginEnumerator for StaticPlugins {
    fn contributions(&self) -> Result<Vec<Arc<dyn PluginContribution>>, MtfError> {
        Ok(self.plugins.clone())
    }
}

/// 语言文件加载器
#[derive(Clone)]
pub struct BundleLoader {
    encoding: &'static Encoding,
    plugins: Arc<dyn PluginEnumerator>,
    namespace: String,
}

impl std::fmt::Debug for BundleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleLoader")
            .field("encoding", &self.encoding.name())
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl Default for BundleLoader {
    fn default() -> Self {
        Self::new(UTF_8, Arc::new(NoPlugins))
    }
}

impl BundleLoader {
    pub fn new(encoding: &'static Encoding, plugins: Arc<dyn PluginEnumerator>) -> Self {
        Self {
            encoding,
            plugins,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// 设置加载出的语言文件所用的命名空间
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// 从文件加载语言文件
    ///
    /// # 参数
    /// * `path` - 语言文件路径，文件名即为语言文件的文件名
    /// * `locale` - 用于选择插件翻译的语言区域
    pub fn load_file(&self, path: &Path, locale: &BundleLocale) -> Result<MasterTranslationFile, MtfError> {
        let bytes = std::fs::read(path).map_err(MtfError::io(path))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| MtfError::MalformedIdentifier(path.display().to_string()))?;

        self.load_bytes(filename, &bytes, locale)
    }

    /// 从字节流加载语言文件（用于随程序发布的默认语言文件）
    pub fn load_stream<R: Read>(
        &self,
        filename: &str,
        mut reader: R,
        locale: &BundleLocale,
    ) -> Result<MasterTranslationFile, MtfError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(MtfError::io(filename))?;

        self.load_bytes(filename, &bytes, locale)
    }

    /// 从已读取的字节数据加载语言文件
    pub fn load_bytes(
        &self,
        filename: &str,
        bytes: &[u8],
        locale: &BundleLocale,
    ) -> Result<MasterTranslationFile, MtfError> {
        let core = TextFragment::from_bytes(CORE_DESCRIPTION, bytes, self.encoding);
        let fragments = self.build_fragments(core, locale)?;

        tracing::debug!(
            filename,
            locale = %locale,
            fragments = fragments.len(),
            "语言文件已加载"
        );

        Ok(MasterTranslationFile::new(filename, fragments).with_namespace(&self.namespace))
    }

    /// 在核心片段之后追加所有插件片段
    fn build_fragments(
        &self,
        core: TextFragment,
        locale: &BundleLocale,
    ) -> Result<Vec<TextFragment>, MtfError> {
        let mut fragments = vec![core];

        for plugin in self.plugins.contributions()? {
            let map = if locale.is_default() {
                plugin.default_text_resource()
            } else {
                plugin.text_resource(locale)
            }
            .map_err(|e| match e {
                e @ MtfError::PluginFailure { .. } => e,
                other => MtfError::PluginFailure {
                    plugin: plugin.name().to_string(),
                    reason: other.to_string(),
                },
            })?;

            let description = format!("{}{}", PLUGIN_DESCRIPTION_PREFIX, plugin.name());
            let fragment = TextFragment::from_map(&description, &map, &fragments);

            tracing::trace!(
                plugin = plugin.name(),
                offered = map.len(),
                kept = fragment.len(),
                "插件片段已构建"
            );

            fragments.push(fragment);
        }

        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// 总是失败的插件
    struct BrokenPlugin;

    impl PluginContribution for BrokenPlugin {
        fn name(&self) -> &str {
            "Broken"
        }

        fn default_text_resource(&self) -> Result<BTreeMap<String, String>, MtfError> {
            Err(MtfError::MissingResource("text.properties".to_string()))
        }

        fn text_resource(&self, _locale: &BundleLocale) -> Result<BTreeMap<String, String>, MtfError> {
            Err(MtfError::MissingResource("text_fr.properties".to_string()))
        }
    }

    fn loader_with_plugins() -> BundleLoader {
        let plugins = StaticPlugins::new()
            .with_plugin(
                StaticPlugin::new("Foo")
                    .with_default(map(&[("b", "default-b"), ("foo.title", "Foo")]))
                    .with_locale(BundleLocale::new("fr"), map(&[("b", "99"), ("c", "3")])),
            )
            .with_plugin(
                StaticPlugin::new("Bar")
                    .with_locale(BundleLocale::new("fr"), map(&[("c", "33"), ("d", "4")])),
            );
        BundleLoader::new(UTF_8, Arc::new(plugins))
    }

    #[test]
    fn test_load_file_with_plugins() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("messages_fr.properties");
        std::fs::write(&path, "# French\na=1\nb=2\n").unwrap();

        let mtf = loader_with_plugins()
            .load_file(&path, &BundleLocale::new("fr"))
            .unwrap();

        assert_eq!(mtf.filename(), "messages_fr.properties");
        assert_eq!(mtf.fragments().len(), 3);
        assert_eq!(mtf.fragments()[0].description(), "Core");
        assert_eq!(mtf.fragments()[1].description(), "Plugin: Foo");
        assert_eq!(mtf.fragments()[2].description(), "Plugin: Bar");

        // 插件片段不会包含已被前面片段定义的键
        assert_eq!(mtf.fragments()[1].lines().collect::<Vec<_>>(), vec!["c=3"]);
        assert_eq!(mtf.fragments()[2].lines().collect::<Vec<_>>(), vec!["d=4"]);

        assert_eq!(mtf.get("b").unwrap(), "2");
        assert_eq!(mtf.get("c").unwrap(), "3");
        assert_eq!(mtf.get("d").unwrap(), "4");
    }

    #[test]
    fn test_default_locale_uses_default_maps() {
        let mtf = loader_with_plugins()
            .load_stream("messages.properties", &b"a=1\n"[..], &BundleLocale::default_locale())
            .unwrap();

        assert_eq!(mtf.get("foo.title").unwrap(), "Foo");
        assert_eq!(mtf.get("b").unwrap(), "default-b");
        assert!(mtf.fragments()[2].is_empty());
    }

    #[test]
    fn test_unknown_locale_gets_empty_plugin_fragments() {
        let mtf = loader_with_plugins()
            .load_bytes("messages_de.properties", b"a=1", &BundleLocale::new("de"))
            .unwrap();

        assert_eq!(mtf.fragments().len(), 3);
        assert!(mtf.fragments()[1].is_empty());
        assert_eq!(mtf.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = BundleLoader::default()
            .load_file(&temp_dir.path().join("missing.properties"), &BundleLocale::new("fr"));

        assert!(matches!(result, Err(MtfError::IoFailure { .. })));
    }

    #[test]
    fn test_plugin_failure_aborts_load() {
        let plugins = StaticPlugins::new().with_plugin(BrokenPlugin);
        let loader = BundleLoader::new(UTF_8, Arc::new(plugins));

        let result = loader.load_bytes("messages_fr.properties", b"a=1", &BundleLocale::new("fr"));

        assert!(matches!(result, Err(MtfError::PluginFailure { ref plugin, .. }) if plugin == "Broken"));
    }

    #[test]
    fn test_namespace_is_applied() {
        let mtf = BundleLoader::default()
            .with_namespace("ns")
            .load_bytes("messages.properties", b"", &BundleLocale::default_locale())
            .unwrap();

        assert_eq!(mtf.identifier().to_string(), "ns:messages.properties");
    }
}
