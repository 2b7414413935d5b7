/// 编辑器配置
///
/// 从 JSON 文件加载，所有字段都有默认值，缺省的字段不需要写出。
///
/// ```json
/// {
///   "language_dir": "languages",
///   "prefix": "messages",
///   "encoding": "UTF-8",
///   "plugins_dir": "plugins"
/// }
/// ```
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::bundle::DEFAULT_NAMESPACE;
use crate::io::codec;
use crate::locale::FilenamePattern;
use crate::utils::MtfError;

fn default_language_dir() -> PathBuf {
    PathBuf::from("languages")
}

fn default_prefix() -> String {
    "messages".to_string()
}

fn default_extension() -> String {
    "properties".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_encoding() -> String {
    "UTF-8".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// 存放语言文件的目录
    #[serde(default = "default_language_dir")]
    pub language_dir: PathBuf,
    /// 语言文件名前缀
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// 语言文件扩展名（不含点）
    #[serde(default = "default_extension")]
    pub extension: String,
    /// 标识符命名空间
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// 编码标签
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// 插件目录，不设置时没有插件
    #[serde(default)]
    pub plugins_dir: Option<PathBuf>,
    /// 默认语言文件，不设置时默认语言文件为空
    #[serde(default)]
    pub default_bundle: Option<PathBuf>,
    /// 覆盖语言文件前是否创建备份
    #[serde(default)]
    pub backup_on_save: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            language_dir: default_language_dir(),
            prefix: default_prefix(),
            extension: default_extension(),
            namespace: default_namespace(),
            encoding: default_encoding(),
            plugins_dir: None,
            default_bundle: None,
            backup_on_save: false,
        }
    }
}

impl EditorConfig {
    /// 从 JSON 文件加载配置
    pub fn load(path: &Path) -> Result<Self, MtfError> {
        let text = std::fs::read_to_string(path).map_err(MtfError::io(path))?;
        let config: Self = serde_json::from_str(&text)?;

        // 尽早发现错误的或不能写出的编码标签
        config.encoding()?;

        tracing::debug!(path = %path.display(), "配置已加载");
        Ok(config)
    }

    pub fn filename_pattern(&self) -> FilenamePattern {
        FilenamePattern::new(&self.prefix, &self.extension)
    }

    /// 解析编码标签，只能解码的编码同样报错，语言文件需要按同一编码写回
    pub fn encoding(&self) -> Result<&'static Encoding, MtfError> {
        let encoding = codec::resolve(&self.encoding)?;
        codec::ensure_writable(encoding)?;
        Ok(encoding)
    }
}
