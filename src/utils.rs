use thiserror::Error;
use std::path::{Path, PathBuf};

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum MtfError {
    /// 修改操作的目标键不存在于任何片段中
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// 只读查询没有找到值
    #[error("Missing resource: {0}")]
    MissingResource(String),

    #[error("IO error on {path:?}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 标识符或文件名不符合 `<prefix>[_<lang>[_<country>[_<variant>]]].<ext>`
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("Characters in {path:?} cannot be encoded as {encoding}")]
    Unencodable { path: PathBuf, encoding: &'static str },

    /// 只能解码、不能写出的编码（UTF-16 等）
    #[error("Encoding {0} cannot be used for writing")]
    UnwritableEncoding(&'static str),

    /// 值中含有换行，写回后会变成多行
    #[error("Value for key {0} contains a line break")]
    LineBreakInValue(String),

    #[error("Unable to load plugin {plugin}: {reason}")]
    PluginFailure { plugin: String, reason: String },

    #[error("Invalid ISO-639-1 code: {0}")]
    InvalidIsoCode(String),

    #[error("Language already translated: {0}")]
    LanguageAlreadyTranslated(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl MtfError {
    /// 为 IO 错误附加文件路径
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> MtfError {
        let path = path.into();
        move |source| MtfError::IoFailure { path, source }
    }
}

/// ISO-639-1 语言代码长度
pub const ISO_639_1_CODE_LENGTH: usize = 2;

/// 规范化并校验 ISO-639-1 语言代码
///
/// 去除首尾空白并转为小写，要求恰好两个 ASCII 字母。
pub fn normalize_iso_code(code: &str) -> Result<String, MtfError> {
    let normalized = code.trim().to_ascii_lowercase();

    if normalized.len() != ISO_639_1_CODE_LENGTH
        || !normalized.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(MtfError::InvalidIsoCode(code.to_string()));
    }

    Ok(normalized)
}

/// 确认值可以写成单独一行
///
/// 含 `\n` 或 `\r` 的值写回后会被拆成多行，重新加载时可能覆盖其他键。
pub fn ensure_single_line(key: &str, value: &str) -> Result<(), MtfError> {
    if value.contains(['\n', '\r']) {
        return Err(MtfError::LineBreakInValue(key.to_string()));
    }
    Ok(())
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<PathBuf, MtfError> {
    if !file_path.exists() {
        return Err(MtfError::IoFailure {
            path: file_path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "原文件不存在"),
        });
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let backup_name = match file_path.file_name().and_then(|n| n.to_str()) {
        Some(name) => format!("{}.{}.bak", name, timestamp),
        None => format!("{}.bak", timestamp),
    };
    let backup_path = file_path.with_file_name(backup_name);

    std::fs::copy(file_path, &backup_path).map_err(MtfError::io(file_path))?;

    Ok(backup_path)
}
