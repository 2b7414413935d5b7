/// 语言文件标识符
///
/// 格式：`<namespace>:<filename>`，同一文件在不同运行之间保持不变。
use std::fmt;

use crate::utils::MtfError;

/// 默认命名空间
pub const DEFAULT_NAMESPACE: &str = "master";

/// 可逆的语言文件标识符
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BundleIdentifier {
    namespace: String,
    filename: String,
}

impl BundleIdentifier {
    pub fn new(namespace: &str, filename: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            filename: filename.to_string(),
        }
    }

    /// 解析标识符，要求以 `<namespace>:` 开头且文件名非空
    pub fn parse(identifier: &str, namespace: &str) -> Result<Self, MtfError> {
        let filename = identifier
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix(':'))
            .filter(|filename| !filename.is_empty())
            .ok_or_else(|| MtfError::MalformedIdentifier(identifier.to_string()))?;

        Ok(Self::new(namespace, filename))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl fmt::Display for BundleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.filename)
    }
}
