/// 语言区域与文件名约定
///
/// 语言文件名格式：`<prefix>[_<lang>[_<country>[_<variant>]]].<ext>`，
/// 例如 `app_fr_CA.properties`。没有语言区域部分的文件名表示默认语言文件。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::MtfError;

/// 语言区域（语言 / 国家 / 变体）
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BundleLocale {
    pub language: Option<String>,
    pub country: Option<String>,
    pub variant: Option<String>,
}

impl BundleLocale {
    /// 默认语言区域（三部分都为空）
    pub fn default_locale() -> Self {
        Self::default()
    }

    pub fn new(language: &str) -> Self {
        Self {
            language: Some(language.to_string()),
            country: None,
            variant: None,
        }
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.country = Some(country.to_string());
        self
    }

    pub fn with_variant(mut self, variant: &str) -> Self {
        self.variant = Some(variant.to_string());
        self
    }

    /// 是否为默认语言区域
    pub fn is_default(&self) -> bool {
        self.language.is_none() && self.country.is_none() && self.variant.is_none()
    }

    /// 按顺序返回非空部分
    pub fn bits(&self) -> Vec<&str> {
        [&self.language, &self.country, &self.variant]
            .into_iter()
            .filter_map(|bit| bit.as_deref())
            .collect()
    }

    /// 文件名中的语言区域后缀，例如 `_fr_CA`；默认语言区域为空字符串
    pub fn suffix(&self) -> String {
        self.bits().iter().map(|bit| format!("_{}", bit)).collect()
    }

    /// 从最具体到最宽泛的后缀候选（不含默认的空后缀）
    pub fn candidate_suffixes(&self) -> Vec<String> {
        let bits = self.bits();
        (1..=bits.len())
            .rev()
            .map(|n| bits[..n].iter().map(|bit| format!("_{}", bit)).collect())
            .collect()
    }
}

impl fmt::Display for BundleLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "(default)")
        } else {
            write!(f, "{}", self.bits().join("_"))
        }
    }
}

/// 语言文件名模式（前缀 + 扩展名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenamePattern {
    pub prefix: String,
    pub extension: String,
}

impl FilenamePattern {
    pub fn new(prefix: &str, extension: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            extension: extension.to_string(),
        }
    }

    /// 默认语言文件名：`<prefix>.<ext>`
    pub fn default_filename(&self) -> String {
        format!("{}.{}", self.prefix, self.extension)
    }

    /// 根据语言区域生成文件名
    pub fn filename_for(&self, locale: &BundleLocale) -> String {
        format!("{}{}.{}", self.prefix, locale.suffix(), self.extension)
    }

    /// 文件名是否符合此模式
    pub fn matches(&self, filename: &str) -> bool {
        self.parse_locale(filename).is_ok()
    }

    /// 从文件名解析语言区域
    ///
    /// 0 个部分为默认语言区域，1 个为语言，2 个为语言 + 国家，3 个为语言 + 国家 + 变体；
    /// 超过 3 个、前缀或扩展名不符、包含空部分或路径分隔符都视为格式错误。
    pub fn parse_locale(&self, filename: &str) -> Result<BundleLocale, MtfError> {
        let malformed = || MtfError::MalformedIdentifier(filename.to_string());

        if filename.contains('/') || filename.contains('\\') {
            return Err(malformed());
        }

        let suffix = format!(".{}", self.extension);
        let middle = filename
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(suffix.as_str()))
            .ok_or_else(malformed)?;

        if middle.is_empty() {
            return Ok(BundleLocale::default_locale());
        }

        let bits: Vec<&str> = middle.strip_prefix('_').ok_or_else(malformed)?.split('_').collect();
        if bits.iter().any(|bit| bit.is_empty()) {
            return Err(malformed());
        }

        match bits.as_slice() {
            [language] => Ok(BundleLocale::new(language)),
            [language, country] => Ok(BundleLocale::new(language).with_country(country)),
            [language, country, variant] => Ok(BundleLocale::new(language)
                .with_country(country)
                .with_variant(variant)),
            _ => Err(malformed()),
        }
    }
}
