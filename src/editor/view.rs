/// 翻译表格视图
///
/// 以默认语言文件为参照生成表格行："全部" 视图列出参照文件的每个键，
/// "缺失" 视图只列出本地语言文件中没有的键。
use serde::Serialize;

use crate::bundle::MasterTranslationFile;
use crate::comparison::BundleComparison;

/// 表格视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TranslationView {
    All,
    Missing,
}

/// 表格中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRow {
    pub key: String,
    /// 默认语言文件中的值
    pub reference_value: String,
    /// 本地语言文件中的值，缺失时为空字符串
    pub local_value: String,
    /// 本地语言文件中的该键是否被编辑过
    pub edited: bool,
}

impl TranslationRow {
    /// 任意一列包含过滤文本（不区分大小写）
    pub fn matches(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let filter = filter.to_lowercase();
        [&self.key, &self.reference_value, &self.local_value]
            .iter()
            .any(|column| column.to_lowercase().contains(&filter))
    }
}

/// 生成表格行（按键排序）
pub fn build_rows(
    reference: &MasterTranslationFile,
    local: &MasterTranslationFile,
    view: TranslationView,
) -> Vec<TranslationRow> {
    let row = |key: &str, reference_value: &str| TranslationRow {
        key: key.to_string(),
        reference_value: reference_value.to_string(),
        local_value: local.get_or_empty(key).to_string(),
        edited: local.has_been_edited(key),
    };

    match view {
        TranslationView::All => reference
            .properties()
            .iter()
            .map(|(key, value)| row(key.as_str(), value.as_str()))
            .collect(),
        TranslationView::Missing => {
            let comparison = BundleComparison::new(reference, local);
            comparison
                .keys_in_1_only()
                .into_iter()
                .map(|key| row(key, comparison.get1(key).unwrap_or("")))
                .collect()
        }
    }
}

/// 只保留匹配过滤文本的行；空过滤文本保留全部
pub fn filter_rows(rows: Vec<TranslationRow>, filter: &str) -> Vec<TranslationRow> {
    rows.into_iter().filter(|row| row.matches(filter)).collect()
}
