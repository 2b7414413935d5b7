/// 语言文件对比
///
/// 对两个语言文件的键空间做集合运算。结果均按字典序排列，
/// 并且 `keys_in_1_only`、`keys_in_2_only`、`common_keys` 两两不相交，并集为两个键空间的并集。
use std::collections::BTreeSet;

use serde::Serialize;

use crate::bundle::MasterTranslationFile;

/// 两个语言文件的对比视图（只借用，不修改）
#[derive(Debug, Clone, Copy)]
pub struct BundleComparison<'a> {
    first: &'a MasterTranslationFile,
    second: &'a MasterTranslationFile,
}

/// 共有键的两个值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonEntry<'a> {
    pub key: &'a str,
    pub first: &'a str,
    pub second: &'a str,
    pub same: bool,
}

/// 对比摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub first: String,
    pub second: String,
    pub only_in_first: usize,
    pub only_in_second: usize,
    pub common: usize,
    pub differing: usize,
}

impl<'a> BundleComparison<'a> {
    pub fn new(first: &'a MasterTranslationFile, second: &'a MasterTranslationFile) -> Self {
        Self { first, second }
    }

    /// 只存在于第一个语言文件的键
    pub fn keys_in_1_only(&self) -> BTreeSet<&'a str> {
        self.first
            .keys()
            .filter(|key| !self.second.contains(key))
            .collect()
    }

    /// 只存在于第二个语言文件的键
    pub fn keys_in_2_only(&self) -> BTreeSet<&'a str> {
        self.second
            .keys()
            .filter(|key| !self.first.contains(key))
            .collect()
    }

    /// 两个语言文件共有的键
    pub fn common_keys(&self) -> BTreeSet<&'a str> {
        self.first
            .keys()
            .filter(|key| self.second.contains(key))
            .collect()
    }

    /// 第一个语言文件中的值
    pub fn get1(&self, key: &str) -> Option<&'a str> {
        self.first.properties().get(key).map(String::as_str)
    }

    /// 第二个语言文件中的值
    pub fn get2(&self, key: &str) -> Option<&'a str> {
        self.second.properties().get(key).map(String::as_str)
    }

    /// 共有键及其两个值
    pub fn common_entries(&self) -> Vec<CommonEntry<'a>> {
        self.first
            .properties()
            .iter()
            .filter_map(|(key, first)| {
                self.get2(key).map(|second| CommonEntry {
                    key: key.as_str(),
                    first: first.as_str(),
                    second,
                    same: first == second,
                })
            })
            .collect()
    }

    /// 共有但值不同的键
    pub fn differing_keys(&self) -> BTreeSet<&'a str> {
        self.common_entries()
            .into_iter()
            .filter(|entry| !entry.same)
            .map(|entry| entry.key)
            .collect()
    }

    pub fn summary(&self) -> ComparisonSummary {
        let entries = self.common_entries();
        ComparisonSummary {
            first: self.first.filename().to_string(),
            second: self.second.filename().to_string(),
            only_in_first: self.keys_in_1_only().len(),
            only_in_second: self.keys_in_2_only().len(),
            common: entries.len(),
            differing: entries.iter().filter(|entry| !entry.same).count(),
        }
    }
}
