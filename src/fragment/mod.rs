/// 文本片段（行缓冲）
///
/// 一个片段对应一个贡献来源（核心或某个插件）的原始行序列。
/// 保留原始行而不是解析后的映射，注释、空行和作者安排的顺序在编辑后都能原样写回。
pub mod line;


use std::collections::BTreeMap;
use std::io::Read;

use encoding_rs::Encoding;

use crate::io::codec;
use crate::utils::MtfError;

pub use line::{classify, parse_entry, LineKind};

/// 有序、可变的原始行序列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    /// 仅用于诊断的描述，例如 "Core"、"Plugin: Foo"
    description: String,
    lines: Vec<String>,
}

impl TextFragment {
    /// 创建空片段
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            lines: Vec::new(),
        }
    }

    /// 从已解码的文本创建片段
    ///
    /// 以 `\n` 分行，行尾的 `\r` 会被去掉；末尾换行符不会产生额外的空行。
    pub fn from_text(description: &str, text: &str) -> Self {
        Self {
            description: description.to_string(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// 按指定编码从字节数据创建片段
    pub fn from_bytes(description: &str, bytes: &[u8], encoding: &'static Encoding) -> Self {
        let text = codec::decode(bytes, encoding, description);
        Self::from_text(description, &text)
    }

    /// 从字节流读取全部内容并创建片段
    pub fn from_reader<R: Read>(
        description: &str,
        mut reader: R,
        encoding: &'static Encoding,
    ) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(description, &bytes, encoding))
    }

    /// 从内存映射创建片段
    ///
    /// 只输出在所有 `shadows` 片段中都不存在的键，避免插件覆盖已有的键。
    /// 行按键的字典序输出。
    pub fn from_map(
        description: &str,
        map: &BTreeMap<String, String>,
        shadows: &[TextFragment],
    ) -> Self {
        let mut fragment = Self::new(description);

        for (key, value) in map {
            if shadows.iter().any(|shadow| shadow.contains_key(key)) {
                tracing::trace!(fragment = description, key = %key, "跳过已被遮蔽的键");
                continue;
            }
            fragment.add_line(line::format_entry(key, value));
        }

        fragment
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// 在末尾追加一行（原样）
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// 删除第一个完全相同的行；不存在时不报错
    ///
    /// # 返回
    /// 是否删除了某一行
    pub fn remove_line(&mut self, line: &str) -> bool {
        match self.lines.iter().position(|l| l == line) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// 定义了指定键的第一行的索引
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.lines.iter().position(|l| line::defines_key(l, key))
    }

    /// 获取定义了指定键的第一行
    pub fn get_line(&self, key: &str) -> Result<&str, MtfError> {
        self.position_of(key)
            .map(|index| self.lines[index].as_str())
            .ok_or_else(|| MtfError::KeyNotFound(key.to_string()))
    }

    /// 是否存在定义了指定键的行
    pub fn contains_key(&self, key: &str) -> bool {
        self.position_of(key).is_some()
    }

    /// 原位替换键所在的行为 `key=new_value`（文件开头的 BOM 保留）
    pub fn update_value(&mut self, key: &str, new_value: &str) -> Result<(), MtfError> {
        let index = self
            .position_of(key)
            .ok_or_else(|| MtfError::KeyNotFound(key.to_string()))?;
        self.set_entry_at(index, key, new_value);
        Ok(())
    }

    /// 用已知的行索引替换键值行（索引来自 `position_of`）
    pub(crate) fn set_entry_at(&mut self, index: usize, key: &str, value: &str) {
        self.lines[index] = line::rewrite_entry(&self.lines[index], key, value);
    }

    /// 按顺序遍历所有行（包括注释和空行）
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// 按行顺序遍历所有键值对
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|l| line::parse_entry(l))
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
