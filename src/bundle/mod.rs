/// 主翻译文件（Master Translation File）
///
/// 将多个文本片段组合成一个扁平的键值视图，同时保留每个片段的原始行，
/// 编辑时两种表示同步更新，写回磁盘时注释、空行和键的顺序保持不变。
///
/// # 组合规则
///
/// 按片段顺序扫描：跳过空行和注释行，在第一个 `=` 处拆分（没有 `=` 的行跳过），
/// 只有键尚不存在时才插入。先写入者胜出。
///
/// # 使用示例
///
/// ```rust,ignore
/// use mtf_editor::{MasterTranslationFile, TextFragment};
///
/// let mut mtf = MasterTranslationFile::new(
///     "messages_fr.properties",
///     vec![TextFragment::from_text("Core", "a=1\nb=2")],
/// );
/// mtf.add("a", "1-edited");
/// mtf.delete("b")?;
/// assert!(mtf.has_been_edited("a"));
/// ```
pub mod changes;
pub mod identifier;
pub mod reserved;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::fragment::{line, TextFragment};
use crate::io::BundleWriter;
use crate::utils::MtfError;

pub use changes::{ChangeKind, ChangeLog, KeyChange};
pub use identifier::{BundleIdentifier, DEFAULT_NAMESPACE};
pub use reserved::{KEY_LANGUAGE_CODE, KEY_LANGUAGE_COUNTRY, KEY_LANGUAGE_FONT, KEY_LANGUAGE_NAME};

/// 主翻译文件
///
/// 片段 0 是主片段，编辑器新增的键都追加到这里。
/// 不提供隐式克隆：每个实例独占自己的片段。
#[derive(Debug)]
pub struct MasterTranslationFile {
    /// 磁盘上的文件名
    filename: String,
    /// 标识符命名空间
    namespace: String,
    fragments: Vec<TextFragment>,
    /// 扁平键值视图，查询只读取这里
    properties: BTreeMap<String, String>,
    /// 编辑记录
    changes: ChangeLog,
}

impl MasterTranslationFile {
    /// 由有序片段列表构建
    ///
    /// 片段列表为空时补一个空的 "Core" 片段，保证主片段始终存在。
    pub fn new(filename: &str, mut fragments: Vec<TextFragment>) -> Self {
        if fragments.is_empty() {
            fragments.push(TextFragment::new("Core"));
        }

        let properties = Self::compose(&fragments);

        tracing::debug!(
            filename,
            fragments = fragments.len(),
            keys = properties.len(),
            "组合主翻译文件"
        );

        Self {
            filename: filename.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            fragments,
            properties,
            changes: ChangeLog::new(),
        }
    }

    /// 设置标识符命名空间
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    /// 按先写入者胜出的规则生成键值视图
    fn compose(fragments: &[TextFragment]) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();

        for fragment in fragments {
            for (key, value) in fragment.entries() {
                if properties.contains_key(key) {
                    tracing::trace!(
                        fragment = fragment.description(),
                        key,
                        value,
                        "忽略被覆盖的翻译"
                    );
                    continue;
                }
                properties.insert(key.to_string(), value.to_string());
            }
        }

        properties
    }

    // === 查询 ===

    /// 获取键的当前值
    pub fn get(&self, key: &str) -> Result<&str, MtfError> {
        self.property(key)
            .ok_or_else(|| MtfError::MissingResource(key.to_string()))
    }

    /// 获取键的当前值，不存在时返回空字符串
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.property(key).unwrap_or("")
    }

    pub(crate) fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// 扁平键值视图
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// 按字典序遍历所有键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    // === 编辑 ===

    /// 设置键的值
    ///
    /// 空值等同于 `delete`，键不存在时静默忽略。
    /// 否则更新视图（值有变化时记录编辑），再更新所在片段的行；
    /// 没有任何片段包含该键时，在主片段末尾追加 `key=value`。
    ///
    /// 每个值只占一行：含 `\n` 或 `\r` 的值无法表示，写回后会拆成多行。
    /// 调用方需要先用 `utils::ensure_single_line` 检查（`EditSession` 已经这样做）。
    pub fn add(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            if let Err(e) = self.delete(key) {
                // 用户体验上的隐患：未知键的空值不会留下任何痕迹
                tracing::debug!(key, error = %e, "空值对应的键不存在，忽略");
            }
            return;
        }

        let old_value = self.properties.insert(key.to_string(), value.to_string());
        if self.changes.record_value(key, old_value.as_deref(), value) {
            tracing::debug!(key, old = ?old_value, new = value, "键值已修改");
        }

        match self.locate(key) {
            Some((fragment_index, line_index)) => {
                self.fragments[fragment_index].set_entry_at(line_index, key, value);
            }
            None => {
                self.primary_fragment_mut().add_line(line::format_entry(key, value));
            }
        }
    }

    /// 删除键
    ///
    /// 所在行原位改写为 `key=`（墓碑行），并从视图中移除。
    /// 没有任何片段包含该键时返回 `KeyNotFound`，编辑记录不变。
    pub fn delete(&mut self, key: &str) -> Result<(), MtfError> {
        let (fragment_index, line_index) = self
            .locate(key)
            .ok_or_else(|| MtfError::KeyNotFound(key.to_string()))?;

        self.fragments[fragment_index].set_entry_at(line_index, key, "");
        let old_value = self.properties.remove(key);

        tracing::debug!(
            key,
            fragment = self.fragments[fragment_index].description(),
            "键已删除（写为墓碑行）"
        );

        self.changes.record_delete(key, old_value);
        Ok(())
    }

    /// 该键自构建以来是否被编辑过
    pub fn has_been_edited(&self, key: &str) -> bool {
        self.changes.contains(key)
    }

    /// 编辑记录
    pub fn changes(&self) -> &ChangeLog {
        &self.changes
    }

    /// 查找包含该键的片段及行：按片段顺序线性扫描，第一个匹配者胜出
    fn locate(&self, key: &str) -> Option<(usize, usize)> {
        self.fragments
            .iter()
            .enumerate()
            .find_map(|(index, fragment)| fragment.position_of(key).map(|line| (index, line)))
    }

    // === 片段与文件 ===

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    pub fn primary_fragment(&self) -> &TextFragment {
        &self.fragments[0]
    }

    pub(crate) fn primary_fragment_mut(&mut self) -> &mut TextFragment {
        &mut self.fragments[0]
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 只修改内存中的文件名，不触碰磁盘
    pub fn set_filename(&mut self, filename: &str) {
        self.filename = filename.to_string();
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn identifier(&self) -> BundleIdentifier {
        BundleIdentifier::new(&self.namespace, &self.filename)
    }

    /// 列表排序：按语言名称，名称相同时按文件名
    pub fn cmp_by_language_name(&self, other: &Self) -> Ordering {
        self.language_name()
            .unwrap_or("")
            .cmp(other.language_name().unwrap_or(""))
            .then_with(|| self.filename.cmp(&other.filename))
    }

    /// 序列化为文本：每个片段的每一行后跟换行，片段之后再跟一个空行
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            for line in fragment.lines() {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// 保存到指定目录（需要显式调用）
    pub fn save_to_disk(&self, writer: &dyn BundleWriter, target_dir: &Path) -> Result<PathBuf, MtfError> {
        writer.write(self, target_dir)
    }

    /// 在磁盘上重命名文件
    ///
    /// 分两步：先重命名文件，成功后才修改内存中的文件名。
    /// 失败时文件名保持不变，仍然指向未被改动的原文件。
    pub fn rename_on_disk(&mut self, directory: &Path, new_filename: &str) -> Result<(), MtfError> {
        if new_filename == self.filename {
            return Ok(());
        }

        let from = directory.join(&self.filename);
        let to = directory.join(new_filename);

        if to.exists() {
            return Err(MtfError::IoFailure {
                path: to,
                source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "目标文件已存在"),
            });
        }

        std::fs::rename(&from, &to).map_err(MtfError::io(&from))?;

        tracing::info!(from = %self.filename, to = new_filename, "语言文件已重命名");
        self.filename = new_filename.to_string();
        Ok(())
    }
}
