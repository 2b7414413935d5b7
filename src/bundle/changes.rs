/// 编辑来源追踪模块
///
/// 记录自构建以来被编辑过的键，以及每次实际生效的变更。
/// 会话内只追加，不支持撤销。

use std::collections::BTreeSet;
use std::time::Instant;

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// 新增键
    Added,
    /// 修改已有键的值
    Updated,
    /// 删除（写为 `key=` 墓碑行）
    Deleted,
}

/// 单个键的变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChange {
    pub key: String,
    pub kind: ChangeKind,
    /// 修改前的值（新增时为 None）
    pub old_value: Option<String>,
    /// 修改后的值（删除时为 None）
    pub new_value: Option<String>,
    /// 应用时间戳
    pub applied_at: Instant,
}

/// 编辑记录
///
/// # 实现细节
/// - `edited` 是被编辑过的键的集合，`has_been_edited` 只查询它
/// - `history` 按时间顺序保存实际改变了内容的操作，重复的相同操作不会追加记录
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    edited: BTreeSet<String>,
    history: Vec<KeyChange>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次赋值
    ///
    /// # 返回
    /// 值是否发生了变化（旧值不存在或不同）
    pub fn record_value(&mut self, key: &str, old_value: Option<&str>, new_value: &str) -> bool {
        if old_value == Some(new_value) {
            return false;
        }

        self.edited.insert(key.to_string());
        self.history.push(KeyChange {
            key: key.to_string(),
            kind: if old_value.is_some() {
                ChangeKind::Updated
            } else {
                ChangeKind::Added
            },
            old_value: old_value.map(str::to_string),
            new_value: Some(new_value.to_string()),
            applied_at: Instant::now(),
        });
        true
    }

    /// 记录一次删除
    ///
    /// 键总是计入已编辑集合；只有删除前确实存在值时才追加历史记录。
    pub fn record_delete(&mut self, key: &str, old_value: Option<String>) {
        self.edited.insert(key.to_string());

        if old_value.is_some() {
            self.history.push(KeyChange {
                key: key.to_string(),
                kind: ChangeKind::Deleted,
                old_value,
                new_value: None,
                applied_at: Instant::now(),
            });
        }
    }

    /// 该键是否被编辑过
    pub fn contains(&self, key: &str) -> bool {
        self.edited.contains(key)
    }

    /// 按字典序遍历被编辑过的键
    pub fn edited_keys(&self) -> impl Iterator<Item = &str> {
        self.edited.iter().map(String::as_str)
    }

    /// 被编辑过的键的数量
    pub fn len(&self) -> usize {
        self.edited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edited.is_empty()
    }

    /// 全部变更记录（按应用顺序）
    pub fn history(&self) -> &[KeyChange] {
        &self.history
    }

    /// 获取特定键的所有变更
    pub fn records_for(&self, key: &str) -> Vec<&KeyChange> {
        self.history.iter().filter(|change| change.key == key).collect()
    }

    /// 生成变更摘要
    pub fn summary(&self) -> String {
        format!(
            "已编辑键: {}, 变更记录: {}",
            self.edited.len(),
            self.history.len()
        )
    }
}

/// 截断过长的值用于显示
fn preview(value: Option<&str>) -> String {
    match value {
        None => "<none>".to_string(),
        Some(v) if v.chars().count() > 30 => {
            format!("{}...", v.chars().take(30).collect::<String>())
        }
        Some(v) => v.to_string(),
    }
}

impl std::fmt::Display for KeyChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:?}] {}: \"{}\" -> \"{}\"",
            self.kind,
            self.key,
            preview(self.old_value.as_deref()),
            preview(self.new_value.as_deref())
        )
    }
}
