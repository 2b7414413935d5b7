/// 单行分类
///
/// 行类型：空行、注释（首个非空白字符为 `#`）、键值行（`key=value`）、
/// 以及不含 `=` 的其他行。值取第一个 `=` 之后的全部内容，不做任何裁剪。

/// 行的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    Entry { key: &'a str, value: &'a str },
    /// 不含 `=` 的行，原样保留但不参与键值视图
    Malformed,
}

/// 对一行进行分类
pub fn classify(line: &str) -> LineKind<'_> {
    let trimmed = trim_leading(line);

    if trimmed.trim_end().is_empty() {
        return LineKind::Blank;
    }

    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }

    match trimmed.split_once('=') {
        Some((key, value)) => LineKind::Entry { key, value },
        None => LineKind::Malformed,
    }
}

/// 去除行首空白（以及 UTF-8 文件开头可能残留的 BOM）
fn trim_leading(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// 解析键值行，非键值行返回 None
pub fn parse_entry(line: &str) -> Option<(&str, &str)> {
    match classify(line) {
        LineKind::Entry { key, value } => Some((key, value)),
        _ => None,
    }
}

/// 判断该行是否定义了指定的键
///
/// 规则与 `classify` 一致：去除行首空白后以 `key=` 开头，且不是注释行。
pub fn defines_key(line: &str, key: &str) -> bool {
    let trimmed = trim_leading(line);
    !trimmed.starts_with('#')
        && trimmed
            .strip_prefix(key)
            .is_some_and(|rest| rest.starts_with('='))
}

/// 生成键值行
pub fn format_entry(key: &str, value: &str) -> String {
    format!("{}={}", key, value)
}

/// 用新值重写已有的键值行，行首的 BOM 保留
pub fn rewrite_entry(line: &str, key: &str, value: &str) -> String {
    if line.starts_with('\u{FEFF}') {
        format!("\u{FEFF}{}", format_entry(key, value))
    } else {
        format_entry(key, value)
    }
}
