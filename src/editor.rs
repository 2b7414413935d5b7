/// 编辑器层模块
///
/// 该模块提供有状态的编辑接口：打开的语言文件、未保存的修改、修改通知，
/// 以及以默认语言文件为参照的翻译表格。
/// 遵循"修改-保存分离"原则，所有修改操作仅在内存中进行，需要显式调用保存。
///
/// # 架构设计
///
/// - **session**: 编辑会话，管理打开的语言文件和未保存的修改
/// - **view**: "全部" / "缺失" 两种翻译表格及其过滤
///
/// # 使用示例
///
/// ```rust,ignore
/// use mtf_editor::{Catalog, EditSession, TranslationView};
/// use mtf_editor::io::DefaultBundleWriter;
///
/// let mut session = EditSession::new(&catalog)?;
/// session.set_value("master:messages_fr.properties", "greeting", "Bonjour")?;
///
/// for row in session.rows("master:messages_fr.properties", TranslationView::Missing, "")? {
///     println!("{} = {}", row.key, row.reference_value);
/// }
///
/// session.save_all(&DefaultBundleWriter::default())?;
/// ```
pub mod session;
pub mod view;

// === 导出公共接口 ===
pub use session::{BundleEvent, ChangeListener, EditSession};
pub use view::{build_rows, filter_rows, TranslationRow, TranslationView};
