/// IO 抽象层模块
///
/// 该模块提供了语言文件读写的抽象接口，支持依赖注入和测试替换。
///
/// # 架构设计
///
/// - **traits**: 定义写入器、默认语言文件来源、语言目录提供者的 trait 接口
/// - **codec**: 按配置的字符编码进行解码 / 编码
/// - **bundle_io**: 基于文件系统的默认实现
///
/// # 使用示例
///
/// ```rust,ignore
/// use mtf_editor::io::{BundleWriter, DefaultBundleWriter};
///
/// let writer = DefaultBundleWriter::default();
/// writer.write(&bundle, Path::new("languages"))?;
/// ```
pub mod bundle_io;
pub mod codec;
pub mod traits;

// === 导出 trait 定义 ===
pub use traits::{BundleWriter, DefaultBundleSource, ResourceDirectoryProvider};

// === 导出默认实现 ===
pub use bundle_io::{DefaultBundleWriter, EmbeddedDefaultSource, FileDefaultSource};
