/// IO 抽象层 - trait 定义
///
/// 该模块定义了语言文件写入、默认语言文件来源和语言目录的抽象接口，
/// 支持依赖注入和测试替换。

use std::path::{Path, PathBuf};

use crate::bundle::MasterTranslationFile;
use crate::utils::MtfError;

/// 语言文件写入 trait
///
/// # 职责
/// - 将 MasterTranslationFile 按片段顺序写入目标目录
/// - 文件名取自 `bundle.filename()`
pub trait BundleWriter {
    /// 写入语言文件
    ///
    /// # 参数
    /// * `bundle` - 要写入的语言文件
    /// * `target_dir` - 目标目录
    ///
    /// # 返回
    /// 返回实际写入的文件路径
    fn write(&self, bundle: &MasterTranslationFile, target_dir: &Path) -> Result<PathBuf, MtfError>;
}

/// 默认语言文件来源
///
/// 默认语言文件通常随宿主程序一起发布，而不是放在语言目录中。
pub trait DefaultBundleSource: Send + Sync {
    /// 读取默认语言文件的全部字节
    fn read_bytes(&self) -> Result<Vec<u8>, MtfError>;
}

/// 语言目录提供者
pub trait ResourceDirectoryProvider: Send + Sync {
    /// 存放语言文件的目录
    fn language_directory(&self) -> PathBuf;
}

impl ResourceDirectoryProvider for PathBuf {
    fn language_directory(&self) -> PathBuf {
        self.clone()
    }
}
