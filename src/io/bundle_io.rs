/// 语言文件 IO 实现
///
/// 提供基于文件系统的默认写入器和默认语言文件来源
use std::io::Write;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};

use super::codec;
use super::traits::{BundleWriter, DefaultBundleSource};
use crate::bundle::MasterTranslationFile;
use crate::utils::{create_backup, MtfError};

/// 默认的语言文件写入器（基于 std::fs）
///
/// 每个片段的每一行后写一个换行，片段之间再写一个空行。
/// 写入不是原子的：失败时目标文件处于未定义状态。
#[derive(Debug, Clone)]
pub struct DefaultBundleWriter {
    encoding: &'static Encoding,
    /// 覆盖已有文件前是否先创建带时间戳的备份
    backup: bool,
}

impl DefaultBundleWriter {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            backup: false,
        }
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Default for DefaultBundleWriter {
    fn default() -> Self {
        Self::new(UTF_8)
    }
}

impl BundleWriter for DefaultBundleWriter {
    fn write(&self, bundle: &MasterTranslationFile, target_dir: &Path) -> Result<PathBuf, MtfError> {
        // 确保目标目录存在
        std::fs::create_dir_all(target_dir).map_err(MtfError::io(target_dir))?;

        let path = target_dir.join(bundle.filename());

        // 先编码，编码失败时不触碰目标文件
        let bytes = codec::encode(&bundle.to_text(), self.encoding, &path)?;

        if self.backup && path.exists() {
            let backup_path = create_backup(&path)?;
            tracing::info!(backup = %backup_path.display(), "已创建备份");
        }

        {
            let file = std::fs::File::create(&path).map_err(MtfError::io(&path))?;
            let mut out = std::io::BufWriter::new(file);
            out.write_all(&bytes).map_err(MtfError::io(&path))?;
            out.flush().map_err(MtfError::io(&path))?;
        }

        tracing::info!(
            path = %path.display(),
            fragments = bundle.fragments().len(),
            bytes = bytes.len(),
            "语言文件已保存"
        );

        Ok(path)
    }
}

/// 从文件读取默认语言文件
#[derive(Debug, Clone)]
pub struct FileDefaultSource {
    path: PathBuf,
}

impl FileDefaultSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DefaultBundleSource for FileDefaultSource {
    fn read_bytes(&self) -> Result<Vec<u8>, MtfError> {
        std::fs::read(&self.path).map_err(MtfError::io(&self.path))
    }
}

/// 内嵌在程序中的默认语言文件
#[derive(Debug, Clone, Default)]
pub struct EmbeddedDefaultSource {
    bytes: Vec<u8>,
}

impl EmbeddedDefaultSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }
}

impl DefaultBundleSource for EmbeddedDefaultSource {
    fn read_bytes(&self) -> Result<Vec<u8>, MtfError> {
        Ok(self.bytes.clone())
    }
}
