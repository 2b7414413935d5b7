/// 字符编码处理
///
/// 解码时不做 BOM 嗅探，字节原样进入首行，写回时也原样输出。
use std::path::Path;

use encoding_rs::Encoding;

use crate::utils::MtfError;

/// 根据编码标签（如 "UTF-8"、"ISO-8859-1"）查找编码
pub fn resolve(label: &str) -> Result<&'static Encoding, MtfError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| MtfError::UnknownEncoding(label.to_string()))
}

/// 检查编码能否用于写出
///
/// encoding_rs 对 UTF-16 等编码只解码不编码，写出时会改用 UTF-8，
/// 再用原编码读回时所有键都会丢失。
pub fn ensure_writable(encoding: &'static Encoding) -> Result<(), MtfError> {
    if encoding.output_encoding() != encoding {
        return Err(MtfError::UnwritableEncoding(encoding.name()));
    }
    Ok(())
}

/// 解码字节数据，非法字节替换为 U+FFFD
pub fn decode(bytes: &[u8], encoding: &'static Encoding, source: &str) -> String {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::warn!(
            source,
            encoding = encoding.name(),
            "存在无法解码的字节，已替换为 U+FFFD"
        );
    }
    text.into_owned()
}

/// 编码文本，存在无法表示的字符时返回错误
pub fn encode(text: &str, encoding: &'static Encoding, path: &Path) -> Result<Vec<u8>, MtfError> {
    ensure_writable(encoding)?;
    let (bytes, actual, had_unmappable) = encoding.encode(text);

    if had_unmappable {
        return Err(MtfError::Unencodable {
            path: path.to_path_buf(),
            encoding: actual.name(),
        });
    }

    Ok(bytes.into_owned())
}
