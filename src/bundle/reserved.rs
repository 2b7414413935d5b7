/// 保留键
///
/// 语言元数据保存在主片段（片段 0）中：语言代码、语言名称、国家代码和字体列表。
use super::MasterTranslationFile;

/// ISO-639 语言代码
pub const KEY_LANGUAGE_CODE: &str = "bundle.language";
/// 语言的自称（用该语言书写的名称）
pub const KEY_LANGUAGE_NAME: &str = "bundle.language.name";
/// ISO-3166 国家代码
pub const KEY_LANGUAGE_COUNTRY: &str = "bundle.language.country";
/// 逗号分隔的字体列表（可选）
pub const KEY_LANGUAGE_FONT: &str = "font.name";

impl MasterTranslationFile {
    pub fn language_code(&self) -> Option<&str> {
        self.property(KEY_LANGUAGE_CODE)
    }

    pub fn language_name(&self) -> Option<&str> {
        self.property(KEY_LANGUAGE_NAME)
    }

    pub fn country(&self) -> Option<&str> {
        self.property(KEY_LANGUAGE_COUNTRY)
    }

    /// 字体列表，按逗号拆分并去除空白
    pub fn language_font(&self) -> Vec<&str> {
        self.property(KEY_LANGUAGE_FONT)
            .map(|fonts| {
                fonts
                    .split(',')
                    .map(str::trim)
                    .filter(|font| !font.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_language_code(&mut self, code: &str) {
        self.write_reserved(KEY_LANGUAGE_CODE, code);
    }

    pub fn set_language_name(&mut self, name: &str) {
        self.write_reserved(KEY_LANGUAGE_NAME, name);
    }

    pub fn set_country(&mut self, country: &str) {
        self.write_reserved(KEY_LANGUAGE_COUNTRY, country);
    }

    /// 设置字体列表；空值时直接删除字体行（而不是写成墓碑行）
    pub fn set_language_font(&mut self, fonts: &str) {
        if !fonts.is_empty() {
            self.write_reserved(KEY_LANGUAGE_FONT, fonts);
            return;
        }

        let primary = self.primary_fragment_mut();
        let existing = primary.get_line(KEY_LANGUAGE_FONT).map(str::to_string);
        match existing {
            Ok(line) => {
                primary.remove_line(&line);
            }
            Err(_) => tracing::debug!("字体之前未设置，无需删除"),
        }
        self.properties.remove(KEY_LANGUAGE_FONT);
    }

    /// 通过主片段写入保留键：存在则原位更新，否则追加
    fn write_reserved(&mut self, key: &str, value: &str) {
        let primary = self.primary_fragment_mut();
        if primary.update_value(key, value).is_err() {
            primary.add_line(crate::fragment::line::format_entry(key, value));
        }
        self.properties.insert(key.to_string(), value.to_string());
    }
}
