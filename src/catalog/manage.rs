/// 语言文件管理
///
/// 新建、修改属性、删除和导出语言文件。
use std::path::{Path, PathBuf};

use super::Catalog;
use crate::bundle::{MasterTranslationFile, KEY_LANGUAGE_COUNTRY, KEY_LANGUAGE_NAME};
use crate::io::{codec, BundleWriter};
use crate::locale::BundleLocale;
use crate::utils::{ensure_single_line, normalize_iso_code, MtfError};

/// 新语言文件的头部模板
fn header_template(iso_code: &str, language_name: &str, country: &str) -> String {
    format!(
        "# The 2-letter ISO-639-1 code for the language\n\
         bundle.language={iso_code}\n\
         # The name of the language IN THAT LANGUAGE. This is how the language is chosen from\n\
         # menus, so speakers of that language must be able to read it. For non-Latin\n\
         # alphabets, also provide a latinised or English version of the name.\n\
         bundle.language.name={language_name}\n\
         # 2-letter ISO-3166 code for the country where this language is spoken, used for its flag\n\
         bundle.language.country={country}\n\
         # Some alphabets are not supported by the default font. One or more font names,\n\
         # separated by commas, can be given here.\n\
         #font.name=Courier New,Arial\n"
    )
}

impl Catalog {
    /// 查找语言代码为 `code` 的语言文件
    pub fn find_by_language_code(&self, code: &str) -> Result<Option<MasterTranslationFile>, MtfError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|bundle| bundle.language_code() == Some(code)))
    }

    /// 新建语言文件 `<prefix>_<iso>.<ext>`
    ///
    /// # 参数
    /// * `language_name` - 语言的自称
    /// * `iso_code` - ISO-639-1 语言代码，会被规范化为小写
    /// * `country` - ISO-3166 国家代码
    ///
    /// # 返回
    /// 新建后重新加载的语言文件
    pub fn create_language_file(
        &self,
        language_name: &str,
        iso_code: &str,
        country: &str,
    ) -> Result<MasterTranslationFile, MtfError> {
        let iso_code = normalize_iso_code(iso_code)?;
        ensure_single_line(KEY_LANGUAGE_NAME, language_name)?;
        ensure_single_line(KEY_LANGUAGE_COUNTRY, country)?;

        if self.find_by_language_code(&iso_code)?.is_some() {
            return Err(MtfError::LanguageAlreadyTranslated(iso_code));
        }

        let filename = self.pattern.filename_for(&BundleLocale::new(&iso_code));
        let dir = self.language_dir();
        let path = dir.join(&filename);
        if path.exists() {
            return Err(MtfError::LanguageAlreadyTranslated(iso_code));
        }

        let text = header_template(&iso_code, language_name, country);
        let bytes = codec::encode(&text, self.loader.encoding(), &path)?;

        std::fs::create_dir_all(&dir).map_err(MtfError::io(&dir))?;
        std::fs::write(&path, bytes).map_err(MtfError::io(&path))?;

        tracing::info!(path = %path.display(), language = language_name, "已新建语言文件");

        self.resolve_filename(&filename)
    }

    /// 修改语言文件的语言属性并保存
    ///
    /// 语言代码改变时把文件重命名为 `<prefix>_<iso>.<ext>`：
    /// 先保存到旧文件，再重命名；重命名失败时语言文件仍然指向旧文件。
    pub fn update_language_properties(
        &self,
        bundle: &mut MasterTranslationFile,
        writer: &dyn BundleWriter,
        language_name: &str,
        iso_code: &str,
        country: &str,
    ) -> Result<PathBuf, MtfError> {
        let iso_code = normalize_iso_code(iso_code)?;
        ensure_single_line(KEY_LANGUAGE_NAME, language_name)?;
        ensure_single_line(KEY_LANGUAGE_COUNTRY, country)?;
        let previous_code = bundle.language_code().map(str::to_string);

        if previous_code.as_deref() != Some(iso_code.as_str()) {
            if let Some(other) = self.find_by_language_code(&iso_code)? {
                if other.filename() != bundle.filename() {
                    return Err(MtfError::LanguageAlreadyTranslated(iso_code));
                }
            }
        }

        bundle.set_country(country);
        bundle.set_language_name(language_name);
        bundle.set_language_code(&iso_code);

        let dir = self.language_dir();
        let mut path = bundle.save_to_disk(writer, &dir)?;

        if previous_code.as_deref() != Some(iso_code.as_str()) {
            let new_filename = self.pattern.filename_for(&BundleLocale::new(&iso_code));
            bundle.rename_on_disk(&dir, &new_filename)?;
            path = dir.join(new_filename);
        }

        Ok(path)
    }

    /// 删除语言文件
    pub fn delete_language_file(&self, identifier: &str) -> Result<PathBuf, MtfError> {
        let bundle = self.resolve(identifier)?;
        let path = self.language_dir().join(bundle.filename());

        std::fs::remove_file(&path).map_err(MtfError::io(&path))?;

        tracing::info!(path = %path.display(), "语言文件已删除");
        Ok(path)
    }

    /// 把默认语言文件和所有语言文件写入目标目录
    ///
    /// # 返回
    /// 写入的文件路径（默认语言文件在前）
    pub fn export_all(&self, writer: &dyn BundleWriter, target_dir: &Path) -> Result<Vec<PathBuf>, MtfError> {
        let mut written = vec![self.default_bundle()?.save_to_disk(writer, target_dir)?];

        for bundle in self.list()? {
            written.push(bundle.save_to_disk(writer, target_dir)?);
        }

        tracing::info!(count = written.len(), target = %target_dir.display(), "已导出语言文件");
        Ok(written)
    }
}
