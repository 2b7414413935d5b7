/// 编辑会话
///
/// 管理一组打开的语言文件：修改只发生在内存中，需要显式调用 `save_all` 才写入磁盘。
/// 每次修改后向注册的监听器发送通知。
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use super::view::{build_rows, filter_rows, TranslationRow, TranslationView};
use crate::bundle::{BundleIdentifier, MasterTranslationFile, KEY_LANGUAGE_FONT};
use crate::catalog::Catalog;
use crate::io::BundleWriter;
use crate::utils::{ensure_single_line, MtfError};

/// 会话事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleEvent {
    /// 键被设置为新值
    ValueChanged { identifier: String, key: String },
    /// 键被删除
    ValueDeleted { identifier: String, key: String },
    /// 语言属性已修改并保存（标识符可能因重命名而改变）
    PropertiesUpdated { identifier: String, path: PathBuf },
    /// 语言文件已保存
    Saved { identifier: String, path: PathBuf },
    /// 未保存的修改已丢弃
    Discarded { identifier: String },
}

/// 会话事件监听器
pub trait ChangeListener {
    fn on_event(&self, event: &BundleEvent);
}

impl<F> ChangeListener for F
where
    F: Fn(&BundleEvent),
{
    fn on_event(&self, event: &BundleEvent) {
        self(event)
    }
}

/// 编辑会话
///
/// # 核心特性
/// - 默认语言文件在创建会话时加载一次，作为所有表格的参照
/// - 语言文件在第一次访问时加载，之后一直使用会话中的副本，直到保存或丢弃
/// - 有未保存修改的语言文件记录在 `pending` 中
pub struct EditSession<'c> {
    catalog: &'c Catalog,
    reference: MasterTranslationFile,
    bundles: BTreeMap<String, MasterTranslationFile>,
    dirty: BTreeSet<String>,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl<'c> EditSession<'c> {
    pub fn new(catalog: &'c Catalog) -> Result<Self, MtfError> {
        Ok(Self {
            catalog,
            reference: catalog.default_bundle()?,
            bundles: BTreeMap::new(),
            dirty: BTreeSet::new(),
            listeners: Vec::new(),
        })
    }

    /// 注册监听器
    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: BundleEvent) {
        tracing::trace!(?event, "发送会话事件");
        for listener in &self.listeners {
            listener.on_event(&event);
        }
    }

    /// 默认语言文件
    pub fn reference(&self) -> &MasterTranslationFile {
        &self.reference
    }

    /// 获取会话中的语言文件，尚未打开时从磁盘加载
    pub fn bundle(&mut self, identifier: &str) -> Result<&MasterTranslationFile, MtfError> {
        self.open(identifier).map(|bundle| &*bundle)
    }

    fn open(&mut self, identifier: &str) -> Result<&mut MasterTranslationFile, MtfError> {
        let id = BundleIdentifier::parse(identifier, self.catalog.namespace())?;
        match self.bundles.entry(id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let bundle = self.catalog.resolve_filename(id.filename())?;
                tracing::debug!(identifier, "语言文件已加入会话");
                Ok(entry.insert(bundle))
            }
        }
    }

    /// 设置键的值（空值表示删除）
    ///
    /// 值含换行时返回 `LineBreakInValue`，语言文件不变。
    /// 值没有实际变化时不标记为未保存，也不发送事件。
    ///
    /// # 返回
    /// 是否确实修改了语言文件
    pub fn set_value(&mut self, identifier: &str, key: &str, value: &str) -> Result<bool, MtfError> {
        ensure_single_line(key, value)?;

        let bundle = self.open(identifier)?;
        let recorded = bundle.changes().history().len();
        bundle.add(key, value);
        if bundle.changes().history().len() == recorded {
            tracing::debug!(identifier, key, "值没有变化");
            return Ok(false);
        }
        let id = bundle.identifier().to_string();

        self.dirty.insert(id.clone());
        self.emit(BundleEvent::ValueChanged {
            identifier: id,
            key: key.to_string(),
        });
        Ok(true)
    }

    /// 删除键
    pub fn delete_value(&mut self, identifier: &str, key: &str) -> Result<(), MtfError> {
        let bundle = self.open(identifier)?;
        bundle.delete(key)?;
        let id = bundle.identifier().to_string();

        self.dirty.insert(id.clone());
        self.emit(BundleEvent::ValueDeleted {
            identifier: id,
            key: key.to_string(),
        });
        Ok(())
    }

    /// 设置字体列表（空值删除字体行）
    pub fn set_font(&mut self, identifier: &str, fonts: &str) -> Result<(), MtfError> {
        ensure_single_line(KEY_LANGUAGE_FONT, fonts)?;

        let bundle = self.open(identifier)?;
        let before = bundle.primary_fragment().clone();
        bundle.set_language_font(fonts);
        if *bundle.primary_fragment() == before {
            return Ok(());
        }
        let id = bundle.identifier().to_string();

        self.dirty.insert(id.clone());
        self.emit(BundleEvent::ValueChanged {
            identifier: id,
            key: KEY_LANGUAGE_FONT.to_string(),
        });
        Ok(())
    }

    /// 修改语言属性并立即保存，语言代码改变时重命名文件
    ///
    /// # 返回
    /// 保存后的文件路径
    pub fn update_properties(
        &mut self,
        identifier: &str,
        writer: &dyn BundleWriter,
        language_name: &str,
        iso_code: &str,
        country: &str,
    ) -> Result<PathBuf, MtfError> {
        let catalog = self.catalog;
        let bundle = self.open(identifier)?;
        let old_id = bundle.identifier().to_string();

        let path = catalog.update_language_properties(bundle, writer, language_name, iso_code, country)?;
        let new_id = bundle.identifier().to_string();

        // 保存时已写入所有修改
        self.dirty.remove(&old_id);
        if new_id != old_id {
            if let Some(bundle) = self.bundles.remove(&old_id) {
                self.bundles.insert(new_id.clone(), bundle);
            }
        }

        self.emit(BundleEvent::PropertiesUpdated {
            identifier: new_id,
            path: path.clone(),
        });
        Ok(path)
    }

    /// 有未保存修改的语言文件标识符（按字典序）
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    pub fn is_pending(&self, identifier: &str) -> bool {
        self.dirty.contains(identifier)
    }

    /// 丢弃语言文件的未保存修改
    ///
    /// # 返回
    /// 是否确实丢弃了修改
    pub fn discard(&mut self, identifier: &str) -> bool {
        self.bundles.remove(identifier);
        let discarded = self.dirty.remove(identifier);
        if discarded {
            self.emit(BundleEvent::Discarded {
                identifier: identifier.to_string(),
            });
        }
        discarded
    }

    /// 保存所有有未保存修改的语言文件
    ///
    /// 已保存的语言文件从会话中移除，下次访问时重新加载。
    /// 中途失败时，尚未保存的语言文件保留在 `pending` 中。
    pub fn save_all(&mut self, writer: &dyn BundleWriter) -> Result<Vec<PathBuf>, MtfError> {
        let dir = self.catalog.language_dir();
        let mut saved = Vec::new();

        let pending: Vec<String> = self.dirty.iter().cloned().collect();
        for identifier in pending {
            let Some(bundle) = self.bundles.get(&identifier) else {
                self.dirty.remove(&identifier);
                continue;
            };

            let path = bundle.save_to_disk(writer, &dir)?;
            tracing::info!(identifier = %identifier, changes = %bundle.changes().summary(), "已保存");

            self.dirty.remove(&identifier);
            self.bundles.remove(&identifier);
            self.emit(BundleEvent::Saved {
                identifier,
                path: path.clone(),
            });
            saved.push(path);
        }

        Ok(saved)
    }

    /// 生成语言文件的表格行，并按过滤文本筛选
    pub fn rows(
        &mut self,
        identifier: &str,
        view: TranslationView,
        filter: &str,
    ) -> Result<Vec<TranslationRow>, MtfError> {
        self.open(identifier)?;
        let id = BundleIdentifier::parse(identifier, self.catalog.namespace())?.to_string();
        let local = self
            .bundles
            .get(&id)
            .ok_or_else(|| MtfError::MissingResource(id.clone()))?;

        Ok(filter_rows(build_rows(&self.reference, local, view), filter))
    }
}
