use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use mtf_editor::io::DefaultBundleWriter;
use mtf_editor::telemetry::{self, Verbosity};
use mtf_editor::{BundleComparison, Catalog, EditSession, EditorConfig, MasterTranslationFile, TranslationView};

#[derive(Parser)]
#[command(name = "mtf_editor")]
#[command(about = "编辑由多个来源组合而成的 key=value 翻译文件，保留注释和行顺序")]
#[command(version = "0.1.0")]
struct Cli {
    /// JSON 配置文件路径
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 语言文件目录（覆盖配置）
    #[arg(long, global = true)]
    language_dir: Option<PathBuf>,

    /// 插件目录（覆盖配置）
    #[arg(long, global = true)]
    plugins_dir: Option<PathBuf>,

    /// 默认语言文件（覆盖配置）
    #[arg(long, global = true)]
    default_bundle: Option<PathBuf>,

    /// 以 JSON 格式输出
    #[arg(long, global = true)]
    json: bool,

    /// 静默模式(仅输出错误)
    #[arg(long, global = true)]
    quiet: bool,

    /// 输出更多日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 列出语言目录中的所有语言文件
    List,
    /// 显示语言文件的全部键值
    Show {
        /// 标识符或文件名
        bundle: String,
        /// 按片段输出原始行
        #[arg(long)]
        raw: bool,
    },
    /// 读取一个键的值
    Get { bundle: String, key: String },
    /// 设置一个键的值并保存（空值表示删除）
    Set { bundle: String, key: String, value: String },
    /// 删除一个键并保存（写为 `key=` 墓碑行）
    Delete { bundle: String, key: String },
    /// 列出相对默认语言文件缺失的翻译
    Missing {
        bundle: String,
        /// 只显示任意一列包含该文本的行（不区分大小写）
        #[arg(long, default_value = "")]
        filter: String,
        /// 显示全部键而不只是缺失的键
        #[arg(long)]
        all: bool,
    },
    /// 对比两个语言文件的键
    Compare { first: String, second: String },
    /// 新建语言文件
    New {
        /// 语言的自称
        #[arg(long)]
        name: String,
        /// ISO-639-1 语言代码
        #[arg(long)]
        iso: String,
        /// ISO-3166 国家代码
        #[arg(long)]
        country: String,
    },
    /// 修改语言文件的语言属性
    Properties {
        bundle: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        iso: Option<String>,
        #[arg(long)]
        country: Option<String>,
        /// 逗号分隔的字体列表，空字符串表示删除
        #[arg(long)]
        font: Option<String>,
    },
    /// 删除语言文件
    Remove { bundle: String },
    /// 把默认语言文件和所有语言文件写入目标目录
    Export { target_dir: PathBuf },
}

/// `list` 命令的输出行
#[derive(Serialize)]
struct BundleListing {
    identifier: String,
    language_code: Option<String>,
    language_name: Option<String>,
    country: Option<String>,
    keys: usize,
}

impl From<&MasterTranslationFile> for BundleListing {
    fn from(bundle: &MasterTranslationFile) -> Self {
        Self {
            identifier: bundle.identifier().to_string(),
            language_code: bundle.language_code().map(str::to_string),
            language_name: bundle.language_name().map(str::to_string),
            country: bundle.country().map(str::to_string),
            keys: bundle.len(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(Verbosity::from_flags(cli.quiet, cli.verbose));

    let config = load_config(&cli)?;
    let catalog = Catalog::from_config(&config).context("初始化语言文件目录失败")?;
    let writer = DefaultBundleWriter::new(config.encoding()?).with_backup(config.backup_on_save);

    match &cli.command {
        Command::List => handle_list(&cli, &catalog),
        Command::Show { bundle, raw } => handle_show(&cli, &catalog, bundle, *raw),
        Command::Get { bundle, key } => {
            let bundle = load_bundle(&catalog, bundle)?;
            let value = bundle.get(key)?;
            print_output(&cli, &value, || value.to_string())
        }
        Command::Set { bundle, key, value } => {
            let identifier = editable_identifier(&catalog, bundle)?;
            let mut session = EditSession::new(&catalog)?;
            session.set_value(&identifier, key, value)?;
            save_session(&cli, &mut session, &writer)
        }
        Command::Delete { bundle, key } => {
            let identifier = editable_identifier(&catalog, bundle)?;
            let mut session = EditSession::new(&catalog)?;
            session
                .delete_value(&identifier, key)
                .with_context(|| format!("无法删除 {} 中的 {}", identifier, key))?;
            save_session(&cli, &mut session, &writer)
        }
        Command::Missing { bundle, filter, all } => {
            let identifier = editable_identifier(&catalog, bundle)?;
            let view = if *all { TranslationView::All } else { TranslationView::Missing };
            let rows = EditSession::new(&catalog)?.rows(&identifier, view, filter)?;
            print_output(&cli, &rows, || {
                rows.iter()
                    .map(|row| format!("{} = {} | {}", row.key, row.reference_value, row.local_value))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Compare { first, second } => handle_compare(&cli, &catalog, first, second),
        Command::New { name, iso, country } => {
            let bundle = catalog.create_language_file(name, iso, country)?;
            let listing = BundleListing::from(&bundle);
            print_output(&cli, &listing, || format!("已新建 {}", listing.identifier))
        }
        Command::Properties { bundle, name, iso, country, font } => {
            let identifier = editable_identifier(&catalog, bundle)?;
            handle_properties(&cli, &catalog, &writer, &identifier, name, iso, country, font)
        }
        Command::Remove { bundle } => {
            let path = catalog.delete_language_file(&editable_identifier(&catalog, bundle)?)?;
            print_output(&cli, &path, || format!("已删除 {}", path.display()))
        }
        Command::Export { target_dir } => {
            let written = catalog.export_all(&writer, target_dir)?;
            print_output(&cli, &written, || format!("已导出 {} 个文件到 {}", written.len(), target_dir.display()))
        }
    }
}

/// 读取配置文件并应用命令行覆盖
fn load_config(cli: &Cli) -> Result<EditorConfig> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path).with_context(|| format!("读取配置文件失败: {:?}", path))?,
        None => EditorConfig::default(),
    };

    if let Some(dir) = &cli.language_dir {
        config.language_dir = dir.clone();
    }
    if let Some(dir) = &cli.plugins_dir {
        config.plugins_dir = Some(dir.clone());
    }
    if let Some(path) = &cli.default_bundle {
        config.default_bundle = Some(path.clone());
    }

    Ok(config)
}

/// 命令行参数可以是完整标识符，也可以只是文件名
fn to_identifier(catalog: &Catalog, bundle: &str) -> String {
    if bundle.contains(':') {
        bundle.to_string()
    } else {
        catalog.identifier_for(bundle).to_string()
    }
}

fn is_default_identifier(catalog: &Catalog, identifier: &str) -> bool {
    identifier == catalog.identifier_for(&catalog.pattern().default_filename()).to_string()
}

/// 可编辑语言文件的标识符
///
/// 默认语言文件的文件名在只读命令中指向默认语言文件，
/// 编辑类命令拒绝它，以免改动语言目录中同名的另一个文件。
fn editable_identifier(catalog: &Catalog, bundle: &str) -> Result<String> {
    let identifier = to_identifier(catalog, bundle);
    if is_default_identifier(catalog, &identifier) {
        bail!("默认语言文件 {} 是只读的", identifier);
    }
    Ok(identifier)
}

/// 加载语言文件；默认语言文件的文件名对应默认语言文件
fn load_bundle(catalog: &Catalog, bundle: &str) -> Result<MasterTranslationFile> {
    let identifier = to_identifier(catalog, bundle);
    if is_default_identifier(catalog, &identifier) {
        return Ok(catalog.default_bundle()?);
    }
    catalog
        .resolve(&identifier)
        .with_context(|| format!("无法加载语言文件 {}", identifier))
}

fn print_output<T: Serialize + ?Sized>(cli: &Cli, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else if !cli.quiet {
        let text = text();
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    Ok(())
}

fn save_session(cli: &Cli, session: &mut EditSession<'_>, writer: &DefaultBundleWriter) -> Result<()> {
    let saved = session.save_all(writer)?;
    print_output(cli, &saved, || {
        saved
            .iter()
            .map(|path| format!("已保存 {}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn handle_list(cli: &Cli, catalog: &Catalog) -> Result<()> {
    let listings: Vec<BundleListing> = catalog.list()?.iter().map(BundleListing::from).collect();

    print_output(cli, &listings, || {
        listings
            .iter()
            .map(|l| {
                format!(
                    "{}\t{}\t{}\t{} 个键",
                    l.identifier,
                    l.language_code.as_deref().unwrap_or("-"),
                    l.language_name.as_deref().unwrap_or("-"),
                    l.keys
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn handle_show(cli: &Cli, catalog: &Catalog, bundle: &str, raw: bool) -> Result<()> {
    let bundle = load_bundle(catalog, bundle)?;

    if raw {
        let fragments: Vec<(String, Vec<String>)> = bundle
            .fragments()
            .iter()
            .map(|f| (f.description().to_string(), f.lines().map(str::to_string).collect()))
            .collect();
        return print_output(cli, &fragments, || {
            fragments
                .iter()
                .map(|(description, lines)| format!("## {}\n{}", description, lines.join("\n")))
                .collect::<Vec<_>>()
                .join("\n")
        });
    }

    print_output(cli, bundle.properties(), || {
        bundle
            .properties()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn handle_compare(cli: &Cli, catalog: &Catalog, first: &str, second: &str) -> Result<()> {
    let a = load_bundle(catalog, first)?;
    let b = load_bundle(catalog, second)?;
    let comparison = BundleComparison::new(&a, &b);
    let summary = comparison.summary();

    print_output(cli, &summary, || {
        let mut out = vec![format!(
            "{}: 仅在前者 {}，仅在后者 {}，共有 {}（值不同 {}）",
            summary.first, summary.only_in_first, summary.only_in_second, summary.common, summary.differing
        )];
        out.extend(comparison.keys_in_1_only().iter().map(|k| format!("- {}", k)));
        out.extend(comparison.keys_in_2_only().iter().map(|k| format!("+ {}", k)));
        out.join("\n")
    })
}

#[allow(clippy::too_many_arguments)]
fn handle_properties(
    cli: &Cli,
    catalog: &Catalog,
    writer: &DefaultBundleWriter,
    identifier: &str,
    name: &Option<String>,
    iso: &Option<String>,
    country: &Option<String>,
    font: &Option<String>,
) -> Result<()> {
    if name.is_none() && iso.is_none() && country.is_none() && font.is_none() {
        bail!("至少需要指定 --name、--iso、--country 或 --font 之一");
    }

    let mut session = EditSession::new(catalog)?;
    let mut identifier = identifier.to_string();

    if let Some(fonts) = font {
        session.set_font(&identifier, fonts)?;
    }

    if name.is_some() || iso.is_some() || country.is_some() {
        let current = session.bundle(&identifier)?;
        let name = name.clone().or_else(|| current.language_name().map(str::to_string)).unwrap_or_default();
        let iso = match iso.clone().or_else(|| current.language_code().map(str::to_string)) {
            Some(iso) => iso,
            None => bail!("语言文件没有语言代码，请指定 --iso"),
        };
        let country = country.clone().or_else(|| current.country().map(str::to_string)).unwrap_or_default();

        let path = session.update_properties(&identifier, writer, &name, &iso, &country)?;
        identifier = catalog
            .identifier_for(&file_name(&path))
            .to_string();
    }

    save_session(cli, &mut session, writer)?;
    if !cli.quiet && !cli.json {
        println!("已更新 {}", identifier);
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
