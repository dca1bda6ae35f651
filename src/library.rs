//! Library Descriptor Module
//!
//! 1パーティション分のライブラリ記述（マニフェストXMLとポリシー
//! プレースホルダー）を生成するモジュール。マニフェストのライブラリ名と
//! コードには`_<レッスン><難易度コード>`の接尾辞が付与される。

use quick_xml::Writer;
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::error::ImportError;
use crate::olx::problem_file_name;
use crate::types::{LibraryInfo, Partition};

/// ライブラリ記述ファイルの名前
pub(crate) const LIBRARY_XML: &str = "library.xml";

/// ポリシーフォルダの名前
pub(crate) const POLICIES_DIR: &str = "policies";

/// アセット定義プレースホルダーの名前
pub(crate) const ASSETS_JSON: &str = "assets.json";

/// パーティションのライブラリ接尾辞（例: `1E`）
fn partition_suffix(partition: &Partition) -> String {
    format!("{}{}", partition.lesson, partition.difficulty.code())
}

/// ライブラリ記述XMLをレンダリングする
///
/// ルート要素は`xblock-family`・`display_name`・`org`・`library`属性を
/// 持ち、パーティション順に1問題につき1つの`<problem url_name="..."/>`
/// 参照を並べます。`url_name`は問題ファイル名の拡張子を除いた部分と
/// 一致します。
pub(crate) fn render_library_xml(
    info: &LibraryInfo,
    partition: &Partition,
) -> Result<String, ImportError> {
    let suffix = partition_suffix(partition);
    let display_name = format!("{}_{}", info.name, suffix);
    let library_code = format!("{}_{}", info.code, suffix);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .create_element("library")
        .with_attribute(("xblock-family", "xblock.v1"))
        .with_attribute(("display_name", display_name.as_str()))
        .with_attribute(("org", info.org.as_str()))
        .with_attribute(("library", library_code.as_str()))
        .write_inner_content(|w| -> quick_xml::Result<()> {
            for question in &partition.questions {
                let file_name = problem_file_name(question);
                let url_name = file_name.trim_end_matches(".xml");
                w.create_element("problem")
                    .with_attribute(("url_name", url_name))
                    .write_empty()?;
            }
            Ok(())
        })?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| ImportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// ライブラリ記述一式をパーティションフォルダに書き込む
///
/// `library.xml`と、プラットフォームが要求する空のアセット定義
/// （`policies/assets.json`、空のJSONオブジェクト）を生成します。
///
/// パーティションが空の場合は何もしません。
pub(crate) fn write_descriptor(
    info: &LibraryInfo,
    partition: &Partition,
    bundle_dir: &Path,
) -> Result<(), ImportError> {
    if partition.questions.is_empty() {
        return Ok(());
    }

    let xml = render_library_xml(info, partition)?;
    fs::write(bundle_dir.join(LIBRARY_XML), xml)?;

    let policies_dir = bundle_dir.join(POLICIES_DIR);
    fs::create_dir_all(&policies_dir)?;
    let assets = serde_json::to_string(&json!({})).unwrap_or_else(|_| "{}".to_string());
    fs::write(policies_dir.join(ASSETS_JSON), assets)?;

    Ok(())
}
