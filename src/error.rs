//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// olxbankクレート全体で使用するエラー型
///
/// このエラー型は、スプレッドシートの読み込み、問題バンクの変換、
/// アーカイブ生成中に発生する致命的エラーを統一的に扱うために使用されます。
///
/// # エラーの分類
///
/// インポート処理のエラーは2段階に分かれます。
///
/// - 致命的エラー（この型）: インポート全体を中断する。未対応の拡張子、
///   入力ファイルのI/O失敗、アーカイブ組み立ての失敗など。
/// - 回復可能エラー: 行単位・シート単位・出力単位の問題。`ErrorRecord`として
///   収集され、エラーレポート（`errors.txt`）に集約される。インポート自体は
///   継続する。
///
/// # 使用例
///
/// ```rust,no_run
/// use olxbank::{ImportError, ImporterBuilder};
/// use std::path::Path;
///
/// fn import_bank(path: &Path) -> Result<(), ImportError> {
///     let importer = ImporterBuilder::new().build()?;
///     let outcome = importer.import(path)?;
///     println!("archive: {}", outcome.archive_path.display());
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ImportError {
    /// I/O操作中に発生したエラー
    ///
    /// 入力ファイルの読み込み失敗、作業ディレクトリの作成失敗など、
    /// 標準ライブラリの`std::io::Error`が発生した場合に使用されます。
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイル（.xls / .xlsx）の解析中に発生したエラー
    ///
    /// calamineクレートがワークブックを解析する際に発生したエラーです。
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// CSVファイルの解析中に発生したエラー
    #[error("Failed to parse CSV file: {0}")]
    Csv(#[from] csv::Error),

    /// XML出力の生成中に発生したエラー
    ///
    /// quick-xmlのWriterが問題定義XMLまたはライブラリ記述XMLを
    /// 生成する際に発生したエラーです。
    #[error("Failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// 未対応のファイル拡張子
    ///
    /// 入力ファイルの拡張子が`.csv`、`.xls`、`.xlsx`のいずれでもない
    /// 場合に発生します。インポート全体を中断する唯一の入力起因エラーです。
    #[error("Unsupported file format: '{extension}' (expected .csv, .xls or .xlsx)")]
    UnsupportedFormat {
        /// 入力ファイルの拡張子（拡張子がない場合は空文字列）
        extension: String,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `ImporterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、数値問題の許容誤差が空文字列の場合などです。
    #[error("Configuration error: {0}")]
    Config(String),

    /// アーカイブの組み立てに失敗したエラー
    ///
    /// tar.gzアーカイブの生成中に発生したエラーです。個々の問題ファイルの
    /// 書き込み失敗は回復可能エラーとして扱われますが、パーティション
    /// アーカイブや最終成果物の組み立て失敗はインポート全体を中断します。
    #[error("Archive error: {0}")]
    Archive(String),
}
