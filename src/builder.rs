//! Builder Module
//!
//! Fluent Builder APIを提供し、`Importer`インスタンスを段階的に構築する。
//! `Importer`はインポートパイプライン全体（読み込み → パース →
//! バリデーション → グルーピング → レンダリング → パッケージング）の
//! ファサードとなる。

use std::fs;
use std::path::{Path, PathBuf};

use crate::archive;
use crate::error::ImportError;
use crate::group::partition_questions;
use crate::library;
use crate::olx::{problem_file_name, ProblemFormatter, PROBLEM_DIR};
use crate::reader::SpreadsheetReader;
use crate::rows;
use crate::types::{ErrorRecord, LibraryInfo, Question};
use crate::validate;

/// ライブラリ記述シートの名前（大文字小文字・空白も規約どおり）
pub(crate) const SHEET_LIBRARY_DESCRIPTION: &str = "Library Description";
/// チェックボックス問題シートの名前
pub(crate) const SHEET_CHECKBOXES: &str = "Checkboxes";
/// 単一選択問題シートの名前
pub(crate) const SHEET_MULTIPLE_CHOICE: &str = "Multiple Choice-Drop Down";
/// 数値入力問題シートの名前
pub(crate) const SHEET_NUMERICAL: &str = "Numerical Input";
/// テキスト入力問題シートの名前
pub(crate) const SHEET_TEXT_INPUT: &str = "Text Input";

/// 最終成果物内のトップレベルフォルダ名
const STAGING_DIR: &str = "question_banks";

/// エラーレポートのファイル名
const ERRORS_FILE: &str = "errors.txt";

/// インポート処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ImportConfig {
    /// 最終アーカイブの出力先（Noneの場合は入力ファイルと同じディレクトリ）
    pub output_dir: Option<PathBuf>,

    /// 数値問題の許容誤差
    pub tolerance: String,

    /// `Library Description`シートが欠落している場合のライブラリ名
    pub fallback_library_name: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            tolerance: "5%".to_string(),
            fallback_library_name: "library".to_string(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Importer`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみを
/// オーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use olxbank::ImporterBuilder;
///
/// # fn main() -> Result<(), olxbank::ImportError> {
/// let importer = ImporterBuilder::new()
///     .with_output_dir("/tmp/banks")
///     .with_tolerance("1%")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ImporterBuilder {
    /// 内部設定（構築中）
    config: ImportConfig,
}

impl ImporterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 出力先: 入力ファイルと同じディレクトリ
    /// - 数値問題の許容誤差: `5%`
    /// - フォールバックのライブラリ名: `library`
    pub fn new() -> Self {
        Self {
            config: ImportConfig::default(),
        }
    }

    /// 最終アーカイブの出力先ディレクトリを指定する
    ///
    /// 存在しない場合はインポート時に作成されます。
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    /// 数値問題の許容誤差を指定する
    ///
    /// `<responseparam type="tolerance">`の`default`属性にそのまま
    /// 出力されます（例: `5%`、`0.01`）。
    pub fn with_tolerance(mut self, tolerance: impl Into<String>) -> Self {
        self.config.tolerance = tolerance.into();
        self
    }

    /// `Library Description`シート欠落時に使用するライブラリ名を指定する
    pub fn with_fallback_library_name(mut self, name: impl Into<String>) -> Self {
        self.config.fallback_library_name = name.into();
        self
    }

    /// 設定を検証し、`Importer`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `ImportError::Config(String)`: 設定の検証に失敗した場合
    ///   * 許容誤差が空文字列
    ///   * フォールバックのライブラリ名が空文字列
    pub fn build(self) -> Result<Importer, ImportError> {
        if self.config.tolerance.trim().is_empty() {
            return Err(ImportError::Config(
                "Tolerance must not be empty".to_string(),
            ));
        }

        if self.config.fallback_library_name.trim().is_empty() {
            return Err(ImportError::Config(
                "Fallback library name must not be empty".to_string(),
            ));
        }

        Ok(Importer::new(self.config))
    }
}

/// 1回のインポートの結果
///
/// 外部境界（Webレイヤーなど）との契約: `error_lines`が空なら成功として
/// アーカイブを提示し、非空なら警告とともにエラーレポートをダウンロード
/// 可能にします。部分的な成功が黙って成功扱いになることはありません。
#[derive(Debug)]
pub struct ImportOutcome {
    /// 最終成果物（tar.gzアーカイブ）のパス
    pub archive_path: PathBuf,

    /// エラーレポートの各行（発生順）
    pub error_lines: Vec<String>,
}

impl ImportOutcome {
    /// エラーレコードが1件もなかったかどうか
    pub fn is_success(&self) -> bool {
        self.error_lines.is_empty()
    }
}

/// インポート処理のファサード
///
/// 問題バンクスプレッドシートをOLXコンテンツライブラリのアーカイブに
/// 変換するためのメインエントリーポイントです。パイプラインは全体が
/// 同期・単一スレッドで、インポートごとに固有の一時ディレクトリを
/// 使用するため、共有可変状態はありません。
///
/// # 使用例
///
/// ```rust,no_run
/// use olxbank::ImporterBuilder;
/// use std::path::Path;
///
/// # fn main() -> Result<(), olxbank::ImportError> {
/// let importer = ImporterBuilder::new().build()?;
/// let outcome = importer.import(Path::new("bank.xlsx"))?;
/// if outcome.is_success() {
///     println!("archive: {}", outcome.archive_path.display());
/// } else {
///     for line in &outcome.error_lines {
///         eprintln!("{}", line);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Importer {
    /// インポート設定
    config: ImportConfig,
}

impl Importer {
    pub(crate) fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// スプレッドシートをインポートし、最終アーカイブを生成する
    ///
    /// # 引数
    ///
    /// * `input` - 入力ファイルのパス（`.csv` / `.xls` / `.xlsx`）
    ///
    /// # 戻り値
    ///
    /// * `Ok(ImportOutcome)` - インポートが完了した場合。回復可能エラー
    ///   （不正な行、欠落シート、書き込み失敗）は`error_lines`に発生順で
    ///   集約され、アーカイブ内の`errors.txt`にも書き出される
    /// * `Err(ImportError)` - 致命的エラーの場合（未対応の拡張子、入力の
    ///   解析失敗、アーカイブ組み立ての失敗）
    ///
    /// # 処理フロー
    ///
    /// 1. リーダーの初期化（拡張子によるバックエンド選択）
    /// 2. ライブラリ記述の読み込み
    /// 3. 各データシートの読み込み（固定走査順）、行のパースと
    ///    バリデーション
    /// 4. レッスン × 難易度でのパーティション分割
    /// 5. 各パーティションのバンドル生成（問題XML + ライブラリ記述 +
    ///    ポリシー）とtar.gz圧縮
    /// 6. ステージングフォルダへの集約（エラーレポートを含む）と
    ///    最終アーカイブの生成
    pub fn import(&self, input: &Path) -> Result<ImportOutcome, ImportError> {
        log::debug!("importing question bank from {}", input.display());

        // 1. リーダーの初期化
        let mut reader = SpreadsheetReader::open(input)?;
        log::debug!("sheets present: {:?}", reader.sheet_names());
        let mut records: Vec<ErrorRecord> = Vec::new();

        // 2. ライブラリ記述の読み込み
        let library_info = self.read_library_info(&mut reader, &mut records)?;

        // 3. 各データシートの読み込み（走査順は固定）
        type RowParser = fn(&[String]) -> Option<Question>;
        let scan: [(&str, RowParser); 4] = [
            (SHEET_CHECKBOXES, rows::parse_checkbox),
            (SHEET_MULTIPLE_CHOICE, rows::parse_multiple_choice),
            (SHEET_NUMERICAL, rows::parse_numerical),
            (SHEET_TEXT_INPUT, rows::parse_text_input),
        ];

        let mut question_lists = Vec::with_capacity(scan.len());
        for (sheet_name, parser) in scan {
            question_lists.push(self.read_questions(&mut reader, sheet_name, parser, &mut records)?);
        }

        // 4. パーティション分割
        let partitions = partition_questions(question_lists);
        log::debug!("{} partition(s) to package", partitions.len());

        // 5.-6. パッケージング（インポートごとに固有の一時ディレクトリ、
        // RAIIによりすべての経路で解放される）
        let workdir = tempfile::tempdir()?;
        let staging = workdir.path().join(STAGING_DIR);
        fs::create_dir_all(&staging)?;

        for partition in &partitions {
            let bundle_dir = workdir.path().join(partition.folder_name());
            self.write_bundle(partition, &library_info, &bundle_dir, &mut records)?;
            archive::compress_dir(
                &bundle_dir,
                &staging.join(partition.archive_name()),
                &partition.folder_name(),
            )?;
        }

        if !records.is_empty() {
            let mut report = records
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            report.push('\n');
            fs::write(staging.join(ERRORS_FILE), report)?;
        }

        let archive_path = self.archive_destination(input)?;
        archive::compress_dir(&staging, &archive_path, STAGING_DIR)?;

        log::debug!(
            "import finished: {} ({} error line(s))",
            archive_path.display(),
            records.len()
        );

        Ok(ImportOutcome {
            archive_path,
            error_lines: records.iter().map(ToString::to_string).collect(),
        })
    }

    /// `Library Description`シートから名前・組織・コードを読み込む
    ///
    /// 値は固定セル（A1 = 名前、A2 = 組織、A3 = コード）にあります。
    /// シートが欠落している場合はエラーレコードを積み、フォールバックの
    /// ライブラリ名で処理を継続します。
    fn read_library_info(
        &self,
        reader: &mut SpreadsheetReader,
        records: &mut Vec<ErrorRecord>,
    ) -> Result<LibraryInfo, ImportError> {
        match reader.sheet(SHEET_LIBRARY_DESCRIPTION)? {
            Some(grid) => Ok(LibraryInfo {
                name: grid.cell(0, 0).to_string(),
                org: grid.cell(1, 0).to_string(),
                code: grid.cell(2, 0).to_string(),
            }),
            None => {
                log::warn!(
                    "sheet '{}' not found, falling back to library name '{}'",
                    SHEET_LIBRARY_DESCRIPTION,
                    self.config.fallback_library_name
                );
                records.push(ErrorRecord::MissingSheet {
                    sheet: SHEET_LIBRARY_DESCRIPTION.to_string(),
                });
                Ok(LibraryInfo {
                    name: self.config.fallback_library_name.clone(),
                    org: String::new(),
                    code: String::new(),
                })
            }
        }
    }

    /// 1シート分の問題を読み込み、バリデーションする
    ///
    /// 不正な行はエラーレコードとして行順に積まれ、有効な問題のみが
    /// 返されます。シートが欠落している場合はエラーレコード1件と
    /// 空リストになります（回復可能）。
    fn read_questions(
        &self,
        reader: &mut SpreadsheetReader,
        sheet_name: &str,
        parser: fn(&[String]) -> Option<Question>,
        records: &mut Vec<ErrorRecord>,
    ) -> Result<Vec<Question>, ImportError> {
        let Some(grid) = reader.sheet(sheet_name)? else {
            log::warn!("sheet '{}' not found, treating as empty", sheet_name);
            records.push(ErrorRecord::MissingSheet {
                sheet: sheet_name.to_string(),
            });
            return Ok(Vec::new());
        };

        let mut questions = Vec::new();
        for row in grid.data_rows() {
            // タイトルが空白の行はシート末尾の空行として黙ってスキップ
            let Some(question) = parser(row) else {
                continue;
            };

            match validate::rejection(&question) {
                None => questions.push(question),
                Some(record) => records.push(record),
            }
        }

        Ok(questions)
    }

    /// 1パーティション分のバンドル（問題XML + ライブラリ記述 + ポリシー）
    /// をフォルダに書き出す
    ///
    /// 個々の問題のレンダリング・書き込み失敗はベストエフォートで処理
    /// します。失敗した問題はスキップしてログとエラーレコードに残し、
    /// 残りの問題の処理を続行します。
    fn write_bundle(
        &self,
        partition: &crate::types::Partition,
        library_info: &LibraryInfo,
        bundle_dir: &Path,
        records: &mut Vec<ErrorRecord>,
    ) -> Result<(), ImportError> {
        let problem_dir = bundle_dir.join(PROBLEM_DIR);
        fs::create_dir_all(&problem_dir)?;

        for question in &partition.questions {
            let formatter = ProblemFormatter::from_type(question.question_type);
            let written = formatter
                .render(question, &self.config.tolerance)
                .and_then(|xml| {
                    fs::write(problem_dir.join(problem_file_name(question)), xml)
                        .map_err(ImportError::from)
                });

            if let Err(e) = written {
                log::warn!(
                    "failed to write problem '{}': {}",
                    question.display_name(),
                    e
                );
                records.push(ErrorRecord::RenderFailure {
                    display_name: question.display_name(),
                    reason: e.to_string(),
                });
            }
        }

        library::write_descriptor(library_info, partition, bundle_dir)
    }

    /// 最終アーカイブの出力先パスを決定する
    fn archive_destination(&self, input: &Path) -> Result<PathBuf, ImportError> {
        let output_dir = match &self.config.output_dir {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        fs::create_dir_all(&output_dir)?;

        let stem = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(STAGING_DIR);
        Ok(output_dir.join(format!("{}_library.tar.gz", stem)))
    }
}
