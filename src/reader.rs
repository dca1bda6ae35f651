//! Spreadsheet Reader Module
//!
//! 入力ファイルの拡張子に応じてパーサーを選択し、シート名による
//! シート選択とセル単位のアクセスを提供するモジュール。
//! Excel系（.xls / .xlsx）はcalamine、CSVはcsvクレートで読み込む。

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::ImportError;

/// ヘッダー行の数（データ行イテレーターがスキップする行数）
const HEADER_ROWS: usize = 1;

/// CSVバックエンドが公開する唯一のシート名
///
/// CSVファイルはシートの概念を持たないため、単一の表を`Sheet1`として
/// 公開します。結果として、CSV入力では規約上の5シートはすべて
/// 欠落シートとして扱われます（DESIGN.md参照）。
pub(crate) const CSV_SHEET_NAME: &str = "Sheet1";

/// スプレッドシートリーダー
///
/// 拡張子で選択されたバックエンド（calamineワークブックまたはCSV）を
/// ラップし、シート名によるアクセスを提供します。入力ファイルは
/// 読み取り専用で開かれ、それ以外の副作用はありません。
pub(crate) struct SpreadsheetReader {
    backend: Backend,
}

enum Backend {
    /// .xls / .xlsx（calamineの自動判別に委譲）
    Workbook(Sheets<BufReader<File>>),

    /// .csv（リーダーを保持し、シートが要求されるまで読み込まない。
    /// レコードの走査は一方向・1回限りで、消費後の再要求は欠落シート
    /// として扱われる）
    Csv {
        reader: Option<csv::Reader<File>>,
    },
}

impl SpreadsheetReader {
    /// 入力ファイルを開く
    ///
    /// # 引数
    ///
    /// * `path` - 入力ファイルのパス
    ///
    /// # 戻り値
    ///
    /// * `Ok(SpreadsheetReader)` - オープンに成功した場合。CSVはこの
    ///   時点ではレコードを読み込まない（`sheet`の呼び出し時に走査する）
    /// * `Err(ImportError::UnsupportedFormat)` - 拡張子が`.csv`、`.xls`、
    ///   `.xlsx`のいずれでもない場合（致命的エラー）
    /// * `Err(ImportError::Parse)` / `Err(ImportError::Csv)` - ファイルの
    ///   解析に失敗した場合
    pub fn open(path: &Path) -> Result<Self, ImportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match extension.as_str() {
            "xls" | "xlsx" => {
                let workbook = open_workbook_auto(path)?;
                Ok(Self {
                    backend: Backend::Workbook(workbook),
                })
            }
            "csv" => {
                let csv_reader = csv::ReaderBuilder::new()
                    .has_headers(false)
                    .flexible(true)
                    .from_path(path)?;

                Ok(Self {
                    backend: Backend::Csv {
                        reader: Some(csv_reader),
                    },
                })
            }
            _ => Err(ImportError::UnsupportedFormat { extension }),
        }
    }

    /// 存在するシート名の一覧を取得
    pub fn sheet_names(&self) -> Vec<String> {
        match &self.backend {
            Backend::Workbook(workbook) => workbook.sheet_names().to_vec(),
            Backend::Csv { .. } => vec![CSV_SHEET_NAME.to_string()],
        }
    }

    /// シートを名前で選択し、セルグリッドとして取得
    ///
    /// CSVバックエンドはこの呼び出しで初めてレコードを走査します。
    /// 走査は1回限りで、消費済みの表を再度要求すると`Ok(None)`に
    /// なります（インポートパイプラインは各シートを1回しか要求しない）。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Some(SheetGrid))` - シートが存在する場合
    /// * `Ok(None)` - シートが存在しない場合（回復可能: 呼び出し側が
    ///   欠落シートのエラーレコードを積む）
    /// * `Err(ImportError)` - シートの解析に失敗した場合
    pub fn sheet(&mut self, name: &str) -> Result<Option<SheetGrid>, ImportError> {
        match &mut self.backend {
            Backend::Workbook(workbook) => {
                if !workbook.sheet_names().iter().any(|n| n == name) {
                    return Ok(None);
                }
                let range = workbook.worksheet_range(name)?;
                Ok(Some(SheetGrid {
                    rows: grid_from_range(&range),
                }))
            }
            Backend::Csv { reader } => {
                if name != CSV_SHEET_NAME {
                    return Ok(None);
                }
                let Some(mut csv_reader) = reader.take() else {
                    return Ok(None);
                };

                let mut rows = Vec::new();
                for record in csv_reader.records() {
                    let record = record?;
                    rows.push(record.iter().map(|field| field.to_string()).collect());
                }
                Ok(Some(SheetGrid { rows }))
            }
        }
    }
}

/// 1シート分のセルグリッド
///
/// セル値はすべて文字列に正規化済み。座標は0始まりで、calamineの
/// 使用範囲（used range）によるオフセットは吸収されています。
pub(crate) struct SheetGrid {
    rows: Vec<Vec<String>>,
}

impl SheetGrid {
    /// セル値を(行, 列)で取得（0始まり）
    ///
    /// 範囲外のセルは空文字列を返します。
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// ヘッダー行をスキップしたデータ行の前方向イテレーター
    pub fn data_rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().skip(HEADER_ROWS).map(Vec::as_slice)
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

/// calamineの範囲を絶対座標のグリッドに変換
///
/// calamineの`Range`は使用セルの左上を原点とするため、そのまま列挙すると
/// 先頭の空行・空列の分だけカラムオフセットがずれます。開始座標より
/// 手前を空文字列で埋めて、常に(0, 0)起点のグリッドを返します。
fn grid_from_range(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some(start) = range.start() else {
        return Vec::new();
    };
    let Some(end) = range.end() else {
        return Vec::new();
    };

    let width = end.1 as usize + 1;
    let mut rows = vec![vec![String::new(); width]; end.0 as usize + 1];

    for (row_offset, row) in range.rows().enumerate() {
        let abs_row = start.0 as usize + row_offset;
        for (col_offset, value) in row.iter().enumerate() {
            let abs_col = start.1 as usize + col_offset;
            rows[abs_row][abs_col] = data_to_string(value);
        }
    }

    rows
}

/// セル値を文字列に正規化
///
/// 整数値の数値セルは小数点以下を付けずに変換します（レッスン番号`3`が
/// `"3.0"`にならないようにするため）。
fn data_to_string(value: &Data) -> String {
    match value {
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 => {
            (*f as i64).to_string()
        }
        Data::Float(f) => f.to_string(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("{:?}", e),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
