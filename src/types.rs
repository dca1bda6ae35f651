//! Types Module
//!
//! クレート全体で使用する問題バンクのデータ型を定義するモジュール。
//! すべてのエンティティは1回のインポート呼び出し内でのみ生存し、
//! 永続化されない。

use std::fmt;

/// 問題の種別
///
/// スプレッドシートの各データシートに1対1で対応します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// 複数選択（チェックボックス）
    Checkbox,

    /// 単一選択（ドロップダウン）
    MultipleChoice,

    /// 数値入力
    Numerical,

    /// テキスト入力
    TextInput,
}

impl QuestionType {
    /// 種別コードを取得（エラーレポートで使用）
    pub fn code(&self) -> &'static str {
        match self {
            QuestionType::Checkbox => "CHECKBOX",
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
            QuestionType::Numerical => "NUMERICAL",
            QuestionType::TextInput => "TEXT_INPUT",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 問題の難易度
///
/// スプレッドシート上の表記は1文字コード（`E` / `M` / `H`）または
/// 英語表記（`Easy` / `Medium` / `Hard`）を受け付け、認識できない値は
/// `Hard`に正規化されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 難易度コード（`E` / `M` / `H`）を取得
    ///
    /// 問題ファイル名、`display_name`、パーティションアーカイブ名の
    /// 接尾辞として使用されます。
    pub fn code(&self) -> &'static str {
        match self {
            Difficulty::Easy => "E",
            Difficulty::Medium => "M",
            Difficulty::Hard => "H",
        }
    }

    /// セル値を難易度に正規化
    ///
    /// # 正規化規則
    ///
    /// * `E` / `Easy`（大文字小文字・前後空白を無視）→ `Easy`
    /// * `M` / `Medium` → `Medium`
    /// * それ以外（`H` / `Hard` / 未知の値）→ `Hard`
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "E" | "EASY" => Difficulty::Easy,
            "M" | "MEDIUM" => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    /// 難易度の走査順（Easy → Medium → Hard）
    pub(crate) const ORDER: [Difficulty; 3] =
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 1問分の問題レコード
///
/// 行パーサーが固定カラムレイアウトから構築する中心エンティティ。
/// パース後は読み取り専用で、グルーピングとレンダリングへの入力と
/// なります。全フィールドは文字列として保持され、`difficulty`の正規化は
/// 参照時に行われます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 問題種別
    pub question_type: QuestionType,

    /// タイトル（レッスン+難易度バケット内で一意なラベル）
    pub title: String,

    /// コースコード
    pub course_code: String,

    /// レッスン識別子（グルーピングキー）
    pub lesson: String,

    /// 学習目標（任意）
    pub learning_objective: String,

    /// 問題文
    pub content: String,

    /// 難易度のセル値（正規化前）
    pub difficulty: String,

    /// 選択肢（最大5個、選択型のみ。非選択型では空文字列）
    pub choices: [String; 5],

    /// 解答（形式は種別に依存）
    pub answer: String,

    /// ヒント（任意）
    pub hint: String,

    /// フィードバック（最大5個、任意）
    pub feedbacks: [String; 5],

    /// ステータス（任意）
    pub status: String,
}

impl Question {
    /// 正規化された難易度を取得
    pub fn difficulty_level(&self) -> Difficulty {
        Difficulty::normalize(&self.difficulty)
    }

    /// 問題の表示名（難易度コード + タイトル）
    ///
    /// 問題XMLの`display_name`属性、問題ファイル名、ライブラリ記述の
    /// `url_name`参照のすべてで同一の値を使用します。
    pub fn display_name(&self) -> String {
        format!("{}{}", self.difficulty_level().code(), self.title)
    }
}

/// ライブラリ記述（名前・組織・コード）
///
/// `Library Description`シートの固定セル（A1 / A2 / A3）から読み込まれ、
/// 各パーティションのマニフェストに接尾辞付きで引き継がれます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    /// ライブラリ名
    pub name: String,

    /// 組織名（変更せずそのまま引き継ぐ）
    pub org: String,

    /// ライブラリコード
    pub code: String,
}

/// （レッスン, 難易度）バケットに属する有効な問題の集合
///
/// グルーパーが1回のインポートの間だけ所有し、パッケージング後に
/// 破棄されます。空のパーティションは構築前に除外されるため、
/// `questions`は常に非空です。
#[derive(Debug, Clone)]
pub struct Partition {
    /// レッスン識別子（入力セルの文字列をそのままキーとして使用）
    pub lesson: String,

    /// 難易度
    pub difficulty: Difficulty,

    /// パーティションに属する問題（走査順を保持）
    pub questions: Vec<Question>,
}

impl Partition {
    /// パーティションのフォルダ名（例: `1_E`）
    pub fn folder_name(&self) -> String {
        format!(
            "{}_{}",
            sanitize_file_name(&self.lesson),
            self.difficulty.code()
        )
    }

    /// パーティションアーカイブのファイル名（例: `1_E.tar.gz`）
    pub fn archive_name(&self) -> String {
        format!("{}.tar.gz", self.folder_name())
    }
}

/// 回復可能エラー1件分のレコード
///
/// 拒否された入力行・欠落シート・出力失敗を、作者が元の行を特定して
/// 修正できるだけの情報とともに保持します。1行のテキストとして
/// レンダリングされ、`errors.txt`に集約されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorRecord {
    /// 期待されたシートが存在しない
    MissingSheet {
        /// シート名
        sheet: String,
    },

    /// 必須フィールドを欠く行
    InvalidRow {
        title: String,
        course_code: String,
        lesson: String,
        difficulty: String,
        answer: String,
        question_type: QuestionType,
    },

    /// 問題ファイルの生成・書き込みに失敗
    RenderFailure {
        /// 問題の表示名
        display_name: String,
        /// 失敗理由
        reason: String,
    },
}

impl ErrorRecord {
    /// 拒否された行からレコードを構築
    pub(crate) fn invalid_row(question: &Question) -> Self {
        ErrorRecord::InvalidRow {
            title: question.title.clone(),
            course_code: question.course_code.clone(),
            lesson: question.lesson.clone(),
            difficulty: question.difficulty.clone(),
            answer: question.answer.clone(),
            question_type: question.question_type,
        }
    }
}

impl fmt::Display for ErrorRecord {
    // 1レコード = 1行。パイプ文字と改行は含めない。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorRecord::MissingSheet { sheet } => {
                write!(f, "missing sheet: {}", sheet)
            }
            ErrorRecord::InvalidRow {
                title,
                course_code,
                lesson,
                difficulty,
                answer,
                question_type,
            } => {
                write!(
                    f,
                    "invalid row: title={}, course={}, lesson={}, difficulty={}, answer={}, type={}",
                    title, course_code, lesson, difficulty, answer, question_type
                )
            }
            ErrorRecord::RenderFailure {
                display_name,
                reason,
            } => {
                write!(f, "render failed: {} ({})", display_name, reason)
            }
        }
    }
}

/// 文字列をファイル名の1要素として安全な形に変換
///
/// タイトルやレッスン識別子は作者の自由入力であるため、パス区切りや
/// 予約文字を`_`に置換してから出力ファイル名に使用します。
///
/// # 置換対象
///
/// * パス区切り（`/`、`\`）
/// * Windows予約文字（`:` `*` `?` `"` `<` `>` `|`）
/// * 制御文字
/// * 先頭の`.`（隠しファイル・`..`の防止）
pub(crate) fn sanitize_file_name(raw: &str) -> String {
    let mut result: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    while result.starts_with('.') {
        result.replace_range(0..1, "_");
    }

    if result.is_empty() {
        result.push('_');
    }

    result
}
