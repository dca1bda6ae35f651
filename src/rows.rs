//! Row Parsers Module
//!
//! 固定カラムレイアウトの1行を`Question`レコードに変換する純粋関数群。
//! レイアウトはワークブック規約で固定されており、カラム0は作者用の
//! 連番カラムとして無視される。行末より先のカラムはエラーではなく
//! 空文字列として扱う。

use crate::types::{Question, QuestionType};

// 共通カラム（全シート共通、0始まり）
const COL_TITLE: usize = 1;
const COL_COURSE_CODE: usize = 2;
const COL_LESSON: usize = 3;
const COL_LEARNING_OBJECTIVE: usize = 4;
const COL_CONTENT: usize = 5;
const COL_DIFFICULTY: usize = 6;

// 選択型（Checkbox / MultipleChoice）: 選択肢5列の後に解答が続く
const COL_CHOICE_FIRST: usize = 7;
const COL_CHOICE_ANSWER: usize = 12;
const COL_CHOICE_HINT: usize = 13;
const COL_CHOICE_FEEDBACK_FIRST: usize = 14;
const COL_CHOICE_STATUS: usize = 19;

// 非選択型（Numerical / TextInput）: 解答が難易度の直後に続く
const COL_PLAIN_ANSWER: usize = 7;
const COL_PLAIN_HINT: usize = 8;
const COL_PLAIN_FEEDBACK_FIRST: usize = 9;
const COL_PLAIN_STATUS: usize = 14;

/// 行からセル値を取得（範囲外は空文字列）
fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

/// 行から連続する5セルを取得
fn five_cells(row: &[String], first: usize) -> [String; 5] {
    [
        cell(row, first),
        cell(row, first + 1),
        cell(row, first + 2),
        cell(row, first + 3),
        cell(row, first + 4),
    ]
}

/// 1行を指定された種別の`Question`に変換
///
/// # 戻り値
///
/// * `Some(Question)` - パースに成功した場合（バリデーションは行わない）
/// * `None` - タイトルセルが空白の場合。シート末尾の空行として扱い、
///   エラーにはしない
pub(crate) fn parse_row(question_type: QuestionType, row: &[String]) -> Option<Question> {
    let title = cell(row, COL_TITLE);
    if title.trim().is_empty() {
        return None;
    }

    let (choices, answer, hint, feedbacks, status) = match question_type {
        QuestionType::Checkbox => (
            five_cells(row, COL_CHOICE_FIRST),
            cell(row, COL_CHOICE_ANSWER),
            cell(row, COL_CHOICE_HINT),
            five_cells(row, COL_CHOICE_FEEDBACK_FIRST),
            // Checkboxesシートはステータス列を持たない
            String::new(),
        ),
        QuestionType::MultipleChoice => (
            five_cells(row, COL_CHOICE_FIRST),
            cell(row, COL_CHOICE_ANSWER),
            cell(row, COL_CHOICE_HINT),
            five_cells(row, COL_CHOICE_FEEDBACK_FIRST),
            cell(row, COL_CHOICE_STATUS),
        ),
        QuestionType::Numerical | QuestionType::TextInput => (
            Default::default(),
            cell(row, COL_PLAIN_ANSWER),
            cell(row, COL_PLAIN_HINT),
            five_cells(row, COL_PLAIN_FEEDBACK_FIRST),
            cell(row, COL_PLAIN_STATUS),
        ),
    };

    Some(Question {
        question_type,
        title,
        course_code: cell(row, COL_COURSE_CODE),
        lesson: cell(row, COL_LESSON),
        learning_objective: cell(row, COL_LEARNING_OBJECTIVE),
        content: cell(row, COL_CONTENT),
        difficulty: cell(row, COL_DIFFICULTY),
        choices,
        answer,
        hint,
        feedbacks,
        status,
    })
}

/// チェックボックス行のパース
pub(crate) fn parse_checkbox(row: &[String]) -> Option<Question> {
    parse_row(QuestionType::Checkbox, row)
}

/// 単一選択行のパース
pub(crate) fn parse_multiple_choice(row: &[String]) -> Option<Question> {
    parse_row(QuestionType::MultipleChoice, row)
}

/// 数値入力行のパース
pub(crate) fn parse_numerical(row: &[String]) -> Option<Question> {
    parse_row(QuestionType::Numerical, row)
}

/// テキスト入力行のパース
pub(crate) fn parse_text_input(row: &[String]) -> Option<Question> {
    parse_row(QuestionType::TextInput, row)
}
