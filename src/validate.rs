//! Validator Module
//!
//! パース済みの問題レコードが整形式かどうかを判定するモジュール。
//! 判定述語とエラーレコード生成は同一の述語を共有し、論理的に
//! 乖離しないことを保証する。

use crate::types::{ErrorRecord, Question};

/// 問題が整形式かどうかを判定
///
/// タイトル、コースコード、レッスン、問題文、難易度、解答の6つの
/// 必須フィールドがすべて非空のときに限り`true`を返します。
pub(crate) fn is_valid(question: &Question) -> bool {
    !question.title.is_empty()
        && !question.course_code.is_empty()
        && !question.lesson.is_empty()
        && !question.content.is_empty()
        && !question.difficulty.is_empty()
        && !question.answer.is_empty()
}

/// 不正な問題からエラーレコードを生成
///
/// `is_valid`と同じ述語を使用します。
///
/// # 戻り値
///
/// * `None` - 問題が整形式の場合
/// * `Some(ErrorRecord)` - 必須フィールドを欠く場合。作者が元の行を
///   特定できるよう、タイトル・コースコード・レッスン・難易度・解答・
///   種別を1行にまとめたレコード
pub(crate) fn rejection(question: &Question) -> Option<ErrorRecord> {
    if is_valid(question) {
        None
    } else {
        Some(ErrorRecord::invalid_row(question))
    }
}
