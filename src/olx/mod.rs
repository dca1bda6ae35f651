//! OLX Problem Markup Module
//!
//! Strategy Patternによる問題XMLレンダリングの抽象化を提供するモジュール。
//! 問題種別ごとのレンダラーが、プラットフォームが要求するOLX問題定義を
//! ビット単位で再現する。

mod problems;

use crate::error::ImportError;
use crate::types::{sanitize_file_name, Question, QuestionType};

pub(crate) use problems::*;

/// 問題フォルダの名前（パーティションフォルダ直下）
pub(crate) const PROBLEM_DIR: &str = "problem";

/// 問題レンダラー（Strategy Pattern）
///
/// 各問題種別（Checkbox, MultipleChoice, Numerical, TextInput）を
/// enumとして表現します。
#[derive(Debug, Clone, Copy)]
pub(crate) enum ProblemFormatter {
    Checkbox,
    MultipleChoice,
    Numerical,
    TextInput,
}

impl ProblemFormatter {
    /// 問題種別からレンダラーを生成
    pub fn from_type(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Checkbox => ProblemFormatter::Checkbox,
            QuestionType::MultipleChoice => ProblemFormatter::MultipleChoice,
            QuestionType::Numerical => ProblemFormatter::Numerical,
            QuestionType::TextInput => ProblemFormatter::TextInput,
        }
    }

    /// 問題をOLX問題定義XMLにレンダリングする
    ///
    /// # 引数
    ///
    /// * `question` - レンダリングする問題
    /// * `tolerance` - 数値問題の許容誤差（Numerical以外では未使用）
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - XML文書
    /// * `Err(ImportError)` - XML生成に失敗した場合（呼び出し側で
    ///   回復可能エラーとして集約される）
    pub fn render(&self, question: &Question, tolerance: &str) -> Result<String, ImportError> {
        match self {
            ProblemFormatter::Checkbox => CheckboxProblem.render(question),
            ProblemFormatter::MultipleChoice => MultipleChoiceProblem.render(question),
            ProblemFormatter::Numerical => NumericalProblem.render(question, tolerance),
            ProblemFormatter::TextInput => TextInputProblem.render(question),
        }
    }
}

/// 問題ファイルの名前（`<難易度コード><タイトル>.xml`、サニタイズ済み）
pub(crate) fn problem_file_name(question: &Question) -> String {
    format!("{}.xml", sanitize_file_name(&question.display_name()))
}
