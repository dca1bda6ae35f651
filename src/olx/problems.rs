//! OLX Problem Renderers Implementation
//!
//! 各問題種別のレンダラー実装を提供するモジュール。XMLの生成には
//! quick-xmlのWriterを使用し、テキスト・属性のエスケープはWriterに
//! 委譲する。

use quick_xml::events::{BytesText, Event};
use quick_xml::Writer;
use std::io;

use crate::error::ImportError;
use crate::types::Question;

/// インデント幅（スペース2個）
const INDENT: (u8, usize) = (b' ', 2);

/// 解答セルの1始まり選択肢番号リストをパース
///
/// カンマ区切りの各トークンを前後空白を無視して数値として解釈します。
/// 数値として解釈できないトークンは読み飛ばします。
pub(crate) fn parse_answer_indices(answer: &str) -> Vec<usize> {
    answer
        .split(',')
        .filter_map(|token| token.trim().parse::<usize>().ok())
        .collect()
}

/// 解答セルの先頭トークンのみを選択肢番号として解釈
///
/// 単一選択問題は複数の番号が書かれていても最初の番号しか使用しません
/// （余分な番号は黙って捨てられる、文書化済みの挙動）。
pub(crate) fn parse_first_index(answer: &str) -> Option<usize> {
    answer
        .split(',')
        .next()
        .and_then(|token| token.trim().parse::<usize>().ok())
}

/// `demandhint`ブロックを書き込む（ヒントが空なら何もしない）
fn write_demand_hint<W: io::Write>(
    writer: &mut Writer<W>,
    hint: &str,
) -> quick_xml::Result<()> {
    if hint.is_empty() {
        return Ok(());
    }
    writer
        .create_element("demandhint")
        .write_inner_content(|w| -> quick_xml::Result<()> {
            w.create_element("hint")
                .write_text_content(BytesText::new(hint))?;
            Ok(())
        })?;
    Ok(())
}

/// 選択肢1個を書き込む（フィードバックがあれば`choicehint`を付加）
fn write_choice<W: io::Write>(
    writer: &mut Writer<W>,
    text: &str,
    correct: bool,
    feedback: &str,
) -> quick_xml::Result<()> {
    let flag = if correct { "true" } else { "false" };
    let element = writer
        .create_element("choice")
        .with_attribute(("correct", flag));

    if feedback.is_empty() {
        element.write_text_content(BytesText::new(text))?;
    } else {
        element.write_inner_content(|w| -> quick_xml::Result<()> {
            w.write_event(Event::Text(BytesText::new(text)))?;
            w.create_element("choicehint")
                .write_text_content(BytesText::new(feedback))?;
            Ok(())
        })?;
    }
    Ok(())
}

/// Writerの出力バッファを文字列として取り出す
fn into_string(writer: Writer<Vec<u8>>) -> Result<String, ImportError> {
    String::from_utf8(writer.into_inner())
        .map_err(|e| ImportError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// チェックボックス問題のレンダラー
///
/// 解答セルはカンマ区切りの1始まり選択肢番号リスト。各選択肢の
/// `correct`フラグは番号リストへの所属で決まります。
pub(crate) struct CheckboxProblem;

impl CheckboxProblem {
    pub fn render(&self, question: &Question) -> Result<String, ImportError> {
        let display_name = question.display_name();
        let correct_indices = parse_answer_indices(&question.answer);

        let mut writer = Writer::new_with_indent(Vec::new(), INDENT.0, INDENT.1);
        writer
            .create_element("problem")
            .with_attribute(("display_name", display_name.as_str()))
            .write_inner_content(|w| -> quick_xml::Result<()> {
                w.create_element("choiceresponse").write_inner_content(|w| -> quick_xml::Result<()> {
                    w.create_element("label")
                        .write_text_content(BytesText::new(&question.content))?;
                    w.create_element("checkboxgroup").write_inner_content(|w| -> quick_xml::Result<()> {
                        for (index, choice) in question.choices.iter().enumerate() {
                            if choice.is_empty() {
                                continue;
                            }
                            // 選択肢番号は1始まり
                            let correct = correct_indices.contains(&(index + 1));
                            write_choice(w, choice, correct, &question.feedbacks[index])?;
                        }
                        Ok(())
                    })?;
                    Ok(())
                })?;
                write_demand_hint(w, &question.hint)?;
                Ok(())
            })?;

        into_string(writer)
    }
}

/// 単一選択問題のレンダラー
///
/// 解答セルの先頭トークンのみが正解番号として使用されます。
pub(crate) struct MultipleChoiceProblem;

impl MultipleChoiceProblem {
    pub fn render(&self, question: &Question) -> Result<String, ImportError> {
        let display_name = question.display_name();
        let correct_index = parse_first_index(&question.answer);

        let mut writer = Writer::new_with_indent(Vec::new(), INDENT.0, INDENT.1);
        writer
            .create_element("problem")
            .with_attribute(("display_name", display_name.as_str()))
            .write_inner_content(|w| -> quick_xml::Result<()> {
                w.create_element("multiplechoiceresponse")
                    .write_inner_content(|w| -> quick_xml::Result<()> {
                        w.create_element("label")
                            .write_text_content(BytesText::new(&question.content))?;
                        w.create_element("choicegroup")
                            .with_attribute(("type", "MultipleChoice"))
                            .write_inner_content(|w| -> quick_xml::Result<()> {
                                for (index, choice) in question.choices.iter().enumerate() {
                                    if choice.is_empty() {
                                        continue;
                                    }
                                    let correct = correct_index == Some(index + 1);
                                    write_choice(
                                        w,
                                        choice,
                                        correct,
                                        &question.feedbacks[index],
                                    )?;
                                }
                                Ok(())
                            })?;
                        Ok(())
                    })?;
                write_demand_hint(w, &question.hint)?;
                Ok(())
            })?;

        into_string(writer)
    }
}

/// 数値入力問題のレンダラー
///
/// 解答セルの生の文字列を期待値として出力し、許容誤差は設定値
/// （デフォルト`5%`）を使用します。`feedback1`が非空なら正解時の
/// ヒントとして付加します。
pub(crate) struct NumericalProblem;

impl NumericalProblem {
    pub fn render(&self, question: &Question, tolerance: &str) -> Result<String, ImportError> {
        let display_name = question.display_name();

        let mut writer = Writer::new_with_indent(Vec::new(), INDENT.0, INDENT.1);
        writer
            .create_element("problem")
            .with_attribute(("display_name", display_name.as_str()))
            .write_inner_content(|w| -> quick_xml::Result<()> {
                w.create_element("numericalresponse")
                    .with_attribute(("answer", question.answer.as_str()))
                    .write_inner_content(|w| -> quick_xml::Result<()> {
                        w.create_element("label")
                            .write_text_content(BytesText::new(&question.content))?;
                        w.create_element("responseparam")
                            .with_attribute(("type", "tolerance"))
                            .with_attribute(("default", tolerance))
                            .write_empty()?;
                        if !question.feedbacks[0].is_empty() {
                            w.create_element("correcthint")
                                .write_text_content(BytesText::new(&question.feedbacks[0]))?;
                        }
                        w.create_element("formulaequationinput").write_empty()?;
                        Ok(())
                    })?;
                write_demand_hint(w, &question.hint)?;
                Ok(())
            })?;

        into_string(writer)
    }
}

/// テキスト入力問題のレンダラー
///
/// 前後空白を除去した解答文字列を期待値として出力し、1行のテキスト
/// 入力ウィジェットを必ず含めます。
pub(crate) struct TextInputProblem;

impl TextInputProblem {
    pub fn render(&self, question: &Question) -> Result<String, ImportError> {
        let display_name = question.display_name();
        let answer = question.answer.trim();

        let mut writer = Writer::new_with_indent(Vec::new(), INDENT.0, INDENT.1);
        writer
            .create_element("problem")
            .with_attribute(("display_name", display_name.as_str()))
            .write_inner_content(|w| -> quick_xml::Result<()> {
                w.create_element("stringresponse")
                    .with_attribute(("answer", answer))
                    .with_attribute(("type", "ci"))
                    .write_inner_content(|w| -> quick_xml::Result<()> {
                        w.create_element("label")
                            .write_text_content(BytesText::new(&question.content))?;
                        if !question.feedbacks[0].is_empty() {
                            w.create_element("correcthint")
                                .write_text_content(BytesText::new(&question.feedbacks[0]))?;
                        }
                        w.create_element("textline")
                            .with_attribute(("size", "20"))
                            .write_empty()?;
                        Ok(())
                    })?;
                write_demand_hint(w, &question.hint)?;
                Ok(())
            })?;

        into_string(writer)
    }
}
