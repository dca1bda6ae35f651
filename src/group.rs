//! Grouper/Partitioner Module
//!
//! 有効な問題をレッスン識別子でバケット化し、さらに難易度で分割して
//! 順序付きパーティションを生成するモジュール。レッスンのバケットは
//! 元のセル文字列をキーとする挿入順マップで管理する（整数への強制
//! 変換は行わないため、非数値レッスンも独立したバケットになる）。

use crate::types::{Difficulty, Partition, Question};

/// 問題リスト群をパーティションに分割
///
/// # 引数
///
/// * `question_lists` - 種別ごとに読み込んだ問題リスト。走査順は固定
///   （Checkbox → MultipleChoice → Numerical → TextInput）で、呼び出し側が
///   この順に並べて渡す
///
/// # 戻り値
///
/// 非空のパーティションのみを、レッスンの初出順 × 難易度順
/// （Easy → Medium → Hard）で返します。各パーティション内の問題順は
/// 入力順を保持します（安定）。
pub(crate) fn partition_questions(question_lists: Vec<Vec<Question>>) -> Vec<Partition> {
    let by_lesson = group_by_lesson(question_lists);

    let mut partitions = Vec::new();
    for (lesson, questions) in by_lesson {
        for difficulty in Difficulty::ORDER {
            let bucket: Vec<Question> = questions
                .iter()
                .filter(|question| question.difficulty_level() == difficulty)
                .cloned()
                .collect();

            // 空のバケットはパッケージングに進めない
            if bucket.is_empty() {
                continue;
            }

            partitions.push(Partition {
                lesson: lesson.clone(),
                difficulty,
                questions: bucket,
            });
        }
    }

    partitions
}

/// レッスン識別子で問題をバケット化
///
/// キーはレッスンセルの文字列そのもの。バケットはレッスンの初出順に
/// 並び、バケット内の問題は走査順を保持します。
fn group_by_lesson(question_lists: Vec<Vec<Question>>) -> Vec<(String, Vec<Question>)> {
    let mut buckets: Vec<(String, Vec<Question>)> = Vec::new();

    for questions in question_lists {
        for question in questions {
            match buckets
                .iter_mut()
                .find(|(lesson, _)| *lesson == question.lesson)
            {
                Some((_, bucket)) => bucket.push(question),
                None => buckets.push((question.lesson.clone(), vec![question])),
            }
        }
    }

    buckets
}
