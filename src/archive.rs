//! Archive Packager Module
//!
//! ディレクトリをtar.gzアーカイブに圧縮するモジュール。パーティション
//! フォルダの圧縮と、最終成果物（パーティションアーカイブ群 +
//! エラーレポート）の圧縮の両方で同じ圧縮器を使用する。

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::Path;

use crate::error::ImportError;

/// ディレクトリ全体をtar.gzに圧縮する
///
/// # 引数
///
/// * `src_dir` - 圧縮するディレクトリ
/// * `dest` - 出力するtar.gzファイルのパス
/// * `top_level` - アーカイブ内のトップレベルフォルダ名。展開時に
///   `<top_level>/...`の形で復元される
///
/// # 戻り値
///
/// * `Ok(())` - 圧縮に成功した場合
/// * `Err(ImportError::Archive)` - アーカイブの組み立てに失敗した場合
///   （致命的: インポート全体を中断する）
pub(crate) fn compress_dir(
    src_dir: &Path,
    dest: &Path,
    top_level: &str,
) -> Result<(), ImportError> {
    let file = File::create(dest)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    builder.append_dir_all(top_level, src_dir).map_err(|e| {
        ImportError::Archive(format!(
            "failed to append '{}' to {}: {}",
            src_dir.display(),
            dest.display(),
            e
        ))
    })?;

    let encoder = builder
        .into_inner()
        .map_err(|e| ImportError::Archive(format!("failed to finish tar stream: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| ImportError::Archive(format!("failed to finish gzip stream: {}", e)))?;

    Ok(())
}
