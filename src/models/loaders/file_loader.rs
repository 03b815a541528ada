use crate::models::item::Candidate;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 把命令行给出的路径展开为候选文件列表
///
/// - 文件：原样加入
/// - 目录：加入其直接子文件（不递归），按文件名排序
///
/// 这里不做扩展名过滤，过滤交给 `ItemValidator`。
pub async fn collect_candidates(paths: &[PathBuf]) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();

    for path in paths {
        let metadata = fs::metadata(path)
            .await
            .with_context(|| format!("无法读取路径: {}", path.display()))?;

        if metadata.is_dir() {
            candidates.extend(load_folder(path).await?);
        } else {
            candidates.push(Candidate::new(path.clone(), display_name(path), metadata.len()));
        }
    }

    Ok(candidates)
}

async fn load_folder(folder: &Path) -> Result<Vec<Candidate>> {
    let mut entries = fs::read_dir(folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder.display()))?;

    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match entry.metadata().await {
            Ok(meta) if meta.is_file() => {
                found.push(Candidate::new(path.clone(), display_name(&path), meta.len()));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("读取文件信息失败 {}: {}", path.display(), e),
        }
    }

    found.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!("文件夹 {} 中找到 {} 个文件", folder.display(), found.len());

    Ok(found)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
