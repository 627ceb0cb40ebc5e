// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// 数据文件错误类型
#[derive(Error, Debug)]
pub enum DataFileError {
    /// 文件名含路径分隔符或上跳段
    #[error("Invalid data file name")]
    InvalidName,
    /// 文件不存在
    #[error("Data file not found")]
    NotFound,
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 文件内容不是合法JSON
    #[error("Data file is not valid JSON")]
    Parse,
}

/// 数据文件列表条目
#[derive(Debug, Serialize)]
pub struct DataFileEntry {
    /// 文件名（不含扩展名）
    pub name: String,
    /// 最后修改时间
    pub modified: DateTime<Utc>,
}

struct CachedFile {
    modified: SystemTime,
    value: Arc<Value>,
}

/// 本地JSON数据文件存储
///
/// 限定在单个根目录内读取`.json`文件，带目录穿越保护。
/// 解析结果按文件修改时间缓存，仅当磁盘上的mtime变化时重新读取。
pub struct DataFileStore {
    root: PathBuf,
    cache: DashMap<String, CachedFile>,
}

impl DataFileStore {
    /// 创建新的数据文件存储
    ///
    /// # 参数
    ///
    /// * `root` - 数据文件根目录
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: DashMap::new(),
        }
    }

    /// 将外部文件名解析为根目录内的路径
    ///
    /// 拒绝空名、路径分隔符和`..`；缺失的`.json`扩展名自动补全。
    fn resolve(&self, name: &str) -> Result<(String, PathBuf), DataFileError> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || name.starts_with('.')
        {
            return Err(DataFileError::InvalidName);
        }

        let file_name = if name.ends_with(".json") {
            name.to_string()
        } else {
            format!("{}.json", name)
        };

        let path = self.root.join(&file_name);
        Ok((file_name, path))
    }

    /// 列举根目录下的所有JSON数据文件
    ///
    /// # 返回值
    ///
    /// 按文件名排序的条目列表，时间为最后修改时间
    pub async fn list(&self) -> Result<Vec<DataFileEntry>, DataFileError> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };

            entries.push(DataFileEntry {
                name,
                modified: DateTime::<Utc>::from(metadata.modified()?),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// 读取并解析单个JSON数据文件
    ///
    /// 命中缓存且mtime未变化时直接返回缓存值。
    ///
    /// # 参数
    ///
    /// * `name` - 文件名，可省略`.json`扩展名
    ///
    /// # 返回值
    ///
    /// * `Ok(Arc<Value>)` - 解析后的JSON值
    /// * `Err(DataFileError)` - 名称非法、文件缺失或解析失败
    pub async fn load(&self, name: &str) -> Result<Arc<Value>, DataFileError> {
        let (key, path) = self.resolve(name)?;

        let metadata = fs::metadata(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DataFileError::NotFound
            } else {
                DataFileError::Io(e)
            }
        })?;

        if !metadata.is_file() {
            return Err(DataFileError::NotFound);
        }

        let modified = metadata.modified()?;

        if let Some(cached) = self.cache.get(&key) {
            if cached.modified == modified {
                debug!("Data file cache hit: {}", key);
                return Ok(cached.value.clone());
            }
        }

        let text = fs::read_to_string(&path).await?;
        let value: Arc<Value> =
            Arc::new(serde_json::from_str(&text).map_err(|_| DataFileError::Parse)?);

        self.cache.insert(
            key,
            CachedFile {
                modified,
                value: value.clone(),
            },
        );

        Ok(value)
    }
}
