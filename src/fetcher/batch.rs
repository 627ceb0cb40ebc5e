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

use crate::domain::models::fetch_result::FetchResult;
use crate::fetcher::traits::UrlFetcher;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// 结果回调
///
/// 按完成顺序（而非输入顺序）在每个结果可用时立即调用。
pub type ResultCallback = dyn Fn(usize, &FetchResult) + Send + Sync;

/// 并发受限地批量抓取URL
///
/// 启动`min(concurrency, urls.len()).max(1)`个工作任务，每个任务从
/// 共享计数器认领下一个未认领的下标，并将结果写入输出向量中对应
/// 下标的槽位，因此输出顺序始终等于输入顺序，与完成顺序无关。
///
/// 取消信号触发后，工作任务不再认领新下标，在途抓取立即中止；
/// 此时输出向量可能留下`None`空洞，由调用方按尽力而为处理。
/// 单个URL的失败不影响其他URL，也不会重试。
///
/// # 参数
///
/// * `fetcher` - 单URL抓取器
/// * `urls` - 按序的URL列表
/// * `timeout` - 单URL硬超时
/// * `concurrency` - 工作池大小
/// * `cancel` - 批次级共享取消信号
/// * `on_result` - 可选的逐结果回调，用于渐进式交付
///
/// # 返回值
///
/// 与输入等长的结果向量；仅在取消时可能含`None`
pub async fn run_batch(
    fetcher: Arc<dyn UrlFetcher>,
    urls: Arc<Vec<String>>,
    timeout: Duration,
    concurrency: usize,
    cancel: CancellationToken,
    on_result: Option<Arc<ResultCallback>>,
) -> Vec<Option<FetchResult>> {
    let total = urls.len();
    if total == 0 {
        return Vec::new();
    }

    let pool_size = concurrency.min(total).max(1);
    let next_index = Arc::new(AtomicUsize::new(0));
    let results: Arc<Mutex<Vec<Option<FetchResult>>>> = Arc::new(Mutex::new(vec![None; total]));

    debug!("Starting batch of {} urls with {} workers", total, pool_size);

    let workers = (0..pool_size).map(|_| {
        let fetcher = fetcher.clone();
        let urls = urls.clone();
        let next_index = next_index.clone();
        let results = results.clone();
        let cancel = cancel.clone();
        let on_result = on_result.clone();

        async move {
            loop {
                // A triggered signal stops claiming before any fetch starts
                if cancel.is_cancelled() {
                    break;
                }

                let index = next_index.fetch_add(1, Ordering::SeqCst);
                if index >= total {
                    break;
                }

                let result = fetcher.fetch(&urls[index], timeout, &cancel).await;

                if let Some(callback) = &on_result {
                    callback(index, &result);
                }

                results.lock()[index] = Some(result);
            }
        }
    });

    futures::future::join_all(workers).await;

    match Arc::try_unwrap(results) {
        Ok(mutex) => mutex.into_inner(),
        Err(arc) => arc.lock().clone(),
    }
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
