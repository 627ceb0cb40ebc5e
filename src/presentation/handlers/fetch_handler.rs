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

use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    http::{header, HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::{FutureExt, Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{error, warn};

use crate::{
    application::dto::{
        fetch_request::FetchRequestDto,
        fetch_response::{FetchResponseDto, StreamMetaDto},
    },
    config::settings::Settings,
    domain::models::fetch_result::FetchResult,
    fetcher::batch::{run_batch, ResultCallback},
    fetcher::traits::UrlFetcher,
};

/// 批量抓取查询参数
#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    /// 显式请求流式模式（"1"或"true"）
    pub stream: Option<String>,
}

/// 批量抓取入口
///
/// 校验请求体后在缓冲模式与流式模式之间选择：
/// 调用方携带`?stream=1`或`Accept: text/event-stream`时走流式，
/// 否则聚合为单个JSON文档返回。
pub async fn fetch_batch(
    Extension(fetcher): Extension<Arc<dyn UrlFetcher>>,
    Extension(settings): Extension<Arc<Settings>>,
    Query(query): Query<FetchQuery>,
    headers: HeaderMap,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    // A syntactically broken body, a body with wrongly typed tuning
    // fields and a body without a usable urls list produce distinct
    // 400 payloads
    let value = match payload {
        Ok(Json(value)) => value,
        Err(_) => {
            warn!("Rejected fetch request: body is not JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Invalid JSON body"
                })),
            )
                .into_response();
        }
    };

    let dto: FetchRequestDto = match serde_json::from_value(value) {
        Ok(dto) => dto,
        Err(e) => {
            warn!("Rejected fetch request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Invalid request fields"
                })),
            )
                .into_response();
        }
    };

    let urls = dto.valid_urls();
    if urls.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": "Missing urls"
            })),
        )
            .into_response();
    }

    let timeout_ms = dto.effective_timeout_ms(settings.fetch.default_timeout_ms);
    let concurrency = dto.effective_concurrency(settings.fetch.default_concurrency, urls.len());
    let timeout = Duration::from_millis(timeout_ms);
    let urls = Arc::new(urls);

    let wants_stream = query
        .stream
        .as_deref()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
        || headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("text/event-stream"))
            .unwrap_or(false);

    if wants_stream {
        stream_response(fetcher, urls, timeout, timeout_ms, concurrency)
    } else {
        buffered_response(fetcher, urls, timeout, timeout_ms, concurrency).await
    }
}

/// 缓冲模式：跑完整个批次后返回一个聚合JSON文档
async fn buffered_response(
    fetcher: Arc<dyn UrlFetcher>,
    urls: Arc<Vec<String>>,
    timeout: Duration,
    timeout_ms: u64,
    concurrency: usize,
) -> Response {
    let slots = run_batch(
        fetcher,
        urls.clone(),
        timeout,
        concurrency,
        CancellationToken::new(),
        None,
    )
    .await;

    // Holes only appear under cancellation, which the buffered path never
    // triggers; tolerate them anyway instead of panicking
    let results: Vec<FetchResult> = slots
        .into_iter()
        .zip(urls.iter())
        .map(|(slot, url)| slot.unwrap_or_else(|| FetchResult::failure(url, "Cancelled")))
        .collect();

    Json(FetchResponseDto {
        count: results.len(),
        results,
        timeout_ms,
        concurrency,
    })
    .into_response()
}

/// 流式模式：以SSE帧渐进交付结果
///
/// 帧序列：注释帧（对抗中间代理缓冲）、`meta`、若干`result`
/// （按完成顺序）、最后`done`或`error`。客户端断开时响应流被
/// 丢弃，守卫取消共享信号，在途抓取随之中止。
fn stream_response(
    fetcher: Arc<dyn UrlFetcher>,
    urls: Arc<Vec<String>>,
    timeout: Duration,
    timeout_ms: u64,
    concurrency: usize,
) -> Response {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Event>();
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let _ = tx.send(Event::default().comment("stream open"));

    let meta = StreamMetaDto {
        count: urls.len(),
        timeout_ms,
        concurrency,
    };
    if let Ok(event) = Event::default().event("meta").json_data(&meta) {
        let _ = tx.send(event);
    }

    let result_tx = tx.clone();
    let callback: Arc<ResultCallback> = Arc::new(move |_index, result: &FetchResult| {
        if let Ok(event) = Event::default().event("result").json_data(result) {
            let _ = result_tx.send(event);
        }
    });

    let task_cancel = cancel.clone();
    tokio::spawn(async move {
        let total = urls.len();
        let run = run_batch(
            fetcher,
            urls,
            timeout,
            concurrency,
            task_cancel.clone(),
            Some(callback),
        );

        match AssertUnwindSafe(run).catch_unwind().await {
            Ok(_) => {
                if task_cancel.is_cancelled() {
                    return;
                }
                let _ = tx.send(
                    Event::default()
                        .event("done")
                        .data(format!(r#"{{"count":{}}}"#, total)),
                );
            }
            Err(_) => {
                error!("Batch runner failed while streaming");
                let _ = tx.send(
                    Event::default()
                        .event("error")
                        .data(r#"{"message":"Batch runner failed"}"#),
                );
            }
        }
        // Dropping tx closes the stream after the final frame
    });

    let stream = CancelOnDrop {
        inner: UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>),
        _guard: guard,
    };

    (
        [("cache-control", "no-cache"), ("x-accel-buffering", "no")],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
        .into_response()
}

/// 将取消守卫绑定到响应流的生命周期
///
/// 客户端断开会丢弃该流，守卫随之触发批次级取消。
struct CancelOnDrop<S> {
    inner: S,
    _guard: DropGuard,
}

impl<S> Stream for CancelOnDrop<S>
where
    S: Stream + Unpin,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}
