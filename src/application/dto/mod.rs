// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 批量抓取请求DTO
pub mod fetch_request;

/// 批量抓取响应DTO
pub mod fetch_response;
