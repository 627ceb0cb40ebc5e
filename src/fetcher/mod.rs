// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 并发受限的批量执行器
pub mod batch;

/// 基于reqwest的单URL抓取器
pub mod reqwest_fetcher;

/// 页面标题提取
pub mod title;

/// 抓取器接口定义
pub mod traits;
