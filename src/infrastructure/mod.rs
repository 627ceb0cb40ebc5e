// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，提供对具体技术的抽象和封装。
///
/// 包含的子模块：
/// - 数据文件（datafiles）：本地JSON数据文件的读取、列举与缓存
/// - 指标（metrics）：提供系统监控和性能指标收集
pub mod datafiles;
pub mod metrics;
