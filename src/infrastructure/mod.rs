// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 负责与文件系统的交互，依赖领域层的抽象接口。
///
/// 包含的子模块：
/// - 仓库实现（repositories）：名单与运行状态的 JSON 文件存储
/// - 结果写出（result_writer）：带时间戳的结果表格与文本摘要
/// - 工作表转换（sheet_converter）：电子表格到 CSV 表格
/// - 表格存储（table_store）：CSV 表格的写入与加载
/// - 工作目录（workspace）：目录写入探测与文档枚举
pub mod repositories;
pub mod result_writer;
pub mod sheet_converter;
pub mod table_store;
pub mod workspace;
