// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排下载与搜索两类运行
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// 索引页抓取、链接发现与校验下载
pub mod engines;

/// 基础设施模块
///
/// 文件系统相关实现：表格转换与存储、结果写出、JSON 仓库
pub mod infrastructure;

/// 表示层模块
///
/// 命令行外壳
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 有界并发的下载工作池
pub mod workers;
