// ==========================================
// 生产量汇总查询系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + tokio
// 系统定位: 产量看板的数据访问核心
//           (Web 端点与图表前端为外部协作方)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 实时聚合
pub mod engine;

// 配置层 - 数据源配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    DateRange, Plant, PlantQuerySpec, ProcessAreaFilter, ProductionRecord, SourceId, TranTable,
    PLANT_QUERY_SPECS,
};

// 仓储
pub use repository::{
    CacheRow, RepositoryError, RepositoryResult, SourceVolumeRepository, VolumeCacheRepository,
};

// 引擎
pub use engine::VolumeAggregationEngine;

// 配置
pub use config::DataSourceConfig;

// API
pub use api::{ApiError, ApiResult, ProductionVolumeApi, ProductionVolumeService};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生产量汇总查询系统";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
