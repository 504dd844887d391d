// ==========================================
// 生产量汇总查询系统 - 配置层
// ==========================================
// 职责: 数据源连接目标管理
// 存储: JSON 配置文件
// ==========================================

pub mod data_sources;

// 重导出核心配置类型
pub use data_sources::DataSourceConfig;
