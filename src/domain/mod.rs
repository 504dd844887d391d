// ==========================================
// 生产量汇总查询系统 - 领域模型层
// ==========================================
// 职责: 定义工厂枚举、产量记录、取数规格
// 红线: 不含数据访问逻辑,不含聚合逻辑
// ==========================================

pub mod plant;
pub mod production;
pub mod types;

// 重导出核心类型
pub use plant::{PlantQuerySpec, ProcessAreaFilter, TranTable, PLANT_QUERY_SPECS};
pub use production::{DateRange, ProductionRecord};
pub use types::{Plant, SourceId};
