// ==========================================
// 生产量汇总查询系统 - 工厂查询规格表
// ==========================================
// 职责: 以声明式表格描述每个工厂的取数规则
//       (数据源、交易表、交易类型、库位、产品类型、工序区过滤)
// 约束: 查询构建代码不允许散落字符串常量,全部由本表提供
// ==========================================

use crate::domain::types::{Plant, SourceId};

// ==========================================
// 交易表选择 (Tran Table)
// ==========================================

/// 工厂取数使用的交易表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranTable {
    /// 产品交易表(需关联产品主数据)
    ProductTran,
    /// 材料交易表(无产品主数据关联)
    MaterialTran,
}

// ==========================================
// 工序区过滤 (Process Area Filter)
// ==========================================

/// 工序明细存在性过滤
///
/// Requires / Excludes 以同一工序区代码对同一批交易做互斥划分:
/// plating-sub 取命中的部分,dom/exp/exp2 取未命中的部分。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessAreaFilter {
    /// 不做工序区过滤
    None,
    /// 件号必须存在指定工序区的工序明细记录
    Requires(&'static str),
    /// 件号必须不存在指定工序区的工序明细记录
    Excludes(&'static str),
}

// ==========================================
// 工厂查询规格 (Plant Query Spec)
// ==========================================

/// 单个工厂的完整取数规格
#[derive(Debug, Clone, Copy)]
pub struct PlantQuerySpec {
    pub plant: Plant,
    /// 参与汇总的数据源(多个时按日期合并求和)
    pub sources: &'static [SourceId],
    pub tran_table: TranTable,
    /// 交易类型代码
    pub tran_type: &'static str,
    /// 库位代码
    pub inventory_no: &'static str,
    /// 产品类型代码(仅产品交易表使用)
    pub product_type: Option<&'static str>,
    pub process_area: ProcessAreaFilter,
}

/// 电镀三库(plating-sub / plating-greitmo 的共同数据源)
const SPDB_SOURCES: &[SourceId] = &[SourceId::SpdbExp, SourceId::SpdbExp2, SourceId::SpdbDom];

/// 工序区代码: 电镀外协工序
const PROCESS_AREA_SUB: &str = "6";

/// 全部工厂的取数规格,与 Plant::ALL 顺序一致
pub static PLANT_QUERY_SPECS: [PlantQuerySpec; 7] = [
    PlantQuerySpec {
        plant: Plant::Brazing,
        sources: &[SourceId::Brazing],
        tran_table: TranTable::ProductTran,
        tran_type: "RP",
        inventory_no: "32",
        product_type: Some("P"),
        process_area: ProcessAreaFilter::None,
    },
    PlantQuerySpec {
        plant: Plant::Lp,
        sources: &[SourceId::Usui],
        tran_table: TranTable::ProductTran,
        tran_type: "RP",
        inventory_no: "32",
        product_type: Some("P"),
        process_area: ProcessAreaFilter::None,
    },
    PlantQuerySpec {
        plant: Plant::PlatingSub,
        sources: SPDB_SOURCES,
        tran_table: TranTable::ProductTran,
        tran_type: "RP",
        inventory_no: "31",
        product_type: Some("S"),
        process_area: ProcessAreaFilter::Requires(PROCESS_AREA_SUB),
    },
    PlantQuerySpec {
        plant: Plant::PlatingGreitmo,
        sources: SPDB_SOURCES,
        tran_table: TranTable::MaterialTran,
        tran_type: "RG",
        inventory_no: "11",
        product_type: None,
        process_area: ProcessAreaFilter::None,
    },
    PlantQuerySpec {
        plant: Plant::Dom,
        sources: &[SourceId::SpdbDom],
        tran_table: TranTable::ProductTran,
        tran_type: "RP",
        inventory_no: "32",
        product_type: Some("P"),
        process_area: ProcessAreaFilter::Excludes(PROCESS_AREA_SUB),
    },
    PlantQuerySpec {
        plant: Plant::Exp,
        sources: &[SourceId::SpdbExp],
        tran_table: TranTable::ProductTran,
        tran_type: "RP",
        inventory_no: "32",
        product_type: Some("P"),
        process_area: ProcessAreaFilter::Excludes(PROCESS_AREA_SUB),
    },
    PlantQuerySpec {
        plant: Plant::Exp2,
        sources: &[SourceId::SpdbExp2],
        tran_table: TranTable::ProductTran,
        tran_type: "RP",
        inventory_no: "32",
        product_type: Some("P"),
        process_area: ProcessAreaFilter::Excludes(PROCESS_AREA_SUB),
    },
];

impl Plant {
    /// 查询本工厂的取数规格
    pub fn query_spec(&self) -> &'static PlantQuerySpec {
        // PLANT_QUERY_SPECS 与 Plant::ALL 顺序一致
        match self {
            Plant::Brazing => &PLANT_QUERY_SPECS[0],
            Plant::Lp => &PLANT_QUERY_SPECS[1],
            Plant::PlatingSub => &PLANT_QUERY_SPECS[2],
            Plant::PlatingGreitmo => &PLANT_QUERY_SPECS[3],
            Plant::Dom => &PLANT_QUERY_SPECS[4],
            Plant::Exp => &PLANT_QUERY_SPECS[5],
            Plant::Exp2 => &PLANT_QUERY_SPECS[6],
        }
    }
}

// ==========================================
// 单元测试
// ==========================================
