// ==========================================
// 生产量汇总查询系统 - 业务库产量查询仓储
// ==========================================
// 职责: 对单个业务数据库执行按日汇总查询
// 约束: 全部查询参数化;过滤条件一律来自工厂取数规格表,
//       不在本文件散落业务常量
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::plant::{PlantQuerySpec, ProcessAreaFilter, TranTable};
use crate::domain::production::DateRange;
use crate::domain::types::SourceId;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{Connection, Result as SqliteResult};
use tracing::error;

// ==========================================
// SourceVolumeRepository - 业务库产量仓储
// ==========================================

/// 单个业务库的产量查询仓储
///
/// 连接为请求级短生命周期,与缓存仓储相同:
/// 打开后只服务一次取数,离开作用域即释放。
pub struct SourceVolumeRepository {
    source: SourceId,
    conn: Connection,
}

impl SourceVolumeRepository {
    /// 打开业务库并创建仓储实例
    ///
    /// # 参数
    /// - source: 数据源标识(用于错误与日志上下文)
    /// - db_path: 数据库文件路径
    pub fn open(source: SourceId, db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| {
            error!("业务库连接失败 (source={}): {}", source, e);
            RepositoryError::DatabaseConnection(format!("{}: {}", source, e))
        })?;
        Ok(Self { source, conn })
    }

    /// 从已有连接创建仓储实例(测试用)
    pub fn from_connection(source: SourceId, conn: Connection) -> Self {
        Self { source, conn }
    }

    /// 按日汇总指定工厂规格在本库中的交易数量
    ///
    /// # 参数
    /// - spec: 工厂取数规格(决定交易表、类型、库位、产品类型、工序区过滤)
    /// - range: 日期范围,含两端;交易时间戳按日截断后比较
    ///
    /// # 返回
    /// - Ok(Vec<(NaiveDate, f64)>): 该工厂在本库的 (日期, 汇总数量) 部分序列
    /// - Err(SourceQuery): 查询失败,已在源头记录日志
    pub fn sum_by_date(
        &self,
        spec: &PlantQuerySpec,
        range: &DateRange,
    ) -> RepositoryResult<Vec<(NaiveDate, f64)>> {
        let result = match spec.tran_table {
            TranTable::ProductTran => self.sum_product_tran(spec, range),
            TranTable::MaterialTran => self.sum_material_tran(spec, range),
        };

        result.map_err(|e| {
            error!(
                "产量查询失败 (source={}, plant={}): {}",
                self.source, spec.plant, e
            );
            RepositoryError::source_query(self.source.name(), e)
        })
    }

    /// 产品交易表查询: 关联产品主数据,按库位/产品类型过滤,
    /// 可选工序明细存在性过滤
    fn sum_product_tran(
        &self,
        spec: &PlantQuerySpec,
        range: &DateRange,
    ) -> SqliteResult<Vec<(NaiveDate, f64)>> {
        let mut sql = String::from(
            r#"
            SELECT date(T.tran_date) AS tran_date, SUM(T.tran_qty) AS tran_qty
            FROM product_tran T
            INNER JOIN product P ON P.part_no = T.part_no
            WHERE T.tran_type = ?1
              AND date(T.tran_date) BETWEEN ?2 AND ?3
              AND T.d_inventory_no = ?4
              AND P.product_type = ?5
            "#,
        );

        let mut sql_params: Vec<Box<dyn rusqlite::ToSql>> = vec![
            Box::new(spec.tran_type.to_string()),
            Box::new(range.start),
            Box::new(range.end),
            Box::new(spec.inventory_no.to_string()),
            Box::new(spec.product_type.unwrap_or_default().to_string()),
        ];

        match spec.process_area {
            ProcessAreaFilter::Requires(area) => {
                sql.push_str(
                    "  AND EXISTS (SELECT 1 FROM process_detail PD \
                     WHERE PD.part_no = T.part_no AND PD.process_area_no = ?6)\n",
                );
                sql_params.push(Box::new(area.to_string()));
            }
            ProcessAreaFilter::Excludes(area) => {
                sql.push_str(
                    "  AND NOT EXISTS (SELECT 1 FROM process_detail PD \
                     WHERE PD.part_no = T.part_no AND PD.process_area_no = ?6)\n",
                );
                sql_params.push(Box::new(area.to_string()));
            }
            ProcessAreaFilter::None => {}
        }

        sql.push_str("GROUP BY date(T.tran_date)");

        self.run_sum_query(&sql, sql_params)
    }

    /// 材料交易表查询: 无产品主数据关联,无工序区过滤
    fn sum_material_tran(
        &self,
        spec: &PlantQuerySpec,
        range: &DateRange,
    ) -> SqliteResult<Vec<(NaiveDate, f64)>> {
        let sql = r#"
            SELECT date(T.tran_date) AS tran_date, SUM(T.tran_qty) AS tran_qty
            FROM material_tran T
            WHERE T.tran_type = ?1
              AND date(T.tran_date) BETWEEN ?2 AND ?3
              AND T.d_inventory_no = ?4
            GROUP BY date(T.tran_date)
            "#;

        let sql_params: Vec<Box<dyn rusqlite::ToSql>> = vec![
            Box::new(spec.tran_type.to_string()),
            Box::new(range.start),
            Box::new(range.end),
            Box::new(spec.inventory_no.to_string()),
        ];

        self.run_sum_query(sql, sql_params)
    }

    fn run_sum_query(
        &self,
        sql: &str,
        sql_params: Vec<Box<dyn rusqlite::ToSql>>,
    ) -> SqliteResult<Vec<(NaiveDate, f64)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(sql_params), |row| {
                Ok((row.get::<_, NaiveDate>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect();
        rows
    }
}

// ==========================================
// 单元测试
// ==========================================
