// ==========================================
// 生产量汇总查询系统 - 产量缓存仓储
// ==========================================
// 职责: 管理 iot_pdvolume 缓存表的建表、范围查询与范围重写
// 红线: Repository 不含业务逻辑,历史范围判定在 API 层完成
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::production::{DateRange, ProductionRecord};
use crate::domain::types::Plant;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use tracing::{debug, error};

/// 缓存表建表语句(幂等)
///
/// 列说明: created_at 仅用于审计排查,不参与查询键
const CREATE_CACHE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS iot_pdvolume (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tran_date TEXT NOT NULL,
    plant TEXT NOT NULL,
    tran_qty REAL NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_iot_pdvolume_date ON iot_pdvolume(tran_date);
"#;

// ==========================================
// CacheRow - 缓存行实体
// ==========================================

/// 缓存表中的一行(持久化形态,含审计时间戳)
#[derive(Debug, Clone)]
pub struct CacheRow {
    pub id: i64,
    pub tran_date: NaiveDate,
    /// 原始标签字符串(未经枚举校验的持久化值)
    pub plant: String,
    pub tran_qty: f64,
    pub created_at: String,
}

// ==========================================
// VolumeCacheRepository - 产量缓存仓储
// ==========================================

/// 产量缓存仓储
///
/// 连接为请求级短生命周期: 在请求入口 open,请求结束(或出错)
/// 时随仓储一起释放。不跨请求共享。
pub struct VolumeCacheRepository {
    conn: Connection,
}

impl VolumeCacheRepository {
    /// 打开缓存库并创建仓储实例
    ///
    /// # 参数
    /// - db_path: 缓存数据库文件路径
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| {
            error!("缓存库连接失败: {}", e);
            RepositoryError::DatabaseConnection(e.to_string())
        })?;
        Ok(Self { conn })
    }

    /// 从已有连接创建仓储实例(测试用)
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// 幂等创建缓存表与日期索引
    ///
    /// # 说明
    /// - 每次请求入口都会调用,已存在时无任何可见副作用
    /// - 并发首次建表的竞态下,"已存在"类错误视为成功,
    ///   不得上抛给调用方
    pub fn ensure_schema(&self) -> RepositoryResult<()> {
        match self.conn.execute_batch(CREATE_CACHE_SCHEMA_SQL) {
            Ok(()) => Ok(()),
            Err(e) if e.to_string().contains("already exists") => Ok(()),
            Err(e) => {
                error!("缓存表初始化失败: {}", e);
                Err(RepositoryError::SchemaBootstrap(e.to_string()))
            }
        }
    }

    /// 查询日期范围内的缓存记录(含两端)
    ///
    /// # 返回
    /// - Ok(Vec<ProductionRecord>): 范围内全部缓存行;空集由调用方
    ///   解释为未命中(真实零产量的历史范围不可缓存)
    /// - Err: 数据库错误
    pub fn find_by_date_range(&self, range: &DateRange) -> RepositoryResult<Vec<ProductionRecord>> {
        let rows = self
            .query_range_raw(range)
            .map_err(|e| {
                error!("缓存查询失败: {}", e);
                RepositoryError::source_query("cache", e)
            })?;

        let mut records = Vec::with_capacity(rows.len());
        for (tran_date, tag, tran_qty) in rows {
            let plant = Plant::from_tag(&tag).ok_or_else(|| {
                error!("缓存表出现未知工厂标签: {}", tag);
                RepositoryError::FieldValue {
                    field: "plant".to_string(),
                    message: format!("未知工厂标签: {}", tag),
                }
            })?;
            records.push(ProductionRecord {
                tran_date,
                plant,
                tran_qty,
            });
        }

        debug!(
            "缓存范围查询: {}..{} 命中 {} 行",
            range.start,
            range.end,
            records.len()
        );
        Ok(records)
    }

    fn query_range_raw(
        &self,
        range: &DateRange,
    ) -> SqliteResult<Vec<(NaiveDate, String, f64)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT tran_date, plant, tran_qty
            FROM iot_pdvolume
            WHERE tran_date BETWEEN ?1 AND ?2
            "#,
        )?;

        let rows = stmt
            .query_map(params![range.start, range.end], |row| {
                Ok((
                    row.get::<_, NaiveDate>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect();
        rows
    }

    /// 以新序列整体重写范围内的缓存
    ///
    /// # 步骤
    /// 1. 删除范围内(含两端)的全部旧行,防止重算产生重复/陈旧数据
    /// 2. 批量插入新记录
    ///
    /// 两步在同一事务内执行(写效率);并发重写同一范围时
    /// 为后写者胜,语义与调用方约定一致。
    ///
    /// # 返回
    /// - Ok(usize): 插入的记录数
    /// - Err(CacheWrite): 任一步失败
    pub fn replace_range(
        &self,
        range: &DateRange,
        records: &[ProductionRecord],
    ) -> RepositoryResult<usize> {
        let result = (|| -> SqliteResult<usize> {
            let tx = self.conn.unchecked_transaction()?;

            tx.execute(
                "DELETE FROM iot_pdvolume WHERE tran_date BETWEEN ?1 AND ?2",
                params![range.start, range.end],
            )?;

            let mut count = 0;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO iot_pdvolume (tran_date, plant, tran_qty) VALUES (?1, ?2, ?3)",
                )?;
                for record in records {
                    stmt.execute(params![
                        record.tran_date,
                        record.plant.tag(),
                        record.tran_qty
                    ])?;
                    count += 1;
                }
            }

            tx.commit()?;
            Ok(count)
        })();

        result.map_err(|e| {
            error!("缓存范围重写失败: {}", e);
            RepositoryError::CacheWrite(e.to_string())
        })
    }

    /// 查询范围内的缓存行(持久化形态,审计/测试用)
    pub fn find_rows_by_date_range(&self, range: &DateRange) -> RepositoryResult<Vec<CacheRow>> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
                SELECT id, tran_date, plant, tran_qty, created_at
                FROM iot_pdvolume
                WHERE tran_date BETWEEN ?1 AND ?2
                ORDER BY plant ASC, tran_date ASC
                "#,
            )
            .map_err(|e| RepositoryError::source_query("cache", e))?;

        let rows = stmt
            .query_map(params![range.start, range.end], |row| {
                Ok(CacheRow {
                    id: row.get(0)?,
                    tran_date: row.get(1)?,
                    plant: row.get(2)?,
                    tran_qty: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })
            .map_err(|e| RepositoryError::source_query("cache", e))?
            .collect::<SqliteResult<Vec<_>>>()
            .map_err(|e| RepositoryError::source_query("cache", e))?;

        Ok(rows)
    }
}

// ==========================================
// 单元测试
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(date: NaiveDate, plant: Plant, qty: f64) -> ProductionRecord {
        ProductionRecord {
            tran_date: date,
            plant,
            tran_qty: qty,
        }
    }

    fn in_memory_repo() -> VolumeCacheRepository {
        let conn = Connection::open_in_memory().unwrap();
        let repo = VolumeCacheRepository::from_connection(conn);
        repo.ensure_schema().unwrap();
        repo
    }

    #[test]
    fn test_ensure_schema_idempotent() {
        let repo = in_memory_repo();
        // 重复调用不报错,表结构不变
        repo.ensure_schema().unwrap();
        repo.ensure_schema().unwrap();

        let range = DateRange::new(d(2025, 1, 1), d(2025, 12, 31)).unwrap();
        assert!(repo.find_by_date_range(&range).unwrap().is_empty());
    }

    #[test]
    fn test_replace_then_lookup() {
        let repo = in_memory_repo();
        let range = DateRange::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();

        let records = vec![
            record(d(2025, 3, 1), Plant::Brazing, 100.0),
            record(d(2025, 3, 2), Plant::Brazing, 200.0),
            record(d(2025, 3, 1), Plant::Lp, 50.0),
        ];
        let inserted = repo.replace_range(&range, &records).unwrap();
        assert_eq!(inserted, 3);

        let found = repo.find_by_date_range(&range).unwrap();
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_lookup_bounds_inclusive() {
        let repo = in_memory_repo();
        let full = DateRange::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();
        let records = vec![
            record(d(2025, 3, 1), Plant::Dom, 1.0),
            record(d(2025, 3, 15), Plant::Dom, 2.0),
            record(d(2025, 3, 31), Plant::Dom, 3.0),
        ];
        repo.replace_range(&full, &records).unwrap();

        // 两端日期都命中
        let edges = DateRange::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();
        assert_eq!(repo.find_by_date_range(&edges).unwrap().len(), 3);

        // 子范围只取中间
        let middle = DateRange::new(d(2025, 3, 2), d(2025, 3, 30)).unwrap();
        let found = repo.find_by_date_range(&middle).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tran_date, d(2025, 3, 15));
    }

    #[test]
    fn test_replace_range_is_destructive_then_additive() {
        let repo = in_memory_repo();
        let range = DateRange::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();

        // 第一轮写入
        let old = vec![
            record(d(2025, 3, 10), Plant::Brazing, 100.0),
            record(d(2025, 3, 11), Plant::Brazing, 110.0),
        ];
        repo.replace_range(&range, &old).unwrap();

        // 范围外的行不受重写影响
        let outside_range = DateRange::new(d(2025, 4, 1), d(2025, 4, 30)).unwrap();
        let outside = vec![record(d(2025, 4, 5), Plant::Lp, 999.0)];
        repo.replace_range(&outside_range, &outside).unwrap();

        // 第二轮重算后的新序列(日期集合与数值都不同)
        let new = vec![
            record(d(2025, 3, 10), Plant::Brazing, 105.0),
            record(d(2025, 3, 20), Plant::Lp, 55.0),
        ];
        repo.replace_range(&range, &new).unwrap();

        // 范围内只剩新序列
        let rows = repo.find_rows_by_date_range(&range).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .any(|r| r.tran_date == d(2025, 3, 10) && r.tran_qty == 105.0));
        assert!(rows
            .iter()
            .any(|r| r.tran_date == d(2025, 3, 20) && r.plant == "lp"));
        // 旧行 3/11 已被删除
        assert!(!rows.iter().any(|r| r.tran_date == d(2025, 3, 11)));

        // 范围外的行仍在
        let kept = repo.find_by_date_range(&outside_range).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].tran_qty, 999.0);
    }

    #[test]
    fn test_cache_rows_have_created_at() {
        let repo = in_memory_repo();
        let range = DateRange::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();
        repo.replace_range(&range, &[record(d(2025, 3, 1), Plant::Exp, 10.0)])
            .unwrap();

        let rows = repo.find_rows_by_date_range(&range).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].created_at.is_empty());
        assert_eq!(rows[0].plant, "exp");
    }

    #[test]
    fn test_unknown_plant_tag_in_cache_rejected() {
        let repo = in_memory_repo();
        // 模拟外部进程写入了未知标签
        repo.conn
            .execute(
                "INSERT INTO iot_pdvolume (tran_date, plant, tran_qty) VALUES ('2025-03-01', 'bogus', 1.0)",
                [],
            )
            .unwrap();

        let range = DateRange::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();
        let result = repo.find_by_date_range(&range);
        match result {
            Err(RepositoryError::FieldValue { field, .. }) => assert_eq!(field, "plant"),
            other => panic!("期望 FieldValue 错误,实际 {:?}", other),
        }
    }
}
