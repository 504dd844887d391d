// ==========================================
// 生产量汇总查询系统 - 实时聚合引擎
// ==========================================
// 职责: 按工厂取数规格表对全部业务库做散发-汇聚查询,
//       在内存中按日期合并为单一有序序列
// 失败语义: 任一数据源失败即整体失败,不返回部分结果,不重试
// ==========================================

use crate::config::DataSourceConfig;
use crate::domain::plant::PLANT_QUERY_SPECS;
use crate::domain::production::{DateRange, ProductionRecord};
use crate::domain::types::Plant;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::source_volume_repo::SourceVolumeRepository;
use chrono::NaiveDate;
use futures::future;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// VolumeAggregationEngine - 实时聚合引擎
// ==========================================

/// 实时聚合引擎
///
/// 每个 (工厂, 数据源) 组合作为一个独立查询任务下发到阻塞线程池,
/// 任务内部自行打开并持有连接,任务结束(无论成败)连接即释放。
/// 整体取消时已下发的任务跑完即回收,不会泄漏连接。
pub struct VolumeAggregationEngine {
    config: Arc<DataSourceConfig>,
}

impl VolumeAggregationEngine {
    /// 创建引擎实例
    pub fn new(config: Arc<DataSourceConfig>) -> Self {
        Self { config }
    }

    /// 对全部业务库执行实时聚合
    ///
    /// # 参数
    /// - range: 日期范围,含两端
    ///
    /// # 返回
    /// - Ok(Vec<ProductionRecord>): 按工厂标签升序、日期降序排列;
    ///   每个 (日期, 工厂) 组合至多一条
    /// - Err: 任一数据源失败时的首个错误
    pub async fn compute_live(&self, range: DateRange) -> RepositoryResult<Vec<ProductionRecord>> {
        let mut plants = Vec::new();
        let mut handles = Vec::new();

        for spec in PLANT_QUERY_SPECS.iter() {
            for &source in spec.sources {
                let db_path = self.config.source_db_path(source).to_string();
                plants.push(spec.plant);
                handles.push(tokio::task::spawn_blocking(move || {
                    let repo = SourceVolumeRepository::open(source, &db_path)?;
                    repo.sum_by_date(spec, &range)
                }));
            }
        }

        debug!(
            "实时聚合下发 {} 个查询任务 ({}..{})",
            handles.len(),
            range.start,
            range.end
        );

        let joined = future::try_join_all(handles)
            .await
            .map_err(|e| RepositoryError::Internal(format!("聚合任务执行失败: {}", e)))?;

        // 按工厂合并各数据源的部分序列(同一日期求和)
        let mut merged: BTreeMap<Plant, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        for (plant, partial) in plants.into_iter().zip(joined) {
            let partial = partial?;
            let by_date = merged.entry(plant).or_default();
            for (date, qty) in partial {
                *by_date.entry(date).or_insert(0.0) += qty;
            }
        }

        let mut records = Vec::new();
        for (plant, by_date) in merged {
            for (date, qty) in by_date {
                records.push(ProductionRecord {
                    tran_date: date,
                    plant,
                    tran_qty: qty,
                });
            }
        }

        // 输出顺序: 工厂标签升序,同工厂内日期降序
        records.sort_by(|a, b| {
            a.plant
                .tag()
                .cmp(b.plant.tag())
                .then_with(|| b.tran_date.cmp(&a.tran_date))
        });

        info!(
            "实时聚合完成: {}..{} 共 {} 条记录",
            range.start,
            range.end,
            records.len()
        );
        Ok(records)
    }
}
