// ==========================================
// 生产量汇总查询系统 - 产量查询 API
// ==========================================
// 职责: 对外暴露产量查询边界操作,编排缓存读写与实时聚合
// 控制流: 建表 → (历史范围)查缓存 → 命中即返回
//         → 实时聚合 → (历史范围且非空)回写缓存 → 返回
// 架构: API 层 → Engine 层 / Repository 层
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::DataSourceConfig;
use crate::domain::production::{DateRange, ProductionRecord};
use crate::engine::VolumeAggregationEngine;
use crate::repository::error::RepositoryResult;
use crate::repository::volume_cache_repo::VolumeCacheRepository;

/// 默认整体超时(秒)
///
/// 实时聚合是跨多库的批式汇总查询,预算按分钟计,不是点查
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 300;

// ==========================================
// ProductionVolumeService - 服务接口
// ==========================================

/// 产量查询服务接口
///
/// 供外层(Web 端点等协作方)以 trait 对象持有,
/// 屏蔽具体实现与数据源细节。
#[async_trait]
pub trait ProductionVolumeService: Send + Sync {
    /// 查询日期范围内按工厂、按日汇总的产量序列
    async fn get_production_data(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<Vec<ProductionRecord>>;
}

// ==========================================
// ProductionVolumeApi - 产量查询 API
// ==========================================

/// 产量查询API
///
/// 职责:
/// 1. 入参校验(范围合法性)
/// 2. 缓存表幂等建表
/// 3. 历史范围的缓存命中短路
/// 4. 实时聚合与历史结果回写
///
/// 每次调用独立执行,无跨请求状态;全部数据库连接为请求级
/// 短生命周期,在各阶段任务内打开并随任务结束释放。
pub struct ProductionVolumeApi {
    config: Arc<DataSourceConfig>,
    engine: VolumeAggregationEngine,
    timeout: Duration,
}

impl ProductionVolumeApi {
    /// 创建API实例(默认超时)
    pub fn new(config: Arc<DataSourceConfig>) -> Self {
        Self::with_timeout(config, Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS))
    }

    /// 创建API实例并指定整体超时
    pub fn with_timeout(config: Arc<DataSourceConfig>, timeout: Duration) -> Self {
        let engine = VolumeAggregationEngine::new(config.clone());
        Self {
            config,
            engine,
            timeout,
        }
    }

    /// 查询产量序列(以当前日历日作为历史范围判定基准)
    ///
    /// # 参数
    /// - start_date / end_date: 日期范围,含两端
    ///
    /// # 返回
    /// - Ok(Vec<ProductionRecord>): 汇总序列
    /// - Err(ApiError): 入参非法、任一数据源失败或整体超时
    ///
    /// # 超时说明
    /// 超时返回后,已下发的查询任务会继续跑完并在结束时释放
    /// 各自的连接,不会因取消而泄漏。
    pub async fn get_production_data(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<Vec<ProductionRecord>> {
        let today = Local::now().date_naive();
        match tokio::time::timeout(
            self.timeout,
            self.get_production_data_at(start_date, end_date, today),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                let seconds = self.timeout.as_secs();
                error!("产量查询超时: {}..{} 超过 {} 秒", start_date, end_date, seconds);
                Err(ApiError::Timeout { seconds })
            }
        }
    }

    /// 以指定基准日执行查询
    ///
    /// # 用途
    /// - 补数/回放场景下以固定基准日重现当时的缓存判定
    /// - 测试
    ///
    /// # 参数
    /// - today: 历史范围判定的基准日(end < today 即历史)
    pub async fn get_production_data_at(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> ApiResult<Vec<ProductionRecord>> {
        let range = DateRange::new(start_date, end_date).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "日期范围颠倒: start={} end={}",
                start_date, end_date
            ))
        })?;

        let request_id = Uuid::new_v4();
        let historical = range.is_historical(today);
        info!(
            request_id = %request_id,
            "产量查询: {}..{} (historical={})",
            range.start, range.end, historical
        );

        // 阶段 1: 建表 + (历史范围)缓存查询
        if let Some(records) = self.run_cache_phase(range, historical).await? {
            info!(
                request_id = %request_id,
                "缓存命中: {} 条记录,跳过实时聚合",
                records.len()
            );
            return Ok(records);
        }

        // 阶段 2: 实时聚合
        let records = self.engine.compute_live(range).await?;

        // 阶段 3: 历史范围且结果非空时回写缓存
        if historical && !records.is_empty() {
            self.persist_to_cache(range, records.clone(), request_id)
                .await;
        }

        Ok(records)
    }

    /// 缓存阶段: 幂等建表,历史范围时做范围查询
    ///
    /// # 返回
    /// - Ok(Some): 缓存命中(非空结果)
    /// - Ok(None): 未命中(非历史范围、或范围内无缓存行)
    async fn run_cache_phase(
        &self,
        range: DateRange,
        historical: bool,
    ) -> ApiResult<Option<Vec<ProductionRecord>>> {
        let cache_db = self.config.cache_db.clone();
        let result = tokio::task::spawn_blocking(
            move || -> RepositoryResult<Option<Vec<ProductionRecord>>> {
                let repo = VolumeCacheRepository::open(&cache_db)?;
                repo.ensure_schema()?;

                // 非历史范围一律不读缓存:当日数据在源头仍会变动
                if !historical {
                    return Ok(None);
                }

                let records = repo.find_by_date_range(&range)?;
                if records.is_empty() {
                    // 空结果视为未命中(而不是"缓存的零产量"),
                    // 落回实时聚合
                    Ok(None)
                } else {
                    Ok(Some(records))
                }
            },
        )
        .await
        .map_err(|e| ApiError::InternalError(format!("缓存任务执行失败: {}", e)))??;

        Ok(result)
    }

    /// 回写缓存: 删除范围内旧行后插入新序列
    ///
    /// 回写失败不影响本次查询结果——实时聚合已经成功,
    /// 其结果仍原样返回给调用方,失败仅记录日志。
    async fn persist_to_cache(
        &self,
        range: DateRange,
        records: Vec<ProductionRecord>,
        request_id: Uuid,
    ) {
        let cache_db = self.config.cache_db.clone();
        let outcome = tokio::task::spawn_blocking(move || -> RepositoryResult<usize> {
            let repo = VolumeCacheRepository::open(&cache_db)?;
            repo.replace_range(&range, &records)
        })
        .await;

        match outcome {
            Ok(Ok(count)) => {
                info!(request_id = %request_id, "缓存回写完成: {} 行", count);
            }
            Ok(Err(e)) => {
                error!(request_id = %request_id, "缓存回写失败,仍返回实时结果: {}", e);
            }
            Err(e) => {
                error!(request_id = %request_id, "缓存回写任务执行失败,仍返回实时结果: {}", e);
            }
        }
    }
}

#[async_trait]
impl ProductionVolumeService for ProductionVolumeApi {
    async fn get_production_data(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<Vec<ProductionRecord>> {
        ProductionVolumeApi::get_production_data(self, start_date, end_date).await
    }
}
