// ==========================================
// 生产量汇总查询系统 - 产量记录与日期范围
// ==========================================
// 不变式: 任一结果序列中 (tran_date, plant) 组合唯一
// ==========================================

use crate::domain::types::Plant;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// 产量记录 (Production Record)
// ==========================================

/// 单工厂单日的汇总产量
///
/// 既是对外返回序列的元素,也是缓存表的写入单位。
/// 序列化字段名与前端图表数据绑定保持一致(camelCase)。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    /// 交易日期(按日截断,不含时分秒)
    pub tran_date: NaiveDate,
    /// 工厂标签
    pub plant: Plant,
    /// 当日汇总数量(非负)
    pub tran_qty: f64,
}

// ==========================================
// 日期范围 (Date Range)
// ==========================================

/// 调用方请求的日期区间,两端均包含
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 构造日期范围
    ///
    /// # 返回
    /// - Some(DateRange): start <= end
    /// - None: 区间颠倒
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<DateRange> {
        if start <= end {
            Some(DateRange { start, end })
        } else {
            None
        }
    }

    /// 判断范围是否为历史范围
    ///
    /// 规则: 结束日期严格早于基准日(当日数据在源头仍会变动,
    /// 因此"今天"永远不算历史)。
    pub fn is_historical(&self, today: NaiveDate) -> bool {
        self.end < today
    }

    /// 日期是否落在范围内(含两端)
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
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

    #[test]
    fn test_date_range_rejects_inverted() {
        assert!(DateRange::new(d(2025, 3, 31), d(2025, 3, 1)).is_none());
        assert!(DateRange::new(d(2025, 3, 1), d(2025, 3, 1)).is_some());
    }

    #[test]
    fn test_is_historical_excludes_today() {
        let today = d(2026, 1, 28);

        // 完全过去的范围
        let past = DateRange::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();
        assert!(past.is_historical(today));

        // 截止到昨天: 历史
        let until_yesterday = DateRange::new(d(2026, 1, 1), d(2026, 1, 27)).unwrap();
        assert!(until_yesterday.is_historical(today));

        // 截止到今天: 非历史
        let until_today = DateRange::new(d(2026, 1, 1), d(2026, 1, 28)).unwrap();
        assert!(!until_today.is_historical(today));

        // 跨越今天: 非历史
        let spanning = DateRange::new(d(2026, 1, 25), d(2026, 2, 1)).unwrap();
        assert!(!spanning.is_historical(today));
    }

    #[test]
    fn test_contains_inclusive_bounds() {
        let range = DateRange::new(d(2025, 3, 1), d(2025, 3, 31)).unwrap();
        assert!(range.contains(d(2025, 3, 1)));
        assert!(range.contains(d(2025, 3, 31)));
        assert!(!range.contains(d(2025, 2, 28)));
        assert!(!range.contains(d(2025, 4, 1)));
    }

    #[test]
    fn test_record_serde_field_names() {
        let record = ProductionRecord {
            tran_date: d(2025, 3, 15),
            plant: Plant::Brazing,
            tran_qty: 1250.5,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"tranDate\":\"2025-03-15\""));
        assert!(json.contains("\"plant\":\"brazing\""));
        assert!(json.contains("\"tranQty\":1250.5"));
    }
}
