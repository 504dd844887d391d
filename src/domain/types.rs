// ==========================================
// 生产量汇总查询系统 - 领域类型定义
// ==========================================
// 约束: 工厂标签为封闭集合,不允许运行时扩展
// 序列化格式: 与前端图表/缓存表中的标签字符串一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 工厂标签 (Plant)
// ==========================================
// 七条生产线的固定标识,与缓存表 plant 列及
// 前端图表系列名一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Plant {
    Brazing,        // 钎焊线
    Lp,             // LP 线
    PlatingSub,     // 电镀 - 外协 (S)
    PlatingGreitmo, // 电镀 - Greitmo (G)
    Dom,            // 内销线
    Exp,            // 出口线
    Exp2,           // 出口二线
}

impl Plant {
    /// 全部工厂,按固定声明顺序
    pub const ALL: [Plant; 7] = [
        Plant::Brazing,
        Plant::Lp,
        Plant::PlatingSub,
        Plant::PlatingGreitmo,
        Plant::Dom,
        Plant::Exp,
        Plant::Exp2,
    ];

    /// 工厂标签字符串(缓存表与结果序列使用的固定值)
    pub fn tag(&self) -> &'static str {
        match self {
            Plant::Brazing => "brazing",
            Plant::Lp => "lp",
            Plant::PlatingSub => "plating-sub",
            Plant::PlatingGreitmo => "plating-greitmo",
            Plant::Dom => "dom",
            Plant::Exp => "exp",
            Plant::Exp2 => "exp2",
        }
    }

    /// 从标签字符串解析工厂
    ///
    /// # 返回
    /// - Some(Plant): 已知标签
    /// - None: 未知标签(缓存表被外部写入等异常情况)
    pub fn from_tag(tag: &str) -> Option<Plant> {
        match tag {
            "brazing" => Some(Plant::Brazing),
            "lp" => Some(Plant::Lp),
            "plating-sub" => Some(Plant::PlatingSub),
            "plating-greitmo" => Some(Plant::PlatingGreitmo),
            "dom" => Some(Plant::Dom),
            "exp" => Some(Plant::Exp),
            "exp2" => Some(Plant::Exp2),
            _ => None,
        }
    }
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ==========================================
// 数据源标识 (Source Id)
// ==========================================
// 五个相互独立的业务数据库
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Brazing,  // 钎焊业务库
    Usui,     // LP 业务库(结构与钎焊库相同,物理独立)
    SpdbExp,  // 电镀出口库
    SpdbExp2, // 电镀出口二库
    SpdbDom,  // 电镀内销库
}

impl SourceId {
    /// 数据源名称(日志与配置键使用)
    pub fn name(&self) -> &'static str {
        match self {
            SourceId::Brazing => "brazing",
            SourceId::Usui => "usui",
            SourceId::SpdbExp => "spdb_exp",
            SourceId::SpdbExp2 => "spdb_exp2",
            SourceId::SpdbDom => "spdb_dom",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// 单元测试
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_plant_tag_round_trip() {
        for plant in Plant::ALL {
            assert_eq!(Plant::from_tag(plant.tag()), Some(plant));
        }
    }

    #[test]
    fn test_plant_tags_distinct() {
        let tags: HashSet<&str> = Plant::ALL.iter().map(|p| p.tag()).collect();
        assert_eq!(tags.len(), Plant::ALL.len());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert_eq!(Plant::from_tag("unknown"), None);
        assert_eq!(Plant::from_tag(""), None);
        // 标签区分大小写
        assert_eq!(Plant::from_tag("Brazing"), None);
    }

    #[test]
    fn test_plant_serde_uses_tag() {
        let json = serde_json::to_string(&Plant::PlatingSub).unwrap();
        assert_eq!(json, "\"plating-sub\"");
        let back: Plant = serde_json::from_str("\"exp2\"").unwrap();
        assert_eq!(back, Plant::Exp2);
    }

    #[test]
    fn test_source_id_names() {
        assert_eq!(SourceId::Brazing.name(), "brazing");
        assert_eq!(SourceId::SpdbExp2.name(), "spdb_exp2");
        assert_eq!(SourceId::SpdbDom.to_string(), "spdb_dom");
    }
}
