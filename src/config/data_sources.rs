// ==========================================
// 生产量汇总查询系统 - 数据源配置
// ==========================================
// 职责: 维护缓存库与五个业务库的连接目标
// 存储: JSON 配置文件(默认位于用户数据目录)
// ==========================================

use crate::domain::types::SourceId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件名
const CONFIG_FILE_NAME: &str = "datasources.json";

// ==========================================
// DataSourceConfig - 数据源配置
// ==========================================

/// 数据源配置
///
/// 缓存表建在独立的缓存库中;五个业务库物理独立,
/// 每次请求按需打开各自的连接。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// 缓存库(iot_pdvolume 表所在库)
    pub cache_db: String,
    /// 钎焊业务库
    pub brazing_db: String,
    /// LP 业务库
    pub usui_db: String,
    /// 电镀出口库
    pub spdb_exp_db: String,
    /// 电镀出口二库
    pub spdb_exp2_db: String,
    /// 电镀内销库
    pub spdb_dom_db: String,
}

impl DataSourceConfig {
    /// 按数据源标识取数据库路径
    pub fn source_db_path(&self, source: SourceId) -> &str {
        match source {
            SourceId::Brazing => &self.brazing_db,
            SourceId::Usui => &self.usui_db,
            SourceId::SpdbExp => &self.spdb_exp_db,
            SourceId::SpdbExp2 => &self.spdb_exp2_db,
            SourceId::SpdbDom => &self.spdb_dom_db,
        }
    }

    /// 从 JSON 配置文件加载
    pub fn from_file(path: &Path) -> Result<DataSourceConfig> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("读取数据源配置失败: {}", path.display()))?;
        let config: DataSourceConfig = serde_json::from_str(&raw)
            .with_context(|| format!("解析数据源配置失败: {}", path.display()))?;
        Ok(config)
    }

    /// 默认配置文件路径(用户数据目录下)
    pub fn default_config_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pd-volume")
            .join(CONFIG_FILE_NAME)
    }

    /// 以统一基础目录构造配置(各库为目录下的固定文件名)
    ///
    /// # 用途
    /// - 测试环境: 临时目录下生成全套数据库
    /// - 单机部署: 数据目录约定化
    pub fn for_base_dir(dir: &Path) -> DataSourceConfig {
        let db = |name: &str| dir.join(name).to_string_lossy().into_owned();
        DataSourceConfig {
            cache_db: db("cache.db"),
            brazing_db: db("brazing.db"),
            usui_db: db("usui.db"),
            spdb_exp_db: db("spdb_exp.db"),
            spdb_exp2_db: db("spdb_exp2.db"),
            spdb_dom_db: db("spdb_dom.db"),
        }
    }
}

// ==========================================
// 单元测试
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataSourceConfig {
        DataSourceConfig {
            cache_db: "/data/cache.db".to_string(),
            brazing_db: "/data/brazing.db".to_string(),
            usui_db: "/data/usui.db".to_string(),
            spdb_exp_db: "/data/spdb_exp.db".to_string(),
            spdb_exp2_db: "/data/spdb_exp2.db".to_string(),
            spdb_dom_db: "/data/spdb_dom.db".to_string(),
        }
    }

    #[test]
    fn test_source_db_path_mapping() {
        let config = sample();
        assert_eq!(config.source_db_path(SourceId::Brazing), "/data/brazing.db");
        assert_eq!(config.source_db_path(SourceId::Usui), "/data/usui.db");
        assert_eq!(config.source_db_path(SourceId::SpdbExp), "/data/spdb_exp.db");
        assert_eq!(
            config.source_db_path(SourceId::SpdbExp2),
            "/data/spdb_exp2.db"
        );
        assert_eq!(config.source_db_path(SourceId::SpdbDom), "/data/spdb_dom.db");
    }

    #[test]
    fn test_json_round_trip() {
        let config = sample();
        let json = serde_json::to_string(&config).unwrap();
        let back: DataSourceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, serde_json::to_string_pretty(&sample()).unwrap()).unwrap();

        let loaded = DataSourceConfig::from_file(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_from_file_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DataSourceConfig::from_file(&dir.path().join("absent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_for_base_dir_covers_all_sources() {
        let dir = tempfile::tempdir().unwrap();
        let config = DataSourceConfig::for_base_dir(dir.path());
        assert!(config.cache_db.ends_with("cache.db"));
        for source in [
            SourceId::Brazing,
            SourceId::Usui,
            SourceId::SpdbExp,
            SourceId::SpdbExp2,
            SourceId::SpdbDom,
        ] {
            assert!(config
                .source_db_path(source)
                .ends_with(&format!("{}.db", source.name())));
        }
    }
}
