// ==========================================
// 生产量汇总查询系统 - 仓储层错误类型
// ==========================================
// 传播策略: 在出错源头记录一次日志,原样向上传播;
//           不重试,不吞错,不返回部分结果
// 例外: 缓存写入失败由 API 层单独兜底(见 api 层)
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 缓存表初始化错误 =====
    /// 缓存表/索引创建失败("已存在"类错误不在此列,视为成功)
    #[error("缓存表初始化失败: {0}")]
    SchemaBootstrap(String),

    // ===== 数据源查询错误 =====
    /// 任一后端数据库(缓存库或业务库)查询失败
    #[error("数据源查询失败 (source={source_name}): {message}")]
    SourceQuery { source_name: String, message: String },

    // ===== 缓存写入错误 =====
    /// 实时计算成功后的缓存回写失败
    #[error("缓存写入失败: {0}")]
    CacheWrite(String),

    // ===== 数据库错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnection(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQuery(String),

    // ===== 数据质量错误 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValue { field: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
// 带数据源上下文的转换请使用 RepositoryError::source_query
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        RepositoryError::DatabaseQuery(err.to_string())
    }
}

impl RepositoryError {
    /// 构造带数据源名称的查询错误
    pub fn source_query(source: &str, err: impl std::fmt::Display) -> Self {
        RepositoryError::SourceQuery {
            source_name: source.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
