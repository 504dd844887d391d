// ==========================================
// 生产量汇总查询系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换Repository错误为调用方可见的错误
// 约束: 所有错误信息必须包含显式原因
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 入参错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 执行超时
    // ==========================================
    #[error("查询超时: 超过 {seconds} 秒未完成")]
    Timeout { seconds: u64 },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("缓存表初始化失败: {0}")]
    SchemaBootstrap(String),

    #[error("数据源查询失败 (source={source_name}): {message}")]
    SourceQuery { source_name: String, message: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnection(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误映射为调用方可见的错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::SchemaBootstrap(msg) => ApiError::SchemaBootstrap(msg),
            RepositoryError::SourceQuery {
                source_name,
                message,
            } => ApiError::SourceQuery {
                source_name,
                message,
            },
            // 缓存写入失败按约定不应传播到调用方;若仍到达此处,
            // 按数据库错误处理
            RepositoryError::CacheWrite(msg) => ApiError::DatabaseError(msg),
            RepositoryError::DatabaseConnection(msg) => ApiError::DatabaseConnection(msg),
            RepositoryError::DatabaseQuery(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValue { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::Internal(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_query_conversion() {
        let repo_err = RepositoryError::SourceQuery {
            source_name: "usui".to_string(),
            message: "disk I/O error".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::SourceQuery {
                source_name: source,
                message,
            } => {
                assert_eq!(source, "usui");
                assert!(message.contains("disk I/O"));
            }
            _ => panic!("期望 SourceQuery"),
        }
    }

    #[test]
    fn test_schema_bootstrap_conversion() {
        let repo_err = RepositoryError::SchemaBootstrap("syntax error".to_string());
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::SchemaBootstrap(msg) => assert!(msg.contains("syntax error")),
            _ => panic!("期望 SchemaBootstrap"),
        }
    }

    #[test]
    fn test_timeout_message_contains_seconds() {
        let err = ApiError::Timeout { seconds: 300 };
        assert!(err.to_string().contains("300"));
    }
}
