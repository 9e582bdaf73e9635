use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error("Query failed on collection `{collection}`: {message}")]
    QueryFailed { collection: String, message: String },

    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    #[error(transparent)]
    CoreError(#[from] slugkit_core::error::CoreError),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
