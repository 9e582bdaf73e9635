use crate::error::DbResult;
use std::future::Future;
use std::pin::Pin;

pub mod connection;
pub mod filter;
pub mod memory;
pub mod postgres;

pub use filter::Filter;

pub trait DbProvider: Send + Sync {
    fn get_connection<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = DbResult<connection::DbConnection<'a>>> + Send + 'a>>;
}

/// A named set of sibling records the slug hook can count duplicates in.
///
/// Implemented by [`memory::MemoryCollection`] and
/// [`postgres::PgCollection`]; the persistence layer may supply its own.
pub trait Collection: Send + Sync {
    /// Collection name, used in logs and errors.
    fn name(&self) -> &str;

    /// Counts the records matching `filter`.
    fn count<'a>(
        &'a self,
        filter: &'a Filter,
    ) -> Pin<Box<dyn Future<Output = DbResult<u64>> + Send + 'a>>;
}
