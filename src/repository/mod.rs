pub mod memory;
pub mod spanner;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::models::Employee;

pub use memory::InMemoryEmployeeRepository;
pub use spanner::SpannerEmployeeRepository;

/// Persistence primitives for employees
///
/// Implementations own all locking and transactional discipline; handlers
/// call these without any coordination of their own.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Every stored employee, ordered by id
    async fn find_all(&self) -> Result<Vec<Employee>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>>;

    /// Persist an employee
    ///
    /// Assigns a fresh id when `employee.id` is `None`, otherwise inserts or
    /// overwrites the record stored under that id. Returns the stored record.
    async fn save(&self, employee: Employee) -> Result<Employee>;

    /// Remove the employee with this id
    ///
    /// Callers check existence first; deleting an absent id is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<()>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<()>;
}

/// Build the repository selected by the configuration
pub async fn from_config(config: &Config) -> Result<Arc<dyn EmployeeRepository>> {
    match &config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory employee repository");
            Ok(Arc::new(InMemoryEmployeeRepository::new()))
        }
        StorageBackend::Spanner(spanner) => {
            Ok(Arc::new(SpannerEmployeeRepository::from_config(spanner).await?))
        }
    }
}
