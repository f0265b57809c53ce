use crate::repository::EmployeeRepository;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn EmployeeRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn EmployeeRepository>) -> Self {
        Self { repository }
    }
}
