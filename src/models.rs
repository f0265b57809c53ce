use serde::{Deserialize, Serialize};

/// An employee record
///
/// `id` is `None` until the repository persists the employee for the first
/// time; after that it never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Employee {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub role: String,
}

impl Employee {
    /// Create an employee that has not been persisted yet
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            role: role.into(),
        }
    }

    /// Same employee with the given identifier
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Request body for POST and PUT
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EmployeeRequest {
    pub name: String,
    pub role: String,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee::new(req.name, req.role)
    }
}
