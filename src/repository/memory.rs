use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::EmployeeRepository;
use crate::models::Employee;

#[derive(Debug, Default)]
struct Store {
    /// Arena of records; removed slots become `None`
    slots: Vec<Option<Employee>>,
    /// Vacated slots, reused before the arena grows
    free: Vec<usize>,
    /// id -> slot in `slots`, ordered by id
    index: BTreeMap<i64, usize>,
    /// Highest id handed out or stored so far
    last_id: i64,
}

impl Store {
    fn next_id(&mut self) -> Result<i64> {
        let id = self
            .last_id
            .checked_add(1)
            .context("Employee id sequence exhausted")?;
        self.last_id = id;
        Ok(id)
    }

    fn upsert(&mut self, employee: Employee, id: i64) {
        self.last_id = self.last_id.max(id);
        if let Some(&slot) = self.index.get(&id) {
            self.slots[slot] = Some(employee);
            return;
        }

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(employee);
                slot
            }
            None => {
                self.slots.push(Some(employee));
                self.slots.len() - 1
            }
        };
        self.index.insert(id, slot);
    }

    fn remove(&mut self, id: i64) -> bool {
        match self.index.remove(&id) {
            Some(slot) => {
                self.slots[slot] = None;
                self.free.push(slot);
                true
            }
            None => false,
        }
    }
}

/// Process-local employee storage
///
/// Ids are assigned sequentially starting at 1 and never reused, even
/// after a delete. Once an id of `i64::MAX` has been stored, `save` of a
/// new employee fails instead of wrapping around.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    store: RwLock<Store>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_all(&self) -> Result<Vec<Employee>> {
        let store = self.store.read().await;
        Ok(store
            .index
            .values()
            .filter_map(|&slot| store.slots[slot].clone())
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>> {
        let store = self.store.read().await;
        Ok(store
            .index
            .get(&id)
            .and_then(|&slot| store.slots[slot].clone()))
    }

    async fn save(&self, mut employee: Employee) -> Result<Employee> {
        let mut store = self.store.write().await;
        let id = match employee.id {
            Some(id) => id,
            None => store.next_id()?,
        };
        employee.id = Some(id);
        store.upsert(employee.clone(), id);

        tracing::debug!("Saved employee with id: {}", id);
        Ok(employee)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut store = self.store.write().await;
        if store.remove(id) {
            tracing::debug!("Deleted employee with id: {}", id);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
