use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use crate::models::Employee;
use crate::repository::{EmployeeRepository, InMemoryEmployeeRepository};
use crate::routes;
use crate::state::AppState;

/// In-memory repository that counts every call made through it
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryEmployeeRepository,
    pub find_all_calls: AtomicUsize,
    pub find_by_id_calls: AtomicUsize,
    pub save_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub saved: std::sync::Mutex<Vec<Employee>>,
}

impl CountingRepository {
    pub fn find_all_count(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    pub fn find_by_id_count(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Every employee passed to `save`, in call order
    pub fn saved(&self) -> Vec<Employee> {
        self.saved.lock().unwrap().clone()
    }

    /// Seed a record without counting it as a `save` call
    pub async fn seed(&self, employee: Employee) -> Employee {
        self.inner.save(employee).await.unwrap()
    }
}

#[async_trait]
impl EmployeeRepository for CountingRepository {
    async fn find_all(&self) -> Result<Vec<Employee>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn save(&self, employee: Employee) -> Result<Employee> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.saved.lock().unwrap().push(employee.clone());
        self.inner.save(employee).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }

    async fn health_check(&self) -> Result<()> {
        self.inner.health_check().await
    }
}

/// Repository whose every call fails
pub struct FailingRepository;

#[async_trait]
impl EmployeeRepository for FailingRepository {
    async fn find_all(&self) -> Result<Vec<Employee>> {
        Err(anyhow::anyhow!("storage unavailable"))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Employee>> {
        Err(anyhow::anyhow!("storage unavailable"))
    }

    async fn save(&self, _employee: Employee) -> Result<Employee> {
        Err(anyhow::anyhow!("storage unavailable"))
    }

    async fn delete_by_id(&self, _id: i64) -> Result<()> {
        Err(anyhow::anyhow!("storage unavailable"))
    }

    async fn health_check(&self) -> Result<()> {
        Err(anyhow::anyhow!("storage unavailable"))
    }
}

pub fn setup_test_app() -> (Router, Arc<CountingRepository>) {
    let repository = Arc::new(CountingRepository::default());
    let app = routes::router(AppState::new(repository.clone()));
    (app, repository)
}

pub fn setup_failing_app() -> Router {
    routes::router(AppState::new(Arc::new(FailingRepository)))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Send one request with `Host: localhost` and an optional JSON body
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "localhost");

    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn manager_request_body(name: &str) -> String {
    format!(r#"{{ "role": "Manager", "name": "{}" }}"#, name)
}
