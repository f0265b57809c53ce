use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig, Error as SpannerError};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert, insert_or_update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use std::sync::Arc;

use super::EmployeeRepository;
use crate::config::SpannerConfig;
use crate::models::Employee;

const TABLE: &str = "employees";
const COLUMNS: [&str; 3] = ["id", "name", "role"];

/// Attempts at claiming `MAX(id) + 1` before giving up
const MAX_ID_ATTEMPTS: usize = 5;

/// Employee repository backed by Cloud Spanner
///
/// Cheap to clone; clones share the underlying session pool.
#[derive(Clone)]
pub struct SpannerEmployeeRepository {
    inner: Arc<Client>,
}

impl SpannerEmployeeRepository {
    /// Create a new Spanner-backed repository from configuration
    ///
    /// This creates a connection to Spanner using the provided config.
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to
    /// the emulator when set, or production Spanner otherwise.
    ///
    /// This function also performs auto-provisioning: it will automatically
    /// create the instance, database, and `employees` table if they don't exist.
    ///
    /// # Arguments
    /// * `config` - Spanner project, instance, database and emulator settings
    ///
    /// # Errors
    /// Returns an error if provisioning fails or the client cannot connect
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        // Perform auto-provisioning first
        auto_provision(config).await?;

        let database_path = config.database_path();

        // Log connection target
        match config.emulator_host.as_deref() {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        // ClientConfig::default() automatically uses SPANNER_EMULATOR_HOST if set
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Read the next candidate id (`MAX(id) + 1`, or 1 for an empty table)
    ///
    /// The value is only a candidate: a concurrent writer may claim it
    /// before our insert commits. Spanner reports an INT64 overflow as a
    /// query error once `MAX(id)` is `i64::MAX`.
    async fn next_id(&self) -> Result<i64> {
        let statement = Statement::new(
            "SELECT COALESCE(MAX(id), 0) + 1 AS next_id FROM employees"
        );

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query next employee id")?;

        match result_set.next().await? {
            Some(row) => Ok(row.column_by_name("next_id")?),
            None => Ok(1),
        }
    }

    /// Insert a new employee under a freshly assigned id
    ///
    /// Uses a plain `insert` mutation rather than `insert_or_update`, so a
    /// commit fails with `AlreadyExists` if a concurrent writer claimed the
    /// same id first. In that case the id is recomputed and the insert retried,
    /// up to `MAX_ID_ATTEMPTS` times.
    ///
    /// # Arguments
    /// * `employee` - Employee without an id
    ///
    /// # Returns
    /// * `Ok(employee)` - The employee with its assigned id
    ///
    /// # Errors
    /// Returns an error if the id query or the insert fails for any reason
    /// other than an id conflict, or if every attempt hit a conflict
    async fn insert_new(&self, mut employee: Employee) -> Result<Employee> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = self.next_id().await?;

            // Fails with AlreadyExists instead of overwriting a concurrent insert
            let mutation = insert(
                TABLE,
                &COLUMNS,
                &[&id, &employee.name, &employee.role],
            );

            match self.inner.apply(vec![mutation]).await {
                Ok(_) => {
                    employee.id = Some(id);
                    tracing::debug!("Inserted employee with id: {}", id);
                    return Ok(employee);
                }
                Err(SpannerError::GRPC(status)) if status.code() == Code::AlreadyExists => {
                    tracing::warn!(
                        "Employee id {} already taken (attempt {}/{}), retrying",
                        id,
                        attempt,
                        MAX_ID_ATTEMPTS
                    );
                }
                Err(e) => return Err(e).context("Failed to insert employee into Spanner"),
            }
        }

        Err(anyhow::anyhow!(
            "Failed to assign an employee id after {} attempts",
            MAX_ID_ATTEMPTS
        ))
    }
}

fn employee_from_row(row: &Row) -> Result<Employee> {
    Ok(Employee {
        id: Some(row.column_by_name("id")?),
        name: row.column_by_name("name")?,
        role: row.column_by_name("role")?,
    })
}

#[async_trait]
impl EmployeeRepository for SpannerEmployeeRepository {
    async fn find_all(&self) -> Result<Vec<Employee>> {
        let statement = Statement::new("SELECT id, name, role FROM employees ORDER BY id ASC");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query employees from Spanner")?;

        // Collect results
        let mut employees = Vec::new();
        while let Some(row) = result_set.next().await? {
            employees.push(employee_from_row(&row)?);
        }

        tracing::debug!("Listed {} employees", employees.len());
        Ok(employees)
    }

    /// Read an employee by id
    ///
    /// # Returns
    /// * `Ok(Some(employee))` - Employee found
    /// * `Ok(None)` - No row with this id
    /// * `Err(_)` - Spanner operation failed
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>> {
        let mut statement = Statement::new(
            "SELECT id, name, role FROM employees WHERE id = @id"
        );
        statement.add_param("id", &id);

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query employee from Spanner")?;

        match result_set.next().await? {
            Some(row) => Ok(Some(employee_from_row(&row)?)),
            None => {
                tracing::debug!("Employee not found with id: {}", id);
                Ok(None)
            }
        }
    }

    /// Persist an employee
    ///
    /// An employee without an id goes through [`Self::insert_new`]. One with
    /// an id is written with `insert_or_update`, which inserts a new row or
    /// overwrites `name` and `role` of the existing one.
    ///
    /// # Arguments
    /// * `employee` - Employee to store, with or without an id
    ///
    /// # Errors
    /// Returns an error if the Spanner mutation fails
    async fn save(&self, employee: Employee) -> Result<Employee> {
        let Some(id) = employee.id else {
            return self.insert_new(employee).await;
        };

        let mutation = insert_or_update(
            TABLE,
            &COLUMNS,
            &[&id, &employee.name, &employee.role],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to upsert employee to Spanner")?;

        tracing::debug!("Upserted employee with id: {}", id);
        Ok(employee)
    }

    /// Delete the row with this id; deleting an absent key is a no-op in Spanner
    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let mutation = delete(TABLE, Key::new(&id));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete employee from Spanner")?;

        tracing::debug!("Deleted employee with id: {}", id);
        Ok(())
    }

    /// Runs `SELECT 1` to verify the session pool can reach the database
    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Automatically provision Spanner instance, database, and table
///
/// Checks whether the configured resources exist and creates the missing
/// ones, so the emulator works with zero setup.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    // Create admin client
    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    // Check and create instance if needed
    ensure_instance_exists(&admin_client, config, &project_path, &instance_path).await?;

    // Check and create database if needed
    ensure_database_exists(&admin_client, config, &instance_path, &database_path).await?;

    // Check and create table if needed
    ensure_table_exists(&admin_client, &database_path).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Ensure the Spanner instance exists, creating it if necessary
async fn ensure_instance_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let get_request = GetInstanceRequest {
        name: instance_path.to_string(),
        field_mask: None,
    };

    match admin_client.instance().get_instance(get_request, None).await {
        Ok(_) => {
            tracing::info!("Instance already exists: {}", instance_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Instance not found, creating: {}", instance_path);

            // For emulator, use a simple config
            let instance_config = if config.emulator_host.is_some() {
                format!("{}/instanceConfigs/emulator-config", project_path)
            } else {
                // For production, use a default config (regional-us-central1)
                format!("{}/instanceConfigs/regional-us-central1", project_path)
            };

            let create_request = CreateInstanceRequest {
                parent: project_path.to_string(),
                instance_id: config.instance.clone(),
                instance: Some(Instance {
                    name: instance_path.to_string(),
                    config: instance_config,
                    display_name: format!("{} instance", config.instance),
                    node_count: 1,
                    ..Default::default()
                }),
            };

            let mut operation = admin_client
                .instance()
                .create_instance(create_request, None)
                .await
                .context("Failed to start instance creation")?;

            // Wait for the operation to complete
            operation
                .wait(None)
                .await
                .context("Failed to create instance")?;

            tracing::info!("Instance created successfully: {}", instance_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check instance existence: {}",
            e.message()
        )),
    }
}

/// Ensure the Spanner database exists, creating it if necessary
async fn ensure_database_exists(
    admin_client: &AdminClient,
    config: &SpannerConfig,
    instance_path: &str,
    database_path: &str,
) -> Result<()> {
    let get_request = GetDatabaseRequest {
        name: database_path.to_string(),
    };

    match admin_client
        .database()
        .get_database(get_request, None)
        .await
    {
        Ok(_) => {
            tracing::info!("Database already exists: {}", database_path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("Database not found, creating: {}", database_path);

            let create_request = CreateDatabaseRequest {
                parent: instance_path.to_string(),
                create_statement: format!("CREATE DATABASE `{}`", config.database),
                extra_statements: vec![],
                encryption_config: None,
                database_dialect: 1, // Google Standard SQL
                proto_descriptors: vec![],
            };

            let mut operation = admin_client
                .database()
                .create_database(create_request, None)
                .await
                .context("Failed to start database creation")?;

            // Wait for the operation to complete
            operation
                .wait(None)
                .await
                .context("Failed to create database")?;

            tracing::info!("Database created successfully: {}", database_path);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(
            "Failed to check database existence: {}",
            e.message()
        )),
    }
}

/// Whether any DDL statement creates the `employees` table
fn has_employees_table(statements: &[String]) -> bool {
    statements.iter().any(|stmt| {
        stmt.contains("CREATE TABLE employees") || stmt.contains("CREATE TABLE `employees`")
    })
}

/// Ensure the employees table exists, creating it if necessary
async fn ensure_table_exists(admin_client: &AdminClient, database_path: &str) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    if has_employees_table(&ddl_response.into_inner().statements) {
        tracing::info!("Table 'employees' already exists");
        return Ok(());
    }

    tracing::info!("Table 'employees' not found, creating...");

    let create_table_ddl = r#"
CREATE TABLE employees (
    id INT64 NOT NULL,
    name STRING(MAX) NOT NULL,
    role STRING(MAX) NOT NULL,
) PRIMARY KEY (id)
"#
    .trim()
    .to_string();

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![create_table_ddl],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    // Wait for the DDL operation to complete
    operation
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table 'employees' created successfully");
    Ok(())
}
