//! Test harness with testcontainers for integration testing.
//!
//! A single Postgres container is shared across the whole test run;
//! migrations run once on first use. Each test gets a fresh pool and its
//! own in-process event bus.

use anyhow::{Context, Result};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use server_core::kernel::PubSub;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    // (None when TEST_DATABASE_URL points at an external database)
    _postgres: Option<ContainerAsync<Postgres>>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        // Allow running against an externally provided database (e.g. in
        // environments without Docker) instead of a testcontainer.
        let (db_url, postgres) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let postgres = Postgres::default()
                    .with_tag("16")
                    .with_cmd(["-c", "max_connections=200"])
                    .start()
                    .await
                    .context("Failed to start Postgres container")?;

                let pg_host = postgres.get_host().await?;
                let pg_port = postgres.get_host_port_ipv4(5432).await?;
                let db_url = format!(
                    "postgresql://postgres:postgres@{}:{}/postgres",
                    pg_host, pg_port
                );
                (db_url, Some(postgres))
            }
        };

        // Run migrations once on the shared database
        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test context over the shared database container.
///
/// The bus is per-test so subscription assertions only see events this
/// test published.
pub struct TestHarness {
    pub db_pool: PgPool,
    pub pubsub: PubSub,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Pool is dropped with the harness
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            db_pool,
            pubsub: PubSub::new(),
        })
    }
}
