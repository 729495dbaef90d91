pub mod connection;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod seed;

use sqlx::{Pool, Postgres};
use std::sync::Arc;

use memory::MemoryStore;
use postgres::PgStore;
pub use repository::{
    ApplicantRepository, ApplicationRepository, EmployerRepository, JobRepository, StoreError,
    StoreResult, UserRepository,
};

#[derive(Clone)]
enum Backend {
    Postgres(Pool<Postgres>),
    Memory(Arc<MemoryStore>),
}

/// Handle to every collection, opened once at startup and shared by all services
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub applicants: Arc<dyn ApplicantRepository>,
    pub employers: Arc<dyn EmployerRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    backend: Backend,
}

impl Store {
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        let repo = Arc::new(PgStore::new(pool.clone()));
        Self {
            users: repo.clone(),
            applicants: repo.clone(),
            employers: repo.clone(),
            jobs: repo.clone(),
            applications: repo,
            backend: Backend::Postgres(pool),
        }
    }

    pub fn in_memory() -> Self {
        let repo = Arc::new(MemoryStore::new());
        Self {
            users: repo.clone(),
            applicants: repo.clone(),
            employers: repo.clone(),
            jobs: repo.clone(),
            applications: repo.clone(),
            backend: Backend::Memory(repo),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Memory(_) => "memory",
        }
    }

    pub async fn ping(&self) -> StoreResult<()> {
        match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query("SELECT 1").fetch_one(pool).await?;
                Ok(())
            }
            Backend::Memory(_) => Ok(()),
        }
    }

    /// Applies pending migrations; the in-memory backend has no schema
    pub async fn migrate(&self) -> StoreResult<()> {
        match &self.backend {
            Backend::Postgres(pool) => Ok(migrations::run_migrations(pool).await?),
            Backend::Memory(_) => Ok(()),
        }
    }

    /// Removes every record from every collection
    pub async fn reset(&self) -> StoreResult<()> {
        match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query("TRUNCATE applications, jobs, employers, applicants, users")
                    .execute(pool)
                    .await?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.clear().await;
                Ok(())
            }
        }
    }

    pub async fn close(&self) {
        if let Backend::Postgres(pool) = &self.backend {
            pool.close().await;
        }
    }
}
