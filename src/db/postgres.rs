use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use super::models::{Application, ApplicantProfile, EmployerProfile, Job, User};
use super::repository::{
    ApplicantRepository, ApplicationRepository, EmployerRepository, JobRepository, StoreError,
    StoreResult, UserRepository,
};

/// Repository implementations backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn map_write_error(err: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique constraint");
            return StoreError::Conflict(format!("{} already exists ({})", what, constraint));
        }
    }
    StoreError::Database(err)
}

const USER_COLUMNS: &str =
    "id, name, username, email, password_hash, role, external_id, created_at";
const JOB_COLUMNS: &str =
    "id, title, description, salary, location, employer_id, company_image, created_at";
const APPLICATION_COLUMNS: &str = "id, applicant_id, job_id, status, applied_at, feedback";

#[async_trait]
impl UserRepository for PgStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        debug!("Inserting user: id={}, role={}", user.id, user.role);

        sqlx::query(
            r#"
            INSERT INTO users (id, name, username, email, password_hash, role, external_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.external_id)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE external_id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let query = format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update(&self, user: &User) -> StoreResult<bool> {
        debug!("Updating user: id={}", user.id);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, username = $3, email = $4, password_hash = $5, role = $6, external_id = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.external_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!("Deleted user {}: {} rows", id, result.rows_affected());
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicantRepository for PgStore {
    async fn insert(&self, profile: &ApplicantProfile) -> StoreResult<()> {
        debug!("Inserting applicant profile for user {}", profile.user_id);

        sqlx::query(
            r#"
            INSERT INTO applicants (id, user_id, resume_url, skills, experience, education)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.resume_url)
        .bind(&profile.skills)
        .bind(&profile.experience)
        .bind(&profile.education)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Applicant profile"))?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<ApplicantProfile>> {
        Ok(sqlx::query_as::<_, ApplicantProfile>(
            r#"
            SELECT id, user_id, resume_url, skills, experience, education
            FROM applicants WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update(&self, profile: &ApplicantProfile) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE applicants
            SET resume_url = $2, skills = $3, experience = $4, education = $5
            WHERE user_id = $1
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.resume_url)
        .bind(&profile.skills)
        .bind(&profile.experience)
        .bind(&profile.education)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM applicants WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl EmployerRepository for PgStore {
    async fn insert(&self, profile: &EmployerProfile) -> StoreResult<()> {
        debug!("Inserting employer profile for user {}", profile.user_id);

        sqlx::query(
            r#"
            INSERT INTO employers (id, user_id, company_name, job_listings)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.company_name)
        .bind(&profile.job_listings)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Employer profile"))?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<EmployerProfile>> {
        Ok(sqlx::query_as::<_, EmployerProfile>(
            "SELECT id, user_id, company_name, job_listings FROM employers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update(&self, profile: &EmployerProfile) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE employers SET company_name = $2, job_listings = $3 WHERE user_id = $1",
        )
        .bind(profile.user_id)
        .bind(&profile.company_name)
        .bind(&profile.job_listings)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM employers WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn add_job_listing(&self, user_id: Uuid, job_id: Uuid) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE employers SET job_listings = array_append(job_listings, $2)
            WHERE user_id = $1 AND NOT ($2 = ANY(job_listings))
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_job_listing(&self, user_id: Uuid, job_id: Uuid) -> StoreResult<()> {
        sqlx::query(
            "UPDATE employers SET job_listings = array_remove(job_listings, $2) WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(job_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl JobRepository for PgStore {
    async fn insert(&self, job: &Job) -> StoreResult<()> {
        debug!("Creating job: title={}, employer={}", job.title, job.employer_id);

        sqlx::query(
            r#"
            INSERT INTO jobs (id, title, description, salary, location, employer_id, company_image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.salary)
        .bind(&job.location)
        .bind(job.employer_id)
        .bind(&job.company_image)
        .bind(job.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Job"))?;

        debug!("Job created with id={}", job.id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let query = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        Ok(sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self) -> StoreResult<Vec<Job>> {
        let query = format!("SELECT {} FROM jobs ORDER BY created_at DESC", JOB_COLUMNS);
        Ok(sqlx::query_as::<_, Job>(&query).fetch_all(&self.pool).await?)
    }

    async fn list_by_employer(&self, employer_id: Uuid) -> StoreResult<Vec<Job>> {
        let query = format!(
            "SELECT {} FROM jobs WHERE employer_id = $1 ORDER BY created_at DESC",
            JOB_COLUMNS
        );
        Ok(sqlx::query_as::<_, Job>(&query)
            .bind(employer_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update(&self, job: &Job) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = $2, description = $3, salary = $4, location = $5, company_image = $6
            WHERE id = $1
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.salary)
        .bind(&job.location)
        .bind(&job.company_image)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_employer(&self, employer_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM jobs WHERE employer_id = $1")
            .bind(employer_id)
            .execute(&self.pool)
            .await?;
        debug!("Deleted {} jobs owned by {}", result.rows_affected(), employer_id);
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ApplicationRepository for PgStore {
    async fn insert(&self, application: &Application) -> StoreResult<()> {
        debug!(
            "Inserting application: applicant={}, job={}",
            application.applicant_id, application.job_id
        );

        sqlx::query(
            r#"
            INSERT INTO applications (id, applicant_id, job_id, status, applied_at, feedback)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(application.id)
        .bind(application.applicant_id)
        .bind(application.job_id)
        .bind(application.status.as_str())
        .bind(application.applied_at)
        .bind(&application.feedback)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Application"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let query = format!("SELECT {} FROM applications WHERE id = $1", APPLICATION_COLUMNS);
        Ok(sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_applicant_and_job(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> StoreResult<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE applicant_id = $1 AND job_id = $2",
            APPLICATION_COLUMNS
        );
        Ok(sqlx::query_as::<_, Application>(&query)
            .bind(applicant_id)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_by_applicant(&self, applicant_id: Uuid) -> StoreResult<Vec<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE applicant_id = $1 ORDER BY applied_at",
            APPLICATION_COLUMNS
        );
        Ok(sqlx::query_as::<_, Application>(&query)
            .bind(applicant_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE job_id = $1 ORDER BY applied_at",
            APPLICATION_COLUMNS
        );
        Ok(sqlx::query_as::<_, Application>(&query)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update(&self, application: &Application) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE applications SET status = $2, feedback = $3 WHERE id = $1")
            .bind(application.id)
            .bind(application.status.as_str())
            .bind(&application.feedback)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_applicant(&self, applicant_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM applications WHERE applicant_id = $1")
            .bind(applicant_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_jobs(&self, job_ids: &[Uuid]) -> StoreResult<u64> {
        if job_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM applications WHERE job_id = ANY($1)")
            .bind(job_ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
