use chrono::Utc;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use super::models::{Application, ApplicationStatus, ApplicantProfile, EmployerProfile, Job, User};
use super::Store;
use crate::api::error::ServiceError;
use crate::api::validation::DEFAULT_COMPANY_IMAGE;
use crate::security::password::PasswordHasher;
use crate::security::role::Role;

pub const SEED_PASSWORD: &str = "test1234#";

const COMPANY_NAMES: [&str; 3] = ["Wayne Tech", "Stark Enterprises", "Luthor Corp"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub employers: usize,
    pub applicants: usize,
    pub jobs: usize,
    pub applications: usize,
}

/// Wipes every collection and loads a small demo data set
///
/// Creates three accounts per non-federated role, profiles for every
/// employer and applicant, twenty jobs spread across the employers, and ten
/// pending applications. All accounts share [`SEED_PASSWORD`].
pub async fn run(store: &Store, hasher: &PasswordHasher) -> Result<SeedSummary, ServiceError> {
    info!("Seeding database ({} backend)", store.backend_name());
    store.reset().await?;

    let password_hash = hasher.hash(SEED_PASSWORD).await?;
    let mut summary = SeedSummary::default();

    let mut seeded_users = Vec::new();
    let accounts = [
        ("Admin", Role::Admin),
        ("Employer", Role::Employer),
        ("Applicant", Role::Applicant),
    ];
    let mut index = 4;
    for (label, role) in accounts {
        for n in 1..=3 {
            let mut user = User::new(format!("test{}@byu.edu", index), role);
            user.name = Some(format!("{}{}", label, n));
            user.password_hash = Some(password_hash.clone());
            store.users.insert(&user).await?;
            seeded_users.push(user);
            index += 1;
        }
    }
    summary.users = seeded_users.len();

    let employers: Vec<&User> = seeded_users.iter().filter(|u| u.role == Role::Employer).collect();
    let applicants: Vec<&User> = seeded_users.iter().filter(|u| u.role == Role::Applicant).collect();

    for (user, company) in employers.iter().zip(COMPANY_NAMES) {
        store
            .employers
            .insert(&EmployerProfile {
                id: Uuid::new_v4(),
                user_id: user.id,
                company_name: company.to_string(),
                job_listings: Vec::new(),
            })
            .await?;
        summary.employers += 1;
    }

    for user in &applicants {
        store
            .applicants
            .insert(&ApplicantProfile {
                id: Uuid::new_v4(),
                user_id: user.id,
                resume_url: "https://example.com/resume.pdf".to_string(),
                skills: vec!["Skill A".to_string(), "Skill B".to_string()],
                experience: vec!["Experience X".to_string()],
                education: vec!["Degree Y".to_string()],
            })
            .await?;
        summary.applicants += 1;
    }

    let mut jobs = Vec::new();
    for i in 0..20 {
        let employer = employers[i % employers.len()];
        let job = Job {
            id: Uuid::new_v4(),
            title: format!("Job {}", i + 1),
            description: format!("Description for Job {}", i + 1),
            salary: rand::thread_rng().gen_range(3000..8000) as f64,
            location: "Remote".to_string(),
            employer_id: employer.id,
            company_image: DEFAULT_COMPANY_IMAGE.to_string(),
            created_at: Utc::now(),
        };
        store.jobs.insert(&job).await?;
        store.employers.add_job_listing(employer.id, job.id).await?;
        jobs.push(job);
    }
    summary.jobs = jobs.len();

    for (i, job) in jobs.iter().take(10).enumerate() {
        store
            .applications
            .insert(&Application {
                id: Uuid::new_v4(),
                applicant_id: applicants[i % applicants.len()].id,
                job_id: job.id,
                status: ApplicationStatus::Pending,
                applied_at: Utc::now(),
                feedback: None,
            })
            .await?;
        summary.applications += 1;
    }

    info!("Database seeding completed: {:?}", summary);
    Ok(summary)
}
