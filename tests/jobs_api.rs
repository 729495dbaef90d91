#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::{json, Value};

use common::{bearer, user_with_token};
use job_board::security::Role;

fn backend_job() -> Value {
    json!({
        "title": "Backend Eng",
        "description": "Build services",
        "salary": 100000,
        "location": "Remote"
    })
}

fn applicant_profile() -> Value {
    json!({"resumeUrl": "https://x.com/r.pdf", "skills": ["Go"]})
}

#[actix_web::test]
async fn posting_applying_and_reviewing() {
    let state = common::state();
    let app = test_app!(state);
    let (employer, employer_token) = user_with_token(&state, "e@x.com", Role::Employer).await;
    let (_, rival_token) = user_with_token(&state, "f@x.com", Role::Employer).await;
    let (applicant, applicant_token) = user_with_token(&state, "a@x.com", Role::Applicant).await;

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/employers/jobs")
            .insert_header(bearer(&employer_token))
            .set_json(backend_job())
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["job"]["employer"], employer.id.to_string());
    assert_eq!(body["job"]["companyImage"], "/images/default-company.png");
    let job_id = body["job"]["id"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/applicants/profile")
            .insert_header(bearer(&applicant_token))
            .set_json(applicant_profile())
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/applications/apply/{}", job_id))
            .insert_header(bearer(&applicant_token))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["application"]["status"], "Pending");
    assert_eq!(body["application"]["applicantId"], applicant.id.to_string());
    let application_id = body["application"]["id"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/applications/apply/{}", job_id))
            .insert_header(bearer(&applicant_token))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/applications/status?jobId={}", job_id))
            .insert_header(bearer(&applicant_token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Pending");

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/employers/applications/{}/status", application_id))
            .insert_header(bearer(&rival_token))
            .set_json(json!({"status": "Accepted"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/applications/application/{}/status", application_id))
            .insert_header(bearer(&employer_token))
            .set_json(json!({"status": "Accepted", "feedback": "Welcome aboard"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"]["status"], "Accepted");
    assert_eq!(body["application"]["feedback"], "Welcome aboard");

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/applications/application/{}/status", application_id))
            .insert_header(bearer(&employer_token))
            .set_json(json!({"status": "Pending"}))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/employers/jobs/{}/applications", job_id))
            .insert_header(bearer(&employer_token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/applications/job/{}", job_id))
            .insert_header(bearer(&rival_token))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri("/applications/user")
            .insert_header(bearer(&applicant_token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "Accepted");
}

#[actix_web::test]
async fn status_updates_are_validated() {
    let state = common::state();
    let app = test_app!(state);
    let (_, employer_token) = user_with_token(&state, "e@x.com", Role::Employer).await;
    let (_, applicant_token) = user_with_token(&state, "a@x.com", Role::Applicant).await;

    let (_, job) = send!(
        app,
        TestRequest::post()
            .uri("/jobs/create")
            .insert_header(bearer(&employer_token))
            .set_json(backend_job())
    );
    let job_id = job["job"]["id"].as_str().unwrap().to_string();
    send!(
        app,
        TestRequest::post()
            .uri("/applicants/profile")
            .insert_header(bearer(&applicant_token))
            .set_json(applicant_profile())
    );
    let (_, application) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/applications/apply/{}", job_id))
            .insert_header(bearer(&applicant_token))
    );
    let uri = format!(
        "/applications/application/{}/status",
        application["application"]["id"].as_str().unwrap()
    );

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&employer_token))
            .set_json(json!({"status": "Hired"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&employer_token))
            .set_json(json!({"status": "Under Review", "feedback": "x".repeat(501)}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"].get("feedback").is_some());

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&employer_token))
            .set_json(json!({"status": "Interview Scheduled"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"]["status"], "Interview Scheduled");
}

#[actix_web::test]
async fn applying_requires_a_profile_and_an_existing_job() {
    let state = common::state();
    let app = test_app!(state);
    let (_, employer_token) = user_with_token(&state, "e@x.com", Role::Employer).await;
    let (_, applicant_token) = user_with_token(&state, "a@x.com", Role::Applicant).await;

    let (_, job) = send!(
        app,
        TestRequest::post()
            .uri("/jobs/create")
            .insert_header(bearer(&employer_token))
            .set_json(backend_job())
    );
    let job_id = job["job"]["id"].as_str().unwrap().to_string();

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/applications/apply/{}", job_id))
            .insert_header(bearer(&applicant_token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/applications/apply/{}", uuid::Uuid::new_v4()))
            .insert_header(bearer(&applicant_token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/applications/apply/{}", job_id))
            .insert_header(bearer(&employer_token))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn only_the_owner_edits_a_job() {
    let state = common::state();
    let app = test_app!(state);
    let (_, owner_token) = user_with_token(&state, "e@x.com", Role::Employer).await;
    let (_, rival_token) = user_with_token(&state, "f@x.com", Role::Employer).await;
    let (_, admin_token) = user_with_token(&state, "root@x.com", Role::Admin).await;

    let (_, job) = send!(
        app,
        TestRequest::post()
            .uri("/jobs/create")
            .insert_header(bearer(&owner_token))
            .set_json(backend_job())
    );
    let job_id = job["job"]["id"].as_str().unwrap().to_string();
    let edit_uri = format!("/jobs/{}/edit", job_id);

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&edit_uri)
            .insert_header(bearer(&rival_token))
            .set_json(json!({"title": "Hijacked"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&edit_uri)
            .insert_header(bearer(&owner_token))
            .set_json(json!({"companyImage": "https://x.com/logo.svg"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&edit_uri)
            .insert_header(bearer(&owner_token))
            .set_json(json!({"title": "Senior Backend Eng", "companyImage": "https://x.com/logo.PNG"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "Senior Backend Eng");
    assert_eq!(body["job"]["companyImage"], "https://x.com/logo.PNG");
    assert_eq!(body["job"]["salary"], 100000.0);

    let (status, _) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/jobs/{}", job_id))
            .insert_header(bearer(&rival_token))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/jobs/{}", job_id))
            .insert_header(bearer(&admin_token))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send!(app, TestRequest::get().uri(&format!("/jobs/{}", job_id)));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn job_listing_is_public_and_names_the_employer() {
    let state = common::state();
    let app = test_app!(state);

    let (status, body) = send!(app, TestRequest::get().uri("/jobs"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (employer, token) = user_with_token(&state, "e@x.com", Role::Employer).await;
    let (_, job) = send!(
        app,
        TestRequest::post()
            .uri("/jobs/create")
            .insert_header(bearer(&token))
            .set_json(backend_job())
    );
    let job_id = job["job"]["id"].as_str().unwrap().to_string();

    let (status, body) = send!(app, TestRequest::get().uri("/jobs"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["employer"]["id"], employer.id.to_string());
    assert_eq!(body[0]["employer"]["email"], "e@x.com");

    let (status, body) = send!(app, TestRequest::get().uri(&format!("/jobs/{}", job_id)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Backend Eng");
    assert_eq!(body["employer"]["email"], "e@x.com");

    let (status, _) = send!(app, TestRequest::get().uri("/jobs/not-a-uuid"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleting_an_employer_removes_profile_jobs_and_applications() {
    let state = common::state();
    let app = test_app!(state);
    let (employer, employer_token) = user_with_token(&state, "e@x.com", Role::Employer).await;
    let (_, applicant_token) = user_with_token(&state, "a@x.com", Role::Applicant).await;
    let (_, admin_token) = user_with_token(&state, "root@x.com", Role::Admin).await;

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/employers/profile")
            .insert_header(bearer(&employer_token))
            .set_json(json!({"companyName": "Wayne Tech"}))
    );
    assert_eq!(status, StatusCode::CREATED);

    let mut job_ids = Vec::new();
    for _ in 0..2 {
        let (_, job) = send!(
            app,
            TestRequest::post()
                .uri("/jobs/create")
                .insert_header(bearer(&employer_token))
                .set_json(backend_job())
        );
        job_ids.push(job["job"]["id"].as_str().unwrap().to_string());
    }

    let (_, profile) = send!(
        app,
        TestRequest::get()
            .uri("/employers/profile")
            .insert_header(bearer(&employer_token))
    );
    assert_eq!(profile["jobListings"].as_array().unwrap().len(), 2);

    send!(
        app,
        TestRequest::post()
            .uri("/applicants/profile")
            .insert_header(bearer(&applicant_token))
            .set_json(applicant_profile())
    );
    let (_, application) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/applications/apply/{}", job_ids[0]))
            .insert_header(bearer(&applicant_token))
    );
    let application_id: uuid::Uuid = application["application"]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let (status, body) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/auth/users/{}", employer.id))
            .insert_header(bearer(&admin_token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"]["jobs"], 2);

    for job_id in &job_ids {
        let (status, _) = send!(app, TestRequest::get().uri(&format!("/jobs/{}", job_id)));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    assert!(state.store.employers.find_by_user(employer.id).await.unwrap().is_none());
    assert!(state
        .store
        .applications
        .find_by_id(application_id)
        .await
        .unwrap()
        .is_none());
}

#[actix_web::test]
async fn profile_updates_resolve_their_target() {
    let state = common::state();
    let app = test_app!(state);
    let (employer, employer_token) = user_with_token(&state, "e@x.com", Role::Employer).await;
    let (_, other_token) = user_with_token(&state, "f@x.com", Role::Employer).await;
    let (_, admin_token) = user_with_token(&state, "root@x.com", Role::Admin).await;

    send!(
        app,
        TestRequest::post()
            .uri("/employers/profile")
            .insert_header(bearer(&employer_token))
            .set_json(json!({"companyName": "Wayne Tech"}))
    );
    let uri = format!("/employers/profile/{}", employer.id);

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&other_token))
            .set_json(json!({"companyName": "Stolen Inc"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&admin_token))
            .set_json(json!({"companyName": "Wayne Enterprises"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["companyName"], "Wayne Enterprises");

    let (status, _) = send!(
        app,
        TestRequest::put()
            .uri("/employers/profile")
            .insert_header(bearer(&employer_token))
            .set_json(json!({"companyName": "W"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(
        app,
        TestRequest::get().uri(&uri).insert_header(bearer(&other_token))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn deleted_employer_token_cannot_post_jobs() {
    let state = common::state();
    let app = test_app!(state);
    let (employer, token) = user_with_token(&state, "e@x.com", Role::Employer).await;

    let (status, _) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/auth/users/{}", employer.id))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);

    for uri in ["/jobs/create", "/employers/jobs"] {
        let (status, _) = send!(
            app,
            TestRequest::post()
                .uri(uri)
                .insert_header(bearer(&token))
                .set_json(backend_job())
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    let (_, body) = send!(app, TestRequest::get().uri("/jobs"));
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn deleting_a_user_after_a_role_change_removes_former_jobs() {
    let state = common::state();
    let app = test_app!(state);
    let (employer, employer_token) = user_with_token(&state, "e@x.com", Role::Employer).await;
    let (_, admin_token) = user_with_token(&state, "root@x.com", Role::Admin).await;

    send!(
        app,
        TestRequest::post()
            .uri("/employers/profile")
            .insert_header(bearer(&employer_token))
            .set_json(json!({"companyName": "Wayne Tech"}))
    );
    let (_, job) = send!(
        app,
        TestRequest::post()
            .uri("/jobs/create")
            .insert_header(bearer(&employer_token))
            .set_json(backend_job())
    );
    let job_id = job["job"]["id"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/auth/users/{}", employer.id))
            .insert_header(bearer(&admin_token))
            .set_json(json!({"userType": "applicant"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["userType"], "applicant");

    let (status, body) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/auth/users/{}", employer.id))
            .insert_header(bearer(&admin_token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"]["jobs"], 1);
    assert_eq!(body["removed"]["profiles"], 1);

    let (status, _) = send!(app, TestRequest::get().uri(&format!("/jobs/{}", job_id)));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.store.employers.find_by_user(employer.id).await.unwrap().is_none());
}

