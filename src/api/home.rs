use actix_web::{get, http::header::ContentType, web, HttpResponse, Responder};

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Job Board API</title>
  </head>
  <body>
    <h1>Job Board API</h1>
    <p>Employers post jobs, applicants apply.</p>
    <p><a href="/auth/github">Sign in with GitHub</a></p>
  </body>
</html>
"#;

#[get("/")]
async fn home() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(HOME_PAGE)
}

pub fn home_config(config: &mut web::ServiceConfig) {
    config.service(home);
}
