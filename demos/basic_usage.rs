//! Basic usage example for errtrack-actix
//!
//! Reports go to the log through `TracingReporter`; swap in a reporter that
//! wraps your tracker's client for production.
//!
//! Run with:
//! ```bash
//! cargo run --example basic_usage
//! ```

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use errtrack_actix::{Config, ErrorRecovery, RecordErrorExt, TracingReporter};

async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Hello!")
}

async fn degraded(req: HttpRequest) -> HttpResponse {
    req.record_error_with_meta(
        std::io::Error::other("recommendations backend timed out"),
        serde_json::json!({ "backend": "recs", "timeout_ms": 250 }),
    );
    HttpResponse::Ok().body("served without recommendations")
}

async fn crash() -> HttpResponse {
    panic!("this handler always panics")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    println!("Starting example server on http://0.0.0.0:8080");
    println!("\nTry these endpoints:");
    println!("  GET  http://localhost:8080/");
    println!("  GET  http://localhost:8080/degraded   (error-level report, 200)");
    println!("  GET  http://localhost:8080/crash      (critical report, 500)");

    HttpServer::new(|| {
        App::new()
            .wrap(ErrorRecovery::with_config(
                TracingReporter,
                Config::new(false, true, "x-request-id"),
            ))
            .service(web::resource("/").route(web::get().to(index)))
            .service(web::resource("/degraded").route(web::get().to(degraded)))
            .service(web::resource("/crash").route(web::get().to(crash)))
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}
