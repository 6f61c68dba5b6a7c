use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::{config::Config, middleware::RequestIdExt};

pub const HEALTH_MESSAGE: &str = "It's working";

#[get("/")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(HEALTH_MESSAGE)
}

/// Reports the configured datasource. No connection is attempted.
#[get("/db")]
pub async fn db_check(req: HttpRequest, config: web::Data<Config>) -> impl Responder {
    log::info!(
        "Datasource info requested (correlation_id={})",
        req.correlation_id().unwrap_or_default()
    );

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(datasource_description(&config))
}

pub fn datasource_description(config: &Config) -> String {
    format!(
        "DBtype = {}\nurl = {}",
        config.database_driver,
        config.masked_database_url()
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(db_check);
}
