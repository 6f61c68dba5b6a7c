use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Result;

use datajpa::database::init_database;
use datajpa::handlers::health;
use datajpa::middleware::RequestId;
use datajpa::Config;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("Starting datajpa server...");

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );

    let pool = init_database(&config.database_url, config.database_max_connections).await?;
    log::info!("Database initialized");

    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .configure(health::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    pool.close().await;
    Ok(())
}
