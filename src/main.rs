use actix_web::{web, App, HttpServer};
use bugnest::config::EnvConfig;
use bugnest::db::database_service::DatabaseService;
use bugnest::routes::configure_routes;
use bugnest::utils::gateway::{PaymentGateway, RazorpayGateway};
use bugnest::utils::media::MediaStore;
use std::io;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EnvConfig::from_env().map_err(io::Error::other)?;
    let addr = format!("0.0.0.0:{}", config.port);

    let database_service = Arc::new(
        DatabaseService::new(&config.db_url)
            .await
            .map_err(io::Error::other)?,
    );

    match database_service.purge_expired_sessions().await {
        Ok(n) => info!(purged = n, "expired sessions removed"),
        Err(e) => warn!(error = %e, "could not purge expired sessions"),
    }

    let media = MediaStore::new(&config.media_root, config.max_upload_bytes)
        .await
        .map_err(io::Error::other)?;
    let gateway: Arc<dyn PaymentGateway> =
        Arc::new(RazorpayGateway::new(&config.payment).map_err(io::Error::other)?);

    info!("Starting server on {}", addr);

    let config = web::Data::new(config);
    let media = web::Data::new(media);
    let gateway = web::Data::new(gateway);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(Arc::clone(&database_service)))
            .app_data(config.clone())
            .app_data(media.clone())
            .app_data(gateway.clone())
            .configure(configure_routes)
    })
    .bind(addr)?
    .run()
    .await
}
