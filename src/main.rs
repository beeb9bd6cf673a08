use actix_cors::Cors;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use lock_in_api::data::mysql::{MySqlGoalRepository, MySqlUserRepository};
use lock_in_api::infrastructure::config::Config;
use lock_in_api::infrastructure::database::{connect_pool, run_migrations};
use lock_in_api::infrastructure::logging::init_logging;
use lock_in_api::infrastructure::security::CredentialHasher;
use lock_in_api::presentation::configure;
use lock_in_api::presentation::handlers::{AppState, SERVICE_NAME};
use lock_in_api::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use std::io;
use std::sync::Arc;
use tracing::{error, info};

fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods([Method::GET, Method::POST, Method::DELETE])
        .allowed_headers([header::CONTENT_TYPE])
        .max_age(3600)
}

#[tokio::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = connect_pool(&config.database);
    if config.database.run_migrations {
        run_migrations(&pool).await.map_err(|e| {
            error!(error = %e, "Failed to apply migrations");
            io::Error::other(e)
        })?;
    }

    let hasher = CredentialHasher::new(config.hash_cost).map_err(|e| {
        error!(error = %e, "Invalid password hashing parameters");
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let state = web::Data::new(AppState::new(
        Arc::new(MySqlUserRepository::new(pool.clone())),
        Arc::new(MySqlGoalRepository::new(pool)),
        hasher,
    ));
    info!("Application state initialized");

    let allowed_origins = config.server.cors_allowed_origins.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&allowed_origins))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        routes = %"GET /, GET /users, POST /add_user, GET /goals, POST /goals, DELETE /goals/{id}",
        "{} listening on http://localhost:{}",
        SERVICE_NAME,
        config.server.port
    );
    server.run().await
}
