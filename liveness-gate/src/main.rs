use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use liveness_gate::config::{env_debug_enabled, load_dotenv_best_effort, Settings};
use liveness_gate::{handlers, sweep, AppState};
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let dotenv_path = load_dotenv_best_effort();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if env_debug_enabled() {
        if let Some(p) = dotenv_path {
            eprintln!("[liveness-gate] loaded .env from: {}", p.display());
        }
    }

    let settings = Settings::from_env().map_err(std::io::Error::other)?;
    let bind = settings.bind.clone();
    let cors_origin = settings.cors_origin.clone();
    let db_path = settings.db_path.clone();

    let state = Arc::new(AppState::bootstrap(settings)?);
    sweep::spawn(state.clone());

    info!("liveness-gate online at http://{bind} (db={db_path})");

    let data = web::Data::from(state);

    HttpServer::new(move || {
        let cors = if cors_origin == "*" {
            Cors::permissive()
        } else {
            Cors::default()
                .allowed_origin(&cors_origin)
                .allow_any_method()
                .allow_any_header()
        };

        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .service(web::resource("/health").route(web::get().to(handlers::health)))
            .service(web::resource("/api/challenge").route(web::post().to(handlers::challenge)))
            .service(web::resource("/api/verify").route(web::post().to(handlers::verify)))
            .service(web::resource("/api/protected").route(web::get().to(handlers::protected)))
            .service(web::resource("/api/attack-sim").route(web::post().to(handlers::attack_sim)))
    })
    .bind(bind)?
    .run()
    .await
}
