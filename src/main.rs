use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;

use radir::config::AppConfig;
use radir::db;
use radir::handlers::api::{self, AppState};
use radir::models::agenda::{AgendaStore, MemoryAgendaStore, PgAgendaStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let store: Arc<dyn AgendaStore> = match &config.database_url {
        Some(url) => {
            let pool = db::init_pool(url, config.max_connections)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            db::run_migrations(&pool)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            Arc::new(PgAgendaStore::new(pool))
        }
        None => {
            log::warn!("No DATABASE_URL set, using the in-memory store (data lost on restart)");
            Arc::new(MemoryAgendaStore::new())
        }
    };

    if !config.export_template.exists() {
        log::warn!(
            "Export template {} not found; minutes export will fail until it exists",
            config.export_template.display()
        );
    }

    let state = web::Data::new(AppState {
        store,
        export_template: config.export_template.clone(),
    });

    log::info!("Starting server at http://{}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(web::scope("/api").configure(api::configure))
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "message": "Not found",
                }))
            }))
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await
}
