use actix_web::{middleware, rt, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use std::io;
use std::time::Duration;

use hotel_booking::catalog::{seed, SqliteCatalog};
use hotel_booking::config::{Config, StorageBackend};
use hotel_booking::state::AppState;
use hotel_booking::{db, handlers};

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

async fn build_state(config: &Config) -> io::Result<AppState> {
    match (config.backend, config.database_url.as_deref()) {
        (StorageBackend::Sqlite, Some(database_url)) => {
            log::info!("Connecting to database...");
            let pool = db::get_db_pool(database_url, config.max_connections)
                .await
                .map_err(startup_error)?;

            log::info!("Running migrations...");
            db::run_migrations(&pool).await.map_err(startup_error)?;

            if SqliteCatalog::new(pool.clone())
                .seed_if_empty(&seed::demo_hotels())
                .await
                .map_err(startup_error)?
            {
                log::info!("Seeded empty catalog with demo hotels");
            }
            Ok(AppState::sqlite(pool))
        }
        (StorageBackend::Sqlite, None) => Err(startup_error("DATABASE_URL must be set")),
        (StorageBackend::Memory, _) => {
            log::info!("Using in-memory demo catalog and booking store");
            Ok(AppState::in_memory())
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logger and environment
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let state = web::Data::new(
        build_state(&config)
            .await?
            .with_wizard_idle_timeout(config.wizard_idle_timeout),
    );

    // Inserts already sweep, this covers a quiet server.
    let sweeper = state.clone();
    rt::spawn(async move {
        let period = sweeper.wizards.idle_timeout().max(Duration::from_secs(1));
        let mut tick = rt::time::interval(period);
        loop {
            tick.tick().await;
            sweeper.wizards.evict_idle().await;
        }
    });

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
