use actix_cors::Cors;
use actix_governor::Governor;
use actix_web::{middleware::Logger, web, App, HttpServer};

use notekeeper::{config::Settings, db, routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let settings = Settings::from_env().expect("env DATABASE_URL and SECRET_KEY");

    let pool = db::build_pool(&settings.database_url, settings.pool_size)
        .expect("failed to create a sqlite pool");
    db::run_migrations(&pool).expect("failed to run migrations");

    let state = web::Data::new(AppState::new(
        settings.secret_key.clone(),
        settings.session_lifetime,
    ));
    let pool = web::Data::new(pool);
    let governor_conf = settings
        .rate_limit()
        .expect("RATE_LIMIT_REPLENISH_SECS and RATE_LIMIT_BURST must be positive");

    log::info!("notekeeper listening on port {}", settings.port);
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Governor::new(&governor_conf))
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", settings.port))?
    .run()
    .await
}
