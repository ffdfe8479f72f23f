use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use bagpack_backend::config::Config;
use bagpack_backend::default;
use bagpack_backend::middleware::error_handler::handle_error;
use bagpack_backend::middleware::not_found::not_found;
use bagpack_backend::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::load();

    let state = AppState::from_config(&config).await.map_err(|e| {
        error!("Failed to initialize {} store: {e}", config.store_backend);
        std::io::Error::other(e)
    })?;

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(Logger::new("%a %{User-Agent}i"))
            .configure(|cfg| state.configure(cfg))
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::NOT_FOUND, not_found)
                    .default_handler(handle_error),
            )
            .service(default)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
