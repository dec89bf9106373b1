use std::env;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use dotenvy::dotenv;

use slabyard::{
    config::Config,
    database::create_database_pool,
    handlers::{self, AppState},
    utils,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // `slabyard token <user id> <company id>` prints a development token
    let args: Vec<String> = env::args().collect();
    if args.get(1).map(String::as_str) == Some("token") {
        let user_id = args.get(2).ok_or("usage: slabyard token <user id> <company id>")?.parse()?;
        let company_id = args.get(3).ok_or("usage: slabyard token <user id> <company id>")?.parse()?;
        let secret = Config::jwt_secret_from_env()?;
        println!("{}", utils::auth::create_token(user_id, company_id, &secret)?);
        return Ok(());
    }

    let config = Config::from_env()?;
    let db = create_database_pool(&config).await?;
    let addr = config.bind_address();
    let app = create_router(AppState::new(db, config));

    log::info!("Slabyard server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))

        // Contract lifecycle
        .route("/api/contracts", post(handlers::contracts::create_contract))
        .route(
            "/api/contracts/:id",
            get(handlers::contracts::get_contract).put(handlers::contracts::update_contract),
        )
        .route("/api/contracts/:id/cancel", post(handlers::contracts::cancel_contract))
        .route("/api/contracts/:id/status", post(handlers::contracts::update_status))

        // Printable summary
        .route("/contracts/:id", get(handlers::contracts::contract_page))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
