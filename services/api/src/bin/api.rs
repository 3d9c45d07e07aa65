//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbStorage, OpenAiHumanizer, SimulatedHumanizer},
    config::{Config, HumanizerBackend},
    error::ApiError,
    web::{
        convert_handler, download_handler, humanize_handler, list_conversions_handler,
        list_humanized_handler, preview_handler, rest::ApiDoc, upload_handler, AppState,
    },
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use text_forge_core::ports::{HumanizerService, StorageService};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db = Arc::new(DbStorage::new(db_pool.clone()));
    info!("Running database migrations...");
    db.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Prepare the Working Directories ---
    tokio::fs::create_dir_all(&config.uploads_dir).await?;
    tokio::fs::create_dir_all(config.converted_dir()).await?;

    // --- 4. Bootstrap the Guest Account ---
    // Every stored record belongs to this account; its password is hashed
    // before it ever touches the database.
    let salt = SaltString::generate(&mut OsRng);
    let hashed_password = Argon2::default()
        .hash_password(config.guest_password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash guest password: {}", e)))?
        .to_string();
    let guest = db
        .get_or_create_user(&config.guest_username, &hashed_password)
        .await?;
    info!("Guest account '{}' ready (id {})", guest.username, guest.id);

    // --- 5. Initialize the Humanizer Adapter ---
    let humanizer: Arc<dyn HumanizerService> = match config.humanizer_backend {
        HumanizerBackend::Simulated => Arc::new(SimulatedHumanizer::new()),
        HumanizerBackend::OpenAi => {
            let api_key = config.openai_api_key.as_ref().ok_or_else(|| {
                ApiError::Internal(
                    "OPENAI_API_KEY is required when HUMANIZER_BACKEND=openai".to_string(),
                )
            })?;
            let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            Arc::new(OpenAiHumanizer::new(client, config.humanizer_model.clone()))
        }
    };

    // --- 6. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db,
        humanizer,
        config: config.clone(),
        guest_user_id: guest.id,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 7. Create the Web Router ---
    let api_router = Router::new()
        .route("/api/humanize", post(humanize_handler))
        .route("/api/files/upload", post(upload_handler))
        .route("/api/files/convert", post(convert_handler))
        .route("/api/files/download/{file_id}", get(download_handler))
        .route("/api/files/preview/{file_id}", get(preview_handler))
        .route("/api/history/humanized", get(list_humanized_handler))
        .route("/api/history/conversions", get(list_conversions_handler))
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 8. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
