//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{OpenAiGenerationAdapter, PdfTextExtractor},
    config::Config,
    error::ApiError,
    web::{
        build_router,
        rest::ApiDoc,
        state::{spawn_session_sweeper, AppState},
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(config.openai_api_key.as_str());
    let openai_client = Client::with_config(openai_config);

    let generation_adapter = Arc::new(OpenAiGenerationAdapter::new(
        openai_client,
        config.generation_model.clone(),
    ));
    let extractor = Arc::new(PdfTextExtractor::new());
    info!(
        "Generation backend initialized (model: {}, {} questions per interview, rated out of {})",
        config.generation_model, config.question_count, config.rating_scale
    );

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(
        generation_adapter,
        extractor,
        config.gateway_settings(),
        config.session_settings(),
    ));

    spawn_session_sweeper(app_state.clone(), config.session_ttl);
    info!(
        "Idle sessions are evicted after {}s",
        config.session_ttl.as_secs()
    );

    // --- 4. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(build_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
