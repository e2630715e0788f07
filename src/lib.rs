//! Find meals for your ingredients.
//!
//! A server-rendered front end for TheMealDB. The page lives in memory as a
//! [`dom::Document`] shared by every request; three handlers drive it:
//!
//! - [`search::SearchTrigger`] reads the search box and fills the results list
//! - [`selector::RecipeSelector`] turns a click on a card's "Get Recipe" link
//!   into a lookup
//! - [`presenter::RecipePresenter`] renders the looked-up recipe into the
//!   overlay and shows or hides it
//!
//! A JSON proxy of the two remote endpoints is served under `/api`, with
//! Swagger UI at `/swagger-ui`.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tokio::{net, signal, sync::RwLock};
use tower_http::{services, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub mod api;
pub mod config;
pub mod dom;
pub mod error;
pub mod meal;
pub mod presenter;
pub mod search;
pub mod selector;
pub mod source;
pub mod templates;
pub mod web;

use config::Config;
use dom::Document;
use presenter::RecipePresenter;
use search::SearchTrigger;
use selector::RecipeSelector;
use source::{MealDbClient, MealSource};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub document: RwLock<Document>,
    pub source: Arc<dyn MealSource>,
    pub search: SearchTrigger,
    pub selector: RecipeSelector,
    pub presenter: RecipePresenter,
}

impl AppState {
    pub fn new(source: Arc<dyn MealSource>) -> Self {
        Self {
            document: RwLock::new(Document::new()),
            search: SearchTrigger::new(source.clone()),
            selector: RecipeSelector::new(source.clone()),
            presenter: RecipePresenter,
            source,
        }
    }
}

pub fn build_router(state: SharedState, assets: &Path) -> Router {
    // https://carlosmv.hashnode.dev/adding-logging-and-tracing-to-an-axum-app-rust
    let trace_layer = trace::TraceLayer::new_for_http()
        .make_span_with(trace::DefaultMakeSpan::new().level(tracing::Level::INFO))
        .on_response(trace::DefaultOnResponse::new().level(tracing::Level::INFO));

    let (api_router, openapi) = OpenApiRouter::with_openapi(api::ApiDoc::openapi())
        .merge(api::router())
        .split_for_parts();

    Router::new()
        .merge(web::router())
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        // Serve static CSS file (must match file path & MIME)
        .route_service(
            "/meal.css",
            services::ServeFile::new_with_mime(assets.join("meal.css"), &mime::TEXT_CSS_UTF_8),
        )
        .layer(trace_layer)
        .with_state(state)
}

/// Main server setup
pub async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging with environment-based filtering.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meal_finder=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = MealDbClient::new(&config.api_base, config.timeout())?;
    let state = Arc::new(AppState::new(Arc::new(client)));
    let app = build_router(state, &config.assets);

    let listener = net::TcpListener::bind(config.addr).await?;
    tracing::info!("listening on http://{}", config.addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received terminate signal, shutting down"),
    }
}
