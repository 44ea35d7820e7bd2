use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use color_eyre::eyre::Context;
use hyper::Method;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    utils::state::AppState,
    web::{
        auth::{auth, require_admin},
        handlers::{
            add_notice, admin_login, delete_notice, get_notices, list_update_requests,
            noticer_login, register, send_update_request, submit_update,
        },
    },
};

async fn welcome() -> impl IntoResponse {
    "Research Office Portal"
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

pub struct HttpServer {
    listener: TcpListener,
    router: Router,
}

impl HttpServer {
    pub async fn new(config: &Config, state: AppState) -> color_eyre::Result<Self> {
        let router = app_router(state, config.uploads.max_body_bytes);

        let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
            .await
            .wrap_err_with(|| format!("Failed to bind to port {}", config.server.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> color_eyre::Result<()> {
        tracing::info!("listening on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router)
            .await
            .wrap_err("Failed to start HTTP server")?;
        Ok(())
    }
}

pub fn app_router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let api = Router::new()
        .nest("/admin", admin_routes(state.clone()))
        .nest("/update-request", update_request_routes(state.clone()))
        .nest("/notice", notice_routes(state.clone()));

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(cors)
        .with_state(state)
}

fn admin_routes(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .route("/register", post(register))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, auth));

    Router::new()
        .route("/login", post(admin_login))
        .route("/noticer/login", post(noticer_login))
        .merge(protected_routes)
}

fn update_request_routes(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .route("/send", post(send_update_request))
        .route("/list", get(list_update_requests))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, auth));

    // submissions authenticate with the update token carried in the form body
    Router::new()
        .route("/submit", post(submit_update))
        .merge(protected_routes)
}

fn notice_routes(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .route("/add", post(add_notice))
        .route("/{id}", delete(delete_notice))
        .route_layer(from_fn_with_state(state, auth));

    Router::new()
        .route("/get-notice", get(get_notices))
        .merge(protected_routes)
}
