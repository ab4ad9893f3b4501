use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use warp::Filter;
use serde_json::json;
use crate::config::constants::{
    DEFAULT_SERVER_PORT_RANGE_START, DEFAULT_SERVER_PORT_RANGE_END,
    MAX_SESSION_ID_LENGTH, SERVER_SHUTDOWN_GRACE_PERIOD_MS, sleep_duration_millis,
};
use crate::errors::{MacrosplitError, MacrosplitResult};
use crate::ui::session_manager::SessionManager;

pub struct FormServer {
    session_manager: Arc<SessionManager>,
    port: Option<u16>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl FormServer {
    pub fn new(initial_budget: f64) -> Self {
        Self {
            session_manager: Arc::new(SessionManager::new(initial_budget)),
            port: None,
            shutdown_tx: None,
        }
    }

    pub async fn start(&mut self, pinned_port: Option<u16>) -> MacrosplitResult<u16> {
        let port = match pinned_port {
            Some(port) => {
                Self::probe_port(port).await?;
                port
            }
            None => self.find_available_port().await?,
        };
        self.port = Some(port);

        let session_manager = Arc::clone(&self.session_manager);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let form_manager = Arc::clone(&session_manager);
        let form_route = warp::path::end()
            .and(warp::get())
            .and(warp::any().map(move || Arc::clone(&form_manager)))
            .and_then(serve_form_page);

        let api_routes = self.create_api_routes(Arc::clone(&session_manager));

        let routes = form_route
            .or(api_routes)
            .with(warp::cors()
                .allow_origin("http://127.0.0.1")
                .allow_origin("http://localhost")
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST"]));

        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        let (_, server) = warp::serve(routes)
            .bind_with_graceful_shutdown(addr, async {
                shutdown_rx.await.ok();
            });

        tokio::spawn(server);

        log::info!("🌐 Form server started on port {}", port);
        Ok(port)
    }

    pub fn url(&self) -> Option<String> {
        self.port.map(|port| format!("http://127.0.0.1:{}/", port))
    }

    pub async fn shutdown(&mut self) -> MacrosplitResult<()> {
        log::info!("🛑 Shutting down form server...");

        self.session_manager.cleanup_expired_sessions();

        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            shutdown_tx.send(()).map_err(|_|
                MacrosplitError::system_error("shutdown", "Failed to send shutdown signal")
            )?;
        }

        tokio::time::sleep(sleep_duration_millis(SERVER_SHUTDOWN_GRACE_PERIOD_MS)).await;
        log::info!("✅ Form server shutdown complete");

        Ok(())
    }

    fn create_api_routes(
        &self,
        session_manager: Arc<SessionManager>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let session_manager_filter = warp::any().map(move || Arc::clone(&session_manager));

        let get_session = warp::path!("api" / "session" / String)
            .and(warp::get())
            .and(session_manager_filter.clone())
            .and_then(get_session_handler);

        let set_percentile = warp::path!("api" / "session" / String / "percentile")
            .and(warp::post())
            .and(warp::body::json())
            .and(session_manager_filter.clone())
            .and_then(set_percentile_handler);

        let increment = warp::path!("api" / "session" / String / "increment")
            .and(warp::post())
            .and(warp::body::json())
            .and(session_manager_filter.clone())
            .and_then(increment_handler);

        let decrement = warp::path!("api" / "session" / String / "decrement")
            .and(warp::post())
            .and(warp::body::json())
            .and(session_manager_filter.clone())
            .and_then(decrement_handler);

        let toggle_lock = warp::path!("api" / "session" / String / "lock")
            .and(warp::post())
            .and(warp::body::json())
            .and(session_manager_filter.clone())
            .and_then(toggle_lock_handler);

        let set_budget = warp::path!("api" / "session" / String / "budget")
            .and(warp::post())
            .and(warp::body::json())
            .and(session_manager_filter.clone())
            .and_then(set_budget_handler);

        let close_session = warp::path!("api" / "session" / String / "close")
            .and(warp::post())
            .and(session_manager_filter)
            .and_then(close_session_handler);

        get_session
            .or(set_percentile)
            .or(increment)
            .or(decrement)
            .or(toggle_lock)
            .or(set_budget)
            .or(close_session)
    }

    async fn find_available_port(&self) -> MacrosplitResult<u16> {
        for port in DEFAULT_SERVER_PORT_RANGE_START..DEFAULT_SERVER_PORT_RANGE_END {
            if Self::probe_port(port).await.is_ok() {
                return Ok(port);
            }
        }
        Err(MacrosplitError::system_error(
            "port probe",
            "No available ports found in the default range",
        ))
    }

    async fn probe_port(port: u16) -> MacrosplitResult<()> {
        match tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await {
            Ok(listener) => {
                drop(listener);
                Ok(())
            }
            Err(e) => Err(MacrosplitError::system_error(
                "port probe",
                &format!("Port {} is not available: {}", port, e),
            )),
        }
    }
}

async fn serve_form_page(session_manager: Arc<SessionManager>) -> Result<impl warp::Reply, Infallible> {
    let state = session_manager.create_session();

    let html = include_str!("static/index.html")
        .replace("{{SESSION_ID}}", &state.session_id);

    Ok(warp::reply::html(html))
}

fn sanitize_session_id(session_id: &str) -> String {
    session_id.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(MAX_SESSION_ID_LENGTH)
        .collect()
}

fn state_or_error(result: MacrosplitResult<impl serde::Serialize>) -> warp::reply::Json {
    match result {
        Ok(state) => warp::reply::json(&state),
        Err(e) => warp::reply::json(&json!({ "error": e.user_message() })),
    }
}

fn category_from_body(body: &serde_json::Value) -> Option<String> {
    body.get("category")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

async fn get_session_handler(session_id: String, session_manager: Arc<SessionManager>) -> Result<impl warp::Reply, Infallible> {
    let sanitized_session_id = sanitize_session_id(&session_id);
    if sanitized_session_id.is_empty() {
        return Ok(warp::reply::json(&json!({
            "error": "Invalid session ID"
        })));
    }

    Ok(state_or_error(session_manager.get_session_state(&sanitized_session_id)))
}

async fn set_percentile_handler(
    session_id: String,
    body: serde_json::Value,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, Infallible> {
    let sanitized_session_id = sanitize_session_id(&session_id);
    if sanitized_session_id.is_empty() {
        return Ok(warp::reply::json(&json!({
            "error": "Invalid session ID"
        })));
    }

    let category = match category_from_body(&body) {
        Some(category) => category,
        None => {
            return Ok(warp::reply::json(&json!({
                "error": "Missing category"
            })));
        }
    };

    let value = match body.get("value").and_then(|v| v.as_f64()) {
        Some(value) => value,
        None => {
            return Ok(warp::reply::json(&json!({
                "error": "Missing or non-numeric value"
            })));
        }
    };

    Ok(state_or_error(session_manager.set_percentile(&sanitized_session_id, &category, value)))
}

async fn increment_handler(
    session_id: String,
    body: serde_json::Value,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, Infallible> {
    let sanitized_session_id = sanitize_session_id(&session_id);
    if sanitized_session_id.is_empty() {
        return Ok(warp::reply::json(&json!({
            "error": "Invalid session ID"
        })));
    }

    match category_from_body(&body) {
        Some(category) => Ok(state_or_error(session_manager.increment(&sanitized_session_id, &category))),
        None => Ok(warp::reply::json(&json!({
            "error": "Missing category"
        }))),
    }
}

async fn decrement_handler(
    session_id: String,
    body: serde_json::Value,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, Infallible> {
    let sanitized_session_id = sanitize_session_id(&session_id);
    if sanitized_session_id.is_empty() {
        return Ok(warp::reply::json(&json!({
            "error": "Invalid session ID"
        })));
    }

    match category_from_body(&body) {
        Some(category) => Ok(state_or_error(session_manager.decrement(&sanitized_session_id, &category))),
        None => Ok(warp::reply::json(&json!({
            "error": "Missing category"
        }))),
    }
}

async fn toggle_lock_handler(
    session_id: String,
    body: serde_json::Value,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, Infallible> {
    let sanitized_session_id = sanitize_session_id(&session_id);
    if sanitized_session_id.is_empty() {
        return Ok(warp::reply::json(&json!({
            "error": "Invalid session ID"
        })));
    }

    match category_from_body(&body) {
        Some(category) => Ok(state_or_error(session_manager.toggle_lock(&sanitized_session_id, &category))),
        None => Ok(warp::reply::json(&json!({
            "error": "Missing category"
        }))),
    }
}

async fn set_budget_handler(
    session_id: String,
    body: serde_json::Value,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, Infallible> {
    let sanitized_session_id = sanitize_session_id(&session_id);
    if sanitized_session_id.is_empty() {
        return Ok(warp::reply::json(&json!({
            "error": "Invalid session ID"
        })));
    }

    match body.get("budget").and_then(|v| v.as_f64()) {
        Some(budget) => Ok(state_or_error(session_manager.set_budget(&sanitized_session_id, budget))),
        None => Ok(warp::reply::json(&json!({
            "error": "Missing or non-numeric budget"
        }))),
    }
}

async fn close_session_handler(
    session_id: String,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, Infallible> {
    let sanitized_session_id = sanitize_session_id(&session_id);
    if sanitized_session_id.is_empty() {
        return Ok(warp::reply::json(&json!({
            "error": "Invalid session ID"
        })));
    }

    match session_manager.close_session(&sanitized_session_id) {
        Ok(_) => Ok(warp::reply::json(&json!({
            "success": true,
            "message": "Session closed"
        }))),
        Err(e) => Ok(warp::reply::json(&json!({
            "error": e.user_message()
        }))),
    }
}
