pub mod auth;
pub mod components;
pub mod csrf_protection;
pub mod error;
pub mod export;
pub mod form;
pub mod listing;
pub mod routes;
pub mod session;
pub mod validation;

use core::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{pin_mut, Future};
use headers::{Header, HeaderMapExt as _};
use http::{Request, Response};
use http_body::Body;
use http_body_util::{BodyExt as _, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use jarmark_config::{Config, StorageKind};
use jarmark_database::{memory_repository, open_json_repository, Repository};
use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::auth::{AuthProvider, StaticCredentials};
use crate::error::AppError;
use crate::routes::admin::export as export_route;
use crate::routes::admin::{dashboard, delete, detail, guarded, login, logout, password};
use crate::routes::{assets, index, submit, validate, HttpResponse};
use crate::session::Session;

pub trait ResponseTypedHeaderExt {
    #[must_use]
    fn typed_header<H: Header>(self, header: H) -> Self;
}

impl ResponseTypedHeaderExt for http::response::Builder {
    fn typed_header<H: Header>(mut self, header: H) -> Self {
        if let Some(headers) = self.headers_mut() {
            headers.typed_insert(header);
        }
        self
    }
}

/// Everything a request handler can reach.
pub struct AppState {
    pub config: Config,
    pub repository: Repository,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, repository: Repository) -> Self {
        let auth = Arc::new(StaticCredentials::new(&config.admin));
        Self {
            config,
            repository,
            auth,
        }
    }

    #[must_use]
    pub fn is_admin(&self, session: &Session) -> bool {
        session
            .admin_session()
            .is_some_and(|token| self.auth.is_authenticated(token))
    }
}

pub fn setup_state(config: Config) -> Result<AppState, AppError> {
    let repository = match config.storage {
        StorageKind::Json => open_json_repository(&config.data_dir)?,
        StorageKind::Memory => {
            warn!("submissions are kept in memory only");
            memory_repository()
        }
    };
    Ok(AppState::new(config, repository))
}

async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, AppError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Ok(Limited::new(body, limit)
        .collect()
        .await
        .map_err(|err| {
            if err.is::<LengthLimitError>() {
                AppError::PayloadTooLarge
            } else {
                AppError::Body(err)
            }
        })?
        .to_bytes())
}

fn route(
    state: &AppState,
    session: &mut Session,
    method: &str,
    path: &str,
    query: Option<&str>,
    headers: &http::HeaderMap,
    body: &[u8],
) -> Result<HttpResponse, AppError> {
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    match (method, segments.as_slice()) {
        ("GET", []) => index::index(state, session),
        ("POST", []) => submit::submit(state, session, body),
        ("POST", ["api", "validate"]) => validate::validate(body),
        ("GET", ["index.css"]) => assets::indexcss(headers),
        ("GET", ["form.js"]) => assets::formjs(headers),
        ("GET", ["admin"]) => dashboard::dashboard(state, session, query),
        ("POST", ["admin", "login"]) => login::login(state, session, body),
        ("POST", ["admin", "logout"]) => logout::logout(state, session, body),
        ("GET", ["admin", "password"]) => {
            guarded(state, session, |_, session| password::password_page(session))
        }
        ("POST", ["admin", "password"]) => guarded(state, session, |state, session| {
            password::change_password(state, session, body)
        }),
        ("GET", ["admin", "export", format]) => guarded(state, session, |state, session| {
            export_route::export(state, session, format, query)
        }),
        ("GET", ["admin", "submissions", id]) => {
            guarded(state, session, |state, session| detail::detail(state, session, id))
        }
        ("POST", ["admin", "submissions", id, "delete"]) => {
            guarded(state, session, |state, session| {
                delete::delete(state, session, id, body)
            })
        }
        (
            _,
            []
            | ["api", "validate"]
            | ["index.css" | "form.js" | "admin"]
            | ["admin", "login" | "logout" | "password"]
            | ["admin", "export", _]
            | ["admin", "submissions", _]
            | ["admin", "submissions", _, "delete"],
        ) => Err(AppError::MethodNotAllowed),
        _ => Err(AppError::NotFound),
    }
}

/// Serves one request. Every failure is turned into an error page, so this
/// never fails.
pub async fn handle<B>(state: Arc<AppState>, request: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = request.into_parts();
    let mut session = Session::new(&parts.headers);
    let result = match read_body(body, state.config.max_body_bytes).await {
        Ok(body) => route(
            &state,
            &mut session,
            parts.method.as_str(),
            parts.uri.path(),
            parts.uri.query(),
            &parts.headers,
            &body,
        ),
        Err(err) => Err(err),
    };
    let response = result.unwrap_or_else(|err| err.build_error_template(&session));
    debug!(
        "{} {} -> {}",
        parts.method,
        parts.uri.path(),
        response.status()
    );
    response
}

pub async fn run_server(
    config: Config,
) -> Result<impl Future<Output = Result<(), AppError>>, AppError> {
    info!("starting up server...");

    let listener = TcpListener::bind(config.listen).await?;
    let state = Arc::new(setup_state(config)?);

    // tell the connections to shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let shutdown_tx = Arc::new(shutdown_tx);

    // wait for the connections to finish shutdown
    let (closed_tx, closed_rx) = watch::channel(());

    info!("listening on {}", listener.local_addr()?);

    Ok(async move {
        #[allow(clippy::redundant_pub_crate)]
        loop {
            select! {
                accept = listener.accept() => {
                    let (socket, remote_addr) = match accept {
                        Ok(accepted) => accepted,
                        Err(err) => {
                            error!("failed to accept connection: {err}");
                            continue;
                        }
                    };
                    debug!("accepted connection from {remote_addr}");

                    let state = Arc::clone(&state);
                    let shutdown_tx = Arc::clone(&shutdown_tx);
                    let closed_rx = closed_rx.clone();

                    tokio::spawn(async move {
                        let socket = TokioIo::new(socket);

                        let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                            let state = Arc::clone(&state);
                            async move { Ok::<_, Infallible>(handle(state, request).await) }
                        });

                        let builder = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new());
                        let connection = builder.serve_connection_with_upgrades(socket, hyper_service);
                        pin_mut!(connection);

                        select! {
                            connection_result = connection.as_mut() => {
                                if let Err(err) = connection_result {
                                    error!("failed to serve connection: {err:#}");
                                }
                            }
                            () = shutdown_tx.closed() => {
                                connection.as_mut().graceful_shutdown();
                                if let Err(err) = connection.as_mut().await {
                                    error!("failed to finish connection: {err:#}");
                                }
                            }
                        }

                        drop(closed_rx);
                    });
                }
                () = shutdown_signal() => {
                    warn!("shutting down");
                    drop(shutdown_rx); // initiate shutdown
                    drop(closed_rx);
                    drop(listener);
                    closed_tx.closed().await;
                    break;
                }
            }
        }

        info!("server stopped");
        Ok(())
    })
}

#[allow(clippy::redundant_pub_crate)]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {err}");
            core::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to install signal handler: {err}");
                core::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = core::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
