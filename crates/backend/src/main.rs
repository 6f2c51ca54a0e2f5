#![allow(
    clippy::type_complexity,
    clippy::too_many_arguments,
    clippy::derivable_impls
)]

pub mod dashboards;
pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    use crate::domain::a001_lead::LoadOutcome;
    use crate::shared::data::context;

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    context::initialize(&config)?;

    // First load; the board starts empty if the gateway is down
    match context::get().store.load().await {
        Ok(LoadOutcome::Applied {
            leads, contacts, ..
        }) => tracing::info!("Pipeline loaded: {} leads, {} contacts", leads, contacts),
        Ok(LoadOutcome::Superseded { .. }) => {}
        Err(e) => tracing::error!("Initial pipeline load failed: {}", e),
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = routes::configure_routes()
        .layer(cors)
        .layer(middleware::from_fn(system::middleware::request_logger));

    let addr = config.server.socket_addr()?;
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("BrandStreet CRM backend listening on http://{}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!("Port {} is already in use", addr.port());
            } else {
                tracing::error!("Failed to bind {}: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;
    Ok(())
}
