//! Server construction and route wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use registration::inbound::http::health::{HealthState, live, ready};
use registration::inbound::http::request_span::RequestSpan;
use registration::inbound::http::state::HttpState;
use registration::inbound::http::users::{create_user, delete_user, list_users};
use state_builders::build_http_state;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(create_user)
        .service(list_users)
        .service(delete_user);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RequestSpan)
        .service(api)
        .service(ready)
        .service(live)
}

/// Bind the listener and return the running server.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
