//! Shared fixtures for handler tests.

use std::sync::Arc;

use crate::config::EmailSettings;
use crate::database::memory::{InMemoryObservations, InMemoryUsers};
use crate::models::{SpeciesObservation, User};
use crate::services::contact_service::tests::RecordingSender;

pub(crate) struct TestState {
    pub(crate) users: Arc<InMemoryUsers>,
    pub(crate) observations: Arc<InMemoryObservations>,
    pub(crate) mailer: Arc<RecordingSender>,
}

impl TestState {
    pub(crate) fn new(users: Vec<User>, observations: Vec<SpeciesObservation>) -> Self {
        Self {
            users: Arc::new(InMemoryUsers::with_users(users)),
            observations: Arc::new(InMemoryObservations::with_observations(observations)),
            mailer: Arc::new(RecordingSender::default()),
        }
    }
}

pub(crate) fn email_settings() -> EmailSettings {
    EmailSettings {
        api_key: None,
        api_url: "http://localhost/emails".into(),
        from: "Oceanova <noreply@oceanova.org>".into(),
        contact_to: "contact@oceanova.org".into(),
    }
}

/// Serves `body` with `status` on `path` (any method) from a real listener
/// on an ephemeral port. Returns the base URL and a handle to stop it.
pub(crate) fn stub_upstream(
    path: &'static str,
    status: u16,
    body: serde_json::Value,
) -> (String, actix_web::dev::ServerHandle) {
    use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer};

    let server = HttpServer::new(move || {
        let body = body.clone();
        App::new().route(
            path,
            web::route().to(move || {
                let body = body.clone();
                async move {
                    HttpResponse::build(StatusCode::from_u16(status).unwrap()).json(body)
                }
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{}", addr), handle)
}

/// Builds the full route table over the in-memory state.
macro_rules! test_app {
    ($state:expr) => {{
        use std::sync::Arc;
        use actix_web::{test, web, App};

        let state = &$state;
        test::init_service(
            App::new()
                .app_data(web::Data::from(state.users.clone() as Arc<dyn crate::database::UserStore>))
                .app_data(web::Data::from(
                    state.observations.clone() as Arc<dyn crate::database::ObservationStore>
                ))
                .app_data(web::Data::from(
                    state.mailer.clone() as Arc<dyn crate::services::EmailSender>
                ))
                .app_data(web::Data::new(crate::services::auth_service::tests::settings()))
                .app_data(web::Data::new(crate::api::testing::email_settings()))
                .app_data(web::Data::new(crate::services::ModelClient::new(None)))
                .configure(crate::api::configure),
        )
        .await
    }};
}
