use actix_web::{web, HttpResponse, ResponseError};

use crate::config::EmailSettings;
use crate::services::contact_service::{self, ContactRequest, ContactResponse};
use crate::services::EmailSender;

#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "Contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message delivered", body = ContactResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Email delivery failed")
    )
)]
pub async fn submit_contact(
    sender: web::Data<dyn EmailSender>,
    email_settings: web::Data<EmailSettings>,
    request: web::Json<ContactRequest>,
) -> HttpResponse {
    log::info!("✉️  POST /api/contact");

    match contact_service::submit(sender.get_ref(), &email_settings.contact_to, &request).await {
        Ok(response) => {
            log::info!("✅ Contact message forwarded to {}", email_settings.contact_to);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Contact form rejected: {}", e);
            e.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    use crate::api::testing::TestState;

    fn form() -> serde_json::Value {
        json!({
            "firstName": "Jacques",
            "lastName": "Cousteau",
            "email": "jacques@calypso.fr",
            "institution": "Calypso",
            "message": "We'd like access to the reef survey."
        })
    }

    #[actix_web::test]
    async fn valid_form_is_sent() {
        let state = TestState::new(vec![], vec![]);
        let app = test_app!(state);

        let req = test::TestRequest::post().uri("/api/contact").set_json(form()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Message sent successfully");

        let sent = state.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "contact@oceanova.org");
        assert_eq!(sent[0].reply_to.as_deref(), Some("jacques@calypso.fr"));
        assert!(sent[0].text.contains("Institution: Calypso"));
    }

    #[actix_web::test]
    async fn missing_email_is_rejected() {
        let state = TestState::new(vec![], vec![]);
        let app = test_app!(state);

        let mut body = form();
        body.as_object_mut().unwrap().remove("email");

        let req = test::TestRequest::post().uri("/api/contact").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing required fields: email");
        assert!(state.mailer.sent.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn institution_is_optional() {
        let state = TestState::new(vec![], vec![]);
        let app = test_app!(state);

        let mut body = form();
        body.as_object_mut().unwrap().remove("institution");

        let req = test::TestRequest::post().uri("/api/contact").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn delivery_failure_is_500() {
        use crate::services::contact_service::tests::FailingSender;
        use crate::services::EmailSender;
        use actix_web::{web, App};
        use std::sync::Arc;

        let sender: Arc<dyn EmailSender> = Arc::new(FailingSender);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(sender))
                .app_data(web::Data::new(crate::api::testing::email_settings()))
                .route("/api/contact", web::post().to(super::submit_contact)),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/contact").set_json(form()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to send message");
    }
}
