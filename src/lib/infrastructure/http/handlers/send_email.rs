//! Send contact request email handler

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::contact::{ContactService, Submission},
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Send email response body
#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailResponse {
    success: bool,
}

/// Relay a contact-form submission by email
///
/// JSON and URL-encoded bodies are read for optional `name`, `phone` and
/// `message` fields; anything else is treated as an empty form.
pub async fn handler<C: ContactService>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let submission = Submission::from_body(content_type, &body);

    state.contacts.submit(&submission).await?;

    Ok(Json(SendEmailResponse { success: true }))
}

/// Answer a CORS preflight request
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Reject every method other than `POST` and `OPTIONS`
pub async fn method_not_allowed() -> ApiError {
    ApiError::new_405("Only POST allowed")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::http::{HeaderValue, Method, StatusCode};
    use axum_test::{TestResponse, TestServer};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::{
            communication::{
                mailer::{tests::MockMailer, MailerError, Receipt},
                smtp::ConfigurationError,
            },
            contact::{
                tests::MockContactService, ContactError, ContactService, ContactServiceImpl,
                Submission,
            },
        },
        infrastructure::{
            email::smtp::{tests::complete_settings, SmtpSettings},
            http::{
                errors::ErrorResponse,
                handlers::send_email::SendEmailResponse,
                router,
                state::{tests::test_state, AppState},
            },
        },
    };

    const PATH: &str = "/api/send-email";

    fn any_origin() -> HeaderValue {
        HeaderValue::from_static("*")
    }

    fn receipt() -> Receipt {
        Receipt {
            message_id: Some("<id@example.com>".to_string()),
            response: "250 Ok".to_string(),
        }
    }

    fn assert_cors_headers(response: &TestResponse, origin: &str) {
        assert_eq!(response.header("access-control-allow-origin"), origin);
        assert_eq!(
            response.header("access-control-allow-methods"),
            "POST, OPTIONS"
        );
        assert_eq!(response.header("access-control-allow-headers"), "Content-Type");
        assert_eq!(response.header("vary"), "Origin");
    }

    #[tokio::test]
    async fn test_send_email_success() -> TestResult {
        let mut contacts = MockContactService::new();

        contacts
            .expect_submit()
            .times(1)
            .withf(|submission| {
                submission
                    == &Submission {
                        name: Some("Ivan".to_string()),
                        phone: Some("+7 900 000-00-00".to_string()),
                        message: Some("Need a quote".to_string()),
                    }
            })
            .returning(|_| Ok(receipt()));

        let response = TestServer::new(router(test_state(Some(contacts)), any_origin()))?
            .post(PATH)
            .json(&json!({
                "name": "Ivan",
                "phone": "+7 900 000-00-00",
                "message": "Need a quote",
            }))
            .await;

        response.assert_status_ok();
        assert!(response.json::<SendEmailResponse>().success);
        assert_cors_headers(&response, "*");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_with_missing_fields() -> TestResult {
        let mut contacts = MockContactService::new();

        contacts
            .expect_submit()
            .times(1)
            .withf(|submission| {
                submission.name.as_deref() == Some("Ivan")
                    && submission.phone.is_none()
                    && submission.message.is_none()
            })
            .returning(|_| Ok(receipt()));

        let response = TestServer::new(router(test_state(Some(contacts)), any_origin()))?
            .post(PATH)
            .json(&json!({ "name": "Ivan" }))
            .await;

        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_with_non_json_body() -> TestResult {
        let mut contacts = MockContactService::new();

        contacts
            .expect_submit()
            .times(1)
            .withf(|submission| submission == &Submission::default())
            .returning(|_| Ok(receipt()));

        let response = TestServer::new(router(test_state(Some(contacts)), any_origin()))?
            .post(PATH)
            .text("name=Ivan&phone=1")
            .await;

        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_with_text_body_containing_json() -> TestResult {
        let mut contacts = MockContactService::new();

        contacts
            .expect_submit()
            .times(1)
            .withf(|submission| submission == &Submission::default())
            .returning(|_| Ok(receipt()));

        let response = TestServer::new(router(test_state(Some(contacts)), any_origin()))?
            .post(PATH)
            .text(r#"{"name":"Ivan"}"#)
            .await;

        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn test_form_submission_reaches_mailer() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .withf(|_, message| {
                message.plain_body == "Имя: Ivan\nТелефон: 1\nСообщение:\nHi"
                    && message.html_body.contains("<strong>Имя:</strong> Ivan</p>")
            })
            .returning(|_, _| Ok(receipt()));

        let state = AppState::new(ContactServiceImpl::new(
            complete_settings(),
            Arc::new(mailer),
        ));

        let response = TestServer::new(router(state, any_origin()))?
            .post(PATH)
            .form(&[("name", "Ivan"), ("phone", "1"), ("message", "Hi")])
            .await;

        response.assert_status_ok();
        assert!(response.json::<SendEmailResponse>().success);

        Ok(())
    }

    #[derive(Clone)]
    struct PanickingContacts;

    #[async_trait]
    impl ContactService for PanickingContacts {
        async fn submit(&self, _submission: &Submission) -> Result<Receipt, ContactError> {
            panic!("relay exploded")
        }
    }

    #[tokio::test]
    async fn test_panicking_handler_keeps_cors_headers() -> TestResult {
        let state = AppState::new(PanickingContacts);

        let response = TestServer::new(router(state, any_origin()))?
            .post(PATH)
            .json(&json!({ "name": "Ivan" }))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!json.success);
        assert_eq!(json.error, "relay exploded");
        assert_cors_headers(&response, "*");

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_port_fails_the_request() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send_email().times(0);

        let settings = SmtpSettings {
            smtp_port: "smtp".to_string(),
            ..complete_settings()
        };

        let state = AppState::new(ContactServiceImpl::new(settings, Arc::new(mailer)));

        let response = TestServer::new(router(state, any_origin()))?
            .post(PATH)
            .json(&json!({ "name": "Ivan" }))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json.error, r#"Invalid SMTP port: "smtp""#);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_not_configured() -> TestResult {
        let mut contacts = MockContactService::new();

        contacts.expect_submit().returning(|_| {
            Err(ContactError::Configuration(
                ConfigurationError::NotConfigured {
                    missing: vec!["SMTP_USER"],
                },
            ))
        });

        let response = TestServer::new(router(test_state(Some(contacts)), any_origin()))?
            .post(PATH)
            .json(&json!({ "name": "Ivan" }))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!json.success);
        assert_eq!(json.error, "SMTP or recipient not configured");
        assert_cors_headers(&response, "*");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_delivery_failure() -> TestResult {
        let mut contacts = MockContactService::new();

        contacts.expect_submit().returning(|_| {
            Err(ContactError::Delivery(MailerError::from(anyhow!(
                "Connection refused"
            ))))
        });

        let response = TestServer::new(router(test_state(Some(contacts)), any_origin()))?
            .post(PATH)
            .json(&json!({ "name": "Ivan" }))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!json.success);
        assert_eq!(json.error, "Connection refused");

        Ok(())
    }

    #[tokio::test]
    async fn test_preflight() -> TestResult {
        let mut contacts = MockContactService::new();

        contacts.expect_submit().times(0);

        let origin = HeaderValue::from_static("https://uralpromt.example");

        let response = TestServer::new(router(test_state(Some(contacts)), origin))?
            .method(Method::OPTIONS, PATH)
            .await;

        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(response.text(), "");
        assert_cors_headers(&response, "https://uralpromt.example");

        Ok(())
    }

    #[tokio::test]
    async fn test_other_methods_are_not_allowed() -> TestResult {
        let mut contacts = MockContactService::new();

        contacts.expect_submit().times(0);

        let server = TestServer::new(router(test_state(Some(contacts)), any_origin()))?;

        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            let response = server
                .method(method, PATH)
                .json(&json!({ "name": "Ivan" }))
                .await;

            let json = response.json::<ErrorResponse>();

            assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
            assert!(!json.success);
            assert_eq!(json.error, "Only POST allowed");
            assert_cors_headers(&response, "*");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_path_has_cors_headers() -> TestResult {
        let response = TestServer::new(router(test_state(None), any_origin()))?
            .get("/api/other")
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_cors_headers(&response, "*");

        Ok(())
    }

    #[tokio::test]
    async fn test_unconfigured_relay_is_never_contacted() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send_email().times(0);

        let settings = SmtpSettings {
            smtp_user: None,
            ..complete_settings()
        };

        let state = AppState::new(ContactServiceImpl::new(settings, Arc::new(mailer)));

        let response = TestServer::new(router(state, any_origin()))?
            .post(PATH)
            .json(&json!({
                "name": "Ivan",
                "phone": "+7 900 000-00-00",
                "message": "Need a quote",
            }))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json.error, "SMTP or recipient not configured");

        Ok(())
    }

    #[tokio::test]
    async fn test_submission_reaches_mailer_rendered() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .withf(|_, message| {
                message.html_body.contains("line1<br/>line2")
                    && message.html_body.contains("&lt;b&gt;Ivan&lt;/b&gt;")
                    && message.plain_body
                        == "Имя: <b>Ivan</b>\nТелефон: -\nСообщение:\nline1\nline2"
            })
            .returning(|_, _| Ok(receipt()));

        let state = AppState::new(ContactServiceImpl::new(
            complete_settings(),
            Arc::new(mailer),
        ));

        let response = TestServer::new(router(state, any_origin()))?
            .post(PATH)
            .json(&json!({ "name": "<b>Ivan</b>", "message": "line1\nline2" }))
            .await;

        response.assert_status_ok();
        assert!(response.json::<SendEmailResponse>().success);

        Ok(())
    }
}
