use serde::{Deserialize, Serialize};

use crate::services::auth_service::looks_like_email;
use crate::services::email_service::{EmailMessage, EmailSender};
use crate::utils::AppError;

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub institution: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// Contact submission with every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub institution: Option<String>,
    pub message: String,
}

fn field(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn validate(request: &ContactRequest) -> Result<ContactSubmission, AppError> {
    let first_name = field(&request.first_name);
    let last_name = field(&request.last_name);
    let email = field(&request.email);
    let message = field(&request.message);

    let missing: Vec<&str> = [
        ("firstName", first_name.is_none()),
        ("lastName", last_name.is_none()),
        ("email", email.is_none()),
        ("message", message.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();

    match (first_name, last_name, email, message) {
        (Some(first_name), Some(last_name), Some(email), Some(message)) => {
            if !looks_like_email(&email) {
                return Err(AppError::InvalidRequest("Invalid email address".to_string()));
            }
            Ok(ContactSubmission {
                first_name,
                last_name,
                email,
                institution: field(&request.institution),
                message,
            })
        }
        _ => Err(AppError::InvalidRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        ))),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn compose(submission: &ContactSubmission, to: &str) -> EmailMessage {
    let institution = submission.institution.as_deref().unwrap_or("Not provided");

    let text = format!(
        "New contact form submission\n\n\
         Name: {} {}\n\
         Email: {}\n\
         Institution: {}\n\n\
         Message:\n{}\n",
        submission.first_name, submission.last_name, submission.email, institution, submission.message
    );

    let html = format!(
        "<h2>New contact form submission</h2>\
         <p><strong>Name:</strong> {} {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Institution:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>",
        escape_html(&submission.first_name),
        escape_html(&submission.last_name),
        escape_html(&submission.email),
        escape_html(institution),
        escape_html(&submission.message).replace('\n', "<br>")
    );

    EmailMessage {
        to: to.to_string(),
        reply_to: Some(submission.email.clone()),
        subject: format!(
            "New contact form submission from {} {}",
            submission.first_name, submission.last_name
        ),
        text,
        html,
    }
}

/// Validates the form and hands the composed message to the email sender.
pub async fn submit(
    sender: &dyn EmailSender,
    contact_to: &str,
    request: &ContactRequest,
) -> Result<ContactResponse, AppError> {
    let submission = validate(request)?;
    let message = compose(&submission, contact_to);

    sender.send(&message).await?;

    Ok(ContactResponse {
        success: true,
        message: "Message sent successfully".to_string(),
    })
}
