use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::auth::authorization::is_valid_email;
use crate::db::forms as form_db;
use crate::models::form_submissions::{CustomerInfo, FormData, FormType, NewSubmission, Priority};
use crate::models::non_blank;

const REJECTED: &str = "Please fill in all required fields and accept the privacy terms.";
const FAILED: &str = "Sorry, we could not send your message. Please try again or call us.";
const ACCEPTED: &str = "Thank you! We have received your message and will be in touch shortly.";

/// Fields posted by the public contact form (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub message: Option<String>,
    pub consent: Option<String>,
    pub emergency: Option<String>,
    pub address: Option<String>,
    pub preferred_contact: Option<String>,
}

/// Checkbox semantics: present with one of the usual "on" values.
fn is_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}

/// Validate the raw form and turn it into a submission record.
pub fn normalize(form: ContactForm) -> Option<NewSubmission> {
    let first_name = non_blank(form.first_name)?;
    let last_name = non_blank(form.last_name)?;
    let email = non_blank(form.email)?.to_lowercase();
    let phone = non_blank(form.phone)?;
    let service = non_blank(form.service)?;
    let message = non_blank(form.message)?;
    if !is_valid_email(&email) || !is_checked(form.consent.as_deref()) {
        return None;
    }
    let emergency = is_checked(form.emergency.as_deref());

    let mut tags = vec![service.clone()];
    if emergency {
        tags.push("emergency".to_string());
    }
    tags.push("website".to_string());

    Some(NewSubmission {
        form_type: FormType::ServiceInquiry,
        priority: if emergency { Priority::Urgent } else { Priority::Medium },
        customer_info: CustomerInfo {
            first_name,
            last_name,
            email,
            phone: Some(phone),
            address: non_blank(form.address),
            preferred_contact: non_blank(form.preferred_contact),
        },
        form_data: FormData {
            service: Some(service),
            message,
            emergency,
            consent: true,
            source: Some("website".to_string()),
            details: None,
        },
        tags,
    })
}

/// POST /api/contact — public intake; answers `{success, message}`.
pub async fn submit_contact(
    db: web::Data<DatabaseConnection>,
    form: Result<web::Form<ContactForm>, actix_web::Error>,
) -> HttpResponse {
    let submission = match form.ok().and_then(|f| normalize(f.into_inner())) {
        Some(submission) => submission,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "message": REJECTED,
            }));
        }
    };

    match form_db::insert_submission(db.get_ref(), submission).await {
        Ok(saved) => {
            tracing::info!(id = %saved.id, priority = ?saved.priority, "Contact form received");
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "message": ACCEPTED,
            }))
        }
        Err(e) => {
            tracing::error!("Failed to store contact form: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "message": FAILED,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            first_name: Some("Ana".into()),
            last_name: Some("Diaz".into()),
            email: Some("Ana@Example.com".into()),
            phone: Some("555-0101".into()),
            service: Some("Plumbing".into()),
            message: Some("Leaking tap".into()),
            consent: Some("on".into()),
            ..Default::default()
        }
    }

    #[test]
    fn ordinary_request_is_medium_priority() {
        let sub = normalize(filled()).unwrap();
        assert_eq!(sub.form_type, FormType::ServiceInquiry);
        assert_eq!(sub.priority, Priority::Medium);
        assert_eq!(sub.tags, vec!["Plumbing", "website"]);
        assert_eq!(sub.customer_info.email, "ana@example.com");
        assert!(sub.form_data.consent);
    }

    #[test]
    fn emergency_is_urgent_and_tagged() {
        let sub = normalize(ContactForm {
            emergency: Some("true".into()),
            ..filled()
        })
        .unwrap();
        assert_eq!(sub.priority, Priority::Urgent);
        assert_eq!(sub.tags, vec!["Plumbing", "emergency", "website"]);
    }

    #[test]
    fn consent_is_required() {
        assert!(normalize(ContactForm { consent: None, ..filled() }).is_none());
        assert!(normalize(ContactForm { consent: Some("off".into()), ..filled() }).is_none());
    }

    #[test]
    fn blank_required_field_is_rejected() {
        assert!(normalize(ContactForm { message: Some("   ".into()), ..filled() }).is_none());
        assert!(normalize(ContactForm { email: Some("nope".into()), ..filled() }).is_none());
    }
}
