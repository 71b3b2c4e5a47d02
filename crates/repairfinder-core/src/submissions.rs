//! Inbound lead and event payloads, and the length/format checks applied
//! before they are written.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::ValidationError;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const CONTACT_MIN: usize = 6;
const CONTACT_MAX: usize = 200;
const ISSUE_MAX: usize = 500;
const SESSION_ID_MAX: usize = 128;
const SHORT_TEXT_MAX: usize = 200;
const DEFAULT_ISSUE: &str = "mobile repair";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ().\-]{4,}[0-9]$").expect("valid regex"));
static EVENT_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_]{1,32}$").expect("valid regex"));

/// `POST /api/leads` body as sent by the results page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadSubmission {
    pub session_id: Option<String>,
    pub name: String,
    pub contact: String,
    pub issue: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub consent_follow_up: bool,
}

/// A lead that passed validation; text fields are trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub session_id: Option<String>,
    pub name: String,
    pub contact: String,
    pub issue: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub consent_follow_up: bool,
}

/// `POST /api/events` body. `type` is `search` or `shop_action` on the site
/// today, but any short lower-case tag is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSubmission {
    #[serde(rename = "type")]
    pub event_type: String,
    pub session_id: String,
    pub lead_id: Option<String>,
    pub issue: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub action: Option<String>,
    #[serde(alias = "shopId")]
    pub shop_place_id: Option<String>,
    pub shop_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub event_type: String,
    pub session_id: String,
    pub lead_id: Option<String>,
    pub issue: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub action: Option<String>,
    pub shop_place_id: Option<String>,
    pub shop_name: Option<String>,
}

/// Validate a lead submission.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_lead(input: LeadSubmission) -> Result<NewLead, ValidationError> {
    if !input.consent_follow_up {
        return Err(invalid("consentFollowUp", "consent is required"));
    }

    let name = input.name.trim().to_string();
    check_len("name", &name, NAME_MIN, NAME_MAX)?;

    let contact = input.contact.trim().to_string();
    check_len("contact", &contact, CONTACT_MIN, CONTACT_MAX)?;
    if !(EMAIL_RE.is_match(&contact) || PHONE_RE.is_match(&contact)) {
        return Err(invalid("contact", "must be a phone number or email address"));
    }

    let issue = match trimmed_opt(input.issue) {
        Some(issue) => {
            check_len("issue", &issue, 1, ISSUE_MAX)?;
            issue
        }
        None => DEFAULT_ISSUE.to_string(),
    };

    let session_id = trimmed_opt(input.session_id);
    if let Some(ref s) = session_id {
        check_len("sessionId", s, 1, SESSION_ID_MAX)?;
    }

    Ok(NewLead {
        session_id,
        name,
        contact,
        issue,
        lat: finite_opt("lat", input.lat)?,
        lng: finite_opt("lng", input.lng)?,
        consent_follow_up: true,
    })
}

/// Validate an event submission.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_event(input: EventSubmission) -> Result<NewEvent, ValidationError> {
    let event_type = input.event_type.trim().to_string();
    if !EVENT_TYPE_RE.is_match(&event_type) {
        return Err(invalid("type", "must be 1-32 lower-case letters or '_'"));
    }

    let session_id = input.session_id.trim().to_string();
    check_len("sessionId", &session_id, 1, SESSION_ID_MAX)?;

    let lead_id = capped_opt("leadId", input.lead_id, SESSION_ID_MAX)?;
    let issue = capped_opt("issue", input.issue, ISSUE_MAX)?;
    let action = capped_opt("action", input.action, SHORT_TEXT_MAX)?;
    let shop_place_id = capped_opt("shopPlaceId", input.shop_place_id, SHORT_TEXT_MAX)?;
    let shop_name = capped_opt("shopName", input.shop_name, SHORT_TEXT_MAX)?;

    Ok(NewEvent {
        event_type,
        session_id,
        lead_id,
        issue,
        lat: finite_opt("lat", input.lat)?,
        lng: finite_opt("lng", input.lng)?,
        radius: finite_opt("radius", input.radius)?,
        action,
        shop_place_id,
        shop_name,
    })
}

fn invalid(field: &'static str, reason: &str) -> ValidationError {
    ValidationError {
        field,
        reason: reason.to_string(),
    }
}

fn check_len(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError {
            field,
            reason: format!("must be between {min} and {max} characters"),
        });
    }
    Ok(())
}

fn trimmed_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn capped_opt(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let value = trimmed_opt(value);
    if let Some(ref v) = value {
        check_len(field, v, 1, max)?;
    }
    Ok(value)
}

fn finite_opt(field: &'static str, value: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if !v.is_finite() => Err(invalid(field, "must be a finite number")),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> LeadSubmission {
        LeadSubmission {
            session_id: Some("sess-1".to_string()),
            name: "  Asha ".to_string(),
            contact: "+91 98765 43210".to_string(),
            issue: Some("Mobile - Samsung - Android - Screen broken".to_string()),
            lat: Some(12.97),
            lng: Some(77.59),
            consent_follow_up: true,
        }
    }

    fn event() -> EventSubmission {
        EventSubmission {
            event_type: "search".to_string(),
            session_id: "sess-1".to_string(),
            radius: Some(3000.0),
            ..EventSubmission::default()
        }
    }

    #[test]
    fn valid_lead_is_trimmed() {
        let lead = validate_lead(lead()).unwrap();
        assert_eq!(lead.name, "Asha");
        assert_eq!(lead.contact, "+91 98765 43210");
        assert!(lead.consent_follow_up);
    }

    #[test]
    fn lead_without_consent_is_rejected() {
        let mut input = lead();
        input.consent_follow_up = false;
        let err = validate_lead(input).unwrap_err();
        assert_eq!(err.field, "consentFollowUp");
    }

    #[test]
    fn lead_with_short_name_is_rejected() {
        let mut input = lead();
        input.name = " A ".to_string();
        assert_eq!(validate_lead(input).unwrap_err().field, "name");
    }

    #[test]
    fn lead_accepts_email_contact() {
        let mut input = lead();
        input.contact = "asha@example.com".to_string();
        assert!(validate_lead(input).is_ok());
    }

    #[test]
    fn lead_rejects_garbage_contact() {
        let mut input = lead();
        input.contact = "call me maybe".to_string();
        let err = validate_lead(input).unwrap_err();
        assert_eq!(err.field, "contact");
        assert!(err.to_string().contains("phone number or email"));
    }

    #[test]
    fn lead_issue_defaults_when_blank() {
        let mut input = lead();
        input.issue = Some("   ".to_string());
        assert_eq!(validate_lead(input).unwrap().issue, "mobile repair");
    }

    #[test]
    fn lead_deserializes_camel_case_body() {
        let input: LeadSubmission = serde_json::from_value(serde_json::json!({
            "sessionId": "abc",
            "name": "Ravi",
            "contact": "ravi@example.com",
            "issue": "Battery issue",
            "lat": 1.5,
            "lng": 2.5,
            "consentFollowUp": true
        }))
        .unwrap();
        assert_eq!(input.session_id.as_deref(), Some("abc"));
        assert!(input.consent_follow_up);
    }

    #[test]
    fn valid_event_passes() {
        let event = validate_event(event()).unwrap();
        assert_eq!(event.event_type, "search");
        assert_eq!(event.radius, Some(3000.0));
        assert!(event.lead_id.is_none());
    }

    #[test]
    fn event_type_must_be_lowercase_tag() {
        let mut input = event();
        input.event_type = "DROP TABLE".to_string();
        assert_eq!(validate_event(input).unwrap_err().field, "type");
    }

    #[test]
    fn event_requires_session_id() {
        let mut input = event();
        input.session_id = "  ".to_string();
        assert_eq!(validate_event(input).unwrap_err().field, "sessionId");
    }

    #[test]
    fn event_rejects_oversized_shop_name() {
        let mut input = event();
        input.event_type = "shop_action".to_string();
        input.shop_name = Some("x".repeat(201));
        assert_eq!(validate_event(input).unwrap_err().field, "shopName");
    }

    #[test]
    fn event_deserializes_type_field() {
        let input: EventSubmission = serde_json::from_value(serde_json::json!({
            "type": "shop_action",
            "sessionId": "abc",
            "action": "call_click",
            "shopPlaceId": "node-42",
            "shopName": "Fix My Phone"
        }))
        .unwrap();
        let event = validate_event(input).unwrap();
        assert_eq!(event.event_type, "shop_action");
        assert_eq!(event.action.as_deref(), Some("call_click"));
        assert_eq!(event.shop_place_id.as_deref(), Some("node-42"));
    }

    #[test]
    fn shop_action_accepts_shop_id_key() {
        let input: EventSubmission = serde_json::from_value(serde_json::json!({
            "type": "shop_action",
            "action": "call_click",
            "sessionId": "s-1",
            "leadId": null,
            "shopId": "node-42",
            "shopName": "Fix My Phone"
        }))
        .unwrap();
        let event = validate_event(input).unwrap();
        assert_eq!(event.shop_place_id.as_deref(), Some("node-42"));
        assert_eq!(event.lead_id, None);
    }
}
