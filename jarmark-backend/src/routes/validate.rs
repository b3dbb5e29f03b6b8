use bytes::Bytes;
use headers::ContentType;
use http::{Response, StatusCode};
use http_body_util::Full;
use jarmark_database::schema::Field;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::form::{FormData, FormErrors, FormState};
use crate::routes::HttpResponse;
use crate::ResponseTypedHeaderExt as _;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldEvent {
    Blur,
    Change,
    Submit,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub event: FieldEvent,
    #[serde(default)]
    pub field: Option<Field>,
    #[serde(default)]
    pub touched: Vec<Field>,
    #[serde(default)]
    pub form: FormData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub touched: Vec<Field>,
    pub errors: FormErrors,
    /// True when the whole form would be accepted.
    pub valid: bool,
    pub shows_booth_dimensions: bool,
}

/// Replays the touched state of the browser and applies one event to it.
#[must_use]
pub fn apply(request: &ValidateRequest) -> ValidateResponse {
    let mut state = FormState::with_touched(request.touched.iter().copied(), &request.form);
    let valid = match (request.event, request.field) {
        (FieldEvent::Submit, _) => state.submit(&request.form).is_ok(),
        (FieldEvent::Blur, Some(field)) => {
            state.blur(field, &request.form);
            crate::form::validate_form(&request.form).is_ok()
        }
        (FieldEvent::Change, Some(field)) => {
            state.change(field, &request.form);
            crate::form::validate_form(&request.form).is_ok()
        }
        (FieldEvent::Blur | FieldEvent::Change, None) => {
            crate::form::validate_form(&request.form).is_ok()
        }
    };
    ValidateResponse {
        touched: state.touched_fields().collect(),
        errors: state.visible_errors(),
        valid,
        shows_booth_dimensions: request.form.shows_booth_dimensions(),
    }
}

pub fn validate(body: &[u8]) -> Result<HttpResponse, AppError> {
    let request: ValidateRequest = serde_json::from_slice(body)?;
    let response = apply(&request);
    Ok(Response::builder()
        .status(StatusCode::OK)
        .typed_header(ContentType::json())
        .body(Full::new(Bytes::from(serde_json::to_vec(&response)?)))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{INVALID_EMAIL, REQUIRED};

    fn request(json: serde_json::Value) -> ValidateRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn blur_touches_and_reports() {
        let response = apply(&request(serde_json::json!({
            "event": "blur",
            "field": "email",
            "form": { "email": "anna" },
        })));
        assert_eq!(response.touched, [Field::Email]);
        assert_eq!(response.errors.get(Field::Email), Some(INVALID_EMAIL));
        assert!(!response.valid);
    }

    #[test]
    fn change_of_untouched_field_shows_nothing() {
        let response = apply(&request(serde_json::json!({
            "event": "change",
            "field": "city",
            "form": {},
        })));
        assert!(response.touched.is_empty());
        assert!(response.errors.is_empty());
    }

    #[test]
    fn submit_reports_every_field() {
        let response = apply(&request(serde_json::json!({
            "event": "submit",
            "touched": ["email"],
            "form": {},
        })));
        assert_eq!(response.touched.len(), Field::form_fields().count());
        assert_eq!(response.errors.get(Field::CompanyName), Some(REQUIRED));
        assert!(!response.shows_booth_dimensions);
    }

    #[test]
    fn response_uses_field_names() {
        let response = apply(&request(serde_json::json!({
            "event": "blur",
            "field": "boothType",
            "form": { "boothType": "Food truck / przyczepa" },
        })));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["touched"], serde_json::json!(["boothType"]));
        assert_eq!(json["showsBoothDimensions"], true);
        assert_eq!(json["errors"], serde_json::json!({}));
    }
}
