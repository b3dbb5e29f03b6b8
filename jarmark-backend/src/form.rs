//! Required-field rules, per-field messages and the touched-state machine of
//! the registration form.

use core::str::FromStr;
use std::collections::BTreeMap;

use jarmark_database::models::{BoothType, Category, NewSubmission, PowerConnection, YesNo};
use jarmark_database::schema::Field;
use serde::ser::SerializeMap as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::validation::{validate_email, validate_nip, validate_phone, validate_postal_code};

pub const REQUIRED: &str = "To pole jest wymagane";
pub const INVALID_EMAIL: &str = "Proszę podać poprawny adres email";
pub const INVALID_NIP: &str = "NIP powinien składać się z 10 cyfr";
pub const INVALID_PHONE: &str = "Proszę podać poprawny numer telefonu";
pub const INVALID_POSTAL_CODE: &str = "Proszę podać poprawny kod pocztowy (XX-XXX)";
pub const INVALID_CHOICE: &str = "Proszę wybrać jedną z dostępnych opcji";

/// Shown once above the form when a submit is rejected.
pub const FORM_HAS_ERRORS: &str = "Formularz zawiera błędy. Popraw zaznaczone pola.";

/// The form exactly as the vendor typed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub nip: String,
    pub email: String,
    pub phone: String,
    pub participated_last_year: String,
    pub category: String,
    pub booth_type: String,
    pub booth_dimensions: String,
    pub power_connection: String,
    pub products: String,
    pub notes: String,
    pub needs_parking: String,
    pub location1: String,
    pub location2: String,
    pub location3: String,
    #[serde(deserialize_with = "checkbox")]
    pub accept_terms: bool,
    #[serde(deserialize_with = "checkbox")]
    pub accept_privacy: bool,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            street: String::new(),
            postal_code: String::new(),
            city: String::new(),
            nip: String::new(),
            email: String::new(),
            phone: String::new(),
            participated_last_year: YesNo::Nie.label().to_owned(),
            category: String::new(),
            booth_type: String::new(),
            booth_dimensions: String::new(),
            power_connection: String::new(),
            products: String::new(),
            notes: String::new(),
            needs_parking: YesNo::Nie.label().to_owned(),
            location1: String::new(),
            location2: String::new(),
            location3: String::new(),
            accept_terms: false,
            accept_privacy: false,
        }
    }
}

/// HTML checkboxes send `on`, JSON clients send a boolean.
fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Checkbox {
        Flag(bool),
        Text(String),
    }

    Ok(match Checkbox::deserialize(deserializer)? {
        Checkbox::Flag(flag) => flag,
        Checkbox::Text(text) => matches!(text.as_str(), "on" | "true" | "TAK"),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldInput<'a> {
    Text(&'a str),
    Checkbox(bool),
}

impl FormData {
    #[must_use]
    pub fn value(&self, field: Field) -> FieldInput<'_> {
        match field {
            Field::SubmissionDateTime => FieldInput::Text(""),
            Field::CompanyName => FieldInput::Text(&self.company_name),
            Field::FirstName => FieldInput::Text(&self.first_name),
            Field::LastName => FieldInput::Text(&self.last_name),
            Field::Street => FieldInput::Text(&self.street),
            Field::PostalCode => FieldInput::Text(&self.postal_code),
            Field::City => FieldInput::Text(&self.city),
            Field::Nip => FieldInput::Text(&self.nip),
            Field::Email => FieldInput::Text(&self.email),
            Field::Phone => FieldInput::Text(&self.phone),
            Field::ParticipatedLastYear => FieldInput::Text(&self.participated_last_year),
            Field::Category => FieldInput::Text(&self.category),
            Field::BoothType => FieldInput::Text(&self.booth_type),
            Field::BoothDimensions => FieldInput::Text(&self.booth_dimensions),
            Field::PowerConnection => FieldInput::Text(&self.power_connection),
            Field::Products => FieldInput::Text(&self.products),
            Field::Notes => FieldInput::Text(&self.notes),
            Field::NeedsParking => FieldInput::Text(&self.needs_parking),
            Field::Location1 => FieldInput::Text(&self.location1),
            Field::Location2 => FieldInput::Text(&self.location2),
            Field::Location3 => FieldInput::Text(&self.location3),
            Field::AcceptTerms => FieldInput::Checkbox(self.accept_terms),
            Field::AcceptPrivacy => FieldInput::Checkbox(self.accept_privacy),
        }
    }

    /// Whether the dimensions input is part of the form for the chosen booth.
    #[must_use]
    pub fn shows_booth_dimensions(&self) -> bool {
        BoothType::from_str(&self.booth_type).is_ok_and(BoothType::requires_dimensions)
    }
}

/// Checks one field against the rule table. Returns the message to show next
/// to the field on failure.
pub fn validate_field(field: Field, data: &FormData) -> Result<(), &'static str> {
    match field {
        Field::SubmissionDateTime | Field::Notes => return Ok(()),
        Field::BoothDimensions if !data.shows_booth_dimensions() => return Ok(()),
        _ => {}
    }
    let text = match data.value(field) {
        FieldInput::Checkbox(true) => return Ok(()),
        FieldInput::Checkbox(false) => return Err(REQUIRED),
        FieldInput::Text(text) if text.trim().is_empty() => return Err(REQUIRED),
        FieldInput::Text(text) => text,
    };
    let valid = match field {
        Field::Email => validate_email(text),
        Field::Nip => validate_nip(text),
        Field::Phone => validate_phone(text),
        Field::PostalCode => validate_postal_code(text),
        Field::ParticipatedLastYear | Field::NeedsParking => YesNo::from_str(text).is_ok(),
        Field::Category => Category::from_str(text).is_ok(),
        Field::BoothType => BoothType::from_str(text).is_ok(),
        Field::PowerConnection => PowerConnection::from_str(text).is_ok(),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(match field {
            Field::Email => INVALID_EMAIL,
            Field::Nip => INVALID_NIP,
            Field::Phone => INVALID_PHONE,
            Field::PostalCode => INVALID_POSTAL_CODE,
            _ => INVALID_CHOICE,
        })
    }
}

/// Per-field messages, keyed and iterated in form order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<Field, &'static str>);

impl FormErrors {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

impl FromIterator<(Field, &'static str)> for FormErrors {
    fn from_iter<T: IntoIterator<Item = (Field, &'static str)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for FormErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, message) in &self.0 {
            map.serialize_entry(field.name(), message)?;
        }
        map.end()
    }
}

/// Validates every field and, when all pass, converts the input into a
/// submission ready for the store. All or nothing.
pub fn validate_form(data: &FormData) -> Result<NewSubmission, FormErrors> {
    let errors: FormErrors = Field::form_fields()
        .filter_map(|field| validate_field(field, data).err().map(|message| (field, message)))
        .collect();
    if !errors.is_empty() {
        return Err(errors);
    }
    let choice_error = |field: Field| -> FormErrors { core::iter::once((field, INVALID_CHOICE)).collect() };
    let booth_type = BoothType::from_str(&data.booth_type).map_err(|_| choice_error(Field::BoothType))?;
    Ok(NewSubmission {
        company_name: data.company_name.trim().to_owned(),
        first_name: data.first_name.trim().to_owned(),
        last_name: data.last_name.trim().to_owned(),
        street: data.street.trim().to_owned(),
        postal_code: data.postal_code.trim().to_owned(),
        city: data.city.trim().to_owned(),
        nip: data.nip.trim().to_owned(),
        email: data.email.trim().to_owned(),
        phone: data.phone.trim().to_owned(),
        participated_last_year: YesNo::from_str(&data.participated_last_year)
            .map_err(|_| choice_error(Field::ParticipatedLastYear))?,
        category: Category::from_str(&data.category).map_err(|_| choice_error(Field::Category))?,
        booth_type,
        booth_dimensions: if booth_type.requires_dimensions() {
            data.booth_dimensions.trim().to_owned()
        } else {
            String::new()
        },
        power_connection: PowerConnection::from_str(&data.power_connection)
            .map_err(|_| choice_error(Field::PowerConnection))?,
        products: data.products.trim().to_owned(),
        notes: data.notes.trim().to_owned(),
        needs_parking: YesNo::from_str(&data.needs_parking)
            .map_err(|_| choice_error(Field::NeedsParking))?,
        location1: data.location1.trim().to_owned(),
        location2: data.location2.trim().to_owned(),
        location3: data.location3.trim().to_owned(),
        accept_terms: data.accept_terms,
        accept_privacy: data.accept_privacy,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStatus {
    Untouched,
    Valid,
    Invalid(&'static str),
}

/// Tracks which fields the vendor has visited. Errors are only shown for
/// touched fields; a submit touches all of them.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    touched: BTreeMap<Field, FieldStatus>,
}

impl FormState {
    /// Rebuilds the state for fields that were touched earlier.
    pub fn with_touched(touched: impl IntoIterator<Item = Field>, data: &FormData) -> Self {
        let mut state = Self::default();
        for field in touched {
            state.blur(field, data);
        }
        state
    }

    #[must_use]
    pub fn status(&self, field: Field) -> FieldStatus {
        self.touched
            .get(&field)
            .copied()
            .unwrap_or(FieldStatus::Untouched)
    }

    /// Leaving a field always evaluates it.
    pub fn blur(&mut self, field: Field, data: &FormData) {
        self.touched.insert(field, evaluate(field, data));
        self.refresh_dependents(field, data);
    }

    /// Editing a field only re-evaluates it once it has been touched.
    pub fn change(&mut self, field: Field, data: &FormData) {
        if self.touched.contains_key(&field) {
            self.touched.insert(field, evaluate(field, data));
        }
        self.refresh_dependents(field, data);
    }

    /// The dimensions rule depends on the booth type.
    fn refresh_dependents(&mut self, field: Field, data: &FormData) {
        if field == Field::BoothType && self.touched.contains_key(&Field::BoothDimensions) {
            self.touched
                .insert(Field::BoothDimensions, evaluate(Field::BoothDimensions, data));
        }
    }

    /// Full validation on submit: every field is evaluated and marked touched.
    pub fn submit(&mut self, data: &FormData) -> Result<NewSubmission, FormErrors> {
        for field in Field::form_fields() {
            self.touched.insert(field, evaluate(field, data));
        }
        validate_form(data)
    }

    pub fn touched_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.touched.keys().copied()
    }

    /// Messages of touched fields that failed.
    #[must_use]
    pub fn visible_errors(&self) -> FormErrors {
        self.touched
            .iter()
            .filter_map(|(field, status)| match status {
                FieldStatus::Invalid(message) => Some((*field, *message)),
                FieldStatus::Untouched | FieldStatus::Valid => None,
            })
            .collect()
    }
}

fn evaluate(field: Field, data: &FormData) -> FieldStatus {
    match validate_field(field, data) {
        Ok(()) => FieldStatus::Valid,
        Err(message) => FieldStatus::Invalid(message),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::valid_form;
    use super::*;

    #[test]
    fn valid_form_becomes_submission() {
        let submission = validate_form(&valid_form()).unwrap();
        assert_eq!(submission.company_name, "Bursztynowa Pracownia");
        assert_eq!(submission.booth_type, BoothType::OrganizerTent);
        assert_eq!(submission.participated_last_year, YesNo::Tak);
        assert!(submission.accept_terms && submission.accept_privacy);
    }

    #[test]
    fn food_truck_needs_dimensions() {
        let mut form = valid_form();
        form.booth_type = BoothType::FoodTruck.label().to_owned();
        let errors = validate_form(&form).unwrap_err();
        assert_eq!(errors.get(Field::BoothDimensions), Some(REQUIRED));
        assert_eq!(errors.len(), 1);

        form.booth_dimensions = "3 m × 5 m".to_owned();
        let submission = validate_form(&form).unwrap();
        assert_eq!(submission.booth_dimensions, "3 m × 5 m");
    }

    #[test]
    fn organizer_tent_ignores_dimensions() {
        let mut form = valid_form();
        form.booth_type = BoothType::OrganizerTent.label().to_owned();
        form.booth_dimensions = String::new();
        assert!(validate_form(&form).is_ok());

        form.booth_dimensions = "left over from another choice".to_owned();
        assert_eq!(validate_form(&form).unwrap().booth_dimensions, "");
    }

    #[test]
    fn custom_tent_needs_dimensions_own_tent_does_not() {
        let mut form = valid_form();
        form.booth_type = BoothType::CustomSizeTent.label().to_owned();
        assert!(validate_form(&form).is_err());
        form.booth_type = BoothType::OwnTent.label().to_owned();
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn notes_are_optional() {
        let mut form = valid_form();
        form.notes = String::new();
        assert_eq!(validate_field(Field::Notes, &form), Ok(()));
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn every_failure_is_reported_at_once() {
        let form = FormData::default();
        let errors = validate_form(&form).unwrap_err();
        assert_eq!(errors.get(Field::CompanyName), Some(REQUIRED));
        assert_eq!(errors.get(Field::Email), Some(REQUIRED));
        assert_eq!(errors.get(Field::AcceptTerms), Some(REQUIRED));
        assert_eq!(errors.get(Field::AcceptPrivacy), Some(REQUIRED));
        assert_eq!(errors.get(Field::Notes), None);
        assert_eq!(errors.get(Field::BoothDimensions), None);
        // the default TAK/NIE answers are already valid
        assert_eq!(errors.get(Field::NeedsParking), None);
        assert_eq!(errors.get(Field::ParticipatedLastYear), None);
    }

    #[test]
    fn format_messages_follow_required_check() {
        let mut form = valid_form();
        form.email = "anna".to_owned();
        form.nip = "123".to_owned();
        form.phone = "123".to_owned();
        form.postal_code = "80231".to_owned();
        form.category = "Kowale".to_owned();
        let errors = validate_form(&form).unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(INVALID_EMAIL));
        assert_eq!(errors.get(Field::Nip), Some(INVALID_NIP));
        assert_eq!(errors.get(Field::Phone), Some(INVALID_PHONE));
        assert_eq!(errors.get(Field::PostalCode), Some(INVALID_POSTAL_CODE));
        assert_eq!(errors.get(Field::Category), Some(INVALID_CHOICE));
    }

    #[test]
    fn whitespace_only_is_empty() {
        let mut form = valid_form();
        form.city = "   ".to_owned();
        assert_eq!(validate_field(Field::City, &form), Err(REQUIRED));
    }

    #[test]
    fn urlencoded_checkboxes_and_missing_fields() {
        let form: FormData =
            serde_urlencoded::from_str("companyName=Firma&acceptTerms=on&email=a%40b.pl").unwrap();
        assert_eq!(form.company_name, "Firma");
        assert_eq!(form.email, "a@b.pl");
        assert!(form.accept_terms);
        assert!(!form.accept_privacy);
        assert_eq!(form.needs_parking, "NIE");
    }

    #[test]
    fn json_checkboxes() {
        let form: FormData =
            serde_json::from_str(r#"{"acceptTerms": true, "acceptPrivacy": "on"}"#).unwrap();
        assert!(form.accept_terms);
        assert!(form.accept_privacy);
    }

    #[test]
    fn change_before_blur_stays_untouched() {
        let mut form = FormData::default();
        let mut state = FormState::default();

        state.change(Field::Email, &form);
        assert_eq!(state.status(Field::Email), FieldStatus::Untouched);

        state.blur(Field::Email, &form);
        assert_eq!(state.status(Field::Email), FieldStatus::Invalid(REQUIRED));

        form.email = "anna".to_owned();
        state.change(Field::Email, &form);
        assert_eq!(state.status(Field::Email), FieldStatus::Invalid(INVALID_EMAIL));

        form.email = "anna@bursztyn.pl".to_owned();
        state.change(Field::Email, &form);
        assert_eq!(state.status(Field::Email), FieldStatus::Valid);
        assert!(state.visible_errors().is_empty());
    }

    #[test]
    fn booth_type_change_reevaluates_touched_dimensions() {
        let mut form = valid_form();
        form.booth_type = BoothType::FoodTruck.label().to_owned();
        let mut state = FormState::default();
        state.blur(Field::BoothDimensions, &form);
        assert_eq!(state.status(Field::BoothDimensions), FieldStatus::Invalid(REQUIRED));

        form.booth_type = BoothType::OrganizerTent.label().to_owned();
        state.change(Field::BoothType, &form);
        assert_eq!(state.status(Field::BoothDimensions), FieldStatus::Valid);
    }

    #[test]
    fn submit_touches_every_field() {
        let mut state = FormState::default();
        let form = FormData::default();
        assert!(state.submit(&form).is_err());
        assert_eq!(state.touched_fields().count(), Field::form_fields().count());
        assert_eq!(state.visible_errors(), validate_form(&form).unwrap_err());

        let mut state = FormState::default();
        assert!(state.submit(&valid_form()).is_ok());
        assert!(state.visible_errors().is_empty());
    }

    #[test]
    fn errors_serialize_with_field_names() {
        let errors = FormErrors::from_iter([(Field::Nip, INVALID_NIP)]);
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "nip": INVALID_NIP })
        );
    }
}
