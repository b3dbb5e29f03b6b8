use core::fmt::Write as _;

use jarmark_database::models::{BoothType, Category, PowerConnection, YesNo};
use jarmark_database::schema::Field;
use strum::IntoEnumIterator as _;

use crate::components::main::{escape, escape_attribute};
use crate::form::{FieldInput, FormData, FormErrors};

const SECTIONS: [(&str, &[Field]); 4] = [
    (
        "Dane wystawcy",
        &[
            Field::CompanyName,
            Field::FirstName,
            Field::LastName,
            Field::Street,
            Field::PostalCode,
            Field::City,
            Field::Nip,
            Field::Email,
            Field::Phone,
            Field::ParticipatedLastYear,
            Field::Category,
        ],
    ),
    (
        "Informacje techniczne dla organizatora",
        &[
            Field::BoothType,
            Field::BoothDimensions,
            Field::PowerConnection,
            Field::Products,
            Field::Notes,
            Field::NeedsParking,
        ],
    ),
    (
        "Wybór lokalizacji",
        &[Field::Location1, Field::Location2, Field::Location3],
    ),
    (
        "Akceptacja warunków",
        &[Field::AcceptTerms, Field::AcceptPrivacy],
    ),
];

/// Opening hours and booth set-up and take-down dates of the event.
const EVENT_SCHEDULE: &str = r#"<section class="schedule">
    <h3>Godziny wydarzenia:</h3>
    <ul>
        <li>Czwartek: 12:00–21:00</li>
        <li>Piątek i sobota: 10:00–21:00</li>
        <li>Niedziela: 10:00–16:00</li>
    </ul>
    <h3>Montaż stoisk:</h3>
    <p>31.07.2025 r., do godz. 11:00</p>
    <h3>Demontaż stoisk:</h3>
    <p>03.08.2025 r., od godz. 16:00</p>
</section>"#;

fn choices(field: Field) -> Option<Vec<&'static str>> {
    match field {
        Field::ParticipatedLastYear | Field::NeedsParking => {
            Some(YesNo::iter().map(YesNo::label).collect())
        }
        Field::Category => Some(Category::iter().map(Category::label).collect()),
        Field::BoothType => Some(BoothType::iter().map(BoothType::label).collect()),
        Field::PowerConnection => {
            Some(PowerConnection::iter().map(PowerConnection::label).collect())
        }
        _ => None,
    }
}

const fn input_type(field: Field) -> &'static str {
    match field {
        Field::Email => "email",
        Field::Phone => "tel",
        _ => "text",
    }
}

const fn placeholder(field: Field) -> &'static str {
    match field {
        Field::PostalCode => "XX-XXX",
        Field::Nip => "0000000000",
        Field::BoothDimensions => "np. 3 m × 6 m",
        _ => "",
    }
}

fn field_html(field: Field, data: &FormData, errors: &FormErrors) -> String {
    let name = field.name();
    let error = errors.get(field);
    let class = if error.is_some() { r#" class="error""# } else { "" };
    let label = escape(field.label());
    let control = match (data.value(field), choices(field)) {
        (FieldInput::Text(current), Some(options)) => {
            let mut radios = format!(r#"<fieldset{class}><legend>{label}</legend>"#);
            for (index, option) in options.iter().enumerate() {
                let checked = if *option == current { " checked" } else { "" };
                let _ = write!(
                    radios,
                    r#"<label for="{name}-{index}"><input type="radio" id="{name}-{index}" name="{name}" value="{}"{checked}> {}</label>"#,
                    escape_attribute(option),
                    escape(option),
                );
            }
            radios.push_str("</fieldset>");
            radios
        }
        (FieldInput::Text(current), None) if matches!(field, Field::Products | Field::Notes) => {
            format!(
                r#"<label for="{name}">{label}</label><textarea id="{name}" name="{name}" rows="4"{class}>{}</textarea>"#,
                escape(current)
            )
        }
        (FieldInput::Text(current), None) => format!(
            r#"<label for="{name}">{label}</label><input id="{name}" name="{name}" type="{}" placeholder="{}" value="{}"{class}>"#,
            input_type(field),
            escape_attribute(placeholder(field)),
            escape_attribute(current),
        ),
        (FieldInput::Checkbox(checked), _) => format!(
            r#"<label for="{name}"><input id="{name}" name="{name}" type="checkbox"{}{class}> {label}</label>"#,
            if checked { " checked" } else { "" },
        ),
    };
    let hidden = if field == Field::BoothDimensions && !data.shows_booth_dimensions() {
        " hidden"
    } else {
        ""
    };
    format!(
        r#"<div class="field" id="field-{name}"{hidden}>{control}<div class="error-message" id="{name}-error">{}</div></div>"#,
        error.map(escape).unwrap_or_default()
    )
}

/// The registration form filled with `data`, with messages for `errors`.
#[must_use]
pub fn registration_form(
    data: &FormData,
    errors: &FormErrors,
    csrf_input: &str,
    notice: Option<&str>,
) -> String {
    let mut html = String::from(
        r#"<h1 class="center">Formularz zgłoszeniowy dla wystawców Jarmarku Bałtyckiego</h1>
<form id="registration" class="container-small" method="post" action="/" enctype="application/x-www-form-urlencoded" novalidate>"#,
    );
    html.push_str(EVENT_SCHEDULE);
    html.push_str(csrf_input);
    if let Some(notice) = notice {
        let _ = write!(html, r#"<div class="notification error" role="alert">{}</div>"#, escape(notice));
    }
    for (title, fields) in SECTIONS {
        let _ = write!(html, "<section><h2>{}</h2>", escape(title));
        for field in fields {
            html.push_str(&field_html(*field, data, errors));
        }
        html.push_str("</section>");
    }
    html.push_str(r#"<button type="submit">Wyślij zgłoszenie</button></form>"#);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::fixtures::valid_form;
    use crate::form::validate_form;

    #[test]
    fn every_form_field_is_rendered_once() {
        let html = registration_form(&FormData::default(), &FormErrors::default(), "", None);
        for field in Field::form_fields() {
            assert_eq!(
                html.matches(&format!(r#"id="field-{}""#, field.name())).count(),
                1,
                "{field:?}"
            );
        }
        assert!(!html.contains("field-submissionDateTime"));
        assert_eq!(html.matches(r#"class="schedule""#).count(), 1);
        assert!(html.contains("<p>31.07.2025 r., do godz. 11:00</p>"));
        assert!(html.contains("<p>03.08.2025 r., od godz. 16:00</p>"));
    }

    #[test]
    fn errors_and_values_are_shown() {
        let mut data = valid_form();
        data.company_name = "Smaki \"Pomorza\"".to_owned();
        data.email = "zly".to_owned();
        let errors = validate_form(&data).unwrap_err();
        let html = registration_form(&data, &errors, "", Some(crate::form::FORM_HAS_ERRORS));
        assert!(html.contains("Smaki &quot;Pomorza&quot;"));
        assert!(html.contains(r#"id="email-error">Proszę podać poprawny adres email</div>"#));
        assert!(html.contains(crate::form::FORM_HAS_ERRORS));
        assert!(html.contains(r#"value="Artyści rękodzielnicy" checked"#));
    }

    #[test]
    fn dimensions_hidden_unless_needed() {
        let mut data = valid_form();
        let html = registration_form(&data, &FormErrors::default(), "", None);
        assert!(html.contains(r#"id="field-boothDimensions" hidden"#));

        data.booth_type = BoothType::FoodTruck.label().to_owned();
        let html = registration_form(&data, &FormErrors::default(), "", None);
        assert!(html.contains(r#"id="field-boothDimensions">"#));
    }
}
