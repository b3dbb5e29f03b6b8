use core::fmt::Write as _;

use jarmark_database::models::SubmissionRecord;
use jarmark_database::schema::Field;

use crate::components::main::escape;

pub const CONFIRMATION: &str =
    "Formularz został pomyślnie wypełniony. Oto podsumowanie zgłoszenia:";

const GROUPS: [(&str, &[Field]); 5] = [
    (
        "Informacje podstawowe",
        &[
            Field::SubmissionDateTime,
            Field::FirstName,
            Field::LastName,
            Field::CompanyName,
            Field::Nip,
            Field::Email,
            Field::Phone,
        ],
    ),
    ("Adres", &[Field::Street, Field::City, Field::PostalCode]),
    (
        "Informacje o stoisku",
        &[
            Field::Category,
            Field::Location1,
            Field::Location2,
            Field::Location3,
            Field::BoothType,
            Field::BoothDimensions,
            Field::PowerConnection,
        ],
    ),
    ("Asortyment", &[Field::Products]),
    (
        "Inne informacje",
        &[
            Field::ParticipatedLastYear,
            Field::NeedsParking,
            Field::Notes,
            Field::AcceptTerms,
            Field::AcceptPrivacy,
        ],
    ),
];

/// Every stored value under its group heading. Empty values are left out.
#[must_use]
pub fn summary(record: &SubmissionRecord) -> String {
    let mut html = String::from(r#"<div class="summary">"#);
    for (title, fields) in GROUPS {
        let _ = write!(html, "<h3>{}</h3><dl>", escape(title));
        for field in fields {
            let value = record.value(*field).display();
            if value.trim().is_empty() {
                continue;
            }
            let _ = write!(
                html,
                "<dt>{}</dt><dd>{}</dd>",
                escape(field.label()),
                escape(&value)
            );
        }
        html.push_str("</dl>");
    }
    html.push_str("</div>");
    html
}

#[must_use]
pub fn confirmation(record: &SubmissionRecord) -> String {
    format!(
        r#"<h1 class="center">Dziękujemy za zgłoszenie!</h1>
<div class="container-small">
<p>{CONFIRMATION}</p>
{}
<div class="actions print-hidden">
    <a href="/">Wypełnij nowy formularz</a>
    <button type="button" data-print>Drukuj / Zapisz PDF</button>
</div>
</div>"#,
        summary(record)
    )
}
