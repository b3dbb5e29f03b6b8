//! Column layout of a stored submission.
//!
//! The declaration order of [`Field`] is the column order of every export:
//! the submission timestamp first, then the form fields in the order the
//! vendor fills them in.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    SubmissionDateTime,
    CompanyName,
    FirstName,
    LastName,
    Street,
    PostalCode,
    City,
    Nip,
    Email,
    Phone,
    ParticipatedLastYear,
    Category,
    BoothType,
    BoothDimensions,
    PowerConnection,
    Products,
    Notes,
    NeedsParking,
    Location1,
    Location2,
    Location3,
    AcceptTerms,
    AcceptPrivacy,
}

impl Field {
    /// Key used in the persisted JSON and in form submissions.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Every column, in export order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// The fields a vendor fills in, in form order.
    pub fn form_fields() -> impl Iterator<Item = Self> {
        Self::iter().filter(|field| *field != Self::SubmissionDateTime)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubmissionDateTime => "Data i godzina zgłoszenia",
            Self::CompanyName => "Pełna nazwa firmy",
            Self::FirstName => "Imię",
            Self::LastName => "Nazwisko",
            Self::Street => "Ulica",
            Self::PostalCode => "Kod pocztowy",
            Self::City => "Miejscowość",
            Self::Nip => "NIP",
            Self::Email => "Adres e-mail",
            Self::Phone => "Numer telefonu",
            Self::ParticipatedLastYear => {
                "Czy uczestniczył/a Pan/Pani w Jarmarku Bałtyckim w 2024 roku?"
            }
            Self::Category => "Kategoria wystawcy",
            Self::BoothType => "Rodzaj stoiska",
            Self::BoothDimensions => "Wymiary namiotu/food trucka",
            Self::PowerConnection => "Podłączenie do prądu",
            Self::Products => "Asortyment sprzedaży",
            Self::Notes => "Uwagi",
            Self::NeedsParking => "Czy potrzebne jest miejsce parkingowe dla auta?",
            Self::Location1 => "Pierwszy wybór lokalizacji",
            Self::Location2 => "Drugi wybór lokalizacji",
            Self::Location3 => "Trzeci wybór lokalizacji",
            Self::AcceptTerms => "Akceptacja regulaminu Jarmarku Bałtyckiego",
            Self::AcceptPrivacy => "Zgoda na przetwarzanie danych osobowych",
        }
    }

    /// Explanation shown on the second sheet of the spreadsheet export.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SubmissionDateTime => "Data i godzina przesłania zgłoszenia",
            Self::CompanyName => "Pełna nazwa firmy, pod którą prowadzona jest działalność",
            Self::FirstName => "Imię osoby odpowiedzialnej za zgłoszenie",
            Self::LastName => "Nazwisko osoby odpowiedzialnej za zgłoszenie",
            Self::Street => "Nazwa ulicy wraz z numerem budynku/lokalu",
            Self::PostalCode => "Format: XX-XXX",
            Self::City => "Nazwa miejscowości",
            Self::Nip => "10-cyfrowy Numer Identyfikacji Podatkowej",
            Self::Email => "Adres e-mail do kontaktu",
            Self::Phone => "Numer telefonu do szybkiego kontaktu",
            Self::ParticipatedLastYear => "Informacja o uczestnictwie w poprzedniej edycji Jarmarku",
            Self::Category => "Kategoria działalności wystawcy",
            Self::BoothType => "Rodzaj i wymiary stoiska handlowego",
            Self::BoothDimensions => "Dokładne wymiary namiotu lub food trucka (jeśli dotyczy)",
            Self::PowerConnection => "Informacja o wymaganym podłączeniu do prądu",
            Self::Products => "Szczegółowy asortyment produktów oferowanych podczas Jarmarku",
            Self::Notes => "Dodatkowe informacje dla organizatora (pole opcjonalne)",
            Self::NeedsParking => "Informacja o zapotrzebowaniu na miejsce parkingowe",
            Self::Location1 => "Preferowana lokalizacja stoiska - pierwszy wybór",
            Self::Location2 => "Preferowana lokalizacja stoiska - drugi wybór",
            Self::Location3 => "Preferowana lokalizacja stoiska - trzeci wybór",
            Self::AcceptTerms => "Potwierdzenie zapoznania się i akceptacji regulaminu Jarmarku",
            Self::AcceptPrivacy => "Zgoda na przetwarzanie danych osobowych zgodnie z RODO",
        }
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr as _;

    use super::*;

    #[test]
    fn timestamp_leads_the_export_order() {
        let all: Vec<Field> = Field::all().collect();
        assert_eq!(all.len(), 23);
        assert_eq!(all[0], Field::SubmissionDateTime);
        assert_eq!(all[1], Field::CompanyName);
        assert_eq!(all[22], Field::AcceptPrivacy);
        assert_eq!(Field::form_fields().count(), 22);
    }

    #[test]
    fn names_are_camel_case_keys() {
        assert_eq!(Field::SubmissionDateTime.name(), "submissionDateTime");
        assert_eq!(Field::Nip.name(), "nip");
        assert_eq!(Field::Location2.name(), "location2");
        assert_eq!(Field::from_str("boothDimensions").ok(), Some(Field::BoothDimensions));
        assert!(Field::from_str("unknown").is_err());
    }
}
