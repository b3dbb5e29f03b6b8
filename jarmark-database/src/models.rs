use std::borrow::Cow;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::schema::Field;

/// Shape of `submissionDateTime`, sortable as plain text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The TAK/NIE answer used for every yes/no question of the form.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum YesNo {
    #[serde(rename = "TAK")]
    #[strum(serialize = "TAK")]
    Tak,
    #[default]
    #[serde(rename = "NIE")]
    #[strum(serialize = "NIE")]
    Nie,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum Category {
    #[serde(rename = "Artyści rękodzielnicy")]
    #[strum(serialize = "Artyści rękodzielnicy")]
    Artisans,
    #[serde(rename = "Wytwórcy produktów tradycyjnych i regionalnych z województwa zachodniopomorskiego")]
    #[strum(serialize = "Wytwórcy produktów tradycyjnych i regionalnych z województwa zachodniopomorskiego")]
    RegionalProducers,
    #[serde(rename = "Producenci artykułów spożywczych")]
    #[strum(serialize = "Producenci artykułów spożywczych")]
    FoodProducers,
    #[serde(rename = "Winiarze i producenci nalewek")]
    #[strum(serialize = "Winiarze i producenci nalewek")]
    Winemakers,
    #[serde(rename = "Gastronomia")]
    #[strum(serialize = "Gastronomia")]
    Gastronomy,
    #[serde(rename = "Pozostali (np. pośrednicy, handlarze itp.)")]
    #[strum(serialize = "Pozostali (np. pośrednicy, handlarze itp.)")]
    Others,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum BoothType {
    #[serde(rename = "Namiot organizatora – 3 m × 3 m")]
    #[strum(serialize = "Namiot organizatora – 3 m × 3 m")]
    OrganizerTent,
    #[serde(rename = "Namiot własny – 3 m × 3 m")]
    #[strum(serialize = "Namiot własny – 3 m × 3 m")]
    OwnTent,
    #[serde(rename = "Namiot własny, inny wymiar")]
    #[strum(serialize = "Namiot własny, inny wymiar")]
    CustomSizeTent,
    #[serde(rename = "Food truck / przyczepa")]
    #[strum(serialize = "Food truck / przyczepa")]
    FoodTruck,
}

impl BoothType {
    /// Booths without a fixed size have to state their dimensions.
    #[must_use]
    pub const fn requires_dimensions(self) -> bool {
        matches!(self, Self::CustomSizeTent | Self::FoodTruck)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum PowerConnection {
    #[serde(rename = "Do 2 kW – 200 zł + VAT")]
    #[strum(serialize = "Do 2 kW – 200 zł + VAT")]
    UpTo2Kw,
    #[serde(rename = "Do 6 kW – 500 zł + VAT")]
    #[strum(serialize = "Do 6 kW – 500 zł + VAT")]
    UpTo6Kw,
    #[serde(rename = "Powyżej 6 kW – cena do uzgodnienia")]
    #[strum(serialize = "Powyżej 6 kW – cena do uzgodnienia")]
    Above6Kw,
    #[serde(rename = "Brak – zakaz podłączenia do prądu")]
    #[strum(serialize = "Brak – zakaz podłączenia do prądu")]
    NoConnection,
}

macro_rules! label {
    ($($name:ident)*) => {
        $(
            impl $name {
                #[must_use]
                pub fn label(self) -> &'static str {
                    self.into()
                }
            }
        )*
    };
}

label!(YesNo Category BoothType PowerConnection);

/// A registration that passed validation but is not stored yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub nip: String,
    pub email: String,
    pub phone: String,
    pub participated_last_year: YesNo,
    pub category: Category,
    pub booth_type: BoothType,
    #[serde(default)]
    pub booth_dimensions: String,
    pub power_connection: PowerConnection,
    pub products: String,
    #[serde(default)]
    pub notes: String,
    pub needs_parking: YesNo,
    pub location1: String,
    pub location2: String,
    pub location3: String,
    pub accept_terms: bool,
    pub accept_privacy: bool,
}

/// A stored registration. `id` and `submission_date_time` are assigned once
/// when the submission is appended and never change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub submission_date_time: String,
    #[serde(flatten)]
    pub submission: NewSubmission,
}

impl SubmissionRecord {
    #[must_use]
    pub fn stamp(submission: NewSubmission, submitted_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            submission_date_time: submitted_at.format(TIMESTAMP_FORMAT).to_string(),
            submission,
        }
    }

    #[must_use]
    pub fn stamp_now(submission: NewSubmission) -> Self {
        Self::stamp(submission, Local::now().naive_local())
    }

    #[must_use]
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        let s = &self.submission;
        match field {
            Field::SubmissionDateTime => FieldValue::Text(&self.submission_date_time),
            Field::CompanyName => FieldValue::Text(&s.company_name),
            Field::FirstName => FieldValue::Text(&s.first_name),
            Field::LastName => FieldValue::Text(&s.last_name),
            Field::Street => FieldValue::Text(&s.street),
            Field::PostalCode => FieldValue::Text(&s.postal_code),
            Field::City => FieldValue::Text(&s.city),
            Field::Nip => FieldValue::Text(&s.nip),
            Field::Email => FieldValue::Text(&s.email),
            Field::Phone => FieldValue::Text(&s.phone),
            Field::ParticipatedLastYear => FieldValue::Text(s.participated_last_year.label()),
            Field::Category => FieldValue::Text(s.category.label()),
            Field::BoothType => FieldValue::Text(s.booth_type.label()),
            Field::BoothDimensions => FieldValue::Text(&s.booth_dimensions),
            Field::PowerConnection => FieldValue::Text(s.power_connection.label()),
            Field::Products => FieldValue::Text(&s.products),
            Field::Notes => FieldValue::Text(&s.notes),
            Field::NeedsParking => FieldValue::Text(s.needs_parking.label()),
            Field::Location1 => FieldValue::Text(&s.location1),
            Field::Location2 => FieldValue::Text(&s.location2),
            Field::Location3 => FieldValue::Text(&s.location3),
            Field::AcceptTerms => FieldValue::Flag(s.accept_terms),
            Field::AcceptPrivacy => FieldValue::Flag(s.accept_privacy),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
}

impl<'a> FieldValue<'a> {
    /// Checkboxes render as TAK/NIE, text as is.
    #[must_use]
    pub fn display(self) -> Cow<'a, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Flag(flag) => Cow::Borrowed(format_flag(flag)),
        }
    }
}

#[must_use]
pub const fn format_flag(value: bool) -> &'static str {
    if value {
        "TAK"
    } else {
        "NIE"
    }
}

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn submission() -> NewSubmission {
        NewSubmission {
            company_name: "Bursztynowa Pracownia".to_owned(),
            first_name: "Anna".to_owned(),
            last_name: "Kowalska".to_owned(),
            street: "ul. Portowa 5".to_owned(),
            postal_code: "80-231".to_owned(),
            city: "Gdańsk".to_owned(),
            nip: "5840000000".to_owned(),
            email: "anna@bursztyn.pl".to_owned(),
            phone: "+48 600 100 200".to_owned(),
            participated_last_year: YesNo::Tak,
            category: Category::Artisans,
            booth_type: BoothType::OrganizerTent,
            booth_dimensions: String::new(),
            power_connection: PowerConnection::UpTo2Kw,
            products: "biżuteria z bursztynu".to_owned(),
            notes: String::new(),
            needs_parking: YesNo::Nie,
            location1: "A1".to_owned(),
            location2: "A2".to_owned(),
            location3: "B4".to_owned(),
            accept_terms: true,
            accept_privacy: true,
        }
    }
}
