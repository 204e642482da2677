//! Core registration types for enlist.
//!
//! This module defines the registration record and the fixed enumerations its
//! fields are drawn from. The serialized form matches the JSON layout the
//! browser front end kept in local storage, so records can move between the
//! two without conversion.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error returned when a wire value does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Generates `Display`, `FromStr`, `ALL` and `as_str` for a wire enum.
macro_rules! wire_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in the order the form offers them.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The value stored and exported for this variant.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

/// The role someone registers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationType {
    /// Unpaid community volunteer.
    Volunteer,
    /// Intern.
    Intern,
}

wire_enum!(RegistrationType, "registration type", {
    Volunteer => "volunteer",
    Intern => "intern",
});

impl RegistrationType {
    /// Capitalized label for display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Volunteer => "Volunteer",
            Self::Intern => "Intern",
        }
    }
}

/// Previous experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    /// No previous experience.
    None,
    /// One to two years.
    Some,
    /// Three years or more.
    Experienced,
}

wire_enum!(Experience, "experience level", {
    None => "none",
    Some => "some",
    Experienced => "experienced",
});

impl Experience {
    /// Human-readable description offered on the form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "No previous experience",
            Self::Some => "Some experience (1-2 years)",
            Self::Experienced => "Experienced (3+ years)",
        }
    }
}

/// When the registrant can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// Monday to Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekends,
    /// Any time.
    Flexible,
    /// Part-time hours.
    PartTime,
    /// Full-time hours.
    FullTime,
}

wire_enum!(Availability, "availability", {
    Weekdays => "weekdays",
    Weekends => "weekends",
    Flexible => "flexible",
    PartTime => "part-time",
    FullTime => "full-time",
});

impl Availability {
    /// Human-readable label offered on the form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Weekdays => "Weekdays",
            Self::Weekends => "Weekends",
            Self::Flexible => "Flexible",
            Self::PartTime => "Part-time",
            Self::FullTime => "Full-time",
        }
    }
}

/// A single registration.
///
/// Created once by the registration form and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Opaque unique identifier, time-ordered.
    pub id: String,

    /// Full name.
    pub name: String,

    /// Contact email. Not format-checked.
    pub email: String,

    /// Contact phone number, free text.
    pub phone: String,

    /// Volunteer or intern.
    #[serde(rename = "type")]
    pub registration_type: RegistrationType,

    /// Previous experience.
    pub experience: Experience,

    /// Availability.
    pub availability: Availability,

    /// Why the registrant wants to join.
    pub motivation: String,

    /// When the registration was submitted.
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    /// Generate a fresh record identifier.
    ///
    /// Identifiers are UUID v7, so they sort by creation time.
    #[must_use]
    pub fn generate_id() -> String {
        uuid::Uuid::now_v7().to_string()
    }

    /// Case-insensitive substring match against name or email.
    ///
    /// An empty needle matches every record.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.email.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn sample(name: &str, email: &str, kind: RegistrationType) -> Registration {
        Registration {
            id: Registration::generate_id(),
            name: name.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            registration_type: kind,
            experience: Experience::Some,
            availability: Availability::Weekdays,
            motivation: "m".to_string(),
            registered_at: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_registration_type_display() {
        assert_eq!(RegistrationType::Volunteer.to_string(), "volunteer");
        assert_eq!(RegistrationType::Intern.to_string(), "intern");
    }

    #[test]
    fn test_availability_wire_values() {
        assert_eq!(Availability::PartTime.to_string(), "part-time");
        assert_eq!(Availability::FullTime.to_string(), "full-time");
        assert_eq!(
            "part-time".parse::<Availability>().unwrap(),
            Availability::PartTime
        );
    }

    #[test]
    fn test_from_str_is_case_insensitive_and_trimmed() {
        assert_eq!(
            " Volunteer ".parse::<RegistrationType>().unwrap(),
            RegistrationType::Volunteer
        );
        assert_eq!(
            "EXPERIENCED".parse::<Experience>().unwrap(),
            Experience::Experienced
        );
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "staff".parse::<RegistrationType>().unwrap_err();
        assert_eq!(err.kind, "registration type");
        assert_eq!(err.to_string(), "unknown registration type 'staff'");
    }

    #[test]
    fn test_labels() {
        assert_eq!(Experience::Some.label(), "Some experience (1-2 years)");
        assert_eq!(Availability::PartTime.label(), "Part-time");
        assert_eq!(RegistrationType::Intern.label(), "Intern");
    }

    #[test]
    fn test_generate_id_unique() {
        let a = Registration::generate_id();
        let b = Registration::generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_matches_search() {
        let r = sample("Ada Lovelace", "ada@x.com", RegistrationType::Volunteer);
        assert!(r.matches_search("ada"));
        assert!(r.matches_search("LOVELACE"));
        assert!(r.matches_search("@X.COM"));
        assert!(r.matches_search(""));
        assert!(!r.matches_search("grace"));
    }

    #[test]
    fn test_serialization_uses_browser_layout() {
        let r = sample("Ada", "ada@x.com", RegistrationType::Intern);
        let json = serde_json::to_value(&r).unwrap();

        assert_eq!(json["type"], "intern");
        assert_eq!(json["experience"], "some");
        assert_eq!(json["availability"], "weekdays");
        assert!(json.get("registeredAt").is_some());
        assert!(json.get("registration_type").is_none());
    }

    #[test]
    fn test_deserialize_browser_record() {
        let json = r#"{
            "name": "Grace",
            "email": "grace@navy.mil",
            "phone": "555",
            "type": "volunteer",
            "experience": "experienced",
            "availability": "full-time",
            "motivation": "ships",
            "id": "1718000000000",
            "registeredAt": "2024-06-10T06:13:20.000Z"
        }"#;
        let r: Registration = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, "1718000000000");
        assert_eq!(r.availability, Availability::FullTime);
        assert_eq!(r.registration_type, RegistrationType::Volunteer);
    }

    #[test]
    fn test_deserialize_rejects_unknown_type() {
        let json = r#"{"id":"1","name":"n","email":"e","phone":"p","type":"staff",
            "experience":"none","availability":"weekdays","motivation":"m",
            "registeredAt":"2024-06-10T06:13:20Z"}"#;
        assert!(serde_json::from_str::<Registration>(json).is_err());
    }
}
