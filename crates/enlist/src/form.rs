//! Registration form.
//!
//! Holds the editable draft, checks required fields, and appends the finished
//! record to a [`RecordStore`]. Required-field checks live here rather than in
//! whatever front end fills the draft, so every caller gets the same rules.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Result, ValidationError};
use crate::record::{Availability, Experience, Registration, RegistrationType};
use crate::store::RecordStore;

/// Message attached to a missing required field.
const REQUIRED: &str = "is required";

/// The seven inputs of the registration form, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Full name.
    Name,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Volunteer or intern.
    Type,
    /// Previous experience.
    Experience,
    /// Availability.
    Availability,
    /// Motivation text.
    Motivation,
}

impl FormField {
    /// Every field, in form order.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Type,
        Self::Experience,
        Self::Availability,
        Self::Motivation,
    ];

    /// Field name as used in stored records and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Type => "type",
            Self::Experience => "experience",
            Self::Availability => "availability",
            Self::Motivation => "motivation",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The form's editable state. Everything starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Volunteer or intern.
    pub registration_type: Option<RegistrationType>,
    /// Previous experience.
    pub experience: Option<Experience>,
    /// Availability.
    pub availability: Option<Availability>,
    /// Motivation text.
    pub motivation: String,
}

impl RegistrationDraft {
    /// An empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one field from its textual value.
    ///
    /// Choice fields take their stored value (`"volunteer"`, `"part-time"`, ...).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the field when a choice value is
    /// not one of the offered options. The draft is left unchanged.
    pub fn set(
        &mut self,
        field: FormField,
        value: &str,
    ) -> std::result::Result<(), ValidationError> {
        match field {
            FormField::Name => self.name = value.to_string(),
            FormField::Email => self.email = value.to_string(),
            FormField::Phone => self.phone = value.to_string(),
            FormField::Motivation => self.motivation = value.to_string(),
            FormField::Type => self.registration_type = parse_choice(field, value)?,
            FormField::Experience => self.experience = parse_choice(field, value)?,
            FormField::Availability => self.availability = parse_choice(field, value)?,
        }
        Ok(())
    }

    /// Set several fields, then check the whole draft.
    ///
    /// Unknown choice values and missing fields are reported together, in
    /// form order. A field with an unknown value is not also reported as
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every offending field.
    pub fn fill<'v>(
        &mut self,
        values: impl IntoIterator<Item = (FormField, &'v str)>,
    ) -> std::result::Result<ValidDraft, ValidationError> {
        let mut unknown = ValidationError::default();
        for (field, value) in values {
            if let Err(e) = self.set(field, value) {
                unknown.fields.extend(e.fields);
            }
        }

        match self.validate() {
            Ok(valid) if unknown.is_empty() => Ok(valid),
            Ok(_) => Err(unknown),
            Err(missing) => {
                let mut merged = ValidationError::default();
                for field in FormField::ALL {
                    let name = field.as_str();
                    let source = if unknown.has_field(name) {
                        &unknown
                    } else {
                        &missing
                    };
                    merged
                        .fields
                        .extend(source.fields.iter().filter(|f| f.field == name).cloned());
                }
                Err(merged)
            }
        }
    }

    /// True when no field has been filled in.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every missing field in form order.
    pub fn validate(&self) -> std::result::Result<ValidDraft, ValidationError> {
        let mut errors = ValidationError::default();

        for (field, value) in [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Phone, &self.phone),
        ] {
            if value.trim().is_empty() {
                errors.push(field.as_str(), REQUIRED);
            }
        }
        if self.registration_type.is_none() {
            errors.push(FormField::Type.as_str(), REQUIRED);
        }
        if self.experience.is_none() {
            errors.push(FormField::Experience.as_str(), REQUIRED);
        }
        if self.availability.is_none() {
            errors.push(FormField::Availability.as_str(), REQUIRED);
        }
        if self.motivation.trim().is_empty() {
            errors.push(FormField::Motivation.as_str(), REQUIRED);
        }

        match (self.registration_type, self.experience, self.availability) {
            (Some(registration_type), Some(experience), Some(availability))
                if errors.is_empty() =>
            {
                Ok(ValidDraft {
                    name: self.name.clone(),
                    email: self.email.clone(),
                    phone: self.phone.clone(),
                    registration_type,
                    experience,
                    availability,
                    motivation: self.motivation.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Blank input clears the choice.
fn parse_choice<T>(field: FormField, value: &str) -> std::result::Result<Option<T>, ValidationError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if value.trim().is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|e: T::Err| {
        let mut errors = ValidationError::default();
        errors.push(field.as_str(), e.to_string());
        errors
    })
}

/// A draft whose required fields are all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    name: String,
    email: String,
    phone: String,
    registration_type: RegistrationType,
    experience: Experience,
    availability: Availability,
    motivation: String,
}

impl ValidDraft {
    /// Build the record with its identity and timestamp.
    #[must_use]
    pub fn into_registration(self, id: String, registered_at: DateTime<Utc>) -> Registration {
        Registration {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            registration_type: self.registration_type,
            experience: self.experience,
            availability: self.availability,
            motivation: self.motivation,
            registered_at,
        }
    }
}

/// Notification shown after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Headline.
    pub title: String,
    /// Body naming the registrant and role.
    pub message: String,
    /// The stored record.
    pub record: Registration,
    /// Store sequence number of the record.
    pub seq: u64,
}

impl Confirmation {
    fn new(record: Registration, seq: u64) -> Self {
        Self {
            title: "Registration Successful!".to_string(),
            message: format!(
                "Welcome {}! Your registration as a {} has been submitted.",
                record.name, record.registration_type
            ),
            record,
            seq,
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.message)
    }
}

/// The registration form bound to a store.
#[derive(Debug)]
pub struct RegistrationForm<'a> {
    store: &'a dyn RecordStore,
    draft: RegistrationDraft,
}

impl<'a> RegistrationForm<'a> {
    /// A form with an empty draft.
    #[must_use]
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self {
            store,
            draft: RegistrationDraft::default(),
        }
    }

    /// The current draft.
    #[must_use]
    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// The current draft, for editing.
    pub fn draft_mut(&mut self) -> &mut RegistrationDraft {
        &mut self.draft
    }

    /// Validate the draft, store it, and reset the form.
    ///
    /// The draft is only cleared once the store has accepted the record.
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every missing field, or the store's
    /// error if the append fails. The draft is kept in both cases.
    pub fn submit(&mut self) -> Result<Confirmation> {
        let valid = self.draft.validate()?;
        let record = valid.into_registration(Registration::generate_id(), Utc::now());
        debug!(id = %record.id, store = self.store.name(), "Submitting registration");

        let seq = self.store.append(&record)?;
        info!(
            id = %record.id,
            seq,
            registration_type = %record.registration_type,
            "Registration stored"
        );

        self.draft = RegistrationDraft::default();
        Ok(Confirmation::new(record, seq))
    }
}
