//! # Signup Validation Pipeline
//!
//! Field rules, phone auto-formatting, password strength scoring, and the
//! form controller that ties them together.
//!
//! The rule functions are pure so they can be tested without any rendering
//! or storage environment; the `SignupForm` controller owns the field
//! values and per-field statuses and drives the rules on input/blur/submit.

use std::collections::BTreeMap;

use regex::Regex;

use crate::draft::{Draft, FieldValue};

pub const AGGREGATE_ERROR: &str = "Please fix the errors below before submitting.";
pub const SUCCESS_MESSAGE: &str = "Account created successfully! Welcome to DoNation!";

/// Fields making up the signup form, keyed by their original form names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Password,
    ConfirmPassword,
    UserType,
    Interests,
    Newsletter,
    Terms,
}

/// Fields that must pass validation before a submission goes through.
/// The terms checkbox is checked separately on top of these.
pub const REQUIRED_FIELDS: [Field; 7] = [
    Field::FirstName,
    Field::LastName,
    Field::Email,
    Field::Phone,
    Field::Password,
    Field::ConfirmPassword,
    Field::UserType,
];

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::UserType => "userType",
            Field::Interests => "interests",
            Field::Newsletter => "newsletter",
            Field::Terms => "terms",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Email => "Email",
            Field::Phone => "Phone Number",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm Password",
            Field::UserType => "User Type",
            Field::Interests => "Interests",
            Field::Newsletter => "Newsletter",
            Field::Terms => "Terms",
        }
    }

    pub fn required(&self) -> bool {
        REQUIRED_FIELDS.contains(self)
    }
}

/// Visual status of a field: untouched, failed with a message, or passed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldStatus {
    #[default]
    Neutral,
    Invalid(String),
    Valid,
}

pub fn is_valid_email(email: &str) -> bool {
    let pattern = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    pattern.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    let pattern = Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").unwrap();

    pattern.is_match(phone)
}

pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Progressive `(XXX) XXX-XXXX` formatting, applied on every keystroke.
/// Digits beyond the tenth are dropped; fewer than three digits are left
/// bare.
pub fn format_phone(input: &str) -> String {
    let mut digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.truncate(10);

    if digits.len() >= 6 {
        format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..])
    } else if digits.len() >= 3 {
        format!("({}) {}", &digits[0..3], &digits[3..])
    } else {
        digits
    }
}

/// Count of satisfied strength criteria, 0 through 5.
pub fn password_score(password: &str) -> u8 {
    let mut score = 0;

    if password.len() >= 8 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }

    score
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthTier {
    Weak,
    Medium,
    Strong,
}

impl StrengthTier {
    pub fn from_score(score: u8) -> Self {
        if score < 2 {
            StrengthTier::Weak
        } else if score < 4 {
            StrengthTier::Medium
        } else {
            StrengthTier::Strong
        }
    }

    /// Filled bars out of [`METER_SEGMENTS`].
    pub fn bars(&self) -> usize {
        match self {
            StrengthTier::Weak => 1,
            StrengthTier::Medium => 2,
            StrengthTier::Strong => 3,
        }
    }
}

pub const METER_SEGMENTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthMeter {
    pub tier: StrengthTier,
    pub segments: [bool; METER_SEGMENTS],
}

/// Strength indicator redrawn on every password keystroke; absent entirely
/// while the field is empty.
pub fn strength_meter(password: &str) -> Option<StrengthMeter> {
    if password.is_empty() {
        return None;
    }

    let tier = StrengthTier::from_score(password_score(password));
    let mut segments = [false; METER_SEGMENTS];

    for segment in segments.iter_mut().take(tier.bars()) {
        *segment = true;
    }

    Some(StrengthMeter { tier, segments })
}

/// Per-field rule. `password` is the current password value, needed for
/// the confirmation check.
pub fn validate_field(field: Field, value: &str, password: &str) -> Result<(), String> {
    let value = value.trim();

    if field.required() && value.is_empty() {
        return Err(format!("{} is required", field.label()));
    }

    if value.is_empty() {
        return Ok(());
    }

    match field {
        Field::FirstName | Field::LastName if value.chars().count() < 2 => {
            Err("Name must be at least 2 characters long".to_string())
        }
        Field::Email if !is_valid_email(value) => {
            Err("Please enter a valid email address".to_string())
        }
        Field::Phone if !is_valid_phone(value) => {
            Err("Please enter a valid phone number".to_string())
        }
        Field::Password if !is_valid_password(value) => Err(
            "Password must be at least 8 characters with uppercase, lowercase, and number"
                .to_string(),
        ),
        Field::ConfirmPassword if value != password => Err("Passwords do not match".to_string()),
        _ => Ok(()),
    }
}

/// The signup form: field values, checkbox state, and per-field statuses.
/// Owned by the page/controller instance rather than living as globals.
#[derive(Debug, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: String,
    pub interests: Vec<String>,
    pub newsletter: bool,
    pub terms: bool,
    statuses: BTreeMap<Field, FieldStatus>,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
            Field::UserType => &self.user_type,
            Field::Interests | Field::Newsletter | Field::Terms => "",
        }
    }

    pub fn status(&self, field: Field) -> FieldStatus {
        self.statuses.get(&field).cloned().unwrap_or_default()
    }

    /// A keystroke: store the value (phone is auto-formatted) and clear
    /// any error on that field immediately.
    pub fn input(&mut self, field: Field, text: &str) {
        let value = match field {
            Field::Phone => format_phone(text),
            _ => text.to_string(),
        };

        match field {
            Field::FirstName => self.first_name = value,
            Field::LastName => self.last_name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Password => self.password = value,
            Field::ConfirmPassword => self.confirm_password = value,
            Field::UserType => self.user_type = value,
            Field::Interests | Field::Newsletter | Field::Terms => {}
        }

        self.statuses.insert(field, FieldStatus::Neutral);
    }

    pub fn set_terms(&mut self, checked: bool) {
        self.terms = checked;
        self.statuses.insert(Field::Terms, FieldStatus::Neutral);
    }

    pub fn set_newsletter(&mut self, checked: bool) {
        self.newsletter = checked;
    }

    pub fn toggle_interest(&mut self, interest: &str, checked: bool) {
        if checked {
            if !self.interests.iter().any(|i| i == interest) {
                self.interests.push(interest.to_string());
            }
        } else {
            self.interests.retain(|i| i != interest);
        }
    }

    /// Losing focus re-validates the field.
    pub fn blur(&mut self, field: Field) -> bool {
        let status = match validate_field(field, self.value(field), &self.password) {
            Ok(()) => FieldStatus::Valid,
            Err(message) => FieldStatus::Invalid(message),
        };

        let ok = status == FieldStatus::Valid;
        self.statuses.insert(field, status);

        ok
    }

    /// Whole-form pass on submit: every required field plus the terms
    /// checkbox. Field statuses are left behind so individual errors stay
    /// visible under the aggregate notice.
    pub fn validate_all(&mut self) -> bool {
        let mut ok = true;

        for field in REQUIRED_FIELDS {
            if !self.blur(field) {
                ok = false;
            }
        }

        if !self.terms {
            self.statuses.insert(
                Field::Terms,
                FieldStatus::Invalid("You must agree to the terms and conditions".to_string()),
            );
            ok = false;
        }

        ok
    }

    pub fn errors(&self) -> Vec<(Field, &str)> {
        self.statuses
            .iter()
            .filter_map(|(field, status)| match status {
                FieldStatus::Invalid(message) => Some((*field, message.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Snapshot of the whole field-name to value(s) mapping, shaped the
    /// way the auto-save store expects it: checked boxes as the `"on"`
    /// sentinel, checkbox groups multi-valued.
    pub fn draft(&self) -> Draft {
        let mut draft = Draft::new();

        for field in REQUIRED_FIELDS {
            draft.insert(
                field.name().to_string(),
                FieldValue::One(self.value(field).to_string()),
            );
        }

        match self.interests.as_slice() {
            [] => {}
            [one] => {
                draft.insert(
                    Field::Interests.name().to_string(),
                    FieldValue::One(one.clone()),
                );
            }
            many => {
                draft.insert(
                    Field::Interests.name().to_string(),
                    FieldValue::Many(many.to_vec()),
                );
            }
        }

        if self.newsletter {
            draft.insert(
                Field::Newsletter.name().to_string(),
                FieldValue::One("on".to_string()),
            );
        }
        if self.terms {
            draft.insert(
                Field::Terms.name().to_string(),
                FieldValue::One("on".to_string()),
            );
        }

        draft
    }

    /// Repopulates fields from a saved draft: checkboxes by presence of
    /// the `"on"` sentinel, everything else by direct assignment.
    pub fn populate(&mut self, draft: &Draft) {
        for field in REQUIRED_FIELDS {
            if let Some(FieldValue::One(value)) = draft.get(field.name()) {
                match field {
                    Field::FirstName => self.first_name = value.clone(),
                    Field::LastName => self.last_name = value.clone(),
                    Field::Email => self.email = value.clone(),
                    Field::Phone => self.phone = value.clone(),
                    Field::Password => self.password = value.clone(),
                    Field::ConfirmPassword => self.confirm_password = value.clone(),
                    Field::UserType => self.user_type = value.clone(),
                    _ => {}
                }
            }
        }

        self.interests = match draft.get(Field::Interests.name()) {
            Some(FieldValue::One(one)) => vec![one.clone()],
            Some(FieldValue::Many(many)) => many.clone(),
            None => Vec::new(),
        };

        self.newsletter = matches!(
            draft.get(Field::Newsletter.name()),
            Some(FieldValue::One(v)) if v == "on"
        );
        self.terms = matches!(
            draft.get(Field::Terms.name()),
            Some(FieldValue::One(v)) if v == "on"
        );
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rule() {
        assert!(!is_valid_email("a@b"));
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
    }

    #[test]
    fn test_phone_rule() {
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(!is_valid_phone("5551234567"));
        assert!(!is_valid_phone("(555) 123-45678"));
    }

    #[test]
    fn test_phone_formatting() {
        assert_eq!(format_phone("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone("555"), "(555) ");
        assert_eq!(format_phone("55512"), "(555) 12");
        assert_eq!(format_phone("55"), "55");
        assert_eq!(format_phone("555-123-4567 ext 89"), "(555) 123-4567");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn test_password_rule() {
        assert!(is_valid_password("Abcdefg1"));
        assert!(!is_valid_password("abcdefg1"));
        assert!(!is_valid_password("ABCDEFG1"));
        assert!(!is_valid_password("Abcdefgh"));
        assert!(!is_valid_password("Abc1"));
    }

    #[test]
    fn test_strength_score_and_tier() {
        assert_eq!(password_score("Abcdefg1"), 4);
        assert_eq!(StrengthTier::from_score(4), StrengthTier::Strong);

        assert_eq!(password_score("abc"), 1);
        assert_eq!(StrengthTier::from_score(1), StrengthTier::Weak);

        assert_eq!(password_score("abcdefgh"), 2);
        assert_eq!(StrengthTier::from_score(2), StrengthTier::Medium);

        assert_eq!(password_score("Abcdef1!"), 5);
    }

    #[test]
    fn test_strength_meter() {
        assert!(strength_meter("").is_none());

        let meter = strength_meter("Abcdefg1").unwrap();
        assert_eq!(meter.tier, StrengthTier::Strong);
        assert_eq!(meter.segments, [true, true, true, false]);

        let meter = strength_meter("abc").unwrap();
        assert_eq!(meter.segments, [true, false, false, false]);
    }

    #[test]
    fn test_required_message_uses_label() {
        assert_eq!(
            validate_field(Field::Phone, "", ""),
            Err("Phone Number is required".to_string())
        );
    }

    #[test]
    fn test_blur_and_input_cycle() {
        let mut form = SignupForm::new();

        form.input(Field::Email, "not-an-email");
        assert_eq!(form.status(Field::Email), FieldStatus::Neutral);

        form.blur(Field::Email);
        assert!(matches!(form.status(Field::Email), FieldStatus::Invalid(_)));

        // editing clears the error right away, before any re-validation
        form.input(Field::Email, "jane@example.com");
        assert_eq!(form.status(Field::Email), FieldStatus::Neutral);

        form.blur(Field::Email);
        assert_eq!(form.status(Field::Email), FieldStatus::Valid);
    }

    #[test]
    fn test_phone_input_is_formatted() {
        let mut form = SignupForm::new();

        form.input(Field::Phone, "5551234567");
        assert_eq!(form.phone, "(555) 123-4567");
        assert!(form.blur(Field::Phone));
    }

    #[test]
    fn test_confirm_password_tracks_password() {
        let mut form = SignupForm::new();

        form.input(Field::Password, "Abcdefg1");
        form.input(Field::ConfirmPassword, "Abcdefg2");
        assert!(!form.blur(Field::ConfirmPassword));

        form.input(Field::ConfirmPassword, "Abcdefg1");
        assert!(form.blur(Field::ConfirmPassword));
    }

    fn filled_form() -> SignupForm {
        let mut form = SignupForm::new();
        form.input(Field::FirstName, "Jane");
        form.input(Field::LastName, "Doe");
        form.input(Field::Email, "jane@example.com");
        form.input(Field::Phone, "5551234567");
        form.input(Field::Password, "Abcdefg1");
        form.input(Field::ConfirmPassword, "Abcdefg1");
        form.input(Field::UserType, "donor");
        form.set_terms(true);
        form
    }

    #[test]
    fn test_validate_all_passes_filled_form() {
        let mut form = filled_form();
        assert!(form.validate_all());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_validate_all_requires_terms() {
        let mut form = filled_form();
        form.set_terms(false);

        assert!(!form.validate_all());
        let errors = form.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, Field::Terms);
    }

    #[test]
    fn test_validate_all_keeps_field_errors_visible() {
        let mut form = filled_form();
        form.input(Field::Email, "nope");

        assert!(!form.validate_all());
        assert!(matches!(form.status(Field::Email), FieldStatus::Invalid(_)));
        // the rest stays marked valid from the same pass
        assert_eq!(form.status(Field::FirstName), FieldStatus::Valid);
    }

    #[test]
    fn test_draft_round_trip() {
        let mut form = filled_form();
        form.toggle_interest("education", true);
        form.toggle_interest("hunger", true);
        form.set_newsletter(true);

        let draft = form.draft();
        assert_eq!(
            draft.get("firstName"),
            Some(&FieldValue::One("Jane".to_string()))
        );
        assert_eq!(
            draft.get("interests"),
            Some(&FieldValue::Many(vec![
                "education".to_string(),
                "hunger".to_string()
            ]))
        );
        assert_eq!(
            draft.get("newsletter"),
            Some(&FieldValue::One("on".to_string()))
        );

        let mut restored = SignupForm::new();
        restored.populate(&draft);
        assert_eq!(restored.first_name, "Jane");
        assert_eq!(restored.phone, "(555) 123-4567");
        assert_eq!(restored.interests, vec!["education", "hunger"]);
        assert!(restored.newsletter);
        assert!(restored.terms);
    }

    #[test]
    fn test_populate_single_interest() {
        let mut draft = Draft::new();
        draft.insert(
            "interests".to_string(),
            FieldValue::One("environment".to_string()),
        );

        let mut form = SignupForm::new();
        form.populate(&draft);
        assert_eq!(form.interests, vec!["environment"]);
        assert!(!form.newsletter);
    }
}
