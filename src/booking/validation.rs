use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::models::booking::GuestInfo;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
// `\d` would also accept non-ASCII digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone regex"));

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum GuestField {
    FirstName,
    LastName,
    Email,
    Phone,
    SpecialRequests,
}

impl GuestField {
    pub fn value_mut<'a>(&self, info: &'a mut GuestInfo) -> &'a mut String {
        match self {
            GuestField::FirstName => &mut info.first_name,
            GuestField::LastName => &mut info.last_name,
            GuestField::Email => &mut info.email,
            GuestField::Phone => &mut info.phone,
            GuestField::SpecialRequests => &mut info.special_requests,
        }
    }
}

pub type GuestInfoErrors = BTreeMap<GuestField, String>;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GuestInfoValidation {
    pub valid: bool,
    pub errors: GuestInfoErrors,
}

pub fn validate_guest_info(info: &GuestInfo) -> GuestInfoValidation {
    let mut errors = GuestInfoErrors::new();

    if info.first_name.trim().is_empty() {
        errors.insert(GuestField::FirstName, "First name is required".into());
    }

    if info.last_name.trim().is_empty() {
        errors.insert(GuestField::LastName, "Last name is required".into());
    }

    if info.email.trim().is_empty() {
        errors.insert(GuestField::Email, "Email is required".into());
    } else if !EMAIL_RE.is_match(&info.email) {
        errors.insert(GuestField::Email, "Please enter a valid email address".into());
    }

    if info.phone.trim().is_empty() {
        errors.insert(GuestField::Phone, "Phone number is required".into());
    } else if !PHONE_RE.is_match(&normalize_phone(&info.phone)) {
        errors.insert(GuestField::Phone, "Please enter a valid phone number".into());
    }

    GuestInfoValidation {
        valid: errors.is_empty(),
        errors,
    }
}

fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> GuestInfo {
        GuestInfo {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+1 (555) 010-2030".into(),
            special_requests: String::new(),
        }
    }

    #[test]
    fn complete_info_is_valid() {
        let result = validate_guest_info(&complete());
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn empty_info_reports_every_required_field() {
        let result = validate_guest_info(&GuestInfo::default());
        assert!(!result.valid);
        assert_eq!(
            result.errors.keys().copied().collect::<Vec<_>>(),
            vec![
                GuestField::FirstName,
                GuestField::LastName,
                GuestField::Email,
                GuestField::Phone
            ]
        );
        assert_eq!(result.errors[&GuestField::Email], "Email is required");
    }

    #[test]
    fn whitespace_names_count_as_missing() {
        let info = GuestInfo {
            first_name: "   ".into(),
            ..complete()
        };
        let result = validate_guest_info(&info);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[&GuestField::FirstName], "First name is required");
    }

    #[test]
    fn email_shape() {
        let bad = GuestInfo {
            email: "not-an-email".into(),
            ..complete()
        };
        assert_eq!(
            validate_guest_info(&bad).errors[&GuestField::Email],
            "Please enter a valid email address"
        );

        let short = GuestInfo {
            email: "a@b.co".into(),
            ..complete()
        };
        assert!(validate_guest_info(&short).valid);

        for email in ["a @b.co", "a@b", "@b.co", "a@@b.co"] {
            let info = GuestInfo {
                email: email.into(),
                ..complete()
            };
            assert!(!validate_guest_info(&info).valid, "{email}");
        }
    }

    #[test]
    fn phone_rules() {
        for ok in ["5550102030", "+44 20 7946 0958", "(212) 555-0199", "1"] {
            let info = GuestInfo {
                phone: ok.into(),
                ..complete()
            };
            assert!(validate_guest_info(&info).valid, "{ok}");
        }
        for bad in [
            "0123456",
            "+",
            "555-CALL-NOW",
            "12345678901234567",
            "1\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}",
            "\u{FF15}\u{FF15}\u{FF15}",
        ] {
            let info = GuestInfo {
                phone: bad.into(),
                ..complete()
            };
            assert_eq!(
                validate_guest_info(&info).errors[&GuestField::Phone],
                "Please enter a valid phone number",
                "{bad}"
            );
        }
    }

    #[test]
    fn special_requests_are_free_text() {
        let info = GuestInfo {
            special_requests: "   ".into(),
            ..complete()
        };
        assert!(validate_guest_info(&info).valid);
    }
}
