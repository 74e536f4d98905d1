//! Field validation for the setup forms.

use crate::error::FormErrors;
use crate::models::{ApplicationForm, DirectLeader, InternTraineeForm, PolicySettings};
use std::ops::RangeInclusive;

pub const PASSWORD_MIN_LENGTH: RangeInclusive<u32> = 6..=32;
pub const PASSWORD_EXPIRY_DAYS: RangeInclusive<u32> = 30..=365;
pub const SESSION_TIMEOUT_MINUTES: RangeInclusive<u32> = 5..=480;
pub const MAX_LOGIN_ATTEMPTS: RangeInclusive<u32> = 3..=10;
pub const LOCKOUT_DURATION_MINUTES: RangeInclusive<u32> = 5..=60;

fn has_letter(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_alphabetic())
}

/// Checks an intern or trainee form and resolves the direct leader it names.
///
/// The trainee NIP must contain a letter while the leader NIP (an employee)
/// must not, and the e-mail must be under `org_domain`.
pub fn validate_intern(
    form: &InternTraineeForm,
    leaders: &[DirectLeader],
    org_domain: &str,
) -> Result<DirectLeader, FormErrors> {
    let mut errors = FormErrors::default();

    let nip = form.nip.trim();
    if nip.is_empty() {
        errors.push("nip", "NIP is required");
    } else if !has_letter(nip) {
        errors.push("nip", "NIP must contain at least one alphabet character");
    }

    if form.name.trim().is_empty() {
        errors.push("name", "Name is required");
    }

    let email = form.email.trim();
    let suffix = format!("@{}", org_domain);
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !email.to_lowercase().ends_with(&suffix.to_lowercase()) || email.len() == suffix.len() {
        errors.push("email", format!("Email must contain {}", suffix));
    }

    let leader_nip = form.direct_leader_nip.trim();
    let mut leader = None;
    if leader_nip.is_empty() {
        errors.push("direct_leader_nip", "Direct leader NIP is required");
    } else if has_letter(leader_nip) {
        errors.push(
            "direct_leader_nip",
            "Direct leader NIP must not contain alphabet characters",
        );
    } else {
        leader = leaders.iter().find(|l| l.nip == leader_nip);
        if leader.is_none() {
            errors.push("direct_leader_nip", "Direct leader not found");
        }
    }

    match leader {
        Some(leader) if errors.is_empty() => Ok(leader.clone()),
        _ => Err(errors),
    }
}

pub fn validate_application(form: &ApplicationForm) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();
    if form.name.trim().is_empty() {
        errors.push("name", "Application name is required");
    }
    if form.url.trim().is_empty() {
        errors.push("url", "Application URL is required");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_range(errors: &mut FormErrors, field: &'static str, label: &str, value: u32, range: &RangeInclusive<u32>) {
    if !range.contains(&value) {
        errors.push(
            field,
            format!("{} must be between {} and {}", label, range.start(), range.end()),
        );
    }
}

pub fn validate_policy(settings: &PolicySettings) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();
    check_range(&mut errors, "password_min_length", "Minimum password length", settings.password_min_length, &PASSWORD_MIN_LENGTH);
    check_range(&mut errors, "password_expiry_days", "Password expiry", settings.password_expiry_days, &PASSWORD_EXPIRY_DAYS);
    check_range(&mut errors, "session_timeout_minutes", "Session timeout", settings.session_timeout_minutes, &SESSION_TIMEOUT_MINUTES);
    check_range(&mut errors, "max_login_attempts", "Maximum login attempts", settings.max_login_attempts, &MAX_LOGIN_ATTEMPTS);
    check_range(&mut errors, "lockout_duration_minutes", "Lockout duration", settings.lockout_duration_minutes, &LOCKOUT_DURATION_MINUTES);

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::direct_leaders;
    use crate::models::TraineeKind;

    fn form(nip: &str, email: &str, leader: &str) -> InternTraineeForm {
        InternTraineeForm {
            nip: nip.to_string(),
            name: "John Doe".to_string(),
            email: email.to_string(),
            direct_leader_nip: leader.to_string(),
            kind: TraineeKind::Intern,
        }
    }

    #[test]
    fn test_valid_intern_resolves_leader() {
        let leader = validate_intern(
            &form("INT001", "john.doe@banksinarmas.com", "002"),
            &direct_leaders(),
            "banksinarmas.com",
        )
        .unwrap();
        assert_eq!(leader.name, "Sarah Johnson");
        assert_eq!(leader.organization_unit, "Project Management");
    }

    #[test]
    fn test_numeric_intern_nip_is_rejected() {
        let errors = validate_intern(
            &form("12345", "john.doe@banksinarmas.com", "001"),
            &direct_leaders(),
            "banksinarmas.com",
        )
        .unwrap_err();
        assert_eq!(
            errors.message_for("nip"),
            Some("NIP must contain at least one alphabet character")
        );
    }

    #[test]
    fn test_foreign_email_and_unknown_leader() {
        let errors = validate_intern(
            &form("INT002", "john@gmail.com", "999"),
            &direct_leaders(),
            "banksinarmas.com",
        )
        .unwrap_err();
        assert_eq!(errors.message_for("email"), Some("Email must contain @banksinarmas.com"));
        assert_eq!(errors.message_for("direct_leader_nip"), Some("Direct leader not found"));
    }

    #[test]
    fn test_alphabetic_leader_nip_is_rejected() {
        let errors = validate_intern(
            &form("INT003", "a@banksinarmas.com", "A01"),
            &direct_leaders(),
            "banksinarmas.com",
        )
        .unwrap_err();
        assert_eq!(
            errors.message_for("direct_leader_nip"),
            Some("Direct leader NIP must not contain alphabet characters")
        );
    }

    #[test]
    fn test_application_requires_name_and_url() {
        let errors = validate_application(&ApplicationForm::default()).unwrap_err();
        assert_eq!(errors.0.len(), 2);

        let ok = ApplicationForm {
            name: "Payroll".to_string(),
            url: "https://payroll.company.com".to_string(),
            description: String::new(),
        };
        assert!(validate_application(&ok).is_ok());
    }

    #[test]
    fn test_policy_ranges() {
        assert!(validate_policy(&PolicySettings::default()).is_ok());

        let settings = PolicySettings {
            password_min_length: 4,
            max_login_attempts: 0,
            ..PolicySettings::default()
        };
        let errors = validate_policy(&settings).unwrap_err();
        assert_eq!(
            errors.message_for("password_min_length"),
            Some("Minimum password length must be between 6 and 32")
        );
        assert!(errors.message_for("max_login_attempts").is_some());
        assert!(errors.message_for("session_timeout_minutes").is_none());
    }

    #[test]
    fn test_policy_rejects_one_past_each_bound() {
        let fields = ["password_min_length", "password_expiry_days", "session_timeout_minutes", "max_login_attempts", "lockout_duration_minutes"];
        let ranges = [&PASSWORD_MIN_LENGTH, &PASSWORD_EXPIRY_DAYS, &SESSION_TIMEOUT_MINUTES, &MAX_LOGIN_ATTEMPTS, &LOCKOUT_DURATION_MINUTES];
        let with = |field: &str, value: u32| {
            let mut settings = PolicySettings::default();
            match field {
                "password_min_length" => settings.password_min_length = value,
                "password_expiry_days" => settings.password_expiry_days = value,
                "session_timeout_minutes" => settings.session_timeout_minutes = value,
                "max_login_attempts" => settings.max_login_attempts = value,
                _ => settings.lockout_duration_minutes = value,
            }
            settings
        };

        for (field, range) in fields.into_iter().zip(ranges) {
            for value in [*range.start(), *range.end()] {
                assert!(validate_policy(&with(field, value)).is_ok(), "{} = {}", field, value);
            }
            for value in [range.start() - 1, range.end() + 1] {
                let errors = validate_policy(&with(field, value)).unwrap_err();
                assert_eq!(errors.0.len(), 1, "{} = {}", field, value);
                assert!(errors.message_for(field).is_some(), "{} = {}", field, value);
            }
        }
    }
}
