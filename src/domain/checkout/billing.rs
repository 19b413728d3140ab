//! Billing details and validation.
//!
//! Validation happens entirely client-side and before any network call:
//! a checkout with invalid billing details must never reach the payment
//! provider.

/// Billing contact captured by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A billing field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingField {
    FullName,
    Email,
    Phone,
    Address,
    City,
    PostalCode,
    Country,
}

impl BillingField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "full name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postal code",
            Self::Country => "country",
        }
    }
}

impl std::fmt::Display for BillingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueReason {
    Required,
    InvalidFormat,
}

/// One rejected field with its reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingIssue {
    pub field: BillingField,
    pub reason: IssueReason,
}

impl std::fmt::Display for BillingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            IssueReason::Required => write!(f, "{} is required", self.field),
            IssueReason::InvalidFormat => write!(f, "{} has an invalid format", self.field),
        }
    }
}

impl BillingDetails {
    /// Check that every field is present and shaped plausibly.
    ///
    /// # Errors
    ///
    /// Returns every issue found, not just the first, so a form can mark all
    /// offending fields at once.
    pub fn validate(&self) -> Result<(), Vec<BillingIssue>> {
        let mut issues = Vec::new();

        for (field, value) in [
            (BillingField::FullName, &self.full_name),
            (BillingField::Email, &self.email),
            (BillingField::Phone, &self.phone),
            (BillingField::Address, &self.address),
            (BillingField::City, &self.city),
            (BillingField::PostalCode, &self.postal_code),
            (BillingField::Country, &self.country),
        ] {
            if value.trim().is_empty() {
                issues.push(BillingIssue {
                    field,
                    reason: IssueReason::Required,
                });
            }
        }

        let email = self.email.trim();
        if !email.is_empty() && !valid_email(email) {
            issues.push(BillingIssue {
                field: BillingField::Email,
                reason: IssueReason::InvalidFormat,
            });
        }

        let phone = self.phone.trim();
        if !phone.is_empty() && !valid_phone(phone) {
            issues.push(BillingIssue {
                field: BillingField::Phone,
                reason: IssueReason::InvalidFormat,
            });
        }

        let postal_code = self.postal_code.trim();
        if !postal_code.is_empty() && !valid_postal_code(postal_code) {
            issues.push(BillingIssue {
                field: BillingField::PostalCode,
                reason: IssueReason::InvalidFormat,
            });
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

/// Structural check only: one `@`, a dot in the domain, no whitespace.
fn valid_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !local.is_empty() && !host.is_empty() && tld.len() >= 2 && !domain.contains('@')
}

/// Optional `+` prefix, then digits with common separators; at least seven
/// digits overall.
fn valid_phone(value: &str) -> bool {
    let rest = value.strip_prefix('+').unwrap_or(value);
    let digits = rest.chars().filter(char::is_ascii_digit).count();

    digits >= 7
        && rest
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
}

/// Between three and ten characters of letters, digits, spaces or dashes.
fn valid_postal_code(value: &str) -> bool {
    (3..=10).contains(&value.len())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::helpers::billing_details;

    #[test]
    fn a_complete_form_passes() {
        assert!(billing_details().validate().is_ok());
    }

    #[test]
    fn an_empty_form_flags_every_field_as_required() {
        let issues = BillingDetails::default()
            .validate()
            .expect_err("empty form must fail");

        assert_eq!(issues.len(), 7);
        assert!(
            issues
                .iter()
                .all(|issue| issue.reason == IssueReason::Required)
        );
    }

    #[test]
    fn a_malformed_email_is_rejected() {
        let mut details = billing_details();
        details.email = "ada-at-example.com".to_owned();

        let issues = details.validate().expect_err("email must fail");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, BillingField::Email);
        assert_eq!(issues[0].reason, IssueReason::InvalidFormat);
    }

    #[test]
    fn emails_need_a_dotted_domain() {
        assert!(valid_email("ada@example.com"));
        assert!(valid_email("ada.lovelace@mail.example.co"));
        assert!(!valid_email("ada@example"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("ada@example."));
        assert!(!valid_email("ada lovelace@example.com"));
    }

    #[test]
    fn phones_allow_separators_but_need_seven_digits() {
        assert!(valid_phone("+49 (0)30 123456"));
        assert!(valid_phone("030-123-4567"));
        assert!(!valid_phone("12345"));
        assert!(!valid_phone("call me maybe"));
    }

    #[test]
    fn postal_codes_are_short_and_alphanumeric() {
        assert!(valid_postal_code("10115"));
        assert!(valid_postal_code("EC1A 1BB"));
        assert!(!valid_postal_code("1"));
        assert!(!valid_postal_code("101#15"));
    }

    #[test]
    fn a_rejected_field_renders_a_readable_message() {
        let issue = BillingIssue {
            field: BillingField::PostalCode,
            reason: IssueReason::InvalidFormat,
        };

        assert_eq!(issue.to_string(), "postal code has an invalid format");
    }
}
