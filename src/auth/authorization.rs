use crate::auth::jwt::Principal;
use crate::config::AuthConfig;
use crate::error::ApiError;

/// Admin allow-list: explicit addresses plus whole domains, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    emails: Vec<String>,
    domains: Vec<String>,
}

impl AllowList {
    pub fn new(emails: &[String], domains: &[String]) -> Self {
        Self {
            emails: emails.iter().map(|e| e.trim().to_lowercase()).collect(),
            domains: domains
                .iter()
                .map(|d| d.trim().trim_start_matches('@').to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.admin_emails, &config.allowed_domains)
    }

    pub fn permits(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        if self.emails.iter().any(|e| *e == email) {
            return true;
        }
        match email.rsplit_once('@') {
            Some((_, domain)) => self.domains.iter().any(|d| d == domain),
            None => false,
        }
    }
}

/// Loose shape check: one `@`, non-empty local part, a dot in the domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Only ADMIN principals may use the back office.
pub fn ensure_admin(principal: &Principal) -> Result<(), ApiError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_email_or_domain_is_permitted() {
        let list = AllowList::new(
            &["Owner@Example.com".to_string()],
            &["@staff.example.org".to_string()],
        );
        assert!(list.permits("owner@example.com"));
        assert!(list.permits("  OWNER@EXAMPLE.COM "));
        assert!(list.permits("anyone@staff.example.org"));
        assert!(!list.permits("other@example.com"));
        assert!(!list.permits("evil@notstaff.example.org.attacker.io"));
        assert!(!list.permits("no-at-sign"));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@@b.co"));
    }
}
