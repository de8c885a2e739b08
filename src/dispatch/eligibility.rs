use crate::models::Guest;

/// Conservative address check: one `@`, a non-empty local part, a dotted
/// domain, no whitespace anywhere. Anything fancier is the relay's problem.
pub fn is_valid_email(email: &str) -> bool {
    let trimmed = email.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return false;
    }

    let mut parts = trimmed.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && domain.contains('.'),
        _ => false,
    }
}

/// Whether a guest has an address the dispatcher can target
pub fn is_eligible(guest: &Guest) -> bool {
    guest.email.as_deref().is_some_and(is_valid_email)
}
