/// Trimmed, lowercased form used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks the address syntax and requires a TLD in the domain part.
pub fn is_valid_email(email: &str) -> bool {
    let trimmed = email.trim();

    if !email_address::EmailAddress::is_valid(trimmed) {
        return false;
    }

    match trimmed.rfind('@') {
        Some(at_pos) => trimmed[at_pos + 1..].contains('.'),
        None => false,
    }
}
