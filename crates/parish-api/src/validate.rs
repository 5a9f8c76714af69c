/// Address-shape check: one '@', non-empty local part, dot-separated
/// domain, no whitespace. Deliverability is not this layer's problem.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// YYYY-MM-DD
pub fn is_valid_date(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|&i| bytes[i].is_ascii_digit())
}

/// HH:MM, 24-hour
pub fn is_valid_time(time: &str) -> bool {
    let bytes = time.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.org"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn date_and_time_shapes() {
        assert!(is_valid_date("2026-08-07"));
        assert!(!is_valid_date("2026-8-7"));
        assert!(!is_valid_date("07-08-2026"));
        assert!(!is_valid_date("2026-08-07T00"));

        assert!(is_valid_time("09:30"));
        assert!(!is_valid_time("9:30"));
        assert!(!is_valid_time("09:30:00"));
    }
}
