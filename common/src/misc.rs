/// Upper-cases the first character: `"pro"` becomes `"Pro"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Groups digits by thousands: `5000` becomes `"5,000"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Minimal `local@domain.tld` shape check used before credentials are sent.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_first_letter() {
        assert_eq!(capitalize("pro"), "Pro");
        assert_eq!(capitalize("enterprise"), "Enterprise");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(5000), "5,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("jane.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
    }
}
