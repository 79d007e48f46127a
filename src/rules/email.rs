use std::sync::LazyLock;

use regex::Regex;

// atext RFC 5322, points non initiaux/terminaux, pas de ".."
static DOT_ATOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("dot-atom pattern is valid")
});

/// Lists every reason `email` does not have a valid address shape.
/// An empty list means the address is well formed.
///
/// The address is checked exactly as given: surrounding whitespace is a
/// violation, not something to strip. The domain goes through IDNA, so
/// `user@exämple.com` is accepted.
pub fn email_shape_violations(email: &str) -> Vec<String> {
    let mut reasons = Vec::new();

    if email.len() > 254 {
        reasons.push(format!("total length {} > 254", email.len()));
    }

    let Some((local, domain)) = email.split_once('@') else {
        reasons.push("must contain exactly one '@'".to_string());
        return reasons;
    };
    if domain.contains('@') {
        reasons.push("must contain exactly one '@'".to_string());
        return reasons;
    }

    if local.is_empty() || local.len() > 64 {
        reasons.push(format!(
            "local part length {} invalid (1..=64)",
            local.len()
        ));
    } else if !DOT_ATOM.is_match(local) {
        reasons.push("invalid local part".to_string());
    }

    domain_violations(domain, &mut reasons);
    reasons
}

fn domain_violations(domain: &str, reasons: &mut Vec<String>) {
    let ascii = match idna::domain_to_ascii(domain) {
        Ok(ascii) if !ascii.is_empty() => ascii,
        Ok(_) => {
            reasons.push("domain is empty".to_string());
            return;
        }
        Err(_) => {
            reasons.push("domain punycode conversion failed".to_string());
            return;
        }
    };

    if !ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in ascii.split('.') {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
        } else if label.len() > 63 {
            reasons.push(format!("domain label '{label}' length {} > 63", label.len()));
        } else if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!("domain label '{label}' cannot start/end with '-'"));
        } else if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{label}' has invalid chars"));
        }
    }
}
