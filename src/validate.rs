use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Declarative field rules, checked in order before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLen(usize),
    MaxLen(usize),
    Uuid,
    Email,
}

/// Check a value against its rules, returning the first failure message.
///
/// Length rules count characters, not bytes, so ML text validates the same
/// way as EN text.
pub fn check(value: &str, rules: &[Rule]) -> Option<String> {
    let len = value.chars().count();
    for rule in rules {
        match rule {
            Rule::Required => {
                if value.trim().is_empty() {
                    return Some("This field is required".to_string());
                }
            }
            Rule::MinLen(min) => {
                if len < *min {
                    return Some(format!("Must be at least {} characters.", min));
                }
            }
            Rule::MaxLen(max) => {
                if len > *max {
                    return Some(format!("Must be at most {} characters.", max));
                }
            }
            Rule::Uuid => {
                if !is_uuid(value) {
                    return Some("Must be a valid id".to_string());
                }
            }
            Rule::Email => {
                if !EMAIL_RE.is_match(value) {
                    return Some("Must be a valid email address".to_string());
                }
            }
        }
    }
    None
}

/// Hyphenated 8-4-4-4-12 hex form
fn is_uuid(value: &str) -> bool {
    let groups: Vec<&str> = value.split('-').collect();
    if groups.len() != 5 {
        return false;
    }
    const LENGTHS: [usize; 5] = [8, 4, 4, 4, 12];
    groups
        .iter()
        .zip(LENGTHS)
        .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_en_rules() -> Vec<Rule> {
        vec![Rule::MinLen(2), Rule::MaxLen(50)]
    }

    #[test]
    fn name_en_length_boundaries() {
        assert!(check("a", &name_en_rules()).is_some());
        assert!(check("ab", &name_en_rules()).is_none());
        assert!(check(&"x".repeat(50), &name_en_rules()).is_none());
        assert!(check(&"x".repeat(51), &name_en_rules()).is_some());
    }

    #[test]
    fn min_len_message_names_the_bound() {
        let message = check("a", &[Rule::MinLen(2)]).unwrap();
        assert!(message.contains("at least 2 characters"));
    }

    #[test]
    fn optional_ml_name_accepts_empty() {
        assert!(check("", &[Rule::MaxLen(50)]).is_none());
    }

    #[test]
    fn length_rules_count_characters_not_bytes() {
        // 50 Malayalam characters are more than 50 bytes but still pass
        let value = "\u{0d05}".repeat(50);
        assert!(check(&value, &[Rule::MaxLen(50)]).is_none());
    }

    #[test]
    fn uuid_rule() {
        assert!(check("8f14e45f-ceea-467f-a0f9-b1a163c9a2d1", &[Rule::Uuid]).is_none());
        assert!(check("not-a-uuid", &[Rule::Uuid]).is_some());
        assert!(check("", &[Rule::Uuid]).is_some());
    }

    #[test]
    fn email_rule() {
        assert!(check("admin@example.com", &[Rule::Email]).is_none());
        assert!(check("admin@example", &[Rule::Email]).is_some());
        assert!(check("not an email", &[Rule::Email]).is_some());
    }

    #[test]
    fn required_rejects_whitespace() {
        assert!(check("   ", &[Rule::Required]).is_some());
        assert!(check("x", &[Rule::Required]).is_none());
    }
}
