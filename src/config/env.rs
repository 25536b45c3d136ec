/// Reads an environment variable, treating empty values as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Masks a credential for log output, keeping only a short prefix
pub fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{}***", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value() {
        assert!(get_env_value("CODE_NAVIGATOR_SURELY_UNSET_VARIABLE").is_none());
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("ghp_abcdef"), "ghp_***");
        assert_eq!(redact("ab"), "ab***");
        assert!(!redact("sk-live-0123456789").contains("0123456789"));
    }
}
