use url::Url;

/// Short correlation token for a URL. Raw URLs never reach the tracing
/// backend since query strings can carry credentials or session ids.
pub fn hash_url(url: &str) -> String {
    if url.is_empty() {
        return "unknown".to_string();
    }

    let digest = format!("{:x}", md5::compute(url.as_bytes()));
    digest[..8].to_string()
}

pub fn get_domain(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.to_string())
            .unwrap_or_else(|| "invalid-url".to_string()),
        Err(_) => "invalid-url".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_url_empty_input() {
        assert_eq!(hash_url(""), "unknown");
    }

    #[test]
    fn test_hash_url_is_stable_and_short() {
        let first = hash_url("https://a.com/x?k=v");
        let second = hash_url("https://a.com/x?k=v");

        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_url_distinguishes_urls() {
        assert_ne!(
            hash_url("https://a.com/x?k=v"),
            hash_url("https://b.com/y?k=w")
        );
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(get_domain("https://example.com/path"), "example.com");
        assert_eq!(get_domain("https://sub.example.co.uk/a?b=c"), "sub.example.co.uk");
        assert_eq!(get_domain("not a url"), "invalid-url");
        assert_eq!(get_domain("mailto:someone@example.com"), "invalid-url");
    }
}
