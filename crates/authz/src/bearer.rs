/// Strip a leading `Bearer` (any case, optional whitespace) from an
/// `Authorization` header value. Values without the prefix pass through trimmed.
pub fn bearer_token(header: &str) -> &str {
    const PREFIX: &str = "bearer";

    let header = header.trim();
    match header.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => header[PREFIX.len()..].trim_start(),
        _ => header,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_case_insensitively() {
        assert_eq!(bearer_token("Bearer abc.def"), "abc.def");
        assert_eq!(bearer_token("bearer abc"), "abc");
        assert_eq!(bearer_token("BEARER   abc"), "abc");
    }

    #[test]
    fn raw_tokens_pass_through() {
        assert_eq!(bearer_token("abc"), "abc");
        assert_eq!(bearer_token(""), "");
        assert_eq!(bearer_token("Bearer"), "");
    }

    #[test]
    fn multibyte_headers_do_not_panic() {
        assert_eq!(bearer_token("ñé"), "ñé");
    }
}
