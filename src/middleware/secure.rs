use axum::http::{uri::Scheme, Extensions, HeaderMap, Uri};

/// Request extension inserted by a TLS acceptor for connections it terminated.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureTransport;

/// Whether a request arrived over a secure transport.
///
/// Checked in order: a [`SecureTransport`] extension, an absolute `https` URI, and, only
/// when `trust_forwarded_proto` is set, the first value of `X-Forwarded-Proto`.
pub fn is_secure_request(
    uri: &Uri,
    headers: &HeaderMap,
    extensions: &Extensions,
    trust_forwarded_proto: bool,
) -> bool {
    if extensions.get::<SecureTransport>().is_some() {
        return true;
    }
    if uri.scheme() == Some(&Scheme::HTTPS) {
        return true;
    }
    if trust_forwarded_proto {
        if let Some(h) = headers.get("x-forwarded-proto").and_then(|hv| hv.to_str().ok()) {
            if let Some(first) = h.split(',').next() {
                return first.trim().eq_ignore_ascii_case("https");
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_plain_http_is_insecure() {
        let uri: Uri = "/login".parse().unwrap();
        assert!(!is_secure_request(&uri, &HeaderMap::new(), &Extensions::new(), true));
    }

    #[test]
    fn test_https_scheme_is_secure() {
        let uri: Uri = "https://example.com/login".parse().unwrap();
        assert!(is_secure_request(&uri, &HeaderMap::new(), &Extensions::new(), false));
    }

    #[test]
    fn test_extension_marks_secure() {
        let uri: Uri = "/".parse().unwrap();
        let mut ext = Extensions::new();
        ext.insert(SecureTransport);
        assert!(is_secure_request(&uri, &HeaderMap::new(), &ext, false));
    }

    #[test]
    fn test_forwarded_proto_needs_trust() {
        let uri: Uri = "/".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", HeaderValue::from_static("HTTPS, http"));
        assert!(!is_secure_request(&uri, &headers, &Extensions::new(), false));
        assert!(is_secure_request(&uri, &headers, &Extensions::new(), true));

        headers.insert("x-forwarded-proto", HeaderValue::from_static("http"));
        assert!(!is_secure_request(&uri, &headers, &Extensions::new(), true));
    }
}
