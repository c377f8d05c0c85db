use http::{header, request::Parts, HeaderMap, Request, Uri};

/// Source of the "is this request secure" signal.
///
/// URL-building methods take one of these to decide between the plain and
/// the secure Gravatar domain. A plain `bool` works, as do `http` requests,
/// which are inspected for an `https` URI scheme or a forwarding proxy's
/// protocol header.
///
/// # Example
///
/// ```rust
/// use http::Request;
/// use tower_gravatar::SecureConnection;
///
/// assert!(true.is_secure());
///
/// let req = Request::builder()
///     .uri("/profile")
///     .header("x-forwarded-proto", "https")
///     .body(())
///     .unwrap();
/// assert!(req.is_secure());
/// ```
pub trait SecureConnection {
    /// Returns `true` if the connection uses a secure transport.
    fn is_secure(&self) -> bool;
}

impl SecureConnection for bool {
    fn is_secure(&self) -> bool {
        *self
    }
}

impl<T: SecureConnection + ?Sized> SecureConnection for &T {
    fn is_secure(&self) -> bool {
        (**self).is_secure()
    }
}

impl SecureConnection for Uri {
    fn is_secure(&self) -> bool {
        self.scheme_str() == Some("https")
    }
}

impl SecureConnection for HeaderMap {
    /// Checks `X-Forwarded-Proto`, then `Forwarded`, as set by the proxy
    /// closest to the client.
    fn is_secure(&self) -> bool {
        if let Some(proto) = self
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
        {
            return first_list_item(proto).eq_ignore_ascii_case("https");
        }

        self.get(header::FORWARDED)
            .and_then(|value| value.to_str().ok())
            .and_then(forwarded_proto)
            .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
    }
}

impl<B> SecureConnection for Request<B> {
    fn is_secure(&self) -> bool {
        self.uri().is_secure() || self.headers().is_secure()
    }
}

impl SecureConnection for Parts {
    fn is_secure(&self) -> bool {
        self.uri.is_secure() || self.headers.is_secure()
    }
}

fn first_list_item(value: &str) -> &str {
    value.split(',').next().unwrap_or_default().trim()
}

// Forwarded: for=192.0.2.60;proto=https;by=203.0.113.43, for=198.51.100.17
fn forwarded_proto(value: &str) -> Option<&str> {
    first_list_item(value).split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("proto")
            .then(|| value.trim().trim_matches('"'))
    })
}
