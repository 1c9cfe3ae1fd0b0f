//! Clickjacking protection via `X-Frame-Options`.
//!
//! Every response gets `X-Frame-Options: DENY` unless a handler already set the header
//! (e.g. `SAMEORIGIN`) or opted out entirely with [`NoFrameOptions`].

use std::convert::Infallible;

use axum::{
    extract::Request,
    http::{header::X_FRAME_OPTIONS, HeaderValue},
    middleware::Next,
    response::{IntoResponseParts, Response, ResponseParts},
};

/// Response marker: leave `X-Frame-Options` alone for this response.
///
/// Return it as part of a handler's response, e.g. `(NoFrameOptions, Html(page))`, for
/// pages that are meant to be embedded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFrameOptions;

impl IntoResponseParts for NoFrameOptions {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}

/// Applies the default frame policy to `res` in place.
pub fn apply_frame_options(res: &mut Response) {
    if res.extensions().get::<NoFrameOptions>().is_some() {
        return;
    }
    if !res.headers().contains_key(X_FRAME_OPTIONS) {
        res.headers_mut().insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    }
}

/// Sets `X-Frame-Options: DENY` on responses that carry neither the header nor
/// [`NoFrameOptions`].
pub async fn frame_options_middleware(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    apply_frame_options(&mut res);
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_sets_deny_by_default() {
        let mut res = "ok".into_response();
        apply_frame_options(&mut res);
        assert_eq!(res.headers()[X_FRAME_OPTIONS], "DENY");
    }

    #[test]
    fn test_keeps_existing_value() {
        let mut res = ([("X-Frame-Options", "SAMEORIGIN")], "ok").into_response();
        apply_frame_options(&mut res);
        assert_eq!(res.headers()[X_FRAME_OPTIONS], "SAMEORIGIN");
        assert_eq!(res.headers().get_all(X_FRAME_OPTIONS).iter().count(), 1);
    }

    #[test]
    fn test_marker_suppresses_header() {
        let mut res = (NoFrameOptions, "ok").into_response();
        apply_frame_options(&mut res);
        assert!(res.headers().get(X_FRAME_OPTIONS).is_none());
    }

    #[test]
    fn test_marker_leaves_preset_header_untouched() {
        let mut res = (NoFrameOptions, [("x-frame-options", "SAMEORIGIN")], "ok").into_response();
        apply_frame_options(&mut res);
        assert_eq!(res.headers()[X_FRAME_OPTIONS], "SAMEORIGIN");
    }
}
