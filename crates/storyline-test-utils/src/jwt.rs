use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

/// Tokens the session check must reject.
pub const MALFORMED_TOKENS: &[&str] = &[
    "",
    "not-a-jwt",
    "two.segments",
    "one.two.three.four",
    "header.%%%.signature",
    "header.bm90IGpzb24.signature",
];

/// Unsigned JWT carrying `claims` as its payload.
pub fn jwt_with_claims(claims: &Value) -> String {
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        URL_SAFE_NO_PAD.encode("signature")
    )
}

/// Unsigned JWT expiring at `exp` (seconds since the epoch).
pub fn jwt_with_exp(exp: i64) -> String {
    jwt_with_claims(&json!({ "sub": "writer@example.com", "exp": exp }))
}
