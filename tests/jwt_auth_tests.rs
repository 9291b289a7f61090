// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! These tests verify that tokens minted by `create_jwt` can be decoded
//! by the auth middleware, including the role code claim, catching
//! compatibility issues early.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use storefront_api::middleware::auth::{create_jwt, Claims};
use storefront_api::models::UserRole;

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

fn decode_claims(token: &str) -> Claims {
    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &key, &validation)
        .expect("Failed to decode JWT - check Claims struct compatibility")
        .claims
}

#[test]
fn test_jwt_roundtrip_with_role() {
    let token = create_jwt("usr_123", UserRole::ContentManager, SIGNING_KEY).unwrap();
    let claims = decode_claims(&token);

    assert_eq!(claims.sub, "usr_123");
    assert_eq!(claims.role, UserRole::ContentManager.code());
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_jwt_role_code_resolves_for_every_role() {
    for role in [
        UserRole::Customer,
        UserRole::Admin,
        UserRole::ContentManager,
        UserRole::SuperAdmin,
    ] {
        let token = create_jwt("usr_x", role, SIGNING_KEY).unwrap();
        let claims = decode_claims(&token);

        assert_eq!(UserRole::from_code(claims.role), Some(role));
    }
}

#[test]
fn test_jwt_with_unknown_role_code_is_not_resolvable() {
    // A token minted by a newer deployment could carry a code this build
    // does not know; the middleware must treat it as invalid, not guess.
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: "usr_future".to_string(),
        role: 7,
        iat: now,
        exp: now + 3600,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .unwrap();

    let decoded = decode_claims(&token);
    assert_eq!(UserRole::from_code(decoded.role), None);
}

#[test]
fn test_jwt_expiration_is_future() {
    use std::time::{SystemTime, UNIX_EPOCH};

    let token = create_jwt("usr_123", UserRole::Admin, SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // We'll check manually

    let claims = decode::<Claims>(&token, &key, &validation).unwrap().claims;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    // Token should expire at least 29 days in the future
    assert!(
        claims.exp > now + 86400 * 29,
        "Token expiration should be ~30 days in the future"
    );
}
