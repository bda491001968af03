// ABOUTME: Integration tests for registration, login, token refresh, and federated login
// ABOUTME: Exercises AuthService and the bearer middleware against an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use fittransform_server::auth::TokenType;
use fittransform_server::errors::ErrorCode;
use fittransform_server::identity::DisabledIdentityProvider;
use fittransform_server::routes::auth::{
    FederatedLoginRequest, LoginRequest, RefreshRequest, RegisterRequest,
};
use fittransform_server::routes::AuthService;

fn register_request(email: &str, username: &str) -> RegisterRequest {
    RegisterRequest {
        email: Some(email.to_owned()),
        username: Some(username.to_owned()),
        first_name: Some("Jane".to_owned()),
        last_name: Some("Doe".to_owned()),
        password: Some(common::TEST_PASSWORD.to_owned()),
        confirm_password: Some(common::TEST_PASSWORD.to_owned()),
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: Some(email.to_owned()),
        password: Some(password.to_owned()),
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let resources = common::create_test_resources().await;
    let service = AuthService::new(&resources);

    let registered = service
        .register(register_request("Jane@Example.com", "jane"))
        .await
        .unwrap();
    assert_eq!(registered.user["email"], "jane@example.com");
    assert_eq!(registered.user["first_name"], "Jane");

    let claims = resources
        .auth_manager
        .validate_token(&registered.tokens.access, TokenType::Access)
        .unwrap();
    assert_eq!(claims.email, "jane@example.com");

    let logged_in = service
        .login(login_request("jane@example.com", common::TEST_PASSWORD))
        .await
        .unwrap();
    assert_eq!(logged_in.message, "Login successful");
    assert_eq!(logged_in.user["id"], registered.user["id"]);
}

#[tokio::test]
async fn test_register_validation() {
    let resources = common::create_test_resources().await;
    let service = AuthService::new(&resources);

    let mut short = register_request("short@example.com", "short");
    short.password = Some("abc".to_owned());
    short.confirm_password = Some("abc".to_owned());
    let err = service.register(short).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    let mut mismatch = register_request("mismatch@example.com", "mismatch");
    mismatch.confirm_password = Some("different-password".to_owned());
    let err = service.register(mismatch).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(err.context.details["field"], "confirm_password");

    let err = service
        .register(register_request("not-an-email", "bad"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);

    let mut nameless = register_request("nameless@example.com", "x");
    nameless.username = None;
    let err = service.register(nameless).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}

#[tokio::test]
async fn test_duplicate_email_and_username_conflict() {
    let resources = common::create_test_resources().await;
    let service = AuthService::new(&resources);

    service
        .register(register_request("dup@example.com", "dup"))
        .await
        .unwrap();

    let err = service
        .register(register_request("DUP@example.com", "other"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);

    let err = service
        .register(register_request("fresh@example.com", "dup"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(err.context.details["field"], "username");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let resources = common::create_test_resources().await;
    let service = AuthService::new(&resources);
    common::create_test_user(&resources, "known@example.com").await;

    let wrong_password = service
        .login(login_request("known@example.com", "not-the-password"))
        .await
        .unwrap_err();
    let unknown_email = service
        .login(login_request("nobody@example.com", common::TEST_PASSWORD))
        .await
        .unwrap_err();

    assert_eq!(wrong_password.code, ErrorCode::AuthInvalid);
    assert_eq!(unknown_email.code, ErrorCode::AuthInvalid);
    assert_eq!(wrong_password.message, unknown_email.message);
}

#[tokio::test]
async fn test_refresh_rotates_and_rejects_access_tokens() {
    let resources = common::create_test_resources().await;
    let service = AuthService::new(&resources);
    let registered = service
        .register(register_request("refresh@example.com", "refresh"))
        .await
        .unwrap();

    let tokens = service
        .refresh_token(RefreshRequest {
            refresh: Some(registered.tokens.refresh.clone()),
        })
        .await
        .unwrap();
    resources
        .auth_manager
        .validate_token(&tokens.access, TokenType::Access)
        .unwrap();

    let err = service
        .refresh_token(RefreshRequest {
            refresh: Some(registered.tokens.access),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_federated_login_creates_then_finds_account() {
    let resources = common::create_test_resources().await;
    // Takes the "sam" username so the federated account gets a suffix
    common::create_test_user(&resources, "sam@other.org").await;
    let service = AuthService::new(&resources);

    let first = service
        .federated_login(FederatedLoginRequest {
            id_token: Some("valid:sam@example.com:Sam:Smith".to_owned()),
        })
        .await
        .unwrap();
    assert_eq!(first.created, Some(true));
    assert_eq!(first.user["username"], "sam1");
    assert_eq!(first.user["last_name"], "Smith");

    let second = service
        .federated_login(FederatedLoginRequest {
            id_token: Some("valid:sam@example.com".to_owned()),
        })
        .await
        .unwrap();
    assert_eq!(second.created, Some(false));
    assert_eq!(second.user["id"], first.user["id"]);

    // The federated account has no usable password
    let err = service
        .login(login_request("sam@example.com", common::TEST_PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_federated_login_rejections() {
    let resources = common::create_test_resources().await;
    let err = AuthService::new(&resources)
        .federated_login(FederatedLoginRequest {
            id_token: Some("forged".to_owned()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    let disabled =
        common::create_test_resources_with_provider(Arc::new(DisabledIdentityProvider)).await;
    let err = AuthService::new(&disabled)
        .federated_login(FederatedLoginRequest {
            id_token: Some("valid:a@example.com".to_owned()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[tokio::test]
async fn test_middleware_requires_bearer_access_token() {
    let resources = common::create_test_resources().await;
    let (user, access) = common::create_test_user(&resources, "bearer@example.com").await;

    let auth = resources
        .auth_middleware
        .authenticate_request(Some(&format!("Bearer {access}")))
        .await
        .unwrap();
    assert_eq!(auth.user_id, user.id);

    let err = resources
        .auth_middleware
        .authenticate_request(None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);

    let err = resources
        .auth_middleware
        .authenticate_request(Some(&format!("Token {access}")))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    let refresh = resources
        .auth_manager
        .issue_token_pair(&user)
        .unwrap()
        .refresh;
    let err = resources
        .auth_middleware
        .authenticate_request(Some(&format!("Bearer {refresh}")))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
}
