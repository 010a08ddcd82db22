mod common;

use juicebox_core::domain::Viewer;
use juicebox_core::ports::TokenService;
use juicebox_core::service::posts;
use juicebox_core::service::users;
use juicebox_core::{DomainError, ErrorKind};

use common::{Fixture, draft, registration};

#[tokio::test]
async fn test_register_then_login_issues_decodable_token() {
    let fx = Fixture::new();
    let registered = fx.register("sandra").await;

    let signed_in = users::login(&fx.store, &fx.passwords, &fx.tokens, "sandra", "pw123")
        .await
        .unwrap();

    let claims = fx.tokens.validate_token(&signed_in.token).unwrap();
    assert_eq!(claims.user_id, registered.user.id);
    assert_eq!(claims.username, "sandra");
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let fx = Fixture::new();
    let registered = fx.register("sandra").await;

    assert_ne!(registered.user.password_hash, "pw123");
}

#[tokio::test]
async fn test_registering_taken_username_is_conflict() {
    let fx = Fixture::new();
    fx.register("sandra").await;

    let err = users::register(
        &fx.store,
        &fx.passwords,
        &fx.tokens,
        registration("sandra", "other"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DomainError::UserExists));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_login_failures() {
    let fx = Fixture::new();
    fx.register("sandra").await;

    let missing = users::login(&fx.store, &fx.passwords, &fx.tokens, "sandra", "").await;
    assert!(matches!(missing, Err(DomainError::MissingCredentials)));

    let wrong = users::login(&fx.store, &fx.passwords, &fx.tokens, "sandra", "nope").await;
    assert!(matches!(wrong, Err(DomainError::IncorrectCredentials)));

    let unknown = users::login(&fx.store, &fx.passwords, &fx.tokens, "nobody", "pw123").await;
    assert!(matches!(unknown, Err(DomainError::IncorrectCredentials)));
}

#[tokio::test]
async fn test_register_requires_credentials() {
    let fx = Fixture::new();

    let result = users::register(
        &fx.store,
        &fx.passwords,
        &fx.tokens,
        registration("", "pw123"),
    )
    .await;

    assert!(matches!(result, Err(DomainError::MissingCredentials)));
}

#[tokio::test]
async fn test_deactivate_and_reactivate_self() {
    let fx = Fixture::new();
    let me = fx.viewer("sandra").await;

    let deactivated = users::deactivate_user(&fx.store, Some(&me), me.id)
        .await
        .unwrap();
    assert!(!deactivated.active);

    let me = Viewer {
        active: false,
        ..me
    };
    let again = users::deactivate_user(&fx.store, Some(&me), me.id).await;
    assert!(matches!(again, Err(DomainError::ViewerDeactivated)));

    let reactivated = users::reactivate_user(&fx.store, Some(&me), me.id)
        .await
        .unwrap();
    assert!(reactivated.active);

    let me = Viewer { active: true, ..me };
    let twice = users::reactivate_user(&fx.store, Some(&me), me.id).await;
    assert!(matches!(twice, Err(DomainError::AlreadyActive)));
}

#[tokio::test]
async fn test_cannot_change_another_users_activation() {
    let fx = Fixture::new();
    let me = fx.viewer("sandra").await;
    let other = fx.viewer("albert").await;

    let result = users::deactivate_user(&fx.store, Some(&me), other.id).await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Forbidden);

    let missing = users::deactivate_user(&fx.store, Some(&me), 404).await;
    assert!(matches!(missing, Err(DomainError::UserNotFound(404))));

    let anonymous = users::reactivate_user(&fx.store, None, me.id).await;
    assert!(matches!(anonymous, Err(DomainError::Unauthenticated)));
}

#[tokio::test]
async fn test_user_listing_and_detail_hide_secrets_and_filter_posts() {
    let fx = Fixture::new();
    let me = fx.viewer("sandra").await;
    let post = posts::create_post(&fx.store, Some(&me), draft("T", "#a"))
        .await
        .unwrap();
    posts::delete_post(&fx.store, Some(&me), post.id)
        .await
        .unwrap();

    let listed = users::list_users(&fx.store).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].username, "sandra");

    let (profile, public_posts) = users::user_detail(&fx.store, &fx.store, None, me.id)
        .await
        .unwrap();
    assert_eq!(profile.id, me.id);
    assert!(public_posts.is_empty());

    let (_, own_posts) = users::user_detail(&fx.store, &fx.store, Some(&me), me.id)
        .await
        .unwrap();
    assert_eq!(own_posts.len(), 1);
}

#[tokio::test]
async fn test_username_is_trimmed_on_register_and_login() {
    let fx = Fixture::new();
    let registered = users::register(
        &fx.store,
        &fx.passwords,
        &fx.tokens,
        registration("  sandra  ", "pw123"),
    )
    .await
    .unwrap();
    assert_eq!(registered.user.username, "sandra");

    let signed_in = users::login(&fx.store, &fx.passwords, &fx.tokens, " sandra ", "pw123")
        .await
        .unwrap();
    assert_eq!(signed_in.user.id, registered.user.id);

    let blank = users::login(&fx.store, &fx.passwords, &fx.tokens, "   ", "pw123").await;
    assert!(matches!(blank, Err(DomainError::MissingCredentials)));
}
