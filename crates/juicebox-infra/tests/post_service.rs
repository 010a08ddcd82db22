mod common;

use juicebox_core::domain::{PostChanges, Viewer};
use juicebox_core::ports::{PostRepository, TagRepository};
use juicebox_core::service::posts;
use juicebox_core::service::users;
use juicebox_core::{DomainError, ErrorKind};

use common::{Fixture, draft};

fn tags(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|s| s.to_string()).collect())
}

#[tokio::test]
async fn test_created_post_is_listed_for_anonymous_viewer_with_tags() {
    let fx = Fixture::new();
    let author = fx.viewer("sandra").await;

    posts::create_post(&fx.store, Some(&author), draft("T", "#a #b"))
        .await
        .unwrap();

    let listed = posts::list_posts(&fx.store, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "T");
    assert_eq!(listed[0].author.username, "sandra");
    assert_eq!(listed[0].tag_names(), vec!["#a", "#b"]);
}

#[tokio::test]
async fn test_create_post_requires_active_viewer() {
    let fx = Fixture::new();

    let anonymous = posts::create_post(&fx.store, None, draft("T", "")).await;
    assert!(matches!(anonymous, Err(DomainError::Unauthenticated)));

    let mut inactive = fx.viewer("sandra").await;
    inactive.active = false;
    let deactivated = posts::create_post(&fx.store, Some(&inactive), draft("T", "")).await;
    assert!(matches!(deactivated, Err(DomainError::ViewerDeactivated)));
}

#[tokio::test]
async fn test_create_post_with_blank_title_is_validation_error() {
    let fx = Fixture::new();
    let author = fx.viewer("sandra").await;

    let err = posts::create_post(&fx.store, Some(&author), draft("  ", ""))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_create_post_for_unknown_author_is_create_post_failed() {
    let fx = Fixture::new();
    let ghost = Viewer {
        id: 999,
        username: "ghost".to_string(),
        active: true,
    };

    let result = posts::create_post(&fx.store, Some(&ghost), draft("T", "#a")).await;

    assert!(matches!(result, Err(DomainError::CreatePostFailed)));
}

#[tokio::test]
async fn test_title_update_leaves_content_tags_and_active_unchanged() {
    let fx = Fixture::new();
    let author = fx.viewer("sandra").await;
    let post = posts::create_post(&fx.store, Some(&author), draft("T", "#a #b"))
        .await
        .unwrap();

    let updated = posts::update_post(
        &fx.store,
        Some(&author),
        post.id,
        PostChanges {
            title: Some("x".to_string()),
            ..PostChanges::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "x");
    assert_eq!(updated.content, post.content);
    assert_eq!(updated.active, post.active);
    assert_eq!(updated.tag_names(), post.tag_names());
}

#[tokio::test]
async fn test_tag_replacement_round_trips_through_get_by_id() {
    let fx = Fixture::new();
    let author = fx.viewer("sandra").await;
    let post = posts::create_post(&fx.store, Some(&author), draft("T", "#a #b"))
        .await
        .unwrap();

    posts::update_post(
        &fx.store,
        Some(&author),
        post.id,
        PostChanges {
            tags: tags(&["#b", "#c", "#d"]),
            ..PostChanges::default()
        },
    )
    .await
    .unwrap();

    let reloaded = fx.store.get_by_id(post.id).await.unwrap();
    assert_eq!(reloaded.tag_names(), vec!["#b", "#c", "#d"]);

    // Detached tags stay behind as orphan rows.
    let all: Vec<String> = TagRepository::list(&fx.store)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert!(all.contains(&"#a".to_string()));
}

#[tokio::test]
async fn test_empty_tag_set_removes_all_tags() {
    let fx = Fixture::new();
    let author = fx.viewer("sandra").await;
    let post = posts::create_post(&fx.store, Some(&author), draft("T", "#a #b"))
        .await
        .unwrap();

    let updated = posts::update_post(
        &fx.store,
        Some(&author),
        post.id,
        PostChanges {
            tags: Some(Vec::new()),
            ..PostChanges::default()
        },
    )
    .await
    .unwrap();

    assert!(updated.tags.is_empty());
}

#[tokio::test]
async fn test_non_owner_cannot_update_or_delete() {
    let fx = Fixture::new();
    let author = fx.viewer("sandra").await;
    let stranger = fx.viewer("albert").await;
    let post = posts::create_post(&fx.store, Some(&author), draft("T", "#a"))
        .await
        .unwrap();

    let update = posts::update_post(
        &fx.store,
        Some(&stranger),
        post.id,
        PostChanges {
            title: Some("hijacked".to_string()),
            tags: tags(&[]),
            ..PostChanges::default()
        },
    )
    .await;
    assert_eq!(update.unwrap_err().kind(), ErrorKind::Forbidden);

    let delete = posts::delete_post(&fx.store, Some(&stranger), post.id).await;
    assert_eq!(delete.unwrap_err().kind(), ErrorKind::Forbidden);

    let unchanged = fx.store.get_by_id(post.id).await.unwrap();
    assert_eq!(unchanged, post);
}

#[tokio::test]
async fn test_update_unknown_post_is_post_not_found() {
    let fx = Fixture::new();
    let author = fx.viewer("sandra").await;

    let result = posts::update_post(&fx.store, Some(&author), 404, PostChanges::default()).await;

    assert!(matches!(result, Err(DomainError::PostNotFound(404))));
}

#[tokio::test]
async fn test_delete_is_soft_and_hides_post_from_others() {
    let fx = Fixture::new();
    let author = fx.viewer("sandra").await;
    let post = posts::create_post(&fx.store, Some(&author), draft("T", "#a"))
        .await
        .unwrap();

    let deleted = posts::delete_post(&fx.store, Some(&author), post.id)
        .await
        .unwrap();
    assert!(!deleted.active);

    assert!(posts::list_posts(&fx.store, None).await.unwrap().is_empty());
    assert_eq!(
        posts::list_posts(&fx.store, Some(&author))
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_posts_by_tag_are_filtered_and_empty_result_is_an_error() {
    let fx = Fixture::new();
    let author = fx.viewer("sandra").await;
    let post = posts::create_post(&fx.store, Some(&author), draft("T", "#happy"))
        .await
        .unwrap();

    let tagged = posts::list_posts_by_tag(&fx.store, "#happy", None)
        .await
        .unwrap();
    assert_eq!(tagged.len(), 1);

    posts::delete_post(&fx.store, Some(&author), post.id)
        .await
        .unwrap();
    let hidden = posts::list_posts_by_tag(&fx.store, "#happy", None).await;
    assert!(matches!(hidden, Err(DomainError::NoPostsMatchTag(_))));

    let unknown = posts::list_posts_by_tag(&fx.store, "#sad", None).await;
    assert!(matches!(unknown, Err(DomainError::NoPostsMatchTag(_))));
}

#[tokio::test]
async fn test_deactivated_author_posts_hidden_from_anonymous_but_not_from_author() {
    let fx = Fixture::new();
    let signed_in = fx.register("sandra").await;
    let author = Viewer::from(&signed_in.user);
    let stranger = fx.viewer("albert").await;
    let post = posts::create_post(&fx.store, Some(&author), draft("T", "#a"))
        .await
        .unwrap();

    users::deactivate_user(&fx.store, Some(&author), author.id)
        .await
        .unwrap();
    let deactivated = Viewer {
        active: false,
        ..author.clone()
    };

    assert!(posts::list_posts(&fx.store, None).await.unwrap().is_empty());
    assert!(
        posts::list_posts(&fx.store, Some(&stranger))
            .await
            .unwrap()
            .is_empty()
    );
    let own = posts::list_posts(&fx.store, Some(&deactivated))
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, post.id);

    let hijack = posts::delete_post(&fx.store, Some(&stranger), post.id).await;
    assert_eq!(hijack.unwrap_err().kind(), ErrorKind::Forbidden);
}
