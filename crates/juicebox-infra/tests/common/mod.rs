#![allow(dead_code)]

use juicebox_core::domain::{Viewer, parse_tag_list};
use juicebox_core::service::users::{self, SignedIn};
use juicebox_core::service::{PostDraft, Registration};
use juicebox_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

pub struct Fixture {
    pub store: InMemoryStore,
    pub passwords: Argon2PasswordService,
    pub tokens: JwtTokenService,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: InMemoryStore::new(),
            passwords: Argon2PasswordService::new(),
            tokens: JwtTokenService::new(JwtConfig {
                secret: "integration-secret".to_string(),
                ..JwtConfig::default()
            }),
        }
    }

    pub async fn register(&self, username: &str) -> SignedIn {
        users::register(
            &self.store,
            &self.passwords,
            &self.tokens,
            registration(username, "pw123"),
        )
        .await
        .unwrap()
    }

    pub async fn viewer(&self, username: &str) -> Viewer {
        Viewer::from(&self.register(username).await.user)
    }
}

pub fn registration(username: &str, password: &str) -> Registration {
    Registration {
        username: username.to_string(),
        password: password.to_string(),
        name: "Test User".to_string(),
        location: "Testville".to_string(),
    }
}

pub fn draft(title: &str, tags: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        content: "C".to_string(),
        tags: parse_tag_list(tags),
    }
}
