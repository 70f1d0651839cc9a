use std::sync::Arc;

use collabup_app::app::{Collaborators, service};
use collabup_core::config::{Secret, Settings};
use collabup_db::db::collections;
use collabup_db::db::memory::MemoryDocumentStore;
use collabup_service::auth::PathPolicy;
use collabup_service::storage::V4Signer;
use salvo::Service;
use serde_json::{Value, json};

use crate::doubles::{RecordingMailer, StaticVerifier};

pub const TEST_BUCKET: &str = "collabup-test.appspot.com";
pub const TEST_ACCESS_ID: &str = "GOOGTESTACCESSID";
pub const FEEDBACK_RECIPIENT: &str = "team@collabup.app";
pub const EXTRA_ORIGIN: &str = "https://staging.collabup.app";

const TEST_CONFIG: &str = r#"
    [database]
    backend = "memory"

    [identity]
    method = "single_user"

    [storage]
    bucket = "collabup-test.appspot.com"
    url_ttl_secs = 300

    [mail]
    method = "log"
    feedback_recipient = "team@collabup.app"

    [cors]
    allowed_origins = ["https://staging.collabup.app"]
"#;

/// ## Summary
/// Settings used by every test service.
///
/// ## Panics
/// Panics if the embedded test configuration does not load.
#[must_use]
#[expect(clippy::expect_used, reason = "The embedded test config is static")]
pub fn test_settings() -> Settings {
    Settings::from_toml(TEST_CONFIG).expect("test config should load")
}

/// A full service wired to an in-memory store, a static verifier and a recording mailer.
pub struct TestApp {
    pub store: Arc<MemoryDocumentStore>,
    pub mailer: Arc<RecordingMailer>,
    pub service: Service,
}

impl TestApp {
    /// ## Panics
    /// Panics if the test signer cannot be built.
    #[must_use]
    #[expect(clippy::expect_used, reason = "Test service creation failure is fatal")]
    pub fn new() -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let signer = V4Signer::hmac(
            "https://storage.googleapis.com",
            TEST_BUCKET,
            TEST_ACCESS_ID,
            Secret::new("test-secret"),
        )
        .expect("test signer should build");

        let collaborators = Collaborators {
            store: store.clone(),
            verifier: Arc::new(StaticVerifier),
            mailer: mailer.clone(),
            signer: Arc::new(signer),
            policy: Arc::new(PathPolicy::default()),
        };

        Self {
            store,
            mailer,
            service: service(Arc::new(test_settings()), collaborators),
        }
    }

    /// ## Summary
    /// Seeds `users/{uid}` with the given role.
    pub async fn seed_user(&self, uid: &str, role: &str) {
        self.seed_user_with(uid, json!({ "role": role })).await;
    }

    /// ## Summary
    /// Seeds `users/{uid}` with an arbitrary profile.
    pub async fn seed_user_with(&self, uid: &str, profile: Value) {
        self.store.insert(collections::USERS, uid, profile).await;
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
