//! Shared fixtures for integration tests

#![allow(dead_code)]

use anyhow::anyhow;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use waitlist_backend::{
    api::{build_router, AppState},
    auth::JwtHandler,
    notifier::{Message, Notifier},
    waitlist::{WaitlistService, WaitlistStore},
};

pub const PRIVATE_PEM: &str = include_str!("../fixtures/primary_private.pem");
pub const PUBLIC_PEM: &str = include_str!("../fixtures/primary_public.pem");
pub const OTHER_PRIVATE_PEM: &str = include_str!("../fixtures/other_private.pem");
pub const OTHER_PUBLIC_PEM: &str = include_str!("../fixtures/other_public.pem");

/// Notifier that records messages and can be told to fail
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Message>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &Message) -> anyhow::Result<()> {
        if self.fail {
            return Err(anyhow!("provider unavailable"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn jwt_handler() -> Arc<JwtHandler> {
    Arc::new(JwtHandler::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap())
}

/// Everything a test needs to drive the app and inspect its side effects
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<WaitlistStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::default())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        let store = Arc::new(WaitlistStore::in_memory().unwrap());
        let notifier = Arc::new(notifier);
        let jwt = jwt_handler();
        let service = Arc::new(WaitlistService::new(
            store.clone(),
            notifier.clone(),
            jwt.clone(),
            Duration::from_secs(5),
        ));

        Self {
            state: AppState::new(service, jwt),
            store,
            notifier,
        }
    }

    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    pub fn token(&self, email: &str) -> String {
        self.state.jwt_handler.generate_token(email).unwrap()
    }
}
