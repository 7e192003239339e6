mod credentials;

use crate::{
    ConnectionManager, ConsoleEndpoint, ConsoleEvent, Effect, Generation, Input, StaticToken,
    SubscriptionKey, TimerId,
};

use std::env;
use std::sync::Arc;
use std::time::Duration;

use lc_core::ServerStatus;
use url::Url;

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

pub(crate) fn test_key() -> SubscriptionKey {
    SubscriptionKey::parse("srv-1").unwrap()
}

pub(crate) fn test_endpoint() -> ConsoleEndpoint {
    ConsoleEndpoint::new(
        Url::parse("http://127.0.0.1:3000").unwrap(),
        Url::parse("ws://127.0.0.1:3000").unwrap(),
    )
}

pub(crate) fn create_manager(status: ServerStatus) -> ConnectionManager {
    ConnectionManager::new(
        test_key(),
        test_endpoint(),
        Arc::new(StaticToken::new("secret")),
    )
    .with_initial_status(status)
}

/// Manager with an open connection; history already settled
pub(crate) fn open_manager(status: ServerStatus) -> (ConnectionManager, Generation) {
    let mut manager = create_manager(status);
    let generation = opened(&manager.ensure_connected()).unwrap();
    manager.handle(Input::TransportOpened { generation });
    manager.handle(Input::HistoryLoaded {
        generation,
        result: Ok(Vec::new()),
    });
    (manager, generation)
}

pub(crate) fn opened(effects: &[Effect]) -> Option<Generation> {
    effects.iter().find_map(|effect| match effect {
        Effect::Open { generation, .. } => Some(*generation),
        _ => None,
    })
}

pub(crate) fn scheduled(effects: &[Effect]) -> Option<(TimerId, Duration)> {
    effects.iter().find_map(|effect| match effect {
        Effect::ScheduleRetry { timer, delay } => Some((*timer, *delay)),
        _ => None,
    })
}

pub(crate) fn events(effects: &[Effect]) -> Vec<ConsoleEvent> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Emit(event) => Some(event.clone()),
            _ => None,
        })
        .collect()
}

pub(crate) fn frame(generation: Generation, text: &str) -> Input {
    Input::Frame {
        generation,
        text: text.to_string(),
    }
}

pub(crate) fn dropped(generation: Generation) -> Input {
    Input::TransportClosed {
        generation,
        reason: Some("connection reset".to_string()),
    }
}
