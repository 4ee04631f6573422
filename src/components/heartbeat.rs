//! # Built-in heartbeat component.
//!
//! Publishes a periodic [`EventKind::Heartbeat`] so operators (and tests) can
//! tell the management layer is alive even when no unit activity occurs.
//! Interval comes from `heartbeat.interval.ms`.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::components::component::Component;
use crate::config::Config;
use crate::error::ComponentError;
use crate::events::{Bus, Event, EventKind};

/// Periodic liveness beat, published on the event bus.
pub struct Heartbeat {
    bus: Bus,
    interval: Mutex<Duration>,
    token: Mutex<Option<CancellationToken>>,
}

impl Heartbeat {
    /// Creates a heartbeat publishing on `bus`. Interval is read at `init`.
    pub fn new(bus: Bus) -> Self {
        Self {
            bus,
            interval: Mutex::new(Duration::from_secs(60)),
            token: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Component for Heartbeat {
    fn name(&self) -> &str {
        "heartbeat"
    }

    async fn init(&self, cfg: &Config) -> Result<(), ComponentError> {
        *self.interval.lock().expect("heartbeat lock poisoned") = cfg.heartbeat_interval();
        Ok(())
    }

    async fn start(&self) -> Result<(), ComponentError> {
        let token = CancellationToken::new();
        {
            let mut slot = self.token.lock().expect("heartbeat lock poisoned");
            if slot.is_some() {
                return Err(ComponentError::new("heartbeat already started"));
            }
            *slot = Some(token.clone());
        }

        let bus = self.bus.clone();
        let interval = *self.interval.lock().expect("heartbeat lock poisoned");
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        bus.publish(Event::new(EventKind::Heartbeat).with_component("heartbeat"));
                    }
                }
            }
        });
        Ok(())
    }

    async fn stop(&self) -> Result<(), ComponentError> {
        if let Some(token) = self.token.lock().expect("heartbeat lock poisoned").take() {
            token.cancel();
        }
        Ok(())
    }

    async fn destroy(&self) -> Result<(), ComponentError> {
        // stop() already released the worker; nothing else is held.
        Ok(())
    }
}
