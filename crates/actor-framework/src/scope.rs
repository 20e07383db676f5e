//! # Actor Scope & Timers
//!
//! Background timers run as independent Tokio tasks that send a `Tick` message back to the
//! actor that owns them. The [`ActorScope`] keeps the task handles so the actor can cancel
//! them before it stops accepting messages.
//!
//! Timer tasks only hold a *weak* sender. A tick that races with the actor's termination finds
//! the channel gone and the task ends quietly.

use crate::client::EntityClient;
use crate::entity::ActorEntity;
use crate::message::EntityRequest;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::WeakSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

/// Per-actor timer registry and self handle.
pub struct ActorScope<T: ActorEntity> {
    this: WeakSender<EntityRequest<T>>,
    timeout: Duration,
    timers: HashMap<&'static str, JoinHandle<()>>,
}

impl<T: ActorEntity> ActorScope<T> {
    pub(crate) fn new(client: &EntityClient<T>) -> Self {
        Self {
            this: client.downgrade(),
            timeout: client.timeout(),
            timers: HashMap::new(),
        }
    }

    /// A client addressing the actor that owns this scope.
    ///
    /// `None` once every strong handle has been dropped.
    pub fn client(&self) -> Option<EntityClient<T>> {
        self.this
            .upgrade()
            .map(|sender| EntityClient::new(sender).with_timeout(self.timeout))
    }

    pub(crate) fn downgrade(&self) -> WeakSender<EntityRequest<T>> {
        self.this.clone()
    }

    /// Starts (or restarts) a periodic timer.
    ///
    /// The first tick fires after `delay`, later ticks every `period`.
    pub fn start_ticker(&mut self, key: &'static str, delay: Duration, period: Duration, tick: T::Tick) {
        self.stop(key);
        let this = self.this.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + delay, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !deliver(&this, tick.clone()).await {
                    trace!(timer = key, "Owner gone, ticker exits");
                    break;
                }
            }
        });
        self.timers.insert(key, handle);
    }

    /// Starts (or restarts) a one-shot timer firing after `delay`.
    pub fn start_timer(&mut self, key: &'static str, delay: Duration, tick: T::Tick) {
        self.stop(key);
        let this = self.this.clone();
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            if !deliver(&this, tick).await {
                trace!(timer = key, "Owner gone, timer dropped");
            }
        });
        self.timers.insert(key, handle);
    }

    /// Cancels a timer. Stopping an unknown or already stopped timer is a no-op.
    pub fn stop(&mut self, key: &'static str) -> bool {
        match self.timers.remove(key) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }

    pub fn is_running(&self, key: &'static str) -> bool {
        self.timers
            .get(key)
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl<T: ActorEntity> Drop for ActorScope<T> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

async fn deliver<T: ActorEntity>(this: &WeakSender<EntityRequest<T>>, tick: T::Tick) -> bool {
    match this.upgrade() {
        Some(sender) => sender.send(EntityRequest::Tick(tick)).await.is_ok(),
        None => false,
    }
}
