//! refresco.rs
//! Temporizador único de refresco de alertas. Arrancar uno nuevo cancela el
//! anterior: nunca hay dos sondeos concurrentes.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    /// Llama a `tick` cada `period`; la primera vez tras un periodo completo.
    pub fn start<F, Fut>(&mut self, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            let mut iv = interval_at(Instant::now() + period, period);
            iv.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                iv.tick().await;
                tick().await;
            }
        }));
    }

    /// Detiene el temporizador activo, si lo hay.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(h) => {
                h.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) { self.stop(); }
}
