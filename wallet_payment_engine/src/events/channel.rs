//! Simple stateless pub-sub event handler
//!
//! Side effects that must not abort the primary reconciliation flow (customer notifications, order fulfilment
//! triggers) subscribe here instead of being called inline. The handler is stateless: subscribers receive the
//! event itself and nothing else, and failures are logged on this channel rather than propagated back into the
//! reconciliation result.
//!
//! Handlers can be async.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size);
        Self { listener: receiver, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Dispatches incoming events to the handler, each on its own task. Returns once every producer has been
    /// dropped and all in-flight handler invocations have finished.
    pub async fn start_handler(mut self) {
        debug!("📬️ Event handler running");
        // Our own copy of the sender must go, or the receive loop would never see the channel close.
        drop(self.sender);
        let mut in_flight = JoinSet::new();
        while let Some(event) = self.listener.recv().await {
            trace!("📬️ Dispatching event");
            let handler = Arc::clone(&self.handler);
            in_flight.spawn(async move {
                (handler)(event).await;
            });
        }
        debug!("📬️ All producers gone, draining {} in-flight handler(s)", in_flight.len());
        while let Some(finished) = in_flight.join_next().await {
            if let Err(e) = finished {
                warn!("📬️ An event handler task aborted: {e}");
            }
        }
        debug!("📬️ Event handler has shut down");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Event dropped, no handler is listening: {e}");
        }
    }
}
