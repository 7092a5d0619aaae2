use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, SubmissionMatchedEvent, SubmissionRejectedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub submission_matched_producer: Vec<EventProducer<SubmissionMatchedEvent>>,
    pub submission_rejected_producer: Vec<EventProducer<SubmissionRejectedEvent>>,
}

pub struct EventHandlers {
    pub on_submission_matched: Option<EventHandler<SubmissionMatchedEvent>>,
    pub on_submission_rejected: Option<EventHandler<SubmissionRejectedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_submission_matched = hooks.on_submission_matched.map(|f| EventHandler::new(buffer_size, f));
        let on_submission_rejected = hooks.on_submission_rejected.map(|f| EventHandler::new(buffer_size, f));
        Self { on_submission_matched, on_submission_rejected }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_submission_matched {
            result.submission_matched_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_submission_rejected {
            result.submission_rejected_producer.push(handler.subscribe());
        }
        result
    }

    /// Runs the handlers until every subscribed producer has been dropped and all in-flight events have been
    /// handled. Callers typically spawn this.
    pub async fn start_handlers(self) {
        let matched = self.on_submission_matched.map(|handler| tokio::spawn(handler.start_handler()));
        let rejected = self.on_submission_rejected.map(|handler| tokio::spawn(handler.start_handler()));
        if let Some(handle) = matched {
            let _ = handle.await;
        }
        if let Some(handle) = rejected {
            let _ = handle.await;
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_submission_matched: Option<Handler<SubmissionMatchedEvent>>,
    pub on_submission_rejected: Option<Handler<SubmissionRejectedEvent>>,
}

impl EventHooks {
    pub fn on_submission_matched<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SubmissionMatchedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_submission_matched = Some(Arc::new(f));
        self
    }

    pub fn on_submission_rejected<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SubmissionRejectedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_submission_rejected = Some(Arc::new(f));
        self
    }
}
