use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::events::{ClientUpdatedEvent, EventHandler, EventProducer, EventType, Handler, OrderUpdatedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_updated_producer: Vec<EventProducer<OrderUpdatedEvent>>,
    pub client_updated_producer: Vec<EventProducer<ClientUpdatedEvent>>,
}

impl EventProducers {
    /// Routes `event` to every subscriber of its kind.
    pub async fn publish(&self, event: EventType) {
        match event {
            EventType::OrderUpdated(ev) => {
                for emitter in &self.order_updated_producer {
                    emitter.publish_event(ev.clone()).await;
                }
            },
            EventType::ClientUpdated(ev) => {
                for emitter in &self.client_updated_producer {
                    emitter.publish_event(ev.clone()).await;
                }
            },
        }
    }
}

pub struct EventHandlers {
    pub on_order_updated: Option<EventHandler<OrderUpdatedEvent>>,
    pub on_client_updated: Option<EventHandler<ClientUpdatedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_updated = hooks.on_order_updated.map(|f| EventHandler::new(buffer_size, f));
        let on_client_updated = hooks.on_client_updated.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_updated, on_client_updated }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_updated {
            result.order_updated_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_client_updated {
            result.client_updated_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns one task per registered handler. Each runs until its producers are all dropped.
    pub fn start_handlers(self) -> Vec<tokio::task::JoinHandle<usize>> {
        let mut tasks = Vec::with_capacity(2);
        if let Some(handler) = self.on_order_updated {
            tasks.push(tokio::spawn(async move {
                let n = handler.start_handler().await;
                info!("📬️ Order update handler stopped after {n} events");
                n
            }));
        }
        if let Some(handler) = self.on_client_updated {
            tasks.push(tokio::spawn(async move {
                let n = handler.start_handler().await;
                info!("📬️ Client update handler stopped after {n} events");
                n
            }));
        }
        tasks
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_updated: Option<Handler<OrderUpdatedEvent>>,
    pub on_client_updated: Option<Handler<ClientUpdatedEvent>>,
}

impl EventHooks {
    pub fn on_order_updated<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderUpdatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_updated = Some(Arc::new(f));
        self
    }

    pub fn on_client_updated<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ClientUpdatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_client_updated = Some(Arc::new(f));
        self
    }
}
