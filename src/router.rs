use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::platform::{IncomingMessage, Outbound};

/// Something that reacts to a routed message.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, message: &IncomingMessage, out: &dyn Outbound) -> Result<()>;
}

type Predicate = Box<dyn Fn(&IncomingMessage) -> bool + Send + Sync>;

struct Route {
    name: &'static str,
    predicate: Predicate,
    handler: Arc<dyn Handler>,
}

/// Ordered predicate -> handler table. The first matching route wins.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Registration order is match order.
    pub fn register<P>(
        &mut self,
        name: &'static str,
        predicate: P,
        handler: Arc<dyn Handler>,
    ) -> &mut Self
    where
        P: Fn(&IncomingMessage) -> bool + Send + Sync + 'static,
    {
        self.routes.push(Route {
            name,
            predicate: Box::new(predicate),
            handler,
        });
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.routes.len()
    }

    /// Run the first route whose predicate matches, awaiting it to completion.
    ///
    /// Returns the name of the route that ran, or `None` if nothing matched.
    /// Handler errors are passed through untouched.
    pub async fn dispatch(
        &self,
        message: &IncomingMessage,
        out: &dyn Outbound,
    ) -> Result<Option<&'static str>> {
        let Some(route) = self.routes.iter().find(|r| (r.predicate)(message)) else {
            debug!("No route for message {} in chat {}", message.message_id, message.chat_id);
            return Ok(None);
        };

        info!(
            "Routing {} message {} from chat {} to '{}'",
            message.modality.name(),
            message.message_id,
            message.chat_id,
            route.name
        );
        route.handler.handle(message, out).await?;
        Ok(Some(route.name))
    }
}
