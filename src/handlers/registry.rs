//! CTCP handler registry and dispatch.

use super::builtin::{ClientInfoHandler, PingHandler, SourceHandler, TimeHandler, VersionHandler};
use super::context::{Context, CtcpHandler, Direction};
use crate::client::CtcpClient;
use crate::config::CtcpConfig;
use crate::metrics;
use crate::telemetry::DispatchTimer;
use slirc_ctcp::{CtcpToken, Prefix};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Process-unique identity of a [`Registry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistryId(u64);

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

impl RegistryId {
    fn next() -> Self {
        Self(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Registry of CTCP handlers.
///
/// Command names are stored uppercase. Several registries may be attached
/// to one client; each only ever dispatches to its own handlers.
pub struct Registry {
    id: RegistryId,
    requests: BTreeMap<String, Arc<dyn CtcpHandler>>,
    responses: BTreeMap<String, Arc<dyn CtcpHandler>>,
    descriptions: BTreeMap<String, String>,
    any_request: Option<Arc<dyn CtcpHandler>>,
    any_response: Option<Arc<dyn CtcpHandler>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            id: RegistryId::next(),
            requests: BTreeMap::new(),
            responses: BTreeMap::new(),
            descriptions: BTreeMap::new(),
            any_request: None,
            any_response: None,
        }
    }

    /// Create a registry answering CLIENTINFO, VERSION, PING, TIME and SOURCE.
    pub fn with_builtins(config: &CtcpConfig) -> Self {
        let mut registry = Self::new();
        let owner = registry.id;

        registry.on_request(
            "CLIENTINFO",
            Some("Returns a list of the supported CTCP commands."),
            Arc::new(ClientInfoHandler::new(owner)),
        );
        registry.on_request(
            "VERSION",
            Some("Returns the client name and version."),
            Arc::new(VersionHandler::new(owner, &config.version)),
        );
        registry.on_request(
            "PING",
            Some("Returns a PING response."),
            Arc::new(PingHandler::new(owner)),
        );
        registry.on_request(
            "TIME",
            Some("Returns the local time."),
            Arc::new(TimeHandler::new(owner)),
        );
        registry.on_request(
            "SOURCE",
            Some("Returns where the client source can be found."),
            Arc::new(SourceHandler::new(owner, &config.source)),
        );

        registry
    }

    pub fn id(&self) -> RegistryId {
        self.id
    }

    /// Register the handler for requests named `command`.
    ///
    /// `description` is what CLIENTINFO reports when asked about `command`.
    /// A second registration for the same command replaces the first.
    pub fn on_request(
        &mut self,
        command: &str,
        description: Option<&str>,
        handler: Arc<dyn CtcpHandler>,
    ) -> &mut Self {
        let name = command.to_ascii_uppercase();
        match description {
            Some(description) => {
                self.descriptions.insert(name.clone(), description.to_owned());
            }
            None => {
                self.descriptions.remove(&name);
            }
        }
        self.requests.insert(name, handler);
        self
    }

    /// Register the handler for replies named `command`.
    pub fn on_response(&mut self, command: &str, handler: Arc<dyn CtcpHandler>) -> &mut Self {
        self.responses.insert(command.to_ascii_uppercase(), handler);
        self
    }

    /// Register a hook called for every request, known or not.
    pub fn on_any_request(&mut self, handler: Arc<dyn CtcpHandler>) -> &mut Self {
        self.any_request = Some(handler);
        self
    }

    /// Register a hook called for every reply, known or not.
    pub fn on_any_response(&mut self, handler: Arc<dyn CtcpHandler>) -> &mut Self {
        self.any_response = Some(handler);
        self
    }

    /// Request command names with a handler, sorted.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.requests.keys().map(String::as_str)
    }

    /// Description registered for `command` (any case).
    pub fn description(&self, command: &str) -> Option<&str> {
        self.descriptions
            .get(&command.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Route one token to its handler and to the catch-all hook.
    ///
    /// Unknown commands only reach the catch-all. Handler failures are
    /// logged and counted, never returned.
    pub async fn dispatch(
        &self,
        client: &CtcpClient,
        direction: Direction,
        sender: &Prefix,
        target: &str,
        token: &CtcpToken,
    ) {
        let name = token.name();
        let (table, any) = match direction {
            Direction::Request => (&self.requests, &self.any_request),
            Direction::Response => (&self.responses, &self.any_response),
        };

        let ctx = Context {
            command: &token.command,
            client,
            registry: self,
            sender,
            target,
            direction,
        };

        let _timer = DispatchTimer::new(&name);

        match table.get(&name) {
            Some(handler) => self.run(handler, &ctx, &name, &token.args).await,
            None => debug!(command = %name, %direction, "No CTCP handler registered"),
        }

        if let Some(handler) = any {
            self.run(handler, &ctx, &name, &token.args).await;
        }
    }

    async fn run(
        &self,
        handler: &Arc<dyn CtcpHandler>,
        ctx: &Context<'_>,
        name: &str,
        args: &[String],
    ) {
        if let Err(e) = handler.handle(ctx, args).await {
            metrics::record_handler_error(name, e.error_code());
            debug!(command = %name, error = %e, "CTCP handler error");
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.id)
            .field("requests", &self.requests.keys().collect::<Vec<_>>())
            .field("responses", &self.responses.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
