//! Built-in CTCP request handlers: CLIENTINFO, VERSION, PING, TIME, SOURCE.
//!
//! Each one is bound to the registry that created it and stays silent when
//! dispatched by any other, so two registries sharing a connection never
//! answer the same request twice.

use super::context::{Context, CtcpHandler};
use super::registry::RegistryId;
use crate::error::HandlerResult;
use async_trait::async_trait;

/// Lists the registry's commands, or describes one of them.
///
/// `CLIENTINFO` replies with every command name; `CLIENTINFO <cmd>`
/// replies with the description registered for `<cmd>` when there is one.
pub struct ClientInfoHandler {
    owner: RegistryId,
}

impl ClientInfoHandler {
    pub fn new(owner: RegistryId) -> Self {
        Self { owner }
    }
}

#[async_trait]
impl CtcpHandler for ClientInfoHandler {
    async fn handle(&self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        if ctx.registry.id() != self.owner {
            return Ok(());
        }

        if let [command] = args
            && let Some(description) = ctx.registry.description(command)
        {
            ctx.client
                .send_ctcp_reply(ctx.sender, "CLIENTINFO", [description]);
            return Ok(());
        }

        let commands: Vec<&str> = ctx.registry.commands().collect();
        ctx.client.send_ctcp_reply(ctx.sender, "CLIENTINFO", commands);
        Ok(())
    }
}

/// Replies with the configured client name and version.
pub struct VersionHandler {
    owner: RegistryId,
    words: Vec<String>,
}

impl VersionHandler {
    pub fn new(owner: RegistryId, version: &str) -> Self {
        Self {
            owner,
            words: version.split_whitespace().map(str::to_owned).collect(),
        }
    }
}

#[async_trait]
impl CtcpHandler for VersionHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        if ctx.registry.id() != self.owner {
            return Ok(());
        }
        ctx.client.send_ctcp_reply(ctx.sender, "VERSION", &self.words);
        Ok(())
    }
}

/// Echoes the request arguments back.
pub struct PingHandler {
    owner: RegistryId,
}

impl PingHandler {
    pub fn new(owner: RegistryId) -> Self {
        Self { owner }
    }
}

#[async_trait]
impl CtcpHandler for PingHandler {
    async fn handle(&self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        if ctx.registry.id() != self.owner {
            return Ok(());
        }
        ctx.client.send_ctcp_reply(ctx.sender, "PING", args);
        Ok(())
    }
}

/// Replies with the local time in RFC 2822 form.
pub struct TimeHandler {
    owner: RegistryId,
}

impl TimeHandler {
    pub fn new(owner: RegistryId) -> Self {
        Self { owner }
    }
}

#[async_trait]
impl CtcpHandler for TimeHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        if ctx.registry.id() != self.owner {
            return Ok(());
        }
        let now = chrono::Local::now().to_rfc2822();
        ctx.client.send_ctcp_reply(ctx.sender, "TIME", [now]);
        Ok(())
    }
}

/// Replies with the configured source location.
pub struct SourceHandler {
    owner: RegistryId,
    source: String,
}

impl SourceHandler {
    pub fn new(owner: RegistryId, source: &str) -> Self {
        Self {
            owner,
            source: source.to_owned(),
        }
    }
}

#[async_trait]
impl CtcpHandler for SourceHandler {
    async fn handle(&self, ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        if ctx.registry.id() != self.owner {
            return Ok(());
        }
        ctx.client
            .send_ctcp_reply(ctx.sender, "SOURCE", [self.source.as_str()]);
        Ok(())
    }
}
