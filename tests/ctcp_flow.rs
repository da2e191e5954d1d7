//! End-to-end CTCP flows: raw IRC line in, NOTICE/PRIVMSG out.

mod common;

use async_trait::async_trait;
use common::{Outbound, TestHarness, transmit::fast_config};
use slctcp::config::CtcpConfig;
use slctcp::error::{HandlerError, HandlerResult};
use slctcp::handlers::PingHandler;
use slctcp::{Context, CtcpHandler, Direction, Registry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn notice(target: &str, text: &str) -> Outbound {
    Outbound::Notice {
        target: target.to_owned(),
        text: text.to_owned(),
    }
}

fn privmsg(target: &str, text: &str) -> Outbound {
    Outbound::Privmsg {
        target: target.to_owned(),
        text: text.to_owned(),
    }
}

/// Forwards every token it sees to the test.
struct Capture {
    tx: mpsc::UnboundedSender<(String, Vec<String>, Direction)>,
}

#[async_trait]
impl CtcpHandler for Capture {
    async fn handle(&self, ctx: &Context<'_>, args: &[String]) -> HandlerResult {
        let _ = self
            .tx
            .send((ctx.command.to_owned(), args.to_vec(), ctx.direction));
        Ok(())
    }
}

fn seen(command: &str, args: &[&str], direction: Direction) -> (String, Vec<String>, Direction) {
    (
        command.to_owned(),
        args.iter().map(|a| a.to_string()).collect(),
        direction,
    )
}

struct Failing;

#[async_trait]
impl CtcpHandler for Failing {
    async fn handle(&self, _ctx: &Context<'_>, _args: &[String]) -> HandlerResult {
        Err(HandlerError::Internal("boom".into()))
    }
}

#[tokio::test]
async fn version_request_in_channel_is_answered_to_sender() {
    let mut h = TestHarness::with_builtins();

    h.client
        .on_line(":alice!a@example.org PRIVMSG #rust :hello \x01VERSION\x01\r\n")
        .await;

    let expected = format!("\x01VERSION slctcp {}\x01", env!("CARGO_PKG_VERSION"));
    assert_eq!(h.recv().await, notice("alice", &expected));
    h.assert_silent().await;
}

#[tokio::test]
async fn configured_version_is_sent_with_plain_spaces() {
    let config = CtcpConfig {
        version: "bot 2.0 (linux)".into(),
        ..fast_config()
    };
    let registry = Registry::with_builtins(&config);
    let mut h = TestHarness::build(&config, |c| c.with_registry(registry));

    h.client
        .on_line(":alice!a@h PRIVMSG me :\x01version\x01")
        .await;

    assert_eq!(h.recv().await, notice("alice", "\x01VERSION bot 2.0 (linux)\x01"));
}

#[tokio::test]
async fn clientinfo_lists_and_describes_commands() {
    let mut h = TestHarness::with_builtins();

    h.client
        .on_line(":bob!b@h PRIVMSG me :\x01CLIENTINFO\x01")
        .await;
    assert_eq!(
        h.recv().await,
        notice("bob", "\x01CLIENTINFO CLIENTINFO PING SOURCE TIME VERSION\x01")
    );

    h.client
        .on_line(":bob!b@h PRIVMSG me :\x01CLIENTINFO ping\x01")
        .await;
    assert_eq!(
        h.recv().await,
        notice("bob", "\x01CLIENTINFO Returns a PING response.\x01")
    );
}

#[tokio::test]
async fn ping_echoes_arguments_with_quoting() {
    let mut h = TestHarness::with_builtins();

    h.client
        .on_line(":bob!b@h PRIVMSG me :\x01PING 1700000000 a\\@b\x01")
        .await;

    assert_eq!(
        h.recv().await,
        notice("bob", "\x01PING 1700000000 a\\@b\x01")
    );
}

#[tokio::test]
async fn time_reply_is_rfc2822() {
    let mut h = TestHarness::with_builtins();

    h.client.on_line(":bob!b@h PRIVMSG me :\x01TIME\x01").await;

    let reply = h.recv().await;
    let body = reply
        .text()
        .strip_prefix("\x01TIME ")
        .and_then(|rest| rest.strip_suffix('\x01'))
        .expect("TIME reply framing");
    assert!(chrono::DateTime::parse_from_rfc2822(body).is_ok(), "{body}");
}

#[tokio::test]
async fn source_reply_uses_configured_location() {
    let mut h = TestHarness::with_builtins();

    h.client.on_line(":bob!b@h PRIVMSG me :\x01SOURCE\x01").await;

    let expected = format!("\x01SOURCE {}\x01", env!("CARGO_PKG_REPOSITORY"));
    assert_eq!(h.recv().await, notice("bob", &expected));
}

#[tokio::test]
async fn several_tokens_are_answered_in_order() {
    let mut h = TestHarness::with_builtins();

    h.client
        .on_line(":bob!b@h PRIVMSG me :hi \x01PING 1\x01 there \x01PING 2\x01 \x01ACTION waves")
        .await;

    assert_eq!(h.recv().await, notice("bob", "\x01PING 1\x01"));
    assert_eq!(h.recv().await, notice("bob", "\x01PING 2\x01"));
    h.assert_silent().await;
}

#[tokio::test]
async fn notices_are_never_answered() {
    let mut h = TestHarness::with_builtins();

    h.client
        .on_line(":bob!b@h NOTICE me :\x01VERSION other 1.0\x01")
        .await;
    h.client
        .on_line(":bob!b@h NOTICE me :\x01PING 42\x01")
        .await;

    h.assert_silent().await;
}

#[tokio::test]
async fn own_and_server_messages_are_ignored() {
    let mut h = TestHarness::with_builtins();

    h.client
        .on_line(":me!m@h PRIVMSG #rust :\x01VERSION\x01")
        .await;
    h.client
        .on_line(":ME!m@h PRIVMSG #rust :\x01PING 1\x01")
        .await;
    h.client
        .on_line(":irc.example.org PRIVMSG me :\x01VERSION\x01")
        .await;
    h.client.on_line("PRIVMSG me :\x01VERSION\x01").await;
    h.client.on_line("garbage").await;
    h.client.on_line("").await;

    h.assert_silent().await;
}

#[tokio::test]
async fn senders_without_a_nick_are_never_answered() {
    let mut h = TestHarness::with_builtins();

    h.client
        .on_line(":!u@some.host PRIVMSG me :\x01PING 1\x01")
        .await;
    h.client.on_line(":@ PRIVMSG me :\x01PING 2\x01").await;

    h.assert_silent().await;
    assert!(h.schedulers.is_empty());

    // Requests need a nick to go anywhere as well
    let err = h
        .client
        .send_ctcp_request(&slirc_ctcp::Prefix::parse("!u@some.host"), "PING", ["1"])
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "no_recipient");
    h.assert_silent().await;
}

#[tokio::test]
async fn catch_all_hooks_see_known_and_unknown_commands() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let config = fast_config();
    let mut registry = Registry::with_builtins(&config);
    registry
        .on_any_request(Arc::new(Capture { tx: tx.clone() }))
        .on_any_response(Arc::new(Capture { tx }));
    let mut h = TestHarness::build(&config, |c| c.with_registry(registry));

    h.client
        .on_line(":bob!b@h PRIVMSG me :\x01FOO bar baz\x01\x01PING 7\x01")
        .await;
    h.client
        .on_line(":bob!b@h NOTICE me :\x01VERSION other 1.0\x01")
        .await;

    assert_eq!(
        rx.recv().await.unwrap(),
        seen("FOO", &["bar", "baz"], Direction::Request)
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        seen("PING", &["7"], Direction::Request)
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        seen("VERSION", &["other", "1.0"], Direction::Response)
    );

    // Only the known request got a reply
    assert_eq!(h.recv().await, notice("bob", "\x01PING 7\x01"));
    h.assert_silent().await;
}

#[tokio::test]
async fn response_handlers_receive_replies() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut registry = Registry::new();
    registry.on_response("ping", Arc::new(Capture { tx }));
    let mut h = TestHarness::build(&fast_config(), |c| c.with_registry(registry));

    h.client
        .on_line(":bob!b@h NOTICE me :\x01PING 1700000000\x01")
        .await;
    h.client
        .on_line(":bob!b@h PRIVMSG me :\x01PING 1700000000\x01")
        .await;

    assert_eq!(
        rx.recv().await.unwrap(),
        seen("PING", &["1700000000"], Direction::Response)
    );
    assert!(rx.try_recv().is_err());
    h.assert_silent().await;
}

#[tokio::test]
async fn failing_handler_does_not_stop_dispatch() {
    let config = fast_config();
    let mut registry = Registry::with_builtins(&config);
    registry.on_request("FINGER", None, Arc::new(Failing));
    let mut h = TestHarness::build(&config, |c| c.with_registry(registry));

    h.client
        .on_line(":bob!b@h PRIVMSG me :\x01FINGER\x01\x01PING 1\x01")
        .await;

    assert_eq!(h.recv().await, notice("bob", "\x01PING 1\x01"));
}

#[tokio::test]
async fn builtin_shared_into_another_registry_answers_once() {
    let config = fast_config();
    let owner = Registry::with_builtins(&config);
    let mut other = Registry::new();
    other.on_request("PING", None, Arc::new(PingHandler::new(owner.id())));
    let mut h = TestHarness::build(&config, |c| c.with_registry(owner).with_registry(other));

    h.client.on_line(":bob!b@h PRIVMSG me :\x01PING 9\x01").await;

    assert_eq!(h.recv().await, notice("bob", "\x01PING 9\x01"));
    h.assert_silent().await;
}

#[tokio::test]
async fn reply_flood_is_capped_by_queue_size() {
    let config = CtcpConfig {
        reply_queue_size: 2,
        reply_rate: 0.05,
        ..CtcpConfig::default()
    };
    let registry = Registry::with_builtins(&config);
    let mut h = TestHarness::build(&config, |c| c.with_registry(registry));

    let flood: String = (0..6).map(|i| format!("\x01PING {i}\x01")).collect();
    h.client
        .on_line(&format!(":mallory!m@h PRIVMSG me :{flood}"))
        .await;

    let mut received = Vec::new();
    while let Some(line) = h.recv_timeout(Duration::from_millis(300)).await {
        received.push(line);
    }
    assert_eq!(
        received,
        [
            notice("mallory", "\x01PING 0\x01"),
            notice("mallory", "\x01PING 1\x01"),
        ]
    );
    assert_eq!(h.schedulers.len(), 1);
}

#[tokio::test]
async fn requests_bypass_the_reply_queue() {
    let config = CtcpConfig {
        reply_queue_size: 1,
        reply_rate: 10.0,
        ..CtcpConfig::default()
    };
    let mut h = TestHarness::build(&config, |c| c);

    for _ in 0..3 {
        h.client
            .send_ctcp_request("bob", "PING", ["1700000000"])
            .await
            .unwrap();
    }
    h.client.send_action("#rust", "waves hello").await.unwrap();

    for _ in 0..3 {
        assert_eq!(h.recv().await, privmsg("bob", "\x01PING 1700000000\x01"));
    }
    assert_eq!(h.recv().await, privmsg("#rust", "\x01ACTION waves hello\x01"));
    assert!(h.schedulers.is_empty());
}

#[tokio::test]
async fn removing_a_connection_stops_its_replies() {
    let mut h = TestHarness::build(
        &CtcpConfig {
            reply_rate: 0.2,
            ..CtcpConfig::default()
        },
        |c| c.with_registry(Registry::with_builtins(&CtcpConfig::default())),
    );

    h.client
        .on_line(":bob!b@h PRIVMSG me :\x01PING 1\x01\x01PING 2\x01")
        .await;
    assert_eq!(h.recv().await, notice("bob", "\x01PING 1\x01"));

    assert!(h.schedulers.remove(h.client.connection().id()));
    h.assert_silent().await;
}
