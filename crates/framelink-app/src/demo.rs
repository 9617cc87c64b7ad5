//! Headless run of the whole protocol: simulated frames exchange correlated
//! requests with their windows over one shared loopback transport.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use framelink_bridge::headless::{HeadlessBackend, HeadlessEndpoint, HeadlessProcess, LoopbackTransport};
use framelink_bridge::{
    ChildInbound, ChildSession, EventKind, FrameHost, FrameLoadEvent, FrameStyle, FramedWindow,
    HostOptions, WindowEvent, WindowList,
};
use framelink_common::{FramelinkError, Result, WindowId};
use framelink_config::FramelinkConfig;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Host references start here so they never collide with a child's own
/// counter on the same window.
const HOST_REFERENCE_BASE: u64 = 1_000_000;

/// Upper bound on pump passes; every round trip settles in two.
const MAX_PUMP_PASSES: usize = 64;

pub fn host_options(config: &FramelinkConfig) -> HostOptions {
    HostOptions {
        target_origin: config.transport.target_origin.clone(),
        routing: config.transport.routing,
        frame_style: FrameStyle {
            width: config.frame.width.clone(),
            height: config.frame.height.clone(),
            border: config.frame.border,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSummary {
    pub wid: WindowId,
    /// Host requests answered by the frame.
    pub host_round_trips: u32,
    /// Frame requests answered by the host.
    pub child_round_trips: u32,
    /// Replies that carried another window's id.
    pub crossed: u32,
}

#[derive(Debug, Default)]
pub struct DemoReport {
    pub windows: Vec<WindowSummary>,
}

impl DemoReport {
    pub fn crossed(&self) -> u32 {
        self.windows.iter().map(|w| w.crossed).sum()
    }
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12} {:>10} {:>10} {:>8}", "window", "host->frame", "frame->host", "crossed")?;
        for w in &self.windows {
            writeln!(
                f,
                "{:<12} {:>10} {:>10} {:>8}",
                w.wid.to_string(),
                w.host_round_trips,
                w.child_round_trips,
                w.crossed
            )?;
        }
        writeln!(f, "total crossed: {}", self.crossed())
    }
}

#[derive(Default)]
struct HostSide {
    outstanding: HashSet<u64>,
    answered: u32,
    crossed: u32,
}

struct DemoWindow {
    framed: FramedWindow,
    endpoint: Arc<HeadlessEndpoint>,
    child: ChildSession,
    host: Arc<Mutex<HostSide>>,
    child_answered: u32,
    child_crossed: u32,
}

impl DemoWindow {
    fn wid(&self) -> WindowId {
        self.framed.wid()
    }

    /// Let the simulated frame handle everything the host posted to it.
    fn pump_child(&mut self, transport: &LoopbackTransport, origin: &str) -> usize {
        let inbox = self.endpoint.take_outbox();
        let handled = inbox.len();
        for envelope in inbox {
            match self.child.receive(&envelope) {
                ChildInbound::Handshake(wid) => debug!(window_id = %wid, "demo frame connected"),
                ChildInbound::Request { reference, payload } => {
                    let answer = json!({"window": self.wid().0, "pong": payload});
                    if let Some(data) = self.child.respond(reference, answer) {
                        transport.post(self.framed.frame().id(), origin, data);
                    }
                }
                ChildInbound::Reply { payload, .. } => {
                    self.child_answered += 1;
                    if !carries_window(&payload, self.wid()) {
                        self.child_crossed += 1;
                    }
                }
                ChildInbound::Message(_) | ChildInbound::Ignored => {}
            }
        }
        handled
    }

    fn summary(&self) -> WindowSummary {
        let (answered, crossed) = self
            .host
            .lock()
            .map(|h| (h.answered, h.crossed))
            .unwrap_or_default();
        WindowSummary {
            wid: self.wid(),
            host_round_trips: answered,
            child_round_trips: self.child_answered,
            crossed: crossed + self.child_crossed,
        }
    }
}

fn carries_window(payload: &Value, wid: WindowId) -> bool {
    payload.get("window").and_then(Value::as_u64) == Some(u64::from(wid.0))
}

/// Answer frame requests; count answers to the host's own requests.
fn install_host_handler(framed: &FramedWindow, host: Arc<Mutex<HostSide>>) {
    let wid = framed.wid();
    framed.window().events().on(EventKind::FrameMessage, move |event| {
        let WindowEvent::FrameMessage { context, payload } = event else {
            return;
        };
        let Some(responder) = context.responder.as_ref() else {
            return;
        };
        let is_answer = host
            .lock()
            .map(|mut h| h.outstanding.remove(&responder.reference()))
            .unwrap_or(false);
        if is_answer {
            if let Ok(mut h) = host.lock() {
                h.answered += 1;
                if !carries_window(payload, wid) {
                    h.crossed += 1;
                }
            }
            return;
        }
        let answer = json!({"window": wid.0, "echo": payload});
        if let Err(e) = responder.respond(answer) {
            warn!(window_id = %wid, error = %e, "demo reply failed");
        }
    });
}

pub fn run(config: &FramelinkConfig, windows: u32, requests: u32) -> Result<DemoReport> {
    let origin = config.transport.target_origin.clone();
    let registry = Arc::new(WindowList::new());
    let backend = HeadlessBackend::new(origin.clone());
    let transport = LoopbackTransport::new();
    let host = FrameHost::new(registry.clone(), backend.clone(), host_options(config));
    host.init(&transport)?;
    let process = HeadlessProcess::new(registry);

    let mut demo = Vec::new();
    for n in 0..windows {
        let framed = host.create_window(&process, ());
        let side = Arc::new(Mutex::new(HostSide::default()));
        install_host_handler(&framed, Arc::clone(&side));

        let src = format!("{origin}/demo/{n}");
        framed.open(src.clone());
        let window = process
            .window(framed.wid())
            .ok_or_else(|| FramelinkError::Other(format!("{} vanished", framed.wid())))?;
        window.mount();
        framed.frame().notify_loaded(FrameLoadEvent::new(src));

        let endpoint = backend
            .endpoint(framed.frame().id())
            .ok_or_else(|| FramelinkError::Other(format!("no endpoint for {}", framed.frame().id())))?;
        demo.push(DemoWindow {
            framed,
            endpoint,
            child: ChildSession::new(),
            host: side,
            child_answered: 0,
            child_crossed: 0,
        });
    }
    pump(&mut demo, &transport, &origin);
    info!(windows = demo.len(), routing = ?config.transport.routing, "demo windows ready");

    for round in 0..requests {
        let reference = HOST_REFERENCE_BASE + u64::from(round);
        for w in &mut demo {
            if let Some(sender) = w.framed.sender() {
                if let Ok(mut h) = w.host.lock() {
                    h.outstanding.insert(reference);
                }
                sender.request(json!({"ping": round}), reference)?;
            }
            if let Some((_, data)) = w.child.request(json!({"ask": round})) {
                transport.post(w.framed.frame().id(), &origin, data);
            }
        }
        pump(&mut demo, &transport, &origin);
    }

    let report = DemoReport {
        windows: demo.iter().map(DemoWindow::summary).collect(),
    };
    for (w, summary) in demo.iter().zip(&report.windows) {
        if summary.host_round_trips != requests || summary.child_round_trips != requests {
            warn!(window_id = %w.wid(), ?summary, "demo window has unanswered requests");
        }
    }
    Ok(report)
}

/// Alternate frame and host processing until nothing is in flight.
fn pump(demo: &mut [DemoWindow], transport: &LoopbackTransport, origin: &str) {
    for _ in 0..MAX_PUMP_PASSES {
        let handled: usize = demo.iter_mut().map(|w| w.pump_child(transport, origin)).sum();
        let delivered = transport.flush();
        if handled == 0 && delivered == 0 {
            return;
        }
    }
    warn!("demo pump did not settle");
}

#[cfg(test)]
mod tests {
    use super::*;
    use framelink_common::RoutingPolicy;

    #[test]
    fn every_window_completes_both_directions() {
        let report = run(&FramelinkConfig::default(), 3, 4).unwrap();
        assert_eq!(report.windows.len(), 3);
        for w in &report.windows {
            assert_eq!(w.host_round_trips, 4);
            assert_eq!(w.child_round_trips, 4);
            assert_eq!(w.crossed, 0);
        }
        assert_eq!(report.crossed(), 0);
    }

    #[test]
    fn verified_routing_changes_nothing_for_honest_frames() {
        let mut config = FramelinkConfig::default();
        config.transport.routing = RoutingPolicy::Verified;
        let report = run(&config, 2, 2).unwrap();
        assert!(report.windows.iter().all(|w| w.child_round_trips == 2));
        assert_eq!(report.crossed(), 0);
    }

    #[test]
    fn host_options_follow_config() {
        let mut config = FramelinkConfig::default();
        config.frame.border = 3;
        config.transport.target_origin = "https://apps.example.org".into();
        let options = host_options(&config);
        assert_eq!(options.frame_style.border, 3);
        assert_eq!(options.target_origin, "https://apps.example.org");
    }

    #[test]
    fn report_lists_each_window() {
        let report = run(&FramelinkConfig::default(), 2, 1).unwrap();
        let text = report.to_string();
        assert!(text.contains("window-1"));
        assert!(text.contains("window-2"));
        assert!(text.contains("total crossed: 0"));
    }

    #[test]
    fn zero_windows_is_an_empty_report() {
        let report = run(&FramelinkConfig::default(), 0, 5).unwrap();
        assert!(report.windows.is_empty());
    }
}
