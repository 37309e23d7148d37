use super::*;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use axum::{extract::Query, routing::get, Json, Router};
use client_core::ConversionResult;
use crossbeam_channel::bounded;
use shared::domain::SubmissionToken;
use shared::protocol::{ConvertQuery, ConvertResponse};
use tokio::sync::oneshot;

use crate::controller::AppController;

/// Holds each conversion until the test releases the gate registered for its input.
struct GatedClient {
    gates: Mutex<HashMap<String, oneshot::Receiver<String>>>,
}

impl GatedClient {
    fn new() -> Self {
        Self {
            gates: Mutex::new(HashMap::new()),
        }
    }

    fn gate(&self, input: &str) -> oneshot::Sender<String> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .expect("gates lock")
            .insert(input.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ConversionClient for GatedClient {
    async fn convert(&self, input: &str) -> ConversionResult {
        let gate = self.gates.lock().expect("gates lock").remove(input);
        match gate {
            Some(rx) => match rx.await {
                Ok(text) => ConversionResult::Success { text },
                Err(_) => ConversionResult::Failure {
                    reason: "error: gate dropped".to_string(),
                },
            },
            None => ConversionResult::Failure {
                reason: format!("error: no gate registered for '{input}'"),
            },
        }
    }
}

/// Answers immediately with the input and counts every call.
#[derive(Default)]
struct CountingClient {
    calls: AtomicUsize,
}

#[async_trait]
impl ConversionClient for CountingClient {
    async fn convert(&self, input: &str) -> ConversionResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ConversionResult::Success {
            text: input.to_string(),
        }
    }
}

fn wait_until(controller: &mut AppController, what: &str, done: impl Fn(&AppController) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        controller.process_ui_events();
        if done(controller) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn wired(client: Arc<dyn ConversionClient>) -> (AppController, thread::JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let worker = launch_with_client(client, cmd_rx, ui_tx);
    (AppController::new(cmd_tx, ui_rx), worker)
}

#[test]
fn out_of_order_responses_resolve_to_latest_submission() {
    let client = Arc::new(GatedClient::new());
    let release_a = client.gate("a");
    let release_ab = client.gate("ab");
    let (mut controller, worker) = wired(client.clone());

    controller.on_submit("a");
    controller.on_submit("ab");

    release_ab.send("2 EUR".to_string()).expect("release ab");
    wait_until(&mut controller, "ab result", |c| !c.pending());
    assert_eq!(controller.output_text(), "2 EUR");

    release_a.send("1 EUR".to_string()).expect("release a");
    wait_until(&mut controller, "stale a result", |c| c.stale_discards() == 1);
    assert_eq!(controller.output_text(), "2 EUR");

    controller.shutdown();
    worker.join().expect("worker exits");
}

#[test]
fn conversions_overlap_instead_of_queueing() {
    let client = Arc::new(GatedClient::new());
    let release_slow = client.gate("slow");
    let release_fast = client.gate("fast");
    let (mut controller, worker) = wired(client.clone());

    controller.on_submit("slow");
    controller.on_submit("fast");

    // "slow" is still parked; "fast" must not wait behind it.
    release_fast.send("fast done".to_string()).expect("release fast");
    wait_until(&mut controller, "fast result", |c| !c.pending());
    assert_eq!(controller.output_text(), "fast done");

    drop(release_slow);
    wait_until(&mut controller, "slow failure discarded", |c| c.stale_discards() == 1);
    assert_eq!(controller.output_text(), "fast done");

    controller.shutdown();
    worker.join().expect("worker exits");
}

#[test]
fn full_event_queue_does_not_stall_later_conversions() {
    const SUBMISSIONS: u64 = 64;
    let client = Arc::new(CountingClient::default());
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    // One slot, taken by the startup notice, so every result has to wait for the UI.
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
    let worker = launch_with_client(client.clone(), cmd_rx, ui_tx);

    for n in 1..=SUBMISSIONS {
        cmd_tx
            .send(BackendCommand::Convert {
                token: SubmissionToken(n),
                text: n.to_string(),
            })
            .expect("queue convert");
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    while client.calls.load(Ordering::SeqCst) < SUBMISSIONS as usize {
        assert!(
            Instant::now() < deadline,
            "only {} of {SUBMISSIONS} conversions ran while the UI was not draining",
            client.calls.load(Ordering::SeqCst)
        );
        thread::sleep(Duration::from_millis(5));
    }

    let mut completed = 0;
    while completed < SUBMISSIONS {
        match ui_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("conversion result")
        {
            UiEvent::ConversionCompleted { .. } => completed += 1,
            UiEvent::Info(_) | UiEvent::Error(_) => {}
        }
    }

    cmd_tx.send(BackendCommand::Shutdown).expect("shutdown");
    worker.join().expect("worker exits");
}

#[test]
fn shutdown_fails_in_flight_submission() {
    let client = Arc::new(GatedClient::new());
    let _never_released = client.gate("stuck");
    let (mut controller, worker) = wired(client.clone());

    controller.on_submit("stuck");
    controller.shutdown();
    worker.join().expect("worker exits");

    wait_until(&mut controller, "backend stop", |c| !c.pending());
    assert!(controller.output_text().contains("backend worker stopped"));
}

#[test]
fn invalid_server_url_is_reported_and_every_conversion_fails() {
    let settings = Settings {
        server_url: "not a url".to_string(),
        request_timeout_ms: None,
    };
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(8);
    let worker = launch(&settings, cmd_rx, ui_tx);
    let mut controller = AppController::new(cmd_tx, ui_rx);

    wait_until(&mut controller, "startup error", |c| {
        c.status().contains("during startup")
    });

    controller.on_submit("5 usd");
    wait_until(&mut controller, "failure", |c| !c.pending());
    assert!(
        controller
            .output_text()
            .starts_with("error: invalid server url 'not a url'"),
        "unexpected: {}",
        controller.output_text()
    );

    controller.shutdown();
    worker.join().expect("worker exits");
}

async fn delayed_echo(Query(query): Query<ConvertQuery>) -> Json<ConvertResponse> {
    let delay = if query.text == "a" { 400 } else { 10 };
    tokio::time::sleep(Duration::from_millis(delay)).await;
    Json(ConvertResponse {
        text: format!("converted {}", query.text),
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_race_keeps_latest_submission_result() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route("/convert", get(delayed_echo));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let settings = Settings {
        server_url: format!("http://{addr}"),
        request_timeout_ms: None,
    };
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(8);
    let worker = launch(&settings, cmd_rx, ui_tx);
    let mut controller = AppController::new(cmd_tx, ui_rx);

    controller.on_submit("a");
    controller.on_submit("ab");

    wait_until(&mut controller, "ab result", |c| !c.pending());
    assert_eq!(controller.output_text(), "converted ab");

    wait_until(&mut controller, "stale a result", |c| c.stale_discards() == 1);
    assert_eq!(controller.output_text(), "converted ab");

    controller.shutdown();
    worker.join().expect("worker exits");
}
