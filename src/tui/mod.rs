//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, draws the screen,
//! and translates terminal events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One thread runs the loop; the completion call runs as a tokio task and
//! reports back over a channel as an ordinary `Action`:
//!
//! ```text
//!   terminal events ──┐
//!   spinner ticks   ──┼──▶ update(&mut app, action) ──▶ Effect
//!   reply channel   ──┘                                   │
//!        ▲                                                │ SpawnRequest
//!        └──────────── spawn_request (tokio task) ◀───────┘
//! ```
//!
//! - **Loading**: polls for at most one spinner interval, then ticks.
//! - **Idle**: sleeps up to 500ms, only redraws on events.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tokio::task::AbortHandle;

use crate::Provider;
use crate::core::action::{Action, Effect, PendingRequest, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::view::SPINNER_INTERVAL;
use crate::inference::{
    ChatCompletionsProvider, CompletionClient, CompletionRequest, ProviderError,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(500);

/// Upper bound on terminal events handled between two draws.
const MAX_EVENTS_PER_FRAME: usize = 64;

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Build a completion client from a resolved config's provider and credentials.
pub fn build_client(config: &ResolvedConfig) -> Result<Arc<dyn CompletionClient>, ProviderError> {
    let key_var = match config.provider {
        Provider::OpenAi => "OPENAI_API_KEY",
        Provider::DeepSeek => "DEEPSEEK_API_KEY",
    };
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            ProviderError::Config(format!(
                "API key not set (config file or {key_var} env var)"
            ))
        })?;
    let base_url = Some(config.base_url.clone());
    let client = match config.provider {
        Provider::OpenAi => ChatCompletionsProvider::openai(api_key, base_url),
        Provider::DeepSeek => ChatCompletionsProvider::deepseek(api_key, base_url),
    };
    Ok(Arc::new(client))
}

/// Runs an interactive session until the user quits.
///
/// Must be called from within a tokio runtime; completion calls are spawned on it.
pub fn run(config: &ResolvedConfig, client: Arc<dyn CompletionClient>) -> std::io::Result<()> {
    let mut app = App::from_config(client, config);
    info!(
        "Session starting: provider={}, model={}, persona={:?}",
        app.client.name(),
        app.model_name,
        config.persona
    );

    let mut terminal = ratatui::init();
    let terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    let mut active_request: Option<AbortHandle> = None;
    let result = event_loop(&mut terminal, &mut app, &mut active_request);

    // Quit aborts in dispatch; this covers leaving the loop on an I/O error
    abort_active(&mut active_request);

    drop(terminal_mode_guard);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    active_request: &mut Option<AbortHandle>,
) -> std::io::Result<()> {
    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let size = terminal.size()?;
    update(
        app,
        Action::Resize {
            width: size.width,
            height: size.height,
        },
    );

    let mut needs_redraw = true;
    let mut last_tick = Instant::now();

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading() {
            SPINNER_INTERVAL.saturating_sub(last_tick.elapsed())
        } else {
            IDLE_POLL
        };

        // Process first event + drain a bounded batch before next draw
        let events = collect_events(poll_event_timeout(timeout)?, poll_event_immediate)?;
        for event in events {
            let action = event.into_action(app.viewport.height);
            if dispatch(app, action, &tx, active_request, &mut needs_redraw) {
                return Ok(());
            }
        }

        if app.is_loading() && last_tick.elapsed() >= SPINNER_INTERVAL {
            last_tick = Instant::now();
            dispatch(app, Action::Tick, &tx, active_request, &mut needs_redraw);
        }

        // Outcomes from the background completion call
        while let Ok(action) = rx.try_recv() {
            debug!("Event loop received: {:?}", action);
            if dispatch(app, action, &tx, active_request, &mut needs_redraw) {
                return Ok(());
            }
        }
    }
}

/// Gathers `first` plus whatever `poll_more` has ready, up to
/// `MAX_EVENTS_PER_FRAME` events. The rest stay queued for the next pass.
fn collect_events(
    first: Option<TuiEvent>,
    mut poll_more: impl FnMut() -> std::io::Result<Option<TuiEvent>>,
) -> std::io::Result<Vec<TuiEvent>> {
    let mut events = Vec::new();
    let mut next = first;
    while let Some(event) = next {
        events.push(event);
        if events.len() >= MAX_EVENTS_PER_FRAME {
            debug!("Event batch capped at {}", MAX_EVENTS_PER_FRAME);
            break;
        }
        next = poll_more()?;
    }
    Ok(events)
}

fn abort_active(active_request: &mut Option<AbortHandle>) {
    if let Some(handle) = active_request.take() {
        info!("Aborting outstanding completion call");
        handle.abort();
    }
}

/// Feeds one action through the reducer and carries out the effect.
/// Returns true when the loop should exit.
fn dispatch(
    app: &mut App,
    action: Action,
    tx: &mpsc::Sender<Action>,
    active_request: &mut Option<AbortHandle>,
    needs_redraw: &mut bool,
) -> bool {
    if matches!(action, Action::ReplyReceived(_) | Action::ReplyFailed(_)) {
        active_request.take();
    }

    match update(app, action) {
        Effect::None => false,
        Effect::Redraw => {
            *needs_redraw = true;
            false
        }
        Effect::SpawnRequest(request) => {
            *active_request = Some(spawn_request(app.client.clone(), request, tx.clone()));
            *needs_redraw = true;
            false
        }
        Effect::Quit => {
            abort_active(active_request);
            true
        }
    }
}

/// Runs one completion call in the background and sends its outcome back as
/// an `Action`. The task owns its copy of the history and never touches `App`.
fn spawn_request(
    client: Arc<dyn CompletionClient>,
    request: PendingRequest,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!(
        "Spawning completion request: model={}, messages={}",
        request.model,
        request.messages.len()
    );

    let handle = tokio::spawn(async move {
        let started = Instant::now();
        let outcome = client
            .complete(CompletionRequest {
                messages: &request.messages,
                model: &request.model,
            })
            .await;

        let action = match outcome {
            Ok(reply) => {
                info!(
                    "Completion finished in {}ms ({} bytes)",
                    started.elapsed().as_millis(),
                    reply.len()
                );
                Action::ReplyReceived(reply)
            }
            Err(e) => {
                warn!(
                    "Completion failed after {}ms: {}",
                    started.elapsed().as_millis(),
                    e
                );
                Action::ReplyFailed(e.to_string())
            }
        };

        if tx.send(action).is_err() {
            warn!("Failed to deliver completion outcome: receiver dropped");
        }
    });

    handle.abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persona::Persona;
    use crate::core::state::Phase;
    use crate::inference::Message;
    use crate::test_support::{ScriptedClient, test_app};

    const WAIT: Duration = Duration::from_secs(5);

    fn config(provider: Provider, api_key: Option<&str>) -> ResolvedConfig {
        ResolvedConfig {
            provider,
            model_name: "m".to_string(),
            persona: Persona::Chat,
            system_prompt: String::new(),
            api_key: api_key.map(str::to_string),
            base_url: "http://localhost:1".to_string(),
        }
    }

    fn submit(app: &mut App, text: &str) -> PendingRequest {
        update(app, Action::InsertText(text.to_string()));
        match update(app, Action::Submit) {
            Effect::SpawnRequest(request) => request,
            other => panic!("Expected SpawnRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_build_client_requires_api_key() {
        let err = build_client(&config(Provider::DeepSeek, None)).err().unwrap();
        assert!(matches!(err, ProviderError::Config(ref msg) if msg.contains("DEEPSEEK_API_KEY")));
        assert!(build_client(&config(Provider::OpenAi, Some("  "))).is_err());
    }

    #[test]
    fn test_build_client_picks_provider() {
        let client = build_client(&config(Provider::DeepSeek, Some("key"))).unwrap();
        assert_eq!(client.name(), "deepseek");
        let client = build_client(&config(Provider::OpenAi, Some("key"))).unwrap();
        assert_eq!(client.name(), "openai");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_spawned_request_sends_snapshot_and_reports_reply() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("hi there".to_string())]));
        let mut app = test_app(Some("Be terse."));
        let request = submit(&mut app, "hello");
        let snapshot = app.conversation.snapshot();

        let (tx, rx) = mpsc::channel();
        spawn_request(client.clone(), request, tx);
        let action = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(action, Action::ReplyReceived("hi there".to_string()));

        // Payload seen by the client is exactly the snapshot taken at submit
        let seen = client.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, snapshot);
        assert_eq!(seen[0].1, "test-model");

        update(&mut app, action);
        assert_eq!(app.phase(), Phase::Idle);
        assert_eq!(
            app.conversation.messages(),
            &[
                Message::system("Be terse."),
                Message::user("hello"),
                Message::assistant("hi there")
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_spawned_request_reports_failure() {
        let client = Arc::new(ScriptedClient::new(vec![Err(ProviderError::Api {
            status: 500,
            message: "overloaded".to_string(),
        })]));
        let mut app = test_app(None);
        let request = submit(&mut app, "ping");

        let (tx, rx) = mpsc::channel();
        spawn_request(client, request, tx);
        let action = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(
            action,
            Action::ReplyFailed("API error (HTTP 500): overloaded".to_string())
        );

        update(&mut app, action);
        assert_eq!(app.phase(), Phase::Idle);
        assert_eq!(app.conversation.messages(), &[Message::user("ping")]);
        assert!(app.entries[1].is_error());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aborted_request_reports_nothing() {
        let client = Arc::new(
            ScriptedClient::new(vec![Ok("too late".to_string())])
                .with_delay(Duration::from_secs(30)),
        );
        let mut app = test_app(None);
        let request = submit(&mut app, "hello");

        let (tx, rx) = mpsc::channel();
        let handle = spawn_request(client, request, tx);
        handle.abort();
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dispatch_tracks_active_request() {
        let mut app = App::new(
            Arc::new(ScriptedClient::new(vec![Ok("pong".to_string())])),
            "test-model".to_string(),
            "Assistant",
            "",
        );
        update(&mut app, Action::Resize { width: 80, height: 24 });
        update(&mut app, Action::InsertText("ping".to_string()));

        let (tx, rx) = mpsc::channel();
        let mut active_request = None;
        let mut needs_redraw = false;

        assert!(!dispatch(&mut app, Action::Submit, &tx, &mut active_request, &mut needs_redraw));
        assert!(active_request.is_some());
        assert!(needs_redraw);

        // A second Enter while waiting does not start another call
        update(&mut app, Action::InsertText("again".to_string()));
        assert_eq!(update(&mut app, Action::Submit), Effect::None);
        assert_eq!(app.input, "again");

        let outcome = rx.recv_timeout(WAIT).unwrap();
        assert!(!dispatch(&mut app, outcome, &tx, &mut active_request, &mut needs_redraw));
        assert!(active_request.is_none());
        assert_eq!(app.conversation.len(), 2);

        assert!(dispatch(&mut app, Action::Quit, &tx, &mut active_request, &mut needs_redraw));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_quit_aborts_outstanding_request() {
        let mut app = App::new(
            Arc::new(
                ScriptedClient::new(vec![Ok("too late".to_string())])
                    .with_delay(Duration::from_millis(300)),
            ),
            "test-model".to_string(),
            "Assistant",
            "",
        );
        update(&mut app, Action::Resize { width: 80, height: 24 });
        update(&mut app, Action::InsertText("hello".to_string()));

        let (tx, rx) = mpsc::channel();
        let mut active_request = None;
        let mut needs_redraw = false;

        dispatch(&mut app, Action::Submit, &tx, &mut active_request, &mut needs_redraw);
        assert!(active_request.is_some());

        assert!(dispatch(&mut app, Action::Quit, &tx, &mut active_request, &mut needs_redraw));
        assert!(active_request.is_none());

        // The scripted delay has long passed; an aborted task never reports
        assert!(rx.recv_timeout(Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_collect_events_caps_batch() {
        let mut polls = 0;
        let events = collect_events(Some(TuiEvent::ScrollUp), || {
            polls += 1;
            Ok(Some(TuiEvent::ScrollDown))
        })
        .unwrap();
        assert_eq!(events.len(), MAX_EVENTS_PER_FRAME);
        assert_eq!(events[0], TuiEvent::ScrollUp);
        assert_eq!(polls, MAX_EVENTS_PER_FRAME - 1);
    }

    #[test]
    fn test_collect_events_stops_when_queue_is_empty() {
        let mut queued = vec![TuiEvent::Backspace, TuiEvent::Submit];
        let events = collect_events(Some(TuiEvent::InputChar('a')), || Ok(queued.pop())).unwrap();
        assert_eq!(
            events,
            vec![TuiEvent::InputChar('a'), TuiEvent::Submit, TuiEvent::Backspace]
        );
        assert!(collect_events(None, || Ok(Some(TuiEvent::Quit))).unwrap().is_empty());
    }
}
