// src/ui.rs

pub mod chat;
pub mod footer;
pub mod header;

use crate::chat_view::{ChatView, KeyOutcome};
use crate::constants::TICK_RATE_MS;
use crate::errors::ChatResult;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

/// Enum for different types of events.
#[derive(Debug)]
enum Event {
    Input(CEvent),
    Tick,
}

/// What woke the main loop.
enum Step {
    Event(Event),
    Settled,
    Closed,
}

/// Restores the terminal when dropped, including after a failed setup.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
            log::warn!("failed to disable mouse capture: {}", e);
        }
        if let Err(e) = ratatui::try_restore() {
            log::error!("failed to restore terminal: {}", e);
        }
    }
}

/// Runs the terminal UI until the user quits.
pub async fn run_ui(mut view: ChatView) -> ChatResult<()> {
    let _guard = TerminalGuard;
    // Enables raw mode, enters the alternate screen and installs a panic
    // hook that restores the terminal.
    let mut terminal = ratatui::try_init()?;
    execute!(io::stdout(), EnableMouseCapture)?;

    let res = run_app(&mut terminal, &mut view).await;
    if let Err(err) = &res {
        log::error!("ui loop failed: {}", err);
    }
    res
}

/// Main loop of the application.
async fn run_app<B: Backend>(terminal: &mut Terminal<B>, view: &mut ChatView) -> ChatResult<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);
    spawn_event_reader(tx);
    view.probe_backend();

    loop {
        terminal.draw(|f| draw(f, view))?;

        let step = tokio::select! {
            event = rx.recv() => match event {
                Some(event) => Step::Event(event),
                None => Step::Closed,
            },
            _ = view.wait_for_answer() => Step::Settled,
        };

        match step {
            Step::Event(Event::Input(CEvent::Key(key))) => {
                if view.handle_key(key) == KeyOutcome::Quit {
                    break;
                }
            }
            Step::Event(Event::Input(CEvent::Mouse(mouse))) => view.handle_mouse(mouse),
            Step::Event(Event::Input(_)) => {}
            Step::Event(Event::Tick) => view.tick(),
            Step::Settled => {}
            Step::Closed => break,
        }
    }

    Ok(())
}

/// Reads terminal input on a blocking thread and interleaves ticks. Stops
/// once the receiving side is gone.
fn spawn_event_reader(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || {
        let tick_rate = Duration::from_millis(TICK_RATE_MS);
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            match event::poll(timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if tx.blocking_send(Event::Input(event)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        log::error!("failed to read terminal event: {}", e);
                        return;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    log::error!("failed to poll terminal events: {}", e);
                    return;
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if tx.blocking_send(Event::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });
}

/// Renders the whole chat screen.
pub fn draw(f: &mut Frame, view: &mut ChatView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(1),    // Transcript
            Constraint::Length(1), // Thinking indicator
            Constraint::Length(3), // Input
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    header::draw_header(f, chunks[0], view.backend_status);
    chat::draw_messages(f, view, chunks[1]);
    view.status_indicator
        .render(f, chunks[2], view.state.is_loading());
    chat::draw_input(f, view, chunks[3]);
    footer::draw_footer(f, chunks[4], view.is_loading());
}
