// Terminal backend: raw-mode setup, key polling, and the frame clock.
// Wraps crossterm + ratatui so the rest of the app just sees key/resize/frame events.

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

type CrosstermTerminal = Terminal<CrosstermBackend<std::io::Stderr>>;

pub struct Tui {
    terminal: CrosstermTerminal,
    pub event_rx: mpsc::UnboundedReceiver<TuiEvent>,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
    frame_rate: f64,
    /// The polling task doubles as the frame-callback registration.
    poller: Option<JoinHandle<()>>,
}

#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    Resize,
    Frame,
}

impl Tui {
    pub fn new(frame_rate: f64) -> anyhow::Result<Self> {
        let backend = CrosstermBackend::new(std::io::stderr());
        let terminal = Terminal::new(backend)?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            event_rx,
            event_tx,
            frame_rate,
            poller: None,
        })
    }

    pub fn enter(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(std::io::stderr(), EnterAlternateScreen)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        self.start_event_polling();
        Ok(())
    }

    pub fn exit(&mut self) -> anyhow::Result<()> {
        self.stop_event_polling();
        terminal::disable_raw_mode()?;
        execute!(std::io::stderr(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn start_event_polling(&mut self) {
        self.stop_event_polling();
        let tx = self.event_tx.clone();
        let frame_interval = Duration::from_secs_f64(1.0 / self.frame_rate);

        self.poller = Some(tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut frames = tokio::time::interval(frame_interval);
            // A stalled terminal gets one catch-up frame, never a burst.
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    event = reader.next() => {
                        match event {
                            Some(Ok(CrosstermEvent::Key(key))) => {
                                if key.kind == KeyEventKind::Press {
                                    tx.send(TuiEvent::Key(key)).ok();
                                }
                            }
                            Some(Ok(CrosstermEvent::Resize(..))) => {
                                tx.send(TuiEvent::Resize).ok();
                            }
                            Some(Err(_)) | None => break,
                            _ => {}
                        }
                    }
                    _ = frames.tick() => {
                        if tx.send(TuiEvent::Frame).is_err() {
                            break;
                        }
                    }
                }
            }
        }));
    }

    fn stop_event_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }

    pub fn draw<F>(&mut self, f: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.stop_event_polling();
    }
}
