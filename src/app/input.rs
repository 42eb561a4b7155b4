// Key event handling: maps key presses to actions.

use crate::action::Action;
use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const SEEK_STEP_SECS: f64 = 5.0;

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        use KeyCode::{Char, Left, Right};

        // The help overlay consumes the next key
        if self.show_help {
            self.action_tx.send(Action::HideHelp)?;
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == Char('c') {
            self.action_tx.send(Action::Quit)?;
            return Ok(());
        }

        match key.code {
            Char('q') => self.action_tx.send(Action::Quit)?,
            Char('?') => self.action_tx.send(Action::ShowHelp)?,
            Char(' ') => self.action_tx.send(Action::TogglePlayPause)?,
            Char('n') => self.action_tx.send(Action::NextTrack)?,
            Char('s') => self.action_tx.send(Action::Stop)?,
            Char(']') => self.action_tx.send(Action::GainUp)?,
            Char('[') => self.action_tx.send(Action::GainDown)?,
            Left => self.action_tx.send(Action::SeekRelative(-SEEK_STEP_SECS))?,
            Right => self.action_tx.send(Action::SeekRelative(SEEK_STEP_SECS))?,
            _ => {}
        }
        Ok(())
    }
}
