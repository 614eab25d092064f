use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Terminal-side events feeding the control loop
#[derive(Debug, Clone)]
pub enum Event {
    Tick,
    Render,
    Resize,
    Key(KeyEvent),
}

impl Event {
    /// Ctrl+C quits from any screen, even mid-load
    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_is_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(Event::Key(key).is_quit());
    }

    #[test]
    fn plain_c_is_not_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(!Event::Key(key).is_quit());
        assert!(!Event::Tick.is_quit());
    }
}
