//! Key bindings: application actions, picker input and terminal passthrough.

use crossterm::event::{KeyCode, KeyModifiers};

use crate::data::effect::Effect;
use crate::data::session::{AcceptTrigger, PickerEvent};

/// Where a key pressed outside the picker goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRoute {
    Effect(Effect),
    ToggleTheme,
    ToggleHelp,
    /// Scroll the terminal view by this many rows (positive = back in time).
    Scroll(isize),
    /// Bytes for the shell.
    Terminal(Vec<u8>),
    Ignore,
}

/// Rows moved by one scroll keystroke.
pub const SCROLL_STEP: isize = 10;

/// Registered actions win; everything else is forwarded to the shell.
pub fn route_key(key: KeyCode, modifiers: KeyModifiers) -> KeyRoute {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    match key {
        KeyCode::F(1) => KeyRoute::ToggleHelp,
        KeyCode::F(2) => KeyRoute::Effect(Effect::Configure),
        KeyCode::Char('o') if ctrl => KeyRoute::Effect(Effect::Configure),
        KeyCode::F(5) => KeyRoute::Effect(Effect::Trigger),
        KeyCode::F(9) => KeyRoute::ToggleTheme,
        KeyCode::F(10) => KeyRoute::Effect(Effect::Quit),
        KeyCode::PageUp if shift => KeyRoute::Scroll(SCROLL_STEP),
        KeyCode::PageDown if shift => KeyRoute::Scroll(-SCROLL_STEP),
        _ => match terminal_bytes(key, modifiers) {
            Some(bytes) => KeyRoute::Terminal(bytes),
            None => KeyRoute::Ignore,
        },
    }
}

/// Translate a key into the bytes a terminal would send for it.
pub fn terminal_bytes(key: KeyCode, modifiers: KeyModifiers) -> Option<Vec<u8>> {
    let bytes = match key {
        KeyCode::Char(c) => {
            if modifiers.contains(KeyModifiers::CONTROL) && c.is_ascii_alphabetic() {
                let ctrl_char = (c.to_ascii_lowercase() as u8).wrapping_sub(b'a').wrapping_add(1);
                vec![ctrl_char]
            } else {
                let mut buf = [0u8; 4];
                let mut out = Vec::new();
                if modifiers.contains(KeyModifiers::ALT) {
                    out.push(0x1b);
                }
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                out
            }
        }
        KeyCode::Enter => b"\r".to_vec(),
        KeyCode::Tab => b"\t".to_vec(),
        KeyCode::BackTab => b"\x1b[Z".to_vec(),
        KeyCode::Esc => b"\x1b".to_vec(),
        KeyCode::Backspace => b"\x7f".to_vec(),
        KeyCode::Delete => b"\x1b[3~".to_vec(),
        KeyCode::Up => b"\x1b[A".to_vec(),
        KeyCode::Down => b"\x1b[B".to_vec(),
        KeyCode::Right => b"\x1b[C".to_vec(),
        KeyCode::Left => b"\x1b[D".to_vec(),
        KeyCode::Home => b"\x1b[H".to_vec(),
        KeyCode::End => b"\x1b[F".to_vec(),
        KeyCode::PageUp => b"\x1b[5~".to_vec(),
        KeyCode::PageDown => b"\x1b[6~".to_vec(),
        _ => return None,
    };
    Some(bytes)
}

/// Map a key to picker input. Unbound keys are ignored.
pub fn picker_event(key: KeyCode, modifiers: KeyModifiers) -> Option<PickerEvent> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let event = match key {
        KeyCode::Enter if alt => PickerEvent::Accept(AcceptTrigger::Auxiliary),
        KeyCode::Enter => PickerEvent::Accept(AcceptTrigger::Primary),
        KeyCode::Tab => PickerEvent::Accept(AcceptTrigger::Auxiliary),
        KeyCode::Esc => PickerEvent::Dismiss,
        KeyCode::Char('c') if ctrl => PickerEvent::Dismiss,
        KeyCode::Char('w') if ctrl => PickerEvent::DeleteWord,
        KeyCode::Char('u') if ctrl => PickerEvent::ClearText,
        KeyCode::Char('p') if ctrl => PickerEvent::Up,
        KeyCode::Char('n') if ctrl => PickerEvent::Down,
        KeyCode::Backspace if alt || ctrl => PickerEvent::DeleteWord,
        KeyCode::Backspace => PickerEvent::Backspace,
        KeyCode::Up => PickerEvent::Up,
        KeyCode::Down => PickerEvent::Down,
        KeyCode::Home | KeyCode::PageUp => PickerEvent::First,
        KeyCode::End | KeyCode::PageDown => PickerEvent::Last,
        KeyCode::Char(c) if !ctrl && !alt => PickerEvent::Insert(c),
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_actions() {
        assert_eq!(
            route_key(KeyCode::F(2), KeyModifiers::NONE),
            KeyRoute::Effect(Effect::Configure)
        );
        assert_eq!(
            route_key(KeyCode::Char('o'), KeyModifiers::CONTROL),
            KeyRoute::Effect(Effect::Configure)
        );
        assert_eq!(
            route_key(KeyCode::F(5), KeyModifiers::NONE),
            KeyRoute::Effect(Effect::Trigger)
        );
        assert_eq!(
            route_key(KeyCode::F(10), KeyModifiers::NONE),
            KeyRoute::Effect(Effect::Quit)
        );
        assert_eq!(route_key(KeyCode::F(9), KeyModifiers::NONE), KeyRoute::ToggleTheme);
        assert_eq!(route_key(KeyCode::F(1), KeyModifiers::NONE), KeyRoute::ToggleHelp);
    }

    #[test]
    fn test_shift_page_scrolls_plain_page_forwards() {
        assert_eq!(
            route_key(KeyCode::PageUp, KeyModifiers::SHIFT),
            KeyRoute::Scroll(SCROLL_STEP)
        );
        assert_eq!(
            route_key(KeyCode::PageDown, KeyModifiers::SHIFT),
            KeyRoute::Scroll(-SCROLL_STEP)
        );
        assert_eq!(
            route_key(KeyCode::PageUp, KeyModifiers::NONE),
            KeyRoute::Terminal(b"\x1b[5~".to_vec())
        );
    }

    #[test]
    fn test_other_keys_reach_the_shell() {
        assert_eq!(
            route_key(KeyCode::Char('o'), KeyModifiers::NONE),
            KeyRoute::Terminal(b"o".to_vec())
        );
        assert_eq!(
            route_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyRoute::Terminal(vec![3])
        );
        assert_eq!(route_key(KeyCode::F(12), KeyModifiers::NONE), KeyRoute::Ignore);
    }

    #[test]
    fn test_terminal_bytes() {
        assert_eq!(terminal_bytes(KeyCode::Enter, KeyModifiers::NONE), Some(b"\r".to_vec()));
        assert_eq!(
            terminal_bytes(KeyCode::Char('D'), KeyModifiers::CONTROL),
            Some(vec![4])
        );
        assert_eq!(
            terminal_bytes(KeyCode::Char('b'), KeyModifiers::ALT),
            Some(b"\x1bb".to_vec())
        );
        assert_eq!(
            terminal_bytes(KeyCode::Char('é'), KeyModifiers::NONE),
            Some("é".as_bytes().to_vec())
        );
        assert_eq!(terminal_bytes(KeyCode::Insert, KeyModifiers::NONE), None);
    }

    #[test]
    fn test_picker_accept_keys() {
        assert_eq!(
            picker_event(KeyCode::Enter, KeyModifiers::NONE),
            Some(PickerEvent::Accept(AcceptTrigger::Primary))
        );
        assert_eq!(
            picker_event(KeyCode::Enter, KeyModifiers::ALT),
            Some(PickerEvent::Accept(AcceptTrigger::Auxiliary))
        );
        assert_eq!(
            picker_event(KeyCode::Tab, KeyModifiers::NONE),
            Some(PickerEvent::Accept(AcceptTrigger::Auxiliary))
        );
    }

    #[test]
    fn test_picker_editing_keys() {
        assert_eq!(
            picker_event(KeyCode::Char('A'), KeyModifiers::SHIFT),
            Some(PickerEvent::Insert('A'))
        );
        assert_eq!(
            picker_event(KeyCode::Char('w'), KeyModifiers::CONTROL),
            Some(PickerEvent::DeleteWord)
        );
        assert_eq!(
            picker_event(KeyCode::Char('u'), KeyModifiers::CONTROL),
            Some(PickerEvent::ClearText)
        );
        assert_eq!(
            picker_event(KeyCode::Esc, KeyModifiers::NONE),
            Some(PickerEvent::Dismiss)
        );
        assert_eq!(picker_event(KeyCode::F(2), KeyModifiers::NONE), None);
        assert_eq!(picker_event(KeyCode::Char('o'), KeyModifiers::CONTROL), None);
    }
}
