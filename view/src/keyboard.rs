//! Keyboard input.
//!
//! Keys arrive already decoded by the host. Copy and paste need the async
//! clipboard, so they are reported back as requests instead of being
//! performed here; the host awaits [`DataGrid::copy`] / [`DataGrid::paste`].

use entrygrid_core::Direction;

use crate::grid::DataGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
    Escape,
    Delete,
    Backspace,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, meta: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, meta: false };
    pub const CTRL: Modifiers = Modifiers { shift: false, ctrl: true, meta: false };
    pub const META: Modifiers = Modifiers { shift: false, ctrl: false, meta: true };

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The grid consumed the key.
    Handled,
    /// Not a grid key; let the host handle it.
    Ignored,
    /// The host should await `copy`.
    CopyRequested,
    /// The host should await `paste`.
    PasteRequested,
}

impl DataGrid {
    pub fn handle_key(&mut self, key: Key, mods: Modifiers) -> KeyOutcome {
        if self.matrix.is_globally_read_only() {
            return KeyOutcome::Ignored;
        }
        if self.interaction.is_editing() {
            return self.handle_editing_key(key, mods);
        }

        match key {
            Key::Up => self.arrow(Direction::Up, mods),
            Key::Down => self.arrow(Direction::Down, mods),
            Key::Left => self.arrow(Direction::Left, mods),
            Key::Right => self.arrow(Direction::Right, mods),
            Key::Tab => {
                let direction = if mods.shift { Direction::Left } else { Direction::Right };
                self.move_focus(direction, false);
                KeyOutcome::Handled
            }
            Key::Enter if mods.shift => {
                self.move_focus(Direction::Up, false);
                KeyOutcome::Handled
            }
            Key::Enter => {
                self.begin_edit(self.focus);
                KeyOutcome::Handled
            }
            Key::Delete | Key::Backspace => {
                self.clear_selected();
                KeyOutcome::Handled
            }
            Key::Char(c) if mods.command() => match c.to_ascii_lowercase() {
                'c' => KeyOutcome::CopyRequested,
                'v' => KeyOutcome::PasteRequested,
                'a' => {
                    self.select_all();
                    KeyOutcome::Handled
                }
                _ => KeyOutcome::Ignored,
            },
            Key::Char(c) if !c.is_control() => {
                if self.begin_edit_with(self.focus, c.encode_utf8(&mut [0; 4])) {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            Key::Char(_) | Key::Escape => KeyOutcome::Ignored,
        }
    }

    fn arrow(&mut self, direction: Direction, mods: Modifiers) -> KeyOutcome {
        self.move_focus(direction, mods.shift);
        KeyOutcome::Handled
    }

    /// While the editor is open, keys edit the pending text. Enter commits and
    /// moves down, Escape discards; cursor keys belong to the editor.
    fn handle_editing_key(&mut self, key: Key, mods: Modifiers) -> KeyOutcome {
        match key {
            Key::Enter => {
                self.commit_edit();
                self.move_focus(Direction::Down, false);
                KeyOutcome::Handled
            }
            Key::Escape => {
                self.cancel_edit();
                KeyOutcome::Handled
            }
            Key::Backspace => {
                self.edit_pop();
                KeyOutcome::Handled
            }
            Key::Char(c) if !mods.command() && !c.is_control() => {
                self.edit_push(c);
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }
}
