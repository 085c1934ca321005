// Softbreak Key Types
// Logical key identity and per-dispatch event descriptors

use std::fmt;

use smallvec::SmallVec;
use strum_macros::{Display, EnumIter, EnumString};

/// Logical key identity as observed on a keydown.
///
/// The router only ever acts on `Enter`; everything else exists so the
/// host layer can hand events through without translating them first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Tab,
    Escape,
    Backspace,
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Escape => write!(f, "Escape"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Char(c) => write!(f, "{}", c),
        }
    }
}

/// The four modifiers a send-key preference can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum Modifier {
    Alt,
    Shift,
    Ctrl,
    Meta,
}

impl Modifier {
    /// Fixed check order when several modifiers are held at once.
    /// Alt wins over Shift over Ctrl over Meta. This is an ordering
    /// artifact kept for compatibility, not a product rule.
    pub const PRECEDENCE: [Modifier; 4] =
        [Modifier::Alt, Modifier::Shift, Modifier::Ctrl, Modifier::Meta];
}

/// Set of modifiers held during a single keydown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierSet {
    held: SmallVec<[Modifier; 4]>,
}

impl ModifierSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(modifier: Modifier) -> Self {
        let mut set = Self::default();
        set.insert(modifier);
        set
    }

    /// Builder-style insert, for composing events in host code.
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    pub fn insert(&mut self, modifier: Modifier) {
        if !self.held.contains(&modifier) {
            self.held.push(modifier);
        }
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.held.contains(&modifier)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// The modifier that decides routing for this event, resolved in
    /// `Modifier::PRECEDENCE` order. At most one matters per keystroke.
    pub fn active(&self) -> Option<Modifier> {
        Modifier::PRECEDENCE
            .into_iter()
            .find(|m| self.held.contains(m))
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut set = Self::default();
        for modifier in iter {
            set.insert(modifier);
        }
        set
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for modifier in Modifier::PRECEDENCE {
            if self.contains(modifier) {
                if !first {
                    write!(f, "+")?;
                }
                write!(f, "{}", modifier)?;
                first = false;
            }
        }
        if first {
            write!(f, "(none)")?;
        }
        Ok(())
    }
}

/// Observed keydown descriptor: key identity, held modifiers, and the
/// IME-composition flag. Derived per event, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: ModifierSet,
    /// True while the host IME is mid-composition; such events must be
    /// left completely untouched.
    pub composing: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: ModifierSet::none(),
            composing: false,
        }
    }

    pub fn with_modifier(key: Key, modifier: Modifier) -> Self {
        Self {
            key,
            modifiers: ModifierSet::only(modifier),
            composing: false,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: ModifierSet) -> Self {
        Self {
            key,
            modifiers,
            composing: false,
        }
    }

    /// Marks the event as arriving during IME composition.
    pub fn during_composition(mut self) -> Self {
        self.composing = true;
        self
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)?;
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)?;
        }
        if self.composing {
            write!(f, " (composing)")?;
        }
        Ok(())
    }
}
