//! Intent classification for incoming text.
//!
//! The bot decides between director mode and casual chat without asking the
//! model. The decision is driven by two tables: the reply keyboard buttons
//! and the director keywords. Matching rules:
//!
//! 1. Text equal to a button label maps straight to that button's action.
//! 2. Otherwise the text is director mode when it contains the director
//!    marker (case-sensitive) or any keyword (case-insensitive), unless it
//!    also contains the casual marker (case-sensitive).
//! 3. Everything else is casual chat.

use tracing::debug;

/// Keywords that switch a free-form message into director mode.
///
/// Matched against the lowercased message text.
pub const DIRECTOR_KEYWORDS: [&str; 6] = [
    "sutradara",
    "buatkan prompt",
    "bikin konsep",
    "gambar",
    "poster",
    "ide video",
];

/// Buttons on the bot's reply keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Switch to director mode.
    Director,
    /// Switch to casual chat.
    Casual,
    /// Clear conversation memory.
    Reset,
}

impl Button {
    /// Every button, in keyboard order.
    pub const ALL: [Button; 3] = [Button::Director, Button::Casual, Button::Reset];

    /// Label shown on the keyboard and sent back verbatim when pressed.
    pub fn label(self) -> &'static str {
        match self {
            Self::Director => "🎬 Mode Sutradara",
            Self::Casual => "💬 Ngobrol Santai",
            Self::Reset => "♻️ Reset Ingatan",
        }
    }

    /// Label text without the emoji, matched inside longer messages.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Director => "Mode Sutradara",
            Self::Casual => "Ngobrol Santai",
            Self::Reset => "Reset Ingatan",
        }
    }

    /// Look up the button whose label equals `text` exactly.
    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == text)
    }

    /// Keyboard layout: two buttons per row.
    pub fn menu_rows() -> Vec<Vec<Button>> {
        Self::ALL.chunks(2).map(|row| row.to_vec()).collect()
    }
}

/// Which handling path a message takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Concept + visual prompt generation, followed by an illustration.
    DirectorMode,
    /// Plain conversation.
    CasualChat,
}

/// What the router should do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Reset button: clear memory and confirm.
    Reset,
    /// Director button on its own: ask the user for an idea.
    DirectorIntro,
    /// Generate a concept and an image.
    Director,
    /// Chat normally.
    Casual,
}

/// Classify free-form text.
pub fn classify(text: &str) -> Intent {
    let lowered = text.to_lowercase();
    let wants_director = text.contains(Button::Director.marker())
        || DIRECTOR_KEYWORDS.iter().any(|k| lowered.contains(k));

    if wants_director && !text.contains(Button::Casual.marker()) {
        Intent::DirectorMode
    } else {
        Intent::CasualChat
    }
}

/// Map a message to the router action, checking button labels first.
pub fn route(text: &str) -> Action {
    let action = match Button::from_label(text) {
        Some(Button::Reset) => Action::Reset,
        Some(Button::Director) => Action::DirectorIntro,
        Some(Button::Casual) | None => match classify(text) {
            Intent::DirectorMode => Action::Director,
            Intent::CasualChat => Action::Casual,
        },
    };
    debug!(action = ?action, "Message routed");
    action
}
