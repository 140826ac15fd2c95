//! Cards as read from the request board.

use serde::Deserialize;

/// A link attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A label on a card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One requested title on the board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Card {
    /// Board-side id, the natural key for catalog dedup.
    pub id: String,
    pub name: String,
    /// Free-text (markdown) description.
    #[serde(default)]
    pub desc: String,
    /// Attachments in board order.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Name and id of the list cards are read from.
#[derive(Debug, Clone, Deserialize)]
pub struct CardList {
    pub id: String,
    pub name: String,
}
