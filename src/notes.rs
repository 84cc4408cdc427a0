use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Advisor/client note. Held in memory for the session only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub client: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct NoteBook {
    notes: Vec<Note>,
}

impl NoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a note; blank text is ignored.
    pub fn add(&mut self, client: &str, text: &str) -> Option<&Note> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.notes.push(Note {
            id: Uuid::new_v4().to_string(),
            client: client.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        });
        debug!("📝 Added note for {} ({} total)", client, self.notes.len());
        self.notes.last()
    }

    pub fn for_client<'a>(&'a self, client: &'a str) -> impl Iterator<Item = &'a Note> + 'a {
        self.notes.iter().filter(move |n| n.client == client)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }
}
