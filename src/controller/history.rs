//! Navigation history of visited dishes

/// Stack of dish ids the view has shown, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit; revisiting the current entry is a no-op
    pub fn push(&mut self, id: &str) {
        if self.current() != Some(id) {
            self.entries.push(id.to_string());
        }
    }

    /// The entry before the current one, if any
    pub fn previous(&self) -> Option<&str> {
        self.entries.len().checked_sub(2).map(|i| self.entries[i].as_str())
    }

    /// Drop the current entry, never the first one
    pub fn pop(&mut self) {
        if self.entries.len() > 1 {
            self.entries.pop();
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
