//! Ordered list of game names waiting to be processed.

/// Game names in the order they will be processed.
///
/// Duplicates are allowed. Removal never reorders the remaining entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Queue {
    items: Vec<String>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name. Surrounding whitespace is trimmed and blank input is
    /// ignored; returns whether the name was added.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.items.push(name.to_string());
        true
    }

    /// Remove the first entry equal to `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.items.iter().position(|n| n == name) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove the entry at `index`, if there is one.
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Current contents, for rendering.
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl<S: AsRef<str>> FromIterator<S> for Queue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut queue = Queue::new();
        for name in iter {
            queue.add(name.as_ref());
        }
        queue
    }
}

#[cfg(test)]
#[path = "tests/queue_tests.rs"]
mod tests;
