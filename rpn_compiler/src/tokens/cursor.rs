//! Repositionable sequence shared by the tokenizer and the transducer output
//!
//! The cursor either points at an element or is off the sequence. Walking
//! past either end moves it off, after which `current`, `next` and
//! `previous` keep returning `None` until `first`/`reset` is called.

/// Ordered sequence with a movable cursor
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor<T> {
    items: Vec<T>,
    position: Option<usize>,
}

impl<T> Cursor<T> {
    /// Create a cursor positioned on the first element
    pub fn new(items: Vec<T>) -> Self {
        let position = if items.is_empty() { None } else { Some(0) };
        Self { items, position }
    }

    /// Move to the first element and return it
    pub fn reset(&mut self) -> Option<&T> {
        self.position = if self.items.is_empty() { None } else { Some(0) };
        self.current()
    }

    /// Same as `reset`
    pub fn first(&mut self) -> Option<&T> {
        self.reset()
    }

    pub fn current(&self) -> Option<&T> {
        self.position.and_then(|index| self.items.get(index))
    }

    /// Advance and return the new current element
    pub fn next(&mut self) -> Option<&T> {
        self.position = match self.position {
            Some(index) if index + 1 < self.items.len() => Some(index + 1),
            _ => None,
        };
        self.current()
    }

    /// Step back and return the new current element
    pub fn previous(&mut self) -> Option<&T> {
        self.position = match self.position {
            Some(index) if index > 0 => Some(index - 1),
            _ => None,
        };
        self.current()
    }

    /// Element after the current one, without moving
    pub fn peek(&self) -> Option<&T> {
        self.position.and_then(|index| self.items.get(index + 1))
    }

    /// Index of the current element
    pub fn key(&self) -> Option<usize> {
        self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate every element regardless of cursor position
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Cursor<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> From<Vec<T>> for Cursor<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> FromIterator<T> for Cursor<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Cursor<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
