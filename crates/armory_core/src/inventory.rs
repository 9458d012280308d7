use crate::error::{ArmoryError, ArmoryResult};

/// Append-only, index-addressed collection of owned items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory<T> {
    items: Vec<T>,
}

impl<T> Inventory<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn get(&self, index: usize) -> ArmoryResult<&T> {
        let len = self.items.len();
        self.items
            .get(index)
            .ok_or(ArmoryError::OutOfRange { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> ArmoryResult<&mut T> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(ArmoryError::OutOfRange { index, len })
    }

    /// Appends `item` and returns its index.
    pub fn put(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for Inventory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Inventory<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}
