//! Singly-linked LIFO stack

use crate::collections::error::{CollectionError, CollectionResult};
use crate::collections::node::{Iter, Node};

#[derive(Debug)]
pub struct LinkedStack<T> {
    top: Option<Box<Node<T>>>,
}

impl<T> Default for LinkedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedStack<T> {
    pub fn new() -> Self {
        Self { top: None }
    }

    /// Push a value onto the top of the stack. O(1).
    pub fn push(&mut self, value: T) {
        let mut node = Node::new(value);
        node.next = self.top.take();
        self.top = Some(node);
    }

    /// Remove and return the top value.
    pub fn pop(&mut self) -> CollectionResult<T> {
        match self.top.take() {
            None => Err(CollectionError::Empty { structure: "stack" }),
            Some(mut node) => {
                self.top = node.next.take();
                Ok(node.value)
            }
        }
    }

    /// Return a reference to the top value without removing it.
    pub fn peek(&self) -> CollectionResult<&T> {
        self.top
            .as_deref()
            .map(|node| &node.value)
            .ok_or(CollectionError::Empty { structure: "stack" })
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// Number of elements, counted by walking the chain. O(n).
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Drop all elements.
    pub fn clear(&mut self) {
        let mut cursor = self.top.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }

    /// Iterate from the top of the stack downwards.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.top.as_deref(),
        }
    }
}

impl<T> Drop for LinkedStack<T> {
    fn drop(&mut self) {
        self.clear();
    }
}
