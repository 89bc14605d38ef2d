//! Singly-linked FIFO queue
//!
//! A raw pointer to the rear node keeps `enqueue` O(1); the pointer always
//! targets the last node owned by the `front` chain (or null when empty),
//! so the unsafe blocks never observe a dangling rear.

use crate::collections::error::{CollectionError, CollectionResult};
use crate::collections::node::{Iter, Node};
use std::ptr;

#[derive(Debug)]
pub struct LinkedQueue<T> {
    front: Option<Box<Node<T>>>,
    rear: *mut Node<T>,
}

// SAFETY: `rear` aliases a node owned by `front`; the queue is a single
// ownership tree, so moving it (or sharing it immutably) across threads is
// as safe as it is for the boxed chain itself.
unsafe impl<T: Send> Send for LinkedQueue<T> {}
unsafe impl<T: Sync> Sync for LinkedQueue<T> {}

impl<T> Default for LinkedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedQueue<T> {
    pub fn new() -> Self {
        Self {
            front: None,
            rear: ptr::null_mut(),
        }
    }

    /// Append a value at the rear of the queue. O(1).
    pub fn enqueue(&mut self, value: T) {
        let node = Node::new(value);
        let slot = if self.rear.is_null() {
            &mut self.front
        } else {
            // SAFETY: rear is non-null, hence points at the current last
            // node of the chain, whose `next` is None.
            unsafe { &mut (*self.rear).next }
        };
        *slot = Some(node);
        let raw: *mut Node<T> = match slot.as_deref_mut() {
            Some(last) => last,
            None => ptr::null_mut(),
        };
        self.rear = raw;
    }

    /// Insert a value at the front of the queue.
    ///
    /// Used when undoing a head removal so the value regains its original
    /// dispatch position.
    pub fn push_front(&mut self, value: T) {
        let mut node = Node::new(value);
        node.next = self.front.take();
        let becomes_rear = node.next.is_none();
        self.front = Some(node);
        if becomes_rear {
            self.refresh_rear();
        }
    }

    /// Insert a value at a zero-based position; positions past the end append.
    ///
    /// Used when undoing a mid-chain removal so the value regains its
    /// original slot.
    pub fn insert_at(&mut self, index: usize, value: T) {
        if index == 0 {
            return self.push_front(value);
        }
        let mut cursor = &mut self.front;
        let mut remaining = index;
        while remaining > 0 {
            match cursor {
                Some(node) => {
                    cursor = &mut node.next;
                    remaining -= 1;
                }
                None => break,
            }
        }
        let mut node = Node::new(value);
        node.next = cursor.take();
        let becomes_rear = node.next.is_none();
        *cursor = Some(node);
        if becomes_rear {
            self.refresh_rear();
        }
    }

    /// Remove and return the front value.
    pub fn dequeue(&mut self) -> CollectionResult<T> {
        match self.front.take() {
            None => Err(CollectionError::Empty { structure: "queue" }),
            Some(mut node) => {
                self.front = node.next.take();
                if self.front.is_none() {
                    self.rear = ptr::null_mut();
                }
                Ok(node.value)
            }
        }
    }

    /// Return a reference to the front value without removing it.
    pub fn peek(&self) -> CollectionResult<&T> {
        self.front
            .as_deref()
            .map(|node| &node.value)
            .ok_or(CollectionError::Empty { structure: "queue" })
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    /// Number of elements, counted by walking the chain. O(n).
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.front.as_deref(),
        }
    }

    /// Find the first element matching the predicate.
    pub fn find_by<F>(&self, pred: F) -> CollectionResult<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.iter()
            .find(|value| pred(value))
            .ok_or(CollectionError::NotFound { structure: "queue" })
    }

    /// Remove and return the first element matching the predicate,
    /// preserving the order of the remaining elements.
    pub fn remove_by<F>(&mut self, pred: F) -> CollectionResult<T>
    where
        F: Fn(&T) -> bool,
    {
        let mut cursor = &mut self.front;
        loop {
            match cursor {
                None => return Err(CollectionError::NotFound { structure: "queue" }),
                Some(node) if pred(&node.value) => break,
                Some(node) => cursor = &mut node.next,
            }
        }
        let mut removed = match cursor.take() {
            Some(node) => node,
            None => return Err(CollectionError::NotFound { structure: "queue" }),
        };
        *cursor = removed.next.take();
        self.refresh_rear();
        Ok(removed.value)
    }

    /// Re-aim `rear` at the last node after a splice at an arbitrary position.
    fn refresh_rear(&mut self) {
        let mut rear: *mut Node<T> = ptr::null_mut();
        let mut cursor = self.front.as_deref_mut();
        while let Some(node) = cursor {
            rear = &mut *node;
            cursor = node.next.as_deref_mut();
        }
        self.rear = rear;
    }
}

impl<T> Drop for LinkedQueue<T> {
    fn drop(&mut self) {
        // Iterative teardown; a recursive Box drop overflows on long chains.
        let mut cursor = self.front.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl<T> FromIterator<T> for LinkedQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        for value in iter {
            queue.enqueue(value);
        }
        queue
    }
}
