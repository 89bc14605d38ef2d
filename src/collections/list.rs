//! Singly-linked sequence list with insertion at either end
//!
//! Backs note histories and the attended-ticket history. Insertion order is
//! significant to callers, so removal preserves the order of the remaining
//! elements.

use crate::collections::error::{CollectionError, CollectionResult};
use crate::collections::node::{Iter, Node};

#[derive(Debug)]
pub struct SeqList<T> {
    head: Option<Box<Node<T>>>,
}

impl<T> Default for SeqList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SeqList<T> {
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Insert at the head of the list. O(1).
    pub fn push_front(&mut self, value: T) {
        let mut node = Node::new(value);
        node.next = self.head.take();
        self.head = Some(node);
    }

    /// Insert at the tail of the list. O(n).
    pub fn push_back(&mut self, value: T) {
        let node = Node::new(value);
        let mut cursor = &mut self.head;
        while let Some(current) = cursor {
            cursor = &mut current.next;
        }
        *cursor = Some(node);
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of elements, counted by walking the chain. O(n).
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Drop all elements.
    pub fn clear(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Find the first element matching the predicate.
    pub fn find_by<F>(&self, pred: F) -> CollectionResult<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.iter()
            .find(|value| pred(value))
            .ok_or(CollectionError::NotFound { structure: "list" })
    }

    /// Remove and return the first element matching the predicate.
    pub fn remove_by<F>(&mut self, pred: F) -> CollectionResult<T>
    where
        F: Fn(&T) -> bool,
    {
        let mut cursor = &mut self.head;
        loop {
            match cursor {
                None => return Err(CollectionError::NotFound { structure: "list" }),
                Some(node) if pred(&node.value) => break,
                Some(node) => cursor = &mut node.next,
            }
        }
        let mut removed = match cursor.take() {
            Some(node) => node,
            None => return Err(CollectionError::NotFound { structure: "list" }),
        };
        *cursor = removed.next.take();
        Ok(removed.value)
    }
}

impl<T> Drop for SeqList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> FromIterator<T> for SeqList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_back_preserves_insertion_order() {
        let mut list = SeqList::new();
        list.push_back(1);
        list.push_back(2);
        list.push_back(3);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_push_front_prepends() {
        let mut list = SeqList::new();
        list.push_back(2);
        list.push_front(1);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_find_by_hit_and_miss() {
        let mut list = SeqList::new();
        list.push_back("a");
        list.push_back("b");
        assert_eq!(list.find_by(|v| *v == "b"), Ok(&"b"));
        assert_eq!(
            list.find_by(|v| *v == "z"),
            Err(CollectionError::NotFound { structure: "list" })
        );
    }

    #[test]
    fn test_remove_by_preserves_remaining_order() {
        let mut list: SeqList<u32> = (1..=4).collect();
        assert_eq!(list.remove_by(|v| *v == 2), Ok(2));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4]);
        assert_eq!(list.remove_by(|v| *v == 1), Ok(1)); // head removal
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_remove_by_miss() {
        let mut list: SeqList<u32> = (1..=2).collect();
        assert_eq!(
            list.remove_by(|v| *v == 9),
            Err(CollectionError::NotFound { structure: "list" })
        );
        assert_eq!(list.size(), 2);
    }

    #[test]
    fn test_clear_and_empty() {
        let mut list = SeqList::new();
        assert!(list.is_empty());
        list.push_back(1);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.size(), 0);
    }
}
