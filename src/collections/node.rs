//! Shared singly-linked node

#[derive(Debug)]
pub(crate) struct Node<T> {
    pub value: T,
    pub next: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Box<Self> {
        Box::new(Node { value, next: None })
    }
}

/// Borrowing iterator over a chain of nodes, shared by all three structures.
#[derive(Debug)]
pub struct Iter<'a, T> {
    pub(crate) next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}
