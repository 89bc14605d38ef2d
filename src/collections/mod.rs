//! Hand-rolled singly-linked storage primitives
//!
//! Everything above the domain layer (dispatch queues, the undo/redo journal,
//! note histories) is built on these three structures rather than the std
//! collections:
//!
//! - [`LinkedQueue`]: FIFO with O(1) insertion at the rear
//! - [`LinkedStack`]: LIFO with O(1) push/pop at the top
//! - [`SeqList`]: unordered-insert sequence list (front or back insertion)
//!
//! `find_by`/`remove_by` take a predicate instead of requiring `PartialEq` on
//! the element type; callers key on a stable identity (ticket id, note seq)
//! so removal never depends on reference identity or deep equality of
//! mutable values.

mod error;
mod list;
mod node;
mod queue;
mod stack;

pub use error::{CollectionError, CollectionResult};
pub use list::SeqList;
pub use node::Iter;
pub use queue::LinkedQueue;
pub use stack::LinkedStack;
