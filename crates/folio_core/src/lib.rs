//! Folio Core
//!
//! Host model for the Folio portfolio behavior layer:
//!
//! - **Display Tree**: typed element handles with classes, styles, text and bounds
//! - **Events**: listener registry with bubbling and one-shot subscriptions
//! - **Runtime**: single cooperative task queue with a virtual clock
//! - **Store**: persistent string key-value storage
//!
//! # Example
//!
//! ```rust
//! use folio_core::runtime::{run_until, TaskQueue};
//!
//! struct Page {
//!     queue: TaskQueue<Page>,
//!     label: String,
//! }
//!
//! let mut page = Page { queue: TaskQueue::new(), label: "Send".into() };
//! page.queue.set_timeout(1500, |p| p.label = "Message Sent!".into());
//!
//! run_until(&mut page, 1000, |p| &mut p.queue);
//! assert_eq!(page.label, "Send");
//! run_until(&mut page, 1500, |p| &mut p.queue);
//! assert_eq!(page.label, "Message Sent!");
//! ```

pub mod error;
pub mod events;
pub mod geometry;
pub mod runtime;
pub mod store;
pub mod tree;

pub use error::{FolioError, Result};
pub use events::{
    dispatch, event_types, Event, EventData, EventDispatcher, EventType, Listener, ListenerId,
};
pub use geometry::{Point, Rect, Size};
pub use runtime::{next_frame_after, run_until, Task, TaskQueue, TimerId, FRAME_MS};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use tree::{DisplayTree, Element, ElementId, Selector};
