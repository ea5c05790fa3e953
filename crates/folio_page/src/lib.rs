//! Folio Page
//!
//! The behavior layer of a one-page portfolio. Everything runs against a
//! single [`Page`] context: the display tree, the scroll position, the host
//! capabilities and a cooperative timer/frame queue.
//!
//! - **Reveals**: scroll-triggered entrances, played once or reversed on exit
//! - **Scroll widgets**: progress bar, back-to-top, smooth anchor scrolling
//! - **Counters and typewriter**: timer-driven text effects
//! - **Form, navigation, theme, cursor, tilt, clipboard**
//! - **Bootstrap**: [`Portfolio`] binds all of the above to the page
//!
//! # Example
//!
//! ```rust
//! use folio_core::{DisplayTree, Element, Rect};
//! use folio_page::{Page, PageConfig, Portfolio};
//!
//! let mut tree = DisplayTree::new();
//! let body = tree.body();
//! let counter = tree.append(
//!     body,
//!     Element::new("span")
//!         .with_class("counter")
//!         .with_attr("data-target", "120")
//!         .with_bounds(Rect::new(0.0, 1200.0, 200.0, 50.0)),
//! );
//! tree.append(body, Element::new("footer").with_bounds(Rect::new(0.0, 2000.0, 1280.0, 400.0)));
//!
//! let mut page = Page::new(tree, PageConfig::default());
//! Portfolio::install(&mut page);
//! page.ready();
//!
//! page.scroll_to(600.0);
//! page.advance(2000);
//! assert_eq!(page.tree.text(counter), Some("120+"));
//! ```

pub mod clipboard;
pub mod config;
pub mod counter;
pub mod cursor;
pub mod device;
pub mod form;
pub mod hero;
pub mod nav;
pub mod page;
pub mod portfolio;
pub mod reveal;
pub mod scroll;
pub mod skills;
pub mod theme;
pub mod tilt;
pub mod typewriter;
pub mod viewport;

pub use clipboard::{
    copy_email, Clipboard, CopyOutcome, DeniedClipboard, MemoryClipboard, Navigator,
    RecordingNavigator,
};
pub use config::{ConfigError, PageConfig, RevealGroupConfig};
pub use counter::{Counter, CounterState};
pub use device::DeviceProfile;
pub use form::{ContactForm, FormState};
pub use page::{Page, VisibilityHandler};
pub use portfolio::{Portfolio, Widgets};
pub use reveal::{RevealAction, RevealPhase, RevealPolicy, RevealProfile, RevealSequencer};
pub use scroll::{BackToTop, ScrollProgress, ScrollState, SmoothScroll};
pub use theme::{ThemePreference, ThemeToggle};
pub use typewriter::{TypeFrame, TypeSpeed, Typewriter};
pub use viewport::{IntersectionNotifier, ObserverId, ViewportObserver, VisibilityChange};
