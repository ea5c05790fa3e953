//! Clipboard and navigation capabilities of the host
//!
//! Copying the contact address goes through [`Clipboard`]; when the host
//! refuses, the page opens a mail composer through [`Navigator`] instead.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{FolioError, Result};
use tracing::{info, warn};

/// Text clipboard
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Page-level navigation
pub trait Navigator {
    /// Open a URL (e.g. a `mailto:` link)
    fn open(&mut self, url: &str);

    /// Reload the page
    fn reload(&mut self);
}

impl<C: Clipboard + ?Sized> Clipboard for Rc<RefCell<C>> {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.borrow_mut().write_text(text)
    }
}

impl<N: Navigator + ?Sized> Navigator for Rc<RefCell<N>> {
    fn open(&mut self, url: &str) {
        self.borrow_mut().open(url);
    }

    fn reload(&mut self) {
        self.borrow_mut().reload();
    }
}

/// Clipboard that keeps the last written text
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard that refuses every write, like a host without permission
#[derive(Debug, Default, Clone, Copy)]
pub struct DeniedClipboard;

impl Clipboard for DeniedClipboard {
    fn write_text(&mut self, _text: &str) -> Result<()> {
        Err(FolioError::HostDenied("clipboard write not permitted".into()))
    }
}

/// Navigator that records what it was asked to do
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    pub opened: Vec<String>,
    pub reloads: u32,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Navigator for RecordingNavigator {
    fn open(&mut self, url: &str) {
        info!("navigate: {}", url);
        self.opened.push(url.to_string());
    }

    fn reload(&mut self) {
        info!("navigate: reload");
        self.reloads += 1;
    }
}

/// How an address copy was delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The clipboard refused; a mail composer was opened instead
    MailtoFallback,
}

/// Copy `address`, falling back to `mailto:` when the clipboard refuses
pub fn copy_email(clipboard: &mut dyn Clipboard, navigator: &mut dyn Navigator, address: &str) -> CopyOutcome {
    match clipboard.write_text(address) {
        Ok(()) => CopyOutcome::Copied,
        Err(e) => {
            warn!("clipboard: {}; opening mail composer", e);
            navigator.open(&format!("mailto:{}", address));
            CopyOutcome::MailtoFallback
        }
    }
}
