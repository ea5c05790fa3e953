//! Mobile navigation and in-page anchors

use folio_core::{DisplayTree, ElementId};
use smallvec::SmallVec;
use tracing::debug;

const ACTIVE: &str = "active";

/// Burger toggle and the menu it opens
#[derive(Clone, Debug)]
pub struct NavMenu {
    toggle: ElementId,
    menu: ElementId,
    /// The three burger lines, top to bottom
    lines: SmallVec<[ElementId; 3]>,
}

impl NavMenu {
    pub fn bind(tree: &DisplayTree, toggle_selector: &str, menu_selector: &str) -> Option<Self> {
        let toggle = tree.select_first(toggle_selector)?;
        let menu = tree.select_first(menu_selector)?;
        Some(Self {
            toggle,
            menu,
            lines: tree.select_within(toggle, "span").into_iter().collect(),
        })
    }

    pub fn toggle_element(&self) -> ElementId {
        self.toggle
    }

    pub fn is_open(&self, tree: &DisplayTree) -> bool {
        tree.has_class(self.toggle, ACTIVE)
    }

    /// Flip the menu and restyle the burger; returns whether it is now open
    pub fn toggle(&self, tree: &mut DisplayTree) -> bool {
        let open = tree.toggle_class(self.toggle, ACTIVE);
        if open {
            tree.add_class(self.menu, ACTIVE);
        } else {
            tree.remove_class(self.menu, ACTIVE);
        }

        let styles: [(&str, &str); 3] = if open {
            [
                ("transform", "rotate(45deg) translate(6px, 6px)"),
                ("opacity", "0"),
                ("transform", "rotate(-45deg) translate(6px, -6px)"),
            ]
        } else {
            [("transform", "none"), ("opacity", "1"), ("transform", "none")]
        };
        for (line, (property, value)) in self.lines.iter().zip(styles) {
            tree.set_style(*line, property, value);
        }
        debug!("nav: menu {}", if open { "opened" } else { "closed" });
        open
    }
}

/// Scroll offset an in-page anchor leads to
///
/// `#` alone and hrefs naming no element resolve to `None`. The result
/// leaves `header_offset` pixels above the target and never goes negative.
pub fn anchor_destination(tree: &DisplayTree, href: &str, header_offset: f32) -> Option<f32> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        return None;
    }
    let Some(target) = tree.by_id(id) else {
        debug!("nav: anchor {:?} has no target", href);
        return None;
    };
    let top = tree.bounds(target)?.y();
    Some((top - header_offset).max(0.0))
}
