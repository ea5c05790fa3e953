//! Page descriptions and session scripts
//!
//! A page file lists the elements of the document and the steps of a
//! session to replay against it:
//!
//! ```toml
//! [viewport]
//! width = 1280
//! height = 800
//!
//! [[element]]
//! tag = "span"
//! classes = ["counter"]
//! attributes = { data-target = "120" }
//! bounds = [0, 1200, 200, 50]
//!
//! [[step]]
//! action = "ready"
//!
//! [[step]]
//! action = "scroll"
//! to = 600
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use folio_core::{DisplayTree, Element, ElementId, Rect};
use folio_page::Page;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Parsed page file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PageSpec {
    #[serde(default)]
    pub viewport: ViewportSpec,
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ViewportSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// One element of the document
#[derive(Debug, Deserialize, Serialize)]
pub struct ElementSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    /// `[x, y, width, height]` in document coordinates
    #[serde(default)]
    pub bounds: Option<[f32; 4]>,
    /// Selector of an earlier element to nest under; the body when absent
    #[serde(default)]
    pub parent: Option<String>,
}

fn default_tag() -> String {
    "div".to_string()
}

/// A scripted session step
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Ready,
    Load,
    Scroll {
        to: f32,
        #[serde(default)]
        smooth: bool,
    },
    Wait {
        ms: u64,
    },
    Click {
        target: String,
    },
    Hover {
        target: String,
    },
    Leave {
        target: String,
    },
    Pointer {
        x: f32,
        y: f32,
        #[serde(default)]
        target: Option<String>,
    },
    Focus {
        target: String,
    },
    Blur {
        target: String,
    },
    Input {
        target: String,
        value: String,
    },
    Submit {
        target: String,
    },
    Resize {
        width: f32,
        height: f32,
    },
}

impl PageSpec {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build the display tree, in file order
    pub fn build_tree(&self) -> Result<DisplayTree> {
        let mut tree = DisplayTree::new();
        for spec in &self.elements {
            let parent = match &spec.parent {
                Some(selector) => tree
                    .select_first(selector)
                    .with_context(|| format!("Parent '{}' not found", selector))?,
                None => tree.body(),
            };
            tree.append(parent, spec.to_element());
        }
        Ok(tree)
    }

    /// Steps to replay; a bare page is just loaded
    pub fn script(&self) -> Vec<Step> {
        if self.steps.is_empty() {
            vec![Step::Ready, Step::Load]
        } else {
            self.steps.clone()
        }
    }
}

impl ElementSpec {
    fn to_element(&self) -> Element {
        let mut element = Element::new(self.tag.as_str());
        if let Some(id) = &self.id {
            element = element.with_id(id.as_str());
        }
        for class in &self.classes {
            element = element.with_class(class.as_str());
        }
        for (name, value) in &self.attributes {
            element = element.with_attr(name.as_str(), value.as_str());
        }
        if let Some(text) = &self.text {
            element = element.with_text(text.as_str());
        }
        if let Some([x, y, width, height]) = self.bounds {
            element = element.with_bounds(Rect::new(x, y, width, height));
        }
        element
    }
}

impl Step {
    /// Perform the step against the page
    pub fn apply(&self, page: &mut Page) -> Result<()> {
        match self {
            Step::Ready => page.ready(),
            Step::Load => page.load(),
            Step::Scroll { to, smooth } => {
                if *smooth {
                    page.smooth_scroll_to(*to);
                } else {
                    page.scroll_to(*to);
                }
            }
            Step::Wait { ms } => page.advance(*ms),
            Step::Click { target } => {
                let el = resolve(page, target)?;
                page.click(el);
            }
            Step::Hover { target } => {
                let el = resolve(page, target)?;
                page.pointer_enter(el);
            }
            Step::Leave { target } => {
                let el = resolve(page, target)?;
                page.pointer_leave(el);
            }
            Step::Pointer { x, y, target } => {
                let el = target.as_deref().map(|t| resolve(page, t)).transpose()?;
                page.pointer_move(el, *x, *y);
            }
            Step::Focus { target } => {
                let el = resolve(page, target)?;
                page.focus(el);
            }
            Step::Blur { target } => {
                let el = resolve(page, target)?;
                page.blur(el);
            }
            Step::Input { target, value } => {
                let el = resolve(page, target)?;
                page.input(el, value.as_str());
            }
            Step::Submit { target } => {
                let el = resolve(page, target)?;
                page.submit(el);
            }
            Step::Resize { width, height } => page.resize(*width, *height),
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Ready => write!(f, "ready"),
            Step::Load => write!(f, "load"),
            Step::Scroll { to, smooth: false } => write!(f, "scroll to {}", to),
            Step::Scroll { to, smooth: true } => write!(f, "smooth scroll to {}", to),
            Step::Wait { ms } => write!(f, "wait {} ms", ms),
            Step::Click { target } => write!(f, "click {}", target),
            Step::Hover { target } => write!(f, "hover {}", target),
            Step::Leave { target } => write!(f, "leave {}", target),
            Step::Pointer { x, y, target } => match target {
                Some(t) => write!(f, "pointer at ({}, {}) over {}", x, y, t),
                None => write!(f, "pointer at ({}, {})", x, y),
            },
            Step::Focus { target } => write!(f, "focus {}", target),
            Step::Blur { target } => write!(f, "blur {}", target),
            Step::Input { target, value } => write!(f, "input {} = {:?}", target, value),
            Step::Submit { target } => write!(f, "submit {}", target),
            Step::Resize { width, height } => write!(f, "resize to {}x{}", width, height),
        }
    }
}

fn resolve(page: &Page, selector: &str) -> Result<ElementId> {
    page.tree
        .select_first(selector)
        .with_context(|| format!("No element matches '{}'", selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_page::{PageConfig, Portfolio};

    const PAGE: &str = r##"
        [viewport]
        width = 1280
        height = 800

        [[element]]
        tag = "section"
        id = "about"
        bounds = [0, 1000, 1280, 600]

        [[element]]
        tag = "span"
        classes = ["counter"]
        parent = "#about"
        attributes = { data-target = "120" }
        bounds = [0, 1200, 200, 50]

        [[element]]
        tag = "footer"
        bounds = [0, 2000, 1280, 400]

        [[step]]
        action = "ready"

        [[step]]
        action = "scroll"
        to = 600

        [[step]]
        action = "wait"
        ms = 2000
    "##;

    #[test]
    fn test_parse_and_build() {
        let spec = PageSpec::parse(PAGE).unwrap();
        assert_eq!(spec.elements.len(), 3);
        assert_eq!(spec.steps[1], Step::Scroll { to: 600.0, smooth: false });

        let tree = spec.build_tree().unwrap();
        let about = tree.by_id("about").unwrap();
        let counter = tree.select_first(".counter").unwrap();
        assert_eq!(tree.parent(counter), Some(about));
        assert_eq!(tree.attr(counter, "data-target"), Some("120"));
    }

    #[test]
    fn test_unknown_parent_is_an_error() {
        let spec = PageSpec::parse(
            r##"
            [[element]]
            parent = "#nowhere"
            "##,
        )
        .unwrap();
        assert!(spec.build_tree().is_err());
    }

    #[test]
    fn test_replay_script() {
        let spec = PageSpec::parse(PAGE).unwrap();
        let mut page = Page::new(spec.build_tree().unwrap(), PageConfig::default());
        Portfolio::install(&mut page);

        for step in spec.script() {
            step.apply(&mut page).unwrap();
        }
        let counter = page.tree.select_first(".counter").unwrap();
        assert_eq!(page.tree.text(counter), Some("120+"));

        let missing = Step::Click {
            target: ".nope".into(),
        };
        assert!(missing.apply(&mut page).is_err());
    }

    #[test]
    fn test_empty_script_loads_page() {
        let spec = PageSpec::default();
        assert_eq!(spec.script(), vec![Step::Ready, Step::Load]);
    }
}
