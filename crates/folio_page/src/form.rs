//! Contact form
//!
//! Submission is simulated: the button shows a sending label, then a success
//! label while the form is cleared, then returns to its original state.
//!
//! ```text
//! Idle ──submit──▶ Sending ──sending_ms──▶ Sent ──reset_ms──▶ Idle
//! ```
//!
//! Submitting while not `Idle` is ignored. The page schedules the two
//! timed transitions; this type only applies their effects.

use folio_core::{DisplayTree, ElementId};
use tracing::debug;

use crate::config::FormConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Sending,
    Sent,
}

/// Bound contact form
#[derive(Clone, Debug)]
pub struct ContactForm {
    form: ElementId,
    button: ElementId,
    /// Element holding the button text
    label: ElementId,
    inputs: Vec<ElementId>,
    original_label: String,
    original_background: Option<String>,
    state: FormState,
    config: FormConfig,
}

impl ContactForm {
    /// Bind the form with the configured id; `None` if it or its button is missing
    pub fn bind(tree: &DisplayTree, config: &FormConfig) -> Option<Self> {
        let Some(form) = tree.by_id(&config.id) else {
            debug!("form: #{} not found, skipping", config.id);
            return None;
        };
        let Some(button) = tree.select_first_within(form, &config.button) else {
            debug!("form: no {:?} inside #{}, skipping", config.button, config.id);
            return None;
        };
        let label = tree.select_first_within(button, "span").unwrap_or(button);
        Some(Self {
            form,
            button,
            label,
            inputs: tree.select_within(form, &config.inputs),
            original_label: tree.text(label).unwrap_or_default().to_string(),
            original_background: tree.style(button, "background").map(str::to_string),
            state: FormState::Idle,
            config: config.clone(),
        })
    }

    pub fn form(&self) -> ElementId {
        self.form
    }

    pub fn button(&self) -> ElementId {
        self.button
    }

    pub fn inputs(&self) -> &[ElementId] {
        &self.inputs
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Start sending; returns false (and changes nothing) unless idle
    pub fn submit(&mut self, tree: &mut DisplayTree) -> bool {
        if self.state != FormState::Idle {
            debug!("form: submit ignored while {:?}", self.state);
            return false;
        }
        self.state = FormState::Sending;
        tree.set_text(self.label, self.config.sending_label.as_str());
        tree.set_disabled(self.button, true);
        true
    }

    /// Show success and clear the fields
    pub fn mark_sent(&mut self, tree: &mut DisplayTree) {
        if self.state != FormState::Sending {
            return;
        }
        self.state = FormState::Sent;
        tree.set_text(self.label, self.config.sent_label.as_str());
        tree.set_style(self.button, "background", self.config.sent_background.as_str());
        for input in &self.inputs {
            if let Some(el) = tree.get_mut(*input) {
                el.value.clear();
            }
        }
    }

    /// Return the button to its original label and style
    pub fn restore(&mut self, tree: &mut DisplayTree) {
        if self.state != FormState::Sent {
            return;
        }
        self.state = FormState::Idle;
        tree.set_text(self.label, self.original_label.as_str());
        tree.set_style(
            self.button,
            "background",
            self.original_background.clone().unwrap_or_default(),
        );
        tree.set_disabled(self.button, false);
    }
}

/// Focus styling: mark the field's container
pub fn on_focus(tree: &mut DisplayTree, input: ElementId, focused_class: &str) {
    if let Some(parent) = tree.parent(input) {
        tree.add_class(parent, focused_class);
    }
}

/// Blur styling: unmark the container only when the field is empty
pub fn on_blur(tree: &mut DisplayTree, input: ElementId, focused_class: &str) {
    let empty = tree.get(input).is_some_and(|el| el.value.is_empty());
    if !empty {
        return;
    }
    if let Some(parent) = tree.parent(input) {
        tree.remove_class(parent, focused_class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Element;

    struct Fixture {
        tree: DisplayTree,
        button: ElementId,
        label: ElementId,
        name: ElementId,
        group: ElementId,
    }

    fn fixture() -> Fixture {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let form = tree.append(body, Element::new("form").with_id("contactForm"));
        let group = tree.append(form, Element::new("div").with_class("form-group"));
        let name = tree.append(group, Element::new("input"));
        let button = tree.append(form, Element::new("button").with_class("submit-button"));
        let label = tree.append(button, Element::new("span").with_text("Send Message"));
        Fixture {
            tree,
            button,
            label,
            name,
            group,
        }
    }

    #[test]
    fn test_submit_cycle() {
        let mut f = fixture();
        let mut form = ContactForm::bind(&f.tree, &FormConfig::default()).unwrap();
        f.tree.get_mut(f.name).unwrap().value = "Ada".into();

        assert!(form.submit(&mut f.tree));
        assert_eq!(form.state(), FormState::Sending);
        assert_eq!(f.tree.text(f.label), Some("Sending..."));
        assert!(f.tree.get(f.button).unwrap().disabled);

        assert!(!form.submit(&mut f.tree));

        form.mark_sent(&mut f.tree);
        assert_eq!(f.tree.text(f.label), Some("Message Sent!"));
        assert_eq!(f.tree.style(f.button, "background"), Some("#4CAF50"));
        assert_eq!(f.tree.get(f.name).unwrap().value, "");
        assert!(!form.submit(&mut f.tree));

        form.restore(&mut f.tree);
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(f.tree.text(f.label), Some("Send Message"));
        assert_eq!(f.tree.style(f.button, "background"), None);
        assert!(!f.tree.get(f.button).unwrap().disabled);
    }

    #[test]
    fn test_out_of_order_transitions_ignored() {
        let mut f = fixture();
        let mut form = ContactForm::bind(&f.tree, &FormConfig::default()).unwrap();
        form.restore(&mut f.tree);
        form.mark_sent(&mut f.tree);
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(f.tree.text(f.label), Some("Send Message"));
    }

    #[test]
    fn test_missing_form_is_skipped() {
        let f = fixture();
        let config = FormConfig {
            id: "contact-form".into(),
            ..FormConfig::default()
        };
        assert!(ContactForm::bind(&f.tree, &config).is_none());
    }

    #[test]
    fn test_focus_blur_classes() {
        let mut f = fixture();
        on_focus(&mut f.tree, f.name, "focused");
        assert!(f.tree.has_class(f.group, "focused"));

        f.tree.get_mut(f.name).unwrap().value = "Ada".into();
        on_blur(&mut f.tree, f.name, "focused");
        assert!(f.tree.has_class(f.group, "focused"));

        f.tree.get_mut(f.name).unwrap().value.clear();
        on_blur(&mut f.tree, f.name, "focused");
        assert!(!f.tree.has_class(f.group, "focused"));
    }
}
