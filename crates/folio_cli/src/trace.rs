//! Human-readable session trace

use folio_animation::{format_number, EngineCall, Repeat, TweenRequest};
use folio_core::{DisplayTree, ElementId};
use serde_json::{json, Map, Value};

/// Short name of an element: `#id`, else `tag.class`, else the tag
pub fn label(tree: &DisplayTree, id: ElementId) -> String {
    let Some(el) = tree.get(id) else {
        return "<removed>".to_string();
    };
    if let Some(element_id) = &el.id {
        return format!("#{}", element_id);
    }
    match el.classes.first() {
        Some(class) => format!("{}.{}", el.tag, class),
        None => el.tag.clone(),
    }
}

pub fn describe_call(call: &EngineCall, tree: &DisplayTree) -> String {
    match call {
        EngineCall::Set { target, values } => {
            let values: Vec<String> = values
                .iter()
                .map(|(property, value)| format!("{:?}={}", property, format_number(*value)))
                .collect();
            format!("set {} {}", label(tree, *target), values.join(" "))
        }
        EngineCall::Play { id, request } => {
            format!("play {:?} {}", id, describe_request(request, tree))
        }
        EngineCall::Restart(id) => format!("restart {:?}", id),
        EngineCall::Reverse(id) => format!("reverse {:?}", id),
        EngineCall::Seek { id, progress } => {
            format!("seek {:?} to {}", id, format_number(*progress))
        }
        EngineCall::Kill(id) => format!("kill {:?}", id),
    }
}

fn describe_request(request: &TweenRequest, tree: &DisplayTree) -> String {
    let properties: Vec<String> = request
        .properties
        .iter()
        .map(|p| {
            format!(
                "{:?} {} -> {}",
                p.property,
                format_number(p.from),
                format_number(p.to)
            )
        })
        .collect();

    let mut out = format!("{} [{}]", label(tree, request.target), properties.join(", "));
    match request.duration_ms {
        Some(ms) => out.push_str(&format!(" {}ms", ms)),
        None => out.push_str(" default duration"),
    }
    if request.delay_ms > 0 {
        out.push_str(&format!(" delay {}ms", request.delay_ms));
    }
    out.push_str(&format!(" {}", request.easing.name()));
    match request.repeat {
        Repeat::Never => {}
        Repeat::Times(n) => out.push_str(&format!(" repeat {}", n)),
        Repeat::Infinite => out.push_str(" repeat forever"),
    }
    if request.yoyo {
        out.push_str(" yoyo");
    }
    if request.paused {
        out.push_str(" paused");
    }
    out
}

/// Elements carrying inline styles or text, in document order
pub fn snapshot(tree: &DisplayTree) -> Vec<(String, Value)> {
    tree.descendants(tree.root())
        .into_iter()
        .filter_map(|id| {
            let el = tree.get(id)?;
            if el.style.is_empty() && el.text.is_empty() && el.classes.is_empty() {
                return None;
            }
            let style: Map<String, Value> = el
                .style
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            Some((
                label(tree, id),
                json!({
                    "classes": el.classes.to_vec(),
                    "style": style,
                    "text": el.text,
                }),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::{AnimProperty, Easing};
    use folio_core::Element;

    #[test]
    fn test_labels() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let form = tree.append(body, Element::new("form").with_id("contactForm"));
        let card = tree.append(body, Element::new("div").with_class("project-card"));
        let bare = tree.append(body, Element::new("p"));

        assert_eq!(label(&tree, form), "#contactForm");
        assert_eq!(label(&tree, card), "div.project-card");
        assert_eq!(label(&tree, bare), "p");

        tree.remove(bare);
        assert_eq!(label(&tree, bare), "<removed>");
    }

    #[test]
    fn test_describe_play() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        let card = tree.append(body, Element::new("div").with_class("project-card"));
        let request = TweenRequest::new(card)
            .from(AnimProperty::Y, 50.0)
            .duration(1000)
            .delay(150)
            .ease(Easing::EaseOutQuart);

        let text = describe_request(&request, &tree);
        assert!(text.starts_with("div.project-card [Y 50 -> 0] 1000ms delay 150ms"));
    }

    #[test]
    fn test_snapshot_skips_plain_elements() {
        let mut tree = DisplayTree::new();
        let body = tree.body();
        tree.append(body, Element::new("div"));
        let bar = tree.append(body, Element::new("div").with_class("scroll-progress"));
        tree.set_style(bar, "width", "50%");

        let snap = snapshot(&tree);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].0, "div.scroll-progress");
        assert_eq!(snap[0].1["style"]["width"], "50%");
    }
}
