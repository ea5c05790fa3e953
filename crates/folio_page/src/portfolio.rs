//! Portfolio bootstrap
//!
//! Binds every widget of the page to its elements and wires the page events
//! to them. [`Portfolio::install`] registers the lifecycle hooks; the widgets
//! themselves are mounted when the document becomes ready and the card tilt
//! once everything has loaded. Widgets whose elements are missing are
//! skipped.

use folio_animation::{AnimProperty, TriggerRange};
use folio_core::{event_types, ElementId, TimerId};
use tracing::{debug, info};

use crate::clipboard::{copy_email, CopyOutcome};
use crate::counter::{parse_target, Counter, CounterState};
use crate::cursor::CustomCursor;
use crate::device::DeviceProfile;
use crate::form::{on_blur, on_focus, ContactForm};
use crate::hero::{float_shapes, play_entrance, ParallaxScrub};
use crate::nav::{anchor_destination, NavMenu};
use crate::page::Page;
use crate::reveal::RevealSequencer;
use crate::scroll::{BackToTop, ScrollProgress};
use crate::skills::SkillBar;
use crate::theme::ThemeToggle;
use crate::tilt::{rest_transform, tilt_transform};
use crate::typewriter::Typewriter;
use crate::viewport::{ObserverId, VisibilityChange};

/// A counter and the one-shot observer that starts it
pub struct CounterSlot {
    pub counter: Counter,
    pub observer: ObserverId,
}

pub struct TypewriterSlot {
    pub element: ElementId,
    pub writer: Typewriter,
}

/// Widget state owned by the page
#[derive(Default)]
pub struct Widgets {
    pub reveals: RevealSequencer,
    pub skill_bars: Vec<SkillBar>,
    pub counters: Vec<CounterSlot>,
    pub typewriters: Vec<TypewriterSlot>,
    pub form: Option<ContactForm>,
    pub nav: Option<NavMenu>,
    pub back_to_top: Option<BackToTop>,
    pub progress: Option<ScrollProgress>,
    pub theme: Option<ThemeToggle>,
    pub cursor: Option<CustomCursor>,
    pub parallax: Option<ParallaxScrub>,
    resize_timer: Option<TimerId>,
}

pub struct Portfolio;

impl Portfolio {
    /// Detect the device profile and register the lifecycle hooks
    pub fn install(page: &mut Page) {
        page.device = DeviceProfile::detect(&page.config.device.user_agent);
        if page.device.is_mobile() {
            let body = page.tree.body();
            page.tree.add_class(body, &page.config.device.mobile_class);
            page.engine
                .set_default_duration(page.config.device.mobile_duration_ms);
            info!("portfolio: mobile profile");
        }

        page.events
            .once(event_types::DOM_READY, None, |p, _| Portfolio::mount(p));
        page.events
            .once(event_types::LOAD, None, |p, _| Portfolio::init_tilt(p));
        page.events
            .add(event_types::RESIZE, None, |p, _| schedule_reload(p));
    }

    /// Bind every widget that has its elements present
    pub fn mount(page: &mut Page) {
        Self::init_hero(page);
        Self::init_reveals(page);
        Self::init_skill_bars(page);
        Self::init_form(page);
        Self::init_nav(page);
        Self::init_back_to_top(page);
        Self::init_theme(page);
        Self::init_progress(page);
        Self::init_cursor(page);
        Self::init_counters(page);
        Self::init_typewriters(page);
        Self::init_clipboard(page);
        info!(
            "portfolio: mounted ({} reveals, {} counters, {} skill bars)",
            page.widgets.reveals.len(),
            page.widgets.counters.len(),
            page.widgets.skill_bars.len()
        );
    }

    // =========================================================================
    // Hero
    // =========================================================================

    fn init_hero(page: &mut Page) {
        let config = page.config.hero.clone();

        let elements = page.tree.select(&config.elements);
        if !elements.is_empty() {
            play_entrance(page.engine.as_mut(), &mut page.tree, &elements, &config);
        }
        let shapes = page.tree.select(&config.shapes);
        float_shapes(page.engine.as_mut(), &shapes, &config);

        let layer = page.tree.select_first(&config.parallax);
        let section = page.tree.select_first(&config.section);
        let (Some(layer), Some(section)) = (layer, section) else {
            debug!("hero: no parallax layer, skipping");
            return;
        };
        let scrub = ParallaxScrub::new(page.engine.as_mut(), layer, section, &config);
        scrub.update(page.engine.as_mut(), &mut page.tree, &page.scroll);
        page.widgets.parallax = Some(scrub);
        page.events.add(event_types::SCROLL, None, |p, _| {
            if let Some(scrub) = p.widgets.parallax {
                scrub.update(p.engine.as_mut(), &mut p.tree, &p.scroll);
            }
        });
    }

    // =========================================================================
    // Scroll reveals
    // =========================================================================

    fn init_reveals(page: &mut Page) {
        for group in page.config.reveal.clone() {
            let targets = page.tree.select(&group.selector);
            if targets.is_empty() {
                debug!("reveal: nothing matches {:?}", group.selector);
                continue;
            }
            let Page {
                widgets,
                observer,
                engine,
                tree,
                ..
            } = &mut *page;
            widgets.reveals.register_batch(
                observer.as_mut(),
                engine.as_mut(),
                tree,
                &targets,
                group.profile(),
                group.policy,
                group.stagger_ms,
            );
            for target in targets {
                if let Some(id) = page.widgets.reveals.get(target).map(|t| t.observer()) {
                    page.on_visibility(id, reveal_visibility);
                }
            }
        }
    }

    // =========================================================================
    // Skill bars
    // =========================================================================

    fn init_skill_bars(page: &mut Page) {
        let config = page.config.skill_bars.clone();
        for item in page.tree.select(&config.selector) {
            let Some(bar) = SkillBar::bind(&page.tree, item, &config.bar, &config.level_attribute)
            else {
                continue;
            };
            page.engine
                .set(&mut page.tree, bar.bar, &[(AnimProperty::WidthPercent, 0.0)]);

            let observer =
                page.observer
                    .observe_range(item, TriggerRange::starting_at(config.start), true);
            let (duration, easing) = (config.duration_ms, config.easing);
            page.on_visibility(observer, move |p, change| {
                if change.visible {
                    p.engine.play(bar.request(duration, easing));
                }
            });
            page.widgets.skill_bars.push(bar);
        }
    }

    // =========================================================================
    // Contact form
    // =========================================================================

    fn init_form(page: &mut Page) {
        let Some(form) = ContactForm::bind(&page.tree, &page.config.form) else {
            return;
        };
        let focused = page.config.form.focused_class.clone();
        for input in form.inputs().to_vec() {
            let class = focused.clone();
            page.events.add(event_types::FOCUS, Some(input), move |p, _| {
                on_focus(&mut p.tree, input, &class)
            });
            let class = focused.clone();
            page.events.add(event_types::BLUR, Some(input), move |p, _| {
                on_blur(&mut p.tree, input, &class)
            });
        }
        page.events
            .add(event_types::SUBMIT, Some(form.form()), |p, _| submit_form(p));
        page.widgets.form = Some(form);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn init_nav(page: &mut Page) {
        let config = page.config.nav.clone();
        let menu = NavMenu::bind(&page.tree, &config.toggle, &config.menu);
        if let Some(menu) = &menu {
            page.events
                .add(event_types::CLICK, Some(menu.toggle_element()), |p, _| {
                    if let Some(nav) = &p.widgets.nav {
                        nav.toggle(&mut p.tree);
                    }
                });
        } else {
            debug!("nav: no menu toggle, skipping");
        }
        page.widgets.nav = menu;

        for anchor in page.tree.select(&config.anchors) {
            page.events
                .add(event_types::CLICK, Some(anchor), move |p, _| follow_anchor(p, anchor));
        }
    }

    // =========================================================================
    // Scroll-driven controls
    // =========================================================================

    fn init_back_to_top(page: &mut Page) {
        let config = page.config.back_to_top.clone();
        let Some(element) = page.tree.select_first(&config.selector) else {
            debug!("back to top: no {:?}, skipping", config.selector);
            return;
        };
        let control = BackToTop::new(element, config.threshold_px);
        control.apply(&mut page.tree, &page.scroll);
        page.widgets.back_to_top = Some(control);

        page.events.add(event_types::SCROLL, None, |p, _| {
            if let Some(control) = p.widgets.back_to_top {
                control.apply(&mut p.tree, &p.scroll);
            }
        });
        page.events
            .add(event_types::CLICK, Some(element), |p, _| p.smooth_scroll_to(0.0));
    }

    fn init_progress(page: &mut Page) {
        let Some(bar) = page.tree.select_first(&page.config.progress.selector) else {
            debug!("progress: no bar, skipping");
            return;
        };
        let progress = ScrollProgress::new(bar);
        progress.apply(&mut page.tree, &page.scroll);
        page.widgets.progress = Some(progress);
        page.events.add(event_types::SCROLL, None, |p, _| {
            if let Some(progress) = p.widgets.progress {
                progress.apply(&mut p.tree, &p.scroll);
            }
        });
    }

    // =========================================================================
    // Theme
    // =========================================================================

    fn init_theme(page: &mut Page) {
        let config = page.config.theme.clone();
        let root = page.tree.root();
        let mut theme = ThemeToggle::new(root, config.storage_key, config.dark_class);
        let current = theme.init(&mut page.tree, page.store.as_ref());
        debug!("theme: starting with {}", current.as_str());
        page.widgets.theme = Some(theme);

        let Some(toggle) = page.tree.select_first(&config.toggle) else {
            debug!("theme: no toggle, skipping");
            return;
        };
        page.events.add(event_types::CLICK, Some(toggle), |p, _| {
            if let Some(theme) = p.widgets.theme.as_mut() {
                theme.toggle(&mut p.tree, p.store.as_mut());
            }
        });
    }

    // =========================================================================
    // Pointer effects
    // =========================================================================

    fn init_cursor(page: &mut Page) {
        if page.device.is_mobile() {
            debug!("cursor: disabled on mobile");
            return;
        }
        let config = page.config.cursor.clone();
        let Some(element) = page.tree.select_first(&config.selector) else {
            debug!("cursor: no {:?}, skipping", config.selector);
            return;
        };
        page.widgets.cursor = Some(CustomCursor::new(element, config.easing));

        page.events.add(event_types::POINTER_MOVE, None, |p, event| {
            let Some((x, y)) = event.pointer() else {
                return;
            };
            let start = p
                .widgets
                .cursor
                .as_mut()
                .is_some_and(|cursor| cursor.point_to(x, y));
            if start {
                p.request_frame(cursor_frame);
            }
        });

        for target in page.tree.select(&config.hover_targets) {
            let class = config.hover_class.clone();
            page.events
                .add(event_types::POINTER_ENTER, Some(target), move |p, _| {
                    p.tree.add_class(element, &class)
                });
            let class = config.hover_class.clone();
            page.events
                .add(event_types::POINTER_LEAVE, Some(target), move |p, _| {
                    p.tree.remove_class(element, &class)
                });
        }
    }

    /// Card tilt, bound once all resources have loaded
    pub fn init_tilt(page: &mut Page) {
        let cards = page.tree.select(&page.config.tilt.selector);
        debug!("tilt: {} cards", cards.len());
        for card in cards {
            page.events
                .add(event_types::POINTER_MOVE, Some(card), move |p, event| {
                    let Some((x, y)) = event.pointer() else {
                        return;
                    };
                    let Some(bounds) = p.tree.bounds(card) else {
                        return;
                    };
                    // Bounds are in document space, the pointer in viewport space
                    let rect = bounds.offset(0.0, -p.scroll.offset);
                    let transform = tilt_transform(rect, x, y, &p.config.tilt);
                    p.tree.set_style(card, "transform", transform);
                });
            page.events
                .add(event_types::POINTER_LEAVE, Some(card), move |p, _| {
                    let transform = rest_transform(&p.config.tilt);
                    p.tree.set_style(card, "transform", transform);
                });
        }
    }

    // =========================================================================
    // Counters and typewriters
    // =========================================================================

    fn init_counters(page: &mut Page) {
        let config = page.config.counter.clone();
        for element in page.tree.select(&config.selector) {
            let raw = page
                .tree
                .attr(element, &config.target_attribute)
                .or_else(|| page.tree.text(element));
            let target = parse_target(raw);

            let observer =
                page.observer
                    .observe_range(element, TriggerRange::starting_at(config.start), true);
            let index = page.widgets.counters.len();
            page.widgets.counters.push(CounterSlot {
                counter: Counter::new(element, target, config.steps, config.suffix.as_str()),
                observer,
            });
            page.on_visibility(observer, move |p, change| {
                if change.visible {
                    start_counter(p, index);
                }
            });
        }
    }

    fn init_typewriters(page: &mut Page) {
        let config = page.config.typewriter.clone();
        for (i, element) in page.tree.select(&config.selector).into_iter().enumerate() {
            let text = page
                .tree
                .attr(element, &config.text_attribute)
                .or_else(|| page.tree.text(element))
                .unwrap_or_default()
                .to_string();
            page.tree.set_text(element, "");
            page.tree.add_class(element, &config.cursor_class);

            let index = page.widgets.typewriters.len();
            page.widgets.typewriters.push(TypewriterSlot {
                element,
                writer: Typewriter::new(&text, config.speed, config.seed.wrapping_add(i as u64)),
            });
            page.set_timeout(config.start_delay_ms as u64, move |p| type_tick(p, index));
        }
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    fn init_clipboard(page: &mut Page) {
        for element in page.tree.select(&page.config.clipboard.selector) {
            page.events
                .add(event_types::CLICK, Some(element), move |p, _| copy_address(p, element));
        }
    }
}

fn reveal_visibility(page: &mut Page, change: &VisibilityChange) {
    let Page {
        widgets,
        observer,
        engine,
        ..
    } = &mut *page;
    widgets.reveals.handle_visibility(
        observer.as_mut(),
        engine.as_mut(),
        change.element,
        change.visible,
    );
}

fn submit_form(page: &mut Page) {
    let Some(form) = page.widgets.form.as_mut() else {
        return;
    };
    if !form.submit(&mut page.tree) {
        return;
    }
    info!("form: sending");
    let sending_ms = page.config.form.sending_ms as u64;
    let reset_ms = page.config.form.reset_ms as u64;
    page.set_timeout(sending_ms, move |p| {
        if let Some(form) = p.widgets.form.as_mut() {
            form.mark_sent(&mut p.tree);
        }
        p.set_timeout(reset_ms, |p| {
            if let Some(form) = p.widgets.form.as_mut() {
                form.restore(&mut p.tree);
            }
        });
    });
}

fn follow_anchor(page: &mut Page, anchor: ElementId) {
    let Some(href) = page.tree.attr(anchor, "href").map(str::to_string) else {
        return;
    };
    let Some(destination) = anchor_destination(&page.tree, &href, page.config.nav.anchor_offset)
    else {
        return;
    };
    page.smooth_scroll_to(destination);
    if let Some(nav) = &page.widgets.nav {
        if nav.is_open(&page.tree) {
            nav.toggle(&mut page.tree);
        }
    }
}

fn cursor_frame(page: &mut Page) {
    let Some(cursor) = page.widgets.cursor.as_mut() else {
        return;
    };
    if cursor.step(&mut page.tree) {
        page.request_frame(cursor_frame);
    }
}

fn start_counter(page: &mut Page, index: usize) {
    let started = page
        .widgets
        .counters
        .get_mut(index)
        .is_some_and(|slot| slot.counter.start());
    if started {
        counter_tick(page, index);
    }
}

fn counter_tick(page: &mut Page, index: usize) {
    let Some(slot) = page.widgets.counters.get_mut(index) else {
        return;
    };
    let Some(text) = slot.counter.tick() else {
        return;
    };
    let element = slot.counter.element();
    let running = slot.counter.state() == CounterState::Running;
    page.tree.set_text(element, text);
    if running {
        let tick_ms = page.config.counter.tick_ms as u64;
        page.set_timeout(tick_ms, move |p| counter_tick(p, index));
    }
}

fn type_tick(page: &mut Page, index: usize) {
    let Some(slot) = page.widgets.typewriters.get_mut(index) else {
        return;
    };
    let Some(frame) = slot.writer.tick() else {
        return;
    };
    let element = slot.element;
    let next_delay = (!frame.completed).then(|| slot.writer.next_delay());

    page.tree.set_text(element, frame.text);
    match next_delay {
        Some(delay) => {
            page.set_timeout(delay as u64, move |p| type_tick(p, index));
        }
        None => {
            page.tree
                .remove_class(element, &page.config.typewriter.cursor_class);
            debug!("typewriter: finished");
        }
    }
}

fn copy_address(page: &mut Page, element: ElementId) {
    let config = page.config.clipboard.clone();
    let address = page
        .tree
        .attr(element, &config.address_attribute)
        .unwrap_or(&config.email)
        .to_string();
    let outcome = copy_email(page.clipboard.as_mut(), page.navigator.as_mut(), &address);
    if outcome == CopyOutcome::Copied {
        page.tree.add_class(element, &config.copied_class);
        let class = config.copied_class;
        page.set_timeout(config.copied_ms as u64, move |p| {
            p.tree.remove_class(element, &class)
        });
    }
}

/// Debounce a burst of resizes into one reload
fn schedule_reload(page: &mut Page) {
    if let Some(pending) = page.widgets.resize_timer.take() {
        page.timers.clear(pending);
    }
    let debounce_ms = page.config.device.resize_debounce_ms as u64;
    let timer = page.set_timeout(debounce_ms, |p| {
        p.widgets.resize_timer = None;
        info!("portfolio: resize settled, reloading");
        p.navigator.reload();
    });
    page.widgets.resize_timer = Some(timer);
}
