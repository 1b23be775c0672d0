//! Integration tests for layout scheduling and render invalidation
//!
//! These tests verify that:
//! - Any number of dirty views produce one layout pass per root per frame
//! - Removed views are inert for layout and rendering
//! - Setters read back immediately, before any frame
//! - Margin and padding changes re-run layout

use std::cell::RefCell;
use std::rc::Rc;

use lamina_core::{EdgeInsets, MemoryPresenter, Presenter, Property, Rect, Transform};
use lamina_view::{Lifecycle, ViewEvent, ViewEventKind, ViewId, ViewTree};

struct Fixture {
    tree: ViewTree<MemoryPresenter>,
    root: ViewId,
    a: ViewId,
    b: ViewId,
    c: ViewId,
}

/// root -> a -> b, root -> c, all laid out and clean
fn fixture() -> Fixture {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("lamina_view=trace")
        .try_init();

    let mut tree = ViewTree::new(MemoryPresenter::new());
    let host = tree.presenter().document();
    let root = tree.create_view();
    let a = tree.create_view();
    let b = tree.create_view();
    let c = tree.create_view();

    tree.set_bounds(root, Rect::new(0.0, 0.0, 300.0, 200.0));
    tree.mount(root, host);
    tree.append(root, a);
    tree.append(a, b);
    tree.append(root, c);
    for view in [a, b, c] {
        tree.match_parent_size(view);
    }
    tree.deliver_frame();

    Fixture { tree, root, a, b, c }
}

fn style(tree: &ViewTree<MemoryPresenter>, view: ViewId, property: &str) -> Option<String> {
    let element = tree.view(view)?.element();
    tree.presenter().style(element, property).map(str::to_string)
}

/// Many dirty views, one pass from the true root
#[test]
fn test_single_layout_pass_per_frame() {
    let Fixture { mut tree, root, a, b, c } = fixture();
    for view in [root, a, b, c] {
        assert!(!tree.view(view).unwrap().needs_layout());
    }

    tree.set_needs_layout(b, true);
    tree.set_needs_layout(c, true);
    tree.update_layout(a);
    tree.set_padding(c, EdgeInsets::uniform(4.0));

    let stats = tree.deliver_frame();
    assert_eq!(stats.layout_passes, 1);
    for view in [root, a, b, c] {
        assert!(!tree.view(view).unwrap().needs_layout());
    }

    // Nothing left for the next frame
    assert!(!tree.needs_frame());
    assert_eq!(tree.deliver_frame().layout_passes, 0);
}

/// Disjoint roots keep separate layout registrations
#[test]
fn test_disjoint_roots_each_get_a_pass() {
    let mut tree = ViewTree::new(MemoryPresenter::new());
    let host = tree.presenter().document();
    let first = tree.create_view();
    let second = tree.create_view();
    tree.mount(first, host);
    tree.mount(second, host);

    let stats = tree.deliver_frame();
    assert_eq!(stats.layout_passes, 2);
    assert!(!tree.view(first).unwrap().needs_layout());
    assert!(!tree.view(second).unwrap().needs_layout());
}

/// Layout resolves top-down: children see their parent's resolved size
#[test]
fn test_nested_match_parent() {
    let Fixture { tree, a, b, c, .. } = fixture();
    for view in [a, b, c] {
        assert_eq!(
            tree.view(view).unwrap().bounds(),
            Rect::new(0.0, 0.0, 300.0, 200.0)
        );
    }
    assert_eq!(style(&tree, b, "width").as_deref(), Some("300px"));
}

/// Removed views drop scheduled work and ignore new requests
#[test]
fn test_removed_view_is_inert() {
    let Fixture { mut tree, root, a, .. } = fixture();
    let updates = Rc::new(RefCell::new(0));
    let counter = updates.clone();
    tree.on(a, ViewEventKind::Updated, move |_| *counter.borrow_mut() += 1);

    // Scheduled before removal
    tree.set_opacity(a, 0.5);
    tree.detach(a);
    assert_eq!(tree.view(a).unwrap().lifecycle(), Lifecycle::Removed);
    assert!(tree.should_ignore_during_layout(a));

    tree.deliver_frame();
    assert_eq!(style(&tree, a, "opacity"), None);
    assert_eq!(*updates.borrow(), 0);

    // Requests after removal
    let needs_layout = tree.view(a).unwrap().needs_layout();
    tree.set_needs_layout(a, !needs_layout);
    tree.invalidate(a, Property::Transform);
    assert_eq!(tree.view(a).unwrap().needs_layout(), needs_layout);
    // Kept for a later attach, but nothing is scheduled
    assert!(tree.view(a).unwrap().is_invalidated(&Property::Opacity));
    assert!(tree.view(a).unwrap().is_invalidated(&Property::Transform));
    assert!(!tree.needs_frame());
    tree.deliver_frame();
    assert_eq!(*updates.borrow(), 0);
    assert!(!tree.children_views(root).contains(&a));
}

/// Detached views can come back
#[test]
fn test_reattach_after_detach() {
    let Fixture { mut tree, root, a, b, .. } = fixture();
    tree.detach(a);
    tree.deliver_frame();

    tree.set_size(root, 120.0, 80.0);
    tree.append(root, a);
    assert_eq!(tree.view(a).unwrap().lifecycle(), Lifecycle::Visible);
    tree.deliver_frame();

    assert_eq!(tree.view(a).unwrap().bounds().width(), 120.0);
    assert_eq!(tree.view(b).unwrap().bounds().height(), 80.0);
}

/// Changes made while detached are written once the view is back
#[test]
fn test_detached_changes_reach_presenter_on_reattach() {
    let Fixture { mut tree, root, .. } = fixture();
    let child = tree.create_view();
    tree.append(root, child);
    tree.set_bounds(child, Rect::new(1.0, 1.0, 10.0, 10.0));
    tree.deliver_frame();
    assert_eq!(style(&tree, child, "left").as_deref(), Some("1px"));

    tree.detach(child);
    tree.set_position(child, 50.0, 60.0);
    tree.deliver_frame();
    assert_eq!(style(&tree, child, "left").as_deref(), Some("1px"));
    assert!(!tree.needs_frame());

    tree.append(root, child);
    assert!(tree.needs_frame());
    tree.deliver_frame();
    assert_eq!(style(&tree, child, "left").as_deref(), Some("50px"));
    assert_eq!(style(&tree, child, "top").as_deref(), Some("60px"));
    assert_eq!(tree.view(child).unwrap().pending_invalidations().count(), 0);
}

/// Values read back before any frame is delivered
#[test]
fn test_setters_round_trip() {
    let mut tree = ViewTree::new(MemoryPresenter::new());
    let view = tree.create_view();
    let transform = Transform::new().translate(3.0, 4.0).rotate(45.0);

    tree.set_bounds(view, Rect::new(1.0, 2.0, 30.0, 40.0));
    tree.set_transform(view, &transform);
    tree.set_opacity(view, 0.75);
    tree.set_padding(view, EdgeInsets::new(1.0, 2.0, 3.0, 4.0));
    tree.set_margin(view, EdgeInsets::uniform(8.0));

    let v = tree.view(view).unwrap();
    assert_eq!(v.bounds(), Rect::new(1.0, 2.0, 30.0, 40.0));
    assert_eq!(v.transform(), &transform);
    assert_eq!(v.opacity(), 0.75);
    assert_eq!(v.padding(), EdgeInsets::new(1.0, 2.0, 3.0, 4.0));
    assert_eq!(v.margin(), EdgeInsets::uniform(8.0));
    assert_eq!(tree.outer_width(view), Some(30.0 + 6.0 + 16.0));
    assert_eq!(tree.outer_height(view), Some(40.0 + 4.0 + 16.0));

    tree.deliver_frame();
    assert_eq!(style(&tree, view, "padding").as_deref(), Some("1px 2px 3px 4px"));
    assert_eq!(style(&tree, view, "margin").as_deref(), Some("8px 8px 8px 8px"));
}

/// A margin change makes a clean view dirty; one frame resolves it
#[test]
fn test_margin_change_relayouts() {
    let Fixture { mut tree, root, c, .. } = fixture();

    // Parent grows without requesting layout; c is stale but clean
    tree.set_size(root, 500.0, 260.0);
    assert!(!tree.view(c).unwrap().needs_layout());

    tree.set_margin(c, EdgeInsets::new(0.0, 10.0, 0.0, 10.0));
    assert!(tree.view(c).unwrap().needs_layout());

    let stats = tree.deliver_frame();
    assert_eq!(stats.layout_passes, 1);
    let view = tree.view(c).unwrap();
    assert!(!view.needs_layout());
    assert_eq!(view.bounds().width(), 500.0);
    assert_eq!(view.bounds().height(), 260.0);
    assert_eq!(view.outer_width(), 520.0);
}

/// Custom tags surface as validation events, followed by an update event
#[test]
fn test_custom_invalidation_events() {
    let mut tree = ViewTree::new(MemoryPresenter::new());
    let view = tree.create_view();
    let seen = Rc::new(RefCell::new(Vec::new()));
    for kind in [ViewEventKind::Validated, ViewEventKind::Updated] {
        let sink = seen.clone();
        tree.on(view, kind, move |event| sink.borrow_mut().push(event.clone()));
    }

    tree.invalidate(view, Property::custom("filter"));
    tree.invalidate(view, Property::Opacity);
    tree.deliver_frame();

    assert_eq!(
        *seen.borrow(),
        vec![
            ViewEvent::Validated {
                view,
                property: Property::Custom("filter".into()),
            },
            ViewEvent::Updated { view },
        ]
    );
    assert_eq!(style(&tree, view, "opacity").as_deref(), Some("1"));
}

/// Disposed views vanish along with their element
#[test]
fn test_dispose() {
    let Fixture { mut tree, root, c, .. } = fixture();
    let element = tree.view(c).unwrap().element();
    tree.dispose(c);

    assert!(!tree.contains(c));
    assert_eq!(tree.view_for_element(element), None);
    assert!(!tree.presenter().contains(element));
    assert_eq!(tree.children_views(root).len(), 1);
}
