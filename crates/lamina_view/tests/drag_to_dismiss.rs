//! Drag-to-dismiss, written the way an application would on top of the tree
//!
//! A bottom sheet follows the finger upward, and on release either slides off
//! screen and fades out (flung or dragged far enough) or springs back.
//! Exercises direct transform edits, animation cancellation, named lanes and
//! the momentum estimator together.

use lamina_animation::Momentum;
use lamina_core::{Completion, LaminaConfig, ManualClock, MemoryPresenter, Rect, Transform};
use lamina_view::{ViewId, ViewTree};

const FRAME_MS: f64 = 16.0;

struct DragToDismiss {
    sheet: ViewId,
    momentum: Momentum<ManualClock>,
    origin: f32,
}

impl DragToDismiss {
    fn new(sheet: ViewId, clock: ManualClock) -> Self {
        Self {
            sheet,
            momentum: Momentum::with_clock(300.0, clock),
            origin: 0.0,
        }
    }

    fn start(&mut self, tree: &mut ViewTree<MemoryPresenter>) {
        tree.reset_animation(self.sheet);
        self.momentum.reset();
        self.origin = tree.view(self.sheet).unwrap().transform().translation().1;
    }

    fn drag(&mut self, tree: &mut ViewTree<MemoryPresenter>, dy: f32) {
        let y = (self.origin + dy).min(0.0);
        tree.update_transform(self.sheet, |transform| transform.set_translation(0.0, y));
        self.momentum.inject_value(dy as f64);
    }

    /// Returns whether the sheet is leaving, plus the handle of the slide
    fn release(&mut self, tree: &mut ViewTree<MemoryPresenter>, dy: f32) -> (bool, Completion) {
        let height = tree.view(self.sheet).unwrap().bounds().height();
        let projected = dy as f64 + self.momentum.compute_delta();
        let dismiss = projected <= -(height as f64) / 2.0;

        let animation = tree.animation(self.sheet).unwrap();
        let done = if dismiss {
            let done = animation
                .get("slide-transform")
                .chain(0.0)
                .transform(300.0, Transform::new().translate(0.0, -height))
                .completion();
            animation.get("slide").chain(0.0).opacity(300.0, 0.0);
            done
        } else {
            let done = animation
                .get("slide-transform")
                .chain(0.0)
                .transform(100.0, Transform::new())
                .completion();
            animation.get("slide").chain(0.0).opacity(100.0, 1.0);
            done
        };
        (dismiss, done)
    }
}

struct Scene {
    tree: ViewTree<MemoryPresenter>,
    clock: ManualClock,
    sheet: ViewId,
}

fn scene() -> Scene {
    let clock = ManualClock::new();
    let mut tree = ViewTree::with_clock(MemoryPresenter::new(), LaminaConfig::default(), clock.clone());
    let host = tree.presenter().document();
    let screen = tree.create_view();
    let sheet = tree.create_view();
    tree.set_bounds(screen, Rect::new(0.0, 0.0, 320.0, 400.0));
    tree.mount(screen, host);
    tree.append(screen, sheet);
    tree.match_parent_size(sheet);
    tree.deliver_frame();
    Scene { tree, clock, sheet }
}

fn transform_style(scene: &Scene) -> Option<String> {
    let element = scene.tree.view(scene.sheet)?.element();
    scene
        .tree
        .presenter()
        .style(element, "transform")
        .map(str::to_string)
}

fn drag_through(scene: &mut Scene, effect: &mut DragToDismiss, samples: &[f32]) {
    effect.start(&mut scene.tree);
    for &dy in samples {
        scene.clock.advance(FRAME_MS);
        effect.drag(&mut scene.tree, dy);
        scene.tree.deliver_frame();
    }
}

fn run_until(scene: &mut Scene, done: &Completion) {
    let mut frames = 0;
    while !done.is_resolved() && frames < 100 {
        scene.clock.advance(FRAME_MS);
        scene.tree.deliver_frame();
        frames += 1;
    }
    assert!(done.is_resolved(), "animation did not finish");
}

/// The sheet tracks the finger, and cannot be pulled below its resting place
#[test]
fn test_sheet_follows_drag() {
    let mut scene = scene();
    let mut effect = DragToDismiss::new(scene.sheet, scene.clock.clone());

    drag_through(&mut scene, &mut effect, &[0.0, -30.0]);
    assert_eq!(
        transform_style(&scene).as_deref(),
        Some("translate(0px, -30px) translateZ(0)")
    );

    effect.drag(&mut scene.tree, 25.0);
    scene.tree.deliver_frame();
    assert_eq!(
        transform_style(&scene).as_deref(),
        Some("translate(0px, 0px) translateZ(0)")
    );
}

/// A quick flick past the threshold slides the sheet away and fades it
#[test]
fn test_fast_fling_dismisses() {
    let mut scene = scene();
    let mut effect = DragToDismiss::new(scene.sheet, scene.clock.clone());

    drag_through(&mut scene, &mut effect, &[0.0, -20.0, -60.0, -120.0]);
    assert!(effect.momentum.compute_delta() < 0.0);

    let (dismiss, done) = effect.release(&mut scene.tree, -120.0);
    assert!(dismiss);
    run_until(&mut scene, &done);

    let sheet = scene.tree.view(scene.sheet).unwrap();
    let state = sheet.animation_set().unwrap().view_state();
    assert_eq!(state.current_transform().translation(), (0.0, -400.0));
    assert_eq!(
        transform_style(&scene).as_deref(),
        Some("translate(0px, -400px) translateZ(0)")
    );
    // Both lanes ran side by side and finished together
    let element = sheet.element();
    assert_eq!(scene.tree.presenter().style(element, "opacity"), Some("0"));

    scene.tree.remove(scene.sheet);
    assert!(!scene.tree.is_attached(scene.sheet));
}

/// A slow, short drag springs back
#[test]
fn test_slow_drag_reverts() {
    let mut scene = scene();
    let mut effect = DragToDismiss::new(scene.sheet, scene.clock.clone());

    drag_through(&mut scene, &mut effect, &[0.0, -5.0, -10.0, -15.0]);
    assert_eq!(effect.momentum.compute_delta(), 0.0);

    let (dismiss, done) = effect.release(&mut scene.tree, -15.0);
    assert!(!dismiss);
    run_until(&mut scene, &done);

    let state = scene
        .tree
        .view(scene.sheet)
        .unwrap()
        .animation_set()
        .unwrap()
        .view_state();
    assert_eq!(state.current_transform().translation(), (0.0, 0.0));

    // Settle: commit the final value to the view and drop the override
    scene
        .tree
        .update_transform(scene.sheet, |transform| transform.set_translation(0.0, 0.0));
    scene.tree.reset_animation(scene.sheet);
    scene.tree.deliver_frame();
    assert_eq!(
        transform_style(&scene).as_deref(),
        Some("translate(0px, 0px) translateZ(0)")
    );
    assert!(!scene.tree.needs_frame());
}

/// Grabbing the sheet again cancels a pending slide
#[test]
fn test_drag_interrupts_slide() {
    let mut scene = scene();
    let mut effect = DragToDismiss::new(scene.sheet, scene.clock.clone());

    drag_through(&mut scene, &mut effect, &[0.0, -5.0, -10.0, -15.0]);
    let (_, done) = effect.release(&mut scene.tree, -15.0);
    scene.tree.deliver_frame();

    assert!(!done.is_resolved());
    effect.start(&mut scene.tree);
    // Cancelled slides release their waiters
    assert!(done.is_resolved());
    scene.tree.deliver_frame();
    assert_eq!(effect.origin, -15.0);
    assert_eq!(
        transform_style(&scene).as_deref(),
        Some("translate(0px, -15px) translateZ(0)")
    );
    assert!(!scene.tree.needs_frame());
}
