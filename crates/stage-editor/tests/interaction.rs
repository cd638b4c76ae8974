//! Integration tests: interaction controller state machine (stage-editor ↔ stage-core).
//!
//! Drives the controller the way the staging screen does: catalog clicks,
//! canvas clicks and drags, shortcuts, and the before/after toggle.

use pretty_assertions::assert_eq;
use stage_core::*;
use stage_editor::*;
use std::sync::Arc;

fn controller() -> InteractionController {
    let _ = env_logger::builder().is_test(true).try_init();
    let catalog = Catalog::from_json(include_str!("fixtures/catalog.json")).unwrap();
    let mut c = InteractionController::new(Arc::new(catalog), StagingConfig::default());
    c.open_photo("listing/42/living-room.jpg".into());
    c
}

fn item(id: &str) -> ItemId {
    ItemId::intern(id)
}

// ─── Add / select / remove ──────────────────────────────────────────────

#[test]
fn add_sofa_scenario() {
    let mut c = controller();
    let id = c
        .add_instance(item("sofa1"), Position::new(50.0, 50.0))
        .unwrap();

    assert_eq!(
        c.scene().unwrap().instances(),
        [PlacedInstance {
            instance_id: id,
            catalog_item_id: item("sofa1"),
            position: Position::new(50.0, 50.0),
            rotation_degrees: 0.0,
            scale: 1.0,
            z_order: 1,
        }]
    );
    assert_eq!(c.state(), StagingState::EditingSelected);
}

#[test]
fn removing_selected_instance_clears_selection() {
    let mut c = controller();
    let id = c.add_from_catalog(item("sofa1")).unwrap();
    c.deselect_all();
    assert_eq!(c.state(), StagingState::EditingUnselected);

    c.select(id).unwrap();
    assert_eq!(c.state(), StagingState::EditingSelected);

    assert!(c.remove_instance(id).is_some());
    assert_eq!(c.selected(), None);
    assert_eq!(c.state(), StagingState::EditingUnselected);

    // idempotent
    assert!(c.remove_instance(id).is_none());
    assert!(matches!(
        c.update_transform(id, TransformPatch::scale(2.0)),
        Err(StageError::InstanceNotFound(_))
    ));
}

#[test]
fn bad_catalog_id_leaves_scene_and_selection_alone() {
    let mut c = controller();
    let id = c.add_from_catalog(item("floor_lamp")).unwrap();
    let err = c.add_from_catalog(item("hot_tub")).unwrap_err();
    assert!(matches!(err, StageError::CatalogItemNotFound(_)));
    assert_eq!(c.scene().unwrap().len(), 1);
    assert_eq!(c.selected(), Some(id));
}

#[test]
fn selection_is_single() {
    let mut c = controller();
    let a = c.add_from_catalog(item("sofa1")).unwrap();
    let b = c.add_from_catalog(item("coffee_table")).unwrap();
    c.select(a).unwrap();
    assert_eq!(c.selected(), Some(a));
    c.select(b).unwrap();
    assert_eq!(c.selected(), Some(b));
}

#[test]
fn non_finite_drag_is_a_validation_error() {
    let mut c = controller();
    let id = c.add_from_catalog(item("sofa1")).unwrap();
    let err = c.drag_update(id, Position::new(f32::NAN, 10.0)).unwrap_err();
    assert!(matches!(err, StageError::Validation { .. }));
    assert_eq!(c.selected_instance().unwrap().position, Position::CENTER);
}

// ─── Comparison ─────────────────────────────────────────────────────────

#[test]
fn toggle_compare_twice_is_identity() {
    let mut c = controller();
    let a = c.add_instance(item("sofa1"), Position::new(30.0, 60.0)).unwrap();
    c.update_transform(a, TransformPatch::rotation(45.0).with_scale(1.4))
        .unwrap();
    c.add_instance(item("floor_lamp"), Position::new(80.0, 40.0))
        .unwrap();
    c.select(a).unwrap();

    let before = c.snapshot().unwrap();
    let state_before = c.state();

    assert_eq!(c.toggle_compare().unwrap(), ViewMode::Comparing);
    assert_eq!(c.state(), StagingState::Comparing);
    assert_eq!(c.selected(), Some(a), "selection kept while comparing");

    assert_eq!(c.toggle_compare().unwrap(), ViewMode::Editing);
    assert_eq!(c.state(), state_before);
    assert_eq!(c.snapshot().unwrap(), before);
}

#[test]
fn toggle_compare_twice_without_selection() {
    let mut c = controller();
    c.add_instance(item("coffee_table"), Position::new(45.0, 70.0))
        .unwrap();
    c.deselect_all();
    let before = c.snapshot().unwrap();
    assert_eq!(c.state(), StagingState::EditingUnselected);

    c.toggle_compare().unwrap();
    assert_eq!(c.state(), StagingState::Comparing);
    c.toggle_compare().unwrap();

    assert_eq!(c.state(), StagingState::EditingUnselected);
    assert_eq!(c.selected(), None);
    assert_eq!(c.view_mode(), ViewMode::Editing);
    assert_eq!(c.snapshot().unwrap(), before);
}

#[test]
fn compare_view_panes() {
    let mut c = controller();
    c.set_theme(Theme::Dark);
    c.add_from_catalog(item("queen_bed")).unwrap();
    c.add_from_catalog(item("nightstand")).unwrap();
    c.toggle_compare().unwrap();

    let view = c.compare_view().unwrap();
    assert_eq!(view.before.as_str(), "listing/42/living-room.jpg");
    assert_eq!(view.after.photo_ref, view.before);
    let items: Vec<_> = view
        .after
        .instances
        .iter()
        .map(|i| i.catalog_item_id.as_str())
        .collect();
    assert_eq!(items, ["queen_bed", "nightstand"]);
    assert_eq!(view.after.theme, Theme::Dark);
}

// ─── Tools and shortcuts together ───────────────────────────────────────

#[test]
fn click_drag_and_shortcuts() {
    let mut c = controller();
    let mut tool = PlacementTool::new();
    let sofa = c.add_from_catalog(item("sofa1")).unwrap();
    let rug = c.add_instance(item("area_rug"), Position::new(20.0, 80.0)).unwrap();

    // click empty canvas
    tool.dispatch(&mut c, &InputEvent::pointer_down(10.0, 10.0), None)
        .unwrap();
    assert_eq!(c.state(), StagingState::EditingUnselected);

    // grab the sofa exactly at its centre and drag it to (25%, 75%)
    tool.dispatch(&mut c, &InputEvent::pointer_down(400.0, 300.0), Some(sofa))
        .unwrap();
    for (x, y) in [(350.0, 350.0), (300.0, 400.0), (200.0, 450.0)] {
        tool.dispatch(&mut c, &InputEvent::pointer_move(x, y), None)
            .unwrap();
    }
    tool.dispatch(&mut c, &InputEvent::pointer_up(200.0, 450.0), None)
        .unwrap();
    assert_eq!(
        c.scene().unwrap().get(sofa).unwrap().position,
        Position::new(25.0, 75.0)
    );

    // the rug went in last; raise the sofa one step, lower it, then send it to the top
    let order = |c: &InteractionController| -> Vec<InstanceId> {
        c.scene().unwrap().instances().iter().map(|i| i.instance_id).collect()
    };
    let ctrl = Modifiers { ctrl: true, ..Modifiers::NONE };
    assert_eq!(order(&c), [sofa, rug]);
    assert!(c.handle_key("]", ctrl).unwrap());
    assert_eq!(order(&c), [rug, sofa]);
    assert!(c.handle_key("[", ctrl).unwrap());
    assert_eq!(order(&c), [sofa, rug]);
    assert!(c.handle_key("]", Modifiers { shift: true, ..ctrl }).unwrap());
    assert_eq!(order(&c), [rug, sofa]);

    // duplicate and scale the copy
    assert!(c.handle_key("d", Modifiers { meta: true, ..Modifiers::NONE }).unwrap());
    let copy = c.selected().unwrap();
    assert_ne!(copy, sofa);
    for _ in 0..30 {
        c.handle_key("=", Modifiers::NONE).unwrap();
    }
    assert_eq!(c.selected_instance().unwrap().scale, 5.0);
    assert_eq!(c.scene().unwrap().get(sofa).unwrap().scale, 1.0);

    assert!(c.handle_key("Escape", Modifiers::NONE).unwrap());
    assert_eq!(c.state(), StagingState::EditingUnselected);
}

#[test]
fn catalog_browser_feeds_controller() {
    let mut c = controller();
    let catalog = Arc::new(Catalog::from_json(include_str!("fixtures/catalog.json")).unwrap());
    let mut browser = CatalogBrowser::new(catalog, c.config().default_category);

    browser.set_query("chair");
    let picked = browser.visible_items()[1].id;
    assert_eq!(picked.as_str(), "dining_chair");

    let id = c.apply(StageAction::Add { item: picked, position: None }).unwrap().unwrap();
    assert_eq!(c.selected(), Some(id));

    browser.select_category(Category::Decor);
    assert_eq!(browser.visible_items().len(), 3);
}
