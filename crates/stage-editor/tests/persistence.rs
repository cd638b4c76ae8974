//! Integration tests: saving, loading and exporting through the async
//! collaborator boundary.

use pretty_assertions::assert_eq;
use stage_core::{Catalog, InstanceId, ItemId, Position, StagingConfig, TransformPatch};
use stage_editor::*;
use std::sync::Arc;
use std::time::Duration;

fn controller(photo: &str) -> InteractionController {
    let _ = env_logger::builder().is_test(true).try_init();
    let catalog = Catalog::from_json(include_str!("fixtures/catalog.json")).unwrap();
    let mut c = InteractionController::new(Arc::new(catalog), StagingConfig::default());
    c.open_photo(photo.into());
    c
}

fn staged(c: &mut InteractionController) -> InstanceId {
    let sofa = c
        .add_instance(ItemId::intern("sofa1"), Position::new(40.0, 65.0))
        .unwrap();
    c.update_transform(sofa, TransformPatch::rotation(-30.0).with_scale(1.25))
        .unwrap();
    c.add_instance(ItemId::intern("potted_plant"), Position::new(88.0, 70.0))
        .unwrap();
    sofa
}

#[tokio::test]
async fn empty_scene_round_trips() {
    let c = controller("photos/empty.jpg");
    let gateway = MemoryGateway::new();

    let id = save_scene(&gateway, &c).unwrap().await.unwrap();
    let loaded = gateway.load(&id).await.unwrap();

    assert_eq!(loaded.photo_ref.as_str(), "photos/empty.jpg");
    assert!(loaded.instances.is_empty());
}

#[tokio::test]
async fn save_load_restore() {
    let mut c = controller("photos/den.jpg");
    let sofa = staged(&mut c);
    let gateway = MemoryGateway::new();

    let id = save_scene(&gateway, &c).unwrap().await.unwrap();
    let saved = c.snapshot().unwrap();

    let mut other = controller("photos/elsewhere.jpg");
    other.restore(gateway.load(&id).await.unwrap()).unwrap();
    assert_eq!(other.snapshot().unwrap(), saved);
    assert_eq!(other.state(), StagingState::EditingUnselected);

    let inst = other.scene().unwrap().get(sofa).unwrap();
    assert_eq!(inst.rotation_degrees, 330.0);
    assert_eq!(inst.scale, 1.25);

    // new ids never collide with restored ones
    let added = other.add_from_catalog(ItemId::intern("area_rug")).unwrap();
    assert!(!saved.instances.iter().any(|i| i.instance_id == added));
}

#[tokio::test]
async fn in_flight_save_is_detached_from_later_edits() {
    let mut c = controller("photos/den.jpg");
    let sofa = staged(&mut c);
    let expected = c.snapshot().unwrap();
    let gateway = MemoryGateway::with_latency(Duration::from_millis(20));

    let pending = save_scene(&gateway, &c).unwrap();
    c.remove_instance(sofa);
    c.add_from_catalog(ItemId::intern("queen_bed")).unwrap();

    let id = pending.await.unwrap();
    assert_eq!(gateway.load(&id).await.unwrap(), expected);
    assert_eq!(c.scene().unwrap().len(), 2);
}

#[tokio::test]
async fn cancelled_save_leaves_scene_editable() {
    let mut c = controller("photos/den.jpg");
    let sofa = staged(&mut c);
    let before = c.snapshot().unwrap();
    let gateway = MemoryGateway::with_latency(Duration::from_secs(5));

    let pending = save_scene(&gateway, &c).unwrap();
    let timed_out = tokio::time::timeout(Duration::from_millis(10), pending).await;
    assert!(timed_out.is_err());
    assert_eq!(gateway.saved_count().await, 0);

    assert_eq!(c.snapshot().unwrap(), before);
    c.drag_update(sofa, Position::new(10.0, 10.0)).unwrap();
    assert_eq!(
        c.scene().unwrap().get(sofa).unwrap().position,
        Position::new(10.0, 10.0)
    );
}

#[tokio::test]
async fn unknown_scene_error_passes_through() {
    let gateway = MemoryGateway::new();
    let err = gateway
        .load(&SceneId("scene_404".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, MemoryGatewayError::UnknownScene(SceneId(ref id)) if id == "scene_404"));
}

#[test]
fn saving_without_a_photo_fails_up_front() {
    let catalog = Catalog::from_json(include_str!("fixtures/catalog.json")).unwrap();
    let c = InteractionController::new(Arc::new(catalog), StagingConfig::default());
    let gateway = MemoryGateway::new();
    assert!(matches!(
        save_scene(&gateway, &c),
        Err(stage_core::StageError::NoActiveScene)
    ));
}

#[tokio::test]
async fn export_records_render_request() {
    let mut c = controller("photos/den.jpg");
    c.set_theme(Theme::Dark);
    staged(&mut c);
    let exporter = RecordingExporter::new();

    let image = export_scene(&exporter, &c).unwrap().await.unwrap();
    assert_eq!(image.uri, "memory://exports/1");

    let requests = exporter.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0], c.render_request().unwrap());
    assert_eq!(requests[0].theme, Theme::Dark);
}

#[tokio::test]
async fn export_rejects_unstaged_photo() {
    let c = controller("photos/bare.jpg");
    let exporter = RecordingExporter::new();

    let err = export_scene(&exporter, &c).unwrap().await.unwrap_err();
    assert_eq!(err.to_string(), "export rejected: photos/bare.jpg has nothing staged");
    assert!(exporter.requests().await.is_empty());
}
