mod common;

use powerprotect::config::{ApiConfig, Config, StorageConfig};
use powerprotect::domain::{ProjectDraft, ProjectId};
use powerprotect::services::CrudService;
use powerprotect::selection::{FileSelectionStore, MemorySelectionStore, SelectionContext};
use powerprotect::views::{CoordinationView, ProjectsView};
use powerprotect::AppContext;

#[test]
fn selection_survives_reload_through_shared_store() {
    let store = MemorySelectionStore::new();
    let first = SelectionContext::load(store.clone());
    first.set(Some(ProjectId::new("p1")));
    first.set(Some(ProjectId::new("p2")));

    let reloaded = SelectionContext::load(store);
    assert_eq!(reloaded.get(), Some(ProjectId::new("p2")));
}

#[test]
fn app_context_restores_selection_from_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("selection.json");
    let config = Config {
        api: ApiConfig::default(),
        storage: StorageConfig {
            selection_path: Some(path.clone()),
        },
    };

    let ctx = AppContext::from_config(&config).unwrap();
    assert_eq!(ctx.selection.get(), None);
    ctx.selection.set(Some(ProjectId::new("p9")));

    let restarted = AppContext::from_config(&config).unwrap();
    assert_eq!(restarted.selection.get(), Some(ProjectId::new("p9")));

    restarted.selection.clear();
    assert_eq!(SelectionContext::load(FileSelectionStore::new(&path)).get(), None);
}

#[tokio::test]
async fn views_share_one_selection() {
    let (_backend, _server, ctx) = common::context().await;
    let projects = ProjectsView::new(&ctx);
    let coordination = CoordinationView::new(&ctx);

    let mut changes = ctx.selection.subscribe();
    projects.select(Some(ProjectId::new("p1")));
    changes.changed().await.unwrap();
    assert_eq!(*changes.borrow(), Some(ProjectId::new("p1")));

    coordination.toggle(powerprotect::domain::EquipmentId::new("e1"));
    assert_eq!(coordination.analysis_request().unwrap().project_id, ProjectId::new("p1"));

    projects.select(None);
    assert!(coordination.analysis_request().is_err());
}

#[tokio::test]
async fn select_from_project_sets_and_clears() {
    let (_backend, _server, ctx) = common::context().await;
    let project = ctx
        .projects()
        .create(&ProjectDraft {
            name: "Substation A".to_string(),
            description: String::new(),
            voltage: 13.8,
            frequency: 60.0,
        })
        .await
        .unwrap();

    let mut changes = ctx.selection.subscribe();

    ctx.selection.select_from_project(Some(&project));
    changes.changed().await.unwrap();
    assert_eq!(*changes.borrow_and_update(), Some(project.id.clone()));
    assert_eq!(ctx.selection.get(), Some(project.id.clone()));

    ctx.selection.select_from_project(None);
    changes.changed().await.unwrap();
    assert_eq!(*changes.borrow_and_update(), None);
    assert_eq!(ctx.selection.get(), None);
}
