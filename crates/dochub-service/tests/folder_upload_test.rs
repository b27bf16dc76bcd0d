//! Integration tests for the folder upload pipeline.

mod helpers;

use dochub_core::events::UploadStage;
use dochub_database::FolderStore;
use uuid::Uuid;

use helpers::{TestApp, stages};

#[tokio::test]
async fn test_end_to_end_event_order() {
    let app = TestApp::new().await;

    let events = app
        .upload(&["folder1/a.txt", "folder1/sub/b.txt"], None)
        .await;

    assert_eq!(
        stages(&events),
        [
            "folder_structure",
            "document_creation",
            "document_creation",
            "document_creation",
            "folder_structure",
            "file_folder_relation",
            "upload_complete",
        ]
    );
    assert_eq!(events[0].message, "Determining root folder");
    assert_eq!(events[1].created_count, Some(0));
    assert_eq!(events[3].created_count, Some(2));
    assert_eq!(events[3].valid_files_count, Some(2));

    let last = events.last().unwrap();
    assert_eq!(last.total_files, Some(2));
    assert_eq!(last.total_folders, Some(2));

    let folder1 = app.folder_at(&["folder1"]).await.unwrap();
    let sub = app.folder_at(&["folder1", "sub"]).await.unwrap();
    assert_eq!(sub.parent_id, Some(folder1.id));

    let in_folder1 = app.documents_in(Some(folder1.id)).await;
    let in_sub = app.documents_in(Some(sub.id)).await;
    assert_eq!(in_folder1.len(), 1);
    assert_eq!(in_folder1[0].name, "a.txt");
    assert_eq!(in_sub.len(), 1);
    assert_eq!(in_sub[0].name, "b.txt");

    let stored = app.blobs.load(&in_sub[0].file_url).await.unwrap();
    assert_eq!(&stored[..], b"folder1/sub/b.txt");
}

#[tokio::test]
async fn test_shared_prefix_is_created_once() {
    let app = TestApp::new().await;

    app.upload(&["a/b/x.txt", "a/b/y.txt"], None).await;

    assert_eq!(app.children(None).await, ["a"]);
    let a = app.folder_at(&["a"]).await.unwrap();
    assert_eq!(app.children(Some(a.id)).await, ["b"]);
    assert_eq!(app.store.folder_count().await, 2);

    let b = app.folder_at(&["a", "b"]).await.unwrap();
    let names: Vec<String> = app
        .documents_in(Some(b.id))
        .await
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, ["x.txt", "y.txt"]);
}

#[tokio::test]
async fn test_colliding_root_folder_is_suffixed() {
    let app = TestApp::new().await;
    let existing = app.create_folder("docs", None).await;

    let events = app.upload(&["docs/readme.md"], None).await;
    assert_eq!(events.last().unwrap().stage, UploadStage::Complete);

    assert_eq!(app.children(None).await, ["docs", "docs (1)"]);
    assert!(app.documents_in(Some(existing.id)).await.is_empty());

    let renamed = app.folder_at(&["docs (1)"]).await.unwrap();
    assert_eq!(app.documents_in(Some(renamed.id)).await.len(), 1);
}

#[tokio::test]
async fn test_repeated_uploads_count_up_suffixes() {
    let app = TestApp::new().await;

    for _ in 0..3 {
        app.upload(&["x/file.txt"], None).await;
    }

    assert_eq!(app.children(None).await, ["x", "x (1)", "x (2)"]);
}

#[tokio::test]
async fn test_failed_file_does_not_abort_the_run() {
    let app = TestApp::failing_on("broken").await;

    let events = app
        .upload(&["d/one.txt", "d/broken.txt", "d/three.txt"], None)
        .await;

    let creation: Vec<_> = events
        .iter()
        .filter(|e| e.stage == UploadStage::DocumentCreation)
        .skip(1)
        .collect();
    assert_eq!(creation.len(), 3);
    assert_eq!(creation.iter().filter(|e| e.error.is_none()).count(), 2);

    let failed = creation.iter().find(|e| e.error.is_some()).unwrap();
    assert_eq!(failed.message, "Failed to create document: broken.txt");
    assert_eq!(failed.error.as_deref(), Some("Disk quota exceeded"));
    assert_eq!(failed.created_count, Some(1));
    assert_eq!(creation[2].created_count, Some(2));

    let last = events.last().unwrap();
    assert_eq!(last.stage, UploadStage::Complete);
    assert_eq!(last.total_files, Some(3));
    assert_eq!(last.total_folders, Some(1));

    let d = app.folder_at(&["d"]).await.unwrap();
    let names: Vec<String> = app
        .documents_in(Some(d.id))
        .await
        .into_iter()
        .map(|doc| doc.name)
        .collect();
    assert_eq!(names, ["one.txt", "three.txt"]);
    assert_eq!(app.store.document_count().await, 2);
}

#[tokio::test]
async fn test_missing_destination_stops_before_any_document() {
    let app = TestApp::new().await;

    let events = app.upload(&["a/x.txt"], Some(Uuid::new_v4())).await;

    assert_eq!(stages(&events), ["folder_structure", "error"]);
    assert_eq!(events[1].message, "Parent folder not found");
    assert_eq!(app.store.document_count().await, 0);
    assert_eq!(app.store.folder_count().await, 0);
}

#[tokio::test]
async fn test_upload_into_destination_folder() {
    let app = TestApp::new().await;
    let dest = app.create_folder("Dest", None).await;

    let events = app
        .upload(&["a/x.txt", "y.txt", "./a//z.txt"], Some(dest.id))
        .await;

    let last = events.last().unwrap();
    assert_eq!(last.stage, UploadStage::Complete);
    assert_eq!(last.total_files, Some(3));
    assert_eq!(last.total_folders, Some(1));

    assert_eq!(app.children(None).await, ["Dest"]);
    assert_eq!(app.children(Some(dest.id)).await, ["a"]);

    let a = app.folder_at(&["Dest", "a"]).await.unwrap();
    assert_eq!(app.documents_in(Some(a.id)).await.len(), 2);
    let top: Vec<String> = app
        .documents_in(Some(dest.id))
        .await
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(top, ["y.txt"]);
}

#[tokio::test]
async fn test_bad_path_is_isolated_from_others() {
    let app = TestApp::new().await;

    let events = app.upload(&["../evil.txt", "ok/a.txt"], None).await;

    let failures: Vec<_> = events
        .iter()
        .filter(|e| e.stage == UploadStage::FolderStructure && e.error.is_some())
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(
        failures[0].message,
        "Failed to create folder structure for: ../evil.txt"
    );
    assert_eq!(events.last().unwrap().stage, UploadStage::Complete);

    let ok = app.folder_at(&["ok"]).await.unwrap();
    assert_eq!(app.documents_in(Some(ok.id)).await.len(), 1);

    let unfiled = app.documents_in(None).await;
    assert_eq!(unfiled.len(), 1);
    assert_eq!(unfiled[0].name, "evil.txt");
}

#[tokio::test]
async fn test_same_path_twice_files_both_documents() {
    let app = TestApp::new().await;

    let events = app.upload(&["d/same.txt", "d/same.txt"], None).await;
    assert_eq!(events.last().unwrap().total_folders, Some(1));

    let d = app.folder_at(&["d"]).await.unwrap();
    assert_eq!(app.documents_in(Some(d.id)).await.len(), 2);
}

#[tokio::test]
async fn test_extensionless_leaf_is_treated_as_folder() {
    let app = TestApp::new().await;

    let events = app.upload(&["proj/Makefile"], None).await;
    assert_eq!(events.last().unwrap().total_folders, Some(2));

    let proj = app.folder_at(&["proj"]).await.unwrap();
    assert_eq!(app.children(Some(proj.id)).await, ["Makefile"]);
    assert_eq!(app.documents_in(None).await.len(), 1);
}

#[tokio::test]
async fn test_concurrent_uploads_never_duplicate_siblings() {
    let app = TestApp::new().await;

    let (first, second) = tokio::join!(
        app.upload(&["shared/a.txt"], None),
        app.upload(&["shared/b.txt"], None)
    );
    assert_eq!(first.last().unwrap().stage, UploadStage::Complete);
    assert_eq!(second.last().unwrap().stage, UploadStage::Complete);

    assert_eq!(app.children(None).await, ["shared", "shared (1)"]);
    for name in ["shared", "shared (1)"] {
        let folder = app.folder_at(&[name]).await.unwrap();
        assert_eq!(app.documents_in(Some(folder.id)).await.len(), 1);
    }
    assert!(app.store.find_by_name(None, "shared (2)").await.unwrap().is_none());
}

#[tokio::test]
async fn test_sibling_taken_by_another_process_is_retried_with_suffix() {
    let app = TestApp::racing_folders(1).await;

    let events = app.upload(&["x/a.txt"], None).await;

    assert!(events.iter().all(|e| e.error.is_none()));
    let last = events.last().unwrap();
    assert_eq!(last.stage, UploadStage::Complete);
    assert_eq!(last.total_folders, Some(1));

    assert_eq!(app.children(None).await, ["x", "x (1)"]);
    let taken = app.folder_at(&["x"]).await.unwrap();
    assert!(app.documents_in(Some(taken.id)).await.is_empty());
    let ours = app.folder_at(&["x (1)"]).await.unwrap();
    let filed: Vec<String> = app
        .documents_in(Some(ours.id))
        .await
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(filed, ["a.txt"]);
}

#[tokio::test]
async fn test_exhausted_conflict_retries_fail_only_that_path() {
    // One initial attempt plus three retries, all lost.
    let app = TestApp::racing_folders(4).await;

    let events = app.upload(&["x/a.txt"], None).await;

    let failures: Vec<_> = events
        .iter()
        .filter(|e| e.stage == UploadStage::FolderStructure && e.error.is_some())
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].message, "Failed to create folder structure for: x/a.txt");
    assert!(failures[0].error.as_deref().unwrap().contains("already exists"));

    let last = events.last().unwrap();
    assert_eq!(last.stage, UploadStage::Complete);
    assert_eq!(last.total_folders, Some(0));

    let unfiled = app.documents_in(None).await;
    assert_eq!(unfiled.len(), 1);
    assert_eq!(unfiled[0].name, "a.txt");
}

#[tokio::test]
async fn test_failed_assignment_batch_ends_stream_with_error() {
    let app = TestApp::failing_assignments("Connection reset during folder assignment").await;

    let events = app.upload(&["x/a.txt", "x/y/b.txt"], None).await;

    assert_eq!(
        stages(&events),
        [
            "folder_structure",
            "document_creation",
            "document_creation",
            "document_creation",
            "folder_structure",
            "file_folder_relation",
            "error",
        ]
    );
    let last = events.last().unwrap();
    assert_eq!(last.message, "Connection reset during folder assignment");
    assert!(events.iter().all(|e| e.stage != UploadStage::Complete));

    // Earlier writes are not rolled back.
    let x = app.folder_at(&["x"]).await.unwrap();
    assert_eq!(app.children(Some(x.id)).await, ["y"]);
    assert_eq!(app.documents_in(None).await.len(), 2);
}
