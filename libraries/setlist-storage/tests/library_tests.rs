//! Integration tests for the library slice and its track resolver

mod test_helpers;

use setlist_core::{CreateTrack, SetlistError, TrackId, TrackLocator, TrackResolver};
use setlist_storage::{library, LibraryResolver};
use test_helpers::*;

#[tokio::test]
async fn test_add_track_dedups_by_location() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let first = library::add_track(
        pool,
        CreateTrack {
            location: "/music/loop.wav".to_string(),
            title: "Loop".to_string(),
            artist: Some("Someone".to_string()),
            album: None,
        },
    )
    .await
    .unwrap();
    let second = library::add_track(
        pool,
        CreateTrack {
            location: "/music/loop.wav".to_string(),
            title: "Different Title".to_string(),
            artist: None,
            album: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.title, "Loop");
}

#[tokio::test]
async fn test_resolve_known_id() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let track_id = create_test_track(pool, "Known", None).await;
    let resolver = LibraryResolver::new(pool.clone());

    let resolved = resolver
        .resolve(&TrackLocator::Id(track_id), false)
        .await
        .unwrap();

    assert_eq!(resolved, track_id);
}

#[tokio::test]
async fn test_resolve_unknown_id_is_unresolvable() {
    let test_db = TestDb::new().await;
    let resolver = LibraryResolver::new(test_db.pool.clone());

    let result = resolver
        .resolve(&TrackLocator::Id(TrackId::new(999)), true)
        .await;

    assert!(matches!(result, Err(SetlistError::UnresolvableTrack(_))));
}

#[tokio::test]
async fn test_deleted_track_needs_undelete_permission() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let track_id = create_test_track(pool, "Removed", None).await;
    soft_delete(pool, track_id).await;
    let resolver = LibraryResolver::new(pool.clone());
    let locator = TrackLocator::Id(track_id);

    let refused = resolver.resolve(&locator, false).await;
    assert!(matches!(refused, Err(SetlistError::UnresolvableTrack(_))));
    assert!(library::get_by_id(pool, track_id).await.unwrap().unwrap().deleted);

    let allowed = resolver.resolve(&locator, true).await.unwrap();
    assert_eq!(allowed, track_id);
    assert!(!library::get_by_id(pool, track_id).await.unwrap().unwrap().deleted);
}

#[tokio::test]
async fn test_resolve_path_reuses_library_row() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let track_id = create_test_track(pool, "Indexed", None).await;
    let resolver = LibraryResolver::new(pool.clone());

    // The fixture's location does not exist on disk; the library row is enough
    let resolved = resolver
        .resolve(&TrackLocator::from("/music/Indexed.mp3"), true)
        .await
        .unwrap();

    assert_eq!(resolved, track_id);
}

#[tokio::test]
async fn test_resolve_path_adds_existing_file_once() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let path = test_db.dir().join("Night Drive.flac");
    std::fs::write(&path, b"flac").unwrap();
    let resolver = LibraryResolver::new(pool.clone());
    let locator = TrackLocator::Path(path.clone());

    let first = resolver.resolve(&locator, true).await.unwrap();
    let second = resolver.resolve(&locator, true).await.unwrap();

    assert_eq!(first, second);
    let track = library::find_by_location(pool, &path.to_string_lossy())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(track.title, "Night Drive");
}

#[tokio::test]
async fn test_resolve_missing_file_is_unresolvable() {
    let test_db = TestDb::new().await;
    let resolver = LibraryResolver::new(test_db.pool.clone());
    let path = test_db.dir().join("never-written.mp3");

    let result = resolver.resolve(&TrackLocator::Path(path), true).await;

    assert!(matches!(result, Err(SetlistError::UnresolvableTrack(_))));
}

#[tokio::test]
async fn test_resolve_many_keeps_input_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let a = create_test_track(pool, "One", None).await;
    let b = create_test_track(pool, "Two", None).await;
    let resolver = LibraryResolver::new(pool.clone());

    let results = resolver
        .resolve_many(
            &[
                TrackLocator::Id(b),
                TrackLocator::from("/not/here.mp3"),
                TrackLocator::Id(a),
            ],
            true,
        )
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(*results[0].as_ref().unwrap(), b);
    assert!(results[1].is_err());
    assert_eq!(*results[2].as_ref().unwrap(), a);
}

#[tokio::test]
async fn test_set_deleted_missing_track() {
    let test_db = TestDb::new().await;

    let result = library::set_deleted(&test_db.pool, TrackId::new(5), true).await;

    assert!(matches!(result, Err(SetlistError::TrackNotFound(_))));
}
