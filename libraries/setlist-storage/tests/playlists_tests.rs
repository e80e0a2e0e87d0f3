//! Integration tests for playlists vertical slice
//!
//! Tests playlist operations including:
//! - Create and lookup by id and name
//! - Locking
//! - Entry cleanup when a playlist is deleted

mod test_helpers;

use setlist_core::{CreatePlaylist, PlaylistId, SetlistError, AUTO_QUEUE_PLAYLIST_NAME};
use setlist_storage::playlists;
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let playlist = playlists::create(pool, CreatePlaylist::named("Friday"))
        .await
        .expect("Failed to create playlist");

    assert_eq!(playlist.name, "Friday");
    assert!(!playlist.locked);

    let retrieved = playlists::get_by_id(pool, playlist.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(retrieved, playlist);

    assert_eq!(
        playlists::find_id_by_name(pool, "Friday").await.unwrap(),
        Some(playlist.id)
    );
    assert_eq!(playlists::find_id_by_name(pool, "friday").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_all_sorted_by_name() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Zeta", false).await;
    create_test_playlist(pool, "Alpha", true).await;
    create_test_playlist(pool, "Mid", false).await;

    let names: Vec<String> = playlists::get_all(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();

    assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    playlists::create(pool, CreatePlaylist::named("Dup")).await.unwrap();
    let result = playlists::create(pool, CreatePlaylist::named("Dup")).await;

    assert!(matches!(result, Err(SetlistError::Database(_))));
}

#[tokio::test]
async fn test_lock_and_unlock() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let id = create_test_playlist(pool, "Lockable", false).await;

    assert!(!playlists::is_locked(pool, id).await.unwrap());
    playlists::set_locked(pool, id, true).await.unwrap();
    assert!(playlists::is_locked(pool, id).await.unwrap());
    playlists::set_locked(pool, id, false).await.unwrap();
    assert!(!playlists::is_locked(pool, id).await.unwrap());
}

#[tokio::test]
async fn test_lock_missing_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let missing = PlaylistId::new(77);

    assert!(matches!(
        playlists::set_locked(pool, missing, true).await,
        Err(SetlistError::PlaylistNotFound(_))
    ));
    assert!(matches!(
        playlists::is_locked(pool, missing).await,
        Err(SetlistError::PlaylistNotFound(_))
    ));
}

#[tokio::test]
async fn test_auto_queue_is_found_by_name() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let regular = create_test_playlist(pool, "Regular", false).await;

    assert!(!playlists::is_auto_queue(pool, regular).await.unwrap());

    let auto_queue = create_test_playlist(pool, AUTO_QUEUE_PLAYLIST_NAME, false).await;
    assert!(playlists::is_auto_queue(pool, auto_queue).await.unwrap());
    assert!(!playlists::is_auto_queue(pool, regular).await.unwrap());
}

#[tokio::test]
async fn test_deleting_playlist_cascades_to_entries() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let (playlist_id, _) = create_filled_playlist(pool, "Doomed", 3).await;

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .execute(pool)
        .await
        .unwrap();

    assert!(positions(pool, playlist_id).await.is_empty());
}
