use crate::media::TempClipStore;

use std::fs;

use karaoke_studio_core::{ClipUrl, host::ClipStore, recorder::RecordingSession};

fn clip(chunks: &[&[u8]]) -> karaoke_studio_core::RecordedClip {
    let mut session = RecordingSession::new(0.0);
    for chunk in chunks {
        session.push_chunk(chunk.to_vec());
    }
    session.finish()
}

/// WHAT: Publishing writes the clip bytes and returns a file URI
/// WHY: The clip player loads recordings by URI
#[test]
fn given_clip_when_publishing_then_file_uri_with_clip_bytes() {
    // Given: A store and a two-chunk clip
    let mut store = TempClipStore::new().unwrap();
    let clip = clip(&[b"webm-", b"data"]);

    // When: Publishing
    let url = store.publish(&clip).unwrap();

    // Then: file:// URI backed by the concatenated bytes
    assert!(url.as_str().starts_with("file://"));
    assert!(url.as_str().ends_with(".webm"));
    let path = store.path_of(&url).unwrap();
    assert_eq!(fs::read(path).unwrap(), b"webm-data");
}

/// WHAT: Revoking deletes the backing file
/// WHY: Replaced recordings must not pile up on disk
#[test]
fn given_published_clip_when_revoking_then_file_removed() {
    // Given: A published clip
    let mut store = TempClipStore::new().unwrap();
    let url = store.publish(&clip(&[b"frame"])).unwrap();
    let path = store.path_of(&url).unwrap().clone();

    // When: Revoking
    store.revoke(&url);

    // Then: File gone and the store forgets it
    assert!(!path.exists());
    assert!(store.path_of(&url).is_none());
}

/// WHAT: Revoking an unknown URL is a no-op
/// WHY: The recorder may revoke after a failed publish
#[test]
fn given_unknown_url_when_revoking_then_nothing_happens() {
    // Given: A store holding one clip
    let mut store = TempClipStore::new().unwrap();
    let url = store.publish(&clip(&[b"frame"])).unwrap();

    // When: Revoking something else
    store.revoke(&ClipUrl::new("file:///nowhere.webm"));

    // Then: The real clip is untouched
    assert!(store.path_of(&url).unwrap().exists());
}
