use super::*;

fn media(bytes: &[u8]) -> EncodedMedia {
    EncodedMedia {
        codec: CodecPair::Vp8Opus,
        chunks: vec![bytes[..1].to_vec(), bytes[1..].to_vec()],
    }
}

#[test]
fn handles_count_live_and_release_on_drop() {
    let store = ArtifactStore::new();
    let a = store.create(media(b"abc"), "a-short.webm");
    let b = store.create(media(b"def"), "b-short.webm");
    assert_eq!(a.id(), "artifact:1");
    assert_eq!(b.id(), "artifact:2");
    assert_eq!(store.live_count(), 2);
    drop(a);
    assert_eq!(store.live_count(), 1);
    drop(b);
    assert_eq!(store.live_count(), 0);
}

#[test]
fn chunks_are_assembled_in_order() {
    let store = ArtifactStore::new();
    let h = store.create(media(b"webm"), "x-short.webm");
    assert_eq!(h.bytes(), b"webm");
    assert_eq!(h.mime(), "video/webm;codecs=vp8,opus");
    let result = RenderResult {
        artifact: h,
        duration_secs: 1.0,
    };
    assert_eq!(result.format_label(), "WebM (VP8 + Opus)");
}

#[test]
fn save_writes_under_suggested_name() {
    let store = ArtifactStore::new();
    let h = store.create(media(b"bytes"), "my-title-short.webm");
    let dir = std::env::temp_dir().join(format!("reelsmith_save_{}", std::process::id()));
    let path = h.save(&dir).unwrap();
    assert_eq!(path, dir.join("my-title-short.webm"));
    assert_eq!(std::fs::read(&path).unwrap(), b"bytes");
    let _ = std::fs::remove_dir_all(&dir);
}
