use super::GalleryHarness;
use anyhow::Result;
use mediabase::GalleryError;
use std::fs;

#[test]
fn traversal_and_nested_filenames_are_rejected() {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();
    let resolver = gallery.resolver();

    for bad in ["../secret", "a/b.jpg", "", ".."] {
        let err = resolver.resolve_upload_target(bad, None).unwrap_err();
        assert!(
            matches!(err, GalleryError::InvalidName(_)),
            "expected InvalidName for {bad:?}, got {err:?}"
        );
    }
}

#[test]
fn collisions_get_numbered_suffixes() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();
    let resolver = gallery.resolver();

    let first = resolver.resolve_upload_target("photo.jpg", None)?;
    assert!(first.ends_with("photo.jpg"));
    fs::write(&first, b"one")?;

    let second = resolver.resolve_upload_target("photo.jpg", None)?;
    assert!(second.ends_with("photo_1.jpg"));
    fs::write(&second, b"two")?;

    let third = resolver.resolve_upload_target("photo.jpg", None)?;
    assert!(third.ends_with("photo_2.jpg"));
    Ok(())
}

#[test]
fn target_dir_is_created_under_the_root() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();
    let resolver = gallery.resolver();

    let target = resolver.resolve_upload_target("clip.mp4", Some("videos"))?;
    assert!(target.parent().is_some_and(|p| p.is_dir()));
    assert!(target.starts_with(harness.media_dir().canonicalize()?));

    let err = resolver
        .resolve_upload_target("clip.mp4", Some("../outside"))
        .unwrap_err();
    assert!(matches!(err, GalleryError::PathTraversal(_)));
    Ok(())
}

#[test]
fn resolve_existing_orders_its_checks() {
    let harness = GalleryHarness::new();
    harness.write_media("trips/beach.jpg", b"jpeg");
    harness.write_media("notes.txt", b"text");
    let gallery = harness.gallery();
    let resolver = gallery.resolver();

    assert!(resolver.resolve_existing("trips/beach.jpg").is_ok());

    let err = resolver.resolve_existing("../escape").unwrap_err();
    assert!(matches!(err, GalleryError::PathTraversal(_)));

    // Missing paths report NotFound even though they carry no extension.
    let err = resolver.resolve_existing("does/not/exist").unwrap_err();
    assert!(matches!(err, GalleryError::NotFound(_)));

    let err = resolver.resolve_existing("notes.txt").unwrap_err();
    assert!(matches!(err, GalleryError::DisallowedType(_)));

    let err = resolver.resolve_existing("").unwrap_err();
    assert!(matches!(err, GalleryError::InvalidName(_)));
}

#[test]
fn symlink_escapes_are_caught_after_resolution() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();

    let outside = harness.root_path().join("outside");
    fs::create_dir_all(&outside)?;
    fs::write(outside.join("secret.jpg"), b"jpeg")?;
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&outside, harness.media_dir().join("alias"))?;
        let err = gallery
            .resolver()
            .resolve_existing("alias/secret.jpg")
            .unwrap_err();
        assert!(matches!(err, GalleryError::PathTraversal(_)));
    }
    Ok(())
}
