use super::GalleryHarness;
use anyhow::Result;
use mediabase::GalleryError;

#[test]
fn https_is_required() {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();

    let err = gallery
        .add_link("http://example.com", None, None)
        .unwrap_err();
    assert!(matches!(err, GalleryError::InvalidUrl(_)));

    let err = gallery.add_link("not a url", None, None).unwrap_err();
    assert!(matches!(err, GalleryError::InvalidUrl(_)));

    assert!(gallery.add_link("https://example.com/a", None, None).is_ok());
}

#[test]
fn duplicate_urls_are_rejected() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();

    gallery.add_link("https://example.com/a", None, None)?;
    let err = gallery
        .add_link("https://example.com/a", Some("again"), None)
        .unwrap_err();
    assert!(matches!(err, GalleryError::DuplicateUrl(_)));
    assert_eq!(gallery.links().list()?.len(), 1);
    Ok(())
}

#[test]
fn record_fields_are_filled_in() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();

    let link = gallery.add_link("https://blog.example.net/post/1", None, None)?;
    assert_eq!(link.id.len(), 16);
    assert!(link.id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(link.name, "blog.example.net");
    assert_eq!(link.domain, "blog.example.net");
    assert!(link.category.is_none());

    let named = gallery.add_link("https://example.org/x", Some("Reading list"), None)?;
    assert_eq!(named.name, "Reading list");
    Ok(())
}

#[test]
fn category_resolves_by_name_or_path() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();
    gallery.create_category("Road Trips", Some("trips"))?;

    let by_name = gallery.add_link("https://example.com/1", None, Some("Road Trips"))?;
    assert_eq!(by_name.category.as_deref(), Some("Road_Trips"));
    assert_eq!(by_name.category_path.as_deref(), Some("trips"));

    let by_path = gallery.add_link("https://example.com/2", None, Some("trips"))?;
    assert_eq!(by_path.category.as_deref(), Some("Road_Trips"));

    let err = gallery
        .add_link("https://example.com/3", None, Some("nope"))
        .unwrap_err();
    assert!(matches!(err, GalleryError::UnknownCategory(_)));
    Ok(())
}

#[test]
fn delete_by_id() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();

    let link = gallery.add_link("https://example.com/gone", None, None)?;
    let removed = gallery.delete_link(&link.id)?;
    assert_eq!(removed.url, "https://example.com/gone");
    assert!(gallery.links().list()?.is_empty());

    let err = gallery.delete_link(&link.id).unwrap_err();
    assert!(matches!(err, GalleryError::NotFound(_)));
    Ok(())
}
