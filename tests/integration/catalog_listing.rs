use super::GalleryHarness;
use anyhow::Result;
use mediabase::LINK_REF_PREFIX;

#[test]
fn files_links_and_labels_merge_into_one_listing() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();
    gallery.create_category("Road Trips", Some("trips"))?;

    harness.write_media("trips/beach.jpg", b"jpeg");
    harness.write_media("unsorted/pier.png", b"png");
    harness.write_media("cover.webp", b"webp");
    harness.write_media("trips/readme.txt", b"ignored extension");
    let link = gallery.add_link("https://example.com/album", None, Some("trips"))?;

    let items = gallery.list_media(None)?;
    assert_eq!(items.len(), 4);

    let beach = items.iter().find(|i| i.path == "trips/beach.jpg").unwrap();
    assert_eq!(beach.category.as_deref(), Some("Road_Trips"));
    assert_eq!(beach.category_path.as_deref(), Some("trips"));
    assert_eq!(beach.mime_type, "image/jpeg");
    assert_eq!(beach.url, "/media/trips/beach.jpg");
    assert_eq!(beach.size, 4);

    // Directories with no category record still label by folder name.
    let pier = items.iter().find(|i| i.path == "unsorted/pier.png").unwrap();
    assert_eq!(pier.category.as_deref(), Some("unsorted"));

    let cover = items.iter().find(|i| i.path == "cover.webp").unwrap();
    assert!(cover.category.is_none());
    assert!(cover.category_path.is_none());

    let merged = items
        .iter()
        .find(|i| i.path == format!("{LINK_REF_PREFIX}{}", link.id))
        .unwrap();
    assert_eq!(merged.size, 0);
    assert_eq!(merged.mime_type, "text/html");
    assert_eq!(merged.url, "https://example.com/album");
    assert_eq!(merged.category.as_deref(), Some("Road_Trips"));
    Ok(())
}

#[test]
fn category_filter_drops_everything_else() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();
    gallery.create_category("Road Trips", Some("trips"))?;

    harness.write_media("trips/beach.jpg", b"jpeg");
    harness.write_media("cover.webp", b"webp");
    gallery.add_link("https://example.com/album", None, Some("trips"))?;
    gallery.add_link("https://example.com/other", None, None)?;

    let filtered = gallery.list_media(Some("Road Trips"))?;
    assert_eq!(filtered.len(), 2);
    assert!(filtered
        .iter()
        .all(|i| i.category.as_deref() == Some("Road_Trips")));

    // Zero matches is an empty list, never an error.
    let none = gallery.list_media(Some("Nothing Here"))?;
    assert!(none.is_empty());
    Ok(())
}

#[test]
fn listing_is_newest_first() -> Result<()> {
    let harness = GalleryHarness::new();
    let gallery = harness.gallery();

    let older = gallery.add_link("https://example.com/older", None, None)?;
    let newer = gallery.add_link("https://example.com/newer", None, None)?;

    let items = gallery.list_media(None)?;
    let older_pos = items
        .iter()
        .position(|i| i.path == format!("{}{}", LINK_REF_PREFIX, older.id))
        .unwrap();
    let newer_pos = items
        .iter()
        .position(|i| i.path == format!("{}{}", LINK_REF_PREFIX, newer.id))
        .unwrap();
    assert!(newer_pos < older_pos);

    let mut sorted = items.clone();
    sorted.sort_by(|a, b| b.modified.cmp(&a.modified));
    assert_eq!(
        items.iter().map(|i| i.path.clone()).collect::<Vec<_>>(),
        sorted.iter().map(|i| i.path.clone()).collect::<Vec<_>>()
    );
    Ok(())
}
