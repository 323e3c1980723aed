//! Normalization of upstream shapes.
//!
//! Everything past the page boundary sees [`MediaItem`], never raw upstream
//! fields. `id` and `slug` carry the same upstream value; the detail path is
//! derived from the slug.

use moctale_core::types::{MediaDetails, MediaItem, MediaKind, Pagination, SearchResults};

use crate::upstream::{ContentDocument, SearchDocument};

pub fn media_item(doc: &ContentDocument) -> MediaItem {
    MediaItem {
        id: doc.slug.clone(),
        title: doc.name.clone(),
        year: doc.year,
        rating: doc.rating,
        rating_count: doc.rating_count,
        poster_url: doc.image.clone(),
        banner_url: doc.cover.clone(),
        summary: doc.description.clone(),
        kind: if doc.is_show.unwrap_or(false) {
            MediaKind::Series
        } else {
            MediaKind::Movie
        },
        slug: doc.slug.clone(),
        detail_path: MediaItem::detail_path_for(&doc.slug),
    }
}

pub fn search_results(doc: &SearchDocument) -> SearchResults {
    SearchResults {
        items: doc.data.iter().map(media_item).collect(),
        pagination: Pagination {
            total_pages: doc.total_pages,
            current_page: doc.current_page,
            next_page: doc.next_page,
            previous_page: doc.previous_page,
            count: doc.count,
        },
    }
}

pub fn details(doc: &ContentDocument) -> MediaDetails {
    MediaDetails {
        item: media_item(doc),
        genres: doc.genres.clone().unwrap_or_default(),
        duration_minutes: doc.duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> ContentDocument {
        ContentDocument {
            slug: "dune-2021".into(),
            name: "Dune".into(),
            year: Some(2021),
            is_show: Some(false),
            image: Some("x.jpg".into()),
            cover: None,
            rating: Some(8.1),
            rating_count: Some(812_000),
            description: Some("Spice.".into()),
            genres: Some(vec!["sci-fi".into()]),
            duration: Some(155),
        }
    }

    #[test]
    fn id_and_slug_share_the_upstream_slug() {
        let item = media_item(&dune());
        assert_eq!(item.id, "dune-2021");
        assert_eq!(item.slug, "dune-2021");
        assert_eq!(item.detail_path, "/content/dune-2021");
    }

    #[test]
    fn is_show_controls_the_kind() {
        let mut doc = dune();
        assert_eq!(media_item(&doc).kind, MediaKind::Movie);

        doc.is_show = Some(true);
        assert_eq!(media_item(&doc).kind, MediaKind::Series);

        doc.is_show = None;
        assert_eq!(media_item(&doc).kind, MediaKind::Movie);
    }

    #[test]
    fn missing_optionals_stay_absent() {
        let item = media_item(&ContentDocument::new("tenet-2020", "Tenet"));
        assert_eq!(item.year, None);
        assert_eq!(item.rating, None);
        assert_eq!(item.poster_url, None);
        assert_eq!(item.summary, None);
    }

    #[test]
    fn search_page_carries_pagination_through() {
        let page = SearchDocument {
            total_pages: 3,
            current_page: 1,
            next_page: Some(2),
            previous_page: None,
            count: Some(27),
            data: vec![dune()],
        };
        let results = search_results(&page);
        assert_eq!(results.items.len(), 1);
        assert_eq!(results.pagination.total_pages, 3);
        assert_eq!(results.pagination.current_page, 1);
        assert_eq!(results.pagination.next_page, Some(2));
    }

    #[test]
    fn details_include_extended_fields() {
        let details = details(&dune());
        assert_eq!(details.genres, vec!["sci-fi".to_string()]);
        assert_eq!(details.duration_minutes, Some(155));
        assert_eq!(details.item.title, "Dune");
    }
}
