use std::sync::Arc;

use tracing::debug;

use crate::{
    error::{AppError, ResultExt},
    models::{
        page::{Page, PageParams},
        tag::Tag,
    },
    store::TagStore,
};

/// Canonical identity for a tag name.
///
/// Lowercases, turns every run of characters outside `a-z0-9` into a single
/// hyphen and drops leading and trailing hyphens:
/// `"Rocky  Mountains!"` becomes `"rocky-mountains"`. Input with no ASCII
/// letters or digits yields an empty string.
pub fn to_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut gap = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(ch);
        } else {
            gap = true;
        }
    }
    slug
}

/// Trims `name` and derives its slug, rejecting input that leaves nothing
/// usable. Returns `(display_name, slug)`.
pub(crate) fn normalize_tag_name(name: &str) -> Result<(String, String), AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("tag name is required"));
    }
    let slug = to_slug(name);
    if slug.is_empty() {
        return Err(AppError::validation(
            "tag name contains no usable characters",
        ));
    }
    Ok((name.to_string(), slug))
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.trim().to_lowercase()
}

#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagStore>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagStore>) -> Self {
        Self { tags }
    }

    /// Creates the tag, or returns the one that already owns the same slug.
    /// The stored display name is whichever spelling arrived first.
    pub async fn upsert_by_name(&self, name: &str) -> Result<Tag, AppError> {
        let (name, slug) = normalize_tag_name(name)?;
        let tag = self
            .tags
            .upsert(&name, &slug)
            .await
            .context("tag_service.upsert_by_name")?;
        debug!(tag_id = %tag.id, slug = %tag.slug, "tag upserted");
        Ok(tag)
    }

    /// Tags whose slug starts with `prefix` (case-insensitive); an empty
    /// prefix lists everything.
    pub async fn list(&self, prefix: &str) -> Result<Vec<Tag>, AppError> {
        self.tags
            .list(&normalize_prefix(prefix))
            .await
            .context("tag_service.list")
    }

    pub async fn list_paged(&self, prefix: &str, params: PageParams) -> Result<Page<Tag>, AppError> {
        let (tags, total) = self
            .tags
            .list_paged(&normalize_prefix(prefix), params)
            .await
            .context("tag_service.list_paged")?;
        Ok(Page::new(tags, params, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::memory_pool, store::SqliteTagStore};

    #[test]
    fn slugs_are_lowercase_and_hyphenated() {
        assert_eq!(to_slug("WALMART"), "walmart");
        assert_eq!(to_slug("Walmart"), "walmart");
        assert_eq!(to_slug("Rocky Mountains"), "rocky-mountains");
        assert_eq!(to_slug("Rocky  Mountains!"), "rocky-mountains");
        assert_eq!(to_slug("  --Route 66--  "), "route-66");
        assert_eq!(to_slug("!!!"), "");
        assert_eq!(to_slug(""), "");
    }

    #[test]
    fn non_ascii_letters_act_as_separators() {
        assert_eq!(to_slug("Café Olé"), "caf-ol");
    }

    #[test]
    fn slugging_is_idempotent() {
        for name in ["Rocky  Mountains!", "WALMART", "a_b.c", "Route 66"] {
            let once = to_slug(name);
            assert_eq!(to_slug(&once), once);
        }
    }

    #[test]
    fn unusable_names_fail_validation() {
        assert!(normalize_tag_name("   ").unwrap_err().is_validation());
        let err = normalize_tag_name("!!!").unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation error: tag name contains no usable characters"
        );
    }

    async fn service() -> TagService {
        TagService::new(Arc::new(SqliteTagStore::new(memory_pool().await)))
    }

    #[tokio::test]
    async fn upsert_collapses_spellings_onto_the_first_name() {
        let tags = service().await;
        let first = tags.upsert_by_name("walmart").await.unwrap();
        let second = tags.upsert_by_name("  Walmart ").await.unwrap();
        let third = tags.upsert_by_name("WALMART!").await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(third.id, first.id);
        assert_eq!(third.name, "walmart");
        assert_eq!(third.slug, "walmart");
    }

    #[tokio::test]
    async fn upsert_stores_trimmed_display_name() {
        let tags = service().await;
        let tag = tags.upsert_by_name("  Rocky Mountains  ").await.unwrap();
        assert_eq!(tag.name, "Rocky Mountains");
        assert_eq!(tag.slug, "rocky-mountains");
    }

    #[tokio::test]
    async fn prefix_is_case_insensitive() {
        let tags = service().await;
        for name in ["Mountain Pass", "Beach", "mountain"] {
            tags.upsert_by_name(name).await.unwrap();
        }

        let slugs: Vec<_> = tags
            .list("  MOUNT ")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.slug)
            .collect();
        assert_eq!(slugs, ["mountain", "mountain-pass"]);
        assert_eq!(tags.list("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn paged_listing_reports_total() {
        let tags = service().await;
        for name in ["a", "b", "c"] {
            tags.upsert_by_name(name).await.unwrap();
        }

        let page = tags
            .list_paged("", PageParams::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].slug, "c");
        assert_eq!(page.pagination.total, 3);

        let empty = tags.list_paged("zzz", PageParams::default()).await.unwrap();
        assert!(empty.data.is_empty());
        assert_eq!(empty.pagination.total, 0);
    }
}
