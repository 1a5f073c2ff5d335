//! Category business logic - lookup, listing and creation of categories.
//!
//! Categories form a tree through `parent_id`. Product listings by category only look one
//! level down: a category's own products plus those of its direct children.

use crate::{
    core::slug::slugify,
    entities::{Category, category},
    errors::{Error, Result},
    identity::Identity,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Retrieves all active categories, ordered alphabetically by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::IsActive.eq(true))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active category by slug, returning None if it does not exist or is inactive.
pub async fn get_category_by_slug<C>(db: &C, slug: &str) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::Slug.eq(slug))
        .filter(category::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an active category by its unique ID.
pub async fn get_category_by_id<C>(db: &C, category_id: i64) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .filter(category::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active direct children of a category. Grandchildren are not included.
pub async fn get_subcategories<C>(db: &C, parent_id: i64) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::ParentId.eq(parent_id))
        .filter(category::Column::IsActive.eq(true))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Resolves a category slug to the ids of the category and its direct children.
///
/// # Errors
/// Returns [`Error::CategoryNotFound`] if no active category has this slug.
pub async fn category_and_children_ids<C>(db: &C, slug: &str) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    let category = get_category_by_slug(db, slug)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            slug: slug.to_string(),
        })?;

    let mut ids = vec![category.id];
    ids.extend(
        get_subcategories(db, category.id)
            .await?
            .into_iter()
            .map(|child| child.id),
    );
    Ok(ids)
}

/// Creates a new category, optionally nested under the category with `parent_slug`.
///
/// # Errors
/// Returns an error if:
/// - The actor is not an admin
/// - The name is empty or produces an empty slug
/// - The parent slug does not resolve to an active category
/// - Another category already uses the derived slug
#[instrument(skip(db, actor), fields(actor = actor.id))]
pub async fn create_category(
    db: &DatabaseConnection,
    name: String,
    parent_slug: Option<&str>,
    actor: &Identity,
) -> Result<category::Model> {
    if !actor.is_admin() {
        return Err(Error::Unauthorized);
    }

    let name = name.trim().to_string();
    let slug = slugify(&name);
    if slug.is_empty() {
        return Err(Error::Validation {
            message: "Category name must contain letters or digits".to_string(),
        });
    }

    let parent_id = match parent_slug {
        Some(parent_slug) => Some(
            get_category_by_slug(db, parent_slug)
                .await?
                .ok_or_else(|| Error::CategoryNotFound {
                    slug: parent_slug.to_string(),
                })?
                .id,
        ),
        None => None,
    };

    let taken = Category::find()
        .filter(category::Column::Slug.eq(slug.as_str()))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(Error::Conflict { slug });
    }

    let category = category::ActiveModel {
        name: Set(name),
        slug: Set(slug.clone()),
        parent_id: Set(parent_id),
        is_active: Set(true),
        ..Default::default()
    };

    let created = category
        .insert(db)
        .await
        .map_err(|e| Error::from_write(e, &slug))?;
    info!(category_id = created.id, slug = %created.slug, "Category created");
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_category_requires_admin() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_category(&db, "Books".to_string(), None, &supplier(5)).await;
        assert!(matches!(result, Err(Error::Unauthorized)));

        let result = create_category(&db, "Books".to_string(), None, &customer(6)).await;
        assert!(matches!(result, Err(Error::Unauthorized)));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_category(&db, "   ".to_string(), None, &admin()).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        let result = create_category(&db, "!!!".to_string(), None, &admin()).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_with_parent() -> Result<()> {
        let db = setup_test_db().await?;

        let parent = create_category(&db, "Electronics".to_string(), None, &admin()).await?;
        let child =
            create_category(&db, "Phones".to_string(), Some("electronics"), &admin()).await?;

        assert_eq!(parent.slug, "electronics");
        assert_eq!(parent.parent_id, None);
        assert_eq!(child.parent_id, Some(parent.id));
        assert!(child.is_active);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_unknown_parent() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_category(&db, "Phones".to_string(), Some("nope"), &admin()).await;
        assert!(matches!(result, Err(Error::CategoryNotFound { slug }) if slug == "nope"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_category_slug_conflict() -> Result<()> {
        let db = setup_test_db().await?;

        create_category(&db, "Home & Garden".to_string(), None, &admin()).await?;
        let result = create_category(&db, "home garden".to_string(), None, &admin()).await;
        assert!(matches!(result, Err(Error::Conflict { slug }) if slug == "home-garden"));

        Ok(())
    }

    #[tokio::test]
    async fn test_category_and_children_ids_one_level() -> Result<()> {
        let db = setup_test_db().await?;

        let root = create_test_category(&db, "Root", None).await?;
        let child = create_test_category(&db, "Child", Some("root")).await?;
        let grandchild = create_test_category(&db, "Grandchild", Some("child")).await?;

        let ids = category_and_children_ids(&db, "root").await?;
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&root.id));
        assert!(ids.contains(&child.id));
        assert!(!ids.contains(&grandchild.id));

        let result = category_and_children_ids(&db, "missing").await;
        assert!(matches!(result, Err(Error::CategoryNotFound { slug: _ })));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_categories_ordered() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_category(&db, "Toys", None).await?;
        create_test_category(&db, "Books", None).await?;

        let categories = list_categories(&db).await?;
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Toys"]);

        Ok(())
    }
}
