use sea_orm::prelude::Decimal;
use uuid::Uuid;

use recipe_service::domain::repository::{ImageStore, RecipeRepository};
use recipe_service::domain::types::{NewRecipe, RecipeFilter, RecipePatch};
use recipe_service::error::RecipeServiceError;
use recipe_service::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase,
    UpdateRecipeUseCase, UploadRecipeImageInput, UploadRecipeImageUseCase,
};

use crate::helpers::{MemoryDb, MockImageStore, sample_recipe};

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[tokio::test]
async fn should_list_only_own_recipes_newest_first() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let other = Uuid::now_v7();
    let create = CreateRecipeUseCase { repo: db.recipes() };
    let first = create.execute(me, sample_recipe("First")).await.unwrap();
    let second = create.execute(me, sample_recipe("Second")).await.unwrap();
    create.execute(other, sample_recipe("Theirs")).await.unwrap();

    let recipes = ListRecipesUseCase { repo: db.recipes() }
        .execute(me, RecipeFilter::default())
        .await
        .unwrap();

    let ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn should_create_recipe_with_nested_tags_reusing_existing() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let create = CreateRecipeUseCase { repo: db.recipes() };

    let a = create
        .execute(
            me,
            NewRecipe {
                tags: names(&["Thai", "Dinner", "Thai"]),
                ingredients: names(&["Prawns"]),
                ..sample_recipe("Curry")
            },
        )
        .await
        .unwrap();
    let b = create
        .execute(
            me,
            NewRecipe {
                tags: names(&["Dinner"]),
                ..sample_recipe("Pasta")
            },
        )
        .await
        .unwrap();

    assert_eq!(a.tags.len(), 2);
    assert_eq!(a.ingredients.len(), 1);
    let dinner_a = a.tags.iter().find(|t| t.name == "Dinner").unwrap();
    assert_eq!(b.tags[0].id, dinner_a.id, "existing tag should be reused");
}

#[tokio::test]
async fn should_reject_invalid_recipe_fields() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let create = CreateRecipeUseCase { repo: db.recipes() };

    let negative_time = create
        .execute(
            me,
            NewRecipe {
                time_minutes: -5,
                ..sample_recipe("Bad")
            },
        )
        .await;
    assert!(matches!(
        negative_time,
        Err(RecipeServiceError::InvalidTimeMinutes)
    ));

    let bad_price = create
        .execute(
            me,
            NewRecipe {
                price: Decimal::new(1234, 3),
                ..sample_recipe("Bad")
            },
        )
        .await;
    assert!(matches!(bad_price, Err(RecipeServiceError::InvalidPrice)));

    let blank_title = create.execute(me, sample_recipe("  ")).await;
    assert!(matches!(blank_title, Err(RecipeServiceError::InvalidName)));
}

#[tokio::test]
async fn should_filter_by_tags_and_ingredients_without_duplicates() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let create = CreateRecipeUseCase { repo: db.recipes() };

    let curry = create
        .execute(
            me,
            NewRecipe {
                tags: names(&["Vegan", "Spicy"]),
                ingredients: names(&["Tofu"]),
                ..sample_recipe("Curry")
            },
        )
        .await
        .unwrap();
    let salad = create
        .execute(
            me,
            NewRecipe {
                tags: names(&["Vegan"]),
                ingredients: names(&["Lettuce"]),
                ..sample_recipe("Salad")
            },
        )
        .await
        .unwrap();
    create.execute(me, sample_recipe("Steak")).await.unwrap();

    let vegan = curry.tags.iter().find(|t| t.name == "Vegan").unwrap().id;
    let spicy = curry.tags.iter().find(|t| t.name == "Spicy").unwrap().id;
    let list = ListRecipesUseCase { repo: db.recipes() };

    let by_tags = list
        .execute(
            me,
            RecipeFilter {
                tag_ids: vec![vegan, spicy],
                ingredient_ids: vec![],
            },
        )
        .await
        .unwrap();
    let ids: Vec<i32> = by_tags.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![salad.id, curry.id], "each match appears once");

    let tofu = curry.ingredients[0].id;
    let both = list
        .execute(
            me,
            RecipeFilter {
                tag_ids: vec![vegan],
                ingredient_ids: vec![tofu],
            },
        )
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].id, curry.id);
}

#[tokio::test]
async fn should_partially_update_recipe() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let original = CreateRecipeUseCase { repo: db.recipes() }
        .execute(
            me,
            NewRecipe {
                link: "https://example.com/recipe.pdf".to_owned(),
                tags: names(&["Breakfast"]),
                ..sample_recipe("Sample recipe title")
            },
        )
        .await
        .unwrap();

    let updated = UpdateRecipeUseCase { repo: db.recipes() }
        .execute(
            me,
            original.id,
            RecipePatch {
                title: Some("New recipe title".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "New recipe title");
    assert_eq!(updated.link, original.link);
    assert_eq!(updated.user_id, me);
    assert_eq!(updated.tags, original.tags, "absent tags leave links untouched");
}

#[tokio::test]
async fn should_replace_and_clear_tags_on_update() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let recipe = CreateRecipeUseCase { repo: db.recipes() }
        .execute(
            me,
            NewRecipe {
                tags: names(&["Breakfast"]),
                ..sample_recipe("Eggs")
            },
        )
        .await
        .unwrap();
    let update = UpdateRecipeUseCase { repo: db.recipes() };

    let replaced = update
        .execute(
            me,
            recipe.id,
            RecipePatch {
                tags: Some(names(&["Lunch"])),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.tags.len(), 1);
    assert_eq!(replaced.tags[0].name, "Lunch");

    let cleared = update
        .execute(
            me,
            recipe.id,
            RecipePatch {
                tags: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.tags.is_empty());
}

#[tokio::test]
async fn should_hide_other_users_recipe() {
    let db = MemoryDb::new();
    let owner = Uuid::now_v7();
    let intruder = Uuid::now_v7();
    let recipe = CreateRecipeUseCase { repo: db.recipes() }
        .execute(owner, sample_recipe("Private"))
        .await
        .unwrap();

    let get = GetRecipeUseCase { repo: db.recipes() }
        .execute(intruder, recipe.id)
        .await;
    assert!(matches!(get, Err(RecipeServiceError::RecipeNotFound)));

    let update = UpdateRecipeUseCase { repo: db.recipes() }
        .execute(
            intruder,
            recipe.id,
            RecipePatch {
                title: Some("Hijacked".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(RecipeServiceError::RecipeNotFound)));

    let delete = DeleteRecipeUseCase { repo: db.recipes() }
        .execute(intruder, recipe.id)
        .await;
    assert!(matches!(delete, Err(RecipeServiceError::RecipeNotFound)));

    let still_there = GetRecipeUseCase { repo: db.recipes() }
        .execute(owner, recipe.id)
        .await
        .unwrap();
    assert_eq!(still_there.title, "Private");
}

#[tokio::test]
async fn should_delete_recipe_once() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let recipe = CreateRecipeUseCase { repo: db.recipes() }
        .execute(me, sample_recipe("Gone"))
        .await
        .unwrap();
    let delete = DeleteRecipeUseCase { repo: db.recipes() };

    delete.execute(me, recipe.id).await.unwrap();
    let again = delete.execute(me, recipe.id).await;
    assert!(matches!(again, Err(RecipeServiceError::RecipeNotFound)));
}

#[tokio::test]
async fn should_store_uploaded_image_under_uuid_path() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let recipe = CreateRecipeUseCase { repo: db.recipes() }
        .execute(me, sample_recipe("Photo"))
        .await
        .unwrap();
    let store = MockImageStore::default();
    let saved = store.saved.clone();

    let path = UploadRecipeImageUseCase {
        repo: db.recipes(),
        store,
    }
    .execute(
        me,
        recipe.id,
        UploadRecipeImageInput {
            filename: "My Photo.JPG".to_owned(),
            data: vec![0xFF, 0xD8, 0xFF],
        },
    )
    .await
    .unwrap();

    let stem = path
        .strip_prefix("uploads/recipe/")
        .and_then(|rest| rest.strip_suffix(".JPG"))
        .unwrap();
    assert!(stem.parse::<Uuid>().is_ok(), "unexpected path {path}");
    assert_eq!(db.image_of(recipe.id), Some(path.clone()));
    assert_eq!(saved.lock().unwrap()[0].0, path);
}

#[tokio::test]
async fn should_reject_non_image_upload() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let recipe = CreateRecipeUseCase { repo: db.recipes() }
        .execute(me, sample_recipe("Photo"))
        .await
        .unwrap();
    let uc = UploadRecipeImageUseCase {
        repo: db.recipes(),
        store: MockImageStore::default(),
    };

    let not_image = uc
        .execute(
            me,
            recipe.id,
            UploadRecipeImageInput {
                filename: "notes.txt".to_owned(),
                data: b"hello".to_vec(),
            },
        )
        .await;
    assert!(matches!(not_image, Err(RecipeServiceError::InvalidImage)));

    let empty = uc
        .execute(
            me,
            recipe.id,
            UploadRecipeImageInput {
                filename: "photo.png".to_owned(),
                data: vec![],
            },
        )
        .await;
    assert!(matches!(empty, Err(RecipeServiceError::InvalidImage)));
    assert_eq!(db.image_of(recipe.id), None);
}

/// Deletes the recipe while its image is being written.
struct DeletingImageStore {
    inner: MockImageStore,
    db: MemoryDb,
    user_id: Uuid,
    recipe_id: i32,
}

impl ImageStore for DeletingImageStore {
    async fn save(&self, path: &str, data: &[u8]) -> Result<(), RecipeServiceError> {
        self.inner.save(path, data).await?;
        self.db.recipes().delete(self.user_id, self.recipe_id).await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), RecipeServiceError> {
        self.inner.remove(path).await
    }
}

#[tokio::test]
async fn should_remove_image_when_recipe_deleted_during_upload() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let recipe = CreateRecipeUseCase { repo: db.recipes() }
        .execute(me, sample_recipe("Vanishing"))
        .await
        .unwrap();
    let inner = MockImageStore::default();
    let saved = inner.saved.clone();
    let removed = inner.removed.clone();

    let result = UploadRecipeImageUseCase {
        repo: db.recipes(),
        store: DeletingImageStore {
            inner,
            db: db.clone(),
            user_id: me,
            recipe_id: recipe.id,
        },
    }
    .execute(
        me,
        recipe.id,
        UploadRecipeImageInput {
            filename: "photo.png".to_owned(),
            data: vec![0x89, 0x50],
        },
    )
    .await;

    assert!(matches!(result, Err(RecipeServiceError::RecipeNotFound)));
    let saved_path = saved.lock().unwrap()[0].0.clone();
    assert_eq!(*removed.lock().unwrap(), vec![saved_path]);
}
