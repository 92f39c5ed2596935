use uuid::Uuid;

use recipe_service::domain::types::{AttrKind, NewRecipe};
use recipe_service::error::RecipeServiceError;
use recipe_service::usecase::recipe::CreateRecipeUseCase;
use recipe_service::usecase::recipe_attr::{
    DeleteRecipeAttrUseCase, GetRecipeAttrUseCase, ListRecipeAttrsUseCase,
    UpdateRecipeAttrUseCase,
};

use crate::helpers::{MemoryDb, sample_recipe};

#[tokio::test]
async fn should_list_own_tags_by_name_descending() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let other = Uuid::now_v7();
    db.insert_attr(AttrKind::Tag, me, "Vegan");
    db.insert_attr(AttrKind::Tag, me, "Dessert");
    db.insert_attr(AttrKind::Tag, other, "Fruity");

    let tags = ListRecipeAttrsUseCase { repo: db.tags() }
        .execute(me, false)
        .await
        .unwrap();

    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Vegan", "Dessert"]);
    assert!(tags.iter().all(|t| t.user_id == me));
}

#[tokio::test]
async fn should_rename_tag_and_show_it_on_retrieve() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let tag = db.insert_attr(AttrKind::Tag, me, "After Dinner");

    let updated = UpdateRecipeAttrUseCase { repo: db.tags() }
        .execute(me, tag.id, Some("Dessert".to_owned()))
        .await
        .unwrap();
    assert_eq!(updated.name, "Dessert");
    assert_eq!(updated.id, tag.id);

    let fetched = GetRecipeAttrUseCase { repo: db.tags() }
        .execute(me, tag.id)
        .await
        .unwrap();
    assert_eq!(fetched.name, "Dessert");
    assert_eq!(fetched.user_id, me);
}

#[tokio::test]
async fn should_reject_blank_tag_name() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let tag = db.insert_attr(AttrKind::Tag, me, "Lunch");

    let result = UpdateRecipeAttrUseCase { repo: db.tags() }
        .execute(me, tag.id, Some("   ".to_owned()))
        .await;
    assert!(matches!(result, Err(RecipeServiceError::InvalidName)));
}

#[tokio::test]
async fn should_treat_empty_patch_as_noop() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let tag = db.insert_attr(AttrKind::Tag, me, "Lunch");

    let same = UpdateRecipeAttrUseCase { repo: db.tags() }
        .execute(me, tag.id, None)
        .await
        .unwrap();
    assert_eq!(same, tag);
}

#[tokio::test]
async fn should_delete_tag_and_report_missing_after() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let tag = db.insert_attr(AttrKind::Tag, me, "Breakfast");
    let delete = DeleteRecipeAttrUseCase { repo: db.tags() };

    delete.execute(me, tag.id).await.unwrap();

    let tags = ListRecipeAttrsUseCase { repo: db.tags() }
        .execute(me, false)
        .await
        .unwrap();
    assert!(tags.is_empty());
    let again = delete.execute(me, tag.id).await;
    assert!(matches!(again, Err(RecipeServiceError::TagNotFound)));
}

#[tokio::test]
async fn should_not_touch_other_users_tag() {
    let db = MemoryDb::new();
    let owner = Uuid::now_v7();
    let intruder = Uuid::now_v7();
    let tag = db.insert_attr(AttrKind::Tag, owner, "Secret");

    let get = GetRecipeAttrUseCase { repo: db.tags() }
        .execute(intruder, tag.id)
        .await;
    assert!(matches!(get, Err(RecipeServiceError::TagNotFound)));

    let rename = UpdateRecipeAttrUseCase { repo: db.tags() }
        .execute(intruder, tag.id, Some("Mine".to_owned()))
        .await;
    assert!(matches!(rename, Err(RecipeServiceError::TagNotFound)));

    let delete = DeleteRecipeAttrUseCase { repo: db.tags() }
        .execute(intruder, tag.id)
        .await;
    assert!(matches!(delete, Err(RecipeServiceError::TagNotFound)));
}

#[tokio::test]
async fn should_filter_assigned_tags() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let unassigned = db.insert_attr(AttrKind::Tag, me, "Lunch");
    let recipe = CreateRecipeUseCase { repo: db.recipes() }
        .execute(
            me,
            NewRecipe {
                tags: vec!["Breakfast".to_owned()],
                ..sample_recipe("Apple Crumble")
            },
        )
        .await
        .unwrap();

    let tags = ListRecipeAttrsUseCase { repo: db.tags() }
        .execute(me, true)
        .await
        .unwrap();

    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, recipe.tags[0].id);
    assert!(tags.iter().all(|t| t.id != unassigned.id));
}

#[tokio::test]
async fn should_return_unique_assigned_tags() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    db.insert_attr(AttrKind::Tag, me, "Dinner");
    let create = CreateRecipeUseCase { repo: db.recipes() };
    for title in ["Pancakes", "Porridge"] {
        create
            .execute(
                me,
                NewRecipe {
                    tags: vec!["Breakfast".to_owned()],
                    ..sample_recipe(title)
                },
            )
            .await
            .unwrap();
    }

    let tags = ListRecipeAttrsUseCase { repo: db.tags() }
        .execute(me, true)
        .await
        .unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "Breakfast");
}

#[tokio::test]
async fn should_ignore_other_users_recipes_for_assigned_only() {
    let db = MemoryDb::new();
    let me = Uuid::now_v7();
    let other = Uuid::now_v7();
    CreateRecipeUseCase { repo: db.recipes() }
        .execute(
            other,
            NewRecipe {
                tags: vec!["Shared name".to_owned()],
                ..sample_recipe("Theirs")
            },
        )
        .await
        .unwrap();
    db.insert_attr(AttrKind::Tag, me, "Shared name");

    let tags = ListRecipeAttrsUseCase { repo: db.tags() }
        .execute(me, true)
        .await
        .unwrap();
    assert!(tags.is_empty());
}
