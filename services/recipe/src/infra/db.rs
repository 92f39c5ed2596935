use std::collections::HashMap;

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel as _, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
    sea_query::{Expr, Query},
};
use uuid::Uuid;

use recipe_schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags, users};

use crate::domain::repository::{RecipeAttrRepository, RecipeRepository, UserRepository};
use crate::domain::types::{
    AttrKind, NewRecipe, Recipe, RecipeAttr, RecipeFilter, RecipePatch, User, UserPatch,
};
use crate::error::RecipeServiceError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RecipeServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RecipeServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), RecipeServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            password: Set(user.password_hash.clone()),
            is_active: Set(user.is_active),
            is_staff: Set(user.is_staff),
            is_superuser: Set(user.is_superuser),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            // Lost a race with a concurrent signup for the same email.
            Err(e) if is_unique_violation(&e) => Err(RecipeServiceError::UserAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &UserPatch,
    ) -> Result<Option<User>, RecipeServiceError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for update")?
        else {
            return Ok(None);
        };

        let mut am = model.into_active_model();
        if let Some(ref email) = patch.email {
            am.email = Set(email.clone());
        }
        if let Some(ref name) = patch.name {
            am.name = Set(name.clone());
        }
        if let Some(ref hash) = patch.password_hash {
            am.password = Set(hash.clone());
        }
        match am.update(&self.db).await {
            Ok(model) => Ok(Some(user_from_model(model))),
            Err(e) if is_unique_violation(&e) => Err(RecipeServiceError::UserAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("update user").into()),
        }
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        password_hash: model.password,
        is_active: model.is_active,
        is_staff: model.is_staff,
        is_superuser: model.is_superuser,
        created_at: model.created_at,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl RecipeRepository for DbRecipeRepository {
    async fn list(
        &self,
        user_id: Uuid,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeServiceError> {
        let mut query = recipes::Entity::find().filter(recipes::Column::UserId.eq(user_id));
        // Subqueries instead of joins so a recipe matching several ids appears once.
        if !filter.tag_ids.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(recipe_tags::Column::RecipeId)
                        .from(recipe_tags::Entity)
                        .and_where(recipe_tags::Column::TagId.is_in(filter.tag_ids.clone()))
                        .to_owned(),
                ),
            );
        }
        if !filter.ingredient_ids.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(recipe_ingredients::Column::RecipeId)
                        .from(recipe_ingredients::Entity)
                        .and_where(
                            recipe_ingredients::Column::IngredientId
                                .is_in(filter.ingredient_ids.clone()),
                        )
                        .to_owned(),
                ),
            );
        }
        let models = query
            .order_by_desc(recipes::Column::Id)
            .all(&self.db)
            .await
            .context("list recipes")?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut links = load_links(&self.db, &ids).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let (tags, ingredients) = links.take(m.id);
                recipe_from_model(m, tags, ingredients)
            })
            .collect())
    }

    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<Recipe>, RecipeServiceError> {
        let Some(model) = find_owned_recipe(&self.db, user_id, id)
            .await
            .context("get recipe")?
        else {
            return Ok(None);
        };
        let (tags, ingredients) = load_links(&self.db, &[id]).await?.take(id);
        Ok(Some(recipe_from_model(model, tags, ingredients)))
    }

    async fn create(
        &self,
        user_id: Uuid,
        recipe: &NewRecipe,
    ) -> Result<Recipe, RecipeServiceError> {
        let txn = self.db.begin().await.context("begin create recipe")?;

        let model = recipes::ActiveModel {
            user_id: Set(user_id),
            title: Set(recipe.title.clone()),
            description: Set(recipe.description.clone()),
            time_minutes: Set(recipe.time_minutes),
            price: Set(recipe.price),
            link: Set(recipe.link.clone()),
            image: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("insert recipe")?;

        let tag_models = resolve_tags(&txn, user_id, &recipe.tags).await?;
        replace_recipe_tags(&txn, model.id, &tag_models).await?;
        let ingredient_models = resolve_ingredients(&txn, user_id, &recipe.ingredients).await?;
        replace_recipe_ingredients(&txn, model.id, &ingredient_models).await?;

        txn.commit().await.context("commit create recipe")?;

        Ok(recipe_from_model(
            model,
            tag_models.into_iter().map(attr_from_tag).collect(),
            ingredient_models
                .into_iter()
                .map(attr_from_ingredient)
                .collect(),
        ))
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: i32,
        patch: &RecipePatch,
    ) -> Result<Option<Recipe>, RecipeServiceError> {
        let txn = self.db.begin().await.context("begin update recipe")?;

        let Some(model) = find_owned_recipe(&txn, user_id, id)
            .await
            .context("find recipe for update")?
        else {
            return Ok(None);
        };

        let mut am = model.clone().into_active_model();
        if let Some(ref title) = patch.title {
            am.title = Set(title.clone());
        }
        if let Some(ref description) = patch.description {
            am.description = Set(description.clone());
        }
        if let Some(time_minutes) = patch.time_minutes {
            am.time_minutes = Set(time_minutes);
        }
        if let Some(price) = patch.price {
            am.price = Set(price);
        }
        if let Some(ref link) = patch.link {
            am.link = Set(link.clone());
        }
        let model = if am.is_changed() {
            am.update(&txn).await.context("update recipe")?
        } else {
            model
        };

        if let Some(ref names) = patch.tags {
            let tag_models = resolve_tags(&txn, user_id, names).await?;
            replace_recipe_tags(&txn, id, &tag_models).await?;
        }
        if let Some(ref names) = patch.ingredients {
            let ingredient_models = resolve_ingredients(&txn, user_id, names).await?;
            replace_recipe_ingredients(&txn, id, &ingredient_models).await?;
        }

        let (tags, ingredients) = load_links(&txn, &[id]).await?.take(id);
        txn.commit().await.context("commit update recipe")?;
        Ok(Some(recipe_from_model(model, tags, ingredients)))
    }

    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, RecipeServiceError> {
        let result = recipes::Entity::delete_many()
            .filter(recipes::Column::Id.eq(id))
            .filter(recipes::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_image(
        &self,
        user_id: Uuid,
        id: i32,
        image: &str,
    ) -> Result<bool, RecipeServiceError> {
        let result = recipes::Entity::update_many()
            .col_expr(recipes::Column::Image, Expr::value(image.to_owned()))
            .filter(recipes::Column::Id.eq(id))
            .filter(recipes::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("set recipe image")?;
        Ok(result.rows_affected > 0)
    }
}

async fn find_owned_recipe<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    id: i32,
) -> Result<Option<recipes::Model>, DbErr> {
    recipes::Entity::find_by_id(id)
        .filter(recipes::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Tags and ingredients of a batch of recipes, grouped by recipe id.
#[derive(Default)]
struct RecipeLinks {
    tags: HashMap<i32, Vec<RecipeAttr>>,
    ingredients: HashMap<i32, Vec<RecipeAttr>>,
}

impl RecipeLinks {
    fn take(&mut self, recipe_id: i32) -> (Vec<RecipeAttr>, Vec<RecipeAttr>) {
        (
            self.tags.remove(&recipe_id).unwrap_or_default(),
            self.ingredients.remove(&recipe_id).unwrap_or_default(),
        )
    }
}

async fn load_links<C: ConnectionTrait>(
    db: &C,
    recipe_ids: &[i32],
) -> anyhow::Result<RecipeLinks> {
    let mut links = RecipeLinks::default();
    if recipe_ids.is_empty() {
        return Ok(links);
    }

    let tag_rows = recipe_tags::Entity::find()
        .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .find_also_related(tags::Entity)
        .order_by_asc(tags::Column::Name)
        .all(db)
        .await
        .context("load recipe tags")?;
    for (link, tag) in tag_rows {
        if let Some(tag) = tag {
            links
                .tags
                .entry(link.recipe_id)
                .or_default()
                .push(attr_from_tag(tag));
        }
    }

    let ingredient_rows = recipe_ingredients::Entity::find()
        .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .find_also_related(ingredients::Entity)
        .order_by_asc(ingredients::Column::Name)
        .all(db)
        .await
        .context("load recipe ingredients")?;
    for (link, ingredient) in ingredient_rows {
        if let Some(ingredient) = ingredient {
            links
                .ingredients
                .entry(link.recipe_id)
                .or_default()
                .push(attr_from_ingredient(ingredient));
        }
    }

    Ok(links)
}

/// Get-or-create each name among the user's tags. Duplicate names already in
/// the table resolve to the oldest row.
async fn resolve_tags<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    names: &[String],
) -> anyhow::Result<Vec<tags::Model>> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let existing = tags::Entity::find()
            .filter(tags::Column::UserId.eq(user_id))
            .filter(tags::Column::Name.eq(name.as_str()))
            .order_by_asc(tags::Column::Id)
            .one(db)
            .await
            .context("find tag by name")?;
        let model = match existing {
            Some(model) => model,
            None => tags::ActiveModel {
                user_id: Set(user_id),
                name: Set(name.clone()),
                ..Default::default()
            }
            .insert(db)
            .await
            .context("create tag")?,
        };
        out.push(model);
    }
    Ok(out)
}

async fn resolve_ingredients<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    names: &[String],
) -> anyhow::Result<Vec<ingredients::Model>> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let existing = ingredients::Entity::find()
            .filter(ingredients::Column::UserId.eq(user_id))
            .filter(ingredients::Column::Name.eq(name.as_str()))
            .order_by_asc(ingredients::Column::Id)
            .one(db)
            .await
            .context("find ingredient by name")?;
        let model = match existing {
            Some(model) => model,
            None => ingredients::ActiveModel {
                user_id: Set(user_id),
                name: Set(name.clone()),
                ..Default::default()
            }
            .insert(db)
            .await
            .context("create ingredient")?,
        };
        out.push(model);
    }
    Ok(out)
}

async fn replace_recipe_tags<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    tag_models: &[tags::Model],
) -> anyhow::Result<()> {
    recipe_tags::Entity::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await
        .context("clear recipe tags")?;
    if tag_models.is_empty() {
        return Ok(());
    }
    recipe_tags::Entity::insert_many(tag_models.iter().map(|t| recipe_tags::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(t.id),
    }))
    .exec_without_returning(db)
    .await
    .context("link recipe tags")?;
    Ok(())
}

async fn replace_recipe_ingredients<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    ingredient_models: &[ingredients::Model],
) -> anyhow::Result<()> {
    recipe_ingredients::Entity::delete_many()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await
        .context("clear recipe ingredients")?;
    if ingredient_models.is_empty() {
        return Ok(());
    }
    recipe_ingredients::Entity::insert_many(ingredient_models.iter().map(|i| {
        recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(i.id),
        }
    }))
    .exec_without_returning(db)
    .await
    .context("link recipe ingredients")?;
    Ok(())
}

fn recipe_from_model(
    model: recipes::Model,
    tags: Vec<RecipeAttr>,
    ingredients: Vec<RecipeAttr>,
) -> Recipe {
    Recipe {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        description: model.description,
        time_minutes: model.time_minutes,
        price: model.price,
        link: model.link,
        image: model.image,
        tags,
        ingredients,
    }
}

fn attr_from_tag(model: tags::Model) -> RecipeAttr {
    RecipeAttr {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
    }
}

fn attr_from_ingredient(model: ingredients::Model) -> RecipeAttr {
    RecipeAttr {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl RecipeAttrRepository for DbTagRepository {
    const KIND: AttrKind = AttrKind::Tag;

    async fn list(
        &self,
        user_id: Uuid,
        assigned_only: bool,
    ) -> Result<Vec<RecipeAttr>, RecipeServiceError> {
        let mut query = tags::Entity::find().filter(tags::Column::UserId.eq(user_id));
        if assigned_only {
            // tags.id IN (SELECT tag_id FROM recipe_tags JOIN recipes ... WHERE recipes.user_id = $1)
            query = query.filter(
                tags::Column::Id.in_subquery(
                    Query::select()
                        .column((recipe_tags::Entity, recipe_tags::Column::TagId))
                        .from(recipe_tags::Entity)
                        .inner_join(
                            recipes::Entity,
                            Expr::col((recipes::Entity, recipes::Column::Id))
                                .equals((recipe_tags::Entity, recipe_tags::Column::RecipeId)),
                        )
                        .and_where(Expr::col((recipes::Entity, recipes::Column::UserId)).eq(user_id))
                        .to_owned(),
                ),
            );
        }
        let models = query
            .order_by_desc(tags::Column::Name)
            .order_by_desc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(attr_from_tag).collect())
    }

    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<RecipeAttr>, RecipeServiceError> {
        let model = tags::Entity::find_by_id(id)
            .filter(tags::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("get tag")?;
        Ok(model.map(attr_from_tag))
    }

    async fn rename(
        &self,
        user_id: Uuid,
        id: i32,
        name: &str,
    ) -> Result<Option<RecipeAttr>, RecipeServiceError> {
        let Some(model) = tags::Entity::find_by_id(id)
            .filter(tags::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find tag for rename")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        am.name = Set(name.to_owned());
        let model = am.update(&self.db).await.context("rename tag")?;
        Ok(Some(attr_from_tag(model)))
    }

    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, RecipeServiceError> {
        let result = tags::Entity::delete_many()
            .filter(tags::Column::Id.eq(id))
            .filter(tags::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete tag")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl RecipeAttrRepository for DbIngredientRepository {
    const KIND: AttrKind = AttrKind::Ingredient;

    async fn list(
        &self,
        user_id: Uuid,
        assigned_only: bool,
    ) -> Result<Vec<RecipeAttr>, RecipeServiceError> {
        let mut query =
            ingredients::Entity::find().filter(ingredients::Column::UserId.eq(user_id));
        if assigned_only {
            query = query.filter(
                ingredients::Column::Id.in_subquery(
                    Query::select()
                        .column((
                            recipe_ingredients::Entity,
                            recipe_ingredients::Column::IngredientId,
                        ))
                        .from(recipe_ingredients::Entity)
                        .inner_join(
                            recipes::Entity,
                            Expr::col((recipes::Entity, recipes::Column::Id)).equals((
                                recipe_ingredients::Entity,
                                recipe_ingredients::Column::RecipeId,
                            )),
                        )
                        .and_where(Expr::col((recipes::Entity, recipes::Column::UserId)).eq(user_id))
                        .to_owned(),
                ),
            );
        }
        let models = query
            .order_by_desc(ingredients::Column::Name)
            .order_by_desc(ingredients::Column::Id)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(attr_from_ingredient).collect())
    }

    async fn get(&self, user_id: Uuid, id: i32) -> Result<Option<RecipeAttr>, RecipeServiceError> {
        let model = ingredients::Entity::find_by_id(id)
            .filter(ingredients::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("get ingredient")?;
        Ok(model.map(attr_from_ingredient))
    }

    async fn rename(
        &self,
        user_id: Uuid,
        id: i32,
        name: &str,
    ) -> Result<Option<RecipeAttr>, RecipeServiceError> {
        let Some(model) = ingredients::Entity::find_by_id(id)
            .filter(ingredients::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find ingredient for rename")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        am.name = Set(name.to_owned());
        let model = am.update(&self.db).await.context("rename ingredient")?;
        Ok(Some(attr_from_ingredient(model)))
    }

    async fn delete(&self, user_id: Uuid, id: i32) -> Result<bool, RecipeServiceError> {
        let result = ingredients::Entity::delete_many()
            .filter(ingredients::Column::Id.eq(id))
            .filter(ingredients::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete ingredient")?;
        Ok(result.rows_affected > 0)
    }
}
