use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use recipe_core::error::fallback;
use recipe_core::health::{healthz, readyz};
use recipe_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    ingredient::{
        delete_ingredient, get_ingredient, list_ingredients, patch_ingredient, put_ingredient,
    },
    recipe::{
        MEDIA_URL, create_recipe, delete_recipe, get_recipe, list_recipes, patch_recipe,
        put_recipe, upload_recipe_image,
    },
    tag::{delete_tag, get_tag, list_tags, patch_tag, put_tag},
    user::{create_token, create_user, get_me, patch_me, put_me},
};
use crate::state::AppState;

/// Upper bound for an uploaded image body.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let media = ServeDir::new(&state.media_root);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/user/create/", post(create_user))
        .route("/user/token/", post(create_token))
        .route("/user/me/", get(get_me).patch(patch_me).put(put_me))
        // Recipes
        .route("/recipe/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/recipe/recipes/{id}/",
            get(get_recipe)
                .patch(patch_recipe)
                .put(put_recipe)
                .delete(delete_recipe),
        )
        .route(
            "/recipe/recipes/{id}/upload-image/",
            post(upload_recipe_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        // Tags
        .route("/recipe/tags/", get(list_tags))
        .route(
            "/recipe/tags/{id}/",
            get(get_tag).patch(patch_tag).put(put_tag).delete(delete_tag),
        )
        // Ingredients
        .route("/recipe/ingredients/", get(list_ingredients))
        .route(
            "/recipe/ingredients/{id}/",
            get(get_ingredient)
                .patch(patch_ingredient)
                .put(put_ingredient)
                .delete(delete_ingredient),
        )
        // Uploaded files
        .nest_service(MEDIA_URL, media)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
