use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use recipe_auth_types::identity::TokenSecret;
use recipe_testing::auth::{MockAuth, TEST_TOKEN_SECRET};

use recipe_service::router::{MAX_IMAGE_BYTES, build_router};
use recipe_service::state::AppState;

/// Router with no database behind it: anything that reaches a repository fails,
/// so these tests only cover what happens before persistence.
fn test_server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        token_secret: TokenSecret::new(TEST_TOKEN_SECRET),
        token_ttl_secs: 3600,
        media_root: std::env::temp_dir().join("recipe-router-test-media"),
    };
    TestServer::new(build_router(state)).unwrap()
}

const PROTECTED_GETS: &[&str] = &[
    "/user/me/",
    "/recipe/recipes/",
    "/recipe/recipes/1/",
    "/recipe/tags/",
    "/recipe/tags/1/",
    "/recipe/ingredients/",
    "/recipe/ingredients/1/",
];

#[tokio::test]
async fn should_require_auth_on_every_protected_get() {
    let server = test_server();
    for path in PROTECTED_GETS {
        let response = server.get(path).await;
        assert_eq!(
            response.status_code(),
            StatusCode::UNAUTHORIZED,
            "GET {path} without token"
        );
        let body: serde_json::Value = response.json();
        assert_eq!(body["kind"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn should_require_auth_on_writes() {
    let server = test_server();

    let create = server
        .post("/recipe/recipes/")
        .json(&serde_json::json!({"title": "x", "time_minutes": 1, "price": "1.00"}))
        .await;
    assert_eq!(create.status_code(), StatusCode::UNAUTHORIZED);

    let patch = server
        .patch("/recipe/tags/1/")
        .json(&serde_json::json!({"name": "x"}))
        .await;
    assert_eq!(patch.status_code(), StatusCode::UNAUTHORIZED);

    let delete = server.delete("/recipe/ingredients/1/").await;
    assert_eq!(delete.status_code(), StatusCode::UNAUTHORIZED);

    let upload = server.post("/recipe/recipes/1/upload-image/").await;
    assert_eq!(upload.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_token_signed_with_other_secret() {
    let server = test_server();
    let mut auth = MockAuth::new(Uuid::now_v7());
    auth.secret = "some-other-secret".to_owned();

    let response = server
        .get("/recipe/tags/")
        .add_header(AUTHORIZATION, auth.authorization())
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_non_bearer_credentials() {
    let server = test_server();
    let response = server
        .get("/recipe/recipes/")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Token abc123"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_pass_auth_and_validate_query_with_valid_token() {
    let server = test_server();
    let auth = MockAuth::new(Uuid::now_v7());

    let response = server
        .get("/recipe/recipes/?tags=1,abc")
        .add_header(AUTHORIZATION, auth.authorization())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "INVALID_QUERY");

    let response = server
        .get("/recipe/tags/?assigned_only=maybe")
        .add_header(AUTHORIZATION, auth.authorization())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_serve_health_without_auth() {
    let server = test_server();
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/readyz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_return_json_not_found_for_unknown_route() {
    let server = test_server();
    let response = server.get("/recipe/unknown/").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn should_stamp_request_id_on_responses() {
    let server = test_server();
    let response = server.get("/healthz").await;
    let id = response.header("x-request-id");
    assert!(id.to_str().unwrap().parse::<Uuid>().is_ok());
}

#[tokio::test]
async fn should_report_unparseable_ids_as_not_found() {
    let server = test_server();
    let auth = MockAuth::new(Uuid::now_v7());

    let cases = [
        ("/recipe/tags/abc/", "TAG_NOT_FOUND"),
        ("/recipe/recipes/99999999999/", "RECIPE_NOT_FOUND"),
        ("/recipe/ingredients/1.5/", "INGREDIENT_NOT_FOUND"),
    ];
    for (path, kind) in cases {
        let response = server
            .get(path)
            .add_header(AUTHORIZATION, auth.authorization())
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "GET {path}");
        let body: serde_json::Value = response.json();
        assert_eq!(body["kind"], kind);
    }

    let delete = server
        .delete("/recipe/tags/abc/")
        .add_header(AUTHORIZATION, auth.authorization())
        .await;
    assert_eq!(delete.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_check_auth_before_parsing_id() {
    let server = test_server();
    let response = server.get("/recipe/tags/abc/").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_oversized_image_with_413() {
    let server = test_server();
    let auth = MockAuth::new(Uuid::now_v7());
    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(vec![0u8; MAX_IMAGE_BYTES + 1024])
            .file_name("huge.png")
            .mime_type("image/png"),
    );

    let response = server
        .post("/recipe/recipes/1/upload-image/")
        .add_header(AUTHORIZATION, auth.authorization())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "IMAGE_TOO_LARGE");
}
