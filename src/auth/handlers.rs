use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, instrument, warn};

use crate::{
    auth::{
        dto::{PublicUser, RegisterRequest, TokenRequest, TokenResponse},
        extractors::CurrentUser,
        repo::normalize_email,
        services::is_valid_email,
    },
    errors::AppError,
    extractors::{ValidatedForm, ValidatedJson},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/token", post(token))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    if payload.password.is_empty() {
        warn!("empty password");
        return Err(AppError::Validation("Password must not be empty".into()));
    }

    let user = state
        .auth
        .register(&email, &payload.password, payload.full_name)
        .await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, form))]
pub async fn token(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let access_token = state.auth.login(&form.username, &form.password).await?;
    Ok(Json(TokenResponse::bearer(access_token)))
}

#[instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    debug!(user_id = %user.id, "current user");
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{app::build_app, state::AppState};

    fn app() -> Router {
        build_app(AppState::fake())
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn register_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn token_request(username: &str, password: &str) -> Request<Body> {
        let form = format!(
            "username={}&password={}",
            username.replace('@', "%40"),
            password
        );
        Request::builder()
            .method("POST")
            .uri("/auth/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap()
    }

    fn me_request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri("/auth/me");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn register_token_me_scenario() {
        let app = app();

        let response = app
            .clone()
            .oneshot(register_request(json!({"email": "a@x.com", "password": "pw123"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let registered = json_body(response).await;
        assert_eq!(registered["email"], "a@x.com");
        assert!(registered["full_name"].is_null());
        assert!(registered.get("password_hash").is_none());

        let response = app
            .clone()
            .oneshot(token_request("a@x.com", "pw123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token = json_body(response).await;
        assert_eq!(token["token_type"], "bearer");
        let access_token = token["access_token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(me_request(Some(&format!("Bearer {access_token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let me = json_body(response).await;
        assert_eq!(me["id"], registered["id"]);
        assert_eq!(me["email"], "a@x.com");
        assert!(me["full_name"].is_null());

        for bad in [None, Some("Bearer "), Some("Bearer garbage"), Some("Basic abc")] {
            let response = app.clone().oneshot(me_request(bad)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{bad:?}");
        }
    }

    #[tokio::test]
    async fn duplicate_registration_is_400() {
        let app = app();
        let body = json!({"email": "User@Example.com", "password": "pw123", "full_name": "Ada"});
        let response = app.clone().oneshot(register_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let first = json_body(response).await;
        assert_eq!(first["email"], "user@example.com");
        assert_eq!(first["full_name"], "Ada");

        let response = app
            .clone()
            .oneshot(register_request(json!({"email": "user@example.com", "password": "x"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "Email already registered");
    }

    #[tokio::test]
    async fn invalid_registration_input_is_422() {
        let app = app();
        let response = app
            .clone()
            .oneshot(register_request(json!({"email": "not-an-email", "password": "pw"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .oneshot(register_request(json!({"email": "a@x.com", "password": ""})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn bad_credentials_look_the_same() {
        let app = app();
        app.clone()
            .oneshot(register_request(json!({"email": "a@x.com", "password": "pw123"})))
            .await
            .unwrap();

        let wrong_password = app
            .clone()
            .oneshot(token_request("a@x.com", "wrong"))
            .await
            .unwrap();
        let unknown_email = app
            .clone()
            .oneshot(token_request("nobody@x.com", "pw123"))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unknown_email.status(), wrong_password.status());
        assert_eq!(json_body(wrong_password).await, json_body(unknown_email).await);
    }

    fn assert_json_422(response: &axum::response::Response) {
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn malformed_bodies_get_json_detail() {
        let app = app();

        let response = app
            .clone()
            .oneshot(register_request(json!({"email": "a@x.com"})))
            .await
            .unwrap();
        assert_json_422(&response);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.contains("password"), "{detail}");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/token")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=a%40x.com"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_json_422(&response);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.contains("password"), "{detail}");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_json_422(&response);
        assert!(json_body(response).await["detail"].is_string());
    }
}
