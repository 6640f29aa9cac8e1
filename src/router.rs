use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::{require_student, require_teacher};
use crate::modules::auth::init_auth_router;
use crate::modules::courses::init_courses_router;
use crate::modules::enrollments::init_enrollments_router;
use crate::modules::grades::{init_grade_view_router, init_teacher_grades_router};
use crate::modules::home::init_home_router;
use crate::modules::reports::{init_student_reports_router, init_teacher_reports_router};
use crate::modules::statistics::{init_student_statistics_router, init_teacher_statistics_router};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn teacher_router(state: &AppState) -> Router<AppState> {
    init_courses_router()
        .merge(init_teacher_grades_router())
        .merge(init_teacher_statistics_router())
        .merge(init_teacher_reports_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_teacher))
}

fn student_router(state: &AppState) -> Router<AppState> {
    init_enrollments_router()
        .merge(init_student_statistics_router())
        .merge(init_student_reports_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_student))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/home", init_home_router())
                .nest("/grades", init_grade_view_router())
                .nest("/teacher", teacher_router(&state))
                .nest("/student", student_router(&state)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware))
                .layer(middleware::from_fn(metrics_middleware))
                .layer(cors_layer(&state)),
        )
        .with_state(state)
}
