use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/arrival",
            post(handlers::create_arrival).get(handlers::list_arrivals),
        )
        .route(
            "/api/arrival/:id",
            put(handlers::update_arrival).delete(handlers::delete_arrival),
        )
        .route("/api/export", get(handlers::export_csv))
        .route("/api/stats/weekly", get(handlers::weekly_stats))
        .route("/api/stats/daily", get(handlers::daily_counts))
        .route("/api/stats/weekdays", get(handlers::weekday_counts))
        .route("/api/migrate", post(handlers::migrate))
        .with_state(state)
}
