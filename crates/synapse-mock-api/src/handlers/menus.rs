//! 메뉴 API 핸들러.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use synapse_core::models::menu::MenuItem;
use tracing::debug;

use super::bearer_token;
use crate::error::MockApiError;
use crate::MockApiState;

/// 내비게이션 메뉴 조회 (Bearer 필요)
///
/// GET /api/v1/menus
pub async fn list_menus(
    State(state): State<MockApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MenuItem>>, MockApiError> {
    let user = bearer_token(&headers)
        .and_then(|token| state.user_for_access_token(token))
        .ok_or(MockApiError::TokenInvalid)?;

    debug!("메뉴 조회: user_id={}", user.id);
    Ok(Json(state.menus_for(&user)))
}
