use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::i18n::Locale;

/// Unknown locale codes resolve to the default locale
fn resolve(state: &AppState, code: &str) -> Locale {
    code.parse().unwrap_or_else(|_| state.translator.default_locale())
}

/// GET /api/i18n/:locale - Full dictionary for a locale
pub async fn dictionary(State(state): State<AppState>, Path(locale): Path<String>) -> Json<Value> {
    let locale = resolve(&state, &locale);
    Json(state.translator.dictionary(locale).clone())
}

/// GET /api/i18n/:locale/translate?key=...&name=value
///
/// Every query parameter other than `key` becomes a placeholder value.
pub async fn translate(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let key = params
        .remove("key")
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::bad_request("Parâmetro 'key' é obrigatório"))?;

    let locale = resolve(&state, &locale);
    let value = state.translator.translate_with(locale, &key, &params);

    Ok(Json(json!({
        "locale": locale.code(),
        "key": key,
        "value": value,
    })))
}
