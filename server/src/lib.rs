use anyhow::{Context, Result};
use axum::{extract::State, routing::{get, post}, Form, Json, Router};
use axum::response::Html;
use price_core::{Predictor, ProductFields, ProductInput};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

/// JSON body for `/api/predict`: either `text` or any of the structured fields.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(flatten)]
    pub fields: ProductFields,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_price_usd: f64,
}

/// Form body posted by the HTML page. Blank inputs arrive as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: String,
}

impl From<PredictForm> for ProductFields {
    fn from(f: PredictForm) -> Self {
        let present = |s: String| Some(s).filter(|s| !s.is_empty());
        ProductFields {
            title: present(f.title),
            category: present(f.category),
            brand: present(f.brand),
            description: present(f.description),
            details: present(f.details),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

/// Load the model eagerly and build the router. A missing artifact fails here, before serving.
pub fn build_app(model_path: impl AsRef<Path>) -> Result<Router> {
    let model_path = model_path.as_ref();
    let predictor = Predictor::load(model_path)
        .with_context(|| format!("loading model from {}", model_path.display()))?;
    Ok(build_router(Arc::new(predictor)))
}

pub fn build_router(predictor: Arc<Predictor>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/healthz", get(|| async { Json(serde_json::json!({ "status": "ok" })) }))
        .route("/", get(index_page))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(api_predict))
        .with_state(AppState { predictor })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn api_predict(State(state): State<AppState>, Json(payload): Json<PredictRequest>) -> Json<PredictResponse> {
    let input = ProductInput::new(payload.fields, payload.text.as_deref());
    let price = state.predictor.predict(&input);
    tracing::debug!(price, "api prediction");
    Json(PredictResponse { predicted_price_usd: price })
}

pub async fn predict_form(State(state): State<AppState>, Form(form): Form<PredictForm>) -> Html<String> {
    let input = ProductInput::Structured(form.into());
    let text = input.canonical_text();
    let price = state.predictor.predict_text(&text);
    Html(result_page(price, &text))
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Product Price Prediction</title></head>
<body>
<h1>Product Price Prediction</h1>
<form method="post" action="/predict">
  <p><label>Title <input name="title"></label></p>
  <p><label>Category <input name="category"></label></p>
  <p><label>Brand <input name="brand"></label></p>
  <p><label>Description <textarea name="description"></textarea></label></p>
  <p><label>Details <textarea name="details"></textarea></label></p>
  <p><button type="submit">Predict</button></p>
</form>
</body>
</html>
"#;

fn result_page(price: f64, text: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>Predicted Price</title></head>\n<body>\n\
         <h1>Predicted price: ${price:.2}</h1>\n<pre>{}</pre>\n<p><a href=\"/\">Predict another</a></p>\n</body>\n</html>\n",
        html_escape::encode_safe(text)
    )
}
