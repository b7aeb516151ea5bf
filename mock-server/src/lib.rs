use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub use axum::http::StatusCode;

/// A canned answer for one `country/zip` pair.
#[derive(Clone, Debug)]
pub struct Fixture {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Fixture {
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string().into_bytes(),
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self::bytes(status, body.as_bytes())
    }

    /// Served verbatim, so the body need not be valid UTF-8.
    pub fn bytes(status: StatusCode, body: &[u8]) -> Self {
        Self {
            status,
            body: body.to_vec(),
        }
    }
}

/// Every lookup the server received, as `country/zip` with the zip decoded.
pub type Hits = Arc<RwLock<Vec<String>>>;

#[derive(Clone, Default)]
pub struct AppState {
    fixtures: Arc<HashMap<(String, String), Fixture>>,
    hits: Hits,
}

impl AppState {
    /// Fixtures for the postcodes the client tests rely on.
    pub fn sample() -> Self {
        let wedel = place("Wedel", "53.5837", "9.7234", "Schleswig-Holstein", "SH");
        let barmbek = place("Hamburg Barmbek-Nord", "53.5961", "10.0452", "Hamburg", "HH");
        let copenhagen = place("København NV", "55.7", "12.5333", "", "");
        let amsterdam = place("Amsterdam", "52.3731", "4.8922", "Noord-Holland", "NH");

        Self::default()
            .with_fixture("de", "22880", Fixture::json(record("22880", "Germany", "DE", json!([wedel]))))
            .with_fixture("de", "22305", Fixture::json(record("22305", "Germany", "DE", json!([barmbek]))))
            .with_fixture("dk", "2400", Fixture::json(record("2400", "Denmark", "DK", json!([copenhagen]))))
            .with_fixture("nl", "1012", Fixture::json(record("1012", "Netherlands", "NL", json!([amsterdam]))))
    }

    pub fn with_fixture(self, country: &str, zip: &str, fixture: Fixture) -> Self {
        let mut fixtures = Arc::unwrap_or_clone(self.fixtures);
        fixtures.insert((country.to_string(), zip.to_string()), fixture);
        Self {
            fixtures: Arc::new(fixtures),
            hits: self.hits,
        }
    }

    pub fn hits(&self) -> Hits {
        Arc::clone(&self.hits)
    }
}

/// A response body in the service's wire format.
pub fn record(postcode: &str, country: &str, abbreviation: &str, places: serde_json::Value) -> serde_json::Value {
    json!({
        "post code": postcode,
        "country": country,
        "country abbreviation": abbreviation,
        "places": places,
    })
}

pub fn place(name: &str, latitude: &str, longitude: &str, state: &str, abbreviation: &str) -> serde_json::Value {
    json!({
        "place name": name,
        "longitude": longitude,
        "state": state,
        "state abbreviation": abbreviation,
        "latitude": latitude,
    })
}

pub fn app() -> Router {
    app_with(AppState::sample())
}

pub fn app_with(state: AppState) -> Router {
    Router::new()
        .route("/{country}/{zip}", get(lookup))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

async fn lookup(
    State(state): State<AppState>,
    Path((country, zip)): Path<(String, String)>,
) -> Response {
    state.hits.write().await.push(format!("{country}/{zip}"));

    match state.fixtures.get(&(country.clone(), zip.clone())) {
        Some(fixture) => {
            tracing::info!("{country}/{zip} -> {}", fixture.status);
            (
                fixture.status,
                [(header::CONTENT_TYPE, "application/json")],
                fixture.body.clone(),
            )
                .into_response()
        }
        None => {
            tracing::info!("{country}/{zip} -> not found");
            // The real service answers unknown postcodes with an empty object.
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "application/json")],
                "{}",
            )
                .into_response()
        }
    }
}
