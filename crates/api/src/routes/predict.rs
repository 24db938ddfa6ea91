//! Prediction Routes

use axum::{extract::State, Json};
use feature_engine::FlightQuery;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

/// One flight in a prediction request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlightRequest {
    #[serde(rename = "OPERA")]
    pub airline: String,
    #[serde(rename = "TIPOVUELO", default)]
    pub flight_type: Option<String>,
    #[serde(rename = "MES", default)]
    pub month: Option<i64>,
}

impl From<FlightRequest> for FlightQuery {
    fn from(flight: FlightRequest) -> Self {
        Self {
            airline: flight.airline,
            flight_type: flight.flight_type,
            month: flight.month,
        }
    }
}

/// Body of the predict endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictRequest {
    pub flights: Vec<FlightRequest>,
}

/// Response for the predict endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictResponse {
    pub predict: Vec<u8>,
}

/// Predict delays for a batch of flights
pub async fn post_predict(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    counter!("predict_requests_total").increment(1);

    let queries: Vec<FlightQuery> = body.flights.into_iter().map(FlightQuery::from).collect();
    debug!("Predict request with {} flights", queries.len());

    let predict = state.service.predict_batch(&queries).map_err(|e| {
        counter!("predict_rejected_total").increment(1);
        warn!("Rejected prediction batch: {}", e);
        e
    })?;

    counter!("predicted_flights_total").increment(predict.len() as u64);
    Ok(Json(PredictResponse { predict }))
}
