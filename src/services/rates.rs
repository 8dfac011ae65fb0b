use tracing::instrument;
use validator::Validate;

use super::{decode_many, decode_single, DataAccess};
use crate::db::{Direction, Query};
use crate::errors::ServiceError;
use crate::models::{Forecast, NewForecast, NewRate, Rate, RateUpdate};

fn ordered_rate(rate: Rate) -> Result<Rate, ServiceError> {
    if !rate.window_is_ordered() {
        return Err(ServiceError::InvalidInput(
            "expiration_date must not precede effective_date".into(),
        ));
    }
    Ok(rate)
}

impl DataAccess {
    /// Rates for a lane; live reads are newest `effective_date` first.
    #[instrument(skip(self))]
    pub async fn get_rates_by_lane(&self, lane_id: &str) -> Result<Vec<Rate>, ServiceError> {
        if let Some(rates) =
            self.short_circuit(|mock| Some(mock.list_where::<Rate>("lane_id", lane_id)))
        {
            return Ok(rates);
        }

        self.run("get_rates_by_lane", async {
            let query = Query::table("rates")
                .select("*")
                .eq("lane_id", lane_id)
                .order("effective_date", Direction::Desc);
            decode_many(self.backend.select(query).await?)
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn add_rate(&self, input: NewRate) -> Result<Rate, ServiceError> {
        input.validate()?;
        if let Some(created) = self.short_circuit(|mock| Some(mock.simulate_insert(&input, true)))
        {
            return created;
        }

        self.run("add_rate", async {
            let row = serde_json::to_value(&input)?;
            decode_single(
                self.backend.insert(Query::table("rates").single(), row).await?,
                "rate",
            )
        })
        .await
    }

    #[instrument(skip(self, updates))]
    pub async fn update_rate(&self, rate_id: &str, updates: RateUpdate) -> Result<Rate, ServiceError> {
        updates.validate()?;
        if let Some(merged) = self.short_circuit(|mock| {
            mock.simulate_update::<Rate, _>(rate_id, &updates)
                .and_then(|found| found.map(ordered_rate).transpose())
                .transpose()
        }) {
            return merged;
        }

        self.run("update_rate", async {
            let query = Query::table("rates").eq("id", rate_id).single();
            let changes = serde_json::to_value(&updates)?;
            decode_single(self.backend.update(query, changes).await?, "rate")
        })
        .await
    }

    /// Stored forecasts for a lane, oldest `forecast_date` first.
    #[instrument(skip(self))]
    pub async fn get_forecasts_by_lane(
        &self,
        lane_id: &str,
    ) -> Result<Vec<Forecast>, ServiceError> {
        if let Some(forecasts) =
            self.short_circuit(|mock| Some(mock.list_where::<Forecast>("lane_id", lane_id)))
        {
            return Ok(forecasts);
        }

        self.run("get_forecasts_by_lane", async {
            let query = Query::table("forecasts")
                .select("*")
                .eq("lane_id", lane_id)
                .order("forecast_date", Direction::Asc);
            decode_many(self.backend.select(query).await?)
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn add_forecast(&self, input: NewForecast) -> Result<Forecast, ServiceError> {
        input.validate()?;
        if let Some(created) = self.short_circuit(|mock| Some(mock.simulate_insert(&input, true)))
        {
            return created;
        }

        self.run("add_forecast", async {
            let row = serde_json::to_value(&input)?;
            decode_single(
                self.backend
                    .insert(Query::table("forecasts").single(), row)
                    .await?,
                "forecast",
            )
        })
        .await
    }
}
