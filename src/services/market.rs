use tracing::instrument;

use super::{decode_many, DataAccess};
use crate::db::{Direction, Query};
use crate::errors::ServiceError;
use crate::models::{FuelPrice, MarketIndex};

impl DataAccess {
    /// Latest market index readings, at most `limit`.
    #[instrument(skip(self))]
    pub async fn get_recent_market_indices(
        &self,
        limit: usize,
    ) -> Result<Vec<MarketIndex>, ServiceError> {
        if let Some(indices) = self.short_circuit(|mock| {
            let mut indices = mock.list::<MarketIndex>();
            indices.truncate(limit);
            Some(indices)
        }) {
            return Ok(indices);
        }

        self.run("get_recent_market_indices", async {
            let query = Query::table("market_indices")
                .select("*")
                .order("date", Direction::Desc)
                .limit(limit);
            decode_many(self.backend.select(query).await?)
        })
        .await
    }

    /// Latest fuel prices, at most `limit`.
    #[instrument(skip(self))]
    pub async fn get_recent_fuel_prices(&self, limit: usize) -> Result<Vec<FuelPrice>, ServiceError> {
        if let Some(prices) = self.short_circuit(|mock| {
            let mut prices = mock.list::<FuelPrice>();
            prices.truncate(limit);
            Some(prices)
        }) {
            return Ok(prices);
        }

        self.run("get_recent_fuel_prices", async {
            let query = Query::table("fuel_prices")
                .select("*")
                .order("date", Direction::Desc)
                .limit(limit);
            decode_many(self.backend.select(query).await?)
        })
        .await
    }
}
