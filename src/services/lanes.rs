use tracing::instrument;
use validator::Validate;

use super::{decode_many, decode_single, DataAccess};
use crate::db::{Direction, Query};
use crate::errors::ServiceError;
use crate::mock_data::MockStore;
use crate::models::{
    EquipmentType, Lane, LaneDetail, LaneUpdate, Location, NewLane, Rate, Rfp,
};

const LANE_SELECT: &str = "
    *,
    origin:locations!origin_id(*),
    destination:locations!destination_id(*),
    equipment_type:equipment_types(*),
    rates(*)
";

const LANE_DETAIL_SELECT: &str = "
    *,
    origin:locations!origin_id(*),
    destination:locations!destination_id(*),
    equipment_type:equipment_types(*),
    rates(*),
    rfp:rfps(*),
    tags(*)
";

/// Expands a fixture lane with its locations, equipment and rates.
fn expand(mock: &MockStore, lane: Lane) -> LaneDetail {
    LaneDetail {
        origin: mock.get_by_id::<Location>(&lane.origin_id),
        destination: mock.get_by_id::<Location>(&lane.destination_id),
        equipment_type: mock.get_by_id::<EquipmentType>(&lane.equipment_type_id),
        rates: mock.list_where::<Rate>("lane_id", lane.id.as_str()),
        rfp: None,
        tags: None,
        lane,
    }
}

impl DataAccess {
    #[instrument(skip(self))]
    pub async fn get_lanes_by_rfp(&self, rfp_id: &str) -> Result<Vec<LaneDetail>, ServiceError> {
        if let Some(lanes) = self.short_circuit(|mock| {
            Some(
                mock.list_where::<Lane>("rfp_id", rfp_id)
                    .into_iter()
                    .map(|lane| expand(mock, lane))
                    .collect::<Vec<_>>(),
            )
        }) {
            return Ok(lanes);
        }

        self.run("get_lanes_by_rfp", async {
            let query = Query::table("lanes")
                .select(LANE_SELECT)
                .eq("rfp_id", rfp_id)
                .order("created_at", Direction::Desc);
            decode_many(self.backend.select(query).await?)
        })
        .await
    }

    /// Single lane with its parent RFP and tags as well.
    #[instrument(skip(self))]
    pub async fn get_lane_by_id(&self, lane_id: &str) -> Result<LaneDetail, ServiceError> {
        if let Some(detail) = self.short_circuit(|mock| {
            let lane = mock.get_by_id::<Lane>(lane_id)?;
            let rfp = mock.get_by_id::<Rfp>(&lane.rfp_id);
            Some(LaneDetail {
                rfp,
                tags: Some(Vec::new()),
                ..expand(mock, lane)
            })
        }) {
            return Ok(detail);
        }

        self.run("get_lane_by_id", async {
            let query = Query::table("lanes")
                .select(LANE_DETAIL_SELECT)
                .eq("id", lane_id)
                .single();
            decode_single(self.backend.select(query).await?, "lane")
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn create_lane(&self, input: NewLane) -> Result<Lane, ServiceError> {
        input.validate()?;
        if let Some(created) = self.short_circuit(|mock| Some(mock.simulate_insert(&input, true)))
        {
            return created;
        }

        self.run("create_lane", async {
            let row = serde_json::to_value(&input)?;
            decode_single(
                self.backend.insert(Query::table("lanes").single(), row).await?,
                "lane",
            )
        })
        .await
    }

    #[instrument(skip(self, updates))]
    pub async fn update_lane(
        &self,
        lane_id: &str,
        updates: LaneUpdate,
    ) -> Result<Lane, ServiceError> {
        updates.validate()?;
        if let Some(merged) = self
            .short_circuit(|mock| mock.simulate_update::<Lane, _>(lane_id, &updates).transpose())
        {
            return merged;
        }

        self.run("update_lane", async {
            let query = Query::table("lanes").eq("id", lane_id).single();
            let changes = serde_json::to_value(&updates)?;
            decode_single(self.backend.update(query, changes).await?, "lane")
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_lane(&self, lane_id: &str) -> Result<(), ServiceError> {
        if self.short_circuit(|_| Some(())).is_some() {
            return Ok(());
        }

        self.run("delete_lane", async {
            self.backend
                .delete(Query::table("lanes").eq("id", lane_id))
                .await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeEnvironment;
    use crate::db::MockBackendClient;
    use crate::logging::{AppLogger, LogLevel};
    use serde_json::json;
    use std::sync::Arc;

    fn data(backend: MockBackendClient, mock_enabled: bool) -> DataAccess {
        let logger = AppLogger::new(RuntimeEnvironment::Qa, LogLevel::Warn);
        DataAccess::new(
            Arc::new(backend),
            MockStore::new(mock_enabled, logger.clone()),
            logger,
        )
    }

    #[tokio::test]
    async fn mock_lanes_are_expanded() {
        let lanes = data(MockBackendClient::new(), true)
            .get_lanes_by_rfp("1")
            .await
            .unwrap();
        assert_eq!(lanes.len(), 2);
        let first = &lanes[0];
        assert_eq!(first.origin.as_ref().unwrap().city, "Los Angeles");
        assert_eq!(first.destination.as_ref().unwrap().city, "New York");
        assert_eq!(first.equipment_type.as_ref().unwrap().name, "Dry Van");
        assert_eq!(first.rates.len(), 1);
        assert!(first.rfp.is_none());
    }

    #[tokio::test]
    async fn mock_lane_detail_includes_rfp() {
        let lane = data(MockBackendClient::new(), true)
            .get_lane_by_id("3")
            .await
            .unwrap();
        assert_eq!(lane.rfp.unwrap().title, "Spot Market Q1 2023");
        assert_eq!(lane.tags, Some(Vec::new()));
        assert_eq!(lane.destination.unwrap().city, "Dallas");
    }

    #[tokio::test]
    async fn live_lane_list_requests_embedding_and_order() {
        let mut backend = MockBackendClient::new();
        backend
            .expect_select()
            .withf(|query| {
                let params = query.params();
                query.table_name() == "lanes"
                    && params.contains(&("rfp_id".into(), "eq.4".into()))
                    && params.contains(&("order".into(), "created_at.desc".into()))
                    && params[0].1.contains("origin:locations!origin_id(*)")
            })
            .times(1)
            .returning(|_| Ok(json!([])));

        let lanes = data(backend, false).get_lanes_by_rfp("4").await.unwrap();
        assert!(lanes.is_empty());
    }

    #[tokio::test]
    async fn invalid_lane_is_rejected_before_backend() {
        let mut backend = MockBackendClient::new();
        backend.expect_insert().never();
        let input = NewLane {
            rfp_id: "1".into(),
            origin_id: "1".into(),
            destination_id: "2".into(),
            equipment_type_id: "1".into(),
            miles: 0,
            volume: 1,
            frequency: "weekly".into(),
            notes: None,
        };
        assert!(matches!(
            data(backend, false).create_lane(input).await,
            Err(ServiceError::ValidationError(_))
        ));
    }
}
