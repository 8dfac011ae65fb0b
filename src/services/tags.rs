use serde_json::json;
use tracing::instrument;
use validator::Validate;

use super::{decode_many, decode_single, DataAccess};
use crate::db::{Direction, Query};
use crate::errors::ServiceError;
use crate::mock_data::mock_id;
use crate::models::{LaneTag, NewTag, RfpTag, Tag};

impl DataAccess {
    #[instrument(skip(self))]
    pub async fn get_all_tags(&self) -> Result<Vec<Tag>, ServiceError> {
        if let Some(tags) = self.short_circuit(|mock| Some(mock.list::<Tag>())) {
            return Ok(tags);
        }

        self.run("get_all_tags", async {
            let query = Query::table("tags").select("*").order("name", Direction::Asc);
            decode_many(self.backend.select(query).await?)
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn create_tag(&self, input: NewTag) -> Result<Tag, ServiceError> {
        input.validate()?;
        if let Some(created) =
            self.short_circuit(|mock| Some(mock.simulate_insert(&input, false)))
        {
            return created;
        }

        self.run("create_tag", async {
            let row = serde_json::to_value(&input)?;
            decode_single(
                self.backend.insert(Query::table("tags").single(), row).await?,
                "tag",
            )
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn add_tag_to_rfp(&self, rfp_id: &str, tag_id: &str) -> Result<RfpTag, ServiceError> {
        if let Some(link) = self.short_circuit(|_| {
            Some(RfpTag {
                id: Some(mock_id()),
                rfp_id: rfp_id.to_string(),
                tag_id: tag_id.to_string(),
            })
        }) {
            return Ok(link);
        }

        self.run("add_tag_to_rfp", async {
            let row = json!({ "rfp_id": rfp_id, "tag_id": tag_id });
            decode_single(
                self.backend.insert(Query::table("rfp_tags").select("*"), row).await?,
                "RFP tag",
            )
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn add_tag_to_lane(
        &self,
        lane_id: &str,
        tag_id: &str,
    ) -> Result<LaneTag, ServiceError> {
        if let Some(link) = self.short_circuit(|_| {
            Some(LaneTag {
                id: Some(mock_id()),
                lane_id: lane_id.to_string(),
                tag_id: tag_id.to_string(),
            })
        }) {
            return Ok(link);
        }

        self.run("add_tag_to_lane", async {
            let row = json!({ "lane_id": lane_id, "tag_id": tag_id });
            decode_single(
                self.backend
                    .insert(Query::table("lane_tags").select("*"), row)
                    .await?,
                "lane tag",
            )
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
    use crate::mock_data::MockStore;
    use std::sync::Arc;

    fn data(backend: MockBackendClient, mock_enabled: bool) -> DataAccess {
        let logger = AppLogger::new(RuntimeEnvironment::Development, LogLevel::Info);
        DataAccess::new(
            Arc::new(backend),
            MockStore::new(mock_enabled, logger.clone()),
            logger,
        )
    }

    #[tokio::test]
    async fn mock_tags_and_links() {
        let data = data(MockBackendClient::new(), true);
        let names: Vec<String> = data
            .get_all_tags()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(
            names,
            ["High Priority", "Cost Saving", "Seasonal", "Problem Lane"]
        );

        let link = data.add_tag_to_lane("2", "4").await.unwrap();
        assert_eq!(link.lane_id, "2");
        assert!(link.id.unwrap().starts_with("mock-"));
    }

    #[tokio::test]
    async fn live_link_accepts_array_representation() {
        let mut backend = MockBackendClient::new();
        backend
            .expect_insert()
            .withf(|query, row| {
                query.table_name() == "rfp_tags" && *row == json!({ "rfp_id": "1", "tag_id": "3" })
            })
            .returning(|_, _| Ok(json!([{ "id": "11", "rfp_id": "1", "tag_id": "3" }])));

        let link = data(backend, false).add_tag_to_rfp("1", "3").await.unwrap();
        assert_eq!(link.id.as_deref(), Some("11"));
    }
}
