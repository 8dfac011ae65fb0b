use tracing::instrument;
use validator::Validate;

use super::{decode_many, decode_single, DataAccess};
use crate::db::{Direction, Query};
use crate::errors::ServiceError;
use crate::models::{Lane, LaneCount, NewRfp, Rfp, RfpDetail, RfpUpdate, User};

const RFP_DETAIL_SELECT: &str = "
    *,
    lanes(count),
    creator:users!created_by(*),
    tags(*)
";

fn ordered_rfp(rfp: Rfp) -> Result<Rfp, ServiceError> {
    if !rfp.window_is_ordered() {
        return Err(ServiceError::InvalidInput(
            "end_date must not precede start_date".into(),
        ));
    }
    Ok(rfp)
}

impl DataAccess {
    /// RFPs owned by a company. Live reads come back newest first; mock
    /// reads keep fixture order.
    #[instrument(skip(self))]
    pub async fn get_rfps(&self, company_id: &str) -> Result<Vec<Rfp>, ServiceError> {
        if let Some(rfps) =
            self.short_circuit(|mock| Some(mock.list_where::<Rfp>("company_id", company_id)))
        {
            return Ok(rfps);
        }

        self.run("get_rfps", async {
            let query = Query::table("rfps")
                .select("*")
                .eq("company_id", company_id)
                .order("created_at", Direction::Desc);
            decode_many(self.backend.select(query).await?)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_rfp_by_id(&self, rfp_id: &str) -> Result<RfpDetail, ServiceError> {
        if let Some(detail) = self.short_circuit(|mock| {
            let rfp = mock.get_by_id::<Rfp>(rfp_id)?;
            let lanes = mock.list_where::<Lane>("rfp_id", rfp_id).len() as u64;
            let creator = mock.get_by_id::<User>(&rfp.created_by);
            Some(RfpDetail {
                rfp,
                lanes: LaneCount { count: lanes },
                creator,
                tags: Vec::new(),
            })
        }) {
            return Ok(detail);
        }

        self.run("get_rfp_by_id", async {
            let query = Query::table("rfps")
                .select(RFP_DETAIL_SELECT)
                .eq("id", rfp_id)
                .single();
            decode_single(self.backend.select(query).await?, "RFP")
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn create_rfp(&self, input: NewRfp) -> Result<Rfp, ServiceError> {
        input.validate()?;
        if let Some(created) = self.short_circuit(|mock| Some(mock.simulate_insert(&input, true)))
        {
            return created;
        }

        self.run("create_rfp", async {
            let row = serde_json::to_value(&input)?;
            decode_single(
                self.backend.insert(Query::table("rfps").single(), row).await?,
                "RFP",
            )
        })
        .await
    }

    #[instrument(skip(self, updates))]
    pub async fn update_rfp(&self, rfp_id: &str, updates: RfpUpdate) -> Result<Rfp, ServiceError> {
        updates.validate()?;
        if let Some(merged) = self.short_circuit(|mock| {
            mock.simulate_update::<Rfp, _>(rfp_id, &updates)
                .and_then(|found| found.map(ordered_rfp).transpose())
                .transpose()
        }) {
            return merged;
        }

        self.run("update_rfp", async {
            let query = Query::table("rfps").eq("id", rfp_id).single();
            let changes = serde_json::to_value(&updates)?;
            decode_single(self.backend.update(query, changes).await?, "RFP")
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_rfp(&self, rfp_id: &str) -> Result<(), ServiceError> {
        if self.short_circuit(|_| Some(())).is_some() {
            return Ok(());
        }

        self.run("delete_rfp", async {
            self.backend
                .delete(Query::table("rfps").eq("id", rfp_id))
                .await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{AppConfig, RawSettings};
    use crate::db::{self, BackendMode};
    use crate::errors::ServiceError;
    use crate::models::{NewRfp, RfpStatus, RfpUpdate};
    use crate::services::DataAccess;
    use assert_matches::assert_matches;

    fn mock_mode() -> DataAccess {
        let config = AppConfig::resolve(RawSettings {
            use_mock_data: Some("true".into()),
            ..Default::default()
        });
        let backend = db::connect(&config);
        assert_eq!(backend.mode(), BackendMode::Stub);
        DataAccess::from_config(&config, backend)
    }

    #[tokio::test]
    async fn rfp_detail_joins_lane_count_and_creator() {
        let detail = mock_mode().get_rfp_by_id("1").await.unwrap();
        assert_eq!(detail.lanes.count, 2);
        assert_eq!(detail.creator.unwrap().name, "Admin User");
        assert!(detail.tags.is_empty());

        let detail = mock_mode().get_rfp_by_id("2").await.unwrap();
        assert_eq!(detail.lanes.count, 1);
        assert_eq!(detail.creator.unwrap().email, "user@example.com");
    }

    #[tokio::test]
    async fn rfps_for_unknown_company_are_empty() {
        assert!(mock_mode().get_rfps("2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_then_read_shows_original() {
        let data = mock_mode();
        let updated = data
            .update_rfp(
                "1",
                RfpUpdate {
                    title: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(
            data.get_rfp_by_id("1").await.unwrap().rfp.title,
            "Annual Carrier Bid 2023"
        );
    }

    #[tokio::test]
    async fn create_rejects_inverted_window_and_blank_title() {
        let data = mock_mode();
        let mut input = NewRfp {
            title: "Q4".into(),
            description: None,
            company_id: "1".into(),
            status: RfpStatus::Draft,
            start_date: "2023-10-01".parse().unwrap(),
            end_date: "2023-09-01".parse().unwrap(),
            created_by: "1".into(),
        };
        assert!(data.create_rfp(input.clone()).await.is_err());

        input.end_date = "2023-12-31".parse().unwrap();
        input.title = String::new();
        assert!(data.create_rfp(input).await.is_err());
    }

    #[tokio::test]
    async fn update_cannot_invert_the_stored_window() {
        let data = mock_mode();
        let err = data
            .update_rfp(
                "1",
                RfpUpdate {
                    end_date: "2022-01-01".parse().ok(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::InvalidInput(_));

        let err = data
            .update_rfp(
                "1",
                RfpUpdate {
                    start_date: "2023-06-01".parse().ok(),
                    end_date: "2023-05-01".parse().ok(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(_));

        let moved = data
            .update_rfp(
                "1",
                RfpUpdate {
                    end_date: "2023-06-30".parse().ok(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.end_date.to_string(), "2023-06-30");
    }

    #[tokio::test]
    async fn delete_in_mock_mode_leaves_fixture_in_place() {
        let data = mock_mode();
        assert!(data.delete_rfp("1").await.is_ok());
        assert_eq!(data.get_rfp_by_id("1").await.unwrap().rfp.id, "1");
        assert_eq!(data.get_rfps("1").await.unwrap().len(), 2);
    }
}
