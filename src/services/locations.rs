use tracing::instrument;
use validator::Validate;

use super::{decode_many, decode_single, DataAccess, LOCATION_SEARCH_LIMIT};
use crate::db::{Direction, Query};
use crate::errors::ServiceError;
use crate::models::{EquipmentType, Location, NewLocation};

/// Strips characters that would break out of a PostgREST `or=(...)` group
/// or act as wildcards. Only the live filter needs this; fixtures are
/// matched against the raw text.
fn sanitize_search(query: &str) -> String {
    query
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '%'))
        .collect::<String>()
        .trim()
        .to_string()
}

impl DataAccess {
    /// Locations whose city, state or zip contains `query`, ignoring case.
    /// At most ten results.
    #[instrument(skip(self))]
    pub async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ServiceError> {
        if let Some(hits) = self.short_circuit(|mock| {
            Some(
                mock.list::<Location>()
                    .into_iter()
                    .filter(|loc| loc.matches(query))
                    .take(LOCATION_SEARCH_LIMIT)
                    .collect::<Vec<_>>(),
            )
        }) {
            return Ok(hits);
        }

        let needle = sanitize_search(query);
        self.run("search_locations", async {
            let query = Query::table("locations")
                .select("*")
                .ilike_any(&["city", "state", "zip"], &needle)
                .limit(LOCATION_SEARCH_LIMIT);
            decode_many(self.backend.select(query).await?)
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn create_location(&self, input: NewLocation) -> Result<Location, ServiceError> {
        input.validate()?;
        if let Some(created) =
            self.short_circuit(|mock| Some(mock.simulate_insert(&input, false)))
        {
            return created;
        }

        self.run("create_location", async {
            let row = serde_json::to_value(&input)?;
            decode_single(
                self.backend
                    .insert(Query::table("locations").single(), row)
                    .await?,
                "location",
            )
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_all_equipment_types(&self) -> Result<Vec<EquipmentType>, ServiceError> {
        if let Some(types) = self.short_circuit(|mock| Some(mock.list::<EquipmentType>())) {
            return Ok(types);
        }

        self.run("get_all_equipment_types", async {
            let query = Query::table("equipment_types")
                .select("*")
                .order("name", Direction::Asc);
            decode_many(self.backend.select(query).await?)
        })
        .await
    }
}
