use serde_json::Value;
use tracing::instrument;
use validator::Validate;

use super::{decode_single, DataAccess};
use crate::db::Query;
use crate::errors::ServiceError;
use crate::models::{AuthUser, CurrentUser, User, UserUpdate};

impl DataAccess {
    /// The signed-in session. Mock mode reports the first fixture user.
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> Result<CurrentUser, ServiceError> {
        if let Some(user) = self.short_circuit(|mock| mock.get_by_id::<User>("1")) {
            return Ok(CurrentUser {
                user: Some(AuthUser::from(user)),
            });
        }

        self.run("get_current_user", async {
            let session: Value = self.backend.current_user().await?;
            Ok(serde_json::from_value(session)?)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_user_profile(&self, user_id: &str) -> Result<User, ServiceError> {
        if let Some(user) = self.short_circuit(|mock| mock.get_by_id::<User>(user_id)) {
            return Ok(user);
        }

        self.run("get_user_profile", async {
            let query = Query::table("users").select("*").eq("id", user_id).single();
            decode_single(self.backend.select(query).await?, "user")
        })
        .await
    }

    #[instrument(skip(self, updates))]
    pub async fn update_user_profile(
        &self,
        user_id: &str,
        updates: UserUpdate,
    ) -> Result<User, ServiceError> {
        updates.validate()?;
        if let Some(merged) = self.short_circuit(|mock| {
            mock.simulate_update::<User, _>(user_id, &updates).transpose()
        }) {
            return merged;
        }

        self.run("update_user_profile", async {
            let query = Query::table("users").eq("id", user_id).single();
            let changes = serde_json::to_value(&updates)?;
            decode_single(self.backend.update(query, changes).await?, "user")
        })
        .await
    }

    /// Ends the backend session. Always goes to the backend handle, which is
    /// the stub when no credentials are configured.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), ServiceError> {
        self.run("sign_out", self.backend.sign_out()).await
    }
}
