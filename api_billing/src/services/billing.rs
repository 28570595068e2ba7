use common::{
    api::{Api, ApiResponse, RequestParams},
    error::{AppError, Res},
    misc::require,
    webhooks::{self, Webhook},
};
use log::{debug, info};
use reqwest::Method;

use crate::{
    dtos::billing::{NewProfile, ProfileCreateRequest, ProfileIdsQuery, UserIdsQuery},
    models::{
        plan::{CatalogPlan, RegionalPlan},
        profile::ProfileData,
    },
    services::{discounts::DiscountsManager, profile::BillingProfile},
};

/// Client of the remote billing service.
pub struct BillingService {
    api: Api,
    discounts: DiscountsManager,
}

impl BillingService {
    pub fn new(api: Api) -> Self {
        BillingService {
            discounts: DiscountsManager::new(api.clone()),
            api,
        }
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    fn profile(&self, data: ProfileData) -> BillingProfile {
        BillingProfile::new(self.api.clone(), data)
    }

    /// Creates a billing profile for a user.
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` if `user_id` or `region` is missing.
    /// * `ProfileWasNotCreated` if the service refused the profile.
    pub async fn create_profile(&self, data: &NewProfile) -> Res<BillingProfile> {
        let user_id = *require(&data.user_id, "user_id")?;
        let region = require(&data.region, "region")?;

        let params = RequestParams::form_of(&ProfileCreateRequest {
            user_id,
            region,
            balance: data.balance.unwrap_or(0),
            plan: data.plan.as_deref().unwrap_or_default(),
            period: data.period.as_deref().unwrap_or_default(),
            trial: u8::from(data.trial.unwrap_or(false)),
            ends_at: data.ends_at.as_deref(),
            discount: data.discount,
        })?;

        let response = self.api.request(Method::POST, "/profiles", params).await?;

        if response.failed() {
            return Err(AppError::ProfileWasNotCreated {
                status: response.status_code(),
            });
        }

        let profile = self.profile(response.data_record()?);
        info!("Profile #{} created for user #{}", profile.profile_id(), user_id);
        Ok(profile)
    }

    pub async fn get_profile_by_id(&self, id: i64) -> Res<BillingProfile> {
        let response = self
            .api
            .request(Method::GET, &format!("/profiles/{}", id), RequestParams::none())
            .await?;

        let data = Self::found(&response, || format!("Unable to find profile by id \"{}\"", id))?;
        Ok(self.profile(data))
    }

    pub async fn get_profile_by_user_id(&self, user_id: i64) -> Res<BillingProfile> {
        let response = self
            .api
            .request(Method::GET, &format!("/users/{}", user_id), RequestParams::none())
            .await?;

        let data = Self::found(&response, || {
            format!("Unable to find profile by user id \"{}\"", user_id)
        })?;
        Ok(self.profile(data))
    }

    /// Loads several profiles at once. Non-positive ids are skipped.
    pub async fn get_profiles_by_ids(&self, ids: &[i64]) -> Res<Vec<BillingProfile>> {
        let query = serde_json::to_value(ProfileIdsQuery { ids: ids_list(ids) })?;
        let response = self
            .api
            .request(Method::GET, "/profiles", RequestParams::query(query))
            .await?;

        let profiles = Self::found_many(&response, "Unable load profiles by IDs.")?;
        Ok(profiles.into_iter().map(|data| self.profile(data)).collect())
    }

    pub async fn get_profiles_by_user_ids(&self, user_ids: &[i64]) -> Res<Vec<BillingProfile>> {
        let query = serde_json::to_value(UserIdsQuery {
            user_ids: ids_list(user_ids),
        })?;
        let response = self
            .api
            .request(Method::GET, "/users", RequestParams::query(query))
            .await?;

        let profiles = Self::found_many(&response, "Unable load profiles by user IDs.")?;
        Ok(profiles.into_iter().map(|data| self.profile(data)).collect())
    }

    fn found(response: &ApiResponse, message: impl FnOnce() -> String) -> Res<ProfileData> {
        if response.failed() {
            return Err(AppError::ProfileWasNotFound {
                status: response.status_code(),
                message: message(),
            });
        }

        response.data_record()
    }

    fn found_many(response: &ApiResponse, message: &str) -> Res<Vec<ProfileData>> {
        if response.failed() {
            return Err(AppError::ProfileWasNotFound {
                status: response.status_code(),
                message: message.to_string(),
            });
        }

        response.data_list()
    }

    /// Plans on sale, each priced for `region`.
    pub async fn plans(&self, region: &str) -> Res<Vec<RegionalPlan>> {
        let response = self
            .api
            .request(Method::GET, "/plans", RequestParams::none())
            .await?;

        if response.failed() {
            return Err(AppError::PlansRequestFailed {
                status: response.status_code(),
            });
        }

        let plans: Vec<CatalogPlan> = response.data_list()?;
        debug!("Loaded {} plans for region \"{}\"", plans.len(), region);

        Ok(plans
            .into_iter()
            .map(|plan| plan.for_region(region))
            .collect())
    }

    pub fn discounts(&self) -> &DiscountsManager {
        &self.discounts
    }

    pub async fn create_webhook(
        &self,
        actor_type: &str,
        actor_id: i64,
        event: &str,
        url: &str,
    ) -> Res<Webhook> {
        webhooks::create_webhook(self.api.as_ref(), actor_type, actor_id, event, url).await
    }
}

fn ids_list(ids: &[i64]) -> String {
    ids.iter()
        .filter(|id| **id > 0)
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
