use common::{
    api::{Api, RequestParams},
    error::{AppError, Res},
    misc::require,
};
use log::{info, warn};
use reqwest::Method;

use crate::{
    dtos::billing::{DiscountAttachRequest, DiscountCreateRequest, NewDiscount},
    models::discount::DiscountData,
    services::profile::BillingProfile,
};

/// A discount known to the billing service.
pub struct Discount {
    api: Api,
    data: DiscountData,
}

impl Discount {
    pub fn new(api: Api, data: DiscountData) -> Self {
        Discount { api, data }
    }

    pub fn data(&self) -> &DiscountData {
        &self.data
    }

    pub fn id(&self) -> i64 {
        self.data.id
    }

    /// Discount type; `"0"` when the service did not send one.
    pub fn kind(&self) -> &str {
        self.data.kind.as_deref().unwrap_or("0")
    }

    pub fn discount_type(&self) -> &str {
        self.data.discount_type.as_deref().unwrap_or("0")
    }

    pub fn value(&self) -> i64 {
        self.data.value
    }

    pub fn max_value(&self) -> i64 {
        self.data.max_value
    }

    fn profile_path(profile: &BillingProfile) -> String {
        format!("/profiles/{}/discounts", profile.profile_id())
    }

    /// Attaches the discount to `profile`, optionally until `apply_till`.
    pub async fn apply_to(&self, profile: &BillingProfile, apply_till: Option<&str>) -> Res<bool> {
        let params = RequestParams::form_of(&DiscountAttachRequest {
            discount_id: self.id(),
            apply_till,
        })?;

        let response = self
            .api
            .request(Method::POST, &Self::profile_path(profile), params)
            .await?;

        if response.failed() {
            return Err(AppError::DiscountWasNotApplied {
                status: response.status_code(),
            });
        }

        info!("Discount #{} applied to profile #{}", self.id(), profile.profile_id());
        Ok(true)
    }

    /// Detaches the discount from `profile`. Failure is reported as `false`.
    pub async fn detach_from(&self, profile: &BillingProfile) -> Res<bool> {
        let params = RequestParams::form_of(&DiscountAttachRequest {
            discount_id: self.id(),
            apply_till: None,
        })?;

        let response = self
            .api
            .request(Method::DELETE, &Self::profile_path(profile), params)
            .await?;

        if response.failed() {
            warn!(
                "Discount #{} was not detached from profile #{} (status {})",
                self.id(),
                profile.profile_id(),
                response.status_code()
            );
            return Ok(false);
        }

        Ok(true)
    }
}

/// Creates and looks up discounts.
pub struct DiscountsManager {
    api: Api,
}

impl DiscountsManager {
    pub fn new(api: Api) -> Self {
        DiscountsManager { api }
    }

    /// Creates a discount.
    ///
    /// # Arguments
    ///
    /// * `attributes` - Discount attributes; `max_value` defaults to `value`.
    /// * `apply_to` - Ids of the profiles to attach the discount to right away.
    /// * `active_till` - Date the discount stops being available.
    pub async fn create(
        &self,
        attributes: &NewDiscount,
        apply_to: &[i64],
        active_till: Option<&str>,
    ) -> Res<Discount> {
        let kind = require(&attributes.kind, "type")?;
        let discount_type = require(&attributes.discount_type, "discount_type")?;
        let entity_type = require(&attributes.entity_type, "entity_type")?;
        let entity_id = *require(&attributes.entity_id, "entity_id")?;
        let value = *require(&attributes.value, "value")?;

        let params = RequestParams::form_of(&DiscountCreateRequest {
            kind,
            discount_type,
            entity_type,
            entity_id,
            value,
            max_value: attributes.max_value.unwrap_or(value),
            apply_to,
            active_till,
        })?;

        let response = self.api.request(Method::POST, "/discounts", params).await?;

        if response.failed() {
            return Err(AppError::DiscountWasNotCreated {
                status: response.status_code(),
            });
        }

        let discount = Discount::new(self.api.clone(), response.data_record()?);
        info!("Discount #{} created for {} #{}", discount.id(), entity_type, entity_id);
        Ok(discount)
    }

    /// All discounts; empty when the service cannot list them.
    pub async fn get(&self) -> Res<Vec<Discount>> {
        let response = self
            .api
            .request(Method::GET, "/discounts", RequestParams::none())
            .await?;

        if response.failed() {
            return Ok(Vec::new());
        }

        let discounts: Vec<DiscountData> = response.data_list()?;

        Ok(discounts
            .into_iter()
            .map(|data| Discount::new(self.api.clone(), data))
            .collect())
    }

    pub async fn find(&self, discount_id: i64) -> Res<Option<Discount>> {
        let response = self
            .api
            .request(
                Method::GET,
                &format!("/discounts/{}", discount_id),
                RequestParams::none(),
            )
            .await?;

        if response.failed() {
            return Ok(None);
        }

        Ok(Some(Discount::new(self.api.clone(), response.data_record()?)))
    }
}
