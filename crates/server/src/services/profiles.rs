//! Account profiles and the one-time template choice.

use chrono::Utc;
use serde_json::json;
use tezweb_core::{
    AccountStatus, DesignConfig, OwnerId, SiteSeed, TemplateId, UserProfile,
    generate_design_config, templates,
};
use tracing::{info, instrument};

use crate::db::{DocPath, DocumentStore, run_transaction};
use crate::error::AppError;

/// Service for profile documents at `users/{uid}`.
pub struct ProfileService<'a, S> {
    store: &'a S,
    attempts: u32,
}

impl<'a, S: DocumentStore> ProfileService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S, attempts: u32) -> Self {
        Self { store, attempts }
    }

    /// Create a trial profile on first sign-in, or refresh contact details.
    ///
    /// A blank or missing `full_name` keeps the stored name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` on store failure.
    #[instrument(skip(self, phone, full_name))]
    pub async fn upsert(
        &self,
        owner: &OwnerId,
        phone: Option<String>,
        full_name: Option<String>,
    ) -> Result<UserProfile, AppError> {
        let full_name = full_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        run_transaction(self.store, self.attempts, |tx| {
            let owner = owner.clone();
            let phone = phone.clone();
            let full_name = full_name.clone();
            Box::pin(async move {
                let path = DocPath::profile(&owner);
                let profile = match tx.get_as::<UserProfile>(&path).await? {
                    None => {
                        info!(owner = %owner, "Creating trial profile");
                        UserProfile::new_trial(owner, phone, full_name, Utc::now())
                    }
                    Some(mut profile) => {
                        profile.phone = phone;
                        if full_name.is_some() {
                            profile.full_name = full_name;
                        }
                        profile.status = AccountStatus::Active;
                        profile
                    }
                };

                tx.set(&path, &profile)?;
                Ok(profile)
            })
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the profile does not exist.
    #[instrument(skip(self))]
    pub async fn get(&self, owner: &OwnerId) -> Result<UserProfile, AppError> {
        self.store
            .get(&DocPath::profile(owner))
            .await?
            .ok_or_else(|| not_found(owner))?
            .decode()
            .map_err(AppError::from)
    }

    /// Record the owner's template choice. Only the first choice sticks.
    ///
    /// Returns `false` without writing if a template was already selected.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown template and
    /// `AppError::NotFound` if the profile does not exist.
    #[instrument(skip(self))]
    pub async fn select_template(
        &self,
        owner: &OwnerId,
        template: &TemplateId,
    ) -> Result<bool, AppError> {
        if templates::find(template.as_str()).is_none() {
            return Err(AppError::BadRequest(format!("unknown template: {template}")));
        }

        let selected = run_transaction(self.store, self.attempts, |tx| {
            let owner = owner.clone();
            let template = template.clone();
            Box::pin(async move {
                let path = DocPath::profile(&owner);
                let profile: UserProfile = tx
                    .get_as(&path)
                    .await?
                    .ok_or_else(|| not_found(&owner))?;

                if profile.template_id.is_some() {
                    return Ok::<_, AppError>(false);
                }

                tx.update(
                    &path,
                    json!({
                        "templateId": template,
                        "templateSelectedAt": Utc::now(),
                    }),
                );
                Ok(true)
            })
        })
        .await?;

        if selected {
            info!("Template selected");
        }
        Ok(selected)
    }

    /// Store a design config on the profile.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the profile does not exist.
    #[instrument(skip(self, config), fields(seed = %config.seed))]
    pub async fn save_design_config(
        &self,
        owner: &OwnerId,
        config: &DesignConfig,
    ) -> Result<(), AppError> {
        run_transaction(self.store, self.attempts, |tx| {
            let owner = owner.clone();
            let config = config.clone();
            Box::pin(async move {
                let path = DocPath::profile(&owner);
                if tx.get(&path).await?.is_none() {
                    return Err(not_found(&owner));
                }

                tx.update(
                    &path,
                    json!({
                        "designConfig": config,
                        "designUpdatedAt": Utc::now(),
                    }),
                );
                Ok(())
            })
        })
        .await
    }

    /// Generate the design for the owner's selected template and store it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the profile does not exist and
    /// `AppError::BadRequest` if no template has been selected yet.
    #[instrument(skip(self))]
    pub async fn generate_design(&self, owner: &OwnerId) -> Result<DesignConfig, AppError> {
        let profile = self.get(owner).await?;
        let template = profile.template_id.ok_or_else(|| {
            AppError::BadRequest("select a template before generating a design".to_string())
        })?;

        let seed = SiteSeed::for_owner(owner, &template);
        let config = generate_design_config(seed.as_str(), &template);
        self.save_design_config(owner, &config).await?;
        Ok(config)
    }
}

fn not_found(owner: &OwnerId) -> AppError {
    AppError::NotFound(format!("profile {owner}"))
}
