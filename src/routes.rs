use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::{
    catalog::{Campaign, CampaignFilter, progress_percent},
    donation::{DonationError, DonationOutcome, process_payment},
    draft::{Draft, clear_draft, load_draft, save_draft},
    error::AppError,
    signup::{AGGREGATE_ERROR, Field, SUCCESS_MESSAGE, SignupForm},
    state::State as AppState,
};

/// Campaign as rendered on a card: raw fields plus the derived display
/// bits (capitalized category label, unclamped progress percent).
#[derive(Serialize)]
pub struct CampaignCard {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub category_label: String,
    pub target: u64,
    pub raised: u64,
    pub progress: f64,
    pub icon: String,
    pub image: String,
}

impl From<&Campaign> for CampaignCard {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: campaign.id,
            title: campaign.title.clone(),
            description: campaign.description.clone(),
            category: campaign.category.as_str().to_string(),
            category_label: campaign.category.label(),
            target: campaign.target,
            raised: campaign.raised,
            progress: progress_percent(campaign.raised, campaign.target),
            icon: campaign.icon.clone(),
            image: campaign.image.clone(),
        }
    }
}

pub async fn campaigns_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filter: CampaignFilter = params
        .get("filter")
        .map(String::as_str)
        .unwrap_or("all")
        .parse()?;

    let catalog = state.catalog.read().await;
    let cards: Vec<CampaignCard> = catalog
        .filtered(filter)
        .into_iter()
        .map(CampaignCard::from)
        .collect();

    Ok(Json(cards))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub donor_name: String,
    pub donor_email: String,
    #[serde(default)]
    pub donor_message: String,
    pub amount: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationReceipt {
    pub campaign_id: u32,
    pub amount: u64,
    pub raised: u64,
    pub progress: f64,
    pub message: String,
    /// How long the client should keep the dialog up before auto-closing.
    pub close_delay_ms: u64,
}

pub async fn donate_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(payload): Json<DonationRequest>,
) -> Result<impl IntoResponse, AppError> {
    {
        let catalog = state.catalog.read().await;
        catalog.find(id).ok_or(AppError::CampaignNotFound)?;
    }

    // donor details are checked before the amount, in that order
    if payload.donor_name.trim().is_empty() || payload.donor_email.trim().is_empty() {
        return Err(DonationError::MissingDonorDetails.into());
    }
    if payload.amount == 0 {
        return Err(DonationError::NoAmountSelected.into());
    }

    let outcome = process_payment(
        state.config.processing_delay,
        payload.amount,
        state.config.max_donation,
    )
    .await;

    #[cfg(feature = "verbose")]
    println!("Gateway outcome for campaign {id}: {outcome:?}");

    if outcome == DonationOutcome::Declined {
        return Err(AppError::PaymentDeclined);
    }

    let mut catalog = state.catalog.write().await;
    let raised = catalog.record_donation(id, payload.amount)?;
    let target = catalog.find(id).ok_or(AppError::CampaignNotFound)?.target;

    Ok(Json(DonationReceipt {
        campaign_id: id,
        amount: payload.amount,
        raised,
        progress: progress_percent(raised, target),
        message: format!(
            "Thank you, {}! Your donation of ${} has been processed successfully.",
            payload.donor_name.trim(),
            payload.amount
        ),
        close_delay_ms: state.config.close_delay.as_millis() as u64,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub newsletter: bool,
    #[serde(default)]
    pub terms: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub redirect: String,
    pub redirect_delay_ms: u64,
}

fn form_from_request(payload: &SignupRequest) -> SignupForm {
    let mut form = SignupForm::new();

    form.input(Field::FirstName, &payload.first_name);
    form.input(Field::LastName, &payload.last_name);
    form.input(Field::Email, &payload.email);
    form.input(Field::Phone, &payload.phone);
    form.input(Field::Password, &payload.password);
    form.input(Field::ConfirmPassword, &payload.confirm_password);
    form.input(Field::UserType, &payload.user_type);
    for interest in &payload.interests {
        form.toggle_interest(interest, true);
    }
    form.set_newsletter(payload.newsletter);
    form.set_terms(payload.terms);

    form
}

pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Response, AppError> {
    let mut form = form_from_request(&payload);

    if !form.validate_all() {
        let errors: HashMap<&str, &str> = form
            .errors()
            .into_iter()
            .map(|(field, message)| (field.name(), message))
            .collect();

        let body = serde_json::json!({
            "message": AGGREGATE_ERROR,
            "errors": errors,
        });

        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response());
    }

    // simulated account creation
    sleep(state.config.processing_delay).await;

    // a successful signup invalidates the auto-saved draft
    let mut connection = state.redis_connection.clone();
    clear_draft(&mut connection).await?;

    Ok(Json(SignupResponse {
        message: SUCCESS_MESSAGE.to_string(),
        redirect: state.config.redirect_location.clone(),
        redirect_delay_ms: state.config.redirect_delay.as_millis() as u64,
    })
    .into_response())
}

pub async fn draft_get_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let mut connection = state.redis_connection.clone();
    let draft = load_draft(&mut connection).await?;

    Ok(Json(draft))
}

pub async fn draft_put_handler(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<Draft>,
) -> Result<impl IntoResponse, AppError> {
    let mut connection = state.redis_connection.clone();
    save_draft(&mut connection, &draft).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn draft_delete_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let mut connection = state.redis_connection.clone();
    clear_draft(&mut connection).await?;

    Ok(StatusCode::NO_CONTENT)
}
