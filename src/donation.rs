//! # Donation Dialog
//!
//! Explicit state machine for the donation flow:
//! `Closed -> Open -> Submitting -> Closed`.
//!
//! The session owns what used to be page-global scratch state (current
//! campaign, selected amount, donor fields). The simulated payment gateway
//! sleeps for the configured delay and returns a real outcome; a declined
//! payment leaves the dialog open for correction.
//!
//! ## Stale completions
//!
//! A pending donation carries the session generation at the time it was
//! started. Closing the session bumps the generation, so a completion that
//! fires after the dialog is gone is dropped instead of mutating the
//! catalog behind the user's back.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::{
    catalog::Catalog,
    error::AppError,
    notify::{NoticeKind, Notifier},
};

pub const CLOSING_MESSAGE: &str = "Thank you for making a difference!";
pub const DECLINED_MESSAGE: &str = "Your payment was declined. Please try a smaller amount.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DonationError {
    #[error("Please fill in all required fields.")]
    MissingDonorDetails,

    #[error("Please select a donation amount.")]
    NoAmountSelected,

    #[error("No campaign selected")]
    NoCampaign,
}

impl From<DonationError> for AppError {
    fn from(e: DonationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Closed,
    Open,
    Submitting,
}

/// Preset buttons and the free-form entry are mutually exclusive;
/// selecting one clears the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountChoice {
    #[default]
    None,
    Preset(u64),
    Custom(u64),
}

impl AmountChoice {
    pub fn value(&self) -> u64 {
        match self {
            AmountChoice::None => 0,
            AmountChoice::Preset(amount) | AmountChoice::Custom(amount) => *amount,
        }
    }
}

/// Free-form amount entry; anything that does not parse as a positive
/// number coerces to 0.
pub fn parse_custom_amount(text: &str) -> u64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value as u64,
        _ => 0,
    }
}

/// A submission in flight, tagged with the session generation it belongs
/// to.
#[derive(Debug, Clone)]
pub struct PendingDonation {
    pub generation: u64,
    pub campaign_id: u32,
    pub amount: u64,
    pub donor_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationOutcome {
    Completed,
    Declined,
}

/// Simulated payment gateway: fixed delay, then an outcome. Amounts above
/// the ceiling are declined.
pub async fn process_payment(delay: Duration, amount: u64, ceiling: u64) -> DonationOutcome {
    tokio::time::sleep(delay).await;

    if amount > ceiling {
        DonationOutcome::Declined
    } else {
        DonationOutcome::Completed
    }
}

#[derive(Debug, Default)]
pub struct DonationSession {
    phase: Phase,
    campaign_id: Option<u32>,
    campaign_title: String,
    campaign_description: String,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_message: String,
    amount: AmountChoice,
    generation: u64,
}

impl DonationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn campaign_id(&self) -> Option<u32> {
        self.campaign_id
    }

    /// Dialog header contents, populated on open.
    pub fn campaign_title(&self) -> &str {
        &self.campaign_title
    }

    pub fn campaign_description(&self) -> &str {
        &self.campaign_description
    }

    pub fn selected_amount(&self) -> u64 {
        self.amount.value()
    }

    pub fn amount_choice(&self) -> AmountChoice {
        self.amount
    }

    /// Opens the dialog for a campaign. An unknown id changes nothing.
    pub fn open(&mut self, catalog: &Catalog, id: u32) -> bool {
        let Some(campaign) = catalog.find(id) else {
            return false;
        };

        self.campaign_id = Some(campaign.id);
        self.campaign_title = campaign.title.clone();
        self.campaign_description = campaign.description.clone();
        self.phase = Phase::Open;

        true
    }

    pub fn select_preset(&mut self, amount: u64) {
        if self.phase != Phase::Open {
            return;
        }

        self.amount = AmountChoice::Preset(amount);
    }

    pub fn enter_custom(&mut self, text: &str) {
        if self.phase != Phase::Open || text.is_empty() {
            return;
        }

        self.amount = AmountChoice::Custom(parse_custom_amount(text));
    }

    /// Pre-submission checks, in order: donor details first, then the
    /// amount.
    pub fn validate(&self) -> Result<(), DonationError> {
        if self.donor_name.trim().is_empty() || self.donor_email.trim().is_empty() {
            return Err(DonationError::MissingDonorDetails);
        }

        if self.amount.value() == 0 {
            return Err(DonationError::NoAmountSelected);
        }

        Ok(())
    }

    /// Starts a submission: validates, disables further input by moving to
    /// `Submitting`, and hands back the pending record for the gateway.
    pub fn begin(&mut self) -> Result<PendingDonation, DonationError> {
        let campaign_id = self.campaign_id.ok_or(DonationError::NoCampaign)?;
        self.validate()?;

        self.phase = Phase::Submitting;

        Ok(PendingDonation {
            generation: self.generation,
            campaign_id,
            amount: self.amount.value(),
            donor_name: self.donor_name.clone(),
        })
    }

    /// Applies a gateway outcome. Returns `Ok(false)` when the completion
    /// is stale (the session was closed while the payment was in flight).
    pub fn settle(
        &mut self,
        pending: &PendingDonation,
        outcome: DonationOutcome,
        catalog: &mut Catalog,
        notifier: &mut Notifier,
        now: Instant,
    ) -> Result<bool, AppError> {
        if pending.generation != self.generation {
            return Ok(false);
        }

        self.phase = Phase::Open;

        match outcome {
            DonationOutcome::Completed => {
                catalog.record_donation(pending.campaign_id, pending.amount)?;
                notifier.show(
                    NoticeKind::Success,
                    format!(
                        "Thank you, {}! Your donation of ${} has been processed successfully.",
                        pending.donor_name, pending.amount
                    ),
                    now,
                );
            }
            DonationOutcome::Declined => {
                notifier.show(NoticeKind::Error, DECLINED_MESSAGE, now);
            }
        }

        Ok(true)
    }

    /// The delayed second step after a successful donation: close the
    /// dialog and thank the donor once more.
    pub fn finish(&mut self, notifier: &mut Notifier, now: Instant) {
        self.close(notifier);
        notifier.show(NoticeKind::Success, CLOSING_MESSAGE, now);
    }

    /// Close control, outside click, or Escape. Resets every piece of
    /// transient state and invalidates anything still in flight.
    pub fn close(&mut self, notifier: &mut Notifier) {
        self.phase = Phase::Closed;
        self.campaign_id = None;
        self.campaign_title.clear();
        self.campaign_description.clear();
        self.donor_name.clear();
        self.donor_email.clear();
        self.donor_message.clear();
        self.amount = AmountChoice::None;
        self.generation += 1;
        notifier.clear();
    }
}
