//! # Campaign Catalog
//!
//! In-memory catalog of fundraising campaigns.
//!
//! ## Data
//!
//! - Fixed seed list of 8 campaigns, built once at startup
//! - `raised` is the only field that ever changes, and only ever grows
//! - Nothing is deleted and nothing is persisted
//!
//! ## Filtering
//!
//! Single-select category filter. Filters are never combined; the result
//! always preserves seed order. An empty result is a valid result, not an
//! error.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Closed category set. The lowercase form is canonical and is what the
/// filter controls match against; display capitalization is cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Education,
    Healthcare,
    Hunger,
    Environment,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Healthcare => "healthcare",
            Category::Hunger => "hunger",
            Category::Environment => "environment",
        }
    }

    /// Display label: first character uppercased, rest untouched.
    pub fn label(&self) -> String {
        capitalize(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "education" => Ok(Category::Education),
            "healthcare" => Ok(Category::Healthcare),
            "hunger" => Ok(Category::Hunger),
            "environment" => Ok(Category::Environment),
            _ => Err(AppError::MalformedPayload),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignFilter {
    All,
    Category(Category),
}

impl FromStr for CampaignFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(CampaignFilter::All);
        }

        Ok(CampaignFilter::Category(s.parse()?))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Campaign {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub target: u64,
    pub raised: u64,
    pub icon: String,
    pub image: String,
}

/// Funding progress in percent. Deliberately unclamped: an overfunded
/// campaign reads above 100.
pub fn progress_percent(raised: u64, target: u64) -> f64 {
    raised as f64 / target as f64 * 100.0
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct Catalog {
    campaigns: Vec<Campaign>,
}

impl Catalog {
    pub fn seed() -> Self {
        Self {
            campaigns: seed_campaigns(),
        }
    }

    pub fn all(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// Ordered subsequence matching the filter; seed order is preserved.
    pub fn filtered(&self, filter: CampaignFilter) -> Vec<&Campaign> {
        self.campaigns
            .iter()
            .filter(|campaign| match filter {
                CampaignFilter::All => true,
                CampaignFilter::Category(category) => campaign.category == category,
            })
            .collect()
    }

    pub fn find(&self, id: u32) -> Option<&Campaign> {
        self.campaigns.iter().find(|campaign| campaign.id == id)
    }

    /// Applies a completed donation, returning the new raised total.
    pub fn record_donation(&mut self, id: u32, amount: u64) -> Result<u64, AppError> {
        let campaign = self
            .campaigns
            .iter_mut()
            .find(|campaign| campaign.id == id)
            .ok_or(AppError::CampaignNotFound)?;

        campaign.raised = campaign
            .raised
            .checked_add(amount)
            .ok_or(AppError::AmountOverflow)?;

        Ok(campaign.raised)
    }
}

fn campaign(
    id: u32,
    title: &str,
    description: &str,
    category: Category,
    target: u64,
    raised: u64,
    icon: &str,
    image: &str,
) -> Campaign {
    Campaign {
        id,
        title: title.to_string(),
        description: description.to_string(),
        category,
        target,
        raised,
        icon: icon.to_string(),
        image: image.to_string(),
    }
}

fn seed_campaigns() -> Vec<Campaign> {
    vec![
        campaign(
            1,
            "Education for Rural Children",
            "Help us build schools and provide educational resources for children in remote villages who have no access to quality education.",
            Category::Education,
            50000,
            35000,
            "fas fa-graduation-cap",
            "education",
        ),
        campaign(
            2,
            "Clean Water Initiative",
            "Install water purification systems in communities that lack access to clean drinking water, preventing waterborne diseases.",
            Category::Healthcare,
            75000,
            45000,
            "fas fa-tint",
            "water",
        ),
        campaign(
            3,
            "Food Security Program",
            "Provide nutritious meals and food security training to families struggling with hunger and malnutrition.",
            Category::Hunger,
            30000,
            18000,
            "fas fa-utensils",
            "food",
        ),
        campaign(
            4,
            "Medical Equipment Drive",
            "Supply essential medical equipment to rural clinics and hospitals to improve healthcare access for underserved communities.",
            Category::Healthcare,
            100000,
            65000,
            "fas fa-medkit",
            "medical",
        ),
        campaign(
            5,
            "Environmental Conservation",
            "Plant trees, clean up oceans, and implement sustainable practices to protect our environment for future generations.",
            Category::Environment,
            40000,
            25000,
            "fas fa-leaf",
            "environment",
        ),
        campaign(
            6,
            "Women's Empowerment",
            "Support women's education, skill development, and entrepreneurship programs to create economic opportunities.",
            Category::Education,
            60000,
            40000,
            "fas fa-female",
            "women",
        ),
        campaign(
            7,
            "Disaster Relief Fund",
            "Provide immediate assistance to communities affected by natural disasters with emergency supplies and shelter.",
            Category::Healthcare,
            80000,
            55000,
            "fas fa-hands-helping",
            "disaster",
        ),
        campaign(
            8,
            "Digital Literacy Program",
            "Teach computer skills and digital literacy to bridge the digital divide and create employment opportunities.",
            Category::Education,
            35000,
            22000,
            "fas fa-laptop",
            "digital",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let catalog = Catalog::seed();

        assert_eq!(catalog.all().len(), 8);

        let mut ids: Vec<u32> = catalog.all().iter().map(|c| c.id).collect();
        ids.dedup();
        assert_eq!(ids, (1..=8).collect::<Vec<u32>>());
    }

    #[test]
    fn test_filter_all_preserves_order() {
        let catalog = Catalog::seed();
        let filtered = catalog.filtered(CampaignFilter::All);

        let ids: Vec<u32> = filtered.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = Catalog::seed();
        let filtered = catalog.filtered(CampaignFilter::Category(Category::Education));

        let ids: Vec<u32> = filtered.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 6, 8]);

        for campaign in filtered {
            assert_eq!(campaign.category, Category::Education);
        }
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<CampaignFilter>().unwrap(), CampaignFilter::All);
        assert_eq!(
            "hunger".parse::<CampaignFilter>().unwrap(),
            CampaignFilter::Category(Category::Hunger)
        );
        assert!("sports".parse::<CampaignFilter>().is_err());
        assert!("Education".parse::<CampaignFilter>().is_err());
    }

    #[test]
    fn test_progress_unclamped() {
        assert_eq!(progress_percent(65000, 100000), 65.0);
        assert_eq!(progress_percent(120000, 100000), 120.0);
        assert_eq!(progress_percent(0, 50000), 0.0);
    }

    #[test]
    fn test_category_label() {
        assert_eq!(Category::Education.label(), "Education");
        assert_eq!(Category::Healthcare.label(), "Healthcare");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_record_donation() {
        let mut catalog = Catalog::seed();

        let raised = catalog.record_donation(3, 500).unwrap();
        assert_eq!(raised, 18500);
        assert_eq!(catalog.find(3).unwrap().raised, 18500);

        let progress = progress_percent(18500, catalog.find(3).unwrap().target);
        assert!((progress - 61.666_666_666_666_664).abs() < 1e-9);
    }

    #[test]
    fn test_record_donation_unknown_campaign() {
        let mut catalog = Catalog::seed();

        assert!(matches!(
            catalog.record_donation(99, 500),
            Err(AppError::CampaignNotFound)
        ));
    }

    #[test]
    fn test_record_donation_overflow() {
        let mut catalog = Catalog::seed();
        catalog.record_donation(1, u64::MAX - 35000).unwrap();

        assert!(matches!(
            catalog.record_donation(1, 1),
            Err(AppError::AmountOverflow)
        ));
    }
}
