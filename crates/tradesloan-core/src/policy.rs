//! Lending policy configuration.
//!
//! Every figure that a lender or a tax change could move lives here rather
//! than in the calculation code: product base rates and terms, rate clamp
//! bands, lease and contract-hire cost ratios, the recommendation thresholds
//! and the capital-allowance rules. `PolicyConfig::default()` carries the
//! published figures; a partial YAML/JSON document overrides individual
//! fields.
//!
//! The lease residual and contract-hire ratios are empirical and awaiting
//! business-owner confirmation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TradesLoanError;
use crate::types::{FinanceProduct, Money, Percent, Ratio};
use crate::TradesLoanResult;

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

/// Inclusive band an adjusted rate is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBand {
    pub floor: Percent,
    pub ceiling: Percent,
}

impl RateBand {
    pub const fn new(floor: Percent, ceiling: Percent) -> Self {
        RateBand { floor, ceiling }
    }

    pub fn clamp(&self, rate: Percent) -> Percent {
        rate.max(self.floor).min(self.ceiling)
    }

    pub fn contains(&self, rate: Percent) -> bool {
        rate >= self.floor && rate <= self.ceiling
    }
}

/// Pricing and sizing terms for an amortising product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTerms {
    pub base_rate: Percent,
    /// Term used when sizing the maximum borrowable amount.
    pub term_months: u32,
    /// Share of the comfortable payment this product may absorb.
    pub payment_scale: Ratio,
    pub rate_band: RateBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeasePolicy {
    /// Residual (balloon) share of the financed amount.
    pub residual_ratio: Ratio,
    /// Percentage points taken off the base rate for the amortised portion.
    pub rate_discount: Percent,
}

impl Default for LeasePolicy {
    fn default() -> Self {
        LeasePolicy {
            residual_ratio: dec!(0.15),
            rate_discount: dec!(0.5),
        }
    }
}

/// Cost-plus contract-hire ratios, each a share of asset value per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractHirePolicy {
    pub depreciation_ratio: Ratio,
    pub service_ratio: Ratio,
    pub margin_ratio: Ratio,
}

impl Default for ContractHirePolicy {
    fn default() -> Self {
        ContractHirePolicy {
            depreciation_ratio: dec!(0.20),
            service_ratio: dec!(0.015),
            margin_ratio: dec!(0.02),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPolicy {
    /// Terms at or above this favour hire purchase outright.
    pub ownership_horizon_months: u32,
    /// Longest term at which a lease can be recommended.
    pub lease_max_term_months: u32,
    /// Lease must cost less than this share of the HP payment.
    pub lease_payment_ratio: Ratio,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        RecommendationPolicy {
            ownership_horizon_months: 48,
            lease_max_term_months: 36,
            lease_payment_ratio: dec!(0.90),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxPolicy {
    /// Annual Investment Allowance cap.
    pub aia_cap: Money,
    /// Flat small-business corporation tax rate.
    pub corporation_tax_rate: Ratio,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        TaxPolicy {
            aia_cap: dec!(1_000_000),
            corporation_tax_rate: dec!(0.25),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub business_loan: ProductTerms,
    pub equipment_finance: ProductTerms,
    pub vehicle_finance: ProductTerms,
    /// Advance against monthly turnover for the revolving invoice facility.
    pub invoice_advance_ratio: Ratio,
    pub lease: LeasePolicy,
    pub contract_hire: ContractHirePolicy,
    pub recommendation: RecommendationPolicy,
    pub tax: TaxPolicy,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            business_loan: ProductTerms {
                base_rate: dec!(9.9),
                term_months: 60,
                payment_scale: Decimal::ONE,
                rate_band: RateBand::new(dec!(4.9), dec!(24.9)),
            },
            equipment_finance: ProductTerms {
                base_rate: dec!(7.9),
                term_months: 60,
                payment_scale: dec!(0.8),
                rate_band: RateBand::new(dec!(4.9), dec!(19.9)),
            },
            vehicle_finance: ProductTerms {
                base_rate: dec!(8.9),
                term_months: 48,
                payment_scale: dec!(0.9),
                rate_band: RateBand::new(dec!(4.9), dec!(19.9)),
            },
            invoice_advance_ratio: dec!(0.8),
            lease: LeasePolicy::default(),
            contract_hire: ContractHirePolicy::default(),
            recommendation: RecommendationPolicy::default(),
            tax: TaxPolicy::default(),
        }
    }
}

impl PolicyConfig {
    /// Annuity terms for a product; `None` for the revolving invoice facility.
    pub fn terms(&self, product: FinanceProduct) -> Option<&ProductTerms> {
        match product {
            FinanceProduct::BusinessLoan => Some(&self.business_loan),
            FinanceProduct::EquipmentFinance => Some(&self.equipment_finance),
            FinanceProduct::VehicleFinance => Some(&self.vehicle_finance),
            FinanceProduct::InvoiceFinance => None,
        }
    }

    pub fn validate(&self) -> TradesLoanResult<()> {
        for (name, terms) in [
            ("business_loan", &self.business_loan),
            ("equipment_finance", &self.equipment_finance),
            ("vehicle_finance", &self.vehicle_finance),
        ] {
            validate_terms(name, terms)?;
        }

        non_negative("invoice_advance_ratio", self.invoice_advance_ratio)?;
        non_negative("lease.residual_ratio", self.lease.residual_ratio)?;
        if self.lease.residual_ratio >= Decimal::ONE {
            return Err(invalid(
                "lease.residual_ratio",
                "Residual must be less than 100% of the financed amount",
            ));
        }
        non_negative("lease.rate_discount", self.lease.rate_discount)?;
        non_negative(
            "contract_hire.depreciation_ratio",
            self.contract_hire.depreciation_ratio,
        )?;
        non_negative("contract_hire.service_ratio", self.contract_hire.service_ratio)?;
        non_negative("contract_hire.margin_ratio", self.contract_hire.margin_ratio)?;
        non_negative(
            "recommendation.lease_payment_ratio",
            self.recommendation.lease_payment_ratio,
        )?;
        non_negative("tax.aia_cap", self.tax.aia_cap)?;
        if self.tax.corporation_tax_rate < Decimal::ZERO
            || self.tax.corporation_tax_rate > Decimal::ONE
        {
            return Err(invalid(
                "tax.corporation_tax_rate",
                "Tax rate must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_terms(name: &str, terms: &ProductTerms) -> TradesLoanResult<()> {
    if terms.rate_band.floor < Decimal::ZERO {
        return Err(invalid(
            &format!("{name}.rate_band.floor"),
            "Rate floor cannot be negative",
        ));
    }
    if terms.rate_band.floor > terms.rate_band.ceiling {
        return Err(invalid(
            &format!("{name}.rate_band"),
            "Rate floor must not exceed the ceiling",
        ));
    }
    if terms.base_rate < Decimal::ZERO {
        return Err(invalid(
            &format!("{name}.base_rate"),
            "Base rate cannot be negative",
        ));
    }
    if terms.term_months == 0 {
        return Err(invalid(
            &format!("{name}.term_months"),
            "Sizing term must be at least one month",
        ));
    }
    non_negative(&format!("{name}.payment_scale"), terms.payment_scale)
}

fn non_negative(field: &str, value: Decimal) -> TradesLoanResult<()> {
    if value < Decimal::ZERO {
        return Err(invalid(field, "Value cannot be negative"));
    }
    Ok(())
}

fn invalid(field: &str, reason: &str) -> TradesLoanError {
    TradesLoanError::InvalidPolicy {
        field: field.into(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        PolicyConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rate_band_clamp() {
        let band = RateBand::new(dec!(4.9), dec!(24.9));
        assert_eq!(band.clamp(dec!(2.0)), dec!(4.9));
        assert_eq!(band.clamp(dec!(12.5)), dec!(12.5));
        assert_eq!(band.clamp(dec!(40)), dec!(24.9));
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut policy = PolicyConfig::default();
        policy.vehicle_finance.rate_band = RateBand::new(dec!(20), dec!(5));
        match policy.validate().unwrap_err() {
            TradesLoanError::InvalidPolicy { field, .. } => {
                assert_eq!(field, "vehicle_finance.rate_band")
            }
            other => panic!("Expected InvalidPolicy, got {other:?}"),
        }
    }

    #[test]
    fn test_full_residual_rejected() {
        let mut policy = PolicyConfig::default();
        policy.lease.residual_ratio = Decimal::ONE;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{ "tax": { "corporation_tax_rate": "0.19" } }"#;
        let policy: PolicyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(policy.tax.corporation_tax_rate, dec!(0.19));
        assert_eq!(policy.tax.aia_cap, dec!(1_000_000));
        assert_eq!(policy.business_loan.base_rate, dec!(9.9));
    }

    #[test]
    fn test_invoice_has_no_annuity_terms() {
        let policy = PolicyConfig::default();
        assert!(policy.terms(FinanceProduct::InvoiceFinance).is_none());
        assert_eq!(
            policy.terms(FinanceProduct::VehicleFinance).unwrap().term_months,
            48
        );
    }
}
