pub mod affordability;
pub mod asset_finance;
pub mod fields;
pub mod loan;
