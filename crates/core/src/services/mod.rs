pub mod holdings_service;
pub mod pricing_service;
pub mod valuation_service;
