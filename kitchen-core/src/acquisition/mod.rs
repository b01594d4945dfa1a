//! Acquisition: how supply orders and gold turn into ingredients.
//!
//! Vendors convert orders into ingredients probabilistically (expected yield
//! is `orders * rate`); the shop converts gold into ingredients or extra
//! orders deterministically.

pub mod shop;
pub mod vendor;

pub use shop::{OfferKind, OfferRoi, ShopConfig, ShopOffer, ShopRoi, reference_order_cost, shop_roi};
pub use vendor::{AcquisitionModel, CategoryRate, VendorPreset, VendorRates};
