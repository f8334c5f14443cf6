mod access;
mod common;
mod layouts;

pub use access::{
    AccessDecisionResponse, AccessProfileResponse, EvaluateAccessRequest, FilterSectionsRequest,
    MaskValueRequest, MaskValueResponse,
};
pub use common::HealthResponse;
pub use layouts::{LayoutDeletedResponse, LayoutQuery};
