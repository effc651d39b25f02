//! Release lifecycle: request payloads, transition rules, and the service.

pub mod request;
pub mod service;
pub mod transition;

pub use request::{
    AddReleaseRequest, AnnotateTagRequest, ApproveAssetsRequest, EditReleaseRequest,
    RejectAssetsRequest, UploadAssetsRequest, UploadFile,
};
pub use service::ReleaseService;
pub use transition::{ReleaseAction, next_status};
