//! Push delivery transport backed by the FCM HTTP v1 API.

pub mod fcm;

pub use fcm::FcmClient;
