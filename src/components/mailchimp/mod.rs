mod campaign;
mod client;
pub mod models;

pub use campaign::{CampaignProfile, CampaignPublisher};
pub use client::MailchimpClient;
pub use models::{Campaign, CampaignContent, CampaignSettings, MailingList, NewCampaign, Recipients};
