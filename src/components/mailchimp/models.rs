use serde::{Deserialize, Serialize};

/// An audience (recipient list)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingList {
    pub id: String,
    pub name: String,
}

/// One page of `GET /lists`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListsPage {
    #[serde(default)]
    pub lists: Vec<MailingList>,
    #[serde(default)]
    pub total_items: Option<usize>,
}

/// Body of `POST /campaigns`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCampaign {
    #[serde(rename = "type")]
    pub campaign_type: String,
    pub recipients: Recipients,
    pub settings: CampaignSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients {
    pub list_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSettings {
    pub title: String,
    pub subject_line: String,
    pub from_name: String,
    pub reply_to: String,
}

/// A created campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
}

/// Body of `PUT /campaigns/{id}/content`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignContent {
    pub html: String,
    pub plain_text: String,
}
