//! Dataset Records
//!
//! Typed shapes of the exported datasets. Every field is defaulted so that a
//! partially populated export still decodes; pages decide what is missing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tabular record as consumed by charts and tables
pub type Row = Map<String, Value>;

/// Dataset file names
pub mod names {
    pub const KPIS: &str = "kpis.json";
    pub const POSTS: &str = "posts.json";
    pub const WEEKLY_POSTS: &str = "weekly_posts.json";
    pub const TOP_POSTS: &str = "top_posts.json";
    pub const FOLLOWERS: &str = "followers.json";
    pub const ENGAGEMENT_DAILY: &str = "engagement_daily.json";
    pub const ENGAGER_SUMMARY: &str = "engager_summary.json";
    pub const WEEKLY_ICP: &str = "weekly_icp.json";
    pub const ENRICHED_REACTIONS: &str = "enriched_reactions.json";
    pub const WEEKLY_SHARE: &str = "weekly_share.json";
    pub const ICP_FIRST_SEEN: &str = "icp_first_seen.json";
    pub const CONTACTS_ICP: &str = "contacts_icp.json";
    pub const DEMOGRAPHICS: &str = "demographics.json";

    /// Every dataset the dashboard pages read
    pub const ALL: [&str; 13] = [
        KPIS,
        POSTS,
        WEEKLY_POSTS,
        TOP_POSTS,
        FOLLOWERS,
        ENGAGEMENT_DAILY,
        ENGAGER_SUMMARY,
        WEEKLY_ICP,
        ENRICHED_REACTIONS,
        WEEKLY_SHARE,
        ICP_FIRST_SEEN,
        CONTACTS_ICP,
        DEMOGRAPHICS,
    ];
}

/// Headline numbers (`kpis.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Kpis {
    pub impressions_total: f64,
    pub members_reached: f64,
    pub total_posts: f64,
    pub total_engagements: f64,
    pub icp_contacts: f64,
    pub unique_engagers: f64,
    pub icp_engagers: f64,
    pub latest_followers: f64,
    pub new_followers: f64,
    pub start_followers: f64,
    pub avg_engagement_rate: f64,
    pub avg_impressions: f64,
    pub avg_engagements_per_post: f64,
    pub total_contacts: Option<f64>,
    pub service_start_date: Option<String>,
}

/// One published post (`posts.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Post {
    pub post_url: Option<String>,
    pub post_id: Option<Value>,
    pub engagements: f64,
    pub impressions: f64,
    pub comments: Option<f64>,
    pub reposts: Option<f64>,
    pub reactions: Option<f64>,
    pub engagement_rate: Option<f64>,
    pub post_format: Option<String>,
    pub posted_at: Option<String>,
    pub week: Option<String>,
    pub text: Option<String>,
}

/// Weekly post roll-up (`weekly_posts.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeeklyPosts {
    pub week: String,
    pub num_posts: f64,
    pub total_impressions: f64,
    pub total_engagements: f64,
    pub avg_impressions: f64,
    pub avg_engagements: f64,
    pub avg_rate: f64,
}

/// Before/after top post (`top_posts.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TopPost {
    pub period: String,
    pub impressions: f64,
}

/// Per-person engagement summary (`engager_summary.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Engager {
    pub profile_url: Option<String>,
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub total_engagements: f64,
    pub likes: f64,
    pub comments: f64,
    pub unique_posts: f64,
    pub first_engagement: Option<String>,
    pub last_engagement: Option<String>,
    pub is_icp: bool,
    pub icp_tier: Option<String>,
}

impl Engager {
    /// Engagers that matched no contact carry the `Unknown` tier
    pub fn is_unknown_contact(&self) -> bool {
        self.icp_tier.as_deref() == Some("Unknown")
    }
}

/// Weekly ICP activity (`weekly_icp.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeeklyIcp {
    pub week: String,
    pub icp_engagements: f64,
    pub unique_icp_engagers: f64,
}

/// Weekly engagement split by audience category (`weekly_share.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeeklyShare {
    pub week: String,
    pub category: String,
    pub engagements: f64,
}

/// First engagement of each ICP contact (`icp_first_seen.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IcpFirstSeen {
    pub profile_url: Option<String>,
    pub first_engagement: Option<String>,
    pub full_name: Option<String>,
    pub company: Option<String>,
}

/// Enriched ICP contact (`contacts_icp.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IcpContact {
    pub name: Option<String>,
    pub profile_url: Option<String>,
    pub title: Option<String>,
    pub country: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub icp_tier: Option<String>,
}

/// Audience demographic share (`demographics.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Demographic {
    #[serde(rename = "Top Demographics")]
    pub category: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

/// Convert typed records into chart/table rows.
///
/// Records that do not serialize to a JSON object are skipped.
pub fn to_rows<T: Serialize>(records: &[T]) -> Vec<Row> {
    records
        .iter()
        .filter_map(|record| match serde_json::to_value(record) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
        .collect()
}

/// Interpret a JSON value as rows, ignoring non-object items
pub fn rows_of(value: &Value) -> Vec<Row> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect()
        })
        .unwrap_or_default()
}

/// Build a row from field/value pairs
pub fn row<I, K>(fields: I) -> Row
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    fields.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
