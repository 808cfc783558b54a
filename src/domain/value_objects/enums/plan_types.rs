use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Advertising,
    Video,
    Lives,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Advertising => "advertising",
            PlanType::Video => "video",
            PlanType::Lives => "lives",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "advertising" => Some(PlanType::Advertising),
            "video" => Some(PlanType::Video),
            "lives" => Some(PlanType::Lives),
            _ => None,
        }
    }
}

impl Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvertisingType {
    Product,
    Banner,
}

impl AdvertisingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvertisingType::Product => "product",
            AdvertisingType::Banner => "banner",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "product" => Some(AdvertisingType::Product),
            "banner" => Some(AdvertisingType::Banner),
            _ => None,
        }
    }
}

impl Display for AdvertisingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VideoMode {
    VideoCount,
    TimePool,
}

impl VideoMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoMode::VideoCount => "video_count",
            VideoMode::TimePool => "time_pool",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "video_count" => Some(VideoMode::VideoCount),
            "time_pool" => Some(VideoMode::TimePool),
            _ => None,
        }
    }
}

impl Display for VideoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
