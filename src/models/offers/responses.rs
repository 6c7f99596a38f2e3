use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offer.ts")]
pub struct PickOfferResponse {
    pub experiment: String,
    pub variant: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offer.ts")]
pub struct RecordWinResponse {
    pub experiment: String,
    pub variant: String,
    pub wins: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offer.ts")]
pub struct VariantStats {
    pub name: String,
    pub weight: f64,
    pub impressions: u64,
    pub wins: u64,
    /// wins / impressions，无曝光时为 0
    pub win_rate: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offer.ts")]
pub struct OfferStatsResponse {
    pub experiment: String,
    pub exploration_rate: f64,
    pub variants: Vec<VariantStats>,
}
