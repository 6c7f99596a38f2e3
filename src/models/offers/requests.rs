use serde::Deserialize;
use ts_rs::TS;

/// 选取方式
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/offer.ts")]
pub enum PickMode {
    #[default]
    Weighted,
    Explore,
    Forced,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offer.ts")]
pub struct PickOfferRequest {
    #[serde(default)]
    pub mode: PickMode,
    /// `forced` 模式下必填
    pub variant: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/offer.ts")]
pub struct RecordWinRequest {
    pub variant: String,
}
