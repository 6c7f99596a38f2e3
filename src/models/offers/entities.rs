/// 推广方案事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferEventKind {
    Impression,
    Win,
}

impl std::fmt::Display for OfferEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferEventKind::Impression => write!(f, "impression"),
            OfferEventKind::Win => write!(f, "win"),
        }
    }
}

impl std::str::FromStr for OfferEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "impression" => Ok(OfferEventKind::Impression),
            "win" => Ok(OfferEventKind::Win),
            _ => Err(format!("Invalid offer event kind: {s}")),
        }
    }
}

/// 某个方案的历史事件汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferEventTally {
    pub experiment: String,
    pub variant: String,
    pub impressions: u64,
    pub wins: u64,
}
