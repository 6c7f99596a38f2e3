use dashmap::DashMap;
use std::sync::Arc;

use super::picker::OfferExperiment;
use crate::config::OffersConfig;
use crate::errors::{AcademyError, Result};
use crate::models::offers::entities::OfferEventTally;

/// 进程内的实验注册表
#[derive(Debug, Default)]
pub struct OfferRegistry {
    experiments: DashMap<String, Arc<OfferExperiment>>,
}

impl OfferRegistry {
    pub fn from_config(config: &OffersConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.exploration_rate) {
            return Err(AcademyError::offer_config(format!(
                "exploration_rate must be within [0, 1], got {}",
                config.exploration_rate
            )));
        }

        let experiments = DashMap::new();
        for exp_config in &config.experiments {
            let experiment = OfferExperiment::from_config(exp_config, config.exploration_rate)?;
            let name = experiment.name().to_string();
            if experiments.insert(name.clone(), Arc::new(experiment)).is_some() {
                return Err(AcademyError::offer_config(format!(
                    "duplicate experiment '{name}'"
                )));
            }
        }

        Ok(Self { experiments })
    }

    pub fn get(&self, name: &str) -> Option<Arc<OfferExperiment>> {
        self.experiments.get(name).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// 用持久化事件汇总回填计数，返回匹配到的方案数
    pub fn seed(&self, tallies: &[OfferEventTally]) -> usize {
        let mut applied = 0;
        for tally in tallies {
            let seeded = self
                .get(&tally.experiment)
                .is_some_and(|exp| exp.seed(&tally.variant, tally.impressions, tally.wins));
            if seeded {
                applied += 1;
            } else {
                tracing::debug!(
                    "Skipping offer events for retired variant {}/{}",
                    tally.experiment,
                    tally.variant
                );
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OfferExperimentConfig, OfferVariantConfig};

    fn offers_config() -> OffersConfig {
        OffersConfig {
            exploration_rate: 0.1,
            experiments: vec![OfferExperimentConfig {
                name: "recruiting_upsell".to_string(),
                exploration_rate: None,
                variants: vec![
                    OfferVariantConfig {
                        name: "highlight_reel".to_string(),
                        weight: 1.0,
                    },
                    OfferVariantConfig {
                        name: "coach_review".to_string(),
                        weight: 1.0,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_from_config_and_seed() {
        let registry = OfferRegistry::from_config(&offers_config()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("missing").is_none());

        let applied = registry.seed(&[
            OfferEventTally {
                experiment: "recruiting_upsell".to_string(),
                variant: "coach_review".to_string(),
                impressions: 12,
                wins: 3,
            },
            OfferEventTally {
                experiment: "recruiting_upsell".to_string(),
                variant: "retired".to_string(),
                impressions: 5,
                wins: 1,
            },
        ]);
        assert_eq!(applied, 1);

        let exp = registry.get("recruiting_upsell").unwrap();
        let coach = exp.variant("coach_review").unwrap();
        assert_eq!((coach.impressions(), coach.wins()), (12, 3));
    }

    #[test]
    fn test_rejects_duplicate_experiments_and_bad_rate() {
        let mut config = offers_config();
        config.experiments.push(config.experiments[0].clone());
        assert!(OfferRegistry::from_config(&config).is_err());

        let mut config = offers_config();
        config.exploration_rate = 2.0;
        assert!(OfferRegistry::from_config(&config).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let registry = OfferRegistry::from_config(&crate::config::AppConfig::get().offers).unwrap();
        assert!(registry.get("enrollment_banner").is_some());
    }
}
