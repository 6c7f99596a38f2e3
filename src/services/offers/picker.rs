//! 推广方案选择器
//!
//! 每个实验持有一组固定的命名方案，曝光与转化计数均为原子计数器，
//! 不提供持久性保证，也不做显著性检验。

use rand::Rng;
use rand::distr::{Distribution, weighted::WeightedIndex};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::OfferExperimentConfig;
use crate::errors::{AcademyError, Result};
use crate::models::offers::responses::VariantStats;

/// 单次选取的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// 以探索率均匀随机，否则按 weight × (wins + 1) / (impressions + 2) 采样
    Weighted,
    /// 曝光最少的方案，并列时取声明顺序靠前者
    Explore,
    /// 指定方案
    Forced(&'a str),
}

#[derive(Debug)]
pub struct OfferVariant {
    name: String,
    weight: f64,
    impressions: AtomicU64,
    wins: AtomicU64,
}

impl OfferVariant {
    fn new(name: String, weight: f64) -> Self {
        Self {
            name,
            weight,
            impressions: AtomicU64::new(0),
            wins: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn impressions(&self) -> u64 {
        self.impressions.load(Ordering::Relaxed)
    }

    pub fn wins(&self) -> u64 {
        self.wins.load(Ordering::Relaxed)
    }

    fn score(&self) -> f64 {
        let wins = self.wins() as f64;
        let impressions = self.impressions() as f64;
        self.weight * (wins + 1.0) / (impressions + 2.0)
    }

    fn stats(&self) -> VariantStats {
        let impressions = self.impressions();
        let wins = self.wins();
        let win_rate = if impressions == 0 {
            0.0
        } else {
            wins as f64 / impressions as f64
        };
        VariantStats {
            name: self.name.clone(),
            weight: self.weight,
            impressions,
            wins,
            win_rate,
        }
    }
}

fn saturating_increment(counter: &AtomicU64, by: u64) -> u64 {
    let previous = counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
            Some(n.saturating_add(by))
        })
        .unwrap_or_else(|n| n);
    previous.saturating_add(by)
}

#[derive(Debug)]
pub struct OfferExperiment {
    name: String,
    exploration_rate: f64,
    variants: Vec<OfferVariant>,
}

impl OfferExperiment {
    /// 校验配置并构建实验；`default_rate` 为全局探索率
    pub fn from_config(config: &OfferExperimentConfig, default_rate: f64) -> Result<Self> {
        let name = config.name.trim();
        if name.is_empty() {
            return Err(AcademyError::offer_config("experiment name must not be empty"));
        }
        if config.variants.is_empty() {
            return Err(AcademyError::offer_config(format!(
                "experiment '{name}' has no variants"
            )));
        }

        let exploration_rate = config.exploration_rate.unwrap_or(default_rate);
        if !(0.0..=1.0).contains(&exploration_rate) {
            return Err(AcademyError::offer_config(format!(
                "experiment '{name}': exploration_rate must be within [0, 1], got {exploration_rate}"
            )));
        }

        let mut seen = HashSet::new();
        let mut variants = Vec::with_capacity(config.variants.len());
        for variant in &config.variants {
            let variant_name = variant.name.trim();
            if variant_name.is_empty() {
                return Err(AcademyError::offer_config(format!(
                    "experiment '{name}' has a variant without a name"
                )));
            }
            if !seen.insert(variant_name) {
                return Err(AcademyError::offer_config(format!(
                    "experiment '{name}': duplicate variant '{variant_name}'"
                )));
            }
            if !variant.weight.is_finite() || variant.weight <= 0.0 {
                return Err(AcademyError::offer_config(format!(
                    "experiment '{name}': variant '{variant_name}' weight must be positive, got {}",
                    variant.weight
                )));
            }
            variants.push(OfferVariant::new(variant_name.to_string(), variant.weight));
        }

        Ok(Self {
            name: name.to_string(),
            exploration_rate,
            variants,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    pub fn variants(&self) -> &[OfferVariant] {
        &self.variants
    }

    pub fn variant(&self, name: &str) -> Option<&OfferVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// 选取一个方案并计一次曝光；`Forced` 指向未知方案时返回 None
    pub fn pick<R: Rng + ?Sized>(&self, selection: Selection<'_>, rng: &mut R) -> Option<&OfferVariant> {
        let chosen = match selection {
            Selection::Forced(name) => self.variant(name)?,
            Selection::Explore => self.least_shown(),
            Selection::Weighted => self.sample(rng),
        };
        saturating_increment(&chosen.impressions, 1);
        Some(chosen)
    }

    /// 记录一次转化，返回该方案新的转化数
    pub fn record_win(&self, variant: &str) -> Option<u64> {
        self.variant(variant)
            .map(|v| saturating_increment(&v.wins, 1))
    }

    pub fn stats(&self) -> Vec<VariantStats> {
        self.variants.iter().map(OfferVariant::stats).collect()
    }

    /// 用历史事件汇总回填计数
    pub(crate) fn seed(&self, variant: &str, impressions: u64, wins: u64) -> bool {
        match self.variant(variant) {
            Some(v) => {
                saturating_increment(&v.impressions, impressions);
                saturating_increment(&v.wins, wins);
                true
            }
            None => false,
        }
    }

    fn least_shown(&self) -> &OfferVariant {
        // min_by_key 在并列时返回最后一个，这里需要第一个
        let mut best = &self.variants[0];
        for variant in &self.variants[1..] {
            if variant.impressions() < best.impressions() {
                best = variant;
            }
        }
        best
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &OfferVariant {
        if self.variants.len() == 1 {
            return &self.variants[0];
        }
        if rng.random::<f64>() < self.exploration_rate {
            return &self.variants[rng.random_range(0..self.variants.len())];
        }

        let scores: Vec<f64> = self.variants.iter().map(OfferVariant::score).collect();
        match WeightedIndex::new(&scores) {
            Ok(dist) => &self.variants[dist.sample(rng)],
            Err(e) => {
                tracing::warn!(
                    "Offer experiment '{}' has unusable scores ({}), falling back to uniform",
                    self.name,
                    e
                );
                &self.variants[rng.random_range(0..self.variants.len())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OfferVariantConfig;
    use rand::{SeedableRng, rngs::StdRng};

    fn experiment(variants: &[(&str, f64)], exploration_rate: Option<f64>) -> OfferExperiment {
        OfferExperiment::from_config(&config(variants, exploration_rate), 0.1).unwrap()
    }

    fn config(variants: &[(&str, f64)], exploration_rate: Option<f64>) -> OfferExperimentConfig {
        OfferExperimentConfig {
            name: "enrollment_banner".to_string(),
            exploration_rate,
            variants: variants
                .iter()
                .map(|(name, weight)| OfferVariantConfig {
                    name: name.to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }

    #[test]
    fn test_weighted_pick_is_always_a_member() {
        let exp = experiment(&[("a", 1.0), ("b", 2.0), ("c", 0.5)], Some(0.3));
        let names: HashSet<&str> = exp.variants().iter().map(|v| v.name()).collect();
        let mut rng = StdRng::seed_from_u64(7);

        for i in 0..500 {
            let picked = exp.pick(Selection::Weighted, &mut rng).unwrap();
            assert!(names.contains(picked.name()));
            if i % 3 == 0 {
                exp.record_win(picked.name());
            }
        }

        let total: u64 = exp.variants().iter().map(|v| v.impressions()).sum();
        assert_eq!(total, 500);
    }

    #[test]
    fn test_wins_never_decrease() {
        let exp = experiment(&[("a", 1.0), ("b", 1.0)], None);
        let mut last = 0;
        for _ in 0..20 {
            let wins = exp.record_win("a").unwrap();
            assert!(wins > last);
            last = wins;
        }
        assert_eq!(exp.variant("b").unwrap().wins(), 0);
        assert_eq!(exp.record_win("missing"), None);

        exp.variants[0].wins.store(u64::MAX, Ordering::Relaxed);
        assert_eq!(exp.record_win("a"), Some(u64::MAX));
    }

    #[test]
    fn test_explore_is_deterministic() {
        let exp = experiment(&[("a", 5.0), ("b", 1.0), ("c", 1.0)], None);
        let mut rng = StdRng::seed_from_u64(1);

        // 曝光相同则按声明顺序轮转
        let order: Vec<String> = (0..6)
            .map(|_| exp.pick(Selection::Explore, &mut rng).unwrap().name().to_string())
            .collect();
        assert_eq!(order, ["a", "b", "c", "a", "b", "c"]);

        exp.pick(Selection::Forced("a"), &mut rng).unwrap();
        exp.pick(Selection::Forced("b"), &mut rng).unwrap();
        assert_eq!(exp.pick(Selection::Explore, &mut rng).unwrap().name(), "c");
    }

    #[test]
    fn test_forced_pick() {
        let exp = experiment(&[("a", 1.0), ("b", 1.0)], None);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..5 {
            assert_eq!(exp.pick(Selection::Forced("b"), &mut rng).unwrap().name(), "b");
        }
        assert!(exp.pick(Selection::Forced("z"), &mut rng).is_none());
        assert_eq!(exp.variant("b").unwrap().impressions(), 5);
        assert_eq!(exp.variant("a").unwrap().impressions(), 0);
    }

    #[test]
    fn test_weighted_favors_converting_variant() {
        let exp = experiment(&[("a", 1.0), ("b", 1.0)], Some(0.0));
        exp.seed("a", 100, 60);
        exp.seed("b", 100, 2);
        let mut rng = StdRng::seed_from_u64(42);

        let picks_a = (0..200)
            .filter(|_| exp.pick(Selection::Weighted, &mut rng).unwrap().name() == "a")
            .count();
        assert!(picks_a > 150, "picked a {picks_a} times");
    }

    #[test]
    fn test_stats_win_rate() {
        let exp = experiment(&[("a", 1.0), ("b", 1.0)], None);
        exp.seed("a", 4, 1);
        let stats = exp.stats();
        assert_eq!(stats[0].win_rate, 0.25);
        assert_eq!(stats[1].win_rate, 0.0);
        assert!(!exp.seed("missing", 1, 1));
    }

    #[test]
    fn test_config_validation() {
        assert!(OfferExperiment::from_config(&config(&[], None), 0.1).is_err());
        assert!(OfferExperiment::from_config(&config(&[("a", 1.0), ("a", 2.0)], None), 0.1).is_err());
        assert!(OfferExperiment::from_config(&config(&[("a", 0.0)], None), 0.1).is_err());
        assert!(OfferExperiment::from_config(&config(&[("a", f64::NAN)], None), 0.1).is_err());
        assert!(OfferExperiment::from_config(&config(&[("a", 1.0)], Some(1.5)), 0.1).is_err());
        assert!(OfferExperiment::from_config(&config(&[("a", 1.0)], None), -0.1).is_err());

        let exp = OfferExperiment::from_config(&config(&[("a", 1.0)], None), 0.25).unwrap();
        assert_eq!(exp.exploration_rate(), 0.25);
    }
}
