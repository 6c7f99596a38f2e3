//! 推广方案事件存储操作

use std::collections::BTreeMap;

use super::SeaOrmStorage;
use crate::entity::offer_events::{ActiveModel, Column, Entity as OfferEvents};
use crate::errors::{AcademyError, Result};
use crate::models::offers::entities::{OfferEventKind, OfferEventTally};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QuerySelect, Set};

impl SeaOrmStorage {
    /// 追加一条事件
    pub async fn record_offer_event_impl(
        &self,
        experiment: &str,
        variant: &str,
        kind: OfferEventKind,
        user_id: Option<i64>,
    ) -> Result<()> {
        let model = ActiveModel {
            experiment: Set(experiment.to_string()),
            variant: Set(variant.to_string()),
            kind: Set(kind.to_string()),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("记录方案事件失败: {e}")))?;

        Ok(())
    }

    /// 按 (experiment, variant) 汇总曝光与转化
    pub async fn aggregate_offer_events_impl(&self) -> Result<Vec<OfferEventTally>> {
        let rows = OfferEvents::find()
            .select_only()
            .column(Column::Experiment)
            .column(Column::Variant)
            .column(Column::Kind)
            .column_as(Column::Id.count(), "total")
            .group_by(Column::Experiment)
            .group_by(Column::Variant)
            .group_by(Column::Kind)
            .into_tuple::<(String, String, String, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("汇总方案事件失败: {e}")))?;

        let mut tallies: BTreeMap<(String, String), OfferEventTally> = BTreeMap::new();
        for (experiment, variant, kind, total) in rows {
            let Ok(kind) = kind.parse::<OfferEventKind>() else {
                tracing::warn!("忽略未知的方案事件类型: {}", kind);
                continue;
            };
            let tally = tallies
                .entry((experiment.clone(), variant.clone()))
                .or_insert_with(|| OfferEventTally {
                    experiment,
                    variant,
                    ..Default::default()
                });
            let total = total.max(0) as u64;
            match kind {
                OfferEventKind::Impression => tally.impressions += total,
                OfferEventKind::Win => tally.wins += total,
            }
        }

        Ok(tallies.into_values().collect())
    }
}
