//! 评分实体与成绩换算

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 字母等级（美制 4.0 绩点）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
}

// (下限百分比, 等级)，按降序排列
const PERCENTAGE_CUTOFFS: [(f64, LetterGrade); 12] = [
    (97.0, LetterGrade::APlus),
    (93.0, LetterGrade::A),
    (90.0, LetterGrade::AMinus),
    (87.0, LetterGrade::BPlus),
    (83.0, LetterGrade::B),
    (80.0, LetterGrade::BMinus),
    (77.0, LetterGrade::CPlus),
    (73.0, LetterGrade::C),
    (70.0, LetterGrade::CMinus),
    (67.0, LetterGrade::DPlus),
    (63.0, LetterGrade::D),
    (60.0, LetterGrade::DMinus),
];

impl LetterGrade {
    pub fn from_percentage(percentage: f64) -> Self {
        PERCENTAGE_CUTOFFS
            .iter()
            .find(|(cutoff, _)| percentage >= *cutoff)
            .map(|(_, grade)| *grade)
            .unwrap_or(LetterGrade::F)
    }

    /// 4.0 制绩点
    pub fn grade_points(&self) -> f64 {
        match self {
            LetterGrade::APlus | LetterGrade::A => 4.0,
            LetterGrade::AMinus => 3.7,
            LetterGrade::BPlus => 3.3,
            LetterGrade::B => 3.0,
            LetterGrade::BMinus => 2.7,
            LetterGrade::CPlus => 2.3,
            LetterGrade::C => 2.0,
            LetterGrade::CMinus => 1.7,
            LetterGrade::DPlus => 1.3,
            LetterGrade::D => 1.0,
            LetterGrade::DMinus => 0.7,
            LetterGrade::F => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::DMinus => "D-",
            LetterGrade::F => "F",
        }
    }
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LetterGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        PERCENTAGE_CUTOFFS
            .iter()
            .map(|(_, grade)| *grade)
            .chain(std::iter::once(LetterGrade::F))
            .find(|grade| grade.as_str() == upper)
            .ok_or_else(|| format!("Invalid letter grade: {s}"))
    }
}

/// 一次评分的换算结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// 扣除迟交后的得分
    pub points_earned: f64,
    pub percentage: f64,
    pub letter_grade: LetterGrade,
}

/// 根据原始得分计算最终成绩
///
/// 迟交的提交按 `late_deduction` 百分比扣减得分。
pub fn score_submission(
    raw_points: f64,
    points_total: f64,
    is_late: bool,
    late_deduction: f64,
) -> Result<ScoreBreakdown, String> {
    if !points_total.is_finite() || points_total <= 0.0 {
        return Err(format!("points_total must be positive, got {points_total}"));
    }
    if !raw_points.is_finite() || raw_points < 0.0 || raw_points > points_total {
        return Err(format!(
            "points_earned must be within [0, {points_total}], got {raw_points}"
        ));
    }

    // 先乘后除，整数分值与扣分比例下百分比是精确的
    let kept = if is_late {
        100.0 - late_deduction.clamp(0.0, 100.0)
    } else {
        100.0
    };

    let points_earned = raw_points * kept / 100.0;
    let percentage = raw_points * kept / points_total;

    Ok(ScoreBreakdown {
        points_earned,
        percentage,
        letter_grade: LetterGrade::from_percentage(percentage),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub submission_id: i64,
    pub student_id: i64,
    pub assignment_id: i64,
    pub points_earned: f64,
    pub percentage: f64,
    pub letter_grade: LetterGrade,
    pub feedback: Option<String>,
    pub graded_by: i64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_grade_cutoffs() {
        assert_eq!(LetterGrade::from_percentage(100.0), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_percentage(97.0), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_percentage(96.99), LetterGrade::A);
        assert_eq!(LetterGrade::from_percentage(90.0), LetterGrade::AMinus);
        assert_eq!(LetterGrade::from_percentage(85.0), LetterGrade::B);
        assert_eq!(LetterGrade::from_percentage(60.0), LetterGrade::DMinus);
        assert_eq!(LetterGrade::from_percentage(59.9), LetterGrade::F);
        assert_eq!(LetterGrade::from_percentage(0.0), LetterGrade::F);
    }

    #[test]
    fn test_letter_grade_parse() {
        assert_eq!("b+".parse::<LetterGrade>().unwrap(), LetterGrade::BPlus);
        assert_eq!(" F ".parse::<LetterGrade>().unwrap(), LetterGrade::F);
        assert!("E".parse::<LetterGrade>().is_err());
        assert_eq!(
            serde_json::to_string(&LetterGrade::CMinus).unwrap(),
            "\"C-\""
        );
    }

    #[test]
    fn test_grade_points() {
        assert_eq!(LetterGrade::APlus.grade_points(), 4.0);
        assert_eq!(LetterGrade::BMinus.grade_points(), 2.7);
        assert_eq!(LetterGrade::F.grade_points(), 0.0);
    }

    #[test]
    fn test_score_on_time() {
        let s = score_submission(45.0, 50.0, false, 20.0).unwrap();
        assert_eq!(s.points_earned, 45.0);
        assert!((s.percentage - 90.0).abs() < 1e-9);
        assert_eq!(s.letter_grade, LetterGrade::AMinus);
    }

    #[test]
    fn test_score_late_deduction() {
        let s = score_submission(100.0, 100.0, true, 15.0).unwrap();
        assert!((s.points_earned - 85.0).abs() < 1e-9);
        assert_eq!(s.letter_grade, LetterGrade::B);

        // 超出范围的扣分比例被截断
        let s = score_submission(80.0, 100.0, true, 250.0).unwrap();
        assert_eq!(s.points_earned, 0.0);
        assert_eq!(s.letter_grade, LetterGrade::F);
    }

    #[test]
    fn test_score_late_deduction_hits_exact_cutoffs() {
        // 10/10 扣 13% 恰好 87，应为 B+
        let s = score_submission(10.0, 10.0, true, 13.0).unwrap();
        assert_eq!(s.points_earned, 8.7);
        assert_eq!(s.percentage, 87.0);
        assert_eq!(s.letter_grade, LetterGrade::BPlus);

        // 90/100 扣 30% 恰好 63，应为 D
        let s = score_submission(90.0, 100.0, true, 30.0).unwrap();
        assert_eq!(s.points_earned, 63.0);
        assert_eq!(s.percentage, 63.0);
        assert_eq!(s.letter_grade, LetterGrade::D);
    }

    #[test]
    fn test_score_rejects_out_of_range() {
        assert!(score_submission(-1.0, 100.0, false, 0.0).is_err());
        assert!(score_submission(101.0, 100.0, false, 0.0).is_err());
        assert!(score_submission(f64::NAN, 100.0, false, 0.0).is_err());
        assert!(score_submission(1.0, 0.0, false, 0.0).is_err());
    }
}
