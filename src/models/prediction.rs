//! Prediction outcome model

use serde::Serialize;

use crate::pipeline::{ChurnModel, Label, PredictError};

use super::customer::CustomerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LikelyToChurn,
    UnlikelyToChurn,
}

impl Verdict {
    pub fn from_label(label: &Label) -> Self {
        if label.is_affirmative() {
            Verdict::LikelyToChurn
        } else {
            Verdict::UnlikelyToChurn
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Verdict::LikelyToChurn => "LIKELY TO CHURN",
            Verdict::UnlikelyToChurn => "UNLIKELY TO CHURN",
        }
    }

    pub fn sentence(&self) -> String {
        format!("The model predicts this customer is {}.", self.headline())
    }

    pub fn churns(&self) -> bool {
        matches!(self, Verdict::LikelyToChurn)
    }
}

/// Result of one prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub label: Label,
    pub verdict: Verdict,
    /// Probability of the affirmative class in [0, 1], when the model offers one
    pub churn_probability: Option<f64>,
}

impl PredictionOutcome {
    /// Run the model on one record. Blocks until the model returns.
    pub fn compute(model: &dyn ChurnModel, record: &CustomerRecord) -> Result<Self, PredictError> {
        let row = record.to_row();
        let (label, proba) = model.predict_with_proba(&row)?;

        let churn_probability = proba.and_then(|p| affirmative_probability(model.classes(), &p));

        Ok(Self {
            verdict: Verdict::from_label(&label),
            label,
            churn_probability,
        })
    }

    /// Churn probability as a percentage with two decimals, e.g. `"12.34%"`
    pub fn probability_display(&self) -> Option<String> {
        self.churn_probability.map(|p| format!("{:.2}%", p * 100.0))
    }
}

/// Probability of the first affirmative class, clamped to [0, 1]. `None` when
/// no class label is affirmative.
fn affirmative_probability(classes: &[Label], proba: &[f64]) -> Option<f64> {
    let idx = classes.iter().position(Label::is_affirmative)?;
    proba
        .get(idx)
        .filter(|p| p.is_finite())
        .map(|p| p.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::{ContractType, Gender, InternetService, PaymentMethod, YesNo};
    use crate::pipeline::{FeatureRow, PipelineModel};

    struct FixedModel {
        classes: Vec<Label>,
        label: Label,
        proba: Option<Vec<f64>>,
    }

    impl ChurnModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        fn classes(&self) -> &[Label] {
            &self.classes
        }

        fn predict(&self, _row: &FeatureRow) -> Result<Label, PredictError> {
            Ok(self.label.clone())
        }

        fn predict_proba(&self, _row: &FeatureRow) -> Option<Result<Vec<f64>, PredictError>> {
            self.proba.clone().map(Ok)
        }
    }

    fn fixed(classes: Vec<Label>, label: Label, proba: Option<Vec<f64>>) -> FixedModel {
        FixedModel { classes, label, proba }
    }

    fn text(s: &str) -> Label {
        Label::Text(s.to_string())
    }

    fn low_risk() -> CustomerRecord {
        CustomerRecord {
            gender: Gender::Female,
            age: 40,
            tenure: 36,
            contract: ContractType::TwoYear,
            monthly_charges: 45.0,
            internet_service: InternetService::Dsl,
            tech_support: YesNo::Yes,
            online_security: YesNo::Yes,
            payment_method: PaymentMethod::CreditCard,
            complaints: YesNo::No,
            total_charges: 1600.0,
        }
    }

    #[test]
    fn test_verdict_headlines() {
        assert_eq!(Verdict::from_label(&text("Yes")).headline(), "LIKELY TO CHURN");
        assert_eq!(Verdict::from_label(&Label::Number(1.0)).headline(), "LIKELY TO CHURN");
        assert_eq!(Verdict::from_label(&text("No")).headline(), "UNLIKELY TO CHURN");
        assert_eq!(Verdict::from_label(&Label::Number(0.0)).headline(), "UNLIKELY TO CHURN");
        assert_eq!(
            Verdict::LikelyToChurn.sentence(),
            "The model predicts this customer is LIKELY TO CHURN."
        );
    }

    #[test]
    fn test_probability_of_affirmative_class() {
        let model = fixed(vec![text("No"), text("Yes")], text("No"), Some(vec![0.87651, 0.12349]));
        let outcome = PredictionOutcome::compute(&model, &low_risk()).unwrap();
        assert_eq!(outcome.verdict, Verdict::UnlikelyToChurn);
        assert_eq!(outcome.probability_display().as_deref(), Some("12.35%"));

        // affirmative class listed first
        let model = fixed(
            vec![Label::Number(1.0), Label::Number(0.0)],
            Label::Number(1.0),
            Some(vec![0.9, 0.1]),
        );
        let outcome = PredictionOutcome::compute(&model, &low_risk()).unwrap();
        assert!(outcome.verdict.churns());
        assert_eq!(outcome.probability_display().as_deref(), Some("90.00%"));
    }

    #[test]
    fn test_probability_missing_or_out_of_range() {
        let no_proba = fixed(vec![text("No"), text("Yes")], text("Yes"), None);
        let outcome = PredictionOutcome::compute(&no_proba, &low_risk()).unwrap();
        assert_eq!(outcome.verdict, Verdict::LikelyToChurn);
        assert!(outcome.probability_display().is_none());

        let no_affirmative = fixed(vec![text("Stay"), text("Leave")], text("Leave"), Some(vec![0.2, 0.8]));
        let outcome = PredictionOutcome::compute(&no_affirmative, &low_risk()).unwrap();
        assert_eq!(outcome.verdict, Verdict::UnlikelyToChurn);
        assert!(outcome.churn_probability.is_none());

        let sloppy = fixed(vec![text("No"), text("Yes")], text("Yes"), Some(vec![-0.1, 1.1]));
        let outcome = PredictionOutcome::compute(&sloppy, &low_risk()).unwrap();
        assert_eq!(outcome.probability_display().as_deref(), Some("100.00%"));
    }

    #[test]
    fn test_sample_pipeline_end_to_end() {
        let model = PipelineModel::from_json(include_str!("../../fixtures/churn_model_pipeline.json"))
            .unwrap();

        let outcome = PredictionOutcome::compute(&model, &low_risk()).unwrap();
        assert_eq!(outcome.label, text("No"));
        assert_eq!(outcome.verdict.headline(), "UNLIKELY TO CHURN");
        let p = outcome.churn_probability.unwrap();
        assert!((0.0..0.5).contains(&p));

        let high_risk = CustomerRecord {
            gender: Gender::Male,
            age: 25,
            tenure: 2,
            contract: ContractType::MonthToMonth,
            monthly_charges: 95.0,
            internet_service: InternetService::FiberOptic,
            tech_support: YesNo::No,
            online_security: YesNo::No,
            payment_method: PaymentMethod::EWallet,
            complaints: YesNo::Yes,
            total_charges: 190.0,
        };
        let outcome = PredictionOutcome::compute(&model, &high_risk).unwrap();
        assert_eq!(outcome.verdict, Verdict::LikelyToChurn);
        assert!(outcome.churn_probability.unwrap() > 0.5);

        // same input, same answer
        let again = PredictionOutcome::compute(&model, &high_risk).unwrap();
        assert_eq!(outcome, again);
    }
}
