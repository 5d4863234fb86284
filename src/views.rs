//! HTML rendering
//!
//! Templates are embedded at compile time. Names end in `.html` so minijinja
//! auto-escapes every interpolated value.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::models::{field_columns, CustomerForm, PredictionOutcome};

const TITLE: &str = "Telecom Customer Churn Prediction";

/// Result area of the form page
#[derive(Debug, Serialize)]
pub struct ResultView {
    pub headline: &'static str,
    pub sentence: String,
    pub churns: bool,
    pub probability: Option<String>,
}

impl From<&PredictionOutcome> for ResultView {
    fn from(outcome: &PredictionOutcome) -> Self {
        Self {
            headline: outcome.verdict.headline(),
            sentence: outcome.verdict.sentence(),
            churns: outcome.verdict.churns(),
            probability: outcome.probability_display(),
        }
    }
}

/// Everything the form page shows besides the fields themselves
#[derive(Debug, Default)]
pub struct FormPage<'a> {
    pub values: Option<&'a CustomerForm>,
    pub field_errors: Vec<String>,
    pub prediction_error: Option<String>,
    pub result: Option<ResultView>,
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../templates/base.html"))?;
        env.add_template("index.html", include_str!("../templates/index.html"))?;
        env.add_template("unavailable.html", include_str!("../templates/unavailable.html"))?;
        Ok(Self { env })
    }

    /// Form page, optionally with validation errors or a result
    pub fn form(&self, model_name: &str, page: FormPage<'_>) -> Result<String, minijinja::Error> {
        let defaults = CustomerForm::default();
        let values = page.values.unwrap_or(&defaults);

        self.env.get_template("index.html")?.render(context! {
            title => TITLE,
            model_name => model_name,
            columns => field_columns(),
            values => values,
            field_errors => page.field_errors,
            prediction_error => page.prediction_error,
            result => page.result,
        })
    }

    /// Blocking page shown when no model could be loaded
    pub fn unavailable(&self, message: &str) -> Result<String, minijinja::Error> {
        self.env.get_template("unavailable.html")?.render(context! {
            title => TITLE,
            message => message,
        })
    }
}
