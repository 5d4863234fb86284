//! Customer form - raw submitted values and widget definitions

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::customer::{
    Choice, ContractType, CustomerRecord, Gender, InternetService, PaymentMethod, YesNo,
};

/// Input control for one field
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Select { options: Vec<&'static str> },
    Integer { min: u32, max: u32 },
    Decimal { min: f64 },
}

/// A field as rendered in the form
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub widget: Widget,
}

fn field(name: &'static str, label: &'static str, widget: Widget) -> FieldSpec {
    FieldSpec { name, label, widget }
}

/// Fields in display order: first column, then second column
pub fn field_columns() -> [Vec<FieldSpec>; 2] {
    [
        vec![
            field("gender", "Gender", Widget::Select { options: Gender::labels() }),
            field("age", "Age", Widget::Integer { min: 18, max: 100 }),
            field("tenure", "Tenure in Months", Widget::Integer { min: 1, max: 72 }),
            field("contract", "Contract Type", Widget::Select { options: ContractType::labels() }),
            field("monthly_charges", "Monthly Charges", Widget::Decimal { min: 0.0 }),
        ],
        vec![
            field("internet_service", "Internet Service", Widget::Select { options: InternetService::labels() }),
            field("tech_support", "Tech Support", Widget::Select { options: YesNo::labels() }),
            field("online_security", "Online Security", Widget::Select { options: YesNo::labels() }),
            field("payment_method", "Payment Method", Widget::Select { options: PaymentMethod::labels() }),
            field("complaints", "Complaints", Widget::Select { options: YesNo::labels() }),
            field("total_charges", "Total Charges", Widget::Decimal { min: 0.0 }),
        ],
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Submitted values that did not pass the widget constraints
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} invalid field(s)", .errors.len())]
pub struct FormError {
    pub errors: Vec<FieldError>,
}

impl FormError {
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

impl From<validator::ValidationErrors> for FormError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldError {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is out of range", field)),
                })
            })
            .collect();
        out.sort_by_key(|e| field_position(&e.field));
        FormError { errors: out }
    }
}

fn field_position(name: &str) -> usize {
    field_columns()
        .iter()
        .flatten()
        .position(|f| f.name == name)
        .unwrap_or(usize::MAX)
}

/// Form body as posted by the browser. Values stay as text so the form can be
/// re-rendered exactly as submitted. An absent key reads as blank and is
/// reported as required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub tenure: String,
    #[serde(default)]
    pub contract: String,
    #[serde(default)]
    pub monthly_charges: String,
    #[serde(default)]
    pub internet_service: String,
    #[serde(default)]
    pub tech_support: String,
    #[serde(default)]
    pub online_security: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub complaints: String,
    #[serde(default)]
    pub total_charges: String,
}

impl Default for CustomerForm {
    fn default() -> Self {
        Self::from(&CustomerRecord::default())
    }
}

impl From<&CustomerRecord> for CustomerForm {
    fn from(r: &CustomerRecord) -> Self {
        Self {
            gender: r.gender.as_str().to_string(),
            age: r.age.to_string(),
            tenure: r.tenure.to_string(),
            contract: r.contract.as_str().to_string(),
            monthly_charges: format!("{:.2}", r.monthly_charges),
            internet_service: r.internet_service.as_str().to_string(),
            tech_support: r.tech_support.as_str().to_string(),
            online_security: r.online_security.as_str().to_string(),
            payment_method: r.payment_method.as_str().to_string(),
            complaints: r.complaints.as_str().to_string(),
            total_charges: format!("{:.2}", r.total_charges),
        }
    }
}

/// Collects per-field parse failures so all of them are reported at once
struct Parser {
    errors: Vec<FieldError>,
}

impl Parser {
    fn required<'a>(&mut self, field: &'static str, label: &str, raw: &'a str) -> Option<&'a str> {
        let raw = raw.trim();
        if raw.is_empty() {
            self.errors.push(FieldError {
                field: field.to_string(),
                message: format!("{} is required", label),
            });
            return None;
        }
        Some(raw)
    }

    fn choice<T: Choice>(&mut self, field: &'static str, label: &str, raw: &str) -> Option<T> {
        let raw = self.required(field, label, raw)?;
        let parsed = T::parse(raw);
        if parsed.is_none() {
            self.errors.push(FieldError {
                field: field.to_string(),
                message: format!("{} must be one of: {}", label, T::labels().join(", ")),
            });
        }
        parsed
    }

    fn whole(&mut self, field: &'static str, label: &str, raw: &str) -> Option<u32> {
        let raw = self.required(field, label, raw)?;
        match raw.parse::<i64>() {
            // negatives become 0 so the range check reports them
            Ok(v) => Some(u32::try_from(v.max(0)).unwrap_or(u32::MAX)),
            Err(_) => {
                self.errors.push(FieldError {
                    field: field.to_string(),
                    message: format!("{} must be a whole number", label),
                });
                None
            }
        }
    }

    fn decimal(&mut self, field: &'static str, label: &str, raw: &str) -> Option<f64> {
        let raw = self.required(field, label, raw)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                self.errors.push(FieldError {
                    field: field.to_string(),
                    message: format!("{} must be a number", label),
                });
                None
            }
        }
    }
}

impl CustomerForm {
    /// Parse and range-check the submitted values into a record
    pub fn parse(&self) -> Result<CustomerRecord, FormError> {
        let mut p = Parser { errors: Vec::new() };

        let gender = p.choice::<Gender>("gender", "Gender", &self.gender);
        let age = p.whole("age", "Age", &self.age);
        let tenure = p.whole("tenure", "Tenure in Months", &self.tenure);
        let contract = p.choice::<ContractType>("contract", "Contract Type", &self.contract);
        let monthly = p.decimal("monthly_charges", "Monthly Charges", &self.monthly_charges);
        let internet =
            p.choice::<InternetService>("internet_service", "Internet Service", &self.internet_service);
        let tech = p.choice::<YesNo>("tech_support", "Tech Support", &self.tech_support);
        let security = p.choice::<YesNo>("online_security", "Online Security", &self.online_security);
        let payment = p.choice::<PaymentMethod>("payment_method", "Payment Method", &self.payment_method);
        let complaints = p.choice::<YesNo>("complaints", "Complaints", &self.complaints);
        let total = p.decimal("total_charges", "Total Charges", &self.total_charges);

        let (
            Some(gender),
            Some(age),
            Some(tenure),
            Some(contract),
            Some(monthly_charges),
            Some(internet_service),
            Some(tech_support),
            Some(online_security),
            Some(payment_method),
            Some(complaints),
            Some(total_charges),
        ) = (gender, age, tenure, contract, monthly, internet, tech, security, payment, complaints, total)
        else {
            return Err(FormError { errors: p.errors });
        };

        let record = CustomerRecord {
            gender,
            age,
            tenure,
            contract,
            monthly_charges,
            internet_service,
            tech_support,
            online_security,
            payment_method,
            complaints,
            total_charges,
        };
        record.validate()?;
        Ok(record)
    }
}
