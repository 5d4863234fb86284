//! Customer record model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::pipeline::{FeatureRow, FeatureValue};

/// Closed set of options offered by a select box
pub trait Choice: Sized + Copy + 'static {
    const OPTIONS: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::OPTIONS.iter().copied().find(|o| o.as_str() == value)
    }

    fn labels() -> Vec<&'static str> {
        Self::OPTIONS.iter().map(Choice::as_str).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Choice for Gender {
    const OPTIONS: &'static [Self] = &[Gender::Male, Gender::Female];

    fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "Month-to-Month")]
    MonthToMonth,
    #[serde(rename = "One-Year")]
    OneYear,
    #[serde(rename = "Two-Year")]
    TwoYear,
}

impl Choice for ContractType {
    const OPTIONS: &'static [Self] = &[
        ContractType::MonthToMonth,
        ContractType::OneYear,
        ContractType::TwoYear,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ContractType::MonthToMonth => "Month-to-Month",
            ContractType::OneYear => "One-Year",
            ContractType::TwoYear => "Two-Year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InternetService {
    FiberOptic,
    #[serde(rename = "DSL")]
    Dsl,
    No,
}

impl Choice for InternetService {
    const OPTIONS: &'static [Self] = &[
        InternetService::FiberOptic,
        InternetService::Dsl,
        InternetService::No,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            InternetService::FiberOptic => "FiberOptic",
            InternetService::Dsl => "DSL",
            InternetService::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl Choice for YesNo {
    const OPTIONS: &'static [Self] = &[YesNo::Yes, YesNo::No];

    fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    CreditCard,
    EWallet,
}

impl Choice for PaymentMethod {
    const OPTIONS: &'static [Self] = &[
        PaymentMethod::Cash,
        PaymentMethod::BankTransfer,
        PaymentMethod::CreditCard,
        PaymentMethod::EWallet,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::BankTransfer => "BankTransfer",
            PaymentMethod::CreditCard => "CreditCard",
            PaymentMethod::EWallet => "EWallet",
        }
    }
}

/// One customer, as submitted through the form or the JSON API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomerRecord {
    pub gender: Gender,
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: u32,
    #[validate(range(min = 1, max = 72, message = "Tenure must be between 1 and 72 months"))]
    pub tenure: u32,
    pub contract: ContractType,
    #[validate(range(min = 0.0, message = "Monthly Charges cannot be negative"))]
    pub monthly_charges: f64,
    pub internet_service: InternetService,
    pub tech_support: YesNo,
    pub online_security: YesNo,
    pub payment_method: PaymentMethod,
    pub complaints: YesNo,
    #[validate(range(min = 0.0, message = "Total Charges cannot be negative"))]
    pub total_charges: f64,
}

impl Default for CustomerRecord {
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            age: 30,
            tenure: 12,
            contract: ContractType::MonthToMonth,
            monthly_charges: 50.0,
            internet_service: InternetService::FiberOptic,
            tech_support: YesNo::Yes,
            online_security: YesNo::Yes,
            payment_method: PaymentMethod::Cash,
            complaints: YesNo::Yes,
            total_charges: 600.0,
        }
    }
}

impl CustomerRecord {
    /// Flatten into the single-row table the model was trained on
    pub fn to_row(&self) -> FeatureRow {
        let cells: [(&str, FeatureValue); 11] = [
            ("Gender", self.gender.as_str().into()),
            ("Age", self.age.into()),
            ("Tenure_Months", self.tenure.into()),
            ("ContractType", self.contract.as_str().into()),
            ("MonthlyCharges", self.monthly_charges.into()),
            ("InternetService", self.internet_service.as_str().into()),
            ("TechSupport", self.tech_support.as_str().into()),
            ("OnlineSecurity", self.online_security.as_str().into()),
            ("PaymentMethod", self.payment_method.as_str().into()),
            ("Complaints", self.complaints.as_str().into()),
            ("TotalCharges", self.total_charges.into()),
        ];
        cells
            .into_iter()
            .map(|(column, value)| (column.to_string(), value))
            .collect()
    }
}
