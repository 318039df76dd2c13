use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format of bill dates.
pub const BILL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(pub String);

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::Accepted => "Accepté",
            Self::Refused => "Refusé",
        }
    }
}

impl FromStr for BillStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "refused" => Ok(Self::Refused),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Expense categories offered by the new bill form. On the wire a bill
/// carries the French label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseType {
    Transports,
    Restaurants,
    Lodging,
    OnlineServices,
    Electronics,
    Equipment,
    OfficeSupplies,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 7] = [
        Self::Transports,
        Self::Restaurants,
        Self::Lodging,
        Self::OnlineServices,
        Self::Electronics,
        Self::Equipment,
        Self::OfficeSupplies,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Transports => "Transports",
            Self::Restaurants => "Restaurants et bars",
            Self::Lodging => "Hôtel et logement",
            Self::OnlineServices => "Services en ligne",
            Self::Electronics => "IT et électronique",
            Self::Equipment => "Equipement et matériel",
            Self::OfficeSupplies => "Fournitures de bureau",
        }
    }
}

impl FromStr for ExpenseType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == s.trim())
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// Session record persisted by the login flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl User {
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            user_type: UserType::Employee,
            email: Some(email.into()),
            status: Some("connected".to_string()),
        }
    }

    pub fn is_employee(&self) -> bool {
        self.user_type == UserType::Employee
    }
}

/// A bill as exchanged with the store.
///
/// `type`, `date` and `status` stay as transmitted and `amount` takes any JSON
/// number, so one odd record does not fail the whole listing. They are
/// normalized when rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BillId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub vat: String,
    #[serde(default)]
    pub pct: i64,
    #[serde(default)]
    pub commentary: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub status: String,
}

impl Bill {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), BILL_DATE_FORMAT).ok()
    }

    pub fn parsed_type(&self) -> Option<ExpenseType> {
        self.expense_type.parse().ok()
    }

    pub fn parsed_status(&self) -> Option<BillStatus> {
        self.status.parse().ok()
    }
}
