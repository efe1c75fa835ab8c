// ============================================================================
// Registration Data Model
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Team {
    pub team_name: String,
    /// Absent or empty names are grouped under "General" in reports.
    pub event_name: Option<String>,
    pub event_value: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Organization {
    pub name: String,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Successful,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub organization: Organization,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default)]
    pub convenience_fee: f64,
    #[serde(default)]
    pub grand_total: f64,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a payment confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTransition {
    Confirmed,
    AlreadyConfirmed,
}

impl Registration {
    /// Create the record written at checkout, before the gateway is involved.
    pub fn new_pending(
        organization: Organization,
        teams: Vec<Team>,
        sub_total: f64,
        convenience_fee: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            organization,
            teams,
            sub_total,
            convenience_fee,
            grand_total: sub_total + convenience_fee,
            payment_status: PaymentStatus::Pending,
            order_id: None,
            payment_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Successful
    }

    /// Amount handed to the payment gateway, in the currency's minor unit.
    pub fn amount_in_minor_units(&self) -> i64 {
        (self.grand_total * 100.0).round() as i64
    }

    pub fn attach_order(&mut self, order_id: impl Into<String>) {
        self.order_id = Some(order_id.into());
    }

    /// Mark the registration paid. Only the first confirmation is recorded.
    pub fn confirm_payment(
        &mut self,
        payment_id: impl Into<String>,
        order_id: impl Into<String>,
    ) -> PaymentTransition {
        if self.is_paid() {
            return PaymentTransition::AlreadyConfirmed;
        }
        self.payment_id = Some(payment_id.into());
        self.order_id = Some(order_id.into());
        self.payment_status = PaymentStatus::Successful;
        PaymentTransition::Confirmed
    }

    pub fn member_count(&self) -> usize {
        self.teams.iter().map(|t| t.members.len()).sum()
    }
}

impl Team {
    pub fn event_label(&self) -> &str {
        match self.event_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "General",
        }
    }
}
