use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// The document id of an order.
    OrderId
);
string_id!(
    /// The `uid` of a client (the customer making a reservation).
    ClientId
);
string_id!(
    /// The document id of a merchant.
    MerchantId
);

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// One entry in an order's status history.
///
/// The progression is `WAITING_MERCHANT_CONFIRMATION → WAITING_PAYMENT → ON_PROGRESS → (CANCELLED | DONE)`, but
/// nothing here enforces it. Values outside the known set are kept verbatim in [`OrderStatusType::Unrecognized`] so
/// that they survive a round trip through the store and can be echoed back to users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatusType {
    WaitingMerchantConfirmation,
    WaitingPayment,
    OnProgress,
    Cancelled,
    Done,
    Unrecognized(String),
}

impl OrderStatusType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::WaitingMerchantConfirmation => "WAITING_MERCHANT_CONFIRMATION",
            Self::WaitingPayment => "WAITING_PAYMENT",
            Self::OnProgress => "ON_PROGRESS",
            Self::Cancelled => "CANCELLED",
            Self::Done => "DONE",
            Self::Unrecognized(s) => s.as_str(),
        }
    }

    /// `CANCELLED` and `DONE` end a trip. Reaching either clears the client's proximity flag.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Done)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatusType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "WAITING_MERCHANT_CONFIRMATION" => Self::WaitingMerchantConfirmation,
            "WAITING_PAYMENT" => Self::WaitingPayment,
            "ON_PROGRESS" => Self::OnProgress,
            "CANCELLED" => Self::Cancelled,
            "DONE" => Self::Done,
            other => Self::Unrecognized(other.to_string()),
        };
        Ok(status)
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for OrderStatusType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<OrderStatusType> for String {
    fn from(value: OrderStatusType) -> Self {
        match value {
            OrderStatusType::Unrecognized(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

//--------------------------------------        Order       ---------------------------------------------------------
/// A snapshot of an order document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: OrderId,
    pub user_uid: ClientId,
    pub merchant_uid: MerchantId,
    /// Append-only status history. The last element is the current status.
    #[serde(default)]
    pub order_status: Vec<OrderStatusType>,
    /// The time the reservation is for.
    pub order_date: DateTime<Utc>,
}

impl Order {
    pub fn latest_status(&self) -> Option<&OrderStatusType> {
        self.order_status.last()
    }

    pub fn status_count(&self) -> usize {
        self.order_status.len()
    }
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub id: OrderId,
    pub user_uid: ClientId,
    pub merchant_uid: MerchantId,
    pub order_date: DateTime<Utc>,
    /// The first entry in the status history. New reservations start out waiting for the merchant.
    #[serde(default = "initial_status")]
    pub initial_status: OrderStatusType,
}

fn initial_status() -> OrderStatusType {
    OrderStatusType::WaitingMerchantConfirmation
}

impl NewOrder {
    pub fn new<O, C, M>(id: O, user_uid: C, merchant_uid: M, order_date: DateTime<Utc>) -> Self
    where
        O: Into<OrderId>,
        C: Into<ClientId>,
        M: Into<MerchantId>,
    {
        Self {
            id: id.into(),
            user_uid: user_uid.into(),
            merchant_uid: merchant_uid.into(),
            order_date,
            initial_status: initial_status(),
        }
    }

    pub fn into_order(self) -> Order {
        Order {
            id: self.id,
            user_uid: self.user_uid,
            merchant_uid: self.merchant_uid,
            order_status: vec![self.initial_status],
            order_date: self.order_date,
        }
    }
}

//--------------------------------------        Client       ---------------------------------------------------------
/// A snapshot of a client document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default)]
    pub uid: ClientId,
    /// `"latitude,longitude"`. Not validated on the way in.
    #[serde(default)]
    pub location_coordinate: String,
    /// True once a proximity notification has gone out for the current trip.
    #[serde(rename = "nearFCMSent", default)]
    pub near_fcm_sent: bool,
}

impl Client {
    pub fn new<C: Into<ClientId>>(uid: C, location_coordinate: &str) -> Self {
        Self { uid: uid.into(), location_coordinate: location_coordinate.to_string(), near_fcm_sent: false }
    }
}

//--------------------------------------        Merchant       ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    #[serde(default)]
    pub id: MerchantId,
    #[serde(default)]
    pub location_coordinate: String,
}

impl Merchant {
    pub fn new<M: Into<MerchantId>>(id: M, location_coordinate: &str) -> Self {
        Self { id: id.into(), location_coordinate: location_coordinate.to_string() }
    }
}

//--------------------------------------      PushToken       ---------------------------------------------------------
string_id!(
    /// A device registration token for the push-delivery service.
    PushToken
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    Client,
    Merchant,
}

impl Display for OwnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnerKind::Client => write!(f, "client"),
            OwnerKind::Merchant => write!(f, "merchant"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid token owner kind: {0}")]
pub struct ConversionError(String);

impl FromStr for OwnerKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" | "clients" => Ok(Self::Client),
            "merchant" | "merchants" => Ok(Self::Merchant),
            _ => Err(ConversionError(s.to_string())),
        }
    }
}

/// The document that a set of push tokens hangs off.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenOwner {
    Client(ClientId),
    Merchant(MerchantId),
}

impl TokenOwner {
    pub fn new(kind: OwnerKind, id: &str) -> Self {
        match kind {
            OwnerKind::Client => Self::Client(ClientId::from(id)),
            OwnerKind::Merchant => Self::Merchant(MerchantId::from(id)),
        }
    }

    pub fn kind(&self) -> OwnerKind {
        match self {
            Self::Client(_) => OwnerKind::Client,
            Self::Merchant(_) => OwnerKind::Merchant,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Client(id) => id.as_str(),
            Self::Merchant(id) => id.as_str(),
        }
    }
}

impl Display for TokenOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind(), self.id())
    }
}
