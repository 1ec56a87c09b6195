//! # Subscription
//!
//! The reseller upsell.
//!
//! ## State Machine
//! ```text
//!            payment confirmed
//!   ┌──────┐ ───────────────► ┌──────────┐
//!   │ free │                  │ reseller │ ── upgrade again ──► InvalidSubscriptionTransition
//!   └──────┘ ◄─────────────── └──────────┘
//!               sign-out
//! ```
//!
//! There is no cancellation path while signed in. The payment is simulated by
//! the application shell, which waits and then calls
//! [`crate::Shop::confirm_upgrade`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::SubscriptionStatus;

/// Checks that an upgrade may start from `current`.
///
/// ## Returns
/// The status the upgrade will lead to.
pub fn upgrade(current: SubscriptionStatus) -> CoreResult<SubscriptionStatus> {
    match current {
        SubscriptionStatus::Free => Ok(SubscriptionStatus::Reseller),
        SubscriptionStatus::Reseller => Err(CoreError::InvalidSubscriptionTransition {
            from: SubscriptionStatus::Reseller,
            to: SubscriptionStatus::Reseller,
        }),
    }
}

/// A plan shown in the subscription modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: String,
    pub status: SubscriptionStatus,
    pub name: String,
    pub description: String,
    pub monthly_price: Money,
    pub features: Vec<String>,
    pub is_popular: bool,
}

/// The two plans on offer, free first.
pub fn plans() -> Vec<SubscriptionPlan> {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    vec![
        SubscriptionPlan {
            id: "free".to_string(),
            status: SubscriptionStatus::Free,
            name: "Gratuito".to_string(),
            description: "Para usuários que querem explorar nossos produtos".to_string(),
            monthly_price: Money::zero(),
            features: strings(&[
                "Acesso ao catálogo completo",
                "Programa de fidelidade",
                "Suporte por email",
                "Cupons de desconto",
            ]),
            is_popular: false,
        },
        SubscriptionPlan {
            id: "reseller".to_string(),
            status: SubscriptionStatus::Reseller,
            name: "Revendedor Premium".to_string(),
            description: "Para quem quer ganhar renda extra vendendo nossos produtos".to_string(),
            monthly_price: Money::from_cents(990),
            features: strings(&[
                "Todos os benefícios do plano gratuito",
                "Preços especiais com 20% de desconto",
                "Comissões de até 30% por venda",
                "Dashboard avançado com relatórios",
                "Suporte prioritário 24/7",
                "Material promocional exclusivo",
                "Treinamento e capacitação",
                "Acesso antecipado a novos produtos",
            ]),
            is_popular: true,
        },
    ]
}
