//! # Notification Feed
//!
//! Newest-first list of messages shown under the bell icon.
//!
//! ## Sources
//! ```text
//! apply_coupon ───────► offer  "🎉 Cupom Aplicado!"
//! complete_purchase ──► order  "✅ Pedido Confirmado!"   (carries bonus points)
//! confirm_upgrade ────► system "🎉 Bem-vindo ao Premium!"
//! first launch ───────► welcome offer + loyalty announcement
//! ```
//!
//! Each source appends exactly one entry. Timestamps are passed in by the
//! caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::{Notification, NotificationKind};

// =============================================================================
// Templates
// =============================================================================

fn build(
    title: &str,
    message: String,
    kind: NotificationKind,
    now: DateTime<Utc>,
) -> Notification {
    Notification {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        message,
        kind,
        read: false,
        created_at: now,
    }
}

/// Offer notification for a successfully applied coupon.
pub fn coupon_applied(code: &str, now: DateTime<Utc>) -> Notification {
    build(
        "🎉 Cupom Aplicado!",
        format!("Cupom {} aplicado com sucesso!", code),
        NotificationKind::Offer,
        now,
    )
}

/// Order notification carrying the bonus points earned.
pub fn order_confirmed(bonus_points: u64, now: DateTime<Utc>) -> Notification {
    build(
        "✅ Pedido Confirmado!",
        format!(
            "Seu pedido foi confirmado e está sendo processado. Você ganhou {} pontos!",
            bonus_points
        ),
        NotificationKind::Order,
        now,
    )
}

/// System notification for a completed reseller upgrade.
pub fn premium_welcome(now: DateTime<Utc>) -> Notification {
    build(
        "🎉 Bem-vindo ao Premium!",
        "Você agora é um Revendedor Premium! Aproveite todos os benefícios.".to_string(),
        NotificationKind::System,
        now,
    )
}

// =============================================================================
// Feed
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationFeed(Vec<Notification>);

impl NotificationFeed {
    /// Wraps a restored list. Order is taken as stored.
    pub fn from_vec(notifications: Vec<Notification>) -> Self {
        NotificationFeed(notifications)
    }

    /// The first-launch feed: welcome coupon offer and loyalty programme.
    pub fn welcome(now: DateTime<Utc>) -> Self {
        NotificationFeed(vec![
            Notification {
                id: "1".to_string(),
                title: "🎉 Bem-vindo à Kaza Tem!".to_string(),
                message: "Aproveite 15% OFF na primeira compra com o cupom BEMVINDO15"
                    .to_string(),
                kind: NotificationKind::Offer,
                read: false,
                created_at: now,
            },
            Notification {
                id: "2".to_string(),
                title: "⭐ Programa de Fidelidade".to_string(),
                message: "Ganhe pontos a cada compra e troque por descontos exclusivos!"
                    .to_string(),
                kind: NotificationKind::System,
                read: false,
                created_at: now,
            },
        ])
    }

    /// Adds a notification at the front.
    pub fn push(&mut self, notification: Notification) {
        self.0.insert(0, notification);
    }

    /// Marks one notification read. Already-read is fine.
    pub fn mark_read(&mut self, id: &str) -> CoreResult<()> {
        let notification = self
            .0
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CoreError::NotificationNotFound(id.to_string()))?;
        notification.read = true;
        Ok(())
    }

    /// Marks everything read, returning how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for notification in self.0.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        changed
    }

    pub fn unread_count(&self) -> usize {
        self.0.iter().filter(|n| !n.read).count()
    }

    /// Newest first.
    pub fn items(&self) -> &[Notification] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_feed() {
        let feed = NotificationFeed::welcome(Utc::now());
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.unread_count(), 2);
        assert!(feed.items()[0].message.contains("BEMVINDO15"));
        assert_eq!(feed.items()[1].kind, NotificationKind::System);
    }

    #[test]
    fn test_push_is_newest_first() {
        let mut feed = NotificationFeed::welcome(Utc::now());
        feed.push(coupon_applied("FRETE50", Utc::now()));
        feed.push(order_confirmed(33, Utc::now()));

        assert_eq!(feed.len(), 4);
        assert_eq!(feed.items()[0].kind, NotificationKind::Order);
        assert!(feed.items()[0].message.contains("33 pontos"));
        assert_eq!(feed.items()[1].message, "Cupom FRETE50 aplicado com sucesso!");
    }

    #[test]
    fn test_mark_read() {
        let mut feed = NotificationFeed::welcome(Utc::now());
        feed.mark_read("1").unwrap();
        assert_eq!(feed.unread_count(), 1);

        // idempotent
        feed.mark_read("1").unwrap();
        assert_eq!(feed.unread_count(), 1);

        assert!(matches!(
            feed.mark_read("missing"),
            Err(CoreError::NotificationNotFound(_))
        ));
    }

    #[test]
    fn test_mark_all_read() {
        let mut feed = NotificationFeed::welcome(Utc::now());
        feed.push(premium_welcome(Utc::now()));
        feed.mark_read("2").unwrap();

        assert_eq!(feed.mark_all_read(), 2);
        assert_eq!(feed.unread_count(), 0);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = coupon_applied("X", Utc::now());
        let b = coupon_applied("X", Utc::now());
        assert_ne!(a.id, b.id);
    }
}
