use tracing::info;

use crate::models::Notice;

/// Sink for transient user-facing notices.
///
/// Presentation (toast, status line, nothing at all) belongs to the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Default notifier that records notices as log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::AlreadyInCart { id, .. } => {
                info!(product_id = %id, notice = %notice.message(), "User notice")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductId;

    #[test]
    fn test_tracing_notifier_accepts_notice() {
        TracingNotifier.notify(&Notice::AlreadyInCart {
            id: ProductId::new(1),
            name: "Helmet".to_string(),
        });
    }
}
