//! Per-session conversation state carried between dispatcher turns.

use crate::catalog::{DermatologistResult, NearbyProductsResponse, PriceTier};
use crate::location::UserLocation;

/// A question the assistant asked and is waiting on.
///
/// Set by the handler that asks, cleared by the handler that consumes the
/// answer. Never inferred from earlier message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingPrompt {
    #[default]
    None,
    AwaitingDermLocation,
    AwaitingProductLocation {
        tier: Option<PriceTier>,
    },
    AwaitingEmailAddress,
}

impl PendingPrompt {
    pub fn is_location(&self) -> bool {
        matches!(
            self,
            PendingPrompt::AwaitingDermLocation | PendingPrompt::AwaitingProductLocation { .. }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationContext {
    pub pending_prompt: PendingPrompt,
    pub known_location: Option<UserLocation>,
    pub cached_products: Option<NearbyProductsResponse>,
    pub dermatologists: Vec<DermatologistResult>,
    /// Address of the last email attempt, offered again after a failure.
    pub last_email: Option<String>,
}

impl ConversationContext {
    /// Returns the pending prompt and resets it to `None`.
    pub fn take_pending(&mut self) -> PendingPrompt {
        std::mem::take(&mut self.pending_prompt)
    }
}
