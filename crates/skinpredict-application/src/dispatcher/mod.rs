//! Conversation dispatcher.
//!
//! Turns one input (user text or the outcome of an earlier effect) into
//! either an assistant reply or exactly one effect for the caller to run.
//! The caller feeds the effect's outcome back in as a `SystemEvent` until a
//! reply comes out, so a user turn always ends in one assistant message.
//!
//! The dispatcher never performs I/O itself.

pub mod replies;
pub mod rules;

use std::sync::Arc;

use skinpredict_core::analysis::{SkinAnalysisResult, UserProfile};
use skinpredict_core::catalog::{
    DermatologistResult, Localization, NearbyProductsResponse, PriceTier, PriceTierThresholds,
    ProductRecommendation,
};
use skinpredict_core::chat::ChatMessage;
use skinpredict_core::config::SkinPredictConfig;
use skinpredict_core::gateway::GatewayError;
use skinpredict_core::knowledge::KnowledgeBase;
use skinpredict_core::location::{LocationError, LocationPurpose, UserLocation};
use skinpredict_core::session::{ConversationContext, PendingPrompt};

pub use rules::{HelpTopic, Intent, KbTopic, RuleInput, classify};

/// An assistant reply ready to be appended to the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub show_visualization: bool,
    pub suggestions: Vec<String>,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            show_visualization: false,
            suggestions: Vec::new(),
        }
    }

    pub fn with_visualization(mut self) -> Self {
        self.show_visualization = true;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn into_message(self) -> ChatMessage {
        ChatMessage::assistant(self.text, self.show_visualization, self.suggestions)
    }
}

/// Work the caller must do before the conversation can continue.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RequestGeolocation(LocationPurpose),
    FindDermatologists(UserLocation),
    SearchProducts {
        location: UserLocation,
        profile: UserProfile,
        tier: Option<PriceTier>,
    },
    FetchOnlineCatalog {
        country: Option<String>,
        profile: UserProfile,
    },
    SendEmail {
        address: String,
        result: SkinAnalysisResult,
    },
}

/// Outcome of an effect, or a lifecycle notification.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemEvent {
    /// A scan just finished; produce its opening message.
    SummarizeAnalysis,
    LocationResolved {
        purpose: LocationPurpose,
        location: UserLocation,
    },
    LocationFailed {
        purpose: LocationPurpose,
        error: LocationError,
    },
    DermatologistsFound(Vec<DermatologistResult>),
    DermatologistSearchFailed(GatewayError),
    ProductsFound {
        tier: Option<PriceTier>,
        response: NearbyProductsResponse,
    },
    OnlineCatalogFound(Vec<ProductRecommendation>),
    EmailSent {
        address: String,
    },
    EmailFailed {
        address: String,
        error: Option<GatewayError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchInput {
    User(String),
    System(SystemEvent),
}

/// Either a reply or one effect, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Reply(Reply),
    Effect(Effect),
}

impl DispatchOutcome {
    pub fn reply(&self) -> Option<&Reply> {
        match self {
            DispatchOutcome::Reply(reply) => Some(reply),
            DispatchOutcome::Effect(_) => None,
        }
    }

    pub fn effect(&self) -> Option<&Effect> {
        match self {
            DispatchOutcome::Effect(effect) => Some(effect),
            DispatchOutcome::Reply(_) => None,
        }
    }
}

impl From<Reply> for DispatchOutcome {
    fn from(reply: Reply) -> Self {
        DispatchOutcome::Reply(reply)
    }
}

impl From<Effect> for DispatchOutcome {
    fn from(effect: Effect) -> Self {
        DispatchOutcome::Effect(effect)
    }
}

/// The slice of session state a dispatch may read or change.
pub struct TurnState<'a> {
    pub analysis: Option<&'a SkinAnalysisResult>,
    pub is_historical_replay: bool,
    pub context: &'a mut ConversationContext,
}

/// Rule-table dispatcher over the knowledge base.
#[derive(Clone)]
pub struct Dispatcher {
    knowledge: Arc<KnowledgeBase>,
    localization: Localization,
    thresholds: PriceTierThresholds,
    /// Country used for online lookups when the location is unknown.
    default_country: Option<String>,
}

impl Dispatcher {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            knowledge,
            localization: Localization::default(),
            thresholds: PriceTierThresholds::default(),
            default_country: None,
        }
    }

    pub fn from_config(knowledge: Arc<KnowledgeBase>, config: &SkinPredictConfig) -> Self {
        Self {
            knowledge,
            localization: config.localization.clone(),
            thresholds: config.price_tiers.clone(),
            default_country: Some(config.country.clone()).filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn dispatch(&self, input: DispatchInput, turn: &mut TurnState<'_>) -> DispatchOutcome {
        match input {
            DispatchInput::User(text) => self.on_user_text(&text, turn),
            DispatchInput::System(event) => self.on_system_event(event, turn),
        }
    }

    fn on_user_text(&self, text: &str, turn: &mut TurnState<'_>) -> DispatchOutcome {
        // A prompt only applies to the message right after it.
        let pending = turn.context.take_pending();
        let input = RuleInput::new(
            text,
            turn.analysis.is_some(),
            turn.is_historical_replay,
            pending,
        );
        let (intent, rule) = classify(&input);
        tracing::debug!("[Dispatcher] rule '{}' matched: {:?}", rule, intent);

        match intent {
            Intent::ScanGate => replies::scan_gate().into(),
            Intent::Help(HelpTopic::HowItWorks) => replies::how_it_works().into(),
            Intent::Help(HelpTopic::Capabilities) => replies::capabilities().into(),
            Intent::ConfirmDermLocation => {
                Effect::RequestGeolocation(LocationPurpose::Dermatologists).into()
            }
            Intent::ConfirmProductLocation { tier } => {
                Effect::RequestGeolocation(LocationPurpose::Products { tier }).into()
            }
            Intent::DeclineLocation => replies::location_declined().into(),
            Intent::ProvideEmail(address) => self.email(Some(address), turn),
            Intent::FindDermatologist => {
                turn.context.pending_prompt = PendingPrompt::AwaitingDermLocation;
                replies::ask_dermatologist_location().into()
            }
            Intent::FindProducts { tier } => self.products(tier, turn),
            Intent::PriceTier(tier) => self.products(Some(tier), turn),
            Intent::OnlineCatalog => match turn.analysis {
                Some(analysis) => Effect::FetchOnlineCatalog {
                    country: self.country(turn.context),
                    profile: analysis.profile(),
                }
                .into(),
                None => replies::scan_gate().into(),
            },
            Intent::Email(address) => self.email(address, turn),
            Intent::ShowResults => match turn.analysis {
                Some(analysis) => replies::summary(analysis).into(),
                None => replies::scan_gate().into(),
            },
            Intent::KnowledgeBase(topic) => self.knowledge_base(topic, text, turn),
        }
    }

    fn country(&self, context: &ConversationContext) -> Option<String> {
        context
            .known_location
            .as_ref()
            .and_then(|location| location.country.clone())
            .or_else(|| self.default_country.clone())
    }

    /// Cached products first, then a search at a known location, then ask.
    fn products(&self, tier: Option<PriceTier>, turn: &mut TurnState<'_>) -> DispatchOutcome {
        if let Some(cached) = &turn.context.cached_products {
            tracing::debug!("[Dispatcher] Serving {:?} from cached products", tier);
            return replies::products(cached, tier, false).into();
        }

        let Some(analysis) = turn.analysis else {
            return replies::scan_gate().into();
        };

        match &turn.context.known_location {
            Some(location) => Effect::SearchProducts {
                location: location.clone(),
                profile: analysis.profile(),
                tier,
            }
            .into(),
            None => {
                turn.context.pending_prompt = PendingPrompt::AwaitingProductLocation { tier };
                replies::ask_product_location(tier).into()
            }
        }
    }

    fn email(&self, address: Option<String>, turn: &mut TurnState<'_>) -> DispatchOutcome {
        let Some(analysis) = turn.analysis else {
            return replies::scan_gate().into();
        };
        match address {
            Some(address) => Effect::SendEmail {
                address,
                result: analysis.clone(),
            }
            .into(),
            None => {
                turn.context.pending_prompt = PendingPrompt::AwaitingEmailAddress;
                replies::ask_email().into()
            }
        }
    }

    fn knowledge_base(&self, topic: KbTopic, text: &str, turn: &mut TurnState<'_>) -> DispatchOutcome {
        let (skin_type, issues) = match turn.analysis {
            Some(analysis) => (analysis.skin_type_key(), analysis.issue_keys()),
            None => (String::new(), Vec::new()),
        };

        match topic {
            KbTopic::Routine => {
                replies::routine(self.knowledge.get_routine(&skin_type, &issues)).into()
            }
            KbTopic::Products => replies::kb_products(
                self.knowledge.get_product_recommendations(&skin_type, &issues),
            )
            .into(),
            KbTopic::Doctor => {
                turn.context.pending_prompt = PendingPrompt::AwaitingDermLocation;
                replies::ask_dermatologist_location().into()
            }
            KbTopic::General => replies::general(
                self.knowledge.get_general_response(text, &skin_type, &issues),
            )
            .into(),
        }
    }

    fn on_system_event(&self, event: SystemEvent, turn: &mut TurnState<'_>) -> DispatchOutcome {
        tracing::debug!("[Dispatcher] system event: {}", event_name(&event));

        match event {
            SystemEvent::SummarizeAnalysis => match turn.analysis {
                Some(analysis) => replies::summary(analysis).into(),
                None => replies::technical_hiccup().into(),
            },
            SystemEvent::LocationResolved { purpose, location } => {
                turn.context.known_location = Some(location.clone());
                match purpose {
                    LocationPurpose::Dermatologists => Effect::FindDermatologists(location).into(),
                    LocationPurpose::Products { tier } => match turn.analysis {
                        Some(analysis) => Effect::SearchProducts {
                            location,
                            profile: analysis.profile(),
                            tier,
                        }
                        .into(),
                        None => replies::technical_hiccup().into(),
                    },
                }
            }
            SystemEvent::LocationFailed { purpose, error } => {
                tracing::info!("[Dispatcher] location unavailable for {:?}: {}", purpose, error);
                turn.context.pending_prompt = pending_for(purpose);
                replies::location_failed(purpose, &error).into()
            }
            SystemEvent::DermatologistsFound(results) => {
                let reply = if results.is_empty() {
                    replies::no_dermatologists()
                } else {
                    replies::dermatologists_found(&results)
                };
                turn.context.dermatologists = results;
                reply.into()
            }
            SystemEvent::DermatologistSearchFailed(error) => {
                tracing::warn!("[Dispatcher] dermatologist search failed: {}", error);
                turn.context.pending_prompt = PendingPrompt::AwaitingDermLocation;
                replies::dermatologist_search_failed().into()
            }
            SystemEvent::ProductsFound { tier, response } => {
                if response.is_empty() {
                    // Nothing to cache; a later request may search again.
                    return replies::no_products().into();
                }
                let reply = replies::products(&response, tier, false);
                turn.context.cached_products = Some(response);
                reply.into()
            }
            SystemEvent::OnlineCatalogFound(products) => {
                let response =
                    NearbyProductsResponse::from_catalog(products, &self.localization, &self.thresholds);
                if response.is_empty() {
                    return replies::no_products().into();
                }
                let reply = replies::products(&response, None, true);
                turn.context.cached_products = Some(response);
                reply.into()
            }
            SystemEvent::EmailSent { address } => {
                turn.context.last_email = Some(address.clone());
                replies::email_sent(&address).into()
            }
            SystemEvent::EmailFailed { address, error } => {
                if let Some(error) = &error {
                    tracing::warn!("[Dispatcher] email to {} failed: {}", address, error);
                }
                turn.context.pending_prompt = PendingPrompt::AwaitingEmailAddress;
                let reply = replies::email_failed(&address);
                turn.context.last_email = Some(address);
                reply.into()
            }
        }
    }
}

fn pending_for(purpose: LocationPurpose) -> PendingPrompt {
    match purpose {
        LocationPurpose::Dermatologists => PendingPrompt::AwaitingDermLocation,
        LocationPurpose::Products { tier } => PendingPrompt::AwaitingProductLocation { tier },
    }
}

fn event_name(event: &SystemEvent) -> &'static str {
    match event {
        SystemEvent::SummarizeAnalysis => "SummarizeAnalysis",
        SystemEvent::LocationResolved { .. } => "LocationResolved",
        SystemEvent::LocationFailed { .. } => "LocationFailed",
        SystemEvent::DermatologistsFound(_) => "DermatologistsFound",
        SystemEvent::DermatologistSearchFailed(_) => "DermatologistSearchFailed",
        SystemEvent::ProductsFound { .. } => "ProductsFound",
        SystemEvent::OnlineCatalogFound(_) => "OnlineCatalogFound",
        SystemEvent::EmailSent { .. } => "EmailSent",
        SystemEvent::EmailFailed { .. } => "EmailFailed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinpredict_core::analysis::{SkinIssue, SkinTypeAssessment};
    use skinpredict_core::catalog::NearbyProduct;
    use skinpredict_core::location::Coordinates;

    fn analysis() -> SkinAnalysisResult {
        SkinAnalysisResult {
            skin_type: SkinTypeAssessment {
                kind: "Oily".into(),
                confidence: 88.0,
            },
            skin_issues: vec![SkinIssue {
                name: "Acne".into(),
                confidence: 70.0,
            }],
            ai_response: None,
            demographics: None,
            personalized_advice: None,
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(KnowledgeBase::with_seed(3)))
    }

    fn user(
        dispatcher: &Dispatcher,
        text: &str,
        analysis: Option<&SkinAnalysisResult>,
        context: &mut ConversationContext,
    ) -> DispatchOutcome {
        let mut turn = TurnState {
            analysis,
            is_historical_replay: false,
            context,
        };
        dispatcher.dispatch(DispatchInput::User(text.to_string()), &mut turn)
    }

    fn system(
        dispatcher: &Dispatcher,
        event: SystemEvent,
        analysis: Option<&SkinAnalysisResult>,
        context: &mut ConversationContext,
    ) -> DispatchOutcome {
        let mut turn = TurnState {
            analysis,
            is_historical_replay: false,
            context,
        };
        dispatcher.dispatch(DispatchInput::System(event), &mut turn)
    }

    fn cached(tiers: &[(&str, PriceTier)]) -> NearbyProductsResponse {
        let products: Vec<NearbyProduct> = tiers
            .iter()
            .map(|(name, tier)| NearbyProduct {
                product: ProductRecommendation {
                    name: name.to_string(),
                    brand: "Brand".into(),
                    price: "10.00".into(),
                    currency: "USD".into(),
                    ..Default::default()
                },
                price_category: *tier,
                nearby_stores: vec![],
                store_photo_url: None,
            })
            .collect();
        NearbyProductsResponse {
            grouped_by_price: skinpredict_core::catalog::GroupedByPrice::from_products(&products),
            products,
            nearby_stores: vec![],
        }
    }

    #[test]
    fn test_scan_gate_reply() {
        let d = dispatcher();
        let mut context = ConversationContext::default();
        let outcome = user(&d, "Suggest a routine", None, &mut context);

        let reply = outcome.reply().unwrap();
        assert_eq!(
            reply.suggestions,
            vec!["How does this work?", "What can you help with?"]
        );
        assert!(!reply.show_visualization);
    }

    #[test]
    fn test_dermatologist_prompt_then_geolocation() {
        let d = dispatcher();
        let a = analysis();
        let mut context = ConversationContext::default();

        let outcome = user(&d, "Find a dermatologist near me", Some(&a), &mut context);
        assert_eq!(
            outcome.reply().unwrap().suggestions,
            vec!["Yes, share my location", "Not now"]
        );
        assert_eq!(context.pending_prompt, PendingPrompt::AwaitingDermLocation);

        let outcome = user(&d, "Yes, share my location", Some(&a), &mut context);
        assert_eq!(
            outcome,
            DispatchOutcome::Effect(Effect::RequestGeolocation(LocationPurpose::Dermatologists))
        );
        assert_eq!(context.pending_prompt, PendingPrompt::None);

        let location = UserLocation::at(Coordinates::new(0.0, 0.0));
        let outcome = system(
            &d,
            SystemEvent::LocationResolved {
                purpose: LocationPurpose::Dermatologists,
                location: location.clone(),
            },
            Some(&a),
            &mut context,
        );
        assert_eq!(outcome, DispatchOutcome::Effect(Effect::FindDermatologists(location)));
    }

    #[test]
    fn test_unanswered_prompt_expires() {
        let d = dispatcher();
        let a = analysis();
        let mut context = ConversationContext {
            pending_prompt: PendingPrompt::AwaitingDermLocation,
            ..Default::default()
        };
        user(&d, "Suggest a skincare routine", Some(&a), &mut context);
        assert_eq!(context.pending_prompt, PendingPrompt::None);

        // "yes" is now small talk.
        assert!(user(&d, "yes", Some(&a), &mut context).reply().is_some());
    }

    #[test]
    fn test_tier_from_cache_needs_no_effect() {
        let d = dispatcher();
        let a = analysis();
        let mut context = ConversationContext {
            cached_products: Some(cached(&[
                ("Cheap Gel", PriceTier::Budget),
                ("Fancy Serum", PriceTier::Premium),
            ])),
            ..Default::default()
        };

        for _ in 0..2 {
            let outcome = user(&d, "Show budget options", Some(&a), &mut context);
            let reply = outcome.reply().unwrap();
            assert!(reply.text.contains("Cheap Gel"));
            assert!(!reply.text.contains("Fancy Serum"));
        }
    }

    #[test]
    fn test_tier_with_known_location_searches() {
        let d = dispatcher();
        let a = analysis();
        let location = UserLocation::at(Coordinates::new(36.8, 10.2));
        let mut context = ConversationContext {
            known_location: Some(location.clone()),
            ..Default::default()
        };

        let outcome = user(&d, "Show premium options", Some(&a), &mut context);
        assert_eq!(
            outcome,
            DispatchOutcome::Effect(Effect::SearchProducts {
                location,
                profile: a.profile(),
                tier: Some(PriceTier::Premium),
            })
        );
    }

    #[test]
    fn test_tier_without_location_asks_and_remembers_tier() {
        let d = dispatcher();
        let a = analysis();
        let mut context = ConversationContext::default();

        let outcome = user(&d, "Show moderate options", Some(&a), &mut context);
        assert!(outcome.reply().unwrap().text.contains("moderate skincare products"));
        assert_eq!(
            context.pending_prompt,
            PendingPrompt::AwaitingProductLocation {
                tier: Some(PriceTier::Moderate)
            }
        );

        let outcome = user(&d, "sure", Some(&a), &mut context);
        assert_eq!(
            outcome,
            DispatchOutcome::Effect(Effect::RequestGeolocation(LocationPurpose::Products {
                tier: Some(PriceTier::Moderate)
            }))
        );
    }

    #[test]
    fn test_location_failure_rearms_prompt() {
        let d = dispatcher();
        let a = analysis();
        let mut context = ConversationContext::default();

        let outcome = system(
            &d,
            SystemEvent::LocationFailed {
                purpose: LocationPurpose::Dermatologists,
                error: LocationError::PermissionDenied,
            },
            Some(&a),
            &mut context,
        );
        let reply = outcome.reply().unwrap();
        assert!(reply.text.starts_with("Oh no, I couldn't access your location!"));
        assert_eq!(reply.suggestions[0], "Try again");
        assert_eq!(context.pending_prompt, PendingPrompt::AwaitingDermLocation);

        let outcome = user(&d, "Try again", Some(&a), &mut context);
        assert!(outcome.effect().is_some());
    }

    #[test]
    fn test_dermatologists_are_stored() {
        let d = dispatcher();
        let a = analysis();
        let mut context = ConversationContext::default();
        let results = vec![
            DermatologistResult {
                name: "Dr. A".into(),
                ..Default::default()
            },
            DermatologistResult {
                name: "Dr. B".into(),
                ..Default::default()
            },
        ];

        let outcome = system(
            &d,
            SystemEvent::DermatologistsFound(results.clone()),
            Some(&a),
            &mut context,
        );
        assert!(outcome.reply().unwrap().text.contains('2'));
        assert_eq!(context.dermatologists, results);

        let outcome = system(&d, SystemEvent::DermatologistsFound(vec![]), Some(&a), &mut context);
        assert!(outcome.reply().unwrap().text.contains("couldn't find any dermatologists"));
    }

    #[test]
    fn test_email_flow() {
        let d = dispatcher();
        let a = analysis();
        let mut context = ConversationContext::default();

        let outcome = user(&d, "Email me my results", Some(&a), &mut context);
        assert_eq!(
            outcome.reply().unwrap().text,
            "I'd be happy to email your results! What's your email address?"
        );
        assert_eq!(context.pending_prompt, PendingPrompt::AwaitingEmailAddress);

        let outcome = user(&d, "amira@example.com", Some(&a), &mut context);
        assert_eq!(
            outcome,
            DispatchOutcome::Effect(Effect::SendEmail {
                address: "amira@example.com".into(),
                result: a.clone(),
            })
        );

        let outcome = system(
            &d,
            SystemEvent::EmailFailed {
                address: "amira@example.com".into(),
                error: None,
            },
            Some(&a),
            &mut context,
        );
        let chip = outcome.reply().unwrap().suggestions[0].clone();
        assert_eq!(chip, "Email my results to amira@example.com");

        // The retry chip carries the address.
        let outcome = user(&d, &chip, Some(&a), &mut context);
        assert!(matches!(outcome, DispatchOutcome::Effect(Effect::SendEmail { .. })));
    }

    #[test]
    fn test_online_catalog_is_localized_and_cached() {
        let d = Dispatcher::new(Arc::new(KnowledgeBase::with_seed(3)));
        let a = analysis();
        let mut context = ConversationContext::default();

        let outcome = user(&d, "Shop online", Some(&a), &mut context);
        assert!(matches!(
            outcome,
            DispatchOutcome::Effect(Effect::FetchOnlineCatalog { .. })
        ));

        let products = vec![ProductRecommendation {
            name: "Effaclar Duo+".into(),
            brand: "La Roche-Posay".into(),
            price: "85.00".into(),
            currency: "USD".into(),
            ..Default::default()
        }];
        let outcome = system(&d, SystemEvent::OnlineCatalogFound(products), Some(&a), &mut context);
        assert!(outcome.reply().unwrap().text.contains("💎 **Premium options**"));

        let cache = context.cached_products.as_ref().unwrap();
        assert_eq!(cache.tier(PriceTier::Premium).len(), 1);

        // Tier filters now come from the cache.
        let outcome = user(&d, "Show premium options", Some(&a), &mut context);
        assert!(outcome.reply().unwrap().text.contains("Effaclar Duo+"));
    }

    #[test]
    fn test_recommend_uses_knowledge_base() {
        let d = dispatcher();
        let a = analysis();
        let mut context = ConversationContext::default();
        let outcome = user(&d, "Recommend products", Some(&a), &mut context);
        let reply = outcome.reply().unwrap();
        assert!(reply.text.contains("✨ **FOR ACNE**"));
        assert!(reply.text.contains("SUNSCREEN"));
    }

    #[test]
    fn test_summarize_analysis_shows_chart() {
        let d = dispatcher();
        let a = analysis();
        let mut context = ConversationContext::default();
        let outcome = system(&d, SystemEvent::SummarizeAnalysis, Some(&a), &mut context);
        assert!(outcome.reply().unwrap().show_visualization);
    }
}
