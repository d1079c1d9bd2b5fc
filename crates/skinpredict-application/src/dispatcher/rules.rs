//! Intent rules for user text.
//!
//! `RULES` is evaluated top to bottom and the first rule that matches wins.
//! The last rule always matches.

use once_cell::sync::Lazy;
use regex::Regex;
use skinpredict_core::catalog::PriceTier;
use skinpredict_core::session::PendingPrompt;

/// Questions answered before any scan exists.
pub const HOW_DOES_THIS_WORK: &str = "How does this work?";
pub const WHAT_CAN_YOU_HELP_WITH: &str = "What can you help with?";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+")
        .expect("email pattern is a valid regex")
});

const AFFIRMATIONS: &[&str] = &["yes", "yeah", "yep", "sure", "ok", "okay", "allow"];
const AFFIRMING_PHRASES: &[&str] = &["share my location", "try again", "go ahead"];
const DECLINES: &[&str] = &["no", "nope", "later"];
const DECLINING_PHRASES: &[&str] = &["not now", "don't", "do not"];

/// Checked before premium: "inexpensive" contains "expensive".
const BUDGET_WORDS: &[&str] = &["budget", "cheap", "affordable", "inexpensive", "low cost"];
const MODERATE_WORDS: &[&str] = &["moderate", "mid-range", "mid range", "midrange"];
const PREMIUM_WORDS: &[&str] = &["premium", "luxury", "high-end", "high end", "expensive"];

/// Matched as whole words: "restore" is not a store.
const STORE_WORDS: &[&str] = &["store", "stores", "shop", "shops", "buy"];
const PRODUCT_NOUNS: &[&str] = &["product", "products", "skincare"];
const SHOW_VERBS: &[&str] = &["show", "see", "view", "display"];
const RESULT_NOUNS: &[&str] = &["result", "analysis", "chart"];
const KB_TOPIC_WORDS: &[&str] = &["routine", "regimen", "product", "recommend"];

/// Which whitelisted question was asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    HowItWorks,
    Capabilities,
}

/// What the knowledge-base fallback should answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KbTopic {
    Routine,
    Products,
    Doctor,
    General,
}

/// Classified user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ScanGate,
    Help(HelpTopic),
    ConfirmDermLocation,
    ConfirmProductLocation { tier: Option<PriceTier> },
    DeclineLocation,
    ProvideEmail(String),
    FindDermatologist,
    FindProducts { tier: Option<PriceTier> },
    PriceTier(PriceTier),
    OnlineCatalog,
    Email(Option<String>),
    ShowResults,
    KnowledgeBase(KbTopic),
}

/// Everything a rule may look at.
#[derive(Debug, Clone)]
pub struct RuleInput<'a> {
    /// Text as typed, for extracting addresses.
    pub raw: &'a str,
    /// Lowercased and trimmed.
    pub text: String,
    pub has_analysis: bool,
    pub is_historical_replay: bool,
    /// Prompt left by the previous assistant reply.
    pub pending: PendingPrompt,
}

impl<'a> RuleInput<'a> {
    pub fn new(
        raw: &'a str,
        has_analysis: bool,
        is_historical_replay: bool,
        pending: PendingPrompt,
    ) -> Self {
        Self {
            raw,
            text: raw.trim().to_lowercase(),
            has_analysis,
            is_historical_replay,
            pending,
        }
    }

    fn has(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.text.contains(needle))
    }

    fn has_any_word(&self, words: &[&str]) -> bool {
        words.iter().any(|word| has_word(&self.text, word))
    }
}

/// A named matcher in the rule table.
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&RuleInput<'_>) -> Option<Intent>,
}

pub const RULES: &[Rule] = &[
    Rule { name: "scan_gate", matches: scan_gate },
    Rule { name: "help", matches: help },
    Rule { name: "confirm_derm_location", matches: confirm_derm_location },
    Rule { name: "confirm_product_location", matches: confirm_product_location },
    Rule { name: "decline_location", matches: decline_location },
    Rule { name: "provide_email", matches: provide_email },
    Rule { name: "find_dermatologist", matches: find_dermatologist },
    Rule { name: "find_products", matches: find_products },
    Rule { name: "price_tier", matches: price_tier },
    Rule { name: "online_catalog", matches: online_catalog },
    Rule { name: "email", matches: email },
    Rule { name: "show_results", matches: show_results },
    Rule { name: "knowledge_base", matches: knowledge_base },
];

/// Runs the rule table; returns the first match and the rule's name.
pub fn classify(input: &RuleInput<'_>) -> (Intent, &'static str) {
    for rule in RULES {
        if let Some(intent) = (rule.matches)(input) {
            return (intent, rule.name);
        }
    }
    (Intent::KnowledgeBase(KbTopic::General), "knowledge_base")
}

/// Lowercase, trim and drop trailing punctuation.
pub fn normalize_question(text: &str) -> String {
    text.trim()
        .trim_end_matches(['?', '!', '.'])
        .trim()
        .to_lowercase()
}

fn whitelisted(text: &str) -> Option<HelpTopic> {
    let normalized = normalize_question(text);
    if normalized == normalize_question(HOW_DOES_THIS_WORK) {
        Some(HelpTopic::HowItWorks)
    } else if normalized == normalize_question(WHAT_CAN_YOU_HELP_WITH) {
        Some(HelpTopic::Capabilities)
    } else {
        None
    }
}

/// First email address in `text`.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Price tier named in the text, if any.
pub fn tier_in(text: &str) -> Option<PriceTier> {
    let contains_any = |words: &[&str]| words.iter().any(|word| text.contains(word));
    if contains_any(BUDGET_WORDS) {
        Some(PriceTier::Budget)
    } else if contains_any(MODERATE_WORDS) {
        Some(PriceTier::Moderate)
    } else if contains_any(PREMIUM_WORDS) {
        Some(PriceTier::Premium)
    } else {
        None
    }
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

fn affirms(input: &RuleInput<'_>) -> bool {
    input.has_any_word(AFFIRMATIONS) || input.has_any(AFFIRMING_PHRASES)
}

fn scan_gate(input: &RuleInput<'_>) -> Option<Intent> {
    let gated = !input.has_analysis && !input.is_historical_replay && whitelisted(input.raw).is_none();
    gated.then_some(Intent::ScanGate)
}

fn help(input: &RuleInput<'_>) -> Option<Intent> {
    whitelisted(input.raw).map(Intent::Help)
}

fn confirm_derm_location(input: &RuleInput<'_>) -> Option<Intent> {
    (input.pending == PendingPrompt::AwaitingDermLocation && affirms(input))
        .then_some(Intent::ConfirmDermLocation)
}

fn confirm_product_location(input: &RuleInput<'_>) -> Option<Intent> {
    match input.pending {
        PendingPrompt::AwaitingProductLocation { tier } if affirms(input) => {
            Some(Intent::ConfirmProductLocation { tier })
        }
        _ => None,
    }
}

fn decline_location(input: &RuleInput<'_>) -> Option<Intent> {
    let declines = input.has_any_word(DECLINES) || input.has_any(DECLINING_PHRASES);
    (input.pending.is_location() && declines).then_some(Intent::DeclineLocation)
}

fn provide_email(input: &RuleInput<'_>) -> Option<Intent> {
    if input.pending != PendingPrompt::AwaitingEmailAddress {
        return None;
    }
    extract_email(input.raw).map(Intent::ProvideEmail)
}

fn find_dermatologist(input: &RuleInput<'_>) -> Option<Intent> {
    (input.has("dermatologist") && input.has_any(&["near", "find", "local"]))
        .then_some(Intent::FindDermatologist)
}

fn find_products(input: &RuleInput<'_>) -> Option<Intent> {
    let in_store = input.has_any_word(STORE_WORDS);
    let near_me = input.has_any(&["near me", "nearby"]) && input.has_any_word(PRODUCT_NOUNS);
    let wants = in_store || near_me;
    // "Shop online" belongs to the online catalog.
    let online = input.has_any(&["online", "website"]);
    (wants && !online).then(|| Intent::FindProducts {
        tier: tier_in(&input.text),
    })
}

fn price_tier(input: &RuleInput<'_>) -> Option<Intent> {
    tier_in(&input.text).map(Intent::PriceTier)
}

fn online_catalog(input: &RuleInput<'_>) -> Option<Intent> {
    input
        .has_any(&["online", "website"])
        .then_some(Intent::OnlineCatalog)
}

fn email(input: &RuleInput<'_>) -> Option<Intent> {
    let wants = input.has_any(&["email", "send", "mail"]);
    (wants && input.has_analysis).then(|| Intent::Email(extract_email(input.raw)))
}

/// Needs a show verb, and yields to routine or product questions about the results.
fn show_results(input: &RuleInput<'_>) -> Option<Intent> {
    let asks = input.has_any_word(SHOW_VERBS) && input.has_any(RESULT_NOUNS);
    (asks && !input.has_any(KB_TOPIC_WORDS)).then_some(Intent::ShowResults)
}

fn knowledge_base(input: &RuleInput<'_>) -> Option<Intent> {
    let topic = if input.has_any(&["routine", "regimen"]) {
        KbTopic::Routine
    } else if input.has_any(&["product", "recommend"]) {
        KbTopic::Products
    } else if input.has_any(&["doctor", "dermatologist"]) {
        KbTopic::Doctor
    } else {
        KbTopic::General
    };
    Some(Intent::KnowledgeBase(topic))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(text: &str) -> RuleInput<'_> {
        RuleInput::new(text, true, false, PendingPrompt::None)
    }

    fn pending(text: &str, prompt: PendingPrompt) -> RuleInput<'_> {
        RuleInput::new(text, true, false, prompt)
    }

    fn intent(input: &RuleInput<'_>) -> Intent {
        classify(input).0
    }

    #[test]
    fn test_scan_gate_blocks_everything_but_whitelist() {
        let before_scan = |text| RuleInput::new(text, false, false, PendingPrompt::None);

        assert_eq!(intent(&before_scan("Suggest a routine")), Intent::ScanGate);
        assert_eq!(intent(&before_scan("Find a dermatologist near me")), Intent::ScanGate);
        assert_eq!(
            intent(&before_scan("how does this work")),
            Intent::Help(HelpTopic::HowItWorks)
        );
        assert_eq!(
            intent(&before_scan("  What can you help with?! ")),
            Intent::Help(HelpTopic::Capabilities)
        );
    }

    #[test]
    fn test_replay_bypasses_gate() {
        let input = RuleInput::new("routine please", false, true, PendingPrompt::None);
        assert_eq!(intent(&input), Intent::KnowledgeBase(KbTopic::Routine));
    }

    #[test]
    fn test_location_confirmation_depends_on_pending_prompt() {
        assert_eq!(
            intent(&pending("Yes, share my location", PendingPrompt::AwaitingDermLocation)),
            Intent::ConfirmDermLocation
        );
        assert_eq!(
            intent(&pending(
                "Try again",
                PendingPrompt::AwaitingProductLocation {
                    tier: Some(PriceTier::Premium)
                }
            )),
            Intent::ConfirmProductLocation {
                tier: Some(PriceTier::Premium)
            }
        );
        // Without a prompt "yes" is small talk.
        assert_eq!(
            intent(&scanned("yes")),
            Intent::KnowledgeBase(KbTopic::General)
        );
        // "eyes" is not "yes".
        assert_ne!(
            intent(&pending("my eyes are puffy", PendingPrompt::AwaitingDermLocation)),
            Intent::ConfirmDermLocation
        );
    }

    #[test]
    fn test_decline_location() {
        assert_eq!(
            intent(&pending("Not now", PendingPrompt::AwaitingDermLocation)),
            Intent::DeclineLocation
        );
        assert_eq!(
            intent(&pending(
                "no thanks",
                PendingPrompt::AwaitingProductLocation { tier: None }
            )),
            Intent::DeclineLocation
        );
    }

    #[test]
    fn test_provide_email_only_when_asked() {
        assert_eq!(
            intent(&pending("it's amira@example.com", PendingPrompt::AwaitingEmailAddress)),
            Intent::ProvideEmail("amira@example.com".into())
        );
        // Unprompted addresses go through the email rule instead.
        assert_eq!(
            intent(&scanned("send it to amira@example.com")),
            Intent::Email(Some("amira@example.com".into()))
        );
    }

    #[test]
    fn test_find_dermatologist() {
        assert_eq!(
            intent(&scanned("Find a dermatologist near me")),
            Intent::FindDermatologist
        );
        assert_eq!(
            intent(&scanned("any local dermatologist?")),
            Intent::FindDermatologist
        );
        // No search verb: the knowledge base asks instead.
        assert_eq!(
            intent(&scanned("should I see a dermatologist")),
            Intent::KnowledgeBase(KbTopic::Doctor)
        );
    }

    #[test]
    fn test_product_search_and_tiers() {
        assert_eq!(
            intent(&scanned("Find stores near me")),
            Intent::FindProducts { tier: None }
        );
        assert_eq!(
            intent(&scanned("where can I buy cheap products")),
            Intent::FindProducts {
                tier: Some(PriceTier::Budget)
            }
        );
        assert_eq!(
            intent(&scanned("Show budget options")),
            Intent::PriceTier(PriceTier::Budget)
        );
        assert_eq!(
            intent(&scanned("something inexpensive")),
            Intent::PriceTier(PriceTier::Budget)
        );
        assert_eq!(
            intent(&scanned("mid-range please")),
            Intent::PriceTier(PriceTier::Moderate)
        );
        assert_eq!(
            intent(&scanned("Show premium options")),
            Intent::PriceTier(PriceTier::Premium)
        );
    }

    #[test]
    fn test_store_words_match_whole_words_only() {
        assert_eq!(
            intent(&scanned("How do I restore my skin barrier?")),
            Intent::KnowledgeBase(KbTopic::General)
        );
        assert_eq!(
            intent(&scanned("Which moisturizer helps restore hydration?")),
            Intent::KnowledgeBase(KbTopic::General)
        );
        assert_eq!(
            intent(&scanned("any skincare shops nearby?")),
            Intent::FindProducts { tier: None }
        );
        assert_eq!(
            intent(&scanned("skincare products near me")),
            Intent::FindProducts { tier: None }
        );
    }

    #[test]
    fn test_online_and_recommend_do_not_search_locally() {
        assert_eq!(intent(&scanned("Shop online")), Intent::OnlineCatalog);
        assert_eq!(
            intent(&scanned("Recommend products")),
            Intent::KnowledgeBase(KbTopic::Products)
        );
        assert_eq!(
            intent(&scanned("can you recommend something")),
            Intent::KnowledgeBase(KbTopic::Products)
        );
    }

    #[test]
    fn test_email_and_results() {
        assert_eq!(intent(&scanned("Email me my results")), Intent::Email(None));
        assert_eq!(intent(&scanned("show my chart")), Intent::ShowResults);
        assert_eq!(intent(&scanned("Can I see my results again?")), Intent::ShowResults);
        assert_eq!(
            intent(&scanned("Recommend products based on my analysis")),
            Intent::KnowledgeBase(KbTopic::Products)
        );
        assert_eq!(
            intent(&scanned("What routine fits my results?")),
            Intent::KnowledgeBase(KbTopic::Routine)
        );
        assert_eq!(
            intent(&scanned("Suggest a skincare routine")),
            Intent::KnowledgeBase(KbTopic::Routine)
        );
    }

    #[test]
    fn test_classify_reports_rule_name() {
        assert_eq!(classify(&scanned("hello")).1, "knowledge_base");
        assert_eq!(classify(&scanned("Shop online")).1, "online_catalog");
    }
}
