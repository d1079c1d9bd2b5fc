use std::fmt::Write as _;
use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::tables::{
    self, GENERAL_TIPS, KbProduct, LAYERING_ORDER, SKIN_TYPES_INFO, SUNSCREENS,
};

/// Text generator over the static skincare tables.
///
/// Skin type and issue arguments are expected lowercased ("oily", "acne").
/// Unknown skin types are answered as "normal"; unknown issues are skipped.
pub struct KnowledgeBase {
    rng: Mutex<StdRng>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic picks, for tests and reproducible sessions.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn pick(&self, products: &'static [KbProduct]) -> Option<&'static KbProduct> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        products.choose(&mut *rng)
    }

    fn push_pick(&self, out: &mut String, header: &str, products: &'static [KbProduct]) {
        out.push_str(header);
        out.push('\n');
        if let Some(product) = self.pick(products) {
            let _ = writeln!(out, "• {} - {}", product.name, product.description);
        }
        out.push('\n');
    }

    /// Morning, evening and weekly steps, special care per issue, then tips.
    pub fn get_routine(&self, skin_type: &str, skin_issues: &[String]) -> String {
        let routine = tables::routine_for_type(skin_type);
        let mut out =
            String::from("Here's a daily skincare routine tailored for your specific skin needs! ✨\n\n");

        for (header, steps) in [
            ("🌞 **MORNING ROUTINE**", routine.morning),
            ("🌙 **EVENING ROUTINE**", routine.evening),
            ("📆 **WEEKLY TREATMENTS**", routine.weekly),
        ] {
            let _ = writeln!(out, "{header}\n");
            for step in steps {
                let _ = writeln!(out, "{step}");
            }
            out.push('\n');
        }

        for issue in skin_issues {
            if let Some(additions) = tables::issue_routine(issue) {
                let _ = writeln!(out, "✨ **SPECIAL CARE FOR {}**\n", issue.to_uppercase());
                for tip in additions {
                    let _ = writeln!(out, "{tip}");
                }
                out.push('\n');
            }
        }

        out.push_str("💡 **HELPFUL TIPS**\n\n");
        for tip in routine.tips {
            let _ = writeln!(out, "{tip}");
        }

        out.push_str(
            "\nWould you like me to explain any of these steps in more detail or suggest specific products for your routine?",
        );
        out
    }

    /// One cleanser, one moisturizer, one pick per known issue and a sunscreen.
    pub fn get_product_recommendations(&self, skin_type: &str, skin_issues: &[String]) -> String {
        let products = tables::products_for_type(skin_type);
        let mut out = String::from(
            "Here are some personalized product recommendations based on your skin analysis! ✨\n\n",
        );

        self.push_pick(&mut out, "🧴 **CLEANSER RECOMMENDATIONS**", products.cleansers);
        self.push_pick(&mut out, "💦 **MOISTURIZER RECOMMENDATIONS**", products.moisturizers);

        for issue in skin_issues {
            if let Some(issue_products) = tables::products_for_issue(issue) {
                let header = format!("✨ **FOR {}**", issue.to_uppercase());
                self.push_pick(&mut out, &header, issue_products);
            }
        }

        self.push_pick(&mut out, "☀️ **SUNSCREEN (ESSENTIAL FOR EVERYONE)**", SUNSCREENS);

        out.push_str(
            "Would you like more specific information about any of these products? Or would you prefer to see more affordable alternatives?",
        );
        out
    }

    /// Catch-all answer for free text.
    pub fn get_general_response(&self, query: &str, skin_type: &str, _skin_issues: &[String]) -> String {
        let query = query.to_lowercase();

        if query.contains("layer") || has_word(&query, "order") {
            return bulleted("Here's the order to apply your skincare products:", LAYERING_ORDER);
        }
        if query.contains("skin type") || query.contains("combination") {
            return bulleted("Here's a quick overview of the main skin types:", SKIN_TYPES_INFO);
        }
        if has_word(&query, "tip") || has_word(&query, "tips") || query.contains("advice") {
            return bulleted("A few skincare tips that work for everyone:", GENERAL_TIPS);
        }

        if has_word(&query, "yes") {
            return "Great! I'd be happy to provide more details. What specific aspect of your skincare routine or product recommendations would you like to know more about?".to_string();
        }
        if has_word(&query, "no") {
            return "No problem at all! If you have any other questions about your skin or skincare routine, I'm here to help!".to_string();
        }

        let skin = if skin_type.is_empty() { "normal" } else { skin_type };
        format!(
            "Based on your {skin} skin, I'd recommend focusing on a consistent skincare routine with appropriate products. Would you like me to suggest specific products, a daily routine, or help with a particular skin concern?"
        )
    }
}

fn bulleted(intro: &str, lines: &[&str]) -> String {
    let mut out = format!("{intro}\n\n");
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    out.trim_end().to_string()
}

/// Whole-word match, so "know" does not count as "no".
fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_product_recommendations_for_oily_skin() {
        let kb = KnowledgeBase::with_seed(7);
        let text = kb.get_product_recommendations("oily", &[]);

        assert!(text.contains("🧴 **CLEANSER RECOMMENDATIONS**"));
        assert!(text.contains("💦 **MOISTURIZER RECOMMENDATIONS**"));
        assert!(text.contains("☀️ **SUNSCREEN (ESSENTIAL FOR EVERYONE)**"));
        assert!(!text.contains("**FOR "));
    }

    #[test]
    fn test_sunscreen_always_present() {
        let kb = KnowledgeBase::with_seed(1);
        for skin_type in ["dry", "oily", "normal", "combination", ""] {
            let text = kb.get_product_recommendations(skin_type, &issues(&["acne", "wrinkles"]));
            assert!(text.contains("SUNSCREEN"), "missing sunscreen for {skin_type:?}");
            assert!(text.contains("✨ **FOR ACNE**"));
            assert!(!text.contains("WRINKLES"));
        }
    }

    #[test]
    fn test_same_seed_same_picks() {
        let a = KnowledgeBase::with_seed(42).get_product_recommendations("dry", &issues(&["redness"]));
        let b = KnowledgeBase::with_seed(42).get_product_recommendations("dry", &issues(&["redness"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_routine_sections_and_issue_care() {
        let kb = KnowledgeBase::with_seed(0);
        let text = kb.get_routine("dry", &issues(&["acne", "aging"]));

        let morning = text.find("🌞 **MORNING ROUTINE**").unwrap();
        let evening = text.find("🌙 **EVENING ROUTINE**").unwrap();
        let weekly = text.find("📆 **WEEKLY TREATMENTS**").unwrap();
        let acne = text.find("✨ **SPECIAL CARE FOR ACNE**").unwrap();
        let tips = text.find("💡 **HELPFUL TIPS**").unwrap();
        assert!(morning < evening && evening < weekly && weekly < acne && acne < tips);
        assert!(!text.contains("SPECIAL CARE FOR AGING"));
        assert!(text.contains("hydrating, non-foaming cleanser"));
    }

    #[test]
    fn test_general_response_branches() {
        let kb = KnowledgeBase::with_seed(0);
        assert!(kb.get_general_response("Yes please", "oily", &[]).starts_with("Great!"));
        assert!(kb.get_general_response("no thanks", "oily", &[]).starts_with("No problem"));
        // "know" must not be read as "no".
        let text = kb.get_general_response("I want to know more", "oily", &[]);
        assert!(text.starts_with("Based on your oily skin"));
        assert!(kb.get_general_response("What order should I layer things?", "dry", &[]).contains("7. Sunscreen (AM only)"));
    }
}
