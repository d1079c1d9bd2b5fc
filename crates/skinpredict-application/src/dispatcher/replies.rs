//! Assistant reply texts and their suggestion chips.

use std::fmt::Write as _;

use skinpredict_core::analysis::SkinAnalysisResult;
use skinpredict_core::catalog::{
    DermatologistResult, NearbyProduct, NearbyProductsResponse, NearbyStore, PriceTier,
};
use skinpredict_core::location::{LocationError, LocationPurpose};
use strum::IntoEnumIterator;

use super::Reply;
use super::rules::{HOW_DOES_THIS_WORK, WHAT_CAN_YOU_HELP_WITH};

pub const CHIP_ROUTINE: &str = "Suggest a skincare routine";
pub const CHIP_PRODUCTS: &str = "Recommend products";
pub const CHIP_DERMATOLOGIST: &str = "Find a dermatologist near me";
pub const CHIP_EMAIL: &str = "Email me my results";
pub const CHIP_SHARE_LOCATION: &str = "Yes, share my location";
pub const CHIP_NOT_NOW: &str = "Not now";
pub const CHIP_TRY_AGAIN: &str = "Try again";
pub const CHIP_STORES: &str = "Find stores near me";
pub const CHIP_ONLINE: &str = "Shop online";
pub const CHIP_BUDGET: &str = "Show budget options";
pub const CHIP_MODERATE: &str = "Show moderate options";
pub const CHIP_PREMIUM: &str = "Show premium options";

/// Dermatologists shown in a reply.
const DERMATOLOGISTS_SHOWN: usize = 3;
/// Products listed per tier.
const PRODUCTS_PER_TIER: usize = 5;

fn chips(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn tier_chips() -> Vec<String> {
    chips(&[CHIP_BUDGET, CHIP_MODERATE, CHIP_PREMIUM, CHIP_ONLINE])
}

pub fn scan_gate() -> Reply {
    Reply::new(
        "I'll need to analyze your skin before I can help with that! Please take a photo or upload a picture of your face first, and then we can talk about routines, products and dermatologists.",
    )
    .with_suggestions(chips(&[HOW_DOES_THIS_WORK, WHAT_CAN_YOU_HELP_WITH]))
}

pub fn how_it_works() -> Reply {
    Reply::new(
        "It's simple! 📸 Take a photo or upload a clear, well-lit picture of your face. I'll send it to our skin analysis model, which estimates your skin type and looks for common concerns like acne, redness, puffiness or dryness. Once your results are in, you can ask me for a routine, product ideas, nearby stores or a dermatologist.",
    )
    .with_suggestions(chips(&[WHAT_CAN_YOU_HELP_WITH]))
}

pub fn capabilities() -> Reply {
    Reply::new(
        "After a skin scan I can:\n\n• Explain your skin type and detected concerns\n• Build a morning and evening skincare routine\n• Recommend products by price range, online or in stores near you\n• Find dermatologists nearby\n• Email your results to you",
    )
    .with_suggestions(chips(&[HOW_DOES_THIS_WORK]))
}

fn after_summary_chips() -> Vec<String> {
    chips(&[CHIP_ROUTINE, CHIP_PRODUCTS, CHIP_DERMATOLOGIST, CHIP_EMAIL])
}

/// First message of a scanned session.
pub fn summary(analysis: &SkinAnalysisResult) -> Reply {
    let text = match analysis.ai_response.as_deref() {
        Some(ai_response) if !ai_response.trim().is_empty() => format!(
            "✨ Your skin analysis is complete! Here's what I found:\n\n{ai_response}\n\nWould you like me to suggest some skincare products based on these results? Or would you prefer to find a dermatologist near you?"
        ),
        _ => {
            let mut text = format!(
                "I've completed your skin analysis! Here's what I found:\n\n✨ Skin Type: {} ({:.2}% confidence)\n\n",
                analysis.skin_type.kind, analysis.skin_type.confidence
            );
            if analysis.has_issues() {
                let issues: Vec<String> = analysis
                    .skin_issues
                    .iter()
                    .map(|issue| format!("{} ({:.2}% confidence)", issue.name, issue.confidence))
                    .collect();
                let _ = write!(
                    text,
                    "I've detected these skin concerns: {}\n\n",
                    issues.join(", ")
                );
            } else {
                text.push_str("Good news! I didn't detect any significant skin issues.\n\n");
            }
            if let Some(advice) = analysis.personalized_advice.as_deref() {
                let _ = write!(text, "💡 {}\n\n", advice.trim());
            }
            text.push_str("Would you like me to suggest some personalized skincare recommendations? Or perhaps help you find a dermatologist nearby?");
            text
        }
    };
    Reply::new(text)
        .with_visualization()
        .with_suggestions(after_summary_chips())
}

pub fn ask_dermatologist_location() -> Reply {
    Reply::new(
        "I'd love to help you find a dermatologist nearby! I'll need to access your location for that. Is it okay if I access your location?",
    )
    .with_suggestions(chips(&[CHIP_SHARE_LOCATION, CHIP_NOT_NOW]))
}

pub fn ask_product_location(tier: Option<PriceTier>) -> Reply {
    let what = match tier {
        Some(tier) => format!("{} skincare products", tier.to_string().to_lowercase()),
        None => "skincare products".to_string(),
    };
    Reply::new(format!(
        "I can look for {what} in stores near you! I'll need to access your location for that. Is it okay if I access your location?"
    ))
    .with_suggestions(chips(&[CHIP_SHARE_LOCATION, CHIP_NOT_NOW]))
}

pub fn location_declined() -> Reply {
    Reply::new(
        "No problem, I won't use your location. I can still suggest a routine or show you products you can order online.",
    )
    .with_suggestions(chips(&[CHIP_ROUTINE, CHIP_ONLINE]))
}

pub fn location_failed(purpose: LocationPurpose, error: &LocationError) -> Reply {
    let target = match purpose {
        LocationPurpose::Dermatologists => "nearby dermatologists",
        LocationPurpose::Products { .. } => "stores near you",
    };
    let fallback = match purpose {
        LocationPurpose::Dermatologists => CHIP_ROUTINE,
        LocationPurpose::Products { .. } => CHIP_ONLINE,
    };
    let text = match error {
        LocationError::PermissionDenied => format!(
            "Oh no, I couldn't access your location! For me to find {target}, could you please allow location access? 📍"
        ),
        LocationError::Unsupported => format!(
            "It looks like location sharing isn't available here, which I need to find {target}. Maybe try a different device?"
        ),
        LocationError::Unavailable(_) => format!(
            "I couldn't work out where you are right now, so I can't look for {target} yet. Would you like to try again?"
        ),
    };
    Reply::new(text).with_suggestions(chips(&[CHIP_TRY_AGAIN, fallback]))
}

pub fn dermatologists_found(results: &[DermatologistResult]) -> Reply {
    let noun = if results.len() == 1 {
        "dermatologist"
    } else {
        "dermatologists"
    };
    let mut text = format!(
        "Great news! I found {} {noun} near you. Here are the closest ones:\n\n",
        results.len()
    );
    for (index, doctor) in results.iter().take(DERMATOLOGISTS_SHOWN).enumerate() {
        let rating = doctor
            .rating
            .map(|rating| format!("{rating:.1}"))
            .unwrap_or_else(|| "N/A".to_string());
        let place = if doctor.vicinity.is_empty() {
            &doctor.address
        } else {
            &doctor.vicinity
        };
        let _ = writeln!(text, "{}. **{}** ⭐ {} - {}", index + 1, doctor.name, rating, place);
    }
    text.push_str("\nWould you like some skincare advice to follow until your appointment?");
    Reply::new(text).with_suggestions(chips(&[CHIP_ROUTINE, CHIP_EMAIL]))
}

pub fn no_dermatologists() -> Reply {
    Reply::new(
        "I searched the area but couldn't find any dermatologists listed nearby. Would you like me to suggest some online dermatology services instead, or perhaps expand the search area?",
    )
    .with_suggestions(chips(&[CHIP_ROUTINE, CHIP_PRODUCTS]))
}

pub fn dermatologist_search_failed() -> Reply {
    Reply::new(
        "I'm having a bit of trouble with the dermatologist search right now. Would you like to try again, or should I focus on giving you personalized skincare advice instead?",
    )
    .with_suggestions(chips(&[CHIP_TRY_AGAIN, CHIP_ROUTINE]))
}

fn write_product(out: &mut String, item: &NearbyProduct) {
    let product = &item.product;
    let _ = writeln!(
        out,
        "• **{}** by {} - {} {}",
        product.name, product.brand, product.price, product.currency
    );
    if !product.description.is_empty() {
        let _ = writeln!(out, "  {}", product.description);
    }
    if !item.nearby_stores.is_empty() {
        let stores: Vec<&str> = item.nearby_stores.iter().map(|s| s.name.as_str()).collect();
        let _ = writeln!(out, "  Available at: {}", stores.join(", "));
    } else if !product.link.is_empty() {
        let _ = writeln!(out, "  {}", product.link);
    }
}

fn write_tier(out: &mut String, tier: PriceTier, items: &[NearbyProduct]) {
    let _ = writeln!(out, "{} **{} options**", tier.icon(), tier);
    for item in items.iter().take(PRODUCTS_PER_TIER) {
        write_product(out, item);
    }
    out.push('\n');
}

fn write_stores(out: &mut String, stores: &[NearbyStore]) {
    if stores.is_empty() {
        return;
    }
    out.push_str("🏬 Stores nearby: ");
    let names: Vec<String> = stores
        .iter()
        .take(3)
        .map(|store| {
            if store.rating > 0.0 {
                format!("{} ({:.1}★)", store.name, store.rating)
            } else {
                store.name.clone()
            }
        })
        .collect();
    out.push_str(&names.join(", "));
    out.push_str("\n\n");
}

/// Lists products, all tiers or only `tier`.
pub fn products(response: &NearbyProductsResponse, tier: Option<PriceTier>, online: bool) -> Reply {
    let mut text = String::new();
    match tier {
        Some(tier) => {
            let items = response.tier(tier);
            if items.is_empty() {
                return Reply::new(format!(
                    "I couldn't find any {} products that match your skin profile. Would you like to see a different price range?",
                    tier.to_string().to_lowercase()
                ))
                .with_suggestions(tier_chips());
            }
            let _ = write!(
                text,
                "Here are {} options that match your skin profile:\n\n",
                tier.to_string().to_lowercase()
            );
            write_tier(&mut text, tier, items);
        }
        None => {
            if response.is_empty() {
                return no_products();
            }
            text.push_str(if online {
                "Here are products you can order online, grouped by price:\n\n"
            } else {
                "Here are skincare products for your skin profile, grouped by price:\n\n"
            });
            for tier in PriceTier::iter() {
                let items = response.tier(tier);
                if !items.is_empty() {
                    write_tier(&mut text, tier, items);
                }
            }
        }
    }
    write_stores(&mut text, &response.nearby_stores);
    text.push_str("Want me to narrow it down to a price range?");
    Reply::new(text).with_suggestions(tier_chips())
}

pub fn no_products() -> Reply {
    Reply::new(
        "I couldn't find products matching your skin profile right now. Would you like a skincare routine instead, or should I check online shops?",
    )
    .with_suggestions(chips(&[CHIP_ROUTINE, CHIP_ONLINE]))
}

pub fn ask_email() -> Reply {
    Reply::new("I'd be happy to email your results! What's your email address?")
}

pub fn email_sent(address: &str) -> Reply {
    Reply::new(format!(
        "Perfect! ✅ I've sent your skin analysis results to {address}. Is there anything else you'd like help with today?"
    ))
    .with_suggestions(chips(&[CHIP_ROUTINE, CHIP_PRODUCTS]))
}

pub fn email_failed(address: &str) -> Reply {
    Reply::new(
        "I'm having trouble sending the email right now. Would you like me to try again or perhaps I can give you recommendations here instead?",
    )
    .with_suggestions(vec![
        format!("Email my results to {address}"),
        CHIP_PRODUCTS.to_string(),
    ])
}

pub fn routine(text: String) -> Reply {
    Reply::new(text).with_suggestions(chips(&[CHIP_PRODUCTS, CHIP_DERMATOLOGIST, CHIP_EMAIL]))
}

pub fn kb_products(text: String) -> Reply {
    Reply::new(text).with_suggestions(chips(&[CHIP_BUDGET, CHIP_PREMIUM, CHIP_STORES, CHIP_ONLINE]))
}

pub fn general(text: String) -> Reply {
    Reply::new(text).with_suggestions(chips(&[CHIP_ROUTINE, CHIP_PRODUCTS, CHIP_DERMATOLOGIST]))
}

pub fn technical_hiccup() -> Reply {
    Reply::new("I seem to be having a technical hiccup. Could we try that again?")
}
