//! Static skincare reference tables.

/// A named product with a short pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KbProduct {
    pub name: &'static str,
    pub description: &'static str,
}

const fn p(name: &'static str, description: &'static str) -> KbProduct {
    KbProduct { name, description }
}

pub struct TypeProducts {
    pub cleansers: &'static [KbProduct],
    pub moisturizers: &'static [KbProduct],
}

pub struct Routine {
    pub morning: &'static [&'static str],
    pub evening: &'static [&'static str],
    pub weekly: &'static [&'static str],
    pub tips: &'static [&'static str],
}

pub static DRY_PRODUCTS: TypeProducts = TypeProducts {
    cleansers: &[
        p("CeraVe Hydrating Facial Cleanser", "super gentle and hydrating"),
        p("La Roche-Posay Toleriane Hydrating Gentle Cleanser", "perfect for sensitive dry skin"),
        p("Neutrogena Ultra Gentle Hydrating Cleanser", "affordable and effective"),
    ],
    moisturizers: &[
        p("CeraVe Moisturizing Cream", "rich but non-greasy"),
        p("First Aid Beauty Ultra Repair Cream", "intensive hydration"),
        p("Weleda Skin Food", "great for extra dry patches"),
    ],
};

pub static OILY_PRODUCTS: TypeProducts = TypeProducts {
    cleansers: &[
        p("CeraVe Foaming Facial Cleanser", "balances without over-drying"),
        p("La Roche-Posay Effaclar Purifying Foaming Gel", "great for oily skin"),
        p("Neutrogena Oil-Free Acne Wash", "helps with breakouts too"),
    ],
    moisturizers: &[
        p("Neutrogena Hydro Boost Water Gel", "lightweight hydration"),
        p("The Ordinary Natural Moisturizing Factors", "non-greasy formula"),
        p("Clinique Dramatically Different Moisturizing Gel", "oil-free option"),
    ],
};

pub static NORMAL_PRODUCTS: TypeProducts = TypeProducts {
    cleansers: &[
        p("Cetaphil Gentle Skin Cleanser", "a perfect balance for normal skin"),
        p("Kiehl's Ultra Facial Cleanser", "maintains natural moisture balance"),
        p("Fresh Soy Face Cleanser", "gentle and effective"),
    ],
    moisturizers: &[
        p("CeraVe Daily Moisturizing Lotion", "balanced hydration"),
        p("Cetaphil Daily Hydrating Lotion", "light but effective"),
        p("Kiehl's Ultra Facial Cream", "perfect all-season option"),
    ],
};

pub fn products_for_type(skin_type: &str) -> &'static TypeProducts {
    match skin_type {
        "dry" => &DRY_PRODUCTS,
        "oily" => &OILY_PRODUCTS,
        _ => &NORMAL_PRODUCTS,
    }
}

const ACNE_PRODUCTS: &[KbProduct] = &[
    p("Paula's Choice 2% BHA Liquid Exfoliant", "gentle but effective"),
    p("The Ordinary Niacinamide 10% + Zinc 1%", "helps reduce breakouts"),
    p("La Roche-Posay Effaclar Duo", "targets blemishes without overdrying"),
    p("Differin Gel", "prescription-strength retinoid now available OTC"),
    p("CeraVe Acne Foaming Cream Cleanser", "with benzoyl peroxide"),
];

const REDNESS_PRODUCTS: &[KbProduct] = &[
    p(
        "Dr. Jart+ Cicapair Tiger Grass Color Correcting Treatment",
        "calms and covers redness",
    ),
    p("Avène Antirougeurs Calm Soothing Repair Mask", "intensive treatment"),
    p("The Ordinary Azelaic Acid Suspension", "helps reduce inflammation"),
    p("La Roche-Posay Rosaliac AR Intense", "visible redness reducing serum"),
    p("Eucerin Redness Relief Night Cream", "soothes and hydrates overnight"),
];

const BAGS_PRODUCTS: &[KbProduct] = &[
    p("The Ordinary Caffeine Solution 5% + EGCG", "reduces puffiness"),
    p("CeraVe Eye Repair Cream", "gentle but effective"),
    p("Neutrogena Hydro Boost Eye Gel-Cream", "hydrating and refreshing"),
    p("ROC Retinol Correxion Eye Cream", "targets fine lines and dark circles"),
    p(
        "Kiehl's Creamy Eye Treatment with Avocado",
        "rich hydration for dry under-eyes",
    ),
];

const AGING_PRODUCTS: &[KbProduct] = &[
    p("Olay Regenerist Micro-Sculpting Cream", "affordable anti-aging"),
    p("Neutrogena Rapid Wrinkle Repair", "with retinol"),
    p("The Ordinary Granactive Retinoid 2% Emulsion", "gentle retinoid formula"),
    p("CeraVe Skin Renewing Night Cream", "with peptides"),
    p(
        "L'Oreal Paris Revitalift Night Serum with Pure Retinol",
        "potent anti-aging",
    ),
];

const DRYNESS_PRODUCTS: &[KbProduct] = &[
    p("Aquaphor Healing Ointment", "intense moisture for very dry skin"),
    p("Neutrogena Hydro Boost Gel-Cream", "with hyaluronic acid"),
    p("La Roche-Posay Lipikar Balm AP+", "for extremely dry skin"),
    p("Kiehl's Ultra Facial Deep Moisture Balm", "rich texture for deep hydration"),
    p("First Aid Beauty Ultra Repair Cream", "head-to-toe moisture"),
];

pub fn products_for_issue(issue: &str) -> Option<&'static [KbProduct]> {
    match issue {
        "acne" => Some(ACNE_PRODUCTS),
        "redness" => Some(REDNESS_PRODUCTS),
        "bags" => Some(BAGS_PRODUCTS),
        "aging" => Some(AGING_PRODUCTS),
        "dryness" => Some(DRYNESS_PRODUCTS),
        _ => None,
    }
}

pub const SUNSCREENS: &[KbProduct] = &[
    p("Supergoop! Unseen Sunscreen SPF 40", "invisible finish"),
    p("La Roche-Posay Anthelios Melt-In Milk SPF 60", "great protection"),
    p("EltaMD UV Clear Broad-Spectrum SPF 46", "dermatologist favorite"),
    p("Neutrogena Ultra Sheer Dry-Touch SPF 100+", "high protection, non-greasy"),
    p("Black Girl Sunscreen SPF 30", "no white cast, moisturizing"),
];

pub static DRY_ROUTINE: Routine = Routine {
    morning: &[
        "1. **Cleanse** with a hydrating, non-foaming cleanser",
        "2. **Apply a hydrating serum** with hyaluronic acid while skin is still damp",
        "3. **Moisturize** with a rich cream to lock in hydration",
        "4. **Apply sunscreen** with at least SPF 30",
    ],
    evening: &[
        "1. **Double cleanse** if wearing makeup (oil cleanser followed by gentle cleanser)",
        "2. **Apply treatment** products (like hyaluronic acid serum)",
        "3. **Moisturize** with a richer night cream",
        "4. **Optional:** Apply a facial oil as the final step for extra moisture",
    ],
    weekly: &[
        "- **Gentle exfoliation** 1-2 times per week (avoid harsh scrubs)",
        "- **Hydrating mask** 1-2 times per week",
    ],
    tips: &[
        "- Use lukewarm (not hot) water when washing your face",
        "- Apply moisturizer while skin is still slightly damp",
        "- Consider using a humidifier in your bedroom",
        "- Drink plenty of water throughout the day",
        "- Avoid alcohol and caffeine, which can dehydrate skin",
    ],
};

pub static OILY_ROUTINE: Routine = Routine {
    morning: &[
        "1. **Cleanse** with a gentle foaming cleanser",
        "2. **Apply treatment serum** with ingredients like niacinamide or salicylic acid",
        "3. **Moisturize** with a lightweight, oil-free moisturizer",
        "4. **Apply sunscreen** (gel or fluid formula works best)",
    ],
    evening: &[
        "1. **Cleanse** thoroughly to remove oil buildup and makeup",
        "2. **Exfoliate** with chemical exfoliants (like BHA) 2-3 times per week",
        "3. **Apply treatment** for specific concerns",
        "4. **Moisturize** with a lightweight formula",
    ],
    weekly: &[
        "- **Clay mask** 1-2 times per week to absorb excess oil",
        "- **Chemical exfoliation** 2-3 times per week",
    ],
    tips: &[
        "- Don't skip moisturizer (it can actually help regulate oil production)",
        "- Use blotting papers throughout the day instead of adding powder",
        "- Look for 'oil-free' and 'non-comedogenic' on product labels",
        "- Change pillowcases frequently",
        "- Consider using mattifying primers if you wear makeup",
    ],
};

pub static NORMAL_ROUTINE: Routine = Routine {
    morning: &[
        "1. **Cleanse** with a gentle cleanser",
        "2. **Apply antioxidant serum** (like vitamin C) for protection",
        "3. **Moisturize** with a medium-weight moisturizer",
        "4. **Apply sunscreen** with SPF 30+",
    ],
    evening: &[
        "1. **Cleanse** to remove the day's buildup",
        "2. **Apply treatment products** based on concerns (retinol, peptides, etc.)",
        "3. **Moisturize** to support skin barrier function",
    ],
    weekly: &[
        "- **Exfoliate** 1-2 times per week",
        "- **Mask** (based on seasonal needs) once a week",
    ],
    tips: &[
        "- Maintain consistency with your routine",
        "- Adjust products seasonally as needed",
        "- Don't forget your neck and décolletage",
        "- Stay hydrated and eat a balanced diet",
        "- Get adequate sleep for skin regeneration",
    ],
};

pub fn routine_for_type(skin_type: &str) -> &'static Routine {
    match skin_type {
        "dry" => &DRY_ROUTINE,
        "oily" => &OILY_ROUTINE,
        _ => &NORMAL_ROUTINE,
    }
}

pub fn issue_routine(issue: &str) -> Option<&'static [&'static str]> {
    let additions: &'static [&'static str] = match issue {
        "acne" => &[
            "- **AM**: Incorporate benzoyl peroxide (2.5-5%) or salicylic acid treatment",
            "- **PM**: Consider adapalene (Differin) gel - start 2-3 times per week and build up",
            "- Spot treat with benzoyl peroxide or salicylic acid products",
            "- Use lightweight, oil-free products labeled 'non-comedogenic'",
            "- Be patient - acne treatments typically take 6-8 weeks to show significant results",
        ],
        "redness" => &[
            "- Avoid hot water on face - use lukewarm only",
            "- Look for products with centella asiatica, green tea, or licorice root extract",
            "- Skip alcohol-based products and fragrance",
            "- Consider azelaic acid products (morning or evening)",
            "- Always patch test new products before applying to entire face",
        ],
        "bags" => &[
            "- Store eye cream in the refrigerator for extra de-puffing effect",
            "- Use a dedicated eye cream with caffeine or peptides",
            "- Apply with ring finger using gentle tapping motion",
            "- Sleep with head slightly elevated",
            "- Use cold compress in the morning to reduce puffiness",
        ],
        _ => return None,
    };
    Some(additions)
}

pub const SKIN_TYPES_INFO: &[&str] = &[
    "**Dry skin** produces less sebum than normal skin and lacks lipids needed for moisture retention and protection. It often feels tight, looks dull, and may have flaky patches.",
    "**Oily skin** produces excess sebum, giving a shiny appearance. It's prone to enlarged pores, blackheads, and acne, but often ages well with fewer wrinkles.",
    "**Combination skin** features both oily and dry areas. Typically, the T-zone (forehead, nose, chin) is oily while cheeks are normal to dry.",
    "**Normal skin** is well-balanced, neither too oily nor too dry, with small pores and good circulation.",
];

pub const LAYERING_ORDER: &[&str] = &[
    "1. Cleanser",
    "2. Toner (optional)",
    "3. Treatments/Serums (thinnest to thickest)",
    "4. Eye cream",
    "5. Moisturizer",
    "6. Face oil (PM only)",
    "7. Sunscreen (AM only)",
];

pub const GENERAL_TIPS: &[&str] = &[
    "- Consistency is key for skincare results",
    "- Introduce new products one at a time to identify potential reactions",
    "- Most products need 4-6 weeks of consistent use to show results",
    "- Sunscreen is the most effective anti-aging product",
    "- Diet, sleep, and stress levels significantly impact skin health",
    "- It's often better to use fewer, effective products than many different ones",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_falls_back_to_normal() {
        assert_eq!(
            products_for_type("combination").cleansers[0].name,
            "Cetaphil Gentle Skin Cleanser"
        );
        assert_eq!(routine_for_type("").evening.len(), 3);
    }

    #[test]
    fn test_issue_tables() {
        assert_eq!(products_for_issue("acne").map(<[_]>::len), Some(5));
        assert!(products_for_issue("freckles").is_none());
        // No routine additions for aging/dryness.
        assert!(issue_routine("aging").is_none());
        assert!(issue_routine("bags").is_some());
    }
}
