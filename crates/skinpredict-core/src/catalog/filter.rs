//! Profile predicate shared by the backend catalog and the local fallback.

use super::model::ProductRecommendation;
use crate::analysis::UserProfile;

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(value))
}

/// Returns true when `product` applies to `profile`.
///
/// - skin type must be listed, or the product targets "All"
/// - with issues in the profile, at least one must be listed (if the product lists any)
/// - gender must match unless either side is unspecified or the product targets "All"
/// - age bracket must be listed when both sides specify one
pub fn matches_profile(product: &ProductRecommendation, profile: &UserProfile) -> bool {
    if let Some(types) = &product.for_skin_type {
        if !contains_ignore_case(types, &profile.skin_type) && !contains_ignore_case(types, "All")
        {
            return false;
        }
    }

    if !profile.skin_issues.is_empty() {
        if let Some(issues) = &product.for_skin_issues {
            let any_match = profile
                .skin_issues
                .iter()
                .any(|issue| contains_ignore_case(issues, issue));
            if !any_match {
                return false;
            }
        }
    }

    if let (Some(gender), Some(target)) = (&profile.gender, &product.target_gender) {
        if !target.eq_ignore_ascii_case("All") && !target.eq_ignore_ascii_case(gender) {
            return false;
        }
    }

    if let (Some(age), Some(range)) = (&profile.age_group, &product.target_age_range) {
        if !contains_ignore_case(range, age) {
            return false;
        }
    }

    true
}

pub fn filter_catalog(
    products: impl IntoIterator<Item = ProductRecommendation>,
    profile: &UserProfile,
) -> Vec<ProductRecommendation> {
    products
        .into_iter()
        .filter(|product| matches_profile(product, profile))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    fn acne_cream() -> ProductRecommendation {
        ProductRecommendation {
            name: "Effaclar Duo+ Cream".into(),
            target_gender: Some("All".into()),
            target_age_range: strings(&["10-19", "20-29"]),
            for_skin_type: strings(&["Oily", "Combination"]),
            for_skin_issues: strings(&["Acne"]),
            ..Default::default()
        }
    }

    fn profile(skin_type: &str, issues: &[&str]) -> UserProfile {
        UserProfile {
            skin_type: skin_type.into(),
            skin_issues: issues.iter().map(|s| s.to_string()).collect(),
            gender: None,
            age_group: None,
        }
    }

    #[test]
    fn test_skin_type_membership_is_case_insensitive() {
        assert!(matches_profile(&acne_cream(), &profile("oily", &[])));
        assert!(!matches_profile(&acne_cream(), &profile("Dry", &[])));
    }

    #[test]
    fn test_all_skin_types_wildcard() {
        let serum = ProductRecommendation {
            for_skin_type: strings(&["All"]),
            ..Default::default()
        };
        assert!(matches_profile(&serum, &profile("Dry", &[])));
    }

    #[test]
    fn test_issue_intersection_required_when_both_sides_list_issues() {
        assert!(matches_profile(&acne_cream(), &profile("Oily", &["Redness", "Acne"])));
        assert!(!matches_profile(&acne_cream(), &profile("Oily", &["Bags"])));
    }

    #[test]
    fn test_gender_and_age_filters() {
        let mut men_cream = acne_cream();
        men_cream.target_gender = Some("Male".into());

        let mut female = profile("Oily", &[]);
        female.gender = Some("Female".into());
        assert!(!matches_profile(&men_cream, &female));
        assert!(matches_profile(&acne_cream(), &female));

        let mut older = profile("Oily", &[]);
        older.age_group = Some("50-59".into());
        assert!(!matches_profile(&acne_cream(), &older));
    }
}
