//! The keyword fallback always yields exactly one external-call intent whose
//! keywords are unique, lowercase, and at least the minimum length.

use std::collections::HashSet;

use forge_core::models::IntentCategory;
use forge_intent::fallback_plan;
use proptest::prelude::*;

proptest! {
    #[test]
    fn fallback_plan_shape(text in ".{0,200}", min_len in 1usize..6) {
        let plan = fallback_plan(&text, "F", min_len);
        prop_assert_eq!(plan.len(), 1);
        prop_assert_eq!(plan[0].category, IntentCategory::ExternalCall);

        let keywords = &plan[0].keywords;
        let unique: HashSet<_> = keywords.iter().collect();
        prop_assert_eq!(unique.len(), keywords.len());
        for k in keywords {
            prop_assert!(k.len() >= min_len);
            prop_assert_eq!(k, &k.to_lowercase());
        }
    }

    #[test]
    fn fallback_is_deterministic(text in "[a-zA-Z ,.]{0,120}") {
        prop_assert_eq!(fallback_plan(&text, "F", 3), fallback_plan(&text, "F", 3));
    }
}
