//! Collection ordering. A drag gesture in the console produces a full slug
//! ordering; positions are reassigned from array order and persisted in one
//! batch request.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub slug: String,
    pub position: usize,
}

pub fn position_updates(slugs: &[String]) -> Vec<PositionUpdate> {
    slugs
        .iter()
        .enumerate()
        .map(|(position, slug)| PositionUpdate {
            slug: slug.clone(),
            position,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_the_new_array_order() {
        // Item previously at index 2 dragged to the front.
        let slugs = vec![
            "summer".to_string(),
            "classics".to_string(),
            "new-releases".to_string(),
        ];
        let updates = position_updates(&slugs);
        assert_eq!(
            updates,
            vec![
                PositionUpdate {
                    slug: "summer".to_string(),
                    position: 0
                },
                PositionUpdate {
                    slug: "classics".to_string(),
                    position: 1
                },
                PositionUpdate {
                    slug: "new-releases".to_string(),
                    position: 2
                },
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_updates() {
        assert!(position_updates(&[]).is_empty());
    }
}
