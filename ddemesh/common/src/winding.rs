/// How a face with a given number of vertex references is re-emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindingRule {
    Reverse,
    /// Reverse for every model except the reference model.
    ReverseUnlessReference,
}

/// Reference-count to rule table. Counts missing here are unhandled.
const WINDING_RULES: &[(usize, WindingRule)] = &[
    (3, WindingRule::ReverseUnlessReference),
    (4, WindingRule::Reverse),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceWinding {
    Reverse,
    Keep,
    /// No rule for this arity; the face is passed through as-is.
    Unhandled,
}

/// Winding decisions resolved for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindingPolicy {
    is_reference: bool,
}

impl WindingPolicy {
    pub fn for_model(model: &str, reference_model: &str) -> Self {
        Self {
            is_reference: model == reference_model,
        }
    }

    pub fn decide(&self, reference_count: usize) -> FaceWinding {
        let rule = WINDING_RULES
            .iter()
            .find(|(count, _)| *count == reference_count)
            .map(|(_, rule)| *rule);

        match rule {
            Some(WindingRule::Reverse) => FaceWinding::Reverse,
            Some(WindingRule::ReverseUnlessReference) if self.is_reference => FaceWinding::Keep,
            Some(WindingRule::ReverseUnlessReference) => FaceWinding::Reverse,
            None => FaceWinding::Unhandled,
        }
    }
}
